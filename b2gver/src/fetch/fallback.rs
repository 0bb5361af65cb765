//! Ordered first-success combinator.

use std::future::Future;

/// Outcome of exhausting a candidate list without a success.
#[derive(Debug)]
pub struct Exhausted<E> {
    /// How many candidates were attempted.
    pub attempts: usize,

    /// The error from the final attempt, `None` for an empty list.
    pub last: Option<E>,
}

/// Attempt candidates strictly in order, short-circuiting on the first
/// success.
///
/// A later candidate is never attempted before the earlier one's outcome
/// is known. Intermediate errors are dropped; only the last one is
/// reported on exhaustion, so attempts that need their failures observed
/// should log them.
pub async fn first_ok<C, F, Fut, T, E>(candidates: C, mut attempt: F) -> Result<T, Exhausted<E>>
where
    C: IntoIterator,
    F: FnMut(C::Item) -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let mut attempts = 0;
    let mut last = None;

    for candidate in candidates {
        attempts += 1;
        match attempt(candidate).await {
            Ok(value) => return Ok(value),
            Err(err) => last = Some(err),
        }
    }

    Err(Exhausted { attempts, last })
}
