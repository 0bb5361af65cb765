//! Memoization of resolved revisions.

use std::fmt;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Which installed revision is being resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RevisionKind {
    /// The browser engine build.
    Gecko,
    /// The front-end application suite build.
    Gaia,
}

impl RevisionKind {
    /// Lowercase name, as used in logs.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Gecko => "gecko",
            Self::Gaia => "gaia",
        }
    }
}

impl fmt::Display for RevisionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One-slot-per-kind cache of resolved revisions.
///
/// Populated only by successful resolutions and never invalidated; this
/// holds because a resolver targets a single device whose image does not
/// change underneath it. Share one cache across resolvers by handing the
/// same instance to each builder.
#[derive(Debug, Default)]
pub struct RevisionCache {
    slots: Mutex<Slots>,
}

#[derive(Debug, Default)]
struct Slots {
    gecko: Option<String>,
    gaia: Option<String>,
}

impl RevisionCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the cached revision for `kind`, if any.
    pub fn get(&self, kind: RevisionKind) -> Option<String> {
        let slots = self.lock();
        match kind {
            RevisionKind::Gecko => slots.gecko.clone(),
            RevisionKind::Gaia => slots.gaia.clone(),
        }
    }

    /// Record the resolved revision for `kind`.
    pub fn store(&self, kind: RevisionKind, revision: impl Into<String>) {
        let mut slots = self.lock();
        let slot = match kind {
            RevisionKind::Gecko => &mut slots.gecko,
            RevisionKind::Gaia => &mut slots.gaia,
        };
        *slot = Some(revision.into());
    }

    fn lock(&self) -> MutexGuard<'_, Slots> {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
