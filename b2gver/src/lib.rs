//! # b2gver
//!
//! Async resolver for the Gecko and Gaia source revisions installed on a
//! B2G device reachable over adb.
//!
//! B2G images do not expose their build revisions through one stable
//! interface: depending on how the image was produced, the identifiers
//! live in a source-control manifest, an INI-style descriptor, or a
//! commit marker packed inside the settings application bundle — at more
//! than one possible device path. b2gver walks the candidate locations in
//! priority order, streams one value out of whichever format turns up,
//! and memoizes the answer for the life of the resolver.
//!
//! ## Features
//!
//! - Async device access via adb subprocess invocations
//! - Ordered location fallback with short-circuit on first success
//! - Streaming extraction: zip entries, XML manifests, and descriptors
//!   are scanned without buffering whole files
//! - Scoped local staging — temporary directories are always reclaimed
//! - Per-resolver memoization of resolved revisions
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use b2gver::{AdbTransport, RevisionResolver};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), b2gver::Error> {
//!     let transport = Arc::new(AdbTransport::new());
//!     let resolver = RevisionResolver::new(transport);
//!
//!     let gecko = resolver.gecko_revision().await?;
//!     let gaia = resolver.gaia_revision().await?;
//!     println!("gecko: {gecko}");
//!     println!("gaia:  {gaia}");
//!
//!     Ok(())
//! }
//! ```

pub mod device;
pub mod error;
pub mod fetch;
pub mod resolver;
pub mod scan;
pub mod transport;

// Re-export main types for convenience
pub use device::{Candidate, DeviceLayout};
pub use error::{Error, ExtractError, RetrievalError, ScanError, TransportError};
pub use resolver::{ResolverBuilder, RevisionCache, RevisionKind, RevisionResolver};
pub use transport::{AdbConfig, AdbTransport, DeviceTransport};
