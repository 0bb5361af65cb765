//! Builder for constructing revision resolvers.

use std::sync::Arc;

use super::RevisionResolver;
use super::cache::RevisionCache;
use crate::device::DeviceLayout;
use crate::transport::DeviceTransport;

/// Builder for [`RevisionResolver`].
///
/// # Example
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use b2gver::{AdbTransport, ResolverBuilder};
///
/// let resolver = ResolverBuilder::new(Arc::new(AdbTransport::new())).build();
/// ```
pub struct ResolverBuilder {
    transport: Arc<dyn DeviceTransport>,
    layout: DeviceLayout,
    cache: Option<Arc<RevisionCache>>,
}

impl ResolverBuilder {
    /// Create a builder over the given transport.
    pub fn new(transport: Arc<dyn DeviceTransport>) -> Self {
        Self {
            transport,
            layout: DeviceLayout::default(),
            cache: None,
        }
    }

    /// Use a non-stock device layout.
    pub fn layout(mut self, layout: DeviceLayout) -> Self {
        self.layout = layout;
        self
    }

    /// Share an existing revision cache instead of starting empty.
    pub fn cache(mut self, cache: Arc<RevisionCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Build the resolver.
    pub fn build(self) -> RevisionResolver {
        RevisionResolver::assemble(
            self.transport,
            self.layout,
            self.cache.unwrap_or_default(),
        )
    }
}
