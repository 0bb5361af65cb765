//! Revision resolution over a device transport.
//!
//! Two independent flows, each memoized: the Gecko revision comes from
//! the sources manifest with the B2G descriptor as fallback, the Gaia
//! revision from the commit marker inside the settings archive.

mod builder;
mod cache;

pub use builder::ResolverBuilder;
pub use cache::{RevisionCache, RevisionKind};

use std::fmt;
use std::io;
use std::sync::Arc;

use log::{debug, warn};

use crate::device::{self, DeviceLayout};
use crate::error::{ExtractError, Result, RetrievalError};
use crate::fetch::{Exhausted, Fetcher, first_ok};
use crate::scan::{self, ArchiveScan};
use crate::transport::DeviceTransport;

/// Where a Gecko revision can come from, in priority order.
#[derive(Debug, Clone, Copy)]
enum GeckoSource {
    /// The source-control manifest on the system partition.
    SourcesManifest,
    /// The `SourceStamp` key of a B2G descriptor file.
    Descriptor,
}

const GECKO_SOURCES: [GeckoSource; 2] = [GeckoSource::SourcesManifest, GeckoSource::Descriptor];

impl fmt::Display for GeckoSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SourcesManifest => f.write_str("sources manifest"),
            Self::Descriptor => f.write_str("b2g descriptor"),
        }
    }
}

/// Resolves the Gecko and Gaia revisions installed on one device.
///
/// Each revision kind is resolved at most once per cache: a successful
/// resolution is memoized and later calls return it without touching the
/// device again.
pub struct RevisionResolver {
    fetcher: Fetcher,
    layout: DeviceLayout,
    cache: Arc<RevisionCache>,
}

impl RevisionResolver {
    /// Create a resolver with the stock layout and a fresh cache.
    pub fn new(transport: Arc<dyn DeviceTransport>) -> Self {
        Self::builder(transport).build()
    }

    /// Start building a resolver with a custom layout or cache.
    pub fn builder(transport: Arc<dyn DeviceTransport>) -> ResolverBuilder {
        ResolverBuilder::new(transport)
    }

    pub(crate) fn assemble(
        transport: Arc<dyn DeviceTransport>,
        layout: DeviceLayout,
        cache: Arc<RevisionCache>,
    ) -> Self {
        Self {
            fetcher: Fetcher::new(transport),
            layout,
            cache,
        }
    }

    /// Resolve the revision of the given kind.
    pub async fn revision(&self, kind: RevisionKind) -> Result<String> {
        match kind {
            RevisionKind::Gecko => self.gecko_revision().await,
            RevisionKind::Gaia => self.gaia_revision().await,
        }
    }

    /// Resolve the Gecko revision.
    ///
    /// The sources manifest is preferred; images built without one, or
    /// whose manifest does not list the engine, fall back to the
    /// `SourceStamp` of the application descriptor, then the platform
    /// descriptor.
    pub async fn gecko_revision(&self) -> Result<String> {
        if let Some(revision) = self.cache.get(RevisionKind::Gecko) {
            debug!("gecko revision served from cache");
            return Ok(revision);
        }

        let revision = first_ok(GECKO_SOURCES, |source| self.gecko_attempt(source))
            .await
            .map_err(|Exhausted { last, .. }| {
                last.unwrap_or_else(|| RetrievalError::NoCandidates.into())
            })?;

        self.cache.store(RevisionKind::Gecko, &revision);
        Ok(revision)
    }

    /// Resolve the Gaia revision from the settings archive's commit
    /// marker.
    pub async fn gaia_revision(&self) -> Result<String> {
        if let Some(revision) = self.cache.get(RevisionKind::Gaia) {
            debug!("gaia revision served from cache");
            return Ok(revision);
        }

        let archive = self
            .fetcher
            .fetch_first(&self.layout.settings_archive_candidates())
            .await?;

        let path = archive.path();
        let revision =
            tokio::task::spawn_blocking(move || -> std::result::Result<String, ExtractError> {
                let mut entries = ArchiveScan::open(&path)?;
                entries.extract(device::GAIA_COMMIT_ENTRY, scan::first_line)
            })
            .await
            .map_err(|join| ExtractError::Io(io::Error::other(join)))??;

        // `archive` owns the staging directory; it must outlive the scan.
        drop(archive);

        self.cache.store(RevisionKind::Gaia, &revision);
        Ok(revision)
    }

    async fn gecko_attempt(&self, source: GeckoSource) -> Result<String> {
        match self.gecko_from(source).await {
            Ok(revision) => Ok(revision),
            Err(err) => {
                warn!("gecko revision via {source} unavailable: {err}");
                Err(err)
            }
        }
    }

    async fn gecko_from(&self, source: GeckoSource) -> Result<String> {
        match source {
            GeckoSource::SourcesManifest => {
                let candidate = self.layout.sources_manifest();
                let manifest = self.fetcher.fetch(&candidate.dir, &candidate.filename).await?;
                let revision = scan::scan_for_attribute(
                    &manifest.path(),
                    device::MANIFEST_PROJECT_TAG,
                    device::MANIFEST_REVISION_ATTR,
                    device::MANIFEST_NAME_ATTR,
                    device::GECKO_PROJECT,
                )
                .await?;
                Ok(revision)
            }
            GeckoSource::Descriptor => {
                let descriptor = self
                    .fetcher
                    .fetch_first(&self.layout.descriptor_candidates())
                    .await?;
                let revision =
                    scan::scan_for_key(&descriptor.path(), device::SOURCE_STAMP_KEY).await?;
                Ok(revision)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::transport::stub::StubTransport;
    use std::io::{Cursor, Write};

    const MANIFEST: &str = r#"<?xml version="1.0"?>
<manifest>
  <project name="gaia" path="gaia" revision="5566afcb"/>
  <project name="gecko" path="gecko" revision="abc123"/>
</manifest>"#;

    fn settings_archive(commit: &str) -> Vec<u8> {
        let mut zip = zip::ZipWriter::new(Cursor::new(Vec::new()));
        let options = zip::write::FileOptions::default();
        zip.start_file("manifest.webapp", options).unwrap();
        zip.write_all(b"{\"name\":\"Settings\"}").unwrap();
        zip.start_file("resources/gaia_commit.txt", options).unwrap();
        zip.write_all(commit.as_bytes()).unwrap();
        zip.start_file("index.html", options).unwrap();
        zip.write_all(b"<html></html>").unwrap();
        zip.finish().unwrap().into_inner()
    }

    fn resolver(stub: &Arc<StubTransport>) -> RevisionResolver {
        RevisionResolver::new(stub.clone())
    }

    #[tokio::test]
    async fn test_gecko_from_sources_manifest() {
        let stub = Arc::new(
            StubTransport::new().with_file("/system/sources.xml", MANIFEST.as_bytes()),
        );
        let resolver = resolver(&stub);

        assert_eq!(resolver.gecko_revision().await.unwrap(), "abc123");
        assert_eq!(stub.pulls(), vec!["/system/sources.xml".to_string()]);
    }

    #[tokio::test]
    async fn test_gecko_falls_back_to_descriptor() {
        let stub = Arc::new(
            StubTransport::new()
                .with_file("/system/b2g/application.ini", b"[App]\nSourceStamp=cafef00d\n"),
        );
        let resolver = resolver(&stub);

        assert_eq!(resolver.gecko_revision().await.unwrap(), "cafef00d");
        assert_eq!(
            stub.pulls(),
            vec![
                "/system/sources.xml".to_string(),
                "/system/b2g/application.ini".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn test_gecko_manifest_without_engine_falls_back() {
        let stub = Arc::new(
            StubTransport::new()
                .with_file(
                    "/system/sources.xml",
                    br#"<manifest><project name="gaia" revision="5566afcb"/></manifest>"#,
                )
                .with_file("/system/b2g/application.ini", b"SourceStamp=deadbeef\n"),
        );
        let resolver = resolver(&stub);

        assert_eq!(resolver.gecko_revision().await.unwrap(), "deadbeef");
    }

    #[tokio::test]
    async fn test_gecko_platform_descriptor_is_last_resort() {
        let stub = Arc::new(
            StubTransport::new()
                .with_file("/system/b2g/platform.ini", b"[Build]\nSourceStamp=20140317\n"),
        );
        let resolver = resolver(&stub);

        assert_eq!(resolver.gecko_revision().await.unwrap(), "20140317");
        assert_eq!(
            stub.pulls(),
            vec![
                "/system/sources.xml".to_string(),
                "/system/b2g/application.ini".to_string(),
                "/system/b2g/platform.ini".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn test_gecko_failure_caches_nothing() {
        let stub = Arc::new(StubTransport::new());
        let cache = Arc::new(RevisionCache::new());
        let resolver = RevisionResolver::builder(stub.clone())
            .cache(cache.clone())
            .build();

        assert!(resolver.gecko_revision().await.is_err());
        assert!(cache.get(RevisionKind::Gecko).is_none());
    }

    #[tokio::test]
    async fn test_gaia_from_primary_location() {
        let stub = Arc::new(StubTransport::new().with_file(
            "/system/b2g/webapps/settings.gaiamobile.org/application.zip",
            &settings_archive("f00dcafe\nauthor <dev@example.org>\n"),
        ));
        let resolver = resolver(&stub);

        assert_eq!(resolver.gaia_revision().await.unwrap(), "f00dcafe");
        assert_eq!(
            stub.pulls(),
            vec!["/system/b2g/webapps/settings.gaiamobile.org/application.zip".to_string()]
        );
    }

    #[tokio::test]
    async fn test_gaia_data_local_fallback() {
        let stub = Arc::new(StubTransport::new().with_file(
            "/data/local/webapps/settings.gaiamobile.org/application.zip",
            &settings_archive("f00dcafe\n"),
        ));
        let resolver = resolver(&stub);

        assert_eq!(resolver.gaia_revision().await.unwrap(), "f00dcafe");
        assert_eq!(
            stub.pulls(),
            vec![
                "/system/b2g/webapps/settings.gaiamobile.org/application.zip".to_string(),
                "/data/local/webapps/settings.gaiamobile.org/application.zip".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn test_gaia_archive_without_marker_fails() {
        let mut zip = zip::ZipWriter::new(Cursor::new(Vec::new()));
        let options = zip::write::FileOptions::default();
        zip.start_file("manifest.webapp", options).unwrap();
        zip.write_all(b"{}").unwrap();
        let archive = zip.finish().unwrap().into_inner();

        let stub = Arc::new(StubTransport::new().with_file(
            "/system/b2g/webapps/settings.gaiamobile.org/application.zip",
            &archive,
        ));
        let resolver = resolver(&stub);

        let err = resolver.gaia_revision().await.unwrap_err();
        assert!(matches!(
            err,
            Error::Extract(ExtractError::EntryNotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_cached_revision_skips_the_device() {
        let stub = Arc::new(
            StubTransport::new().with_file("/system/sources.xml", MANIFEST.as_bytes()),
        );
        let resolver = resolver(&stub);

        assert_eq!(resolver.gecko_revision().await.unwrap(), "abc123");
        let pulls_after_first = stub.pulls().len();

        stub.refuse_further_pulls();
        assert_eq!(resolver.gecko_revision().await.unwrap(), "abc123");
        assert_eq!(stub.pulls().len(), pulls_after_first);
    }

    #[tokio::test]
    async fn test_kinds_resolve_independently() {
        let stub = Arc::new(
            StubTransport::new()
                .with_file("/system/sources.xml", MANIFEST.as_bytes())
                .with_file(
                    "/system/b2g/webapps/settings.gaiamobile.org/application.zip",
                    &settings_archive("f00dcafe\n"),
                ),
        );
        let resolver = resolver(&stub);

        assert_eq!(
            resolver.revision(RevisionKind::Gecko).await.unwrap(),
            "abc123"
        );
        assert_eq!(
            resolver.revision(RevisionKind::Gaia).await.unwrap(),
            "f00dcafe"
        );
    }
}
