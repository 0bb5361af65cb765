//! Fixed device-side layout of a B2G image.
//!
//! Revision markers move around between build configurations, so most
//! lookups are driven by ordered candidate lists rather than single paths.
//! The constants here are the layout every stock image ships with;
//! [`DeviceLayout`] lets the roots be overridden for unusual images.

/// System partition root.
pub const SYSTEM_ROOT: &str = "/system";

/// B2G (platform) installation root.
pub const B2G_ROOT: &str = "/system/b2g";

/// Webapp root on the data partition, used by engineering builds.
pub const DATA_LOCAL_WEBAPPS: &str = "/data/local/webapps";

/// Settings package directory, relative to a webapp root.
pub const SETTINGS_PACKAGE: &str = "webapps/settings.gaiamobile.org";

/// Settings package name on the data partition (no `webapps/` prefix there).
pub const SETTINGS_PACKAGE_NAME: &str = "settings.gaiamobile.org";

/// Application descriptor filename.
pub const APPLICATION_INI: &str = "application.ini";

/// Platform descriptor filename, the descriptor fallback.
pub const PLATFORM_INI: &str = "platform.ini";

/// Settings application bundle.
pub const SETTINGS_ARCHIVE: &str = "application.zip";

/// Source-control manifest listing projects and revisions.
pub const SOURCES_MANIFEST: &str = "sources.xml";

/// Gaia commit marker inside the settings archive.
pub const GAIA_COMMIT_ENTRY: &str = "resources/gaia_commit.txt";

/// Descriptor key carrying the Gecko source stamp.
pub const SOURCE_STAMP_KEY: &str = "SourceStamp";

/// Manifest element naming one source-control project.
pub const MANIFEST_PROJECT_TAG: &str = "project";

/// Manifest attribute naming the project.
pub const MANIFEST_NAME_ATTR: &str = "name";

/// Manifest attribute carrying the project revision.
pub const MANIFEST_REVISION_ATTR: &str = "revision";

/// Project name of the browser engine in the sources manifest.
pub const GECKO_PROJECT: &str = "gecko";

/// One (remote directory, filename) pair tried during a lookup.
///
/// Ordering across a candidate list encodes priority: the first
/// retrievable candidate wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// Remote directory holding the file.
    pub dir: String,

    /// Filename inside that directory.
    pub filename: String,
}

impl Candidate {
    /// Create a candidate location.
    pub fn new(dir: impl Into<String>, filename: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            filename: filename.into(),
        }
    }

    /// Full remote path of this candidate.
    pub fn remote_path(&self) -> String {
        format!("{}/{}", self.dir.trim_end_matches('/'), self.filename)
    }
}

/// Device-side roots the resolver consults.
#[derive(Debug, Clone)]
pub struct DeviceLayout {
    system_root: String,
    b2g_root: String,
    data_local_webapps: String,
}

impl Default for DeviceLayout {
    fn default() -> Self {
        Self {
            system_root: SYSTEM_ROOT.to_string(),
            b2g_root: B2G_ROOT.to_string(),
            data_local_webapps: DATA_LOCAL_WEBAPPS.to_string(),
        }
    }
}

impl DeviceLayout {
    /// Create the stock layout.
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the system partition root.
    pub fn with_system_root(mut self, root: impl Into<String>) -> Self {
        self.system_root = root.into();
        self
    }

    /// Override the B2G installation root.
    pub fn with_b2g_root(mut self, root: impl Into<String>) -> Self {
        self.b2g_root = root.into();
        self
    }

    /// Override the data-partition webapp root.
    pub fn with_data_local_webapps(mut self, root: impl Into<String>) -> Self {
        self.data_local_webapps = root.into();
        self
    }

    /// Location of the sources manifest.
    pub fn sources_manifest(&self) -> Candidate {
        Candidate::new(&self.system_root, SOURCES_MANIFEST)
    }

    /// Descriptor candidates under the B2G root, in priority order.
    pub fn descriptor_candidates(&self) -> [Candidate; 2] {
        [
            Candidate::new(&self.b2g_root, APPLICATION_INI),
            Candidate::new(&self.b2g_root, PLATFORM_INI),
        ]
    }

    /// Settings archive candidates, in priority order.
    pub fn settings_archive_candidates(&self) -> [Candidate; 2] {
        [
            Candidate::new(
                format!("{}/{}", self.b2g_root, SETTINGS_PACKAGE),
                SETTINGS_ARCHIVE,
            ),
            Candidate::new(
                format!("{}/{}", self.data_local_webapps, SETTINGS_PACKAGE_NAME),
                SETTINGS_ARCHIVE,
            ),
        ]
    }
}
