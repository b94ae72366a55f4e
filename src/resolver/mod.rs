pub mod package;
pub mod profile;

use std::io::Read;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::app::{HomeError, Result};
use crate::domain::FeedName;

pub use package::ZipPackage;
pub use profile::FsProfileStore;

/// Where a feed's text came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// File in the profile directory
    Primary,
    /// Entry in the packaged application archive
    Fallback,
}

/// Raw text of one feed for a single load cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawContent {
    pub text: String,
    pub origin: Origin,
}

/// Read access to the profile (user-data) directory.
pub trait ProfileStore: Send + Sync {
    fn exists(&self, name: &str) -> bool;

    fn open_read(&self, name: &str) -> Result<Box<dyn Read + Send>>;
}

/// Read access to entries of the packaged application archive.
///
/// Implementations must return [`HomeError::NotFound`] for a missing entry
/// and release every handle before returning.
pub trait PackageArchive: Send + Sync {
    fn read_entry(&self, name: &str) -> Result<Vec<u8>>;
}

/// File names backing the file-based feeds.
#[derive(Debug, Clone)]
pub struct FeedFiles {
    pub addons: String,
    pub session: String,
}

impl Default for FeedFiles {
    fn default() -> Self {
        Self {
            addons: "recommended-addons.json".to_string(),
            session: "sessionstore.js".to_string(),
        }
    }
}

/// Locates a feed's text: profile directory first, then the packaged archive.
///
/// Never fails: every I/O problem is logged and the feed resolves to `None`.
pub struct SourceResolver {
    profile: Arc<dyn ProfileStore>,
    package: Option<Arc<dyn PackageArchive>>,
    files: FeedFiles,
}

impl SourceResolver {
    pub fn new(
        profile: Arc<dyn ProfileStore>,
        package: Option<Arc<dyn PackageArchive>>,
        files: FeedFiles,
    ) -> Self {
        Self {
            profile,
            package,
            files,
        }
    }

    pub fn resolve(&self, feed: FeedName) -> Option<RawContent> {
        match feed {
            // Top sites come from the site-visit query, not from a file
            FeedName::TopSites => None,
            FeedName::RecommendedAddons => {
                let name = &self.files.addons;
                self.read_primary(name).or_else(|| self.read_fallback(name))
            }
            // There is no packaged default session
            FeedName::LastTabs => self.read_primary(&self.files.session),
        }
    }

    fn read_primary(&self, name: &str) -> Option<RawContent> {
        if !self.profile.exists(name) {
            debug!("{} not present in profile", name);
            return None;
        }

        let text = self.profile.open_read(name).and_then(read_text);

        match text {
            Ok(text) => Some(RawContent {
                text,
                origin: Origin::Primary,
            }),
            Err(e) => {
                warn!("Failed to read profile file {}: {}", name, e);
                None
            }
        }
    }

    fn read_fallback(&self, name: &str) -> Option<RawContent> {
        let package = self.package.as_ref()?;

        match package.read_entry(name) {
            Ok(bytes) => Some(RawContent {
                text: String::from_utf8_lossy(&bytes).into_owned(),
                origin: Origin::Fallback,
            }),
            Err(e) if e.is_not_found() => {
                debug!("{} not present in package", name);
                None
            }
            Err(e) => {
                warn!("Failed to read {} from package: {}", name, e);
                None
            }
        }
    }
}

/// Reads the whole stream; the stream is dropped on every path.
fn read_text(mut stream: Box<dyn Read + Send>) -> Result<String> {
    let mut bytes = Vec::new();
    stream.read_to_end(&mut bytes).map_err(HomeError::Io)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
