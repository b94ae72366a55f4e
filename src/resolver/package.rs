use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use zip::result::ZipError;
use zip::ZipArchive;

use crate::app::{HomeError, Result};
use crate::resolver::PackageArchive;

/// Packaged application archive (a zip file).
///
/// The archive is opened per lookup and closed before returning.
pub struct ZipPackage {
    path: PathBuf,
}

impl ZipPackage {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

}

impl PackageArchive for ZipPackage {
    fn read_entry(&self, name: &str) -> Result<Vec<u8>> {
        let file = File::open(&self.path)?;
        let mut archive = ZipArchive::new(file)?;

        let mut entry = match archive.by_name(name) {
            Ok(entry) => entry,
            Err(ZipError::FileNotFound) => return Err(HomeError::NotFound(name.to_string())),
            Err(e) => return Err(e.into()),
        };

        // The header's size is untrusted, so no capacity hint
        let mut bytes = Vec::new();
        entry.read_to_end(&mut bytes)?;
        Ok(bytes)
    }
}
