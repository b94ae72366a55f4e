use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use crate::app::{HomeError, Result};
use crate::resolver::ProfileStore;

/// Profile store backed by a directory on disk.
///
/// A store without a directory behaves as if every file were missing.
pub struct FsProfileStore {
    dir: Option<PathBuf>,
}

impl FsProfileStore {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: Some(dir.as_ref().to_path_buf()),
        }
    }

    pub fn unavailable() -> Self {
        Self { dir: None }
    }

    fn path_for(&self, name: &str) -> Option<PathBuf> {
        // Only plain file names live in the profile root
        if name.is_empty() || name.contains(['/', '\\']) || name == ".." {
            return None;
        }
        self.dir.as_ref().map(|d| d.join(name))
    }
}

impl ProfileStore for FsProfileStore {
    fn exists(&self, name: &str) -> bool {
        self.path_for(name).is_some_and(|p| p.is_file())
    }

    fn open_read(&self, name: &str) -> Result<Box<dyn Read + Send>> {
        let path = self
            .path_for(name)
            .ok_or_else(|| HomeError::NotFound(name.to_string()))?;
        let file = File::open(path)?;
        Ok(Box::new(file))
    }
}
