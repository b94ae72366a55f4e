use thiserror::Error;

#[derive(Error, Debug)]
pub enum HomeError {
    #[error("Source not found: {0}")]
    NotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("Feed decode error: {0}")]
    Decode(String),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("{0}")]
    Other(String),
}

impl HomeError {
    /// True for the expected "source absent" outcome, which is never logged
    /// above debug level.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            HomeError::NotFound(_) | HomeError::Archive(zip::result::ZipError::FileNotFound)
        )
    }
}

pub type Result<T> = std::result::Result<T, HomeError>;
