pub mod sqlite;

use async_trait::async_trait;

use crate::app::Result;
use crate::domain::TopSiteEntry;

pub use sqlite::SqliteHistory;

/// Site-visit database: most visited sites, best first.
#[async_trait]
pub trait SiteVisits: Send + Sync {
    async fn top_sites(&self, limit: usize) -> Result<Vec<TopSiteEntry>>;
}

/// Favicon lookup by page URL.
#[async_trait]
pub trait Favicons: Send + Sync {
    async fn favicon_for(&self, url: &str) -> Result<Option<Vec<u8>>>;
}

/// Stand-in when no history database is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyHistory;

#[async_trait]
impl SiteVisits for EmptyHistory {
    async fn top_sites(&self, _limit: usize) -> Result<Vec<TopSiteEntry>> {
        Ok(Vec::new())
    }
}

#[async_trait]
impl Favicons for EmptyHistory {
    async fn favicon_for(&self, _url: &str) -> Result<Option<Vec<u8>>> {
        Ok(None)
    }
}
