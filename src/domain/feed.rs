use std::fmt;

use serde::{Deserialize, Serialize};

use super::entry::{AddonEntry, LastTabEntry, TopSiteEntry};
use super::orientation::OrientationConfig;

/// Target of the "all add-ons" link shown under the add-ons section.
pub const ADDONS_MANAGER_URL: &str = "about:addons";

/// The three independent feeds shown on the start page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FeedName {
    TopSites,
    RecommendedAddons,
    LastTabs,
}

impl FeedName {
    pub const ALL: [FeedName; 3] = [
        FeedName::TopSites,
        FeedName::RecommendedAddons,
        FeedName::LastTabs,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FeedName::TopSites => "top-sites",
            FeedName::RecommendedAddons => "recommended-addons",
            FeedName::LastTabs => "last-tabs",
        }
    }
}

impl fmt::Display for FeedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of one feed pipeline.
///
/// `truncated_to` is only ever set for top sites, when the orientation
/// capacity hid part of the fetched sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedResult<T> {
    pub entries: Vec<T>,
    pub truncated_to: Option<usize>,
}

impl<T> FeedResult<T> {
    pub fn new(entries: Vec<T>) -> Self {
        Self {
            entries,
            truncated_to: None,
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<T> Default for FeedResult<T> {
    fn default() -> Self {
        Self::empty()
    }
}

impl FeedResult<LastTabEntry> {
    /// The "last tabs" header is only shown when there is at least one row.
    pub fn shows_section(&self) -> bool {
        !self.entries.is_empty()
    }

    /// URLs for the "open all" link, offered only for two or more tabs.
    pub fn open_all_urls(&self) -> Option<Vec<&str>> {
        if self.entries.len() < 2 {
            return None;
        }
        Some(self.entries.iter().map(|e| e.url.as_str()).collect())
    }
}

/// Display model handed to the presentation layer, one per feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedModel {
    TopSites {
        result: FeedResult<TopSiteEntry>,
        layout: OrientationConfig,
    },
    RecommendedAddons(FeedResult<AddonEntry>),
    LastTabs(FeedResult<LastTabEntry>),
}

impl FeedModel {
    pub fn feed(&self) -> FeedName {
        match self {
            FeedModel::TopSites { .. } => FeedName::TopSites,
            FeedModel::RecommendedAddons(_) => FeedName::RecommendedAddons,
            FeedModel::LastTabs(_) => FeedName::LastTabs,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            FeedModel::TopSites { result, .. } => result.len(),
            FeedModel::RecommendedAddons(result) => result.len(),
            FeedModel::LastTabs(result) => result.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
