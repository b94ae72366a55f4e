use serde::{Deserialize, Serialize};

use super::feed::FeedResult;

/// Device orientation as delivered by change notifications.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    #[default]
    Portrait,
    Landscape,
}

/// Top-sites capacity and grid width for one orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrientationConfig {
    pub capacity: usize,
    pub columns: usize,
}

impl OrientationConfig {
    pub const PORTRAIT: OrientationConfig = OrientationConfig {
        capacity: 4,
        columns: 2,
    };

    pub const LANDSCAPE: OrientationConfig = OrientationConfig {
        capacity: 3,
        columns: 3,
    };

    /// Full grid rows, used by the presentation layer to size the grid.
    pub fn rows(&self) -> usize {
        self.capacity / self.columns
    }
}

/// Top sites are always queried with the portrait capacity so that rotating
/// never needs a second query; only the visible count changes.
pub const TOP_SITES_QUERY_LIMIT: usize = OrientationConfig::PORTRAIT.capacity;

pub fn compute_config(orientation: Orientation) -> OrientationConfig {
    match orientation {
        Orientation::Portrait => OrientationConfig::PORTRAIT,
        Orientation::Landscape => OrientationConfig::LANDSCAPE,
    }
}

/// Visible prefix of `entries`, at most `capacity` long.
///
/// The source slice is left untouched; `truncated_to` records the capacity
/// only when entries were actually hidden.
pub fn limit<T: Clone>(entries: &[T], capacity: usize) -> FeedResult<T> {
    if entries.len() <= capacity {
        return FeedResult::new(entries.to_vec());
    }
    FeedResult {
        entries: entries[..capacity].to_vec(),
        truncated_to: Some(capacity),
    }
}
