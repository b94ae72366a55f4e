pub mod entry;
pub mod feed;
pub mod orientation;

pub use entry::{AddonEntry, LastTabEntry, TopSiteEntry};
pub use feed::{FeedModel, FeedName, FeedResult, ADDONS_MANAGER_URL};
pub use orientation::{
    compute_config, limit, Orientation, OrientationConfig, TOP_SITES_QUERY_LIMIT,
};
