use std::sync::Arc;

use tracing::warn;

use crate::aggregator::{ContentAggregator, FeedSources, PresentationSink, Presenter};
use crate::config::Config;
use crate::decoder::FeedDecoder;
use crate::domain::Orientation;
use crate::resolver::{FsProfileStore, PackageArchive, ProfileStore, SourceResolver, ZipPackage};
use crate::store::{EmptyHistory, Favicons, SiteVisits, SqliteHistory};

/// Wires the collaborators named in a [`Config`] into feed sources.
pub struct AppContext {
    pub sources: FeedSources,
    pub orientation: Orientation,
}

impl AppContext {
    /// A history database that cannot be opened only costs the top sites;
    /// the file-backed feeds still load.
    pub fn new(config: &Config) -> Self {
        let profile: Arc<dyn ProfileStore> = match config.resolved_profile_dir() {
            Some(dir) => Arc::new(FsProfileStore::new(dir)),
            None => Arc::new(FsProfileStore::unavailable()),
        };

        let package = config
            .package_path
            .as_ref()
            .map(|p| Arc::new(ZipPackage::new(p)) as Arc<dyn PackageArchive>);

        let history = config.history_db.as_ref().and_then(|path| {
            SqliteHistory::open(path)
                .inspect_err(|e| warn!("History database {} unavailable: {}", path.display(), e))
                .ok()
        });
        let (site_visits, favicons): (Arc<dyn SiteVisits>, Arc<dyn Favicons>) = match history {
            Some(history) => {
                let history = Arc::new(history);
                let site_visits: Arc<dyn SiteVisits> = history.clone();
                (site_visits, history as Arc<dyn Favicons>)
            }
            None => (
                Arc::new(EmptyHistory) as Arc<dyn SiteVisits>,
                Arc::new(EmptyHistory) as Arc<dyn Favicons>,
            ),
        };

        let sources = FeedSources {
            resolver: Arc::new(SourceResolver::new(
                profile,
                package,
                config.feeds.files(),
            )),
            decoder: Arc::new(FeedDecoder::new(config.feeds.internal_prefix.clone())),
            site_visits,
            favicons,
        };

        Self {
            sources,
            orientation: config.orientation,
        }
    }

    /// A new aggregator over these sources, presenting into `sink`.
    pub fn aggregator<S: PresentationSink>(&self, sink: S) -> (ContentAggregator, Presenter<S>) {
        ContentAggregator::new(self.sources.clone(), self.orientation, sink)
    }
}
