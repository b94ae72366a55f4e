//! Concurrent loading of the three start-page feeds.
//!
//! ```text
//! load() ─┬─ top sites query ────────────────┐
//!         ├─ resolve → decode (add-ons) ─────┼─→ channel ─→ Presenter ─→ PresentationSink
//!         └─ resolve → decode → favicons ────┘
//! ```
//!
//! Each pipeline publishes on its own as soon as it finishes. Every load and
//! teardown bumps a generation counter; results carrying an older generation
//! are dropped, both by the worker and again by the presenter.

mod presenter;

pub use presenter::{PresentationSink, Presenter, Publication};

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use futures::future::join_all;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::decoder::{Decoded, FeedDecoder};
use crate::domain::{
    compute_config, limit, FeedModel, FeedName, FeedResult, LastTabEntry, Orientation,
    OrientationConfig, TopSiteEntry, TOP_SITES_QUERY_LIMIT,
};
use crate::resolver::SourceResolver;
use crate::store::{Favicons, SiteVisits};

/// Collaborators a load cycle reads from.
#[derive(Clone)]
pub struct FeedSources {
    pub resolver: Arc<SourceResolver>,
    pub decoder: Arc<FeedDecoder>,
    pub site_visits: Arc<dyn SiteVisits>,
    pub favicons: Arc<dyn Favicons>,
}

/// Top sites fetched by the current cycle, kept so a rotation can re-limit
/// them without another query.
struct HeldTopSites {
    generation: u64,
    entries: Vec<TopSiteEntry>,
}

type HeldSlot = Arc<Mutex<Option<HeldTopSites>>>;

#[derive(Clone)]
struct Publisher {
    generation: Arc<AtomicU64>,
    tx: mpsc::UnboundedSender<Publication>,
}

impl Publisher {
    fn is_current(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == generation
    }

    fn send(&self, generation: u64, model: FeedModel) -> bool {
        let feed = model.feed();
        if !self.is_current(generation) {
            debug!("Abandoning stale {} from generation {}", feed, generation);
            return false;
        }
        if self.tx.send(Publication { generation, model }).is_err() {
            debug!("Presenter gone, {} not published", feed);
            return false;
        }
        true
    }
}

/// Handle on the workers spawned by one [`ContentAggregator::load`].
pub struct LoadCycle {
    generation: u64,
    handles: Vec<JoinHandle<()>>,
}

impl LoadCycle {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Wait for every pipeline of this cycle to finish (or be abandoned).
    pub async fn finished(self) {
        for result in join_all(self.handles).await {
            if let Err(e) = result {
                error!("Feed pipeline task failed: {}", e);
            }
        }
    }
}

/// Loads the start-page feeds and keeps the top-sites layout in step with
/// the device orientation.
pub struct ContentAggregator {
    sources: FeedSources,
    layout: watch::Sender<OrientationConfig>,
    held: HeldSlot,
    publisher: Publisher,
}

impl ContentAggregator {
    /// Create an aggregator together with the presenter that owns `sink`.
    pub fn new<S: PresentationSink>(
        sources: FeedSources,
        orientation: Orientation,
        sink: S,
    ) -> (Self, Presenter<S>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let generation = Arc::new(AtomicU64::new(0));
        let (layout, _) = watch::channel(compute_config(orientation));

        let aggregator = Self {
            sources,
            layout,
            held: Arc::new(Mutex::new(None)),
            publisher: Publisher {
                generation: generation.clone(),
                tx,
            },
        };
        let presenter = Presenter::new(rx, generation, sink);

        (aggregator, presenter)
    }

    pub fn generation(&self) -> u64 {
        self.publisher.generation.load(Ordering::SeqCst)
    }

    /// Current top-sites layout; safe to read at any time.
    pub fn current_config(&self) -> OrientationConfig {
        *self.layout.borrow()
    }

    /// Start a fresh load cycle. Must be called inside a tokio runtime.
    ///
    /// Results of any earlier cycle still in flight are discarded.
    pub fn load(&self) -> LoadCycle {
        let generation = self.publisher.generation.fetch_add(1, Ordering::SeqCst) + 1;
        info!("Starting load cycle {}", generation);

        let mut handles = Vec::with_capacity(FeedName::ALL.len());

        handles.push(tokio::spawn(load_top_sites(
            self.sources.site_visits.clone(),
            self.publisher.clone(),
            self.held.clone(),
            self.layout.subscribe(),
            generation,
        )));

        for feed in [FeedName::RecommendedAddons, FeedName::LastTabs] {
            handles.push(tokio::spawn(load_file_feed(
                self.sources.clone(),
                self.publisher.clone(),
                feed,
                generation,
            )));
        }

        LoadCycle {
            generation,
            handles,
        }
    }

    /// The hosting surface went away: nothing in flight may publish.
    pub fn teardown(&self) {
        let generation = self.publisher.generation.fetch_add(1, Ordering::SeqCst) + 1;
        lock_held(&self.held).take();
        info!("Torn down, generation now {}", generation);
    }

    /// Apply an orientation change and re-publish the already loaded top
    /// sites with the new capacity. Never re-queries or re-resolves.
    pub fn on_orientation_change(&self, orientation: Orientation) -> OrientationConfig {
        let config = compute_config(orientation);
        let previous = self.layout.send_replace(config);
        debug!(
            "Orientation {:?}: capacity {} -> {}, columns {} -> {}",
            orientation, previous.capacity, config.capacity, previous.columns, config.columns
        );
        self.republish_top_sites();
        config
    }

    /// Re-send the held top sites with the current layout, e.g. after the
    /// host re-attached its content view. Returns false when nothing is held
    /// for the current generation.
    pub fn republish_top_sites(&self) -> bool {
        let held = lock_held(&self.held);
        let generation = self.generation();

        let Some(sites) = held.as_ref().filter(|h| h.generation == generation) else {
            debug!("No top sites held for generation {}", generation);
            return false;
        };

        let model = top_sites_model(&sites.entries, self.current_config());
        self.publisher.send(generation, model)
    }
}

fn lock_held(held: &Mutex<Option<HeldTopSites>>) -> MutexGuard<'_, Option<HeldTopSites>> {
    held.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn top_sites_model(entries: &[TopSiteEntry], layout: OrientationConfig) -> FeedModel {
    FeedModel::TopSites {
        result: limit(entries, layout.capacity),
        layout,
    }
}

async fn load_top_sites(
    site_visits: Arc<dyn SiteVisits>,
    publisher: Publisher,
    held: HeldSlot,
    layout: watch::Receiver<OrientationConfig>,
    generation: u64,
) {
    let entries = match site_visits.top_sites(TOP_SITES_QUERY_LIMIT).await {
        Ok(entries) => entries
            .into_iter()
            .map(TopSiteEntry::with_title_fallback)
            .collect(),
        Err(e) => {
            warn!("Top sites query failed: {}", e);
            Vec::new()
        }
    };

    // Store, read the layout and send under one lock so a concurrent
    // rotation cannot be overtaken by an older layout.
    let mut slot = lock_held(&held);
    if !publisher.is_current(generation) {
        debug!("Abandoning top sites from generation {}", generation);
        return;
    }

    let model = top_sites_model(&entries, *layout.borrow());
    *slot = Some(HeldTopSites {
        generation,
        entries,
    });
    publisher.send(generation, model);
}

async fn load_file_feed(
    sources: FeedSources,
    publisher: Publisher,
    feed: FeedName,
    generation: u64,
) {
    let resolver = sources.resolver.clone();
    let decoder = sources.decoder.clone();

    let decoded = tokio::task::spawn_blocking(move || {
        let raw = resolver.resolve(feed)?;
        debug!("Resolved {} from {:?}", feed, raw.origin);
        match decoder.decode(feed, &raw) {
            Ok(decoded) => Some(decoded),
            Err(e) => {
                warn!("Discarding {} feed: {}", feed, e);
                None
            }
        }
    })
    .await
    .unwrap_or_else(|e| {
        error!("{} resolution task failed: {}", feed, e);
        None
    });

    if !publisher.is_current(generation) {
        debug!("Abandoning {} from generation {}", feed, generation);
        return;
    }

    let model = match decoded {
        Some(Decoded::Addons(addons)) => FeedModel::RecommendedAddons(FeedResult::new(addons)),
        Some(Decoded::LastTabs(tabs)) => {
            match attach_favicons(sources.favicons.as_ref(), tabs, &publisher, generation).await {
                Some(rows) => FeedModel::LastTabs(FeedResult::new(rows)),
                None => return,
            }
        }
        None => match feed {
            FeedName::RecommendedAddons => FeedModel::RecommendedAddons(FeedResult::empty()),
            FeedName::LastTabs => FeedModel::LastTabs(FeedResult::empty()),
            FeedName::TopSites => return,
        },
    };

    publisher.send(generation, model);
}

/// Looks up each row's favicon in source order. A failed lookup only loses
/// the icon; a teardown mid-way abandons the rows.
async fn attach_favicons(
    favicons: &dyn Favicons,
    tabs: Vec<LastTabEntry>,
    publisher: &Publisher,
    generation: u64,
) -> Option<Vec<LastTabEntry>> {
    let mut rows = Vec::with_capacity(tabs.len());
    for mut tab in tabs {
        if !publisher.is_current(generation) {
            return None;
        }
        tab.favicon = match favicons.favicon_for(&tab.url).await {
            Ok(favicon) => favicon,
            Err(e) => {
                debug!("No favicon for {}: {}", tab.url, e);
                None
            }
        };
        rows.push(tab);
    }
    Some(rows)
}
