use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::domain::{FeedModel, FeedName};

/// Receives finished feed models. Implemented by the widget layer.
///
/// Only ever called from the [`Presenter`], never from a worker.
pub trait PresentationSink: Send {
    fn publish(&mut self, feed: FeedName, model: FeedModel);
}

/// A feed model tagged with the load generation that produced it.
#[derive(Debug)]
pub struct Publication {
    pub generation: u64,
    pub model: FeedModel,
}

/// Owns the sink and the receiving end of the publication channel.
///
/// This is the presentation side: run it on the thread or task that owns the
/// display. Publications from a stale generation are dropped here.
pub struct Presenter<S: PresentationSink> {
    rx: mpsc::UnboundedReceiver<Publication>,
    generation: Arc<AtomicU64>,
    sink: S,
}

impl<S: PresentationSink> Presenter<S> {
    pub(crate) fn new(
        rx: mpsc::UnboundedReceiver<Publication>,
        generation: Arc<AtomicU64>,
        sink: S,
    ) -> Self {
        Self {
            rx,
            generation,
            sink,
        }
    }

    /// Dispatch until the aggregator and all of its workers are gone, then
    /// hand the sink back.
    pub async fn run(mut self) -> S {
        while let Some(publication) = self.rx.recv().await {
            self.dispatch(publication);
        }
        debug!("Publication channel closed");
        self.sink
    }

    /// Dispatch whatever is already queued without waiting.
    ///
    /// Returns the number of models handed to the sink.
    pub fn drain(&mut self) -> usize {
        let mut published = 0;
        while let Ok(publication) = self.rx.try_recv() {
            if self.dispatch(publication) {
                published += 1;
            }
        }
        published
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    fn dispatch(&mut self, publication: Publication) -> bool {
        let current = self.generation.load(Ordering::SeqCst);
        let feed = publication.model.feed();

        if publication.generation != current {
            debug!(
                "Dropping {} from generation {} (current {})",
                feed, publication.generation, current
            );
            return false;
        }

        info!("Publishing {} ({} entries)", feed, publication.model.len());
        self.sink.publish(feed, publication.model);
        true
    }
}
