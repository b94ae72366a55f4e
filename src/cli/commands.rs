use crate::aggregator::{ContentAggregator, PresentationSink};
use crate::app::{AppContext, HomeError, Result};
use crate::domain::{FeedModel, FeedName, Orientation, ADDONS_MANAGER_URL};

/// Prints published feeds to stdout.
#[derive(Debug, Default)]
pub struct ConsoleSink {
    pub published: usize,
}

impl PresentationSink for ConsoleSink {
    fn publish(&mut self, feed: FeedName, model: FeedModel) {
        self.published += 1;
        println!("== {} ==", feed);
        if model.is_empty() {
            println!("  (nothing to show)");
        }

        match model {
            FeedModel::TopSites { result, layout } => {
                println!(
                    "  {} columns x {} rows{}",
                    layout.columns,
                    layout.rows(),
                    result
                        .truncated_to
                        .map(|n| format!(", showing first {}", n))
                        .unwrap_or_default()
                );
                for site in &result.entries {
                    let thumb = if site.has_thumbnail() { "" } else { " (no thumbnail)" };
                    println!("  {}  {}{}", site.title, site.url, thumb);
                }
            }
            FeedModel::RecommendedAddons(result) => {
                for addon in &result.entries {
                    println!("  {}", addon.name);
                }
                if !result.is_empty() {
                    println!("  All add-ons: {}", ADDONS_MANAGER_URL);
                }
            }
            FeedModel::LastTabs(result) => {
                for tab in &result.entries {
                    let icon = if tab.favicon.is_some() { "*" } else { " " };
                    println!("  {} {}  {}", icon, tab.title, tab.url);
                }
                if let Some(urls) = result.open_all_urls() {
                    println!("  Open all {} tabs", urls.len());
                }
            }
        }
    }
}

pub async fn show(ctx: &AppContext, landscape: bool) -> Result<()> {
    let (aggregator, presenter) = ctx.aggregator(ConsoleSink::default());
    if landscape {
        aggregator.on_orientation_change(Orientation::Landscape);
    }

    let presenting = tokio::spawn(presenter.run());
    aggregator.load().finished().await;
    drop(aggregator);

    let sink = presenting
        .await
        .map_err(|e| HomeError::Other(format!("presenter task failed: {}", e)))?;
    println!("Published {} feeds", sink.published);
    Ok(())
}

/// Runs the presenter inline so the output shows the rotation in order.
pub async fn rotate(ctx: &AppContext) -> Result<()> {
    let (aggregator, mut presenter) =
        ContentAggregator::new(ctx.sources.clone(), Orientation::Portrait, ConsoleSink::default());

    aggregator.load().finished().await;
    presenter.drain();

    println!("-- rotating to landscape --");
    aggregator.on_orientation_change(Orientation::Landscape);
    presenter.drain();

    println!("Published {} models", presenter.sink().published);
    Ok(())
}
