//! # homefeeds
//!
//! Content aggregation behind a browser start page.
//!
//! ## Architecture
//!
//! Three independent feeds are loaded concurrently and published one by one
//! to the presentation layer:
//!
//! ```text
//! top sites:   SiteVisits query ─────────────→ limit ─┐
//! add-ons:     SourceResolver → FeedDecoder ──────────┼─→ Presenter → PresentationSink
//! last tabs:   SourceResolver → FeedDecoder → Favicons┘
//! ```
//!
//! - [`resolver`]: profile directory first, packaged archive second
//! - [`decoder`]: tolerant JSON decoding, bad records are skipped
//! - [`aggregator`]: worker pipelines, generation token, presenter
//!
//! ## Quick Start
//!
//! ```bash
//! # Print all feeds of a profile
//! homefeeds --profile ~/.browser/profile --package /opt/browser/app.zip show
//!
//! # Show how top sites re-flow when the device rotates
//! homefeeds --history places.sqlite rotate
//! ```

/// Application context and error handling.
///
/// [`AppContext`](app::AppContext) builds the collaborators named in the
/// configuration and hands them to the aggregator explicitly.
pub mod app;

/// Concurrent feed loading and presentation-side dispatch.
///
/// - [`ContentAggregator`](aggregator::ContentAggregator): starts load cycles, handles rotation
/// - [`Presenter`](aggregator::Presenter): drains results onto the presentation side
/// - [`PresentationSink`](aggregator::PresentationSink): implemented by the display layer
pub mod aggregator;

/// Command-line interface using clap.
pub mod cli;

/// Configuration loaded from `~/.config/homefeeds/config.toml`.
pub mod config;

/// Decoding of the add-ons and session feeds.
pub mod decoder;

/// Core domain models: feeds, entries, orientation policy.
pub mod domain;

/// Locating feed text in the profile directory or the packaged archive.
pub mod resolver;

/// Site-visit and favicon collaborators.
///
/// - [`SiteVisits`](store::SiteVisits) / [`Favicons`](store::Favicons): async traits
/// - [`SqliteHistory`](store::SqliteHistory): read-only SQLite implementation
pub mod store;
