use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, trace};

use crate::app::{HomeError, Result};
use crate::domain::{AddonEntry, FeedName, LastTabEntry};
use crate::resolver::RawContent;

/// Prefix of browser-internal pages, which never appear as last tabs.
pub const DEFAULT_INTERNAL_PREFIX: &str = "about:";

/// Entries decoded from one file-backed feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decoded {
    Addons(Vec<AddonEntry>),
    LastTabs(Vec<LastTabEntry>),
}

#[derive(Deserialize)]
struct AddonsDocument {
    addons: Vec<Value>,
}

#[derive(Deserialize)]
struct AddonRecord {
    name: String,
}

#[derive(Deserialize)]
struct TabRecord {
    index: i64,
    entries: Vec<Value>,
}

#[derive(Deserialize)]
struct HistoryRecord {
    title: String,
    url: String,
}

/// Decodes the add-ons and session feeds.
///
/// Only a broken top-level structure fails a feed; a malformed record is
/// skipped and decoding carries on with the next one.
#[derive(Debug, Clone)]
pub struct FeedDecoder {
    internal_prefix: String,
}

impl Default for FeedDecoder {
    fn default() -> Self {
        Self::new(DEFAULT_INTERNAL_PREFIX)
    }
}

impl FeedDecoder {
    pub fn new(internal_prefix: impl Into<String>) -> Self {
        Self {
            internal_prefix: internal_prefix.into(),
        }
    }

    pub fn decode(&self, feed: FeedName, raw: &RawContent) -> Result<Decoded> {
        match feed {
            FeedName::RecommendedAddons => self.decode_addons(&raw.text).map(Decoded::Addons),
            FeedName::LastTabs => self.decode_last_tabs(&raw.text).map(Decoded::LastTabs),
            FeedName::TopSites => Err(HomeError::Decode(
                "top sites are queried, not decoded".into(),
            )),
        }
    }

    /// `{"addons": [{"name": ...}, ...]}`
    pub fn decode_addons(&self, text: &str) -> Result<Vec<AddonEntry>> {
        let document: AddonsDocument = serde_json::from_str(text)
            .map_err(|e| HomeError::Decode(format!("add-ons feed: {}", e)))?;

        let addons: Vec<AddonEntry> = document
            .addons
            .into_iter()
            .enumerate()
            .filter_map(|(i, value)| match serde_json::from_value::<AddonRecord>(value) {
                Ok(record) => Some(AddonEntry { name: record.name }),
                Err(e) => {
                    debug!("Skipping add-on record {}: {}", i, e);
                    None
                }
            })
            .collect();

        Ok(addons)
    }

    /// `{"windows": [{"tabs": [{"index": n, "entries": [...]}, ...]}, ...]}`
    ///
    /// Only the first window is read. `index` is 1-based into the tab's own
    /// `entries`.
    pub fn decode_last_tabs(&self, text: &str) -> Result<Vec<LastTabEntry>> {
        let root: Value = serde_json::from_str(text)
            .map_err(|e| HomeError::Decode(format!("session feed: {}", e)))?;

        let tabs = root
            .get("windows")
            .and_then(|w| w.get(0))
            .and_then(|w| w.get("tabs"))
            .and_then(Value::as_array)
            .ok_or_else(|| HomeError::Decode("session feed: missing windows[0].tabs".into()))?;

        let mut entries = Vec::with_capacity(tabs.len());
        for (i, tab) in tabs.iter().enumerate() {
            let Some(record) = self.active_entry(tab) else {
                debug!("Skipping session tab {}", i);
                continue;
            };

            if record.url.starts_with(&self.internal_prefix) {
                trace!("Hiding internal page {}", record.url);
                continue;
            }

            entries.push(LastTabEntry {
                title: record.title,
                url: record.url,
                favicon: None,
            });
        }

        Ok(entries)
    }

    fn active_entry(&self, tab: &Value) -> Option<HistoryRecord> {
        let tab = TabRecord::deserialize(tab).ok()?;
        let position = usize::try_from(tab.index).ok()?.checked_sub(1)?;
        let entry = tab.entries.get(position)?;
        HistoryRecord::deserialize(entry).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::Origin;

    const ADDONS_SAMPLE: &str = r#"{
        "addons": [
            {"name": "Adblock", "version": "1.0"},
            {"version": "2.0"},
            "not an object",
            {"name": 42},
            {"name": "Reader"}
        ]
    }"#;

    const SESSION_SAMPLE: &str = r#"{
        "windows": [{
            "tabs": [
                {"index": 2, "entries": [
                    {"title": "Old", "url": "https://old.example/"},
                    {"title": "Rust", "url": "https://www.rust-lang.org/"}
                ]},
                {"index": 1, "entries": [{"title": "Home", "url": "about:home"}]},
                {"index": 0, "entries": [{"title": "Zero", "url": "https://zero.example/"}]},
                {"index": 3, "entries": [{"title": "Short", "url": "https://short.example/"}]},
                {"entries": [{"title": "No index", "url": "https://noindex.example/"}]},
                {"index": 1, "entries": [{"url": "https://untitled.example/"}]},
                {"index": 1, "entries": [{"title": "Docs", "url": "https://docs.rs/"}]}
            ]
        }]
    }"#;

    #[test]
    fn test_addons_skip_malformed_records() {
        let addons = FeedDecoder::default().decode_addons(ADDONS_SAMPLE).unwrap();
        assert_eq!(
            addons,
            vec![
                AddonEntry { name: "Adblock".into() },
                AddonEntry { name: "Reader".into() },
            ]
        );
    }

    #[test]
    fn test_addons_one_bad_among_valid() {
        let text = r#"{"addons": [{"name": "a"}, {"nom": "b"}, {"name": "c"}, {"name": "d"}]}"#;
        let addons = FeedDecoder::default().decode_addons(text).unwrap();
        assert_eq!(addons.len(), 3);
    }

    #[test]
    fn test_addons_top_level_failures() {
        let decoder = FeedDecoder::default();
        assert!(decoder.decode_addons("not json").is_err());
        assert!(decoder.decode_addons("{}").is_err());
        assert!(decoder.decode_addons(r#"{"addons": {"name": "x"}}"#).is_err());
        assert!(decoder.decode_addons("[]").is_err());
    }

    #[test]
    fn test_addons_empty_array() {
        let addons = FeedDecoder::default().decode_addons(r#"{"addons": []}"#).unwrap();
        assert!(addons.is_empty());
    }

    #[test]
    fn test_last_tabs_resolves_active_entry() {
        let tabs = FeedDecoder::default().decode_last_tabs(SESSION_SAMPLE).unwrap();
        let urls: Vec<_> = tabs.iter().map(|t| t.url.as_str()).collect();
        assert_eq!(urls, vec!["https://www.rust-lang.org/", "https://docs.rs/"]);
        assert_eq!(tabs[0].title, "Rust");
        assert!(tabs.iter().all(|t| t.favicon.is_none()));
    }

    #[test]
    fn test_last_tabs_never_internal() {
        let tabs = FeedDecoder::default().decode_last_tabs(SESSION_SAMPLE).unwrap();
        assert!(tabs.iter().all(|t| !t.url.starts_with("about:")));
    }

    #[test]
    fn test_last_tabs_custom_prefix() {
        let text = r#"{"windows": [{"tabs": [
            {"index": 1, "entries": [{"title": "A", "url": "chrome://settings"}]},
            {"index": 1, "entries": [{"title": "B", "url": "about:blank"}]}
        ]}]}"#;
        let tabs = FeedDecoder::new("chrome://").decode_last_tabs(text).unwrap();
        assert_eq!(tabs.len(), 1);
        assert_eq!(tabs[0].url, "about:blank");
    }

    #[test]
    fn test_last_tabs_missing_path_fails() {
        let decoder = FeedDecoder::default();
        assert!(decoder.decode_last_tabs("{}").is_err());
        assert!(decoder.decode_last_tabs(r#"{"windows": []}"#).is_err());
        assert!(decoder.decode_last_tabs(r#"{"windows": [{}]}"#).is_err());
        assert!(decoder.decode_last_tabs(r#"{"windows": [{"tabs": 3}]}"#).is_err());
    }

    #[test]
    fn test_last_tabs_only_first_window() {
        let text = r#"{"windows": [
            {"tabs": [{"index": 1, "entries": [{"title": "First", "url": "https://first.example/"}]}]},
            {"tabs": [{"index": 1, "entries": [{"title": "Second", "url": "https://second.example/"}]}]}
        ]}"#;
        let tabs = FeedDecoder::default().decode_last_tabs(text).unwrap();
        assert_eq!(tabs.len(), 1);
        assert_eq!(tabs[0].title, "First");
    }

    #[test]
    fn test_decode_dispatches_by_feed() {
        let decoder = FeedDecoder::default();
        let raw = RawContent {
            text: r#"{"addons": [{"name": "x"}]}"#.into(),
            origin: Origin::Fallback,
        };
        assert!(matches!(
            decoder.decode(FeedName::RecommendedAddons, &raw),
            Ok(Decoded::Addons(ref a)) if a.len() == 1
        ));
        assert!(decoder.decode(FeedName::TopSites, &raw).is_err());
        assert!(decoder.decode(FeedName::LastTabs, &raw).is_err());
    }
}
