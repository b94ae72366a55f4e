use serde::{Deserialize, Serialize};

/// A frequently visited site, as returned by the site-visit collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopSiteEntry {
    pub url: String,
    /// Falls back to `url` in [`TopSiteEntry::new`] and [`TopSiteEntry::with_title_fallback`].
    pub title: String,
    pub thumbnail: Option<Vec<u8>>,
}

impl TopSiteEntry {
    pub fn new(url: impl Into<String>, title: Option<String>, thumbnail: Option<Vec<u8>>) -> Self {
        let url = url.into();
        // Same rule the URL bar uses for untitled pages
        let title = match title {
            Some(t) if !t.is_empty() => t,
            _ => url.clone(),
        };
        Self {
            url,
            title,
            thumbnail,
        }
    }

    /// Re-applies the title rule to an entry built field by field.
    pub fn with_title_fallback(mut self) -> Self {
        if self.title.is_empty() {
            self.title = self.url.clone();
        }
        self
    }

    pub fn has_thumbnail(&self) -> bool {
        self.thumbnail.as_ref().is_some_and(|t| !t.is_empty())
    }
}

/// One recommended add-on row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddonEntry {
    pub name: String,
}

/// A tab restored from the previous session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LastTabEntry {
    pub title: String,
    pub url: String,
    pub favicon: Option<Vec<u8>>,
}
