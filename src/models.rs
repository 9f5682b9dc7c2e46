//! Normalized podcast and episode entities.
//!
//! These are the payloads handed back to callers. Text fields never carry
//! markup; `*_html` fields carry sanitized HTML only.

use serde::{Deserialize, Serialize};

/// Channel-level podcast metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Podcast {
    pub name: String,
    pub author: String,
    pub image: String,
    pub website: String,
    /// The feed URL the podcast was loaded from
    pub rss: String,
    pub description_html: String,
    pub description_text: String,
}

impl Podcast {
    /// True when the feed yielded nothing worth caching.
    pub fn is_empty(&self) -> bool {
        self.name.is_empty() && self.description_text.is_empty()
    }
}

/// One feed item.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Episode {
    /// Stable content-addressed ID (see [`crate::identity`])
    pub id: String,
    pub title: String,
    pub author: String,
    /// Publish time in epoch milliseconds
    pub published_at: Option<i64>,
    /// Duration as written in the feed (`1:02:03`, `3723`, ...)
    pub duration: String,
    /// Enclosure URL
    pub audio: String,
    pub image: String,
    pub description_html: String,
    pub description_text: String,
    /// Link if present, otherwise the audio URL
    pub url: String,
    pub link: String,
    pub guid: String,
}

/// One page of episodes plus the pagination cursor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EpisodesPage {
    /// Number of items in the whole feed
    pub total: usize,
    pub episodes: Vec<Episode>,
    pub has_more: bool,
    pub next_cursor: Option<usize>,
}

impl EpisodesPage {
    /// Builds a page, deriving `has_more` and `next_cursor` from the slice.
    pub fn new(offset: usize, total: usize, episodes: Vec<Episode>) -> Self {
        let end = offset.saturating_add(episodes.len());
        let has_more = end < total;
        Self {
            total,
            episodes,
            has_more,
            next_cursor: has_more.then_some(end),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_cursor() {
        let page = EpisodesPage::new(0, 3, vec![Episode::default(), Episode::default()]);
        assert!(page.has_more);
        assert_eq!(page.next_cursor, Some(2));

        let page = EpisodesPage::new(2, 3, vec![Episode::default()]);
        assert!(!page.has_more);
        assert_eq!(page.next_cursor, None);

        let page = EpisodesPage::new(10, 3, Vec::new());
        assert!(!page.has_more);
        assert_eq!(page.next_cursor, None);
    }

    #[test]
    fn test_serializes_camel_case() {
        let episode = Episode {
            published_at: Some(1),
            description_html: "<p>x</p>".to_string(),
            ..Episode::default()
        };
        let json = serde_json::to_value(&episode).unwrap();
        assert_eq!(json["publishedAt"], 1);
        assert_eq!(json["descriptionHtml"], "<p>x</p>");
        assert!(json.get("published_at").is_none());

        let page = EpisodesPage::new(0, 1, vec![episode]);
        let json = serde_json::to_value(&page).unwrap();
        assert_eq!(json["hasMore"], false);
        assert!(json["nextCursor"].is_null());
        assert_eq!(json["total"], 1);
    }
}
