//! Stable episode identifiers.
//!
//! An episode ID is the SHA-256 digest (lowercase hex) of the first non-empty
//! candidate, in priority order: guid, id, uid, enclosure URL, link, and
//! finally the composite `{title}-{publishedAt}-{audio}`.
//!
//! Distinct episodes that lack guid, id, uid, audio and link, and share title
//! and publish date, get the same ID. That collision is accepted.

use sha2::{Digest, Sha256};

/// Candidate fields for [`episode_id`], highest priority first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EpisodeIdCandidates<'a> {
    pub guid: Option<&'a str>,
    pub id: Option<&'a str>,
    pub uid: Option<&'a str>,
    pub audio: Option<&'a str>,
    pub link: Option<&'a str>,
    pub title: Option<&'a str>,
    pub published_at: Option<i64>,
}

impl EpisodeIdCandidates<'_> {
    /// The value that gets hashed.
    pub fn key(&self) -> String {
        [self.guid, self.id, self.uid, self.audio, self.link]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|v| !v.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| self.composite())
    }

    fn composite(&self) -> String {
        format!(
            "{}-{}-{}",
            self.title.unwrap_or_default().trim(),
            self.published_at.map(|ms| ms.to_string()).unwrap_or_default(),
            self.audio.unwrap_or_default().trim()
        )
    }
}

/// Derives the stable ID for an episode.
///
/// # Examples
///
/// ```
/// use podcast_feed::identity::{episode_id, EpisodeIdCandidates};
///
/// let id = episode_id(&EpisodeIdCandidates {
///     guid: Some("episode-42"),
///     ..Default::default()
/// });
/// assert_eq!(id.len(), 64);
/// ```
pub fn episode_id(candidates: &EpisodeIdCandidates<'_>) -> String {
    hex::encode(Sha256::digest(candidates.key().as_bytes()))
}
