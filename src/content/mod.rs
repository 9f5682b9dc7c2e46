//! Description normalization.
//!
//! Feed descriptions arrive as HTML, entity-encoded HTML, or plain text. This
//! module turns them into:
//! - sanitized HTML ([`to_sanitized_html`]),
//! - plain text ([`to_plain_text`]),
//! - HTML synthesized from plain text ([`synthesize_html`]),
//!
//! with timestamps wrapped in seekable markers ([`highlight_timestamps`]).

mod plain_text;
mod sanitize;
mod synthesize;
mod timestamps;

use std::sync::LazyLock;

use regex::Regex;

pub use plain_text::to_plain_text;
pub use sanitize::to_sanitized_html;
pub use synthesize::synthesize_html;
pub use timestamps::{highlight_timestamps, highlight_timestamps_in_text};

static HTML_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"</?[a-zA-Z][a-zA-Z0-9]*(?:\s[^>]*)?/?>").expect("html tag pattern is valid")
});

/// Whether a description holds markup (after entity decoding) or plain text.
pub fn looks_like_html(raw: &str) -> bool {
    HTML_TAG.is_match(&html_escape::decode_html_entities(raw))
}

fn render(raw: &str) -> String {
    if looks_like_html(raw) {
        highlight_timestamps(&to_sanitized_html(raw))
    } else {
        synthesize_html(&html_escape::decode_html_entities(raw))
    }
}

/// Builds the HTML description of a podcast or episode.
///
/// The HTML source is sanitized when it holds markup and synthesized into
/// paragraphs when it is plain text. If it is missing or sanitizes to nothing,
/// the plain-text fallback is used the same way. Timestamps are highlighted in
/// either case.
///
/// ```
/// use podcast_feed::content::build_description_html;
///
/// assert_eq!(
///     build_description_html(None, Some("Starts at 2:15")),
///     r#"<p>Starts at <span class="timestamp" data-timestamp="2:15">2:15</span></p>"#
/// );
/// ```
pub fn build_description_html(html: Option<&str>, fallback_text: Option<&str>) -> String {
    [html, fallback_text]
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|raw| !raw.is_empty())
        .map(render)
        .find(|rendered| !rendered.is_empty())
        .unwrap_or_default()
}
