//! Timestamp highlighting.
//!
//! `H:MM` and `H:MM:SS` mentions are wrapped in a marker element,
//! `<span class="timestamp" data-timestamp="12:34">12:34</span>`, which a
//! player UI can turn into a seek link.

use std::sync::LazyLock;

use regex::{Captures, Regex};

static TIMESTAMP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b\d{1,2}:\d{2}(?::\d{2})?\b").expect("timestamp pattern is valid")
});

static MARKER_CLASS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"class\s*=\s*["'][^"']*\btimestamp\b"#).expect("marker class pattern is valid")
});

const VOID_TAGS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source",
    "track", "wbr",
];

/// Wraps every timestamp in an already-escaped text fragment.
pub fn highlight_timestamps_in_text(text: &str) -> String {
    TIMESTAMP
        .replace_all(text, |caps: &Captures<'_>| {
            let ts = &caps[0];
            format!(r#"<span class="timestamp" data-timestamp="{ts}">{ts}</span>"#)
        })
        .into_owned()
}

/// An open element on the scan stack.
struct OpenTag {
    name: String,
    is_marker: bool,
}

/// Wraps timestamps found in the text of an HTML fragment.
///
/// Tags are copied untouched. Text that already sits inside a timestamp
/// marker is left alone, so running this over its own output changes nothing.
///
/// ```
/// use podcast_feed::content::highlight_timestamps;
///
/// let once = highlight_timestamps("<p>Check 12:34 now</p>");
/// assert_eq!(
///     once,
///     r#"<p>Check <span class="timestamp" data-timestamp="12:34">12:34</span> now</p>"#
/// );
/// assert_eq!(highlight_timestamps(&once), once);
/// ```
pub fn highlight_timestamps(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut stack: Vec<OpenTag> = Vec::new();
    let mut rest = html;

    while !rest.is_empty() {
        match rest.find('<') {
            Some(0) => {
                let end = rest.find('>').map_or(rest.len(), |i| i + 1);
                let tag = &rest[..end];
                track_tag(&mut stack, tag);
                out.push_str(tag);
                rest = &rest[end..];
            }
            Some(start) => {
                push_text(&mut out, &stack, &rest[..start]);
                rest = &rest[start..];
            }
            None => {
                push_text(&mut out, &stack, rest);
                rest = "";
            }
        }
    }
    out
}

fn push_text(out: &mut String, stack: &[OpenTag], text: &str) {
    if stack.iter().any(|open| open.is_marker) {
        out.push_str(text);
    } else {
        out.push_str(&highlight_timestamps_in_text(text));
    }
}

fn tag_name(tag: &str) -> String {
    tag.trim_start_matches(['<', '/'])
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == ':')
        .collect::<String>()
        .to_ascii_lowercase()
}

fn track_tag(stack: &mut Vec<OpenTag>, tag: &str) {
    if tag.starts_with("<!") || tag.starts_with("<?") {
        return;
    }
    let name = tag_name(tag);
    if name.is_empty() {
        return;
    }
    if tag.starts_with("</") {
        if let Some(pos) = stack.iter().rposition(|open| open.name == name) {
            stack.truncate(pos);
        }
        return;
    }
    if tag.ends_with("/>") || VOID_TAGS.contains(&name.as_str()) {
        return;
    }
    let is_marker = name == "span" && MARKER_CLASS.is_match(tag);
    stack.push(OpenTag { name, is_marker });
}
