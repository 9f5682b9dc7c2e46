//! Allow-list HTML sanitizer.
//!
//! Input is entity-decoded, parsed as an HTML fragment with `scraper`, and
//! re-serialized by walking the tree. Only allow-listed tags and attributes are
//! written; text and attribute values are re-escaped on the way out.

use std::borrow::Cow;
use std::sync::LazyLock;

use ego_tree::iter::Edge;
use regex::Regex;
use scraper::node::Element;
use scraper::{Html, Node};
use url::Url;

/// Tags written to the output. Anything else is unwrapped (its children kept).
const ALLOWED_TAGS: &[&str] = &[
    "p", "br", "hr", "div", "span", "blockquote", "pre", "code", "h1", "h2", "h3", "h4", "h5",
    "h6", "ul", "ol", "li", "dl", "dt", "dd", "table", "thead", "tbody", "tfoot", "tr", "th",
    "td", "caption", "a", "img", "audio", "video", "source", "figure", "figcaption", "strong",
    "b", "em", "i", "u", "s", "sub", "sup", "small", "mark", "del", "ins", "abbr", "cite", "q",
];

/// Tags removed together with everything inside them.
pub(crate) const DROPPED_WITH_CONTENT: &[&str] = &[
    "script", "style", "iframe", "object", "embed", "noscript", "template", "svg", "math",
    "title", "head",
];

const VOID_TAGS: &[&str] = &["br", "hr", "img", "source"];

/// Tags stripped when they end up holding nothing but whitespace or `<br>`.
const STRIPPABLE_WHEN_EMPTY: &[&str] = &[
    "p", "div", "span", "blockquote", "pre", "code", "h1", "h2", "h3", "h4", "h5", "h6", "ul",
    "ol", "li", "a", "strong", "b", "em", "i", "u", "s", "small", "mark", "figure",
    "figcaption", "q", "cite",
];

const LINK_SCHEMES: &[&str] = &["http", "https", "mailto"];
const MEDIA_SCHEMES: &[&str] = &["http", "https"];
const URL_ATTRIBUTES: &[&str] = &["href", "src", "poster"];

static EMPTY_TAG: LazyLock<Regex> = LazyLock::new(|| {
    let alternatives: Vec<String> = STRIPPABLE_WHEN_EMPTY
        .iter()
        .map(|tag| format!(r"<{tag}(?:\s[^>]*)?>(?:\s|&nbsp;|&#160;|<br\s*/?>)*</{tag}>"))
        .collect();
    Regex::new(&alternatives.join("|")).expect("empty tag pattern is valid")
});

static BREAK_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:<br>\s*){2,}").expect("break run pattern is valid"));

fn allowed_attributes(tag: &str) -> &'static [&'static str] {
    match tag {
        "a" => &["href", "title"],
        "img" => &["src", "alt", "title", "width", "height"],
        "audio" => &["src", "controls", "preload"],
        "video" => &["src", "controls", "poster", "width", "height", "preload"],
        "source" => &["src", "type"],
        "td" | "th" => &["colspan", "rowspan"],
        "ol" => &["start"],
        "abbr" | "q" => &["title", "cite"],
        _ => &[],
    }
}

fn is_safe_url(value: &str, schemes: &[&str]) -> bool {
    Url::parse(value.trim()).is_ok_and(|url| schemes.contains(&url.scheme()))
}

fn schemes_for(tag: &str) -> &'static [&'static str] {
    if tag == "a" {
        LINK_SCHEMES
    } else {
        MEDIA_SCHEMES
    }
}

/// Whether an element is written out at all.
///
/// Anchors without a safe `href` are unwrapped, images and sources without a
/// safe `src` are dropped (they have no content to keep).
fn keeps_element(el: &Element) -> bool {
    let name = el.name();
    if !ALLOWED_TAGS.contains(&name) {
        return false;
    }
    match name {
        "a" => el
            .attr("href")
            .is_some_and(|href| is_safe_url(href, LINK_SCHEMES)),
        "img" | "source" => el
            .attr("src")
            .is_some_and(|src| is_safe_url(src, MEDIA_SCHEMES)),
        _ => true,
    }
}

fn write_open_tag(out: &mut String, el: &Element) {
    let name = el.name();
    out.push('<');
    out.push_str(name);
    for &attr in allowed_attributes(name) {
        let Some(value) = el.attr(attr) else {
            continue;
        };
        if URL_ATTRIBUTES.contains(&attr) && !is_safe_url(value, schemes_for(name)) {
            continue;
        }
        out.push(' ');
        out.push_str(attr);
        out.push_str("=\"");
        out.push_str(&html_escape::encode_double_quoted_attribute(value.trim()));
        out.push('"');
    }
    if name == "a" {
        out.push_str(r#" target="_blank" rel="noopener noreferrer""#);
    }
    out.push('>');
}

/// Sanitizes feed-supplied HTML.
///
/// # Examples
///
/// ```
/// use podcast_feed::content::to_sanitized_html;
///
/// let html = to_sanitized_html(r#"<p>Hi<script>alert(1)</script> <a href="https://x.example">x</a></p>"#);
/// assert_eq!(
///     html,
///     r#"<p>Hi <a href="https://x.example" target="_blank" rel="noopener noreferrer">x</a></p>"#
/// );
/// ```
pub fn to_sanitized_html(raw: &str) -> String {
    let decoded = html_escape::decode_html_entities(raw);
    let fragment = Html::parse_fragment(&decoded);

    let mut out = String::with_capacity(decoded.len());
    let mut skip_depth = 0usize;
    for edge in fragment.root_element().traverse() {
        match edge {
            Edge::Open(node) => match node.value() {
                Node::Element(el) => {
                    if skip_depth > 0 || DROPPED_WITH_CONTENT.contains(&el.name()) {
                        skip_depth += 1;
                    } else if keeps_element(el) {
                        write_open_tag(&mut out, el);
                    }
                }
                Node::Text(text) if skip_depth == 0 => {
                    out.push_str(&html_escape::encode_text(&**text));
                }
                _ => {}
            },
            Edge::Close(node) => {
                if let Node::Element(el) = node.value() {
                    if skip_depth > 0 {
                        skip_depth -= 1;
                    } else if keeps_element(el) && !VOID_TAGS.contains(&el.name()) {
                        out.push_str("</");
                        out.push_str(el.name());
                        out.push('>');
                    }
                }
            }
        }
    }

    strip_empty_tags(out)
}

/// Removes empty containers until none are left, then collapses `<br>` runs.
fn strip_empty_tags(mut html: String) -> String {
    loop {
        match EMPTY_TAG.replace_all(&html, "") {
            Cow::Borrowed(_) => break,
            Cow::Owned(next) => html = next,
        }
    }
    BREAK_RUN.replace_all(&html, "<br>").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_script_removed_with_content() {
        let html = to_sanitized_html("<p>Before<script>alert('x')</script>After</p>");
        assert_eq!(html, "<p>BeforeAfter</p>");
        assert!(!html.contains("alert"));
    }

    #[test]
    fn test_javascript_link_unwrapped() {
        let html = to_sanitized_html(r#"<p><a href="javascript:x">click</a></p>"#);
        assert_eq!(html, "<p>click</p>");

        let html = to_sanitized_html(r#"<a href=" JaVaScRiPt:alert(1)">x</a>"#);
        assert_eq!(html, "x");
    }

    #[test]
    fn test_anchor_attributes_forced() {
        let html = to_sanitized_html(
            r#"<a href="https://example.com/" target="_self" rel="opener" onclick="evil()">go</a>"#,
        );
        assert_eq!(
            html,
            r#"<a href="https://example.com/" target="_blank" rel="noopener noreferrer">go</a>"#
        );
    }

    #[test]
    fn test_mailto_allowed() {
        let html = to_sanitized_html(r#"<a href="mailto:host@example.com">mail</a>"#);
        assert!(html.starts_with(r#"<a href="mailto:host@example.com""#));
    }

    #[test]
    fn test_unknown_tags_unwrapped_and_attributes_filtered() {
        let html = to_sanitized_html(
            r#"<section><p style="color:red" class="x">Text <font>here</font></p></section>"#,
        );
        assert_eq!(html, "<p>Text here</p>");
    }

    #[test]
    fn test_image_source_checked() {
        assert_eq!(
            to_sanitized_html(r#"<img src="https://cdn.example.com/a.png" alt="A" onerror="x()">"#),
            r#"<img src="https://cdn.example.com/a.png" alt="A">"#
        );
        assert_eq!(to_sanitized_html(r#"<p>x<img src="data:image/png;base64,AAAA"></p>"#), "<p>x</p>");
    }

    #[test]
    fn test_entity_encoded_markup_is_decoded_then_sanitized() {
        let html = to_sanitized_html("&lt;p&gt;Tom &amp;amp; Jerry&lt;/p&gt;&lt;script&gt;bad()&lt;/script&gt;");
        assert_eq!(html, "<p>Tom &amp; Jerry</p>");
    }

    #[test]
    fn test_nested_empty_tags_stripped() {
        let html = to_sanitized_html(
            "<p>Keep</p><div><p> <span>&nbsp;</span> </p><p><br></p></div><p><iframe src=\"https://x\"></iframe></p>",
        );
        assert_eq!(html, "<p>Keep</p>");
    }

    #[test]
    fn test_break_runs_collapse() {
        let html = to_sanitized_html("<p>One<br><br><br/>\n<br>Two</p>");
        assert_eq!(html, "<p>One<br>Two</p>");
    }

    #[test]
    fn test_text_is_escaped() {
        let html = to_sanitized_html("<p>1 &lt; 2</p>");
        // The first decode turns `&lt;` into `<`, which the HTML parser keeps as text
        assert_eq!(html, "<p>1 &lt; 2</p>");
    }
}
