//! Plain-text derivation from feed HTML.

use std::sync::LazyLock;

use ego_tree::iter::Edge;
use regex::Regex;
use scraper::{Html, Node};

use super::sanitize::DROPPED_WITH_CONTENT;
use super::HTML_TAG;

static SPACE_AROUND_NEWLINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[ \t]*\n[ \t]*").expect("newline whitespace pattern is valid")
});

static BLANK_LINE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n{3,}").expect("blank line pattern is valid"));

/// Newlines written after a closing tag.
fn closer_break(tag: &str) -> Option<&'static str> {
    match tag {
        "p" | "h1" | "h2" | "h3" | "h4" | "h5" | "h6" | "blockquote" | "ul" | "ol" | "table"
        | "pre" => Some("\n\n"),
        "li" | "div" | "tr" | "dt" | "dd" => Some("\n"),
        _ => None,
    }
}

/// Converts feed HTML (or plain text) into plain text.
///
/// Paragraph and heading ends become a blank line, list items and `<br>` a
/// line break; all other markup is dropped. Runs of more than one blank line
/// collapse to one and the result is trimmed.
///
/// ```
/// use podcast_feed::content::to_plain_text;
///
/// assert_eq!(to_plain_text("<p>Hi</p><p>There</p>"), "Hi\n\nThere");
/// ```
pub fn to_plain_text(raw: &str) -> String {
    let decoded = html_escape::decode_html_entities(raw);
    let fragment = Html::parse_fragment(&decoded);

    let mut out = String::with_capacity(decoded.len());
    let mut skip_depth = 0usize;
    for edge in fragment.root_element().traverse() {
        match edge {
            Edge::Open(node) => match node.value() {
                Node::Element(el) if skip_depth > 0 || DROPPED_WITH_CONTENT.contains(&el.name()) => {
                    skip_depth += 1;
                }
                Node::Element(el) if el.name() == "br" => out.push('\n'),
                Node::Text(text) if skip_depth == 0 => out.push_str(text),
                _ => {}
            },
            Edge::Close(node) => {
                if let Node::Element(el) = node.value() {
                    if skip_depth > 0 {
                        skip_depth -= 1;
                    } else if let Some(newlines) = closer_break(el.name()) {
                        out.push_str(newlines);
                    }
                }
            }
        }
    }

    // Double-encoded markup survives as literal tags after the second decode
    let out = HTML_TAG.replace_all(&out, "");
    normalize_lines(&out)
}

fn normalize_lines(text: &str) -> String {
    let text = text.replace("\r\n", "\n").replace('\r', "\n");
    let text = SPACE_AROUND_NEWLINE.replace_all(&text, "\n");
    BLANK_LINE_RUN
        .replace_all(&text, "\n\n")
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paragraphs_become_blank_lines() {
        assert_eq!(to_plain_text("<p>Hi</p><p>There</p>"), "Hi\n\nThere");
        assert_eq!(to_plain_text("<p>Hi</p>\n\n\n<p>There</p>\n"), "Hi\n\nThere");
    }

    #[test]
    fn test_breaks_and_list_items() {
        assert_eq!(
            to_plain_text("<p>One<br>Two</p><ul><li>A</li><li>B</li></ul><h2>End</h2>"),
            "One\nTwo\n\nA\nB\n\nEnd"
        );
    }

    #[test]
    fn test_markup_and_scripts_removed() {
        assert_eq!(
            to_plain_text(r#"<p><b>Bold</b> and <a href="https://x.example">link</a><script>x()</script></p>"#),
            "Bold and link"
        );
    }

    #[test]
    fn test_entities_decoded() {
        assert_eq!(to_plain_text("Tom &amp; Jerry&#8217;s"), "Tom & Jerry\u{2019}s");
        assert_eq!(to_plain_text("a &lt; b"), "a < b");
    }

    #[test]
    fn test_double_encoded_markup_removed() {
        assert_eq!(to_plain_text("&amp;lt;b&amp;gt;x&amp;lt;/b&amp;gt;"), "x");
        assert_eq!(
            to_plain_text("&lt;p&gt;&amp;lt;i&amp;gt;Hi&amp;lt;/i&amp;gt;&lt;/p&gt;"),
            "Hi"
        );
    }

    #[test]
    fn test_plain_text_line_structure_kept() {
        assert_eq!(
            to_plain_text("Line one\r\nLine two\r\n\r\n\r\n\r\nNext   \n  paragraph"),
            "Line one\nLine two\n\nNext\nparagraph"
        );
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(to_plain_text(""), "");
        assert_eq!(to_plain_text("<p> </p><br>"), "");
    }
}
