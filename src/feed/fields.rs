//! Ordered field-fallback chains.
//!
//! Feeds spread the same attribute over many tags (`itunes:author`, `author`,
//! `managingEditor`, ...). Each attribute is described as a slice of [`Field`]
//! accessors tried in order; the first one yielding a non-empty value wins.

use super::tree::XmlNode;

/// One way of reading a value out of a feed element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Field {
    /// Text of the first child with this name
    Text(&'static str),
    /// Attribute of the first child with this name
    Attr(&'static str, &'static str),
    /// Text of a grandchild (`image` / `url`)
    Nested(&'static str, &'static str),
    /// Link-like child, resolved with [`to_link`]
    Link(&'static str),
}

impl Field {
    fn read(self, node: &XmlNode) -> Option<String> {
        let value = match self {
            Field::Text(name) => node.child(name).map(|c| c.text().to_string()),
            Field::Attr(name, attr) => node
                .child(name)
                .and_then(|c| c.attr(attr))
                .map(|v| v.trim().to_string()),
            Field::Nested(outer, inner) => node
                .child(outer)
                .and_then(|c| c.child(inner))
                .map(|c| c.text().to_string()),
            Field::Link(name) => first_link(node, name),
        };
        value.filter(|v| !v.is_empty())
    }
}

/// Evaluates a fallback chain, returning the first non-empty value.
pub(crate) fn first_of(node: &XmlNode, chain: &[Field]) -> Option<String> {
    chain.iter().find_map(|field| field.read(node))
}

/// Resolves a link-like element to a URL string.
///
/// Accepts a bare text node, an `href`-bearing element, a `url`-bearing
/// element, or a text-bearing element, in that priority. Returns `None` rather
/// than failing when none of them holds a non-empty value.
pub fn to_link(node: &XmlNode) -> Option<String> {
    let text = node.text();
    if node.attr("href").is_none() && node.attr("url").is_none() && !text.is_empty() {
        return Some(text.to_string());
    }
    [node.attr("href"), node.attr("url"), Some(text)]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|v| !v.is_empty())
        .map(str::to_string)
}

/// First usable link among the children named `name`.
///
/// Atom puts several `link` elements on one entry; enclosures and
/// self-references are passed over in favour of the page link, but are still
/// used when nothing else is present.
fn first_link(node: &XmlNode, name: &str) -> Option<String> {
    let page_link = node
        .children(name)
        .filter(|link| !matches!(link.attr("rel"), Some("enclosure" | "self" | "hub")))
        .find_map(to_link);
    page_link.or_else(|| node.children(name).find_map(to_link))
}

/// URL of the first enclosure of an item.
///
/// Tolerates a single `enclosure` or several (the first wins), Atom
/// `link rel="enclosure"` and, as a last resort, `media:content`.
pub(crate) fn enclosure_url(item: &XmlNode) -> Option<String> {
    let attr = |node: &XmlNode, name: &str| {
        node.attr(name)
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    };

    item.children("enclosure")
        .find_map(|e| attr(e, "url"))
        .or_else(|| {
            item.children("link")
                .filter(|l| l.attr("rel") == Some("enclosure"))
                .find_map(|l| attr(l, "href"))
        })
        .or_else(|| item.children("media:content").find_map(|m| attr(m, "url")))
        .or_else(|| {
            item.child("media:group")
                .and_then(|g| g.children("media:content").find_map(|m| attr(m, "url")))
        })
}
