//! Podcast and episode extraction.
//!
//! Works on RSS 2.0 (`rss/channel/item`), Atom (`feed/entry`) and RSS 1.0 /
//! RDF (`rdf:RDF` with `item`s beside the `channel`). Every attribute is read
//! through an ordered [`Field`] chain; items inherit the channel author and
//! image when they have none.

use log::debug;

use super::dates::parse_date;
use super::fields::{enclosure_url, first_of, Field};
use super::page::PageRequest;
use super::tree::XmlNode;
use crate::content::{build_description_html, to_plain_text};
use crate::identity::{episode_id, EpisodeIdCandidates};
use crate::models::{Episode, EpisodesPage, Podcast};

const TITLE: &[Field] = &[Field::Text("title"), Field::Text("itunes:title")];

const CHANNEL_AUTHOR: &[Field] = &[
    Field::Text("itunes:author"),
    Field::Nested("author", "name"),
    Field::Text("author"),
    Field::Text("managingEditor"),
    Field::Text("dc:creator"),
];

const CHANNEL_IMAGE: &[Field] = &[
    Field::Attr("itunes:image", "href"),
    Field::Nested("image", "url"),
    Field::Text("itunes:image"),
    Field::Text("logo"),
    Field::Text("icon"),
];

const ITEM_AUTHOR: &[Field] = &[
    Field::Text("itunes:author"),
    Field::Nested("author", "name"),
    Field::Text("author"),
    Field::Text("dc:creator"),
];

const ITEM_IMAGE: &[Field] = &[
    Field::Attr("itunes:image", "href"),
    Field::Nested("image", "url"),
    Field::Text("itunes:image"),
    Field::Attr("media:thumbnail", "url"),
];

const LINK: &[Field] = &[Field::Link("link")];

/// Description fields that may carry HTML.
const HTML_DESCRIPTION: &[Field] = &[
    Field::Text("content:encoded"),
    Field::Text("description"),
    Field::Text("content"),
    Field::Text("summary"),
];

/// Description fields that are plain text by convention.
const TEXT_DESCRIPTION: &[Field] = &[
    Field::Text("itunes:summary"),
    Field::Text("itunes:subtitle"),
    Field::Text("subtitle"),
];

const PUBLISHED: &[Field] = &[
    Field::Text("pubDate"),
    Field::Text("dc:date"),
    Field::Text("published"),
    Field::Text("updated"),
];

/// The channel element and item elements of a parsed feed.
struct FeedLayout<'a> {
    channel: &'a XmlNode,
    items: Vec<&'a XmlNode>,
}

impl<'a> FeedLayout<'a> {
    fn of(root: &'a XmlNode) -> Self {
        let channel = root.child("channel").unwrap_or(root);
        let mut items: Vec<&XmlNode> = channel.children("item").collect();
        if items.is_empty() {
            items = channel.children("entry").collect();
        }
        if items.is_empty() && !std::ptr::eq(channel, root) {
            // RSS 1.0 keeps items next to the channel
            items = root.children("item").collect();
        }
        Self { channel, items }
    }
}

/// Markup-free single-line text.
fn inline_text(raw: &str) -> String {
    to_plain_text(raw)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

struct Description {
    html: String,
    text: String,
}

fn description(node: &XmlNode) -> Description {
    let html_source = first_of(node, HTML_DESCRIPTION);
    let text_source = first_of(node, TEXT_DESCRIPTION);
    let text = html_source
        .as_deref()
        .or(text_source.as_deref())
        .map(to_plain_text)
        .unwrap_or_default();
    Description {
        html: build_description_html(html_source.as_deref(), text_source.as_deref()),
        text,
    }
}

/// Extracts channel-level podcast metadata.
///
/// # Arguments
///
/// * `tree` - Root of the parsed feed
/// * `source_url` - URL the feed was fetched from, reported as `rss`
pub fn extract_podcast(tree: &XmlNode, source_url: &str) -> Podcast {
    let channel = FeedLayout::of(tree).channel;
    let description = description(channel);
    Podcast {
        name: first_of(channel, TITLE)
            .map(|t| inline_text(&t))
            .unwrap_or_default(),
        author: first_of(channel, CHANNEL_AUTHOR)
            .map(|a| inline_text(&a))
            .unwrap_or_default(),
        image: first_of(channel, CHANNEL_IMAGE).unwrap_or_default(),
        website: first_of(channel, LINK).unwrap_or_default(),
        rss: source_url.to_string(),
        description_html: description.html,
        description_text: description.text,
    }
}

/// Number of items in a parsed feed.
pub fn count_episodes(tree: &XmlNode) -> usize {
    FeedLayout::of(tree).items.len()
}

/// Extracts one page of episodes.
///
/// `total` is always the number of items in the whole feed; an offset past the
/// end yields an empty page. Items keep feed order.
pub fn extract_episodes_page(tree: &XmlNode, page: PageRequest) -> EpisodesPage {
    let layout = FeedLayout::of(tree);
    let total = layout.items.len();
    let channel_author = first_of(layout.channel, CHANNEL_AUTHOR)
        .map(|a| inline_text(&a))
        .unwrap_or_default();
    let channel_image = first_of(layout.channel, CHANNEL_IMAGE).unwrap_or_default();

    let range = page.range(total);
    let start = range.start;
    let episodes: Vec<Episode> = layout.items[range]
        .iter()
        .enumerate()
        .map(|(i, item)| extract_episode(item, start + i, &channel_author, &channel_image))
        .collect();

    debug!(
        "Extracted {} of {} episodes at offset {}",
        episodes.len(),
        total,
        page.offset
    );
    EpisodesPage::new(page.offset, total, episodes)
}

fn extract_episode(
    item: &XmlNode,
    index: usize,
    channel_author: &str,
    channel_image: &str,
) -> Episode {
    let title = first_of(item, TITLE)
        .map(|t| inline_text(&t))
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| format!("Episode {}", index + 1));
    let author = first_of(item, ITEM_AUTHOR)
        .map(|a| inline_text(&a))
        .filter(|a| !a.is_empty())
        .unwrap_or_else(|| channel_author.to_string());
    let image = first_of(item, ITEM_IMAGE).unwrap_or_else(|| channel_image.to_string());
    let published_at = first_of(item, PUBLISHED).and_then(|d| parse_date(&d));
    let audio = enclosure_url(item).unwrap_or_default();
    let link = first_of(item, LINK).unwrap_or_default();

    let guid = item.child("guid").map(|g| g.text().to_string());
    let atom_id = item.child("id").map(|i| i.text().to_string());
    let uid = item.child("uid").map(|u| u.text().to_string());
    let id = episode_id(&EpisodeIdCandidates {
        guid: guid.as_deref(),
        id: atom_id.as_deref(),
        uid: uid.as_deref(),
        audio: Some(audio.as_str()),
        link: Some(link.as_str()),
        title: Some(title.as_str()),
        published_at,
    });

    let description = description(item);
    let url = if link.is_empty() {
        audio.clone()
    } else {
        link.clone()
    };

    Episode {
        id,
        title,
        author,
        published_at,
        duration: first_of(item, &[Field::Text("itunes:duration")]).unwrap_or_default(),
        audio,
        image,
        description_html: description.html,
        description_text: description.text,
        url,
        link,
        guid: guid
            .filter(|g| !g.is_empty())
            .or(atom_id)
            .unwrap_or_default(),
    }
}
