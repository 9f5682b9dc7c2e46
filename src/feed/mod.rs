//! Feed parsing and entity extraction.
//!
//! [`parse_feed`] turns feed text into an [`XmlNode`] tree;
//! [`extract_podcast`] and [`extract_episodes_page`] walk that tree into the
//! normalized [`crate::models`] entities.

mod dates;
mod extract;
mod fields;
mod page;
mod tree;

pub use dates::parse_date;
pub use extract::{count_episodes, extract_episodes_page, extract_podcast};
pub use fields::to_link;
pub use page::PageRequest;
pub use tree::{parse_feed, XmlNode};
