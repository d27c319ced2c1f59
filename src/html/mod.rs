//! Typed queries over parsed HTML
//!
//! This module replaces ad-hoc element lookups with:
//! - [`TagQuery`]: a tag name plus attribute filters
//! - [`locate`]: the first matching descendant, or `None`
//! - [`find`]: the same lookup, where a miss is a fatal `TagNotFound`
//! - Text helpers that flatten and normalize element text

mod locator;
mod query;
mod text;

pub use locator::{find, find_all, locate, next_sibling_element};
pub use query::{AttrMatch, TagQuery};
pub use text::{collapse_whitespace, element_text};

use scraper::Html;

/// Parses a full HTML document
pub fn parse_document(body: &str) -> Html {
    Html::parse_document(body)
}
