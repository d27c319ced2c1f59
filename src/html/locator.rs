use crate::html::query::TagQuery;
use crate::ParserError;
use scraper::ElementRef;
use std::backtrace::Backtrace;

/// Returns the first descendant of `node` matching `query`, in document order
pub fn locate<'a>(node: ElementRef<'a>, query: &TagQuery) -> Option<ElementRef<'a>> {
    node.descendants()
        .skip(1)
        .filter_map(ElementRef::wrap)
        .find(|element| query.matches(element))
}

/// Returns every descendant of `node` matching `query`, in document order
pub fn find_all<'a>(node: ElementRef<'a>, query: &TagQuery) -> Vec<ElementRef<'a>> {
    node.descendants()
        .skip(1)
        .filter_map(ElementRef::wrap)
        .filter(|element| query.matches(element))
        .collect()
}

/// Like [`locate`], but a miss is a fatal `TagNotFound`
///
/// A missing element means the page layout no longer matches what the
/// extractor expects, so the miss is logged at error level with a
/// backtrace before it is returned.
pub fn find<'a>(node: ElementRef<'a>, query: &TagQuery) -> Result<ElementRef<'a>, ParserError> {
    locate(node, query).ok_or_else(|| {
        tracing::error!(
            "Tag not found: {}\n{}",
            query,
            stack_context()
        );
        ParserError::TagNotFound {
            query: query.to_string(),
        }
    })
}

/// Captured regardless of `RUST_BACKTRACE`
fn stack_context() -> Backtrace {
    Backtrace::force_capture()
}

/// The element immediately following `element` among its siblings
pub fn next_sibling_element<'a>(element: ElementRef<'a>) -> Option<ElementRef<'a>> {
    element.next_siblings().find_map(ElementRef::wrap)
}
