use scraper::ElementRef;

/// All text inside `element`, concatenated in document order
pub fn element_text(element: ElementRef) -> String {
    element.text().collect()
}

/// Trims `text` and collapses every run of whitespace into one space
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
