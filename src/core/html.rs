// src/core/html.rs
// Small helpers over `scraper` for tolerant text extraction.

use scraper::{ElementRef, Html, Selector};

/// Compile a selector known at build time.
/// Panics only on a malformed literal, which is a programming error.
pub fn sel(css: &str) -> Selector {
    Selector::parse(css).unwrap_or_else(|e| panic!("bad selector {css:?}: {e}"))
}

/// Text of an element: each descendant text node trimmed, then concatenated.
/// Entities are already decoded by the parser.
pub fn text_of(el: ElementRef<'_>) -> String {
    let mut out = String::new();
    for t in el.text() {
        out.push_str(t.trim());
    }
    out
}

/// Text of the first element in the document matching `selector`, if any.
pub fn first_text(doc: &Html, selector: &Selector) -> Option<String> {
    doc.select(selector).next().map(text_of)
}

/// Text of the first matching descendant of `el`, if any.
pub fn first_text_in(el: ElementRef<'_>, selector: &Selector) -> Option<String> {
    el.select(selector).next().map(text_of)
}
