use crate::parsers::text::normalize_whitespace;
use scraper::{ElementRef, Selector};

/// Builds a selector from a CSS literal known at compile time
pub(crate) fn selector(css: &'static str) -> Selector {
    Selector::parse(css).unwrap_or_else(|e| panic!("invalid static selector {css:?}: {e:?}"))
}

/// First descendant matching `selector`
pub(crate) fn find_first<'a>(element: ElementRef<'a>, selector: &Selector) -> Option<ElementRef<'a>> {
    element.select(selector).next()
}

/// Text content of an element with whitespace normalized
pub(crate) fn text_of(element: ElementRef<'_>) -> String {
    normalize_whitespace(&element.text().collect::<String>())
}

/// Attribute value, or the empty string when absent
pub(crate) fn attr_or_empty(element: ElementRef<'_>, name: &str) -> String {
    element.value().attr(name).unwrap_or_default().to_string()
}

pub(crate) fn has_class(element: ElementRef<'_>, class: &str) -> bool {
    element.value().classes().any(|c| c == class)
}
