use crate::parsers::html::{find_first, has_class, selector, text_of};
use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;

static CONTAINER: LazyLock<Selector> = LazyLock::new(|| selector("ul.pagination"));
static ACTIVE: LazyLock<Selector> = LazyLock::new(|| selector("li.active"));
static NEXT: LazyLock<Selector> = LazyLock::new(|| selector(r#"li[id$="_next"]"#));
static LINK: LazyLock<Selector> = LazyLock::new(|| selector("a"));
static PAGE_LINK: LazyLock<Selector> = LazyLock::new(|| selector("a[data-dt-idx]"));

/// Knobs for reading the pagination control
#[derive(Debug, Clone, Copy, Default)]
pub struct PaginationOptions {
    /// Treat `aria-disabled="true"` on the next control (or its link) as disabled
    pub honor_aria_disabled: bool,
}

/// Where a result page sits in the paged result set
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationState {
    pub has_pagination: bool,
    pub current_page: u32,
    pub total_pages: u32,
    pub next_enabled: bool,
    /// `data-dt-idx` of the next link, when the control exposes one
    pub next_page_token: Option<String>,
}

impl Default for PaginationState {
    fn default() -> Self {
        Self::single_page()
    }
}

impl PaginationState {
    /// State of a page without a pagination control
    pub fn single_page() -> Self {
        Self {
            has_pagination: false,
            current_page: 1,
            total_pages: 1,
            next_enabled: false,
            next_page_token: None,
        }
    }

    pub fn parse(html: &str, options: PaginationOptions) -> Self {
        let doc = Html::parse_document(html);
        Self::detect(&doc, options)
    }

    /// Reads the `ul.pagination` control of a parsed page
    pub fn detect(doc: &Html, options: PaginationOptions) -> Self {
        let Some(container) = find_first(doc.root_element(), &CONTAINER) else {
            return Self::single_page();
        };

        let current_page = find_first(container, &ACTIVE)
            .and_then(|li| find_first(li, &LINK))
            .and_then(parse_page_number)
            .unwrap_or(1);

        let (next_enabled, next_page_token) = match find_first(container, &NEXT) {
            Some(li) if !is_disabled(li, options) => {
                let token = find_first(li, &LINK)
                    .and_then(|a| a.value().attr("data-dt-idx"))
                    .map(str::to_string);
                (true, token)
            }
            _ => (false, None),
        };

        let total_pages = container
            .select(&PAGE_LINK)
            .filter_map(parse_page_number)
            .fold(1, u32::max)
            .max(current_page);

        let state = Self {
            has_pagination: true,
            current_page,
            total_pages,
            next_enabled,
            next_page_token,
        };
        ::log::debug!("Pagination: {:?}", state);
        state
    }

    /// True when a walk past this page should start at all
    pub fn is_multi_page(&self) -> bool {
        self.has_pagination && self.total_pages > 1
    }
}

fn parse_page_number(link: ElementRef<'_>) -> Option<u32> {
    text_of(link).parse::<u32>().ok().filter(|n| *n >= 1)
}

fn is_disabled(next: ElementRef<'_>, options: PaginationOptions) -> bool {
    if has_class(next, "disabled") {
        return true;
    }
    if !options.honor_aria_disabled {
        return false;
    }
    let aria = |el: ElementRef<'_>| el.value().attr("aria-disabled") == Some("true");
    aria(next) || find_first(next, &LINK).is_some_and(aria)
}
