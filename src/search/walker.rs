use crate::error::SearchError;
use crate::parsers::{PaginationOptions, PaginationState, ResultPage};
use crate::search::submitter::SubmissionPayload;
use async_trait::async_trait;
use std::time::Duration;
use url::Url;

/// Something that can return the markup of a given result page
#[async_trait]
pub trait PageSource {
    async fn fetch_page(&self, payload: &SubmissionPayload, page: u32)
    -> Result<String, SearchError>;
}

/// A page reached by the walker
#[derive(Debug, Clone)]
pub struct WalkedPage {
    pub number: u32,
    pub page: ResultPage,
}

/// Follows the "next" control of a paged result set, one page per call.
///
/// The first page counts towards `max_pages`. The walk stops when the cap is
/// reached, the next control is disabled, or a page fails to load; a failed
/// page is not retried.
pub struct PaginationWalker<'a, S: PageSource + ?Sized> {
    source: &'a S,
    payload: &'a SubmissionPayload,
    base: &'a Url,
    options: PaginationOptions,
    pagination: PaginationState,
    current_page: u32,
    pages_processed: u32,
    max_pages: u32,
    delay: Duration,
    done: bool,
}

impl<'a, S: PageSource + ?Sized> PaginationWalker<'a, S> {
    pub fn new(
        source: &'a S,
        payload: &'a SubmissionPayload,
        base: &'a Url,
        first: &PaginationState,
        max_pages: u32,
    ) -> Self {
        Self {
            source,
            payload,
            base,
            options: PaginationOptions::default(),
            pagination: first.clone(),
            current_page: first.current_page,
            pages_processed: 1,
            max_pages,
            delay: Duration::from_secs(1),
            done: !first.is_multi_page(),
        }
    }

    /// Pause before each page request
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn with_options(mut self, options: PaginationOptions) -> Self {
        self.options = options;
        self
    }

    /// Fetches and parses the next page, or `None` once the walk is over
    pub async fn next_page(&mut self) -> Option<WalkedPage> {
        if self.done || self.pages_processed >= self.max_pages || !self.pagination.next_enabled {
            self.done = true;
            return None;
        }

        let Some(number) = self.current_page.checked_add(1) else {
            ::log::warn!("Page number {} has no successor, stopping", self.current_page);
            self.done = true;
            return None;
        };
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        let html = match self.source.fetch_page(self.payload, number).await {
            Ok(html) => html,
            Err(e) => {
                ::log::error!("Error navigating to page {}: {}", number, e);
                self.done = true;
                return None;
            }
        };

        let page = ResultPage::parse(&html, self.base, self.options);
        self.current_page = number;
        self.pages_processed += 1;
        self.pagination = page.pagination.clone();

        Some(WalkedPage { number, page })
    }

    /// Pages handled so far, the first page included
    pub fn pages_processed(&self) -> u32 {
        self.pages_processed
    }

    /// Pagination state of the most recently processed page
    pub fn pagination(&self) -> &PaginationState {
        &self.pagination
    }
}
