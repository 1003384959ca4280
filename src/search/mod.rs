pub mod submitter;
pub mod walker;


pub use submitter::{SubmissionPayload, Submitter, build_payload};
pub use walker::{PageSource, PaginationWalker, WalkedPage};

use crate::config::SearchConfig;
use crate::error::SearchError;
use crate::parsers::{FormSnapshot, PaginationOptions, ResultPage};
use crate::results::{ResultSet, SearchRequest};
use crate::session::Session;
use url::Url;

/// The first result page of a search together with the payload that
/// produced it; page navigation re-posts the same payload.
#[derive(Debug, Clone)]
pub struct SubmittedSearch {
    pub payload: SubmissionPayload,
    pub html: String,
}

/// Runs searches against one directory search form.
///
/// Holds the HTTP session for its whole lifetime. Searches take `&mut self`
/// so the cookie jar is only ever driven by one search at a time.
pub struct DirectorySearch {
    config: SearchConfig,
    endpoint: Url,
    session: Session,
}

impl DirectorySearch {
    pub fn new(config: SearchConfig) -> Result<Self, SearchError> {
        config.validate()?;
        let endpoint = Url::parse(&config.base_url)?;
        let session = Session::new(&config)?;
        Ok(Self {
            config,
            endpoint,
            session,
        })
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    fn pagination_options(&self) -> PaginationOptions {
        PaginationOptions {
            honor_aria_disabled: self.config.honor_aria_disabled,
        }
    }

    fn submitter(&self) -> Submitter<'_> {
        Submitter::new(&self.session, &self.endpoint, &self.config.fields.page)
    }

    /// Loads the search page and reads its form
    pub async fn introspect_form(&self) -> Result<FormSnapshot, SearchError> {
        let html = self.session.get(&self.endpoint).await?;
        Ok(FormSnapshot::parse(&html))
    }

    /// Reads the form, fills it from `request` and posts it
    pub async fn submit(&self, request: &SearchRequest) -> Result<SubmittedSearch, SearchError> {
        let snapshot = self.introspect_form().await?;
        let payload = build_payload(&snapshot, request, &self.config.fields);
        let html = self.submitter().submit(&payload).await?;
        Ok(SubmittedSearch { payload, html })
    }

    /// Runs a search and walks its result pages.
    ///
    /// Fails only when the form or the first result page cannot be loaded;
    /// a later page failing ends the walk with the records gathered so far.
    pub async fn try_search(
        &mut self,
        request: &SearchRequest,
        max_pages: u32,
    ) -> Result<ResultSet, SearchError> {
        ::log::info!("Searching: {}", request);
        let submitted = self.submit(request).await?;
        let first = ResultPage::parse(&submitted.html, &self.endpoint, self.pagination_options());

        let mut results = ResultSet::new();
        results.extend(first.records);

        if first.pagination.is_multi_page() {
            ::log::info!("Total pages: {}", first.pagination.total_pages);

            let submitter = self.submitter();
            let mut walker = PaginationWalker::new(
                &submitter,
                &submitted.payload,
                &self.endpoint,
                &first.pagination,
                max_pages,
            )
            .with_delay(self.config.page_delay())
            .with_options(self.pagination_options());

            while let Some(walked) = walker.next_page().await {
                ::log::info!(
                    "Found {} results on page {}",
                    walked.page.records.len(),
                    walked.number
                );
                results.extend(walked.page.records);
            }
        }

        ::log::info!("Total results collected: {}", results.len());
        Ok(results)
    }

    /// Like [`try_search`](Self::try_search), but a failed search is
    /// reported and yields an empty result set.
    pub async fn perform_search(&mut self, request: &SearchRequest, max_pages: u32) -> ResultSet {
        match self.try_search(request, max_pages).await {
            Ok(results) => results,
            Err(e) => {
                ::log::error!("Error performing search: {}", e);
                ResultSet::new()
            }
        }
    }
}
