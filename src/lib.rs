//! Searches a directory website through its HTML search form, walks the
//! paged results and flattens every results table into ordered records.

pub mod config;
pub mod error;
pub mod llm;
pub mod parsers;
pub mod present;
pub mod repl;
pub mod resolver;
pub mod results;
pub mod search;
pub mod session;
pub mod utils;

// Re-export commonly used types for convenience
pub use config::SearchConfig;
pub use error::SearchError;
pub use results::{ResultRecord, ResultSet, SearchRequest};
pub use search::DirectorySearch;

use std::path::Path;

/// Builder for a [`DirectorySearch`]
#[derive(Debug, Clone, Default)]
pub struct Search {
    config: SearchConfig,
}

impl Search {
    /// Create a builder for the search form at `base_url`
    pub fn new(base_url: &str) -> Self {
        Self {
            config: SearchConfig::new(base_url),
        }
    }

    /// Replace the whole configuration
    pub fn with_config(mut self, config: SearchConfig) -> Self {
        self.config = config;
        self
    }

    /// Load configuration from a JSON file
    pub fn with_config_file(self, path: impl AsRef<Path>) -> Result<Self, SearchError> {
        let config = SearchConfig::from_file(path)?;
        Ok(self.with_config(config))
    }

    /// Load configuration from a JSON string
    pub fn with_config_str(self, json: &str) -> Result<Self, SearchError> {
        let config = SearchConfig::from_json(json)?;
        Ok(self.with_config(config))
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.config.base_url = base_url.to_string();
        self
    }

    /// Set the maximum number of result pages, the first one included
    pub fn with_max_pages(mut self, max_pages: u32) -> Self {
        self.config.max_pages = max_pages;
        self
    }

    /// Set the pause before each page-navigation request
    pub fn with_page_delay_ms(mut self, delay_ms: u64) -> Self {
        self.config.page_delay_ms = delay_ms;
        self
    }

    pub fn with_request_timeout(mut self, timeout_seconds: u64) -> Self {
        self.config.request_timeout_secs = timeout_seconds;
        self
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn build(self) -> Result<DirectorySearch, SearchError> {
        DirectorySearch::new(self.config)
    }

    /// One-off search with the configured page cap; failures are logged and
    /// give an empty result set
    pub async fn run(self, request: &SearchRequest) -> ResultSet {
        let max_pages = self.config.max_pages;
        match self.build() {
            Ok(mut search) => search.perform_search(request, max_pages).await,
            Err(e) => {
                ::log::error!("Failed to set up search: {}", e);
                ResultSet::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_overrides_config_string() {
        let search = Search::default()
            .with_config_str(r#"{"base_url": "http://localhost:8080/find", "max_pages": 4}"#)
            .unwrap()
            .with_page_delay_ms(0);
        assert_eq!(search.config().base_url, "http://localhost:8080/find");
        assert_eq!(search.config().max_pages, 4);
        assert_eq!(search.config().page_delay_ms, 0);

        let built = search.build().unwrap();
        assert_eq!(built.endpoint().path(), "/find");
    }

    #[test]
    fn test_build_rejects_bad_url() {
        assert!(Search::new("no scheme here").build().is_err());
    }
}
