use crate::error::SearchError;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::time::Duration;

/// Configuration for a directory search
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// URL of the search form; also the POST target and the base for relative links
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Maximum number of result pages to process, the first page included
    #[serde(default = "default_max_pages")]
    pub max_pages: u32,

    /// Pause before each page-navigation request, in milliseconds
    #[serde(default = "default_page_delay_ms")]
    pub page_delay_ms: u64,

    /// Per-request timeout in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// User-Agent header sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Also treat `aria-disabled="true"` on the next-page control as disabled
    #[serde(default)]
    pub honor_aria_disabled: bool,

    /// Names of the form fields the search request maps onto
    #[serde(default)]
    pub fields: FieldNames,

    /// Natural-language resolver settings
    #[serde(default)]
    pub llm: LlmConfig,
}

/// Form field names used by the directory search page
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldNames {
    #[serde(default = "default_state_field")]
    pub state: String,

    #[serde(default = "default_member_field")]
    pub member: String,

    #[serde(default = "default_breed_field")]
    pub breed: String,

    /// Field injected when requesting a specific result page
    #[serde(default = "default_page_field")]
    pub page: String,
}

/// Settings for the chat-completion endpoint used to parse free-text requests
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    #[serde(default = "default_llm_endpoint")]
    pub endpoint: String,

    #[serde(default = "default_llm_model")]
    pub model: String,

    #[serde(default = "default_llm_temperature")]
    pub temperature: f32,

    /// Environment variable holding the API key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
}

impl SearchConfig {
    /// Create a configuration with default values for the given search URL
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.to_string(),
            ..Self::default()
        }
    }

    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SearchError> {
        let mut file = File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;

        Self::from_json(&contents)
    }

    /// Load configuration from a JSON string
    pub fn from_json(json: &str) -> Result<Self, SearchError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the search loop cannot work with
    pub fn validate(&self) -> Result<(), SearchError> {
        if self.max_pages == 0 {
            return Err(SearchError::Config("max_pages must be at least 1".into()));
        }
        if self.request_timeout_secs == 0 {
            return Err(SearchError::Config(
                "request_timeout_secs must be at least 1".into(),
            ));
        }
        url::Url::parse(&self.base_url)?;
        Ok(())
    }

    pub fn page_delay(&self) -> Duration {
        Duration::from_millis(self.page_delay_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            max_pages: default_max_pages(),
            page_delay_ms: default_page_delay_ms(),
            request_timeout_secs: default_request_timeout_secs(),
            user_agent: default_user_agent(),
            honor_aria_disabled: false,
            fields: FieldNames::default(),
            llm: LlmConfig::default(),
        }
    }
}

impl Default for FieldNames {
    fn default() -> Self {
        Self {
            state: default_state_field(),
            member: default_member_field(),
            breed: default_breed_field(),
            page: default_page_field(),
        }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            endpoint: default_llm_endpoint(),
            model: default_llm_model(),
            temperature: default_llm_temperature(),
            api_key_env: default_api_key_env(),
        }
    }
}

fn default_base_url() -> String {
    "https://www.amgr.org/frm_directorySearch.cfm".to_string()
}

fn default_max_pages() -> u32 {
    10
}

fn default_page_delay_ms() -> u64 {
    1000
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36"
        .to_string()
}

fn default_state_field() -> String {
    "stateID".to_string()
}

fn default_member_field() -> String {
    "memberID".to_string()
}

fn default_breed_field() -> String {
    "breedID".to_string()
}

fn default_page_field() -> String {
    "page".to_string()
}

fn default_llm_endpoint() -> String {
    "https://openrouter.ai/api/v1/chat/completions".to_string()
}

fn default_llm_model() -> String {
    "deepseek/deepseek-r1-distill-llama-70b:free".to_string()
}

fn default_llm_temperature() -> f32 {
    0.1
}

fn default_api_key_env() -> String {
    "OPENROUTER_API_KEY".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_uses_defaults() {
        let config =
            SearchConfig::from_json(r#"{"max_pages": 3, "fields": {"state": "st"}}"#).unwrap();
        assert_eq!(config.max_pages, 3);
        assert_eq!(config.page_delay_ms, 1000);
        assert_eq!(config.fields.state, "st");
        assert_eq!(config.fields.member, "memberID");
        assert_eq!(config.fields.page, "page");
        assert_eq!(config.llm.api_key_env, "OPENROUTER_API_KEY");
        assert!(!config.honor_aria_disabled);
    }

    #[test]
    fn test_rejects_zero_pages_and_bad_url() {
        assert!(matches!(
            SearchConfig::from_json(r#"{"max_pages": 0}"#),
            Err(SearchError::Config(_))
        ));
        assert!(matches!(
            SearchConfig::from_json(r#"{"base_url": "not a url"}"#),
            Err(SearchError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_default_delay_is_not_zero() {
        let config = SearchConfig::new("http://localhost/search");
        assert_eq!(config.page_delay(), Duration::from_secs(1));
        assert_eq!(config.base_url, "http://localhost/search");
    }
}
