use crate::config::SearchConfig;
use crate::error::SearchError;
use encoding_rs::{Encoding, UTF_8};
use regex::Regex;
use reqwest::header::CONTENT_TYPE;
use std::sync::LazyLock;
use url::Url;

static HEADER_CHARSET: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)charset\s*=\s*["']?([\w.:-]+)"#).expect("valid regex"));
static META_CHARSET: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<meta[^>]*?charset\s*=\s*["']?([\w.:-]+)"#).expect("valid regex")
});

/// Only the start of a document is searched for a `<meta>` charset
const META_SNIFF_LEN: usize = 1024;

/// The network identity of a search: one client, one cookie jar, one
/// User-Agent for every request made on behalf of the user.
///
/// Cookies set by the form page (session ids, CSRF-style tokens) flow into
/// the search and page-navigation POSTs that follow.
#[derive(Debug, Clone)]
pub struct Session {
    client: reqwest::Client,
}

impl Session {
    pub fn new(config: &SearchConfig) -> Result<Self, SearchError> {
        let client = reqwest::Client::builder()
            .cookie_store(true)
            .user_agent(config.user_agent.as_str())
            .timeout(config.request_timeout())
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()
            .map_err(|e| SearchError::Config(format!("cannot build HTTP client: {e}")))?;
        Ok(Self { client })
    }

    /// GET a page and return its body
    pub async fn get(&self, url: &Url) -> Result<String, SearchError> {
        ::log::debug!("GET {}", url);
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| SearchError::transport(url.as_str(), e))?;
        read_body(response, url).await
    }

    /// POST url-encoded form fields and return the response body
    pub async fn post_form(
        &self,
        url: &Url,
        fields: &[(String, String)],
    ) -> Result<String, SearchError> {
        ::log::debug!("POST {} ({} fields)", url, fields.len());
        let response = self
            .client
            .post(url.clone())
            .form(fields)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| SearchError::transport(url.as_str(), e))?;
        read_body(response, url).await
    }
}

async fn read_body(response: reqwest::Response, url: &Url) -> Result<String, SearchError> {
    let header_charset = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| HEADER_CHARSET.captures(value))
        .map(|caps| caps[1].to_string());
    let bytes = response
        .bytes()
        .await
        .map_err(|e| SearchError::transport(url.as_str(), e))?;
    Ok(decode_body(&bytes, header_charset.as_deref()))
}

/// Decodes a page body: a byte order mark wins, then the `Content-Type`
/// charset, then a `<meta>` charset near the top of the document, then UTF-8.
pub(crate) fn decode_body(bytes: &[u8], header_charset: Option<&str>) -> String {
    let encoding = header_charset
        .and_then(|label| Encoding::for_label(label.as_bytes()))
        .or_else(|| meta_charset(bytes))
        .unwrap_or(UTF_8);
    let (text, used, had_errors) = encoding.decode(bytes);
    if had_errors {
        ::log::debug!("Malformed {} sequences replaced in page body", used.name());
    }
    text.into_owned()
}

fn meta_charset(bytes: &[u8]) -> Option<&'static Encoding> {
    let head = String::from_utf8_lossy(&bytes[..bytes.len().min(META_SNIFF_LEN)]);
    let caps = META_CHARSET.captures(&head)?;
    Encoding::for_label(caps[1].as_bytes())
}
