use thiserror::Error;

/// Errors raised while talking to the directory site or loading configuration.
///
/// Missing markup structure is never an error: parsers degrade to empty
/// results instead.
#[derive(Debug, Error)]
pub enum SearchError {
    /// DNS, connection, timeout or non-2xx response
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("invalid url: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// The language-model collaborator returned something unusable
    #[error("language model: {0}")]
    Llm(String),
}

impl SearchError {
    pub(crate) fn transport(url: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Transport {
            url: url.into(),
            source,
        }
    }
}
