//! Turns a free-text request ("members in Kansas raising American Red")
//! into a [`SearchRequest`] with the help of a chat-completion API.

use crate::config::LlmConfig;
use crate::error::SearchError;
use crate::results::SearchRequest;
use async_trait::async_trait;
use regex::Regex;
use serde::Deserialize;
use serde_json::json;
use std::sync::LazyLock;
use std::time::Duration;

static JSON_OBJECT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\{.*\}").expect("valid regex"));

const SYSTEM_PROMPT: &str = "You are a helpful assistant that parses natural language commands \
into structured search parameters. Always respond with valid JSON.";

/// Produces search parameters from free text.
///
/// Implementations never fail: anything that goes wrong yields an empty
/// request, which the search treats like any other.
#[async_trait]
pub trait ParameterResolver {
    async fn resolve(&self, text: &str) -> SearchRequest;
}

/// Resolver backed by an OpenAI-compatible chat-completion endpoint
/// (OpenRouter by default)
pub struct OpenRouterResolver {
    client: reqwest::Client,
    config: LlmConfig,
    api_key: Option<String>,
}

impl OpenRouterResolver {
    /// `api_key` of `None` leaves the resolver unconfigured; it then answers
    /// every request with an empty [`SearchRequest`].
    pub fn new(config: LlmConfig, api_key: Option<String>, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_default();
        Self {
            client,
            config,
            api_key: api_key.filter(|k| !k.trim().is_empty()),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    async fn complete(&self, api_key: &str, command: &str) -> Result<String, SearchError> {
        let body = json!({
            "model": self.config.model,
            "messages": [
                {"role": "system", "content": SYSTEM_PROMPT},
                {"role": "user", "content": user_prompt(command)},
            ],
            "temperature": self.config.temperature,
        });

        let response = self
            .client
            .post(&self.config.endpoint)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| SearchError::transport(self.config.endpoint.as_str(), e))?;

        let completion: ChatCompletion = response
            .json()
            .await
            .map_err(|e| SearchError::transport(self.config.endpoint.as_str(), e))?;

        completion
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| SearchError::Llm("completion has no content".into()))
    }
}

#[async_trait]
impl ParameterResolver for OpenRouterResolver {
    async fn resolve(&self, text: &str) -> SearchRequest {
        let Some(api_key) = self.api_key.as_deref() else {
            ::log::error!(
                "Language model API not configured. Set the {} environment variable.",
                self.config.api_key_env
            );
            return SearchRequest::default();
        };

        let parsed = self
            .complete(api_key, text)
            .await
            .and_then(|content| parse_completion(&content));
        parsed.unwrap_or_else(|e| {
            ::log::error!("Error parsing natural language command: {}", e);
            SearchRequest::default()
        })
    }
}

fn user_prompt(command: &str) -> String {
    format!(
        r#"Parse the following natural language command into search parameters for an AMGR Directory search.
Extract state, member name, and breed information if mentioned.

Command: "{command}"

Return a JSON object with keys: state, member, breed
If a parameter is not mentioned, set it to null.

Example response:
{{"state": "Kansas", "member": "Dwight Elmore", "breed": "(AR) - American Red"}}"#
    )
}

/// Pulls the JSON object out of a model answer, tolerating prose or
/// reasoning text around it
pub fn parse_completion(content: &str) -> Result<SearchRequest, SearchError> {
    let object = JSON_OBJECT
        .find(content.trim())
        .ok_or_else(|| SearchError::Llm(format!("no JSON object in answer: {content:?}")))?;
    Ok(serde_json::from_str(object.as_str())?)
}

#[derive(Debug, Deserialize)]
struct ChatCompletion {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Message,
}

#[derive(Debug, Deserialize)]
struct Message {
    content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_parse_plain_json() {
        let request =
            parse_completion(r#"{"state": "Kansas", "member": null, "breed": "American Red"}"#)
                .unwrap();
        assert_eq!(
            request,
            SearchRequest::new(Some("Kansas".into()), None, Some("American Red".into()))
        );
    }

    #[test]
    fn test_parse_json_inside_prose() {
        let answer = "Sure! Here you go:\n```json\n{\n  \"member\": \"Dwight Elmore\"\n}\n```";
        let request = parse_completion(answer).unwrap();
        assert_eq!(request.member.as_deref(), Some("Dwight Elmore"));
        assert_eq!(request.state, None);
    }

    #[test]
    fn test_parse_without_json_fails() {
        assert!(matches!(
            parse_completion("I could not understand that."),
            Err(SearchError::Llm(_))
        ));
        assert!(matches!(
            parse_completion("{not json}"),
            Err(SearchError::Json(_))
        ));
    }

    #[test]
    fn test_prompt_embeds_command() {
        let prompt = user_prompt("members in Ohio");
        assert!(prompt.contains(r#"Command: "members in Ohio""#));
        assert!(prompt.contains(r#"{"state": "Kansas""#));
    }

    fn resolver(server: &MockServer, api_key: Option<&str>) -> OpenRouterResolver {
        let config = LlmConfig {
            endpoint: format!("{}/api/v1/chat/completions", server.uri()),
            ..LlmConfig::default()
        };
        OpenRouterResolver::new(config, api_key.map(str::to_string), Duration::from_secs(5))
    }

    #[tokio::test]
    async fn test_resolve_through_endpoint() {
        let server = MockServer::start().await;
        let completion = json!({
            "choices": [{
                "message": {
                    "role": "assistant",
                    "content": "{\"state\": \"Kansas\", \"member\": null, \"breed\": null}"
                }
            }]
        });
        Mock::given(method("POST"))
            .and(path("/api/v1/chat/completions"))
            .and(header("authorization", "Bearer sk-test"))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion))
            .expect(1)
            .mount(&server)
            .await;

        let request = resolver(&server, Some("sk-test"))
            .resolve("find members in kansas")
            .await;
        assert_eq!(request, SearchRequest::new(Some("Kansas".into()), None, None));
    }

    #[tokio::test]
    async fn test_missing_key_sends_nothing() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let resolver = resolver(&server, Some("  "));
        assert!(!resolver.is_configured());
        assert_eq!(resolver.resolve("anything").await, SearchRequest::default());
    }

    #[tokio::test]
    async fn test_endpoint_error_gives_empty_request() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429))
            .mount(&server)
            .await;

        let request = resolver(&server, Some("sk-test")).resolve("anything").await;
        assert_eq!(request, SearchRequest::default());
    }
}
