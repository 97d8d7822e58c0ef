//! Minimal OpenAI-compatible chat-completions client.
//!
//! Both collaborators (article writer, dynamic-topic source) speak the same
//! wire protocol against independently configured endpoints. Every call is
//! synchronous from the pipeline's point of view, bounded by the client
//! timeout, and never retried.

use serde::{Deserialize, Serialize};

use pressmill_shared::{PressmillError, Result};

/// Default sampling temperature, matching the upstream article prompts.
const TEMPERATURE: f32 = 0.7;

/// Response cap; articles run 1200-1500 words.
const MAX_TOKENS: u32 = 3000;

/// User-Agent for collaborator requests.
const USER_AGENT: &str = concat!("Pressmill/", env!("CARGO_PKG_VERSION"));

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: &'static str,
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    response_format: ResponseFormat,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Message,
}

#[derive(Debug, Deserialize)]
struct Message {
    content: String,
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// Connection settings for one collaborator endpoint.
#[derive(Debug, Clone)]
pub struct ChatClientOptions {
    /// Base URL of an OpenAI-compatible API (e.g. `https://api.openai.com/v1`).
    pub base_url: String,
    /// Bearer token.
    pub api_key: String,
    /// Model identifier sent with every request.
    pub model: String,
    /// Request timeout in seconds; a timeout is the same failure class as
    /// any other collaborator error.
    pub timeout_secs: u64,
}

/// A chat-completions client pinned to one endpoint and model.
pub struct ChatClient {
    http: reqwest::Client,
    options: ChatClientOptions,
}

impl std::fmt::Debug for ChatClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatClient")
            .field("base_url", &self.options.base_url)
            .field("model", &self.options.model)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

impl ChatClient {
    pub fn new(options: ChatClientOptions) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(std::time::Duration::from_secs(options.timeout_secs))
            .build()
            .map_err(|e| PressmillError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { http, options })
    }

    /// The configured model identifier.
    pub fn model(&self) -> &str {
        &self.options.model
    }

    /// Send a system+user prompt pair and parse the reply as a JSON object.
    ///
    /// The endpoint is asked for `response_format: json_object`; a reply
    /// that is not valid JSON is a [`PressmillError::Generation`] and fatal
    /// for the run.
    pub async fn complete_json(
        &self,
        system: &str,
        user: &str,
    ) -> Result<serde_json::Value> {
        let request = ChatRequest {
            model: self.options.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system.to_string(),
                },
                ChatMessage {
                    role: "user",
                    content: user.to_string(),
                },
            ],
            response_format: ResponseFormat {
                format_type: "json_object",
            },
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
        };

        let url = format!("{}/chat/completions", self.options.base_url);
        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.options.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| PressmillError::Network(format!("{url}: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PressmillError::Generation(format!(
                "{url}: HTTP {status}: {}",
                truncate(&body, 200)
            )));
        }

        let parsed: ChatResponse = response.json().await.map_err(|e| {
            PressmillError::Generation(format!("{url}: invalid completion envelope: {e}"))
        })?;

        let content = parsed
            .choices
            .first()
            .map(|c| c.message.content.as_str())
            .ok_or_else(|| {
                PressmillError::Generation(format!("{url}: completion has no choices"))
            })?;

        serde_json::from_str(content).map_err(|e| {
            PressmillError::Generation(format!(
                "model output is not valid JSON: {e} (got: {})",
                truncate(content, 200)
            ))
        })
    }
}

/// Truncate for error messages without splitting a UTF-8 sequence.
fn truncate(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn options(base_url: String) -> ChatClientOptions {
        ChatClientOptions {
            base_url,
            api_key: "test-key".into(),
            model: "test-model".into(),
            timeout_secs: 5,
        }
    }

    fn completion_body(content: &str) -> serde_json::Value {
        serde_json::json!({
            "choices": [{"message": {"role": "assistant", "content": content}}]
        })
    }

    #[tokio::test]
    async fn complete_json_parses_object() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(completion_body(r#"{"answer": 42}"#)),
            )
            .mount(&server)
            .await;

        let client = ChatClient::new(options(server.uri())).unwrap();
        let value = client.complete_json("system", "user").await.unwrap();
        assert_eq!(value["answer"], 42);
    }

    #[tokio::test]
    async fn non_json_content_is_generation_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(completion_body("Sorry, I can't do that.")),
            )
            .mount(&server)
            .await;

        let client = ChatClient::new(options(server.uri())).unwrap();
        let err = client.complete_json("system", "user").await.unwrap_err();
        assert!(matches!(err, PressmillError::Generation(_)));
        assert!(err.to_string().contains("not valid JSON"));
    }

    #[tokio::test]
    async fn http_error_is_generation_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(500).set_body_string("upstream down"))
            .mount(&server)
            .await;

        let client = ChatClient::new(options(server.uri())).unwrap();
        let err = client.complete_json("system", "user").await.unwrap_err();
        assert!(err.to_string().contains("HTTP 500"));
    }

    #[tokio::test]
    async fn empty_choices_is_generation_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"choices": []})),
            )
            .mount(&server)
            .await;

        let client = ChatClient::new(options(server.uri())).unwrap();
        let err = client.complete_json("system", "user").await.unwrap_err();
        assert!(err.to_string().contains("no choices"));
    }
}
