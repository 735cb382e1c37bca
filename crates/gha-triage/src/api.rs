//! Async client for the OpenAI chat completions API.
//!
//! One request per invocation, no retries, no streaming. Transport and quota
//! errors are surfaced verbatim to the caller; it is the caller's problem to
//! decide whether a rerun is worth it.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::debug;

pub const OPENAI_URL: &str = "https://api.openai.com/v1/chat/completions";

/// Default model for the analysis call. Cost-efficient; override with
/// `--model` or the `OPENAI_MODEL` environment variable.
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Maximum tokens reserved for the model's analysis response.
pub const ANALYSIS_MAX_TOKENS: u32 = 8000;

// ── Request types ──────────────────────────────────────────────────

/// Role of a message in the conversation.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
    Assistant,
}

/// A message in the conversation.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Message {
    pub role: MessageRole,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }
}

/// Chat completion request body.
#[derive(Serialize, Debug)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<Message>,
    pub max_tokens: u32,
    pub temperature: f32,
}

// ── Response types ─────────────────────────────────────────────────

/// Raw API response (internal deserialization target).
#[derive(Deserialize, Debug)]
struct RawChatResponse {
    choices: Option<Vec<RawChoice>>,
    error: Option<ApiErrorResponse>,
    #[serde(default)]
    usage: Option<UsageInfo>,
}

#[derive(Deserialize, Debug)]
struct RawChoice {
    message: RawResponseMessage,
}

#[derive(Deserialize, Debug)]
struct RawResponseMessage {
    content: Option<String>,
}

#[derive(Deserialize, Debug)]
struct ApiErrorResponse {
    message: String,
}

/// Clean return type from [`OpenAiClient::chat()`].
#[derive(Debug)]
pub struct ChatCompletion {
    pub content: Option<String>,
    pub usage: Option<UsageInfo>,
}

/// Token usage statistics.
#[derive(Deserialize, Debug, Clone)]
pub struct UsageInfo {
    pub prompt_tokens: Option<u32>,
    pub completion_tokens: Option<u32>,
    pub total_tokens: Option<u32>,
}

// ── Client ─────────────────────────────────────────────────────────

/// Async HTTP client for the OpenAI chat completions API.
pub struct OpenAiClient {
    client: reqwest::Client,
    api_key: String,
}

impl OpenAiClient {
    /// Create a new client with the given API key.
    pub fn new(api_key: impl Into<String>) -> Result<Self, String> {
        let client = reqwest::Client::builder()
            .user_agent("gha-triage/0.1")
            .timeout(Duration::from_secs(120))
            .build()
            .map_err(|e| format!("failed to build HTTP client: {e}"))?;
        Ok(Self {
            client,
            api_key: api_key.into(),
        })
    }

    /// Send a chat completion request.
    pub async fn chat(&self, body: &ChatRequest) -> Result<ChatCompletion, String> {
        debug!(
            "LLM request: model={}, messages={}, max_tokens={}, temp={}",
            body.model,
            body.messages.len(),
            body.max_tokens,
            body.temperature,
        );

        let start = Instant::now();

        let resp = self
            .client
            .post(OPENAI_URL)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(body)
            .send()
            .await
            .map_err(|e| format!("request failed: {e}"))?;

        let status = resp.status();
        let text = resp
            .text()
            .await
            .map_err(|e| format!("failed to read response: {e}"))?;

        debug!(
            "LLM response: HTTP {} in {:.1}s ({} bytes)",
            status,
            start.elapsed().as_secs_f64(),
            text.len()
        );

        if !status.is_success() {
            return Err(format!("OpenAI API HTTP {status}: {text}"));
        }

        let parsed: RawChatResponse =
            serde_json::from_str(&text).map_err(|e| format!("failed to parse response: {e}"))?;

        if let Some(err) = parsed.error {
            return Err(format!("OpenAI API error: {}", err.message));
        }

        if let Some(ref usage) = parsed.usage {
            debug!(
                "token usage: prompt={}, completion={}, total={}",
                usage.prompt_tokens.unwrap_or(0),
                usage.completion_tokens.unwrap_or(0),
                usage.total_tokens.unwrap_or(0),
            );
        }

        let content = parsed
            .choices
            .and_then(|c| c.into_iter().next())
            .and_then(|c| c.message.content);

        Ok(ChatCompletion {
            content,
            usage: parsed.usage,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_constructors() {
        let sys = Message::system("persona");
        assert_eq!(sys.role, MessageRole::System);
        assert_eq!(sys.content, "persona");

        let user = Message::user("prompt");
        assert_eq!(user.role, MessageRole::User);
    }

    #[test]
    fn request_serializes_lowercase_roles() {
        let req = ChatRequest {
            model: DEFAULT_MODEL.to_string(),
            messages: vec![Message::system("s"), Message::user("u")],
            max_tokens: ANALYSIS_MAX_TOKENS,
            temperature: 0.7,
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["model"], "gpt-4o-mini");
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["role"], "user");
        assert_eq!(json["max_tokens"], 8000);
    }

    #[test]
    fn parses_successful_response() {
        let raw = r###"{
            "choices": [{"message": {"content": "## Root Cause\nflaky test"}}],
            "usage": {"prompt_tokens": 120, "completion_tokens": 40, "total_tokens": 160}
        }"###;
        let parsed: RawChatResponse = serde_json::from_str(raw).unwrap();
        let content = parsed
            .choices
            .and_then(|c| c.into_iter().next())
            .and_then(|c| c.message.content)
            .unwrap();
        assert!(content.contains("flaky test"));
        assert_eq!(parsed.usage.unwrap().total_tokens, Some(160));
    }

    #[test]
    fn parses_api_error_body() {
        let raw = r#"{"error": {"message": "insufficient_quota"}}"#;
        let parsed: RawChatResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.error.unwrap().message, "insufficient_quota");
        assert!(parsed.choices.is_none());
    }
}
