//! OpenAI chat-completion client used to condense extracts.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

const OPENAI_API_URL: &str = "https://api.openai.com/v1/chat/completions";

const SUMMARY_MODEL: &str = "gpt-3.5-turbo";
const SUMMARY_MAX_TOKENS: u32 = 150;
const SYSTEM_PROMPT: &str = "You are a helpful assistant that provides concise summaries.";

#[derive(Debug)]
pub enum CondenseError {
    Failed(String),
}

impl std::fmt::Display for CondenseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Failed(e) => write!(f, "condense failed: {e}"),
        }
    }
}

impl std::error::Error for CondenseError {}

/// Condensation seam, mocked in router tests.
#[async_trait]
pub trait Condense {
    async fn condense(&self, text: &str) -> Result<String, CondenseError>;
}

#[derive(Serialize)]
struct ApiRequest {
    model: &'static str,
    max_tokens: u32,
    messages: Vec<ApiMessage>,
}

#[derive(Serialize)]
struct ApiMessage {
    role: &'static str,
    content: String,
}

#[derive(Deserialize)]
struct ApiResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: String,
}

pub struct OpenAiClient {
    api_key: String,
    http: reqwest::Client,
}

impl OpenAiClient {
    pub fn new(api_key: String) -> Self {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(60))
            .build()
            .expect("Failed to build HTTP client");

        Self { api_key, http }
    }

    fn build_request(text: &str) -> ApiRequest {
        ApiRequest {
            model: SUMMARY_MODEL,
            max_tokens: SUMMARY_MAX_TOKENS,
            messages: vec![
                ApiMessage {
                    role: "system",
                    content: SYSTEM_PROMPT.to_string(),
                },
                ApiMessage {
                    role: "user",
                    content: format!("Summarize the following text: {text}"),
                },
            ],
        }
    }
}

#[async_trait]
impl Condense for OpenAiClient {
    /// One completion call, single attempt. The first choice's content is
    /// returned verbatim.
    async fn condense(&self, text: &str) -> Result<String, CondenseError> {
        let response = self
            .http
            .post(OPENAI_API_URL)
            .bearer_auth(&self.api_key)
            .json(&Self::build_request(text))
            .send()
            .await
            .map_err(|e| CondenseError::Failed(format!("HTTP error: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(CondenseError::Failed(format!("{status}: {body}")));
        }

        let api_response: ApiResponse = response
            .json()
            .await
            .map_err(|e| CondenseError::Failed(format!("Parse error: {e}")))?;

        api_response
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| CondenseError::Failed("empty choices".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_shape() {
        let request = serde_json::to_value(OpenAiClient::build_request("German physicist..."))
            .unwrap();

        assert_eq!(request["model"], "gpt-3.5-turbo");
        assert_eq!(request["max_tokens"], 150);

        let messages = request["messages"].as_array().unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0]["role"], "system");
        assert_eq!(messages[0]["content"], SYSTEM_PROMPT);
        assert_eq!(messages[1]["role"], "user");
        assert_eq!(
            messages[1]["content"],
            "Summarize the following text: German physicist..."
        );
    }

    #[test]
    fn test_user_message_contains_literal_extract() {
        let extract = "Rust is a multi-paradigm language.\nIt is fast.";
        let request = OpenAiClient::build_request(extract);
        assert!(request.messages[1].content.contains(extract));
    }

    #[test]
    fn test_parses_first_choice_content() {
        let response: ApiResponse = serde_json::from_str(
            r#"{
                "choices": [
                    {"message": {"role": "assistant", "content": "A short summary."}},
                    {"message": {"role": "assistant", "content": "Ignored."}}
                ]
            }"#,
        )
        .unwrap();

        let first = response.choices.into_iter().next().unwrap();
        assert_eq!(first.message.content, "A short summary.");
    }
}
