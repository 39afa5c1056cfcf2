//! OpenAI-compatible chat completion client
//!
//! Sync HTTP via ureq — no async runtime needed. Status codes are handled
//! by hand so rate limiting can be told apart from other failures.

use crate::ai::{AiError, AiResult};
use crate::config::{Config, LlmConfig};
use serde::{Deserialize, Serialize};

/// One completion call: everything the endpoint needs apart from the model.
#[derive(Debug, Clone)]
pub struct CompletionRequest<'a> {
    pub system: &'a str,
    pub prompt: &'a str,
    pub temperature: f32,
    pub max_tokens: u32,
}

/// Seam between the retry layer and the wire. Tests substitute scripted
/// implementations; production uses [`HttpCompletionClient`].
pub trait CompletionApi {
    fn complete(&self, model: &str, request: &CompletionRequest) -> AiResult<String>;
}

/// Chat completion client for OpenAI-compatible endpoints (Groq by default)
pub struct HttpCompletionClient {
    base_url: String,
    api_key: String,
    agent: ureq::Agent,
}

fn make_agent() -> ureq::Agent {
    ureq::config::Config::builder()
        .http_status_as_error(false) // status codes handled below
        .timeout_global(Some(std::time::Duration::from_secs(120))) // LLM calls can be slow
        .build()
        .new_agent()
}

impl HttpCompletionClient {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            agent: make_agent(),
        }
    }

    pub fn from_env(llm: &LlmConfig) -> AiResult<Self> {
        let api_key = Config::api_key().ok_or_else(|| AiError::MissingApiKey {
            env_var: "REFACTORY_API_KEY".to_string(),
        })?;
        Ok(Self::new(llm.base_url.clone(), api_key))
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

impl CompletionApi for HttpCompletionClient {
    fn complete(&self, model: &str, request: &CompletionRequest) -> AiResult<String> {
        let body = ChatRequest {
            model: model.to_string(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: request.system.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: request.prompt.to_string(),
                },
            ],
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        };

        let response = self
            .agent
            .post(&self.endpoint())
            .header("Content-Type", "application/json")
            .header("Authorization", &format!("Bearer {}", self.api_key))
            .send_json(&body)
            .map_err(|e| AiError::Api {
                status: 0,
                message: e.to_string(),
            })?;

        let status = response.status().as_u16();
        if status >= 400 {
            let error_text = response.into_body().read_to_string().unwrap_or_default();
            if status == 429 {
                return Err(AiError::RateLimited {
                    message: error_text,
                });
            }
            return Err(AiError::Api {
                status,
                message: error_text,
            });
        }

        let resp: ChatResponse = response
            .into_body()
            .read_json()
            .map_err(|e| AiError::MalformedResponse(e.to_string()))?;

        resp.choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| AiError::MalformedResponse("no response choices".to_string()))
    }
}

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    content: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_normalizes_trailing_slash() {
        let client = HttpCompletionClient::new("https://api.groq.com/openai/v1/", "key");
        assert_eq!(
            client.endpoint(),
            "https://api.groq.com/openai/v1/chat/completions"
        );
    }
}
