//! LLM-backed refactoring suggestions
//!
//! This module turns detected smells into refactoring suggestions by
//! calling an OpenAI-compatible chat completion API. Uses BYOK (bring
//! your own key) - the key is read from the environment.
//!
//! # Environment Variables
//!
//! - `REFACTORY_API_KEY`: preferred key
//! - `GROQ_API_KEY`: fallback for the default Groq endpoint
//!
//! # Example
//!
//! ```rust,ignore
//! use refactory::ai::{HttpCompletionClient, ResilientCaller};
//!
//! let client = HttpCompletionClient::from_env(&config.llm)?;
//! let caller = ResilientCaller::new(client, config.llm.models.clone(), &config.retry);
//! let raw = caller.call(&prompt)?;
//! ```

mod caller;
mod client;
mod parser;
mod prompts;

pub use caller::{Pacer, ResilientCaller, ThreadPacer};
pub use client::{CompletionApi, CompletionRequest, HttpCompletionClient};
pub use parser::ResponseParser;
pub use prompts::{PromptBuilder, SmellEntry};

use thiserror::Error;

/// Errors that can occur while requesting or decoding suggestions
#[derive(Error, Debug)]
pub enum AiError {
    #[error("Missing API key: set {env_var} to call the suggestion API")]
    MissingApiKey { env_var: String },

    #[error("Rate limited by API: {message}")]
    RateLimited { message: String },

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("Failed to parse API response: {0}")]
    MalformedResponse(String),

    #[error("Call failed after {attempts} attempts: {message}")]
    CallFailed { attempts: u32, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type AiResult<T> = Result<T, AiError>;

/// Rate-limit vocabulary used by providers that do not return a clean 429
const RATE_LIMIT_MARKERS: &[&str] = &[
    "rate limit",
    "quota",
    "resource exhausted",
    "too many requests",
    "429",
];

impl AiError {
    /// True when the error signals throttling and a retry can succeed.
    pub fn is_rate_limit(&self) -> bool {
        match self {
            AiError::RateLimited { .. } => true,
            AiError::Api { status, message } => {
                *status == 429 || {
                    let lower = message.to_lowercase();
                    RATE_LIMIT_MARKERS.iter().any(|m| lower.contains(m))
                }
            }
            _ => false,
        }
    }
}
