//! Configuration for refactory
//!
//! Layered loading, lowest priority first:
//! 1. Built-in defaults
//! 2. User config (`~/.config/refactory/config.toml`)
//! 3. Project config (`refactory.toml` at the repo root)
//! 4. Environment variables for credentials (highest)
//!
//! The API key is never stored in config files; it is read from
//! `REFACTORY_API_KEY` (or `GROQ_API_KEY` as a fallback) at startup.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::warn;

/// File scanning options
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScannerConfig {
    /// Extensions to analyze (with leading dot)
    pub extensions: Vec<String>,
    /// Glob-style patterns excluded from the scan
    pub exclude: Vec<String>,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            extensions: vec![".java".to_string()],
            exclude: vec![
                "**/test/**".to_string(),
                "**/Test*.java".to_string(),
                "**/*Test.java".to_string(),
                "**/*Tests.java".to_string(),
                "**/package-info.java".to_string(),
            ],
        }
    }
}

/// Thresholds for the static smell rules
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    /// God Class: method count above which the class is flagged
    pub max_methods: usize,
    /// God Class: field count above which the class is flagged
    pub max_fields: usize,
    /// Large Class: file line count above which the file is flagged
    pub max_lines: usize,
    /// Large Class: line count above which severity escalates to HIGH
    pub high_lines: usize,
    /// Long Method: body span above which the method is flagged
    pub max_lines_per_method: usize,
    /// Long Parameter List: parameter count above which the method is flagged
    pub max_params: usize,
    /// Feature Envy: external symbol references above which the method is flagged
    pub max_external_refs: usize,
    /// Feature Envy: minimum method span for the rule to apply
    pub min_method_lines: usize,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            max_methods: 15,
            max_fields: 10,
            max_lines: 300,
            high_lines: 500,
            max_lines_per_method: 50,
            max_params: 5,
            max_external_refs: 8,
            min_method_lines: 5,
        }
    }
}

/// Overlapping-window chunking for oversized files
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkingConfig {
    pub window_lines: usize,
    pub overlap_lines: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            window_lines: 500,
            overlap_lines: 50,
        }
    }
}

/// Prompt batching budget
///
/// Free-tier TPM limits are low; reserving output tokens and assuming
/// ~4 chars per token gives ~32K chars of input per batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchingConfig {
    pub budget_chars: usize,
}

impl Default for BatchingConfig {
    fn default() -> Self {
        Self {
            budget_chars: 32_000,
        }
    }
}

/// Completion endpoint and model roster
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// OpenAI-compatible chat completions base URL
    pub base_url: String,
    /// Model roster, primary first; later entries are rate-limit fallbacks
    pub models: Vec<String>,
    pub temperature: f32,
    pub max_output_tokens: u32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.groq.com/openai/v1".to_string(),
            models: vec![
                "llama-3.3-70b-versatile".to_string(),
                "llama-3.1-8b-instant".to_string(),
            ],
            temperature: 0.3,
            max_output_tokens: 32_000,
        }
    }
}

/// Retry, backoff, and pacing policy for LLM calls
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Maximum backoff retries per call (beyond model fallback)
    pub max_retries: u32,
    /// First backoff delay; doubles each retry (30s, 60s, 120s)
    pub base_delay_secs: u64,
    /// Fixed delay before the first attempt of every call
    pub pacing_delay_secs: u64,
    /// Cooldown between batches to let the TPM window reset
    pub cooldown_secs: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay_secs: 30,
            pacing_delay_secs: 1,
            cooldown_secs: 65,
        }
    }
}

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub scanner: ScannerConfig,
    pub thresholds: Thresholds,
    pub chunking: ChunkingConfig,
    pub batching: BatchingConfig,
    pub llm: LlmConfig,
    pub retry: RetryConfig,
}

impl Config {
    /// Load config with priority: project file > user file > defaults.
    ///
    /// A malformed user config is skipped with a warning; a malformed
    /// project config is an error since the user asked for it explicitly.
    pub fn load(repo_root: &Path) -> Result<Self> {
        let mut config = Config::default();

        if let Some(path) = Self::user_config_path().filter(|p| p.exists()) {
            match std::fs::read_to_string(&path) {
                Ok(text) => match toml::from_str::<Config>(&text) {
                    Ok(user) => config = user,
                    Err(e) => warn!("Ignoring malformed user config {}: {}", path.display(), e),
                },
                Err(e) => warn!("Could not read user config {}: {}", path.display(), e),
            }
        }

        let project = repo_root.join("refactory.toml");
        if project.exists() {
            let text = std::fs::read_to_string(&project)
                .with_context(|| format!("reading {}", project.display()))?;
            config = toml::from_str(&text)
                .with_context(|| format!("parsing {}", project.display()))?;
        }

        Ok(config)
    }

    /// User config file location
    pub fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("refactory").join("config.toml"))
    }

    /// API key from the environment. `None` means suggestion generation
    /// cannot run; detection-only commands do not need it.
    pub fn api_key() -> Option<String> {
        std::env::var("REFACTORY_API_KEY")
            .or_else(|_| std::env::var("GROQ_API_KEY"))
            .ok()
            .filter(|k| !k.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_documented_thresholds() {
        let t = Thresholds::default();
        assert_eq!(t.max_methods, 15);
        assert_eq!(t.max_fields, 10);
        assert_eq!(t.max_lines, 300);
        assert_eq!(t.high_lines, 500);
        assert_eq!(t.max_lines_per_method, 50);
        assert_eq!(t.max_params, 5);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: Config = toml::from_str(
            r#"
            [thresholds]
            max_methods = 20

            [llm]
            models = ["test-model"]
            "#,
        )
        .unwrap();

        assert_eq!(config.thresholds.max_methods, 20);
        assert_eq!(config.thresholds.max_params, 5);
        assert_eq!(config.llm.models, vec!["test-model".to_string()]);
        assert_eq!(config.chunking.window_lines, 500);
    }

    #[test]
    fn test_chunk_overlap_smaller_than_window() {
        let c = ChunkingConfig::default();
        assert!(c.overlap_lines < c.window_lines);
    }
}
