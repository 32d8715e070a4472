//! LLM endpoint, timeout and retry configuration.
//!
//! Maps to the `[llm]` and `[llm.retry]` tables of `casebook.toml`.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Remote completion service settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Responses endpoint URL.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Model identifier sent with every request.
    #[serde(default = "default_model")]
    pub model: String,
    /// Environment variable holding the bearer token.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    /// TCP connect timeout.
    #[serde(default = "default_30")]
    pub connect_timeout_secs: u64,
    /// Whole request/response timeout; covers slow generation.
    #[serde(default = "default_240")]
    pub request_timeout_secs: u64,
    /// Backoff policy around the transport call.
    #[serde(default)]
    pub retry: RetryConfig,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            model: default_model(),
            api_key_env: default_api_key_env(),
            connect_timeout_secs: 30,
            request_timeout_secs: 240,
            retry: RetryConfig::default(),
        }
    }
}

impl LlmConfig {
    /// Connect timeout as a [`Duration`].
    #[must_use]
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    /// Request timeout as a [`Duration`].
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Which transport errors are retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RetryScope {
    /// Every error is retried identically.
    #[default]
    All,
    /// Only timeouts, connect failures and HTTP-level failures are retried.
    Transient,
}

/// Exponential backoff without jitter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Total attempts including the first one.
    #[serde(default = "default_4")]
    pub max_attempts: u32,
    /// Delay before the second attempt.
    #[serde(default = "default_1000")]
    pub initial_delay_ms: u64,
    /// Growth factor applied after every delay.
    #[serde(default = "default_multiplier")]
    pub multiplier: f64,
    /// Error filter.
    #[serde(default)]
    pub scope: RetryScope,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 4,
            initial_delay_ms: 1000,
            multiplier: 2.0,
            scope: RetryScope::All,
        }
    }
}

// ---------------------------------------------------------------------------
// Serde default helpers
// ---------------------------------------------------------------------------

fn default_endpoint() -> String { "https://api.openai.com/v1/responses".to_string() }
fn default_model() -> String { "gpt-4o-mini".to_string() }
fn default_api_key_env() -> String { "OPENAI_API_KEY".to_string() }
fn default_30() -> u64 { 30 }
fn default_240() -> u64 { 240 }
fn default_4() -> u32 { 4 }
fn default_1000() -> u64 { 1000 }
fn default_multiplier() -> f64 { 2.0 }
