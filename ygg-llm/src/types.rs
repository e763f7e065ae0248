//! Core types for LLM requests and responses.

use serde::{Deserialize, Serialize};

/// Sampling settings shared by every request of a run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sampling {
    /// Temperature (0.0 = deterministic, 1.0 = creative).
    pub temperature: f32,
    /// Nucleus sampling mass.
    pub top_p: f32,
    /// Maximum tokens to generate.
    pub max_tokens: u32,
}

impl Default for Sampling {
    /// Low-temperature settings suited to extraction tasks.
    fn default() -> Self {
        Self {
            temperature: 0.2,
            top_p: 0.7,
            max_tokens: 4096,
        }
    }
}

/// A request to the LLM.
#[derive(Debug, Clone, Serialize)]
pub struct LlmRequest {
    /// System prompt (role and output rules).
    pub system: String,
    /// User prompt (the material to process).
    pub user: String,
    /// Sampling settings.
    pub sampling: Sampling,
    /// Request timeout in milliseconds.
    pub timeout_ms: u64,
}

impl LlmRequest {
    /// Create a request with default sampling and a 60 s timeout.
    #[must_use]
    pub fn new(system: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            system: system.into(),
            user: user.into(),
            sampling: Sampling::default(),
            timeout_ms: 60_000,
        }
    }

    /// Set the sampling settings.
    #[must_use]
    pub fn with_sampling(mut self, sampling: Sampling) -> Self {
        self.sampling = sampling;
        self
    }

    /// Set the timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }
}

/// A response from the LLM.
#[derive(Debug, Clone, Deserialize)]
pub struct LlmResponse {
    /// The generated text.
    pub text: String,
    /// How many tokens were generated.
    pub tokens_generated: u32,
    /// Latency in milliseconds.
    pub latency_ms: u64,
    /// Which model was used.
    pub model: String,
}
