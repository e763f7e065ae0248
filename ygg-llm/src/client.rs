//! LLM Client: unified interface for Ollama and OpenAI-compatible backends.

use std::time::{Duration, Instant};

use reqwest::{Client, RequestBuilder};
use serde_json::{Value, json};
use tracing::{debug, warn};

use crate::error::{LlmError, Result};
use crate::types::{LlmRequest, LlmResponse};

/// Provider backend for LLM inference.
#[derive(Debug, Clone)]
pub enum LlmProvider {
    /// Ollama running locally.
    Ollama {
        /// Server root, e.g. `http://localhost:11434`.
        base_url: String,
    },
    /// OpenAI-compatible chat completions API (NVIDIA NIM, Together, vLLM, ...).
    OpenAiCompatible {
        /// Server root without the `/v1` suffix.
        base_url: String,
        /// Bearer token.
        api_key: String,
    },
    /// No LLM available; every call fails with [`LlmError::Unavailable`].
    None,
}

impl LlmProvider {
    /// Build a provider from its configured name.
    ///
    /// # Errors
    /// Returns [`LlmError::ConfigError`] for an unknown provider name.
    pub fn from_name(name: &str, base_url: &str, api_key: Option<String>) -> Result<Self> {
        let base_url = base_url.trim_end_matches('/').to_string();
        match name.to_ascii_lowercase().as_str() {
            "ollama" => Ok(Self::Ollama { base_url }),
            "openai" | "openai-compatible" => Ok(Self::OpenAiCompatible {
                base_url,
                api_key: api_key.unwrap_or_default(),
            }),
            "none" | "" => Ok(Self::None),
            other => Err(LlmError::ConfigError(format!("unknown provider '{other}'"))),
        }
    }
}

/// The LLM client that routes requests to the configured backend.
#[derive(Debug)]
pub struct LlmClient {
    provider: LlmProvider,
    http: Client,
    model: String,
    max_retries: u32,
}

impl LlmClient {
    /// Create a new LLM client.
    #[must_use]
    pub fn new(provider: LlmProvider, model: impl Into<String>, max_retries: u32) -> Self {
        Self {
            provider,
            http: Client::new(),
            model: model.into(),
            max_retries,
        }
    }

    /// Create a client with no LLM backend.
    #[must_use]
    pub fn none() -> Self {
        Self::new(LlmProvider::None, String::new(), 0)
    }

    /// Model name sent with every request.
    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Check if the LLM client has a backend configured.
    #[must_use]
    pub fn is_available(&self) -> bool {
        !matches!(self.provider, LlmProvider::None)
    }

    /// Generate a response from the LLM.
    ///
    /// # Errors
    /// Returns `Err` if the LLM is unavailable or all retries fail. The caller
    /// decides which default to fall back to.
    pub async fn generate(&self, request: &LlmRequest) -> Result<LlmResponse> {
        match &self.provider {
            LlmProvider::None => Err(LlmError::Unavailable("No LLM provider configured".into())),
            LlmProvider::Ollama { base_url } => {
                let url = format!("{base_url}/api/generate");
                let body = json!({
                    "model": self.model,
                    "prompt": format!("{}\n\n{}", request.system, request.user),
                    "stream": false,
                    "options": {
                        "temperature": request.sampling.temperature,
                        "top_p": request.sampling.top_p,
                        "num_predict": request.sampling.max_tokens,
                    }
                });
                self.send_with_retries("Ollama", request, || self.http.post(&url).json(&body), |json| {
                    (
                        json["response"].as_str().unwrap_or_default().to_string(),
                        json["eval_count"].as_u64().unwrap_or(0),
                    )
                })
                .await
            }
            LlmProvider::OpenAiCompatible { base_url, api_key } => {
                let url = format!("{base_url}/v1/chat/completions");
                let body = json!({
                    "model": self.model,
                    "messages": [
                        { "role": "system", "content": request.system },
                        { "role": "user", "content": request.user },
                    ],
                    "max_tokens": request.sampling.max_tokens,
                    "temperature": request.sampling.temperature,
                    "top_p": request.sampling.top_p,
                });
                self.send_with_retries(
                    "OpenAI",
                    request,
                    || self.http.post(&url).bearer_auth(api_key).json(&body),
                    |json| {
                        (
                            json["choices"][0]["message"]["content"]
                                .as_str()
                                .unwrap_or_default()
                                .to_string(),
                            json["usage"]["completion_tokens"].as_u64().unwrap_or(0),
                        )
                    },
                )
                .await
            }
        }
    }

    /// Send a request up to `max_retries + 1` times, extracting
    /// `(text, completion tokens)` from the first successful JSON body.
    async fn send_with_retries(
        &self,
        backend: &str,
        request: &LlmRequest,
        build: impl Fn() -> RequestBuilder,
        extract: impl Fn(&Value) -> (String, u64),
    ) -> Result<LlmResponse> {
        let mut last_error = String::new();
        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                debug!(
                    "Retrying {backend} call (attempt {}/{})",
                    attempt + 1,
                    self.max_retries + 1
                );
            }

            let start = Instant::now();
            let result = build()
                .timeout(Duration::from_millis(request.timeout_ms))
                .send()
                .await;
            let latency_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);

            match result {
                Ok(resp) if resp.status().is_success() => {
                    let json: Value = resp
                        .json()
                        .await
                        .map_err(|e| LlmError::ParseError(e.to_string()))?;
                    let (text, tokens) = extract(&json);
                    debug!(backend, latency_ms, tokens, "LLM call complete");
                    return Ok(LlmResponse {
                        text,
                        tokens_generated: u32::try_from(tokens).unwrap_or(u32::MAX),
                        latency_ms,
                        model: self.model.clone(),
                    });
                }
                Ok(resp) => {
                    last_error = format!(
                        "HTTP {}: {}",
                        resp.status(),
                        resp.text().await.unwrap_or_default()
                    );
                    warn!("{backend} returned error: {last_error}");
                }
                Err(e) => {
                    last_error = e.to_string();
                    if e.is_timeout() {
                        warn!("{backend} request timed out after {}ms", request.timeout_ms);
                    } else {
                        warn!("{backend} request failed: {last_error}");
                    }
                }
            }
        }

        Err(LlmError::RetriesExhausted {
            attempts: self.max_retries + 1,
            last_error,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_names() {
        assert!(matches!(
            LlmProvider::from_name("Ollama", "http://localhost:11434/", None),
            Ok(LlmProvider::Ollama { base_url }) if base_url == "http://localhost:11434"
        ));
        assert!(matches!(
            LlmProvider::from_name("openai", "https://integrate.api.nvidia.com", Some("k".into())),
            Ok(LlmProvider::OpenAiCompatible { api_key, .. }) if api_key == "k"
        ));
        assert!(matches!(LlmProvider::from_name("none", "", None), Ok(LlmProvider::None)));
        assert!(matches!(
            LlmProvider::from_name("llamafile", "", None),
            Err(LlmError::ConfigError(_))
        ));
    }

    #[tokio::test]
    async fn none_provider_is_unavailable() {
        let client = LlmClient::none();
        assert!(!client.is_available());
        let err = client
            .generate(&LlmRequest::new("system", "user"))
            .await
            .expect_err("no backend");
        assert!(matches!(err, LlmError::Unavailable(_)));
    }

    #[tokio::test]
    async fn unreachable_server_exhausts_retries() {
        let provider = LlmProvider::Ollama {
            base_url: "http://127.0.0.1:9".into(),
        };
        let client = LlmClient::new(provider, "tiny", 1);
        let err = client
            .generate(&LlmRequest::new("s", "u").with_timeout(500))
            .await
            .expect_err("nothing listens on the discard port");
        assert!(matches!(err, LlmError::RetriesExhausted { attempts: 2, .. }));
    }
}
