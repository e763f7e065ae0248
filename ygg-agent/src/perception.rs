//! Perception: the collaborator that turns text into events, tags and entities.
//!
//! The orchestrator only sees the [`Perception`] trait. [`LlmPerception`]
//! backs it with a language model; tests back it with scripted answers.
//! Implementations never fail: unusable collaborator output becomes the
//! defined default for that call.

use tracing::{debug, warn};
use ygg_core::config::LlmConfig;
use ygg_core::{EmotionTag, Event, MemoryId, RawEvent};
use ygg_llm::parse::{extract_json_object, extract_tag_object, parse_entity_list};
use ygg_llm::prompt::{PromptEngine, PromptId};
use ygg_llm::{LlmClient, LlmError, LlmProvider, LlmRequest, Sampling};

/// Source of structured observations for the learning loop.
#[allow(async_fn_in_trait)]
pub trait Perception {
    /// Encode one sentence as an event carrying `id`. `None` skips the sentence.
    async fn encode(&self, sentence: &str, id: &MemoryId) -> Option<Event>;

    /// The ground-truth emotion for `event`. Always yields a tag.
    async fn tag(&self, event: &Event) -> EmotionTag;

    /// Entities mentioned in `text`, as written.
    async fn entities(&self, text: &str) -> Vec<String>;
}

// ---------------------------------------------------------------------------
// LLM-backed perception
// ---------------------------------------------------------------------------

/// [`Perception`] over an [`LlmClient`] and the collaborator prompts.
#[derive(Debug)]
pub struct LlmPerception {
    client: LlmClient,
    prompts: PromptEngine,
    sampling: Sampling,
    timeout_ms: u64,
}

impl LlmPerception {
    /// Assemble from parts.
    #[must_use]
    pub fn new(client: LlmClient, prompts: PromptEngine, sampling: Sampling, timeout_ms: u64) -> Self {
        Self {
            client,
            prompts,
            sampling,
            timeout_ms,
        }
    }

    /// Build the client and prompt set described by `config`.
    ///
    /// The API key is read from the environment variable named by
    /// `api_key_env`; an unset variable leaves the key empty.
    ///
    /// # Errors
    /// Returns [`LlmError::ConfigError`] for an unknown provider or an
    /// unreadable prompt override.
    pub fn from_config(config: &LlmConfig) -> Result<Self, LlmError> {
        let api_key = std::env::var(&config.api_key_env).ok();
        if api_key.is_none() && config.provider.eq_ignore_ascii_case("openai") {
            warn!(var = %config.api_key_env, "API key variable is not set");
        }
        let provider = LlmProvider::from_name(&config.provider, &config.base_url, api_key)?;
        let prompts = match &config.prompt_dir {
            Some(dir) => PromptEngine::with_overrides(dir)?,
            None => PromptEngine::builtin(),
        };
        let sampling = Sampling {
            temperature: config.temperature,
            top_p: config.top_p,
            max_tokens: config.max_tokens,
        };
        Ok(Self::new(
            LlmClient::new(provider, &config.model, config.max_retries),
            prompts,
            sampling,
            config.request_timeout_ms,
        ))
    }

    /// Render `id` and send it, returning the response text.
    async fn ask(&self, id: PromptId, vars: &[(&str, &str)]) -> Result<String, LlmError> {
        let (system, user) = self.prompts.render(id, vars)?;
        let request = LlmRequest::new(system, user)
            .with_sampling(self.sampling)
            .with_timeout(self.timeout_ms);
        let response = self.client.generate(&request).await?;
        debug!(prompt = %id, latency_ms = response.latency_ms, "collaborator answered");
        Ok(response.text)
    }
}

impl Perception for LlmPerception {
    async fn encode(&self, sentence: &str, id: &MemoryId) -> Option<Event> {
        let text = match self
            .ask(
                PromptId::EventEncoding,
                &[("event_id", id.as_str()), ("sentence", sentence)],
            )
            .await
        {
            Ok(text) => text,
            Err(e) => {
                warn!(%id, "event encoding failed, skipping sentence: {e}");
                return None;
            }
        };
        decode_event(&text, id)
    }

    async fn tag(&self, event: &Event) -> EmotionTag {
        let event_json = match serde_json::to_string_pretty(event) {
            Ok(json) => json,
            Err(e) => {
                warn!(id = %event.id, "could not serialize event for tagging: {e}");
                return EmotionTag::fallback(event.id.clone());
            }
        };
        match self
            .ask(
                PromptId::EmotionTagging,
                &[("event_json", &event_json), ("event_id", event.id.as_str())],
            )
            .await
        {
            Ok(text) => decode_tag(&text, &event.id),
            Err(e) => {
                warn!(id = %event.id, "emotion tagging failed, using fallback tag: {e}");
                EmotionTag::fallback(event.id.clone())
            }
        }
    }

    async fn entities(&self, text: &str) -> Vec<String> {
        match self.ask(PromptId::EntityExtraction, &[("text", text)]).await {
            Ok(response) => parse_entity_list(&response),
            Err(e) => {
                warn!("entity extraction failed: {e}");
                Vec::new()
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Response decoding
// ---------------------------------------------------------------------------

/// Decode an encoder response into an event carrying `id`.
///
/// The id is always the one requested; whatever the model echoed is
/// discarded so ids stay sequential and unique.
#[must_use]
pub fn decode_event(text: &str, id: &MemoryId) -> Option<Event> {
    let value = match extract_json_object(text) {
        Ok(value) => value,
        Err(e) => {
            warn!(%id, "no event in encoder output: {e}");
            return None;
        }
    };
    let mut raw: RawEvent = match serde_json::from_value(value) {
        Ok(raw) => raw,
        Err(e) => {
            warn!(%id, "malformed event fields: {e}");
            return None;
        }
    };
    raw.id = Some(id.as_str().to_string());
    match Event::try_from(raw) {
        Ok(event) => Some(event),
        Err(e) => {
            warn!(%id, "rejected event: {e}");
            None
        }
    }
}

/// Decode a tagger response, substituting defaults for anything unusable.
#[must_use]
pub fn decode_tag(text: &str, id: &MemoryId) -> EmotionTag {
    match extract_tag_object(text) {
        Ok(value) => {
            let label = value["Assigned Emotion"].as_str();
            let intensity = value["Emotion Intensity"].as_f64();
            if label.is_none() || intensity.is_none() {
                warn!(%id, "incomplete tag, filling defaults");
            }
            EmotionTag::validated(id.clone(), label, intensity)
        }
        Err(e) => {
            warn!(%id, "no tag in tagger output, using fallback: {e}");
            EmotionTag::fallback(id.clone())
        }
    }
}
