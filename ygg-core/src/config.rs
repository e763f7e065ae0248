//! Configuration for the Yggdrasil memory engine.
//!
//! Maps directly to `ygg.toml`. Every field has a default, so an empty file
//! (or no file at all) yields the reference behaviour.

use std::collections::BTreeMap;
use std::ops::Range;

use serde::{Deserialize, Serialize};

/// Top-level configuration, loadable from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct YggConfig {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,
    /// Nearest-neighbour prediction.
    #[serde(default)]
    pub predictor: PredictorConfig,
    /// Contradiction-driven learning thresholds and steps.
    #[serde(default)]
    pub learning: LearningConfig,
    /// Bias drift reporting.
    #[serde(default)]
    pub bias: BiasConfig,
    /// Attachment graph and entity resolution.
    #[serde(default)]
    pub attachment: AttachmentConfig,
    /// LLM collaborator settings.
    #[serde(default)]
    pub llm: LlmConfig,
    /// Two-phase run layout.
    #[serde(default)]
    pub run: RunConfig,
}

impl YggConfig {
    /// Load configuration from a TOML string.
    ///
    /// # Errors
    /// Returns `YggError::Config` if the TOML is invalid.
    pub fn from_toml(toml_str: &str) -> crate::error::Result<Self> {
        toml::from_str(toml_str).map_err(|e| crate::YggError::Config(e.to_string()))
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &std::path::Path) -> crate::error::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }
}

// ---------------------------------------------------------------------------
// Sub-configs
// ---------------------------------------------------------------------------

/// General system settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Log level used when `RUST_LOG` is unset: trace, debug, info, warn, error.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// Nearest-neighbour predictor settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictorConfig {
    /// Number of neighbours that vote.
    #[serde(default = "default_5_usize")]
    pub top_k: usize,
}

impl Default for PredictorConfig {
    fn default() -> Self {
        Self { top_k: 5 }
    }
}

/// Error bands and adjustment steps for the learner.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LearningConfig {
    /// Errors below this are "low" and reinforce memory.
    #[serde(default = "default_0_2")]
    pub low_error: f64,
    /// Errors at or above this are "high".
    #[serde(default = "default_0_5")]
    pub high_error: f64,
    /// How many of the most similar memories a learning step may adjust.
    #[serde(default = "default_5_usize")]
    pub top_similar: usize,
    /// Intensity added on low error.
    #[serde(default = "default_0_05")]
    pub reinforce_step: f64,
    /// Intensity removed on high error with a matching label.
    #[serde(default = "default_0_2")]
    pub decay_step: f64,
}

impl Default for LearningConfig {
    fn default() -> Self {
        Self {
            low_error: 0.2,
            high_error: 0.5,
            top_similar: 5,
            reinforce_step: 0.05,
            decay_step: 0.2,
        }
    }
}

/// Bias drift report settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BiasConfig {
    /// Number of most recent timeline entries compared against the full history.
    #[serde(default = "default_5_usize")]
    pub recent_window: usize,
    /// Ambient bias lines sampled into a summary.
    #[serde(default = "default_2_usize")]
    pub ambient_bias_samples: usize,
    /// Ambient contradiction lines sampled into a summary.
    #[serde(default = "default_1_usize")]
    pub ambient_contradiction_samples: usize,
}

impl Default for BiasConfig {
    fn default() -> Self {
        Self {
            recent_window: 5,
            ambient_bias_samples: 2,
            ambient_contradiction_samples: 1,
        }
    }
}

/// Attachment graph settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttachmentConfig {
    /// The agent's own canonical name; never receives an edge.
    #[serde(default = "default_ego")]
    pub ego: String,
    /// Minimum edit-distance ratio for a fuzzy alias match.
    #[serde(default = "default_0_8")]
    pub similarity_threshold: f64,
    /// Divisor applied to `intensity × valence`.
    #[serde(default = "default_10_0")]
    pub valence_scale: f64,
    /// Lower-case alias → canonical entity name.
    #[serde(default = "default_aliases")]
    pub aliases: BTreeMap<String, String>,
}

impl Default for AttachmentConfig {
    fn default() -> Self {
        Self {
            ego: default_ego(),
            similarity_threshold: 0.8,
            valence_scale: 10.0,
            aliases: default_aliases(),
        }
    }
}

/// LLM collaborator configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Provider: "ollama", "openai", "none".
    #[serde(default = "default_openai")]
    pub provider: String,
    /// Base URL for the LLM API.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Environment variable holding the API key (OpenAI-compatible only).
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    /// Model name.
    #[serde(default = "default_model")]
    pub model: String,
    /// Sampling temperature.
    #[serde(default = "default_0_2_f32")]
    pub temperature: f32,
    /// Nucleus sampling mass.
    #[serde(default = "default_0_7_f32")]
    pub top_p: f32,
    /// Maximum tokens per response.
    #[serde(default = "default_4096")]
    pub max_tokens: u32,
    /// Hard timeout for any LLM call in milliseconds.
    #[serde(default = "default_60000")]
    pub request_timeout_ms: u64,
    /// Retries after the first failed attempt.
    #[serde(default = "default_2")]
    pub max_retries: u32,
    /// Directory of TOML prompt overrides; built-in prompts when unset.
    #[serde(default)]
    pub prompt_dir: Option<String>,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: default_openai(),
            base_url: default_base_url(),
            api_key_env: default_api_key_env(),
            model: default_model(),
            temperature: 0.2,
            top_p: 0.7,
            max_tokens: 4096,
            request_timeout_ms: 60_000,
            max_retries: 2,
            prompt_dir: None,
        }
    }
}

/// Which journal entries feed each phase.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    /// Entries used for model seeding (phase 1).
    #[serde(default = "default_seed_entries")]
    pub seed_entries: Range<usize>,
    /// Entries used for contradiction-driven learning (phase 2).
    #[serde(default = "default_learn_entries")]
    pub learn_entries: Range<usize>,
    /// Directory the final state is exported to.
    #[serde(default = "default_results_dir")]
    pub results_dir: String,
    /// Number of strongest attachments logged after each phase.
    #[serde(default = "default_10_usize")]
    pub report_attachments: usize,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            seed_entries: default_seed_entries(),
            learn_entries: default_learn_entries(),
            results_dir: default_results_dir(),
            report_attachments: 10,
        }
    }
}

// ---------------------------------------------------------------------------
// Serde default helpers
// ---------------------------------------------------------------------------

fn default_log_level() -> String { "info".to_string() }
fn default_ego() -> String { "Anne Frank".to_string() }
fn default_openai() -> String { "openai".to_string() }
fn default_base_url() -> String { "https://integrate.api.nvidia.com".to_string() }
fn default_api_key_env() -> String { "YGG_API_KEY".to_string() }
fn default_model() -> String { "meta/llama-3.3-70b-instruct".to_string() }
fn default_results_dir() -> String { "results".to_string() }
fn default_seed_entries() -> Range<usize> { 1..8 }
fn default_learn_entries() -> Range<usize> { 8..13 }
fn default_0_05() -> f64 { 0.05 }
fn default_0_2() -> f64 { 0.2 }
fn default_0_5() -> f64 { 0.5 }
fn default_0_8() -> f64 { 0.8 }
fn default_10_0() -> f64 { 10.0 }
fn default_0_2_f32() -> f32 { 0.2 }
fn default_0_7_f32() -> f32 { 0.7 }
fn default_1_usize() -> usize { 1 }
fn default_2_usize() -> usize { 2 }
fn default_5_usize() -> usize { 5 }
fn default_10_usize() -> usize { 10 }
fn default_2() -> u32 { 2 }
fn default_4096() -> u32 { 4096 }
fn default_60000() -> u64 { 60_000 }

/// Alias table for the diary corpus: lower-case surface form → canonical name.
fn default_aliases() -> BTreeMap<String, String> {
    [
        ("father", "Otto Frank"),
        ("daddy", "Otto Frank"),
        ("pim", "Otto Frank"),
        ("mother", "Edith Frank"),
        ("mommy", "Edith Frank"),
        ("mama", "Edith Frank"),
        ("margot", "Margot Frank"),
        ("sister", "Margot Frank"),
        ("peter", "Peter van Pels"),
        ("peter van daan", "Peter van Pels"),
        ("mr. dussel", "Fritz Pfeffer"),
        ("albert dussel", "Fritz Pfeffer"),
        ("mrs. van daan", "Auguste van Pels"),
        ("auguste", "Auguste van Pels"),
        ("mr. van daan", "Hermann van Pels"),
        ("hermann", "Hermann van Pels"),
        ("moortje", "Moortje"),
        ("cat", "Moortje"),
        ("grammy", "Grandmother Frank"),
        ("grandmother", "Grandmother Frank"),
        ("kitty", "Diary"),
        ("you", "Diary"),
        ("anne", "Anne Frank"),
        ("i", "Anne Frank"),
        ("me", "Anne Frank"),
        ("my", "Anne Frank"),
        ("bep", "Bep Voskuijl"),
        ("miep", "Miep Gies"),
        ("mr. kraler", "Victor Kugler"),
        ("mr. koophuis", "Johannes Kleiman"),
        ("the annex", "Secret Annex"),
        ("our hiding place", "Secret Annex"),
    ]
    .into_iter()
    .map(|(alias, canonical)| (alias.to_string(), canonical.to_string()))
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_gives_defaults() {
        let config = YggConfig::from_toml("").expect("parse");
        assert_eq!(config.predictor.top_k, 5);
        assert!((config.learning.low_error - 0.2).abs() < f64::EPSILON);
        assert!((config.learning.high_error - 0.5).abs() < f64::EPSILON);
        assert_eq!(config.attachment.ego, "Anne Frank");
        assert_eq!(config.attachment.aliases.get("pim").map(String::as_str), Some("Otto Frank"));
        assert_eq!(config.run.seed_entries, 1..8);
        assert_eq!(config.run.learn_entries, 8..13);
    }

    #[test]
    fn partial_sections_override() {
        let config = YggConfig::from_toml(
            r#"
            [learning]
            low_error = 0.1

            [run]
            seed_entries = { start = 0, end = 3 }

            [attachment]
            ego = "Robin"
            aliases = { "me" = "Robin", "mum" = "Alice" }
            "#,
        )
        .expect("parse");
        assert!((config.learning.low_error - 0.1).abs() < f64::EPSILON);
        assert!((config.learning.high_error - 0.5).abs() < f64::EPSILON);
        assert_eq!(config.run.seed_entries, 0..3);
        assert_eq!(config.attachment.aliases.len(), 2);
        assert_eq!(config.attachment.ego, "Robin");
    }

    #[test]
    fn invalid_toml_is_a_config_error() {
        let err = YggConfig::from_toml("[learning\nlow_error = ").expect_err("invalid");
        assert!(matches!(err, crate::YggError::Config(_)));
    }
}
