//! Episodic Memory: "What happened, and how it felt"
//!
//! A committed record pairing an experienced [`Event`] with the emotion it
//! was tagged with. Every field except the intensity is fixed at creation.

use serde::{Deserialize, Serialize};

use crate::event::{Event, concept_of};
use crate::types::{Emotion, EmotionTag, MemoryId, TemporalContext};

/// A single episodic memory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Memory {
    #[serde(rename = "Event ID")]
    id: MemoryId,
    #[serde(rename = "Sensory Features")]
    sensory_features: Vec<String>,
    #[serde(rename = "Temporal Context")]
    temporal_context: Option<TemporalContext>,
    #[serde(rename = "Social Context")]
    social_context: String,
    #[serde(rename = "Raw Text")]
    raw_text: String,
    #[serde(rename = "Assigned Emotion")]
    emotion: Emotion,
    #[serde(rename = "Emotion Intensity")]
    intensity: f64,
}

impl Memory {
    /// Combine an event with its tag. The memory takes the event's identifier.
    #[must_use]
    pub fn from_event(event: &Event, tag: &EmotionTag) -> Self {
        Self::with_id(event.id.clone(), event, tag)
    }

    /// Combine an event with a tag under a different identifier, as done for
    /// memories inserted during learning.
    #[must_use]
    pub fn with_id(id: MemoryId, event: &Event, tag: &EmotionTag) -> Self {
        Self {
            id,
            sensory_features: event.sensory_features.clone(),
            temporal_context: event.temporal_context,
            social_context: event.social_context.clone(),
            raw_text: event.raw_text.clone(),
            emotion: tag.emotion,
            intensity: tag.intensity.clamp(0.0, 1.0),
        }
    }

    /// Identifier.
    #[must_use]
    pub fn id(&self) -> &MemoryId {
        &self.id
    }

    /// Sensory descriptors.
    #[must_use]
    pub fn sensory_features(&self) -> &[String] {
        &self.sensory_features
    }

    /// Temporal context, if recorded.
    #[must_use]
    pub fn temporal_context(&self) -> Option<&TemporalContext> {
        self.temporal_context.as_ref()
    }

    /// Social setting.
    #[must_use]
    pub fn social_context(&self) -> &str {
        &self.social_context
    }

    /// Source sentence.
    #[must_use]
    pub fn raw_text(&self) -> &str {
        &self.raw_text
    }

    /// Assigned emotion. Never changes after creation.
    #[must_use]
    pub fn emotion(&self) -> Emotion {
        self.emotion
    }

    /// Current intensity in [0, 1].
    #[must_use]
    pub fn intensity(&self) -> f64 {
        self.intensity
    }

    /// Bias-tracking concept: first feature or `"unknown"`.
    #[must_use]
    pub fn concept(&self) -> &str {
        concept_of(&self.sensory_features)
    }

    /// Only the learner adjusts intensity; the value is kept in [0, 1].
    pub(crate) fn set_intensity(&mut self, intensity: f64) {
        self.intensity = intensity.clamp(0.0, 1.0);
    }
}
