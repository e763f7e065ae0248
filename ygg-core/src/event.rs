//! Events: structured descriptions of one experienced moment.
//!
//! Events are produced outside the core (by the perception collaborator) and
//! arrive as loosely-shaped records. [`RawEvent`] accepts whatever subset of
//! fields the collaborator managed to produce; converting it into an
//! [`Event`] is the single validation point before data reaches the engine.

use serde::{Deserialize, Serialize};

use crate::error::YggError;
use crate::types::{MemoryId, TemporalContext, TimeOfDay, Urgency};

/// An immutable, validated experience.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Unique within a run.
    #[serde(rename = "Event ID")]
    pub id: MemoryId,
    /// Perceived descriptors ("dark room", "loud footsteps"), in order.
    #[serde(rename = "Sensory Features", default)]
    pub sensory_features: Vec<String>,
    /// Time of day and urgency, when the collaborator provided them.
    #[serde(rename = "Temporal Context", default)]
    pub temporal_context: Option<TemporalContext>,
    /// Free-form social setting ("Alone", "With Family").
    #[serde(rename = "Social Context", default)]
    pub social_context: String,
    /// Source sentence.
    #[serde(rename = "Raw Text", default)]
    pub raw_text: String,
}

impl Event {
    /// Create an event with no context; use the `with_*` builders to add some.
    #[must_use]
    pub fn new(id: impl Into<MemoryId>, sensory_features: Vec<String>) -> Self {
        Self {
            id: id.into(),
            sensory_features,
            temporal_context: None,
            social_context: String::new(),
            raw_text: String::new(),
        }
    }

    /// Attach a temporal context.
    #[must_use]
    pub fn with_temporal(mut self, time_of_day: TimeOfDay, urgency: Urgency) -> Self {
        self.temporal_context = Some(TemporalContext::new(time_of_day, urgency));
        self
    }

    /// Attach a social context.
    #[must_use]
    pub fn with_social(mut self, social: impl Into<String>) -> Self {
        self.social_context = social.into();
        self
    }

    /// Attach the source sentence.
    #[must_use]
    pub fn with_raw_text(mut self, text: impl Into<String>) -> Self {
        self.raw_text = text.into();
        self
    }

    /// Grouping key for bias tracking: the first sensory feature, or `"unknown"`.
    #[must_use]
    pub fn concept(&self) -> &str {
        concept_of(&self.sensory_features)
    }
}

/// First feature or `"unknown"`.
pub(crate) fn concept_of(features: &[String]) -> &str {
    features.first().map_or("unknown", String::as_str)
}

// ---------------------------------------------------------------------------
// Collaborator boundary
// ---------------------------------------------------------------------------

/// Temporal context as the collaborator writes it: free strings, maybe absent.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawTemporal {
    /// `"Day" | "Night" | "Unknown"`, or anything else.
    #[serde(rename = "TimeOfDay", default)]
    pub time_of_day: Option<String>,
    /// `"Urgent" | "Peaceful" | "Neutral"`, or anything else.
    #[serde(rename = "Urgency", default)]
    pub urgency: Option<String>,
}

/// An event exactly as parsed from collaborator JSON, every field optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawEvent {
    /// Identifier.
    #[serde(rename = "Event ID", default)]
    pub id: Option<String>,
    /// Sensory descriptors.
    #[serde(rename = "Sensory Features", default)]
    pub sensory_features: Option<Vec<String>>,
    /// Temporal context.
    #[serde(rename = "Temporal Context", default)]
    pub temporal_context: Option<RawTemporal>,
    /// Social context.
    #[serde(rename = "Social Context", default)]
    pub social_context: Option<String>,
    /// Source sentence.
    #[serde(rename = "Raw Text", default)]
    pub raw_text: Option<String>,
}

impl TryFrom<RawEvent> for Event {
    type Error = YggError;

    /// Only a missing identifier is fatal for the event; every other gap is
    /// filled with an empty value.
    fn try_from(raw: RawEvent) -> Result<Self, Self::Error> {
        let id = raw
            .id
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| YggError::InvalidEvent("missing Event ID".into()))?;

        let sensory_features = raw
            .sensory_features
            .unwrap_or_default()
            .into_iter()
            .map(|f| f.trim().to_string())
            .filter(|f| !f.is_empty())
            .collect();

        let temporal_context = raw.temporal_context.map(|t| {
            TemporalContext::new(
                t.time_of_day
                    .as_deref()
                    .map_or(TimeOfDay::Unknown, TimeOfDay::parse_lenient),
                t.urgency
                    .as_deref()
                    .map_or(Urgency::Neutral, Urgency::parse_lenient),
            )
        });

        Ok(Self {
            id: MemoryId(id),
            sensory_features,
            temporal_context,
            social_context: raw.social_context.unwrap_or_default().trim().to_string(),
            raw_text: raw.raw_text.unwrap_or_default(),
        })
    }
}
