//! Core type definitions for the Yggdrasil memory engine.
//!
//! All types are serializable so the final state can be exported as flat,
//! human-readable JSON records.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Identity
// ---------------------------------------------------------------------------

/// Identifier of an event and of the memory committed from it.
///
/// Events arrive with collaborator-assigned identifiers (`event_12`); memories
/// created during learning get a fresh `event_<6 hex>` identifier.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemoryId(pub String);

impl MemoryId {
    /// Wrap an existing identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a fresh identifier for a memory inserted during learning.
    #[must_use]
    pub fn generate() -> Self {
        let hex = Uuid::new_v4().simple().to_string();
        Self(format!("event_{}", &hex[..6]))
    }

    /// Identifier for the `n`th sentence-level event of a run.
    #[must_use]
    pub fn sequential(n: u64) -> Self {
        Self(format!("event_{n}"))
    }

    /// Borrow the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MemoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for MemoryId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

// ---------------------------------------------------------------------------
// Emotion
// ---------------------------------------------------------------------------

/// The closed set of emotion labels.
///
/// Six categories can be assigned by the ground-truth tagger. `Neutral` is
/// only produced by the predictor when no memory supports a prediction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Emotion {
    /// Happiness, delight, relief.
    Joy,
    /// Grief, loneliness, disappointment.
    Sadness,
    /// Anxiety, dread, alarm.
    Fear,
    /// Irritation, resentment, fury.
    Anger,
    /// Interest, wonder, neutral attention.
    Curiosity,
    /// Affection and bonding.
    #[serde(rename = "Love/Attachment")]
    LoveAttachment,
    /// No supporting memory: the predictor's default.
    Neutral,
}

static EMOTION_WORD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(joy|sadness|fear|anger|curiosity|love/attachment)\b")
        .expect("emotion pattern is valid")
});

impl Emotion {
    /// The categories the tagger may assign.
    pub const CATEGORIES: [Emotion; 6] = [
        Self::Joy,
        Self::Sadness,
        Self::Fear,
        Self::Anger,
        Self::Curiosity,
        Self::LoveAttachment,
    ];

    /// Display name, matching the serialized form.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Joy => "Joy",
            Self::Sadness => "Sadness",
            Self::Fear => "Fear",
            Self::Anger => "Anger",
            Self::Curiosity => "Curiosity",
            Self::LoveAttachment => "Love/Attachment",
            Self::Neutral => "Neutral",
        }
    }

    /// Find the first taggable category named anywhere in `text`
    /// (case-insensitive, whole words only; "dangerous" is not Anger).
    #[must_use]
    pub fn from_label(text: &str) -> Option<Self> {
        let found = EMOTION_WORD.find(text)?;
        let word = found.as_str().to_ascii_lowercase();
        Self::CATEGORIES
            .into_iter()
            .find(|e| e.label().eq_ignore_ascii_case(&word))
    }

    /// Whether the tagger is allowed to assign this label.
    #[must_use]
    pub fn is_category(self) -> bool {
        !matches!(self, Self::Neutral)
    }
}

impl fmt::Display for Emotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Emotion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("neutral") {
            return Ok(Self::Neutral);
        }
        Self::from_label(s).ok_or_else(|| format!("not an emotion label: {s:?}"))
    }
}

// ---------------------------------------------------------------------------
// Temporal context
// ---------------------------------------------------------------------------

/// Coarse time of day of an experience.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TimeOfDay {
    /// Daylight hours.
    Day,
    /// After dark.
    Night,
    /// Not inferable from the text.
    #[default]
    Unknown,
}

impl TimeOfDay {
    /// Lenient parse; anything unrecognised is `Unknown`.
    #[must_use]
    pub fn parse_lenient(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "day" => Self::Day,
            "night" => Self::Night,
            _ => Self::Unknown,
        }
    }
}

/// How pressing an experience felt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Urgency {
    /// Hurried, alarming.
    Urgent,
    /// Calm, restful.
    Peaceful,
    /// Neither.
    #[default]
    Neutral,
}

impl Urgency {
    /// Lenient parse; anything unrecognised is `Neutral`.
    #[must_use]
    pub fn parse_lenient(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "urgent" => Self::Urgent,
            "peaceful" => Self::Peaceful,
            _ => Self::Neutral,
        }
    }
}

/// When and how pressing an experience was.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct TemporalContext {
    /// Time of day.
    #[serde(rename = "TimeOfDay")]
    pub time_of_day: TimeOfDay,
    /// Urgency.
    #[serde(rename = "Urgency")]
    pub urgency: Urgency,
}

impl TemporalContext {
    /// Create a temporal context.
    #[must_use]
    pub fn new(time_of_day: TimeOfDay, urgency: Urgency) -> Self {
        Self {
            time_of_day,
            urgency,
        }
    }
}

// ---------------------------------------------------------------------------
// Emotion tag
// ---------------------------------------------------------------------------

/// Emotion assigned by the ground-truth tagger when its label is unusable.
pub const FALLBACK_EMOTION: Emotion = Emotion::Curiosity;

/// Intensity assigned when the tagger's intensity is missing or out of range.
pub const FALLBACK_INTENSITY: f64 = 0.5;

/// A ground-truth emotion label with intensity, attached to one event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmotionTag {
    /// The tagged event.
    #[serde(rename = "Event ID")]
    pub event_id: MemoryId,
    /// Assigned label (one of [`Emotion::CATEGORIES`]).
    #[serde(rename = "Assigned Emotion")]
    pub emotion: Emotion,
    /// Intensity in [0, 1].
    #[serde(rename = "Emotion Intensity")]
    pub intensity: f64,
}

impl EmotionTag {
    /// Build a tag from already-trusted values. Intensity is clamped to [0, 1].
    #[must_use]
    pub fn new(event_id: impl Into<MemoryId>, emotion: Emotion, intensity: f64) -> Self {
        Self {
            event_id: event_id.into(),
            emotion,
            intensity: intensity.clamp(0.0, 1.0),
        }
    }

    /// Validate raw collaborator output, substituting the fallback label or
    /// intensity field by field when either is unusable.
    #[must_use]
    pub fn validated(event_id: MemoryId, label: Option<&str>, intensity: Option<f64>) -> Self {
        let emotion = label
            .and_then(Emotion::from_label)
            .unwrap_or(FALLBACK_EMOTION);
        let intensity = intensity
            .filter(|v| v.is_finite() && (0.0..=1.0).contains(v))
            .unwrap_or(FALLBACK_INTENSITY);
        Self {
            event_id,
            emotion,
            intensity,
        }
    }

    /// The tag used when the tagger response cannot be read at all.
    #[must_use]
    pub fn fallback(event_id: MemoryId) -> Self {
        Self {
            event_id,
            emotion: FALLBACK_EMOTION,
            intensity: FALLBACK_INTENSITY,
        }
    }
}

impl From<String> for MemoryId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Round to two decimal places, the precision of every reported intensity
/// and error.
#[must_use]
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
