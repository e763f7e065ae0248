//! Bias tracking: how the agent's feelings about a concept accumulate.
//!
//! Three append-only records are kept per run:
//!
//! - [`BiasMeter`]: per concept, how often each emotion was recorded.
//! - [`EmotionalTimeline`]: per concept, every recorded (emotion, intensity, time).
//! - [`ContradictionLog`]: every prediction whose label the ground truth contradicted.
//!
//! None of them ever forget: counts only grow and entries are never removed.

pub mod report;
pub mod summary;

pub use report::{BiasShiftReport, report};
pub use summary::summarize;

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::memory::Memory;
use crate::types::{Emotion, MemoryId};

// ---------------------------------------------------------------------------
// Bias meter
// ---------------------------------------------------------------------------

/// Occurrence counts of emotions for one concept, in first-seen order.
///
/// Serialized as a JSON object whose keys keep that order, so a reloaded
/// meter breaks count ties the same way the live one did.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EmotionCounts(Vec<(Emotion, u32)>);

impl EmotionCounts {
    /// Count one more occurrence of `emotion`.
    pub fn increment(&mut self, emotion: Emotion) {
        match self.0.iter_mut().find(|(e, _)| *e == emotion) {
            Some((_, n)) => *n += 1,
            None => self.0.push((emotion, 1)),
        }
    }

    /// Count for `emotion`, if it was ever recorded.
    #[must_use]
    pub fn get(&self, emotion: &Emotion) -> Option<&u32> {
        self.0.iter().find(|(e, _)| e == emotion).map(|(_, n)| n)
    }

    /// Iterate `(emotion, count)` in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (Emotion, u32)> + '_ {
        self.0.iter().copied()
    }

    /// Number of distinct emotions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no emotion was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for EmotionCounts {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.0.iter().map(|(e, n)| (e, n)))
    }
}

impl<'de> Deserialize<'de> for EmotionCounts {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct CountsVisitor;

        impl<'de> Visitor<'de> for CountsVisitor {
            type Value = EmotionCounts;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of emotion to count")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut counts = EmotionCounts::default();
                while let Some((emotion, n)) = map.next_entry::<Emotion, u32>()? {
                    match counts.0.iter_mut().find(|(e, _)| *e == emotion) {
                        Some(slot) => slot.1 += n,
                        None => counts.0.push((emotion, n)),
                    }
                }
                Ok(counts)
            }
        }

        deserializer.deserialize_map(CountsVisitor)
    }
}

/// Concept → emotion → occurrence count.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BiasMeter(BTreeMap<String, EmotionCounts>);

impl BiasMeter {
    /// Create an empty meter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one more occurrence of `emotion` for `concept`.
    pub fn increment(&mut self, concept: &str, emotion: Emotion) {
        self.0
            .entry(concept.to_string())
            .or_default()
            .increment(emotion);
    }

    /// Counts for one concept.
    #[must_use]
    pub fn counts(&self, concept: &str) -> Option<&EmotionCounts> {
        self.0.get(concept)
    }

    /// Iterate concepts in lexical order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &EmotionCounts)> {
        self.0.iter()
    }

    /// Number of tracked concepts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Emotional timeline
// ---------------------------------------------------------------------------

/// One recorded feeling about a concept.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineEntry {
    /// Recorded emotion.
    pub emotion: Emotion,
    /// Its intensity.
    pub intensity: f64,
    /// When it was recorded.
    pub timestamp: DateTime<Utc>,
}

/// Concept → chronological feelings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmotionalTimeline(BTreeMap<String, Vec<TimelineEntry>>);

impl EmotionalTimeline {
    /// Create an empty timeline.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a feeling for `concept`.
    pub fn record(&mut self, concept: &str, entry: TimelineEntry) {
        self.0.entry(concept.to_string()).or_default().push(entry);
    }

    /// History for one concept, oldest first.
    #[must_use]
    pub fn history(&self, concept: &str) -> Option<&[TimelineEntry]> {
        self.0.get(concept).map(Vec::as_slice)
    }

    /// Iterate concepts in lexical order.
    pub fn concepts(&self) -> impl Iterator<Item = &String> {
        self.0.keys()
    }

    /// Whether nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Count `memory`'s emotion under its concept and append it to the timeline.
pub fn record_memory(
    meter: &mut BiasMeter,
    timeline: &mut EmotionalTimeline,
    memory: &Memory,
    now: DateTime<Utc>,
) {
    let concept = memory.concept();
    meter.increment(concept, memory.emotion());
    timeline.record(
        concept,
        TimelineEntry {
            emotion: memory.emotion(),
            intensity: memory.intensity(),
            timestamp: now,
        },
    );
}

// ---------------------------------------------------------------------------
// Contradiction log
// ---------------------------------------------------------------------------

/// A prediction the ground truth contradicted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContradictionLogEntry {
    /// First sensory feature of the event, or `"unknown"`.
    pub concept: String,
    /// What memory predicted.
    pub prior_emotion: Emotion,
    /// What the event actually carried.
    pub new_emotion: Emotion,
    /// |predicted − actual| intensity, rounded to two decimals.
    pub error: f64,
    /// The memory created (or proposed) in response.
    pub event_id: MemoryId,
    /// When the contradiction was observed.
    pub timestamp: DateTime<Utc>,
}

/// Append-only list of contradictions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContradictionLog(Vec<ContradictionLogEntry>);

impl ContradictionLog {
    /// Create an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry.
    pub fn push(&mut self, entry: ContradictionLogEntry) {
        self.0.push(entry);
    }

    /// All entries, oldest first.
    #[must_use]
    pub fn entries(&self) -> &[ContradictionLogEntry] {
        &self.0
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the log is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
