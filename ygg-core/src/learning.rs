//! Contradiction-driven learning: adapting memory to prediction error.
//!
//! After each prediction the ground-truth tag is compared with it:
//!
//! ```text
//! error = round2(|predicted.intensity − actual.intensity|)
//! match = predicted.emotion == actual.emotion
//!
//! error <  low            reinforce: +0.05 (cap 1.0) on similar memories with the predicted label
//! low ≤ error < high, ✓   average:   intensity := (intensity + actual) / 2
//! low ≤ error < high, ✗   contradiction; propose a new memory, NOT committed
//! error ≥ high,       ✓   weaken:    −0.2 (floor 0.0)
//! error ≥ high,       ✗   contradiction; commit a new memory
//! ```
//!
//! "Similar memories" are the (at most five) existing memories with positive
//! similarity to the event, most similar first. Both contradiction branches
//! update the bias meter and timeline with the new memory, whether or not it
//! was committed; the caller decides what to do with a proposed memory (see
//! [`LearningOutcome::memory_committed`]).

use chrono::{DateTime, Utc};
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use tracing::debug;

use crate::bias::{
    self, BiasMeter, ContradictionLog, ContradictionLogEntry, EmotionalTimeline,
};
use crate::config::LearningConfig;
use crate::event::Event;
use crate::memory::{Memory, MemoryStore};
use crate::retrieval::Prediction;
use crate::retrieval::scoring::similarity;
use crate::types::{EmotionTag, MemoryId, round2};

/// Caller-owned learning records threaded through every learning step.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LearningState {
    /// Concept → emotion counts.
    pub bias_meter: BiasMeter,
    /// Concept → chronological feelings.
    pub timeline: EmotionalTimeline,
    /// Every contradiction observed.
    pub contradictions: ContradictionLog,
}

impl LearningState {
    /// Create empty records.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

/// Which error band a step fell into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorBand {
    /// Below the low threshold.
    Low,
    /// Between the thresholds.
    Moderate,
    /// At or above the high threshold.
    High,
}

/// What one learning step did.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LearningOutcome {
    /// |predicted − actual| intensity, rounded to two decimals.
    #[serde(rename = "Error")]
    pub error: f64,
    /// Error band the step was classified into.
    #[serde(rename = "Band")]
    pub band: ErrorBand,
    /// Whether the predicted label matched the actual one.
    #[serde(rename = "Emotion Match")]
    pub emotion_match: bool,
    /// Memories whose intensity was adjusted.
    #[serde(rename = "Updated Memories")]
    pub updated: Vec<MemoryId>,
    /// Whether a contradiction was logged.
    #[serde(rename = "Contradiction Logged")]
    pub contradiction_logged: bool,
    /// Identifier of the new memory created (high band) or proposed (moderate band).
    #[serde(rename = "New Memory Added")]
    pub new_memory: Option<MemoryId>,
    /// Whether `new_memory` was committed to the store by this step.
    #[serde(rename = "Memory Committed")]
    pub memory_committed: bool,
}

/// Applies the error-band policy to a store.
#[derive(Debug, Clone)]
pub struct Learner {
    config: LearningConfig,
}

impl Default for Learner {
    fn default() -> Self {
        Self::new(LearningConfig::default())
    }
}

impl Learner {
    /// Create a learner with the given thresholds and steps.
    #[must_use]
    pub fn new(config: LearningConfig) -> Self {
        Self { config }
    }

    /// The learner's configuration.
    #[must_use]
    pub fn config(&self) -> &LearningConfig {
        &self.config
    }

    /// Classify an absolute error.
    #[must_use]
    pub fn band(&self, error: f64) -> ErrorBand {
        if error < self.config.low_error {
            ErrorBand::Low
        } else if error < self.config.high_error {
            ErrorBand::Moderate
        } else {
            ErrorBand::High
        }
    }

    /// Learn from one (prediction, ground truth) pair, timestamping records now.
    pub fn learn(
        &self,
        store: &mut MemoryStore,
        state: &mut LearningState,
        event: &Event,
        predicted: &Prediction,
        actual: &EmotionTag,
    ) -> LearningOutcome {
        self.learn_at(store, state, event, predicted, actual, Utc::now())
    }

    /// [`Learner::learn`] with an explicit timestamp.
    pub fn learn_at(
        &self,
        store: &mut MemoryStore,
        state: &mut LearningState,
        event: &Event,
        predicted: &Prediction,
        actual: &EmotionTag,
        now: DateTime<Utc>,
    ) -> LearningOutcome {
        let error = round2((predicted.intensity - actual.intensity).abs());
        let emotion_match = predicted.emotion == actual.emotion;
        let band = self.band(error);
        let similar = self.most_similar(store.all_memories(), event);

        let mut outcome = LearningOutcome {
            error,
            band,
            emotion_match,
            updated: Vec::new(),
            contradiction_logged: false,
            new_memory: None,
            memory_committed: false,
        };

        match (band, emotion_match) {
            (ErrorBand::Low, _) => {
                let step = self.config.reinforce_step;
                outcome.updated = adjust(store, &similar, predicted, |i| (i + step).min(1.0));
            }
            (ErrorBand::Moderate, true) => {
                let target = actual.intensity;
                outcome.updated = adjust(store, &similar, predicted, |i| (i + target) / 2.0);
            }
            (ErrorBand::High, true) => {
                let step = self.config.decay_step;
                outcome.updated = adjust(store, &similar, predicted, |i| (i - step).max(0.0));
            }
            (ErrorBand::Moderate | ErrorBand::High, false) => {
                let memory = Memory::with_id(
                    MemoryId::generate(),
                    event,
                    &EmotionTag::new(actual.event_id.clone(), actual.emotion, round2(actual.intensity)),
                );
                state.contradictions.push(ContradictionLogEntry {
                    concept: event.concept().to_string(),
                    prior_emotion: predicted.emotion,
                    new_emotion: actual.emotion,
                    error,
                    event_id: memory.id().clone(),
                    timestamp: now,
                });
                bias::record_memory(&mut state.bias_meter, &mut state.timeline, &memory, now);

                outcome.contradiction_logged = true;
                outcome.new_memory = Some(memory.id().clone());
                if band == ErrorBand::High {
                    store.insert(memory);
                    outcome.memory_committed = true;
                }
            }
        }

        debug!(
            event = %event.id,
            ?band,
            error = outcome.error,
            emotion_match,
            updated = outcome.updated.len(),
            new_memory = ?outcome.new_memory,
            committed = outcome.memory_committed,
            "learning step"
        );

        outcome
    }

    /// Indices of the most similar existing memories (positive similarity,
    /// descending; equal scores keep chronological order).
    fn most_similar(&self, memories: &[Memory], event: &Event) -> Vec<usize> {
        let mut scored: Vec<(f64, usize)> = memories
            .iter()
            .enumerate()
            .map(|(i, m)| (similarity(event, m), i))
            .filter(|(sim, _)| *sim > 0.0)
            .collect();
        scored.sort_by_key(|(sim, _)| Reverse(OrderedFloat(*sim)));
        scored
            .into_iter()
            .take(self.config.top_similar)
            .map(|(_, i)| i)
            .collect()
    }
}

/// Apply `rule` to every selected memory carrying the predicted label,
/// rounding the result to two decimals. Returns the touched identifiers.
fn adjust(
    store: &mut MemoryStore,
    selected: &[usize],
    predicted: &Prediction,
    rule: impl Fn(f64) -> f64,
) -> Vec<MemoryId> {
    let memories = store.memories_mut();
    let mut updated = Vec::new();
    for &i in selected {
        let memory = &mut memories[i];
        if memory.emotion() == predicted.emotion {
            let adjusted = round2(rule(memory.intensity()));
            memory.set_intensity(adjusted);
            updated.push(memory.id().clone());
        }
    }
    updated
}
