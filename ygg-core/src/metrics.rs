//! Learning statistics for a contradiction-driven learning phase.
//!
//! Plain counters owned by the caller and exported alongside the rest of the
//! run's state.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::learning::LearningOutcome;

/// Counters accumulated over a learning phase.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LearningStats {
    /// Events encountered, including those later skipped.
    pub total_events: u64,
    /// Predictions made.
    pub predictions_made: u64,
    /// Contradictions logged by the learner.
    pub contradictions: u64,
    /// Learning steps that produced a new memory.
    pub new_memories_added: u64,
    /// Rounded prediction error of every completed learning step.
    pub prediction_errors: Vec<f64>,
    /// Concepts whose drift report flagged a shift.
    pub shifted_concepts: BTreeSet<String>,
}

impl LearningStats {
    /// Create zeroed statistics.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one learning outcome into the counters.
    pub fn record(&mut self, outcome: &LearningOutcome) {
        self.prediction_errors.push(outcome.error);
        if outcome.contradiction_logged {
            self.contradictions += 1;
        }
        if outcome.new_memory.is_some() {
            self.new_memories_added += 1;
        }
    }

    /// Note a concept whose feelings shifted.
    pub fn mark_shifted(&mut self, concept: impl Into<String>) {
        self.shifted_concepts.insert(concept.into());
    }

    /// Mean prediction error, or 0.0 before any learning step.
    #[must_use]
    pub fn average_error(&self) -> f64 {
        if self.prediction_errors.is_empty() {
            return 0.0;
        }
        self.prediction_errors.iter().sum::<f64>() / self.prediction_errors.len() as f64
    }
}

/// Serialized form of [`LearningStats`] with the derived average included.
#[derive(Debug, Clone, Serialize)]
pub struct LearningStatsExport<'a> {
    /// The raw counters.
    #[serde(flatten)]
    pub stats: &'a LearningStats,
    /// [`LearningStats::average_error`].
    pub average_error: f64,
}

impl<'a> From<&'a LearningStats> for LearningStatsExport<'a> {
    fn from(stats: &'a LearningStats) -> Self {
        Self {
            stats,
            average_error: stats.average_error(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::learning::ErrorBand;
    use crate::types::MemoryId;

    fn outcome(error: f64, contradiction: bool, new_memory: bool) -> LearningOutcome {
        LearningOutcome {
            error,
            band: ErrorBand::Low,
            emotion_match: !contradiction,
            updated: Vec::new(),
            contradiction_logged: contradiction,
            new_memory: new_memory.then(MemoryId::generate),
            memory_committed: new_memory,
        }
    }

    #[test]
    fn average_of_nothing_is_zero() {
        assert!(LearningStats::new().average_error().abs() < f64::EPSILON);
    }

    #[test]
    fn records_outcomes() {
        let mut stats = LearningStats::new();
        stats.record(&outcome(0.1, false, false));
        stats.record(&outcome(0.8, true, true));
        stats.record(&outcome(0.3, true, true));
        stats.mark_shifted("attic");
        stats.mark_shifted("attic");

        assert_eq!(stats.contradictions, 2);
        assert_eq!(stats.new_memories_added, 2);
        assert!((stats.average_error() - 0.4).abs() < 1e-9);
        assert_eq!(stats.shifted_concepts.len(), 1);
    }

    #[test]
    fn export_includes_average() {
        let mut stats = LearningStats::new();
        stats.record(&outcome(0.5, false, false));
        let json = serde_json::to_value(LearningStatsExport::from(&stats)).expect("serialize");
        assert_eq!(json["average_error"], 0.5);
        assert_eq!(json["prediction_errors"][0], 0.5);
    }
}
