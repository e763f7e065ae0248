//! Bias shift report: has the agent's feeling about a concept drifted?
//!
//! The dominant emotion over a concept's whole history is compared with the
//! dominant emotion over its most recent entries. Frequency ties go to the
//! emotion encountered first.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{EmotionalTimeline, TimelineEntry};
use crate::error::{Result, YggError};
use crate::types::{Emotion, round2};

/// Drift summary for one concept.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BiasShiftReport {
    /// The concept reported on.
    #[serde(rename = "Concept")]
    pub concept: String,
    /// Percentage of history per emotion, rounded to two decimals.
    #[serde(rename = "Emotion Distribution")]
    pub distribution: BTreeMap<Emotion, f64>,
    /// Most frequent emotion over the full history.
    #[serde(rename = "Dominant Emotion")]
    pub dominant: Emotion,
    /// Most frequent emotion over the recent window.
    #[serde(rename = "Recent Dominant")]
    pub recent_dominant: Emotion,
    /// Whether the two differ.
    #[serde(rename = "Shift Detected")]
    pub shift_detected: bool,
    /// Timestamp of the newest entry.
    #[serde(rename = "Last Updated")]
    pub last_updated: DateTime<Utc>,
}

/// Build the report for `concept`, comparing against the last `recent_window`
/// entries.
///
/// # Errors
/// Returns [`YggError::UnknownConcept`] when the concept has no history.
pub fn report(
    timeline: &EmotionalTimeline,
    concept: &str,
    recent_window: usize,
) -> Result<BiasShiftReport> {
    let history = timeline
        .history(concept)
        .filter(|h| !h.is_empty())
        .ok_or_else(|| YggError::UnknownConcept(concept.to_string()))?;

    let counts = tally(history);
    let total = history.len() as f64;
    let distribution = counts
        .iter()
        .map(|(emotion, count)| (*emotion, round2(f64::from(*count) / total * 100.0)))
        .collect();
    let dominant = most_frequent(&counts);

    let recent = &history[history.len().saturating_sub(recent_window.max(1))..];
    let recent_dominant = most_frequent(&tally(recent));

    let last_updated = history[history.len() - 1].timestamp;

    Ok(BiasShiftReport {
        concept: concept.to_string(),
        distribution,
        dominant,
        recent_dominant,
        shift_detected: dominant != recent_dominant,
        last_updated,
    })
}

/// Counts in first-encountered order.
fn tally(entries: &[TimelineEntry]) -> Vec<(Emotion, u32)> {
    let mut counts: Vec<(Emotion, u32)> = Vec::new();
    for entry in entries {
        match counts.iter_mut().find(|(e, _)| *e == entry.emotion) {
            Some((_, n)) => *n += 1,
            None => counts.push((entry.emotion, 1)),
        }
    }
    counts
}

fn most_frequent(counts: &[(Emotion, u32)]) -> Emotion {
    let mut best: Option<(Emotion, u32)> = None;
    for &(emotion, count) in counts {
        if best.is_none_or(|(_, b)| count > b) {
            best = Some((emotion, count));
        }
    }
    best.map_or(Emotion::Neutral, |(e, _)| e)
}
