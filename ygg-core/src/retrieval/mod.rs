//! Emotion prediction: similarity-weighted k-nearest-neighbour vote over memory.
//!
//! For a new event, every memory is scored with [`scoring::similarity`];
//! the `k` most similar (positive-similarity) memories vote for their
//! emotion with weight `similarity × intensity`:
//!
//!   score(e)   = Σ sim(m)·intensity(m)   over selected m with emotion e
//!   predicted  = argmax score(e)
//!   intensity  = score(predicted) / Σ sim(m)
//!
//! Prediction is pure: it never touches the store.

pub mod scoring;

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::config::PredictorConfig;
use crate::event::Event;
use crate::memory::{Memory, MemoryStore};
use crate::types::{Emotion, MemoryId, round2};

/// The predictor's guess for one event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    /// Predicted emotion (`Neutral` when memory offers no support).
    #[serde(rename = "Predicted Emotion")]
    pub emotion: Emotion,
    /// Predicted intensity in [0, 1], rounded to two decimals.
    #[serde(rename = "Predicted Intensity")]
    pub intensity: f64,
    /// Memories that took part in the vote, most similar first.
    #[serde(rename = "Supporting Memories")]
    pub supporting: Vec<MemoryId>,
}

impl Prediction {
    /// The defined default when no memory is similar to the event.
    #[must_use]
    pub fn neutral() -> Self {
        Self {
            emotion: Emotion::Neutral,
            intensity: 0.0,
            supporting: Vec::new(),
        }
    }

    /// Whether this is the no-support default.
    #[must_use]
    pub fn is_neutral(&self) -> bool {
        self.supporting.is_empty()
    }
}

/// Nearest-neighbour emotion predictor.
#[derive(Debug, Clone)]
pub struct Predictor {
    config: PredictorConfig,
}

impl Default for Predictor {
    fn default() -> Self {
        Self::new(PredictorConfig::default())
    }
}

impl Predictor {
    /// Create a predictor with the given configuration.
    #[must_use]
    pub fn new(config: PredictorConfig) -> Self {
        Self { config }
    }

    /// Predict with the configured `top_k`.
    #[must_use]
    pub fn predict(&self, store: &MemoryStore, event: &Event) -> Prediction {
        predict(store, event, self.config.top_k)
    }
}

/// Predict the emotion of `event` from the `k` most similar memories.
///
/// Ties in similarity are broken by memory identifier, so repeated runs over
/// identical input select the same neighbours.
#[must_use]
pub fn predict(store: &MemoryStore, event: &Event, k: usize) -> Prediction {
    let neighbours = nearest(store.all_memories(), event, k);
    if neighbours.is_empty() {
        return Prediction::neutral();
    }

    // Insertion-ordered so equal scores resolve to the first label selected.
    let mut scores: Vec<(Emotion, f64)> = Vec::new();
    let mut total_weight = 0.0;
    let mut supporting = Vec::with_capacity(neighbours.len());

    for (sim, memory) in &neighbours {
        let vote = sim * memory.intensity();
        match scores.iter_mut().find(|(e, _)| *e == memory.emotion()) {
            Some((_, score)) => *score += vote,
            None => scores.push((memory.emotion(), vote)),
        }
        total_weight += sim;
        supporting.push(memory.id().clone());
    }

    let (emotion, score) = scores
        .iter()
        .copied()
        .fold(None, |best: Option<(Emotion, f64)>, (e, s)| match best {
            Some((_, b)) if s <= b => best,
            _ => Some((e, s)),
        })
        .unwrap_or((Emotion::Neutral, 0.0));

    Prediction {
        emotion,
        intensity: round2(score / total_weight),
        supporting,
    }
}

/// The `k` memories most similar to `event`, with their similarity.
///
/// Zero-similarity memories are never selected. Order: similarity
/// descending, then identifier ascending.
#[must_use]
pub fn nearest<'a>(memories: &'a [Memory], event: &Event, k: usize) -> Vec<(f64, &'a Memory)> {
    let mut scored: Vec<(f64, &Memory)> = memories
        .iter()
        .map(|m| (scoring::similarity(event, m), m))
        .filter(|(sim, _)| *sim > 0.0)
        .collect();
    scored.sort_by(|(sa, ma), (sb, mb)| {
        OrderedFloat(*sb)
            .cmp(&OrderedFloat(*sa))
            .then_with(|| ma.id().cmp(mb.id()))
    });
    scored.truncate(k);
    scored
}
