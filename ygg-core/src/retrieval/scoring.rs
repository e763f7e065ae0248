//! Similarity scoring between experiences.
//!
//! Similarity(a, b) = min(1, Jaccard(features) + 0.5·[social match] + 0.5·[temporal match])
//!
//! Where:
//!   Jaccard(features) = |A ∩ B| / |A ∪ B|, or 0 when either side has no features
//!   social match      = both social contexts equal and non-empty
//!   temporal match    = both temporal contexts present and equal
//!
//! The cap flattens "both context bonuses, little feature overlap" and
//! "everything matches" to the same score; that is intended.

use std::collections::HashSet;

use crate::event::Event;
use crate::memory::Memory;
use crate::types::TemporalContext;

/// Bonus for an exact social-context match.
pub const SOCIAL_BONUS: f64 = 0.5;

/// Bonus for an exact temporal-context match.
pub const TEMPORAL_BONUS: f64 = 0.5;

/// The fields similarity is computed over. Implemented by both [`Event`] and
/// [`Memory`] so any pair can be compared.
pub trait Features {
    /// Sensory descriptors.
    fn sensory_features(&self) -> &[String];
    /// Social setting (empty when unknown).
    fn social_context(&self) -> &str;
    /// Temporal context, if recorded.
    fn temporal_context(&self) -> Option<&TemporalContext>;
}

impl Features for Event {
    fn sensory_features(&self) -> &[String] {
        &self.sensory_features
    }

    fn social_context(&self) -> &str {
        &self.social_context
    }

    fn temporal_context(&self) -> Option<&TemporalContext> {
        self.temporal_context.as_ref()
    }
}

impl Features for Memory {
    fn sensory_features(&self) -> &[String] {
        Memory::sensory_features(self)
    }

    fn social_context(&self) -> &str {
        Memory::social_context(self)
    }

    fn temporal_context(&self) -> Option<&TemporalContext> {
        Memory::temporal_context(self)
    }
}

/// Similarity in [0, 1]. Symmetric in its arguments.
#[must_use]
pub fn similarity<A: Features + ?Sized, B: Features + ?Sized>(a: &A, b: &B) -> f64 {
    let mut score = jaccard(a.sensory_features(), b.sensory_features());

    let (social_a, social_b) = (a.social_context(), b.social_context());
    if !social_a.is_empty() && social_a == social_b {
        score += SOCIAL_BONUS;
    }

    if let (Some(ta), Some(tb)) = (a.temporal_context(), b.temporal_context()) {
        if ta == tb {
            score += TEMPORAL_BONUS;
        }
    }

    score.min(1.0)
}

/// Jaccard index of two feature lists, treated as sets.
#[must_use]
pub fn jaccard(a: &[String], b: &[String]) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let set_a: HashSet<&str> = a.iter().map(String::as_str).collect();
    let set_b: HashSet<&str> = b.iter().map(String::as_str).collect();
    let overlap = set_a.intersection(&set_b).count();
    let union = set_a.union(&set_b).count();
    overlap as f64 / union.max(1) as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{TimeOfDay, Urgency};

    fn ev(features: &[&str]) -> Event {
        Event::new("e", features.iter().map(ToString::to_string).collect())
    }

    #[test]
    fn identical_event_scores_one() {
        let a = ev(&["dark room", "cold"])
            .with_social("Alone")
            .with_temporal(TimeOfDay::Night, Urgency::Urgent);
        assert!((similarity(&a, &a) - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn jaccard_only_without_context() {
        let a = ev(&["rain", "wind"]);
        let b = ev(&["rain", "sun", "sand"]);
        assert!((similarity(&a, &b) - 0.25).abs() < 1e-12);
    }

    #[test]
    fn empty_features_contribute_nothing() {
        let a = ev(&[]).with_social("With Family");
        let b = ev(&["rain"]).with_social("With Family");
        assert!((similarity(&a, &b) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn empty_social_context_never_matches() {
        let a = ev(&["rain"]);
        let b = ev(&["snow"]);
        assert!(similarity(&a, &b).abs() < f64::EPSILON);
    }

    #[test]
    fn context_bonuses_are_capped() {
        let a = ev(&["a", "b"])
            .with_social("Alone")
            .with_temporal(TimeOfDay::Day, Urgency::Neutral);
        let b = ev(&["a", "c"])
            .with_social("Alone")
            .with_temporal(TimeOfDay::Day, Urgency::Neutral);
        assert!((similarity(&a, &b) - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn duplicate_features_count_once() {
        let a = ev(&["rain", "rain"]);
        let b = ev(&["rain"]);
        assert!((jaccard(&a.sensory_features, &b.sensory_features) - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn symmetric() {
        let a = ev(&["x", "y"]).with_social("Alone");
        let b = ev(&["y", "z"])
            .with_social("Alone")
            .with_temporal(TimeOfDay::Day, Urgency::Urgent);
        assert!((similarity(&a, &b) - similarity(&b, &a)).abs() < f64::EPSILON);
    }
}
