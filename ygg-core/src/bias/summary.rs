//! Bias summary: a short digest of learned biases and contradictions, meant
//! to be pasted into prompt context.
//!
//! Lines about the concept of interest are always included ("focused");
//! a few lines about other concepts are sampled at random ("ambient") so the
//! digest carries some background without growing with the run.

use rand::Rng;
use rand::seq::SliceRandom;

use super::{BiasMeter, ContradictionLog};
use crate::config::BiasConfig;

/// Digest lines: `(bias lines, contradiction lines)`.
pub type BiasDigest = (Vec<String>, Vec<String>);

/// Build a digest for `concept` (or ambient-only when `None`).
///
/// Bias lines list a concept's emotions by count, most frequent first with
/// ties in first-seen order, and only for concepts that have felt more than
/// one emotion:
/// `- attic: Fear → Curiosity`. Contradiction lines read
/// `- attic: Joy → Fear`. At most `limit` focused lines of each kind are kept.
pub fn summarize<R: Rng + ?Sized>(
    meter: &BiasMeter,
    contradictions: &ContradictionLog,
    concept: Option<&str>,
    limit: usize,
    config: &BiasConfig,
    rng: &mut R,
) -> BiasDigest {
    let needle = concept.map(str::to_lowercase);
    let is_focused = |c: &str| {
        needle
            .as_deref()
            .is_some_and(|n| c.to_lowercase().contains(n))
    };

    let mut focused_bias = Vec::new();
    let mut ambient_bias = Vec::new();
    for (c, counts) in meter.iter() {
        if counts.len() < 2 {
            continue;
        }
        let mut ordered: Vec<_> = counts.iter().collect();
        ordered.sort_by(|a, b| b.1.cmp(&a.1));
        let path = ordered
            .iter()
            .map(|(emotion, _)| emotion.label())
            .collect::<Vec<_>>()
            .join(" → ");
        let line = format!("- {c}: {path}");
        if is_focused(c) {
            focused_bias.push(line);
        } else {
            ambient_bias.push(line);
        }
    }

    let mut focused_contr = Vec::new();
    let mut ambient_contr = Vec::new();
    for entry in contradictions.entries() {
        let line = format!(
            "- {}: {} → {}",
            entry.concept, entry.prior_emotion, entry.new_emotion
        );
        if is_focused(&entry.concept) {
            focused_contr.push(line);
        } else {
            ambient_contr.push(line);
        }
    }

    focused_bias.truncate(limit);
    focused_contr.truncate(limit);
    focused_bias.extend(
        ambient_bias
            .choose_multiple(rng, config.ambient_bias_samples)
            .cloned(),
    );
    focused_contr.extend(
        ambient_contr
            .choose_multiple(rng, config.ambient_contradiction_samples)
            .cloned(),
    );

    (focused_bias, focused_contr)
}
