//! Attachment graph: how the agent feels about the people and things in its life.
//!
//! A single ego-centric graph. The agent is the one central node; every other
//! entity hangs off it by a signed, unbounded edge weight that accumulates
//! `intensity × valence(emotion) / scale` for every event the entity appears
//! in. Each edge also keeps the full history of adjustments that built it.
//!
//! Entity names are resolved through an alias table before use: exact
//! (case-insensitive) alias hits map to their canonical name, near misses
//! (edit-distance ratio ≥ threshold) map to the closest alias, and anything
//! else is admitted as a new entity under its title-cased spelling.

use std::cmp::Reverse;

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::config::AttachmentConfig;
use crate::types::Emotion;

/// Signed weight of an emotion when adjusting attachments.
#[must_use]
pub fn valence(emotion: Emotion) -> f64 {
    match emotion {
        Emotion::Joy | Emotion::LoveAttachment => 1.0,
        Emotion::Sadness => -0.6,
        Emotion::Fear => -0.8,
        Emotion::Anger => -0.9,
        Emotion::Curiosity | Emotion::Neutral => 0.0,
    }
}

/// One recorded change to an edge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Adjustment {
    /// Emotion of the event that caused it.
    pub emotion: Emotion,
    /// Signed amount added to the weight.
    pub adjustment: f64,
}

/// The agent's edge to one entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttachmentEdge {
    /// Canonical entity name.
    pub entity: String,
    /// Running sum of every adjustment.
    pub weight: f64,
    /// Every adjustment, oldest first.
    pub history: Vec<Adjustment>,
}

/// Ego-centric weighted graph over canonical entity names.
///
/// Edges are kept in the order entities were first seen. The alias settings
/// are saved with the edges so a reloaded graph resolves names the same way;
/// records without them load with the defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttachmentGraph {
    ego: String,
    edges: Vec<AttachmentEdge>,
    #[serde(default)]
    config: AttachmentConfig,
}

impl Default for AttachmentGraph {
    fn default() -> Self {
        Self::new(AttachmentConfig::default())
    }
}

impl AttachmentGraph {
    /// Create an empty graph centred on `config.ego`.
    #[must_use]
    pub fn new(config: AttachmentConfig) -> Self {
        Self {
            ego: config.ego.clone(),
            edges: Vec::new(),
            config,
        }
    }

    /// The agent's own canonical name.
    #[must_use]
    pub fn ego(&self) -> &str {
        &self.ego
    }

    /// All edges in first-seen order.
    #[must_use]
    pub fn edges(&self) -> &[AttachmentEdge] {
        &self.edges
    }

    /// Number of entities the agent is attached to.
    #[must_use]
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    /// Whether the graph has no edges.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Resolve a surface string to its canonical entity name.
    #[must_use]
    pub fn normalize(&self, raw: &str) -> String {
        let lower = raw.to_lowercase();
        if let Some(canonical) = self.config.aliases.get(&lower) {
            return canonical.clone();
        }

        let best = self
            .config
            .aliases
            .iter()
            .map(|(alias, canonical)| (ratio(&lower, alias), canonical))
            .fold(None::<(f64, &String)>, |best, (score, canonical)| match best {
                Some((b, _)) if b >= score => best,
                _ => Some((score, canonical)),
            });

        match best {
            Some((score, canonical)) if score >= self.config.similarity_threshold => {
                canonical.clone()
            }
            _ => title_case(raw),
        }
    }

    /// Adjust the edges of every entity mentioned in one event.
    ///
    /// Names are normalized and deduplicated; the ego and empty names are
    /// skipped, so an event never creates a self-edge.
    pub fn update<S: AsRef<str>>(&mut self, entities: &[S], emotion: Emotion, intensity: f64) {
        let adjustment = intensity * valence(emotion) / self.config.valence_scale;

        let mut resolved: Vec<String> = Vec::new();
        for raw in entities {
            let name = self.normalize(raw.as_ref());
            if name.trim().is_empty() || name == self.ego || resolved.contains(&name) {
                continue;
            }
            resolved.push(name);
        }

        for name in resolved {
            let position = match self.edges.iter().position(|e| e.entity == name) {
                Some(i) => i,
                None => {
                    self.edges.push(AttachmentEdge {
                        entity: name,
                        weight: 0.0,
                        history: Vec::new(),
                    });
                    self.edges.len() - 1
                }
            };
            let edge = &mut self.edges[position];
            edge.weight += adjustment;
            edge.history.push(Adjustment {
                emotion,
                adjustment,
            });
        }
    }

    /// The `limit` edges with the largest absolute weight; ties keep first-seen order.
    #[must_use]
    pub fn strongest(&self, limit: usize) -> Vec<&AttachmentEdge> {
        let mut ranked: Vec<&AttachmentEdge> = self.edges.iter().collect();
        ranked.sort_by_key(|e| Reverse(OrderedFloat(e.weight.abs())));
        ranked.truncate(limit);
        ranked
    }

    /// The edge for `entity` after normalization, if one exists.
    #[must_use]
    pub fn attachment(&self, entity: &str) -> Option<&AttachmentEdge> {
        let name = self.normalize(entity);
        self.edges.iter().find(|e| e.entity == name)
    }
}

/// Edit-distance ratio in [0, 1]: `1 − distance / longer length`.
fn ratio(a: &str, b: &str) -> f64 {
    let longest = a.chars().count().max(b.chars().count());
    if longest == 0 {
        return 1.0;
    }
    1.0 - levenshtein::levenshtein(a, b) as f64 / longest as f64
}

/// Upper-case the first letter of every alphabetic run, lower-case the rest.
fn title_case(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut in_word = false;
    for c in raw.chars() {
        if c.is_alphabetic() {
            if in_word {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(c);
            in_word = false;
        }
    }
    out
}
