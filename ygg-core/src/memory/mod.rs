//! The memory store: chronological episodic memories plus an emotion index.
//!
//! The store is append-only: memories are never removed or reordered, and
//! insertion order is chronological order. Each commit also files the
//! memory's identifier under its emotion in the index, so the index always
//! mirrors the sequence.

pub mod episodic;

pub use episodic::Memory;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::event::Event;
use crate::types::{Emotion, EmotionTag, MemoryId};

/// Ordered memories and the emotion → identifiers index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryStore {
    #[serde(rename = "Memory List")]
    memories: Vec<Memory>,
    #[serde(rename = "Emotion Index")]
    index: BTreeMap<Emotion, Vec<MemoryId>>,
}

impl Default for MemoryStore {
    /// Empty store with a bucket pre-created for every taggable category.
    fn default() -> Self {
        Self {
            memories: Vec::new(),
            index: Emotion::CATEGORIES
                .into_iter()
                .map(|e| (e, Vec::new()))
                .collect(),
        }
    }
}

impl MemoryStore {
    /// Create a new empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Combine `event` and `tag` into a memory and append it.
    ///
    /// The memory takes the event's identifier.
    pub fn commit(&mut self, event: &Event, tag: &EmotionTag) -> &Memory {
        self.insert(Memory::from_event(event, tag))
    }

    /// Append an already-built memory and index it under its emotion.
    pub(crate) fn insert(&mut self, memory: Memory) -> &Memory {
        self.index
            .entry(memory.emotion())
            .or_default()
            .push(memory.id().clone());
        self.memories.push(memory);
        let last = self.memories.len() - 1;
        &self.memories[last]
    }

    /// Every memory, oldest first.
    #[must_use]
    pub fn all_memories(&self) -> &[Memory] {
        &self.memories
    }

    /// Mutable access for in-place intensity updates. Positions never change.
    pub(crate) fn memories_mut(&mut self) -> &mut [Memory] {
        &mut self.memories
    }

    /// Look up a memory by identifier (first match in chronological order).
    #[must_use]
    pub fn get(&self, id: &MemoryId) -> Option<&Memory> {
        self.memories.iter().find(|m| m.id() == id)
    }

    /// Identifiers filed under `emotion`.
    #[must_use]
    pub fn ids_for(&self, emotion: Emotion) -> &[MemoryId] {
        self.index.get(&emotion).map_or(&[], Vec::as_slice)
    }

    /// The whole emotion index.
    #[must_use]
    pub fn index(&self) -> &BTreeMap<Emotion, Vec<MemoryId>> {
        &self.index
    }

    /// Number of memories.
    #[must_use]
    pub fn len(&self) -> usize {
        self.memories.len()
    }

    /// Whether the store holds no memories.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.memories.is_empty()
    }

    /// The agent's overall mood: the emotion with the highest summed
    /// intensity. `Neutral` when empty; ties go to the emotion seen first.
    #[must_use]
    pub fn dominant_emotion(&self) -> Emotion {
        let mut totals: Vec<(Emotion, f64)> = Vec::new();
        for memory in &self.memories {
            match totals.iter_mut().find(|(e, _)| *e == memory.emotion()) {
                Some((_, total)) => *total += memory.intensity(),
                None => totals.push((memory.emotion(), memory.intensity())),
            }
        }
        let mut best: Option<(Emotion, f64)> = None;
        for (emotion, total) in totals {
            if best.is_none_or(|(_, b)| total > b) {
                best = Some((emotion, total));
            }
        }
        best.map_or(Emotion::Neutral, |(e, _)| e)
    }

    /// Check that the index mirrors the sequence: every memory sits in
    /// exactly one bucket matching its emotion and every indexed identifier
    /// resolves to a memory carrying that emotion.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        let indexed: usize = self.index.values().map(Vec::len).sum();
        if indexed != self.memories.len() {
            return false;
        }
        self.index.iter().all(|(emotion, ids)| {
            ids.iter().all(|id| {
                self.memories
                    .iter()
                    .any(|m| m.id() == id && m.emotion() == *emotion)
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{TimeOfDay, Urgency};

    fn event(id: &str, features: &[&str]) -> Event {
        Event::new(id, features.iter().map(ToString::to_string).collect())
            .with_social("Alone")
            .with_temporal(TimeOfDay::Day, Urgency::Urgent)
    }

    #[test]
    fn commit_appends_and_indexes() {
        let mut store = MemoryStore::new();
        store.commit(&event("event_1", &["rain"]), &EmotionTag::new("event_1", Emotion::Sadness, 0.4));
        store.commit(&event("event_2", &["sun"]), &EmotionTag::new("event_2", Emotion::Joy, 0.8));
        store.commit(&event("event_3", &["rain"]), &EmotionTag::new("event_3", Emotion::Sadness, 0.6));

        let ids: Vec<&str> = store.all_memories().iter().map(|m| m.id().as_str()).collect();
        assert_eq!(ids, ["event_1", "event_2", "event_3"]);
        assert_eq!(
            store.ids_for(Emotion::Sadness),
            [MemoryId::from("event_1"), MemoryId::from("event_3")]
        );
        assert_eq!(store.ids_for(Emotion::Joy), [MemoryId::from("event_2")]);
        assert!(store.ids_for(Emotion::Anger).is_empty());
        assert!(store.is_consistent());
    }

    #[test]
    fn memory_copies_event_and_tag_fields() {
        let mut store = MemoryStore::new();
        let ev = event("event_7", &["dark room"]).with_raw_text("It was dark.");
        let memory = store.commit(&ev, &EmotionTag::new("event_7", Emotion::Fear, 0.6));
        assert_eq!(memory.sensory_features(), ["dark room".to_string()]);
        assert_eq!(memory.social_context(), "Alone");
        assert_eq!(memory.raw_text(), "It was dark.");
        assert_eq!(memory.emotion(), Emotion::Fear);
        assert!((memory.intensity() - 0.6).abs() < f64::EPSILON);
    }

    #[test]
    fn dominant_emotion_sums_intensity() {
        let mut store = MemoryStore::new();
        assert_eq!(store.dominant_emotion(), Emotion::Neutral);

        store.commit(&event("a", &["x"]), &EmotionTag::new("a", Emotion::Joy, 0.9));
        store.commit(&event("b", &["y"]), &EmotionTag::new("b", Emotion::Fear, 0.5));
        store.commit(&event("c", &["z"]), &EmotionTag::new("c", Emotion::Fear, 0.5));
        assert_eq!(store.dominant_emotion(), Emotion::Fear);
    }

    #[test]
    fn default_store_has_category_buckets() {
        let store = MemoryStore::new();
        assert_eq!(store.index().len(), Emotion::CATEGORIES.len());
        assert!(store.is_empty());
        assert!(store.is_consistent());
    }
}
