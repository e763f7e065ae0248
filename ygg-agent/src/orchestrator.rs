//! Two-phase run driver.
//!
//! Phase 1 (seeding) only stores what the agent perceives. Phase 2 (learning)
//! predicts each event first, compares the prediction with the ground truth
//! and lets the learner adapt memory. Both phases keep the attachment graph
//! current. Events are processed strictly one at a time.

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};
use ygg_core::bias;
use ygg_core::config::BiasConfig;
use ygg_core::persistence::ResultsWriter;
use ygg_core::{EmotionTag, Event, Learner, LearningStats, MemoryId, Mind, Predictor, YggConfig};

use crate::journal::JournalEntry;
use crate::perception::Perception;

/// Drives a [`Mind`] through journal entries using a [`Perception`].
pub struct Orchestrator<P: Perception> {
    perception: P,
    mind: Mind,
    predictor: Predictor,
    learner: Learner,
    stats: LearningStats,
    bias: BiasConfig,
    next_id: u64,
}

impl<P: Perception> Orchestrator<P> {
    /// Fresh agent configured from `config`.
    #[must_use]
    pub fn new(perception: P, config: &YggConfig) -> Self {
        Self {
            perception,
            mind: Mind::new(config),
            predictor: Predictor::new(config.predictor.clone()),
            learner: Learner::new(config.learning.clone()),
            stats: LearningStats::new(),
            bias: config.bias.clone(),
            next_id: 1,
        }
    }

    /// The agent's state.
    #[must_use]
    pub fn mind(&self) -> &Mind {
        &self.mind
    }

    /// Phase-2 statistics so far.
    #[must_use]
    pub fn stats(&self) -> &LearningStats {
        &self.stats
    }

    // -----------------------------------------------------------------------
    // Phase 1
    // -----------------------------------------------------------------------

    /// Store every event of `entries` under its ground-truth tag.
    pub async fn seed(&mut self, entries: &[JournalEntry]) {
        for (n, entry) in entries.iter().enumerate() {
            info!(entry = n + 1, of = entries.len(), date = %entry.date_line, "seeding entry");
            for event in self.encode_entry(entry).await {
                let tag = self.perception.tag(&event).await;
                self.mind.store.commit(&event, &tag);
                debug!(event = %event.id, emotion = %tag.emotion, intensity = tag.intensity, "stored");
                self.attach(&event, &tag).await;
            }
        }
        info!(memories = self.mind.store.len(), "seeding complete");
    }

    // -----------------------------------------------------------------------
    // Phase 2
    // -----------------------------------------------------------------------

    /// Predict, compare and adapt over every event of `entries`.
    pub async fn learn(&mut self, entries: &[JournalEntry]) {
        for (n, entry) in entries.iter().enumerate() {
            info!(entry = n + 1, of = entries.len(), date = %entry.date_line, "learning from entry");
            for event in self.encode_entry(entry).await {
                self.learn_event(&event).await;
            }
        }
        info!(
            events = self.stats.total_events,
            contradictions = self.stats.contradictions,
            new_memories = self.stats.new_memories_added,
            average_error = self.stats.average_error(),
            shifted = ?self.stats.shifted_concepts,
            "learning complete"
        );
    }

    async fn learn_event(&mut self, event: &Event) {
        self.stats.total_events += 1;
        let prediction = self.predictor.predict(&self.mind.store, event);
        self.stats.predictions_made += 1;

        let actual = self.perception.tag(event).await;
        if !actual.emotion.is_category() {
            warn!(event = %event.id, emotion = %actual.emotion, "tag names no category, skipping");
            return;
        }
        info!(
            event = %event.id,
            predicted = %prediction.emotion,
            predicted_intensity = prediction.intensity,
            actual = %actual.emotion,
            actual_intensity = actual.intensity,
            "prediction"
        );

        let outcome = self.learner.learn(
            &mut self.mind.store,
            &mut self.mind.state,
            event,
            &prediction,
            &actual,
        );
        self.stats.record(&outcome);

        if outcome.new_memory.is_some() {
            if !outcome.memory_committed {
                self.mind.store.commit(event, &actual);
            }
            let concept = event.concept();
            match bias::report(&self.mind.state.timeline, concept, self.bias.recent_window) {
                Ok(report) if report.shift_detected => self.stats.mark_shifted(concept),
                Ok(_) => {}
                Err(e) => debug!(concept, "no drift report: {e}"),
            }
        }

        self.attach(event, &actual).await;
    }

    // -----------------------------------------------------------------------
    // Shared steps
    // -----------------------------------------------------------------------

    /// Encode each sentence of `entry`. Ids are consumed even for sentences
    /// the collaborator could not encode.
    async fn encode_entry(&mut self, entry: &JournalEntry) -> Vec<Event> {
        let mut events = Vec::new();
        for sentence in entry.sentences() {
            let id = MemoryId::sequential(self.next_id);
            self.next_id += 1;
            if let Some(event) = self.perception.encode(&sentence, &id).await {
                events.push(event);
            }
        }
        events
    }

    async fn attach(&mut self, event: &Event, tag: &EmotionTag) {
        if event.raw_text.is_empty() {
            return;
        }
        let entities = self.perception.entities(&event.raw_text).await;
        if !entities.is_empty() {
            self.mind.graph.update(&entities, tag.emotion, tag.intensity);
        }
    }

    // -----------------------------------------------------------------------
    // Reporting
    // -----------------------------------------------------------------------

    /// Log memory count, the `limit` strongest attachments and the mood.
    pub fn log_summary(&self, phase: &str, limit: usize) {
        let strongest: Vec<String> = self
            .mind
            .graph
            .strongest(limit)
            .iter()
            .map(|edge| format!("{} ({:+.2})", edge.entity, edge.weight))
            .collect();
        info!(
            phase,
            memories = self.mind.store.len(),
            mood = %self.mind.mood(),
            strongest = ?strongest,
            "summary"
        );
    }

    /// Write the final state into `dir`.
    ///
    /// # Errors
    /// Returns the I/O or serialization error of the first file that fails.
    pub fn export(&self, dir: impl AsRef<Path>) -> ygg_core::error::Result<Vec<PathBuf>> {
        ResultsWriter::create(dir)?.write_all(&self.mind, &self.stats)
    }
}
