//! The agent's whole mutable state in one place.

use serde::{Deserialize, Serialize};

use crate::attachment::AttachmentGraph;
use crate::config::YggConfig;
use crate::learning::LearningState;
use crate::memory::MemoryStore;
use crate::types::Emotion;

/// Memory store, learning records and attachment graph of one agent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Mind {
    /// Episodic memories and their emotion index.
    pub store: MemoryStore,
    /// Bias meter, emotional timeline and contradiction log.
    pub state: LearningState,
    /// Ego-centric attachments.
    pub graph: AttachmentGraph,
}

impl Mind {
    /// Empty mind using the configured attachment settings.
    #[must_use]
    pub fn new(config: &YggConfig) -> Self {
        Self {
            store: MemoryStore::new(),
            state: LearningState::new(),
            graph: AttachmentGraph::new(config.attachment.clone()),
        }
    }

    /// Emotion carrying the most accumulated intensity across memory.
    #[must_use]
    pub fn mood(&self) -> Emotion {
        self.store.dominant_emotion()
    }
}
