//! # ygg-agent: the Yggdrasil learning driver
//!
//! Connects the collaborator layer (`ygg-llm`) to the memory engine
//! (`ygg-core`) and runs the two learning phases over a diary:
//!
//! - [`journal`]: dated entries and sentence segmentation
//! - [`perception`]: the [`Perception`] trait and its LLM-backed implementation
//! - [`orchestrator`]: seeding, contradiction-driven learning, export
//!
//! The `ygg` binary wraps all of this in a CLI.

#![deny(clippy::unwrap_used)]
#![warn(missing_docs)]

pub mod journal;
pub mod orchestrator;
pub mod perception;

pub use journal::{JournalEntry, parse_journal, read_journal};
pub use orchestrator::Orchestrator;
pub use perception::{LlmPerception, Perception};
