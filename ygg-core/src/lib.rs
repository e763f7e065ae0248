//! # Yggdrasil Core Library
//!
//! Emotional memory for a single agent that learns from being wrong.
//!
//! Every experienced moment arrives as an [`Event`], gets an emotion tag, and
//! is committed to a [`MemoryStore`]. Once memory exists, the agent first
//! *predicts* how a new event will feel from the most similar memories, then
//! compares against the actual feeling and adapts:
//!
//! - **Retrieval**: similarity-weighted k-nearest-neighbour vote ([`retrieval`])
//! - **Learning**: error-banded reinforcement, averaging, decay or
//!   contradiction ([`learning`])
//! - **Bias**: per-concept emotion counts, timelines and drift reports ([`bias`])
//! - **Attachment**: an ego-centric weighted graph of the people and things
//!   involved ([`attachment`])
//!
//! Everything here is synchronous and single-threaded. State is owned by the
//! caller and passed by `&mut`; the only I/O lives in [`persistence`].

#![deny(clippy::unwrap_used)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod attachment;
pub mod bias;
pub mod config;
pub mod error;
pub mod event;
pub mod learning;
pub mod memory;
pub mod metrics;
pub mod mind;
pub mod persistence;
pub mod retrieval;
pub mod types;

pub use attachment::AttachmentGraph;
pub use config::YggConfig;
pub use error::YggError;
pub use event::{Event, RawEvent};
pub use learning::{Learner, LearningOutcome, LearningState};
pub use memory::{Memory, MemoryStore};
pub use metrics::LearningStats;
pub use mind::Mind;
pub use retrieval::{Prediction, Predictor};
pub use types::*;
