//! # ygg-llm: LLM collaborator layer for Yggdrasil
//!
//! The core never talks to a model. Everything it needs from one (structured
//! events, ground-truth emotion tags, entity lists) comes through this crate:
//!
//! - **Client**: Ollama or any OpenAI-compatible endpoint, with timeouts and
//!   retries ([`client`])
//! - **Prompts**: built-in templates, overridable from TOML ([`prompt`])
//! - **Extraction**: pulling JSON and lists out of chatty responses ([`parse`])
//!
//! Failures surface as [`LlmError`]; turning them into defaults is the
//! caller's job.

#![deny(clippy::unwrap_used)]
#![warn(missing_docs)]

pub mod client;
pub mod error;
pub mod parse;
pub mod prompt;
pub mod types;

pub use client::{LlmClient, LlmProvider};
pub use error::LlmError;
pub use types::{LlmRequest, LlmResponse, Sampling};
