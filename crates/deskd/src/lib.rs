//! Support desk orchestration daemon.
//!
//! Processes one support ticket at a time: classify, conditionally
//! look up the customer, conditionally draft a technical solution,
//! always compose a reply, and persist the recommendation.

pub mod agents;
pub mod config;
pub mod llm;
pub mod orchestrator;
pub mod prompts;
pub mod store;

pub use config::DeskConfig;
pub use llm::{CompletionClient, CompletionService, LlmError};
pub use orchestrator::SupportDesk;
pub use store::{SqliteStore, StoreError, SupportStore};
