//! Specialist worker agents.
//!
//! Each agent wraps a single completion-service call (or a single
//! store query) behind a fixed instruction. Dependencies are injected
//! at construction; agents hold no other state.

pub mod classifier;
pub mod composer;
pub mod extractor;
pub mod lookup;
pub mod solver;

pub use classifier::TicketClassifier;
pub use composer::ReplyComposer;
pub use extractor::CustomerIdExtractor;
pub use lookup::CustomerLookup;
pub use solver::TechSolver;

/// All agent prompts run deterministically
pub(crate) const DEFAULT_TEMPERATURE: f32 = 0.0;

#[cfg(test)]
pub(crate) mod testing {
    use crate::llm::{CompletionService, LlmError};
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Completion double that returns one fixed reply (or one fixed
    /// failure) and records every prompt it saw.
    pub struct ScriptedLlm {
        reply: Option<String>,
        pub calls: Mutex<Vec<(String, String)>>,
    }

    impl ScriptedLlm {
        pub fn replying(reply: &str) -> Self {
            Self {
                reply: Some(reply.to_string()),
                calls: Mutex::new(Vec::new()),
            }
        }

        pub fn failing() -> Self {
            Self {
                reply: None,
                calls: Mutex::new(Vec::new()),
            }
        }

        pub fn last_user_prompt(&self) -> Option<String> {
            self.calls.lock().unwrap().last().map(|(_, user)| user.clone())
        }

        pub fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl CompletionService for ScriptedLlm {
        async fn complete(
            &self,
            system_prompt: &str,
            user_prompt: &str,
            _temperature: f32,
        ) -> Result<String, LlmError> {
            self.calls
                .lock()
                .unwrap()
                .push((system_prompt.to_string(), user_prompt.to_string()));

            match &self.reply {
                Some(reply) => Ok(reply.clone()),
                None => Err(LlmError::Status {
                    status: 503,
                    body: "scripted outage".to_string(),
                }),
            }
        }
    }
}
