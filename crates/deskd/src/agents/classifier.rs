//! Ticket classifier.
//!
//! Turns raw ticket text into a `TicketAnalysis` and persists the
//! ticket row. Classification is total: a failed or garbled
//! completion yields the fixed fallback analysis, tagged with its
//! reason, and the insert is still attempted. Insert failure yields a
//! null ticket id; it never propagates.

use std::sync::Arc;
use tracing::{info, warn};

use desk_common::{AnalysisOrigin, ClassifiedTicket, TicketAnalysis};

use crate::agents::DEFAULT_TEMPERATURE;
use crate::llm::CompletionService;
use crate::prompts::CLASSIFIER_SYSTEM_PROMPT;
use crate::store::SupportStore;

pub struct TicketClassifier<C, S> {
    llm: Arc<C>,
    store: Arc<S>,
}

impl<C: CompletionService, S: SupportStore> TicketClassifier<C, S> {
    pub fn new(llm: Arc<C>, store: Arc<S>) -> Self {
        Self { llm, store }
    }

    /// Classify `ticket_text` and insert the ticket row.
    pub async fn classify(
        &self,
        ticket_text: &str,
        customer_id: Option<&str>,
    ) -> ClassifiedTicket {
        let user_prompt = format!("Analyze this support ticket:\n\n{ticket_text}");

        let (analysis, origin) = match self
            .llm
            .complete(CLASSIFIER_SYSTEM_PROMPT, &user_prompt, DEFAULT_TEMPERATURE)
            .await
        {
            Ok(text) => match serde_json::from_str::<TicketAnalysis>(strip_code_fence(&text)) {
                Ok(analysis) => (analysis, AnalysisOrigin::Genuine),
                Err(e) => {
                    warn!("Unparseable classification, using fallback: {}", e);
                    (
                        TicketAnalysis::fallback(),
                        AnalysisOrigin::Fallback {
                            reason: format!("unparseable classification: {e}"),
                        },
                    )
                }
            },
            Err(e) => {
                warn!("Classification call failed, using fallback: {}", e);
                (
                    TicketAnalysis::fallback(),
                    AnalysisOrigin::Fallback {
                        reason: e.to_string(),
                    },
                )
            }
        };

        info!("Saving ticket to store...");
        let ticket_id = match self
            .store
            .insert_ticket(&analysis, customer_id, ticket_text)
            .await
        {
            Ok(id) => {
                info!("Ticket saved with id {}", id);
                Some(id)
            }
            Err(e) => {
                warn!("Could not save ticket: {}", e);
                None
            }
        };

        ClassifiedTicket {
            analysis,
            origin,
            ticket_id,
        }
    }

    /// Attach the recommended reply to the persisted ticket row.
    /// No-op when the insert never produced an id; store errors are
    /// logged, never raised.
    pub async fn attach_reply(&self, ticket_id: Option<i64>, reply: &str) {
        let Some(id) = ticket_id else {
            return;
        };

        match self.store.attach_reply(id, reply).await {
            Ok(()) => info!("Ticket {} updated with recommended reply", id),
            Err(e) => warn!("Could not update ticket {}: {}", id, e),
        }
    }
}

/// Strip a fenced-code wrapper (```json ... ``` or ``` ... ```) the
/// model sometimes puts around its JSON.
fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    let rest = rest.trim_start_matches(['\r', '\n']);
    match rest.strip_suffix("```") {
        Some(inner) => inner.trim_end(),
        None => rest,
    }
}
