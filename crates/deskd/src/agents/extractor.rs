//! Customer id extractor.
//!
//! Best-effort heuristic over the completion service: false negatives
//! are acceptable, fabricated ids are not. The service's raw answer is
//! validated before use — the `NONE` sentinel or anything without the
//! `CUST` prefix maps to no id, as does any transport failure.

use std::sync::Arc;
use tracing::{debug, info, warn};

use desk_common::customer::CUSTOMER_ID_PREFIX;

use crate::agents::DEFAULT_TEMPERATURE;
use crate::llm::CompletionService;
use crate::prompts::EXTRACTOR_SYSTEM_PROMPT;

/// Sentinel the extraction prompt requests when no id is present
const NO_ID_SENTINEL: &str = "NONE";

pub struct CustomerIdExtractor<C> {
    llm: Arc<C>,
}

impl<C: CompletionService> CustomerIdExtractor<C> {
    pub fn new(llm: Arc<C>) -> Self {
        Self { llm }
    }

    pub async fn extract(&self, ticket_text: &str) -> Option<String> {
        debug!("Extracting customer id from ticket...");

        let user_prompt =
            format!("Extract the customer ID from this support ticket:\n\n{ticket_text}");

        match self
            .llm
            .complete(EXTRACTOR_SYSTEM_PROMPT, &user_prompt, DEFAULT_TEMPERATURE)
            .await
        {
            Ok(text) => {
                let candidate = text.trim();
                if candidate == NO_ID_SENTINEL || !candidate.starts_with(CUSTOMER_ID_PREFIX) {
                    debug!("No valid customer id found");
                    None
                } else {
                    info!("Customer id extracted: {}", candidate);
                    Some(candidate.to_string())
                }
            }
            Err(e) => {
                warn!("Customer id extraction failed: {}", e);
                None
            }
        }
    }
}
