//! Reply composer.
//!
//! Always the last agent to run: builds a context block from whatever
//! the pipeline gathered and asks the completion service for the
//! customer-facing email. Absent context fields are omitted, not
//! placeholdered. The caller always gets some reply text — a service
//! failure degrades into marker-prefixed prose.

use std::sync::Arc;
use tracing::warn;

use desk_common::{LookupOutcome, TicketAnalysis};

use crate::agents::DEFAULT_TEMPERATURE;
use crate::llm::{degraded_text, CompletionService};
use crate::prompts::composer_system_prompt;

pub struct ReplyComposer<C> {
    llm: Arc<C>,
}

impl<C: CompletionService> ReplyComposer<C> {
    pub fn new(llm: Arc<C>) -> Self {
        Self { llm }
    }

    pub async fn compose(
        &self,
        analysis: &TicketAnalysis,
        customer_info: Option<&LookupOutcome>,
        technical_solution: Option<&str>,
        ticket_text: &str,
    ) -> String {
        let mut context_lines = Vec::new();

        // Only a successful lookup contributes account specifics; a
        // failed one is omitted so the reply implicitly asks the
        // customer to identify themselves.
        if let Some(record) = customer_info.and_then(|info| info.record()) {
            context_lines.push(format!("Customer: {}", record.name));
            if let Some(plan) = &record.plan {
                context_lines.push(format!("Plan: {plan}"));
            }
        }
        if let Some(solution) = technical_solution {
            context_lines.push(format!("Technical Solution: {solution}"));
        }

        let user_prompt = format!(
            "Original ticket: {ticket_text}\n\nAvailable context:\n{}\n\nCompose a professional email reply.",
            context_lines.join("\n")
        );

        let system_prompt =
            composer_system_prompt(analysis.customer_sentiment, analysis.urgency);

        match self
            .llm
            .complete(&system_prompt, &user_prompt, DEFAULT_TEMPERATURE)
            .await
        {
            Ok(text) => text,
            Err(e) => {
                warn!("Reply composition failed: {}", e);
                degraded_text(&e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::testing::ScriptedLlm;
    use crate::llm::COMPLETION_ERROR_MARKER;
    use desk_common::{CustomerRecord, LookupError};

    fn analysis() -> TicketAnalysis {
        TicketAnalysis::fallback()
    }

    #[tokio::test]
    async fn test_context_block_includes_present_fields() {
        let llm = Arc::new(ScriptedLlm::replying("Sehr geehrte Frau Meier, ..."));
        let composer = ReplyComposer::new(llm.clone());

        let info = LookupOutcome::Found(CustomerRecord {
            name: "Sarah Meier".to_string(),
            plan: Some("Premium".to_string()),
            ..Default::default()
        });

        let reply = composer
            .compose(&analysis(), Some(&info), Some("Reboot the router."), "Hilfe!")
            .await;
        assert_eq!(reply, "Sehr geehrte Frau Meier, ...");

        let prompt = llm.last_user_prompt().unwrap();
        assert!(prompt.contains("Customer: Sarah Meier"));
        assert!(prompt.contains("Plan: Premium"));
        assert!(prompt.contains("Technical Solution: Reboot the router."));
        assert!(prompt.contains("Original ticket: Hilfe!"));
    }

    #[tokio::test]
    async fn test_absent_fields_are_omitted_not_placeholdered() {
        let llm = Arc::new(ScriptedLlm::replying("Antwort"));
        let composer = ReplyComposer::new(llm.clone());

        composer.compose(&analysis(), None, None, "Frage zum Service").await;

        let prompt = llm.last_user_prompt().unwrap();
        assert!(!prompt.contains("Customer:"));
        assert!(!prompt.contains("Plan:"));
        assert!(!prompt.contains("Technical Solution:"));
    }

    #[tokio::test]
    async fn test_failed_lookup_contributes_no_account_specifics() {
        let llm = Arc::new(ScriptedLlm::replying("Antwort"));
        let composer = ReplyComposer::new(llm.clone());

        let info = LookupOutcome::failed(LookupError::not_found("CUST404"));
        composer.compose(&analysis(), Some(&info), None, "Frage").await;

        let prompt = llm.last_user_prompt().unwrap();
        assert!(!prompt.contains("Customer:"));
        assert!(!prompt.contains("CUST404"));
    }

    #[tokio::test]
    async fn test_caller_always_gets_some_reply() {
        let llm = Arc::new(ScriptedLlm::failing());
        let composer = ReplyComposer::new(llm);

        let reply = composer.compose(&analysis(), None, None, "Frage").await;
        assert!(reply.starts_with(COMPLETION_ERROR_MARKER));
    }
}
