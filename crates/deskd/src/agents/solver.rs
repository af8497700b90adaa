//! Technical solution drafter.
//!
//! Single stateless completion call. Customer info — including a
//! failed lookup outcome — is serialized into the prompt as opaque
//! context; absence gets a fixed placeholder. The returned text is
//! not validated, and a service failure is absorbed into
//! marker-prefixed prose.

use std::sync::Arc;
use tracing::warn;

use desk_common::LookupOutcome;

use crate::agents::DEFAULT_TEMPERATURE;
use crate::llm::{degraded_text, CompletionService};
use crate::prompts::{NO_CUSTOMER_CONTEXT, SOLVER_SYSTEM_PROMPT};

pub struct TechSolver<C> {
    llm: Arc<C>,
}

impl<C: CompletionService> TechSolver<C> {
    pub fn new(llm: Arc<C>) -> Self {
        Self { llm }
    }

    pub async fn draft(
        &self,
        ticket_text: &str,
        customer_info: Option<&LookupOutcome>,
    ) -> String {
        let context = match customer_info {
            Some(info) => serde_json::to_string(info)
                .unwrap_or_else(|_| NO_CUSTOMER_CONTEXT.to_string()),
            None => NO_CUSTOMER_CONTEXT.to_string(),
        };

        let user_prompt = format!(
            "Technical Issue:\n{ticket_text}\n\nContext:\nCustomer Info: {context}"
        );

        match self
            .llm
            .complete(SOLVER_SYSTEM_PROMPT, &user_prompt, DEFAULT_TEMPERATURE)
            .await
        {
            Ok(text) => text,
            Err(e) => {
                warn!("Technical drafting failed: {}", e);
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

    #[tokio::test]
    async fn test_customer_info_serialized_into_prompt() {
        let llm = Arc::new(ScriptedLlm::replying("Restart the sync worker."));
        let solver = TechSolver::new(llm.clone());

        let info = LookupOutcome::Found(CustomerRecord {
            name: "Mike Chen".to_string(),
            plan: Some("Business".to_string()),
            ..Default::default()
        });

        let solution = solver.draft("API returns 500", Some(&info)).await;
        assert_eq!(solution, "Restart the sync worker.");

        let prompt = llm.last_user_prompt().unwrap();
        assert!(prompt.contains("\"name\":\"Mike Chen\""));
        assert!(prompt.contains("\"plan\":\"Business\""));
    }

    #[tokio::test]
    async fn test_failed_lookup_is_still_context() {
        let llm = Arc::new(ScriptedLlm::replying("Check credentials."));
        let solver = TechSolver::new(llm.clone());

        let info = LookupOutcome::failed(LookupError::not_found("CUST999"));
        solver.draft("Login broken", Some(&info)).await;

        let prompt = llm.last_user_prompt().unwrap();
        assert!(prompt.contains("\"error\""));
        assert!(prompt.contains("CUST999"));
    }

    #[tokio::test]
    async fn test_absent_info_uses_placeholder() {
        let llm = Arc::new(ScriptedLlm::replying("Try again."));
        let solver = TechSolver::new(llm.clone());

        solver.draft("Timeouts everywhere", None).await;

        let prompt = llm.last_user_prompt().unwrap();
        assert!(prompt.contains("Customer Info: Not available"));
    }

    #[tokio::test]
    async fn test_service_failure_absorbed_as_marker_text() {
        let llm = Arc::new(ScriptedLlm::failing());
        let solver = TechSolver::new(llm);

        let solution = solver.draft("API down", None).await;
        assert!(solution.starts_with(COMPLETION_ERROR_MARKER));
    }
}
