//! Routing decision procedure.
//!
//! One ticket in, one `RoutingResult` out. The steps run strictly in
//! sequence with no branching back: identify, classify, gather
//! customer data, draft a technical solution, compose the reply,
//! persist the recommendation, summarize. Every external failure has
//! been absorbed further down, so processing itself cannot fail.

use std::sync::Arc;
use tracing::info;

use desk_common::{AgentKind, QueryScope, RoutingResult, Urgency};

use crate::agents::{
    CustomerIdExtractor, CustomerLookup, ReplyComposer, TechSolver, TicketClassifier,
};
use crate::llm::CompletionService;
use crate::store::SupportStore;

/// The support desk: all specialist agents wired to one completion
/// service and one store, injected at construction.
pub struct SupportDesk<C, S> {
    classifier: TicketClassifier<C, S>,
    extractor: CustomerIdExtractor<C>,
    lookup: CustomerLookup<S>,
    solver: TechSolver<C>,
    composer: ReplyComposer<C>,
}

impl<C: CompletionService, S: SupportStore> SupportDesk<C, S> {
    pub fn new(llm: Arc<C>, store: Arc<S>) -> Self {
        Self {
            classifier: TicketClassifier::new(Arc::clone(&llm), Arc::clone(&store)),
            extractor: CustomerIdExtractor::new(Arc::clone(&llm)),
            lookup: CustomerLookup::new(store),
            solver: TechSolver::new(Arc::clone(&llm)),
            composer: ReplyComposer::new(llm),
        }
    }

    /// Process one support ticket end-to-end.
    pub async fn process_ticket(
        &self,
        ticket_text: &str,
        customer_id: Option<&str>,
    ) -> RoutingResult {
        info!("=== processing support ticket ({} chars) ===", ticket_text.len());

        // Step 1: identify - extract an id only when the caller gave none
        let customer_id = match customer_id {
            Some(id) => Some(id.to_string()),
            None => self.extractor.extract(ticket_text).await,
        };

        // Step 2: classify and persist the ticket row
        let classified = self
            .classifier
            .classify(ticket_text, customer_id.as_deref())
            .await;
        let analysis = classified.analysis.clone();

        info!(
            "Analysis: type={} urgency={} customer_data={} technical={} sentiment={}",
            analysis.ticket_type,
            analysis.urgency,
            analysis.requires_customer_data,
            analysis.requires_technical_help,
            analysis.customer_sentiment
        );
        if let Some(id) = &customer_id {
            info!("Customer id: {}", id);
        }
        if classified.origin.is_fallback() {
            info!("Classification degraded to fallback");
        }

        // Step 3: gather customer data (three-way branch)
        let customer_info = if analysis.requires_customer_data {
            match customer_id.as_deref() {
                Some(id) => {
                    let scope = QueryScope::for_ticket(analysis.ticket_type);
                    info!("Customer data needed, querying with {} scope", scope);
                    Some(self.lookup.lookup(id, scope).await)
                }
                None => {
                    info!("Customer data needed but no id known; reply will omit account specifics");
                    None
                }
            }
        } else {
            info!("No customer data needed, skipping lookup");
            None
        };

        // Step 4: technical solving. Critical urgency is noted for the
        // caller's priority handling but does not change the route.
        let technical_solution = if analysis.requires_technical_help {
            if analysis.urgency == Urgency::Critical {
                info!("Critical urgency: flagged for priority handling");
            }
            info!("Technical issue detected, drafting solution");
            Some(
                self.solver
                    .draft(ticket_text, customer_info.as_ref())
                    .await,
            )
        } else {
            info!("No technical help needed, skipping solver");
            None
        };

        // Step 5: always compose the reply
        let final_reply = self
            .composer
            .compose(
                &analysis,
                customer_info.as_ref(),
                technical_solution.as_deref(),
                ticket_text,
            )
            .await;

        // Step 6: persist the recommendation (no-op without a ticket id)
        self.classifier
            .attach_reply(classified.ticket_id, &final_reply)
            .await;

        // Step 7: summarize. A failed lookup still counts as consulted.
        let mut agents_used = vec![AgentKind::TicketAnalyzer];
        if customer_info.is_some() {
            agents_used.push(AgentKind::DatabaseAgent);
        }
        if technical_solution.is_some() {
            agents_used.push(AgentKind::TechSolver);
        }
        agents_used.push(AgentKind::ReplyAgent);

        let result = RoutingResult {
            final_reply,
            analysis: classified,
            agents_used,
            customer_info,
            technical_solution,
        };

        info!(
            "Route: {} ({}/4 agents), estimated resolution {}",
            result.route_display(),
            result.agents_used.len(),
            result.analysis.analysis.estimated_resolution_time
        );

        result
    }
}
