//! Routing result types.
//!
//! `RoutingResult` is the final in-memory bundle handed back to the
//! caller after one ticket has been processed end-to-end. It is never
//! persisted.

use serde::{Deserialize, Serialize};

use crate::customer::LookupOutcome;
use crate::ticket::ClassifiedTicket;

/// The agents a ticket can be routed through
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AgentKind {
    /// Classifies the ticket and persists the ticket row (always runs)
    TicketAnalyzer,
    /// Customer lookup (runs only when customer data is needed and an
    /// id is known)
    DatabaseAgent,
    /// Technical solution drafter (runs only when technical help is
    /// needed)
    TechSolver,
    /// Composes the final reply (always runs)
    ReplyAgent,
}

impl std::fmt::Display for AgentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TicketAnalyzer => write!(f, "TicketAnalyzer"),
            Self::DatabaseAgent => write!(f, "DatabaseAgent"),
            Self::TechSolver => write!(f, "TechSolver"),
            Self::ReplyAgent => write!(f, "ReplyAgent"),
        }
    }
}

/// Final bundle for one processed ticket.
///
/// `agents_used` lists the agents that actually ran, in invocation
/// order; duplicates are impossible by construction. A failed lookup
/// still counts as customer info present — the database agent was
/// consulted, and its error-shaped outcome was passed downstream.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutingResult {
    pub final_reply: String,
    pub analysis: ClassifiedTicket,
    pub agents_used: Vec<AgentKind>,
    pub customer_info: Option<LookupOutcome>,
    pub technical_solution: Option<String>,
}

impl RoutingResult {
    /// Agent route as an arrow-joined display string, e.g.
    /// `TicketAnalyzer -> DatabaseAgent -> ReplyAgent`
    pub fn route_display(&self) -> String {
        self.agents_used
            .iter()
            .map(|a| a.to_string())
            .collect::<Vec<_>>()
            .join(" -> ")
    }
}
