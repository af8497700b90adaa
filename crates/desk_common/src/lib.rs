//! Shared types for the support desk pipeline.
//!
//! Kept dependency-light so both the daemon and any future control
//! tooling can speak the same ticket, customer, and routing types.

pub mod customer;
pub mod routing;
pub mod ticket;

pub use customer::{CustomerRecord, LookupError, LookupErrorKind, LookupOutcome, QueryScope};
pub use routing::{AgentKind, RoutingResult};
pub use ticket::{
    AnalysisOrigin, ClassifiedTicket, ResolutionTime, Sentiment, TicketAnalysis, TicketType,
    Urgency,
};
