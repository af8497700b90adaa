//! Customer records, lookup scopes, and lookup outcomes.
//!
//! The customer table is read-only from the pipeline's perspective.
//! Lookups never raise: failures are values (`LookupOutcome::Failed`)
//! that downstream prompting can still inspect and pass along as
//! context.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ticket::TicketType;

/// Customer id prefix accepted by lookup and extraction
pub const CUSTOMER_ID_PREFIX: &str = "CUST";

/// Which subset of customer fields a lookup retrieves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryScope {
    /// Name, plan, last payment, status
    Billing,
    /// Name, support history, join date
    History,
    /// All fields
    Full,
}

impl QueryScope {
    /// Scope selection by ticket type: billing tickets get billing
    /// data, account tickets get history, everything else gets the
    /// full record.
    pub fn for_ticket(ticket_type: TicketType) -> Self {
        match ticket_type {
            TicketType::Billing => Self::Billing,
            TicketType::Account => Self::History,
            _ => Self::Full,
        }
    }
}

impl std::fmt::Display for QueryScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Billing => write!(f, "billing"),
            Self::History => write!(f, "history"),
            Self::Full => write!(f, "full"),
        }
    }
}

/// Customer data snapshot.
///
/// Field presence depends on the query scope; absent fields are
/// omitted from serialized prompt context rather than placeholdered.
/// Dates are ISO `YYYY-MM-DD` strings, and a stored-null support
/// history is normalized to an empty list wherever the scope selects
/// it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<String>,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub join_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_payment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub support_history: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

/// Why a lookup failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LookupErrorKind {
    /// Id empty or missing the CUST prefix
    InvalidIdFormat,
    /// No row for this id
    NotFound,
    /// Connection or query failure
    StoreUnavailable,
}

/// Lookup failure as an inspectable value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[error("{message}")]
pub struct LookupError {
    pub kind: LookupErrorKind,
    pub message: String,
}

impl LookupError {
    pub fn invalid_format(customer_id: &str) -> Self {
        Self {
            kind: LookupErrorKind::InvalidIdFormat,
            message: format!(
                "Invalid customer ID format: {customer_id}. Expected format: CUSTXXX"
            ),
        }
    }

    pub fn not_found(customer_id: &str) -> Self {
        Self {
            kind: LookupErrorKind::NotFound,
            message: format!("Customer {customer_id} not found"),
        }
    }

    pub fn store_unavailable(message: impl Into<String>) -> Self {
        Self {
            kind: LookupErrorKind::StoreUnavailable,
            message: message.into(),
        }
    }
}

/// Result of a customer lookup.
///
/// Serialized untagged so a found record renders as the plain customer
/// object and a failure renders as an `{"error": ...}` object — the
/// shape downstream prompts receive as opaque context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LookupOutcome {
    Found(CustomerRecord),
    Failed { error: LookupError },
}

impl LookupOutcome {
    pub fn failed(error: LookupError) -> Self {
        Self::Failed { error }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }

    pub fn record(&self) -> Option<&CustomerRecord> {
        match self {
            Self::Found(record) => Some(record),
            Self::Failed { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&LookupError> {
        match self {
            Self::Found(_) => None,
            Self::Failed { error } => Some(error),
        }
    }
}
