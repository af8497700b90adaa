//! Ticket classification types.
//!
//! Every incoming support ticket is classified once by the completion
//! service into a `TicketAnalysis`. Classification never fails toward
//! the caller: a garbled or unavailable service yields the documented
//! fallback analysis, tagged via `AnalysisOrigin` so internal callers
//! can tell a genuine classification from a degraded default.

use serde::{Deserialize, Serialize};

/// Ticket category driving lookup scope selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TicketType {
    Billing,
    Technical,
    Account,
    #[default]
    GeneralInquiry,
    Complaint,
}

impl std::fmt::Display for TicketType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Billing => write!(f, "billing"),
            Self::Technical => write!(f, "technical"),
            Self::Account => write!(f, "account"),
            Self::GeneralInquiry => write!(f, "general_inquiry"),
            Self::Complaint => write!(f, "complaint"),
        }
    }
}

/// Ticket urgency. Critical urgency is surfaced to the caller for
/// priority handling but does not change which agents run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Urgency {
    Low,
    #[default]
    Medium,
    High,
    Critical,
}

impl std::fmt::Display for Urgency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Low => write!(f, "low"),
            Self::Medium => write!(f, "medium"),
            Self::High => write!(f, "high"),
            Self::Critical => write!(f, "critical"),
        }
    }
}

/// Customer sentiment, used to steer reply tone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Sentiment {
    Positive,
    #[default]
    Neutral,
    Frustrated,
    Angry,
}

impl std::fmt::Display for Sentiment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Positive => write!(f, "positive"),
            Self::Neutral => write!(f, "neutral"),
            Self::Frustrated => write!(f, "frustrated"),
            Self::Angry => write!(f, "angry"),
        }
    }
}

/// Estimated resolution time buckets. Wire names are the exact strings
/// the classifier prompt asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ResolutionTime {
    #[serde(rename = "5min")]
    Min5,
    #[default]
    #[serde(rename = "15min")]
    Min15,
    #[serde(rename = "30min")]
    Min30,
    #[serde(rename = "1hour+")]
    HourPlus,
}

impl std::fmt::Display for ResolutionTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Min5 => write!(f, "5min"),
            Self::Min15 => write!(f, "15min"),
            Self::Min30 => write!(f, "30min"),
            Self::HourPlus => write!(f, "1hour+"),
        }
    }
}

/// Structured routing metadata derived from ticket text.
///
/// Exactly the six fields the classifier prompt requests. Never
/// partially filled: parsing is all-or-nothing, with `fallback()`
/// substituted wholesale on failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketAnalysis {
    pub ticket_type: TicketType,
    pub urgency: Urgency,
    pub requires_customer_data: bool,
    pub requires_technical_help: bool,
    pub customer_sentiment: Sentiment,
    pub estimated_resolution_time: ResolutionTime,
}

impl TicketAnalysis {
    /// Fixed analysis substituted when the completion service fails or
    /// returns something unparseable.
    pub fn fallback() -> Self {
        Self {
            ticket_type: TicketType::GeneralInquiry,
            urgency: Urgency::Medium,
            requires_customer_data: true,
            requires_technical_help: false,
            customer_sentiment: Sentiment::Neutral,
            estimated_resolution_time: ResolutionTime::Min15,
        }
    }
}

/// Whether an analysis came from the completion service or from the
/// fixed fallback value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisOrigin {
    /// Parsed from a real completion service response
    Genuine,
    /// Degraded default; reason records what went wrong
    Fallback { reason: String },
}

impl AnalysisOrigin {
    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback { .. })
    }
}

/// Classification result together with its persistence outcome.
///
/// `ticket_id` is assigned by the store at insert time and is the only
/// valid key for the later reply update. `None` means the insert
/// failed; the update step is then skipped.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifiedTicket {
    pub analysis: TicketAnalysis,
    pub origin: AnalysisOrigin,
    pub ticket_id: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analysis_wire_names() {
        let analysis = TicketAnalysis {
            ticket_type: TicketType::GeneralInquiry,
            urgency: Urgency::Critical,
            requires_customer_data: false,
            requires_technical_help: true,
            customer_sentiment: Sentiment::Frustrated,
            estimated_resolution_time: ResolutionTime::HourPlus,
        };

        let json = serde_json::to_value(&analysis).unwrap();
        assert_eq!(json["ticket_type"], "general_inquiry");
        assert_eq!(json["urgency"], "critical");
        assert_eq!(json["customer_sentiment"], "frustrated");
        assert_eq!(json["estimated_resolution_time"], "1hour+");
    }

    #[test]
    fn test_parse_classifier_payload() {
        let json = r#"{
            "ticket_type": "billing",
            "urgency": "medium",
            "requires_customer_data": true,
            "requires_technical_help": false,
            "customer_sentiment": "neutral",
            "estimated_resolution_time": "15min"
        }"#;

        let analysis: TicketAnalysis = serde_json::from_str(json).unwrap();
        assert_eq!(analysis.ticket_type, TicketType::Billing);
        assert!(analysis.requires_customer_data);
        assert!(!analysis.requires_technical_help);
        assert_eq!(analysis.estimated_resolution_time, ResolutionTime::Min15);
    }

    #[test]
    fn test_parse_rejects_missing_field() {
        // Five of six fields: must fail as a whole, never partially fill
        let json = r#"{
            "ticket_type": "billing",
            "urgency": "medium",
            "requires_customer_data": true,
            "requires_technical_help": false,
            "customer_sentiment": "neutral"
        }"#;

        assert!(serde_json::from_str::<TicketAnalysis>(json).is_err());
    }

    #[test]
    fn test_fallback_is_documented_value() {
        let fb = TicketAnalysis::fallback();
        assert_eq!(fb.ticket_type, TicketType::GeneralInquiry);
        assert_eq!(fb.urgency, Urgency::Medium);
        assert!(fb.requires_customer_data);
        assert!(!fb.requires_technical_help);
        assert_eq!(fb.customer_sentiment, Sentiment::Neutral);
        assert_eq!(fb.estimated_resolution_time, ResolutionTime::Min15);
    }

    #[test]
    fn test_display_matches_wire_names() {
        assert_eq!(TicketType::GeneralInquiry.to_string(), "general_inquiry");
        assert_eq!(ResolutionTime::HourPlus.to_string(), "1hour+");
        assert_eq!(Sentiment::Angry.to_string(), "angry");
    }
}
