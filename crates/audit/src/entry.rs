//! Audit entry types recorded for every relay invocation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Pipeline stage at which an invocation reached its terminal outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PipelineStage {
    /// Inbound request validation
    Validate,
    /// JSON body decoding
    Parse,
    /// Incident field extraction
    Extract,
    /// Tracker ticket creation
    Ticket,
    /// Chat notification delivery
    Notify,
}

impl PipelineStage {
    /// Get the stage as a string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Validate => "validate",
            Self::Parse => "parse",
            Self::Extract => "extract",
            Self::Ticket => "ticket",
            Self::Notify => "notify",
        }
    }
}

/// Terminal outcome kind for one relay invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditOutcome {
    /// Ticket created and notification delivered
    Success,
    /// Request rejected before decoding
    ValidationError,
    /// Body was not valid JSON
    ParseError,
    /// A required incident field was absent
    ExtractionError,
    /// Tracker refused or failed the ticket create
    TicketError,
    /// Ticket created but the notification failed
    NotifyError,
}

impl AuditOutcome {
    /// Get the outcome as a string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::ValidationError => "validation_error",
            Self::ParseError => "parse_error",
            Self::ExtractionError => "extraction_error",
            Self::TicketError => "ticket_error",
            Self::NotifyError => "notify_error",
        }
    }

    /// Whether this outcome records a failed invocation.
    #[must_use]
    pub const fn is_failure(&self) -> bool {
        !matches!(self, Self::Success)
    }
}

/// One durable record of a relay invocation's terminal outcome.
///
/// Exactly one entry is written per inbound event, whatever happens to the
/// event. The record is self-contained JSON so entries can be read straight
/// out of the object store without any relay code.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    /// When the outcome was reached
    #[serde(default = "Utc::now")]
    pub timestamp: DateTime<Utc>,
    /// Stage the invocation ended at
    pub stage: PipelineStage,
    /// Outcome kind
    pub outcome: AuditOutcome,
    /// Paging-service incident id, when extraction got that far
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub incident_id: Option<String>,
    /// Human-readable description of the outcome
    pub message: String,
}

impl AuditEntry {
    /// Create an entry timestamped now.
    #[must_use]
    pub fn new(stage: PipelineStage, outcome: AuditOutcome, message: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            stage,
            outcome,
            incident_id: None,
            message: message.into(),
        }
    }

    /// Attach the incident id the entry describes.
    #[must_use]
    pub fn with_incident_id(mut self, incident_id: impl Into<String>) -> Self {
        self.incident_id = Some(incident_id.into());
        self
    }
}
