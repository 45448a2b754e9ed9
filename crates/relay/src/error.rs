//! Relay pipeline error taxonomy.

use audit::{AuditOutcome, PipelineStage};
use axum::http::StatusCode;
use thiserror::Error;

/// Errors produced by the relay pipeline.
///
/// Every variant maps to exactly one pipeline stage, one audit outcome and
/// one HTTP status, so a handler can never pair a response with a
/// contradictory audit record.
#[derive(Debug, Error)]
pub enum RelayError {
    /// Request rejected before decoding
    #[error("{0}")]
    Validation(String),

    /// Request body is not valid JSON
    #[error("Invalid JSON payload: {0}")]
    Parse(#[from] serde_json::Error),

    /// A required incident field is absent
    #[error("Invalid payload: missing {key}")]
    Extraction {
        /// Fully qualified missing key (`incident`, `incident.id`, ...)
        key: &'static str,
    },

    /// Tracker refused or failed the ticket create
    #[error("Ticket creation failed: {detail}")]
    Ticket {
        /// Tracker HTTP status, when the call got that far
        status: Option<u16>,
        /// Tracker status line and body, verbatim
        detail: String,
    },

    /// Chat service refused or failed the notification
    #[error("Notification failed: {detail}")]
    Notify {
        /// Chat service HTTP status, when the call got that far
        status: Option<u16>,
        /// Chat service status line and body, verbatim
        detail: String,
    },
}

impl RelayError {
    /// Pipeline stage this error belongs to.
    #[must_use]
    pub const fn stage(&self) -> PipelineStage {
        match self {
            Self::Validation(_) => PipelineStage::Validate,
            Self::Parse(_) => PipelineStage::Parse,
            Self::Extraction { .. } => PipelineStage::Extract,
            Self::Ticket { .. } => PipelineStage::Ticket,
            Self::Notify { .. } => PipelineStage::Notify,
        }
    }

    /// Audit outcome kind recorded for this error.
    #[must_use]
    pub const fn outcome(&self) -> AuditOutcome {
        match self {
            Self::Validation(_) => AuditOutcome::ValidationError,
            Self::Parse(_) => AuditOutcome::ParseError,
            Self::Extraction { .. } => AuditOutcome::ExtractionError,
            Self::Ticket { .. } => AuditOutcome::TicketError,
            Self::Notify { .. } => AuditOutcome::NotifyError,
        }
    }

    /// HTTP status the webhook caller receives for this error.
    ///
    /// Notification failures stay 200: the ticket is the authoritative side
    /// effect, and it already exists by the time a notify error can occur.
    #[must_use]
    pub const fn http_status(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::Parse(_) | Self::Extraction { .. } => {
                StatusCode::BAD_REQUEST
            }
            Self::Ticket { .. } => StatusCode::BAD_GATEWAY,
            Self::Notify { .. } => StatusCode::OK,
        }
    }
}
