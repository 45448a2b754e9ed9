//! The relay pipeline: validate, extract, ticket, notify, log.

use std::sync::Arc;

use audit::{AuditEntry, AuditOutcome, AuditSink, PipelineStage};
use axum::http::StatusCode;
use serde::Serialize;
use tracing::{error, info, warn};

use crate::error::RelayError;
use crate::incident::{decode_event, IncidentRecord};
use crate::jira::{CreatedTicket, JiraClient};
use crate::webex::WebexClient;

/// Terminal outcome of one relay invocation.
#[derive(Debug)]
pub enum RelayOutcome {
    /// Ticket created and notification delivered.
    Completed {
        /// Extracted incident
        incident: IncidentRecord,
        /// Created tracker ticket
        ticket: CreatedTicket,
    },
    /// Ticket created but the notification failed. The ticket is the
    /// authoritative side effect, so the caller still sees success.
    Degraded {
        /// Extracted incident
        incident: IncidentRecord,
        /// Created tracker ticket
        ticket: CreatedTicket,
        /// Notification failure
        error: RelayError,
    },
    /// The invocation failed at or before ticket creation.
    Failed {
        /// Incident id, when extraction got that far
        incident_id: Option<String>,
        /// Stage failure
        error: RelayError,
    },
}

impl RelayOutcome {
    /// HTTP status for this outcome. Always one of 200, 400 or 502.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Completed { .. } | Self::Degraded { .. } => StatusCode::OK,
            Self::Failed { error, .. } => error.http_status(),
        }
    }

    /// JSON body for this outcome. `message` is always present.
    #[must_use]
    pub fn response(&self) -> RelayResponse {
        match self {
            Self::Completed { .. } => RelayResponse {
                message: "success".to_string(),
                advisory: None,
            },
            Self::Degraded { error, .. } => RelayResponse {
                message: "success".to_string(),
                advisory: Some(error.to_string()),
            },
            Self::Failed { error, .. } => RelayResponse {
                // Upstream bodies stay in the audit log, not the caller
                // response.
                message: match error {
                    RelayError::Ticket { .. } => "ticket creation failed".to_string(),
                    _ => error.to_string(),
                },
                advisory: None,
            },
        }
    }
}

/// JSON body returned to the webhook caller.
#[derive(Debug, Serialize)]
pub struct RelayResponse {
    /// Human-readable result
    pub message: String,
    /// Set when the ticket was created but the notification failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub advisory: Option<String>,
}

/// The webhook relay pipeline.
///
/// One `process` call per inbound event: sequential stages, no retries, no
/// shared mutable state. Every invocation produces exactly one
/// [`RelayOutcome`] and exactly one durable audit entry, whatever the event
/// contains and whatever downstream services do.
pub struct IncidentRelay {
    jira: JiraClient,
    webex: WebexClient,
    audit: Arc<dyn AuditSink>,
}

impl IncidentRelay {
    /// Create a pipeline over the given clients and audit sink.
    #[must_use]
    pub fn new(jira: JiraClient, webex: WebexClient, audit: Arc<dyn AuditSink>) -> Self {
        Self { jira, webex, audit }
    }

    /// Run the full pipeline for one inbound event body.
    pub async fn process(&self, body: &[u8]) -> RelayOutcome {
        let outcome = self.run(body).await;
        self.record(&outcome).await;
        outcome
    }

    /// Pipeline stages up to the terminal outcome. Audit recording happens
    /// once, in [`process`](Self::process), never here.
    async fn run(&self, body: &[u8]) -> RelayOutcome {
        let incident = match decode_event(body) {
            Ok(incident) => incident,
            Err(error) => {
                warn!(error = %error, "Rejected inbound event");
                return RelayOutcome::Failed {
                    incident_id: None,
                    error,
                };
            }
        };

        info!(
            incident_id = %incident.id,
            summary = %incident.summary,
            "Accepted incident event"
        );

        let ticket = match self.jira.create_ticket(&incident).await {
            Ok(ticket) => ticket,
            Err(error) => {
                error!(
                    incident_id = %incident.id,
                    error = %error,
                    "Ticket creation failed, skipping notification"
                );
                return RelayOutcome::Failed {
                    incident_id: Some(incident.id),
                    error,
                };
            }
        };

        info!(
            incident_id = %incident.id,
            ticket_key = %ticket.key,
            ticket_url = %ticket.url,
            "Tracker ticket created"
        );

        match self.webex.post_message(&ticket.url).await {
            Ok(()) => {
                info!(
                    incident_id = %incident.id,
                    ticket_key = %ticket.key,
                    "Notification delivered"
                );
                RelayOutcome::Completed { incident, ticket }
            }
            Err(error) => {
                warn!(
                    incident_id = %incident.id,
                    ticket_key = %ticket.key,
                    error = %error,
                    "Notification failed, ticket creation stands"
                );
                RelayOutcome::Degraded {
                    incident,
                    ticket,
                    error,
                }
            }
        }
    }

    /// Write the single durable audit entry for this invocation. Sink
    /// failures are logged and swallowed; they never alter the outcome.
    async fn record(&self, outcome: &RelayOutcome) {
        let entry = match outcome {
            RelayOutcome::Completed { incident, ticket } => AuditEntry::new(
                PipelineStage::Notify,
                AuditOutcome::Success,
                format!(
                    "Ticket {} created and notification sent: {}",
                    ticket.key, ticket.url
                ),
            )
            .with_incident_id(&incident.id),
            RelayOutcome::Degraded {
                incident,
                ticket,
                error,
            } => AuditEntry::new(
                PipelineStage::Notify,
                AuditOutcome::NotifyError,
                format!("Ticket {} created but notification failed: {error}", ticket.key),
            )
            .with_incident_id(&incident.id),
            RelayOutcome::Failed { incident_id, error } => {
                let entry = AuditEntry::new(error.stage(), error.outcome(), error.to_string());
                match incident_id {
                    Some(id) => entry.with_incident_id(id),
                    None => entry,
                }
            }
        };

        if let Err(error) = self.audit.append(&entry).await {
            error!(sink = self.audit.name(), error = %error, "Failed to persist audit entry");
        }
    }
}
