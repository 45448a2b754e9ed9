//! Jira REST client for ticket creation.

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::JiraConfig;
use crate::error::RelayError;
use crate::incident::IncidentRecord;

/// Request timeout for tracker calls.
const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Jira REST API client.
///
/// Authenticates with basic auth (account email + API token) and creates
/// issues through the v3 REST API.
#[derive(Debug, Clone)]
pub struct JiraClient {
    base_url: String,
    email: String,
    api_token: String,
    project_id: String,
    issue_type: String,
    client: reqwest::Client,
}

impl JiraClient {
    /// Create a client from tracker settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(config: &JiraConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .context("Failed to build Jira HTTP client")?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            email: config.email.clone(),
            api_token: config.api_token.clone(),
            project_id: config.project_id.clone(),
            issue_type: config.issue_type.clone(),
            client,
        })
    }

    /// Create a tracker ticket for an incident.
    ///
    /// Exactly HTTP 201 with an issue id and key counts as success. Any
    /// other status, and any transport fault, is a ticket error carrying
    /// the tracker's status and response body verbatim.
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::Ticket`] when the ticket was not created.
    pub async fn create_ticket(&self, incident: &IncidentRecord) -> Result<CreatedTicket, RelayError> {
        let request = TicketRequest::for_incident(incident, &self.project_id, &self.issue_type);

        debug!(
            incident_id = %incident.id,
            issue_type = %self.issue_type,
            "Creating tracker ticket"
        );

        let response = self
            .client
            .post(format!("{}/rest/api/3/issue", self.base_url))
            .basic_auth(&self.email, Some(&self.api_token))
            .json(&request)
            .send()
            .await
            .map_err(|e| RelayError::Ticket {
                status: None,
                detail: e.to_string(),
            })?;

        let status = response.status();
        if status == StatusCode::CREATED {
            let created: CreatedIssue =
                response.json().await.map_err(|e| RelayError::Ticket {
                    status: Some(StatusCode::CREATED.as_u16()),
                    detail: format!("Unreadable create response: {e}"),
                })?;

            let url = format!("{}/browse/{}", self.base_url, created.key);
            debug!(ticket_key = %created.key, ticket_url = %url, "Tracker ticket created");

            Ok(CreatedTicket {
                id: created.id,
                key: created.key,
                url,
            })
        } else {
            let body = response.text().await.unwrap_or_default();
            warn!(status = %status, body = %body, "Tracker refused ticket creation");
            Err(RelayError::Ticket {
                status: Some(status.as_u16()),
                detail: format!("Jira returned {status}: {body}"),
            })
        }
    }
}

/// A successfully created tracker ticket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedTicket {
    /// Tracker-internal issue id
    pub id: String,
    /// Human-readable issue key (e.g. `OPS-1`)
    pub key: String,
    /// Browse URL for the ticket
    pub url: String,
}

// =============================================================================
// Wire format
// =============================================================================

/// Issue-create request body.
///
/// The incident id and detail URL travel as labels so tickets can be
/// cross-referenced from the paging service; `update` must be present even
/// when empty.
#[derive(Debug, Serialize)]
struct TicketRequest {
    fields: TicketFields,
    update: EmptyUpdate,
}

#[derive(Debug, Serialize)]
struct TicketFields {
    issuetype: IssueType,
    labels: Vec<String>,
    project: ProjectRef,
    summary: String,
}

#[derive(Debug, Serialize)]
struct IssueType {
    name: String,
}

#[derive(Debug, Serialize)]
struct ProjectRef {
    id: String,
}

#[derive(Debug, Default, Serialize)]
struct EmptyUpdate {}

impl TicketRequest {
    fn for_incident(incident: &IncidentRecord, project_id: &str, issue_type: &str) -> Self {
        Self {
            fields: TicketFields {
                issuetype: IssueType {
                    name: issue_type.to_string(),
                },
                labels: vec![incident.id.clone(), incident.html_url.clone()],
                project: ProjectRef {
                    id: project_id.to_string(),
                },
                summary: incident.summary.clone(),
            },
            update: EmptyUpdate {},
        }
    }
}

/// Subset of the issue-create response we rely on.
#[derive(Debug, Deserialize)]
struct CreatedIssue {
    id: String,
    key: String,
}
