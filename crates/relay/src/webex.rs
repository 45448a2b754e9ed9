//! Webex chat client for ticket notifications.

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::StatusCode;
use serde::Serialize;
use tracing::{debug, warn};

use crate::config::WebexConfig;
use crate::error::RelayError;

/// Default Webex API endpoint.
const WEBEX_API_URL: &str = "https://webexapis.com";

/// Request timeout for chat calls.
const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Webex messages API client.
#[derive(Debug, Clone)]
pub struct WebexClient {
    api_url: String,
    access_token: String,
    room_id: String,
    client: reqwest::Client,
}

impl WebexClient {
    /// Create a client from chat settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(config: &WebexConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .context("Failed to build Webex HTTP client")?;

        let api_url = config
            .api_url
            .clone()
            .unwrap_or_else(|| WEBEX_API_URL.to_string());

        Ok(Self {
            api_url: api_url.trim_end_matches('/').to_string(),
            access_token: config.access_token.clone(),
            room_id: config.room_id.clone(),
            client,
        })
    }

    /// Post a text message to the configured room.
    ///
    /// Exactly HTTP 200 counts as success. Any other status, and any
    /// transport fault, is a notify error carrying the chat service's
    /// status and response body verbatim.
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::Notify`] when the message was not delivered.
    pub async fn post_message(&self, text: &str) -> Result<(), RelayError> {
        let payload = MessageRequest {
            room_id: &self.room_id,
            text,
        };

        debug!(room_id = %self.room_id, "Posting chat notification");

        let response = self
            .client
            .post(format!("{}/v1/messages", self.api_url))
            .bearer_auth(&self.access_token)
            .json(&payload)
            .send()
            .await
            .map_err(|e| RelayError::Notify {
                status: None,
                detail: e.to_string(),
            })?;

        let status = response.status();
        if status == StatusCode::OK {
            debug!(room_id = %self.room_id, "Chat notification sent");
            Ok(())
        } else {
            let body = response.text().await.unwrap_or_default();
            warn!(status = %status, body = %body, "Chat service refused notification");
            Err(RelayError::Notify {
                status: Some(status.as_u16()),
                detail: format!("Webex returned {status}: {body}"),
            })
        }
    }
}

/// Message-create request body.
#[derive(Debug, Serialize)]
struct MessageRequest<'a> {
    #[serde(rename = "roomId")]
    room_id: &'a str,
    text: &'a str,
}
