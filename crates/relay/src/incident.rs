//! Inbound incident event decoding.
//!
//! The paging service posts JSON shaped like
//! `{"incident": {"id", "summary", "html_url"}}`, but some delivery paths
//! wrap the whole payload in an extra `body` field. Decoding unwraps at
//! most one such level before extracting the incident fields; deeper
//! wrapping fails extraction rather than being probed for.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::RelayError;

/// Incident fields extracted from a paging-service event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncidentRecord {
    /// Paging-service incident identifier
    pub id: String,
    /// Human-readable incident summary
    pub summary: String,
    /// Incident detail URL
    pub html_url: String,
}

/// Decode a raw webhook body into an [`IncidentRecord`].
///
/// # Errors
///
/// Returns a validation error for an empty body, a parse error for
/// malformed JSON, and an extraction error naming the first missing
/// incident field.
pub fn decode_event(body: &[u8]) -> Result<IncidentRecord, RelayError> {
    if body.is_empty() {
        return Err(RelayError::Validation(
            "Invalid request: missing request body".to_string(),
        ));
    }

    let payload: Value = serde_json::from_slice(body)?;

    // Unwrap at most one level of `body` wrapping.
    let payload = payload.get("body").unwrap_or(&payload);

    extract_incident(payload)
}

/// Pull the required incident fields out of an unwrapped payload.
fn extract_incident(payload: &Value) -> Result<IncidentRecord, RelayError> {
    let incident = payload
        .get("incident")
        .ok_or(RelayError::Extraction { key: "incident" })?;

    Ok(IncidentRecord {
        id: require_str(incident, "id", "incident.id")?,
        summary: require_str(incident, "summary", "incident.summary")?,
        html_url: require_str(incident, "html_url", "incident.html_url")?,
    })
}

/// Require a non-empty string field, reporting its fully qualified key.
fn require_str(value: &Value, field: &str, key: &'static str) -> Result<String, RelayError> {
    value
        .get(field)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .ok_or(RelayError::Extraction { key })
}
