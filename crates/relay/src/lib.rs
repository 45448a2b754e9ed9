//! Incident webhook relay.
//!
//! Receives incident alerts from a paging service, files a tracking ticket
//! in Jira, posts the ticket link to a Webex room, and writes one durable
//! audit record per invocation.
//!
//! The pipeline runs the same five stages for every inbound event:
//!
//! 1. Validate the raw request body
//! 2. Parse it as JSON, unwrapping one optional `body` envelope
//! 3. Extract the incident id, summary and detail URL
//! 4. Create the tracker ticket (authoritative side effect)
//! 5. Post the ticket link to the chat room
//!
//! Downstream faults never escape as transport errors: the caller always
//! receives a structured JSON response, and a notification failure after a
//! successful ticket create still reports success.

#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod incident;
pub mod jira;
pub mod pipeline;
pub mod server;
pub mod webex;

pub use config::Config;
pub use error::RelayError;
pub use incident::IncidentRecord;
pub use jira::{CreatedTicket, JiraClient};
pub use pipeline::{IncidentRelay, RelayOutcome, RelayResponse};
pub use webex::WebexClient;
