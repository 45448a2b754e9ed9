//! Durable audit logging for the incident relay.
//!
//! Every relay invocation ends in exactly one [`AuditEntry`] describing the
//! stage it reached and the outcome kind, appended to an [`AuditSink`]. The
//! production sink is [`BlobStore`], which writes one JSON object per entry
//! to an S3-compatible store; [`MemorySink`] backs tests.
//!
//! # Usage
//!
//! ```no_run
//! use audit::{AuditEntry, AuditOutcome, AuditSink, BlobStore, PipelineStage};
//!
//! # async fn demo() -> Result<(), audit::SinkError> {
//! let store = BlobStore::new("http://localhost:9000", "audit-logs", "relay")?
//!     .with_token("store-token");
//!
//! let entry = AuditEntry::new(
//!     PipelineStage::Notify,
//!     AuditOutcome::Success,
//!     "Ticket OPS-1 created and notification sent",
//! );
//! store.append(&entry).await?;
//! # Ok(())
//! # }
//! ```

#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod blob;
pub mod entry;
pub mod error;
pub mod memory;

pub use blob::BlobStore;
pub use entry::{AuditEntry, AuditOutcome, PipelineStage};
pub use error::SinkError;
pub use memory::MemorySink;

use async_trait::async_trait;

/// Destination for durable audit entries.
#[async_trait]
pub trait AuditSink: Send + Sync {
    /// Get the name of this sink.
    fn name(&self) -> &'static str;

    /// Persist one entry.
    ///
    /// # Errors
    ///
    /// Returns an error if the entry could not be durably recorded.
    async fn append(&self, entry: &AuditEntry) -> Result<(), SinkError>;
}
