//! In-memory audit sink for tests and local runs.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::entry::AuditEntry;
use crate::error::SinkError;
use crate::AuditSink;

/// Audit sink that keeps entries in memory.
///
/// Lets tests assert exactly which entries a pipeline wrote, and stands in
/// for the object store when running without one.
#[derive(Debug, Default)]
pub struct MemorySink {
    entries: Mutex<Vec<AuditEntry>>,
}

impl MemorySink {
    /// Create an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all entries appended so far.
    #[must_use]
    pub fn entries(&self) -> Vec<AuditEntry> {
        self.entries.lock().unwrap().clone()
    }

    /// Number of entries appended so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    /// Whether no entries have been appended.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl AuditSink for MemorySink {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn append(&self, entry: &AuditEntry) -> Result<(), SinkError> {
        self.entries.lock().unwrap().push(entry.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::{AuditOutcome, PipelineStage};

    #[tokio::test]
    async fn test_append_records_entries_in_order() {
        let sink = MemorySink::new();
        assert!(sink.is_empty());

        sink.append(&AuditEntry::new(
            PipelineStage::Validate,
            AuditOutcome::ValidationError,
            "first",
        ))
        .await
        .unwrap();
        sink.append(&AuditEntry::new(
            PipelineStage::Notify,
            AuditOutcome::Success,
            "second",
        ))
        .await
        .unwrap();

        let entries = sink.entries();
        assert_eq!(sink.len(), 2);
        assert_eq!(entries[0].message, "first");
        assert_eq!(entries[1].outcome, AuditOutcome::Success);
    }
}
