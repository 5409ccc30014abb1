//! # Workflow Events
//!
//! Diagnostic events emitted at every phase change of an execute call.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::catalog::OperationId;

/// Kind of workflow event
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowEventKind {
    /// Entered Busy
    ExecutionStarted,
    /// Multipart upload sent
    UploadStarted,
    /// Upload answered 2xx
    UploadCompleted,
    /// Nothing staged, straight to processing
    UploadSkipped,
    /// Process request sent
    ProcessStarted,
    /// Process answered 2xx without an error status
    ProcessCompleted,
    /// Staged artifacts dropped after a conversion
    StagingCleared,
    /// Whole attempt succeeded
    ExecutionSucceeded,
    /// Attempt failed; data carries the message
    ExecutionFailed,
    /// Overlapping execute refused while Busy
    ExecutionRejected,
}

/// An event in the workflow
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowEvent {
    pub timestamp: DateTime<Utc>,
    pub kind: WorkflowEventKind,
    /// Operation being executed, when one is selected
    #[serde(default)]
    pub operation: Option<OperationId>,
    /// Associated data (JSON)
    #[serde(default)]
    pub data: Option<serde_json::Value>,
}

impl WorkflowEvent {
    pub fn new(kind: WorkflowEventKind) -> Self {
        Self {
            timestamp: Utc::now(),
            kind,
            operation: None,
            data: None,
        }
    }

    pub fn for_operation(mut self, operation: OperationId) -> Self {
        self.operation = Some(operation);
        self
    }

    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = Some(data);
        self
    }
}
