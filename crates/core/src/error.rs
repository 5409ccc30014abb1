//! # Errors
//!
//! Typed failures for the catalog, the service seam and the execute call.
//! Every [`ExecuteError`] renders to the exact text stored in the
//! workbench's error slot.

use thiserror::Error;

use crate::catalog::{Dependency, OperationId};

/// Shown when execute is triggered without a selection
pub const NO_SELECTION_MESSAGE: &str = "Please select an operation to perform";
/// Fallback when a failed upload carries no usable message
pub const UPLOAD_FAILED_MESSAGE: &str = "File upload failed";
/// Fallback when a failed process call carries no usable message
pub const PROCESSING_FAILED_MESSAGE: &str = "Processing failed";
/// Fallback for unexpected failures without any text
pub const GENERIC_ERROR_MESSAGE: &str = "An error occurred";

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("Unknown operation: {0}")]
    UnknownOperation(String),
    #[error("Operation listed twice: {0}")]
    DuplicateOperation(OperationId),
}

/// Failure to reach the processing service at all
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Connection refused, DNS failure, body read error and the like
    #[error("{0}")]
    Transport(String),
    /// The request could not be assembled
    #[error("Failed to build request: {0}")]
    Request(String),
}

impl From<reqwest::Error> for ServiceError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_builder() {
            ServiceError::Request(e.to_string())
        } else {
            ServiceError::Transport(e.to_string())
        }
    }
}

/// Why an execute attempt failed
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ExecuteError {
    #[error("{}", NO_SELECTION_MESSAGE)]
    NoSelection,

    /// Another execute call is in flight
    #[error("An operation is already in progress")]
    Busy,

    /// Rejected locally by the enforcing gating policy
    #[error("{message}")]
    DependencyMissing {
        operation: OperationId,
        dependency: Dependency,
        message: String,
    },

    /// Upload endpoint answered with a non-2xx status
    #[error("{message}")]
    UploadRejected { status: u16, message: String },

    /// Process endpoint answered with a non-2xx status
    #[error("{message}")]
    ProcessRejected { status: u16, message: String },

    /// Process endpoint answered 2xx with `status: "error"`
    #[error("{message}")]
    ProcessFailed {
        operation: OperationId,
        message: String,
    },

    #[error("{}", generic_if_empty(.0))]
    Unexpected(String),
}

impl ExecuteError {
    /// Whether the remote service was contacted before the failure
    pub fn reached_service(&self) -> bool {
        !matches!(
            self,
            Self::NoSelection | Self::Busy | Self::DependencyMissing { .. }
        )
    }
}

impl From<ServiceError> for ExecuteError {
    fn from(e: ServiceError) -> Self {
        ExecuteError::Unexpected(e.to_string())
    }
}

fn generic_if_empty(message: &str) -> &str {
    if message.trim().is_empty() {
        GENERIC_ERROR_MESSAGE
    } else {
        message
    }
}
