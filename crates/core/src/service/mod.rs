//! # Processing Service
//!
//! The remote collaborator that performs conversion and generation work.
//! It is reached only through two endpoints:
//!
//! ```text
//! POST /upload                multipart, one `files` part per artifact
//! POST /process/{operation}   no body
//! ```
//!
//! [`ProcessingService`] is the seam; [`HttpProcessingService`] talks to the
//! real thing. Implementations report what the service said and leave its
//! interpretation to the workflow protocol.

pub mod http;
pub mod schema;

#[cfg(test)]
pub(crate) mod testing;

use async_trait::async_trait;

use crate::catalog::OperationId;
use crate::error::ServiceError;
use crate::state::Artifact;

pub use http::HttpProcessingService;
pub use schema::{error_message, ErrorBody, StatusBody};

/// Raw answer from one endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceReply {
    /// HTTP status code
    pub status: u16,
    /// Response body as text
    pub body: String,
}

impl ServiceReply {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Any 2xx status
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[async_trait]
pub trait ProcessingService: Send + Sync {
    /// Send all artifacts, in order, as one multipart request
    async fn upload(&self, artifacts: &[Artifact]) -> Result<ServiceReply, ServiceError>;

    /// Invoke the named operation
    async fn process(&self, operation: OperationId) -> Result<ServiceReply, ServiceError>;
}
