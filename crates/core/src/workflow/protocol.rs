//! # Submission Protocol
//!
//! The two remote phases of an execute call and how their answers are
//! read. Each phase either yields the service's optional message or an
//! [`ExecuteError`] whose text goes straight into the error slot.
//!
//! ```text
//! upload  -> non-2xx           => UploadRejected  (message | detail | "File upload failed")
//! process -> non-2xx           => ProcessRejected (message | detail | "Processing failed")
//!         -> 2xx status=error  => ProcessFailed   (message | "Processing failed")
//!         -> 2xx unparsable    => Unexpected
//! ```

use crate::catalog::OperationId;
use crate::error::{ExecuteError, PROCESSING_FAILED_MESSAGE, UPLOAD_FAILED_MESSAGE};
use crate::service::{error_message, ProcessingService, StatusBody};
use crate::state::Artifact;

/// Phase 1: send every staged artifact.
///
/// A 2xx body is optional; its `message` is returned when present.
pub async fn upload(
    service: &dyn ProcessingService,
    artifacts: &[Artifact],
) -> Result<Option<String>, ExecuteError> {
    let reply = service.upload(artifacts).await?;

    if !reply.is_success() {
        let message = error_message(&reply.body, UPLOAD_FAILED_MESSAGE);
        tracing::warn!(status = reply.status, %message, "Upload rejected");
        return Err(ExecuteError::UploadRejected {
            status: reply.status,
            message,
        });
    }

    let receipt = serde_json::from_str::<StatusBody>(&reply.body).unwrap_or_default();
    Ok(receipt.message().map(str::to_string))
}

/// Phase 2: invoke the operation and check both transport and body status
pub async fn process(
    service: &dyn ProcessingService,
    operation: OperationId,
) -> Result<Option<String>, ExecuteError> {
    let reply = service.process(operation).await?;

    if !reply.is_success() {
        let message = error_message(&reply.body, PROCESSING_FAILED_MESSAGE);
        tracing::warn!(status = reply.status, %message, "Processing rejected");
        return Err(ExecuteError::ProcessRejected {
            status: reply.status,
            message,
        });
    }

    let body: StatusBody = serde_json::from_str(&reply.body).map_err(|e| {
        ExecuteError::Unexpected(format!("Invalid response from processing service: {}", e))
    })?;
    tracing::debug!(?body, "Processing result");

    if body.is_error() {
        return Err(ExecuteError::ProcessFailed {
            operation,
            message: body.message().unwrap_or(PROCESSING_FAILED_MESSAGE).to_string(),
        });
    }

    Ok(body.message().map(str::to_string))
}
