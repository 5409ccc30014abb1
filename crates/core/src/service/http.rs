//! # HTTP Processing Service
//!
//! `reqwest` client for the processing service endpoints.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};

use super::{ProcessingService, ServiceReply};
use crate::catalog::OperationId;
use crate::config::WorkflowConfig;
use crate::error::ServiceError;
use crate::state::Artifact;

/// Multipart field shared by every uploaded file
pub const UPLOAD_FIELD: &str = "files";

#[derive(Debug, Clone)]
pub struct HttpProcessingService {
    client: reqwest::Client,
    config: WorkflowConfig,
}

impl HttpProcessingService {
    /// No request timeout is set: calls run until the service answers.
    pub fn new(config: WorkflowConfig) -> Result<Self, ServiceError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("smartstudy/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client, config })
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    fn form(artifacts: &[Artifact]) -> Result<Form, ServiceError> {
        let mut form = Form::new();
        for artifact in artifacts {
            let part = Part::bytes(artifact.content.clone())
                .file_name(artifact.name.clone())
                .mime_str(&artifact.media_type)
                .map_err(|e| {
                    ServiceError::Request(format!("{}: {}", artifact.name, e))
                })?;
            form = form.part(UPLOAD_FIELD, part);
        }
        Ok(form)
    }

    async fn read_reply(response: reqwest::Response) -> Result<ServiceReply, ServiceError> {
        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok(ServiceReply { status, body })
    }
}

#[async_trait]
impl ProcessingService for HttpProcessingService {
    async fn upload(&self, artifacts: &[Artifact]) -> Result<ServiceReply, ServiceError> {
        let url = self.config.upload_url();
        let form = Self::form(artifacts)?;

        tracing::debug!(%url, parts = artifacts.len(), "POST upload");
        let response = self.client.post(&url).multipart(form).send().await?;
        Self::read_reply(response).await
    }

    async fn process(&self, operation: OperationId) -> Result<ServiceReply, ServiceError> {
        let url = self.config.process_url(operation.as_str());

        tracing::debug!(%url, "POST process");
        let response = self.client.post(&url).send().await?;
        Self::read_reply(response).await
    }
}
