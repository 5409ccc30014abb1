//! Scripted in-memory service for workflow tests.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

use super::{ProcessingService, ServiceReply};
use crate::catalog::OperationId;
use crate::error::ServiceError;
use crate::state::Artifact;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Call {
    Upload(Vec<String>),
    Process(OperationId),
}

type Scripted = Result<ServiceReply, String>;

/// Replies are consumed in order; an exhausted script answers 200 `{"status":"ok"}`.
#[derive(Default)]
pub(crate) struct ScriptedService {
    uploads: Mutex<VecDeque<Scripted>>,
    processes: Mutex<VecDeque<Scripted>>,
    calls: Mutex<Vec<Call>>,
    /// Signalled when `process` is entered
    pub(crate) entered: Arc<Notify>,
    /// When set, `process` waits for it before answering
    gate: Option<Arc<Notify>>,
}

impl ScriptedService {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn upload_reply(self, status: u16, body: &str) -> Self {
        self.uploads
            .lock()
            .unwrap()
            .push_back(Ok(ServiceReply::new(status, body)));
        self
    }

    pub(crate) fn process_reply(self, status: u16, body: &str) -> Self {
        self.processes
            .lock()
            .unwrap()
            .push_back(Ok(ServiceReply::new(status, body)));
        self
    }

    pub(crate) fn process_unreachable(self, message: &str) -> Self {
        self.processes
            .lock()
            .unwrap()
            .push_back(Err(message.to_string()));
        self
    }

    pub(crate) fn gated(mut self, gate: Arc<Notify>) -> Self {
        self.gate = Some(gate);
        self
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn next(queue: &Mutex<VecDeque<Scripted>>) -> Result<ServiceReply, ServiceError> {
        match queue.lock().unwrap().pop_front() {
            Some(Ok(reply)) => Ok(reply),
            Some(Err(message)) => Err(ServiceError::Transport(message)),
            None => Ok(ServiceReply::new(200, r#"{"status":"ok"}"#)),
        }
    }
}

#[async_trait]
impl ProcessingService for ScriptedService {
    async fn upload(&self, artifacts: &[Artifact]) -> Result<ServiceReply, ServiceError> {
        let names = artifacts.iter().map(|a| a.name.clone()).collect();
        self.calls.lock().unwrap().push(Call::Upload(names));
        Self::next(&self.uploads)
    }

    async fn process(&self, operation: OperationId) -> Result<ServiceReply, ServiceError> {
        self.calls.lock().unwrap().push(Call::Process(operation));
        self.entered.notify_one();
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        Self::next(&self.processes)
    }
}
