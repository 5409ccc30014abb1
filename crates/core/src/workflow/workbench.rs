//! # Workbench
//!
//! Owns the staging store, the selection and the execution state, and runs
//! the execute transition against a [`ProcessingService`].
//!
//! The workbench is shared by reference (`Arc<Workbench>`). Single-flight is
//! enforced here: an execute call that arrives while another is in flight is
//! refused with [`ExecuteError::Busy`] and changes nothing.

use serde::Serialize;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::mpsc;

use super::events::{WorkflowEvent, WorkflowEventKind};
use super::gating::{self, SessionLedger};
use super::protocol;
use crate::catalog::{Catalog, Dependency, Operation, OperationId};
use crate::config::WorkflowConfig;
use crate::error::{CatalogError, ExecuteError, ServiceError};
use crate::service::{HttpProcessingService, ProcessingService};
use crate::state::{Artifact, ExecutionState, FilePicker, Selection, StagingStore};

/// Result of a successful execute call
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ExecutionOutcome {
    pub operation: OperationId,
    /// Artifacts sent in phase 1 (0 when the upload was skipped)
    pub uploaded: usize,
    /// Whether the staging store was emptied afterwards
    pub staging_cleared: bool,
    /// Message from the upload receipt, if any
    pub upload_message: Option<String>,
    /// Message from the process response, if any
    pub message: Option<String>,
}

/// An operation together with whether its dependency is currently met
#[derive(Debug, Clone, Serialize)]
pub struct Availability {
    pub operation: Operation,
    pub ready: bool,
}

/// Point-in-time view for display
#[derive(Debug, Clone, Serialize)]
pub struct WorkbenchStatus {
    pub staged: Vec<String>,
    pub staged_bytes: usize,
    pub selection: Option<OperationId>,
    pub execution: ExecutionState,
    pub satisfied: Vec<Dependency>,
}

#[derive(Debug, Default)]
struct Session {
    staging: StagingStore,
    selection: Selection,
    execution: ExecutionState,
    ledger: SessionLedger,
}

/// Finalises an attempt however it ends: Idle, progress 0, no selection
struct InFlight<'a> {
    session: &'a Mutex<Session>,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        let mut session = lock(self.session);
        session.execution.finish();
        session.selection.reset();
    }
}

fn lock(session: &Mutex<Session>) -> MutexGuard<'_, Session> {
    session.lock().unwrap_or_else(PoisonError::into_inner)
}

pub struct Workbench {
    catalog: Catalog,
    config: WorkflowConfig,
    picker: FilePicker,
    service: Arc<dyn ProcessingService>,
    session: Mutex<Session>,
    event_tx: Option<mpsc::Sender<WorkflowEvent>>,
}

impl Workbench {
    /// Create a workbench with the standard catalog
    pub fn new(config: WorkflowConfig, service: Arc<dyn ProcessingService>) -> Self {
        Self {
            catalog: Catalog::standard(),
            picker: FilePicker::from_config(&config),
            config,
            service,
            session: Mutex::new(Session::default()),
            event_tx: None,
        }
    }

    /// Create a workbench talking HTTP to `config.base_url`
    pub fn connect(config: WorkflowConfig) -> Result<Self, ServiceError> {
        let service = HttpProcessingService::new(config.clone())?;
        Ok(Self::new(config, Arc::new(service)))
    }

    pub fn with_catalog(mut self, catalog: Catalog) -> Self {
        self.catalog = catalog;
        self
    }

    /// Set event channel for streaming phase changes.
    ///
    /// Events are dropped rather than awaited when the channel is full.
    pub fn with_event_channel(mut self, tx: mpsc::Sender<WorkflowEvent>) -> Self {
        self.event_tx = Some(tx);
        self
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn config(&self) -> &WorkflowConfig {
        &self.config
    }

    // === Staging ===

    pub fn add(&self, files: Vec<Artifact>) {
        let count = files.len();
        let mut session = lock(&self.session);
        session.staging.add(files);
        tracing::info!(added = count, staged = session.staging.len(), "Files staged");
    }

    /// Pick files through the extension filter and stage them.
    ///
    /// Returns the number of artifacts added.
    pub async fn stage_paths(&self, paths: &[PathBuf]) -> anyhow::Result<usize> {
        let files = self.picker.pick(paths).await?;
        let count = files.len();
        self.add(files);
        Ok(count)
    }

    pub fn clear_staging(&self) {
        lock(&self.session).staging.clear();
    }

    pub fn staged(&self) -> Vec<Artifact> {
        lock(&self.session).staging.artifacts().to_vec()
    }

    // === Selection ===

    /// Select an operation of this workbench's catalog.
    ///
    /// Selecting dismisses the previous error.
    pub fn select(&self, id: OperationId) -> Result<(), CatalogError> {
        if !self.catalog.contains(id) {
            return Err(CatalogError::UnknownOperation(id.to_string()));
        }
        let mut session = lock(&self.session);
        session.selection.select(id);
        session.execution.clear_error();
        tracing::debug!(operation = %id, "Operation selected");
        Ok(())
    }

    /// Select by wire value, e.g. `"terms"`
    pub fn select_value(&self, value: &str) -> Result<OperationId, CatalogError> {
        let id = self.catalog.resolve(value)?.id;
        self.select(id)?;
        Ok(id)
    }

    pub fn selection(&self) -> Option<OperationId> {
        lock(&self.session).selection.current()
    }

    // === Execution state ===

    pub fn execution(&self) -> ExecutionState {
        lock(&self.session).execution.clone()
    }

    pub fn is_busy(&self) -> bool {
        lock(&self.session).execution.is_busy()
    }

    pub fn last_error(&self) -> Option<String> {
        lock(&self.session).execution.last_error.clone()
    }

    pub fn status(&self) -> WorkbenchStatus {
        let session = lock(&self.session);
        WorkbenchStatus {
            staged: session.staging.names().into_iter().map(String::from).collect(),
            staged_bytes: session.staging.total_bytes(),
            selection: session.selection.current(),
            execution: session.execution.clone(),
            satisfied: session.ledger.satisfied(),
        }
    }

    /// Every catalog operation with its readiness under the session ledger
    pub fn availability(&self) -> Vec<Availability> {
        let session = lock(&self.session);
        let has_staged = !session.staging.is_empty();
        self.catalog
            .operations()
            .map(|op| Availability {
                operation: op.clone(),
                ready: session.ledger.is_satisfied(op.requires, has_staged),
            })
            .collect()
    }

    fn emit(&self, event: WorkflowEvent) {
        if let Some(tx) = &self.event_tx {
            if let Err(e) = tx.try_send(event) {
                tracing::debug!("Workflow event dropped: {}", e);
            }
        }
    }

    // === Execute ===

    /// Run the selected operation: upload staged files (if any), then
    /// process. The error slot, the selection and the staging store are
    /// updated as a side effect; the returned value mirrors the slot.
    #[tracing::instrument(skip(self), fields(operation = tracing::field::Empty))]
    pub async fn execute(&self) -> Result<ExecutionOutcome, ExecuteError> {
        let (operation, artifacts, gate) = {
            let mut session = lock(&self.session);

            if session.execution.is_busy() {
                drop(session);
                tracing::warn!("Execute refused: an operation is already in progress");
                self.emit(WorkflowEvent::new(WorkflowEventKind::ExecutionRejected));
                return Err(ExecuteError::Busy);
            }

            let Some(operation) = session.selection.current() else {
                session.execution.fail(ExecuteError::NoSelection.to_string());
                return Err(ExecuteError::NoSelection);
            };

            session.execution.begin();
            let artifacts = session.staging.artifacts().to_vec();
            let gate = match self.catalog.find(operation) {
                Some(op) => gating::check(
                    self.config.gating,
                    op,
                    &session.ledger,
                    !artifacts.is_empty(),
                ),
                None => Err(ExecuteError::Unexpected(
                    CatalogError::UnknownOperation(operation.to_string()).to_string(),
                )),
            };
            (operation, artifacts, gate)
        };

        let _in_flight = InFlight {
            session: &self.session,
        };
        tracing::Span::current().record("operation", operation.as_str());
        tracing::info!(staged = artifacts.len(), "Execution started");
        self.emit(WorkflowEvent::new(WorkflowEventKind::ExecutionStarted).for_operation(operation));

        let result = match gate {
            Ok(()) => self.run_phases(operation, &artifacts).await,
            Err(e) => Err(e),
        };

        match result {
            Ok((upload_message, message)) => {
                let staging_cleared = operation.is_conversion();
                {
                    let mut session = lock(&self.session);
                    if let Some(dep) = self.catalog.find(operation).and_then(|op| op.satisfies) {
                        session.ledger.record(dep);
                    }
                    if staging_cleared {
                        session.staging.clear();
                    }
                }
                if staging_cleared {
                    self.emit(
                        WorkflowEvent::new(WorkflowEventKind::StagingCleared)
                            .for_operation(operation),
                    );
                }

                tracing::info!(staging_cleared, "Execution succeeded");
                self.emit(
                    WorkflowEvent::new(WorkflowEventKind::ExecutionSucceeded)
                        .for_operation(operation)
                        .with_data(serde_json::json!({ "message": message })),
                );

                Ok(ExecutionOutcome {
                    operation,
                    uploaded: artifacts.len(),
                    staging_cleared,
                    upload_message,
                    message,
                })
            }
            Err(e) => {
                let message = e.to_string();
                lock(&self.session).execution.fail(message.clone());

                tracing::warn!(error = %message, "Execution failed");
                self.emit(
                    WorkflowEvent::new(WorkflowEventKind::ExecutionFailed)
                        .for_operation(operation)
                        .with_data(serde_json::json!({ "message": message })),
                );
                Err(e)
            }
        }
    }

    /// Upload (when anything is staged) then process, strictly in sequence
    async fn run_phases(
        &self,
        operation: OperationId,
        artifacts: &[Artifact],
    ) -> Result<(Option<String>, Option<String>), ExecuteError> {
        let upload_message = if artifacts.is_empty() {
            tracing::debug!("Nothing staged, skipping upload");
            self.emit(WorkflowEvent::new(WorkflowEventKind::UploadSkipped).for_operation(operation));
            None
        } else {
            let names: Vec<&str> = artifacts.iter().map(|a| a.name.as_str()).collect();
            tracing::info!(files = ?names, "Uploading files");
            self.emit(
                WorkflowEvent::new(WorkflowEventKind::UploadStarted)
                    .for_operation(operation)
                    .with_data(serde_json::json!({ "files": names })),
            );

            let receipt = protocol::upload(self.service.as_ref(), artifacts).await?;

            lock(&self.session).ledger.record(Dependency::StagedFiles);
            tracing::info!("Files uploaded successfully");
            self.emit(
                WorkflowEvent::new(WorkflowEventKind::UploadCompleted).for_operation(operation),
            );
            receipt
        };

        lock(&self.session).execution.enter_processing();
        tracing::info!("Processing with option: {}", operation);
        self.emit(WorkflowEvent::new(WorkflowEventKind::ProcessStarted).for_operation(operation));

        let message = protocol::process(self.service.as_ref(), operation).await?;

        self.emit(WorkflowEvent::new(WorkflowEventKind::ProcessCompleted).for_operation(operation));
        Ok((upload_message, message))
    }
}
