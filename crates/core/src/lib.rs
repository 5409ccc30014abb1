//! # Smart Study Core
//!
//! Client-side workflow for the Smart Study processing service: stage
//! presentation files, pick one operation from the catalog, and submit it
//! as an upload followed by a process call.
//!
//! ## Architecture
//!
//! - `catalog/` - The fixed operation catalog, grouped into stages
//! - `state/` - Staging store, file picker, selection and execution state
//! - `service/` - Processing service seam and its HTTP client
//! - `workflow/` - Two-phase protocol, dependency gating and the workbench
//! - `config/` - Service URL, picker filter and gating policy
//!
//! ## Usage
//!
//! ```rust,ignore
//! use smartstudy_core::{OperationId, Workbench, WorkflowConfig};
//!
//! let bench = Workbench::connect(WorkflowConfig::from_env()?)?;
//! bench.stage_paths(&["lecture.pptx".into()]).await?;
//! bench.select(OperationId::Default)?;
//! let outcome = bench.execute().await?;
//! ```

pub mod catalog;
pub mod config;
pub mod error;
pub mod service;
pub mod state;
pub mod workflow;

pub use catalog::{Catalog, Dependency, Operation, OperationId, Stage};
pub use config::{GatingPolicy, WorkflowConfig};
pub use error::{CatalogError, ExecuteError, ServiceError};
pub use state::{Artifact, ExecutionPhase, ExecutionState, FilePicker};
pub use workflow::{ExecutionOutcome, Workbench, WorkflowEvent, WorkflowEventKind};
