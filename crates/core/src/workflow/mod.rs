//! # Workflow
//!
//! The selection-and-execution workflow.
//!
//! ## Execute Flow
//!
//! ```text
//! selection? ──no──> "Please select an operation to perform"
//!     │yes
//!     ▼
//! Busy ─> [gating] ─> upload (if staged) ─> process ─> clear staging (conversion only)
//!     │                    │non-2xx          │non-2xx / status=error
//!     ▼                    ▼                 ▼
//! Idle, progress 0, selection reset  <───  error slot
//! ```

pub mod events;
pub mod gating;
pub mod protocol;
pub mod workbench;

pub use events::{WorkflowEvent, WorkflowEventKind};
pub use gating::SessionLedger;
pub use workbench::{Availability, ExecutionOutcome, Workbench, WorkbenchStatus};
