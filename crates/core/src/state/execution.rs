//! # Execution State
//!
//! The `Idle -> Busy -> Idle` machine behind the execute trigger, with the
//! decorative progress value and the single error slot.

use serde::{Deserialize, Serialize};

/// Phase of the execution state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionPhase {
    #[default]
    Idle,
    /// Sending staged files
    Uploading,
    /// Waiting on the process endpoint
    Processing,
}

/// Snapshot-able execution state
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionState {
    /// Current phase
    pub phase: ExecutionPhase,
    /// Decorative progress, 0-100. Never driven by transfer telemetry.
    pub progress: u8,
    /// Most recent failure text, replaced on every attempt
    pub last_error: Option<String>,
}

impl ExecutionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_busy(&self) -> bool {
        self.phase != ExecutionPhase::Idle
    }

    /// Enter Busy and clear the error slot.
    ///
    /// Returns false, changing nothing, when already busy.
    pub fn begin(&mut self) -> bool {
        if self.is_busy() {
            return false;
        }
        self.phase = ExecutionPhase::Uploading;
        self.last_error = None;
        true
    }

    /// Move from upload to process. Only meaningful while busy.
    pub fn enter_processing(&mut self) {
        if self.is_busy() {
            self.phase = ExecutionPhase::Processing;
        }
    }

    /// Return to Idle and reset progress
    pub fn finish(&mut self) {
        self.phase = ExecutionPhase::Idle;
        self.progress = 0;
    }

    pub fn fail(&mut self, message: impl Into<String>) {
        self.last_error = Some(message.into());
    }

    pub fn clear_error(&mut self) {
        self.last_error = None;
    }
}
