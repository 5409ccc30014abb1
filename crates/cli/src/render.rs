//! Human-readable output for the terminal.

use smartstudy_core::workflow::{Availability, WorkbenchStatus};
use smartstudy_core::{Catalog, OperationId, WorkflowEvent, WorkflowEventKind};

/// Catalog grouped by stage, marking readiness and the current selection
pub fn catalog(catalog: &Catalog, availability: &[Availability], selected: Option<OperationId>) -> String {
    let mut out = String::new();
    for stage in catalog.describe() {
        out.push_str(&format!("{}\n  {}\n", stage.title, stage.description));
        for op in &stage.options {
            let ready = availability
                .iter()
                .find(|a| a.operation.id == op.id)
                .map(|a| a.ready)
                .unwrap_or(false);
            let marker = if selected == Some(op.id) { "▶" } else { " " };
            let readiness = if ready { "ready" } else { op.requires.as_str() };
            out.push_str(&format!(
                "  {} {:<9} {:<28} [{}]\n",
                marker, op.id, op.label, readiness
            ));
        }
    }
    out
}

pub fn files(status: &WorkbenchStatus) -> String {
    if status.staged.is_empty() {
        return "No files staged\n".to_string();
    }
    let mut out = String::from("Files to Process:\n");
    for name in &status.staged {
        out.push_str(&format!("  📄 {}\n", name));
    }
    out.push_str(&format!(
        "  ({} file(s), {} bytes)\n",
        status.staged.len(),
        status.staged_bytes
    ));
    out
}

pub fn status(status: &WorkbenchStatus) -> String {
    let selection = status
        .selection
        .map(|id| id.to_string())
        .unwrap_or_else(|| "none".to_string());
    let state = if status.execution.is_busy() {
        format!("Processing... ({}%)", status.execution.progress)
    } else {
        "Idle".to_string()
    };
    let mut out = format!(
        "State:     {}\nSelection: {}\nStaged:    {} file(s)\n",
        state,
        selection,
        status.staged.len()
    );
    if let Some(error) = &status.execution.last_error {
        out.push_str(&format!("Error:     {}\n", error));
    }
    out
}

/// One line per phase change; `None` for events not worth printing
pub fn event(event: &WorkflowEvent) -> Option<String> {
    let op = event
        .operation
        .map(|id| id.to_string())
        .unwrap_or_default();
    let line = match event.kind {
        WorkflowEventKind::UploadStarted => {
            let count = event
                .data
                .as_ref()
                .and_then(|d| d.get("files"))
                .and_then(|f| f.as_array())
                .map(|f| f.len())
                .unwrap_or(0);
            format!("⬆️  Uploading {} file(s)...", count)
        }
        WorkflowEventKind::UploadCompleted => "   Files uploaded successfully".to_string(),
        WorkflowEventKind::ProcessStarted => format!("⏳ Processing with option: {}", op),
        WorkflowEventKind::StagingCleared => "🧹 Staged files cleared".to_string(),
        WorkflowEventKind::ExecutionRejected => {
            "⚠️  An operation is already in progress".to_string()
        }
        WorkflowEventKind::ExecutionStarted
        | WorkflowEventKind::UploadSkipped
        | WorkflowEventKind::ProcessCompleted
        | WorkflowEventKind::ExecutionSucceeded
        | WorkflowEventKind::ExecutionFailed => return None,
    };
    Some(line)
}
