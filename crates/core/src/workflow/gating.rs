//! # Dependency Gating
//!
//! Evaluates an operation's declared dependency against what this session
//! has produced. Only consulted when the workbench runs with
//! [`GatingPolicy::Enforce`]; under `Permissive` the tags are informational.

use serde::Serialize;
use std::collections::HashSet;

use crate::catalog::{Dependency, Operation};
use crate::config::GatingPolicy;
use crate::error::ExecuteError;

/// Dependencies satisfied by successful work in this process
#[derive(Debug, Clone, Default, Serialize)]
pub struct SessionLedger {
    satisfied: HashSet<Dependency>,
}

impl SessionLedger {
    pub fn record(&mut self, dependency: Dependency) {
        if self.satisfied.insert(dependency) {
            tracing::debug!(dependency = dependency.as_str(), "Dependency satisfied");
        }
    }

    /// Staged files count as soon as something is staged locally
    pub fn is_satisfied(&self, dependency: Dependency, has_staged: bool) -> bool {
        match dependency {
            Dependency::StagedFiles => has_staged || self.satisfied.contains(&dependency),
            _ => self.satisfied.contains(&dependency),
        }
    }

    /// Satisfied dependencies in a stable order
    pub fn satisfied(&self) -> Vec<Dependency> {
        [
            Dependency::StagedFiles,
            Dependency::GeneratedPdf,
            Dependency::GeneratedTranscripts,
        ]
        .into_iter()
        .filter(|d| self.satisfied.contains(d))
        .collect()
    }
}

/// Text used when an operation is refused for a missing dependency
pub fn missing_message(dependency: Dependency) -> &'static str {
    match dependency {
        Dependency::StagedFiles => "No PowerPoint files found. Please upload files first.",
        Dependency::GeneratedPdf => {
            "No PDF files found. Please convert PowerPoint files to PDF first."
        }
        Dependency::GeneratedTranscripts => {
            "No transcripts found. Please generate short-form content first."
        }
    }
}

/// Decide whether `operation` may run under `policy`
pub fn check(
    policy: GatingPolicy,
    operation: &Operation,
    ledger: &SessionLedger,
    has_staged: bool,
) -> Result<(), ExecuteError> {
    if policy == GatingPolicy::Permissive || ledger.is_satisfied(operation.requires, has_staged) {
        return Ok(());
    }

    Err(ExecuteError::DependencyMissing {
        operation: operation.id,
        dependency: operation.requires,
        message: missing_message(operation.requires).to_string(),
    })
}
