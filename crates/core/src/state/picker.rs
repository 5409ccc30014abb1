//! # File Picker
//!
//! Turns user-supplied paths into staged artifacts. Only files whose
//! extension is accepted are picked; directories are walked recursively.

use anyhow::{Context, Result};
use ignore::WalkBuilder;
use std::path::{Path, PathBuf};

use super::staging::Artifact;
use crate::config::WorkflowConfig;

/// Extension-filtered picker
#[derive(Debug, Clone)]
pub struct FilePicker {
    extensions: Vec<String>,
}

impl Default for FilePicker {
    fn default() -> Self {
        Self::from_config(&WorkflowConfig::default())
    }
}

impl FilePicker {
    pub fn new<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            extensions: extensions
                .into_iter()
                .map(|e| e.as_ref().trim_start_matches('.').to_ascii_lowercase())
                .collect(),
        }
    }

    pub fn from_config(config: &WorkflowConfig) -> Self {
        Self::new(&config.accepted_extensions)
    }

    /// Whether the file's extension is accepted (case insensitive)
    pub fn accepts(&self, path: &Path) -> bool {
        path.extension()
            .map(|e| e.to_string_lossy().to_ascii_lowercase())
            .map(|e| self.extensions.iter().any(|x| *x == e))
            .unwrap_or(false)
    }

    /// Pick every accepted file under the given paths, in argument order.
    ///
    /// Files found while walking a directory are ordered by path.
    pub async fn pick(&self, paths: &[PathBuf]) -> Result<Vec<Artifact>> {
        let mut artifacts = Vec::new();

        for path in paths {
            let metadata = tokio::fs::metadata(path)
                .await
                .with_context(|| format!("Cannot stage {:?}", path))?;

            if metadata.is_dir() {
                for file in self.walk(path)? {
                    artifacts.push(read_artifact(&file).await?);
                }
            } else if self.accepts(path) {
                artifacts.push(read_artifact(path).await?);
            } else {
                tracing::warn!(path = %path.display(), "Skipping file with unaccepted extension");
            }
        }

        tracing::debug!("Picked {} file(s)", artifacts.len());
        Ok(artifacts)
    }

    fn walk(&self, root: &Path) -> Result<Vec<PathBuf>> {
        let walker = WalkBuilder::new(root)
            .hidden(false)
            .git_ignore(true)
            .filter_entry(|e| {
                let name = e.file_name().to_string_lossy();
                e.depth() == 0 || !name.starts_with('.')
            })
            .build();

        let mut files = Vec::new();
        for entry in walker {
            let entry = entry?;
            if entry.file_type().map(|ft| ft.is_file()).unwrap_or(false)
                && self.accepts(entry.path())
            {
                files.push(entry.into_path());
            }
        }

        files.sort();
        Ok(files)
    }
}

/// Read one file into an artifact, guessing its media type from the name
pub async fn read_artifact(path: &Path) -> Result<Artifact> {
    let name = path
        .file_name()
        .context("No filename")?
        .to_string_lossy()
        .to_string();

    let content = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read file: {:?}", path))?;

    let media_type = mime_guess::from_path(path)
        .first_or_octet_stream()
        .essence_str()
        .to_string();

    Ok(Artifact::new(name, content, media_type))
}
