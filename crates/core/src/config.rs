//! # Workflow Configuration
//!
//! Where the processing service lives, which files the picker accepts and
//! whether operation dependencies are checked locally.
//!
//! ## Environment
//! - `SMARTSTUDY_API_URL` - service base URL (default `http://localhost:8000`)
//! - `SMARTSTUDY_GATING` - `permissive` (default) or `enforce`

use serde::{Deserialize, Serialize};
use std::str::FromStr;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";
pub const API_URL_ENV: &str = "SMARTSTUDY_API_URL";
pub const GATING_ENV: &str = "SMARTSTUDY_GATING";

/// How declared operation dependencies are treated before execution
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum GatingPolicy {
    /// Tags are informational; any operation may be submitted
    #[default]
    Permissive,
    /// Refuse operations whose dependency was not produced this session
    Enforce,
}

impl GatingPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Permissive => "permissive",
            Self::Enforce => "enforce",
        }
    }
}

impl FromStr for GatingPolicy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "permissive" => Ok(Self::Permissive),
            "enforce" => Ok(Self::Enforce),
            other => anyhow::bail!("Unknown gating policy: {}", other),
        }
    }
}

/// Configuration shared by the picker, the HTTP client and the workbench
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowConfig {
    /// Base URL of the processing service, without trailing slash
    pub base_url: String,
    #[serde(default)]
    pub gating: GatingPolicy,
    /// File extensions the picker accepts (lowercase, no dot)
    pub accepted_extensions: Vec<String>,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            gating: GatingPolicy::Permissive,
            accepted_extensions: vec!["pptx".to_string(), "ppt".to_string()],
        }
    }
}

impl WorkflowConfig {
    /// Defaults overlaid with `SMARTSTUDY_*` environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        let mut config = Self::default();

        if let Ok(url) = std::env::var(API_URL_ENV) {
            if !url.trim().is_empty() {
                config = config.with_base_url(url);
            }
        }

        if let Ok(policy) = std::env::var(GATING_ENV) {
            config.gating = policy.parse()?;
        }

        Ok(config)
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_gating(mut self, gating: GatingPolicy) -> Self {
        self.gating = gating;
        self
    }

    pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.accepted_extensions = extensions
            .into_iter()
            .map(|e| e.as_ref().trim_start_matches('.').to_ascii_lowercase())
            .collect();
        self
    }

    /// `{base_url}/upload`
    pub fn upload_url(&self) -> String {
        format!("{}/upload", self.base_url)
    }

    /// `{base_url}/process/{operation}`
    pub fn process_url(&self, operation: &str) -> String {
        format!("{}/process/{}", self.base_url, operation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = WorkflowConfig::default();
        assert_eq!(config.base_url, "http://localhost:8000");
        assert_eq!(config.gating, GatingPolicy::Permissive);
        assert_eq!(config.accepted_extensions, ["pptx", "ppt"]);
    }

    #[test]
    fn test_endpoint_urls() {
        let config = WorkflowConfig::default().with_base_url("http://svc:9000/");
        assert_eq!(config.upload_url(), "http://svc:9000/upload");
        assert_eq!(config.process_url("terms"), "http://svc:9000/process/terms");
    }

    #[test]
    fn test_extension_normalisation() {
        let config = WorkflowConfig::default().with_extensions([".PDF", "txt"]);
        assert_eq!(config.accepted_extensions, ["pdf", "txt"]);
    }

    #[test]
    fn test_gating_policy_parse() {
        assert_eq!("Enforce".parse::<GatingPolicy>().unwrap(), GatingPolicy::Enforce);
        assert_eq!(
            "permissive".parse::<GatingPolicy>().unwrap(),
            GatingPolicy::Permissive
        );
        assert!("strict".parse::<GatingPolicy>().is_err());
    }

    #[test]
    fn test_config_serialization() {
        let config = WorkflowConfig::default().with_gating(GatingPolicy::Enforce);
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("enforce"));
        assert!(json.contains("localhost:8000"));
    }
}
