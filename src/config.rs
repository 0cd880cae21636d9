//! Configuration handling for the TUI

use anyhow::Result;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// User configuration for the TUI
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TuiConfig {
    /// Clear a form after it was submitted successfully
    pub reset_after_submit: Option<bool>,
    /// Append every submission as a JSON line to this file
    pub submission_log: Option<String>,
    /// View shown on startup ("category" or "list")
    pub start_view: Option<String>,
    /// Write tracing output to a log file instead of stderr
    pub log_file: Option<bool>,
}

impl TuiConfig {
    fn project_dirs() -> Option<ProjectDirs> {
        ProjectDirs::from("io", "intake", "intake-tui")
    }

    /// Get the config file path
    fn config_path() -> Option<PathBuf> {
        Self::project_dirs().map(|dirs| dirs.config_dir().join("config.json"))
    }

    /// Get the default log file path
    pub fn log_path() -> Option<PathBuf> {
        Self::project_dirs().map(|dirs| dirs.data_local_dir().join("intake-tui.log"))
    }

    /// Load configuration from file
    pub fn load() -> Result<Self> {
        let path = Self::config_path();

        if let Some(path) = path {
            if path.exists() {
                let content = fs::read_to_string(&path)?;
                let config: TuiConfig = serde_json::from_str(&content)?;
                return Ok(config);
            }
        }

        Ok(Self::default())
    }

    pub fn reset_after_submit(&self) -> bool {
        self.reset_after_submit.unwrap_or(false)
    }

    pub fn log_to_file(&self) -> bool {
        self.log_file.unwrap_or(true)
    }
}
