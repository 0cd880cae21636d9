//! Submission payloads and the sinks that receive them

use super::category_form::Category;
use anyhow::{Context, Result};
use chrono::Utc;
use serde::Serialize;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

/// Payload of a valid category form
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategorySubmission {
    pub category: Category,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tin: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

/// One entry of a valid list form
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListItemSubmission {
    pub tin: String,
    pub file_name: String,
    pub size: u64,
}

/// Payload of a valid list form
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListSubmission {
    pub items: Vec<ListItemSubmission>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Submission {
    Category(CategorySubmission),
    List(ListSubmission),
}

impl Submission {
    /// Short name of the form that produced this submission
    pub fn form_name(&self) -> &'static str {
        match self {
            Submission::Category(_) => "category",
            Submission::List(_) => "list",
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl From<CategorySubmission> for Submission {
    fn from(value: CategorySubmission) -> Self {
        Submission::Category(value)
    }
}

impl From<ListSubmission> for Submission {
    fn from(value: ListSubmission) -> Self {
        Submission::List(value)
    }
}

/// Destination for validated submissions
#[cfg_attr(test, mockall::automock)]
pub trait SubmissionSink: Send + Sync {
    fn submit(&self, submission: &Submission) -> Result<()>;
}

/// Logs each submission through `tracing`
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl SubmissionSink for TracingSink {
    fn submit(&self, submission: &Submission) -> Result<()> {
        let payload = submission.to_json()?;
        tracing::info!(form = submission.form_name(), payload = %payload, "Submitted data");
        Ok(())
    }
}

/// Appends one JSON line per submission to a file
#[derive(Debug, Clone)]
pub struct JsonlFileSink {
    path: PathBuf,
}

impl JsonlFileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SubmissionSink for JsonlFileSink {
    fn submit(&self, submission: &Submission) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let line = serde_json::json!({
            "form": submission.form_name(),
            "submitted_at": Utc::now().to_rfc3339(),
            "payload": submission,
        });

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("Failed to open {}", self.path.display()))?;
        writeln!(file, "{line}")?;
        Ok(())
    }
}

/// Fans a submission out to every inner sink, stopping at the first failure
#[derive(Default)]
pub struct CompositeSink {
    sinks: Vec<Box<dyn SubmissionSink>>,
}

impl CompositeSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, sink: impl SubmissionSink + 'static) -> Self {
        self.sinks.push(Box::new(sink));
        self
    }
}

impl SubmissionSink for CompositeSink {
    fn submit(&self, submission: &Submission) -> Result<()> {
        for sink in &self.sinks {
            sink.submit(submission)?;
        }
        Ok(())
    }
}
