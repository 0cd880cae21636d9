//! Attachment handles and the loader that produces them

use async_trait::async_trait;
use std::path::Path;
use thiserror::Error;

/// User-selected binary content
#[derive(Clone, PartialEq, Eq)]
pub struct Attachment {
    pub name: String,
    pub size: u64,
    pub bytes: Vec<u8>,
}

impl Attachment {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            size: bytes.len() as u64,
            bytes,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Human readable size, e.g. "1.2 KB"
    pub fn display_size(&self) -> String {
        const KB: f64 = 1024.0;
        const MB: f64 = KB * 1024.0;
        let size = self.size as f64;
        if size >= MB {
            format!("{:.1} MB", size / MB)
        } else if size >= KB {
            format!("{:.1} KB", size / KB)
        } else {
            format!("{} B", self.size)
        }
    }
}

// Keep the bytes out of debug output and logs
impl std::fmt::Debug for Attachment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Attachment")
            .field("name", &self.name)
            .field("size", &self.size)
            .finish()
    }
}

#[derive(Debug, Error)]
pub enum AttachmentError {
    #[error("No file path entered")]
    EmptyPath,
    #[error("Could not read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Source of attachments, the terminal counterpart of a native file picker
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AttachmentLoader: Send + Sync {
    /// Load the file at `path` into an attachment
    async fn load(&self, path: &str) -> Result<Attachment, AttachmentError>;
}

/// Reads attachments from the local filesystem
#[derive(Debug, Default, Clone, Copy)]
pub struct FsAttachmentLoader;

#[async_trait]
impl AttachmentLoader for FsAttachmentLoader {
    async fn load(&self, path: &str) -> Result<Attachment, AttachmentError> {
        let path = path.trim();
        if path.is_empty() {
            return Err(AttachmentError::EmptyPath);
        }

        let bytes = tokio::fs::read(path)
            .await
            .map_err(|source| AttachmentError::Io {
                path: path.to_string(),
                source,
            })?;

        let name = Path::new(path)
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string());

        tracing::debug!(name = %name, size = bytes.len(), "Loaded attachment");
        Ok(Attachment::new(name, bytes))
    }
}
