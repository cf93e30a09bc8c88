//! Core error types for state graph extraction
//!
//! Only [`GraphError::InvalidRoot`] is fatal for a run. Every other variant is
//! caught at the narrowest scope (one file, one backend call) and logged.

use std::path::PathBuf;
use thiserror::Error;

/// Core error types for the extraction and rendering pipeline
#[derive(Error, Debug)]
pub enum GraphError {
    #[error("{path} is not a directory")]
    InvalidRoot { path: PathBuf },

    #[error("Discovery error under {root}: {message}")]
    Discovery { root: PathBuf, message: String },

    #[error("Error parsing file {path}: {source}")]
    FileParse {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Render backend error: {message}")]
    RenderBackend { message: String },

    #[error("Invalid extraction pattern: {source}")]
    Pattern {
        #[from]
        source: regex::Error,
    },

    #[error("IO error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl GraphError {
    /// Create a new invalid root error
    pub fn invalid_root(path: impl Into<PathBuf>) -> Self {
        Self::InvalidRoot { path: path.into() }
    }

    /// Create a new discovery error
    pub fn discovery(root: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Discovery {
            root: root.into(),
            message: message.into(),
        }
    }

    /// Create a new file parse error
    pub fn file_parse(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::FileParse {
            path: path.into(),
            source,
        }
    }

    /// Create a new render backend error
    pub fn render_backend(message: impl Into<String>) -> Self {
        Self::RenderBackend {
            message: message.into(),
        }
    }

    /// Whether this error must abort the whole run
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::InvalidRoot { .. })
    }
}
