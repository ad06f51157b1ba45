//! Error types for the bathymetry map pipeline.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type alias using BathyError.
pub type BathyResult<T> = Result<T, BathyError>;

/// Primary error type. Every variant is fatal to a run.
#[derive(Debug, Error)]
pub enum BathyError {
    // === Input Errors ===
    #[error("File not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed row in {origin} at line {line}: {reason}")]
    MalformedRow {
        origin: String,
        line: usize,
        reason: String,
    },

    // === Data Errors ===
    #[error("Grid size mismatch: a {rows}x{cols} grid needs {expected} samples but {actual} were read")]
    GridSizeMismatch {
        rows: usize,
        cols: usize,
        expected: usize,
        actual: usize,
    },

    // === Setup / Output Errors ===
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Rendering failed: {0}")]
    Render(String),
}

impl BathyError {
    /// Classify an I/O failure on `path`, singling out missing files.
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        let path = path.as_ref().to_path_buf();
        if source.kind() == std::io::ErrorKind::NotFound {
            BathyError::FileNotFound { path }
        } else {
            BathyError::Io { path, source }
        }
    }

    pub fn malformed(origin: &str, line: usize, reason: impl Into<String>) -> Self {
        BathyError::MalformedRow {
            origin: origin.to_string(),
            line,
            reason: reason.into(),
        }
    }
}
