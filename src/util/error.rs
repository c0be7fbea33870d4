// ZipDrop - util/error.rs
//
// Typed error hierarchy with context-preserving error chains.
// Per-unit transfer failures are values recorded in the batch summary;
// only construction-time errors reach the caller of the orchestrator.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Top-level error type for all ZipDrop operations.
#[derive(Debug)]
pub enum ZipDropError {
    /// Orchestrator API misuse or an empty selection.
    Upload(UploadError),

    /// Configuration loading or validation failed.
    Config(ConfigError),

    /// I/O error with path context.
    Io {
        path: PathBuf,
        operation: &'static str,
        source: io::Error,
    },
}

impl fmt::Display for ZipDropError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Upload(e) => write!(f, "Upload error: {e}"),
            Self::Config(e) => write!(f, "Configuration error: {e}"),
            Self::Io {
                path,
                operation,
                source,
            } => write!(
                f,
                "I/O error during {operation} on '{}': {source}",
                path.display()
            ),
        }
    }
}

impl std::error::Error for ZipDropError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Upload(e) => Some(e),
            Self::Config(e) => Some(e),
            Self::Io { source, .. } => Some(source),
        }
    }
}

// ---------------------------------------------------------------------------
// Upload errors
// ---------------------------------------------------------------------------

/// Errors returned synchronously by the upload orchestrator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadError {
    /// No candidate survived the selection filter.
    EmptyBatch {
        /// Accepted suffix the candidates were filtered against.
        suffix: String,
        /// Number of candidates that were offered and rejected.
        rejected: usize,
    },

    /// A pending-only operation was attempted while a transfer phase runs.
    InvalidState { operation: &'static str },

    /// `start_batch` was called while another batch is still in flight.
    BatchInProgress,

    /// `remove_pending` named a slot that does not exist.
    SlotOutOfRange { slot: usize, len: usize },

    /// The worker thread went away before delivering a batch summary.
    WorkerDisconnected,
}

impl fmt::Display for UploadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyBatch { suffix, .. } => {
                let label = suffix.trim_start_matches('.').to_uppercase();
                write!(f, "No {label} files found in selection")
            }
            Self::InvalidState { operation } => {
                write!(f, "Cannot {operation} while an upload is in progress")
            }
            Self::BatchInProgress => write!(f, "An upload batch is already in progress"),
            Self::SlotOutOfRange { slot, len } => {
                write!(f, "Slot {slot} does not exist ({len} pending file(s))")
            }
            Self::WorkerDisconnected => {
                write!(f, "Upload worker stopped before reporting a summary")
            }
        }
    }
}

impl std::error::Error for UploadError {}

impl From<UploadError> for ZipDropError {
    fn from(e: UploadError) -> Self {
        Self::Upload(e)
    }
}

// ---------------------------------------------------------------------------
// Transfer errors
// ---------------------------------------------------------------------------

/// Why a single transfer unit failed. Local to the unit; its `Display`
/// text becomes the failure reason in the batch summary.
#[derive(Debug)]
pub enum TransferError {
    /// The server answered with a status other than 200.
    Rejected { status: u16, body: String },

    /// No usable response: connection refused, reset, timed out, etc.
    Transport { message: String },

    /// The payload could not be read while building the request body.
    Payload { name: String, source: io::Error },
}

impl fmt::Display for TransferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rejected { status, body } => {
                if body.is_empty() {
                    write!(f, "HTTP {status}")
                } else {
                    f.write_str(body)
                }
            }
            Self::Transport { message } => write!(f, "Network error: {message}"),
            Self::Payload { name, source } => write!(f, "Cannot read '{name}': {source}"),
        }
    }
}

impl std::error::Error for TransferError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Payload { source, .. } => Some(source),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Config errors
// ---------------------------------------------------------------------------

/// Errors related to configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    /// TOML parsing failed.
    TomlParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// A config value is out of the allowed range.
    ValueOutOfRange {
        field: String,
        value: String,
        expected: String,
    },

    /// I/O error reading config file.
    Io { path: PathBuf, source: io::Error },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TomlParse { path, source } => {
                write!(f, "Config parse error '{}': {source}", path.display())
            }
            Self::ValueOutOfRange {
                field,
                value,
                expected,
            } => write!(
                f,
                "Config '{field}' = '{value}' is out of range. Expected: {expected}"
            ),
            Self::Io { path, source } => {
                write!(f, "Config I/O error '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::TomlParse { source, .. } => Some(source),
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<ConfigError> for ZipDropError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

/// Convenience type alias for ZipDrop results.
pub type Result<T> = std::result::Result<T, ZipDropError>;
