//! Error types for tmplsync operations.
//!
//! This module defines [`SyncError`], the error type shared by every
//! component, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Expected conditions (unknown handle, missing local id, unsupported
//!   pairing) are distinct variants so callers branch on the kind, never
//!   on message text. See [`SyncError::is_expected`].
//! - Transport problems surface as [`SyncError::TransportFailure`].
//! - Use `anyhow::Error` (via `SyncError::Other`) for unexpected errors.

use std::path::PathBuf;
use thiserror::Error;

use crate::template::{Environment, TemplateKind};

/// Core error type for tmplsync operations.
#[derive(Debug, Error)]
pub enum SyncError {
    /// The platform has no record with this handle/name.
    #[error("{kind} '{handle}' not found in {env}")]
    NotFound {
        kind: TemplateKind,
        handle: String,
        env: Environment,
    },

    /// The local config has no remote id for this environment.
    #[error("{kind} '{handle}' has no id for {env}; import it or run fetch-ids first")]
    MissingLocalIdentity {
        kind: TemplateKind,
        handle: String,
        env: Environment,
    },

    /// The requested combination is not supported by the platform.
    #[error("Unsupported operation: {message}")]
    UnsupportedCombination { message: String },

    /// Network or HTTP failure talking to the platform.
    #[error("{}", transport_message(*status, message))]
    TransportFailure {
        status: Option<u16>,
        message: String,
    },

    /// A successful response did not echo the expected field.
    #[error("Unexpected response for {kind} '{handle}': missing '{field}'")]
    InconsistentResponse {
        kind: TemplateKind,
        handle: String,
        field: String,
    },

    /// The template's body or config is not present in the repository.
    #[error("{kind} '{handle}' does not exist in the local repository")]
    MissingTemplate { kind: TemplateKind, handle: String },

    /// A handle or name that cannot be used as a single directory name.
    #[error("{kind} '{handle}' has a name that cannot be stored locally")]
    InvalidHandle { kind: TemplateKind, handle: String },

    /// No environment flag given and no default stored.
    #[error("No environment selected. Pass --firm/--partner or run 'tmplsync config set-firm <id>'")]
    NoEnvironment,

    /// A local JSON/YAML file could not be parsed.
    #[error("Failed to parse {path}: {message}")]
    ConfigParse { path: PathBuf, message: String },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

fn transport_message(status: Option<u16>, message: &str) -> String {
    match status {
        Some(code) => format!("Platform request failed (HTTP {}): {}", code, message),
        None => format!("Platform request failed: {}", message),
    }
}

impl SyncError {
    /// Whether this error is an anticipated, item-level condition.
    ///
    /// Expected errors get a one-line report; everything else is
    /// logged with full detail.
    pub fn is_expected(&self) -> bool {
        matches!(
            self,
            Self::NotFound { .. }
                | Self::MissingLocalIdentity { .. }
                | Self::UnsupportedCombination { .. }
                | Self::MissingTemplate { .. }
                | Self::InvalidHandle { .. }
        )
    }

    /// Build a transport failure from a non-2xx status.
    pub fn http(status: u16, message: impl Into<String>) -> Self {
        Self::TransportFailure {
            status: Some(status),
            message: message.into(),
        }
    }
}

impl From<reqwest::Error> for SyncError {
    fn from(err: reqwest::Error) -> Self {
        Self::TransportFailure {
            status: err.status().map(|s| s.as_u16()),
            message: err.to_string(),
        }
    }
}

/// Result type alias for tmplsync operations.
pub type Result<T> = std::result::Result<T, SyncError>;
