//! Error kinds produced by the readiness checks.
//!
//! Every variant is recoverable: a check records it as a diagnostic on its
//! [`CheckResult`](crate::checks::CheckResult) instead of propagating it.
//! The `Display` text of each variant is what the user sees.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckError {
    /// A required file or directory does not exist (or cannot be probed).
    #[error("{path}")]
    MissingPath { path: String, is_dir: bool },

    /// The dependency manifest could not be read.
    #[error("Error reading {manifest}: {reason}")]
    ManifestMissing { manifest: String, reason: String },

    /// The dependency manifest has zero lines.
    #[error("{manifest} is empty")]
    ManifestEmpty { manifest: String },

    /// A critical package name does not occur anywhere in the manifest.
    #[error("{package}")]
    MissingCriticalPackage { package: String },

    /// Loading the application entry point failed.
    #[error("Failed to import {symbol} from {module}: {message}")]
    LoadError {
        module: String,
        symbol: String,
        message: String,
    },

    #[error("{path} not found")]
    MissingStartScript { path: String },

    #[error("{path} appears to be empty or too short ({length} < {min_length} characters)")]
    EmptyOrTooShort {
        path: String,
        length: usize,
        min_length: usize,
    },

    #[error("{path} doesn't mention {token}")]
    MissingProcessManagerReference { path: String, token: String },
}

impl CheckError {
    /// Stable machine-readable kind, used in JSON output.
    pub fn kind(&self) -> &'static str {
        match self {
            CheckError::MissingPath { .. } => "missing_path",
            CheckError::ManifestMissing { .. } => "manifest_missing",
            CheckError::ManifestEmpty { .. } => "manifest_empty",
            CheckError::MissingCriticalPackage { .. } => "missing_critical_package",
            CheckError::LoadError { .. } => "load_error",
            CheckError::MissingStartScript { .. } => "missing_start_script",
            CheckError::EmptyOrTooShort { .. } => "empty_or_too_short",
            CheckError::MissingProcessManagerReference { .. } => {
                "missing_process_manager_reference"
            }
        }
    }
}
