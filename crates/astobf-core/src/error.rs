//! Error types and error code constants for astobf.
//!
//! This module provides a unified error type (`ObfuscateError`) that bridges
//! errors from the tree walk, the name authority, configuration loading and
//! I/O into a common format suitable for JSON output.
//!
//! ## Error Code Mapping
//!
//! - `2`: Invalid arguments (bad configuration, bad name style)
//! - `3`: Input errors (unreadable file, malformed tree, unsupported node)
//! - `10`: Internal errors (name space exhaustion, unexpected state)

use std::fmt;
use std::path::PathBuf;

use astobf_ast::{LoadError, WalkError};
use thiserror::Error;

use crate::config::ConfigError;
use crate::names::NameError;

// ============================================================================
// Output Error Codes
// ============================================================================

/// Error codes for JSON output.
///
/// These codes map to CLI exit codes and appear in JSON error responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum OutputErrorCode {
    /// Invalid arguments from caller (bad flags, bad configuration).
    InvalidArguments = 2,
    /// The input tree could not be read, parsed or traversed.
    InputError = 3,
    /// Internal errors (exhaustion, bugs, unexpected state).
    InternalError = 10,
}

impl OutputErrorCode {
    /// Get the numeric code value.
    pub fn code(&self) -> u8 {
        *self as u8
    }
}

impl fmt::Display for OutputErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

// ============================================================================
// Unified Error Type
// ============================================================================

/// Unified error type for an obfuscation run.
///
/// Every failure aborts the run; no variant describes a partial result.
#[derive(Debug, Error)]
pub enum ObfuscateError {
    /// The tree holds a node kind the rewriter cannot traverse.
    #[error(transparent)]
    Walk(#[from] WalkError),

    /// Name generation failed.
    #[error(transparent)]
    Name(#[from] NameError),

    /// Configuration could not be loaded or is invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The input tree could not be loaded or the output could not be stored.
    #[error(transparent)]
    Load(#[from] LoadError),

    /// Reading or writing a file failed.
    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ObfuscateError {
    /// Create an I/O error for `path`.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ObfuscateError::Io {
            path: path.into(),
            source,
        }
    }

    /// Get the error code for this error.
    pub fn error_code(&self) -> OutputErrorCode {
        OutputErrorCode::from(self)
    }
}

// ============================================================================
// Error Code Mapping
// ============================================================================

impl From<&ObfuscateError> for OutputErrorCode {
    fn from(err: &ObfuscateError) -> Self {
        match err {
            ObfuscateError::Walk(_) => OutputErrorCode::InputError,
            ObfuscateError::Name(NameError::InvalidStyle { .. }) => {
                OutputErrorCode::InvalidArguments
            }
            ObfuscateError::Name(NameError::PinConflict { .. }) => OutputErrorCode::InternalError,
            ObfuscateError::Name(NameError::Exhausted { .. }) => OutputErrorCode::InternalError,
            ObfuscateError::Config(_) => OutputErrorCode::InvalidArguments,
            ObfuscateError::Load(_) => OutputErrorCode::InputError,
            ObfuscateError::Io { .. } => OutputErrorCode::InputError,
        }
    }
}

impl From<ObfuscateError> for OutputErrorCode {
    fn from(err: ObfuscateError) -> Self {
        OutputErrorCode::from(&err)
    }
}

// ============================================================================
// Tests
// ============================================================================
