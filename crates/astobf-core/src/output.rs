//! JSON output types for CLI responses.
//!
//! Every response is a single JSON document on stdout with `status` first and
//! a `schema_version` next to it. The obfuscated tree itself is written
//! separately (to `--output`, or to stdout when no report is requested).

use std::io::{self, Write};

use serde::{Deserialize, Serialize};

use crate::error::{ObfuscateError, OutputErrorCode};
use crate::names::{NameError, NameMap};
use crate::obfuscate::{ObfuscationReport, ObfuscationStats};

/// Current schema version for all responses.
pub const SCHEMA_VERSION: &str = "1";

// ============================================================================
// Errors
// ============================================================================

/// Error information for error responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Numeric error code, also used as the process exit code.
    pub code: u8,
    /// Human-readable message.
    pub message: String,
    /// Error-specific structured data.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorInfo {
    /// Create from an ObfuscateError.
    pub fn from_error(err: &ObfuscateError) -> Self {
        let details = match err {
            ObfuscateError::Walk(astobf_ast::WalkError::UnsupportedNode { context }) => {
                Some(serde_json::json!({ "context": context }))
            }
            ObfuscateError::Name(NameError::Exhausted { original, attempts }) => {
                Some(serde_json::json!({ "original": original, "attempts": attempts }))
            }
            ObfuscateError::Name(NameError::PinConflict { name, existing }) => {
                Some(serde_json::json!({ "name": name, "existing": existing }))
            }
            ObfuscateError::Io { path, .. } => {
                Some(serde_json::json!({ "path": path.display().to_string() }))
            }
            _ => None,
        };

        ErrorInfo {
            code: OutputErrorCode::from(err).code(),
            message: err.to_string(),
            details,
        }
    }
}

/// Error response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Status: "error".
    pub status: String,
    /// Schema version for compatibility.
    pub schema_version: String,
    /// Error information.
    pub error: ErrorInfo,
}

impl ErrorResponse {
    /// Create an error response from an ObfuscateError.
    pub fn from_error(err: &ObfuscateError) -> Self {
        ErrorResponse {
            status: "error".to_string(),
            schema_version: SCHEMA_VERSION.to_string(),
            error: ErrorInfo::from_error(err),
        }
    }
}

// ============================================================================
// Responses
// ============================================================================

/// Response for the `run` command.
#[derive(Debug, Clone, Serialize)]
pub struct ObfuscateResponse {
    /// Status: "ok".
    pub status: String,
    /// Schema version for compatibility.
    pub schema_version: String,
    /// Where the rewritten tree was written, if not stdout.
    pub output: Option<String>,
    /// `original -> obfuscated`, in first-seen order.
    pub name_map: NameMap,
    /// Run counters.
    pub stats: ObfuscationStats,
}

impl ObfuscateResponse {
    /// Create a response from a finished run.
    pub fn new(report: ObfuscationReport, output: Option<String>) -> Self {
        ObfuscateResponse {
            status: "ok".to_string(),
            schema_version: SCHEMA_VERSION.to_string(),
            output,
            name_map: report.name_map,
            stats: report.stats,
        }
    }
}

/// Response for the `builtins` command.
#[derive(Debug, Clone, Serialize)]
pub struct ReservedResponse {
    /// Status: "ok".
    pub status: String,
    /// Schema version for compatibility.
    pub schema_version: String,
    /// Every explicitly reserved name, sorted.
    pub names: Vec<String>,
}

impl ReservedResponse {
    /// Create a response listing `names`.
    pub fn new(names: Vec<String>) -> Self {
        ReservedResponse {
            status: "ok".to_string(),
            schema_version: SCHEMA_VERSION.to_string(),
            names,
        }
    }
}

// ============================================================================
// Response Emission
// ============================================================================

/// Emit a response as pretty-printed JSON to a writer.
pub fn emit_response<T: Serialize>(response: &T, writer: &mut impl Write) -> io::Result<()> {
    let json = serde_json::to_string_pretty(response)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    writeln!(writer, "{}", json)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigError;
    use astobf_ast::WalkError;

    fn emit_to_value<T: Serialize>(response: &T) -> serde_json::Value {
        let mut out = Vec::new();
        emit_response(response, &mut out).unwrap();
        serde_json::from_slice(&out).unwrap()
    }

    mod error_response {
        use super::*;

        #[test]
        fn unsupported_node_carries_context() {
            let err = ObfuscateError::from(WalkError::UnsupportedNode {
                context: "pattern",
            });
            let json = emit_to_value(&ErrorResponse::from_error(&err));
            assert_eq!(json["status"], "error");
            assert_eq!(json["error"]["code"], 3);
            assert_eq!(json["error"]["details"]["context"], "pattern");
        }

        #[test]
        fn exhaustion_carries_original_name() {
            let err = ObfuscateError::from(NameError::Exhausted {
                original: "counter".to_string(),
                attempts: 5,
            });
            let info = ErrorInfo::from_error(&err);
            assert_eq!(info.code, 10);
            let details = info.details.unwrap();
            assert_eq!(details["original"], "counter");
            assert_eq!(details["attempts"], 5);
        }

        #[test]
        fn config_error_has_no_details() {
            let err = ObfuscateError::from(ConfigError::InvalidStyle(NameError::InvalidStyle {
                reason: "leading alphabet is empty".to_string(),
            }));
            let json = emit_to_value(&ErrorResponse::from_error(&err));
            assert_eq!(json["error"]["code"], 2);
            assert_eq!(
                json["error"]["message"],
                "invalid [obfuscate.style]: invalid name style: leading alphabet is empty"
            );
            assert!(json["error"].get("details").is_none());
        }
    }

    mod ok_responses {
        use super::*;

        #[test]
        fn status_is_the_first_field() {
            let report = ObfuscationReport {
                name_map: NameMap::default(),
                stats: ObfuscationStats::default(),
            };
            let mut out = Vec::new();
            emit_response(&ObfuscateResponse::new(report, None), &mut out).unwrap();
            let text = String::from_utf8(out).unwrap();
            assert!(text.trim_start().starts_with("{\n  \"status\": \"ok\""));
        }

        #[test]
        fn reserved_response_lists_names() {
            let json = emit_to_value(&ReservedResponse::new(vec!["len".to_string()]));
            assert_eq!(json["names"][0], "len");
            assert_eq!(json["schema_version"], SCHEMA_VERSION);
        }

        #[test]
        fn output_is_null_when_written_to_stdout() {
            let report = ObfuscationReport {
                name_map: NameMap::default(),
                stats: ObfuscationStats::default(),
            };
            let json = emit_to_value(&ObfuscateResponse::new(report, None));
            assert!(json["output"].is_null());
            assert_eq!(json["stats"]["names_renamed"], 0);
        }
    }
}
