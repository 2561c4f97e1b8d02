//! Identifier obfuscation engine for astobf.
//!
//! This crate provides:
//! - The name authority: collision-free generation of confusable identifiers
//! - The reserved-name set: keywords, literals, builtins and dunder names
//! - The tree rewriter that renames identifiers of a Python syntax tree
//! - Configuration loading and validation
//! - Error types and error codes
//! - JSON output types for CLI responses
//!
//! ```
//! use astobf_ast::load_module;
//! use astobf_core::{obfuscate_module, ObfuscateOptions};
//!
//! let mut module = load_module(r#"{
//!     "_type": "Module",
//!     "body": [{"_type": "Expr", "value": {"_type": "Name", "id": "counter"}}]
//! }"#).unwrap();
//! let options = ObfuscateOptions { seed: Some(7), ..ObfuscateOptions::default() };
//! let report = obfuscate_module(&mut module, &options).unwrap();
//! assert_eq!(report.name_map.len(), 1);
//! ```

pub mod config;
pub mod error;
pub mod names;
pub mod obfuscate;
pub mod output;
pub mod reserved;

pub use config::{Config, ObfuscateOptions};
pub use error::{ObfuscateError, OutputErrorCode};
pub use names::{NameAuthority, NameError, NameMap, NameStyle};
pub use obfuscate::{obfuscate_module, NameObfuscator, ObfuscationReport, ObfuscationStats};
pub use reserved::ReservedNames;
