// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! A serde model of the Python abstract syntax tree with in-place traversal.
//!
//! This crate describes the node taxonomy of Python's `ast` module as Rust
//! types, loads and stores it as JSON, and walks it with a fallible,
//! mutable [`Transformer`].
//!
//! # Overview
//!
//! - **Loading**: Read a tagged JSON dump (each node carries a `_type` field
//!   naming its Python class) with [`load_module`] or
//!   [`load_module_from_reader`].
//! - **Storing**: Write the tree back in the same shape with [`dump_module`].
//! - **Traversal**: Implement [`Transformer`] and call [`walk_module`].
//!
//! # Quick Start
//!
//! ```
//! use astobf_ast::{dump_module, load_module};
//!
//! let json = r#"{"_type": "Module", "body": [
//!     {"_type": "Expr", "value": {"_type": "Name", "id": "x", "ctx": {"_type": "Load"}}}
//! ], "type_ignores": []}"#;
//!
//! let module = load_module(json).expect("load error");
//! assert_eq!(module.body.len(), 1);
//!
//! let back = dump_module(&module).expect("dump error");
//! assert!(back.contains("\"Name\""));
//! ```
//!
//! # Unknown Node Kinds
//!
//! Loading never fails on a node kind this model does not describe. The
//! node becomes an `Unsupported` marker, and walking it fails with
//! [`WalkError::UnsupportedNode`].

use std::io::Read;

use thiserror::Error;

// ============================================================================
// Public modules and re-exports
// ============================================================================

/// Node types for the Python syntax tree.
pub mod nodes;

// Re-export all node types for tree construction and traversal
pub use nodes::*;

/// Transformer infrastructure for in-place traversal.
pub mod visitor;
pub use visitor::{walk_module, Transformer, VisitResult, WalkError};

// ============================================================================
// Load and store
// ============================================================================

/// Errors produced while loading or storing a tree.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The input is not valid JSON or does not have the shape of a module.
    #[error("invalid syntax tree JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The input could not be read.
    #[error("failed to read syntax tree: {0}")]
    Io(#[from] std::io::Error),
}

/// Load a module from its tagged JSON dump.
pub fn load_module(json: &str) -> Result<Module, LoadError> {
    Ok(serde_json::from_str(json)?)
}

/// Load a module from a reader holding its tagged JSON dump.
pub fn load_module_from_reader<R: Read>(mut reader: R) -> Result<Module, LoadError> {
    let mut json = String::new();
    reader.read_to_string(&mut json)?;
    load_module(&json)
}

/// Store a module as pretty-printed tagged JSON.
pub fn dump_module(module: &Module) -> Result<String, LoadError> {
    Ok(serde_json::to_string_pretty(module)?)
}
