// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Node types for the Python syntax tree.
//!
//! The node taxonomy follows Python's `ast` module one-to-one: every node kind
//! has the same name and the same field names as its Python counterpart, so a
//! JSON dump of `ast.parse(...)` tagged with `_type` deserializes directly.
//!
//! # Layout
//!
//! - [`statement`]: [`Module`], [`Stmt`] and the statement-level helper nodes
//!   ([`Alias`], [`ExceptHandler`], [`WithItem`], [`MatchCase`]).
//! - [`expression`]: [`Expr`] and the expression-level helper nodes
//!   ([`Arguments`], [`Arg`], [`Keyword`], [`Comprehension`]).
//! - [`pattern`]: `match` statement patterns and PEP 695 type parameters.
//! - [`op`]: operators and expression contexts.
//!
//! # Unknown node kinds
//!
//! Each open sum type ([`Stmt`], [`Expr`], [`Pattern`], [`TypeParam`]) carries an
//! `Unsupported` variant. A `_type` tag the model does not know deserializes to
//! it instead of failing the load, and the walk in [`crate::visitor`] rejects
//! it with [`crate::visitor::WalkError::UnsupportedNode`].

pub mod expression;
pub mod op;
pub mod pattern;
pub mod statement;

pub use expression::*;
pub use op::*;
pub use pattern::*;
pub use statement::*;

use serde::{Deserialize, Serialize};

/// Source position attributes carried by most Python AST nodes.
///
/// All four attributes are optional: synthesized nodes have none, and
/// `end_*` may be `null` in dumps produced by older interpreters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceRange {
    /// First line (1-indexed).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lineno: Option<u32>,
    /// Byte offset of the first character on `lineno`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub col_offset: Option<u32>,
    /// Last line (1-indexed).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_lineno: Option<u32>,
    /// Byte offset one past the last character on `end_lineno`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_col_offset: Option<u32>,
}

impl std::fmt::Display for SourceRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (self.lineno, self.col_offset) {
            (Some(line), Some(col)) => write!(f, "{}:{}", line, col),
            (Some(line), None) => write!(f, "{}", line),
            _ => write!(f, "<unknown>"),
        }
    }
}
