// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! `match` statement patterns and PEP 695 type parameters.
//!
//! Both families bind plain identifier strings (`case [x, *rest]`,
//! `def f[T]()`) rather than [`Name`](super::Name) nodes, so they get their
//! own transformer hooks.

use serde::{Deserialize, Serialize};

use super::expression::Expr;
use super::SourceRange;

// ============================================================================
// Patterns
// ============================================================================

/// A `case` pattern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "_type")]
pub enum Pattern {
    MatchValue(MatchValue),
    MatchSingleton(MatchSingleton),
    MatchSequence(MatchSequence),
    MatchMapping(MatchMapping),
    MatchClass(MatchClass),
    MatchStar(MatchStar),
    MatchAs(MatchAs),
    MatchOr(MatchOr),
    /// A node kind this model does not describe.
    #[serde(other)]
    Unsupported,
}

impl Pattern {
    /// The Python class name of this node.
    pub fn kind(&self) -> &'static str {
        match self {
            Pattern::MatchValue(_) => "MatchValue",
            Pattern::MatchSingleton(_) => "MatchSingleton",
            Pattern::MatchSequence(_) => "MatchSequence",
            Pattern::MatchMapping(_) => "MatchMapping",
            Pattern::MatchClass(_) => "MatchClass",
            Pattern::MatchStar(_) => "MatchStar",
            Pattern::MatchAs(_) => "MatchAs",
            Pattern::MatchOr(_) => "MatchOr",
            Pattern::Unsupported => "Unsupported",
        }
    }
}

/// `case 1:` / `case Color.RED:`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchValue {
    pub value: Box<Expr>,
    #[serde(flatten)]
    pub range: SourceRange,
}

/// `case None:` / `case True:`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchSingleton {
    pub value: serde_json::Value,
    #[serde(flatten)]
    pub range: SourceRange,
}

/// `case [a, b, *rest]:`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchSequence {
    #[serde(default)]
    pub patterns: Vec<Pattern>,
    #[serde(flatten)]
    pub range: SourceRange,
}

/// `case {"k": v, **rest}:`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchMapping {
    #[serde(default)]
    pub keys: Vec<Expr>,
    #[serde(default)]
    pub patterns: Vec<Pattern>,
    #[serde(default)]
    pub rest: Option<String>,
    #[serde(flatten)]
    pub range: SourceRange,
}

/// `case Point(x, y=0):`.
///
/// `kwd_attrs` are attribute names looked up on the matched object, not
/// bindings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchClass {
    pub cls: Box<Expr>,
    #[serde(default)]
    pub patterns: Vec<Pattern>,
    #[serde(default)]
    pub kwd_attrs: Vec<String>,
    #[serde(default)]
    pub kwd_patterns: Vec<Pattern>,
    #[serde(flatten)]
    pub range: SourceRange,
}

/// `*rest` inside a sequence pattern; `name` is `None` for `*_`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchStar {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(flatten)]
    pub range: SourceRange,
}

/// `pattern as name`, a bare capture `name`, or the wildcard `_`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchAs {
    #[serde(default)]
    pub pattern: Option<Box<Pattern>>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(flatten)]
    pub range: SourceRange,
}

/// `p1 | p2`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchOr {
    #[serde(default)]
    pub patterns: Vec<Pattern>,
    #[serde(flatten)]
    pub range: SourceRange,
}

// ============================================================================
// Type parameters
// ============================================================================

/// A PEP 695 type parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "_type")]
pub enum TypeParam {
    TypeVar(TypeVar),
    ParamSpec(ParamSpec),
    TypeVarTuple(ParamSpec),
    /// A node kind this model does not describe.
    #[serde(other)]
    Unsupported,
}

impl TypeParam {
    /// The Python class name of this node.
    pub fn kind(&self) -> &'static str {
        match self {
            TypeParam::TypeVar(_) => "TypeVar",
            TypeParam::ParamSpec(_) => "ParamSpec",
            TypeParam::TypeVarTuple(_) => "TypeVarTuple",
            TypeParam::Unsupported => "Unsupported",
        }
    }
}

/// `T: bound = default`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeVar {
    pub name: String,
    #[serde(default)]
    pub bound: Option<Box<Expr>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<Box<Expr>>,
    #[serde(flatten)]
    pub range: SourceRange,
}

/// `**P` or `*Ts`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParamSpec {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<Box<Expr>>,
    #[serde(flatten)]
    pub range: SourceRange,
}
