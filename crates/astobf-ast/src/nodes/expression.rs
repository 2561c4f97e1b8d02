// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Expression nodes.

use serde::{Deserialize, Serialize};

use super::op::{BoolOperator, ComparisonOperator, ExprContext, Operator, UnaryOperator};
use super::SourceRange;

// ============================================================================
// Expression sum type
// ============================================================================

/// A Python expression.
///
/// Variant names and payload field names match Python's `ast.expr` subclasses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "_type")]
pub enum Expr {
    BoolOp(BoolOp),
    NamedExpr(NamedExpr),
    BinOp(BinOp),
    UnaryOp(UnaryOp),
    Lambda(Lambda),
    IfExp(IfExp),
    Dict(Dict),
    Set(Set),
    ListComp(ListComp),
    SetComp(SetComp),
    DictComp(DictComp),
    GeneratorExp(GeneratorExp),
    Await(Await),
    Yield(Yield),
    YieldFrom(YieldFrom),
    Compare(Compare),
    Call(Call),
    FormattedValue(FormattedValue),
    JoinedStr(JoinedStr),
    Constant(Constant),
    Attribute(Attribute),
    Subscript(Subscript),
    Starred(Starred),
    Name(Name),
    List(List),
    Tuple(Tuple),
    Slice(Slice),
    /// A node kind this model does not describe.
    #[serde(other)]
    Unsupported,
}

impl Expr {
    /// The Python class name of this node (`"Name"`, `"Call"`, ...).
    pub fn kind(&self) -> &'static str {
        match self {
            Expr::BoolOp(_) => "BoolOp",
            Expr::NamedExpr(_) => "NamedExpr",
            Expr::BinOp(_) => "BinOp",
            Expr::UnaryOp(_) => "UnaryOp",
            Expr::Lambda(_) => "Lambda",
            Expr::IfExp(_) => "IfExp",
            Expr::Dict(_) => "Dict",
            Expr::Set(_) => "Set",
            Expr::ListComp(_) => "ListComp",
            Expr::SetComp(_) => "SetComp",
            Expr::DictComp(_) => "DictComp",
            Expr::GeneratorExp(_) => "GeneratorExp",
            Expr::Await(_) => "Await",
            Expr::Yield(_) => "Yield",
            Expr::YieldFrom(_) => "YieldFrom",
            Expr::Compare(_) => "Compare",
            Expr::Call(_) => "Call",
            Expr::FormattedValue(_) => "FormattedValue",
            Expr::JoinedStr(_) => "JoinedStr",
            Expr::Constant(_) => "Constant",
            Expr::Attribute(_) => "Attribute",
            Expr::Subscript(_) => "Subscript",
            Expr::Starred(_) => "Starred",
            Expr::Name(_) => "Name",
            Expr::List(_) => "List",
            Expr::Tuple(_) => "Tuple",
            Expr::Slice(_) => "Slice",
            Expr::Unsupported => "Unsupported",
        }
    }

    /// Returns the identifier if this is a bare [`Name`].
    pub fn as_name(&self) -> Option<&str> {
        match self {
            Expr::Name(name) => Some(name.id.as_str()),
            _ => None,
        }
    }
}

// ============================================================================
// Identifiers and member access
// ============================================================================

/// An identifier reference: `x`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Name {
    pub id: String,
    #[serde(default)]
    pub ctx: ExprContext,
    #[serde(flatten)]
    pub range: SourceRange,
}

impl Name {
    /// Create a name with the given context and no source range.
    pub fn new(id: impl Into<String>, ctx: ExprContext) -> Self {
        Self {
            id: id.into(),
            ctx,
            range: SourceRange::default(),
        }
    }

    /// Create a `Load` reference.
    pub fn load(id: impl Into<String>) -> Self {
        Self::new(id, ExprContext::Load)
    }

    /// Create a `Store` target.
    pub fn store(id: impl Into<String>) -> Self {
        Self::new(id, ExprContext::Store)
    }
}

/// Member access: `value.attr`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attribute {
    pub value: Box<Expr>,
    pub attr: String,
    #[serde(default)]
    pub ctx: ExprContext,
    #[serde(flatten)]
    pub range: SourceRange,
}

impl Attribute {
    /// Create a `Load` attribute access.
    pub fn new(value: Expr, attr: impl Into<String>) -> Self {
        Self {
            value: Box::new(value),
            attr: attr.into(),
            ctx: ExprContext::Load,
            range: SourceRange::default(),
        }
    }
}

/// Subscript: `value[slice]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subscript {
    pub value: Box<Expr>,
    pub slice: Box<Expr>,
    #[serde(default)]
    pub ctx: ExprContext,
    #[serde(flatten)]
    pub range: SourceRange,
}

/// Starred: `*value`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Starred {
    pub value: Box<Expr>,
    #[serde(default)]
    pub ctx: ExprContext,
    #[serde(flatten)]
    pub range: SourceRange,
}

/// Slice inside a subscript: `lower:upper:step`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Slice {
    #[serde(default)]
    pub lower: Option<Box<Expr>>,
    #[serde(default)]
    pub upper: Option<Box<Expr>>,
    #[serde(default)]
    pub step: Option<Box<Expr>>,
    #[serde(flatten)]
    pub range: SourceRange,
}

// ============================================================================
// Operators
// ============================================================================

/// `a and b and c`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoolOp {
    pub op: BoolOperator,
    pub values: Vec<Expr>,
    #[serde(flatten)]
    pub range: SourceRange,
}

/// Walrus: `target := value`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedExpr {
    pub target: Box<Expr>,
    pub value: Box<Expr>,
    #[serde(flatten)]
    pub range: SourceRange,
}

/// `left op right`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BinOp {
    pub left: Box<Expr>,
    pub op: Operator,
    pub right: Box<Expr>,
    #[serde(flatten)]
    pub range: SourceRange,
}

/// `op operand`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnaryOp {
    pub op: UnaryOperator,
    pub operand: Box<Expr>,
    #[serde(flatten)]
    pub range: SourceRange,
}

/// `left op1 c1 op2 c2 ...`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Compare {
    pub left: Box<Expr>,
    pub ops: Vec<ComparisonOperator>,
    pub comparators: Vec<Expr>,
    #[serde(flatten)]
    pub range: SourceRange,
}

/// `body if test else orelse`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IfExp {
    pub test: Box<Expr>,
    pub body: Box<Expr>,
    pub orelse: Box<Expr>,
    #[serde(flatten)]
    pub range: SourceRange,
}

// ============================================================================
// Functions and calls
// ============================================================================

/// `lambda args: body`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lambda {
    pub args: Box<Arguments>,
    pub body: Box<Expr>,
    #[serde(flatten)]
    pub range: SourceRange,
}

/// `func(*args, **keywords)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Call {
    pub func: Box<Expr>,
    #[serde(default)]
    pub args: Vec<Expr>,
    #[serde(default)]
    pub keywords: Vec<Keyword>,
    #[serde(flatten)]
    pub range: SourceRange,
}

/// A parameter list, shared by `def` and `lambda`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "_type", rename = "arguments")]
pub struct Arguments {
    #[serde(default)]
    pub posonlyargs: Vec<Arg>,
    #[serde(default)]
    pub args: Vec<Arg>,
    #[serde(default)]
    pub vararg: Option<Arg>,
    #[serde(default)]
    pub kwonlyargs: Vec<Arg>,
    /// One entry per keyword-only argument; `None` when it has no default.
    #[serde(default)]
    pub kw_defaults: Vec<Option<Expr>>,
    #[serde(default)]
    pub kwarg: Option<Arg>,
    #[serde(default)]
    pub defaults: Vec<Expr>,
}

/// A single parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "_type", rename = "arg")]
pub struct Arg {
    pub arg: String,
    #[serde(default)]
    pub annotation: Option<Box<Expr>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_comment: Option<String>,
    #[serde(flatten)]
    pub range: SourceRange,
}

impl Arg {
    /// Create an unannotated parameter.
    pub fn new(arg: impl Into<String>) -> Self {
        Self {
            arg: arg.into(),
            annotation: None,
            type_comment: None,
            range: SourceRange::default(),
        }
    }
}

/// A keyword argument at a call site; `arg` is `None` for `**kwargs`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "_type", rename = "keyword")]
pub struct Keyword {
    #[serde(default)]
    pub arg: Option<String>,
    pub value: Expr,
    #[serde(flatten)]
    pub range: SourceRange,
}

// ============================================================================
// Displays and comprehensions
// ============================================================================

/// `{k: v, **d}`; a `None` key marks a `**` unpacking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dict {
    #[serde(default)]
    pub keys: Vec<Option<Expr>>,
    #[serde(default)]
    pub values: Vec<Expr>,
    #[serde(flatten)]
    pub range: SourceRange,
}

/// `{a, b}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Set {
    #[serde(default)]
    pub elts: Vec<Expr>,
    #[serde(flatten)]
    pub range: SourceRange,
}

/// `[a, b]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct List {
    #[serde(default)]
    pub elts: Vec<Expr>,
    #[serde(default)]
    pub ctx: ExprContext,
    #[serde(flatten)]
    pub range: SourceRange,
}

/// `(a, b)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tuple {
    #[serde(default)]
    pub elts: Vec<Expr>,
    #[serde(default)]
    pub ctx: ExprContext,
    #[serde(flatten)]
    pub range: SourceRange,
}

/// `[elt for ...]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListComp {
    pub elt: Box<Expr>,
    pub generators: Vec<Comprehension>,
    #[serde(flatten)]
    pub range: SourceRange,
}

/// `{elt for ...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetComp {
    pub elt: Box<Expr>,
    pub generators: Vec<Comprehension>,
    #[serde(flatten)]
    pub range: SourceRange,
}

/// `{key: value for ...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DictComp {
    pub key: Box<Expr>,
    pub value: Box<Expr>,
    pub generators: Vec<Comprehension>,
    #[serde(flatten)]
    pub range: SourceRange,
}

/// `(elt for ...)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratorExp {
    pub elt: Box<Expr>,
    pub generators: Vec<Comprehension>,
    #[serde(flatten)]
    pub range: SourceRange,
}

/// One `for target in iter if ...` clause of a comprehension.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "_type", rename = "comprehension")]
pub struct Comprehension {
    pub target: Expr,
    pub iter: Expr,
    #[serde(default)]
    pub ifs: Vec<Expr>,
    #[serde(default)]
    pub is_async: u8,
}

// ============================================================================
// Coroutines and generators
// ============================================================================

/// `await value`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Await {
    pub value: Box<Expr>,
    #[serde(flatten)]
    pub range: SourceRange,
}

/// `yield value`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Yield {
    #[serde(default)]
    pub value: Option<Box<Expr>>,
    #[serde(flatten)]
    pub range: SourceRange,
}

/// `yield from value`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YieldFrom {
    pub value: Box<Expr>,
    #[serde(flatten)]
    pub range: SourceRange,
}

// ============================================================================
// Literals
// ============================================================================

/// A literal constant. The payload is kept as raw JSON so that every value
/// the dumper can express survives a load/store cycle untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Constant {
    pub value: serde_json::Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(flatten)]
    pub range: SourceRange,
}

/// One `{value!conversion:format_spec}` field of an f-string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormattedValue {
    pub value: Box<Expr>,
    #[serde(default = "no_conversion")]
    pub conversion: i32,
    #[serde(default)]
    pub format_spec: Option<Box<Expr>>,
    #[serde(flatten)]
    pub range: SourceRange,
}

fn no_conversion() -> i32 {
    -1
}

/// An f-string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JoinedStr {
    #[serde(default)]
    pub values: Vec<Expr>,
    #[serde(flatten)]
    pub range: SourceRange,
}
