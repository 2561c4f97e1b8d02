// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Module and statement nodes.

use serde::{Deserialize, Serialize};

use super::expression::{Arguments, Expr, Keyword};
use super::op::Operator;
use super::pattern::{Pattern, TypeParam};
use super::SourceRange;

// ============================================================================
// Module
// ============================================================================

/// The root of a parsed file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "_type", rename = "Module")]
pub struct Module {
    #[serde(default)]
    pub body: Vec<Stmt>,
    #[serde(default)]
    pub type_ignores: Vec<TypeIgnore>,
}

impl Module {
    /// Create a module from a list of statements.
    pub fn new(body: Vec<Stmt>) -> Self {
        Self {
            body,
            type_ignores: Vec::new(),
        }
    }
}

/// A `# type: ignore` comment recorded by the parser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "_type", rename = "TypeIgnore")]
pub struct TypeIgnore {
    pub lineno: u32,
    #[serde(default)]
    pub tag: String,
}

// ============================================================================
// Statement sum type
// ============================================================================

/// A Python statement.
///
/// Variant names and payload field names match Python's `ast.stmt` subclasses.
/// The `async` forms share the payload of their synchronous counterparts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "_type")]
pub enum Stmt {
    FunctionDef(FunctionDef),
    AsyncFunctionDef(FunctionDef),
    ClassDef(ClassDef),
    Return(Return),
    Delete(Delete),
    Assign(Assign),
    TypeAlias(TypeAlias),
    AugAssign(AugAssign),
    AnnAssign(AnnAssign),
    For(For),
    AsyncFor(For),
    While(While),
    If(If),
    With(With),
    AsyncWith(With),
    Match(Match),
    Raise(Raise),
    Try(Try),
    TryStar(Try),
    Assert(Assert),
    Import(Import),
    ImportFrom(ImportFrom),
    Global(Global),
    Nonlocal(Global),
    Expr(ExprStmt),
    Pass(SourceRange),
    Break(SourceRange),
    Continue(SourceRange),
    /// A node kind this model does not describe.
    #[serde(other)]
    Unsupported,
}

impl Stmt {
    /// The Python class name of this node (`"Import"`, `"FunctionDef"`, ...).
    pub fn kind(&self) -> &'static str {
        match self {
            Stmt::FunctionDef(_) => "FunctionDef",
            Stmt::AsyncFunctionDef(_) => "AsyncFunctionDef",
            Stmt::ClassDef(_) => "ClassDef",
            Stmt::Return(_) => "Return",
            Stmt::Delete(_) => "Delete",
            Stmt::Assign(_) => "Assign",
            Stmt::TypeAlias(_) => "TypeAlias",
            Stmt::AugAssign(_) => "AugAssign",
            Stmt::AnnAssign(_) => "AnnAssign",
            Stmt::For(_) => "For",
            Stmt::AsyncFor(_) => "AsyncFor",
            Stmt::While(_) => "While",
            Stmt::If(_) => "If",
            Stmt::With(_) => "With",
            Stmt::AsyncWith(_) => "AsyncWith",
            Stmt::Match(_) => "Match",
            Stmt::Raise(_) => "Raise",
            Stmt::Try(_) => "Try",
            Stmt::TryStar(_) => "TryStar",
            Stmt::Assert(_) => "Assert",
            Stmt::Import(_) => "Import",
            Stmt::ImportFrom(_) => "ImportFrom",
            Stmt::Global(_) => "Global",
            Stmt::Nonlocal(_) => "Nonlocal",
            Stmt::Expr(_) => "Expr",
            Stmt::Pass(_) => "Pass",
            Stmt::Break(_) => "Break",
            Stmt::Continue(_) => "Continue",
            Stmt::Unsupported => "Unsupported",
        }
    }
}

// ============================================================================
// Definitions
// ============================================================================

/// `def name(args) -> returns: body` (also `async def`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionDef {
    pub name: String,
    pub args: Arguments,
    #[serde(default)]
    pub body: Vec<Stmt>,
    #[serde(default)]
    pub decorator_list: Vec<Expr>,
    #[serde(default)]
    pub returns: Option<Box<Expr>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_comment: Option<String>,
    #[serde(default)]
    pub type_params: Vec<TypeParam>,
    #[serde(flatten)]
    pub range: SourceRange,
}

/// `class name(bases, **keywords): body`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassDef {
    pub name: String,
    #[serde(default)]
    pub bases: Vec<Expr>,
    #[serde(default)]
    pub keywords: Vec<Keyword>,
    #[serde(default)]
    pub body: Vec<Stmt>,
    #[serde(default)]
    pub decorator_list: Vec<Expr>,
    #[serde(default)]
    pub type_params: Vec<TypeParam>,
    #[serde(flatten)]
    pub range: SourceRange,
}

/// `type name[type_params] = value`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeAlias {
    pub name: Box<Expr>,
    #[serde(default)]
    pub type_params: Vec<TypeParam>,
    pub value: Box<Expr>,
    #[serde(flatten)]
    pub range: SourceRange,
}

// ============================================================================
// Simple statements
// ============================================================================

/// `return value`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Return {
    #[serde(default)]
    pub value: Option<Box<Expr>>,
    #[serde(flatten)]
    pub range: SourceRange,
}

/// `del targets`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Delete {
    pub targets: Vec<Expr>,
    #[serde(flatten)]
    pub range: SourceRange,
}

/// `t1 = t2 = value`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assign {
    pub targets: Vec<Expr>,
    pub value: Box<Expr>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_comment: Option<String>,
    #[serde(flatten)]
    pub range: SourceRange,
}

/// `target op= value`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AugAssign {
    pub target: Box<Expr>,
    pub op: Operator,
    pub value: Box<Expr>,
    #[serde(flatten)]
    pub range: SourceRange,
}

/// `target: annotation = value`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnAssign {
    pub target: Box<Expr>,
    pub annotation: Box<Expr>,
    #[serde(default)]
    pub value: Option<Box<Expr>>,
    #[serde(default)]
    pub simple: u8,
    #[serde(flatten)]
    pub range: SourceRange,
}

/// `raise exc from cause`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Raise {
    #[serde(default)]
    pub exc: Option<Box<Expr>>,
    #[serde(default)]
    pub cause: Option<Box<Expr>>,
    #[serde(flatten)]
    pub range: SourceRange,
}

/// `assert test, msg`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assert {
    pub test: Box<Expr>,
    #[serde(default)]
    pub msg: Option<Box<Expr>>,
    #[serde(flatten)]
    pub range: SourceRange,
}

/// `global a, b` (also `nonlocal`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Global {
    pub names: Vec<String>,
    #[serde(flatten)]
    pub range: SourceRange,
}

/// An expression used as a statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExprStmt {
    pub value: Box<Expr>,
    #[serde(flatten)]
    pub range: SourceRange,
}

impl ExprStmt {
    /// Wrap an expression as a statement.
    pub fn new(value: Expr) -> Self {
        Self {
            value: Box::new(value),
            range: SourceRange::default(),
        }
    }
}

// ============================================================================
// Imports
// ============================================================================

/// `import a, b.c as d`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Import {
    pub names: Vec<Alias>,
    #[serde(flatten)]
    pub range: SourceRange,
}

/// `from ..module import a as b`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportFrom {
    #[serde(default)]
    pub module: Option<String>,
    pub names: Vec<Alias>,
    /// Number of leading dots (relative import level).
    #[serde(default)]
    pub level: u32,
    #[serde(flatten)]
    pub range: SourceRange,
}

/// One `name as asname` entry of an import statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "_type", rename = "alias")]
pub struct Alias {
    /// The imported name, possibly dotted (`os.path`) or `*`.
    pub name: String,
    #[serde(default)]
    pub asname: Option<String>,
    #[serde(flatten)]
    pub range: SourceRange,
}

impl Alias {
    /// Create an import alias.
    pub fn new(name: impl Into<String>, asname: Option<&str>) -> Self {
        Self {
            name: name.into(),
            asname: asname.map(str::to_string),
            range: SourceRange::default(),
        }
    }

    /// The name the importing module binds: the alias if present, else `name`.
    pub fn local_name(&self) -> &str {
        self.asname.as_deref().unwrap_or(&self.name)
    }

    /// Returns true for the `*` of `from m import *`.
    pub fn is_star(&self) -> bool {
        self.name == "*"
    }
}

// ============================================================================
// Compound statements
// ============================================================================

/// `for target in iter: body else: orelse` (also `async for`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct For {
    pub target: Box<Expr>,
    pub iter: Box<Expr>,
    #[serde(default)]
    pub body: Vec<Stmt>,
    #[serde(default)]
    pub orelse: Vec<Stmt>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_comment: Option<String>,
    #[serde(flatten)]
    pub range: SourceRange,
}

/// `while test: body else: orelse`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct While {
    pub test: Box<Expr>,
    #[serde(default)]
    pub body: Vec<Stmt>,
    #[serde(default)]
    pub orelse: Vec<Stmt>,
    #[serde(flatten)]
    pub range: SourceRange,
}

/// `if test: body else: orelse`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct If {
    pub test: Box<Expr>,
    #[serde(default)]
    pub body: Vec<Stmt>,
    #[serde(default)]
    pub orelse: Vec<Stmt>,
    #[serde(flatten)]
    pub range: SourceRange,
}

/// `with items: body` (also `async with`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct With {
    pub items: Vec<WithItem>,
    #[serde(default)]
    pub body: Vec<Stmt>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_comment: Option<String>,
    #[serde(flatten)]
    pub range: SourceRange,
}

/// `context_expr as optional_vars`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "_type", rename = "withitem")]
pub struct WithItem {
    pub context_expr: Expr,
    #[serde(default)]
    pub optional_vars: Option<Box<Expr>>,
}

/// `match subject: cases`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Match {
    pub subject: Box<Expr>,
    pub cases: Vec<MatchCase>,
    #[serde(flatten)]
    pub range: SourceRange,
}

/// `case pattern if guard: body`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "_type", rename = "match_case")]
pub struct MatchCase {
    pub pattern: Pattern,
    #[serde(default)]
    pub guard: Option<Box<Expr>>,
    #[serde(default)]
    pub body: Vec<Stmt>,
}

/// `try: body except: handlers else: orelse finally: finalbody` (also `except*`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Try {
    #[serde(default)]
    pub body: Vec<Stmt>,
    #[serde(default)]
    pub handlers: Vec<ExceptHandler>,
    #[serde(default)]
    pub orelse: Vec<Stmt>,
    #[serde(default)]
    pub finalbody: Vec<Stmt>,
    #[serde(flatten)]
    pub range: SourceRange,
}

/// `except type as name: body`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "_type", rename = "ExceptHandler")]
pub struct ExceptHandler {
    #[serde(rename = "type", default)]
    pub type_: Option<Box<Expr>>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub body: Vec<Stmt>,
    #[serde(flatten)]
    pub range: SourceRange,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn import_from_loads_aliases_and_level() {
        let stmt: Stmt = serde_json::from_value(json!({
            "_type": "ImportFrom",
            "module": "utils",
            "names": [
                {"_type": "alias", "name": "helper", "asname": null},
                {"_type": "alias", "name": "other", "asname": "o"}
            ],
            "level": 2
        }))
        .unwrap();

        let Stmt::ImportFrom(node) = stmt else {
            panic!("expected ImportFrom");
        };
        assert_eq!(node.module.as_deref(), Some("utils"));
        assert_eq!(node.level, 2);
        assert_eq!(node.names[0].local_name(), "helper");
        assert_eq!(node.names[1].local_name(), "o");
    }

    #[test]
    fn async_variants_keep_their_tag() {
        let stmt: Stmt = serde_json::from_value(json!({
            "_type": "AsyncFunctionDef",
            "name": "fetch",
            "args": {"_type": "arguments"},
            "body": [{"_type": "Pass"}]
        }))
        .unwrap();
        assert_eq!(stmt.kind(), "AsyncFunctionDef");

        let value = serde_json::to_value(&stmt).unwrap();
        assert_eq!(value["_type"], "AsyncFunctionDef");
        assert_eq!(value["body"][0]["_type"], "Pass");
    }

    #[test]
    fn unknown_statement_becomes_unsupported() {
        let module: Module = serde_json::from_value(json!({
            "_type": "Module",
            "body": [{"_type": "Print", "values": []}]
        }))
        .unwrap();
        assert_eq!(module.body, vec![Stmt::Unsupported]);
    }

    #[test]
    fn star_alias_is_detected() {
        assert!(Alias::new("*", None).is_star());
        assert!(!Alias::new("os", None).is_star());
        assert_eq!(Alias::new("os.path", None).local_name(), "os.path");
    }

    #[test]
    fn except_handler_type_field_is_renamed() {
        let handler: ExceptHandler = serde_json::from_value(json!({
            "_type": "ExceptHandler",
            "type": {"_type": "Name", "id": "ValueError", "ctx": {"_type": "Load"}},
            "name": "err",
            "body": []
        }))
        .unwrap();
        assert_eq!(handler.name.as_deref(), Some("err"));
        assert!(handler.type_.is_some());

        let value = serde_json::to_value(&handler).unwrap();
        assert_eq!(value["type"]["id"], "ValueError");
    }
}
