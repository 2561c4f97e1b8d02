// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Walk functions for in-place tree traversal.
//!
//! This module contains walk functions that traverse nodes and call
//! transformer hooks. The traversal order is:
//!
//! - **Pre-order**: `visit_*` is called before descending into children
//! - **Post-order**: `leave_*` is called after all children have been visited
//! - **Source order**: Children are visited left-to-right, top-to-bottom
//!
//! # Control Flow
//!
//! - `VisitResult::Continue` - traverse into children
//! - `VisitResult::SkipChildren` - skip children but still call `leave_*`
//! - `VisitResult::Stop` - halt traversal immediately (no `leave_*` called)
//! - `Err(_)` - abort the walk and propagate the error
//!
//! Every node kind the model describes has a walk. An `Unsupported` marker is
//! rejected with [`WalkError::UnsupportedNode`] before any hook sees it.

use super::traits::{Transformer, VisitResult, WalkError, WalkResult};
use crate::nodes::{
    // Module
    Module,
    // Statements
    Stmt, FunctionDef, ClassDef, Import, ImportFrom, Alias, Global, ExceptHandler, WithItem,
    MatchCase,
    // Expressions
    Expr, Name, Attribute, Call, Lambda, Arguments, Arg, Keyword, Comprehension,
    // Patterns and type parameters
    Pattern, MatchAs, MatchStar, MatchMapping, MatchClass, TypeParam,
};

/// Propagate `Stop` from a child walk.
macro_rules! walk {
    ($call:expr) => {
        if $call? == VisitResult::Stop {
            return Ok(VisitResult::Stop);
        }
    };
}

/// Walk each item of an iterator of children.
macro_rules! walk_each {
    ($walk_fn:ident, $t:ident, $items:expr) => {
        for item in $items {
            walk!($walk_fn($t, item));
        }
    };
}

/// Walk an optional child.
macro_rules! walk_opt {
    ($walk_fn:ident, $t:ident, $item:expr) => {
        if let Some(item) = $item {
            walk!($walk_fn($t, item));
        }
    };
}

/// Call `visit`, walk the children block unless told otherwise, then `leave`.
macro_rules! walk_node {
    ($t:ident, $node:ident, $visit:ident, $leave:ident, $children:block) => {{
        match $t.$visit($node)? {
            VisitResult::Stop => return Ok(VisitResult::Stop),
            VisitResult::SkipChildren => {}
            VisitResult::Continue => $children,
        }
        $t.$leave($node)?;
        Ok(VisitResult::Continue)
    }};
}

// ============================================================================
// Module walk
// ============================================================================

/// Walk a [`Module`] node and its children.
///
/// Traversal order:
/// 1. `visit_module`
/// 2. Walk each statement in `body` (in source order)
/// 3. `leave_module`
pub fn walk_module<T: Transformer + ?Sized>(t: &mut T, node: &mut Module) -> WalkResult<T> {
    walk_node!(t, node, visit_module, leave_module, {
        walk_each!(walk_stmt, t, node.body.iter_mut());
    })
}

// ============================================================================
// Statement walks
// ============================================================================

/// Walk a [`Stmt`] node.
///
/// Calls `visit_stmt`, then dispatches on the statement kind.
pub fn walk_stmt<T: Transformer + ?Sized>(t: &mut T, node: &mut Stmt) -> WalkResult<T> {
    if matches!(node, Stmt::Unsupported) {
        return Err(WalkError::UnsupportedNode { context: "statement" }.into());
    }
    walk_node!(t, node, visit_stmt, leave_stmt, {
        match node {
            Stmt::FunctionDef(f) | Stmt::AsyncFunctionDef(f) => walk!(walk_function_def(t, f)),
            Stmt::ClassDef(c) => walk!(walk_class_def(t, c)),
            Stmt::Return(r) => walk_opt!(walk_expr, t, r.value.as_deref_mut()),
            Stmt::Delete(d) => walk_each!(walk_expr, t, d.targets.iter_mut()),
            Stmt::Assign(a) => {
                walk_each!(walk_expr, t, a.targets.iter_mut());
                walk!(walk_expr(t, &mut a.value));
            }
            Stmt::TypeAlias(a) => {
                walk!(walk_expr(t, &mut a.name));
                walk_each!(walk_type_param, t, a.type_params.iter_mut());
                walk!(walk_expr(t, &mut a.value));
            }
            Stmt::AugAssign(a) => {
                walk!(walk_expr(t, &mut a.target));
                walk!(walk_expr(t, &mut a.value));
            }
            Stmt::AnnAssign(a) => {
                walk!(walk_expr(t, &mut a.target));
                walk!(walk_expr(t, &mut a.annotation));
                walk_opt!(walk_expr, t, a.value.as_deref_mut());
            }
            Stmt::For(f) | Stmt::AsyncFor(f) => {
                walk!(walk_expr(t, &mut f.target));
                walk!(walk_expr(t, &mut f.iter));
                walk_each!(walk_stmt, t, f.body.iter_mut());
                walk_each!(walk_stmt, t, f.orelse.iter_mut());
            }
            Stmt::While(w) => {
                walk!(walk_expr(t, &mut w.test));
                walk_each!(walk_stmt, t, w.body.iter_mut());
                walk_each!(walk_stmt, t, w.orelse.iter_mut());
            }
            Stmt::If(i) => {
                walk!(walk_expr(t, &mut i.test));
                walk_each!(walk_stmt, t, i.body.iter_mut());
                walk_each!(walk_stmt, t, i.orelse.iter_mut());
            }
            Stmt::With(w) | Stmt::AsyncWith(w) => {
                walk_each!(walk_with_item, t, w.items.iter_mut());
                walk_each!(walk_stmt, t, w.body.iter_mut());
            }
            Stmt::Match(m) => {
                walk!(walk_expr(t, &mut m.subject));
                walk_each!(walk_match_case, t, m.cases.iter_mut());
            }
            Stmt::Raise(r) => {
                walk_opt!(walk_expr, t, r.exc.as_deref_mut());
                walk_opt!(walk_expr, t, r.cause.as_deref_mut());
            }
            Stmt::Try(tr) | Stmt::TryStar(tr) => {
                walk_each!(walk_stmt, t, tr.body.iter_mut());
                walk_each!(walk_except_handler, t, tr.handlers.iter_mut());
                walk_each!(walk_stmt, t, tr.orelse.iter_mut());
                walk_each!(walk_stmt, t, tr.finalbody.iter_mut());
            }
            Stmt::Assert(a) => {
                walk!(walk_expr(t, &mut a.test));
                walk_opt!(walk_expr, t, a.msg.as_deref_mut());
            }
            Stmt::Import(i) => walk!(walk_import_stmt(t, i)),
            Stmt::ImportFrom(i) => walk!(walk_import_from(t, i)),
            Stmt::Global(g) => walk!(walk_global_stmt(t, g)),
            Stmt::Nonlocal(g) => walk!(walk_nonlocal_stmt(t, g)),
            Stmt::Expr(e) => walk!(walk_expr(t, &mut e.value)),
            Stmt::Pass(_) | Stmt::Break(_) | Stmt::Continue(_) => {}
            Stmt::Unsupported => {
                return Err(WalkError::UnsupportedNode { context: "statement" }.into())
            }
        }
    })
}

/// Walk a [`FunctionDef`] node.
///
/// Traversal order:
/// 1. `visit_function_def`
/// 2. Walk decorators
/// 3. Walk type parameters
/// 4. Walk arguments
/// 5. Walk return annotation (if present)
/// 6. Walk body
/// 7. `leave_function_def`
pub fn walk_function_def<T: Transformer + ?Sized>(
    t: &mut T,
    node: &mut FunctionDef,
) -> WalkResult<T> {
    walk_node!(t, node, visit_function_def, leave_function_def, {
        walk_each!(walk_expr, t, node.decorator_list.iter_mut());
        walk_each!(walk_type_param, t, node.type_params.iter_mut());
        walk!(walk_arguments(t, &mut node.args));
        walk_opt!(walk_expr, t, node.returns.as_deref_mut());
        walk_each!(walk_stmt, t, node.body.iter_mut());
    })
}

/// Walk a [`ClassDef`] node.
///
/// Traversal order:
/// 1. `visit_class_def`
/// 2. Walk decorators
/// 3. Walk type parameters
/// 4. Walk bases, then keywords
/// 5. Walk body
/// 6. `leave_class_def`
pub fn walk_class_def<T: Transformer + ?Sized>(t: &mut T, node: &mut ClassDef) -> WalkResult<T> {
    walk_node!(t, node, visit_class_def, leave_class_def, {
        walk_each!(walk_expr, t, node.decorator_list.iter_mut());
        walk_each!(walk_type_param, t, node.type_params.iter_mut());
        walk_each!(walk_expr, t, node.bases.iter_mut());
        walk_each!(walk_keyword, t, node.keywords.iter_mut());
        walk_each!(walk_stmt, t, node.body.iter_mut());
    })
}

/// Walk an [`Import`] node and each of its aliases.
pub fn walk_import_stmt<T: Transformer + ?Sized>(t: &mut T, node: &mut Import) -> WalkResult<T> {
    walk_node!(t, node, visit_import_stmt, leave_import_stmt, {
        walk_each!(walk_alias, t, node.names.iter_mut());
    })
}

/// Walk an [`ImportFrom`] node and each of its aliases.
pub fn walk_import_from<T: Transformer + ?Sized>(
    t: &mut T,
    node: &mut ImportFrom,
) -> WalkResult<T> {
    walk_node!(t, node, visit_import_from, leave_import_from, {
        walk_each!(walk_alias, t, node.names.iter_mut());
    })
}

/// Walk an [`Alias`] node (leaf).
pub fn walk_alias<T: Transformer + ?Sized>(t: &mut T, node: &mut Alias) -> WalkResult<T> {
    walk_node!(t, node, visit_alias, leave_alias, {})
}

/// Walk a `global` statement (leaf).
pub fn walk_global_stmt<T: Transformer + ?Sized>(t: &mut T, node: &mut Global) -> WalkResult<T> {
    walk_node!(t, node, visit_global_stmt, leave_global_stmt, {})
}

/// Walk a `nonlocal` statement (leaf).
pub fn walk_nonlocal_stmt<T: Transformer + ?Sized>(
    t: &mut T,
    node: &mut Global,
) -> WalkResult<T> {
    walk_node!(t, node, visit_nonlocal_stmt, leave_nonlocal_stmt, {})
}

/// Walk an [`ExceptHandler`] node: the exception type, then the body.
pub fn walk_except_handler<T: Transformer + ?Sized>(
    t: &mut T,
    node: &mut ExceptHandler,
) -> WalkResult<T> {
    walk_node!(t, node, visit_except_handler, leave_except_handler, {
        walk_opt!(walk_expr, t, node.type_.as_deref_mut());
        walk_each!(walk_stmt, t, node.body.iter_mut());
    })
}

/// Walk a [`WithItem`] node: the context expression, then the target.
pub fn walk_with_item<T: Transformer + ?Sized>(t: &mut T, node: &mut WithItem) -> WalkResult<T> {
    walk_node!(t, node, visit_with_item, leave_with_item, {
        walk!(walk_expr(t, &mut node.context_expr));
        walk_opt!(walk_expr, t, node.optional_vars.as_deref_mut());
    })
}

/// Walk a [`MatchCase`] node: pattern, guard, body.
pub fn walk_match_case<T: Transformer + ?Sized>(
    t: &mut T,
    node: &mut MatchCase,
) -> WalkResult<T> {
    walk_node!(t, node, visit_match_case, leave_match_case, {
        walk!(walk_pattern(t, &mut node.pattern));
        walk_opt!(walk_expr, t, node.guard.as_deref_mut());
        walk_each!(walk_stmt, t, node.body.iter_mut());
    })
}

// ============================================================================
// Expression walks
// ============================================================================

/// Walk an [`Expr`] node.
///
/// Calls `visit_expr`, then dispatches on the expression kind.
pub fn walk_expr<T: Transformer + ?Sized>(t: &mut T, node: &mut Expr) -> WalkResult<T> {
    if matches!(node, Expr::Unsupported) {
        return Err(WalkError::UnsupportedNode { context: "expression" }.into());
    }
    walk_node!(t, node, visit_expr, leave_expr, {
        match node {
            Expr::BoolOp(b) => walk_each!(walk_expr, t, b.values.iter_mut()),
            Expr::NamedExpr(n) => {
                walk!(walk_expr(t, &mut n.target));
                walk!(walk_expr(t, &mut n.value));
            }
            Expr::BinOp(b) => {
                walk!(walk_expr(t, &mut b.left));
                walk!(walk_expr(t, &mut b.right));
            }
            Expr::UnaryOp(u) => walk!(walk_expr(t, &mut u.operand)),
            Expr::Lambda(l) => walk!(walk_lambda(t, l)),
            Expr::IfExp(i) => {
                walk!(walk_expr(t, &mut i.body));
                walk!(walk_expr(t, &mut i.test));
                walk!(walk_expr(t, &mut i.orelse));
            }
            Expr::Dict(d) => {
                for (key, value) in d.keys.iter_mut().zip(d.values.iter_mut()) {
                    walk_opt!(walk_expr, t, key.as_mut());
                    walk!(walk_expr(t, value));
                }
            }
            Expr::Set(s) => walk_each!(walk_expr, t, s.elts.iter_mut()),
            Expr::ListComp(c) => {
                walk!(walk_expr(t, &mut c.elt));
                walk_each!(walk_comprehension, t, c.generators.iter_mut());
            }
            Expr::SetComp(c) => {
                walk!(walk_expr(t, &mut c.elt));
                walk_each!(walk_comprehension, t, c.generators.iter_mut());
            }
            Expr::GeneratorExp(c) => {
                walk!(walk_expr(t, &mut c.elt));
                walk_each!(walk_comprehension, t, c.generators.iter_mut());
            }
            Expr::DictComp(c) => {
                walk!(walk_expr(t, &mut c.key));
                walk!(walk_expr(t, &mut c.value));
                walk_each!(walk_comprehension, t, c.generators.iter_mut());
            }
            Expr::Await(a) => walk!(walk_expr(t, &mut a.value)),
            Expr::Yield(y) => walk_opt!(walk_expr, t, y.value.as_deref_mut()),
            Expr::YieldFrom(y) => walk!(walk_expr(t, &mut y.value)),
            Expr::Compare(c) => {
                walk!(walk_expr(t, &mut c.left));
                walk_each!(walk_expr, t, c.comparators.iter_mut());
            }
            Expr::Call(c) => walk!(walk_call(t, c)),
            Expr::FormattedValue(f) => {
                walk!(walk_expr(t, &mut f.value));
                walk_opt!(walk_expr, t, f.format_spec.as_deref_mut());
            }
            Expr::JoinedStr(j) => walk_each!(walk_expr, t, j.values.iter_mut()),
            Expr::Constant(_) => {}
            Expr::Attribute(a) => walk!(walk_attribute(t, a)),
            Expr::Subscript(s) => {
                walk!(walk_expr(t, &mut s.value));
                walk!(walk_expr(t, &mut s.slice));
            }
            Expr::Starred(s) => walk!(walk_expr(t, &mut s.value)),
            Expr::Name(n) => walk!(walk_name(t, n)),
            Expr::List(l) => walk_each!(walk_expr, t, l.elts.iter_mut()),
            Expr::Tuple(tu) => walk_each!(walk_expr, t, tu.elts.iter_mut()),
            Expr::Slice(s) => {
                walk_opt!(walk_expr, t, s.lower.as_deref_mut());
                walk_opt!(walk_expr, t, s.upper.as_deref_mut());
                walk_opt!(walk_expr, t, s.step.as_deref_mut());
            }
            Expr::Unsupported => {
                return Err(WalkError::UnsupportedNode { context: "expression" }.into())
            }
        }
    })
}

/// Walk a [`Name`] node (leaf).
pub fn walk_name<T: Transformer + ?Sized>(t: &mut T, node: &mut Name) -> WalkResult<T> {
    walk_node!(t, node, visit_name, leave_name, {})
}

/// Walk an [`Attribute`] node.
///
/// Only `value` is an expression child; `attr` is a plain string and is left
/// to the `visit_attribute`/`leave_attribute` hooks.
pub fn walk_attribute<T: Transformer + ?Sized>(
    t: &mut T,
    node: &mut Attribute,
) -> WalkResult<T> {
    walk_node!(t, node, visit_attribute, leave_attribute, {
        walk!(walk_expr(t, &mut node.value));
    })
}

/// Walk a [`Call`] node: callee, positional arguments, keyword arguments.
pub fn walk_call<T: Transformer + ?Sized>(t: &mut T, node: &mut Call) -> WalkResult<T> {
    walk_node!(t, node, visit_call, leave_call, {
        walk!(walk_expr(t, &mut node.func));
        walk_each!(walk_expr, t, node.args.iter_mut());
        walk_each!(walk_keyword, t, node.keywords.iter_mut());
    })
}

/// Walk a [`Lambda`] node: parameters, then body.
pub fn walk_lambda<T: Transformer + ?Sized>(t: &mut T, node: &mut Lambda) -> WalkResult<T> {
    walk_node!(t, node, visit_lambda, leave_lambda, {
        walk!(walk_arguments(t, &mut node.args));
        walk!(walk_expr(t, &mut node.body));
    })
}

/// Walk a [`Comprehension`] clause: target, iterable, conditions.
pub fn walk_comprehension<T: Transformer + ?Sized>(
    t: &mut T,
    node: &mut Comprehension,
) -> WalkResult<T> {
    walk_node!(t, node, visit_comprehension, leave_comprehension, {
        walk!(walk_expr(t, &mut node.target));
        walk!(walk_expr(t, &mut node.iter));
        walk_each!(walk_expr, t, node.ifs.iter_mut());
    })
}

// ============================================================================
// Function-related walks
// ============================================================================

/// Walk an [`Arguments`] node.
///
/// Traversal order:
/// 1. `visit_arguments`
/// 2. Positional-only and regular parameters, then their defaults
/// 3. `*vararg`
/// 4. Keyword-only parameters, each followed by its default
/// 5. `**kwarg`
/// 6. `leave_arguments`
pub fn walk_arguments<T: Transformer + ?Sized>(
    t: &mut T,
    node: &mut Arguments,
) -> WalkResult<T> {
    walk_node!(t, node, visit_arguments, leave_arguments, {
        walk_each!(walk_arg, t, node.posonlyargs.iter_mut());
        walk_each!(walk_arg, t, node.args.iter_mut());
        walk_each!(walk_expr, t, node.defaults.iter_mut());
        walk_opt!(walk_arg, t, node.vararg.as_mut());
        for (index, arg) in node.kwonlyargs.iter_mut().enumerate() {
            walk!(walk_arg(t, arg));
            walk_opt!(walk_expr, t, node.kw_defaults.get_mut(index).and_then(Option::as_mut));
        }
        walk_opt!(walk_arg, t, node.kwarg.as_mut());
    })
}

/// Walk an [`Arg`] node: its annotation, if any.
pub fn walk_arg<T: Transformer + ?Sized>(t: &mut T, node: &mut Arg) -> WalkResult<T> {
    walk_node!(t, node, visit_arg, leave_arg, {
        walk_opt!(walk_expr, t, node.annotation.as_deref_mut());
    })
}

/// Walk a [`Keyword`] node: its value.
pub fn walk_keyword<T: Transformer + ?Sized>(t: &mut T, node: &mut Keyword) -> WalkResult<T> {
    walk_node!(t, node, visit_keyword, leave_keyword, {
        walk!(walk_expr(t, &mut node.value));
    })
}

// ============================================================================
// Pattern walks
// ============================================================================

/// Walk a [`Pattern`] node.
///
/// Calls `visit_pattern`, then dispatches on the pattern kind. Capture-bearing
/// kinds get their own hooks.
pub fn walk_pattern<T: Transformer + ?Sized>(t: &mut T, node: &mut Pattern) -> WalkResult<T> {
    if matches!(node, Pattern::Unsupported) {
        return Err(WalkError::UnsupportedNode { context: "pattern" }.into());
    }
    walk_node!(t, node, visit_pattern, leave_pattern, {
        match node {
            Pattern::MatchValue(v) => walk!(walk_expr(t, &mut v.value)),
            Pattern::MatchSingleton(_) => {}
            Pattern::MatchSequence(s) => walk_each!(walk_pattern, t, s.patterns.iter_mut()),
            Pattern::MatchMapping(m) => walk!(walk_match_mapping(t, m)),
            Pattern::MatchClass(c) => walk!(walk_match_class(t, c)),
            Pattern::MatchStar(s) => walk!(walk_match_star(t, s)),
            Pattern::MatchAs(a) => walk!(walk_match_as(t, a)),
            Pattern::MatchOr(o) => walk_each!(walk_pattern, t, o.patterns.iter_mut()),
            Pattern::Unsupported => {
                return Err(WalkError::UnsupportedNode { context: "pattern" }.into())
            }
        }
    })
}

/// Walk a [`MatchAs`] node: its sub-pattern, if any.
pub fn walk_match_as<T: Transformer + ?Sized>(t: &mut T, node: &mut MatchAs) -> WalkResult<T> {
    walk_node!(t, node, visit_match_as, leave_match_as, {
        walk_opt!(walk_pattern, t, node.pattern.as_deref_mut());
    })
}

/// Walk a [`MatchStar`] node (leaf).
pub fn walk_match_star<T: Transformer + ?Sized>(
    t: &mut T,
    node: &mut MatchStar,
) -> WalkResult<T> {
    walk_node!(t, node, visit_match_star, leave_match_star, {})
}

/// Walk a [`MatchMapping`] node: each key followed by its pattern.
pub fn walk_match_mapping<T: Transformer + ?Sized>(
    t: &mut T,
    node: &mut MatchMapping,
) -> WalkResult<T> {
    walk_node!(t, node, visit_match_mapping, leave_match_mapping, {
        for (key, pattern) in node.keys.iter_mut().zip(node.patterns.iter_mut()) {
            walk!(walk_expr(t, key));
            walk!(walk_pattern(t, pattern));
        }
    })
}

/// Walk a [`MatchClass`] node: class expression, positional patterns,
/// keyword patterns.
pub fn walk_match_class<T: Transformer + ?Sized>(
    t: &mut T,
    node: &mut MatchClass,
) -> WalkResult<T> {
    walk_node!(t, node, visit_match_class, leave_match_class, {
        walk!(walk_expr(t, &mut node.cls));
        walk_each!(walk_pattern, t, node.patterns.iter_mut());
        walk_each!(walk_pattern, t, node.kwd_patterns.iter_mut());
    })
}

// ============================================================================
// Type parameter walks
// ============================================================================

/// Walk a [`TypeParam`] node: bound and default, if any.
pub fn walk_type_param<T: Transformer + ?Sized>(
    t: &mut T,
    node: &mut TypeParam,
) -> WalkResult<T> {
    if matches!(node, TypeParam::Unsupported) {
        return Err(WalkError::UnsupportedNode {
            context: "type parameter",
        }
        .into());
    }
    walk_node!(t, node, visit_type_param, leave_type_param, {
        match node {
            TypeParam::TypeVar(v) => {
                walk_opt!(walk_expr, t, v.bound.as_deref_mut());
                walk_opt!(walk_expr, t, v.default_value.as_deref_mut());
            }
            TypeParam::ParamSpec(p) | TypeParam::TypeVarTuple(p) => {
                walk_opt!(walk_expr, t, p.default_value.as_deref_mut());
            }
            TypeParam::Unsupported => {
                return Err(WalkError::UnsupportedNode {
                    context: "type parameter",
                }
                .into())
            }
        }
    })
}
