// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Transformer trait definition for in-place tree traversal.

use thiserror::Error;

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

/// Result of visiting a node - controls traversal behavior.
///
/// When a visitor method returns a `VisitResult`, it controls how the walker
/// proceeds with traversal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum VisitResult {
    /// Continue traversal into children.
    ///
    /// After visiting children, `leave_*` will be called for this node.
    #[default]
    Continue,

    /// Skip children, continue with siblings.
    ///
    /// The walker will not descend into this node's children, but `leave_*`
    /// will still be called for this node.
    SkipChildren,

    /// Stop traversal entirely.
    ///
    /// No further `visit_*` or `leave_*` methods will be called. The walk
    /// function will return immediately.
    Stop,
}

/// Errors raised by the walk itself, independent of any transformer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WalkError {
    /// The tree holds a node kind that has no walk: an `Unsupported` marker
    /// produced when loading a `_type` tag this model does not describe.
    #[error("unsupported {context} node kind cannot be traversed")]
    UnsupportedNode { context: &'static str },
}

/// Result of a walk function for transformer `T`.
pub type WalkResult<T> = Result<VisitResult, <T as Transformer>::Error>;

/// Macro to generate transformer hook pairs.
///
/// Each entry produces a `visit_*` hook, called before children with a
/// default of `Ok(VisitResult::Continue)`, and a `leave_*` hook, called after
/// children with a default of `Ok(())`.
///
/// # Usage
///
/// ```ignore
/// transformer_hooks! {
///     // Generates visit_name and leave_name for Name
///     name: Name,
/// }
/// ```
macro_rules! transformer_hooks {
    (
        $(
            $(#[$meta:meta])*
            $base_name:ident : $node_type:ty
        ),* $(,)?
    ) => {
        paste::paste! {
            $(
                $(#[$meta])*
                #[doc = concat!("Visit a [`", stringify!($node_type), "`] node.")]
                #[doc = ""]
                #[doc = "Called before descending into children. The node may be mutated in place."]
                #[allow(unused_variables)]
                fn [<visit_ $base_name>](&mut self, node: &mut $node_type) -> Result<VisitResult, Self::Error> {
                    Ok(VisitResult::Continue)
                }

                $(#[$meta])*
                #[doc = concat!("Leave a [`", stringify!($node_type), "`] node.")]
                #[doc = ""]
                #[doc = "Called after all children have been visited. Called even if `SkipChildren` was returned."]
                #[allow(unused_variables)]
                fn [<leave_ $base_name>](&mut self, node: &mut $node_type) -> Result<(), Self::Error> {
                    Ok(())
                }
            )*
        }
    };
}

/// In-place transformer for tree traversal.
///
/// Implement this trait to walk a tree with exclusive mutable access. Hooks
/// mutate the node they receive directly; the walk never rebuilds subtrees,
/// so the caller gets back the same tree it passed in.
///
/// Passes that only read the tree implement the same trait and leave the
/// nodes untouched.
///
/// # Traversal Order
///
/// - `visit_*` is called in **pre-order** (before children)
/// - `leave_*` is called in **post-order** (after children)
/// - Children are visited in source order (left-to-right, top-to-bottom)
///
/// # Errors
///
/// Every hook is fallible. The first error aborts the walk and is returned
/// from the outermost `walk_*` call. Walk-level failures ([`WalkError`]) are
/// converted into `Self::Error`.
///
/// # Example
///
/// ```
/// use astobf_ast::nodes::{Expr, ExprStmt, Module, Name, Stmt};
/// use astobf_ast::visitor::{walk_module, Transformer, VisitResult, WalkError};
///
/// struct Upper;
///
/// impl Transformer for Upper {
///     type Error = WalkError;
///
///     fn visit_name(&mut self, node: &mut Name) -> Result<VisitResult, WalkError> {
///         node.id = node.id.to_uppercase();
///         Ok(VisitResult::Continue)
///     }
/// }
///
/// let mut module = Module::new(vec![Stmt::Expr(ExprStmt::new(Expr::Name(Name::load("x"))))]);
/// walk_module(&mut Upper, &mut module).unwrap();
/// ```
pub trait Transformer {
    /// Error type returned by hooks and by the walk.
    type Error: From<WalkError>;

    // Module
    transformer_hooks! {
        module: Module,
    }

    // Statements
    transformer_hooks! {
        stmt: Stmt,
        function_def: FunctionDef,
        class_def: ClassDef,
        import_stmt: Import,
        import_from: ImportFrom,
        alias: Alias,
        global_stmt: Global,
        nonlocal_stmt: Global,
        except_handler: ExceptHandler,
        with_item: WithItem,
        match_case: MatchCase,
    }

    // Expressions
    transformer_hooks! {
        expr: Expr,
        name: Name,
        attribute: Attribute,
        call: Call,
        lambda: Lambda,
        comprehension: Comprehension,
    }

    // Function-related
    transformer_hooks! {
        arguments: Arguments,
        arg: Arg,
        keyword: Keyword,
    }

    // Patterns and type parameters
    transformer_hooks! {
        pattern: Pattern,
        match_as: MatchAs,
        match_star: MatchStar,
        match_mapping: MatchMapping,
        match_class: MatchClass,
        type_param: TypeParam,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn visit_result_defaults_to_continue() {
        assert_eq!(VisitResult::default(), VisitResult::Continue);
    }

    #[test]
    fn walk_error_names_the_context() {
        let err = WalkError::UnsupportedNode {
            context: "expression",
        };
        assert!(err.to_string().contains("unsupported expression node"));
    }
}
