// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Transformer infrastructure for in-place tree traversal.
//!
//! The design follows a hybrid approach: macro-generated trait hook
//! signatures with hand-written walk functions for each node kind.
//!
//! # Traversal Order
//!
//! - **Depth-first, pre-order** for `visit_*` methods
//! - **Post-order** for `leave_*` methods
//! - Children are visited in source order (left-to-right, top-to-bottom)
//!
//! # Transformer Pattern
//!
//! The [`Transformer`] trait hands every hook a `&mut` reference to its node,
//! so rewrites happen in place:
//!
//! ```ignore
//! use astobf_ast::visitor::{Transformer, VisitResult, WalkError};
//!
//! struct Renamer {
//!     old_name: String,
//!     new_name: String,
//! }
//!
//! impl Transformer for Renamer {
//!     type Error = WalkError;
//!
//!     fn visit_name(&mut self, node: &mut Name) -> Result<VisitResult, WalkError> {
//!         if node.id == self.old_name {
//!             node.id = self.new_name.clone();
//!         }
//!         Ok(VisitResult::Continue)
//!     }
//! }
//! ```
//!
//! # Collectors
//!
//! - [`ImportCollector`] - every import binding, in source order

mod dispatch;
mod import;
mod traits;

pub use dispatch::*;
pub use import::{ImportCollector, ImportInfo, ImportKind};
pub use traits::{Transformer, VisitResult, WalkError, WalkResult};
