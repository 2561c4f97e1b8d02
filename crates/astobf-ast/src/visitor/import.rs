// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! ImportCollector pass for import binding extraction.
//!
//! [`ImportCollector`] walks a module and records one [`ImportInfo`] per
//! imported entry, in source order, including imports nested in functions,
//! classes and conditional blocks.
//!
//! # What is Collected?
//!
//! - **import statements**: `import os`, `import os.path`, `import numpy as np`
//! - **from imports**: `from os import path`, `from os import path as p`
//! - **star imports**: `from os import *`
//! - **relative imports**: `from . import foo`, `from ..utils import bar`
//!
//! # Usage
//!
//! ```
//! use astobf_ast::load_module;
//! use astobf_ast::visitor::ImportCollector;
//!
//! let mut module = load_module(r#"{"_type": "Module", "body": [
//!     {"_type": "Import", "names": [{"_type": "alias", "name": "os.path", "asname": null}]}
//! ]}"#).unwrap();
//!
//! let imports = ImportCollector::collect(&mut module).unwrap();
//! assert_eq!(imports[0].module, "os.path");
//! assert_eq!(imports[0].bound_name(), Some("os"));
//! ```

use super::dispatch::walk_module;
use super::traits::{Transformer, VisitResult, WalkError};
use crate::nodes::{Import, ImportFrom, Module, SourceRange};

/// The kind of import statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImportKind {
    /// Regular import (`import os`).
    Import,
    /// From import (`from os import path`).
    From,
}

impl ImportKind {
    /// Returns the string representation used in output.
    pub fn as_str(&self) -> &'static str {
        match self {
            ImportKind::Import => "import",
            ImportKind::From => "from",
        }
    }
}

impl std::fmt::Display for ImportKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One imported entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportInfo {
    /// The kind of import.
    pub kind: ImportKind,
    /// Dotted module path. Empty for `from . import x`.
    pub module: String,
    /// The name taken from the module (`from` imports only).
    pub name: Option<String>,
    /// The `as` alias, if any.
    pub alias: Option<String>,
    /// Whether this is a star import (`from x import *`).
    pub is_star: bool,
    /// Number of leading dots for relative imports.
    pub relative_level: u32,
    /// Position of the alias entry.
    pub range: SourceRange,
}

impl ImportInfo {
    /// The local name this entry binds, or `None` for a star import.
    ///
    /// `import a.b.c` binds `a`; `import a.b as c` and `from m import x as c`
    /// bind `c`; `from m import x` binds `x`.
    pub fn bound_name(&self) -> Option<&str> {
        if self.is_star {
            return None;
        }
        if let Some(alias) = &self.alias {
            return Some(alias);
        }
        match self.kind {
            ImportKind::Import => self.module.split('.').next(),
            ImportKind::From => self.name.as_deref(),
        }
    }

    /// Returns true for `import a.b` without an alias.
    pub fn is_dotted_plain_import(&self) -> bool {
        self.kind == ImportKind::Import && self.alias.is_none() && self.module.contains('.')
    }
}

/// A read-only pass that collects import information from a module.
#[derive(Debug, Default)]
pub struct ImportCollector {
    imports: Vec<ImportInfo>,
}

impl ImportCollector {
    /// Create a new ImportCollector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect imports from a module, in the order they are encountered.
    ///
    /// The module is not modified. It fails only if the walk meets a node
    /// kind it cannot traverse.
    pub fn collect(module: &mut Module) -> Result<Vec<ImportInfo>, WalkError> {
        let mut collector = ImportCollector::new();
        walk_module(&mut collector, module)?;
        Ok(collector.imports)
    }
}

impl Transformer for ImportCollector {
    type Error = WalkError;

    fn visit_import_stmt(&mut self, node: &mut Import) -> Result<VisitResult, WalkError> {
        for alias in &node.names {
            self.imports.push(ImportInfo {
                kind: ImportKind::Import,
                module: alias.name.clone(),
                name: None,
                alias: alias.asname.clone(),
                is_star: false,
                relative_level: 0,
                range: alias.range,
            });
        }
        Ok(VisitResult::SkipChildren)
    }

    fn visit_import_from(&mut self, node: &mut ImportFrom) -> Result<VisitResult, WalkError> {
        let module = node.module.clone().unwrap_or_default();
        for alias in &node.names {
            self.imports.push(ImportInfo {
                kind: ImportKind::From,
                module: module.clone(),
                name: (!alias.is_star()).then(|| alias.name.clone()),
                alias: alias.asname.clone(),
                is_star: alias.is_star(),
                relative_level: node.level,
                range: alias.range,
            });
        }
        Ok(VisitResult::SkipChildren)
    }
}
