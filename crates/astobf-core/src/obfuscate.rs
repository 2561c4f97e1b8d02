//! The tree rewriter: renames identifiers in place through a [`NameAuthority`].
//!
//! [`NameObfuscator`] walks a [`Module`] depth-first and rewrites:
//!
//! - **import bindings**: `import X` / `from M import X` gain an alias
//!   `as <obfuscated X>`; an existing alias is itself obfuscated. The module
//!   path and the imported name are never touched.
//! - **name references**: every [`Name`] whose text is not reserved.
//! - **definition sites** (`rename_definitions`, on by default): function
//!   and class names, parameters, `except ... as` targets, `global` and
//!   `nonlocal` names, match captures and type parameters.
//! - **member names** (`rename_members`, off by default): the `attr` of
//!   `obj.attr`, unless `obj` is a name bound by an import.
//!
//! Before the walk, names that must keep their identity are pinned in the
//! authority: the root package of `import a.b.c` always, and with
//! `pin_shared_names` (on by default) class-body member names while members
//! are not renamed and keyword-argument names at call sites while
//! definitions are renamed. Each shared name kept this way is logged at
//! `warn`.
//!
//! Any node kind the walk cannot traverse aborts the run.

use std::collections::HashSet;

use astobf_ast::nodes::{
    Alias, Arg, Attribute, ClassDef, ExceptHandler, Expr, FunctionDef, Global, ImportFrom,
    Keyword, MatchAs, MatchClass, MatchMapping, MatchStar, Module, Name, Stmt, TypeParam,
};
use astobf_ast::visitor::{walk_module, ImportCollector, Transformer, VisitResult, WalkError};
use indexmap::IndexSet;
use rand::rngs::StdRng;
use rand::Rng;
use serde::Serialize;
use tracing::{debug, info, info_span, warn};

use crate::config::ObfuscateOptions;
use crate::error::ObfuscateError;
use crate::names::{NameAuthority, NameMap};

// ============================================================================
// Report
// ============================================================================

/// Counters collected during a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ObfuscationStats {
    /// `Name` occurrences rewritten.
    pub names_renamed: usize,
    /// Import aliases written.
    pub bindings_renamed: usize,
    /// Definition-site identifiers rewritten.
    pub definitions_renamed: usize,
    /// Member names rewritten.
    pub members_renamed: usize,
    /// Names pinned to their own identity before the walk.
    pub pinned: usize,
    /// `from m import *` entries left untouched.
    pub skipped_star_imports: usize,
    /// Generated candidates thrown away because they were taken.
    pub rejected_candidates: u64,
}

/// Result of a completed run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ObfuscationReport {
    /// Every mapping made during the run, in first-seen order.
    pub name_map: NameMap,
    pub stats: ObfuscationStats,
}

// ============================================================================
// Identity pins
// ============================================================================

/// Collects class member and keyword-argument names that must resolve to
/// themselves.
#[derive(Debug, Default)]
struct PinCollector {
    pin_members: bool,
    pin_keywords: bool,
    names: IndexSet<String>,
}

impl Transformer for PinCollector {
    type Error = WalkError;

    fn visit_class_def(&mut self, node: &mut ClassDef) -> Result<VisitResult, WalkError> {
        if self.pin_members {
            for stmt in &node.body {
                collect_member_names(stmt, &mut self.names);
            }
        }
        Ok(VisitResult::Continue)
    }

    fn visit_keyword(&mut self, node: &mut Keyword) -> Result<VisitResult, WalkError> {
        if self.pin_keywords {
            if let Some(arg) = &node.arg {
                self.names.insert(arg.clone());
            }
        }
        Ok(VisitResult::Continue)
    }
}

/// Names a class-body statement binds as class attributes.
fn collect_member_names(stmt: &Stmt, out: &mut IndexSet<String>) {
    match stmt {
        Stmt::FunctionDef(f) | Stmt::AsyncFunctionDef(f) => {
            out.insert(f.name.clone());
        }
        Stmt::ClassDef(c) => {
            out.insert(c.name.clone());
        }
        Stmt::Assign(a) => {
            for target in &a.targets {
                collect_target_names(target, out);
            }
        }
        Stmt::AnnAssign(a) => collect_target_names(&a.target, out),
        Stmt::AugAssign(a) => collect_target_names(&a.target, out),
        _ => {}
    }
}

fn collect_target_names(target: &Expr, out: &mut IndexSet<String>) {
    match target {
        Expr::Name(name) => {
            out.insert(name.id.clone());
        }
        Expr::Tuple(t) => t.elts.iter().for_each(|e| collect_target_names(e, out)),
        Expr::List(l) => l.elts.iter().for_each(|e| collect_target_names(e, out)),
        Expr::Starred(s) => collect_target_names(&s.value, out),
        _ => {}
    }
}

// ============================================================================
// NameObfuscator
// ============================================================================

/// Renames identifiers of one or more modules through a single authority.
#[derive(Debug)]
pub struct NameObfuscator<R = StdRng> {
    names: NameAuthority<R>,
    options: ObfuscateOptions,
    /// Local names bound by imports, after renaming.
    imported_names: HashSet<String>,
    stats: ObfuscationStats,
}

impl NameObfuscator<StdRng> {
    /// Create a rewriter for `options`, seeded from `options.seed` when set.
    pub fn new(options: &ObfuscateOptions) -> Result<Self, ObfuscateError> {
        options.validate()?;
        let names = match options.seed {
            Some(seed) => NameAuthority::with_seed(options.style.clone(), seed)?,
            None => NameAuthority::new(options.style.clone())?,
        };
        Ok(Self::with_authority(names, options.clone()))
    }
}

impl<R: Rng> NameObfuscator<R> {
    /// Create a rewriter around an existing authority.
    ///
    /// The preserved names of `options` are added to the authority's
    /// reserved set, so they are neither renamed nor generated.
    pub fn with_authority(mut names: NameAuthority<R>, options: ObfuscateOptions) -> Self {
        names.reserve(options.preserve.iter().cloned());
        Self {
            names,
            options,
            imported_names: HashSet::new(),
            stats: ObfuscationStats::default(),
        }
    }

    /// Rewrite `module` in place.
    ///
    /// On error the module may be partially rewritten; use
    /// [`obfuscate_module`] for all-or-nothing behavior.
    pub fn rewrite(&mut self, module: &mut Module) -> Result<(), ObfuscateError> {
        let span = info_span!("rewrite", statements = module.body.len());
        let _enter = span.enter();

        self.pin_identities(module)?;
        walk_module(self, module)?;
        self.stats.rejected_candidates = self.names.rejected_candidates();

        info!(
            mapped = self.names.snapshot().len(),
            names_renamed = self.stats.names_renamed,
            bindings_renamed = self.stats.bindings_renamed,
            definitions_renamed = self.stats.definitions_renamed,
            members_renamed = self.stats.members_renamed,
            "module rewritten"
        );
        Ok(())
    }

    /// The mapping made so far.
    pub fn get_name_map(&self) -> &NameMap {
        self.names.snapshot()
    }

    /// Counters collected so far.
    pub fn stats(&self) -> &ObfuscationStats {
        &self.stats
    }

    /// Consume the rewriter and return its mapping and counters.
    pub fn into_report(self) -> ObfuscationReport {
        ObfuscationReport {
            name_map: self.names.into_snapshot(),
            stats: self.stats,
        }
    }

    fn pin_identities(&mut self, module: &mut Module) -> Result<(), ObfuscateError> {
        let roots: Vec<String> = ImportCollector::collect(module)?
            .iter()
            .filter(|import| import.is_dotted_plain_import())
            .filter_map(|import| import.bound_name().map(str::to_string))
            .collect();
        for root in roots {
            if self.pin(&root)? {
                debug!(name = %root, "dotted import root kept");
            }
        }

        if !self.options.pin_shared_names {
            return Ok(());
        }
        let mut collector = PinCollector {
            pin_members: !self.options.rename_members,
            pin_keywords: self.options.rename_definitions,
            names: IndexSet::new(),
        };
        walk_module(&mut collector, module)?;
        for name in collector.names {
            if self.pin(&name)? {
                warn!(name = %name, "kept unrenamed: also used as a member or keyword argument");
            }
        }
        Ok(())
    }

    /// Pin `name` to itself. Returns false when it is reserved or already
    /// mapped.
    fn pin(&mut self, name: &str) -> Result<bool, ObfuscateError> {
        // A name mapped by an earlier module keeps that mapping.
        if self.names.reserved().contains(name) || self.names.snapshot().contains(name) {
            return Ok(false);
        }
        self.names.pin(name)?;
        self.stats.pinned += 1;
        Ok(true)
    }

    /// Resolve `original` unless it is reserved. Returns the new name only
    /// when it differs from the original.
    fn rename(&mut self, original: &str) -> Result<Option<String>, ObfuscateError> {
        if self.names.reserved().contains(original) {
            return Ok(None);
        }
        let obfuscated = self.names.resolve(original)?;
        if obfuscated == original {
            Ok(None)
        } else {
            Ok(Some(obfuscated))
        }
    }

    fn rename_definition(&mut self, name: &mut String) -> Result<(), ObfuscateError> {
        if !self.options.rename_definitions {
            return Ok(());
        }
        if let Some(obfuscated) = self.rename(name)? {
            *name = obfuscated;
            self.stats.definitions_renamed += 1;
        }
        Ok(())
    }

    fn rename_optional_definition(&mut self, name: &mut Option<String>) -> Result<(), ObfuscateError> {
        match name {
            Some(name) => self.rename_definition(name),
            None => Ok(()),
        }
    }
}

impl<R: Rng> Transformer for NameObfuscator<R> {
    type Error = ObfuscateError;

    // ------------------------------------------------------------------------
    // Imports
    // ------------------------------------------------------------------------

    fn visit_import_from(&mut self, node: &mut ImportFrom) -> Result<VisitResult, ObfuscateError> {
        if node.module.as_deref() == Some("__future__") {
            return Ok(VisitResult::SkipChildren);
        }
        Ok(VisitResult::Continue)
    }

    fn visit_alias(&mut self, node: &mut Alias) -> Result<VisitResult, ObfuscateError> {
        if node.is_star() {
            warn!(range = %node.range, "star import left untouched");
            self.stats.skipped_star_imports += 1;
            return Ok(VisitResult::Continue);
        }

        if node.asname.is_none() {
            // `import a.b.c` binds `a`, which was pinned before the walk.
            if let Some((root, _)) = node.name.split_once('.') {
                self.imported_names.insert(root.to_string());
                return Ok(VisitResult::Continue);
            }
        }

        let local = node.local_name().to_string();
        match self.rename(&local)? {
            Some(obfuscated) => {
                debug!(name = %node.name, local = %local, alias = %obfuscated, "import binding renamed");
                self.imported_names.insert(obfuscated.clone());
                node.asname = Some(obfuscated);
                self.stats.bindings_renamed += 1;
            }
            None => {
                self.imported_names.insert(local);
            }
        }
        Ok(VisitResult::Continue)
    }

    // ------------------------------------------------------------------------
    // References and members
    // ------------------------------------------------------------------------

    fn visit_name(&mut self, node: &mut Name) -> Result<VisitResult, ObfuscateError> {
        if let Some(obfuscated) = self.rename(&node.id)? {
            node.id = obfuscated;
            self.stats.names_renamed += 1;
        }
        Ok(VisitResult::Continue)
    }

    fn leave_attribute(&mut self, node: &mut Attribute) -> Result<(), ObfuscateError> {
        if !self.options.rename_members {
            return Ok(());
        }
        // `value` was already rewritten, so compare against renamed bindings.
        if let Expr::Name(value) = node.value.as_ref() {
            if self.imported_names.contains(&value.id) {
                return Ok(());
            }
        }
        if let Some(obfuscated) = self.rename(&node.attr)? {
            node.attr = obfuscated;
            self.stats.members_renamed += 1;
        }
        Ok(())
    }

    fn visit_match_class(&mut self, node: &mut MatchClass) -> Result<VisitResult, ObfuscateError> {
        if self.options.rename_members {
            for attr in node.kwd_attrs.iter_mut() {
                if let Some(obfuscated) = self.rename(attr)? {
                    *attr = obfuscated;
                    self.stats.members_renamed += 1;
                }
            }
        }
        Ok(VisitResult::Continue)
    }

    // ------------------------------------------------------------------------
    // Definition sites
    // ------------------------------------------------------------------------

    fn visit_function_def(&mut self, node: &mut FunctionDef) -> Result<VisitResult, ObfuscateError> {
        self.rename_definition(&mut node.name)?;
        Ok(VisitResult::Continue)
    }

    fn visit_class_def(&mut self, node: &mut ClassDef) -> Result<VisitResult, ObfuscateError> {
        self.rename_definition(&mut node.name)?;
        Ok(VisitResult::Continue)
    }

    fn visit_arg(&mut self, node: &mut Arg) -> Result<VisitResult, ObfuscateError> {
        self.rename_definition(&mut node.arg)?;
        Ok(VisitResult::Continue)
    }

    fn visit_except_handler(
        &mut self,
        node: &mut ExceptHandler,
    ) -> Result<VisitResult, ObfuscateError> {
        self.rename_optional_definition(&mut node.name)?;
        Ok(VisitResult::Continue)
    }

    fn visit_global_stmt(&mut self, node: &mut Global) -> Result<VisitResult, ObfuscateError> {
        for name in node.names.iter_mut() {
            self.rename_definition(name)?;
        }
        Ok(VisitResult::Continue)
    }

    fn visit_nonlocal_stmt(&mut self, node: &mut Global) -> Result<VisitResult, ObfuscateError> {
        for name in node.names.iter_mut() {
            self.rename_definition(name)?;
        }
        Ok(VisitResult::Continue)
    }

    fn visit_match_as(&mut self, node: &mut MatchAs) -> Result<VisitResult, ObfuscateError> {
        self.rename_optional_definition(&mut node.name)?;
        Ok(VisitResult::Continue)
    }

    fn visit_match_star(&mut self, node: &mut MatchStar) -> Result<VisitResult, ObfuscateError> {
        self.rename_optional_definition(&mut node.name)?;
        Ok(VisitResult::Continue)
    }

    fn visit_match_mapping(
        &mut self,
        node: &mut MatchMapping,
    ) -> Result<VisitResult, ObfuscateError> {
        self.rename_optional_definition(&mut node.rest)?;
        Ok(VisitResult::Continue)
    }

    fn visit_type_param(&mut self, node: &mut TypeParam) -> Result<VisitResult, ObfuscateError> {
        match node {
            TypeParam::TypeVar(v) => self.rename_definition(&mut v.name)?,
            TypeParam::ParamSpec(p) | TypeParam::TypeVarTuple(p) => {
                self.rename_definition(&mut p.name)?
            }
            TypeParam::Unsupported => {}
        }
        Ok(VisitResult::Continue)
    }
}

// ============================================================================
// Entry point
// ============================================================================

/// Obfuscate `module` with a fresh authority.
///
/// The rewrite happens on a copy that replaces `module` only on success, so
/// a failed run leaves the caller's tree untouched.
pub fn obfuscate_module(
    module: &mut Module,
    options: &ObfuscateOptions,
) -> Result<ObfuscationReport, ObfuscateError> {
    let mut obfuscator = NameObfuscator::new(options)?;
    let mut working = module.clone();
    obfuscator.rewrite(&mut working)?;
    *module = working;
    Ok(obfuscator.into_report())
}

// ============================================================================
// Tests
// ============================================================================
