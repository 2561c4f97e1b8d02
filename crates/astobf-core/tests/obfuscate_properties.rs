//! Whole-module properties of the identifier rewriter.
//!
//! Each test loads a syntax tree in the JSON shape produced by Python's
//! `ast` module, rewrites it, and checks an observable property of the
//! result: consistency of renames, untouched builtins, preserved tree shape,
//! collision-free names, and all-or-nothing failure.

use std::collections::HashSet;
use std::mem::Discriminant;

use astobf_ast::nodes::{Expr, Module, Name, Stmt};
use astobf_ast::visitor::{walk_module, Transformer, VisitResult, WalkError};
use astobf_core::{
    obfuscate_module, NameAuthority, NameObfuscator, NameStyle, ObfuscateError,
    ObfuscateOptions, ReservedNames,
};
use rand::RngCore;
use serde_json::{json, Value};

// ============================================================================
// Fixtures
// ============================================================================

fn module(body: Value) -> Module {
    serde_json::from_value(json!({"_type": "Module", "body": body, "type_ignores": []}))
        .expect("fixture must load")
}

fn load(id: &str) -> Value {
    json!({"_type": "Name", "id": id, "ctx": {"_type": "Load"}})
}

fn store(id: &str) -> Value {
    json!({"_type": "Name", "id": id, "ctx": {"_type": "Store"}})
}

fn constant(value: Value) -> Value {
    json!({"_type": "Constant", "value": value})
}

fn call(func: Value, args: Vec<Value>) -> Value {
    json!({"_type": "Call", "func": func, "args": args, "keywords": []})
}

fn attribute(value: Value, attr: &str) -> Value {
    json!({"_type": "Attribute", "value": value, "attr": attr, "ctx": {"_type": "Load"}})
}

fn expr_stmt(value: Value) -> Value {
    json!({"_type": "Expr", "value": value})
}

fn assign(target: &str, value: Value) -> Value {
    json!({"_type": "Assign", "targets": [store(target)], "value": value})
}

fn seeded(seed: u64) -> ObfuscateOptions {
    ObfuscateOptions {
        seed: Some(seed),
        ..ObfuscateOptions::default()
    }
}

/// Every `Name` id in the tree, in traversal order.
#[derive(Default)]
struct NameIds(Vec<String>);

impl Transformer for NameIds {
    type Error = WalkError;

    fn visit_name(&mut self, node: &mut Name) -> Result<VisitResult, WalkError> {
        self.0.push(node.id.clone());
        Ok(VisitResult::Continue)
    }
}

fn name_ids(module: &Module) -> Vec<String> {
    let mut ids = NameIds::default();
    walk_module(&mut ids, &mut module.clone()).expect("walk");
    ids.0
}

/// Statement and expression kinds, in traversal order.
#[derive(Default)]
struct Kinds {
    stmts: Vec<Discriminant<Stmt>>,
    exprs: Vec<Discriminant<Expr>>,
}

impl Transformer for Kinds {
    type Error = WalkError;

    fn visit_stmt(&mut self, node: &mut Stmt) -> Result<VisitResult, WalkError> {
        self.stmts.push(std::mem::discriminant(node));
        Ok(VisitResult::Continue)
    }

    fn visit_expr(&mut self, node: &mut Expr) -> Result<VisitResult, WalkError> {
        self.exprs.push(std::mem::discriminant(node));
        Ok(VisitResult::Continue)
    }
}

fn kinds(module: &Module) -> Kinds {
    let mut kinds = Kinds::default();
    walk_module(&mut kinds, &mut module.clone()).expect("walk");
    kinds
}

fn is_generated(name: &str, style: &NameStyle) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    let tail: Vec<char> = chars.collect();
    style.leading.contains(first)
        && (style.min_tail..=style.max_tail).contains(&tail.len())
        && tail.iter().all(|c| style.body.contains(*c))
}

/// A sample program touching most node kinds.
fn sample_program() -> Module {
    module(json!([
        {"_type": "Import", "names": [{"_type": "alias", "name": "numpy", "asname": "np"}]},
        {"_type": "ImportFrom", "module": "collections", "level": 0,
         "names": [{"_type": "alias", "name": "deque", "asname": null}]},
        assign("total", constant(json!(0))),
        {"_type": "For", "target": store("item"), "iter": call(load("range"), vec![constant(json!(10))]),
         "body": [{"_type": "AugAssign", "target": store("total"), "op": {"_type": "Add"}, "value": load("item")}],
         "orelse": []},
        {"_type": "If",
         "test": {"_type": "Compare", "left": load("total"), "ops": [{"_type": "Gt"}], "comparators": [constant(json!(5))]},
         "body": [expr_stmt(call(load("print"), vec![load("total")]))],
         "orelse": [expr_stmt(call(attribute(load("np"), "array"), vec![load("total")]))]},
        assign("queue", call(load("deque"), vec![json!({"_type": "ListComp",
            "elt": {"_type": "BinOp", "left": load("x"), "op": {"_type": "Mult"}, "right": constant(json!(2))},
            "generators": [{"_type": "comprehension", "target": store("x"), "iter": load("total"),
                            "ifs": [], "is_async": 0}]})]))
    ]))
}

// ============================================================================
// Consistency
// ============================================================================

mod consistency {
    use super::*;

    #[test]
    fn every_occurrence_gets_the_same_name() {
        // counter = 1
        // counter = counter + 1
        // print(counter)
        let mut m = module(json!([
            assign("counter", constant(json!(1))),
            assign("counter", json!({"_type": "BinOp", "left": load("counter"), "op": {"_type": "Add"}, "right": constant(json!(1))})),
            expr_stmt(call(load("print"), vec![load("counter")]))
        ]));
        let report = obfuscate_module(&mut m, &seeded(1)).unwrap();

        let renamed = report.name_map.get("counter").unwrap().to_string();
        let ids = name_ids(&m);
        assert_eq!(ids.iter().filter(|id| **id == renamed).count(), 4);
        assert!(ids.contains(&"print".to_string()));
        assert!(!ids.contains(&"counter".to_string()));
        assert_eq!(report.stats.names_renamed, 4);
    }

    #[test]
    fn map_covers_every_renamed_name() {
        let mut m = sample_program();
        let before: HashSet<String> = name_ids(&m).into_iter().collect();
        let report = obfuscate_module(&mut m, &seeded(2)).unwrap();

        let reserved = ReservedNames::python();
        for original in before.iter().filter(|id| !reserved.contains(id)) {
            assert!(report.name_map.contains(original), "{original} missing from map");
        }
        for (original, obfuscated) in report.name_map.iter() {
            assert!(!reserved.contains(original));
            assert!(is_generated(obfuscated, &NameStyle::default()), "{obfuscated}");
        }
    }

    #[test]
    fn same_seed_same_names() {
        let mut first = sample_program();
        let mut second = sample_program();
        let a = obfuscate_module(&mut first, &seeded(99)).unwrap();
        let b = obfuscate_module(&mut second, &seeded(99)).unwrap();
        assert_eq!(a.name_map, b.name_map);
        assert_eq!(first, second);
    }
}

// ============================================================================
// Collision freedom
// ============================================================================

/// Yields zero for the first `zeros` draws, then a spread of values.
struct ZerosThenSpread {
    zeros: u64,
    draws: u64,
}

impl RngCore for ZerosThenSpread {
    fn next_u32(&mut self) -> u32 {
        (self.next_u64() >> 32) as u32
    }

    fn next_u64(&mut self) -> u64 {
        self.draws += 1;
        if self.draws <= self.zeros {
            0
        } else {
            self.draws.wrapping_mul(0x9E37_79B9_7F4A_7C15)
        }
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(8) {
            let bytes = self.next_u64().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

mod collision_freedom {
    use super::*;

    #[test]
    fn forced_collision_is_retried() {
        // Both `a` and `ab` see an all-zero first candidate.
        let rng = ZerosThenSpread { zeros: 22, draws: 0 };
        let names = NameAuthority::with_rng(NameStyle::default(), rng).unwrap();
        let mut obfuscator = NameObfuscator::with_authority(names, ObfuscateOptions::default());

        let mut m = module(json!([expr_stmt(load("a")), expr_stmt(load("ab"))]));
        obfuscator.rewrite(&mut m).unwrap();

        let map = obfuscator.get_name_map();
        let a = map.get("a").unwrap();
        let ab = map.get("ab").unwrap();
        assert_eq!(a, "oooooooooo");
        assert_ne!(a, ab);
        assert!(obfuscator.stats().rejected_candidates >= 1);
    }

    #[test]
    fn generated_names_are_pairwise_distinct() {
        let body: Vec<Value> = (0..200).map(|i| expr_stmt(load(&format!("v{i}")))).collect();
        let mut m = module(Value::Array(body));
        let report = obfuscate_module(&mut m, &seeded(3)).unwrap();

        let generated: HashSet<&str> = report.name_map.iter().map(|(_, new)| new).collect();
        assert_eq!(report.name_map.len(), 200);
        assert_eq!(generated.len(), 200);
    }

    #[test]
    fn exhausted_name_space_aborts() {
        // Only two possible names: "ao" and "bo".
        let style = NameStyle {
            leading: "ab".to_string(),
            body: "o".to_string(),
            min_tail: 1,
            max_tail: 1,
            max_attempts: 50,
        };
        let options = ObfuscateOptions {
            seed: Some(4),
            style,
            ..ObfuscateOptions::default()
        };
        let mut m = module(json!([
            expr_stmt(load("x")),
            expr_stmt(load("y")),
            expr_stmt(load("z"))
        ]));
        let before = m.clone();
        let err = obfuscate_module(&mut m, &options).unwrap_err();
        assert!(matches!(err, ObfuscateError::Name(_)));
        assert_eq!(err.error_code().code(), 10);
        assert_eq!(m, before);
    }
}

// ============================================================================
// Preservation
// ============================================================================

mod preservation {
    use super::*;

    #[test]
    fn builtins_and_literals_are_untouched() {
        let mut m = module(json!([
            expr_stmt(call(load("print"), vec![call(load("len"), vec![load("data")])])),
            expr_stmt(load("True")),
            expr_stmt(load("None")),
            expr_stmt(call(load("isinstance"), vec![load("data"), load("dict")]))
        ]));
        obfuscate_module(&mut m, &seeded(5)).unwrap();
        let ids = name_ids(&m);
        for kept in ["print", "len", "True", "None", "isinstance", "dict"] {
            assert!(ids.contains(&kept.to_string()), "{kept} was renamed");
        }
        assert!(!ids.contains(&"data".to_string()));
    }

    #[test]
    fn preserved_names_are_untouched() {
        let mut m = module(json!([expr_stmt(call(load("main"), vec![load("arg")]))]));
        let options = ObfuscateOptions {
            preserve: vec!["main".to_string()],
            ..seeded(6)
        };
        let report = obfuscate_module(&mut m, &options).unwrap();
        assert_eq!(name_ids(&m)[0], "main");
        assert!(!report.name_map.contains("main"));
        assert!(report.name_map.contains("arg"));
    }

    #[test]
    fn tree_shape_is_unchanged() {
        let mut m = sample_program();
        let before = kinds(&m);
        obfuscate_module(&mut m, &seeded(7)).unwrap();
        let after = kinds(&m);
        assert_eq!(before.stmts, after.stmts);
        assert_eq!(before.exprs, after.exprs);
    }

    #[test]
    fn constants_and_module_paths_are_untouched() {
        let mut m = sample_program();
        obfuscate_module(&mut m, &seeded(8)).unwrap();
        let out = serde_json::to_value(&m).unwrap();
        assert_eq!(out["body"][0]["names"][0]["name"], "numpy");
        assert_eq!(out["body"][1]["module"], "collections");
        assert_eq!(out["body"][1]["names"][0]["name"], "deque");
        assert_eq!(out["body"][2]["value"]["value"], 0);
    }
}

// ============================================================================
// Imports and members
// ============================================================================

mod imports_and_members {
    use super::*;

    #[test]
    fn aliased_import_is_renamed_consistently() {
        // import numpy as np
        // np.array(1)
        let mut m = module(json!([
            {"_type": "Import", "names": [{"_type": "alias", "name": "numpy", "asname": "np"}]},
            expr_stmt(call(attribute(load("np"), "array"), vec![constant(json!(1))]))
        ]));
        let report = obfuscate_module(&mut m, &seeded(9)).unwrap();
        let out = serde_json::to_value(&m).unwrap();

        let np = report.name_map.get("np").unwrap();
        assert_eq!(out["body"][0]["names"][0]["name"], "numpy");
        assert_eq!(out["body"][0]["names"][0]["asname"], np);
        assert_eq!(out["body"][1]["value"]["func"]["value"]["id"], np);
        assert_eq!(out["body"][1]["value"]["func"]["attr"], "array");
        assert!(!report.name_map.contains("numpy"));
        assert!(!report.name_map.contains("array"));
    }

    #[test]
    fn unaliased_import_gains_an_alias() {
        // from collections import deque
        // deque()
        let mut m = module(json!([
            {"_type": "ImportFrom", "module": "collections", "level": 0,
             "names": [{"_type": "alias", "name": "deque", "asname": null}]},
            expr_stmt(call(load("deque"), vec![]))
        ]));
        let report = obfuscate_module(&mut m, &seeded(10)).unwrap();
        let out = serde_json::to_value(&m).unwrap();
        let deque = report.name_map.get("deque").unwrap();
        assert_eq!(out["body"][0]["names"][0]["asname"], deque);
        assert_eq!(out["body"][1]["value"]["func"]["id"], deque);
        assert_eq!(report.stats.bindings_renamed, 1);
    }

    #[test]
    fn from_import_alias_takes_precedence() {
        // from os.path import join as pjoin
        // pjoin("a", "b")
        let mut m = module(json!([
            {"_type": "ImportFrom", "module": "os.path", "level": 0,
             "names": [{"_type": "alias", "name": "join", "asname": "pjoin"}]},
            expr_stmt(call(load("pjoin"), vec![constant(json!("a")), constant(json!("b"))]))
        ]));
        let report = obfuscate_module(&mut m, &seeded(13)).unwrap();
        let out = serde_json::to_value(&m).unwrap();

        let pjoin = report.name_map.get("pjoin").unwrap();
        assert_ne!(pjoin, "pjoin");
        assert_eq!(out["body"][0]["module"], "os.path");
        assert_eq!(out["body"][0]["names"][0]["name"], "join");
        assert_eq!(out["body"][0]["names"][0]["asname"], pjoin);
        assert_eq!(out["body"][1]["value"]["func"]["id"], pjoin);
        assert!(!report.name_map.contains("join"));
        assert!(!report.name_map.contains("os"));
        assert_eq!(report.stats.bindings_renamed, 1);
    }

    #[test]
    fn member_names_pass_through_by_default() {
        let mut m = module(json!([
            expr_stmt(attribute(attribute(load("config"), "paths"), "root"))
        ]));
        let report = obfuscate_module(&mut m, &seeded(11)).unwrap();
        let out = serde_json::to_value(&m).unwrap();
        assert_eq!(out["body"][0]["value"]["attr"], "root");
        assert_eq!(out["body"][0]["value"]["value"]["attr"], "paths");
        assert_eq!(report.stats.members_renamed, 0);
        assert_eq!(report.name_map.len(), 1);
    }
}

// ============================================================================
// Failure
// ============================================================================

mod failure {
    use super::*;

    #[test]
    fn unknown_node_kind_aborts_without_changes() {
        let mut m = module(json!([
            assign("first", constant(json!(1))),
            expr_stmt(call(load("first"), vec![json!({"_type": "Interpolation", "value": load("x")})]))
        ]));
        let before = m.clone();
        let err = obfuscate_module(&mut m, &seeded(12)).unwrap_err();
        assert!(matches!(
            err,
            ObfuscateError::Walk(WalkError::UnsupportedNode { context: "expression" })
        ));
        assert_eq!(err.error_code().code(), 3);
        assert_eq!(m, before);
    }
}
