#![allow(clippy::unwrap_used)]

use pretty_assertions::assert_eq;
use proptest::prelude::*;

use genc_ir::{ConstValue, FlowGraph, GraphBuilder, TypeIdx};

use super::FunctionCodeGenerator;
use crate::options::CodegenOptions;
use crate::test_helpers::{declarations, lines, registry};

fn pass_through() -> FlowGraph {
    let mut g = GraphBuilder::new("pass_through", &["a", "b"]);
    let start = g.start();
    let ret = g.return_block();
    let args = g.args();
    let x = g.var("x");
    let y = g.var("y");
    let mid = g.block(vec![x, y]);
    g.link(start, mid, vec![args[0].into(), args[1].into()]);
    g.link(mid, ret, vec![x.into()]);
    g.finish()
}

#[test]
fn declarations_skip_parameters() {
    assert_eq!(
        declarations(&pass_through(), &registry()),
        lines(&["PyObject *result;", "PyObject *x;", "PyObject *y;"])
    );
}

#[test]
fn void_variables_are_declared_in_comments() {
    let mut g = GraphBuilder::with_params("f", &[("n", Some(TypeIdx::SIGNED))]);
    let start = g.start();
    let ret = g.return_block();
    let n = g.args()[0];
    g.op_typed(start, "keepalive", vec![n.into()], "unit", TypeIdx::VOID);
    let m = g.op_typed(start, "int_neg", vec![n.into()], "m", TypeIdx::SIGNED);
    g.link(start, ret, vec![m.into()]);
    let graph = g.finish();

    assert_eq!(
        declarations(&graph, &registry()),
        lines(&["PyObject *result;", "/*void unit;*/", "long m;"])
    );
}

#[test]
fn keyword_names_are_escaped() {
    let mut g = GraphBuilder::with_params("f", &[("int", Some(TypeIdx::SIGNED))]);
    let start = g.start();
    let ret = g.return_block();
    let n = g.args()[0];
    let r = g.op_typed(start, "int_neg", vec![n.into()], "return", TypeIdx::SIGNED);
    g.link(start, ret, vec![r.into()]);
    let graph = g.finish();

    let reg = registry();
    let opts = CodegenOptions::default();
    let gen = FunctionCodeGenerator::new(&graph, &reg, &reg, &opts);

    assert_eq!(gen.arg_names().unwrap(), vec!["int_"]);
    assert_eq!(
        gen.declarations().unwrap().into_vec(),
        lines(&["PyObject *result;", "long return_;"])
    );
    assert!(gen
        .body()
        .unwrap()
        .into_vec()
        .contains(&"OP_INT_NEG(int_, return_, err0_0)".to_owned()));
}

#[test]
fn always_raising_function_returns_void() {
    let mut g = GraphBuilder::new("always_raises", &[]);
    let start = g.start();
    let exc = g.except_block();
    let cls = g.typed_constant(ConstValue::Exception("ValueError".into()), TypeIdx::OBJECT_GC);
    let val = g.typed_constant(ConstValue::None, TypeIdx::OBJECT_GC);
    g.link(start, exc, vec![cls, val]);
    let graph = g.finish();

    let reg = registry();
    let opts = CodegenOptions::default();
    let gen = FunctionCodeGenerator::new(&graph, &reg, &reg, &opts);

    assert_eq!(gen.error_return_value().unwrap(), "/* error */");
    assert_eq!(
        gen.declarations().unwrap().into_vec(),
        lines(&["/*void result;*/", "PyObject *etype;", "PyObject *evalue;"])
    );
    assert_eq!(
        gen.body().unwrap().into_vec(),
        lines(&[
            "",
            "block0:",
            "etype = PyExc_ValueError;",
            "Py_XINCREF(etype);",
            "evalue = Py_None;",
            "Py_XINCREF(evalue);",
            "goto block1;",
            "",
            "",
            "block1:",
            "PyErr_Restore(etype, evalue, NULL);",
            "return /* error */;",
        ])
    );
}

#[test]
fn values_and_constants_in_resolution_order() {
    let mut g = GraphBuilder::new("f", &["a"]);
    let start = g.start();
    let ret = g.return_block();
    let a = g.args()[0];
    let s1 = g.typed_constant(ConstValue::Str("x".into()), TypeIdx::OBJECT_GC);
    let s2 = g.typed_constant(ConstValue::Str("x".into()), TypeIdx::OBJECT_GC);
    let one = g.typed_constant(ConstValue::Int(1), TypeIdx::SIGNED);
    let r = g.op_new(start, "build", vec![a.into(), s1, s2, one], "r");
    g.link(start, ret, vec![r.into()]);
    let graph = g.finish();

    let reg = registry();
    let opts = CodegenOptions::default();
    let gen = FunctionCodeGenerator::new(&graph, &reg, &reg, &opts);

    assert_eq!(gen.arg_names().unwrap(), vec!["a"]);
    assert_eq!(gen.variables().len(), 3);
    assert_eq!(gen.constants().len(), 3);
    assert_eq!(
        gen.constant_values().unwrap(),
        vec![ConstValue::Str("x".into()), ConstValue::Int(1)]
    );
}

#[test]
fn generate_bundles_everything() {
    let graph = pass_through();
    let reg = registry();
    let opts = CodegenOptions::default();
    let code = FunctionCodeGenerator::new(&graph, &reg, &reg, &opts)
        .generate()
        .unwrap();

    assert_eq!(code.name, "pass_through");
    assert_eq!(code.args, vec!["a", "b"]);
    assert_eq!(code.declarations.len(), 3);
    assert_eq!(code.body[0], "Py_XINCREF(a);");
    assert_eq!(code.error_value, "NULL");
}

#[test]
fn custom_label_prefixes() {
    let graph = pass_through();
    let reg = registry();
    let opts = CodegenOptions::default().with_block_prefix("L");
    let body = FunctionCodeGenerator::new(&graph, &reg, &reg, &opts)
        .body()
        .unwrap()
        .into_vec();
    assert!(body.contains(&"L1:".to_owned()));
    assert!(body.contains(&"goto L2;".to_owned()));
}

proptest! {
    /// One declaration per non-parameter variable.
    #[test]
    fn declaration_count_matches_locals(params in 0usize..4, ops in 0usize..6) {
        let names: Vec<String> = (0..params).map(|i| format!("p{i}")).collect();
        let refs: Vec<&str> = names.iter().map(String::as_str).collect();
        let mut g = GraphBuilder::new("f", &refs);
        let start = g.start();
        let ret = g.return_block();
        let mut last = g.typed_constant(ConstValue::None, TypeIdx::OBJECT_GC);
        for i in 0..ops {
            last = g.op_new(start, "step", vec![last], &format!("r{i}")).into();
        }
        g.link(start, ret, vec![last]);
        let graph = g.finish();

        let decls = declarations(&graph, &registry());
        // The locals are the operation results plus the return value.
        prop_assert_eq!(decls.len(), ops + 1);
        prop_assert!(decls.iter().all(|d| d.ends_with(';')));
    }
}
