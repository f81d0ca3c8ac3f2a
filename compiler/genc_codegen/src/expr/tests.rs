#![allow(clippy::unwrap_used)]

use pretty_assertions::assert_eq;

use genc_ir::{ConstValue, GraphBuilder, TypeIdx, Value, VarId};

use crate::context::FnContext;
use crate::error::GenError;
use crate::options::CodegenOptions;
use crate::test_helpers::registry;

#[test]
fn variables_render_by_name_unless_void() {
    let mut g = GraphBuilder::new("f", &["a"]);
    let start = g.start();
    let ret = g.return_block();
    let a = g.args()[0];
    let unit = g.op_typed(start, "keepalive", vec![a.into()], "unit", TypeIdx::VOID);
    g.link(start, ret, vec![a.into()]);
    let graph = g.finish();

    let reg = registry();
    let opts = CodegenOptions::default();
    let ctx = FnContext::new(&graph, &reg, &reg, &opts);

    assert_eq!(ctx.expr(a.into()).unwrap(), "a");
    assert_eq!(ctx.expr(unit.into()).unwrap(), "/* nothing */");
}

#[test]
fn literals_come_from_the_registry() {
    let mut g = GraphBuilder::new("f", &[]);
    let start = g.start();
    let ret = g.return_block();
    let n = g.typed_constant(ConstValue::Int(-3), TypeIdx::SIGNED);
    let s = g.typed_constant(ConstValue::Str("x".into()), TypeIdx::OBJECT_GC);
    let s_again = g.typed_constant(ConstValue::Str("x".into()), TypeIdx::OBJECT_GC);
    let r = g.op_new(start, "concat", vec![s, s_again, n], "r");
    g.link(start, ret, vec![r.into()]);
    let graph = g.finish();

    let reg = registry();
    let opts = CodegenOptions::default();
    let ctx = FnContext::new(&graph, &reg, &reg, &opts);

    assert_eq!(ctx.expr(n).unwrap(), "-3L");
    assert_eq!(
        ctx.exprs(&[s, s_again]).unwrap(),
        vec!["g_prebuilt_0", "g_prebuilt_0"]
    );
}

#[test]
fn foreign_values_are_rejected() {
    let g = GraphBuilder::new("f", &[]);
    let graph = g.finish();

    let reg = registry();
    let opts = CodegenOptions::default();
    let ctx = FnContext::new(&graph, &reg, &reg, &opts);

    let bogus = Value::Var(VarId::new(99));
    assert_eq!(ctx.expr(bogus), Err(GenError::UnknownValue(bogus)));
}
