use pretty_assertions::assert_eq;

use crate::graph::{ConstValue, ExitCase};
use crate::ids::Value;
use crate::types::TypeIdx;

use super::*;

#[test]
fn op_new_appends_in_order() {
    let mut g = GraphBuilder::new("f", &["a"]);
    let start = g.start();
    let a: Value = g.args()[0].into();
    let one = g.typed_constant(ConstValue::Int(1), TypeIdx::SIGNED);
    let r1 = g.op_new(start, "int_add", vec![a, one], "r1");
    let r2 = g.op_typed(start, "int_neg", vec![r1.into()], "r2", TypeIdx::SIGNED);
    let graph = g.finish();

    let block = &graph.blocks[graph.startblock.index()];
    let names: Vec<&str> = block.operations.iter().map(|op| op.opname.as_str()).collect();
    assert_eq!(names, vec!["int_add", "int_neg"]);
    assert_eq!(block.operations[0].result, r1);
    assert_eq!(block.operations[1].result, r2);
    assert_eq!(graph.vars[r2.index()].ty, Some(TypeIdx::SIGNED));
    assert_eq!(graph.vars[r1.index()].ty, None);
}

#[test]
fn exception_link_binds_fresh_values() {
    let mut g = GraphBuilder::new("f", &[]);
    let start = g.start();
    let exc = g.except_block();
    let first = g.link_exception(start, exc, "ValueError", |b| {
        vec![b.class.into(), b.payload.into()]
    });
    let second = g.link_exception(start, exc, "KeyError", |b| {
        vec![b.class.into(), b.payload.into()]
    });
    let graph = g.finish();

    assert_ne!(first.class, second.class);
    assert_ne!(
        graph.vars[first.class.index()].name,
        graph.vars[second.class.index()].name
    );

    let exits = &graph.blocks[start.index()].exits;
    assert_eq!(exits[0].exitcase, ExitCase::Exception("ValueError".into()));
    assert_eq!(exits[0].exc, Some(first));
    assert_eq!(exits[1].args, vec![second.class.into(), second.payload.into()]);
}

#[test]
fn inputargs_of_new_block() {
    let mut g = GraphBuilder::new("f", &[]);
    let x = g.var("x");
    let y = g.var("y");
    let blk = g.block(vec![x, y]);
    assert_eq!(g.inputargs(blk), vec![x, y]);
    assert!(g.graph().blocks[blk.index()].operations.is_empty());
}
