#![allow(clippy::unwrap_used)]

use pretty_assertions::assert_eq;

use genc_ir::{BlockId, ConstValue, FlowGraph, GraphBuilder, TypeIdx};

use super::generate_module;
use crate::error::GenError;
use crate::options::CodegenOptions;
use crate::test_helpers::registry;

/// `name(a) { return "shared"; }`, referencing one object literal.
fn returns_literal(name: &str) -> FlowGraph {
    let mut g = GraphBuilder::new(name, &["a"]);
    let start = g.start();
    let ret = g.return_block();
    let s = g.typed_constant(ConstValue::Str("shared".into()), TypeIdx::OBJECT_GC);
    g.link(start, ret, vec![s]);
    g.finish()
}

fn broken(name: &str) -> FlowGraph {
    let mut g = GraphBuilder::new(name, &[]);
    let start = g.start();
    g.link(start, BlockId::new(40), vec![]);
    g.finish()
}

#[test]
fn results_keep_input_order() {
    let graphs: Vec<FlowGraph> = (0..16)
        .map(|i| {
            if i == 5 {
                broken("f5")
            } else {
                returns_literal(&format!("f{i}"))
            }
        })
        .collect();
    let reg = registry();
    let results = generate_module(&graphs, &reg, &reg, &CodegenOptions::default());

    assert_eq!(results.len(), 16);
    for (i, result) in results.iter().enumerate() {
        if i == 5 {
            assert_eq!(result, &Err(GenError::UnknownBlock(BlockId::new(40))));
        } else {
            assert_eq!(result.as_ref().unwrap().name, format!("f{i}"));
        }
    }
}

#[test]
fn functions_share_prebuilt_literals() {
    let graphs = vec![returns_literal("f"), returns_literal("g")];
    let reg = registry();
    let results = generate_module(&graphs, &reg, &reg, &CodegenOptions::default());

    for result in &results {
        let code = result.as_ref().unwrap();
        assert!(code.body.contains(&"result = g_prebuilt_0;".to_owned()));
    }
    assert_eq!(
        reg.prebuilt(),
        vec![("g_prebuilt_0".to_owned(), ConstValue::Str("shared".into()))]
    );
}
