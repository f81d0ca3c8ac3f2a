//! Shared test utilities for code generation.
//!
//! Graph factories and one-call generation wrappers used across the
//! `typemap`, `ops`, `refcount`, `linearize` and `function` tests. Only
//! compiled in test builds.

#![allow(clippy::unwrap_used)]

use genc_ir::{FlowGraph, TypeIdx, TypePool};

use crate::context::FnContext;
use crate::error::GenResult;
use crate::function::FunctionCodeGenerator;
use crate::lines::CodeLines;
use crate::options::CodegenOptions;
use crate::registry::CRegistry;

/// Registry over a pool with only the pre-interned types.
pub(crate) fn registry() -> CRegistry {
    CRegistry::new(TypePool::new())
}

/// A pool with `struct Point { x, y }` (signed fields); returns the struct
/// and a managed pointer to it.
pub(crate) fn point_pool() -> (TypePool, TypeIdx, TypeIdx) {
    let mut pool = TypePool::new();
    let point = pool.struct_type("Point", vec![("x", TypeIdx::SIGNED), ("y", TypeIdx::SIGNED)]);
    let ptr = pool.gc_ptr(point);
    (pool, point, ptr)
}

/// A pool with `struct Box { item: PyObject*, size: long }`; returns the
/// struct and a managed pointer to it.
pub(crate) fn box_pool() -> (TypePool, TypeIdx, TypeIdx) {
    let mut pool = TypePool::new();
    let boxed = pool.struct_type(
        "Box",
        vec![("item", TypeIdx::OBJECT_GC), ("size", TypeIdx::SIGNED)],
    );
    let ptr = pool.gc_ptr(boxed);
    (pool, boxed, ptr)
}

/// Body lines of `graph` with default options.
pub(crate) fn body(graph: &FlowGraph, registry: &CRegistry) -> Vec<String> {
    try_body(graph, registry).unwrap()
}

pub(crate) fn try_body(graph: &FlowGraph, registry: &CRegistry) -> GenResult<Vec<String>> {
    let options = CodegenOptions::default();
    FunctionCodeGenerator::new(graph, registry, registry, &options)
        .body()
        .map(CodeLines::into_vec)
}

/// Declaration lines of `graph` with default options.
pub(crate) fn declarations(graph: &FlowGraph, registry: &CRegistry) -> Vec<String> {
    let options = CodegenOptions::default();
    FunctionCodeGenerator::new(graph, registry, registry, &options)
        .declarations()
        .unwrap()
        .into_vec()
}

/// Emit the start block's operation `index` with error label `err`.
pub(crate) fn emit_op(
    graph: &FlowGraph,
    registry: &CRegistry,
    index: usize,
    err: &str,
) -> GenResult<Vec<String>> {
    let options = CodegenOptions::default();
    let ctx = FnContext::new(graph, registry, registry, &options);
    let op = &graph.blocks[graph.startblock.index()].operations[index];
    let mut out = CodeLines::new();
    ctx.emit_op(op, err, &mut out)?;
    Ok(out.into_vec())
}

/// Owned `String`s from string literals, for comparing against output.
pub(crate) fn lines(text: &[&str]) -> Vec<String> {
    text.iter().map(|&line| line.to_owned()).collect()
}
