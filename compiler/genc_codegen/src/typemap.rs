//! Type resolution: every value a function references, with its concrete type.
//!
//! One pass over the reachable blocks collects block parameters, operation
//! arguments and results, and edge arguments. Each distinct value gets its
//! attached type, or a default: untyped variables become managed object
//! pointers and untyped literals non-managed ones.
//!
//! The return value is seeded as `Void` before the scan. It keeps that type
//! only if no reachable block mentions it (a function that always raises).

use rustc_hash::{FxHashMap, FxHashSet};

use genc_ir::{BlockOrder, ConstId, FlowGraph, TypeIdx, Value, VarId};

/// Resolved types of all values referenced by one function.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TypeMap {
    /// Values in first-reference order (the seeded return value first).
    order: Vec<Value>,
    types: FxHashMap<Value, TypeIdx>,
}

impl TypeMap {
    pub fn resolve(graph: &FlowGraph, blocks: &BlockOrder) -> Self {
        let mut map = Self::default();
        if let Some(ret) = graph.return_var() {
            map.insert(Value::Var(ret), TypeIdx::VOID);
        }

        let mut seen = FxHashSet::default();
        let mut visit = |value: Value| {
            if seen.insert(value) {
                let ty = attached_type(graph, value).unwrap_or(match value {
                    Value::Var(_) => TypeIdx::OBJECT_GC,
                    Value::Const(_) => TypeIdx::OBJECT_RAW,
                });
                map.insert(value, ty);
            }
        };

        for block in blocks.blocks().iter().filter_map(|&id| graph.block(id)) {
            for &param in &block.inputargs {
                visit(Value::Var(param));
            }
            for op in &block.operations {
                for &arg in &op.args {
                    visit(arg);
                }
                visit(Value::Var(op.result));
            }
            for link in &block.exits {
                for &arg in &link.args {
                    visit(arg);
                }
            }
        }
        map
    }

    fn insert(&mut self, value: Value, ty: TypeIdx) {
        if self.types.insert(value, ty).is_none() {
            self.order.push(value);
        }
    }

    #[inline]
    pub fn get(&self, value: Value) -> Option<TypeIdx> {
        self.types.get(&value).copied()
    }

    /// All values, in resolution order.
    pub fn values(&self) -> &[Value] {
        &self.order
    }

    pub fn variables(&self) -> impl Iterator<Item = VarId> + '_ {
        self.order.iter().filter_map(|v| v.as_var())
    }

    pub fn constants(&self) -> impl Iterator<Item = ConstId> + '_ {
        self.order.iter().filter_map(|v| v.as_const())
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// The type attached upstream, if any.
pub(crate) fn attached_type(graph: &FlowGraph, value: Value) -> Option<TypeIdx> {
    match value {
        Value::Var(v) => graph.var(v)?.ty,
        Value::Const(c) => graph.constant(c)?.ty,
    }
}
