//! Per-function generation context.
//!
//! [`FnContext`] bundles what every stage needs while one function is being
//! generated: the graph, the shared registry, the options, and the results of
//! the two up-front passes (type resolution and block ordering). It is
//! read-only during generation; per-block mutable state lives in
//! [`BlockContext`](crate::refcount::BlockContext) and is passed explicitly.

use rustc_hash::FxHashSet;

use genc_ir::{BlockId, BlockOrder, FlowGraph, TypeIdx, Value, VarId};

use crate::error::{GenError, GenResult};
use crate::options::CodegenOptions;
use crate::registry::{c_identifier, CDecl, ExceptionResolver, TypeRegistry};
use crate::typemap::{attached_type, TypeMap};

/// Names of the scratch locals generated code introduces on its own.
///
/// Each is chosen not to collide with any variable of the function.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TempNames {
    /// Snapshot of the old field value in a field write.
    pub prev: String,
    pub exc_cls: String,
    pub exc_value: String,
    pub exc_tb: String,
}

impl TempNames {
    pub fn avoiding(graph: &FlowGraph) -> Self {
        let taken: FxHashSet<String> = graph.vars.iter().map(|v| c_identifier(&v.name)).collect();
        let fresh = |base: &str| {
            if !taken.contains(base) {
                return base.to_owned();
            }
            (1u32..)
                .map(|n| format!("{base}_{n}"))
                .find(|name| !taken.contains(name))
                .unwrap_or_else(|| base.to_owned())
        };
        Self {
            prev: fresh("prev"),
            exc_cls: fresh("exc_cls"),
            exc_value: fresh("exc_value"),
            exc_tb: fresh("exc_tb"),
        }
    }
}

/// Read-only state for generating one function.
pub struct FnContext<'a> {
    pub graph: &'a FlowGraph,
    pub registry: &'a dyn TypeRegistry,
    pub exceptions: &'a dyn ExceptionResolver,
    pub options: &'a CodegenOptions,
    pub typemap: TypeMap,
    pub blocks: BlockOrder,
    pub temps: TempNames,
}

impl<'a> FnContext<'a> {
    /// Run block ordering and type resolution for `graph`.
    pub fn new(
        graph: &'a FlowGraph,
        registry: &'a dyn TypeRegistry,
        exceptions: &'a dyn ExceptionResolver,
        options: &'a CodegenOptions,
    ) -> Self {
        let blocks = BlockOrder::compute(graph);
        let typemap = TypeMap::resolve(graph, &blocks);
        Self {
            graph,
            registry,
            exceptions,
            options,
            typemap,
            blocks,
            temps: TempNames::avoiding(graph),
        }
    }

    /// The concrete type of `value`.
    ///
    /// Values the function never references (an exception binding that is
    /// not passed along, say) fall back to their attached or default type.
    pub fn type_of(&self, value: Value) -> GenResult<TypeIdx> {
        if let Some(ty) = self.typemap.get(value) {
            return Ok(ty);
        }
        let known = match value {
            Value::Var(v) => self.graph.var(v).is_some(),
            Value::Const(c) => self.graph.constant(c).is_some(),
        };
        if !known {
            return Err(GenError::UnknownValue(value));
        }
        Ok(attached_type(self.graph, value).unwrap_or(match value {
            Value::Var(_) => TypeIdx::OBJECT_GC,
            Value::Const(_) => TypeIdx::OBJECT_RAW,
        }))
    }

    #[inline]
    pub fn var_type(&self, var: VarId) -> GenResult<TypeIdx> {
        self.type_of(Value::Var(var))
    }

    /// The C name bound to a variable.
    pub fn var_name(&self, var: VarId) -> GenResult<String> {
        self.graph
            .var(var)
            .map(|data| c_identifier(&data.name))
            .ok_or(GenError::UnknownValue(Value::Var(var)))
    }

    #[inline]
    pub fn ctype(&self, ty: TypeIdx) -> GenResult<CDecl> {
        self.registry.layout(ty)
    }

    /// Label number of a reachable block.
    pub fn block_number(&self, block: BlockId) -> GenResult<u32> {
        self.blocks
            .number(block)
            .ok_or(GenError::UnknownBlock(block))
    }

    pub fn block_label(&self, block: BlockId) -> GenResult<String> {
        Ok(self.options.block_label(self.block_number(block)?))
    }

    /// The value returned to signal an exception, per the return type.
    pub fn error_return_value(&self) -> GenResult<String> {
        let ty = match self.graph.return_var() {
            Some(ret) => self.var_type(ret)?,
            None => TypeIdx::VOID,
        };
        self.registry.error_value(ty)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use pretty_assertions::assert_eq;

    use genc_ir::{GraphBuilder, TypeIdx, Value, VarId};

    use super::{FnContext, TempNames};
    use crate::error::GenError;
    use crate::options::CodegenOptions;
    use crate::test_helpers::registry;

    #[test]
    fn temporaries_dodge_variable_names() {
        let mut g = GraphBuilder::new("f", &["exc_cls", "exc_tb", "exc_tb_1"]);
        g.var("prev");
        let temps = TempNames::avoiding(&g.finish());
        assert_eq!(
            temps,
            TempNames {
                prev: "prev_1".to_owned(),
                exc_cls: "exc_cls_1".to_owned(),
                exc_value: "exc_value".to_owned(),
                exc_tb: "exc_tb_2".to_owned(),
            }
        );
    }

    #[test]
    fn unreferenced_variables_fall_back_to_their_attached_type() {
        let mut g = GraphBuilder::new("f", &[]);
        let loose = g.var("loose");
        let typed = g.typed_var("typed", TypeIdx::FLOAT);
        let graph = g.finish();

        let reg = registry();
        let opts = CodegenOptions::default();
        let ctx = FnContext::new(&graph, &reg, &reg, &opts);

        assert_eq!(ctx.var_type(loose).unwrap(), TypeIdx::OBJECT_GC);
        assert_eq!(ctx.var_type(typed).unwrap(), TypeIdx::FLOAT);
        let bogus = VarId::new(77);
        assert_eq!(
            ctx.var_type(bogus),
            Err(GenError::UnknownValue(Value::Var(bogus)))
        );
        assert_eq!(ctx.block_label(graph.startblock).unwrap(), "block0");
    }
}
