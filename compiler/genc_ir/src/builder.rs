//! Incremental construction of [`FlowGraph`]s.
//!
//! Front ends and tests build graphs through [`GraphBuilder`], which owns the
//! arenas and hands out ids. A fresh builder already holds the start block
//! (with the function parameters), the return block and the exception block.

use crate::graph::{
    Block, ConstData, ConstValue, ExceptionBinding, ExitCase, ExitSwitch, FlowGraph, Link,
    Operation, VarData,
};
use crate::ids::{BlockId, ConstId, Value, VarId};
use crate::types::TypeIdx;

/// Builder for a single function graph.
pub struct GraphBuilder {
    graph: FlowGraph,
}

impl GraphBuilder {
    /// Start a graph named `name` whose parameters are untyped variables.
    pub fn new(name: &str, params: &[&str]) -> Self {
        let typed: Vec<(&str, Option<TypeIdx>)> = params.iter().map(|&p| (p, None)).collect();
        Self::with_params(name, &typed)
    }

    /// Start a graph with optionally typed parameters.
    pub fn with_params(name: &str, params: &[(&str, Option<TypeIdx>)]) -> Self {
        let mut builder = Self {
            graph: FlowGraph {
                name: name.to_owned(),
                vars: Vec::new(),
                consts: Vec::new(),
                blocks: Vec::new(),
                startblock: BlockId::new(0),
                returnblock: BlockId::new(0),
                exceptblock: BlockId::new(0),
            },
        };
        let args: Vec<VarId> = params
            .iter()
            .map(|&(p, ty)| builder.push_var(p, ty))
            .collect();
        let start = builder.block(args);

        let result = builder.var("result");
        let returnblock = builder.block(vec![result]);

        let etype = builder.var("etype");
        let evalue = builder.var("evalue");
        let exceptblock = builder.block(vec![etype, evalue]);

        builder.graph.startblock = start;
        builder.graph.returnblock = returnblock;
        builder.graph.exceptblock = exceptblock;
        builder
    }

    fn push_var(&mut self, name: &str, ty: Option<TypeIdx>) -> VarId {
        let id = VarId::new(
            u32::try_from(self.graph.vars.len())
                .unwrap_or_else(|_| panic!("variable count exceeds u32::MAX")),
        );
        self.graph.vars.push(VarData {
            name: name.to_owned(),
            ty,
        });
        id
    }

    fn push_const(&mut self, value: ConstValue, ty: Option<TypeIdx>) -> ConstId {
        let id = ConstId::new(
            u32::try_from(self.graph.consts.len())
                .unwrap_or_else(|_| panic!("constant count exceeds u32::MAX")),
        );
        self.graph.consts.push(ConstData { value, ty });
        id
    }

    /// Allocate an untyped variable (it will default to a managed pointer).
    pub fn var(&mut self, name: &str) -> VarId {
        self.push_var(name, None)
    }

    pub fn typed_var(&mut self, name: &str, ty: TypeIdx) -> VarId {
        self.push_var(name, Some(ty))
    }

    /// Allocate an untyped literal (it will default to a non-managed pointer).
    pub fn constant(&mut self, value: ConstValue) -> Value {
        Value::Const(self.push_const(value, None))
    }

    pub fn typed_constant(&mut self, value: ConstValue, ty: TypeIdx) -> Value {
        Value::Const(self.push_const(value, Some(ty)))
    }

    /// Append an empty block with the given input parameters.
    pub fn block(&mut self, inputargs: Vec<VarId>) -> BlockId {
        let id = BlockId::new(
            u32::try_from(self.graph.blocks.len())
                .unwrap_or_else(|_| panic!("block count exceeds u32::MAX")),
        );
        self.graph.blocks.push(Block::new(inputargs));
        id
    }

    pub fn start(&self) -> BlockId {
        self.graph.startblock
    }

    pub fn return_block(&self) -> BlockId {
        self.graph.returnblock
    }

    pub fn except_block(&self) -> BlockId {
        self.graph.exceptblock
    }

    /// The function parameters.
    pub fn args(&self) -> Vec<VarId> {
        self.graph.args().to_vec()
    }

    /// The input parameters of any block.
    pub fn inputargs(&self, block: BlockId) -> Vec<VarId> {
        self.block_ref(block).inputargs.clone()
    }

    fn block_ref(&self, block: BlockId) -> &Block {
        &self.graph.blocks[block.index()]
    }

    fn block_mut(&mut self, block: BlockId) -> &mut Block {
        &mut self.graph.blocks[block.index()]
    }

    /// Append `result = opname(args...)` to `block`.
    pub fn op(&mut self, block: BlockId, opname: &str, args: Vec<Value>, result: VarId) {
        self.block_mut(block).operations.push(Operation {
            opname: opname.to_owned(),
            args,
            result,
        });
    }

    /// Append an operation whose result is a fresh untyped variable.
    pub fn op_new(&mut self, block: BlockId, opname: &str, args: Vec<Value>, result: &str) -> VarId {
        let result = self.var(result);
        self.op(block, opname, args, result);
        result
    }

    /// Append an operation whose result is a fresh typed variable.
    pub fn op_typed(
        &mut self,
        block: BlockId,
        opname: &str,
        args: Vec<Value>,
        result: &str,
        ty: TypeIdx,
    ) -> VarId {
        let result = self.typed_var(result, ty);
        self.op(block, opname, args, result);
        result
    }

    pub fn set_exitswitch(&mut self, block: BlockId, exitswitch: ExitSwitch) {
        self.block_mut(block).exitswitch = exitswitch;
    }

    /// Add an edge with an explicit exit case.
    pub fn link_case(&mut self, from: BlockId, to: BlockId, args: Vec<Value>, exitcase: ExitCase) {
        self.block_mut(from).exits.push(Link {
            target: to,
            args,
            exitcase,
            exc: None,
        });
    }

    /// Add an untagged edge.
    pub fn link(&mut self, from: BlockId, to: BlockId, args: Vec<Value>) {
        self.link_case(from, to, args, ExitCase::Default);
    }

    /// Add an exception edge for `class`, returning the two variables bound
    /// to the caught exception's class and payload. `make_args` builds the
    /// edge arguments from those bindings.
    pub fn link_exception(
        &mut self,
        from: BlockId,
        to: BlockId,
        class: &str,
        make_args: impl FnOnce(ExceptionBinding) -> Vec<Value>,
    ) -> ExceptionBinding {
        let n = self.graph.vars.len();
        let binding = ExceptionBinding {
            class: self.var(&format!("last_exception_{n}")),
            payload: self.var(&format!("last_exc_value_{n}")),
        };
        let args = make_args(binding);
        self.block_mut(from).exits.push(Link {
            target: to,
            args,
            exitcase: ExitCase::Exception(class.to_owned()),
            exc: Some(binding),
        });
        binding
    }

    /// Read access to the graph built so far.
    pub fn graph(&self) -> &FlowGraph {
        &self.graph
    }

    pub fn finish(self) -> FlowGraph {
        self.graph
    }
}

#[cfg(test)]
mod tests;
