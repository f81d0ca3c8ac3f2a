//! Per-function code generation entry point.

use rustc_hash::FxHashSet;
use tracing::debug;

use genc_ir::{ConstId, ConstValue, FlowGraph, Value, VarId};

use crate::context::FnContext;
use crate::error::{GenError, GenResult};
use crate::lines::CodeLines;
use crate::options::CodegenOptions;
use crate::registry::{ExceptionResolver, TypeRegistry};

/// Generated code for one function, ready for assembly into a translation
/// unit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FunctionCode {
    pub name: String,
    /// Parameter names, in order.
    pub args: Vec<String>,
    /// One local declaration per non-parameter variable.
    pub declarations: Vec<String>,
    pub body: Vec<String>,
    /// What the function returns to signal an exception.
    pub error_value: String,
}

/// Generates the pieces of one function from its flow graph.
///
/// Construction resolves value types and block order once; every accessor
/// reuses them.
pub struct FunctionCodeGenerator<'a> {
    ctx: FnContext<'a>,
}

impl<'a> FunctionCodeGenerator<'a> {
    pub fn new(
        graph: &'a FlowGraph,
        registry: &'a dyn TypeRegistry,
        exceptions: &'a dyn ExceptionResolver,
        options: &'a CodegenOptions,
    ) -> Self {
        let ctx = FnContext::new(graph, registry, exceptions, options);
        debug!(
            function = %graph.name,
            blocks = ctx.blocks.len(),
            values = ctx.typemap.len(),
            "resolved function"
        );
        Self { ctx }
    }

    pub fn context(&self) -> &FnContext<'a> {
        &self.ctx
    }

    pub fn arg_names(&self) -> GenResult<Vec<String>> {
        self.ctx
            .graph
            .args()
            .iter()
            .map(|&arg| self.ctx.var_name(arg))
            .collect()
    }

    /// Every variable the function references, in resolution order.
    pub fn variables(&self) -> Vec<VarId> {
        self.ctx.typemap.variables().collect()
    }

    /// Every literal the function references, in resolution order.
    pub fn constants(&self) -> Vec<ConstId> {
        self.ctx.typemap.constants().collect()
    }

    /// The distinct literal payloads, in resolution order.
    pub fn constant_values(&self) -> GenResult<Vec<ConstValue>> {
        let mut seen = FxHashSet::default();
        let mut values = Vec::new();
        for id in self.ctx.typemap.constants() {
            let data = self
                .ctx
                .graph
                .constant(id)
                .ok_or(GenError::UnknownValue(Value::Const(id)))?;
            if seen.insert(&data.value) {
                values.push(data.value.clone());
            }
        }
        Ok(values)
    }

    /// Local declarations, excluding the parameters. `Void` variables have
    /// no storage; their declaration is commented out.
    pub fn declarations(&self) -> GenResult<CodeLines> {
        let params: FxHashSet<VarId> = self.ctx.graph.args().iter().copied().collect();
        let mut out = CodeLines::new();
        for var in self.ctx.typemap.variables() {
            if params.contains(&var) {
                continue;
            }
            let ty = self.ctx.var_type(var)?;
            let decl = format!(
                "{};",
                self.ctx.ctype(ty)?.declare(&self.ctx.var_name(var)?)
            );
            if ty.is_void() {
                out.push(format!("/*{decl}*/"));
            } else {
                out.push(decl);
            }
        }
        Ok(out)
    }

    pub fn body(&self) -> GenResult<CodeLines> {
        self.ctx.gen_body()
    }

    pub fn error_return_value(&self) -> GenResult<String> {
        self.ctx.error_return_value()
    }

    pub fn generate(&self) -> GenResult<FunctionCode> {
        let declarations = self.declarations()?.into_vec();
        let body = self.body()?.into_vec();
        debug!(
            function = %self.ctx.graph.name,
            declarations = declarations.len(),
            lines = body.len(),
            "generated function"
        );
        Ok(FunctionCode {
            name: self.ctx.graph.name.clone(),
            args: self.arg_names()?,
            declarations,
            body,
            error_value: self.error_return_value()?,
        })
    }
}

#[cfg(test)]
mod tests;
