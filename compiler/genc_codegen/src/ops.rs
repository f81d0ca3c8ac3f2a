//! Operation emission.
//!
//! Each operation becomes one or more lines. Dispatch is table-driven: an
//! [`OpTable`] maps opcode names to [`OpHandler`]s, and every opcode without
//! an entry goes through [`generic`], which calls the fixed-arity macro
//! `OP_<OPNAME>(args..., result, err)`.
//!
//! The built-in handlers cover what a fixed-arity macro cannot express:
//!
//! - variable-arity container construction and calls (`containers`, `calls`)
//! - struct field and array access, and allocation, which need the operand
//!   types' layouts (`memory`)
//!
//! A handler that can fail jumps to the error label it is given.

mod calls;
mod containers;
mod memory;

use std::fmt;

use rustc_hash::FxHashMap;

use genc_ir::{Operation, TypeIdx, Value};

use crate::context::FnContext;
use crate::error::{GenError, GenResult};
use crate::lines::CodeLines;

/// Emits the code of one operation; `err` is the label to jump to on failure.
pub type OpHandler =
    fn(ctx: &FnContext<'_>, op: &Operation, err: &str, out: &mut CodeLines) -> GenResult<()>;

/// Opcode name to handler.
#[derive(Clone)]
pub struct OpTable {
    handlers: FxHashMap<String, OpHandler>,
    fallback: OpHandler,
}

impl OpTable {
    /// A table where every opcode takes the generic macro path.
    pub fn generic_only() -> Self {
        Self {
            handlers: FxHashMap::default(),
            fallback: generic,
        }
    }

    /// The built-in handlers.
    pub fn standard() -> Self {
        let mut table = Self::generic_only();
        table.register("newlist", containers::newlist);
        table.register("newdict", containers::newdict);
        table.register("newtuple", containers::newtuple);
        table.register("simple_call", calls::simple_call);
        table.register("call_args", calls::call_args);
        table.register("direct_call", calls::direct_call);
        table.register("getfield", memory::getfield);
        table.register("getsubstruct", memory::getsubstruct);
        table.register("setfield", memory::setfield);
        table.register("getarrayitem", memory::getarrayitem);
        table.register("getarraysize", memory::getarraysize);
        table.register("malloc", memory::malloc);
        table.register("malloc_varsize", memory::malloc_varsize);
        table
    }

    /// Register or replace the handler for `opname`.
    pub fn register(&mut self, opname: &str, handler: OpHandler) {
        self.handlers.insert(opname.to_owned(), handler);
    }

    /// Replace the handler used for unregistered opcodes.
    pub fn set_fallback(&mut self, handler: OpHandler) {
        self.fallback = handler;
    }

    pub fn contains(&self, opname: &str) -> bool {
        self.handlers.contains_key(opname)
    }

    pub fn handler(&self, opname: &str) -> OpHandler {
        self.handlers.get(opname).copied().unwrap_or(self.fallback)
    }
}

impl Default for OpTable {
    fn default() -> Self {
        Self::standard()
    }
}

impl fmt::Debug for OpTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.handlers.keys().map(String::as_str).collect();
        names.sort_unstable();
        f.debug_struct("OpTable").field("handlers", &names).finish_non_exhaustive()
    }
}

impl FnContext<'_> {
    /// Emit `op`, jumping to `err` if it fails.
    pub fn emit_op(&self, op: &Operation, err: &str, out: &mut CodeLines) -> GenResult<()> {
        (self.options.ops.handler(&op.opname))(self, op, err, out)
    }
}

/// `OP_<OPNAME>(args..., result, err)`.
pub fn generic(ctx: &FnContext<'_>, op: &Operation, err: &str, out: &mut CodeLines) -> GenResult<()> {
    let mut parts = ctx.exprs(&op.args)?;
    parts.push(ctx.expr(op.result.into())?);
    parts.push(err.to_owned());
    out.push(format!(
        "{}({})",
        ctx.options.runtime.op_macro(&op.opname),
        parts.join(", ")
    ));
    Ok(())
}

// Operand helpers shared by the handlers

fn operand(op: &Operation, index: usize) -> GenResult<Value> {
    op.args
        .get(index)
        .copied()
        .ok_or_else(|| GenError::MissingOperand {
            op: op.opname.clone(),
            index,
        })
}

/// The name carried by a constant operand (a field tag, typically).
fn symbol_operand<'g>(ctx: &FnContext<'g>, op: &Operation, index: usize) -> GenResult<&'g str> {
    let value = operand(op, index)?;
    let non_constant = || GenError::NonConstantOperand {
        op: op.opname.clone(),
        index,
    };
    let Value::Const(id) = value else {
        return Err(non_constant());
    };
    ctx.graph
        .constant(id)
        .ok_or(GenError::UnknownValue(value))?
        .value
        .symbol()
        .ok_or_else(non_constant)
}

/// The type a pointer-typed value points to.
fn pointee(ctx: &FnContext<'_>, op: &Operation, value: Value) -> GenResult<TypeIdx> {
    let ty = ctx.type_of(value)?;
    ctx.registry
        .pool()
        .pointee(ty)
        .ok_or_else(|| GenError::NotAPointer {
            op: op.opname.clone(),
            ty,
        })
}
