//! Call operations.

use genc_ir::Operation;

use super::operand;
use crate::context::FnContext;
use crate::error::GenResult;
use crate::lines::CodeLines;

/// `OP_SIMPLE_CALL((f, args..., NULL), result, err)`: the trailing null
/// marks the absent keyword arguments.
pub(super) fn simple_call(ctx: &FnContext<'_>, op: &Operation, err: &str, out: &mut CodeLines) -> GenResult<()> {
    let mut args = ctx.exprs(&op.args)?;
    args.push(ctx.options.runtime.null.clone());
    let result = ctx.expr(op.result.into())?;
    out.push(format!(
        "{}(({}), {result}, {err})",
        ctx.options.runtime.op_macro(&op.opname),
        args.join(", ")
    ));
    Ok(())
}

/// `OP_CALL_ARGS((f, shape, args...), result, err)`.
pub(super) fn call_args(ctx: &FnContext<'_>, op: &Operation, err: &str, out: &mut CodeLines) -> GenResult<()> {
    let args = ctx.exprs(&op.args)?;
    let result = ctx.expr(op.result.into())?;
    out.push(format!(
        "{}(({}), {result}, {err})",
        ctx.options.runtime.op_macro(&op.opname),
        args.join(", ")
    ));
    Ok(())
}

/// Call of a statically known function, checking the exception state after.
///
/// `Void` arguments are dropped; a `Void` result is not assigned.
pub(super) fn direct_call(ctx: &FnContext<'_>, op: &Operation, err: &str, out: &mut CodeLines) -> GenResult<()> {
    let callee = ctx.expr(operand(op, 0)?)?;
    let mut args = Vec::with_capacity(op.args.len().saturating_sub(1));
    for &arg in &op.args[1..] {
        if !ctx.type_of(arg)?.is_void() {
            args.push(ctx.expr(arg)?);
        }
    }
    let call = format!("{callee}({})", args.join(", "));
    let check = format!(
        "if ({}()) {}({err})",
        ctx.options.runtime.occurred, ctx.options.runtime.fail
    );

    if ctx.var_type(op.result)?.is_void() {
        out.push(format!("{call}; {check}"));
    } else {
        let result = ctx.expr(op.result.into())?;
        out.push(format!("{result} = {call}; {check}"));
    }
    Ok(())
}
