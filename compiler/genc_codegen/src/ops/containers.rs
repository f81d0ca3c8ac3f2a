//! Variable-arity container construction.
//!
//! Empty containers use the dedicated `OP_<NAME>0(result, err)` constructor.
//! Otherwise the element count is prefixed to the element list:
//! `OP_NEWLIST((2, a, b), result, err)`. Dicts count key/value pairs.

use genc_ir::Operation;

use crate::context::FnContext;
use crate::error::{GenError, GenResult};
use crate::lines::CodeLines;

fn construct(
    ctx: &FnContext<'_>,
    op: &Operation,
    err: &str,
    out: &mut CodeLines,
    per_element: usize,
) -> GenResult<()> {
    let args = ctx.exprs(&op.args)?;
    let result = ctx.expr(op.result.into())?;
    let macro_name = ctx.options.runtime.op_macro(&op.opname);

    if args.is_empty() {
        out.push(format!("{macro_name}0({result}, {err})"));
        return Ok(());
    }
    if args.len() % per_element != 0 {
        return Err(GenError::OddKeyValueCount {
            op: op.opname.clone(),
            count: args.len(),
        });
    }
    let count = args.len() / per_element;
    out.push(format!(
        "{macro_name}(({count}, {}), {result}, {err})",
        args.join(", ")
    ));
    Ok(())
}

pub(super) fn newlist(ctx: &FnContext<'_>, op: &Operation, err: &str, out: &mut CodeLines) -> GenResult<()> {
    construct(ctx, op, err, out, 1)
}

pub(super) fn newtuple(ctx: &FnContext<'_>, op: &Operation, err: &str, out: &mut CodeLines) -> GenResult<()> {
    construct(ctx, op, err, out, 1)
}

pub(super) fn newdict(ctx: &FnContext<'_>, op: &Operation, err: &str, out: &mut CodeLines) -> GenResult<()> {
    construct(ctx, op, err, out, 2)
}
