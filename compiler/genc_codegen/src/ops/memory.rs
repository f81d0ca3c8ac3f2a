//! Struct field access, array access and allocation.

use genc_ir::Operation;

use super::{operand, pointee, symbol_operand};
use crate::context::FnContext;
use crate::error::{GenError, GenResult};
use crate::lines::CodeLines;

/// `result = base->field;` (or `&base->field`), then an increment of the
/// result when its type is reference counted.
fn read_field(ctx: &FnContext<'_>, op: &Operation, out: &mut CodeLines, address_of: bool) -> GenResult<()> {
    let base = operand(op, 0)?;
    let struct_ty = pointee(ctx, op, base)?;
    let field = ctx
        .registry
        .struct_field(struct_ty, symbol_operand(ctx, op, 1)?)?;

    let result = ctx.expr(op.result.into())?;
    let amp = if address_of { "&" } else { "" };
    out.push(format!(
        "{result} = {amp}{}->{};",
        ctx.expr(base)?,
        field.physical_name
    ));
    out.push_opt(ctx.incref(op.result)?);
    Ok(())
}

pub(super) fn getfield(ctx: &FnContext<'_>, op: &Operation, _err: &str, out: &mut CodeLines) -> GenResult<()> {
    read_field(ctx, op, out, false)
}

pub(super) fn getsubstruct(ctx: &FnContext<'_>, op: &Operation, _err: &str, out: &mut CodeLines) -> GenResult<()> {
    read_field(ctx, op, out, true)
}

/// Overwrite a field. A reference-counted field keeps the old value in a
/// scoped temporary until the new one has been stored and incremented.
pub(super) fn setfield(ctx: &FnContext<'_>, op: &Operation, _err: &str, out: &mut CodeLines) -> GenResult<()> {
    let base = operand(op, 0)?;
    let struct_ty = pointee(ctx, op, base)?;
    let field = ctx
        .registry
        .struct_field(struct_ty, symbol_operand(ctx, op, 1)?)?;
    let new_value = ctx.expr(operand(op, 2)?)?;
    let slot = format!("{}->{}", ctx.expr(base)?, field.physical_name);
    let store = format!("{slot} = {new_value};");

    if !ctx.needs_refcount(field.ty) {
        out.push(store);
        return Ok(());
    }

    let prev = &ctx.temps.prev;
    let indent = &ctx.options.indent;
    let mut scoped = CodeLines::new();
    scoped.push(format!("{} = {slot};", ctx.ctype(field.ty)?.declare(prev)));
    scoped.push(store);
    scoped.push_opt(ctx.registry.incref_stmt(&new_value, field.ty));
    scoped.push_opt(
        ctx.decref_expr(prev, field.ty)
            .map(|stmt| format!("if ({prev}) {stmt}")),
    );

    out.push("{");
    out.extend_indented(scoped, indent);
    out.push("}");
    Ok(())
}

/// `result = base->items + index;` (an address, not a load).
pub(super) fn getarrayitem(ctx: &FnContext<'_>, op: &Operation, _err: &str, out: &mut CodeLines) -> GenResult<()> {
    let base = ctx.expr(operand(op, 0)?)?;
    let index = ctx.expr(operand(op, 1)?)?;
    let result = ctx.expr(op.result.into())?;
    out.push(format!("{result} = {base}->items + {index};"));
    Ok(())
}

pub(super) fn getarraysize(ctx: &FnContext<'_>, op: &Operation, _err: &str, out: &mut CodeLines) -> GenResult<()> {
    let base = ctx.expr(operand(op, 0)?)?;
    let result = ctx.expr(op.result.into())?;
    out.push(format!("{result} = {base}->length;"));
    Ok(())
}

/// Zeroing allocation of the result's pointee, born with one reference.
pub(super) fn malloc(ctx: &FnContext<'_>, op: &Operation, err: &str, out: &mut CodeLines) -> GenResult<()> {
    let target = pointee(ctx, op, op.result.into())?;
    let result = ctx.expr(op.result.into())?;
    out.push(format!(
        "{}(sizeof({}), {result}, {err})",
        ctx.options.runtime.zero_malloc,
        ctx.ctype(target)?.declare("")
    ));
    out.push(format!(
        "{result}->{} = 1;",
        ctx.registry.refcount_field(target)?
    ));
    Ok(())
}

/// Zeroing allocation with `n` array items (operand 1).
///
/// The size counts one item inside the base layout, so the extra space is
/// `(n-1)` items. Both the length header and the reference count are set.
pub(super) fn malloc_varsize(ctx: &FnContext<'_>, op: &Operation, err: &str, out: &mut CodeLines) -> GenResult<()> {
    let target = pointee(ctx, op, op.result.into())?;
    let pool = ctx.registry.pool();
    let layout = pool
        .varsize_layout(target)
        .ok_or_else(|| GenError::NotVarsize {
            op: op.opname.clone(),
            ty: target,
        })?;
    let length = ctx.expr(operand(op, 1)?)?;
    let result = ctx.expr(op.result.into())?;

    let size = format!(
        "sizeof({})+(({length}-1)*sizeof({}))",
        ctx.ctype(target)?.declare(""),
        ctx.ctype(layout.item)?.declare("")
    );
    out.push(format!(
        "{}({size}, {result}, {err})",
        ctx.options.runtime.zero_malloc
    ));

    let length_slot = match layout.array_field {
        Some(name) => {
            let field = ctx.registry.struct_field(target, name)?;
            format!("{result}->{}.length", field.physical_name)
        }
        None => format!("{result}->length"),
    };
    out.push(format!("{length_slot} = {length};"));
    out.push(format!(
        "{result}->{} = 1;",
        ctx.registry.refcount_field(target)?
    ));
    Ok(())
}
