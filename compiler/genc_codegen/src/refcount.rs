//! Reference-count bookkeeping.
//!
//! Every value a block produces (its parameters, then each operation result in
//! program order) is owned by the block from the moment it exists. On every
//! path out of the block each owned value is either transferred to exactly one
//! edge parameter or released.
//!
//! [`BlockContext`] tracks the owned set while a block is generated; its
//! depth also names the error label of the next failure point.
//! [`plan_transfer`] decides, for one edge, which values move, which are
//! shared (and need an increment), and which are released.

use genc_ir::{ExceptionBinding, Link, TypeIdx, Value, VarId};
use tracing::trace;

use crate::context::FnContext;
use crate::error::{GenError, GenResult};
use crate::lines::CodeLines;
use crate::options::CodegenOptions;

// Statements

impl FnContext<'_> {
    /// Whether values of `ty` take part in reference counting.
    #[inline]
    pub fn needs_refcount(&self, ty: TypeIdx) -> bool {
        self.registry.needs_refcount(ty)
    }

    /// Increment statement for a variable, if its type needs one.
    pub fn incref(&self, var: VarId) -> GenResult<Option<String>> {
        let ty = self.var_type(var)?;
        if ty.is_void() {
            return Ok(None);
        }
        Ok(self.registry.incref_stmt(&self.var_name(var)?, ty))
    }

    /// Release statement for `expr` of type `ty`, if its type needs one.
    pub fn decref_expr(&self, expr: &str, ty: TypeIdx) -> Option<String> {
        if ty.is_void() {
            return None;
        }
        self.registry.decref_stmt(expr, ty)
    }

    pub fn decref(&self, var: VarId) -> GenResult<Option<String>> {
        let ty = self.var_type(var)?;
        Ok(self.decref_expr(&self.var_name(var)?, ty))
    }
}

// Per-block owned set

/// Mutable state of the block being generated.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BlockContext {
    number: u32,
    /// Owned values in acquisition order.
    owned: Vec<VarId>,
}

impl BlockContext {
    /// A block starts out owning its input parameters.
    pub fn new(number: u32, inputargs: &[VarId]) -> Self {
        Self {
            number,
            owned: inputargs.to_vec(),
        }
    }

    #[inline]
    pub fn number(&self) -> u32 {
        self.number
    }

    pub fn acquire(&mut self, var: VarId) {
        self.owned.push(var);
    }

    /// Drop the most recent acquisition without releasing it.
    pub fn retract(&mut self) -> Option<VarId> {
        self.owned.pop()
    }

    pub fn owned(&self) -> &[VarId] {
        &self.owned
    }

    #[inline]
    pub fn depth(&self) -> usize {
        self.owned.len()
    }

    /// The label a failure at the current depth jumps to.
    pub fn error_label(&self, options: &CodegenOptions) -> String {
        options.error_label(self.number, self.owned.len())
    }
}

// Edge transfer

/// A value the exiting block is responsible for.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Holding {
    pub value: Value,
    /// How the value is referenced at the exit. Differs from the value's own
    /// expression for fetched exception state.
    pub expr: String,
    pub ty: TypeIdx,
}

/// One edge argument.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EdgeArg {
    pub value: Value,
    pub expr: String,
    pub ty: TypeIdx,
}

/// One target block parameter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EdgeParam {
    pub expr: String,
    pub ty: TypeIdx,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MoveKind {
    /// The block's reference moves to the parameter.
    Transfer,
    /// The parameter takes a new reference of its own.
    Share,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Move {
    pub param: EdgeParam,
    pub source: String,
    pub kind: MoveKind,
}

/// Everything an edge does before its jump.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TransferPlan {
    pub moves: Vec<Move>,
    /// Holdings not transferred, most recent first.
    pub releases: Vec<Holding>,
}

/// Match edge arguments to target parameters.
///
/// An argument that is held and not yet transferred moves without an
/// increment. Any other argument must already have the parameter's type and
/// is shared. `Void` parameters are skipped. Holdings left over are released
/// in reverse acquisition order.
pub fn plan_transfer(
    block: u32,
    holdings: &[Holding],
    args: &[EdgeArg],
    params: &[EdgeParam],
) -> GenResult<TransferPlan> {
    let mut transferred = vec![false; holdings.len()];
    let mut moves = Vec::with_capacity(params.len());

    for (arg, param) in args.iter().zip(params) {
        if param.ty.is_void() {
            continue;
        }
        let held = holdings.iter().position(|h| h.value == arg.value);
        let (source, from, kind) = match held {
            Some(i) if !transferred[i] => {
                transferred[i] = true;
                (holdings[i].expr.clone(), holdings[i].ty, MoveKind::Transfer)
            }
            Some(i) => (holdings[i].expr.clone(), holdings[i].ty, MoveKind::Share),
            None => (arg.expr.clone(), arg.ty, MoveKind::Share),
        };
        if kind == MoveKind::Share && from != param.ty {
            return Err(GenError::TransferTypeMismatch {
                block,
                value: source,
                from,
                to: param.ty,
            });
        }
        moves.push(Move {
            param: param.clone(),
            source,
            kind,
        });
    }

    let releases = holdings
        .iter()
        .zip(&transferred)
        .rev()
        .filter(|&(_, &moved)| !moved)
        .map(|(h, _)| h.clone())
        .collect();

    Ok(TransferPlan { moves, releases })
}

impl FnContext<'_> {
    /// Emit the transfer code and jump for `link`, the `edge`-th exit of the
    /// block in `bctx`.
    ///
    /// `caught` names the fetched exception state bound by an exception edge;
    /// it is held in addition to the block's owned values.
    pub fn gen_link(
        &self,
        bctx: &BlockContext,
        edge: usize,
        link: &Link,
        caught: Option<ExceptionBinding>,
        out: &mut CodeLines,
    ) -> GenResult<()> {
        let target = self
            .graph
            .block(link.target)
            .ok_or(GenError::UnknownBlock(link.target))?;
        let label = self.block_label(link.target)?;
        if link.args.len() != target.inputargs.len() {
            return Err(GenError::EdgeArity {
                block: bctx.number(),
                edge,
                args: link.args.len(),
                params: target.inputargs.len(),
            });
        }

        let mut holdings = bctx
            .owned()
            .iter()
            .map(|&var| {
                Ok(Holding {
                    value: Value::Var(var),
                    expr: self.expr(Value::Var(var))?,
                    ty: self.var_type(var)?,
                })
            })
            .collect::<GenResult<Vec<_>>>()?;
        if let Some(binding) = caught {
            holdings.push(Holding {
                value: Value::Var(binding.class),
                expr: self.temps.exc_cls.clone(),
                ty: TypeIdx::OBJECT_GC,
            });
            holdings.push(Holding {
                value: Value::Var(binding.payload),
                expr: self.temps.exc_value.clone(),
                ty: TypeIdx::OBJECT_GC,
            });
        }

        let args = link
            .args
            .iter()
            .map(|&value| {
                Ok(EdgeArg {
                    value,
                    expr: self.expr(value)?,
                    ty: self.type_of(value)?,
                })
            })
            .collect::<GenResult<Vec<_>>>()?;
        let params = target
            .inputargs
            .iter()
            .map(|&var| {
                Ok(EdgeParam {
                    expr: self.expr(Value::Var(var))?,
                    ty: self.var_type(var)?,
                })
            })
            .collect::<GenResult<Vec<_>>>()?;

        let plan = plan_transfer(bctx.number(), &holdings, &args, &params)?;
        trace!(
            block = bctx.number(),
            target = %label,
            moves = plan.moves.len(),
            releases = plan.releases.len(),
            "edge transfer"
        );

        for mv in &plan.moves {
            out.push(format!("{} = {};", mv.param.expr, mv.source));
            if mv.kind == MoveKind::Share {
                out.push_opt(self.registry.incref_stmt(&mv.param.expr, mv.param.ty));
            }
        }
        for held in &plan.releases {
            out.push_opt(self.decref_expr(&held.expr, held.ty));
        }
        out.push(format!("goto {label};"));
        Ok(())
    }
}
