//! Control-flow linearization: blocks to a goto-linked function body.
//!
//! Blocks are emitted in traversal order, each behind its label. Inside a
//! block every operation gets the error label for the current owned depth;
//! after the block's exit code a cleanup ladder defines those labels:
//!
//! ```text
//! err3_2:                     <- failure with 2 values owned
//!     release(owned[1]);
//! err3_1:
//!     release(owned[0]);
//! err3_0:
//!     return <error value>;
//! ```
//!
//! so a failure releases exactly what was acquired before it. The ladder's
//! first label needs no release above it when control can only arrive there
//! by a jump; an exception dispatch that falls through makes it reachable.

use genc_ir::{Block, BlockId, ExitCase, ExitSwitch, Link, TypeIdx, Value};
use tracing::trace;

use crate::context::FnContext;
use crate::error::{GenError, GenResult};
use crate::lines::CodeLines;
use crate::refcount::BlockContext;

impl FnContext<'_> {
    /// The whole function body.
    pub fn gen_body(&self) -> GenResult<CodeLines> {
        let mut out = CodeLines::new();

        // Parameters arrive borrowed from the caller.
        for &arg in self.graph.args() {
            out.push_opt(self.incref(arg)?);
        }
        for &id in self.blocks.blocks() {
            self.gen_block(id, &mut out)?;
        }
        Ok(out)
    }

    fn gen_block(&self, id: BlockId, out: &mut CodeLines) -> GenResult<()> {
        let number = self.block_number(id)?;
        let block = self.graph.block(id).ok_or(GenError::UnknownBlock(id))?;
        trace!(
            block = number,
            ops = block.operations.len(),
            exits = block.exits.len(),
            "linearizing block"
        );

        out.blank();
        out.push(format!("{}:", self.options.block_label(number)));

        let mut bctx = BlockContext::new(number, &block.inputargs);
        for op in &block.operations {
            let err = bctx.error_label(self.options);
            self.emit_op(op, &err, out)?;
            bctx.acquire(op.result);
        }

        let err_reachable = if block.is_terminal() {
            self.gen_return(&bctx, block, out)?;
            false
        } else {
            match block.exitswitch {
                ExitSwitch::None => {
                    if block.exits.len() != 1 {
                        return Err(GenError::BadExitCount {
                            block: number,
                            exits: block.exits.len(),
                        });
                    }
                    self.gen_link(&bctx, 0, &block.exits[0], None, out)?;
                    out.blank();
                    false
                }
                ExitSwitch::LastException => self.gen_exception_dispatch(&mut bctx, block, out)?,
                ExitSwitch::Value(selector) => {
                    self.gen_switch(&bctx, selector, &block.exits, out)?;
                    false
                }
            }
        };

        // Without operations no error label can have been referenced.
        if !block.operations.is_empty() {
            self.gen_cleanup_ladder(bctx, err_reachable, out)?;
        }
        Ok(())
    }

    /// Ordinary return (one input) or re-raise (class and payload).
    ///
    /// The inputs leave the function; anything the block's own operations
    /// produced is released first, most recent first.
    fn gen_return(&self, bctx: &BlockContext, block: &Block, out: &mut CodeLines) -> GenResult<()> {
        // The owned set starts with the inputs.
        let produced = &bctx.owned()[block.inputargs.len()..];
        let release_produced = |out: &mut CodeLines| -> GenResult<()> {
            for &var in produced.iter().rev() {
                out.push_opt(self.decref(var)?);
            }
            Ok(())
        };

        match block.inputargs.as_slice() {
            [result] => {
                release_produced(out)?;
                out.push(format!("return {};", self.expr(Value::Var(*result))?));
            }
            [class, payload] => {
                release_produced(out)?;
                let rt = &self.options.runtime;
                out.push(format!(
                    "{}({}, {}, {});",
                    rt.restore,
                    self.expr(Value::Var(*class))?,
                    self.expr(Value::Var(*payload))?,
                    rt.null
                ));
                out.push(format!("return {};", self.error_return_value()?));
            }
            other => {
                return Err(GenError::BadTerminal {
                    block: bctx.number(),
                    inputs: other.len(),
                })
            }
        }
        Ok(())
    }

    /// Catch exceptions raised by the block's last operation.
    ///
    /// The normal continuation comes first. The last operation never produced
    /// its result when it failed, so that result leaves the owned set before
    /// its error label is placed. Then one guard per exception edge, in edge
    /// order; the first matching class wins. Falling out of the guards
    /// propagates the exception, so the error path is reachable.
    fn gen_exception_dispatch(
        &self,
        bctx: &mut BlockContext,
        block: &Block,
        out: &mut CodeLines,
    ) -> GenResult<bool> {
        let number = bctx.number();
        if block.operations.is_empty() {
            return Err(GenError::EmptyExceptionBlock { block: number });
        }
        let Some((normal, handlers)) = block.exits.split_first() else {
            return Err(GenError::BadExitCount {
                block: number,
                exits: 0,
            });
        };
        if normal.exitcase != ExitCase::Default {
            return Err(bad_case(number, 0, "the default case", &normal.exitcase));
        }
        self.gen_link(bctx, 0, normal, None, out)?;
        out.blank();

        bctx.retract();
        out.push(format!("{}:", bctx.error_label(self.options)));
        out.blank();

        let rt = &self.options.runtime;
        let temps = &self.temps;
        let indent = &self.options.indent;
        let obj = self.ctype(TypeIdx::OBJECT_GC)?;

        for (i, link) in handlers.iter().enumerate() {
            let edge = i + 1;
            let ExitCase::Exception(class) = &link.exitcase else {
                return Err(bad_case(number, edge, "an exception class", &link.exitcase));
            };
            let binding = link.exc.ok_or(GenError::MissingExceptionBinding {
                block: number,
                edge,
            })?;
            let identity = self.exceptions.exception_identity(class)?;

            let mut guard = CodeLines::new();
            guard.push(format!(
                "{}; {}; {};",
                obj.declare(&temps.exc_cls),
                obj.declare(&temps.exc_value),
                obj.declare(&temps.exc_tb)
            ));
            guard.push(format!(
                "{}(&{}, &{}, &{});",
                rt.fetch, temps.exc_cls, temps.exc_value, temps.exc_tb
            ));
            guard.push(format!("if ({} == {}) {{", temps.exc_value, rt.null));
            guard.push(format!("{indent}{} = {};", temps.exc_value, rt.none_object));
            guard.push_opt(
                self.registry
                    .incref_stmt(&rt.none_object, TypeIdx::OBJECT_GC)
                    .map(|stmt| format!("{indent}{stmt}")),
            );
            guard.push("}");
            guard.push(format!("{}({});", rt.xdecref, temps.exc_tb));
            self.gen_link(bctx, edge, link, Some(binding), &mut guard)?;

            out.push(format!("if ({}({identity})) {{", rt.exception_matches));
            out.extend_indented(guard, indent);
            out.push("}");
        }
        Ok(true)
    }

    /// Multi-way branch: every edge but the last is tested in order, the
    /// last is the default.
    fn gen_switch(
        &self,
        bctx: &BlockContext,
        selector: Value,
        exits: &[Link],
        out: &mut CodeLines,
    ) -> GenResult<()> {
        let number = bctx.number();
        let Some((default, tested)) = exits.split_last() else {
            return Err(GenError::BadExitCount {
                block: number,
                exits: 0,
            });
        };
        let cond = self.expr(selector)?;

        for (edge, link) in tested.iter().enumerate() {
            let test = match link.exitcase {
                ExitCase::Bool(true) => cond.clone(),
                ExitCase::Bool(false) => format!("!{cond}"),
                ref other => return Err(bad_case(number, edge, "true or false", other)),
            };
            let mut branch = CodeLines::new();
            self.gen_link(bctx, edge, link, None, &mut branch)?;
            out.push(format!("if ({test}) {{"));
            out.extend_indented(branch, &self.options.indent);
            out.push("}");
        }

        if let ExitCase::Exception(_) = default.exitcase {
            return Err(bad_case(
                number,
                tested.len(),
                "true, false or the default case",
                &default.exitcase,
            ));
        }
        self.gen_link(bctx, tested.len(), default, None, out)?;
        out.blank();
        Ok(())
    }

    /// Define the error labels of the block, innermost first.
    fn gen_cleanup_ladder(
        &self,
        mut bctx: BlockContext,
        mut err_reachable: bool,
        out: &mut CodeLines,
    ) -> GenResult<()> {
        while let Some(var) = bctx.retract() {
            if err_reachable {
                out.push_opt(self.decref(var)?);
            }
            out.push(format!("{}:", bctx.error_label(self.options)));
            err_reachable = true;
        }
        if err_reachable {
            out.push(format!("return {};", self.error_return_value()?));
        }
        Ok(())
    }
}

fn bad_case(block: u32, edge: usize, expected: &'static str, found: &ExitCase) -> GenError {
    GenError::BadExitCase {
        block,
        edge,
        expected,
        found: format!("{found:?}"),
    }
}
