//! Function-level C code generation for the genc backend.
//!
//! This crate lowers one [`FlowGraph`](genc_ir::FlowGraph) at a time into
//! goto-linked C that follows a manual reference-counting protocol and
//! propagates exceptions through error labels:
//!
//! - **Type resolution** ([`TypeMap`]): every referenced value gets a
//!   concrete type, defaulting to object pointers.
//! - **Expressions**: values render as names or registry-spelled literals.
//! - **Operations** ([`OpTable`]): opcode to handler dispatch with a generic
//!   fixed-arity macro path.
//! - **Reference counting** ([`BlockContext`], [`plan_transfer`]): owned
//!   values are transferred or released on every path out of a block.
//! - **Linearization**: labels, edge transfers, exception dispatch,
//!   branches and the per-block cleanup ladder.
//!
//! Layouts, literals and refcount statements come from a [`TypeRegistry`];
//! [`CRegistry`] targets a CPython-style object runtime.
//!
//! # Entry points
//!
//! [`FunctionCodeGenerator`] for one function, [`generate_module`] for many
//! functions in parallel. Assembly into a translation unit (signatures,
//! includes, prebuilt globals) is left to the caller.

mod context;
mod error;
mod expr;
mod function;
mod lines;
mod linearize;
mod module;
mod ops;
mod options;
mod refcount;
mod registry;
mod typemap;

#[cfg(test)]
mod test_helpers;

use std::sync::Once;

pub use context::{FnContext, TempNames};
pub use error::{GenError, GenResult};
pub use expr::NOTHING;
pub use function::{FunctionCode, FunctionCodeGenerator};
pub use lines::CodeLines;
pub use module::generate_module;
pub use ops::{generic as generic_op, OpHandler, OpTable};
pub use options::{CodegenOptions, RuntimeNames};
pub use refcount::{
    plan_transfer, BlockContext, EdgeArg, EdgeParam, Holding, Move, MoveKind, TransferPlan,
};
pub use registry::{c_identifier, CDecl, CRegistry, ExceptionResolver, FieldInfo, TypeRegistry};
pub use typemap::TypeMap;

static TRACING_INIT: Once = Once::new();

/// Install a `tracing` subscriber filtered by `RUST_LOG`.
///
/// Does nothing unless `RUST_LOG` is set; safe to call more than once.
///
/// ```bash
/// RUST_LOG=genc_codegen=debug my-compiler input.py
/// RUST_LOG=genc_codegen::refcount=trace my-compiler input.py
/// ```
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .init();
        }
    });
}
