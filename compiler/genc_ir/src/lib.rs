//! Flow-graph IR for the genc function code generator.
//!
//! This crate provides:
//!
//! - **Flow graphs** ([`FlowGraph`], [`Block`], [`Operation`], [`Link`]):
//!   a control-flow graph of basic blocks holding typed operations, with
//!   edges carrying arguments to their target's input parameters and an
//!   exit-switch selecting between edges (unconditional, exception dispatch,
//!   or multi-way branch).
//!
//! - **Low-level types** ([`TypePool`], [`TypeIdx`], [`LowType`]): the
//!   concrete types attached to values, with pre-interned indices for the
//!   "no value" type and the managed/non-managed object pointers that untyped
//!   values default to.
//!
//! - **Traversal** ([`BlockOrder`]): the single pass that assigns each
//!   reachable block its emission position.
//!
//! # Design
//!
//! Blocks, variables and constants live in arenas owned by the graph and are
//! referenced by 32-bit ids, so back-edges are plain ids rather than shared
//! pointers. Graphs are built by [`GraphBuilder`] and are read-only to code
//! generation.

pub mod builder;
pub mod graph;
pub mod ids;
pub mod traverse;
pub mod types;

pub use builder::GraphBuilder;
pub use graph::{
    Block, ConstData, ConstValue, ExceptionBinding, ExitCase, ExitSwitch, FlowGraph, Link,
    Operation, VarData,
};
pub use ids::{BlockId, ConstId, Value, VarId};
pub use traverse::BlockOrder;
pub use types::{LowType, StructType, TypeIdx, TypePool, VarsizeLayout};
