//! Flow-graph model: blocks of typed operations linked by edges.
//!
//! # Architecture
//!
//! - **[`FlowGraph`]**: one function: the variable/constant tables, the
//!   block arena, and the designated start, return and exception blocks
//! - **[`Block`]**: input parameters, operations, exit-switch and edges
//! - **[`Operation`]**: opcode name, argument values, one result variable
//! - **[`Link`]**: an edge: target block plus arguments matched
//!   positionally to the target's input parameters
//!
//! The graph is produced upstream and is read-only to code generation.

use smallvec::SmallVec;

use crate::ids::{BlockId, ConstId, Value, VarId};
use crate::types::TypeIdx;

// ── Constants ───────────────────────────────────────────────────────

/// Payload of a literal.
///
/// Floats are stored as raw bits so constants can be hashed and interned.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum ConstValue {
    Int(i64),
    Unsigned(u64),
    Float(u64),
    Bool(bool),
    Char(char),
    Str(String),
    /// The canonical "no payload" object.
    None,
    /// A null pointer.
    Null,
    /// A statically known function, by symbol name.
    Func(String),
    /// A struct field tag (second operand of field access operations).
    Field(String),
    /// An exception class, by name.
    Exception(String),
    /// A type operand (first operand of allocation operations).
    Type(TypeIdx),
}

impl ConstValue {
    pub fn float(value: f64) -> Self {
        ConstValue::Float(value.to_bits())
    }

    /// The symbolic name carried by field, function and string constants.
    pub fn symbol(&self) -> Option<&str> {
        match self {
            ConstValue::Field(s) | ConstValue::Func(s) | ConstValue::Str(s) => Some(s),
            _ => None,
        }
    }
}

/// A named mutable value.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct VarData {
    pub name: String,
    /// Concrete type attached by type inference, if any.
    pub ty: Option<TypeIdx>,
}

/// An immutable literal.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct ConstData {
    pub value: ConstValue,
    pub ty: Option<TypeIdx>,
}

// ── Operations ──────────────────────────────────────────────────────

/// A single operation: `result = opname(args...)`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct Operation {
    pub opname: String,
    pub args: Vec<Value>,
    /// Always present; may be typed `Void`.
    pub result: VarId,
}

// ── Edges ───────────────────────────────────────────────────────────

/// The case an edge is taken on.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum ExitCase {
    /// Unconditional, default, or non-exceptional continuation.
    Default,
    /// Boolean case of a multi-way branch.
    Bool(bool),
    /// Exception edge taken when the raised exception matches this class.
    Exception(String),
}

/// The two values an exception edge binds to the caught exception.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct ExceptionBinding {
    pub class: VarId,
    pub payload: VarId,
}

/// An edge between blocks.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct Link {
    pub target: BlockId,
    /// Matched positionally against `target`'s input parameters.
    pub args: Vec<Value>,
    pub exitcase: ExitCase,
    /// Present on exception edges only.
    pub exc: Option<ExceptionBinding>,
}

// ── Blocks ──────────────────────────────────────────────────────────

/// Selector for a block's outgoing edges.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum ExitSwitch {
    /// Single unconditional edge (or none, for terminal blocks).
    None,
    /// Exception-catching dispatch on the last operation.
    LastException,
    /// Multi-way branch on a boolean-ish value.
    Value(Value),
}

/// A basic block.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct Block {
    pub inputargs: Vec<VarId>,
    pub operations: Vec<Operation>,
    pub exitswitch: ExitSwitch,
    pub exits: Vec<Link>,
}

impl Block {
    pub fn new(inputargs: Vec<VarId>) -> Self {
        Self {
            inputargs,
            operations: Vec::new(),
            exitswitch: ExitSwitch::None,
            exits: Vec::new(),
        }
    }

    /// Terminal blocks have no outgoing edges: one input means an ordinary
    /// return, two inputs an exceptional one.
    #[inline]
    pub fn is_terminal(&self) -> bool {
        self.exits.is_empty()
    }

    /// Edge targets in edge order (with duplicates).
    pub fn successors(&self) -> SmallVec<[BlockId; 4]> {
        self.exits.iter().map(|link| link.target).collect()
    }
}

// ── Graphs ──────────────────────────────────────────────────────────

/// A complete function graph.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct FlowGraph {
    pub name: String,
    /// Variable table, indexed by [`VarId::index`].
    pub vars: Vec<VarData>,
    /// Constant table, indexed by [`ConstId::index`].
    pub consts: Vec<ConstData>,
    /// Block arena, indexed by [`BlockId::index`]. May contain unreachable
    /// blocks; only blocks reachable from `startblock` are generated.
    pub blocks: Vec<Block>,
    pub startblock: BlockId,
    /// Terminal block with one input: the return value.
    pub returnblock: BlockId,
    /// Terminal block with two inputs: exception class and payload.
    pub exceptblock: BlockId,
}

impl FlowGraph {
    #[inline]
    pub fn block(&self, id: BlockId) -> Option<&Block> {
        self.blocks.get(id.index())
    }

    #[inline]
    pub fn var(&self, id: VarId) -> Option<&VarData> {
        self.vars.get(id.index())
    }

    #[inline]
    pub fn constant(&self, id: ConstId) -> Option<&ConstData> {
        self.consts.get(id.index())
    }

    /// The function parameters (the start block's inputs).
    pub fn args(&self) -> &[VarId] {
        match self.block(self.startblock) {
            Some(block) => &block.inputargs,
            None => &[],
        }
    }

    /// The designated return value (the return block's only input).
    pub fn return_var(&self) -> Option<VarId> {
        self.block(self.returnblock)
            .and_then(|block| block.inputargs.first().copied())
    }
}
