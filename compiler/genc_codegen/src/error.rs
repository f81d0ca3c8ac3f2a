//! Generator-internal errors.
//!
//! Every variant describes a malformed graph (or a registry that cannot
//! describe a type the graph uses). Generation stops at the first one rather
//! than emitting plausible-looking but incorrect code.

use genc_ir::{BlockId, ConstValue, TypeIdx, Value};

/// Result type for code generation.
pub type GenResult<T> = Result<T, GenError>;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum GenError {
    #[error("expr({0:?}): not a variable or constant of this graph")]
    UnknownValue(Value),

    #[error("jump to {0:?}, which is not a reachable block")]
    UnknownBlock(BlockId),

    #[error(
        "block{block}: edge {edge} passes {args} arguments to a block with {params} parameters"
    )]
    EdgeArity {
        block: u32,
        edge: usize,
        args: usize,
        params: usize,
    },

    #[error(
        "block{block}: `{value}` is not owned here and its type {from:?} differs from the \
         target parameter type {to:?}"
    )]
    TransferTypeMismatch {
        block: u32,
        value: String,
        from: TypeIdx,
        to: TypeIdx,
    },

    #[error("block{block}: terminal block must have 1 or 2 input parameters, found {inputs}")]
    BadTerminal { block: u32, inputs: usize },

    #[error("block{block}: block without exit-switch must have exactly one edge, found {exits}")]
    BadExitCount { block: u32, exits: usize },

    #[error("block{block}: edge {edge} has exit case {found}, expected {expected}")]
    BadExitCase {
        block: u32,
        edge: usize,
        expected: &'static str,
        found: String,
    },

    #[error("block{block}: exception dispatch on a block with no operations")]
    EmptyExceptionBlock { block: u32 },

    #[error("block{block}: exception edge {edge} does not bind the caught exception")]
    MissingExceptionBinding { block: u32, edge: usize },

    #[error("{op}: missing operand {index}")]
    MissingOperand { op: String, index: usize },

    #[error("{op}: operand {index} must be a constant")]
    NonConstantOperand { op: String, index: usize },

    #[error("{op}: operand type {ty:?} is not a pointer")]
    NotAPointer { op: String, ty: TypeIdx },

    #[error("{op}: type {ty:?} is not a struct")]
    NotAStruct { op: String, ty: TypeIdx },

    #[error("{op}: type {ty:?} has no variable-sized array part")]
    NotVarsize { op: String, ty: TypeIdx },

    #[error("struct {ty:?} has no field `{field}`")]
    UnknownField { ty: TypeIdx, field: String },

    #[error("{op}: expected an even number of key/value arguments, found {count}")]
    OddKeyValueCount { op: String, count: usize },

    #[error("type {0:?} is not in the type pool")]
    UnknownType(TypeIdx),

    #[error("type {0:?} has no error sentinel")]
    NoErrorValue(TypeIdx),

    #[error("constant {value:?} cannot be rendered as {ty:?}")]
    UnrenderableConstant { value: ConstValue, ty: TypeIdx },
}
