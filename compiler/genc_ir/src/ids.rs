//! ID newtypes for the flow-graph arena.
//!
//! Blocks, variables and constants live in per-graph arenas and are
//! referenced everywhere by 32-bit indices. Cross-references between blocks
//! (including back-edges of loops) are plain [`BlockId`]s, never pointers.

use std::fmt;

/// Mutable value (variable) ID within a [`FlowGraph`](crate::FlowGraph).
///
/// IDs are allocated sequentially starting from 0.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
#[repr(transparent)]
pub struct VarId(u32);

impl VarId {
    /// Create a new variable ID from a raw index.
    #[inline]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// Get the raw `u32` value.
    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Get the index as `usize` (for indexing into `Vec`s).
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for VarId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

/// Literal (constant) ID within a [`FlowGraph`](crate::FlowGraph).
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
#[repr(transparent)]
pub struct ConstId(u32);

impl ConstId {
    /// Create a new constant ID from a raw index.
    #[inline]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// Get the raw `u32` value.
    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Get the index as `usize`.
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for ConstId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "c{}", self.0)
    }
}

/// Basic block ID within a [`FlowGraph`](crate::FlowGraph).
///
/// This is the arena slot, not the emitted label number: labels are assigned
/// by [`BlockOrder`](crate::BlockOrder) in traversal order.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
#[repr(transparent)]
pub struct BlockId(u32);

impl BlockId {
    /// Create a new block ID from a raw index.
    #[inline]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// Get the raw `u32` value.
    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Get the index as `usize`.
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "B{}", self.0)
    }
}

/// A value referenced by the graph: a mutable variable or a literal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum Value {
    Var(VarId),
    Const(ConstId),
}

impl Value {
    /// The variable behind this value, if it is one.
    #[inline]
    pub fn as_var(self) -> Option<VarId> {
        match self {
            Value::Var(v) => Some(v),
            Value::Const(_) => None,
        }
    }

    /// The constant behind this value, if it is one.
    #[inline]
    pub fn as_const(self) -> Option<ConstId> {
        match self {
            Value::Const(c) => Some(c),
            Value::Var(_) => None,
        }
    }

    #[inline]
    pub fn is_var(self) -> bool {
        matches!(self, Value::Var(_))
    }
}

impl From<VarId> for Value {
    fn from(v: VarId) -> Self {
        Value::Var(v)
    }
}

impl From<ConstId> for Value {
    fn from(c: ConstId) -> Self {
        Value::Const(c)
    }
}

#[cfg(test)]
mod tests;
