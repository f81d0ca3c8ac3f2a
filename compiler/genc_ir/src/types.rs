//! Low-level type pool.
//!
//! Every value in a flow graph carries (or defaults to) a concrete low-level
//! type. Types are interned into a [`TypePool`] and referenced by [`TypeIdx`],
//! so type equality during code generation is an index comparison.
//!
//! # Pre-interned types
//!
//! The first indices are fixed at pool creation:
//!
//! | index | type                                   |
//! |-------|----------------------------------------|
//! | 0     | `Void` ("no value")                    |
//! | 1-5   | `Bool`, `Char`, `Signed`, `Unsigned`, `Float` |
//! | 6     | `PyObject` (opaque object header)      |
//! | 7     | managed pointer to `PyObject`          |
//! | 8     | non-managed pointer to `PyObject`      |
//!
//! Structs are nominal: interning a struct with an already-known name returns
//! the existing index. Recursive structs are built with
//! [`TypePool::declare_struct`] followed by [`TypePool::define_struct`].

use std::fmt;

use rustc_hash::FxHashMap;

/// A 32-bit index into the [`TypePool`].
#[derive(Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
#[repr(transparent)]
pub struct TypeIdx(u32);

impl TypeIdx {
    /// The "no value" type. Values of this type are never materialized.
    pub const VOID: Self = Self(0);
    pub const BOOL: Self = Self(1);
    pub const CHAR: Self = Self(2);
    pub const SIGNED: Self = Self(3);
    pub const UNSIGNED: Self = Self(4);
    pub const FLOAT: Self = Self(5);
    /// The opaque object type (only ever used behind a pointer).
    pub const PYOBJECT: Self = Self(6);
    /// Managed (reference-counted) pointer to an object. Default type of
    /// untyped mutable values.
    pub const OBJECT_GC: Self = Self(7);
    /// Non-managed pointer to an object. Default type of untyped literals.
    pub const OBJECT_RAW: Self = Self(8);

    /// Number of pre-interned types.
    pub const PRIMITIVE_COUNT: u32 = 9;

    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    #[inline]
    pub const fn is_void(self) -> bool {
        self.0 == Self::VOID.0
    }

    #[inline]
    pub const fn is_primitive(self) -> bool {
        self.0 < Self::PRIMITIVE_COUNT
    }

    /// Human-readable name of a pre-interned type.
    pub const fn name(self) -> Option<&'static str> {
        match self.0 {
            0 => Some("Void"),
            1 => Some("Bool"),
            2 => Some("Char"),
            3 => Some("Signed"),
            4 => Some("Unsigned"),
            5 => Some("Float"),
            6 => Some("PyObject"),
            7 => Some("GcPtr(PyObject)"),
            8 => Some("NonGcPtr(PyObject)"),
            _ => None,
        }
    }
}

impl fmt::Debug for TypeIdx {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "TypeIdx::{name}"),
            None => write!(f, "TypeIdx({})", self.0),
        }
    }
}

/// A nominal struct type.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct StructType {
    pub name: String,
    /// Fields in declaration order. A trailing field of array type is stored
    /// inline, making the struct variable-sized.
    pub fields: Vec<(String, TypeIdx)>,
}

impl StructType {
    pub fn field(&self, name: &str) -> Option<TypeIdx> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|&(_, ty)| ty)
    }
}

/// A low-level type.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum LowType {
    Void,
    Bool,
    Char,
    Signed,
    Unsigned,
    Float,
    PyObject,
    Struct(StructType),
    /// Variable-sized array with a `length` header and inline `items`.
    Array {
        item: TypeIdx,
    },
    Func {
        args: Vec<TypeIdx>,
        result: TypeIdx,
    },
    /// Pointer; `gc` pointers participate in reference counting.
    Ptr {
        gc: bool,
        to: TypeIdx,
    },
}

/// Layout facts for variable-sized allocation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VarsizeLayout<'a> {
    /// The inline array field name, or `None` when the type is itself an array.
    pub array_field: Option<&'a str>,
    /// The array type.
    pub array: TypeIdx,
    /// The array's item type.
    pub item: TypeIdx,
}

/// Interning pool for low-level types.
#[derive(Clone, Debug)]
pub struct TypePool {
    types: Vec<LowType>,
    structural: FxHashMap<LowType, TypeIdx>,
    structs: FxHashMap<String, TypeIdx>,
}

impl Default for TypePool {
    fn default() -> Self {
        Self::new()
    }
}

impl TypePool {
    /// Create a pool holding the pre-interned types.
    pub fn new() -> Self {
        let mut pool = Self {
            types: Vec::with_capacity(64),
            structural: FxHashMap::default(),
            structs: FxHashMap::default(),
        };
        let pre = [
            LowType::Void,
            LowType::Bool,
            LowType::Char,
            LowType::Signed,
            LowType::Unsigned,
            LowType::Float,
            LowType::PyObject,
            LowType::Ptr {
                gc: true,
                to: TypeIdx::PYOBJECT,
            },
            LowType::Ptr {
                gc: false,
                to: TypeIdx::PYOBJECT,
            },
        ];
        for ty in pre {
            pool.push(ty);
        }
        debug_assert_eq!(pool.types.len(), TypeIdx::PRIMITIVE_COUNT as usize);
        pool
    }

    fn push(&mut self, ty: LowType) -> TypeIdx {
        let idx = TypeIdx(
            u32::try_from(self.types.len())
                .unwrap_or_else(|_| panic!("type count exceeds u32::MAX")),
        );
        match &ty {
            LowType::Struct(st) => {
                self.structs.insert(st.name.clone(), idx);
            }
            other => {
                self.structural.insert(other.clone(), idx);
            }
        }
        self.types.push(ty);
        idx
    }

    /// Intern a type, returning the existing index if already present.
    pub fn intern(&mut self, ty: LowType) -> TypeIdx {
        let existing = match &ty {
            LowType::Struct(st) => self.structs.get(&st.name),
            other => self.structural.get(other),
        };
        match existing {
            Some(&idx) => idx,
            None => self.push(ty),
        }
    }

    /// Reserve a struct by name with no fields yet (for recursive structs).
    pub fn declare_struct(&mut self, name: &str) -> TypeIdx {
        self.intern(LowType::Struct(StructType {
            name: name.to_owned(),
            fields: Vec::new(),
        }))
    }

    /// Fill in the fields of a declared struct.
    ///
    /// Returns `false` if `idx` is not a struct.
    pub fn define_struct(&mut self, idx: TypeIdx, fields: Vec<(String, TypeIdx)>) -> bool {
        match self.types.get_mut(idx.index()) {
            Some(LowType::Struct(st)) => {
                st.fields = fields;
                true
            }
            _ => false,
        }
    }

    /// Intern a struct with the given fields.
    pub fn struct_type(&mut self, name: &str, fields: Vec<(&str, TypeIdx)>) -> TypeIdx {
        let idx = self.declare_struct(name);
        let fields = fields
            .into_iter()
            .map(|(field, ty)| (field.to_owned(), ty))
            .collect();
        self.define_struct(idx, fields);
        idx
    }

    pub fn gc_ptr(&mut self, to: TypeIdx) -> TypeIdx {
        self.intern(LowType::Ptr { gc: true, to })
    }

    pub fn raw_ptr(&mut self, to: TypeIdx) -> TypeIdx {
        self.intern(LowType::Ptr { gc: false, to })
    }

    pub fn array(&mut self, item: TypeIdx) -> TypeIdx {
        self.intern(LowType::Array { item })
    }

    pub fn func(&mut self, args: Vec<TypeIdx>, result: TypeIdx) -> TypeIdx {
        self.intern(LowType::Func { args, result })
    }

    /// Look up a type by index.
    #[inline]
    pub fn get(&self, idx: TypeIdx) -> Option<&LowType> {
        self.types.get(idx.index())
    }

    /// The target of a pointer type.
    pub fn pointee(&self, idx: TypeIdx) -> Option<TypeIdx> {
        match self.get(idx)? {
            LowType::Ptr { to, .. } => Some(*to),
            _ => None,
        }
    }

    /// Whether `idx` is a managed (reference-counted) pointer.
    pub fn is_gc_pointer(&self, idx: TypeIdx) -> bool {
        matches!(self.get(idx), Some(LowType::Ptr { gc: true, .. }))
    }

    pub fn as_struct(&self, idx: TypeIdx) -> Option<&StructType> {
        match self.get(idx)? {
            LowType::Struct(st) => Some(st),
            _ => None,
        }
    }

    /// Resolve the variable-sized part of `idx`: either the array itself, or
    /// the trailing inline array field of a struct.
    pub fn varsize_layout(&self, idx: TypeIdx) -> Option<VarsizeLayout<'_>> {
        match self.get(idx)? {
            LowType::Array { item } => Some(VarsizeLayout {
                array_field: None,
                array: idx,
                item: *item,
            }),
            LowType::Struct(st) => {
                let (name, array) = st.fields.last()?;
                match self.get(*array)? {
                    LowType::Array { item } => Some(VarsizeLayout {
                        array_field: Some(name.as_str()),
                        array: *array,
                        item: *item,
                    }),
                    _ => None,
                }
            }
            _ => None,
        }
    }

    /// Number of interned types.
    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

#[cfg(test)]
mod tests;
