//! Type/value registry contracts.
//!
//! The generator never decides on its own how a type is laid out, how a
//! literal is spelled, or how a reference count is adjusted. It asks a
//! [`TypeRegistry`]. One registry is shared read-only by every function
//! generated from the same program, possibly from several threads at once,
//! so both traits require `Sync`.
//!
//! [`CRegistry`] is the reference implementation targeting C on top of a
//! CPython-style object runtime.

mod c;

use genc_ir::{ConstValue, TypeIdx, TypePool};

use crate::error::GenResult;

pub use c::CRegistry;

/// A C declarator template.
///
/// The template holds one `@` where the declared name goes, so that
/// pointer-to-function and array declarators compose:
/// `long @` declares `long x`, `long (*@)(long)` declares a function pointer.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CDecl(String);

impl CDecl {
    pub fn new(template: impl Into<String>) -> Self {
        Self(template.into())
    }

    pub fn template(&self) -> &str {
        &self.0
    }

    /// Declare `name` with this type (`name` may be empty for casts/sizeof).
    pub fn declare(&self, name: &str) -> String {
        self.0.replace('@', name).trim().to_owned()
    }

    /// The declarator of a pointer to this type.
    pub fn pointer(&self) -> CDecl {
        if self.0.contains("@(") {
            CDecl(self.0.replacen('@', "(*@)", 1))
        } else {
            CDecl(self.0.replacen('@', "*@", 1))
        }
    }
}

/// Physical layout facts about one struct field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldInfo {
    /// The field's name in the generated struct.
    pub physical_name: String,
    /// The field's declared type.
    pub ty: TypeIdx,
    /// The owning struct's reference-count field.
    pub refcount_field: String,
}

/// Maps low-level types and literals to target text.
pub trait TypeRegistry: Sync {
    /// The pool all [`TypeIdx`] values given to this registry refer to.
    fn pool(&self) -> &TypePool;

    /// The declarator for values of type `ty`.
    fn layout(&self, ty: TypeIdx) -> GenResult<CDecl>;

    /// Resolve field `field` of struct `struct_ty`.
    fn struct_field(&self, struct_ty: TypeIdx, field: &str) -> GenResult<FieldInfo>;

    /// The reference-count field of a struct or array type.
    fn refcount_field(&self, ty: TypeIdx) -> GenResult<String>;

    /// The expression for a literal of type `ty`. Identical literals may
    /// share one representation.
    fn literal(&self, value: &ConstValue, ty: TypeIdx) -> GenResult<String>;

    /// Statement taking a new reference to `expr`, or `None` if values of
    /// type `ty` are not reference counted.
    fn incref_stmt(&self, expr: &str, ty: TypeIdx) -> Option<String>;

    /// Statement releasing a reference to `expr`, or `None` if values of
    /// type `ty` are not reference counted.
    fn decref_stmt(&self, expr: &str, ty: TypeIdx) -> Option<String>;

    /// The value a function returning `ty` returns to signal an exception.
    fn error_value(&self, ty: TypeIdx) -> GenResult<String>;

    /// Whether values of `ty` take part in reference counting.
    ///
    /// The "no value" type never does.
    fn needs_refcount(&self, ty: TypeIdx) -> bool {
        !ty.is_void() && self.incref_stmt("x", ty).is_some()
    }
}

/// Maps an exception class to the runtime expression identifying it.
pub trait ExceptionResolver: Sync {
    fn exception_identity(&self, class: &str) -> GenResult<String>;
}

const C_KEYWORDS: &[&str] = &[
    "auto", "break", "case", "char", "const", "continue", "default", "do", "double", "else",
    "enum", "extern", "float", "for", "goto", "if", "inline", "int", "long", "register",
    "restrict", "return", "short", "signed", "sizeof", "static", "struct", "switch", "typedef",
    "union", "unsigned", "void", "volatile", "while",
];

/// Turn an arbitrary name into a valid C identifier. Keywords get a
/// trailing `_`.
pub fn c_identifier(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 1);
    for (i, ch) in name.chars().enumerate() {
        if i == 0 && ch.is_ascii_digit() {
            out.push('_');
        }
        if ch.is_ascii_alphanumeric() || ch == '_' {
            out.push(ch);
        } else {
            out.push('_');
        }
    }
    if out.is_empty() || C_KEYWORDS.contains(&out.as_str()) {
        out.push('_');
    }
    out
}
