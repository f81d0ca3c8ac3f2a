//! Reference registry: C on a CPython-style object runtime.
//!
//! - Managed object pointers use `Py_XINCREF`/`Py_XDECREF`.
//! - Managed struct and array pointers carry an inline `refcount` field and
//!   are freed through a per-type `dealloc_<tag>` function.
//! - Object-typed literals become named prebuilt globals. Identical literals
//!   share one global; the table is behind a lock so a single registry can
//!   serve concurrent generations.

use parking_lot::Mutex;
use rustc_hash::FxHashMap;

use genc_ir::{ConstValue, LowType, TypeIdx, TypePool};

use super::{c_identifier, CDecl, ExceptionResolver, FieldInfo, TypeRegistry};
use crate::error::{GenError, GenResult};

const REFCOUNT_FIELD: &str = "refcount";

#[derive(Default)]
struct PrebuiltTable {
    names: FxHashMap<ConstValue, String>,
    order: Vec<(String, ConstValue)>,
}

/// Registry generating C for a CPython-style runtime.
pub struct CRegistry {
    pool: TypePool,
    prebuilt: Mutex<PrebuiltTable>,
}

impl CRegistry {
    pub fn new(pool: TypePool) -> Self {
        Self {
            pool,
            prebuilt: Mutex::new(PrebuiltTable::default()),
        }
    }

    /// Prebuilt object globals handed out so far, in creation order.
    pub fn prebuilt(&self) -> Vec<(String, ConstValue)> {
        self.prebuilt.lock().order.clone()
    }

    fn prebuilt_name(&self, value: &ConstValue) -> String {
        let mut table = self.prebuilt.lock();
        if let Some(name) = table.names.get(value) {
            return name.clone();
        }
        let name = format!("g_prebuilt_{}", table.order.len());
        table.names.insert(value.clone(), name.clone());
        table.order.push((name.clone(), value.clone()));
        name
    }

    fn get(&self, ty: TypeIdx) -> GenResult<&LowType> {
        self.pool.get(ty).ok_or(GenError::UnknownType(ty))
    }

    /// `struct <tag>` name part for aggregates.
    fn tag(&self, ty: TypeIdx) -> Option<String> {
        match self.pool.get(ty)? {
            LowType::Struct(st) => Some(c_identifier(&st.name)),
            LowType::Array { .. } => Some(format!("array{}", ty.raw())),
            _ => None,
        }
    }

    fn field_name(field: &str) -> String {
        let mut name = c_identifier(field);
        if name == REFCOUNT_FIELD {
            name.push('_');
        }
        name
    }

    fn is_object_pointer(lowty: &LowType) -> bool {
        matches!(lowty, LowType::Ptr { to, .. } if *to == TypeIdx::PYOBJECT)
    }
}

fn signed_literal(n: i64) -> String {
    if n == i64::MIN {
        // `-9223372036854775808L` overflows before negation.
        "(-9223372036854775807L-1)".to_owned()
    } else {
        format!("{n}L")
    }
}

fn float_literal(f: f64) -> String {
    if f.is_nan() {
        "NAN".to_owned()
    } else if f.is_infinite() {
        (if f.is_sign_positive() { "INFINITY" } else { "-INFINITY" }).to_owned()
    } else {
        format!("{f:?}")
    }
}

impl TypeRegistry for CRegistry {
    fn pool(&self) -> &TypePool {
        &self.pool
    }

    fn layout(&self, ty: TypeIdx) -> GenResult<CDecl> {
        let template = match self.get(ty)? {
            LowType::Void => "void @".to_owned(),
            LowType::Bool | LowType::Char => "char @".to_owned(),
            LowType::Signed => "long @".to_owned(),
            LowType::Unsigned => "unsigned long @".to_owned(),
            LowType::Float => "double @".to_owned(),
            LowType::PyObject => "PyObject @".to_owned(),
            LowType::Struct(_) | LowType::Array { .. } => {
                let tag = self.tag(ty).ok_or(GenError::UnknownType(ty))?;
                format!("struct {tag} @")
            }
            LowType::Func { args, result } => {
                let params = if args.is_empty() {
                    "void".to_owned()
                } else {
                    args.iter()
                        .map(|&arg| Ok(self.layout(arg)?.declare("")))
                        .collect::<GenResult<Vec<_>>>()?
                        .join(", ")
                };
                let result = self.layout(*result)?;
                result.template().replacen('@', &format!("@({params})"), 1)
            }
            LowType::Ptr { to, .. } => return Ok(self.layout(*to)?.pointer()),
        };
        Ok(CDecl::new(template))
    }

    fn struct_field(&self, struct_ty: TypeIdx, field: &str) -> GenResult<FieldInfo> {
        let LowType::Struct(st) = self.get(struct_ty)? else {
            return Err(GenError::NotAStruct {
                op: "struct_field".to_owned(),
                ty: struct_ty,
            });
        };
        let ty = st.field(field).ok_or_else(|| GenError::UnknownField {
            ty: struct_ty,
            field: field.to_owned(),
        })?;
        Ok(FieldInfo {
            physical_name: Self::field_name(field),
            ty,
            refcount_field: REFCOUNT_FIELD.to_owned(),
        })
    }

    fn refcount_field(&self, ty: TypeIdx) -> GenResult<String> {
        match self.get(ty)? {
            LowType::Struct(_) | LowType::Array { .. } => Ok(REFCOUNT_FIELD.to_owned()),
            _ => Err(GenError::NotAStruct {
                op: "refcount_field".to_owned(),
                ty,
            }),
        }
    }

    fn literal(&self, value: &ConstValue, ty: TypeIdx) -> GenResult<String> {
        let lowty = self.get(ty)?;
        let text = match (value, lowty) {
            (_, LowType::Void) => "/* nothing */".to_owned(),
            (ConstValue::Int(n), LowType::Signed) => signed_literal(*n),
            (ConstValue::Unsigned(n), LowType::Unsigned) => format!("{n}UL"),
            (ConstValue::Int(n), LowType::Unsigned) if *n >= 0 => format!("{n}UL"),
            (ConstValue::Bool(b), LowType::Bool) => (if *b { "1" } else { "0" }).to_owned(),
            (ConstValue::Char(c), LowType::Char) if u32::from(*c) < 256 => {
                format!("((char) {})", u32::from(*c))
            }
            (ConstValue::Float(bits), LowType::Float) => float_literal(f64::from_bits(*bits)),
            (ConstValue::Null, LowType::Ptr { .. }) => "NULL".to_owned(),
            (ConstValue::Func(name), LowType::Func { .. } | LowType::Ptr { .. }) => {
                c_identifier(name)
            }
            (ConstValue::Exception(name), lowty) if Self::is_object_pointer(lowty) => {
                self.exception_identity(name)?
            }
            (ConstValue::None, lowty) if Self::is_object_pointer(lowty) => "Py_None".to_owned(),
            (ConstValue::Field(_) | ConstValue::Type(_), _) => {
                return Err(GenError::UnrenderableConstant {
                    value: value.clone(),
                    ty,
                })
            }
            (value, lowty) if Self::is_object_pointer(lowty) => self.prebuilt_name(value),
            _ => {
                return Err(GenError::UnrenderableConstant {
                    value: value.clone(),
                    ty,
                })
            }
        };
        Ok(text)
    }

    fn incref_stmt(&self, expr: &str, ty: TypeIdx) -> Option<String> {
        let LowType::Ptr { gc: true, to } = self.pool.get(ty)? else {
            return None;
        };
        if *to == TypeIdx::PYOBJECT {
            return Some(format!("Py_XINCREF({expr});"));
        }
        self.tag(*to)?;
        Some(format!("if ({expr}) {expr}->{REFCOUNT_FIELD}++;"))
    }

    fn decref_stmt(&self, expr: &str, ty: TypeIdx) -> Option<String> {
        let LowType::Ptr { gc: true, to } = self.pool.get(ty)? else {
            return None;
        };
        if *to == TypeIdx::PYOBJECT {
            return Some(format!("Py_XDECREF({expr});"));
        }
        let tag = self.tag(*to)?;
        Some(format!(
            "if ({expr} && --{expr}->{REFCOUNT_FIELD} == 0) dealloc_{tag}({expr});"
        ))
    }

    fn error_value(&self, ty: TypeIdx) -> GenResult<String> {
        let text = match self.get(ty)? {
            LowType::Void => "/* error */",
            LowType::Ptr { .. } => "NULL",
            LowType::Signed => "-1",
            LowType::Unsigned => "((unsigned long) -1)",
            LowType::Float => "-1.0",
            LowType::Bool | LowType::Char => "((char) -1)",
            LowType::PyObject | LowType::Struct(_) | LowType::Array { .. } | LowType::Func { .. } => {
                return Err(GenError::NoErrorValue(ty))
            }
        };
        Ok(text.to_owned())
    }
}

impl ExceptionResolver for CRegistry {
    fn exception_identity(&self, class: &str) -> GenResult<String> {
        Ok(format!("PyExc_{}", c_identifier(class)))
    }
}
