//! Expression resolution: the source text that refers to a value.

use genc_ir::Value;

use crate::context::FnContext;
use crate::error::{GenError, GenResult};

/// Placeholder for references to `Void`-typed variables.
pub const NOTHING: &str = "/* nothing */";

impl FnContext<'_> {
    /// The expression for `value`.
    ///
    /// Variables are referenced by name, except `Void`-typed ones which
    /// have no storage and render as [`NOTHING`]. Literals are spelled by the
    /// registry.
    pub fn expr(&self, value: Value) -> GenResult<String> {
        match value {
            Value::Var(var) => {
                if self.var_type(var)?.is_void() {
                    Ok(NOTHING.to_owned())
                } else {
                    self.var_name(var)
                }
            }
            Value::Const(id) => {
                let data = self
                    .graph
                    .constant(id)
                    .ok_or(GenError::UnknownValue(value))?;
                self.registry.literal(&data.value, self.type_of(value)?)
            }
        }
    }

    pub fn exprs(&self, values: &[Value]) -> GenResult<Vec<String>> {
        values.iter().map(|&v| self.expr(v)).collect()
    }
}

#[cfg(test)]
mod tests;
