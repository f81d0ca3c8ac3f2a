//! Code generation options.
//!
//! Label naming, indentation, the runtime API the generated code calls into,
//! and the opcode dispatch table. [`CodegenOptions::default`] targets a
//! CPython-style object runtime.

use crate::ops::{OpHandler, OpTable};

/// Names of the runtime entry points referenced by generated code.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RuntimeNames {
    /// `match(class)`: does the pending exception match `class`?
    pub exception_matches: String,
    /// `fetch(&cls, &value, &tb)`: take ownership of the pending exception.
    pub fetch: String,
    /// `restore(cls, value, tb)`: re-raise, stealing the references.
    pub restore: String,
    /// `occurred()`: is an exception pending?
    pub occurred: String,
    /// Null-tolerant release, used for the fetched traceback.
    pub xdecref: String,
    /// The canonical "no payload" object.
    pub none_object: String,
    /// Failure macro: `FAIL(label)` jumps to `label`.
    pub fail: String,
    /// Zeroing allocator macro: `ALLOC(size, result, label)`.
    pub zero_malloc: String,
    /// Prefix of the per-opcode macros (`OP_` + upper-cased opcode).
    pub macro_prefix: String,
    pub null: String,
}

impl Default for RuntimeNames {
    fn default() -> Self {
        Self {
            exception_matches: "PyErr_ExceptionMatches".to_owned(),
            fetch: "PyErr_Fetch".to_owned(),
            restore: "PyErr_Restore".to_owned(),
            occurred: "PyErr_Occurred".to_owned(),
            xdecref: "Py_XDECREF".to_owned(),
            none_object: "Py_None".to_owned(),
            fail: "FAIL".to_owned(),
            zero_malloc: "OP_ZERO_MALLOC".to_owned(),
            macro_prefix: "OP_".to_owned(),
            null: "NULL".to_owned(),
        }
    }
}

impl RuntimeNames {
    /// The macro implementing an opcode on the generic path.
    pub fn op_macro(&self, opname: &str) -> String {
        format!("{}{}", self.macro_prefix, opname.to_uppercase())
    }
}

/// Options for one code generation run.
#[derive(Clone, Debug)]
pub struct CodegenOptions {
    pub block_prefix: String,
    pub error_prefix: String,
    /// Indentation unit for guarded and scoped code.
    pub indent: String,
    pub runtime: RuntimeNames,
    pub ops: OpTable,
}

impl Default for CodegenOptions {
    fn default() -> Self {
        Self {
            block_prefix: "block".to_owned(),
            error_prefix: "err".to_owned(),
            indent: "\t".to_owned(),
            runtime: RuntimeNames::default(),
            ops: OpTable::standard(),
        }
    }
}

impl CodegenOptions {
    pub fn with_block_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.block_prefix = prefix.into();
        self
    }

    pub fn with_error_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.error_prefix = prefix.into();
        self
    }

    pub fn with_indent(mut self, indent: impl Into<String>) -> Self {
        self.indent = indent.into();
        self
    }

    pub fn with_runtime(mut self, runtime: RuntimeNames) -> Self {
        self.runtime = runtime;
        self
    }

    /// Register (or override) the handler for one opcode.
    pub fn with_op(mut self, opname: &str, handler: OpHandler) -> Self {
        self.ops.register(opname, handler);
        self
    }

    /// Label of the block numbered `n`.
    pub fn block_label(&self, n: u32) -> String {
        format!("{}{n}", self.block_prefix)
    }

    /// Error label for a failure in block `block` with `depth` owned values.
    pub fn error_label(&self, block: u32, depth: usize) -> String {
        format!("{}{block}_{depth}", self.error_prefix)
    }
}

#[cfg(test)]
mod tests;
