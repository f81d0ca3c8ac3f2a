//! Whole-program generation.
//!
//! Functions are independent once the registry exists, so they are generated
//! in parallel against the one shared registry.

use rayon::prelude::*;
use tracing::debug;

use genc_ir::FlowGraph;

use crate::error::GenResult;
use crate::function::{FunctionCode, FunctionCodeGenerator};
use crate::options::CodegenOptions;
use crate::registry::{ExceptionResolver, TypeRegistry};

/// Generate every graph. Results are in input order; one function failing
/// does not stop the others.
pub fn generate_module(
    graphs: &[FlowGraph],
    registry: &dyn TypeRegistry,
    exceptions: &dyn ExceptionResolver,
    options: &CodegenOptions,
) -> Vec<GenResult<FunctionCode>> {
    debug!(functions = graphs.len(), "generating module");
    graphs
        .par_iter()
        .map(|graph| FunctionCodeGenerator::new(graph, registry, exceptions, options).generate())
        .collect()
}

#[cfg(test)]
mod tests;
