use ast::Expr;
use compiler_context::CompilerContext;
use error::CompileError;

use crate::{
    instruction::Program,
    register::{CodegenError, DEFAULT_REGISTER_COUNT},
};

pub mod ast;
pub mod compiler_context;
pub mod emitter;
pub mod error;
pub mod span;
pub mod tokenizer;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
/// Settings for a compile.
pub struct CompileOptions {
    /// The number of registers the target machine provides.
    pub register_count: u8,
}

impl Default for CompileOptions {
    fn default() -> CompileOptions {
        CompileOptions {
            register_count: DEFAULT_REGISTER_COUNT,
        }
    }
}

impl CompileOptions {
    pub fn with_register_count(self, register_count: u8) -> CompileOptions {
        CompileOptions { register_count }
    }
}

/// Compiles a single expression into a listing.
pub fn compile(source: &str, options: &CompileOptions) -> Result<Program, CompileError> {
    let expr = Expr::with_source(source)?;
    let program = generate(expr, options)?;
    tracing::debug!(
        target: "arith::compiler",
        source,
        lines = program.lines.len(),
        result = %program.result,
        "compiled expression"
    );
    Ok(program)
}

/// Generates the listing for an already parsed expression.
///
/// Every call starts from a full register pool and line 00.
pub fn generate(expr: Expr, options: &CompileOptions) -> Result<Program, CodegenError> {
    let mut ctx = CompilerContext::new(options.register_count);
    let result = ctx.generate(expr)?;
    Ok(Program {
        lines: ctx.into_lines(),
        result,
    })
}
