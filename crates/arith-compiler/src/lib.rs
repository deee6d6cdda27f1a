//! Compiles prefix arithmetic such as `(* (+ 2 4) 7)` into a numbered listing for a small
//! register machine:
//!
//! ```text
//! 00 setn r1 2
//! 01 setn r2 4
//! 02 add r1 r1 r2
//! 03 setn r2 7
//! 04 mul r1 r1 r2
//! ```
use compiler::CompileOptions;
use error::ArithResult;
use instruction::Program;
use machine::Machine;

/// Compiler.
pub mod compiler;
/// Errors
pub mod error;
/// Instructions.
pub mod instruction;
/// Register machine.
pub mod machine;
/// Registers and register allocation.
pub mod register;

/// A compiled expression together with the value it computes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Evaluation {
    pub program: Program,
    pub value: i64,
}

/// Compiles `source` and runs the listing on a fresh machine.
pub fn eval_str(source: &str, options: &CompileOptions) -> ArithResult<Evaluation> {
    let program = compiler::compile(source, options)?;
    let value = Machine::default().run(&program)?;
    Ok(Evaluation { program, value })
}
