use crate::{
    instruction::{Instruction, Line},
    register::{CodegenError, Register, RegisterPool},
};

use super::{ast::Expr, emitter::Emitter};

/// The mutable state of a single compile.
///
/// A context must not be shared between compiles. Each top level expression gets a fresh one, so
/// registers and line numbers never leak from one expression into the next.
#[derive(Debug)]
pub struct CompilerContext {
    pub pool: RegisterPool,
    pub emitter: Emitter,
}

impl CompilerContext {
    /// Creates a context with `register_count` free registers and the line counter at 0.
    pub fn new(register_count: u8) -> CompilerContext {
        CompilerContext {
            pool: RegisterPool::new(register_count),
            emitter: Emitter::default(),
        }
    }

    /// Emits the instructions for `expr` and returns the register that holds its value.
    ///
    /// Children are generated before their parent. A binary operation writes its result into the
    /// left operand's register and releases the right one; negation works in place.
    pub fn generate(&mut self, expr: Expr) -> Result<Register, CodegenError> {
        match expr {
            Expr::Constant(value) => {
                let dst = self.pool.allocate()?;
                self.emitter.emit(Instruction::SetN { dst, value });
                Ok(dst)
            }
            Expr::Negation(operand) => {
                let src = self.generate(*operand)?;
                self.emitter.emit(Instruction::Neg { dst: src, src });
                Ok(src)
            }
            Expr::Binary { op, left, right } => {
                let lhs = self.generate(*left)?;
                let rhs = self.generate(*right)?;
                self.emitter.emit(Instruction::Binary {
                    op,
                    dst: lhs,
                    lhs,
                    rhs,
                });
                self.pool.release(rhs);
                Ok(lhs)
            }
        }
    }

    pub fn into_lines(self) -> Vec<Line> {
        self.emitter.into_lines()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::ast::BinaryOp;

    fn sum(left: Expr, right: Expr) -> Expr {
        Expr::binary(BinaryOp::Sum, left, right)
    }

    #[test]
    fn result_register_stays_held_and_others_are_released() {
        let mut ctx = CompilerContext::new(13);
        let expr = sum(
            sum(Expr::Constant(1), Expr::Constant(2)),
            sum(Expr::Constant(3), Expr::Constant(4)),
        );
        let result = ctx.generate(expr).unwrap();
        assert_eq!(result, Register::new(1));
        assert_eq!(ctx.pool.held(), 1);
        assert!(!ctx.pool.is_free(result));
    }

    #[test]
    fn peak_pressure_follows_left_registers() {
        // (+ 1 (+ 2 (+ 3 4))) keeps every left operand live.
        let expr = sum(
            Expr::Constant(1),
            sum(Expr::Constant(2), sum(Expr::Constant(3), Expr::Constant(4))),
        );
        let mut ctx = CompilerContext::new(3);
        assert_eq!(
            ctx.generate(expr.clone()),
            Err(CodegenError::RegisterPoolExhausted { capacity: 3 })
        );
        let mut ctx = CompilerContext::new(4);
        assert_eq!(ctx.generate(expr), Ok(Register::new(1)));
    }

    #[test]
    fn left_nested_expression_uses_two_registers() {
        let mut expr = Expr::Constant(0);
        for value in 1..20 {
            expr = sum(expr, Expr::Constant(value));
        }
        let mut ctx = CompilerContext::new(2);
        assert_eq!(ctx.generate(expr), Ok(Register::new(1)));
        assert_eq!(ctx.emitter.lines().len(), 39);
    }

    #[test]
    fn negation_reuses_operand_register() {
        let mut ctx = CompilerContext::new(1);
        let expr = Expr::negation(Expr::negation(Expr::Constant(8)));
        assert_eq!(ctx.generate(expr), Ok(Register::new(1)));
        let lines: Vec<String> = ctx
            .into_lines()
            .iter()
            .map(|line| line.to_string())
            .collect();
        assert_eq!(lines, vec!["00 setn r1 8", "01 neg r1 r1", "02 neg r1 r1"]);
    }
}
