//! A register machine that runs compiled listings.

use std::collections::HashMap;

use crate::{
    compiler::ast::BinaryOp,
    instruction::{Instruction, LineNumber, Program},
    register::Register,
};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
/// An arithmetic failure.
pub enum ArithmeticError {
    /// The divisor of `div` or `mod` was zero.
    DivisionByZero,
    /// The result does not fit in an `i64`.
    Overflow,
}

impl std::error::Error for ArithmeticError {}

impl std::fmt::Display for ArithmeticError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ArithmeticError::DivisionByZero => write!(f, "division by zero"),
            ArithmeticError::Overflow => write!(f, "integer overflow"),
        }
    }
}

/// Negates `value`.
pub fn negate(value: i64) -> Result<i64, ArithmeticError> {
    value.checked_neg().ok_or(ArithmeticError::Overflow)
}

/// Applies `op` to the operands.
///
/// `Quotient` rounds toward negative infinity and `Modulus` takes the sign of the divisor, so
/// `quotient * rhs + modulus == lhs` always holds.
pub fn apply(op: BinaryOp, lhs: i64, rhs: i64) -> Result<i64, ArithmeticError> {
    let res = match op {
        BinaryOp::Sum => lhs.checked_add(rhs),
        BinaryOp::Difference => lhs.checked_sub(rhs),
        BinaryOp::Product => lhs.checked_mul(rhs),
        BinaryOp::Quotient | BinaryOp::Modulus if rhs == 0 => {
            return Err(ArithmeticError::DivisionByZero);
        }
        BinaryOp::Quotient => lhs.checked_div(rhs).map(|q| {
            if lhs % rhs != 0 && (lhs < 0) != (rhs < 0) {
                q - 1
            } else {
                q
            }
        }),
        BinaryOp::Modulus => {
            // `i64::MIN % -1` is 0; only the intermediate quotient overflows.
            let r = lhs.wrapping_rem(rhs);
            if r != 0 && (r < 0) != (rhs < 0) {
                Some(r + rhs)
            } else {
                Some(r)
            }
        }
    };
    res.ok_or(ArithmeticError::Overflow)
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
/// An error raised while running a program.
pub enum MachineError {
    /// A register was read before any instruction wrote it.
    UninitializedRegister { line: LineNumber, register: Register },
    /// An instruction failed.
    Arithmetic {
        line: LineNumber,
        err: ArithmeticError,
    },
}

impl std::error::Error for MachineError {}

impl std::fmt::Display for MachineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MachineError::UninitializedRegister { line, register } => {
                write!(f, "line {line} reads {register} before it is set")
            }
            MachineError::Arithmetic { line, err } => write!(f, "{err} on line {line}"),
        }
    }
}

#[derive(Debug, Default)]
/// The register machine.
pub struct Machine {
    registers: HashMap<Register, i64>,
}

impl Machine {
    /// Returns the value held by `register`, if it was ever written.
    pub fn get(&self, register: Register) -> Option<i64> {
        self.registers.get(&register).copied()
    }

    /// Runs every line of `program` in order and returns the value of its result register.
    pub fn run(&mut self, program: &Program) -> Result<i64, MachineError> {
        for line in program.lines.iter() {
            self.execute(line.number, line.instruction)?;
        }
        self.get(program.result)
            .ok_or(MachineError::UninitializedRegister {
                line: LineNumber(program.lines.len() as u32),
                register: program.result,
            })
    }

    fn execute(&mut self, line: LineNumber, instruction: Instruction) -> Result<(), MachineError> {
        let value = match instruction {
            Instruction::SetN { value, .. } => value,
            Instruction::Neg { src, .. } => {
                let src = self.read(line, src)?;
                negate(src).map_err(|err| MachineError::Arithmetic { line, err })?
            }
            Instruction::Binary { op, lhs, rhs, .. } => {
                let lhs = self.read(line, lhs)?;
                let rhs = self.read(line, rhs)?;
                apply(op, lhs, rhs).map_err(|err| MachineError::Arithmetic { line, err })?
            }
        };
        self.registers.insert(instruction.dst(), value);
        Ok(())
    }

    fn read(&self, line: LineNumber, register: Register) -> Result<i64, MachineError> {
        self.get(register)
            .ok_or(MachineError::UninitializedRegister { line, register })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instruction::Line;

    fn program(instructions: &[Instruction], result: u8) -> Program {
        Program {
            lines: instructions
                .iter()
                .enumerate()
                .map(|(idx, instruction)| Line {
                    number: LineNumber(idx as u32),
                    instruction: *instruction,
                })
                .collect(),
            result: Register::new(result),
        }
    }

    #[test]
    fn quotient_and_modulus_are_floored() {
        assert_eq!(apply(BinaryOp::Quotient, 7, 2), Ok(3));
        assert_eq!(apply(BinaryOp::Quotient, -7, 2), Ok(-4));
        assert_eq!(apply(BinaryOp::Quotient, 7, -2), Ok(-4));
        assert_eq!(apply(BinaryOp::Quotient, -7, -2), Ok(3));
        assert_eq!(apply(BinaryOp::Modulus, 7, 2), Ok(1));
        assert_eq!(apply(BinaryOp::Modulus, -7, 2), Ok(1));
        assert_eq!(apply(BinaryOp::Modulus, 7, -2), Ok(-1));
        assert_eq!(apply(BinaryOp::Modulus, -7, -2), Ok(-1));
        for (lhs, rhs) in [(7, 2), (-7, 2), (7, -2), (-7, -2), (6, 3), (-6, 3)] {
            let q = apply(BinaryOp::Quotient, lhs, rhs).unwrap();
            let m = apply(BinaryOp::Modulus, lhs, rhs).unwrap();
            assert_eq!(q * rhs + m, lhs);
        }
    }

    #[test]
    fn division_by_zero_is_error() {
        assert_eq!(
            apply(BinaryOp::Quotient, 1, 0),
            Err(ArithmeticError::DivisionByZero)
        );
        assert_eq!(
            apply(BinaryOp::Modulus, 1, 0),
            Err(ArithmeticError::DivisionByZero)
        );
    }

    #[test]
    fn overflow_is_error() {
        assert_eq!(
            apply(BinaryOp::Sum, i64::MAX, 1),
            Err(ArithmeticError::Overflow)
        );
        assert_eq!(
            apply(BinaryOp::Quotient, i64::MIN, -1),
            Err(ArithmeticError::Overflow)
        );
        assert_eq!(negate(i64::MIN), Err(ArithmeticError::Overflow));
    }

    #[test]
    fn min_mod_minus_one_is_zero() {
        assert_eq!(apply(BinaryOp::Modulus, i64::MIN, -1), Ok(0));
        assert_eq!(apply(BinaryOp::Modulus, i64::MIN, 1), Ok(0));
        assert_eq!(apply(BinaryOp::Modulus, i64::MIN, i64::MAX), Ok(i64::MAX - 1));
        assert_eq!(apply(BinaryOp::Modulus, i64::MAX, i64::MIN), Ok(-1));
    }

    #[test]
    fn run_returns_result_register() {
        let r1 = Register::new(1);
        let r2 = Register::new(2);
        let program = program(
            &[
                Instruction::SetN { dst: r1, value: 9 },
                Instruction::SetN { dst: r2, value: 4 },
                Instruction::Binary {
                    op: BinaryOp::Difference,
                    dst: r1,
                    lhs: r1,
                    rhs: r2,
                },
                Instruction::Neg { dst: r1, src: r1 },
            ],
            1,
        );
        let mut machine = Machine::default();
        assert_eq!(machine.run(&program), Ok(-5));
        assert_eq!(machine.get(r2), Some(4));
    }

    #[test]
    fn reading_unset_register_is_error() {
        let r1 = Register::new(1);
        let r3 = Register::new(3);
        let program = program(&[Instruction::Neg { dst: r1, src: r3 }], 1);
        assert_eq!(
            Machine::default().run(&program),
            Err(MachineError::UninitializedRegister {
                line: LineNumber(0),
                register: r3
            })
        );
    }

    #[test]
    fn failing_instruction_reports_line() {
        let r1 = Register::new(1);
        let r2 = Register::new(2);
        let program = program(
            &[
                Instruction::SetN { dst: r1, value: 3 },
                Instruction::SetN { dst: r2, value: 0 },
                Instruction::Binary {
                    op: BinaryOp::Modulus,
                    dst: r1,
                    lhs: r1,
                    rhs: r2,
                },
            ],
            1,
        );
        let err = Machine::default().run(&program).unwrap_err();
        assert_eq!(
            err,
            MachineError::Arithmetic {
                line: LineNumber(2),
                err: ArithmeticError::DivisionByZero
            }
        );
        assert_eq!(err.to_string(), "division by zero on line 02");
    }
}
