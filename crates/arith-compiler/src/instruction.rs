use crate::{compiler::ast::BinaryOp, register::Register};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
/// A single instruction of the target machine.
pub enum Instruction {
    /// Loads an immediate into `dst`.
    SetN { dst: Register, value: i64 },
    /// Stores the negation of `src` in `dst`.
    Neg { dst: Register, src: Register },
    /// Stores `lhs <op> rhs` in `dst`.
    Binary {
        op: BinaryOp,
        dst: Register,
        lhs: Register,
        rhs: Register,
    },
}

impl Instruction {
    /// The instruction name as it appears in a listing.
    pub fn mnemonic(&self) -> &'static str {
        match self {
            Instruction::SetN { .. } => "setn",
            Instruction::Neg { .. } => "neg",
            Instruction::Binary { op, .. } => op.mnemonic(),
        }
    }

    /// The register written by this instruction.
    pub fn dst(&self) -> Register {
        match self {
            Instruction::SetN { dst, .. }
            | Instruction::Neg { dst, .. }
            | Instruction::Binary { dst, .. } => *dst,
        }
    }
}

impl std::fmt::Display for Instruction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mnemonic = self.mnemonic();
        match self {
            Instruction::SetN { dst, value } => write!(f, "{mnemonic} {dst} {value}"),
            Instruction::Neg { dst, src } => write!(f, "{mnemonic} {dst} {src}"),
            Instruction::Binary { dst, lhs, rhs, .. } => {
                write!(f, "{mnemonic} {dst} {lhs} {rhs}")
            }
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
/// The position of an instruction in a listing, starting at 0.
pub struct LineNumber(pub u32);

impl std::fmt::Display for LineNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}", self.0)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
/// A numbered instruction.
pub struct Line {
    pub number: LineNumber,
    pub instruction: Instruction,
}

impl std::fmt::Display for Line {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.number, self.instruction)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// The output of compiling one expression.
pub struct Program {
    /// The instructions in execution order.
    pub lines: Vec<Line>,
    /// The register holding the value of the whole expression once every line has run.
    pub result: Register,
}

impl Program {
    /// Returns each line rendered as text.
    pub fn listing(&self) -> Vec<String> {
        self.lines.iter().map(Line::to_string).collect()
    }

    /// Writes the listing to `out`, one instruction per line.
    pub fn write_to(&self, out: &mut impl std::io::Write) -> std::io::Result<()> {
        for line in self.lines.iter() {
            writeln!(out, "{line}")?;
        }
        Ok(())
    }
}

impl std::fmt::Display for Program {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (idx, line) in self.lines.iter().enumerate() {
            if idx > 0 {
                writeln!(f)?;
            }
            write!(f, "{line}")?;
        }
        Ok(())
    }
}
