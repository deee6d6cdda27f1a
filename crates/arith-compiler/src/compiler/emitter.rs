use crate::instruction::{Instruction, Line, LineNumber};

/// Numbers instructions and collects them into a listing.
#[derive(Debug, Default)]
pub struct Emitter {
    next: u32,
    lines: Vec<Line>,
}

impl Emitter {
    /// Takes the next line number.
    pub fn next_line(&mut self) -> LineNumber {
        let number = LineNumber(self.next);
        self.next += 1;
        number
    }

    /// Appends `instruction` to the listing under the next line number.
    pub fn emit(&mut self, instruction: Instruction) -> LineNumber {
        let number = self.next_line();
        let line = Line {
            number,
            instruction,
        };
        tracing::trace!(target: "arith::emitter", %line, "emitted");
        self.lines.push(line);
        number
    }

    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    pub fn into_lines(self) -> Vec<Line> {
        self.lines
    }
}
