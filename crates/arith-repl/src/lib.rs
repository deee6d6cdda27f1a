use arith_compiler::{compiler::CompileOptions, error::ArithResult, eval_str};
use rustyline::error::ReadlineError;

/// Interactive shell that compiles one expression per line.
pub struct Repl {
    /// Settings used for every compile.
    options: CompileOptions,
    /// The number of expressions that have been evaluated.
    expressions_count: usize,
}

impl Default for Repl {
    fn default() -> Repl {
        Repl::new(CompileOptions::default())
    }
}

impl Repl {
    /// Creates a new REPL.
    pub fn new(options: CompileOptions) -> Repl {
        Repl {
            options,
            expressions_count: 0,
        }
    }

    /// Reads expressions until an empty line, Ctrl-C or Ctrl-D.
    pub fn run(&mut self) -> Result<(), ReadlineError> {
        let mut rl = rustyline::DefaultEditor::new()?;
        println!("Enter an expression, such as (* (+ 2 4) 7).");
        println!("   Whitespace between words is required.");
        println!("   Parentheses around binary operations are required.");
        println!("   Supported binary operations are +, -, *, quotient and mod.");
        println!("   A bare - negates the expression that follows it.");
        println!("   Just press Enter to quit.");
        loop {
            let input = match rl.readline("> ") {
                Ok(input) => input,
                Err(ReadlineError::Interrupted) => {
                    println!("CTRL-C");
                    break;
                }
                Err(ReadlineError::Eof) => {
                    println!("CTRL-D");
                    break;
                }
                Err(err) => {
                    tracing::warn!(target: "arith::repl", %err, "failed to read line");
                    println!("Error: {:?}", err);
                    break;
                }
            };
            let input = input.trim();
            if input.is_empty() {
                break;
            }
            if let Err(err) = rl.add_history_entry(input) {
                tracing::warn!(target: "arith::repl", %err, "failed to record history");
            }
            match self.execute_code(input) {
                Ok(out) => println!("{out}"),
                Err(err) => println!("Error: {}", err.with_context(input)),
            }
        }
        Ok(())
    }

    fn execute_code(&mut self, input: &str) -> ArithResult<String> {
        let evaluation = eval_str(input, &self.options)?;
        let res = format!(
            "{listing}\n${n} => {value}",
            listing = evaluation.program,
            n = self.expressions_count,
            value = evaluation.value,
        );
        self.expressions_count += 1;
        Ok(res)
    }
}
