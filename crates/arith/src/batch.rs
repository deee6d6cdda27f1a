use std::io::Write;

use arith_compiler::{
    compiler::{CompileOptions, compile},
    error::ArithResult,
    eval_str,
};

/// Non-interactive compilation of a list of expressions.
pub struct Batch {
    pub options: CompileOptions,
    /// Run each listing and print its value after it.
    pub run: bool,
}

impl Batch {
    /// Compiles each non-blank expression independently and returns how many failed.
    ///
    /// Listings go to `out`, errors to `err`. A failure does not stop the remaining expressions.
    pub fn compile_all<S: AsRef<str>>(
        &self,
        exprs: impl Iterator<Item = S>,
        out: &mut impl Write,
        err: &mut impl Write,
    ) -> std::io::Result<usize> {
        let mut failed = 0;
        for expr in exprs {
            let expr = expr.as_ref().trim();
            if expr.is_empty() {
                continue;
            }
            match self.render(expr) {
                Ok(text) => writeln!(out, "{text}")?,
                Err(e) => {
                    tracing::debug!(target: "arith::batch", expr, %e, "compile failed");
                    writeln!(err, "Error: {}", e.with_context(expr))?;
                    failed += 1;
                }
            }
        }
        Ok(failed)
    }

    fn render(&self, expr: &str) -> ArithResult<String> {
        if self.run {
            let evaluation = eval_str(expr, &self.options)?;
            Ok(format!("{}\n=> {}", evaluation.program, evaluation.value))
        } else {
            Ok(compile(expr, &self.options)?.to_string())
        }
    }
}
