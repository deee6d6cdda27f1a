use arith_compiler::{compiler::CompileOptions, eval_str};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    for source in ["4", "(+ 2 3)", "(* (+ 2 4) 7)", "- 5"] {
        let evaluation = eval_str(source, &CompileOptions::default())?;
        println!("{source}");
        evaluation.program.write_to(&mut std::io::stdout())?;
        println!("=> {}\n", evaluation.value);
    }
    Ok(())
}
