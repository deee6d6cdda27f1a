use arith_compiler::compiler::CompileOptions;
use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

mod batch;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    #[arg(value_enum, short, long, default_value_t)]
    pub mode: Mode,
    /// Number of registers available to the compiler.
    #[arg(short, long, env = "ARITH_REGISTERS", default_value_t = 13)]
    pub registers: u8,
    /// Print listings without running them.
    #[arg(long)]
    pub no_run: bool,
    /// Expressions to compile. Read from stdin, one per line, when empty.
    pub exprs: Vec<String>,
}

#[derive(Copy, Clone, PartialEq, Default, Debug, ValueEnum)]
pub enum Mode {
    #[default]
    Repl,
    Compile,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();
    let options = CompileOptions::default().with_register_count(args.registers);
    match args.mode {
        Mode::Repl => {
            arith_repl::Repl::new(options).run()?;
            Ok(())
        }
        Mode::Compile => {
            let settings = batch::Batch {
                options,
                run: !args.no_run,
            };
            let mut stdout = std::io::stdout().lock();
            let mut stderr = std::io::stderr().lock();
            let failed = if args.exprs.is_empty() {
                let lines = std::io::stdin().lines().collect::<Result<Vec<_>, _>>()?;
                settings.compile_all(lines.iter(), &mut stdout, &mut stderr)?
            } else {
                settings.compile_all(args.exprs.iter(), &mut stdout, &mut stderr)?
            };
            if failed > 0 {
                return Err(format!("{failed} expression(s) failed to compile").into());
            }
            Ok(())
        }
    }
}
