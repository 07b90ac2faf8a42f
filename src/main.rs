use std::io;
use std::process::ExitCode;

use clap::Parser;

use globrx::cli::{run_ast, run_compile, run_match, Cli, Commands};

fn main() -> ExitCode {
    let cli = Cli::parse();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    let result = match &cli.command {
        Commands::Compile(args) => run_compile(args, &mut out).map(|()| ExitCode::SUCCESS),
        Commands::Match(args) => run_match(args, io::stdin().lock(), &mut out)
            .map(|matched| if matched { ExitCode::SUCCESS } else { ExitCode::from(1) }),
        Commands::Ast(args) => run_ast(args, &mut out).map(|()| ExitCode::SUCCESS),
    };

    match result {
        Ok(code) => code,
        Err(error) => {
            eprintln!("globrx: {error}");
            ExitCode::from(2)
        }
    }
}
