//! Parkcart CLI

use std::{
    io::{self, Write},
    process::ExitCode,
};

use clap::Parser;

use crate::cli::{Cli, CliError, logging};

mod cli;

fn main() -> ExitCode {
    // Load .env file if present (ignore if missing)
    _ = dotenvy::dotenv();

    let cli = Cli::parse();

    if let Err(error) = logging::init_subscriber(&cli.logging) {
        report(&CliError::from(error));
        return ExitCode::FAILURE;
    }

    match cli.run(io::stdout().lock()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            report(&error);
            ExitCode::FAILURE
        }
    }
}

fn report(error: &CliError) {
    _ = writeln!(io::stderr().lock(), "error: {error}");
}
