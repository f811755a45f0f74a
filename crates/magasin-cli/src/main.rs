//! `magasin` binary: parses arguments, installs logging and runs one command

use magasin_core::MagasinError;
use std::io::{self, BufRead, Write};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn ask(question: &str) -> bool {
    eprint!("{question} [y/N] ");
    let _ = io::stderr().flush();
    let mut answer = String::new();
    if io::stdin().lock().read_line(&mut answer).is_err() {
        return false;
    }
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

fn is_storage_failure(err: &anyhow::Error) -> bool {
    err.chain().any(|cause| {
        cause
            .downcast_ref::<MagasinError>()
            .is_some_and(MagasinError::is_storage_failure)
    })
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let matches = magasin_cli::build().get_matches();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match magasin_cli::run(&matches, &mut out, &mut ask) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) if is_storage_failure(&err) => {
            eprintln!("Storage failure, the last change was NOT saved: {err:#}");
            ExitCode::from(2)
        }
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
