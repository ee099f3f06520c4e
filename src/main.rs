//! Binary entrypoint for the `svi` CLI.

use std::process::ExitCode;

fn main() -> ExitCode {
    match svi::run(std::env::args()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}
