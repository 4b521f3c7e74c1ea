//! Binary entrypoint for the `amdcfg` CLI.

use std::process::ExitCode;

fn main() -> ExitCode {
    match amdcfg::run(std::env::args()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}
