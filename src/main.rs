//! Binary entrypoint for the `pkgextract` CLI.

use std::process::ExitCode;

fn main() -> ExitCode {
    // GOPATH and friends may come from a local .env file.
    dotenvy::dotenv().ok();

    // Recording is handled in commands::dispatch via PKGEXTRACT_RECORD=<dir>.
    match pkgextract::run(std::env::args()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}
