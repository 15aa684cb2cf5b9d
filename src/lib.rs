//! Core library entry for the `pkgextract` CLI.
//!
//! `pkgextract` copies a Go package and the packages it transitively imports
//! into a new directory tree, relocating each one under a new import path and
//! rewriting import declarations so the copies refer to each other.
//!
//! The work happens in two phases. [`closure::scan`] walks the import graph
//! and builds an [`closure::IdentifierMap`]; [`extract::extract_all`] then
//! rewrites every file of every mapped package with [`rewrite::rewrite`].

pub mod adapters;
pub mod cassette;
pub mod cli;
pub mod closure;
pub mod commands;
pub mod config;
pub mod constraint;
pub mod context;
pub mod environment;
pub mod error;
pub mod extract;
pub mod import_path;
pub mod logging;
pub mod ports;
pub mod rewrite;

use clap::Parser;

/// Run the CLI with the provided arguments.
///
/// # Errors
///
/// Returns an error string when argument parsing fails or command execution fails.
pub fn run<I, T>(args: I) -> Result<(), String>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let cli = cli::Cli::try_parse_from(args).map_err(|err| err.to_string())?;
    logging::init(cli.verbose);
    commands::dispatch(&cli.command)
}

#[cfg(test)]
mod tests {
    use super::run;

    #[test]
    fn run_errors_on_unknown_subcommand() {
        let result = run(["pkgextract", "unknown"]);
        assert!(result.is_err());
    }

    #[test]
    fn run_errors_without_prefix() {
        let err = run(["pkgextract", "scan", "example.com/never/resolved"]).unwrap_err();
        assert!(err.contains("no import prefix configured"));
    }
}
