//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::ExtractConfig;

/// Top-level CLI parser for `pkgextract`.
#[derive(Debug, Parser)]
#[command(
    name = "pkgextract",
    version,
    about = "Copy a Go package and its dependencies under a new import path"
)]
pub struct Cli {
    /// Increase log output (-v info, -vv debug). `PKGEXTRACT_LOG` takes precedence.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
    /// The command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported top-level subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Scan the dependency closure and write the relocated tree.
    Extract(ClosureArgs),
    /// Print the identifier map as YAML without writing anything.
    Scan(ClosureArgs),
}

/// Options shared by `extract` and `scan`.
#[derive(Debug, Args)]
pub struct ClosureArgs {
    /// Import path of the root package.
    pub package: String,
    /// Import path prefix to relocate packages under.
    #[arg(long)]
    pub prefix: Option<String>,
    /// Directory to write the relocated tree into.
    #[arg(short, long)]
    pub output: Option<PathBuf>,
    /// Only extract dependencies under this prefix (repeatable).
    #[arg(long = "include", value_name = "PREFIX")]
    pub include: Vec<String>,
    /// Never extract dependencies under this prefix (repeatable).
    #[arg(long = "exclude", value_name = "PREFIX")]
    pub exclude: Vec<String>,
    /// Extract standard library packages too.
    #[arg(long)]
    pub with_stdlib: bool,
    /// Packages to extract in parallel.
    #[arg(short, long)]
    pub jobs: Option<usize>,
    /// YAML file with default settings.
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl ClosureArgs {
    /// Settings given on the command line, to merge over the config file.
    #[must_use]
    pub fn overrides(&self) -> ExtractConfig {
        ExtractConfig {
            prefix: self.prefix.clone(),
            output: self.output.clone(),
            include: self.include.clone(),
            exclude: self.exclude.clone(),
            with_stdlib: self.with_stdlib,
            jobs: self.jobs,
        }
    }

    /// Loads the config file, if any, and applies command-line overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be loaded.
    pub fn resolve_config(&self) -> Result<ExtractConfig, String> {
        let base = match &self.config {
            Some(path) => ExtractConfig::load(path)?,
            None => ExtractConfig::default(),
        };
        Ok(base.merge(self.overrides()))
    }
}
