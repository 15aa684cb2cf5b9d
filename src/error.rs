//! Errors surfaced by the scan and extraction phases.

use std::path::PathBuf;

use thiserror::Error;

use crate::import_path::ImportPath;
use crate::rewrite::RewriteError;

/// Any failure that aborts an extraction run.
///
/// Every variant carries the package path or file path needed to diagnose it.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// The resolver could not produce metadata for a package.
    #[error("cannot resolve package `{path}`: {message}")]
    Resolution {
        /// Package that failed to resolve.
        path: ImportPath,
        /// Resolver message.
        message: String,
    },
    /// A source file is not syntactically valid Go.
    #[error("{}:{line}:{column}: {message}", .file.display())]
    Parse {
        /// File that failed to parse.
        file: PathBuf,
        /// 1-based line.
        line: usize,
        /// 1-based column in bytes.
        column: usize,
        /// Parser message.
        message: String,
    },
    /// An import literal could not be decoded or re-encoded.
    #[error("{}:{line}:{column}: bad import literal {literal}: {message}", .file.display())]
    Rewrite {
        /// File holding the literal.
        file: PathBuf,
        /// 1-based line.
        line: usize,
        /// 1-based column in bytes.
        column: usize,
        /// The literal exactly as written in the source.
        literal: String,
        /// Decoder message.
        message: String,
    },
    /// A create, read or write failed at the storage boundary.
    #[error("{}: {message}", .path.display())]
    Io {
        /// Path being accessed.
        path: PathBuf,
        /// Storage message.
        message: String,
    },
}

impl ExtractError {
    /// Attaches a file path to an error raised by the rewriter.
    #[must_use]
    pub fn from_rewrite(file: PathBuf, err: RewriteError) -> Self {
        match err {
            RewriteError::Syntax { line, column, message } => {
                Self::Parse { file, line, column, message }
            }
            RewriteError::Literal { line, column, literal, message } => {
                Self::Rewrite { file, line, column, literal, message }
            }
        }
    }

    /// Wraps a storage failure for `path`.
    #[must_use]
    pub fn io(path: PathBuf, err: &(dyn std::error::Error + Send + Sync)) -> Self {
        Self::Io { path, message: err.to_string() }
    }
}
