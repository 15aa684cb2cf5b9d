//! Import rewriting for Go source files.
//!
//! [`rewrite`] parses a file, relocates every import whose path is in the
//! closure map, and splices the new literals into the original text. Bytes
//! outside rewritten literals are copied through untouched, so comments,
//! formatting and declaration order survive exactly.

pub mod grammar;
pub mod lexer;
pub mod literal;
pub mod source_unit;

use thiserror::Error;

use crate::closure::IdentifierMap;

pub use source_unit::{ImportSpec, SourceUnit};

/// Errors raised while rewriting one file.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RewriteError {
    /// The file is not syntactically valid Go.
    #[error("{line}:{column}: {message}")]
    Syntax {
        /// 1-based line.
        line: usize,
        /// 1-based column in bytes.
        column: usize,
        /// What the parser expected.
        message: String,
    },
    /// An import literal could not be decoded.
    #[error("{line}:{column}: bad import literal {literal}: {message}")]
    Literal {
        /// 1-based line.
        line: usize,
        /// 1-based column in bytes.
        column: usize,
        /// The literal as written.
        literal: String,
        /// Why decoding failed.
        message: String,
    },
}

/// Rewrites the imports of one Go source file against a frozen closure map.
///
/// Imports absent from `map` are left byte-for-byte as written. Rewritten
/// imports are emitted as interpreted string literals.
///
/// # Errors
///
/// Returns [`RewriteError::Syntax`] if `source` does not parse and
/// [`RewriteError::Literal`] if an import literal cannot be decoded.
pub fn rewrite(source: &str, map: &IdentifierMap) -> Result<String, RewriteError> {
    let unit = SourceUnit::parse(source)?;

    let mut out = String::with_capacity(source.len());
    let mut copied_to = 0;
    for spec in unit.imports() {
        let path = spec.path().map_err(|message| unit.literal_error(spec, message))?;
        if let Some(relocated) = map.lookup_str(&path) {
            out.push_str(&source[copied_to..spec.span.start]);
            out.push_str(&literal::quote(relocated.as_str()));
            copied_to = spec.span.end;
        }
    }
    out.push_str(&source[copied_to..]);
    Ok(out)
}
