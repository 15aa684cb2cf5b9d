//! Discovery of the package closure to extract.
//!
//! The scanner walks the import graph from a root package and records, for
//! every package selected by the inclusion policy, the import path it will
//! be relocated to. The resulting [`IdentifierMap`] is complete before any
//! file is written and is only read afterwards.

pub mod identifier_map;
pub mod scanner;
pub mod strategy;

pub use identifier_map::IdentifierMap;
pub use scanner::scan;
pub use strategy::{InclusionPolicy, PathFilter, PrefixRenamer, Renamer};
