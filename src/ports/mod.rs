//! Port traits defining external boundaries.
//!
//! Each trait represents a boundary between the extraction core and an
//! external system (package lookup, file storage). Implementations live in
//! `src/adapters/`.

pub mod resolver;
pub mod storage;

pub use resolver::{ModuleMetadata, ModuleResolver};
pub use storage::Storage;
