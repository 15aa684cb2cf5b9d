//! Live adapters for real external interactions.

pub mod resolver;
pub mod storage;

pub use resolver::GopathResolver;
pub use storage::LiveStorage;
