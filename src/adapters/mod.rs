//! Port implementations.
//!
//! `live` talks to the real GOPATH and disk, `recording` wraps a live adapter
//! and appends every call to a cassette, and `replaying` serves calls back
//! from a cassette for deterministic tests.

pub mod live;
pub mod recording;
pub mod replaying;
