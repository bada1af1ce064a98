//! Configuration types
//!
//! Robot-agnostic configuration structures. The harness fills them from its
//! own configuration source; every field has a competition-tested default.

pub mod types;

pub use types::*;
