//! Ember Core
//!
//! Foundation shared by the Ember engine crates: logging setup, profiling
//! scopes, hash collections and the frame clock that feeds per-tick deltas.

pub mod alloc;
pub mod logging;
pub mod profiling;
pub mod time;
