//! Program image loading.
//!
//! The loader is the machine's only collaborator with write access before the
//! first tick: it parses the text program format and populates memory. A bad
//! image is a load-time error, surfaced before any tick runs and kept
//! strictly distinct from runtime faults.

/// Text program image parser and memory population.
pub mod loader;

pub use loader::{LoadError, ProgramImage};
