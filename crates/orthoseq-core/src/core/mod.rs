//! # Core Module
//!
//! Stateless building blocks: DNA handle sequences, candidate enumeration,
//! binding energy oracles, persistence formats and descriptive statistics.
//! Nothing here knows about the selection process that consumes it.

pub mod generation;
pub mod io;
pub mod oracle;
pub mod sequence;
pub mod stats;
