//! Persistence of pools, energy libraries and handle exports.
//!
//! Every writer in this module replaces its target atomically, so an
//! interrupted save never leaves a half-written file behind.

pub mod export;
pub mod store;
