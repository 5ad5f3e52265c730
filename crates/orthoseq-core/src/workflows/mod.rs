//! # Workflows Module
//!
//! High-level entry points that run a complete procedure from loaded inputs
//! to a finished result.
//!
//! - **Selection Workflow** ([`select`]) - on-target filtering of the pool
//!   followed by sequential or batched orthogonal selection.
//! - **Pool Workflow** ([`pool`]) - on-target energies for a list of
//!   candidates, ready to be saved as a pool file.

pub mod pool;
pub mod select;
