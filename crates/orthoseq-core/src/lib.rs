//! # orthoseq Core Library
//!
//! Selection of mutually orthogonal DNA handle sequences: short sequences
//! that bind their own reverse complement within a target energy window
//! while binding every other handle, and every other handle's reverse
//! complement, only weakly.
//!
//! ## Architectural Philosophy
//!
//! The library follows a strict three-layer architecture.
//!
//! - **[`core`]: The Foundation.** Stateless data models (`Sequence`), the
//!   `EnergyOracle` abstraction with its library and caching backends,
//!   candidate generation, energy statistics and file persistence.
//!
//! - **[`engine`]: The Logic Core.** The stateful greedy search: the
//!   candidate pool, the admission policy, the incrementally grown
//!   off-target matrix, and the sequential and batched selection loops.
//!
//! - **[`workflows`]: The Public API.** End-to-end procedures that tie
//!   `core` and `engine` together, such as filtering a pool and running a
//!   complete selection.

pub mod core;
pub mod engine;
pub mod workflows;
