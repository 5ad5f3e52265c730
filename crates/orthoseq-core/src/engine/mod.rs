//! # Engine Module
//!
//! The stateful half of the library: everything that runs while an
//! orthogonal handle set is being grown.
//!
//! ## Overview
//!
//! A run draws candidates from a [`pool::CandidatePool`] without
//! replacement, checks each one against the handles accepted so far with the
//! admission policy in [`validation`], and either admits it into the
//! [`builder::OrthogonalSetBuilder`] or records the reason it was turned
//! away. Every admission appends one row to the [`matrix::OffTargetMatrix`],
//! so set-level statistics are available without recomputing pairwise
//! energies.
//!
//! ## Architecture
//!
//! - **Configuration** ([`config`]) - thresholds, target size, seed and execution mode
//! - **Candidate Pool** ([`pool`]) - depletion-safe uniform sampling
//! - **Admission Policy** ([`validation`]) - short-circuit decision and full-row report
//! - **Set Construction** ([`builder`], [`comparison`], [`matrix`]) - the accepted set and its energies
//! - **Tasks** ([`tasks`]) - sequential and batched selection loops, whole-set validation
//! - **Run Control** ([`progress`], [`cancel`]) - progress events and cooperative stop
//! - **Results** ([`state`]) - stop reasons, rejections and the final result
//! - **Error Handling** ([`error`]) - engine-level error aggregation

pub mod builder;
pub mod cancel;
pub mod comparison;
pub mod config;
pub mod context;
pub mod error;
pub mod matrix;
pub mod pool;
pub mod progress;
pub mod state;
pub mod tasks;
pub mod validation;
