//! Selection loops and whole-set checks built on top of
//! [`super::builder::OrthogonalSetBuilder`].
//!
//! [`sequential`] decides one candidate at a time, [`batch`] evaluates
//! groups of candidates concurrently against a snapshot of the accepted set,
//! and [`validate`] re-checks a finished set handle by handle.

pub mod batch;
pub mod sequential;
pub mod validate;
