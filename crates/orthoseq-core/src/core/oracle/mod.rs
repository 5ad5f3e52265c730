//! Binding free energy providers.
//!
//! The selection engine never computes thermodynamics itself. It asks an
//! [`EnergyOracle`] for the binding free energy (kcal/mol, more negative is
//! stronger) between two sequences. Oracles may be backed by a precomputed
//! [`PairEnergyLibrary`], by a live [`EnergyModel`], or by both through
//! [`CachedOracle`].

pub mod cached;
pub mod library;

pub use cached::{CachedOracle, EnergyModel, NoModel, OracleConfig};
pub use library::{KeyOrder, PairEnergyLibrary};

use super::sequence::Sequence;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum OracleError {
    #[error("No energy available for pair ({a}, {b})")]
    MissingEnergy { a: Sequence, b: Sequence },
    #[error("Energy model failed for pair ({a}, {b}): {message}")]
    Model {
        a: Sequence,
        b: Sequence,
        message: String,
    },
}

/// Source of pairwise binding free energies.
///
/// Implementations must be safe to query from several worker threads at
/// once. Whether `energy(a, b) == energy(b, a)` holds is the provider's
/// contract; the engine does not rely on it.
pub trait EnergyOracle: Sync {
    fn energy(&self, a: &Sequence, b: &Sequence) -> Result<f64, OracleError>;

    /// On-target energy: a sequence against its own reverse complement.
    fn on_target_energy(&self, sequence: &Sequence) -> Result<f64, OracleError> {
        self.energy(sequence, &sequence.reverse_complement())
    }
}

impl<T: EnergyOracle + ?Sized> EnergyOracle for &T {
    fn energy(&self, a: &Sequence, b: &Sequence) -> Result<f64, OracleError> {
        (**self).energy(a, b)
    }
}

/// Adapts an infallible closure into an oracle.
pub struct FnOracle<F>(pub F);

impl<F> EnergyOracle for FnOracle<F>
where
    F: Fn(&Sequence, &Sequence) -> f64 + Sync,
{
    fn energy(&self, a: &Sequence, b: &Sequence) -> Result<f64, OracleError> {
        Ok((self.0)(a, b))
    }
}
