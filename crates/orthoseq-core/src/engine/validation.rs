//! Admission policy for a single candidate.
//!
//! A candidate is judged on its *energy row*: its two self energies
//! (forward vs forward, reverse vs reverse) followed by its cross energies
//! against every target of the comparison set. For the comparison target at
//! position `t` the row holds `energy(forward, target)` then
//! `energy(reverse, target)`, so the row for a set of `n` handles always has
//! `2 + 4n` entries and extending the set only appends to it.

use super::comparison::ComparisonSet;
use super::config::Thresholds;
use crate::core::oracle::{EnergyOracle, OracleError};
use crate::core::sequence::Sequence;
use tracing::trace;

/// Accepted sets smaller than this skip the mean check.
pub const MEAN_CHECK_MIN_HANDLES: usize = 2;

#[derive(Debug, Clone, PartialEq)]
pub enum RejectionReason {
    SelfBinding {
        orientation: Sequence,
        energy: f64,
    },
    CrossBinding {
        orientation: Sequence,
        partner: Sequence,
        energy: f64,
    },
    MeanOffTarget {
        mean: f64,
    },
    /// The candidate, or its reverse complement, is already a member.
    AlreadyInSet,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Verdict {
    Accepted,
    Rejected(RejectionReason),
}

impl Verdict {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Verdict::Accepted)
    }
}

/// Outcome of a short-circuiting evaluation.
///
/// `energies` is the prefix of the candidate's energy row computed before a
/// decision was reached. For accepted candidates it is always the full row.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub candidate: Sequence,
    pub verdict: Verdict,
    pub energies: Vec<f64>,
}

/// Full energy row of a candidate, computed regardless of thresholds.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateReport {
    pub candidate: Sequence,
    pub self_energies: [f64; 2],
    pub cross_energies: Vec<f64>,
    /// Number of handles in the comparison set the row was computed against.
    pub compared_handles: usize,
}

impl CandidateReport {
    pub fn row(&self) -> Vec<f64> {
        let mut row = Vec::with_capacity(2 + self.cross_energies.len());
        row.extend_from_slice(&self.self_energies);
        row.extend_from_slice(&self.cross_energies);
        row
    }

    pub fn min_energy(&self) -> f64 {
        self.self_energies
            .iter()
            .chain(&self.cross_energies)
            .copied()
            .fold(f64::INFINITY, f64::min)
    }

    pub fn mean_energy(&self) -> f64 {
        mean(self.self_energies.iter().chain(&self.cross_energies).copied())
    }

    /// Applies the admission policy to the full row.
    ///
    /// Yields the same verdict as [`admit_or_reject`] against the same
    /// comparison set.
    pub fn verdict(&self, thresholds: &Thresholds, targets: &[Sequence]) -> Verdict {
        let orientations = [self.candidate.clone(), self.candidate.reverse_complement()];
        for (o, &energy) in self.self_energies.iter().enumerate() {
            if energy < thresholds.min_extreme_off {
                return Verdict::Rejected(RejectionReason::SelfBinding {
                    orientation: orientations[o].clone(),
                    energy,
                });
            }
        }
        for (idx, &energy) in self.cross_energies.iter().enumerate() {
            if energy < thresholds.min_extreme_off {
                return Verdict::Rejected(RejectionReason::CrossBinding {
                    orientation: orientations[idx % 2].clone(),
                    partner: targets[idx / 2].clone(),
                    energy,
                });
            }
        }
        mean_check(
            self.mean_energy(),
            self.compared_handles,
            thresholds.min_mean_off,
        )
    }
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, count) = values.fold((0.0, 0usize), |(s, c), v| (s + v, c + 1));
    if count == 0 { 0.0 } else { sum / count as f64 }
}

fn mean_check(mean: f64, compared_handles: usize, min_mean_off: f64) -> Verdict {
    if compared_handles >= MEAN_CHECK_MIN_HANDLES && mean < min_mean_off {
        Verdict::Rejected(RejectionReason::MeanOffTarget { mean })
    } else {
        Verdict::Accepted
    }
}

/// Decides whether `candidate` may join the set described by `comparison`.
///
/// Self energies are checked first, then cross energies in row order; the
/// first value below `min_extreme_off` rejects without computing the rest.
/// The mean over the full row is only consulted once the set holds at least
/// [`MEAN_CHECK_MIN_HANDLES`] handles.
pub fn admit_or_reject<O>(
    candidate: &Sequence,
    comparison: &ComparisonSet,
    thresholds: &Thresholds,
    oracle: &O,
) -> Result<Evaluation, OracleError>
where
    O: EnergyOracle + ?Sized,
{
    let orientations = [candidate.clone(), candidate.reverse_complement()];
    let mut energies = Vec::with_capacity(2 + 2 * comparison.targets().len());

    let reject = |energies: Vec<f64>, reason: RejectionReason| Evaluation {
        candidate: candidate.clone(),
        verdict: Verdict::Rejected(reason),
        energies,
    };

    for orientation in &orientations {
        let energy = oracle.energy(orientation, orientation)?;
        trace!(%orientation, energy, "Self energy.");
        energies.push(energy);
        if energy < thresholds.min_extreme_off {
            return Ok(reject(
                energies,
                RejectionReason::SelfBinding {
                    orientation: orientation.clone(),
                    energy,
                },
            ));
        }
    }

    for target in comparison.targets() {
        for orientation in &orientations {
            let energy = oracle.energy(orientation, target)?;
            trace!(%orientation, %target, energy, "Cross energy.");
            energies.push(energy);
            if energy < thresholds.min_extreme_off {
                return Ok(reject(
                    energies,
                    RejectionReason::CrossBinding {
                        orientation: orientation.clone(),
                        partner: target.clone(),
                        energy,
                    },
                ));
            }
        }
    }

    let verdict = mean_check(
        mean(energies.iter().copied()),
        comparison.len(),
        thresholds.min_mean_off,
    );
    Ok(Evaluation {
        candidate: candidate.clone(),
        verdict,
        energies,
    })
}

/// Computes the candidate's complete energy row against `comparison`.
pub fn report_candidate<O>(
    candidate: &Sequence,
    comparison: &ComparisonSet,
    oracle: &O,
) -> Result<CandidateReport, OracleError>
where
    O: EnergyOracle + ?Sized,
{
    let forward = candidate.clone();
    let reverse = candidate.reverse_complement();

    let self_energies = [
        oracle.energy(&forward, &forward)?,
        oracle.energy(&reverse, &reverse)?,
    ];
    let cross_energies = cross_row(&forward, &reverse, comparison.targets(), oracle)?;

    Ok(CandidateReport {
        candidate: forward,
        self_energies,
        cross_energies,
        compared_handles: comparison.len(),
    })
}

/// Cross energies of both orientations against `targets`, in row order.
pub(crate) fn cross_row<O>(
    forward: &Sequence,
    reverse: &Sequence,
    targets: &[Sequence],
    oracle: &O,
) -> Result<Vec<f64>, OracleError>
where
    O: EnergyOracle + ?Sized,
{
    let mut row = Vec::with_capacity(2 * targets.len());
    for target in targets {
        row.push(oracle.energy(forward, target)?);
        row.push(oracle.energy(reverse, target)?);
    }
    Ok(row)
}
