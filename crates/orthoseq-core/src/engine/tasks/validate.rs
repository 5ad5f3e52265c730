use crate::core::oracle::{EnergyOracle, OracleError};
use crate::core::sequence::Sequence;
use crate::core::stats::EnergySummary;
use crate::engine::comparison::ComparisonSet;
use crate::engine::config::Thresholds;
use crate::engine::error::EngineError;
use crate::engine::matrix::{HandleInteractions, OffTargetMatrix};
use crate::engine::validation::{CandidateReport, RejectionReason, Verdict, report_candidate};
use tracing::{info, instrument, warn};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Per-handle outcome of re-checking a finished set.
#[derive(Debug, Clone, PartialEq)]
pub struct HandleValidation {
    pub handle: Sequence,
    /// Verdict of the admission policy against the handles listed before it.
    pub verdict: Verdict,
    /// Every energy involving the handle, in both directions. `None` for
    /// duplicates, which have no row.
    pub interactions: Option<HandleInteractions>,
}

#[derive(Debug, Clone)]
pub struct SetValidation {
    pub handles: Vec<HandleValidation>,
    pub matrix: OffTargetMatrix,
    pub summary: Option<EnergySummary>,
}

impl SetValidation {
    pub fn is_valid(&self) -> bool {
        self.handles.iter().all(|h| h.verdict.is_accepted())
    }

    pub fn failures(&self) -> impl Iterator<Item = &HandleValidation> {
        self.handles.iter().filter(|h| !h.verdict.is_accepted())
    }
}

/// Recomputes the full pairwise matrix of `handles` in list order.
///
/// Each handle is judged as if it had been admitted after the ones listed
/// before it, so a set produced by a sequential run validates cleanly under
/// the thresholds it was built with. Duplicates (including reverse
/// complements of earlier entries) are reported as
/// [`RejectionReason::AlreadyInSet`].
#[instrument(skip_all, name = "set_validation_task", fields(handles = handles.len()))]
pub fn validate_set<O>(
    handles: &[Sequence],
    oracle: &O,
    thresholds: &Thresholds,
) -> Result<SetValidation, EngineError>
where
    O: EnergyOracle + ?Sized,
{
    let mut comparison = ComparisonSet::new();
    let mut positions = Vec::with_capacity(handles.len());
    for handle in handles {
        if comparison.push(handle.clone()) {
            positions.push(Some(comparison.len() - 1));
        } else {
            warn!(%handle, "Handle appears more than once in the set.");
            positions.push(None);
        }
    }

    let unique = comparison.handles();
    let targets = comparison.targets();
    let report_at = |idx: usize| -> Result<CandidateReport, OracleError> {
        let mut prefix = ComparisonSet::new();
        for earlier in &unique[..idx] {
            prefix.push(earlier.clone());
        }
        report_candidate(&unique[idx], &prefix, oracle)
    };

    #[cfg(not(feature = "parallel"))]
    let reports: Result<Vec<_>, _> = (0..unique.len()).map(report_at).collect();

    #[cfg(feature = "parallel")]
    let reports: Result<Vec<_>, _> = (0..unique.len()).into_par_iter().map(report_at).collect();

    let reports = reports?;

    let mut matrix = OffTargetMatrix::new(0);
    let mut verdicts = Vec::with_capacity(reports.len());
    for (idx, report) in reports.iter().enumerate() {
        verdicts.push(report.verdict(thresholds, &targets[..2 * idx]));
        if !matrix.push_row(report.row()) {
            return Err(EngineError::Internal(format!(
                "energy row for {} does not match the set",
                report.candidate
            )));
        }
    }

    let handles: Vec<HandleValidation> = handles
        .iter()
        .zip(positions)
        .map(|(handle, position)| match position {
            Some(idx) => HandleValidation {
                handle: handle.clone(),
                verdict: verdicts[idx].clone(),
                interactions: matrix.handle_interactions(idx),
            },
            None => HandleValidation {
                handle: handle.clone(),
                verdict: Verdict::Rejected(RejectionReason::AlreadyInSet),
                interactions: None,
            },
        })
        .collect();

    let validation = SetValidation {
        summary: matrix.summary(),
        handles,
        matrix,
    };
    info!(
        valid = validation.is_valid(),
        failures = validation.failures().count(),
        "Set validation complete."
    );
    Ok(validation)
}
