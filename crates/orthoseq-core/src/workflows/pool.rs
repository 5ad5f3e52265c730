use crate::core::oracle::EnergyOracle;
use crate::core::sequence::Sequence;
use crate::core::stats::EnergySummary;
use crate::engine::error::EngineError;
use crate::engine::pool::CandidatePool;
use crate::engine::progress::{Progress, ProgressReporter};
use tracing::{info, instrument};

/// Computes the on-target energy of every candidate and collects them into
/// a pool.
#[instrument(skip_all, name = "pool_workflow", fields(candidates = candidates.len()))]
pub fn run<O>(
    candidates: &[Sequence],
    oracle: &O,
    reporter: &ProgressReporter,
) -> Result<CandidatePool, EngineError>
where
    O: EnergyOracle + ?Sized,
{
    reporter.report(Progress::PhaseStart {
        name: "Computing On-Target Energies",
    });
    let pool = CandidatePool::from_oracle(candidates, oracle)?;
    reporter.report(Progress::PhaseFinish);

    match EnergySummary::from_values(pool.energies()) {
        Some(summary) => info!(
            size = pool.size(),
            min = summary.min,
            max = summary.max,
            mean = summary.mean,
            std_dev = summary.std_dev,
            "Candidate pool built."
        ),
        None => info!("Candidate pool is empty."),
    }
    Ok(pool)
}
