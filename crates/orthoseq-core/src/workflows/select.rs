use crate::core::oracle::EnergyOracle;
use crate::core::sequence::Sequence;
use crate::engine::cancel::StopSignal;
use crate::engine::config::{ExecutionMode, SelectionConfig};
use crate::engine::context::SelectionContext;
use crate::engine::error::EngineError;
use crate::engine::pool::CandidatePool;
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::state::SelectionResult;
use crate::engine::tasks;
use tracing::{info, instrument, warn};

/// Runs a complete selection.
///
/// The pool is first restricted to the on-target window of
/// `config.thresholds`, and any sequence already present in `preexisting`
/// (in either orientation) is dropped from it. The remaining candidates are
/// then decided according to `config.mode`.
#[instrument(skip_all, name = "selection_workflow")]
pub fn run<O>(
    mut pool: CandidatePool,
    preexisting: &[Sequence],
    oracle: &O,
    config: &SelectionConfig,
    reporter: &ProgressReporter,
    stop: &StopSignal,
) -> Result<SelectionResult, EngineError>
where
    O: EnergyOracle + ?Sized,
{
    // === Phase 1: Pool preparation ===
    reporter.report(Progress::PhaseStart {
        name: "Preparing Pool",
    });
    let initial = pool.size();
    let thresholds = &config.thresholds;
    let out_of_window = pool.filter_energy_range(thresholds.min_on, thresholds.max_on);
    let already_present = pool.remove_handles(preexisting);
    info!(
        initial,
        out_of_window,
        already_present,
        remaining = pool.size(),
        "Candidate pool prepared."
    );
    if pool.is_empty() {
        warn!("No candidates left after filtering; the selection will only contain pre-existing handles.");
    }
    reporter.report(Progress::PhaseFinish);

    // === Phase 2: Selection ===
    reporter.report(Progress::PhaseStart {
        name: "Selecting Handles",
    });
    let context = SelectionContext::new(oracle, config, reporter, stop);
    let result = match config.mode {
        ExecutionMode::Sequential => tasks::sequential::run(pool, preexisting, &context)?,
        ExecutionMode::Batched { batch_size } => {
            tasks::batch::run(pool, preexisting, &context, batch_size)?
        }
    };
    reporter.report(Progress::PhaseFinish);

    info!(
        accepted = result.accepted.len(),
        newly_accepted = result.newly_accepted().len(),
        evaluated = result.evaluated,
        stop_reason = ?result.stop_reason,
        "Selection workflow complete."
    );
    Ok(result)
}
