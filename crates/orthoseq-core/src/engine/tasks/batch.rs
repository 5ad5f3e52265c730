use crate::core::oracle::{EnergyOracle, OracleError};
use crate::core::sequence::Sequence;
use crate::engine::builder::OrthogonalSetBuilder;
use crate::engine::context::SelectionContext;
use crate::engine::error::EngineError;
use crate::engine::pool::CandidatePool;
use crate::engine::progress::Progress;
use crate::engine::state::{BuilderState, SelectionResult};
use crate::engine::validation::Evaluation;
use tracing::{debug, info, instrument};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Selection in batches of up to `batch_size` candidates.
///
/// Every candidate of a batch is evaluated against the accepted set as it
/// stood when the batch was drawn; candidates accepted within the same batch
/// do not see each other. Acceptances are merged in draw order once the
/// whole batch is decided, and the next batch sees the merged set. Batches
/// never exceed the room left below the target size. The stop signal is
/// checked between batches.
#[instrument(skip_all, name = "batch_selection_task", fields(batch_size = batch_size))]
pub fn run<O>(
    mut pool: CandidatePool,
    preexisting: &[Sequence],
    context: &SelectionContext<O>,
    batch_size: usize,
) -> Result<SelectionResult, EngineError>
where
    O: EnergyOracle + ?Sized,
{
    if batch_size == 0 {
        return Err(EngineError::Internal(
            "batch size must be at least 1".to_string(),
        ));
    }

    let config = context.config;
    let mut builder = OrthogonalSetBuilder::new(
        context.oracle,
        config.thresholds,
        config.target_size,
        preexisting,
    )?;
    let mut rng = context.rng();

    info!(
        pool_size = pool.size(),
        preexisting = preexisting.len(),
        batch_size,
        "Starting batched selection."
    );
    context.reporter.report(Progress::TaskStart {
        total_steps: pool.size() as u64,
    });

    let mut batch_index = 0usize;
    loop {
        if context.stop.is_stopped() {
            info!("Stop requested; ending selection between batches.");
            builder.cancel();
            break;
        }
        if let BuilderState::Done(_) = builder.refresh_state(&pool) {
            break;
        }

        let size = builder
            .remaining_capacity()
            .map_or(batch_size, |room| room.min(batch_size));
        let candidates = pool.draw_batch(size, &mut rng);
        let evaluations = evaluate_batch(&builder, &candidates)?;

        let mut admitted = 0usize;
        for evaluation in evaluations {
            if builder.record(evaluation)? {
                admitted += 1;
            }
        }
        debug!(
            batch = batch_index,
            drawn = candidates.len(),
            admitted,
            accepted = builder.accepted().len(),
            "Merged batch."
        );
        context.reporter.report(Progress::TaskIncrement {
            amount: candidates.len() as u64,
        });
        batch_index += 1;
    }

    context.reporter.report(Progress::TaskFinish);
    let result = builder.finish(&pool);
    info!(
        batches = batch_index,
        accepted = result.accepted.len(),
        rejected = result.rejected.len(),
        stop_reason = ?result.stop_reason,
        "Batched selection finished."
    );
    Ok(result)
}

/// Evaluates `candidates` against the builder's current set; results keep
/// the input order.
fn evaluate_batch<O>(
    builder: &OrthogonalSetBuilder<'_, O>,
    candidates: &[Sequence],
) -> Result<Vec<Evaluation>, OracleError>
where
    O: EnergyOracle + ?Sized,
{
    #[cfg(not(feature = "parallel"))]
    let iterator = candidates.iter();

    #[cfg(feature = "parallel")]
    let iterator = candidates.par_iter();

    iterator
        .map(|candidate| builder.evaluate(candidate))
        .collect()
}
