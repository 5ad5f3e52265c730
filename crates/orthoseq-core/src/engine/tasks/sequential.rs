use crate::core::oracle::EnergyOracle;
use crate::core::sequence::Sequence;
use crate::engine::builder::OrthogonalSetBuilder;
use crate::engine::context::SelectionContext;
use crate::engine::error::EngineError;
use crate::engine::pool::CandidatePool;
use crate::engine::progress::Progress;
use crate::engine::state::SelectionResult;
use tracing::{info, instrument};

/// Draws candidates one by one until the pool is empty, the target size is
/// reached, or the stop signal fires.
#[instrument(skip_all, name = "sequential_selection_task")]
pub fn run<O>(
    mut pool: CandidatePool,
    preexisting: &[Sequence],
    context: &SelectionContext<O>,
) -> Result<SelectionResult, EngineError>
where
    O: EnergyOracle + ?Sized,
{
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
        "Starting sequential selection."
    );
    context.reporter.report(Progress::TaskStart {
        total_steps: pool.size() as u64,
    });

    loop {
        if context.stop.is_stopped() {
            info!("Stop requested; ending selection early.");
            builder.cancel();
            break;
        }
        match builder.step(&mut pool, &mut rng)? {
            Some(_) => context
                .reporter
                .report(Progress::TaskIncrement { amount: 1 }),
            None => break,
        }
    }

    context.reporter.report(Progress::TaskFinish);
    let result = builder.finish(&pool);
    info!(
        accepted = result.accepted.len(),
        rejected = result.rejected.len(),
        stop_reason = ?result.stop_reason,
        "Sequential selection finished."
    );
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::oracle::FnOracle;
    use crate::engine::cancel::StopSignal;
    use crate::engine::config::{SelectionConfig, SelectionConfigBuilder};
    use crate::engine::progress::ProgressReporter;
    use crate::engine::state::StopReason;
    use crate::engine::validation::RejectionReason;
    use std::sync::atomic::{AtomicU64, Ordering};

    fn seq(s: &str) -> Sequence {
        Sequence::new(s).unwrap()
    }

    fn config(seed: u64, target_size: Option<usize>) -> SelectionConfig {
        SelectionConfigBuilder::new()
            .min_on(-20.0)
            .max_on(0.0)
            .min_extreme_off(-12.0)
            .min_mean_off(-9.0)
            .seed(Some(seed))
            .target_size(target_size)
            .build()
            .unwrap()
    }

    fn pool() -> CandidatePool {
        CandidatePool::from_energies(
            ["AAAATGC", "GGGCATT", "CAGTCAG", "TTGACCA", "ACGGTAC", "CATCAAG"]
                .into_iter()
                .map(|s| (seq(s), -9.5)),
        )
    }

    /// Strong binding (-15) whenever the two sequences share a first base.
    fn oracle() -> FnOracle<impl Fn(&Sequence, &Sequence) -> f64 + Sync> {
        FnOracle(|a: &Sequence, b: &Sequence| {
            if a == b || *b == a.reverse_complement() {
                -2.0
            } else if a.as_bytes()[0] == b.as_bytes()[0] {
                -15.0
            } else {
                -6.0
            }
        })
    }

    #[test]
    fn every_candidate_is_decided_exactly_once() {
        let oracle = oracle();
        let config = config(7, None);
        let reporter = ProgressReporter::new();
        let stop = StopSignal::new();
        let context = SelectionContext::new(&oracle, &config, &reporter, &stop);

        let result = run(pool(), &[], &context).unwrap();

        assert_eq!(result.stop_reason, StopReason::PoolExhausted);
        assert_eq!(result.evaluated, 6);
        assert_eq!(result.accepted.len() + result.rejected.len(), 6);
        for rejection in &result.rejected {
            assert!(matches!(
                rejection.reason,
                RejectionReason::CrossBinding { energy, .. } if energy == -15.0
            ));
        }
    }

    #[test]
    fn same_seed_gives_same_selection() {
        let oracle = oracle();
        let config = config(42, None);
        let reporter = ProgressReporter::new();
        let stop = StopSignal::new();
        let context = SelectionContext::new(&oracle, &config, &reporter, &stop);

        let first = run(pool(), &[], &context).unwrap();
        let second = run(pool(), &[], &context).unwrap();
        assert_eq!(first.accepted, second.accepted);
        assert_eq!(first.rejected, second.rejected);
    }

    #[test]
    fn stopped_signal_yields_partial_cancelled_result() {
        let oracle = oracle();
        let config = config(1, None);
        let reporter = ProgressReporter::new();
        let stop = StopSignal::new();
        stop.stop();
        let context = SelectionContext::new(&oracle, &config, &reporter, &stop);

        let result = run(pool(), &[seq("TTTTGGC")], &context).unwrap();
        assert_eq!(result.stop_reason, StopReason::Cancelled);
        assert_eq!(result.evaluated, 0);
        assert_eq!(result.accepted, vec![seq("TTTTGGC")]);
    }

    #[test]
    fn reports_one_increment_per_candidate() {
        let oracle = oracle();
        let config = config(3, Some(2));
        let increments = AtomicU64::new(0);
        let reporter = ProgressReporter::with_callback(Box::new(|event| {
            if let Progress::TaskIncrement { amount } = event {
                increments.fetch_add(amount, Ordering::Relaxed);
            }
        }));
        let stop = StopSignal::new();
        let context = SelectionContext::new(&oracle, &config, &reporter, &stop);

        let result = run(pool(), &[], &context).unwrap();
        drop(reporter);
        assert_eq!(increments.load(Ordering::Relaxed), result.evaluated as u64);
        assert_eq!(result.accepted.len(), 2);
        assert_eq!(result.stop_reason, StopReason::TargetReached);
    }
}
