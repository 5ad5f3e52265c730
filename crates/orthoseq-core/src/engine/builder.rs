use super::comparison::ComparisonSet;
use super::config::Thresholds;
use super::error::EngineError;
use super::matrix::OffTargetMatrix;
use super::pool::CandidatePool;
use super::state::{BuilderState, Rejection, SelectionResult, StopReason};
use super::validation::{
    Evaluation, RejectionReason, Verdict, admit_or_reject, cross_row,
};
use crate::core::oracle::{EnergyOracle, OracleError};
use crate::core::sequence::Sequence;
use rand::Rng;
use tracing::debug;

/// Incremental greedy construction of an orthogonal handle set.
///
/// The builder owns the authoritative accepted set. Candidates are judged
/// against it with [`OrthogonalSetBuilder::evaluate`], which only reads
/// state, and the outcome is folded back in with
/// [`OrthogonalSetBuilder::record`]. Splitting the two lets a batch of
/// candidates be evaluated concurrently against one snapshot before any of
/// them is merged.
pub struct OrthogonalSetBuilder<'a, O>
where
    O: EnergyOracle + ?Sized,
{
    oracle: &'a O,
    thresholds: Thresholds,
    target_size: Option<usize>,
    comparison: ComparisonSet,
    matrix: OffTargetMatrix,
    rejected: Vec<Rejection>,
    evaluated: usize,
    state: BuilderState,
}

impl<'a, O> OrthogonalSetBuilder<'a, O>
where
    O: EnergyOracle + ?Sized,
{
    /// Starts from `preexisting` handles, which are trusted and not re-checked.
    pub fn new(
        oracle: &'a O,
        thresholds: Thresholds,
        target_size: Option<usize>,
        preexisting: &[Sequence],
    ) -> Result<Self, EngineError> {
        let mut comparison = ComparisonSet::new();
        for handle in preexisting {
            if !comparison.push(handle.clone()) {
                return Err(EngineError::DuplicateHandle {
                    sequence: handle.to_string(),
                });
            }
        }
        Ok(Self {
            oracle,
            thresholds,
            target_size,
            matrix: OffTargetMatrix::new(comparison.len()),
            comparison,
            rejected: Vec::new(),
            evaluated: 0,
            state: BuilderState::Ready,
        })
    }

    pub fn state(&self) -> BuilderState {
        self.state
    }

    pub fn comparison(&self) -> &ComparisonSet {
        &self.comparison
    }

    pub fn matrix(&self) -> &OffTargetMatrix {
        &self.matrix
    }

    pub fn accepted(&self) -> &[Sequence] {
        self.comparison.handles()
    }

    pub fn rejected(&self) -> &[Rejection] {
        &self.rejected
    }

    pub fn target_reached(&self) -> bool {
        self.target_size
            .is_some_and(|target| self.comparison.len() >= target)
    }

    /// Handles still needed to reach the target size, if one is set.
    pub fn remaining_capacity(&self) -> Option<usize> {
        self.target_size
            .map(|target| target.saturating_sub(self.comparison.len()))
    }

    /// Moves to `Done` when the target is reached or the pool is empty.
    pub fn refresh_state(&mut self, pool: &CandidatePool) -> BuilderState {
        if let BuilderState::Done(StopReason::Cancelled) = self.state {
            return self.state;
        }
        self.state = if self.target_reached() {
            BuilderState::Done(StopReason::TargetReached)
        } else if pool.is_empty() {
            BuilderState::Done(StopReason::PoolExhausted)
        } else {
            BuilderState::Ready
        };
        self.state
    }

    pub fn cancel(&mut self) {
        self.state = BuilderState::Done(StopReason::Cancelled);
    }

    /// Judges `candidate` against the current accepted set without changing it.
    pub fn evaluate(&self, candidate: &Sequence) -> Result<Evaluation, OracleError> {
        if self.comparison.covers(candidate) {
            return Ok(Evaluation {
                candidate: candidate.clone(),
                verdict: Verdict::Rejected(RejectionReason::AlreadyInSet),
                energies: Vec::new(),
            });
        }
        admit_or_reject(candidate, &self.comparison, &self.thresholds, self.oracle)
    }

    /// Folds a decision into the accepted set.
    ///
    /// An accepted evaluation made against an older snapshot of the set is
    /// still admitted, but its energy row is completed against the handles
    /// that joined since, so the matrix stays consistent. A candidate whose
    /// orientation joined in the meantime is recorded as a rejection.
    /// Returns whether the candidate was admitted.
    pub fn record(&mut self, evaluation: Evaluation) -> Result<bool, EngineError> {
        self.evaluated += 1;
        let Evaluation {
            candidate,
            verdict,
            mut energies,
        } = evaluation;

        let reason = match verdict {
            Verdict::Accepted if self.comparison.covers(&candidate) => {
                RejectionReason::AlreadyInSet
            }
            Verdict::Accepted => {
                let covered_targets = energies.len().saturating_sub(2) / 2;
                if covered_targets < self.comparison.targets().len() {
                    let missing = &self.comparison.targets()[covered_targets..];
                    energies.extend(cross_row(
                        &candidate,
                        &candidate.reverse_complement(),
                        missing,
                        self.oracle,
                    )?);
                }
                if !self.matrix.push_row(energies) {
                    return Err(EngineError::Internal(format!(
                        "energy row for {} does not match the accepted set",
                        candidate
                    )));
                }
                debug!(%candidate, accepted = self.comparison.len() + 1, "Accepted candidate.");
                self.comparison.push(candidate);
                return Ok(true);
            }
            Verdict::Rejected(reason) => reason,
        };

        debug!(%candidate, ?reason, "Rejected candidate.");
        self.rejected.push(Rejection {
            sequence: candidate,
            reason,
        });
        Ok(false)
    }

    /// Draws one candidate, decides on it and records the decision.
    ///
    /// Returns `None` once the builder is done.
    pub fn step<R>(
        &mut self,
        pool: &mut CandidatePool,
        rng: &mut R,
    ) -> Result<Option<bool>, EngineError>
    where
        R: Rng + ?Sized,
    {
        if let BuilderState::Done(_) = self.refresh_state(pool) {
            return Ok(None);
        }
        let candidate = pool.draw_and_remove(rng)?;
        self.state = BuilderState::Evaluating;
        let evaluation = self.evaluate(&candidate)?;
        let admitted = self.record(evaluation)?;
        self.refresh_state(pool);
        Ok(Some(admitted))
    }

    pub fn finish(mut self, pool: &CandidatePool) -> SelectionResult {
        let stop_reason = match self.refresh_state(pool) {
            BuilderState::Done(reason) => reason,
            // Only reachable when a caller stops early without cancelling.
            _ => StopReason::Cancelled,
        };
        SelectionResult {
            preexisting: self.matrix.preexisting(),
            accepted: self.comparison.into_handles(),
            rejected: self.rejected,
            matrix: self.matrix,
            evaluated: self.evaluated,
            stop_reason,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::oracle::FnOracle;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn seq(s: &str) -> Sequence {
        Sequence::new(s).unwrap()
    }

    fn thresholds() -> Thresholds {
        Thresholds {
            min_on: -20.0,
            max_on: 0.0,
            min_extreme_off: -12.0,
            min_mean_off: -9.0,
        }
    }

    fn flat_oracle() -> FnOracle<impl Fn(&Sequence, &Sequence) -> f64 + Sync> {
        FnOracle(|a: &Sequence, b: &Sequence| {
            if a == b || *b == a.reverse_complement() {
                -1.0
            } else {
                -10.0
            }
        })
    }

    #[test]
    fn two_candidate_pool_is_accepted_under_bootstrap() {
        let oracle = flat_oracle();
        let mut pool =
            CandidatePool::from_energies([(seq("AAAATGC"), -9.8), (seq("GGGCATT"), -9.5)]);
        let mut builder = OrthogonalSetBuilder::new(&oracle, thresholds(), None, &[]).unwrap();
        let mut rng = StdRng::seed_from_u64(11);

        assert_eq!(builder.step(&mut pool, &mut rng).unwrap(), Some(true));
        assert_eq!(builder.accepted().len(), 1);
        assert_eq!(builder.step(&mut pool, &mut rng).unwrap(), Some(true));
        assert_eq!(builder.step(&mut pool, &mut rng).unwrap(), None);

        let result = builder.finish(&pool);
        assert_eq!(result.accepted.len(), 2);
        assert_eq!(result.stop_reason, StopReason::PoolExhausted);
        assert_eq!(result.evaluated, 2);
        assert_eq!(result.matrix.handle_count(), 2);
    }

    #[test]
    fn third_candidate_faces_the_mean_check() {
        let oracle = flat_oracle();
        let mut pool = CandidatePool::from_energies([
            (seq("AAAATGC"), -9.8),
            (seq("GGGCATT"), -9.5),
            (seq("CAGTCAG"), -9.7),
        ]);
        let mut builder = OrthogonalSetBuilder::new(&oracle, thresholds(), None, &[]).unwrap();
        let mut rng = StdRng::seed_from_u64(2);
        while builder.step(&mut pool, &mut rng).unwrap().is_some() {}

        let result = builder.finish(&pool);
        // Row of the third candidate: two self energies of -1 and eight
        // cross energies of -10 give a mean of -8.2, above -9.
        assert_eq!(result.accepted.len(), 3);
        assert!(result.rejected.is_empty());
    }

    #[test]
    fn target_size_stops_the_run() {
        let oracle = flat_oracle();
        let mut pool = CandidatePool::from_energies([
            (seq("AAAATGC"), -9.8),
            (seq("GGGCATT"), -9.5),
            (seq("CAGTCAG"), -9.7),
        ]);
        let mut builder = OrthogonalSetBuilder::new(&oracle, thresholds(), Some(2), &[]).unwrap();
        let mut rng = StdRng::seed_from_u64(2);
        while builder.step(&mut pool, &mut rng).unwrap().is_some() {}

        assert_eq!(builder.state(), BuilderState::Done(StopReason::TargetReached));
        assert_eq!(pool.size(), 1);
        assert_eq!(builder.finish(&pool).accepted.len(), 2);
    }

    #[test]
    fn preexisting_handles_count_toward_the_target() {
        let oracle = flat_oracle();
        let pool = CandidatePool::from_energies([(seq("CAGTCAG"), -9.7)]);
        let mut builder =
            OrthogonalSetBuilder::new(&oracle, thresholds(), Some(1), &[seq("AAAATGC")]).unwrap();
        assert_eq!(
            builder.refresh_state(&pool),
            BuilderState::Done(StopReason::TargetReached)
        );
    }

    #[test]
    fn duplicate_preexisting_handles_are_an_error() {
        let oracle = flat_oracle();
        let result = OrthogonalSetBuilder::new(
            &oracle,
            thresholds(),
            None,
            &[seq("AAAATGC"), seq("GCATTTT")],
        );
        assert!(matches!(result, Err(EngineError::DuplicateHandle { .. })));
    }

    #[test]
    fn candidate_already_in_set_is_rejected_without_energy_queries() {
        let oracle = crate::core::oracle::PairEnergyLibrary::default();
        let builder =
            OrthogonalSetBuilder::new(&oracle, thresholds(), None, &[seq("AAAATGC")]).unwrap();
        let evaluation = builder.evaluate(&seq("GCATTTT")).unwrap();
        assert_eq!(
            evaluation.verdict,
            Verdict::Rejected(RejectionReason::AlreadyInSet)
        );
    }

    #[test]
    fn record_completes_rows_evaluated_against_an_older_snapshot() {
        let oracle = flat_oracle();
        let mut builder = OrthogonalSetBuilder::new(&oracle, thresholds(), None, &[]).unwrap();

        let first = builder.evaluate(&seq("AAAATGC")).unwrap();
        let second = builder.evaluate(&seq("GGGCATT")).unwrap();
        assert_eq!(second.energies.len(), 2);

        assert!(builder.record(first).unwrap());
        assert!(builder.record(second).unwrap());
        assert_eq!(builder.matrix().row(1).unwrap().len(), 6);
    }

    #[test]
    fn reverse_complement_accepted_in_same_snapshot_is_rejected_on_merge() {
        let oracle = flat_oracle();
        let mut builder = OrthogonalSetBuilder::new(&oracle, thresholds(), None, &[]).unwrap();

        let forward = builder.evaluate(&seq("AAAATGC")).unwrap();
        let reverse = builder.evaluate(&seq("GCATTTT")).unwrap();
        assert!(builder.record(forward).unwrap());
        assert!(!builder.record(reverse).unwrap());
        assert_eq!(
            builder.rejected()[0].reason,
            RejectionReason::AlreadyInSet
        );
    }

    #[test]
    fn cancel_is_sticky() {
        let oracle = flat_oracle();
        let mut pool = CandidatePool::from_energies([(seq("AAAATGC"), -9.8)]);
        let mut builder = OrthogonalSetBuilder::new(&oracle, thresholds(), None, &[]).unwrap();
        builder.cancel();
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(builder.step(&mut pool, &mut rng).unwrap(), None);
        assert_eq!(pool.size(), 1);
        assert_eq!(builder.finish(&pool).stop_reason, StopReason::Cancelled);
    }
}
