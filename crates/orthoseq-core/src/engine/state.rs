use super::matrix::OffTargetMatrix;
use super::validation::RejectionReason;
use crate::core::sequence::Sequence;

/// Why a selection run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    PoolExhausted,
    TargetReached,
    Cancelled,
}

/// Lifecycle of an [`super::builder::OrthogonalSetBuilder`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuilderState {
    /// Candidates remain and the target size (if any) is not reached.
    Ready,
    /// A candidate has been drawn and its checks are running.
    Evaluating,
    Done(StopReason),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Rejection {
    pub sequence: Sequence,
    pub reason: RejectionReason,
}

/// Final product of a selection run.
#[derive(Debug, Clone)]
pub struct SelectionResult {
    /// Handles in admission order, pre-existing ones first.
    pub accepted: Vec<Sequence>,
    /// How many leading entries of `accepted` were supplied up front.
    pub preexisting: usize,
    /// Rejected candidates in draw order.
    pub rejected: Vec<Rejection>,
    /// Energies recorded for handles admitted during this run.
    pub matrix: OffTargetMatrix,
    /// Candidates evaluated during this run.
    pub evaluated: usize,
    pub stop_reason: StopReason,
}

impl SelectionResult {
    /// Handles admitted during this run.
    pub fn newly_accepted(&self) -> &[Sequence] {
        &self.accepted[self.preexisting..]
    }
}
