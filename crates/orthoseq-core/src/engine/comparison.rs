use crate::core::sequence::Sequence;
use std::collections::HashSet;

/// Everything a new candidate has to be checked against.
///
/// Each admitted handle contributes two targets: itself and its reverse
/// complement, stored in admission order as `h0, rc(h0), h1, rc(h1), ...`.
/// The set only ever grows by appending, so a candidate evaluated against a
/// borrowed snapshot sees a consistent prefix of the final target list.
#[derive(Debug, Clone, Default)]
pub struct ComparisonSet {
    handles: Vec<Sequence>,
    targets: Vec<Sequence>,
    known: HashSet<Sequence>,
}

impl ComparisonSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a handle and its reverse complement.
    ///
    /// Returns `false` without modifying the set when the handle, or its
    /// reverse complement, is already present.
    pub fn push(&mut self, handle: Sequence) -> bool {
        let reverse = handle.reverse_complement();
        if self.known.contains(&handle) || self.known.contains(&reverse) {
            return false;
        }
        self.known.insert(handle.clone());
        self.known.insert(reverse.clone());
        self.targets.push(handle.clone());
        self.targets.push(reverse);
        self.handles.push(handle);
        true
    }

    /// Number of handles (not targets).
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    pub fn handles(&self) -> &[Sequence] {
        &self.handles
    }

    pub fn targets(&self) -> &[Sequence] {
        &self.targets
    }

    /// True when `sequence` is an admitted handle or the reverse complement of one.
    pub fn covers(&self, sequence: &Sequence) -> bool {
        self.known.contains(sequence)
    }

    pub fn into_handles(self) -> Vec<Sequence> {
        self.handles
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seq(s: &str) -> Sequence {
        Sequence::new(s).unwrap()
    }

    #[test]
    fn push_adds_both_orientations_as_targets() {
        let mut set = ComparisonSet::new();
        assert!(set.push(seq("AAAATGC")));
        assert!(set.push(seq("GGGCATT")));

        assert_eq!(set.len(), 2);
        assert_eq!(
            set.targets(),
            &[
                seq("AAAATGC"),
                seq("GCATTTT"),
                seq("GGGCATT"),
                seq("AATGCCC")
            ]
        );
    }

    #[test]
    fn push_refuses_a_handle_whose_reverse_complement_is_present() {
        let mut set = ComparisonSet::new();
        set.push(seq("AAAATGC"));
        assert!(!set.push(seq("GCATTTT")));
        assert!(!set.push(seq("AAAATGC")));
        assert_eq!(set.len(), 1);
        assert_eq!(set.targets().len(), 2);
    }

    #[test]
    fn covers_matches_either_orientation() {
        let mut set = ComparisonSet::new();
        set.push(seq("AAAATGC"));
        assert!(set.covers(&seq("AAAATGC")));
        assert!(set.covers(&seq("GCATTTT")));
        assert!(!set.covers(&seq("GGGCATT")));
    }
}
