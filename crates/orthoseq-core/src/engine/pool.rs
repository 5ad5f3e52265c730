use crate::core::oracle::{EnergyOracle, OracleError};
use crate::core::sequence::Sequence;
use rand::Rng;
use std::collections::{BTreeMap, HashSet};
use thiserror::Error;
use tracing::debug;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum PoolError {
    #[error("Cannot draw from an empty candidate pool")]
    Empty,
}

#[derive(Debug, Clone, PartialEq)]
struct PoolEntry {
    sequence: Sequence,
    on_target: f64,
}

/// Sequences that have not been decided on yet, with their on-target energies.
///
/// Entries live in a contiguous arena. Drawing picks a uniform index and
/// removes it with `swap_remove`, so a sequence leaves the pool the moment
/// it is drawn and can never be returned twice. The arena is built in
/// sorted order, which makes a draw sequence a pure function of the RNG seed.
#[derive(Debug, Clone, Default)]
pub struct CandidatePool {
    entries: Vec<PoolEntry>,
}

impl CandidatePool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a pool from (sequence, on-target energy) pairs.
    ///
    /// When a sequence appears more than once the last energy wins.
    pub fn from_energies<I>(energies: I) -> Self
    where
        I: IntoIterator<Item = (Sequence, f64)>,
    {
        let sorted: BTreeMap<Sequence, f64> = energies.into_iter().collect();
        Self {
            entries: sorted
                .into_iter()
                .map(|(sequence, on_target)| PoolEntry {
                    sequence,
                    on_target,
                })
                .collect(),
        }
    }

    /// Computes the on-target energy of every candidate through `oracle`.
    pub fn from_oracle<O>(candidates: &[Sequence], oracle: &O) -> Result<Self, OracleError>
    where
        O: EnergyOracle + ?Sized,
    {
        let compute = |s: &Sequence| oracle.on_target_energy(s).map(|e| (s.clone(), e));

        #[cfg(not(feature = "parallel"))]
        let energies: Result<Vec<_>, _> = candidates.iter().map(compute).collect();

        #[cfg(feature = "parallel")]
        let energies: Result<Vec<_>, _> = candidates.par_iter().map(compute).collect();

        Ok(Self::from_energies(energies?))
    }

    pub fn size(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, sequence: &Sequence) -> bool {
        self.entries.iter().any(|e| &e.sequence == sequence)
    }

    pub fn on_target_energy(&self, sequence: &Sequence) -> Option<f64> {
        self.entries
            .iter()
            .find(|e| &e.sequence == sequence)
            .map(|e| e.on_target)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Sequence, f64)> {
        self.entries.iter().map(|e| (&e.sequence, e.on_target))
    }

    pub fn energies(&self) -> impl Iterator<Item = f64> + '_ {
        self.entries.iter().map(|e| e.on_target)
    }

    /// Removes and returns a uniformly chosen remaining sequence.
    pub fn draw_and_remove<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<Sequence, PoolError> {
        if self.entries.is_empty() {
            return Err(PoolError::Empty);
        }
        let idx = rng.gen_range(0..self.entries.len());
        Ok(self.entries.swap_remove(idx).sequence)
    }

    /// Draws up to `n` sequences; fewer when the pool runs dry.
    pub fn draw_batch<R: Rng + ?Sized>(&mut self, n: usize, rng: &mut R) -> Vec<Sequence> {
        let count = n.min(self.entries.len());
        (0..count)
            .filter_map(|_| self.draw_and_remove(rng).ok())
            .collect()
    }

    /// Drops every entry whose on-target energy lies outside `[min_on, max_on]`.
    ///
    /// Returns the number of entries removed.
    pub fn filter_energy_range(&mut self, min_on: f64, max_on: f64) -> usize {
        let before = self.entries.len();
        self.entries
            .retain(|e| e.on_target >= min_on && e.on_target <= max_on);
        let removed = before - self.entries.len();
        debug!(
            removed,
            remaining = self.entries.len(),
            min_on,
            max_on,
            "Filtered candidate pool by on-target energy."
        );
        removed
    }

    /// Drops every entry that is one of `handles` or the reverse complement of one.
    pub fn remove_handles(&mut self, handles: &[Sequence]) -> usize {
        let excluded: HashSet<Sequence> = handles
            .iter()
            .flat_map(|h| [h.clone(), h.reverse_complement()])
            .collect();
        let before = self.entries.len();
        self.entries.retain(|e| !excluded.contains(&e.sequence));
        before - self.entries.len()
    }

    pub fn into_energy_map(self) -> BTreeMap<Sequence, f64> {
        self.entries
            .into_iter()
            .map(|e| (e.sequence, e.on_target))
            .collect()
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

    fn sample_pool() -> CandidatePool {
        CandidatePool::from_energies([
            (seq("AAAATGC"), -9.8),
            (seq("GGGCATT"), -9.5),
            (seq("CAGTCAG"), -11.0),
            (seq("TTGACCA"), -7.2),
            (seq("ACGGTAC"), -10.4),
        ])
    }

    #[test]
    fn draw_and_remove_fails_on_empty_pool() {
        let mut pool = CandidatePool::new();
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(pool.draw_and_remove(&mut rng), Err(PoolError::Empty));
    }

    #[test]
    fn draw_and_remove_depletes_without_repeats() {
        let mut pool = sample_pool();
        let initial = pool.size();
        let mut rng = StdRng::seed_from_u64(42);
        let mut seen = HashSet::new();

        for n in 1..=initial {
            let drawn = pool.draw_and_remove(&mut rng).unwrap();
            assert!(seen.insert(drawn.clone()), "{} drawn twice", drawn);
            assert!(!pool.contains(&drawn));
            assert_eq!(pool.size(), initial - n);
        }
        assert!(pool.is_empty());
        assert_eq!(pool.draw_and_remove(&mut rng), Err(PoolError::Empty));
    }

    #[test]
    fn draw_order_is_reproducible_for_a_fixed_seed() {
        let draw_all = |seed| {
            let mut pool = sample_pool();
            let mut rng = StdRng::seed_from_u64(seed);
            std::iter::from_fn(|| pool.draw_and_remove(&mut rng).ok()).collect::<Vec<_>>()
        };
        assert_eq!(draw_all(7), draw_all(7));
    }

    #[test]
    fn draw_order_does_not_depend_on_insertion_order() {
        let forward = sample_pool();
        let mut reversed_entries: Vec<_> = sample_pool()
            .iter()
            .map(|(s, e)| (s.clone(), e))
            .collect();
        reversed_entries.reverse();
        let reversed = CandidatePool::from_energies(reversed_entries);

        let draw_all = |mut pool: CandidatePool| {
            let mut rng = StdRng::seed_from_u64(3);
            std::iter::from_fn(|| pool.draw_and_remove(&mut rng).ok()).collect::<Vec<_>>()
        };
        assert_eq!(draw_all(forward), draw_all(reversed));
    }

    #[test]
    fn draw_batch_stops_at_pool_size() {
        let mut pool = sample_pool();
        let mut rng = StdRng::seed_from_u64(5);
        assert_eq!(pool.draw_batch(3, &mut rng).len(), 3);
        assert_eq!(pool.draw_batch(10, &mut rng).len(), 2);
        assert!(pool.is_empty());
    }

    #[test]
    fn filter_energy_range_keeps_exactly_the_window() {
        let original = sample_pool();
        let mut pool = original.clone();
        let removed = pool.filter_energy_range(-10.5, -9.5);

        assert_eq!(removed, 2);
        for (_, energy) in pool.iter() {
            assert!((-10.5..=-9.5).contains(&energy));
        }
        for (sequence, energy) in original.iter() {
            if (-10.5..=-9.5).contains(&energy) {
                assert!(pool.contains(sequence));
            }
        }
    }

    #[test]
    fn filter_energy_range_is_idempotent() {
        let mut pool = sample_pool();
        pool.filter_energy_range(-10.5, -9.5);
        let once: Vec<_> = pool.iter().map(|(s, _)| s.clone()).collect();
        assert_eq!(pool.filter_energy_range(-10.5, -9.5), 0);
        let twice: Vec<_> = pool.iter().map(|(s, _)| s.clone()).collect();
        assert_eq!(once, twice);
    }

    #[test]
    fn remove_handles_drops_both_orientations() {
        let mut pool = CandidatePool::from_energies([
            (seq("AAAATGC"), -9.8),
            (seq("GCATTTT"), -9.8),
            (seq("GGGCATT"), -9.5),
        ]);
        assert_eq!(pool.remove_handles(&[seq("AAAATGC")]), 2);
        assert_eq!(pool.size(), 1);
        assert!(pool.contains(&seq("GGGCATT")));
    }

    #[test]
    fn from_oracle_computes_on_target_energies() {
        let oracle = FnOracle(|a: &Sequence, b: &Sequence| {
            if *b == a.reverse_complement() {
                -(a.len() as f64)
            } else {
                0.0
            }
        });
        let pool = CandidatePool::from_oracle(&[seq("ACGA"), seq("ACGTAC")], &oracle).unwrap();
        assert_eq!(pool.on_target_energy(&seq("ACGA")), Some(-4.0));
        assert_eq!(pool.on_target_energy(&seq("ACGTAC")), Some(-6.0));
    }
}
