use super::library::{KeyOrder, PairEnergyLibrary};
use super::{EnergyOracle, OracleError};
use crate::core::io::store::StoreError;
use crate::core::sequence::Sequence;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{PoisonError, RwLock};
use tracing::{debug, info, trace};

/// Live (uncached) energy computation, e.g. a nearest-neighbour folding model.
pub trait EnergyModel: Sync {
    fn compute(&self, a: &Sequence, b: &Sequence) -> Result<f64, OracleError>;
}

impl<F> EnergyModel for F
where
    F: Fn(&Sequence, &Sequence) -> f64 + Sync,
{
    fn compute(&self, a: &Sequence, b: &Sequence) -> Result<f64, OracleError> {
        Ok(self(a, b))
    }
}

/// Model used when only a precomputed library is available.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoModel;

impl EnergyModel for NoModel {
    fn compute(&self, a: &Sequence, b: &Sequence) -> Result<f64, OracleError> {
        Err(OracleError::MissingEnergy {
            a: a.clone(),
            b: b.clone(),
        })
    }
}

/// Which library backs an oracle and how it is consulted.
#[derive(Debug, Clone, PartialEq)]
pub struct OracleConfig {
    pub library_path: Option<PathBuf>,
    pub use_cache: bool,
    /// Store live results in the cache so later queries are lookups.
    pub populate_cache: bool,
    pub key_order: KeyOrder,
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            library_path: None,
            use_cache: true,
            populate_cache: true,
            key_order: KeyOrder::Unordered,
        }
    }
}

/// A library-backed oracle that falls back to a live model on misses.
///
/// The cache sits behind an `RwLock`, so any number of workers can read it
/// concurrently; populating it after a miss takes the write lock briefly.
pub struct CachedOracle<M> {
    model: M,
    cache: RwLock<PairEnergyLibrary>,
    config: OracleConfig,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl<M: EnergyModel> CachedOracle<M> {
    pub fn new(model: M, config: OracleConfig) -> Self {
        Self::with_library(model, PairEnergyLibrary::new(config.key_order), config)
    }

    pub fn with_library(model: M, library: PairEnergyLibrary, config: OracleConfig) -> Self {
        Self {
            model,
            cache: RwLock::new(library),
            config,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Builds the oracle, loading the configured library if one is set.
    pub fn from_config(model: M, config: OracleConfig) -> Result<Self, StoreError> {
        let library = match &config.library_path {
            Some(path) => PairEnergyLibrary::load(path, config.key_order)?,
            None => {
                debug!("No energy library configured; starting with an empty cache.");
                PairEnergyLibrary::new(config.key_order)
            }
        };
        Ok(Self::with_library(model, library, config))
    }

    pub fn config(&self) -> &OracleConfig {
        &self.config
    }

    pub fn energy_with(
        &self,
        a: &Sequence,
        b: &Sequence,
        use_cache: bool,
    ) -> Result<f64, OracleError> {
        if use_cache {
            let cached = self
                .cache
                .read()
                .unwrap_or_else(PoisonError::into_inner)
                .get(a, b);
            if let Some(energy) = cached {
                self.hits.fetch_add(1, Ordering::Relaxed);
                return Ok(energy);
            }
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        let energy = self.model.compute(a, b)?;
        trace!(%a, %b, energy, "Computed pair energy with live model.");

        if use_cache && self.config.populate_cache {
            self.cache
                .write()
                .unwrap_or_else(PoisonError::into_inner)
                .insert(a, b, energy);
        }
        Ok(energy)
    }

    pub fn cache_len(&self) -> usize {
        self.cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// (hits, misses) since construction.
    pub fn cache_stats(&self) -> (u64, u64) {
        (
            self.hits.load(Ordering::Relaxed),
            self.misses.load(Ordering::Relaxed),
        )
    }

    /// Persists the current cache contents atomically.
    pub fn save_cache(&self, path: &Path) -> Result<(), StoreError> {
        let cache = self.cache.read().unwrap_or_else(PoisonError::into_inner);
        cache.save(path)?;
        info!(path = %path.display(), entries = cache.len(), "Saved energy cache.");
        Ok(())
    }
}

impl<M: EnergyModel> EnergyOracle for CachedOracle<M> {
    fn energy(&self, a: &Sequence, b: &Sequence) -> Result<f64, OracleError> {
        self.energy_with(a, b, self.config.use_cache)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    fn seq(s: &str) -> Sequence {
        Sequence::new(s).unwrap()
    }

    #[test]
    fn library_hits_do_not_call_the_model() {
        let mut library = PairEnergyLibrary::new(KeyOrder::Unordered);
        library.insert(&seq("ACGA"), &seq("TTGC"), -3.0);
        let oracle = CachedOracle::with_library(NoModel, library, OracleConfig::default());

        assert_eq!(oracle.energy(&seq("TTGC"), &seq("ACGA")).unwrap(), -3.0);
        assert_eq!(oracle.cache_stats(), (1, 0));
    }

    #[test]
    fn misses_without_a_model_are_missing_energy_errors() {
        let oracle = CachedOracle::new(NoModel, OracleConfig::default());
        let result = oracle.energy(&seq("ACGA"), &seq("TTGC"));
        assert!(matches!(result, Err(OracleError::MissingEnergy { .. })));
    }

    #[test]
    fn misses_populate_the_cache() {
        let calls = AtomicUsize::new(0);
        let model = |_: &Sequence, _: &Sequence| {
            calls.fetch_add(1, Ordering::SeqCst);
            -7.0
        };
        let oracle = CachedOracle::new(model, OracleConfig::default());

        assert_eq!(oracle.energy(&seq("ACGA"), &seq("TTGC")).unwrap(), -7.0);
        assert_eq!(oracle.energy(&seq("TTGC"), &seq("ACGA")).unwrap(), -7.0);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(oracle.cache_len(), 1);
    }

    #[test]
    fn bypassing_the_cache_always_calls_the_model() {
        let calls = AtomicUsize::new(0);
        let model = |_: &Sequence, _: &Sequence| {
            calls.fetch_add(1, Ordering::SeqCst);
            -1.0
        };
        let oracle = CachedOracle::new(model, OracleConfig::default());

        oracle.energy_with(&seq("ACGA"), &seq("TTGC"), false).unwrap();
        oracle.energy_with(&seq("ACGA"), &seq("TTGC"), false).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(oracle.cache_len(), 0);
    }

    #[test]
    fn from_config_loads_the_configured_library() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("library.csv");
        std::fs::write(&path, "seq_a,seq_b,energy\nACGA,TTGC,-2.5\n").unwrap();

        let config = OracleConfig {
            library_path: Some(path),
            ..OracleConfig::default()
        };
        let oracle = CachedOracle::from_config(NoModel, config).unwrap();
        assert_eq!(oracle.energy(&seq("ACGA"), &seq("TTGC")).unwrap(), -2.5);
    }

    #[test]
    fn save_cache_persists_live_results() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cache.csv");
        let oracle = CachedOracle::new(|_: &Sequence, _: &Sequence| -4.5, OracleConfig::default());
        oracle.energy(&seq("ACGA"), &seq("TTGC")).unwrap();
        oracle.save_cache(&path).unwrap();

        let reloaded = PairEnergyLibrary::load(&path, KeyOrder::Unordered).unwrap();
        assert_eq!(reloaded.get(&seq("ACGA"), &seq("TTGC")), Some(-4.5));
    }

    #[test]
    fn concurrent_readers_see_consistent_values() {
        let oracle = CachedOracle::new(|_: &Sequence, _: &Sequence| -2.0, OracleConfig::default());
        std::thread::scope(|scope| {
            for _ in 0..4 {
                scope.spawn(|| {
                    for _ in 0..50 {
                        assert_eq!(oracle.energy(&seq("ACGA"), &seq("TTGC")).unwrap(), -2.0);
                    }
                });
            }
        });
        assert_eq!(oracle.cache_len(), 1);
    }
}
