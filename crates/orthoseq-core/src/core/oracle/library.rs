use super::{EnergyOracle, OracleError};
use crate::core::io::store::{self, PairEnergyRecord, StoreError};
use crate::core::sequence::Sequence;
use std::collections::HashMap;
use std::path::Path;
use tracing::info;

/// How a pair of sequences is keyed in a lookup table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeyOrder {
    /// `(a, b)` and `(b, a)` share one entry; the smaller sequence comes first.
    #[default]
    Unordered,
    /// `(a, b)` and `(b, a)` are distinct entries.
    Ordered,
}

impl KeyOrder {
    pub fn key(self, a: &Sequence, b: &Sequence) -> (Sequence, Sequence) {
        match self {
            KeyOrder::Ordered => (a.clone(), b.clone()),
            KeyOrder::Unordered if a <= b => (a.clone(), b.clone()),
            KeyOrder::Unordered => (b.clone(), a.clone()),
        }
    }
}

/// Precomputed pair energies.
#[derive(Debug, Clone, Default)]
pub struct PairEnergyLibrary {
    key_order: KeyOrder,
    energies: HashMap<(Sequence, Sequence), f64>,
}

impl PairEnergyLibrary {
    pub fn new(key_order: KeyOrder) -> Self {
        Self {
            key_order,
            energies: HashMap::new(),
        }
    }

    pub fn load(path: &Path, key_order: KeyOrder) -> Result<Self, StoreError> {
        let records = store::load_pair_energies(path)?;
        let mut library = Self::new(key_order);
        for record in records {
            library.insert(&record.seq_a, &record.seq_b, record.energy);
        }
        info!(
            path = %path.display(),
            entries = library.len(),
            "Loaded pair energy library."
        );
        Ok(library)
    }

    /// Writes the library atomically, entries sorted by key.
    pub fn save(&self, path: &Path) -> Result<(), StoreError> {
        let mut records: Vec<PairEnergyRecord> = self
            .energies
            .iter()
            .map(|((a, b), &energy)| PairEnergyRecord {
                seq_a: a.clone(),
                seq_b: b.clone(),
                energy,
            })
            .collect();
        records.sort_by(|x, y| (&x.seq_a, &x.seq_b).cmp(&(&y.seq_a, &y.seq_b)));
        store::save_pair_energies(path, &records)
    }

    pub fn key_order(&self) -> KeyOrder {
        self.key_order
    }

    pub fn get(&self, a: &Sequence, b: &Sequence) -> Option<f64> {
        self.energies.get(&self.key_order.key(a, b)).copied()
    }

    pub fn insert(&mut self, a: &Sequence, b: &Sequence, energy: f64) {
        self.energies.insert(self.key_order.key(a, b), energy);
    }

    pub fn len(&self) -> usize {
        self.energies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.energies.is_empty()
    }
}

impl EnergyOracle for PairEnergyLibrary {
    fn energy(&self, a: &Sequence, b: &Sequence) -> Result<f64, OracleError> {
        self.get(a, b).ok_or_else(|| OracleError::MissingEnergy {
            a: a.clone(),
            b: b.clone(),
        })
    }
}
