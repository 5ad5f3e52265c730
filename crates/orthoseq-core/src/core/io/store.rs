use crate::core::sequence::Sequence;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Corrupt data in '{path}': {reason}")]
    Corrupt { path: PathBuf, reason: String },
    #[error("Failed to serialize records for '{path}': {source}")]
    Serialize { path: PathBuf, source: csv::Error },
}

impl StoreError {
    fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    fn corrupt(path: &Path, reason: impl Into<String>) -> Self {
        Self::Corrupt {
            path: path.to_path_buf(),
            reason: reason.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnergyRecord {
    pub sequence: Sequence,
    pub energy: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairEnergyRecord {
    pub seq_a: Sequence,
    pub seq_b: Sequence,
    pub energy: f64,
}

/// Writes a file by filling a temporary file in the same directory and
/// renaming it over `path`.
///
/// The target is either left untouched or fully replaced. If `write`
/// fails the temporary file is removed.
pub fn write_atomic<F>(path: &Path, write: F) -> Result<(), StoreError>
where
    F: FnOnce(&mut dyn Write) -> Result<(), StoreError>,
{
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(parent).map_err(|e| StoreError::io(parent, e))?;

    let mut temp = NamedTempFile::new_in(parent).map_err(|e| StoreError::io(parent, e))?;
    {
        let mut writer = BufWriter::new(temp.as_file_mut());
        write(&mut writer)?;
        writer.flush().map_err(|e| StoreError::io(path, e))?;
    }
    temp.as_file()
        .sync_all()
        .map_err(|e| StoreError::io(path, e))?;
    temp.persist(path).map_err(|e| {
        warn!(
            "Failed to move temporary file over '{}'; target left unchanged.",
            path.display()
        );
        StoreError::io(path, e.error)
    })?;
    debug!("Atomically wrote '{}'.", path.display());
    Ok(())
}

fn write_csv<T: Serialize>(path: &Path, records: &[T]) -> Result<(), StoreError> {
    write_atomic(path, |out| {
        let mut writer = csv::Writer::from_writer(out);
        for record in records {
            writer
                .serialize(record)
                .map_err(|source| StoreError::Serialize {
                    path: path.to_path_buf(),
                    source,
                })?;
        }
        writer.flush().map_err(|e| StoreError::io(path, e))
    })
}

fn read_csv<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<Vec<T>, StoreError> {
    let file = File::open(path).map_err(|e| StoreError::io(path, e))?;
    let mut reader = csv::Reader::from_reader(file);
    reader
        .deserialize::<T>()
        .map(|result| result.map_err(|e| StoreError::corrupt(path, e.to_string())))
        .collect()
}

/// Loads a sequence → energy mapping.
///
/// A sequence listed twice makes the file corrupt, even when both entries
/// agree.
pub fn load_energy_map(path: &Path) -> Result<BTreeMap<Sequence, f64>, StoreError> {
    let records: Vec<EnergyRecord> = read_csv(path)?;
    let mut map = BTreeMap::new();
    for record in records {
        if !record.energy.is_finite() {
            return Err(StoreError::corrupt(
                path,
                format!("non-finite energy for sequence {}", record.sequence),
            ));
        }
        if map.insert(record.sequence.clone(), record.energy).is_some() {
            return Err(StoreError::corrupt(
                path,
                format!("duplicate entry for sequence {}", record.sequence),
            ));
        }
    }
    debug!(entries = map.len(), "Loaded energy map from '{}'.", path.display());
    Ok(map)
}

pub fn save_energy_map(path: &Path, map: &BTreeMap<Sequence, f64>) -> Result<(), StoreError> {
    let records: Vec<EnergyRecord> = map
        .iter()
        .map(|(sequence, &energy)| EnergyRecord {
            sequence: sequence.clone(),
            energy,
        })
        .collect();
    write_csv(path, &records)
}

pub fn load_pair_energies(path: &Path) -> Result<Vec<PairEnergyRecord>, StoreError> {
    let records: Vec<PairEnergyRecord> = read_csv(path)?;
    if let Some(bad) = records.iter().find(|r| !r.energy.is_finite()) {
        return Err(StoreError::corrupt(
            path,
            format!("non-finite energy for pair ({}, {})", bad.seq_a, bad.seq_b),
        ));
    }
    Ok(records)
}

pub fn save_pair_energies(path: &Path, records: &[PairEnergyRecord]) -> Result<(), StoreError> {
    write_csv(path, records)
}
