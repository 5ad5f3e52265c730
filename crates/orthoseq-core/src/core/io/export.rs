use super::store::{StoreError, write_atomic};
use crate::core::sequence::Sequence;
use std::fs;
use std::path::Path;

/// Writes one `sequence<TAB>reverse_complement` line per handle.
pub fn write_pairs(path: &Path, handles: &[Sequence]) -> Result<(), StoreError> {
    write_atomic(path, |out| {
        for handle in handles {
            writeln!(out, "{}\t{}", handle, handle.reverse_complement()).map_err(|e| {
                StoreError::Io {
                    path: path.to_path_buf(),
                    source: e,
                }
            })?;
        }
        Ok(())
    })
}

/// Reads a pair export back into its forward sequences.
///
/// Blank lines are skipped. A single-column line is accepted as a bare
/// sequence; a second column must be the reverse complement of the first.
pub fn read_pairs(path: &Path) -> Result<Vec<Sequence>, StoreError> {
    let content = fs::read_to_string(path).map_err(|e| StoreError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;

    let corrupt = |line_no: usize, reason: String| StoreError::Corrupt {
        path: path.to_path_buf(),
        reason: format!("line {}: {}", line_no, reason),
    };

    let mut handles = Vec::new();
    for (idx, line) in content.lines().enumerate() {
        let line_no = idx + 1;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let mut fields = line.split('\t');
        let forward: Sequence = fields
            .next()
            .unwrap_or_default()
            .parse()
            .map_err(|e| corrupt(line_no, format!("{}", e)))?;

        if let Some(second) = fields.next() {
            let reverse: Sequence = second
                .parse()
                .map_err(|e| corrupt(line_no, format!("{}", e)))?;
            if reverse != forward.reverse_complement() {
                return Err(corrupt(
                    line_no,
                    format!("{} is not the reverse complement of {}", reverse, forward),
                ));
            }
        }
        if fields.next().is_some() {
            return Err(corrupt(line_no, "expected at most two columns".to_string()));
        }
        handles.push(forward);
    }
    Ok(handles)
}

/// Plain one-sequence-per-line listing, as produced by candidate generation.
pub fn write_sequences(path: &Path, sequences: &[Sequence]) -> Result<(), StoreError> {
    write_atomic(path, |out| {
        for sequence in sequences {
            writeln!(out, "{}", sequence).map_err(|e| StoreError::Io {
                path: path.to_path_buf(),
                source: e,
            })?;
        }
        Ok(())
    })
}
