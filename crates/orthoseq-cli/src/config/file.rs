use crate::error::{CliError, Result};
use orthoseq::core::oracle::KeyOrder;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileThresholds {
    pub min_on: Option<f64>,
    pub max_on: Option<f64>,
    pub min_extreme_off: Option<f64>,
    pub min_mean_off: Option<f64>,
    pub on_target_sigma: Option<f64>,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileSelection {
    pub target_size: Option<usize>,
    pub seed: Option<u64>,
    pub batch_size: Option<usize>,
}

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum FileKeyOrder {
    Unordered,
    Ordered,
}

impl From<FileKeyOrder> for KeyOrder {
    fn from(order: FileKeyOrder) -> Self {
        match order {
            FileKeyOrder::Unordered => KeyOrder::Unordered,
            FileKeyOrder::Ordered => KeyOrder::Ordered,
        }
    }
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileOracle {
    pub library: Option<PathBuf>,
    pub use_cache: Option<bool>,
    pub key_order: Option<FileKeyOrder>,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub thresholds: Option<FileThresholds>,
    pub selection: Option<FileSelection>,
    pub oracle: Option<FileOracle>,
}

impl FileConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn parses_all_sections() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("orthoseq.toml");
        fs::write(
            &path,
            r#"
            [thresholds]
            min-extreme-off = -12.0
            min-mean-off = -9.0
            on-target-sigma = 1.5

            [selection]
            seed = 42
            batch-size = 16

            [oracle]
            library = "energies.csv"
            key-order = "ordered"
            "#,
        )
        .unwrap();

        let config = FileConfig::from_file(&path).unwrap();
        let thresholds = config.thresholds.unwrap();
        assert_eq!(thresholds.min_extreme_off, Some(-12.0));
        assert_eq!(thresholds.on_target_sigma, Some(1.5));
        assert_eq!(thresholds.min_on, None);
        assert_eq!(config.selection.unwrap().batch_size, Some(16));
        let oracle = config.oracle.unwrap();
        assert_eq!(oracle.library, Some(PathBuf::from("energies.csv")));
        assert_eq!(oracle.key_order, Some(FileKeyOrder::Ordered));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("typo.toml");
        fs::write(&path, "[thresholds]\nmin-extreme = -12.0\n").unwrap();

        let result = FileConfig::from_file(&path);
        assert!(matches!(result, Err(CliError::FileParsing { .. })));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = FileConfig::from_file(&dir.path().join("absent.toml"));
        assert!(matches!(result, Err(CliError::Io(_))));
    }
}
