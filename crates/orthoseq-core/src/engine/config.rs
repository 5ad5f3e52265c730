use crate::core::oracle::OracleConfig;
use crate::core::stats::EnergySummary;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),
    #[error("Threshold '{name}' must be finite, got {value}")]
    NonFiniteThreshold { name: &'static str, value: f64 },
    #[error("On-target window is empty: min_on ({min_on}) > max_on ({max_on})")]
    EmptyOnTargetWindow { min_on: f64, max_on: f64 },
    #[error("Batch size must be at least 1")]
    InvalidBatchSize,
}

/// Energy cutoffs in kcal/mol. More negative means stronger binding.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    /// Lower bound of the accepted on-target window.
    pub min_on: f64,
    /// Upper bound of the accepted on-target window.
    pub max_on: f64,
    /// Any single self or cross energy below this rejects a candidate.
    pub min_extreme_off: f64,
    /// The mean of a candidate's self and cross energies must not fall below this.
    pub min_mean_off: f64,
}

impl Thresholds {
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("min_on", self.min_on),
            ("max_on", self.max_on),
            ("min_extreme_off", self.min_extreme_off),
            ("min_mean_off", self.min_mean_off),
        ] {
            if !value.is_finite() {
                return Err(ConfigError::NonFiniteThreshold { name, value });
            }
        }
        if self.min_on > self.max_on {
            return Err(ConfigError::EmptyOnTargetWindow {
                min_on: self.min_on,
                max_on: self.max_on,
            });
        }
        Ok(())
    }

    pub fn on_target_contains(&self, energy: f64) -> bool {
        energy >= self.min_on && energy <= self.max_on
    }

    /// `mean ± k·σ` window around an on-target energy distribution.
    pub fn on_target_window(summary: &EnergySummary, k: f64) -> (f64, f64) {
        let half_width = k * summary.std_dev;
        (summary.mean - half_width, summary.mean + half_width)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExecutionMode {
    /// One candidate at a time; every decision sees all earlier acceptances.
    #[default]
    Sequential,
    /// Candidates are evaluated concurrently in batches against the set as it
    /// stood at the start of the batch.
    Batched { batch_size: usize },
}

#[derive(Debug, Clone, PartialEq)]
pub struct SelectionConfig {
    pub thresholds: Thresholds,
    pub target_size: Option<usize>,
    pub seed: Option<u64>,
    pub mode: ExecutionMode,
    pub oracle: OracleConfig,
}

#[derive(Default)]
pub struct SelectionConfigBuilder {
    min_on: Option<f64>,
    max_on: Option<f64>,
    min_extreme_off: Option<f64>,
    min_mean_off: Option<f64>,
    target_size: Option<usize>,
    seed: Option<u64>,
    mode: Option<ExecutionMode>,
    oracle: Option<OracleConfig>,
}

impl SelectionConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn min_on(mut self, value: f64) -> Self {
        self.min_on = Some(value);
        self
    }
    pub fn max_on(mut self, value: f64) -> Self {
        self.max_on = Some(value);
        self
    }
    pub fn min_extreme_off(mut self, value: f64) -> Self {
        self.min_extreme_off = Some(value);
        self
    }
    pub fn min_mean_off(mut self, value: f64) -> Self {
        self.min_mean_off = Some(value);
        self
    }
    pub fn thresholds(self, thresholds: Thresholds) -> Self {
        self.min_on(thresholds.min_on)
            .max_on(thresholds.max_on)
            .min_extreme_off(thresholds.min_extreme_off)
            .min_mean_off(thresholds.min_mean_off)
    }
    pub fn target_size(mut self, size: Option<usize>) -> Self {
        self.target_size = size;
        self
    }
    pub fn seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }
    pub fn mode(mut self, mode: ExecutionMode) -> Self {
        self.mode = Some(mode);
        self
    }
    pub fn oracle(mut self, oracle: OracleConfig) -> Self {
        self.oracle = Some(oracle);
        self
    }

    pub fn build(self) -> Result<SelectionConfig, ConfigError> {
        let thresholds = Thresholds {
            min_on: self.min_on.ok_or(ConfigError::MissingParameter("min_on"))?,
            max_on: self.max_on.ok_or(ConfigError::MissingParameter("max_on"))?,
            min_extreme_off: self
                .min_extreme_off
                .ok_or(ConfigError::MissingParameter("min_extreme_off"))?,
            min_mean_off: self
                .min_mean_off
                .ok_or(ConfigError::MissingParameter("min_mean_off"))?,
        };
        thresholds.validate()?;

        let mode = self.mode.unwrap_or_default();
        if let ExecutionMode::Batched { batch_size: 0 } = mode {
            return Err(ConfigError::InvalidBatchSize);
        }

        Ok(SelectionConfig {
            thresholds,
            target_size: self.target_size,
            seed: self.seed,
            mode,
            oracle: self.oracle.unwrap_or_default(),
        })
    }
}
