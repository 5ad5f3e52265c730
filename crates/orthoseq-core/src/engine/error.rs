use super::config::ConfigError;
use super::pool::PoolError;
use crate::core::io::store::StoreError;
use crate::core::oracle::OracleError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Invalid configuration: {source}")]
    Config {
        #[from]
        source: ConfigError,
    },

    #[error("Candidate pool error: {source}")]
    Pool {
        #[from]
        source: PoolError,
    },

    #[error("Energy lookup failed: {source}")]
    Oracle {
        #[from]
        source: OracleError,
    },

    #[error("Persistence error: {source}")]
    Store {
        #[from]
        source: StoreError,
    },

    #[error("Handle {sequence} is listed more than once in the pre-existing set")]
    DuplicateHandle { sequence: String },

    #[error("Internal logic error: {0}")]
    Internal(String),
}
