pub mod generate;
pub mod pool;
pub mod select;
pub mod stats;
pub mod validate;

use crate::error::Result;
use orthoseq::core::oracle::{CachedOracle, NoModel, OracleConfig};
use tracing::info;

/// Library-backed oracle. Pairs missing from the library are reported as
/// errors instead of being computed.
pub(crate) fn load_oracle(config: OracleConfig) -> Result<CachedOracle<NoModel>> {
    let oracle = CachedOracle::from_config(NoModel, config)?;
    info!(entries = oracle.cache_len(), "Energy library loaded.");
    Ok(oracle)
}
