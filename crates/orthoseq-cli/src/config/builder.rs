use super::defaults::DefaultsConfig;
use super::file::{FileConfig, FileKeyOrder, FileOracle};
use crate::cli::{SelectArgs, ThresholdArgs, ValidateArgs};
use crate::error::{CliError, Result};
use orthoseq::core::oracle::OracleConfig;
use orthoseq::core::stats::EnergySummary;
use orthoseq::engine::config::{ExecutionMode, SelectionConfig, SelectionConfigBuilder, Thresholds};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{debug, info};

/// Command-line values that take part in configuration resolution.
#[derive(Debug, Clone, Copy)]
pub struct CliOverrides<'a> {
    pub config: Option<&'a Path>,
    pub library: Option<&'a Path>,
    pub thresholds: &'a ThresholdArgs,
    pub seed: Option<u64>,
    pub batch_size: Option<usize>,
    pub target_size: Option<usize>,
    pub set_values: &'a [String],
}

impl<'a> From<&'a SelectArgs> for CliOverrides<'a> {
    fn from(args: &'a SelectArgs) -> Self {
        Self {
            config: args.config.as_deref(),
            library: args.library.as_deref(),
            thresholds: &args.thresholds,
            seed: args.seed,
            batch_size: args.batch_size,
            target_size: args.target_size,
            set_values: &args.set_values,
        }
    }
}

impl<'a> From<&'a ValidateArgs> for CliOverrides<'a> {
    fn from(args: &'a ValidateArgs) -> Self {
        Self {
            config: args.config.as_deref(),
            library: args.library.as_deref(),
            thresholds: &args.thresholds,
            seed: None,
            batch_size: None,
            target_size: None,
            set_values: &args.set_values,
        }
    }
}

/// Resolves the final selection configuration.
///
/// A missing on-target bound is derived from `on_target` as
/// `mean ± sigma·std`. The off-target thresholds and the library have no
/// defaults and must come from the file or the command line.
pub fn build_config(
    overrides: CliOverrides,
    on_target: Option<&EnergySummary>,
) -> Result<SelectionConfig> {
    let defaults = DefaultsConfig::default();
    let mut file_config = load_layers(&overrides)?;

    let thresholds_file = file_config.thresholds.take().unwrap_or_default();
    let selection_file = file_config.selection.take().unwrap_or_default();
    let oracle = merge_oracle(
        overrides.library,
        file_config.oracle.take().unwrap_or_default(),
        &defaults,
    )?;
    let cli = overrides.thresholds;

    let sigma = cli
        .on_target_sigma
        .or(thresholds_file.on_target_sigma)
        .unwrap_or(defaults.on_target_sigma);
    let derived = on_target.map(|summary| Thresholds::on_target_window(summary, sigma));
    let min_on = cli
        .min_on
        .or(thresholds_file.min_on)
        .or(derived.map(|(low, _)| low));
    let max_on = cli
        .max_on
        .or(thresholds_file.max_on)
        .or(derived.map(|(_, high)| high));
    if let Some((low, high)) = derived {
        debug!(sigma, low, high, "Derived on-target window from energy distribution.");
    }

    let mode = match overrides.batch_size.or(selection_file.batch_size) {
        Some(batch_size) => ExecutionMode::Batched { batch_size },
        None => ExecutionMode::Sequential,
    };

    let mut builder = SelectionConfigBuilder::new()
        .target_size(overrides.target_size.or(selection_file.target_size))
        .seed(overrides.seed.or(selection_file.seed))
        .mode(mode)
        .oracle(oracle);
    if let Some(v) = min_on {
        builder = builder.min_on(v);
    }
    if let Some(v) = max_on {
        builder = builder.max_on(v);
    }
    if let Some(v) = cli.min_extreme_off.or(thresholds_file.min_extreme_off) {
        builder = builder.min_extreme_off(v);
    }
    if let Some(v) = cli.min_mean_off.or(thresholds_file.min_mean_off) {
        builder = builder.min_mean_off(v);
    }

    let config = builder
        .build()
        .map_err(|e| CliError::Config(e.to_string()))?;
    info!(
        min_on = config.thresholds.min_on,
        max_on = config.thresholds.max_on,
        min_extreme_off = config.thresholds.min_extreme_off,
        min_mean_off = config.thresholds.min_mean_off,
        "Configuration resolved."
    );
    Ok(config)
}

fn load_layers(overrides: &CliOverrides) -> Result<FileConfig> {
    let file_config = match overrides.config {
        Some(path) => FileConfig::from_file(path)?,
        None => FileConfig::default(),
    };
    apply_set_values(file_config, overrides.set_values)
}

fn merge_oracle(
    cli_library: Option<&Path>,
    file: FileOracle,
    defaults: &DefaultsConfig,
) -> Result<OracleConfig> {
    let library_path: PathBuf = cli_library
        .map(Path::to_path_buf)
        .or(file.library)
        .ok_or_else(|| {
            CliError::Config(
                "A pair-energy library is required either via --library or `oracle.library` in the config file."
                    .to_string(),
            )
        })?;
    // The CLI oracle has no live model behind the library.
    let use_cache = file.use_cache.unwrap_or(defaults.use_cache);
    if !use_cache {
        return Err(CliError::Config(
            "`oracle.use-cache = false` is not supported: energies are only available from the pair-energy library."
                .to_string(),
        ));
    }
    Ok(OracleConfig {
        library_path: Some(library_path),
        use_cache,
        populate_cache: false,
        key_order: file.key_order.map(Into::into).unwrap_or(defaults.key_order),
    })
}

fn parse_value<T: FromStr>(key: &str, value: &str, kind: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| CliError::Config(format!("Invalid {} value for {}: {}", kind, key, value)))
}

fn apply_set_values(mut config: FileConfig, set_values: &[String]) -> Result<FileConfig> {
    for kv_pair in set_values {
        let (key, value) = kv_pair.split_once('=').ok_or_else(|| {
            CliError::Config(format!(
                "Invalid --set format: '{}'. Expected KEY=VALUE.",
                kv_pair
            ))
        })?;
        let key = key.trim();

        match key {
            "thresholds.min-on" => {
                config.thresholds.get_or_insert_with(Default::default).min_on =
                    Some(parse_value(key, value, "float")?);
            }
            "thresholds.max-on" => {
                config.thresholds.get_or_insert_with(Default::default).max_on =
                    Some(parse_value(key, value, "float")?);
            }
            "thresholds.min-extreme-off" => {
                config
                    .thresholds
                    .get_or_insert_with(Default::default)
                    .min_extreme_off = Some(parse_value(key, value, "float")?);
            }
            "thresholds.min-mean-off" => {
                config
                    .thresholds
                    .get_or_insert_with(Default::default)
                    .min_mean_off = Some(parse_value(key, value, "float")?);
            }
            "thresholds.on-target-sigma" => {
                config
                    .thresholds
                    .get_or_insert_with(Default::default)
                    .on_target_sigma = Some(parse_value(key, value, "float")?);
            }
            "selection.target-size" => {
                config
                    .selection
                    .get_or_insert_with(Default::default)
                    .target_size = Some(parse_value(key, value, "integer")?);
            }
            "selection.seed" => {
                config.selection.get_or_insert_with(Default::default).seed =
                    Some(parse_value(key, value, "integer")?);
            }
            "selection.batch-size" => {
                config
                    .selection
                    .get_or_insert_with(Default::default)
                    .batch_size = Some(parse_value(key, value, "integer")?);
            }
            "oracle.library" => {
                config.oracle.get_or_insert_with(Default::default).library =
                    Some(PathBuf::from(value.trim()));
            }
            "oracle.use-cache" => {
                config.oracle.get_or_insert_with(Default::default).use_cache =
                    Some(parse_value(key, value, "boolean")?);
            }
            "oracle.key-order" => {
                let order = match value.trim() {
                    "ordered" => FileKeyOrder::Ordered,
                    "unordered" => FileKeyOrder::Unordered,
                    other => {
                        return Err(CliError::Config(format!(
                            "Invalid key order for {}: '{}'. Expected 'ordered' or 'unordered'.",
                            key, other
                        )));
                    }
                };
                config.oracle.get_or_insert_with(Default::default).key_order = Some(order);
            }
            _ => {
                return Err(CliError::Config(format!(
                    "Unsupported configuration key for --set: '{}'",
                    key
                )));
            }
        }
    }
    Ok(config)
}
