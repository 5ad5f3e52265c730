use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    version,
    about = "orthoseq CLI - select sets of mutually orthogonal DNA handle sequences from a pool of candidates.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Set the number of threads for parallel computation.
    /// Defaults to the number of available logical cores.
    #[arg(short = 'j', long, global = true, value_name = "NUM")]
    pub threads: Option<usize>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Enumerate candidate handles of a given length and write them as pairs.
    Generate(GenerateArgs),
    /// Compute on-target energies for candidates and write a pool file.
    Pool(PoolArgs),
    /// Print an energy summary and histogram of a pool file.
    Stats(StatsArgs),
    /// Select an orthogonal handle set from a pool.
    Select(SelectArgs),
    /// Re-check an existing handle set against the selection thresholds.
    Validate(ValidateArgs),
}

/// Arguments for the `generate` subcommand.
#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Handle length in bases.
    #[arg(short, long, value_name = "INT")]
    pub length: usize,

    /// Drop candidates containing a run of identical bases longer than this.
    #[arg(long, value_name = "INT")]
    pub max_homopolymer: Option<usize>,

    /// Output file of tab-separated (sequence, reverse complement) lines.
    #[arg(short, long, value_name = "PATH")]
    pub output: PathBuf,
}

/// Key ordering of the pair-energy library.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOrderArg {
    Unordered,
    Ordered,
}

/// Arguments for the `pool` subcommand.
#[derive(Args, Debug)]
pub struct PoolArgs {
    /// Candidate file: one sequence per line, optionally followed by its reverse complement.
    #[arg(long, value_name = "PATH")]
    pub candidates: PathBuf,

    /// Pair-energy library (CSV with seq_a, seq_b, energy columns).
    #[arg(short, long, value_name = "PATH")]
    pub library: PathBuf,

    /// Whether library rows apply to both argument orders.
    #[arg(long, value_enum, default_value_t = KeyOrderArg::Unordered)]
    pub key_order: KeyOrderArg,

    /// Output pool file (CSV with sequence, energy columns).
    #[arg(short, long, value_name = "PATH")]
    pub output: PathBuf,
}

/// Arguments for the `stats` subcommand.
#[derive(Args, Debug)]
pub struct StatsArgs {
    /// Pool file to summarize.
    #[arg(short, long, value_name = "PATH")]
    pub pool: PathBuf,

    /// Number of histogram bins.
    #[arg(long, value_name = "INT", default_value_t = 10)]
    pub bins: usize,

    /// Width of the suggested on-target window, in standard deviations around the mean.
    #[arg(long, value_name = "FLOAT", default_value_t = 1.0)]
    pub sigma: f64,
}

/// Threshold overrides shared by `select` and `validate`.
#[derive(Args, Debug, Clone, Default)]
pub struct ThresholdArgs {
    /// Lower bound of the on-target window (kcal/mol).
    #[arg(long, value_name = "FLOAT", allow_negative_numbers = true)]
    pub min_on: Option<f64>,

    /// Upper bound of the on-target window (kcal/mol).
    #[arg(long, value_name = "FLOAT", allow_negative_numbers = true)]
    pub max_on: Option<f64>,

    /// Reject a candidate when any single self or cross energy falls below this.
    #[arg(long, value_name = "FLOAT", allow_negative_numbers = true)]
    pub min_extreme_off: Option<f64>,

    /// Reject a candidate when the mean of its off-target energies falls below this.
    #[arg(long, value_name = "FLOAT", allow_negative_numbers = true)]
    pub min_mean_off: Option<f64>,

    /// Derive a missing on-target window as mean ± SIGMA·std of the pool energies.
    #[arg(long, value_name = "FLOAT")]
    pub on_target_sigma: Option<f64>,
}

/// Arguments for the `select` subcommand.
#[derive(Args, Debug)]
pub struct SelectArgs {
    /// Pool file (CSV with sequence, energy columns).
    #[arg(short, long, value_name = "PATH")]
    pub pool: PathBuf,

    /// Pair-energy library used for self and cross energies.
    /// Overrides `oracle.library` from the config file.
    #[arg(short, long, value_name = "PATH")]
    pub library: Option<PathBuf>,

    /// Path to a configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Handles that are already part of the set, as a pair file.
    #[arg(long, value_name = "PATH")]
    pub existing: Option<PathBuf>,

    /// Output file for the accepted handles as tab-separated pairs.
    #[arg(short, long, value_name = "PATH")]
    pub output: PathBuf,

    /// Output file for rejected candidates, one per line.
    #[arg(long, value_name = "PATH")]
    pub rejected: Option<PathBuf>,

    /// Seed for the candidate draw order.
    #[arg(long, value_name = "INT")]
    pub seed: Option<u64>,

    /// Evaluate candidates concurrently in batches of this size.
    #[arg(short, long, value_name = "INT")]
    pub batch_size: Option<usize>,

    /// Stop once the set holds this many handles, pre-existing ones included.
    #[arg(short, long, value_name = "INT")]
    pub target_size: Option<usize>,

    #[command(flatten)]
    pub thresholds: ThresholdArgs,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S selection.seed=7
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}

/// Arguments for the `validate` subcommand.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Handle set to check, as a pair file.
    #[arg(long, value_name = "PATH")]
    pub pairs: PathBuf,

    /// Candidate pool whose energy distribution sets missing on-target
    /// bounds. Without it, both bounds must be given explicitly.
    #[arg(short, long, value_name = "PATH")]
    pub pool: Option<PathBuf>,

    /// Pair-energy library used for self and cross energies.
    #[arg(short, long, value_name = "PATH")]
    pub library: Option<PathBuf>,

    /// Path to a configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(flatten)]
    pub thresholds: ThresholdArgs,

    /// Set a specific configuration value, overriding the config file.
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}
