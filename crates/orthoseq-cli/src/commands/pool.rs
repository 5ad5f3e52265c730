use super::load_oracle;
use crate::cli::{KeyOrderArg, PoolArgs};
use crate::error::Result;
use crate::utils::progress::CliProgressHandler;
use orthoseq::core::io::{export, store};
use orthoseq::core::oracle::{KeyOrder, OracleConfig};
use orthoseq::engine::progress::ProgressReporter;
use orthoseq::workflows;
use tracing::info;

pub async fn run(args: PoolArgs) -> Result<()> {
    let candidates = export::read_pairs(&args.candidates)?;
    info!(
        count = candidates.len(),
        "Loaded candidates from {:?}", &args.candidates
    );

    let oracle = load_oracle(OracleConfig {
        library_path: Some(args.library.clone()),
        use_cache: true,
        populate_cache: false,
        key_order: match args.key_order {
            KeyOrderArg::Unordered => KeyOrder::Unordered,
            KeyOrderArg::Ordered => KeyOrder::Ordered,
        },
    })?;

    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());
    let pool =
        tokio::task::block_in_place(|| workflows::pool::run(&candidates, &oracle, &reporter))?;

    let size = pool.size();
    store::save_energy_map(&args.output, &pool.into_energy_map())?;
    println!("Wrote pool of {} candidate(s) to {}", size, args.output.display());
    Ok(())
}
