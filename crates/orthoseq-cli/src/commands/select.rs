use super::load_oracle;
use crate::cli::SelectArgs;
use crate::config::{CliOverrides, build_config};
use crate::error::Result;
use crate::utils::progress::CliProgressHandler;
use orthoseq::core::io::{export, store};
use orthoseq::core::stats::EnergySummary;
use orthoseq::engine::cancel::StopSignal;
use orthoseq::engine::pool::CandidatePool;
use orthoseq::engine::progress::ProgressReporter;
use orthoseq::engine::state::{SelectionResult, StopReason};
use orthoseq::workflows;
use tracing::{info, warn};

pub async fn run(args: SelectArgs, stop: StopSignal) -> Result<()> {
    info!("Loading candidate pool from {:?}", &args.pool);
    let pool = CandidatePool::from_energies(store::load_energy_map(&args.pool)?);
    let on_target = EnergySummary::from_values(pool.energies());

    let config = build_config(CliOverrides::from(&args), on_target.as_ref())?;

    let existing = match &args.existing {
        Some(path) => {
            let handles = export::read_pairs(path)?;
            info!(count = handles.len(), "Loaded pre-existing handles from {:?}", path);
            handles
        }
        None => Vec::new(),
    };

    let oracle = load_oracle(config.oracle.clone())?;

    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    println!("Starting orthogonal handle selection...");
    let result = tokio::task::block_in_place(|| {
        workflows::select::run(pool, &existing, &oracle, &config, &reporter, &stop)
    })?;

    export::write_pairs(&args.output, &result.accepted)?;
    if let Some(path) = &args.rejected {
        let rejected: Vec<_> = result.rejected.iter().map(|r| r.sequence.clone()).collect();
        export::write_sequences(path, &rejected)?;
    }

    let (hits, misses) = oracle.cache_stats();
    info!(hits, misses, "Energy library usage.");
    print_summary(&result);
    println!("Accepted handles written to: {}", args.output.display());
    Ok(())
}

fn print_summary(result: &SelectionResult) {
    match result.stop_reason {
        StopReason::PoolExhausted => println!("Candidate pool exhausted."),
        StopReason::TargetReached => println!("Target set size reached."),
        StopReason::Cancelled => {
            warn!("Selection was interrupted; writing the partial set.");
            println!("Selection interrupted; the set below is partial.");
        }
    }
    println!(
        "  {} handle(s) in set ({} pre-existing, {} new)",
        result.accepted.len(),
        result.preexisting,
        result.newly_accepted().len()
    );
    println!(
        "  {} candidate(s) evaluated, {} rejected",
        result.evaluated,
        result.rejected.len()
    );
    if let Some(summary) = result.matrix.summary() {
        println!(
            "  off-target energies of new handles: worst {:.3}, mean {:.3} kcal/mol",
            summary.min, summary.mean
        );
    }
}
