mod cli;
mod commands;
mod config;
mod error;
mod logging;
mod utils;

use crate::cli::{Cli, Commands};
use crate::error::{CliError, Result};
use clap::Parser;
use orthoseq::engine::cancel::StopSignal;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

#[tokio::main]
async fn main() {
    if let Err(e) = run_app().await {
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        eprintln!("\n❌ Error: {}", e);
        std::process::exit(1);
    }
}

async fn run_app() -> Result<()> {
    let cli = Cli::parse();
    logging::setup_logging(cli.verbose, cli.quiet, cli.log_file.clone())?;

    let (panic_hook, eyre_hook) = color_eyre::config::HookBuilder::default().into_hooks();
    eyre_hook.install().map_err(|e| CliError::Other(e.into()))?;
    std::panic::set_hook(Box::new(move |pi| {
        error!("{}", panic_hook.panic_report(pi));
    }));

    info!("orthoseq CLI v{} starting up.", env!("CARGO_PKG_VERSION"));
    debug!("Full CLI arguments parsed: {:?}", &cli);

    if let Some(num_threads) = cli.threads {
        info!(
            "Setting Rayon global thread pool to {} threads.",
            num_threads
        );
        rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .build_global()
            .map_err(|e| {
                CliError::Other(anyhow::anyhow!("Failed to build global thread pool: {}", e))
            })?;
    }

    let stop = StopSignal::new();
    let interrupt = handles_interrupts(&cli.command).then(|| listen_for_interrupt(stop.clone()));

    let command_result = match cli.command {
        Commands::Generate(args) => {
            info!("Dispatching to 'generate' command.");
            commands::generate::run(args).await
        }
        Commands::Pool(args) => {
            info!("Dispatching to 'pool' command.");
            commands::pool::run(args).await
        }
        Commands::Stats(args) => {
            info!("Dispatching to 'stats' command.");
            commands::stats::run(args).await
        }
        Commands::Select(args) => {
            info!("Dispatching to 'select' command.");
            commands::select::run(args, stop).await
        }
        Commands::Validate(args) => {
            info!("Dispatching to 'validate' command.");
            commands::validate::run(args).await
        }
    };
    if let Some(listener) = interrupt {
        listener.abort();
    }

    match &command_result {
        Ok(_) => info!("Command completed successfully."),
        Err(e) => error!("Command failed: {}", e),
    }
    command_result
}

/// Commands that stop cooperatively on Ctrl-C. The rest keep the default
/// SIGINT behaviour and terminate immediately.
fn handles_interrupts(command: &Commands) -> bool {
    matches!(command, Commands::Select(_))
}

/// Exit status of a process terminated by SIGINT.
const INTERRUPTED_EXIT_CODE: i32 = 130;

/// Raises `stop` on the first Ctrl-C so a running selection can finish its
/// current step and write a partial result. A second Ctrl-C exits at once.
///
/// Only installed for `select`: once awaited, `ctrl_c` replaces the default
/// SIGINT handler for the rest of the process.
fn listen_for_interrupt(stop: StopSignal) -> JoinHandle<()> {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_err() {
            return;
        }
        warn!("Interrupt received; stopping after the current step. Press Ctrl-C again to abort.");
        stop.stop();

        if tokio::signal::ctrl_c().await.is_ok() {
            error!("Second interrupt received; aborting.");
            std::process::exit(INTERRUPTED_EXIT_CODE);
        }
    })
}
