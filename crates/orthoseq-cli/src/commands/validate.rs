use super::load_oracle;
use crate::cli::ValidateArgs;
use crate::config::{CliOverrides, build_config};
use crate::error::{CliError, Result};
use orthoseq::core::io::{export, store};
use orthoseq::core::oracle::EnergyOracle;
use orthoseq::core::stats::EnergySummary;
use orthoseq::engine::error::EngineError;
use orthoseq::engine::tasks::validate::validate_set;
use orthoseq::engine::validation::{RejectionReason, Verdict};
use tracing::info;

pub async fn run(args: ValidateArgs) -> Result<()> {
    let handles = export::read_pairs(&args.pairs)?;
    info!(count = handles.len(), "Loaded handle set from {:?}", &args.pairs);

    let overrides = CliOverrides::from(&args);
    let reference = match &args.pool {
        Some(path) => {
            info!("Deriving missing on-target bounds from pool {:?}", path);
            EnergySummary::from_values(store::load_energy_map(path)?.into_values())
        }
        None => None,
    };
    let config = build_config(overrides, reference.as_ref())?;
    let thresholds = config.thresholds;
    let oracle = load_oracle(config.oracle.clone())?;

    let on_target: Vec<f64> = handles
        .iter()
        .map(|h| oracle.on_target_energy(h))
        .collect::<std::result::Result<_, _>>()
        .map_err(EngineError::from)?;

    let validation =
        tokio::task::block_in_place(|| validate_set(&handles, &oracle, &thresholds))?;

    for (entry, energy) in validation.handles.iter().zip(&on_target) {
        if !thresholds.on_target_contains(*energy) {
            println!(
                "  {}  on-target {:.3} outside [{:.3}, {:.3}]",
                entry.handle, energy, thresholds.min_on, thresholds.max_on
            );
        }
        if let Verdict::Rejected(reason) = &entry.verdict {
            println!("  {}  {}", entry.handle, describe(reason));
        }
    }

    if let Some(summary) = &validation.summary {
        println!(
            "{} handle(s); off-target energies: worst {:.3}, mean {:.3} kcal/mol",
            validation.handles.len(),
            summary.min,
            summary.mean
        );
    }

    let failures = validation.failures().count();
    if failures > 0 {
        return Err(CliError::InvalidSet {
            failures,
            total: validation.handles.len(),
        });
    }
    println!("✓ Handle set is orthogonal under the given thresholds.");
    Ok(())
}

fn describe(reason: &RejectionReason) -> String {
    match reason {
        RejectionReason::SelfBinding {
            orientation,
            energy,
        } => format!("self binding of {} at {:.3}", orientation, energy),
        RejectionReason::CrossBinding {
            orientation,
            partner,
            energy,
        } => format!("{} binds {} at {:.3}", orientation, partner, energy),
        RejectionReason::MeanOffTarget { mean } => {
            format!("mean off-target energy {:.3}", mean)
        }
        RejectionReason::AlreadyInSet => "listed more than once".to_string(),
    }
}
