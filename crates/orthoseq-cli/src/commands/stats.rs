use crate::cli::StatsArgs;
use crate::error::{CliError, Result};
use orthoseq::core::io::store;
use orthoseq::core::stats::{EnergySummary, Histogram};
use orthoseq::engine::config::Thresholds;

const BAR_WIDTH: usize = 40;

pub async fn run(args: StatsArgs) -> Result<()> {
    let energies: Vec<f64> = store::load_energy_map(&args.pool)?.into_values().collect();
    let summary = EnergySummary::from_values(energies.iter().copied())
        .ok_or_else(|| CliError::Argument(format!("Pool {:?} is empty", args.pool)))?;

    println!("On-target energies ({} candidates)", summary.count);
    println!("  min     {:>10.3}", summary.min);
    println!("  max     {:>10.3}", summary.max);
    println!("  mean    {:>10.3}", summary.mean);
    println!("  std dev {:>10.3}", summary.std_dev);

    let (low, high) = Thresholds::on_target_window(&summary, args.sigma);
    println!(
        "  window  [{:.3}, {:.3}] (mean ± {}σ)",
        low, high, args.sigma
    );

    if let Some(histogram) = Histogram::new(&energies, args.bins) {
        println!();
        print!("{}", render_histogram(&histogram));
    }
    Ok(())
}

fn render_histogram(histogram: &Histogram) -> String {
    let peak = histogram.counts.iter().copied().max().unwrap_or(0).max(1);
    histogram
        .edges()
        .zip(&histogram.counts)
        .map(|((low, high), &count)| {
            let bar = "#".repeat(count * BAR_WIDTH / peak);
            format!("[{:>8.2}, {:>8.2}) {:>6} {}\n", low, high, count, bar)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn histogram_bars_scale_to_the_fullest_bin() {
        let histogram = Histogram::new(&[-10.0, -10.0, -10.0, -9.0, -8.0], 2).unwrap();
        let rendered = render_histogram(&histogram);
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].matches('#').count(), BAR_WIDTH);
        assert_eq!(lines[1].matches('#').count(), 2 * BAR_WIDTH / 3);
    }
}
