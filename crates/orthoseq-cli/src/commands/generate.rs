use crate::cli::GenerateArgs;
use crate::error::Result;
use orthoseq::core::generation::{GenerationOptions, generate_candidates};
use orthoseq::core::io::export;
use tracing::info;

pub async fn run(args: GenerateArgs) -> Result<()> {
    let mut options = GenerationOptions::new(args.length);
    if let Some(max) = args.max_homopolymer {
        options = options.with_max_homopolymer(max);
    }
    info!(?options, "Enumerating candidate handles.");

    let candidates = tokio::task::block_in_place(|| generate_candidates(options))?;
    export::write_pairs(&args.output, &candidates)?;

    println!(
        "Wrote {} candidate pair(s) of length {} to {}",
        candidates.len(),
        args.length,
        args.output.display()
    );
    Ok(())
}
