use super::cancel::StopSignal;
use super::config::SelectionConfig;
use super::progress::ProgressReporter;
use crate::core::oracle::EnergyOracle;
use rand::SeedableRng;
use rand::rngs::StdRng;

/// Shared, read-only inputs of a selection run.
#[derive(Clone, Copy)]
pub struct SelectionContext<'a, O>
where
    O: EnergyOracle + ?Sized,
{
    pub oracle: &'a O,
    pub config: &'a SelectionConfig,
    pub reporter: &'a ProgressReporter<'a>,
    pub stop: &'a StopSignal,
}

impl<'a, O> SelectionContext<'a, O>
where
    O: EnergyOracle + ?Sized,
{
    pub fn new(
        oracle: &'a O,
        config: &'a SelectionConfig,
        reporter: &'a ProgressReporter<'a>,
        stop: &'a StopSignal,
    ) -> Self {
        Self {
            oracle,
            config,
            reporter,
            stop,
        }
    }

    /// RNG for candidate draws: seeded when the config carries a seed.
    pub fn rng(&self) -> StdRng {
        match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}
