use super::sequence::Sequence;
use itertools::Itertools;
use thiserror::Error;
use tracing::{debug, instrument};

const BASES: [char; 4] = ['A', 'C', 'G', 'T'];

/// Largest handle length that is enumerated exhaustively (4^12 ≈ 16.7M).
pub const MAX_ENUMERATION_LENGTH: usize = 12;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum GenerationError {
    #[error("Handle length must be between 1 and {max}, got {length}")]
    InvalidLength { length: usize, max: usize },
    #[error("Maximum homopolymer run must be at least 1")]
    InvalidHomopolymer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerationOptions {
    pub length: usize,
    /// Sequences containing a run of identical bases longer than this are dropped.
    pub max_homopolymer: usize,
}

impl GenerationOptions {
    pub fn new(length: usize) -> Self {
        Self {
            length,
            max_homopolymer: length,
        }
    }

    pub fn with_max_homopolymer(mut self, max_homopolymer: usize) -> Self {
        self.max_homopolymer = max_homopolymer;
        self
    }
}

/// Enumerates every candidate handle of the requested length.
///
/// Self-complementary sequences are dropped, as are sequences whose longest
/// homopolymer run exceeds the configured maximum. Of each
/// (sequence, reverse complement) pair only the lexicographically smaller
/// orientation is returned, so a handle is never represented twice.
/// The output is sorted.
#[instrument(level = "debug", skip_all, fields(length = options.length))]
pub fn generate_candidates(options: GenerationOptions) -> Result<Vec<Sequence>, GenerationError> {
    if options.length == 0 || options.length > MAX_ENUMERATION_LENGTH {
        return Err(GenerationError::InvalidLength {
            length: options.length,
            max: MAX_ENUMERATION_LENGTH,
        });
    }
    if options.max_homopolymer == 0 {
        return Err(GenerationError::InvalidHomopolymer);
    }

    let candidates: Vec<Sequence> = std::iter::repeat_n(BASES, options.length)
        .multi_cartesian_product()
        .map(|bases| Sequence::from_canonical(bases.into_iter().collect()))
        .filter(|s| !s.is_palindromic())
        .filter(|s| s.longest_homopolymer() <= options.max_homopolymer)
        .filter(|s| *s < s.reverse_complement())
        .collect();

    debug!(count = candidates.len(), "Candidate enumeration finished.");
    Ok(candidates)
}
