use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum SequenceError {
    #[error("Sequence is empty")]
    Empty,
    #[error("Invalid base '{base}' at position {position} in '{sequence}'")]
    InvalidBase {
        sequence: String,
        base: char,
        position: usize,
    },
}

/// Returns the Watson-Crick partner of a single base.
///
/// Only defined for the four canonical bases; callers are expected to have
/// validated the input through [`Sequence`].
#[inline]
pub fn complement(base: u8) -> u8 {
    match base {
        b'A' => b'T',
        b'T' => b'A',
        b'G' => b'C',
        b'C' => b'G',
        other => other,
    }
}

/// An immutable DNA handle over the alphabet {A, C, G, T}.
///
/// Input is normalized to upper case on construction. Ordering is plain
/// lexicographic ordering of the bases, which is what canonical pair keys
/// and deterministic pool layouts rely on.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Sequence(String);

impl Sequence {
    pub fn new(raw: &str) -> Result<Self, SequenceError> {
        if raw.is_empty() {
            return Err(SequenceError::Empty);
        }
        let normalized = raw.to_ascii_uppercase();
        if let Some((position, base)) = normalized
            .char_indices()
            .find(|(_, c)| !matches!(c, 'A' | 'C' | 'G' | 'T'))
        {
            return Err(SequenceError::InvalidBase {
                sequence: raw.to_string(),
                base,
                position,
            });
        }
        Ok(Self(normalized))
    }

    /// Wraps a string already known to hold only upper-case canonical bases.
    pub(crate) fn from_canonical(raw: String) -> Self {
        debug_assert!(raw.bytes().all(|b| matches!(b, b'A' | b'C' | b'G' | b'T')));
        Self(raw)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn reverse_complement(&self) -> Sequence {
        Self::from_canonical(self.0.bytes().rev().map(|b| complement(b) as char).collect())
    }

    /// True when the sequence is its own reverse complement.
    pub fn is_palindromic(&self) -> bool {
        self.as_bytes()
            .iter()
            .zip(self.as_bytes().iter().rev())
            .all(|(&a, &b)| a == complement(b))
    }

    /// Length of the longest run of a single repeated base.
    pub fn longest_homopolymer(&self) -> usize {
        let bytes = self.as_bytes();
        let mut longest = 0;
        let mut run = 0;
        let mut previous = None;
        for &b in bytes {
            if Some(b) == previous {
                run += 1;
            } else {
                run = 1;
                previous = Some(b);
            }
            longest = longest.max(run);
        }
        longest
    }

    pub fn gc_content(&self) -> f64 {
        let gc = self
            .as_bytes()
            .iter()
            .filter(|&&b| b == b'G' || b == b'C')
            .count();
        gc as f64 / self.len() as f64
    }

    /// The handle as a (sequence, reverse complement) pair.
    pub fn pair(&self) -> SequencePair {
        SequencePair::new(self.clone())
    }
}

impl fmt::Display for Sequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Sequence {
    type Err = SequenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.trim())
    }
}

impl TryFrom<String> for Sequence {
    type Error = SequenceError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<Sequence> for String {
    fn from(value: Sequence) -> Self {
        value.0
    }
}

impl AsRef<str> for Sequence {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Both orientations of one logical handle.
///
/// The reverse complement is derived, never stored independently of the
/// forward strand.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SequencePair {
    forward: Sequence,
    reverse: Sequence,
}

impl SequencePair {
    pub fn new(forward: Sequence) -> Self {
        let reverse = forward.reverse_complement();
        Self { forward, reverse }
    }

    pub fn forward(&self) -> &Sequence {
        &self.forward
    }

    pub fn reverse(&self) -> &Sequence {
        &self.reverse
    }

    pub fn orientations(&self) -> [&Sequence; 2] {
        [&self.forward, &self.reverse]
    }

    pub fn into_forward(self) -> Sequence {
        self.forward
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seq(s: &str) -> Sequence {
        Sequence::new(s).unwrap()
    }

    #[test]
    fn new_normalizes_to_upper_case() {
        assert_eq!(seq("acgT").as_str(), "ACGT");
    }

    #[test]
    fn new_rejects_empty_input() {
        assert_eq!(Sequence::new(""), Err(SequenceError::Empty));
    }

    #[test]
    fn new_rejects_non_canonical_bases() {
        let err = Sequence::new("ACNT").unwrap_err();
        assert_eq!(
            err,
            SequenceError::InvalidBase {
                sequence: "ACNT".to_string(),
                base: 'N',
                position: 2,
            }
        );
    }

    #[test]
    fn reverse_complement_reverses_and_complements() {
        assert_eq!(seq("AAAATGC").reverse_complement(), seq("GCATTTT"));
        assert_eq!(seq("GGGCATT").reverse_complement(), seq("AATGCCC"));
    }

    #[test]
    fn reverse_complement_is_an_involution() {
        for raw in ["A", "ACGTACG", "GGGCATT", "TTTTTTTT", "CAGTCAGA"] {
            let s = seq(raw);
            assert_eq!(s.reverse_complement().reverse_complement(), s);
        }
    }

    #[test]
    fn is_palindromic_detects_self_complementary_sequences() {
        assert!(seq("ACGT").is_palindromic());
        assert!(seq("GAATTC").is_palindromic());
        assert!(!seq("AAAATGC").is_palindromic());
        assert!(!seq("ACG").is_palindromic());
    }

    #[test]
    fn longest_homopolymer_counts_the_longest_run() {
        assert_eq!(seq("ACGT").longest_homopolymer(), 1);
        assert_eq!(seq("AAAATGC").longest_homopolymer(), 4);
        assert_eq!(seq("ACCCGTTTTT").longest_homopolymer(), 5);
    }

    #[test]
    fn gc_content_is_fraction_of_g_and_c() {
        assert!((seq("GGCCAATT").gc_content() - 0.5).abs() < 1e-12);
        assert_eq!(seq("AAAA").gc_content(), 0.0);
    }

    #[test]
    fn pair_exposes_both_orientations() {
        let pair = seq("AAAATGC").pair();
        assert_eq!(pair.forward(), &seq("AAAATGC"));
        assert_eq!(pair.reverse(), &seq("GCATTTT"));
        assert_eq!(pair.orientations(), [&seq("AAAATGC"), &seq("GCATTTT")]);
    }

    #[test]
    fn from_str_trims_whitespace() {
        let parsed: Sequence = " acgt\n".parse().unwrap();
        assert_eq!(parsed, seq("ACGT"));
    }
}
