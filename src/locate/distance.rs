use bio::alignment::distance::simd::{hamming, levenshtein};
use std::{fmt, str::FromStr};

/// Cost model used to score a window against its query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DistanceMetric {
    /// Substitutions, insertions and deletions, tolerating local indels inside a window
    #[default]
    Levenshtein,
    /// Substitutions only. Faster, for data where indels are rare
    Hamming,
}

impl DistanceMetric {
    /// Number of single-symbol edits between `a` and `b`.
    ///
    /// Windows are always cut to the length of their query, so both metrics
    /// see equal-length inputs; `Hamming` requires it.
    #[inline]
    pub fn distance(&self, a: &[u8], b: &[u8]) -> u32 {
        match self {
            DistanceMetric::Levenshtein => levenshtein(a, b),
            DistanceMetric::Hamming => hamming(a, b) as u32,
        }
    }
}

impl FromStr for DistanceMetric {
    type Err = &'static str;
    fn from_str(metric: &str) -> Result<Self, Self::Err> {
        match metric {
            "levenshtein" | "edit" => Ok(DistanceMetric::Levenshtein),
            "hamming" => Ok(DistanceMetric::Hamming),
            _ => Err("Invalid distance metric (expected levenshtein or hamming)"),
        }
    }
}

impl fmt::Display for DistanceMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DistanceMetric::Levenshtein => write!(f, "levenshtein"),
            DistanceMetric::Hamming => write!(f, "hamming"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_sequences_have_zero_distance() {
        let seqs: [&[u8]; 3] = [b"A", b"ACGT", b"GGGGCCCCAAAATTTT"];
        for seq in seqs {
            assert_eq!(DistanceMetric::Levenshtein.distance(seq, seq), 0);
            assert_eq!(DistanceMetric::Hamming.distance(seq, seq), 0);
        }
    }

    #[test]
    fn test_substitution_costs_one() {
        assert_eq!(DistanceMetric::Levenshtein.distance(b"ACGT", b"ACGA"), 1);
        assert_eq!(DistanceMetric::Hamming.distance(b"ACGT", b"ACGA"), 1);
    }

    #[test]
    fn test_levenshtein_tolerates_shift() {
        // One deletion plus one insertion, whereas every position differs
        assert_eq!(DistanceMetric::Levenshtein.distance(b"ACGTACGT", b"CGTACGTA"), 2);
        assert_eq!(DistanceMetric::Hamming.distance(b"ACGTACGT", b"CGTACGTA"), 8);
    }

    #[test]
    fn test_cost_model_is_symmetric() {
        let (a, b) = (b"GATTACA", b"GCATGCT");
        assert_eq!(
            DistanceMetric::Levenshtein.distance(a, b),
            DistanceMetric::Levenshtein.distance(b, a)
        );
        assert_eq!(
            DistanceMetric::Hamming.distance(a, b),
            DistanceMetric::Hamming.distance(b, a)
        );
    }

    #[test]
    fn test_metric_from_str() {
        assert_eq!(
            "levenshtein".parse::<DistanceMetric>(),
            Ok(DistanceMetric::Levenshtein)
        );
        assert_eq!("edit".parse::<DistanceMetric>(), Ok(DistanceMetric::Levenshtein));
        assert_eq!("hamming".parse::<DistanceMetric>(), Ok(DistanceMetric::Hamming));
        assert!("blosum62".parse::<DistanceMetric>().is_err());
    }
}
