//! Evolutionary distances between sequences, estimated from their pairwise alignments.

use std::fmt::Display;

use itertools::Itertools;
use log::{debug, warn};
use ndarray::Array2;
use noisy_float::types::{R64, r64};

use crate::{
    error::{Error, Result},
    pairwise::{AlignedPair, PairwiseAligner},
    sequence::Sequence,
};

/// A symmetric matrix of distances between sequences.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DistanceMatrix {
    distances: Array2<R64>,
}

/// A distance matrix where some pairs of sequences have no defined distance.
#[derive(Debug)]
pub struct PartialDistanceMatrix {
    distances: Array2<Option<R64>>,
    failed_pairs: Vec<FailedPair>,
}

/// A pair of sequences whose distance could not be computed.
#[derive(Debug)]
pub struct FailedPair {
    pub first: usize,
    pub second: usize,
    pub error: Error,
}

/// Computes the Kimura distance of an aligned pair.
///
/// Only columns without a gap are considered.
/// With `D` the fraction of those columns that are mismatches, the distance is `-ln(1 - D - 0.2 D^2)`.
pub fn kimura_distance(alignment: &AlignedPair) -> Result<f64> {
    kimura_distance_r64(alignment).map(R64::raw)
}

fn kimura_distance_r64(alignment: &AlignedPair) -> Result<R64> {
    alignment.check_lengths()?;

    let (positions_scored, exact_matches) = alignment
        .columns()
        .filter(|(x, y)| !x.is_gap() && !y.is_gap())
        .fold((0usize, 0usize), |(positions_scored, exact_matches), (x, y)| {
            (positions_scored + 1, exact_matches + usize::from(x == y))
        });
    if positions_scored == 0 {
        return Err(Error::DivisionByZero);
    }

    let similarity = exact_matches as f64 / positions_scored as f64;
    let dissimilarity = 1.0 - similarity;
    let argument = 1.0 - dissimilarity - 0.2 * dissimilarity * dissimilarity;
    let invalid_domain = || Error::InvalidDistanceDomain {
        dissimilarity,
        argument,
    };

    if argument <= 0.0 {
        return Err(invalid_domain());
    }
    // The argument is at most one, so the logarithm is not positive.
    R64::try_new(argument.ln().abs()).ok_or_else(invalid_domain)
}

/// Aligns every pair of sequences and computes their Kimura distance.
///
/// Fails on the first pair whose distance is undefined.
pub fn distance_matrix(
    aligner: &PairwiseAligner,
    sequences: &[Sequence],
) -> Result<DistanceMatrix> {
    let mut distances = Array2::from_elem((sequences.len(), sequences.len()), r64(0.0));

    for (first, second) in upper_triangle(sequences.len()) {
        let distance = pair_distance(aligner, sequences, first, second).map_err(|error| {
            Error::PairDistance {
                first,
                second,
                source: Box::new(error),
            }
        })?;
        distances[(first, second)] = distance;
        distances[(second, first)] = distance;
    }

    debug!("Computed distances between {} sequences", sequences.len());
    Ok(DistanceMatrix { distances })
}

/// Aligns every pair of sequences and computes their Kimura distance, recording the pairs where this fails.
pub fn distance_matrix_partial(
    aligner: &PairwiseAligner,
    sequences: &[Sequence],
) -> PartialDistanceMatrix {
    let mut distances = Array2::from_elem((sequences.len(), sequences.len()), None);
    let mut failed_pairs = Vec::new();

    for (first, second) in upper_triangle(sequences.len()) {
        match pair_distance(aligner, sequences, first, second) {
            Ok(distance) => {
                distances[(first, second)] = Some(distance);
                distances[(second, first)] = Some(distance);
            }
            Err(error) => {
                warn!("No distance between sequences {first} and {second}: {error}");
                failed_pairs.push(FailedPair {
                    first,
                    second,
                    error,
                });
            }
        }
    }

    PartialDistanceMatrix {
        distances,
        failed_pairs,
    }
}

/// All pairs `(first, second)` with `first <= second`.
fn upper_triangle(len: usize) -> impl Iterator<Item = (usize, usize)> {
    (0..len).flat_map(move |first| (first..len).map(move |second| (first, second)))
}

fn pair_distance(
    aligner: &PairwiseAligner,
    sequences: &[Sequence],
    first: usize,
    second: usize,
) -> Result<R64> {
    let alignment = aligner.compute(&sequences[first], &sequences[second]);
    kimura_distance_r64(&alignment)
}

impl DistanceMatrix {
    /// Builds a matrix from the distances of the pairs `(first, second)` with `first <= second`.
    pub fn from_upper_triangle(len: usize, mut distance: impl FnMut(usize, usize) -> R64) -> Self {
        let mut distances = Array2::from_elem((len, len), r64(0.0));
        for (first, second) in upper_triangle(len) {
            let value = distance(first, second);
            distances[(first, second)] = value;
            distances[(second, first)] = value;
        }
        Self { distances }
    }

    /// The number of sequences.
    pub fn len(&self) -> usize {
        self.distances.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn distance(&self, first: usize, second: usize) -> R64 {
        self.distances[(first, second)]
    }

    pub fn get(&self, first: usize, second: usize) -> f64 {
        self.distance(first, second).raw()
    }

    /// The largest distance between any sequence of `first` and any sequence of `second`.
    pub fn complete_linkage(&self, first: &[usize], second: &[usize]) -> R64 {
        first
            .iter()
            .cartesian_product(second)
            .map(|(first, second)| self.distance(*first, *second))
            .fold(r64(0.0), Ord::max)
    }
}

impl PartialDistanceMatrix {
    /// The number of sequences.
    pub fn len(&self) -> usize {
        self.distances.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, first: usize, second: usize) -> Option<f64> {
        self.distances[(first, second)].map(R64::raw)
    }

    pub fn failed_pairs(&self) -> &[FailedPair] {
        &self.failed_pairs
    }

    /// Drops sequences until all remaining pairs have a distance.
    ///
    /// Repeatedly drops the sequence involved in the most failed pairs, preferring the later one on ties.
    /// Returns the indices of the kept sequences and their distance matrix.
    pub fn retain_defined(&self) -> (Vec<usize>, DistanceMatrix) {
        let mut kept: Vec<usize> = (0..self.len()).collect();

        loop {
            let failure_counts = kept
                .iter()
                .map(|sequence| {
                    kept.iter()
                        .filter(|other| self.distances[(*sequence, **other)].is_none())
                        .count()
                })
                .collect::<Vec<_>>();

            let Some((position, _)) = failure_counts
                .iter()
                .enumerate()
                .filter(|(_, count)| **count > 0)
                .max_by_key(|(position, count)| (**count, *position))
            else {
                break;
            };

            debug!(
                "Excluding sequence {} from the distance matrix",
                kept[position]
            );
            kept.remove(position);
        }

        let matrix = DistanceMatrix::from_upper_triangle(kept.len(), |first, second| {
            self.distances[(kept[first], kept[second])].unwrap_or(r64(0.0))
        });
        (kept, matrix)
    }
}

impl Display for DistanceMatrix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in self.distances.rows() {
            let mut once = true;
            for distance in row {
                if once {
                    once = false;
                } else {
                    write!(f, " ")?;
                }
                write!(f, "{:.6}", distance.raw())?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use noisy_float::types::r64;

    use crate::{
        alignment_configuration::AlignmentConfiguration,
        error::Error,
        pairwise::{AlignedPair, PairwiseAligner},
        sequence::{Sequence, parse_row},
    };

    use super::{DistanceMatrix, distance_matrix, distance_matrix_partial, kimura_distance};

    fn sequences(sequences: &[&str]) -> Vec<Sequence> {
        sequences
            .iter()
            .map(|sequence| sequence.parse().unwrap())
            .collect()
    }

    fn pair(x: &str, y: &str) -> AlignedPair {
        AlignedPair {
            x: parse_row(x).unwrap(),
            y: parse_row(y).unwrap(),
        }
    }

    #[test]
    fn kimura() {
        assert_eq!(kimura_distance(&pair("HEAGAWGHEE", "HEAGAWGHEE")).unwrap(), 0.0);
        assert!(kimura_distance(&pair("A", "A")).unwrap().is_sign_positive());

        // One mismatch among four gap-free columns.
        let expected = -(1.0f64 - 0.25 - 0.2 * 0.25 * 0.25).ln();
        let actual = kimura_distance(&pair("HE-AGW", "HEW-GG")).unwrap();
        assert!((actual - expected).abs() < 1e-12, "{actual} != {expected}");
    }

    #[test]
    fn kimura_errors() {
        assert!(matches!(
            kimura_distance(&pair("A", "-")),
            Err(Error::DivisionByZero)
        ));
        assert!(matches!(
            kimura_distance(&pair("", "")),
            Err(Error::DivisionByZero)
        ));
        assert!(matches!(
            kimura_distance(&pair("WW", "CC")),
            Err(Error::InvalidDistanceDomain { .. })
        ));
        assert!(matches!(
            kimura_distance(&pair("AW", "A")),
            Err(Error::MalformedAlignment {
                first: 2,
                second: 1
            })
        ));
    }

    #[test]
    fn scenario_distance_is_symmetric() {
        let configuration = AlignmentConfiguration::default();
        let aligner = PairwiseAligner::new(&configuration);
        let [x, y] = <[Sequence; 2]>::try_from(sequences(&[
            "GSAQVKGHGKKVADALTNAVAHVDDMPNALSALSDLHAHKL",
            "NNPELQAHAGKVFKLVYEAAIQLQVTGVVVTDATLKNLGSVHVSKG",
        ]))
        .unwrap();

        let forward = kimura_distance(&aligner.compute(&x, &y)).unwrap();
        let backward = kimura_distance(&aligner.compute(&y, &x)).unwrap();
        assert_eq!(forward, backward);
        assert!((forward - 1.6470180921650805).abs() < 1e-12);
    }

    #[test]
    fn matrix() {
        let configuration = AlignmentConfiguration::default();
        let aligner = PairwiseAligner::new(&configuration);
        let sequences = sequences(&["HEAGAWGHEE", "HEAGAWGHE", "PAWHEAE", "HEAWHEAE"]);
        let matrix = distance_matrix(&aligner, &sequences).unwrap();

        let expected = [
            [0.0, 0.0, 0.18901054494475117, 0.0],
            [0.0, 0.0, 0.7985076962177716, 0.3595946540420671],
            [0.18901054494475117, 0.7985076962177716, 0.0, 0.1589239585799161],
            [0.0, 0.3595946540420671, 0.1589239585799161, 0.0],
        ];
        assert_eq!(matrix.len(), 4);
        for (first, row) in expected.iter().enumerate() {
            for (second, expected) in row.iter().enumerate() {
                let actual = matrix.get(first, second);
                assert!(
                    (actual - expected).abs() < 1e-12,
                    "distance({first}, {second}) = {actual} != {expected}"
                );
                assert_eq!(matrix.distance(first, second), matrix.distance(second, first));
            }
        }
    }

    #[test]
    fn undefined_distances() {
        let configuration = AlignmentConfiguration::default();
        let aligner = PairwiseAligner::new(&configuration);
        let sequences = sequences(&["HEAGAWGHEE", "WWWW", "HEAGAWGHE", "CCCC"]);

        assert!(matches!(
            distance_matrix(&aligner, &sequences),
            Err(Error::PairDistance {
                first: 0,
                second: 3,
                ..
            })
        ));

        let partial = distance_matrix_partial(&aligner, &sequences);
        assert_eq!(
            partial
                .failed_pairs()
                .iter()
                .map(|failed| (failed.first, failed.second))
                .collect::<Vec<_>>(),
            vec![(0, 3), (1, 3), (2, 3)]
        );
        assert!(matches!(
            partial.failed_pairs()[1].error,
            Error::InvalidDistanceDomain { .. }
        ));
        assert_eq!(partial.get(3, 1), None);
        assert_eq!(partial.get(0, 2), Some(0.0));

        let (kept, matrix) = partial.retain_defined();
        assert_eq!(kept, vec![0, 1, 2]);
        for first in 0..kept.len() {
            for second in 0..kept.len() {
                assert_eq!(
                    Some(matrix.get(first, second)),
                    partial.get(kept[first], kept[second])
                );
            }
        }
    }

    #[test]
    fn complete_linkage_distance() {
        let matrix = DistanceMatrix::from_upper_triangle(3, |first, second| {
            r64((first + 2 * second) as f64)
        });
        assert_eq!(matrix.get(2, 0), 4.0);
        assert_eq!(matrix.complete_linkage(&[0, 1], &[2]), r64(5.0));
        assert_eq!(matrix.complete_linkage(&[0], &[1]), r64(2.0));
    }
}
