//! Global alignment of two profiles, where each profile may also be a single sequence.

use std::borrow::Cow;

use log::{debug, trace};
use ndarray::Array2;

use crate::{
    alignment_configuration::AlignmentConfiguration,
    alignment_matrix::{AlignmentMatrix, AlignmentStep, ColumnScoring, TracebackOrder},
    error::Result,
    profile::Profile,
    score::Score,
    sequence::{Sequence, Symbol},
};

/// An input to [`ProfileAligner::align`].
#[derive(Debug, Clone, Copy)]
pub enum AlignmentInput<'input> {
    Sequence(&'input Sequence),
    Profile(&'input Profile),
    /// Rows that are validated to form a profile before aligning.
    Rows(&'input [Vec<Symbol>]),
}

/// Aligns profiles column by column, scoring each pair of columns by the sum over all pairs of their symbols.
#[derive(Debug, Clone, Copy)]
pub struct ProfileAligner<'configuration> {
    configuration: &'configuration AlignmentConfiguration,
    traceback_order: TracebackOrder,
}

struct ProfilePairScoring<'a> {
    x: &'a Profile,
    y: &'a Profile,
    configuration: &'a AlignmentConfiguration,
}

impl<'configuration> ProfileAligner<'configuration> {
    pub fn new(configuration: &'configuration AlignmentConfiguration) -> Self {
        Self {
            configuration,
            traceback_order: TracebackOrder::default(),
        }
    }

    pub fn with_traceback_order(self, traceback_order: TracebackOrder) -> Self {
        Self {
            traceback_order,
            ..self
        }
    }

    pub fn traceback_order(&self) -> TracebackOrder {
        self.traceback_order
    }

    /// Aligns `x` to `y`.
    ///
    /// The rows of the result are the rows of `x` followed by the rows of `y`, with gap columns inserted.
    pub fn align<'x, 'y>(
        &self,
        x: impl Into<AlignmentInput<'x>>,
        y: impl Into<AlignmentInput<'y>>,
    ) -> Result<Profile> {
        self.align_with_score(x, y).map(|(profile, _)| profile)
    }

    pub fn align_with_score<'x, 'y>(
        &self,
        x: impl Into<AlignmentInput<'x>>,
        y: impl Into<AlignmentInput<'y>>,
    ) -> Result<(Profile, Score)> {
        let x = x.into().into_profile()?;
        let y = y.into().into_profile()?;
        trace!(
            "Aligning a profile of {} rows and {} columns to a profile of {} rows and {} columns",
            x.row_count(),
            x.len(),
            y.row_count(),
            y.len()
        );

        let scoring = ProfilePairScoring {
            x: &x,
            y: &y,
            configuration: self.configuration,
        };
        let mut matrix = AlignmentMatrix::new(x.len(), y.len());
        let score = matrix.align(&scoring);
        let steps = matrix.traceback(self.traceback_order);

        let profile = stack_profiles(&x, &y, &steps);
        debug!(
            "Aligned profiles of {} and {} rows into {} columns with score {score}",
            x.row_count(),
            y.row_count(),
            profile.len()
        );
        Ok((profile, score))
    }
}

impl<'input> AlignmentInput<'input> {
    pub fn into_profile(self) -> Result<Cow<'input, Profile>> {
        Ok(match self {
            Self::Sequence(sequence) => Cow::Owned(Profile::from_sequence(sequence)),
            Self::Profile(profile) => Cow::Borrowed(profile),
            Self::Rows(rows) => Cow::Owned(Profile::new(rows.to_vec())?),
        })
    }
}

impl<'input> From<&'input Sequence> for AlignmentInput<'input> {
    fn from(sequence: &'input Sequence) -> Self {
        Self::Sequence(sequence)
    }
}

impl<'input> From<&'input Profile> for AlignmentInput<'input> {
    fn from(profile: &'input Profile) -> Self {
        Self::Profile(profile)
    }
}

impl<'input> From<&'input [Vec<Symbol>]> for AlignmentInput<'input> {
    fn from(rows: &'input [Vec<Symbol>]) -> Self {
        Self::Rows(rows)
    }
}

impl ProfilePairScoring<'_> {
    fn column_to_gap(&self, column: ndarray::ArrayView1<'_, Symbol>, other_width: usize) -> Score {
        column
            .iter()
            .map(|symbol| self.configuration.score(*symbol, Symbol::GAP) * other_width)
            .sum()
    }
}

impl ColumnScoring for ProfilePairScoring<'_> {
    fn x_len(&self) -> usize {
        self.x.len()
    }

    fn y_len(&self) -> usize {
        self.y.len()
    }

    fn no_gap(&self, x_column: usize, y_column: usize) -> Score {
        let y_column = self.y.column(y_column);
        self.x
            .column(x_column)
            .iter()
            .flat_map(|x_symbol| {
                y_column
                    .iter()
                    .map(|y_symbol| self.configuration.score(*x_symbol, *y_symbol))
            })
            .sum()
    }

    fn gap_in_x(&self, y_column: usize) -> Score {
        self.column_to_gap(self.y.column(y_column), self.x.row_count())
    }

    fn gap_in_y(&self, x_column: usize) -> Score {
        self.column_to_gap(self.x.column(x_column), self.y.row_count())
    }
}

/// Places the rows of `x` above the rows of `y`, inserting gap columns as given by `steps`.
fn stack_profiles(x: &Profile, y: &Profile, steps: &[AlignmentStep]) -> Profile {
    let mut x_columns = Vec::with_capacity(steps.len());
    let mut y_columns = Vec::with_capacity(steps.len());
    let (mut x_column, mut y_column) = (0, 0);

    for step in steps {
        match step {
            AlignmentStep::NoGap => {
                x_columns.push(Some(x_column));
                y_columns.push(Some(y_column));
                x_column += 1;
                y_column += 1;
            }
            AlignmentStep::GapInX => {
                x_columns.push(None);
                y_columns.push(Some(y_column));
                y_column += 1;
            }
            AlignmentStep::GapInY => {
                x_columns.push(Some(x_column));
                y_columns.push(None);
                x_column += 1;
            }
        }
    }

    Profile::from_array(Array2::from_shape_fn(
        (x.row_count() + y.row_count(), steps.len()),
        |(row, step)| {
            if row < x.row_count() {
                x_columns[step].map_or(Symbol::GAP, |column| x.symbol(row, column))
            } else {
                y_columns[step].map_or(Symbol::GAP, |column| {
                    y.symbol(row - x.row_count(), column)
                })
            }
        },
    ))
}

#[cfg(test)]
mod tests {
    use crate::{
        alignment_configuration::AlignmentConfiguration,
        alignment_matrix::TracebackOrder,
        error::Error,
        pairwise::PairwiseAligner,
        profile::Profile,
        sequence::{Sequence, parse_row, row_to_string},
    };

    use super::{AlignmentInput, ProfileAligner};

    fn sequence(sequence: &str) -> Sequence {
        sequence.parse().unwrap()
    }

    fn profile(rows: &[&str]) -> Profile {
        Profile::try_from(rows.iter().map(|row| row.to_string()).collect::<Vec<_>>()).unwrap()
    }

    #[test]
    fn profile_order_breaks_ties_differently() {
        let configuration = AlignmentConfiguration::default();
        let aligner = ProfileAligner::new(&configuration);
        let (result, score) = aligner
            .align_with_score(&sequence("AWA"), &sequence("WAW"))
            .unwrap();

        assert_eq!(result.row_strings(), vec!["-AWA", "WAW-"]);
        assert_eq!(score.as_i64(), 4);
    }

    #[test]
    fn pairwise_order_reproduces_pairwise_alignment() {
        let configuration = AlignmentConfiguration::default();
        let pairwise_aligner = PairwiseAligner::new(&configuration);
        let profile_aligner =
            ProfileAligner::new(&configuration).with_traceback_order(TracebackOrder::PAIRWISE);

        for (x, y) in [
            ("AWA", "WAW"),
            ("HEAGAWGHEE", "PAWHEAE"),
            ("PAWHEAE", "HEAGAWGHEE"),
            ("HEAWHEAE", "HEAWHEAE"),
            ("", "AC"),
        ] {
            let (x, y) = (sequence(x), sequence(y));
            let (pair, pair_score) = pairwise_aligner.compute_with_score(&x, &y);
            let (profile, profile_score) = profile_aligner.align_with_score(&x, &y).unwrap();

            assert_eq!(
                profile.row_strings(),
                vec![row_to_string(&pair.x), row_to_string(&pair.y)]
            );
            assert_eq!(profile_score, pair_score);
        }
    }

    #[test]
    fn sequence_against_profile() {
        let configuration = AlignmentConfiguration::default();
        let aligner = ProfileAligner::new(&configuration);
        let x = profile(&["HEAGAWGHEE", "HEAGAWGH-E"]);
        let y = sequence("PAWHEAE");

        let result = aligner.align(&x, &y).unwrap();
        assert_eq!(
            result.row_strings(),
            vec!["HEAGAWGHEE", "HEAGAWGH-E", "--P-AWHEAE"]
        );

        // Swapping the inputs swaps the rows of the result.
        let swapped = aligner.align(&y, &x).unwrap();
        assert_eq!(
            swapped.row_strings(),
            vec!["--P-AWHEAE", "HEAGAWGHEE", "HEAGAWGH-E"]
        );
    }

    #[test]
    fn gap_columns_are_kept() {
        let configuration = AlignmentConfiguration::default();
        let aligner = ProfileAligner::new(&configuration);
        let x = profile(&["A-A", "A-A"]);
        let y = profile(&["A-A"]);

        let result = aligner.align(&x, &y).unwrap();
        assert_eq!(result.row_strings(), vec!["A-A", "A-A", "A-A"]);
    }

    #[test]
    fn rows_are_validated() {
        let configuration = AlignmentConfiguration::default();
        let aligner = ProfileAligner::new(&configuration);
        let x = sequence("HEA");

        let ragged = vec![parse_row("HE-A").unwrap(), parse_row("HEA").unwrap()];
        assert!(matches!(
            aligner.align(&x, ragged.as_slice()),
            Err(Error::RaggedProfile {
                row: 1,
                expected: 4,
                actual: 3
            })
        ));

        let empty: Vec<Vec<_>> = Vec::new();
        assert!(matches!(
            aligner.align(AlignmentInput::Rows(&empty), &x),
            Err(Error::EmptyProfile)
        ));

        let rows = vec![parse_row("HE-A").unwrap(), parse_row("HEA-").unwrap()];
        let result = aligner.align(&x, rows.as_slice()).unwrap();
        assert_eq!(result.row_strings(), vec!["HE-A", "HE-A", "HEA-"]);
    }
}
