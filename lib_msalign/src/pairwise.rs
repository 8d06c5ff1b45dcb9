//! Global alignment of two sequences with a linear gap penalty.

use std::fmt::Display;

use log::debug;

use crate::{
    alignment_configuration::AlignmentConfiguration,
    alignment_matrix::{AlignmentMatrix, AlignmentStep, ColumnScoring, TracebackOrder},
    error::{Error, Result},
    score::Score,
    sequence::{Sequence, Symbol, row_to_string},
};

/// Two rows of symbols, aligned column by column.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AlignedPair {
    pub x: Vec<Symbol>,
    pub y: Vec<Symbol>,
}

/// Needleman-Wunsch alignment of two sequences.
///
/// Among co-optimal alignments, each traceback step prefers aligning two symbols,
/// then a symbol of y against a gap, then a symbol of x against a gap.
#[derive(Debug, Clone, Copy)]
pub struct PairwiseAligner<'configuration> {
    configuration: &'configuration AlignmentConfiguration,
}

struct SequencePairScoring<'a> {
    x: &'a [Symbol],
    y: &'a [Symbol],
    configuration: &'a AlignmentConfiguration,
}

impl<'configuration> PairwiseAligner<'configuration> {
    pub fn new(configuration: &'configuration AlignmentConfiguration) -> Self {
        Self { configuration }
    }

    pub fn configuration(&self) -> &'configuration AlignmentConfiguration {
        self.configuration
    }

    pub fn compute(&self, x: &Sequence, y: &Sequence) -> AlignedPair {
        self.compute_with_score(x, y).0
    }

    /// Aligns `x` to `y` and returns the alignment together with its optimal score.
    pub fn compute_with_score(&self, x: &Sequence, y: &Sequence) -> (AlignedPair, Score) {
        let scoring = SequencePairScoring {
            x: x.symbols(),
            y: y.symbols(),
            configuration: self.configuration,
        };
        let mut matrix = AlignmentMatrix::new(x.len(), y.len());
        let score = matrix.align(&scoring);
        let steps = matrix.traceback(TracebackOrder::PAIRWISE);

        let alignment = AlignedPair::from_steps(x.symbols(), y.symbols(), &steps);
        debug!(
            "Aligned sequences of lengths {} and {} into {} columns with score {score}",
            x.len(),
            y.len(),
            alignment.len(),
        );
        (alignment, score)
    }

    /// Computes the score of an existing alignment.
    ///
    /// A run of consecutive gaps in one row scores `-length * gap_penalty`.
    pub fn score_alignment(&self, alignment: &AlignedPair) -> Result<Score> {
        alignment.check_lengths()?;

        let mut score = Score::ZERO;
        let mut column = 0;
        while column < alignment.len() {
            let x_gaps = gap_run_length(&alignment.x[column..]);
            let y_gaps = gap_run_length(&alignment.y[column..]);

            if x_gaps > 0 {
                score = score + self.configuration.gap_run_score(x_gaps);
                column += x_gaps;
            } else if y_gaps > 0 {
                score = score + self.configuration.gap_run_score(y_gaps);
                column += y_gaps;
            } else {
                score = score
                    + self
                        .configuration
                        .score(alignment.x[column], alignment.y[column]);
                column += 1;
            }
        }

        Ok(score)
    }
}

fn gap_run_length(row: &[Symbol]) -> usize {
    row.iter().take_while(|symbol| symbol.is_gap()).count()
}

impl ColumnScoring for SequencePairScoring<'_> {
    fn x_len(&self) -> usize {
        self.x.len()
    }

    fn y_len(&self) -> usize {
        self.y.len()
    }

    fn no_gap(&self, x_column: usize, y_column: usize) -> Score {
        self.configuration
            .score(self.x[x_column], self.y[y_column])
    }

    fn gap_in_x(&self, _y_column: usize) -> Score {
        -self.configuration.gap_penalty
    }

    fn gap_in_y(&self, _x_column: usize) -> Score {
        -self.configuration.gap_penalty
    }
}

impl AlignedPair {
    /// Lays out `x` and `y` along the given steps.
    pub fn from_steps(x: &[Symbol], y: &[Symbol], steps: &[AlignmentStep]) -> Self {
        let mut x = x.iter().copied();
        let mut y = y.iter().copied();
        let mut result = Self {
            x: Vec::with_capacity(steps.len()),
            y: Vec::with_capacity(steps.len()),
        };

        for step in steps {
            let (x_symbol, y_symbol) = match step {
                AlignmentStep::NoGap => (x.next(), y.next()),
                AlignmentStep::GapInX => (Some(Symbol::GAP), y.next()),
                AlignmentStep::GapInY => (x.next(), Some(Symbol::GAP)),
            };
            result.x.extend(x_symbol);
            result.y.extend(y_symbol);
        }
        debug_assert_eq!(result.x.len(), result.y.len());

        result
    }

    /// The number of columns.
    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    pub fn columns(&self) -> impl Iterator<Item = (Symbol, Symbol)> + '_ {
        self.x.iter().copied().zip(self.y.iter().copied())
    }

    /// Returns the pair with `x` and `y` swapped.
    pub fn mirrored(&self) -> Self {
        Self {
            x: self.y.clone(),
            y: self.x.clone(),
        }
    }

    pub(crate) fn check_lengths(&self) -> Result<()> {
        if self.x.len() == self.y.len() {
            Ok(())
        } else {
            Err(Error::MalformedAlignment {
                first: self.x.len(),
                second: self.y.len(),
            })
        }
    }
}

impl Display for AlignedPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{}", row_to_string(&self.x))?;
        writeln!(f, "{}", row_to_string(&self.y))
    }
}
