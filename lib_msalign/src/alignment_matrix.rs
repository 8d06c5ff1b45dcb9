use log::trace;
use ndarray::Array2;

use crate::score::Score;

/// The scores of the three ways to extend an alignment by one column.
///
/// Columns are indexed from zero in their respective input.
pub trait ColumnScoring {
    fn x_len(&self) -> usize;

    fn y_len(&self) -> usize;

    /// The score of aligning column `x_column` of x to column `y_column` of y.
    fn no_gap(&self, x_column: usize, y_column: usize) -> Score;

    /// The score of aligning column `y_column` of y to a gap column.
    fn gap_in_x(&self, y_column: usize) -> Score;

    /// The score of aligning column `x_column` of x to a gap column.
    fn gap_in_y(&self, x_column: usize) -> Score;
}

/// The dynamic programming matrix of a global alignment.
///
/// Holds the optimal score of each pair of prefixes, together with all steps achieving it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlignmentMatrix {
    matrix: Array2<AlignmentMatrixEntry>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlignmentMatrixEntry {
    pub score: Score,
    pub flags: TracebackFlags,
}

/// The steps that achieve the optimal score of a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TracebackFlags {
    pub no_gap: bool,
    pub gap_in_x: bool,
    pub gap_in_y: bool,
}

/// A single column of an alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AlignmentStep {
    /// Consumes one column of each input.
    NoGap,
    /// Consumes one column of y, aligned to a gap column in x.
    GapInX,
    /// Consumes one column of x, aligned to a gap column in y.
    GapInY,
}

/// The preference among co-optimal steps during traceback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TracebackOrder([AlignmentStep; 3]);

/// A cell of the matrix, given by the number of columns of x and of y consumed so far.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Cell {
    x: usize,
    y: usize,
}

impl AlignmentMatrix {
    pub fn new(x_len: usize, y_len: usize) -> Self {
        Self {
            matrix: Array2::default((x_len + 1, y_len + 1)),
        }
    }

    /// Fills the matrix and returns the optimal score of the full inputs.
    pub fn align(&mut self, scoring: &impl ColumnScoring) -> Score {
        debug_assert_eq!(
            self.matrix.dim(),
            (scoring.x_len() + 1, scoring.y_len() + 1)
        );

        self.initialise(scoring);
        self.align_inner(scoring);
        trace!("Alignment matrix:\n{self}");
        self.score()
    }

    /// The optimal score of the full inputs.
    pub fn score(&self) -> Score {
        self.entry(self.final_cell()).score
    }

    /// Walks back from the final cell to the origin, choosing among co-optimal steps by `order`.
    ///
    /// The steps are returned from the start of the alignment to its end.
    pub fn traceback(&self, order: TracebackOrder) -> Vec<AlignmentStep> {
        let mut cell = self.final_cell();
        let mut steps = Vec::with_capacity(cell.x + cell.y);

        while let Some(step) = self.entry(cell).flags.first_in(order) {
            steps.push(step);
            cell = cell.predecessor(step);
        }
        debug_assert!(cell.is_origin());

        steps.reverse();
        steps
    }

    fn entry(&self, cell: Cell) -> &AlignmentMatrixEntry {
        &self.matrix[(cell.x, cell.y)]
    }

    fn final_cell(&self) -> Cell {
        let (x_limit, y_limit) = self.matrix.dim();
        Cell::new(x_limit - 1, y_limit - 1)
    }

    fn initialise(&mut self, scoring: &impl ColumnScoring) {
        let (x_limit, y_limit) = self.matrix.dim();
        self.matrix[(0, 0)] = AlignmentMatrixEntry {
            score: Score::ZERO,
            flags: TracebackFlags::default(),
        };

        // Edges can only be reached by gaps.
        for x in 1..x_limit {
            self.matrix[(x, 0)] = AlignmentMatrixEntry {
                score: self.matrix[(x - 1, 0)].score + scoring.gap_in_y(x - 1),
                flags: TracebackFlags::from(AlignmentStep::GapInY),
            };
        }
        for y in 1..y_limit {
            self.matrix[(0, y)] = AlignmentMatrixEntry {
                score: self.matrix[(0, y - 1)].score + scoring.gap_in_x(y - 1),
                flags: TracebackFlags::from(AlignmentStep::GapInX),
            };
        }
    }

    fn align_inner(&mut self, scoring: &impl ColumnScoring) {
        let (x_limit, y_limit) = self.matrix.dim();
        for cell in (1..y_limit).flat_map(|y| (1..x_limit).map(move |x| Cell::new(x, y))) {
            self.set_max_score(cell, scoring);
        }
    }

    fn set_max_score(&mut self, cell: Cell, scoring: &impl ColumnScoring) {
        let extend = |step| self.entry(cell.predecessor(step)).score;
        let no_gap = extend(AlignmentStep::NoGap) + scoring.no_gap(cell.x - 1, cell.y - 1);
        let gap_in_x = extend(AlignmentStep::GapInX) + scoring.gap_in_x(cell.y - 1);
        let gap_in_y = extend(AlignmentStep::GapInY) + scoring.gap_in_y(cell.x - 1);

        let score = no_gap.max(gap_in_x).max(gap_in_y);
        self.matrix[(cell.x, cell.y)] = AlignmentMatrixEntry {
            score,
            flags: TracebackFlags {
                no_gap: no_gap == score,
                gap_in_x: gap_in_x == score,
                gap_in_y: gap_in_y == score,
            },
        };
    }

    #[cfg(test)]
    fn manual_debug_fill(&mut self, entries: impl IntoIterator<Item = AlignmentMatrixEntry>) {
        let mut entries = entries.into_iter();
        for entry in self.matrix.iter_mut() {
            *entry = entries.next().unwrap();
        }
        assert!(entries.next().is_none());
    }
}

impl Cell {
    fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    fn is_origin(&self) -> bool {
        self.x == 0 && self.y == 0
    }

    /// The cell that `step` leads here from.
    fn predecessor(&self, step: AlignmentStep) -> Self {
        match step {
            AlignmentStep::NoGap => Self::new(self.x - 1, self.y - 1),
            AlignmentStep::GapInX => Self::new(self.x, self.y - 1),
            AlignmentStep::GapInY => Self::new(self.x - 1, self.y),
        }
    }
}

impl TracebackFlags {
    pub fn contains(&self, step: AlignmentStep) -> bool {
        match step {
            AlignmentStep::NoGap => self.no_gap,
            AlignmentStep::GapInX => self.gap_in_x,
            AlignmentStep::GapInY => self.gap_in_y,
        }
    }

    /// The first step of `order` that is set, or `None` for the matrix origin.
    pub fn first_in(&self, order: TracebackOrder) -> Option<AlignmentStep> {
        order.0.into_iter().find(|step| self.contains(*step))
    }
}

impl From<AlignmentStep> for TracebackFlags {
    fn from(step: AlignmentStep) -> Self {
        Self {
            no_gap: step == AlignmentStep::NoGap,
            gap_in_x: step == AlignmentStep::GapInX,
            gap_in_y: step == AlignmentStep::GapInY,
        }
    }
}

impl TracebackOrder {
    /// No gap, then a gap in x, then a gap in y.
    ///
    /// Pairwise alignment with this order takes the diagonal on ties, and otherwise prefers consuming y.
    pub const PAIRWISE: Self = Self([
        AlignmentStep::NoGap,
        AlignmentStep::GapInX,
        AlignmentStep::GapInY,
    ]);

    /// No gap, then a gap in y, then a gap in x.
    pub const PROFILE: Self = Self([
        AlignmentStep::NoGap,
        AlignmentStep::GapInY,
        AlignmentStep::GapInX,
    ]);

    pub fn steps(&self) -> [AlignmentStep; 3] {
        self.0
    }
}

impl Default for TracebackOrder {
    fn default() -> Self {
        Self::PROFILE
    }
}

impl Default for AlignmentMatrixEntry {
    fn default() -> Self {
        Self {
            score: Score::MIN,
            flags: TracebackFlags::default(),
        }
    }
}

impl core::fmt::Display for AlignmentMatrix {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let mut score_column_widths = vec![0; self.matrix.dim().1];
        for x_index in 0..self.matrix.dim().0 {
            for (y_index, score_column_width) in score_column_widths.iter_mut().enumerate() {
                let width = self.matrix[[x_index, y_index]].score.to_string().len();
                *score_column_width = width.max(*score_column_width);
            }
        }

        for x_index in 0..self.matrix.dim().0 {
            write!(f, "[ ")?;
            for (y_index, &width) in score_column_widths.iter().enumerate() {
                let entry = self.matrix[[x_index, y_index]];
                write!(f, "{: >width$}", entry.score)?;
                write!(
                    f,
                    "{}{}{} ",
                    if entry.flags.no_gap { "N" } else { "." },
                    if entry.flags.gap_in_x { "X" } else { "." },
                    if entry.flags.gap_in_y { "Y" } else { "." },
                )?;
            }
            writeln!(f, "]")?;
        }
        Ok(())
    }
}
