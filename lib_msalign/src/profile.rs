//! Sets of aligned rows.

use std::fmt::Display;

use ndarray::{Array2, ArrayView1, Axis};

use crate::{
    error::{Error, Result},
    sequence::{Sequence, Symbol, parse_row, row_to_string},
};

/// A non-empty set of equal-length rows of symbols, which may contain gaps.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "Vec<String>", into = "Vec<String>"))]
pub struct Profile {
    symbols: Array2<Symbol>,
}

impl Profile {
    pub fn new(rows: Vec<Vec<Symbol>>) -> Result<Self> {
        let expected = rows.first().ok_or(Error::EmptyProfile)?.len();
        if let Some((row, actual)) = rows
            .iter()
            .map(Vec::len)
            .enumerate()
            .find(|(_, length)| *length != expected)
        {
            return Err(Error::RaggedProfile {
                row,
                expected,
                actual,
            });
        }

        Ok(Self {
            symbols: Array2::from_shape_fn((rows.len(), expected), |(row, column)| {
                rows[row][column]
            }),
        })
    }

    /// Wraps a sequence into a profile with a single row.
    pub fn from_sequence(sequence: &Sequence) -> Self {
        Self {
            symbols: Array2::from_shape_fn((1, sequence.len()), |(_, column)| {
                sequence.symbols()[column]
            }),
        }
    }

    /// Expects a non-empty array.
    pub(crate) fn from_array(symbols: Array2<Symbol>) -> Self {
        debug_assert!(symbols.nrows() > 0);
        Self { symbols }
    }

    pub fn row_count(&self) -> usize {
        self.symbols.nrows()
    }

    /// The number of columns.
    pub fn len(&self) -> usize {
        self.symbols.ncols()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn symbol(&self, row: usize, column: usize) -> Symbol {
        self.symbols[(row, column)]
    }

    pub fn row(&self, row: usize) -> ArrayView1<'_, Symbol> {
        self.symbols.row(row)
    }

    pub fn column(&self, column: usize) -> ArrayView1<'_, Symbol> {
        self.symbols.column(column)
    }

    pub fn rows(&self) -> impl Iterator<Item = ArrayView1<'_, Symbol>> {
        self.symbols.axis_iter(Axis(0))
    }

    pub fn columns(&self) -> impl Iterator<Item = ArrayView1<'_, Symbol>> {
        self.symbols.axis_iter(Axis(1))
    }

    pub fn to_rows(&self) -> Vec<Vec<Symbol>> {
        self.rows().map(|row| row.to_vec()).collect()
    }

    pub fn row_strings(&self) -> Vec<String> {
        self.rows().map(|row| row_to_string(&row.to_vec())).collect()
    }

    /// Counts the gaps in the whole profile.
    pub fn gap_count(&self) -> usize {
        self.symbols.iter().filter(|symbol| symbol.is_gap()).count()
    }
}

impl TryFrom<Vec<String>> for Profile {
    type Error = Error;

    fn try_from(rows: Vec<String>) -> Result<Self> {
        rows.iter()
            .map(|row| parse_row(row))
            .collect::<Result<Vec<_>>>()
            .and_then(Self::new)
    }
}

impl From<Profile> for Vec<String> {
    fn from(profile: Profile) -> Self {
        profile.row_strings()
    }
}

impl Display for Profile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in self.rows() {
            for symbol in row {
                write!(f, "{symbol}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
