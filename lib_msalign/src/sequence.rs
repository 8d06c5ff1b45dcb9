//! The alphabet of alignable symbols and gap-free input sequences.

use std::{fmt::Display, str::FromStr};

use crate::error::{Error, Result};

/// A single alignment symbol: an uppercase letter `A`-`Z` or the gap `-`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "char", into = "char"))]
pub struct Symbol(u8);

/// A gap-free sequence of symbols.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "String", into = "String"))]
pub struct Sequence {
    symbols: Vec<Symbol>,
}

impl Symbol {
    pub const GAP: Self = Self(b'-');

    /// The number of letters in the alphabet, excluding the gap.
    pub const LETTER_COUNT: usize = 26;

    pub fn is_gap(&self) -> bool {
        *self == Self::GAP
    }

    /// The index of the letter in `A..=Z`, or `None` for the gap.
    pub fn letter_index(&self) -> Option<usize> {
        if self.is_gap() {
            None
        } else {
            Some(usize::from(self.0 - b'A'))
        }
    }

    pub fn from_letter_index(index: usize) -> Option<Self> {
        u8::try_from(index)
            .ok()
            .filter(|index| usize::from(*index) < Self::LETTER_COUNT)
            .map(|index| Self(b'A' + index))
    }

    pub fn as_char(&self) -> char {
        char::from(self.0)
    }
}

impl TryFrom<char> for Symbol {
    type Error = Error;

    fn try_from(character: char) -> Result<Self> {
        if character.is_ascii_uppercase() || character == '-' {
            // Checked above to be ASCII.
            Ok(Self(character as u8))
        } else {
            Err(Error::InvalidSymbol { character })
        }
    }
}

impl TryFrom<u8> for Symbol {
    type Error = Error;

    fn try_from(byte: u8) -> Result<Self> {
        Self::try_from(char::from(byte))
    }
}

impl From<Symbol> for char {
    fn from(symbol: Symbol) -> Self {
        symbol.as_char()
    }
}

impl Display for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.as_char(), f)
    }
}

/// Parses a row of symbols that may contain gaps.
pub fn parse_row(row: &str) -> Result<Vec<Symbol>> {
    row.chars().map(Symbol::try_from).collect()
}

pub fn row_to_string(row: &[Symbol]) -> String {
    row.iter().map(Symbol::as_char).collect()
}

impl Sequence {
    pub fn from_slice_u8(slice: &[u8]) -> Result<Self> {
        slice
            .iter()
            .copied()
            .map(Symbol::try_from)
            .collect::<Result<Vec<_>>>()
            .and_then(Self::from_symbols)
    }

    pub fn from_symbols(symbols: Vec<Symbol>) -> Result<Self> {
        if let Some(position) = symbols.iter().position(Symbol::is_gap) {
            Err(Error::GapInSequence { position })
        } else {
            Ok(Self { symbols })
        }
    }

    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Symbol> + '_ {
        self.symbols.iter().copied()
    }
}

impl FromStr for Sequence {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_slice_u8(s.as_bytes())
    }
}

impl TryFrom<String> for Sequence {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<Sequence> for String {
    fn from(sequence: Sequence) -> Self {
        sequence.to_string()
    }
}

impl Display for Sequence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", row_to_string(&self.symbols))
    }
}
