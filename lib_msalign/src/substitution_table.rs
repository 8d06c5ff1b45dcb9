use ndarray::Array2;

use crate::{
    error::{Error, Result},
    score::Score,
    sequence::Symbol,
};

mod blosum;
pub mod io;

/// A symmetric table of scores for pairs of letters.
///
/// Pairs involving a letter that is not listed in the table receive the default score.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubstitutionTable {
    name: String,
    characters: Vec<Symbol>,
    scores: Array2<Score>,
    default_score: Score,

    // Position of each letter in `characters`.
    index: [Option<usize>; Symbol::LETTER_COUNT],
}

impl SubstitutionTable {
    /// Creates a table from the scores given in row-major order over `characters`.
    pub fn new(
        name: impl Into<String>,
        characters: Vec<Symbol>,
        scores: Vec<Score>,
        default_score: Score,
    ) -> Result<Self> {
        let mut index = [None; Symbol::LETTER_COUNT];
        for (position, character) in characters.iter().enumerate() {
            let letter_index = character.letter_index().ok_or(Error::InvalidSymbol {
                character: character.as_char(),
            })?;
            if index[letter_index].replace(position).is_some() {
                return Err(Error::DuplicateSubstitutionCharacter(character.as_char()));
            }
        }

        let score_count = scores.len();
        let scores = Array2::from_shape_vec((characters.len(), characters.len()), scores).map_err(
            |_| Error::SubstitutionTableShape {
                characters: characters.len(),
                scores: score_count,
            },
        )?;

        for ((row, column), forward) in scores.indexed_iter() {
            let backward = scores[(column, row)];
            if row < column && *forward != backward {
                return Err(Error::AsymmetricSubstitutionTable {
                    first: characters[row].as_char(),
                    second: characters[column].as_char(),
                    forward: forward.as_i64(),
                    backward: backward.as_i64(),
                });
            }
        }

        Ok(Self {
            name: name.into(),
            characters,
            scores,
            default_score,
            index,
        })
    }

    /// The BLOSUM50 amino acid table with a default score of zero.
    pub fn blosum50() -> Self {
        let characters: Vec<_> = blosum::BLOSUM50_CHARACTERS
            .iter()
            .filter_map(|character| Symbol::from_letter_index(usize::from(character - b'A')))
            .collect();

        let mut index = [None; Symbol::LETTER_COUNT];
        for (position, character) in characters.iter().enumerate() {
            if let Some(letter_index) = character.letter_index() {
                index[letter_index] = Some(position);
            }
        }

        let scores = Array2::from_shape_fn((characters.len(), characters.len()), |(row, column)| {
            Score::from(blosum::BLOSUM50_SCORES[row][column])
        });

        Self {
            name: "BLOSUM50".to_string(),
            characters,
            scores,
            default_score: Score::ZERO,
            index,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn characters(&self) -> &[Symbol] {
        &self.characters
    }

    pub fn default_score(&self) -> Score {
        self.default_score
    }

    /// The score of substituting `a` with `b`.
    ///
    /// The gap is never part of the table and always receives the default score.
    pub fn score(&self, a: Symbol, b: Symbol) -> Score {
        match (self.position(a), self.position(b)) {
            (Some(row), Some(column)) => self.scores[(row, column)],
            _ => self.default_score,
        }
    }

    fn position(&self, symbol: Symbol) -> Option<usize> {
        symbol
            .letter_index()
            .and_then(|letter_index| self.index[letter_index])
    }
}
