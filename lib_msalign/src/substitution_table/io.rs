use std::io::{Read, Write};

use log::trace;
use nom::{
    IResult, Parser,
    bytes::complete::{tag, take},
    combinator::{eof, opt},
    multi::{count, many1},
    sequence::{preceded, tuple},
};

use super::SubstitutionTable;
use crate::{
    error::{Error, Result},
    io::{
        parse_any_whitespace, parse_signed_value, parse_title, parse_whitespace,
        skip_any_whitespace, skip_whitespace, translate_nom_error,
    },
    score::Score,
    sequence::Symbol,
};

#[cfg(test)]
mod tests;

type ScoreRows = Vec<(Symbol, Vec<Score>)>;

/// A substitution table as it appears in the plain text format, before validation.
struct PlainSubstitutionTable<'input> {
    name: &'input str,
    characters: Vec<Symbol>,
    rows: ScoreRows,
    default_score: Score,
}

impl SubstitutionTable {
    pub fn read_plain(mut reader: impl Read) -> Result<Self> {
        let mut input = String::new();
        reader.read_to_string(&mut input)?;

        let (input, table) = parse_plain(&input).map_err(translate_nom_error)?;
        tuple((parse_any_whitespace, eof))(input).map_err(translate_nom_error)?;

        table.validate()
    }

    pub fn write_plain(&self, mut writer: impl Write) -> Result<()> {
        writeln!(writer, "# {}", self.name)?;
        writeln!(writer)?;

        writeln!(writer, "SubstitutionScoreTable")?;

        let column_width = self
            .scores
            .iter()
            .map(|score| format!("{score}").len())
            .max()
            .unwrap_or(1);

        write!(writer, "  |")?;
        for character in &self.characters {
            write!(writer, " {character: >column_width$}")?;
        }
        writeln!(writer)?;

        write!(writer, "--+")?;
        for _ in 0..(self.characters.len() * (column_width + 1)) {
            write!(writer, "-")?;
        }
        writeln!(writer)?;

        for (character, row) in self.characters.iter().zip(self.scores.rows()) {
            write!(writer, "{character} |")?;
            for score in row {
                write!(writer, " {score: >column_width$}")?;
            }
            writeln!(writer)?;
        }
        writeln!(writer)?;

        writeln!(writer, "DefaultScore")?;
        writeln!(writer, " {}", self.default_score)?;

        Ok(())
    }
}

impl PlainSubstitutionTable<'_> {
    /// Brings the rows into the column order of the header and validates the result.
    fn validate(self) -> Result<SubstitutionTable> {
        let mut ordered_rows: Vec<Option<Vec<Score>>> = vec![None; self.characters.len()];

        for (character, row) in self.rows {
            let position = self
                .characters
                .iter()
                .position(|column| *column == character)
                .ok_or(Error::UnknownSubstitutionRow(character.as_char()))?;
            if ordered_rows[position].replace(row).is_some() {
                return Err(Error::DuplicateSubstitutionCharacter(character.as_char()));
            }
        }

        // The parser reads as many rows as there are columns, so no row is missing here.
        let scores = ordered_rows.into_iter().flatten().flatten().collect();
        SubstitutionTable::new(self.name, self.characters, scores, self.default_score)
    }
}

fn parse_plain(input: &str) -> IResult<&str, PlainSubstitutionTable<'_>> {
    let (input, name) = opt(parse_title).parse(input)?;
    let (input, (characters, rows)) = parse_substitution_score_table(input)?;
    let (input, default_score) = opt(parse_default_score).parse(input)?;

    let table = PlainSubstitutionTable {
        name: name.unwrap_or(""),
        characters,
        rows,
        default_score: default_score.unwrap_or(Score::ZERO),
    };

    Ok((input, table))
}

fn parse_substitution_score_table(input: &str) -> IResult<&str, (Vec<Symbol>, ScoreRows)> {
    // Identifier
    let input = skip_any_whitespace(input)?;
    let input = tag("SubstitutionScoreTable")(input)?.0;

    // First row gives the order of the characters in the columns
    let (input, characters) = parse_substitution_score_table_first_row(input)?;

    // Separator line
    let input = tuple((
        parse_any_whitespace,
        many1(tag("-")),
        tag("+"),
        many1(tag("-")),
    ))(input)?
    .0;

    // One row per column, in any order
    let (input, rows) = count(
        |input| parse_substitution_score_table_row(input, characters.len()),
        characters.len(),
    )
    .parse(input)?;

    Ok((input, (characters, rows)))
}

fn parse_substitution_score_table_first_row(input: &str) -> IResult<&str, Vec<Symbol>> {
    let input = skip_any_whitespace(input)?;
    let input = tag("|")(input)?.0;
    let (input, characters) = many1(preceded(parse_whitespace, parse_letter)).parse(input)?;

    trace!(
        "Parsed the first row of a substitution score table with {} characters",
        characters.len()
    );

    Ok((input, characters))
}

fn parse_substitution_score_table_row(
    input: &str,
    column_count: usize,
) -> IResult<&str, (Symbol, Vec<Score>)> {
    let input = skip_any_whitespace(input)?;
    let (input, character) = parse_letter(input)?;
    let input = skip_whitespace(input)?;
    let input = tag("|")(input)?.0;
    let (input, scores) =
        count(preceded(parse_whitespace, parse_signed_value), column_count).parse(input)?;

    trace!("Parsed substitution score table row {character}");
    Ok((input, (character, scores)))
}

fn parse_default_score(input: &str) -> IResult<&str, Score> {
    // Identifier
    let input = skip_any_whitespace(input)?;
    let input = tag("DefaultScore")(input)?.0;

    let input = skip_any_whitespace(input)?;
    parse_signed_value(input)
}

/// Parses a single uppercase letter.
///
/// Fails recoverably, such that repetitions of this parser stop at the first non-letter.
fn parse_letter(input: &str) -> IResult<&str, Symbol> {
    let error = || {
        nom::Err::Error(nom::error::Error {
            input,
            code: nom::error::ErrorKind::Verify,
        })
    };

    let (remaining, character) = take(1usize)(input)?;
    character
        .chars()
        .next()
        .and_then(|character| Symbol::try_from(character).ok())
        .filter(|symbol| !symbol.is_gap())
        .map(|symbol| (remaining, symbol))
        .ok_or_else(error)
}
