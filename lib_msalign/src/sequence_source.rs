//! Reading sequences from counted files.
//!
//! The first non-empty line of a counted file declares how many sequences follow.
//! Each further non-empty line is one sequence.

use std::io::BufRead;

use log::{debug, trace};

use crate::{
    error::{Error, Result},
    sequence::Sequence,
};

/// Reads a counted sequence file.
///
/// Lines are trimmed, and empty lines are skipped.
/// The count is checked before any sequence is parsed.
pub fn read_counted_sequences(reader: impl BufRead) -> Result<Vec<Sequence>> {
    let mut lines = Vec::new();
    for line in reader.lines() {
        let line = line?;
        let line = line.trim();
        if !line.is_empty() {
            lines.push(line.to_string());
        }
    }

    let Some((count_line, sequence_lines)) = lines.split_first() else {
        return Err(Error::InvalidSequenceCount {
            line: String::new(),
        });
    };
    let declared: usize = count_line
        .parse()
        .map_err(|_| Error::InvalidSequenceCount {
            line: count_line.clone(),
        })?;
    trace!("Sequence file declares {declared} sequences");

    if declared != sequence_lines.len() {
        return Err(Error::SequenceCountMismatch {
            declared,
            actual: sequence_lines.len(),
        });
    }

    let sequences = sequence_lines
        .iter()
        .map(|line| line.parse())
        .collect::<Result<Vec<Sequence>>>()?;
    debug!("Read {} sequences", sequences.len());
    Ok(sequences)
}

#[cfg(test)]
mod tests {
    use crate::error::Error;

    use super::read_counted_sequences;

    #[test]
    fn counted_file() {
        let input = "3\nHEAGAWGHEE\n\n  PAWHEAE \nHEAWHEAE\n\n";
        let sequences = read_counted_sequences(input.as_bytes()).unwrap();
        assert_eq!(
            sequences
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>(),
            vec!["HEAGAWGHEE", "PAWHEAE", "HEAWHEAE"]
        );

        let sequences = read_counted_sequences("\n0\n".as_bytes()).unwrap();
        assert!(sequences.is_empty());
    }

    #[test]
    fn count_mismatch() {
        assert!(matches!(
            read_counted_sequences("3\nHEAGAWGHEE\nPAWHEAE\n".as_bytes()),
            Err(Error::SequenceCountMismatch {
                declared: 3,
                actual: 2
            })
        ));
        // The count is checked before the symbols.
        assert!(matches!(
            read_counted_sequences("1\nHEAGAWGHEE\nheagawghee\n".as_bytes()),
            Err(Error::SequenceCountMismatch {
                declared: 1,
                actual: 2
            })
        ));
    }

    #[test]
    fn invalid_files() {
        assert!(matches!(
            read_counted_sequences("".as_bytes()),
            Err(Error::InvalidSequenceCount { line }) if line.is_empty()
        ));
        assert!(matches!(
            read_counted_sequences("three\nA\nB\nC\n".as_bytes()),
            Err(Error::InvalidSequenceCount { line }) if line == "three"
        ));
        assert!(matches!(
            read_counted_sequences("1\nHEA-GAW\n".as_bytes()),
            Err(Error::GapInSequence { position: 3 })
        ));
        assert!(matches!(
            read_counted_sequences("1\nheagaw\n".as_bytes()),
            Err(Error::InvalidSymbol { character: 'h' })
        ));
    }
}
