use std::io::Write;

use lib_msalign::{
    alignment_configuration::AlignmentConfiguration, pairwise::AlignedPair, profile::Profile,
    score::Score, sequence::row_to_string,
};

pub const PAIR_COLUMNS: usize = 80;
pub const PROFILE_COLUMNS: usize = 76;

/// Writes a pairwise alignment in blocks of `columns` columns.
///
/// Between the two rows, a middle line marks identities with the symbol,
/// mismatches with a non-negative score with `+`, and everything else with `.`.
pub fn write_pair_blocks(
    mut writer: impl Write,
    alignment: &AlignedPair,
    configuration: &AlignmentConfiguration,
    columns: usize,
) -> std::io::Result<()> {
    let x = row_to_string(&alignment.x);
    let y = row_to_string(&alignment.y);
    let middle: String = alignment
        .columns()
        .map(|(x, y)| {
            if x.is_gap() || y.is_gap() {
                '.'
            } else if x == y {
                x.as_char()
            } else if configuration.score(x, y) >= Score::ZERO {
                '+'
            } else {
                '.'
            }
        })
        .collect();

    for offset in (0..x.len()).step_by(columns) {
        let limit = (offset + columns).min(x.len());
        writeln!(writer, "{}", &x[offset..limit])?;
        writeln!(writer, "{}", &middle[offset..limit])?;
        writeln!(writer, "{}", &y[offset..limit])?;
    }

    Ok(())
}

/// Writes a multiple alignment in blocks of `columns` columns, each followed by an empty line.
pub fn write_profile_blocks(
    mut writer: impl Write,
    alignment: &Profile,
    columns: usize,
) -> std::io::Result<()> {
    let rows = alignment.row_strings();

    for offset in (0..alignment.len()).step_by(columns) {
        let limit = (offset + columns).min(alignment.len());
        for row in &rows {
            writeln!(writer, "{}", &row[offset..limit])?;
        }
        writeln!(writer)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use lib_msalign::{
        alignment_configuration::AlignmentConfiguration, pairwise::AlignedPair, profile::Profile,
        sequence::parse_row,
    };

    use super::{write_pair_blocks, write_profile_blocks};

    #[test]
    fn pair_blocks() {
        let alignment = AlignedPair {
            x: parse_row("HEAGAWGHE-E").unwrap(),
            y: parse_row("--P-AW-HEAE").unwrap(),
        };
        let mut output = Vec::new();
        write_pair_blocks(
            &mut output,
            &alignment,
            &AlignmentConfiguration::default(),
            6,
        )
        .unwrap();

        // A/P scores -1, so only identities are marked.
        assert_eq!(
            String::from_utf8(output).unwrap(),
            "HEAGAW\n....AW\n--P-AW\nGHE-E\n.HE.E\n-HEAE\n"
        );
    }

    #[test]
    fn pair_blocks_mark_similar_symbols() {
        let alignment = AlignedPair {
            x: parse_row("HEK").unwrap(),
            y: parse_row("HDW").unwrap(),
        };
        let mut output = Vec::new();
        write_pair_blocks(
            &mut output,
            &alignment,
            &AlignmentConfiguration::default(),
            80,
        )
        .unwrap();

        // E/D scores 2, K/W scores -3.
        assert_eq!(String::from_utf8(output).unwrap(), "HEK\nH+.\nHDW\n");
    }

    #[test]
    fn profile_blocks() {
        let alignment =
            Profile::try_from(vec!["HEAGA".to_string(), "-P-AW".to_string()]).unwrap();
        let mut output = Vec::new();
        write_profile_blocks(&mut output, &alignment, 3).unwrap();

        assert_eq!(
            String::from_utf8(output).unwrap(),
            "HEA\n-P-\n\nGA\nAW\n\n"
        );
    }
}
