use itertools::Itertools;

use crate::{alignment_configuration::AlignmentConfiguration, profile::Profile, score::Score};

/// The sum-of-pairs score of a multiple alignment.
///
/// Every column contributes the score of each unordered pair of its symbols.
/// Unlike [`PairwiseAligner::score_alignment`](crate::pairwise::PairwiseAligner::score_alignment),
/// gaps are scored per column and not per run.
pub fn score_multiple(configuration: &AlignmentConfiguration, alignment: &Profile) -> Score {
    alignment
        .columns()
        .map(|column| {
            column
                .iter()
                .tuple_combinations()
                .map(|(first, second)| configuration.score(*first, *second))
                .sum::<Score>()
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use crate::{alignment_configuration::AlignmentConfiguration, profile::Profile};

    use super::score_multiple;

    fn score(rows: &[&str]) -> i64 {
        let profile =
            Profile::try_from(rows.iter().map(|row| row.to_string()).collect::<Vec<_>>()).unwrap();
        score_multiple(&AlignmentConfiguration::default(), &profile).as_i64()
    }

    #[test]
    fn small_alignments() {
        assert_eq!(score(&["AAAAA", "AAAAA", "AAAAA"]), 75);
        assert_eq!(score(&["HEAGAWGHEE"]), 0);
        // H/H, E/-, -/- gap against gap.
        assert_eq!(score(&["HE-", "H--"]), 10 - 8);
    }

    #[test]
    fn four_sequences() {
        assert_eq!(
            score(&["HEAGAWGHEE", "HEAGAWGH-E", "-P--AWHEAE", "HE--AWHEAE"]),
            131
        );
        assert_eq!(
            score(&["HEAGAWGHEE", "HEAGAWGH-E", "--P-AWHEAE", "H-E-AWHEAE"]),
            117
        );
    }
}
