//! Multiple sequence alignment by merging profiles along a guide tree.

use log::{debug, info};

use crate::{
    alignment_configuration::AlignmentConfiguration,
    error::{Error, Result},
    guide_tree::GuideTree,
    profile::Profile,
    profile_aligner::{AlignmentInput, ProfileAligner},
    sequence::Sequence,
};

#[derive(Debug, Clone, Copy)]
pub struct ProgressiveAligner<'configuration> {
    profile_aligner: ProfileAligner<'configuration>,
}

/// The result of a progressive alignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressiveAlignment {
    pub profile: Profile,
    /// For each row of the profile, the index of the input sequence it stems from.
    pub row_origins: Vec<usize>,
}

/// A merged cluster: its profile and the input sequence of each of its rows.
struct Cluster {
    profile: Profile,
    row_origins: Vec<usize>,
}

impl<'configuration> ProgressiveAligner<'configuration> {
    pub fn new(configuration: &'configuration AlignmentConfiguration) -> Self {
        Self::with_profile_aligner(ProfileAligner::new(configuration))
    }

    pub fn with_profile_aligner(profile_aligner: ProfileAligner<'configuration>) -> Self {
        Self { profile_aligner }
    }

    /// Aligns all sequences by processing the merges of the guide tree in order.
    pub fn build(&self, sequences: &[Sequence], guide_tree: &GuideTree) -> Result<Profile> {
        self.build_with_row_origins(sequences, guide_tree)
            .map(|alignment| alignment.profile)
    }

    pub fn build_with_row_origins(
        &self,
        sequences: &[Sequence],
        guide_tree: &GuideTree,
    ) -> Result<ProgressiveAlignment> {
        let sequence_count = sequences.len();
        if sequence_count == 0 {
            return Err(Error::EmptyProfile);
        }
        if guide_tree.sequence_count() != sequence_count {
            return Err(Error::GuideTreeSizeMismatch {
                expected: guide_tree.sequence_count(),
                actual: sequence_count,
            });
        }
        if sequence_count == 1 {
            return Ok(ProgressiveAlignment {
                profile: Profile::from_sequence(&sequences[0]),
                row_origins: vec![0],
            });
        }
        if guide_tree.merges().is_empty() {
            return Err(Error::IncompleteGuideTree { sequence_count });
        }

        let mut clusters: Vec<Cluster> = Vec::with_capacity(guide_tree.merges().len());
        for (step, merge) in guide_tree.merges().iter().enumerate() {
            let (left, left_origins) = resolve(sequences, &clusters, step, merge.left)?;
            let (right, right_origins) = resolve(sequences, &clusters, step, merge.right)?;

            let profile = self.profile_aligner.align(left, right)?;
            let row_origins = [left_origins, right_origins].concat();
            debug!(
                "Merge {step}: aligned {} and {} into cluster {} with {} rows and {} columns",
                merge.left,
                merge.right,
                sequence_count + step,
                profile.row_count(),
                profile.len()
            );

            clusters.push(Cluster {
                profile,
                row_origins,
            });
        }

        // There is at least one merge.
        let Some(Cluster {
            profile,
            row_origins,
        }) = clusters.pop()
        else {
            return Err(Error::IncompleteGuideTree { sequence_count });
        };

        if row_origins.len() != sequence_count {
            info!(
                "The guide tree places {} rows into the final alignment of {sequence_count} sequences",
                row_origins.len()
            );
        }
        Ok(ProgressiveAlignment {
            profile,
            row_origins,
        })
    }
}

/// Resolves an id of the guide tree to a sequence or an already merged cluster.
fn resolve<'a>(
    sequences: &'a [Sequence],
    clusters: &'a [Cluster],
    step: usize,
    id: usize,
) -> Result<(AlignmentInput<'a>, Vec<usize>)> {
    if let Some(sequence) = sequences.get(id) {
        Ok((AlignmentInput::Sequence(sequence), vec![id]))
    } else if let Some(cluster) = clusters.get(id - sequences.len()) {
        Ok((
            AlignmentInput::Profile(&cluster.profile),
            cluster.row_origins.clone(),
        ))
    } else {
        Err(Error::UnresolvedOperand { step, id })
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        alignment_configuration::AlignmentConfiguration,
        error::Error,
        guide_tree::{GuideTree, Merge},
        sequence::Sequence,
        sum_of_pairs::score_multiple,
    };

    use super::ProgressiveAligner;

    fn sequences(sequences: &[&str]) -> Vec<Sequence> {
        sequences
            .iter()
            .map(|sequence| sequence.parse().unwrap())
            .collect()
    }

    fn tree(sequence_count: usize, merges: &[(usize, usize)]) -> GuideTree {
        GuideTree::new(
            sequence_count,
            merges
                .iter()
                .map(|&(left, right)| Merge { left, right })
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn identical_sequences() {
        let configuration = AlignmentConfiguration::default();
        let aligner = ProgressiveAligner::new(&configuration);
        let sequences = sequences(&["AAAAA", "AAAAA", "AAAAA"]);

        for guide_tree in [
            tree(3, &[(0, 1), (3, 2)]),
            tree(3, &[(1, 2), (0, 3)]),
            GuideTree::sequential(3),
        ] {
            let profile = aligner.build(&sequences, &guide_tree).unwrap();
            assert_eq!(profile.row_count(), 3);
            assert_eq!(profile.len(), 5);
            assert_eq!(profile.gap_count(), 0);
            assert_eq!(score_multiple(&configuration, &profile).as_i64(), 75);
        }
    }

    #[test]
    fn single_sequence() {
        let configuration = AlignmentConfiguration::default();
        let aligner = ProgressiveAligner::new(&configuration);
        let sequences = sequences(&["HEAGAWGHEE"]);

        let alignment = aligner
            .build_with_row_origins(&sequences, &GuideTree::sequential(1))
            .unwrap();
        assert_eq!(alignment.profile.row_strings(), vec!["HEAGAWGHEE"]);
        assert_eq!(alignment.row_origins, vec![0]);
    }

    #[test]
    fn row_origins() {
        let configuration = AlignmentConfiguration::default();
        let aligner = ProgressiveAligner::new(&configuration);
        let sequences = sequences(&["HEAGAWGHEE", "HEAGAWGHE", "PAWHEAE", "HEAWHEAE"]);

        let alignment = aligner
            .build_with_row_origins(&sequences, &tree(4, &[(2, 3), (1, 4), (0, 5)]))
            .unwrap();
        assert_eq!(alignment.row_origins, vec![0, 1, 2, 3]);

        let alignment = aligner
            .build_with_row_origins(&sequences, &tree(4, &[(3, 0), (4, 2), (1, 5)]))
            .unwrap();
        assert_eq!(alignment.row_origins, vec![1, 3, 0, 2]);
        for (row, origin) in alignment.profile.row_strings().iter().zip(&alignment.row_origins) {
            assert_eq!(row.replace('-', ""), sequences[*origin].to_string());
        }
    }

    #[test]
    fn invalid_inputs() {
        let configuration = AlignmentConfiguration::default();
        let aligner = ProgressiveAligner::new(&configuration);
        let two = sequences(&["HEAGAWGHEE", "PAWHEAE"]);

        assert!(matches!(
            aligner.build(&[], &GuideTree::sequential(0)),
            Err(Error::EmptyProfile)
        ));
        assert!(matches!(
            aligner.build(&two, &GuideTree::sequential(3)),
            Err(Error::GuideTreeSizeMismatch {
                expected: 3,
                actual: 2
            })
        ));
        assert!(matches!(
            aligner.build(&two, &tree(2, &[])),
            Err(Error::IncompleteGuideTree { sequence_count: 2 })
        ));
    }

    #[test]
    fn deterministic() {
        let configuration = AlignmentConfiguration::default();
        let aligner = ProgressiveAligner::new(&configuration);
        let sequences = sequences(&["HEAGAWGHEE", "HEAGAWGHE", "PAWHEAE", "HEAWHEAE"]);
        let guide_tree = GuideTree::sequential(4);

        let first = aligner.build(&sequences, &guide_tree).unwrap();
        let second = aligner.build(&sequences, &guide_tree).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn unresolved_operands() {
        let configuration = AlignmentConfiguration::default();
        let aligner = ProgressiveAligner::new(&configuration);
        let three = sequences(&["HEAGAWGHEE", "PAWHEAE", "HEAWHEAE"]);

        // Refers to the cluster created by this very merge.
        let guide_tree = GuideTree::new_unchecked(
            3,
            vec![Merge { left: 0, right: 1 }, Merge { left: 4, right: 2 }],
        );
        assert!(matches!(
            aligner.build(&three, &guide_tree),
            Err(Error::UnresolvedOperand { step: 1, id: 4 })
        ));

        let guide_tree = GuideTree::new_unchecked(
            3,
            vec![Merge { left: 0, right: 7 }, Merge { left: 3, right: 2 }],
        );
        assert!(matches!(
            aligner.build(&three, &guide_tree),
            Err(Error::UnresolvedOperand { step: 0, id: 7 })
        ));
    }
}
