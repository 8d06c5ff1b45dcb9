//! The order in which sequences and clusters are merged during progressive alignment.

use itertools::Itertools;
use log::{debug, trace};
use noisy_float::types::R64;

use crate::{
    distance::DistanceMatrix,
    error::{Error, Result},
};

/// A binary merge order over `sequence_count` sequences.
///
/// Ids below `sequence_count` refer to sequences, and merge `i` produces the cluster with id `sequence_count + i`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GuideTree {
    sequence_count: usize,
    merges: Vec<Merge>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Merge {
    pub left: usize,
    pub right: usize,
}

impl GuideTree {
    /// Creates a guide tree, checking that each merge only refers to sequences or earlier merges.
    pub fn new(sequence_count: usize, merges: Vec<Merge>) -> Result<Self> {
        for (step, merge) in merges.iter().enumerate() {
            for id in [merge.left, merge.right] {
                if id >= sequence_count + step {
                    return Err(Error::UnresolvedOperand { step, id });
                }
            }
        }

        Ok(Self {
            sequence_count,
            merges,
        })
    }

    /// Skips the checks of [`GuideTree::new`], like deserialization does.
    #[cfg(test)]
    pub(crate) fn new_unchecked(sequence_count: usize, merges: Vec<Merge>) -> Self {
        Self {
            sequence_count,
            merges,
        }
    }

    /// Merges the sequences in input order: `(0, 1)`, then the result with `2`, and so on.
    pub fn sequential(sequence_count: usize) -> Self {
        let merges = (1..sequence_count)
            .map(|sequence| Merge {
                left: if sequence == 1 {
                    0
                } else {
                    sequence_count + sequence - 2
                },
                right: sequence,
            })
            .collect();

        Self {
            sequence_count,
            merges,
        }
    }

    /// Agglomerative clustering with complete linkage.
    ///
    /// Each round merges the two active clusters with the smallest maximum distance between their members.
    /// Ties are broken by the order in which the clusters became active, with sequences first in input order.
    pub fn complete_linkage(distances: &DistanceMatrix) -> Self {
        let sequence_count = distances.len();
        let mut active: Vec<(usize, Vec<usize>)> =
            (0..sequence_count).map(|id| (id, vec![id])).collect();
        let mut merges = Vec::with_capacity(sequence_count.saturating_sub(1));

        while active.len() > 1 {
            let mut best: Option<(usize, usize, R64)> = None;
            for (first, second) in (0..active.len()).tuple_combinations() {
                let linkage = distances.complete_linkage(&active[first].1, &active[second].1);
                if best.is_none_or(|(_, _, best_linkage)| linkage < best_linkage) {
                    best = Some((first, second, linkage));
                }
            }
            let Some((first, second, linkage)) = best else {
                break;
            };

            // `first < second`, so removing `second` first keeps `first` valid.
            let (right, right_members) = active.remove(second);
            let (left, mut members) = active.remove(first);
            members.extend(right_members);

            let id = sequence_count + merges.len();
            trace!("Merging {left} and {right} into {id} at distance {linkage}");
            merges.push(Merge { left, right });
            active.push((id, members));
        }

        debug!(
            "Built a complete linkage guide tree over {sequence_count} sequences with {} merges",
            merges.len()
        );
        Self {
            sequence_count,
            merges,
        }
    }

    pub fn sequence_count(&self) -> usize {
        self.sequence_count
    }

    pub fn merges(&self) -> &[Merge] {
        &self.merges
    }

    /// The id of the cluster produced by the last merge, or of the only sequence if there are no merges.
    pub fn root(&self) -> Option<usize> {
        match self.merges.len() {
            0 if self.sequence_count == 1 => Some(0),
            0 => None,
            merge_count => Some(self.sequence_count + merge_count - 1),
        }
    }
}
