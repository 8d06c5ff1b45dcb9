use crate::{score::Score, sequence::Symbol, substitution_table::SubstitutionTable};

/// The scoring scheme shared by all aligners.
///
/// Gaps are penalised linearly: a run of `g` gaps scores `-g * gap_penalty`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlignmentConfiguration {
    pub gap_penalty: Score,
    pub substitution_table: SubstitutionTable,
}

impl AlignmentConfiguration {
    pub const DEFAULT_GAP_PENALTY: i64 = 8;

    pub fn new(gap_penalty: Score, substitution_table: SubstitutionTable) -> Self {
        Self {
            gap_penalty,
            substitution_table,
        }
    }

    /// The score of aligning `a` to `b`.
    ///
    /// A gap aligned to a gap scores zero, a gap aligned to a letter scores `-gap_penalty`.
    pub fn score(&self, a: Symbol, b: Symbol) -> Score {
        match (a.is_gap(), b.is_gap()) {
            (true, true) => Score::ZERO,
            (true, false) | (false, true) => -self.gap_penalty,
            (false, false) => self.substitution_table.score(a, b),
        }
    }

    /// The score of a run of `length` consecutive gaps.
    pub fn gap_run_score(&self, length: usize) -> Score {
        -(self.gap_penalty * length)
    }
}

impl Default for AlignmentConfiguration {
    fn default() -> Self {
        Self {
            gap_penalty: Self::DEFAULT_GAP_PENALTY.into(),
            substitution_table: SubstitutionTable::blosum50(),
        }
    }
}
