pub mod alignment_configuration;
pub mod alignment_matrix;
pub mod distance;
pub mod error;
pub mod guide_tree;
mod io;
pub mod pairwise;
pub mod profile;
pub mod profile_aligner;
pub mod progressive;
pub mod score;
pub mod sequence;
pub mod sequence_source;
pub mod substitution_table;
pub mod sum_of_pairs;
