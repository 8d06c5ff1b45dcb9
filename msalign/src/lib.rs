pub mod distances;
pub mod multiple;
pub mod pair;
pub mod table;

mod configuration;
mod display;
mod fasta_parser;
mod input;
mod logging;
