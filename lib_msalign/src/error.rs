use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("An IO error occurred: {0}.")]
    Io(#[from] std::io::Error),

    #[error("A parsing error of kind '{kind:?}' occurred when the remaining input was '{input}'.")]
    Parser {
        input: String,
        kind: nom::error::ErrorKind,
    },

    #[error("Parsing was unsuccessful due to incomplete input: {0:?}.")]
    ParserIncomplete(nom::Needed),

    #[error("The character {character:?} is neither an uppercase letter nor the gap symbol '-'.")]
    InvalidSymbol { character: char },

    #[error("A sequence must not contain gaps, but found one at position {position}.")]
    GapInSequence { position: usize },

    #[error(
        "The rows of a profile must have equal length, but row {row} has length {actual} instead of {expected}."
    )]
    RaggedProfile {
        row: usize,
        expected: usize,
        actual: usize,
    },

    #[error("A profile must contain at least one row.")]
    EmptyProfile,

    #[error(
        "The rows of an alignment must have equal length, but they have lengths {first} and {second}."
    )]
    MalformedAlignment { first: usize, second: usize },

    #[error("The alignment contains no column without a gap, so its similarity is undefined.")]
    DivisionByZero,

    #[error(
        "The Kimura distance is undefined for a dissimilarity of {dissimilarity}: the logarithm argument {argument} is not positive."
    )]
    InvalidDistanceDomain { dissimilarity: f64, argument: f64 },

    #[error("The distance between sequences {first} and {second} could not be computed: {source}")]
    PairDistance {
        first: usize,
        second: usize,
        #[source]
        source: Box<Error>,
    },

    #[error(
        "Merge step {step} references id {id}, which is neither an input sequence nor a cluster produced by an earlier merge."
    )]
    UnresolvedOperand { step: usize, id: usize },

    #[error("The guide tree contains no merges, but {sequence_count} sequences need to be aligned.")]
    IncompleteGuideTree { sequence_count: usize },

    #[error("The guide tree was built for {expected} sequences, but {actual} sequences were given.")]
    GuideTreeSizeMismatch { expected: usize, actual: usize },

    #[error("The sequence source declares {declared} sequences, but contains {actual}.")]
    SequenceCountMismatch { declared: usize, actual: usize },

    #[error("The sequence count line '{line}' is not a non-negative integer.")]
    InvalidSequenceCount { line: String },

    #[error("The substitution table character {0} was encountered twice.")]
    DuplicateSubstitutionCharacter(char),

    #[error(
        "The substitution table is not symmetric: score({first}, {second}) = {forward}, but score({second}, {first}) = {backward}."
    )]
    AsymmetricSubstitutionTable {
        first: char,
        second: char,
        forward: i64,
        backward: i64,
    },

    #[error("The substitution table has a row for {0}, which is not a column of its header.")]
    UnknownSubstitutionRow(char),

    #[error("The substitution table has {characters} characters, but {scores} scores.")]
    SubstitutionTableShape { characters: usize, scores: usize },
}
