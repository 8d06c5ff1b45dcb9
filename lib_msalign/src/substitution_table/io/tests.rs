use crate::{error::Error, score::Score, sequence::Symbol, substitution_table::SubstitutionTable};

#[test]
fn simple_example() {
    let input = "# Small Example\n\nSubstitutionScoreTable\n  |  A  C  G\n--+---------\nA |  5 -1 -2\nC | -1 10  0\nG | -2  0  7\n\nDefaultScore\n -4\n";
    let expected_parsing_result = SubstitutionTable::new(
        "Small Example",
        "ACG"
            .chars()
            .map(|character| Symbol::try_from(character).unwrap())
            .collect(),
        [5i64, -1, -2, -1, 10, 0, -2, 0, 7]
            .into_iter()
            .map(Into::into)
            .collect(),
        Score::from(-4i64),
    )
    .unwrap();

    let actual_parsing_result = SubstitutionTable::read_plain(input.as_bytes()).unwrap();
    let mut writer = Vec::new();
    actual_parsing_result.write_plain(&mut writer).unwrap();
    let output = String::from_utf8(writer).unwrap();

    assert_eq!(expected_parsing_result, actual_parsing_result);
    assert_eq!(input, output);
}

#[test]
fn blosum50_survives_writing() {
    let table = SubstitutionTable::blosum50();
    let mut writer = Vec::new();
    table.write_plain(&mut writer).unwrap();
    let output = String::from_utf8(writer).unwrap();

    assert!(output.starts_with(
        "# BLOSUM50\n\nSubstitutionScoreTable\n  |  A  R  N  D  C  Q  E  G  H  I  L  K  M  F  P  S  T  W  Y  V  B  Z  X\n"
    ));
    assert!(output.contains("\nW | -3 -3 -4 -5 -5 -1 -3 -3 -3 -3 -2 -3 -1  1 -4 -4 -3 15  2 -3 -5 -2 -3\n"));
    assert_eq!(SubstitutionTable::read_plain(output.as_bytes()).unwrap(), table);
}

#[test]
fn rows_in_any_order_without_default() {
    let input = "SubstitutionScoreTable\n  | A C\n--+----\nC | 2 1\nA | 3 2\n";
    let table = SubstitutionTable::read_plain(input.as_bytes()).unwrap();
    let a = Symbol::try_from('A').unwrap();
    let c = Symbol::try_from('C').unwrap();

    assert_eq!(table.name(), "");
    assert_eq!(table.default_score(), Score::ZERO);
    assert_eq!(table.score(a, a).as_i64(), 3);
    assert_eq!(table.score(a, c).as_i64(), 2);
    assert_eq!(table.score(c, c).as_i64(), 1);
}

#[test]
fn invalid_inputs() {
    let asymmetric = "SubstitutionScoreTable\n  | A C\n--+----\nA | 3 2\nC | 1 1\n";
    assert!(matches!(
        SubstitutionTable::read_plain(asymmetric.as_bytes()),
        Err(Error::AsymmetricSubstitutionTable {
            first: 'A',
            second: 'C',
            ..
        })
    ));

    let duplicate_row = "SubstitutionScoreTable\n  | A C\n--+----\nA | 3 2\nA | 2 1\n";
    assert!(matches!(
        SubstitutionTable::read_plain(duplicate_row.as_bytes()),
        Err(Error::DuplicateSubstitutionCharacter('A'))
    ));

    let unknown_row = "SubstitutionScoreTable\n  | A C\n--+----\nA | 3 2\nG | 2 1\n";
    assert!(matches!(
        SubstitutionTable::read_plain(unknown_row.as_bytes()),
        Err(Error::UnknownSubstitutionRow('G'))
    ));

    let duplicate_column = "SubstitutionScoreTable\n  | A A\n--+----\nA | 3 2\nA | 2 1\n";
    assert!(matches!(
        SubstitutionTable::read_plain(duplicate_column.as_bytes()),
        Err(Error::DuplicateSubstitutionCharacter('A'))
    ));

    let missing_score = "SubstitutionScoreTable\n  | A C\n--+----\nA | 3\nC | 2 1\n";
    assert!(matches!(
        SubstitutionTable::read_plain(missing_score.as_bytes()),
        Err(Error::Parser { .. })
    ));

    let trailing_garbage =
        "SubstitutionScoreTable\n  | A C\n--+----\nA | 3 2\nC | 2 1\n\nGapPenalty\n 8\n";
    assert!(matches!(
        SubstitutionTable::read_plain(trailing_garbage.as_bytes()),
        Err(Error::Parser { .. })
    ));
}

#[test]
fn separator_line() {
    let long_separator = "SubstitutionScoreTable\n  | A C\n----+-\nA | 3 2\nC | 2 1\n";
    let table = SubstitutionTable::read_plain(long_separator.as_bytes()).unwrap();
    assert_eq!(table.characters().len(), 2);

    for separator in ["--------", "--+", "+----", "  |----"] {
        let input = format!("SubstitutionScoreTable\n  | A C\n{separator}\nA | 3 2\nC | 2 1\n");
        assert!(
            matches!(
                SubstitutionTable::read_plain(input.as_bytes()),
                Err(Error::Parser { .. })
            ),
            "{separator}"
        );
    }
}
