use std::path::PathBuf;

use futbr_predictor::historical_dataset::{
    DatasetError, LoadOptions, Outcome, load_history_csv, read_match_csv,
};

fn fixture_path(name: &str) -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    path
}

#[test]
fn loads_sorts_and_filters_by_cutoff() {
    let history =
        load_history_csv(&fixture_path("matches.csv"), &LoadOptions::default()).unwrap();

    // The 2013 match falls before the default cutoff year.
    assert_eq!(history.len(), 4);
    let dates: Vec<_> = history.matches().iter().map(|m| m.date).collect();
    assert!(dates.windows(2).all(|pair| pair[0] <= pair[1]));
    assert_eq!(history.matches()[0].home_team, "Flamengo");

    // Same-day matches keep their input order (stable sort).
    assert_eq!(history.matches()[1].home_team, "Palmeiras");
    assert_eq!(history.matches()[2].home_team, "Santos");
}

#[test]
fn cutoff_is_configurable() {
    let history = load_history_csv(
        &fixture_path("matches.csv"),
        &LoadOptions { cutoff_year: None },
    )
    .unwrap();
    assert_eq!(history.len(), 5);
    assert_eq!(history.matches()[0].home_team, "Santos");
}

#[test]
fn normalizes_headers_and_round_alias() {
    // Headers are mixed-case and the round column is spelled "rodata".
    let records = read_match_csv(&fixture_path("matches.csv")).unwrap();
    assert_eq!(records[0].round, Some(10));
    assert_eq!(records[1].round, Some(1));
    assert_eq!(records[1].home_region, "RJ");
}

#[test]
fn derives_outcome_from_winner_marker() {
    let history =
        load_history_csv(&fixture_path("matches.csv"), &LoadOptions::default()).unwrap();
    let matches = history.matches();
    assert_eq!(matches[0].outcome, Outcome::HomeWin);
    assert_eq!(matches[1].outcome, Outcome::Draw);
    assert_eq!(matches[3].outcome, Outcome::AwayWin);
    assert_eq!(matches[0].outcome.class(), 0);
    assert_eq!(matches[1].outcome.class(), 1);
    assert_eq!(matches[3].outcome.class(), 2);
}

#[test]
fn keeps_raw_formation_labels() {
    let history =
        load_history_csv(&fixture_path("matches.csv"), &LoadOptions::default()).unwrap();
    let matches = history.matches();
    assert_eq!(matches[0].home_formation.as_deref(), Some("4-2-3-1"));
    assert_eq!(matches[1].away_formation, None);
    assert_eq!(matches[3].home_formation.as_deref(), Some("quadrado"));
}

#[test]
fn resolves_team_names_case_insensitively() {
    let history =
        load_history_csv(&fixture_path("matches.csv"), &LoadOptions::default()).unwrap();
    assert_eq!(history.resolve_team("flamengo"), Some("Flamengo"));
    assert_eq!(history.resolve_team("FLAMENGO"), Some("Flamengo"));
    assert_eq!(history.resolve_team("Botafogo"), None);
}

#[test]
fn indexes_matches_by_team() {
    let history =
        load_history_csv(&fixture_path("matches.csv"), &LoadOptions::default()).unwrap();
    assert_eq!(history.matches_involving("Flamengo").count(), 2);
    assert_eq!(history.matches_involving("Corinthians").count(), 1);

    let last = history.last_match_of("Palmeiras").unwrap();
    assert_eq!(last.home_team, "Vasco");
    assert_eq!(last.away_team, "Palmeiras");
    assert!(history.last_match_of("Botafogo").is_none());
}

#[test]
fn missing_required_column_is_fatal() {
    let err = read_match_csv(&fixture_path("matches_missing_column.csv")).unwrap_err();
    assert!(matches!(err, DatasetError::MissingColumn("vencedor")));
}

#[test]
fn missing_file_reports_io_error() {
    let err = read_match_csv(&fixture_path("does_not_exist.csv")).unwrap_err();
    assert!(matches!(err, DatasetError::Csv(_) | DatasetError::Io(_)));
}
