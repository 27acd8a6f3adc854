use std::collections::HashMap;
use std::path::Path;

use chrono::{Datelike, NaiveDate};
use thiserror::Error;

/// Winner marker used by the raw dataset for drawn matches.
const DRAW_MARKER: &str = "-";

/// Matches before this season are too old to describe current squads.
pub const DEFAULT_CUTOFF_YEAR: i32 = 2014;

const REQUIRED_COLUMNS: &[&str] = &[
    "data",
    "mandante",
    "visitante",
    "mandante_placar",
    "visitante_placar",
    "vencedor",
    "mandante_estado",
    "visitante_estado",
    "formacao_mandante",
    "formacao_visitante",
];

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("unable to read match csv: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed match csv: {0}")]
    Csv(#[from] csv::Error),
    #[error("missing required column '{0}' in match csv")]
    MissingColumn(&'static str),
    #[error("invalid value '{value}' for column '{column}' on line {line}")]
    InvalidField {
        line: usize,
        column: &'static str,
        value: String,
    },
}

/// Final result of a played match, from the home side's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    HomeWin,
    Draw,
    AwayWin,
}

impl Outcome {
    fn from_winner(winner: &str, home_team: &str) -> Outcome {
        let winner = winner.trim();
        if winner == DRAW_MARKER {
            Outcome::Draw
        } else if winner == home_team {
            Outcome::HomeWin
        } else {
            Outcome::AwayWin
        }
    }

    /// Class index the classifier is trained against.
    pub fn class(self) -> u8 {
        match self {
            Outcome::HomeWin => 0,
            Outcome::Draw => 1,
            Outcome::AwayWin => 2,
        }
    }

    pub fn from_class(class: u8) -> Option<Outcome> {
        match class {
            0 => Some(Outcome::HomeWin),
            1 => Some(Outcome::Draw),
            2 => Some(Outcome::AwayWin),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Outcome::HomeWin => "home win",
            Outcome::Draw => "draw",
            Outcome::AwayWin => "away win",
        }
    }

    pub fn home_points(self) -> u8 {
        match self {
            Outcome::HomeWin => 3,
            Outcome::Draw => 1,
            Outcome::AwayWin => 0,
        }
    }

    pub fn away_points(self) -> u8 {
        match self {
            Outcome::HomeWin => 0,
            Outcome::Draw => 1,
            Outcome::AwayWin => 3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Home,
    Away,
}

/// One played fixture, validated and normalized at load time. Never mutated
/// after loading.
#[derive(Debug, Clone)]
pub struct MatchRecord {
    pub date: NaiveDate,
    pub round: Option<u32>,
    pub home_team: String,
    pub away_team: String,
    pub home_goals: u32,
    pub away_goals: u32,
    pub outcome: Outcome,
    pub home_region: String,
    pub away_region: String,
    pub home_formation: Option<String>,
    pub away_formation: Option<String>,
}

impl MatchRecord {
    /// Which side `team` played on, if it took part at all. Team names are
    /// compared case-insensitively with the same Unicode lowercasing the
    /// store's team index uses, so accented names match under any casing.
    pub fn side_of(&self, team: &str) -> Option<Side> {
        let team = team.to_lowercase();
        if self.home_team.to_lowercase() == team {
            Some(Side::Home)
        } else if self.away_team.to_lowercase() == team {
            Some(Side::Away)
        } else {
            None
        }
    }

    pub fn region_of(&self, side: Side) -> &str {
        match side {
            Side::Home => &self.home_region,
            Side::Away => &self.away_region,
        }
    }

    pub fn formation_of(&self, side: Side) -> Option<&str> {
        match side {
            Side::Home => self.home_formation.as_deref(),
            Side::Away => self.away_formation.as_deref(),
        }
    }

    pub fn points_of(&self, side: Side) -> u8 {
        match side {
            Side::Home => self.outcome.home_points(),
            Side::Away => self.outcome.away_points(),
        }
    }

    /// Goals scored and conceded by `side`, in that order.
    pub fn goals_of(&self, side: Side) -> (u32, u32) {
        match side {
            Side::Home => (self.home_goals, self.away_goals),
            Side::Away => (self.away_goals, self.home_goals),
        }
    }
}

/// Point on the history timeline a feature is computed "as of".
///
/// `Before(i)` is the training-time view for history row `i`: only matches
/// strictly before that row are visible, so a row never sees its own outcome.
/// `Latest` is the inference-time view for an upcoming, not-yet-played match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvalPoint {
    Before(usize),
    Latest,
}

#[derive(Debug, Clone)]
pub struct LoadOptions {
    pub cutoff_year: Option<i32>,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            cutoff_year: Some(DEFAULT_CUTOFF_YEAR),
        }
    }
}

/// Immutable, chronologically ordered collection of historical matches with
/// per-team indices. Built once, then only read.
#[derive(Debug)]
pub struct MatchHistory {
    matches: Vec<MatchRecord>,
    teams: Vec<String>,
    team_lookup: HashMap<String, usize>,
    by_team: HashMap<String, Vec<usize>>,
}

impl MatchHistory {
    /// Builds the store from already-parsed records: applies the cutoff
    /// filter, then stable-sorts ascending by date so same-day matches keep
    /// their input order.
    pub fn from_records(mut records: Vec<MatchRecord>, options: &LoadOptions) -> Self {
        if let Some(year) = options.cutoff_year {
            records.retain(|record| record.date.year() >= year);
        }
        records.sort_by_key(|record| record.date);

        let mut teams = Vec::new();
        let mut team_lookup: HashMap<String, usize> = HashMap::new();
        let mut by_team: HashMap<String, Vec<usize>> = HashMap::new();
        for (idx, record) in records.iter().enumerate() {
            for name in [&record.home_team, &record.away_team] {
                let key = name.to_lowercase();
                if !team_lookup.contains_key(&key) {
                    team_lookup.insert(key.clone(), teams.len());
                    teams.push(name.clone());
                }
                by_team.entry(key).or_default().push(idx);
            }
        }

        Self {
            matches: records,
            teams,
            team_lookup,
            by_team,
        }
    }

    pub fn len(&self) -> usize {
        self.matches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    pub fn matches(&self) -> &[MatchRecord] {
        &self.matches
    }

    /// Canonical team names in order of first appearance.
    pub fn teams(&self) -> &[String] {
        &self.teams
    }

    pub fn sample_teams(&self, count: usize) -> &[String] {
        &self.teams[..count.min(self.teams.len())]
    }

    /// Resolves a possibly differently-cased team name to the canonical name
    /// recorded in the dataset.
    pub fn resolve_team(&self, name: &str) -> Option<&str> {
        self.team_lookup
            .get(&name.to_lowercase())
            .map(|&idx| self.teams[idx].as_str())
    }

    /// Positions of all matches involving `team`, ascending.
    pub fn team_indices(&self, team: &str) -> &[usize] {
        self.by_team
            .get(&team.to_lowercase())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn matches_involving<'a>(
        &'a self,
        team: &str,
    ) -> impl Iterator<Item = &'a MatchRecord> + 'a {
        self.team_indices(team)
            .iter()
            .map(|&idx| &self.matches[idx])
    }

    /// Positions of matches involving `team` visible from `eval`, ascending.
    pub fn indices_before(&self, team: &str, eval: EvalPoint) -> &[usize] {
        let indices = self.team_indices(team);
        match eval {
            EvalPoint::Before(row) => {
                let end = indices.partition_point(|&idx| idx < row);
                &indices[..end]
            }
            EvalPoint::Latest => indices,
        }
    }

    pub fn last_index_of(&self, team: &str, eval: EvalPoint) -> Option<usize> {
        self.indices_before(team, eval).last().copied()
    }

    pub fn last_match_of(&self, team: &str) -> Option<&MatchRecord> {
        self.last_index_of(team, EvalPoint::Latest)
            .map(|idx| &self.matches[idx])
    }
}

/// Loads and validates one raw match CSV into a ready-to-query history.
pub fn load_history_csv(path: &Path, options: &LoadOptions) -> Result<MatchHistory, DatasetError> {
    let records = read_match_csv(path)?;
    Ok(MatchHistory::from_records(records, options))
}

/// Parses the raw delimited match file into validated records, in input
/// order. Headers are matched case-insensitively and the dataset's `rodata`
/// misspelling is accepted for the round column.
pub fn read_match_csv(path: &Path) -> Result<Vec<MatchRecord>, DatasetError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)?;

    let mut columns: HashMap<String, usize> = HashMap::new();
    for (idx, name) in reader.headers()?.iter().enumerate() {
        let mut key = name.trim().to_lowercase();
        if key == "rodata" {
            key = "rodada".to_string();
        }
        columns.entry(key).or_insert(idx);
    }
    for &required in REQUIRED_COLUMNS {
        if !columns.contains_key(required) {
            return Err(DatasetError::MissingColumn(required));
        }
    }
    let column = |name: &str| columns[name];
    let round_column = columns.get("rodada").copied();

    let mut records = Vec::new();
    for (row_idx, result) in reader.records().enumerate() {
        let row = result?;
        // Header occupies line 1.
        let line = row_idx + 2;
        let field = |name: &str| row.get(column(name)).unwrap_or("").trim();

        let date =
            parse_day_first_date(field("data")).ok_or_else(|| DatasetError::InvalidField {
                line,
                column: "data",
                value: field("data").to_string(),
            })?;
        let home_goals =
            parse_goals(field("mandante_placar")).ok_or_else(|| DatasetError::InvalidField {
                line,
                column: "mandante_placar",
                value: field("mandante_placar").to_string(),
            })?;
        let away_goals =
            parse_goals(field("visitante_placar")).ok_or_else(|| DatasetError::InvalidField {
                line,
                column: "visitante_placar",
                value: field("visitante_placar").to_string(),
            })?;

        let home_team = field("mandante").to_string();
        let outcome = Outcome::from_winner(field("vencedor"), &home_team);
        let round = round_column
            .and_then(|idx| row.get(idx))
            .and_then(|raw| raw.trim().parse::<u32>().ok());

        records.push(MatchRecord {
            date,
            round,
            away_team: field("visitante").to_string(),
            home_team,
            home_goals,
            away_goals,
            outcome,
            home_region: field("mandante_estado").to_string(),
            away_region: field("visitante_estado").to_string(),
            home_formation: non_empty(field("formacao_mandante")),
            away_formation: non_empty(field("formacao_visitante")),
        });
    }
    Ok(records)
}

fn non_empty(raw: &str) -> Option<String> {
    if raw.is_empty() {
        None
    } else {
        Some(raw.to_string())
    }
}

// The dataset writes dates day-first ("21/04/2019"); tolerate two-digit
// years and ISO dates seen in derived exports.
fn parse_day_first_date(raw: &str) -> Option<NaiveDate> {
    for format in ["%d/%m/%Y", "%d/%m/%y", "%Y-%m-%d"] {
        if let Ok(date) = NaiveDate::parse_from_str(raw, format) {
            return Some(date);
        }
    }
    None
}

fn parse_goals(raw: &str) -> Option<u32> {
    if let Ok(value) = raw.parse::<u32>() {
        return Some(value);
    }
    // Some exports round-trip scores through floats ("2.0").
    raw.parse::<f64>()
        .ok()
        .filter(|value| value.fract() == 0.0 && *value >= 0.0)
        .map(|value| value as u32)
}
