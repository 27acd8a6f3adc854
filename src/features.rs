use serde::Serialize;
use thiserror::Error;

use crate::context::{TeamContext, is_derby, team_context};
use crate::form::{DEFAULT_FORM_WINDOW, FormSummary, team_form};
use crate::formation::{DEFAULT_FORMATION, Formation};
use crate::historical_dataset::{EvalPoint, MatchHistory};

#[derive(Debug, Error)]
pub enum FeatureError {
    #[error("team '{0}' not found in match history")]
    UnknownTeam(String),
    #[error("team '{0}' has no prior matches to compute form from")]
    InsufficientHistory(String),
}

/// Knobs shared by training-time and inference-time feature computation.
/// Constructed once at startup and passed down; both entry points must use
/// the same values or the produced features drift from the trained model.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub window: usize,
    pub default_formation: Formation,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            window: DEFAULT_FORM_WINDOW,
            default_formation: DEFAULT_FORMATION,
        }
    }
}

/// The fixed 16-field schema the classifier was fit on. Field order and
/// names are the wire format; changing either invalidates the model.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureVector {
    pub form_goals_for_home: f64,
    pub form_goals_against_home: f64,
    pub form_points_home: f64,
    pub form_goals_for_away: f64,
    pub form_goals_against_away: f64,
    pub form_points_away: f64,
    pub is_derby: i64,
    pub home_def: i64,
    pub home_mid: i64,
    pub home_att: i64,
    pub away_def: i64,
    pub away_mid: i64,
    pub away_att: i64,
    pub diff_def: i64,
    pub diff_mid: i64,
    pub diff_att: i64,
}

pub const FEATURE_COLUMNS: [&str; 16] = [
    "form_goals_for_home",
    "form_goals_against_home",
    "form_points_home",
    "form_goals_for_away",
    "form_goals_against_away",
    "form_points_away",
    "is_derby",
    "home_def",
    "home_mid",
    "home_att",
    "away_def",
    "away_mid",
    "away_att",
    "diff_def",
    "diff_mid",
    "diff_att",
];

/// One labeled training example.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingRow {
    pub features: FeatureVector,
    pub target: u8,
}

/// Assembled training table plus drop accounting:
/// `rows.len() == eligible - dropped` always holds.
#[derive(Debug, Clone)]
pub struct TrainingTable {
    pub rows: Vec<TrainingRow>,
    pub eligible: usize,
    pub dropped: usize,
}

fn build_vector(
    home_form: &FormSummary,
    away_form: &FormSummary,
    home_ctx: &TeamContext,
    away_ctx: &TeamContext,
) -> FeatureVector {
    let home = home_ctx.formation;
    let away = away_ctx.formation;
    FeatureVector {
        form_goals_for_home: home_form.avg_goals_for,
        form_goals_against_home: home_form.avg_goals_against,
        form_points_home: home_form.avg_points,
        form_goals_for_away: away_form.avg_goals_for,
        form_goals_against_away: away_form.avg_goals_against,
        form_points_away: away_form.avg_points,
        is_derby: i64::from(is_derby(home_ctx, away_ctx)),
        home_def: i64::from(home.defenders),
        home_mid: i64::from(home.midfielders),
        home_att: i64::from(home.attackers),
        away_def: i64::from(away.defenders),
        away_mid: i64::from(away.midfielders),
        away_att: i64::from(away.attackers),
        diff_def: i64::from(home.defenders) - i64::from(away.defenders),
        diff_mid: i64::from(home.midfielders) - i64::from(away.midfielders),
        diff_att: i64::from(home.attackers) - i64::from(away.attackers),
    }
}

fn assemble_at(
    history: &MatchHistory,
    home_team: &str,
    away_team: &str,
    eval: EvalPoint,
    config: &PipelineConfig,
) -> Result<FeatureVector, FeatureError> {
    let home_form = team_form(history, home_team, eval, config.window)?;
    let away_form = team_form(history, away_team, eval, config.window)?;
    let home_ctx = team_context(history, home_team, eval, config.default_formation)?;
    let away_ctx = team_context(history, away_team, eval, config.default_formation)?;
    Ok(build_vector(&home_form, &away_form, &home_ctx, &away_ctx))
}

/// Batch mode: one labeled row per historical match, in chronological order.
///
/// Rows where either side has no prior history (typically a season's opening
/// rounds of the oldest data) are dropped and counted rather than failing
/// the whole table.
pub fn assemble_training_table(history: &MatchHistory, config: &PipelineConfig) -> TrainingTable {
    let mut rows = Vec::with_capacity(history.len());
    let mut dropped = 0usize;
    for (idx, record) in history.matches().iter().enumerate() {
        match assemble_at(
            history,
            &record.home_team,
            &record.away_team,
            EvalPoint::Before(idx),
            config,
        ) {
            Ok(features) => rows.push(TrainingRow {
                features,
                target: record.outcome.class(),
            }),
            Err(FeatureError::InsufficientHistory(team)) => {
                tracing::debug!(
                    date = %record.date,
                    home = %record.home_team,
                    away = %record.away_team,
                    %team,
                    "dropping row with no prior history"
                );
                dropped += 1;
            }
            // Teams named by a history row always resolve against it.
            Err(FeatureError::UnknownTeam(_)) => dropped += 1,
        }
    }
    if dropped > 0 {
        tracing::warn!(
            dropped,
            eligible = history.len(),
            "training rows dropped for missing form history"
        );
    }
    TrainingTable {
        rows,
        eligible: history.len(),
        dropped,
    }
}

/// Inference mode: the feature vector for a hypothetical upcoming match
/// between two known teams, computed over each team's latest matches.
///
/// Unlike batch mode this fails hard: an unknown team or one without any
/// history cannot be predicted.
pub fn assemble_single(
    history: &MatchHistory,
    home_team: &str,
    away_team: &str,
    config: &PipelineConfig,
) -> Result<FeatureVector, FeatureError> {
    let home = history
        .resolve_team(home_team)
        .ok_or_else(|| FeatureError::UnknownTeam(home_team.to_string()))?
        .to_string();
    let away = history
        .resolve_team(away_team)
        .ok_or_else(|| FeatureError::UnknownTeam(away_team.to_string()))?
        .to_string();
    assemble_at(history, &home, &away, EvalPoint::Latest, config)
}
