use crate::features::FeatureError;
use crate::historical_dataset::{EvalPoint, MatchHistory, MatchRecord, Side};

/// Trailing window the rolling form averages are computed over.
pub const DEFAULT_FORM_WINDOW: usize = 5;

/// One team's view of one past match.
#[derive(Debug, Clone, Copy)]
pub struct TeamFormSample {
    pub goals_for: u32,
    pub goals_against: u32,
    pub points: u8,
}

impl TeamFormSample {
    pub fn of(record: &MatchRecord, side: Side) -> Self {
        let (goals_for, goals_against) = record.goals_of(side);
        Self {
            goals_for,
            goals_against,
            points: record.points_of(side),
        }
    }
}

/// Rolling form of one team as of some evaluation point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FormSummary {
    pub avg_goals_for: f64,
    pub avg_goals_against: f64,
    pub avg_points: f64,
    /// How many matches the averages were taken over (≤ window).
    pub samples: usize,
}

/// Averages goals for/against and points earned over the trailing `window`
/// matches involving `team` that are visible from `eval`.
///
/// A team with fewer than `window` visible matches is averaged over whatever
/// it has; a team with none at all is an error, since a fabricated form
/// feature would poison the prediction.
pub fn team_form(
    history: &MatchHistory,
    team: &str,
    eval: EvalPoint,
    window: usize,
) -> Result<FormSummary, FeatureError> {
    let indices = history.indices_before(team, eval);
    let start = indices.len().saturating_sub(window);
    let trailing = &indices[start..];
    if trailing.is_empty() {
        return Err(FeatureError::InsufficientHistory(team.to_string()));
    }

    let mut goals_for = 0u32;
    let mut goals_against = 0u32;
    let mut points = 0u32;
    let mut samples = 0usize;
    for &idx in trailing {
        let record = &history.matches()[idx];
        let Some(side) = record.side_of(team) else {
            continue;
        };
        let sample = TeamFormSample::of(record, side);
        goals_for += sample.goals_for;
        goals_against += sample.goals_against;
        points += u32::from(sample.points);
        samples += 1;
    }
    if samples == 0 {
        return Err(FeatureError::InsufficientHistory(team.to_string()));
    }

    let count = samples as f64;
    Ok(FormSummary {
        avg_goals_for: f64::from(goals_for) / count,
        avg_goals_against: f64::from(goals_against) / count,
        avg_points: f64::from(points) / count,
        samples,
    })
}
