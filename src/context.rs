use crate::features::FeatureError;
use crate::formation::Formation;
use crate::historical_dataset::{EvalPoint, MatchHistory};

/// Situational features read off a team's most recent match: the region it
/// was recorded under and the shape it lined up in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamContext {
    pub region: String,
    pub formation: Formation,
}

/// Extracts `team`'s context from its latest match visible from `eval`.
///
/// The region and formation are read from whichever side the team played on
/// in that match. A missing or malformed formation label degrades to
/// `default_formation`; a team with no visible match is an error.
pub fn team_context(
    history: &MatchHistory,
    team: &str,
    eval: EvalPoint,
    default_formation: Formation,
) -> Result<TeamContext, FeatureError> {
    let indices = history.indices_before(team, eval);
    for &idx in indices.iter().rev() {
        let record = &history.matches()[idx];
        let Some(side) = record.side_of(team) else {
            continue;
        };
        return Ok(TeamContext {
            region: record.region_of(side).to_string(),
            formation: Formation::parse(record.formation_of(side), default_formation),
        });
    }
    Err(FeatureError::InsufficientHistory(team.to_string()))
}

/// A pairing is a derby when both sides' latest matches place them in the
/// same region. Symmetric in its arguments.
pub fn is_derby(home: &TeamContext, away: &TeamContext) -> bool {
    home.region == away.region
}
