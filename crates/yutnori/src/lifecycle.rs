//! Game lifecycle: bootstrap, first turn, restart and reset.
//!
//! Every operation returns a new state value; persistence is the caller's
//! concern.

use crate::ledger::GameState;
use crate::types::{GameStatus, Rules, TeamConfig, TeamId};
use chrono::{DateTime, TimeDelta, Utc};
use derive_more::{Display, Error};
use std::collections::BTreeSet;
use tracing::{debug, info, instrument, warn};

/// Fewest teams in a game.
pub const MIN_TEAMS: usize = 2;
/// Most teams in a game.
pub const MAX_TEAMS: usize = 4;
/// Fewest pieces per team.
pub const MIN_PIECES: u8 = 1;
/// Most pieces per team.
pub const MAX_PIECES: u8 = 5;

/// Invalid team roster handed to [`initialize`].
#[derive(Debug, Clone, Display, Error)]
#[display("Setup error: {} at {}:{}", message, file, line)]
pub struct SetupError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl SetupError {
    /// Creates a new setup error with caller location tracking.
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}

/// Builds a fresh game with the default rules.
///
/// # Errors
///
/// Returns [`SetupError`] for a roster outside 2-4 teams, a blank or
/// duplicate team id, a blank name, or a piece count outside 1-5.
pub fn initialize(teams: Vec<TeamConfig>) -> Result<GameState, SetupError> {
    initialize_with(teams, Rules::default())
}

/// Builds a fresh game: all pieces home, zeroed stats, first turn open.
///
/// # Errors
///
/// See [`initialize`].
#[instrument(skip(teams), fields(teams = teams.len(), bonus_throw = rules.bonus_throw))]
pub fn initialize_with(teams: Vec<TeamConfig>, rules: Rules) -> Result<GameState, SetupError> {
    validate_roster(&teams)?;
    let state = GameState::fresh(teams, rules);
    info!(pieces = state.pieces().len(), "Game initialized");
    Ok(state)
}

fn validate_roster(teams: &[TeamConfig]) -> Result<(), SetupError> {
    if !(MIN_TEAMS..=MAX_TEAMS).contains(&teams.len()) {
        return Err(SetupError::new(format!(
            "A game needs {}-{} teams, got {}",
            MIN_TEAMS,
            MAX_TEAMS,
            teams.len()
        )));
    }

    let mut seen = BTreeSet::new();
    for team in teams {
        let id = team.id().as_str();
        if id.trim().is_empty() {
            return Err(SetupError::new("Team id must not be empty"));
        }
        if !seen.insert(id) {
            return Err(SetupError::new(format!("Duplicate team id '{}'", id)));
        }
        if team.name().trim().is_empty() {
            return Err(SetupError::new(format!("Team '{}' needs a name", id)));
        }
        if !(MIN_PIECES..=MAX_PIECES).contains(team.piece_count()) {
            return Err(SetupError::new(format!(
                "Team '{}' must have {}-{} pieces, got {}",
                id,
                MIN_PIECES,
                MAX_PIECES,
                team.piece_count()
            )));
        }
    }
    Ok(())
}

/// Starts play with `team` holding the first turn, stamped with the current time.
pub fn set_first_turn(state: GameState, team: &TeamId) -> GameState {
    set_first_turn_at(state, team, Utc::now())
}

/// [`set_first_turn`] with an explicit start time.
///
/// Ignored unless the game is choosing its first turn and `team` is on the
/// roster. The timestamp is kept at millisecond precision, matching the
/// snapshot format.
#[instrument(skip(state), fields(status = %state.status()))]
pub fn set_first_turn_at(mut state: GameState, team: &TeamId, at: DateTime<Utc>) -> GameState {
    if state.status() != GameStatus::ChoosingFirstTurn {
        debug!("First turn already chosen");
        return state;
    }
    let Some(name) = state.team(team).map(TeamConfig::display_name) else {
        warn!(%team, "First turn offered to a team not on the roster");
        return state;
    };

    state.status = GameStatus::Playing;
    state.current_turn = Some(team.clone());
    state.start_time = DateTime::from_timestamp_millis(at.timestamp_millis());
    state.log(format!("🎲 {} goes first", name));
    info!(%team, "First turn chosen");
    state
}

/// Fresh game with the same roster and rules.
#[instrument(skip(state))]
pub fn restart(state: &GameState) -> GameState {
    info!("Restarting with the same roster");
    GameState::fresh(state.teams().to_vec(), state.rules())
}

/// Drops the game entirely, returning to setup.
pub fn reset(state: GameState) {
    debug!(logs = state.logs().len(), "Game discarded");
}

/// `mm:ss`, or `h:mm:ss` past the hour.
pub fn format_elapsed(elapsed: TimeDelta) -> String {
    let total = elapsed.num_seconds().max(0);
    let (hours, minutes, seconds) = (total / 3600, (total % 3600) / 60, total % 60);
    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, seconds)
    } else {
        format!("{:02}:{:02}", minutes, seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{PieceId, TeamStats};

    fn roster() -> Vec<TeamConfig> {
        vec![TeamConfig::preset(0).unwrap(), TeamConfig::preset(1).unwrap()]
    }

    #[test]
    fn test_initialize_builds_home_pieces() {
        let state = initialize(roster()).unwrap();
        assert_eq!(state.pieces().len(), 8);
        assert!(state.pieces().iter().all(|p| p.is_home()));
        assert_eq!(state.piece(&PieceId::new("red-3")).unwrap().team().as_str(), "red");
        assert_eq!(state.stats(&TeamId::new("blue")), TeamStats::default());
        assert_eq!(state.status(), GameStatus::ChoosingFirstTurn);
        assert_eq!(state.current_turn(), None);
        assert_eq!(state.logs().len(), 1);
        assert!(state.logs()[0].contains("청팀 vs 🔴 홍팀"));
    }

    #[test]
    fn test_initialize_rejects_bad_rosters() {
        assert!(initialize(vec![TeamConfig::preset(0).unwrap()]).is_err());

        let dup = vec![TeamConfig::preset(0).unwrap(), TeamConfig::preset(0).unwrap()];
        assert!(initialize(dup).is_err());

        let too_many = vec![
            TeamConfig::preset(0).unwrap(),
            TeamConfig::preset(1).unwrap().with_piece_count(6),
        ];
        let err = initialize(too_many).unwrap_err();
        assert!(err.message.contains("1-5"));

        let nameless = vec![
            TeamConfig::preset(0).unwrap(),
            TeamConfig::preset(1).unwrap().with_name(" "),
        ];
        assert!(initialize(nameless).is_err());
    }

    #[test]
    fn test_set_first_turn_once() {
        let at = DateTime::from_timestamp(1_700_000_000, 123_456_789).unwrap();
        let state = set_first_turn_at(initialize(roster()).unwrap(), &TeamId::new("red"), at);
        assert_eq!(state.status(), GameStatus::Playing);
        assert_eq!(state.current_turn(), Some(&TeamId::new("red")));
        assert_eq!(state.start_time().unwrap().timestamp_millis(), at.timestamp_millis());

        let again = set_first_turn(state.clone(), &TeamId::new("blue"));
        assert_eq!(again, state);
    }

    #[test]
    fn test_set_first_turn_unknown_team_ignored() {
        let state = initialize(roster()).unwrap();
        let after = set_first_turn(state.clone(), &TeamId::new("purple"));
        assert_eq!(after, state);
    }

    #[test]
    fn test_restart_keeps_roster_only() {
        let state = set_first_turn(initialize(roster()).unwrap(), &TeamId::new("blue"))
            .apply_move(&PieceId::new("blue-0"), "n3".parse().ok(), false);
        let fresh = restart(&state);
        assert_eq!(fresh.teams(), state.teams());
        assert_eq!(fresh, initialize(roster()).unwrap());
    }

    #[test]
    fn test_format_elapsed() {
        assert_eq!(format_elapsed(TimeDelta::seconds(75)), "01:15");
        assert_eq!(format_elapsed(TimeDelta::seconds(3_725)), "1:02:05");
        assert_eq!(format_elapsed(TimeDelta::seconds(-4)), "00:00");
    }
}
