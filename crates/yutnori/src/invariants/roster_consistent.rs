//! Pieces and stats line up with the roster.

use super::Invariant;
use crate::ledger::GameState;
use std::collections::BTreeSet;

/// Invariant: piece ids are unique, every piece belongs to a roster team,
/// each team owns exactly `piece_count` pieces and has a stats entry.
pub struct RosterConsistentInvariant;

impl Invariant<GameState> for RosterConsistentInvariant {
    fn holds(state: &GameState) -> bool {
        let ids: BTreeSet<_> = state.pieces().iter().map(|p| p.id()).collect();
        if ids.len() != state.pieces().len() {
            return false;
        }

        let owners_known = state
            .pieces()
            .iter()
            .all(|piece| state.team(piece.team()).is_some());

        let counts_match = state.teams().iter().all(|team| {
            state.pieces_of(team.id()).count() == *team.piece_count() as usize
                && state.all_stats().contains_key(team.id())
        });

        owners_known && counts_match
    }

    fn description() -> &'static str {
        "Pieces and stats match the team roster"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lifecycle::initialize;
    use crate::types::{Piece, PieceId, TeamConfig, TeamId};

    #[test]
    fn test_stray_piece_detected() {
        let teams = vec![TeamConfig::preset(0).unwrap(), TeamConfig::preset(1).unwrap()];
        let mut state = initialize(teams).unwrap();
        assert!(RosterConsistentInvariant::holds(&state));

        state
            .pieces
            .push(Piece::at_home(PieceId::new("green-0"), TeamId::new("green")));
        assert!(!RosterConsistentInvariant::holds(&state));
    }

    #[test]
    fn test_duplicate_piece_detected() {
        let teams = vec![TeamConfig::preset(0).unwrap(), TeamConfig::preset(1).unwrap()];
        let mut state = initialize(teams).unwrap();
        let copy = state.pieces[0].clone();
        state.pieces[1] = copy;
        assert!(!RosterConsistentInvariant::holds(&state));
    }
}
