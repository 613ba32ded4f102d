//! Winner and status agree with the pieces.

use super::Invariant;
use crate::ledger::GameState;
use crate::types::GameStatus;

/// Invariant: a winner exists iff some team finished every piece.
///
/// The recorded winner must be such a team, and the status reads
/// `Finished` exactly when a winner exists.
pub struct WinnerConsistentInvariant;

impl Invariant<GameState> for WinnerConsistentInvariant {
    fn holds(state: &GameState) -> bool {
        let complete: Vec<_> = state
            .teams()
            .iter()
            .map(|team| team.id())
            .filter(|id| {
                let mut pieces = state.pieces_of(id).peekable();
                pieces.peek().is_some() && pieces.all(|p| p.is_finished())
            })
            .collect();

        let winner_ok = match state.winner() {
            None => complete.is_empty(),
            Some(winner) => complete.contains(&winner),
        };
        let status_ok = state.winner().is_some() == (state.status() == GameStatus::Finished);

        winner_ok && status_ok
    }

    fn description() -> &'static str {
        "A winner exists iff a team finished every piece"
    }
}
