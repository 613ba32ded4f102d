//! Finished counters agree with the pieces.

use super::Invariant;
use crate::ledger::GameState;

/// Invariant: each team's `finished_count` equals its finished pieces.
///
/// Finished pieces never re-enter play, so the two can only drift through
/// a bookkeeping bug.
pub struct FinishedCountInvariant;

impl Invariant<GameState> for FinishedCountInvariant {
    fn holds(state: &GameState) -> bool {
        state.teams().iter().all(|team| {
            let finished = state.pieces_of(team.id()).filter(|p| p.is_finished()).count();
            state.stats(team.id()).finished_count as usize == finished
        })
    }

    fn description() -> &'static str {
        "Finished counters match finished pieces"
    }
}
