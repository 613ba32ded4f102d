//! Finished pieces never occupy a node.

use super::Invariant;
use crate::ledger::GameState;

/// Invariant: a finished piece has no node.
pub struct FinishedOffBoardInvariant;

impl Invariant<GameState> for FinishedOffBoardInvariant {
    fn holds(state: &GameState) -> bool {
        state
            .pieces()
            .iter()
            .all(|piece| !piece.is_finished() || piece.node().is_none())
    }

    fn description() -> &'static str {
        "Finished pieces are off the board"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::NodeId;
    use crate::lifecycle::initialize;
    use crate::types::TeamConfig;

    #[test]
    fn test_fresh_game_holds() {
        let teams = vec![TeamConfig::preset(0).unwrap(), TeamConfig::preset(1).unwrap()];
        let mut state = initialize(teams).unwrap();
        assert!(FinishedOffBoardInvariant::holds(&state));

        state.pieces[0].finish();
        assert!(FinishedOffBoardInvariant::holds(&state));

        state.pieces[0].relocate(Some(NodeId::CENTER));
        assert!(!FinishedOffBoardInvariant::holds(&state));
    }
}
