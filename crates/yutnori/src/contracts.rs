//! Contract-based validation for ledger moves.
//!
//! Preconditions decide whether a move request is applied at all;
//! postconditions confirm the transition kept the ledger consistent.

use crate::action::{MoveRejection, MoveRequest};
use crate::invariants::{InvariantSet, LedgerInvariants};
use crate::ledger::GameState;
use tracing::instrument;

// ─────────────────────────────────────────────────────────────
//  Contract Trait
// ─────────────────────────────────────────────────────────────

/// Preconditions and postconditions for a state transition.
///
/// - Precondition: {P(state, action)} must hold before applying the action
/// - Postcondition: {Q(before, after)} must hold after applying it
pub trait Contract<S, A> {
    /// Checks preconditions before applying the action.
    fn pre(state: &S, action: &A) -> Result<(), MoveRejection>;

    /// Checks postconditions after applying the action.
    fn post(before: &S, after: &S) -> Result<(), MoveRejection>;
}

// ─────────────────────────────────────────────────────────────
//  Move Preconditions
// ─────────────────────────────────────────────────────────────

/// Precondition: no winner exists yet.
pub struct GameNotOver;

impl GameNotOver {
    /// Rejects every move once the game is terminal.
    #[instrument(skip_all)]
    pub fn check(_request: &MoveRequest, state: &GameState) -> Result<(), MoveRejection> {
        if state.is_over() {
            Err(MoveRejection::GameOver)
        } else {
            Ok(())
        }
    }
}

/// Precondition: some team holds the turn.
pub struct TurnChosen;

impl TurnChosen {
    /// Rejects moves made before the first turn is chosen.
    #[instrument(skip_all)]
    pub fn check(_request: &MoveRequest, state: &GameState) -> Result<(), MoveRejection> {
        match state.current_turn() {
            Some(_) => Ok(()),
            None => Err(MoveRejection::NoTurnChosen),
        }
    }
}

/// Precondition: the piece exists and has not finished.
pub struct PieceInPlay;

impl PieceInPlay {
    /// Rejects unknown and finished pieces.
    #[instrument(skip(state), fields(piece = %request.piece))]
    pub fn check(request: &MoveRequest, state: &GameState) -> Result<(), MoveRejection> {
        match state.piece(&request.piece) {
            None => Err(MoveRejection::UnknownPiece(request.piece.clone())),
            Some(piece) if piece.is_finished() => {
                Err(MoveRejection::PieceFinished(request.piece.clone()))
            }
            Some(_) => Ok(()),
        }
    }
}

/// Precondition: the piece belongs to the team holding the turn.
pub struct TeamHoldsTurn;

impl TeamHoldsTurn {
    /// Rejects out-of-turn moves.
    #[instrument(skip(state), fields(piece = %request.piece))]
    pub fn check(request: &MoveRequest, state: &GameState) -> Result<(), MoveRejection> {
        let (Some(piece), Some(current)) = (state.piece(&request.piece), state.current_turn())
        else {
            return Ok(());
        };
        if piece.team() == current {
            Ok(())
        } else {
            Err(MoveRejection::WrongTeam {
                team: piece.team().clone(),
                current: current.clone(),
            })
        }
    }
}

/// Precondition: the move changes the piece's position.
pub struct PieceMoves;

impl PieceMoves {
    /// Rejects a drop back onto the piece's own position.
    #[instrument(skip(state), fields(piece = %request.piece))]
    pub fn check(request: &MoveRequest, state: &GameState) -> Result<(), MoveRejection> {
        match state.piece(&request.piece) {
            Some(piece) if !request.is_goal && piece.node() == request.target => {
                Err(MoveRejection::NoMovement(request.piece.clone()))
            }
            _ => Ok(()),
        }
    }
}

/// Composite precondition: every move precondition, in order.
pub struct LegalMove;

impl LegalMove {
    /// Validates all preconditions for a move.
    #[instrument(skip_all)]
    pub fn check(request: &MoveRequest, state: &GameState) -> Result<(), MoveRejection> {
        GameNotOver::check(request, state)?;
        TurnChosen::check(request, state)?;
        PieceInPlay::check(request, state)?;
        TeamHoldsTurn::check(request, state)?;
        PieceMoves::check(request, state)?;
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────
//  Move Contract (Pre + Post)
// ─────────────────────────────────────────────────────────────

/// Contract for move requests.
///
/// Postconditions:
/// - Every [`LedgerInvariants`] member holds
/// - Pieces finished before the move are still finished
/// - The log only grew
pub struct MoveContract;

impl Contract<GameState, MoveRequest> for MoveContract {
    fn pre(state: &GameState, request: &MoveRequest) -> Result<(), MoveRejection> {
        LegalMove::check(request, state)
    }

    fn post(before: &GameState, after: &GameState) -> Result<(), MoveRejection> {
        LedgerInvariants::check_all(after).map_err(|violations| {
            let descriptions = violations
                .iter()
                .map(|v| v.description.as_str())
                .collect::<Vec<_>>()
                .join("; ");
            MoveRejection::InvariantViolation(format!("Postcondition failed: {}", descriptions))
        })?;

        let still_finished = before
            .pieces()
            .iter()
            .filter(|p| p.is_finished())
            .all(|p| after.piece(p.id()).is_some_and(|now| now.is_finished()));
        if !still_finished {
            return Err(MoveRejection::InvariantViolation(
                "Postcondition failed: a finished piece re-entered play".to_string(),
            ));
        }

        if !after.logs().starts_with(before.logs()) {
            return Err(MoveRejection::InvariantViolation(
                "Postcondition failed: log history was rewritten".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::NodeId;
    use crate::lifecycle::{initialize, set_first_turn};
    use crate::types::{PieceId, TeamConfig, TeamId};

    fn game() -> GameState {
        let teams = vec![TeamConfig::preset(0).unwrap(), TeamConfig::preset(1).unwrap()];
        set_first_turn(initialize(teams).unwrap(), &TeamId::new("blue"))
    }

    fn request(piece: &str, target: Option<NodeId>, is_goal: bool) -> MoveRequest {
        MoveRequest::new(PieceId::new(piece), target, is_goal)
    }

    #[test]
    fn test_legal_move_passes() {
        let state = game();
        let corner = request("blue-0", Some(NodeId::FIRST_CORNER), false);
        assert!(LegalMove::check(&corner, &state).is_ok());
    }

    #[test]
    fn test_wrong_team_rejected() {
        let state = game();
        let out_of_turn = request("red-0", Some(NodeId::START), false);
        let err = LegalMove::check(&out_of_turn, &state).unwrap_err();
        assert!(matches!(err, MoveRejection::WrongTeam { .. }));
    }

    #[test]
    fn test_home_to_home_is_no_movement() {
        let state = game();
        let err = PieceMoves::check(&request("blue-0", None, false), &state).unwrap_err();
        assert_eq!(err, MoveRejection::NoMovement(PieceId::new("blue-0")));
        assert!(PieceMoves::check(&request("blue-0", None, true), &state).is_ok());
    }

    #[test]
    fn test_unknown_piece_rejected_before_turn_check() {
        let state = game();
        let err = LegalMove::check(&request("green-0", None, false), &state).unwrap_err();
        assert_eq!(err, MoveRejection::UnknownPiece(PieceId::new("green-0")));
    }

    #[test]
    fn test_post_detects_rewritten_log() {
        let before = game();
        let mut after = before.clone();
        after.logs.clear();
        assert!(MoveContract::post(&before, &after).is_err());
    }

    #[test]
    fn test_post_detects_unfinished_piece() {
        let mut before = game();
        before.pieces[0].finish();
        if let Some(stats) = before.stats.get_mut(&TeamId::new("blue")) {
            stats.finished_count = 1;
        }
        let mut after = before.clone();
        after.pieces[0] = crate::types::Piece::at_home(PieceId::new("blue-0"), TeamId::new("blue"));
        if let Some(stats) = after.stats.get_mut(&TeamId::new("blue")) {
            stats.finished_count = 0;
        }
        assert!(MoveContract::post(&before, &after).is_err());
    }
}
