//! First-class move requests and their outcomes.
//!
//! A move request is what the presentation layer hands the ledger once a
//! path animation completes: which piece, where it stopped, and whether it
//! crossed the goal.

use crate::board::NodeId;
use crate::types::{PieceId, TeamId};
use derive_more::Display;
use derive_new::new;
use serde::{Deserialize, Serialize};

/// A resolved move ready to be applied.
#[derive(Debug, Clone, PartialEq, Eq, Hash, new, Serialize, Deserialize)]
pub struct MoveRequest {
    /// The piece that was moved (its whole stack travels with it).
    pub piece: PieceId,
    /// Destination node, or `None` for home.
    pub target: Option<NodeId>,
    /// Whether the move completes the circuit.
    pub is_goal: bool,
}

impl MoveRequest {
    /// Request that finishes the piece's stack.
    pub fn goal(piece: PieceId) -> Self {
        Self::new(piece, None, true)
    }
}

/// Why a move request was declined.
///
/// None of these are fatal: the state is left untouched.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum MoveRejection {
    /// A winner exists; the game is terminal.
    #[display("Game is already over")]
    GameOver,

    /// No team holds the turn yet.
    #[display("The first turn has not been chosen")]
    NoTurnChosen,

    /// The piece id is not in the game.
    #[display("Unknown piece {}", _0)]
    UnknownPiece(PieceId),

    /// The piece already completed the circuit.
    #[display("Piece {} has already finished", _0)]
    PieceFinished(PieceId),

    /// The piece belongs to a team that does not hold the turn.
    #[display("It is {}'s turn, not {}'s", current, team)]
    WrongTeam {
        /// Team owning the piece.
        team: TeamId,
        /// Team holding the turn.
        current: TeamId,
    },

    /// The piece was dropped back where it stood.
    #[display("Piece {} did not move", _0)]
    NoMovement(PieceId),

    /// A postcondition failed; the state was rolled back.
    #[display("Invariant violation: {}", _0)]
    InvariantViolation(String),
}

impl std::error::Error for MoveRejection {}

/// Opposing pieces sent home by one move, for one team.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capture {
    /// Team whose pieces were sent home.
    pub team: TeamId,
    /// Pieces sent home.
    pub pieces: Vec<PieceId>,
}

impl Capture {
    /// Number of pieces sent home.
    pub fn count(&self) -> usize {
        self.pieces.len()
    }
}

/// Everything a successful move changed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveReport {
    /// Team that moved.
    pub team: TeamId,
    /// The moving stack.
    pub moved: Vec<PieceId>,
    /// Where the stack stood (`None` = home).
    pub from: Option<NodeId>,
    /// Where the stack stopped (`None` = home or finished).
    pub to: Option<NodeId>,
    /// Whether the stack finished.
    pub finished: bool,
    /// Whether the stack merged onto teammates already on the target.
    pub stacked: bool,
    /// Size of the merged stack at the target, when `stacked`.
    pub stack_size: usize,
    /// Opposing pieces sent home, per team in roster order.
    pub captures: Vec<Capture>,
    /// Winner, if this move ended the game.
    pub winner: Option<TeamId>,
}

impl MoveReport {
    /// Whether any opposing piece was captured.
    pub fn captured_any(&self) -> bool {
        !self.captures.is_empty()
    }
}
