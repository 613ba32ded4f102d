//! Core domain types for yutnori.

use crate::board::NodeId;
use derive_getters::Getters;
use derive_more::{Display, From};
use derive_new::new;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Team identifier (`"blue"`, `"red"`, ...).
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Display,
    From,
    Serialize,
    Deserialize,
    JsonSchema,
)]
#[serde(transparent)]
#[display("{_0}")]
pub struct TeamId(String);

impl TeamId {
    /// Creates a team id.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Id as text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for TeamId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Piece identifier, `"{team}-{index}"` with a zero-based index.
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Display,
    From,
    Serialize,
    Deserialize,
    JsonSchema,
)]
#[serde(transparent)]
#[display("{_0}")]
pub struct PieceId(String);

impl PieceId {
    /// Creates a piece id from raw text.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Id of the `index`-th piece of a team.
    pub fn for_team(team: &TeamId, index: usize) -> Self {
        Self(format!("{}-{}", team, index))
    }

    /// Id as text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// One-based piece number for display, when the id follows the team pattern.
    pub fn number(&self) -> Option<usize> {
        self.0
            .rsplit_once('-')
            .and_then(|(_, index)| index.parse::<usize>().ok())
            .map(|index| index + 1)
    }
}

impl From<&str> for PieceId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Configuration of one team, fixed for the duration of a game.
#[derive(Debug, Clone, PartialEq, Eq, Getters, new, Serialize, Deserialize, JsonSchema)]
pub struct TeamConfig {
    /// Team identifier.
    id: TeamId,
    /// Display name.
    name: String,
    /// Number of pieces (1-5).
    piece_count: u8,
    /// Primary color (CSS color string).
    color: String,
    /// Light variant of the primary color.
    color_light: String,
    /// Emoji glyph shown next to the name.
    emoji: String,
}

/// Built-in team looks, by roster slot.
const PRESETS: [(&str, &str, &str, &str, &str); 4] = [
    ("blue", "청팀", "hsl(220, 75%, 50%)", "hsl(220, 75%, 90%)", "🔵"),
    ("red", "홍팀", "hsl(355, 75%, 50%)", "hsl(355, 75%, 90%)", "🔴"),
    ("green", "녹팀", "hsl(145, 60%, 40%)", "hsl(145, 60%, 88%)", "🟢"),
    ("yellow", "황팀", "hsl(45, 90%, 50%)", "hsl(45, 90%, 88%)", "🟡"),
];

/// Default number of pieces per team.
pub const DEFAULT_PIECE_COUNT: u8 = 4;

impl TeamConfig {
    /// Preset team for a roster slot (0-3) with the default piece count.
    pub fn preset(slot: usize) -> Option<Self> {
        PRESETS.get(slot).map(|(id, name, color, light, emoji)| {
            Self::new(
                TeamId::new(*id),
                name.to_string(),
                DEFAULT_PIECE_COUNT,
                color.to_string(),
                light.to_string(),
                emoji.to_string(),
            )
        })
    }

    /// Copy of this team with a different name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Copy of this team with a different piece count.
    pub fn with_piece_count(mut self, piece_count: u8) -> Self {
        self.piece_count = piece_count;
        self
    }

    /// Emoji and name, as shown in log lines.
    pub fn display_name(&self) -> String {
        if self.emoji.is_empty() {
            self.name.clone()
        } else {
            format!("{} {}", self.emoji, self.name)
        }
    }
}

/// A game piece.
///
/// `node == None` with `finished == false` means the piece waits at home.
/// A finished piece never has a node and never re-enters play.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub struct Piece {
    id: PieceId,
    team: TeamId,
    node: Option<NodeId>,
    finished: bool,
}

impl Piece {
    /// Creates a piece waiting at home.
    pub fn at_home(id: PieceId, team: TeamId) -> Self {
        Self {
            id,
            team,
            node: None,
            finished: false,
        }
    }

    /// Piece id.
    pub fn id(&self) -> &PieceId {
        &self.id
    }

    /// Owning team.
    pub fn team(&self) -> &TeamId {
        &self.team
    }

    /// Current node; `None` when at home or finished.
    pub fn node(&self) -> Option<NodeId> {
        self.node
    }

    /// Whether the piece completed the circuit.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Whether the piece is waiting at home.
    pub fn is_home(&self) -> bool {
        self.node.is_none() && !self.finished
    }

    /// Whether the piece is on the board.
    pub fn is_on_track(&self) -> bool {
        self.node.is_some() && !self.finished
    }

    pub(crate) fn relocate(&mut self, node: Option<NodeId>) {
        self.node = node;
    }

    pub(crate) fn finish(&mut self) {
        self.node = None;
        self.finished = true;
    }
}

/// Per-team counters, accumulated by the ledger only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct TeamStats {
    /// Moves that changed a stack's position.
    pub move_count: u32,
    /// Moves that sent at least one opposing piece home.
    pub capture_count: u32,
    /// Moves that merged onto a same-team stack (업기).
    pub stack_count: u32,
    /// Pieces that completed the circuit.
    pub finished_count: u32,
}

/// Lifecycle status of a game.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    JsonSchema,
    strum::Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum GameStatus {
    /// Waiting for players to pick the first team.
    #[default]
    ChoosingFirstTurn,
    /// Moves are being played.
    Playing,
    /// A team has won; the game is terminal.
    Finished,
}

/// Optional rule switches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Rules {
    /// Keep the turn after a capture or finish (one extra throw).
    #[serde(default)]
    pub bonus_throw: bool,
}

/// Piece counts of one team by position kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamProgress {
    /// Pieces waiting at home.
    pub waiting: usize,
    /// Pieces on the board.
    pub active: usize,
    /// Pieces that completed the circuit.
    pub finished: usize,
}

impl TeamProgress {
    /// Total pieces of the team.
    pub fn total(&self) -> usize {
        self.waiting + self.active + self.finished
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_piece_id_number() {
        let team = TeamId::new("blue");
        assert_eq!(PieceId::for_team(&team, 0).as_str(), "blue-0");
        assert_eq!(PieceId::for_team(&team, 3).number(), Some(4));
        assert_eq!(PieceId::new("stray").number(), None);
    }

    #[test]
    fn test_presets() {
        let blue = TeamConfig::preset(0).unwrap();
        assert_eq!(blue.id().as_str(), "blue");
        assert_eq!(*blue.piece_count(), DEFAULT_PIECE_COUNT);
        assert_eq!(blue.display_name(), "🔵 청팀");
        assert!(TeamConfig::preset(4).is_none());
    }

    #[test]
    fn test_piece_states() {
        let mut piece = Piece::at_home(PieceId::new("red-0"), TeamId::new("red"));
        assert!(piece.is_home());
        piece.relocate(Some(NodeId::CENTER));
        assert!(piece.is_on_track());
        piece.finish();
        assert!(piece.is_finished());
        assert_eq!(piece.node(), None);
        assert!(!piece.is_home());
    }

    #[test]
    fn test_status_serializes_snake_case() {
        let json = serde_json::to_string(&GameStatus::ChoosingFirstTurn).unwrap();
        assert_eq!(json, "\"choosing_first_turn\"");
        assert_eq!(GameStatus::Playing.to_string(), "playing");
    }
}
