//! Command-line interface for the yutnori board keeper.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::str::FromStr;
use yutnori::{NodeId, ParseNodeIdError, Throw};

/// Yutnori - keeps the board while real sticks are thrown
#[derive(Parser, Debug)]
#[command(name = "yutnori")]
#[command(about = "Board keeper for the Korean race game yutnori", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Game snapshot file
    #[arg(long, global = true, default_value = "yutnori_state.json")]
    pub state: PathBuf,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// A piece position on the command line: a node id or `home`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position(pub Option<NodeId>);

impl FromStr for Position {
    type Err = ParseNodeIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("home") {
            Ok(Self(None))
        } else {
            s.parse().map(|id| Self(Some(id)))
        }
    }
}

/// How far to move: a raw step count or a named throw.
#[derive(clap::Args, Debug, Clone)]
pub struct Distance {
    /// Signed step count (-1 for back-do, 1-5 forward)
    #[arg(long, allow_negative_numbers = true, conflicts_with = "throw")]
    pub steps: Option<i32>,

    /// Throw name: do, gae, geol, yut, mo, back-do (or 도, 개, 걸, 윷, 모, 빽도)
    #[arg(long)]
    pub throw: Option<Throw>,

    /// Leave the center toward the third corner instead of the start
    #[arg(long)]
    pub via_third_corner: bool,
}

impl Distance {
    /// Step count, if one was given.
    pub fn steps(&self) -> Option<i32> {
        self.steps.or(self.throw.map(Throw::steps))
    }
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start a new game, replacing any saved one
    New {
        /// Roster file (TOML)
        #[arg(short, long)]
        roster: Option<PathBuf>,

        /// Number of preset teams when no roster file is given
        #[arg(long, default_value = "2", conflicts_with = "roster")]
        teams: usize,

        /// Pieces per team when no roster file is given
        #[arg(long, default_value = "4", conflicts_with = "roster")]
        pieces: u8,

        /// Capture or finish earns one more throw
        #[arg(long)]
        bonus_throw: bool,
    },

    /// Choose which team moves first
    FirstTurn {
        /// Team id (e.g. blue)
        team: String,
    },

    /// Show the path a move would take, without moving
    Path {
        /// Starting position (node id or `home`)
        #[arg(long, default_value = "home")]
        from: Position,

        /// Distance; every throw is listed when omitted
        #[command(flatten)]
        distance: Distance,
    },

    /// Move a piece (and its stack) by a throw
    Move {
        /// Piece id (e.g. blue-0)
        piece: String,

        /// Distance to move
        #[command(flatten)]
        distance: Distance,
    },

    /// Put a piece down freely, snapping to the nearest node
    Place {
        /// Target position (node id or `home`)
        #[arg(long, conflicts_with_all = ["x", "y"], required_unless_present = "x")]
        at: Option<Position>,

        /// Piece id (e.g. blue-0)
        piece: String,

        /// Board x coordinate (0-600)
        #[arg(long, requires = "y", allow_negative_numbers = true)]
        x: Option<f64>,

        /// Board y coordinate (0-600)
        #[arg(long, requires = "x", allow_negative_numbers = true)]
        y: Option<f64>,
    },

    /// Pass the turn to the next team
    Next,

    /// Show turn, teams and stats
    Show,

    /// Print the game log
    Log {
        /// Only the last N lines
        #[arg(short = 'n', long)]
        tail: Option<usize>,
    },

    /// Draw the board with pieces
    Board,

    /// Start over with the same teams
    Restart,

    /// Discard the game and its snapshot
    Reset,

    /// Print the JSON Schema of the snapshot
    Schema,
}
