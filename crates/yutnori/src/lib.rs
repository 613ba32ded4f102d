//! Yutnori game engine: the traditional Korean race game as pure logic.
//!
//! # Architecture
//!
//! - **Board**: the 29 nodes of the square track, with nearest-node snapping
//! - **Path**: branching-track resolution for a signed step count
//! - **Ledger**: the single authority that applies moves (stacking, capture, finish, win)
//! - **Lifecycle**: initialize, first turn, restart and reset
//! - **Session**: a game wired to a snapshot store and event observer
//!
//! # Example
//!
//! ```
//! use yutnori::{PieceId, TeamConfig, TeamId, initialize, resolve_path, set_first_turn};
//!
//! let teams = vec![TeamConfig::preset(0).unwrap(), TeamConfig::preset(1).unwrap()];
//! let state = set_first_turn(initialize(teams)?, &TeamId::new("blue"));
//!
//! let piece = PieceId::new("blue-0");
//! let path = resolve_path(None, 3);
//! let state = state
//!     .apply_move(&piece, path.destination(), path.reaches_goal)
//!     .advance_turn();
//!
//! assert_eq!(state.current_turn(), Some(&TeamId::new("red")));
//! # Ok::<(), yutnori::SetupError>(())
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod action;
mod board;
mod config;
mod contracts;
mod events;
mod invariants;
mod ledger;
mod lifecycle;
mod path;
mod session;
mod stacks;
mod store;
mod throw;
mod types;

// Crate-level exports - Board topology
pub use board::{
    BOARD_EDGES, BOARD_NODES, Edge, NODE_COUNT, Node, NodeId, ParseNodeIdError, SNAP_RADIUS,
    find_node, get_node, is_junction, nearest_node,
};

// Crate-level exports - Path resolution
pub use path::{
    Advance, CenterExit, Cursor, PathStep, PathWalk, ResolvedPath, Track, resolve_path,
    resolve_path_with, step_back, walk,
};
pub use throw::{ParseThrowError, Throw};

// Crate-level exports - Domain types
pub use types::{
    DEFAULT_PIECE_COUNT, GameStatus, Piece, PieceId, Rules, TeamConfig, TeamId, TeamProgress,
    TeamStats,
};

// Crate-level exports - Ledger
pub use action::{Capture, MoveRejection, MoveReport, MoveRequest};
pub use ledger::GameState;
pub use stacks::{StackKey, group_stacks, stack_at, teams_at};

// Crate-level exports - Contracts and invariants
pub use contracts::{
    Contract, GameNotOver, LegalMove, MoveContract, PieceInPlay, PieceMoves, TeamHoldsTurn,
    TurnChosen,
};
pub use invariants::{
    FinishedCountInvariant, FinishedOffBoardInvariant, Invariant, InvariantSet,
    InvariantViolation, LedgerInvariants, RosterConsistentInvariant, WinnerConsistentInvariant,
};

// Crate-level exports - Events
pub use events::{EventRecorder, GameEvent, GameObserver, NoopObserver};

// Crate-level exports - Lifecycle
pub use lifecycle::{
    MAX_PIECES, MAX_TEAMS, MIN_PIECES, MIN_TEAMS, SetupError, format_elapsed, initialize,
    initialize_with, reset, restart, set_first_turn, set_first_turn_at,
};

// Crate-level exports - Configuration and persistence
pub use config::{ConfigError, RosterConfig, TeamEntry};
pub use session::{GameSession, SessionError};
pub use store::{JsonFileStore, MemoryStore, SnapshotStore, StoreError};
