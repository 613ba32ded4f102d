//! A game wired to a snapshot store and an optional observer.
//!
//! The session owns the current [`GameState`], delegates every change to the
//! lifecycle and ledger functions, and saves after each one.

use crate::board::{NodeId, nearest_node};
use crate::config::{ConfigError, RosterConfig};
use crate::events::{GameObserver, NoopObserver};
use crate::ledger::GameState;
use crate::lifecycle::{self, SetupError};
use crate::path::{CenterExit, ResolvedPath, resolve_path_with};
use crate::store::{SnapshotStore, StoreError};
use crate::types::{PieceId, Rules, TeamConfig, TeamId};
use derive_more::Display;
use tracing::{debug, info, instrument};

/// Session-level failure.
#[derive(Debug, Display)]
pub enum SessionError {
    /// The roster was rejected.
    #[display("{}", _0)]
    Setup(SetupError),
    /// The roster file could not be used.
    #[display("{}", _0)]
    Config(ConfigError),
    /// The snapshot could not be loaded or saved.
    #[display("{}", _0)]
    Store(StoreError),
    /// No game has been started.
    #[display("No game in progress; start one first")]
    NoGame,
}

impl std::error::Error for SessionError {}

impl From<SetupError> for SessionError {
    fn from(err: SetupError) -> Self {
        Self::Setup(err)
    }
}

impl From<ConfigError> for SessionError {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}

impl From<StoreError> for SessionError {
    fn from(err: StoreError) -> Self {
        Self::Store(err)
    }
}

/// A persisted game session.
pub struct GameSession<S: SnapshotStore> {
    store: S,
    state: Option<GameState>,
    observer: Box<dyn GameObserver>,
}

impl<S: SnapshotStore> std::fmt::Debug for GameSession<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameSession")
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl<S: SnapshotStore> GameSession<S> {
    /// Opens a session, resuming whatever game the store holds.
    #[instrument(skip(store))]
    pub fn open(store: S) -> Result<Self, SessionError> {
        let state = store.load()?;
        info!(resumed = state.is_some(), "Session opened");
        Ok(Self {
            store,
            state,
            observer: Box::new(NoopObserver),
        })
    }

    /// Routes game events to `observer`.
    pub fn with_observer(mut self, observer: Box<dyn GameObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Current game, if one is in progress.
    pub fn state(&self) -> Option<&GameState> {
        self.state.as_ref()
    }

    /// Backing store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Starts a new game, replacing any current one.
    pub fn start(
        &mut self,
        teams: Vec<TeamConfig>,
        rules: Rules,
    ) -> Result<&GameState, SessionError> {
        let state = lifecycle::initialize_with(teams, rules)?;
        self.commit(state)
    }

    /// Starts a new game from a roster file's contents.
    pub fn start_roster(&mut self, roster: &RosterConfig) -> Result<&GameState, SessionError> {
        self.start(roster.team_configs()?, *roster.rules())
    }

    /// Chooses which team moves first.
    pub fn set_first_turn(&mut self, team: &TeamId) -> Result<&GameState, SessionError> {
        let state = lifecycle::set_first_turn(self.take()?, team);
        self.commit(state)
    }

    /// Applies a resolved move.
    pub fn move_piece(
        &mut self,
        piece: &PieceId,
        target: Option<NodeId>,
        is_goal: bool,
    ) -> Result<&GameState, SessionError> {
        let state = self
            .take()?
            .apply_move_observed(piece, target, is_goal, self.observer.as_mut());
        self.commit(state)
    }

    /// Resolves `steps` from the piece's position and applies the result.
    ///
    /// Returns the path walked. An empty path, an unknown piece or a finished
    /// piece leaves the game untouched.
    #[instrument(skip(self), fields(piece = %piece))]
    pub fn move_by(
        &mut self,
        piece: &PieceId,
        steps: i32,
        exit: CenterExit,
    ) -> Result<ResolvedPath, SessionError> {
        let state = self.state.as_ref().ok_or(SessionError::NoGame)?;
        let Some(from) = state.piece(piece).filter(|p| !p.is_finished()).map(|p| p.node()) else {
            debug!("Piece not movable");
            return Ok(ResolvedPath::default());
        };

        let resolved = resolve_path_with(from, steps, exit);
        if resolved.is_noop() {
            debug!("No movement possible");
            return Ok(resolved);
        }
        self.move_piece(piece, resolved.destination(), resolved.reaches_goal)?;
        Ok(resolved)
    }

    /// Free placement: snaps `(x, y)` to the nearest node and moves there.
    ///
    /// Returns the node snapped to. A drop with no node in range cancels the
    /// move.
    #[instrument(skip(self), fields(piece = %piece))]
    pub fn place_at(
        &mut self,
        piece: &PieceId,
        x: f64,
        y: f64,
    ) -> Result<Option<NodeId>, SessionError> {
        if self.state.is_none() {
            return Err(SessionError::NoGame);
        }
        let Some(node) = nearest_node(x, y).map(|n| n.id()) else {
            debug!("Drop outside snap radius, move cancelled");
            return Ok(None);
        };
        self.move_piece(piece, Some(node), false)?;
        Ok(Some(node))
    }

    /// Passes the turn.
    pub fn advance_turn(&mut self) -> Result<&GameState, SessionError> {
        let state = self.take()?.advance_turn();
        self.commit(state)
    }

    /// Restarts with the same roster.
    pub fn restart(&mut self) -> Result<&GameState, SessionError> {
        let state = self.state.as_ref().ok_or(SessionError::NoGame)?;
        let fresh = lifecycle::restart(state);
        self.commit(fresh)
    }

    /// Discards the game and its snapshot.
    pub fn reset(&mut self) -> Result<(), SessionError> {
        if let Some(state) = self.state.take() {
            lifecycle::reset(state);
        }
        self.store.clear()?;
        info!("Session reset");
        Ok(())
    }

    fn take(&mut self) -> Result<GameState, SessionError> {
        self.state.take().ok_or(SessionError::NoGame)
    }

    fn commit(&mut self, state: GameState) -> Result<&GameState, SessionError> {
        let saved = self.store.save(&state);
        let state = self.state.insert(state);
        saved?;
        Ok(&*state)
    }
}
