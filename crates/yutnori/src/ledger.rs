//! The turn and piece ledger: the only authority that mutates game state.
//!
//! Every move resolves relocation, stacking, capture and the win check
//! inside one call; callers never observe a half-applied move.

use crate::action::{Capture, MoveRejection, MoveReport, MoveRequest};
use crate::board::{NodeId, get_node};
use crate::contracts::{Contract, MoveContract};
use crate::events::{GameEvent, GameObserver, NoopObserver};
use crate::stacks::{StackKey, group_stacks, stack_at};
use crate::types::{
    GameStatus, Piece, PieceId, Rules, TeamConfig, TeamId, TeamProgress, TeamStats,
};
use chrono::{DateTime, TimeDelta, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, instrument, warn};

/// Complete, serializable game state.
///
/// This is the snapshot a storage collaborator persists after each call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct GameState {
    pub(crate) teams: Vec<TeamConfig>,
    pub(crate) pieces: Vec<Piece>,
    pub(crate) logs: Vec<String>,
    pub(crate) current_turn: Option<TeamId>,
    pub(crate) winner: Option<TeamId>,
    pub(crate) stats: BTreeMap<TeamId, TeamStats>,
    pub(crate) status: GameStatus,
    /// Epoch milliseconds when the first turn was chosen.
    #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
    #[schemars(with = "Option<i64>")]
    pub(crate) start_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub(crate) rules: Rules,
    #[serde(default)]
    pub(crate) bonus_throw_pending: bool,
}

impl GameState {
    /// Fresh state: every piece at home, zeroed stats, first turn not chosen.
    ///
    /// The roster is assumed valid; see [`crate::initialize`].
    pub(crate) fn fresh(teams: Vec<TeamConfig>, rules: Rules) -> Self {
        let mut pieces = Vec::new();
        let mut stats = BTreeMap::new();
        for team in &teams {
            for index in 0..*team.piece_count() as usize {
                pieces.push(Piece::at_home(
                    PieceId::for_team(team.id(), index),
                    team.id().clone(),
                ));
            }
            stats.insert(team.id().clone(), TeamStats::default());
        }

        let names = teams
            .iter()
            .map(TeamConfig::display_name)
            .collect::<Vec<_>>()
            .join(" vs ");

        Self {
            teams,
            pieces,
            logs: vec![format!("Game start! {}", names)],
            current_turn: None,
            winner: None,
            stats,
            status: GameStatus::ChoosingFirstTurn,
            start_time: None,
            rules,
            bonus_throw_pending: false,
        }
    }

    // ─────────────────────────────────────────────────────────────
    //  Read access
    // ─────────────────────────────────────────────────────────────

    /// Team roster in turn order.
    pub fn teams(&self) -> &[TeamConfig] {
        &self.teams
    }

    /// Every piece, grouped by team in roster order.
    pub fn pieces(&self) -> &[Piece] {
        &self.pieces
    }

    /// Append-only human-readable log.
    pub fn logs(&self) -> &[String] {
        &self.logs
    }

    /// Team holding the turn; `None` until the first turn is chosen.
    pub fn current_turn(&self) -> Option<&TeamId> {
        self.current_turn.as_ref()
    }

    /// Winning team, once the game is over.
    pub fn winner(&self) -> Option<&TeamId> {
        self.winner.as_ref()
    }

    /// Lifecycle status.
    pub fn status(&self) -> GameStatus {
        self.status
    }

    /// When the first turn was chosen.
    pub fn start_time(&self) -> Option<DateTime<Utc>> {
        self.start_time
    }

    /// Active rule switches.
    pub fn rules(&self) -> Rules {
        self.rules
    }

    /// Whether the current team has an unspent bonus throw.
    pub fn bonus_throw_pending(&self) -> bool {
        self.bonus_throw_pending
    }

    /// Whether a winner exists.
    pub fn is_over(&self) -> bool {
        self.winner.is_some()
    }

    /// Stats of every team.
    pub fn all_stats(&self) -> &BTreeMap<TeamId, TeamStats> {
        &self.stats
    }

    /// Stats of one team (zeroed if unknown).
    pub fn stats(&self, team: &TeamId) -> TeamStats {
        self.stats.get(team).copied().unwrap_or_default()
    }

    /// Looks up a team.
    pub fn team(&self, id: &TeamId) -> Option<&TeamConfig> {
        self.teams.iter().find(|t| t.id() == id)
    }

    /// Looks up a piece.
    pub fn piece(&self, id: &PieceId) -> Option<&Piece> {
        self.pieces.iter().find(|p| p.id() == id)
    }

    /// Pieces of one team.
    pub fn pieces_of<'a>(&'a self, team: &'a TeamId) -> impl Iterator<Item = &'a Piece> + 'a {
        self.pieces.iter().filter(move |p| p.team() == team)
    }

    /// Waiting / active / finished counts for a team.
    pub fn progress(&self, team: &TeamId) -> TeamProgress {
        self.pieces_of(team)
            .fold(TeamProgress::default(), |mut progress, piece| {
                if piece.is_finished() {
                    progress.finished += 1;
                } else if piece.is_on_track() {
                    progress.active += 1;
                } else {
                    progress.waiting += 1;
                }
                progress
            })
    }

    /// Current stacks keyed by node and team.
    pub fn stacks(&self) -> BTreeMap<StackKey, Vec<&Piece>> {
        group_stacks(&self.pieces)
    }

    /// Pieces of `team` on `node`.
    pub fn stack_at(&self, node: NodeId, team: &TeamId) -> Vec<&Piece> {
        stack_at(&self.pieces, node, team)
    }

    /// Time since the first turn was chosen.
    pub fn elapsed(&self, now: DateTime<Utc>) -> Option<TimeDelta> {
        self.start_time.map(|start| now - start)
    }

    /// Emoji and name of a team, falling back to the raw id.
    pub fn team_display_name(&self, id: &TeamId) -> String {
        self.team(id)
            .map(TeamConfig::display_name)
            .unwrap_or_else(|| id.to_string())
    }

    // ─────────────────────────────────────────────────────────────
    //  Moves
    // ─────────────────────────────────────────────────────────────

    /// Applies a resolved move; rejected moves leave the state as it was.
    ///
    /// An out-of-turn move, or a move before the first turn is chosen,
    /// appends one advisory log line. Every other rejection is silent.
    pub fn apply_move(self, piece: &PieceId, target: Option<NodeId>, is_goal: bool) -> Self {
        self.apply_move_observed(piece, target, is_goal, &mut NoopObserver)
    }

    /// [`GameState::apply_move`], reporting events to `observer`.
    pub fn apply_move_observed(
        mut self,
        piece: &PieceId,
        target: Option<NodeId>,
        is_goal: bool,
        observer: &mut dyn GameObserver,
    ) -> Self {
        let request = MoveRequest::new(piece.clone(), target, is_goal);
        match self.try_apply_move(&request) {
            Ok(report) => {
                for event in GameEvent::from_report(&report) {
                    event.dispatch(observer);
                }
            }
            Err(rejection) => self.note_rejection(&rejection),
        }
        self
    }

    /// Applies a move request, reporting exactly what changed.
    ///
    /// # Errors
    ///
    /// Returns the [`MoveRejection`] when a precondition fails. Postconditions
    /// are checked in debug builds; a violation rolls the state back.
    #[instrument(
        skip(self),
        fields(piece = %request.piece, target = ?request.target, is_goal = request.is_goal)
    )]
    pub fn try_apply_move(&mut self, request: &MoveRequest) -> Result<MoveReport, MoveRejection> {
        MoveContract::pre(self, request)?;

        let Some(index) = self.pieces.iter().position(|p| p.id() == &request.piece) else {
            return Err(MoveRejection::UnknownPiece(request.piece.clone()));
        };

        #[cfg(debug_assertions)]
        let before = self.clone();

        let report = self.resolve_move(index, request);

        #[cfg(debug_assertions)]
        {
            if let Err(violation) = MoveContract::post(&before, self) {
                tracing::error!(%violation, "Move broke a ledger invariant, rolling back");
                *self = before;
                return Err(violation);
            }
        }

        Ok(report)
    }

    fn resolve_move(&mut self, index: usize, request: &MoveRequest) -> MoveReport {
        let team = self.pieces[index].team().clone();
        let origin = self.pieces[index].node();

        // Pieces at home always move alone; on the board the whole stack travels.
        let moving: Vec<usize> = match origin {
            None => vec![index],
            Some(node) => self
                .pieces
                .iter()
                .enumerate()
                .filter(|(_, p)| p.team() == &team && p.is_on_track() && p.node() == Some(node))
                .map(|(i, _)| i)
                .collect(),
        };
        let moved: Vec<PieceId> = moving.iter().map(|&i| self.pieces[i].id().clone()).collect();
        let team_name = self.team_display_name(&team);

        let mut report = MoveReport {
            team: team.clone(),
            moved: moved.clone(),
            from: origin,
            to: None,
            finished: false,
            stacked: false,
            stack_size: 0,
            captures: Vec::new(),
            winner: None,
        };

        if request.is_goal {
            for &i in &moving {
                self.pieces[i].finish();
            }
            let stats = self.stats_mut(&team);
            stats.move_count += 1;
            stats.finished_count += moving.len() as u32;
            report.finished = true;
            self.log(format!("🏁 {} {} reached the goal", team_name, describe_pieces(&moved)));
        } else {
            let target = request.target;
            let merged = target.is_some_and(|node| {
                self.pieces.iter().enumerate().any(|(i, p)| {
                    !moving.contains(&i)
                        && p.team() == &team
                        && p.is_on_track()
                        && p.node() == Some(node)
                })
            });

            for &i in &moving {
                self.pieces[i].relocate(target);
            }
            report.to = target;
            if target != origin {
                self.stats_mut(&team).move_count += 1;
            }
            self.log(format!(
                "{} {} → {}",
                team_name,
                describe_pieces(&moved),
                place_label(target)
            ));

            if let Some(node) = target {
                if merged {
                    let size = stack_at(&self.pieces, node, &team).len();
                    self.stats_mut(&team).stack_count += 1;
                    report.stacked = true;
                    report.stack_size = size;
                    self.log(format!(
                        "🤝 {} stacked {} pieces at {}",
                        team_name,
                        size,
                        place_label(target)
                    ));
                }

                report.captures = self.capture_at(node, &team);
                if report.captured_any() {
                    self.stats_mut(&team).capture_count += 1;
                }
            }
        }

        let team_done = self.pieces_of(&team).all(Piece::is_finished);
        if team_done {
            self.winner = Some(team.clone());
            self.status = GameStatus::Finished;
            self.bonus_throw_pending = false;
            report.winner = Some(team.clone());
            self.log(format!("🏆 {} wins the game!", team_name));
        } else if self.rules.bonus_throw && (report.finished || report.captured_any()) {
            self.bonus_throw_pending = true;
            self.log(format!("🎁 {} earns a bonus throw", team_name));
        }

        debug!(
            team = %team,
            moved = moved.len(),
            stacked = report.stacked,
            captures = report.captures.len(),
            finished = report.finished,
            "Move resolved"
        );
        report
    }

    /// Sends opposing on-track pieces on `node` home, one capture per team.
    fn capture_at(&mut self, node: NodeId, mover: &TeamId) -> Vec<Capture> {
        let mover_name = self.team_display_name(mover);
        let opponents: Vec<TeamId> = self
            .teams
            .iter()
            .map(|t| t.id().clone())
            .filter(|id| id != mover)
            .collect();

        let mut captures = Vec::new();
        for opponent in opponents {
            let mut sent_home = Vec::new();
            for piece in self.pieces.iter_mut() {
                if piece.team() == &opponent && piece.is_on_track() && piece.node() == Some(node) {
                    piece.relocate(None);
                    sent_home.push(piece.id().clone());
                }
            }
            if sent_home.is_empty() {
                continue;
            }

            let opponent_name = self.team_display_name(&opponent);
            self.log(format!(
                "💥 {} caught {} of {}'s pieces at {}!",
                mover_name,
                sent_home.len(),
                opponent_name,
                place_label(Some(node))
            ));
            captures.push(Capture {
                team: opponent,
                pieces: sent_home,
            });
        }
        captures
    }

    fn note_rejection(&mut self, rejection: &MoveRejection) {
        match rejection {
            MoveRejection::WrongTeam { team, current } => {
                warn!(%team, %current, "Out-of-turn move declined");
                let line = format!(
                    "⚠️ It is {}'s turn; {} cannot move now",
                    self.team_display_name(current),
                    self.team_display_name(team)
                );
                self.log(line);
            }
            MoveRejection::NoTurnChosen => {
                warn!("Move attempted before the first turn was chosen");
                self.log("⚠️ Choose which team goes first before moving".to_string());
            }
            other => debug!(rejection = %other, "Move ignored"),
        }
    }

    // ─────────────────────────────────────────────────────────────
    //  Turns
    // ─────────────────────────────────────────────────────────────

    /// Passes the turn to the next team in roster order.
    ///
    /// No-op once a winner exists or before the first turn is chosen. With
    /// bonus throws enabled, a pending bonus is spent instead of passing.
    pub fn advance_turn(mut self) -> Self {
        self.pass_turn();
        self
    }

    /// In-place form of [`GameState::advance_turn`]; returns the team now holding the turn.
    #[instrument(skip(self), fields(current = ?self.current_turn))]
    pub fn pass_turn(&mut self) -> Option<TeamId> {
        if self.winner.is_some() {
            debug!("Turn change ignored, game is over");
            return None;
        }
        let current = self.current_turn.clone()?;
        if self.teams.is_empty() {
            return None;
        }

        if self.bonus_throw_pending {
            self.bonus_throw_pending = false;
            let line = format!("🎲 {} throws again", self.team_display_name(&current));
            self.log(line);
            return Some(current);
        }

        let position = self
            .teams
            .iter()
            .position(|t| t.id() == &current)
            .unwrap_or(0);
        let next = self.teams[(position + 1) % self.teams.len()].id().clone();
        self.current_turn = Some(next.clone());
        let line = format!("⏭️ {}'s turn", self.team_display_name(&next));
        self.log(line);
        Some(next)
    }

    // ─────────────────────────────────────────────────────────────
    //  Internals
    // ─────────────────────────────────────────────────────────────

    pub(crate) fn log(&mut self, line: String) {
        debug!(line = %line, "Game log");
        self.logs.push(line);
    }

    fn stats_mut(&mut self, team: &TeamId) -> &mut TeamStats {
        self.stats.entry(team.clone()).or_default()
    }
}

/// `"piece 2"` or `"pieces 1, 3"` for log lines.
fn describe_pieces(ids: &[PieceId]) -> String {
    let numbers: Vec<String> = ids
        .iter()
        .map(|id| id.number().map(|n| n.to_string()).unwrap_or_else(|| id.to_string()))
        .collect();
    match numbers.as_slice() {
        [one] => format!("piece {}", one),
        many => format!("pieces {}", many.join(", ")),
    }
}

/// Node label for log lines; `None` reads as home.
fn place_label(node: Option<NodeId>) -> String {
    node.map(|id| get_node(id).label_or_id())
        .unwrap_or_else(|| "home".to_string())
}
