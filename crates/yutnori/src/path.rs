//! Branching path resolution over the yutnori track.
//!
//! Track selection is a small finite-state machine: a piece is always on one
//! of four fixed waypoint lists, and [`Track::advance`] is the only place that
//! decides where the next step goes. A piece standing on a corner or on the
//! center picks its track from where it stands ([`Cursor::entering`]); a piece
//! passing over a junction mid-move stays on the track it is already on.

use crate::board::{NodeId, get_node};
use derive_new::new;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

const fn n(index: u8) -> NodeId {
    match NodeId::new(index) {
        Some(id) => id,
        None => panic!("node index out of range"),
    }
}

/// Outer loop: start corner round to the last perimeter node.
const OUTER: [NodeId; 20] = [
    n(0),
    n(1),
    n(2),
    n(3),
    n(4),
    n(5),
    n(6),
    n(7),
    n(8),
    n(9),
    n(10),
    n(11),
    n(12),
    n(13),
    n(14),
    n(15),
    n(16),
    n(17),
    n(18),
    n(19),
];

/// Opposite corner through the center, then home toward the start.
const DIAGONAL_1: [NodeId; 6] = [n(10), n(23), n(22), n(24), n(21), n(20)];

/// First corner through the center, then home toward the start.
const DIAGONAL_2: [NodeId; 6] = [n(5), n(25), n(26), n(24), n(21), n(20)];

/// Center out toward the third corner, rejoining the outer loop there.
const CENTER_BRANCH: [NodeId; 3] = [n(24), n(27), n(28)];

/// Where the center branch rejoins the outer loop (the third corner).
const CENTER_BRANCH_REJOIN: usize = 15;

/// Predecessor of every node for a single backward step, indexed by node.
const REVERSE: [NodeId; 29] = [
    n(19), // n0 wraps to the last perimeter node
    n(0),
    n(1),
    n(2),
    n(3),
    n(4),
    n(5),
    n(6),
    n(7),
    n(8),
    n(9),
    n(10),
    n(11),
    n(12),
    n(13),
    n(14),
    n(15),
    n(16),
    n(17),
    n(18),
    n(21), // n20
    n(24), // n21
    n(23), // n22
    n(10), // n23
    n(22), // n24 backs down the default diagonal
    n(5),  // n25
    n(25), // n26
    n(24), // n27
    n(27), // n28
];

/// One of the fixed waypoint sequences a piece can travel.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::EnumIter,
    strum::Display,
)]
pub enum Track {
    /// The 20-node perimeter loop.
    Outer,
    /// Shortcut from the opposite corner through the center to the start.
    Diagonal1,
    /// Shortcut from the first corner through the center to the start.
    Diagonal2,
    /// Center toward the third corner, then back on the outer loop.
    CenterBranch,
}

/// Result of advancing one step along a track.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// The step lands on this position.
    To(Cursor),
    /// The step reaches or passes the start corner: the piece finishes.
    Goal,
    /// No successor exists for this position.
    Stuck,
}

impl Track {
    /// Ordered waypoints of the track.
    pub fn waypoints(self) -> &'static [NodeId] {
        match self {
            Track::Outer => &OUTER,
            Track::Diagonal1 => &DIAGONAL_1,
            Track::Diagonal2 => &DIAGONAL_2,
            Track::CenterBranch => &CENTER_BRANCH,
        }
    }

    /// Pure transition `(track, index) -> next`.
    pub fn advance(self, index: usize) -> Advance {
        let len = self.waypoints().len();
        if index >= len {
            return Advance::Stuck;
        }
        if index + 1 < len {
            return Advance::To(Cursor::new(self, index + 1));
        }
        match self {
            // Stepping off the last node of these tracks lands on the start corner.
            Track::Outer | Track::Diagonal1 | Track::Diagonal2 => Advance::Goal,
            Track::CenterBranch => Advance::To(Cursor::new(Track::Outer, CENTER_BRANCH_REJOIN)),
        }
    }
}

/// Which way a piece standing on the center continues.
///
/// Real players may choose; the engine's contractual default is
/// [`CenterExit::TowardStart`].
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, strum::EnumIter,
)]
pub enum CenterExit {
    /// Continue down the diagonal tail to the start corner and the goal.
    #[default]
    TowardStart,
    /// Head out to the third corner and finish along the outer loop.
    TowardThirdCorner,
}

/// A position on a specific track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, new)]
pub struct Cursor {
    track: Track,
    index: usize,
}

impl Cursor {
    /// Track this cursor is on.
    pub fn track(&self) -> Track {
        self.track
    }

    /// Index into the track's waypoints.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Node under the cursor, if the index is in range.
    pub fn node(&self) -> Option<NodeId> {
        self.track.waypoints().get(self.index).copied()
    }

    /// Advances one step.
    pub fn advance(&self) -> Advance {
        self.track.advance(self.index)
    }

    /// Selects the track for a piece standing on `node`.
    ///
    /// The first and opposite corners switch onto their diagonals; the other
    /// perimeter nodes stay on the outer loop. The shared tail below the
    /// center belongs to [`Track::Diagonal1`].
    pub fn entering(node: NodeId, exit: CenterExit) -> Cursor {
        if node == NodeId::FIRST_CORNER {
            return Cursor::new(Track::Diagonal2, 0);
        }
        if node == NodeId::OPPOSITE_CORNER {
            return Cursor::new(Track::Diagonal1, 0);
        }
        if node == NodeId::CENTER {
            return match exit {
                CenterExit::TowardStart => Cursor::new(Track::Diagonal1, 3),
                CenterExit::TowardThirdCorner => Cursor::new(Track::CenterBranch, 0),
            };
        }

        for track in [Track::Outer, Track::Diagonal1, Track::Diagonal2, Track::CenterBranch] {
            if let Some(index) = track.waypoints().iter().position(|&w| w == node) {
                return Cursor::new(track, index);
            }
        }

        // Every node appears on some track above.
        unreachable!("node {node} is not on any track")
    }
}

/// Single backward step from a node.
pub fn step_back(node: NodeId) -> NodeId {
    REVERSE[node.index()]
}

/// One element of a resolved path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PathStep {
    /// The piece passes through or stops on this node.
    Node(NodeId),
    /// The piece completes the circuit; the walk ends here.
    Goal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WalkMode {
    FromHome,
    Forward(Cursor),
    Backward(NodeId),
    Done,
}

/// Lazy walk over the nodes a move passes through.
///
/// Cloning a walk restarts it from the same point; two walks built from the
/// same inputs always yield the same steps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathWalk {
    mode: WalkMode,
    remaining: u32,
}

impl Iterator for PathWalk {
    type Item = PathStep;

    fn next(&mut self) -> Option<PathStep> {
        if self.remaining == 0 {
            return None;
        }

        match self.mode {
            WalkMode::Done => None,
            WalkMode::FromHome => {
                // Entering the board always lands on the first perimeter node.
                let cursor = Cursor::new(Track::Outer, 1);
                self.remaining -= 1;
                self.mode = WalkMode::Forward(cursor);
                cursor.node().map(PathStep::Node)
            }
            WalkMode::Backward(node) => {
                self.remaining = 0;
                self.mode = WalkMode::Done;
                Some(PathStep::Node(step_back(node)))
            }
            WalkMode::Forward(cursor) => match cursor.advance() {
                Advance::To(next) => match next.node() {
                    Some(node) => {
                        self.remaining -= 1;
                        self.mode = WalkMode::Forward(next);
                        Some(PathStep::Node(node))
                    }
                    None => self.stop(),
                },
                Advance::Goal => {
                    self.remaining = 0;
                    self.mode = WalkMode::Done;
                    Some(PathStep::Goal)
                }
                Advance::Stuck => self.stop(),
            },
        }
    }
}

impl PathWalk {
    fn stop(&mut self) -> Option<PathStep> {
        self.remaining = 0;
        self.mode = WalkMode::Done;
        None
    }

    fn empty() -> Self {
        Self {
            mode: WalkMode::Done,
            remaining: 0,
        }
    }
}

/// Starts a lazy walk from `from` (`None` = home) for a signed step count.
///
/// Only `-1` is accepted as a backward count; zero, other negatives, and a
/// backward step from home yield an empty walk.
pub fn walk(from: Option<NodeId>, steps: i32, exit: CenterExit) -> PathWalk {
    match (from, steps) {
        (_, 0) => PathWalk::empty(),
        (Some(node), -1) => PathWalk {
            mode: WalkMode::Backward(node),
            remaining: 1,
        },
        (None, -1) => PathWalk::empty(),
        (_, s) if s < -1 => PathWalk::empty(),
        (None, s) => PathWalk {
            mode: WalkMode::FromHome,
            remaining: s.unsigned_abs(),
        },
        (Some(node), s) => PathWalk {
            mode: WalkMode::Forward(Cursor::entering(node, exit)),
            remaining: s.unsigned_abs(),
        },
    }
}

/// A fully resolved move path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResolvedPath {
    /// Nodes passed through, excluding the starting node, in order.
    pub path: Vec<NodeId>,
    /// Whether the walk ended at the goal.
    pub reaches_goal: bool,
}

impl ResolvedPath {
    /// Final node a piece stops on, or `None` when the move finishes or is empty.
    pub fn destination(&self) -> Option<NodeId> {
        if self.reaches_goal {
            None
        } else {
            self.path.last().copied()
        }
    }

    /// Whether no movement is possible at all.
    pub fn is_noop(&self) -> bool {
        self.path.is_empty() && !self.reaches_goal
    }

    /// Path as steps, ending with [`PathStep::Goal`] when the circuit completes.
    pub fn steps(&self) -> Vec<PathStep> {
        let mut steps: Vec<PathStep> = self.path.iter().copied().map(PathStep::Node).collect();
        if self.reaches_goal {
            steps.push(PathStep::Goal);
        }
        steps
    }
}

impl FromIterator<PathStep> for ResolvedPath {
    fn from_iter<I: IntoIterator<Item = PathStep>>(iter: I) -> Self {
        let mut resolved = ResolvedPath::default();
        for step in iter {
            match step {
                PathStep::Node(node) => resolved.path.push(node),
                PathStep::Goal => {
                    resolved.reaches_goal = true;
                    break;
                }
            }
        }
        resolved
    }
}

/// Resolves a move using the default center continuation.
#[instrument]
pub fn resolve_path(from: Option<NodeId>, steps: i32) -> ResolvedPath {
    resolve_path_with(from, steps, CenterExit::default())
}

/// Resolves a move with an explicit center continuation.
#[instrument]
pub fn resolve_path_with(from: Option<NodeId>, steps: i32, exit: CenterExit) -> ResolvedPath {
    let resolved: ResolvedPath = walk(from, steps, exit).collect();
    debug!(
        path = ?resolved.path,
        reaches_goal = resolved.reaches_goal,
        destination = ?resolved.destination().map(|id| get_node(id).label_or_id()),
        "Resolved path"
    );
    resolved
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{NODE_COUNT, is_junction};

    fn id(s: &str) -> NodeId {
        s.parse().unwrap()
    }

    fn ids(list: &[&str]) -> Vec<NodeId> {
        list.iter().map(|s| id(s)).collect()
    }

    #[test]
    fn test_home_single_step() {
        let r = resolve_path(None, 1);
        assert_eq!(r.path, ids(&["n1"]));
        assert!(!r.reaches_goal);
    }

    #[test]
    fn test_home_mo_lands_on_first_corner() {
        let r = resolve_path(None, 5);
        assert_eq!(r.path, ids(&["n1", "n2", "n3", "n4", "n5"]));
        assert_eq!(r.destination(), Some(NodeId::FIRST_CORNER));
    }

    #[test]
    fn test_passing_corner_stays_outer() {
        let r = resolve_path(Some(id("n3")), 4);
        assert_eq!(r.path, ids(&["n4", "n5", "n6", "n7"]));
    }

    #[test]
    fn test_first_corner_takes_diagonal() {
        let r = resolve_path(Some(NodeId::FIRST_CORNER), 3);
        assert_eq!(r.path, ids(&["n25", "n26", "n24"]));
    }

    #[test]
    fn test_first_corner_diagonal_continues_through_center() {
        let r = resolve_path(Some(NodeId::FIRST_CORNER), 5);
        assert_eq!(r.path, ids(&["n25", "n26", "n24", "n21", "n20"]));
        assert!(!r.reaches_goal);
    }

    #[test]
    fn test_opposite_corner_takes_diagonal() {
        let r = resolve_path(Some(NodeId::OPPOSITE_CORNER), 4);
        assert_eq!(r.path, ids(&["n23", "n22", "n24", "n21"]));
    }

    #[test]
    fn test_third_corner_stays_outer() {
        let r = resolve_path(Some(NodeId::THIRD_CORNER), 2);
        assert_eq!(r.path, ids(&["n16", "n17"]));
    }

    #[test]
    fn test_center_default_heads_to_start() {
        let r = resolve_path(Some(NodeId::CENTER), 2);
        assert_eq!(r.path, ids(&["n21", "n20"]));
        let r = resolve_path(Some(NodeId::CENTER), 3);
        assert_eq!(r.path, ids(&["n21", "n20"]));
        assert!(r.reaches_goal);
    }

    #[test]
    fn test_center_explicit_third_corner_exit() {
        let r = resolve_path_with(Some(NodeId::CENTER), 5, CenterExit::TowardThirdCorner);
        assert_eq!(r.path, ids(&["n27", "n28", "n15", "n16", "n17"]));
    }

    #[test]
    fn test_center_branch_node_rejoins_outer() {
        let r = resolve_path(Some(id("n28")), 2);
        assert_eq!(r.path, ids(&["n15", "n16"]));
    }

    #[test]
    fn test_finish_truncates_remaining_steps() {
        let r = resolve_path(Some(id("n18")), 5);
        assert_eq!(r.path, ids(&["n19"]));
        assert!(r.reaches_goal);
        assert_eq!(r.destination(), None);
        assert_eq!(r.steps().last(), Some(&PathStep::Goal));
    }

    #[test]
    fn test_exact_landing_on_start_is_goal() {
        let r = resolve_path(Some(id("n19")), 1);
        assert!(r.path.is_empty());
        assert!(r.reaches_goal);
        assert!(!r.is_noop());
    }

    #[test]
    fn test_piece_on_start_corner_moves_outer() {
        let r = resolve_path(Some(NodeId::START), 2);
        assert_eq!(r.path, ids(&["n1", "n2"]));
    }

    #[test]
    fn test_back_from_start_wraps() {
        let r = resolve_path(Some(NodeId::START), -1);
        assert_eq!(r.path, ids(&["n19"]));
        assert!(!r.reaches_goal);
    }

    #[test]
    fn test_back_from_diagonal() {
        assert_eq!(resolve_path(Some(id("n25")), -1).path, ids(&["n5"]));
        assert_eq!(resolve_path(Some(id("n20")), -1).path, ids(&["n21"]));
        assert_eq!(resolve_path(Some(NodeId::CENTER), -1).path, ids(&["n22"]));
    }

    #[test]
    fn test_unsupported_step_counts_are_noops() {
        assert!(resolve_path(None, -1).is_noop());
        assert!(resolve_path(Some(id("n3")), 0).is_noop());
        assert!(resolve_path(Some(id("n3")), -2).is_noop());
    }

    #[test]
    fn test_advance_past_end_is_stuck() {
        assert_eq!(Track::Diagonal1.advance(6), Advance::Stuck);
        assert_eq!(Track::Outer.advance(19), Advance::Goal);
        assert_eq!(
            Track::CenterBranch.advance(2),
            Advance::To(Cursor::new(Track::Outer, 15))
        );
    }

    #[test]
    fn test_every_node_has_a_track() {
        for node in NodeId::all() {
            let cursor = Cursor::entering(node, CenterExit::default());
            assert_eq!(cursor.node(), Some(node));
        }
    }

    #[test]
    fn test_walk_is_restartable() {
        let walk = walk(Some(NodeId::OPPOSITE_CORNER), 5, CenterExit::default());
        let first: Vec<PathStep> = walk.clone().collect();
        let second: Vec<PathStep> = walk.collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_resolution_is_deterministic() {
        for node in NodeId::all() {
            for steps in [-1, 1, 2, 3, 4, 5] {
                assert_eq!(
                    resolve_path(Some(node), steps),
                    resolve_path(Some(node), steps)
                );
            }
        }
    }

    #[test]
    fn test_forward_then_back_returns_home_node() {
        for node in NodeId::all() {
            let forward = resolve_path(Some(node), 1);
            let Some(next) = forward.destination() else {
                continue;
            };
            if is_junction(node) || is_junction(next) {
                continue;
            }
            let back = resolve_path(Some(next), -1);
            assert_eq!(back.destination(), Some(node), "from {node} via {next}");
        }
        assert_eq!(NODE_COUNT, REVERSE.len());
    }
}
