//! Plain-text views of a game.

use chrono::{DateTime, Utc};
use std::fmt::Write;
use yutnori::{
    BOARD_NODES, GameState, GameStatus, NodeId, PathStep, PieceId, ResolvedPath, format_elapsed,
    get_node, teams_at,
};

const GRID_COLS: usize = 25;
const GRID_ROWS: usize = 13;
const BOARD_MIN: f64 = 50.0;
const BOARD_SPAN: f64 = 500.0;

/// Turn, timer, and per-team progress and stats.
pub fn status_report(state: &GameState, now: DateTime<Utc>) -> String {
    let mut out = String::new();

    let headline = match (state.status(), state.winner(), state.current_turn()) {
        (_, Some(winner), _) => format!("🏆 {} won", state.team_display_name(winner)),
        (GameStatus::ChoosingFirstTurn, _, _) => "Choosing the first team".to_string(),
        (_, None, Some(team)) => format!("Turn: {}", state.team_display_name(team)),
        (_, None, None) => "Waiting".to_string(),
    };
    let _ = write!(out, "{}", headline);
    if state.bonus_throw_pending() {
        out.push_str(" (bonus throw)");
    }
    if let Some(elapsed) = state.elapsed(now) {
        let _ = write!(out, "  ⏱ {}", format_elapsed(elapsed));
    }
    out.push('\n');

    for team in state.teams() {
        let progress = state.progress(team.id());
        let stats = state.stats(team.id());
        let _ = writeln!(
            out,
            "{:<12} home {}  board {}  done {}/{}  | moves {}  captures {}  stacks {}",
            team.display_name(),
            progress.waiting,
            progress.active,
            progress.finished,
            progress.total(),
            stats.move_count,
            stats.capture_count,
            stats.stack_count,
        );
        for piece in state.pieces_of(team.id()) {
            let place = match (piece.is_finished(), piece.node()) {
                (true, _) => "finished".to_string(),
                (false, None) => "home".to_string(),
                (false, Some(node)) => get_node(node).label_or_id(),
            };
            let _ = writeln!(out, "    {:<10} {}", piece.id(), place);
        }
    }
    out
}

/// The board as a character grid: `.` node, `+` corner, `*` center,
/// a team's initial where its pieces stand, `#` where teams share a node.
pub fn board_grid(state: &GameState) -> String {
    let mut grid = vec![vec![' '; GRID_COLS]; GRID_ROWS];

    for node in BOARD_NODES.iter() {
        let col = scale(node.x(), GRID_COLS);
        let row = scale(node.y(), GRID_ROWS);
        grid[row][col] = match teams_at(state.pieces(), node.id()).as_slice() {
            [] if node.is_center() => '*',
            [] if node.is_corner() => '+',
            [] => '.',
            [team] => team
                .as_str()
                .chars()
                .next()
                .map(|c| c.to_ascii_uppercase())
                .unwrap_or('?'),
            _ => '#',
        };
    }

    let mut out: String = grid
        .into_iter()
        .map(|row| row.into_iter().collect::<String>().trim_end().to_string())
        .collect::<Vec<_>>()
        .join("\n");
    out.push('\n');

    for ((node, team), pieces) in state.stacks() {
        let _ = writeln!(
            out,
            "  {:<4} {} x{}",
            get_node(node).label_or_id(),
            state.team_display_name(&team),
            pieces.len()
        );
    }
    out
}

/// `home → n1 → n2 → n3`, ending in `GOAL` when the circuit completes.
pub fn path_line(from: Option<NodeId>, resolved: &ResolvedPath) -> String {
    if resolved.is_noop() {
        return "no movement possible".to_string();
    }
    let mut parts = vec![from.map(|n| n.to_string()).unwrap_or_else(|| "home".to_string())];
    parts.extend(resolved.steps().into_iter().map(|step| match step {
        PathStep::Node(node) => node.to_string(),
        PathStep::Goal => "GOAL".to_string(),
    }));
    parts.join(" → ")
}

/// Note for a placement that left the game as it was, if it did.
///
/// Rejections that explain themselves in the log get no note.
pub fn unchanged_note(before: &GameState, after: &GameState, piece: &PieceId) -> Option<String> {
    let unchanged = before.pieces() == after.pieces() && before.logs().len() == after.logs().len();
    unchanged.then(|| format!("No movement possible for {}", piece))
}

fn scale(coord: f64, cells: usize) -> usize {
    let unit = (coord - BOARD_MIN) / BOARD_SPAN;
    let cell = (unit * (cells - 1) as f64).round();
    (cell.max(0.0) as usize).min(cells - 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use yutnori::{TeamConfig, TeamId, initialize, resolve_path, set_first_turn};

    fn game() -> GameState {
        let teams = vec![TeamConfig::preset(0).unwrap(), TeamConfig::preset(1).unwrap()];
        set_first_turn(initialize(teams).unwrap(), &TeamId::new("blue"))
    }

    #[test]
    fn test_every_node_gets_its_own_cell() {
        let mut cells: Vec<(usize, usize)> = BOARD_NODES
            .iter()
            .map(|n| (scale(n.y(), GRID_ROWS), scale(n.x(), GRID_COLS)))
            .collect();
        cells.sort();
        cells.dedup();
        assert_eq!(cells.len(), BOARD_NODES.len());
    }

    #[test]
    fn test_board_marks_pieces() {
        let state = game().apply_move(&PieceId::new("blue-0"), Some(NodeId::CENTER), false);
        let board = board_grid(&state);
        assert!(board.contains('B'));
        assert!(!board.contains('*'));
        assert!(board.contains("방"));
    }

    #[test]
    fn test_path_line() {
        assert_eq!(path_line(None, &resolve_path(None, 2)), "home → n1 → n2");
        let to_goal = resolve_path(Some("n19".parse().unwrap()), 2);
        assert_eq!(path_line("n19".parse().ok(), &to_goal), "n19 → GOAL");
        assert_eq!(path_line(None, &resolve_path(None, -1)), "no movement possible");
    }

    #[test]
    fn test_status_report_shows_turn() {
        let report = status_report(&game(), Utc::now());
        assert!(report.starts_with("Turn: 🔵 청팀"));
        assert!(report.contains("blue-3"));
    }

    #[test]
    fn test_placing_home_piece_at_home_is_noted() {
        let before = game();
        let piece = PieceId::new("blue-0");
        let after = before.clone().apply_move(&piece, None, false);
        assert_eq!(
            unchanged_note(&before, &after, &piece).as_deref(),
            Some("No movement possible for blue-0")
        );

        let moved = before.clone().apply_move(&piece, Some(NodeId::CENTER), false);
        assert_eq!(unchanged_note(&before, &moved, &piece), None);

        let out_of_turn = PieceId::new("red-0");
        let declined = before.clone().apply_move(&out_of_turn, None, false);
        assert_eq!(unchanged_note(&before, &declined, &out_of_turn), None);
    }
}
