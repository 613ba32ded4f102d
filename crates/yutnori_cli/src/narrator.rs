//! Commentary printed as game events happen.

use std::collections::BTreeMap;
use yutnori::{GameObserver, GameState, NodeId, PieceId, TeamId, get_node};

/// Observer that narrates moves, captures and finishes on stdout.
#[derive(Debug, Clone, Default)]
pub struct Narrator {
    names: BTreeMap<TeamId, String>,
    lines: Vec<String>,
    echo: bool,
}

impl Narrator {
    /// Narrator that prints as it goes, naming teams as in `state`.
    pub fn for_state(state: Option<&GameState>) -> Self {
        Self {
            names: team_names(state),
            lines: Vec::new(),
            echo: true,
        }
    }

    /// Lines narrated so far.
    #[cfg(test)]
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    fn name(&self, team: &TeamId) -> String {
        self.names
            .get(team)
            .cloned()
            .unwrap_or_else(|| team.to_string())
    }

    fn say(&mut self, line: String) {
        if self.echo {
            println!("{}", line);
        }
        self.lines.push(line);
    }
}

fn team_names(state: Option<&GameState>) -> BTreeMap<TeamId, String> {
    state
        .map(|s| {
            s.teams()
                .iter()
                .map(|t| (t.id().clone(), t.display_name()))
                .collect()
        })
        .unwrap_or_default()
}

fn place(node: Option<NodeId>) -> String {
    node.map(|id| get_node(id).label_or_id())
        .unwrap_or_else(|| "home".to_string())
}

impl GameObserver for Narrator {
    fn on_move(
        &mut self,
        team: &TeamId,
        pieces: &[PieceId],
        from: Option<NodeId>,
        to: Option<NodeId>,
    ) {
        let who = self.name(team);
        let what = if pieces.len() > 1 {
            format!("a stack of {}", pieces.len())
        } else {
            "a piece".to_string()
        };
        self.say(format!("{} moves {} from {} to {}", who, what, place(from), place(to)));
    }

    fn on_stack(&mut self, team: &TeamId, node: NodeId, size: usize) {
        let who = self.name(team);
        let at = place(Some(node));
        self.say(format!("🤝 {} piggybacks at {}: {} pieces ride together", who, at, size));
    }

    fn on_capture(&mut self, capturing: &TeamId, captured: &TeamId, count: usize) {
        let (hunter, victim) = (self.name(capturing), self.name(captured));
        let line = match count {
            1 => format!("💥 {} catches {}! One piece goes home.", hunter, victim),
            n => format!("💥 {} catches {}! {} pieces go home.", hunter, victim, n),
        };
        self.say(line);
    }

    fn on_finish(&mut self, team: &TeamId, count: usize) {
        let who = self.name(team);
        let what = match count {
            1 => "a piece".to_string(),
            n => format!("{} pieces", n),
        };
        self.say(format!("🏁 {} brings {} across the goal!", who, what));
    }

    fn on_game_complete(&mut self, winner: &TeamId) {
        let who = self.name(winner);
        self.say(format!("🏆 {} wins!", who));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use yutnori::{TeamConfig, initialize, set_first_turn};

    fn game() -> GameState {
        let teams = vec![TeamConfig::preset(0).unwrap(), TeamConfig::preset(1).unwrap()];
        set_first_turn(initialize(teams).unwrap(), &TeamId::new("blue"))
    }

    fn quiet(state: &GameState) -> Narrator {
        Narrator {
            echo: false,
            ..Narrator::for_state(Some(state))
        }
    }

    #[test]
    fn test_narrates_capture_with_team_names() {
        let state = game();
        let mut narrator = quiet(&state);
        let n2 = "n2".parse().ok();
        let state = state
            .apply_move_observed(&PieceId::new("blue-0"), n2, false, &mut narrator)
            .advance_turn();
        let _ = state.apply_move_observed(&PieceId::new("red-0"), n2, false, &mut narrator);

        let lines = narrator.lines();
        assert_eq!(lines.len(), 3);
        assert!(lines[2].starts_with("💥 🔴 홍팀 catches 🔵 청팀!"));
    }

    #[test]
    fn test_goal_move_is_not_narrated_as_going_home() {
        let state = game().apply_move(&PieceId::new("blue-0"), "n19".parse().ok(), false);
        let mut narrator = quiet(&state);
        let _ = state.apply_move_observed(&PieceId::new("blue-0"), None, true, &mut narrator);

        assert_eq!(narrator.lines(), ["🏁 🔵 청팀 brings a piece across the goal!"]);
    }
}
