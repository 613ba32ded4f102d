//! Discrete game events for narrators and analytics.
//!
//! Observers are optional; the ledger is correct without any.

use crate::action::MoveReport;
use crate::board::NodeId;
use crate::types::{PieceId, TeamId};
use serde::{Deserialize, Serialize};

/// Something notable that happened during a move.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GameEvent {
    /// A stack changed position without finishing.
    Moved {
        /// Moving team.
        team: TeamId,
        /// Pieces in the moving stack.
        pieces: Vec<PieceId>,
        /// Origin (`None` = home).
        from: Option<NodeId>,
        /// Destination (`None` = sent home).
        to: Option<NodeId>,
    },
    /// A stack landed on teammates and merged (업기).
    Stacked {
        /// Team that stacked.
        team: TeamId,
        /// Node of the merged stack.
        node: NodeId,
        /// Pieces in the merged stack.
        size: usize,
    },
    /// Opposing pieces were sent home.
    Captured {
        /// Team that landed on the node.
        capturing: TeamId,
        /// Team that lost pieces.
        captured: TeamId,
        /// Pieces sent home.
        count: usize,
    },
    /// Pieces completed the circuit.
    Finished {
        /// Team that finished pieces.
        team: TeamId,
        /// Pieces finished by this move.
        count: usize,
    },
    /// A team finished every piece.
    GameComplete {
        /// The winning team.
        winner: TeamId,
    },
}

/// Receives game events. Every hook defaults to doing nothing.
pub trait GameObserver {
    /// A stack moved.
    fn on_move(
        &mut self,
        _team: &TeamId,
        _pieces: &[PieceId],
        _from: Option<NodeId>,
        _to: Option<NodeId>,
    ) {
    }

    /// A stack merged onto teammates.
    fn on_stack(&mut self, _team: &TeamId, _node: NodeId, _size: usize) {}

    /// Opposing pieces were captured.
    fn on_capture(&mut self, _capturing: &TeamId, _captured: &TeamId, _count: usize) {}

    /// Pieces finished.
    fn on_finish(&mut self, _team: &TeamId, _count: usize) {}

    /// The game ended.
    fn on_game_complete(&mut self, _winner: &TeamId) {}
}

/// Observer that ignores everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl GameObserver for NoopObserver {}

impl GameEvent {
    /// Events implied by a move report, in the order they happened.
    pub fn from_report(report: &MoveReport) -> Vec<GameEvent> {
        let mut events = Vec::new();

        // A goal move is reported as `Finished` alone.
        if !report.finished {
            events.push(GameEvent::Moved {
                team: report.team.clone(),
                pieces: report.moved.clone(),
                from: report.from,
                to: report.to,
            });
        }

        if let (true, Some(node)) = (report.stacked, report.to) {
            events.push(GameEvent::Stacked {
                team: report.team.clone(),
                node,
                size: report.stack_size,
            });
        }

        for capture in &report.captures {
            events.push(GameEvent::Captured {
                capturing: report.team.clone(),
                captured: capture.team.clone(),
                count: capture.count(),
            });
        }

        if report.finished {
            events.push(GameEvent::Finished {
                team: report.team.clone(),
                count: report.moved.len(),
            });
        }

        if let Some(winner) = &report.winner {
            events.push(GameEvent::GameComplete {
                winner: winner.clone(),
            });
        }

        events
    }

    /// Calls the matching observer hook.
    pub fn dispatch(&self, observer: &mut dyn GameObserver) {
        match self {
            GameEvent::Moved {
                team,
                pieces,
                from,
                to,
            } => observer.on_move(team, pieces, *from, *to),
            GameEvent::Stacked { team, node, size } => observer.on_stack(team, *node, *size),
            GameEvent::Captured {
                capturing,
                captured,
                count,
            } => observer.on_capture(capturing, captured, *count),
            GameEvent::Finished { team, count } => observer.on_finish(team, *count),
            GameEvent::GameComplete { winner } => observer.on_game_complete(winner),
        }
    }
}

/// Observer that records every event, in order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventRecorder {
    events: Vec<GameEvent>,
}

impl EventRecorder {
    /// Creates an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorded events.
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    /// Takes the recorded events, leaving the recorder empty.
    pub fn drain(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

impl GameObserver for EventRecorder {
    fn on_move(
        &mut self,
        team: &TeamId,
        pieces: &[PieceId],
        from: Option<NodeId>,
        to: Option<NodeId>,
    ) {
        self.events.push(GameEvent::Moved {
            team: team.clone(),
            pieces: pieces.to_vec(),
            from,
            to,
        });
    }

    fn on_stack(&mut self, team: &TeamId, node: NodeId, size: usize) {
        self.events.push(GameEvent::Stacked {
            team: team.clone(),
            node,
            size,
        });
    }

    fn on_capture(&mut self, capturing: &TeamId, captured: &TeamId, count: usize) {
        self.events.push(GameEvent::Captured {
            capturing: capturing.clone(),
            captured: captured.clone(),
            count,
        });
    }

    fn on_finish(&mut self, team: &TeamId, count: usize) {
        self.events.push(GameEvent::Finished {
            team: team.clone(),
            count,
        });
    }

    fn on_game_complete(&mut self, winner: &TeamId) {
        self.events.push(GameEvent::GameComplete {
            winner: winner.clone(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::Capture;

    fn report() -> MoveReport {
        MoveReport {
            team: TeamId::new("blue"),
            moved: vec![PieceId::new("blue-0"), PieceId::new("blue-1")],
            from: "n3".parse().ok(),
            to: "n7".parse().ok(),
            finished: false,
            stacked: true,
            stack_size: 3,
            captures: vec![Capture {
                team: TeamId::new("red"),
                pieces: vec![PieceId::new("red-0"), PieceId::new("red-2")],
            }],
            winner: None,
        }
    }

    #[test]
    fn test_events_from_report_order() {
        let events = GameEvent::from_report(&report());
        assert_eq!(events.len(), 3);
        assert!(matches!(events[0], GameEvent::Moved { .. }));
        assert!(matches!(events[1], GameEvent::Stacked { size: 3, .. }));
        assert!(matches!(events[2], GameEvent::Captured { count: 2, .. }));
    }

    #[test]
    fn test_goal_move_reports_finish_without_move() {
        let goal = MoveReport {
            from: "n19".parse().ok(),
            to: None,
            finished: true,
            stacked: false,
            stack_size: 0,
            captures: Vec::new(),
            ..report()
        };
        let events = GameEvent::from_report(&goal);
        assert_eq!(
            events,
            vec![GameEvent::Finished {
                team: TeamId::new("blue"),
                count: 2,
            }]
        );
    }

    #[test]
    fn test_recorder_round_trips_dispatch() {
        let events = GameEvent::from_report(&report());
        let mut recorder = EventRecorder::new();
        for event in &events {
            event.dispatch(&mut recorder);
        }
        assert_eq!(recorder.events(), events.as_slice());
        assert_eq!(recorder.drain().len(), 3);
        assert!(recorder.events().is_empty());
    }

    #[test]
    fn test_event_json_is_tagged() {
        let event = GameEvent::Finished {
            team: TeamId::new("red"),
            count: 2,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["kind"], "finished");
        assert_eq!(json["count"], 2);
    }
}
