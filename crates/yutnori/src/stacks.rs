//! Stacks (업기) derived from the piece list.
//!
//! A stack is never stored: it is all non-finished pieces of one team on one
//! node, recomputed on demand so it cannot drift from the pieces.

use crate::board::NodeId;
use crate::types::{Piece, TeamId};
use std::collections::BTreeMap;

/// Key of a stack: the node and the owning team.
pub type StackKey = (NodeId, TeamId);

/// Groups on-track pieces by node and team.
pub fn group_stacks(pieces: &[Piece]) -> BTreeMap<StackKey, Vec<&Piece>> {
    let mut groups: BTreeMap<StackKey, Vec<&Piece>> = BTreeMap::new();
    for piece in pieces {
        if let (Some(node), false) = (piece.node(), piece.is_finished()) {
            groups
                .entry((node, piece.team().clone()))
                .or_default()
                .push(piece);
        }
    }
    groups
}

/// Pieces of `team` stacked on `node`.
pub fn stack_at<'a>(pieces: &'a [Piece], node: NodeId, team: &TeamId) -> Vec<&'a Piece> {
    pieces
        .iter()
        .filter(|p| p.is_on_track() && p.node() == Some(node) && p.team() == team)
        .collect()
}

/// Distinct teams with pieces on `node`, in first-seen order.
pub fn teams_at(pieces: &[Piece], node: NodeId) -> Vec<TeamId> {
    let mut teams: Vec<TeamId> = Vec::new();
    for piece in pieces {
        if piece.is_on_track() && piece.node() == Some(node) && !teams.contains(piece.team()) {
            teams.push(piece.team().clone());
        }
    }
    teams
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PieceId;

    fn piece(id: &str, team: &str, node: Option<&str>) -> Piece {
        let mut p = Piece::at_home(PieceId::new(id), TeamId::new(team));
        p.relocate(node.and_then(|n| n.parse().ok()));
        p
    }

    #[test]
    fn test_group_stacks_by_node_and_team() {
        let mut finished = piece("blue-3", "blue", None);
        finished.finish();
        let pieces = vec![
            piece("blue-0", "blue", Some("n3")),
            piece("blue-1", "blue", Some("n3")),
            piece("red-0", "red", Some("n3")),
            piece("blue-2", "blue", None),
            finished,
        ];

        let groups = group_stacks(&pieces);
        assert_eq!(groups.len(), 2);
        let n3: NodeId = "n3".parse().unwrap();
        assert_eq!(groups[&(n3, TeamId::new("blue"))].len(), 2);
        assert_eq!(groups[&(n3, TeamId::new("red"))].len(), 1);
        assert_eq!(stack_at(&pieces, n3, &TeamId::new("blue")).len(), 2);
        assert_eq!(teams_at(&pieces, n3), vec![TeamId::new("blue"), TeamId::new("red")]);
    }
}
