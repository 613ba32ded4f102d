//! Static board topology for yutnori.
//!
//! The board is a 600x600 logical square: 20 perimeter nodes forming the
//! outer loop, 1 shared center, and 8 diagonal waypoints on the two
//! corner-to-corner diagonals. Movement never walks the edge list; it uses the
//! track tables in [`crate::path`]. Edges exist so a renderer can draw lines.

use derive_more::{Display, Error};
use schemars::{JsonSchema, Schema, SchemaGenerator, json_schema};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::str::FromStr;
use tracing::{debug, instrument};

/// Number of nodes on the board.
pub const NODE_COUNT: usize = 29;

/// Maximum distance (logical units) at which a free drop snaps to a node.
pub const SNAP_RADIUS: f64 = 40.0;

/// Identifier of a board node (`n0` through `n28`).
///
/// Serialized as its text form so snapshots stay readable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
#[display("n{_0}")]
pub struct NodeId(u8);

impl NodeId {
    /// Start / finish corner (bottom-left).
    pub const START: NodeId = NodeId(0);
    /// First corner reached along the outer loop (bottom-right).
    pub const FIRST_CORNER: NodeId = NodeId(5);
    /// Corner diagonally opposite the start (top-right).
    pub const OPPOSITE_CORNER: NodeId = NodeId(10);
    /// Last corner before the home stretch (top-left).
    pub const THIRD_CORNER: NodeId = NodeId(15);
    /// Shared center where both diagonals cross.
    pub const CENTER: NodeId = NodeId(24);

    /// Creates a node id from its index, if the index names a board node.
    pub const fn new(index: u8) -> Option<Self> {
        if (index as usize) < NODE_COUNT {
            Some(Self(index))
        } else {
            None
        }
    }

    /// Index of the node in [`BOARD_NODES`].
    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// Iterates every node id in table order.
    pub fn all() -> impl Iterator<Item = NodeId> {
        (0..NODE_COUNT as u8).map(NodeId)
    }
}

/// Failure to parse a node id from text.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
#[display("Invalid node id '{}': expected n0..n28", input)]
pub struct ParseNodeIdError {
    /// The rejected text.
    pub input: String,
}

impl FromStr for NodeId {
    type Err = ParseNodeIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseNodeIdError {
            input: s.to_string(),
        };
        let digits = s.trim().strip_prefix('n').ok_or_else(err)?;
        let index: u8 = digits.parse().map_err(|_| err())?;
        NodeId::new(index).ok_or_else(err)
    }
}

impl TryFrom<String> for NodeId {
    type Error = ParseNodeIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<NodeId> for String {
    fn from(id: NodeId) -> Self {
        id.to_string()
    }
}

impl JsonSchema for NodeId {
    fn schema_name() -> Cow<'static, str> {
        "NodeId".into()
    }

    fn json_schema(_generator: &mut SchemaGenerator) -> Schema {
        json_schema!({
            "type": "string",
            "pattern": "^n([0-9]|1[0-9]|2[0-8])$"
        })
    }
}

/// A point on the race track.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Node {
    id: NodeId,
    x: f64,
    y: f64,
    is_corner: bool,
    is_center: bool,
    label: Option<&'static str>,
}

impl Node {
    const fn plain(id: u8, x: f64, y: f64) -> Self {
        Self {
            id: NodeId(id),
            x,
            y,
            is_corner: false,
            is_center: false,
            label: None,
        }
    }

    const fn corner(id: u8, x: f64, y: f64, label: Option<&'static str>) -> Self {
        Self {
            id: NodeId(id),
            x,
            y,
            is_corner: true,
            is_center: false,
            label,
        }
    }

    const fn center(id: u8, x: f64, y: f64, label: &'static str) -> Self {
        Self {
            id: NodeId(id),
            x,
            y,
            is_corner: false,
            is_center: true,
            label: Some(label),
        }
    }

    /// Node identifier.
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Horizontal coordinate in board space.
    pub fn x(&self) -> f64 {
        self.x
    }

    /// Vertical coordinate in board space (grows downward).
    pub fn y(&self) -> f64 {
        self.y
    }

    /// Whether this is one of the four corners.
    pub fn is_corner(&self) -> bool {
        self.is_corner
    }

    /// Whether this is the shared center.
    pub fn is_center(&self) -> bool {
        self.is_center
    }

    /// Optional display label.
    pub fn label(&self) -> Option<&'static str> {
        self.label
    }

    /// Label if present, otherwise the node id text.
    pub fn label_or_id(&self) -> String {
        self.label
            .map(str::to_string)
            .unwrap_or_else(|| self.id.to_string())
    }

    /// Euclidean distance from this node to a point.
    pub fn distance_to(&self, x: f64, y: f64) -> f64 {
        (self.x - x).hypot(self.y - y)
    }
}

/// All 29 nodes, indexed by [`NodeId::index`].
pub static BOARD_NODES: [Node; NODE_COUNT] = [
    // Bottom edge, left to right
    Node::corner(0, 50.0, 550.0, Some("출발")),
    Node::plain(1, 150.0, 550.0),
    Node::plain(2, 250.0, 550.0),
    Node::plain(3, 350.0, 550.0),
    Node::plain(4, 450.0, 550.0),
    Node::corner(5, 550.0, 550.0, None),
    // Right edge, bottom to top
    Node::plain(6, 550.0, 450.0),
    Node::plain(7, 550.0, 350.0),
    Node::plain(8, 550.0, 250.0),
    Node::plain(9, 550.0, 150.0),
    Node::corner(10, 550.0, 50.0, None),
    // Top edge, right to left
    Node::plain(11, 450.0, 50.0),
    Node::plain(12, 350.0, 50.0),
    Node::plain(13, 250.0, 50.0),
    Node::plain(14, 150.0, 50.0),
    Node::corner(15, 50.0, 50.0, None),
    // Left edge, top to bottom
    Node::plain(16, 50.0, 150.0),
    Node::plain(17, 50.0, 250.0),
    Node::plain(18, 50.0, 350.0),
    Node::plain(19, 50.0, 450.0),
    // Diagonal start -> opposite corner
    Node::plain(20, 133.0, 467.0),
    Node::plain(21, 217.0, 383.0),
    Node::plain(22, 383.0, 217.0),
    Node::plain(23, 467.0, 133.0),
    Node::center(24, 300.0, 300.0, "방"),
    // Diagonal first corner -> third corner
    Node::plain(25, 467.0, 467.0),
    Node::plain(26, 383.0, 383.0),
    Node::plain(27, 217.0, 217.0),
    Node::plain(28, 133.0, 133.0),
];

/// A directed line between two nodes, for rendering only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    /// Tail node.
    pub from: NodeId,
    /// Head node.
    pub to: NodeId,
}

const fn edge(from: u8, to: u8) -> Edge {
    Edge {
        from: NodeId(from),
        to: NodeId(to),
    }
}

/// Track lines: 20 perimeter edges and 6 per diagonal.
pub static BOARD_EDGES: [Edge; 32] = [
    edge(0, 1),
    edge(1, 2),
    edge(2, 3),
    edge(3, 4),
    edge(4, 5),
    edge(5, 6),
    edge(6, 7),
    edge(7, 8),
    edge(8, 9),
    edge(9, 10),
    edge(10, 11),
    edge(11, 12),
    edge(12, 13),
    edge(13, 14),
    edge(14, 15),
    edge(15, 16),
    edge(16, 17),
    edge(17, 18),
    edge(18, 19),
    edge(19, 0),
    edge(0, 20),
    edge(20, 21),
    edge(21, 24),
    edge(24, 22),
    edge(22, 23),
    edge(23, 10),
    edge(5, 25),
    edge(25, 26),
    edge(26, 24),
    edge(24, 27),
    edge(27, 28),
    edge(28, 15),
];

/// Looks up a node by id.
pub fn get_node(id: NodeId) -> &'static Node {
    &BOARD_NODES[id.index()]
}

/// Looks up a node by its text id (`"n7"`).
pub fn find_node(id: &str) -> Option<&'static Node> {
    id.parse::<NodeId>().ok().map(get_node)
}

/// Whether the node is a corner or the center, where track selection branches.
pub fn is_junction(id: NodeId) -> bool {
    let node = get_node(id);
    node.is_corner() || node.is_center()
}

/// Finds the node closest to a point, if it lies within [`SNAP_RADIUS`].
///
/// Ties keep the first node in table order. `None` means the drop landed
/// nowhere; callers treat that as "back to home" or "cancel".
#[instrument]
pub fn nearest_node(x: f64, y: f64) -> Option<&'static Node> {
    let mut nearest: Option<&'static Node> = None;
    let mut min_dist = f64::INFINITY;
    for node in BOARD_NODES.iter() {
        let dist = node.distance_to(x, y);
        if dist < min_dist {
            min_dist = dist;
            nearest = Some(node);
        }
    }

    let snapped = nearest.filter(|_| min_dist <= SNAP_RADIUS);
    debug!(snapped = ?snapped.map(Node::id), min_dist, "Nearest node lookup");
    snapped
}
