//! Exhaustive game tree construction and board lookup
//!
//! Nodes live in a flat arena and refer to their children by [`NodeId`].
//! Construction is a single pre-order pass; the same pass fills a board index
//! so that subtree lookup is a hash probe instead of a tree walk.

use std::{collections::HashMap, fmt};

use serde::{Deserialize, Serialize, Serializer};

use super::board::{BoardKey, Coord, GameResult, GameState, Player};

/// Number of nodes (root included) in the complete 3x3 game tree
pub const FULL_TREE_NODES: usize = 549_946;

/// Index of a node in a [`GameTree`] arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(u32);

impl NodeId {
    /// The empty-board root of every tree
    pub const ROOT: NodeId = NodeId(0);

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A single position in the game tree
#[derive(Debug, Clone)]
pub struct Node {
    state: GameState,
    weight: f64,
    depth: u8,
    children: Vec<NodeId>,
}

impl Node {
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Relative likelihood of choosing this node from its parent
    pub fn weight(&self) -> f64 {
        self.weight
    }

    /// Number of plies from the empty board
    pub fn depth(&self) -> usize {
        self.depth as usize
    }

    /// Children in row-major order of the cell each one fills
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn is_terminal(&self) -> bool {
        self.children.is_empty()
    }

    pub fn result(&self) -> GameResult {
        self.state.evaluate()
    }
}

/// Complete Tic-Tac-Toe game tree with per-node weights.
///
/// Structure is fixed at construction; only weights change afterwards.
#[derive(Debug, Clone, Deserialize)]
#[serde(try_from = "TreeSnapshot")]
pub struct GameTree {
    nodes: Vec<Node>,
    index: HashMap<BoardKey, NodeId>,
}

impl GameTree {
    /// Initial weight of every node
    pub const DEFAULT_WEIGHT: f64 = 1.0;

    /// Enumerate every game reachable from the empty board.
    ///
    /// The root is placed by nobody; the first real move at depth 1 belongs
    /// to [`Player::One`] and turns alternate strictly from there.
    pub fn build() -> Self {
        let mut tree = GameTree {
            nodes: Vec::with_capacity(FULL_TREE_NODES),
            index: HashMap::new(),
        };
        tree.grow(GameState::new(), Player::One, 0);
        log::debug!(
            "built game tree: {} nodes, {} distinct boards, {} terminal",
            tree.nodes.len(),
            tree.index.len(),
            tree.terminal_count()
        );
        tree
    }

    /// Push `state` and, if the game is still open, one subtree per empty cell
    fn grow(&mut self, state: GameState, to_move: Player, depth: u8) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node {
            state,
            weight: Self::DEFAULT_WEIGHT,
            depth,
            children: Vec::new(),
        });
        // Pre-order insert-if-absent keeps the first match a DFS would return
        self.index.entry(state.key()).or_insert(id);

        if state.evaluate() != GameResult::Ongoing {
            return id;
        }

        let mut children = Vec::with_capacity(9 - depth as usize);
        for coord in state.empty_coords() {
            let Ok(next) = state.extend(coord, to_move) else {
                continue;
            };
            children.push(self.grow(next, to_move.opponent(), depth + 1));
        }
        self.nodes[id.index()].children = children;
        id
    }

    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Look up a node by id.
    ///
    /// # Panics
    ///
    /// Panics if `id` was not handed out by this tree. Use [`GameTree::get`]
    /// for ids of unknown origin.
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    /// Total node count, root included
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterate nodes in construction (pre-order) order
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, node)| (NodeId(i as u32), node))
    }

    /// Number of structurally distinct boards in the tree
    pub fn distinct_boards(&self) -> usize {
        self.index.len()
    }

    pub fn terminal_count(&self) -> usize {
        self.nodes.iter().filter(|node| node.is_terminal()).count()
    }

    /// The `index`-th child of `id`, if it exists
    pub fn child(&self, id: NodeId, index: usize) -> Option<NodeId> {
        self.get(id)?.children.get(index).copied()
    }

    pub fn weight(&self, id: NodeId) -> f64 {
        self.node(id).weight
    }

    pub fn set_weight(&mut self, id: NodeId, weight: f64) {
        self.nodes[id.index()].weight = weight;
    }

    /// Multiply a node's weight in place and return the new value
    pub fn scale_weight(&mut self, id: NodeId, factor: f64) -> f64 {
        let node = &mut self.nodes[id.index()];
        node.weight *= factor;
        node.weight
    }

    /// Reset every weight to [`GameTree::DEFAULT_WEIGHT`]
    pub fn reset_weights(&mut self) {
        for node in &mut self.nodes {
            node.weight = Self::DEFAULT_WEIGHT;
        }
    }

    /// Find the node whose board equals `board`.
    ///
    /// The same board can appear at several nodes (transpositions); the one
    /// returned is the first in pre-order.
    pub fn find_subtree(&self, board: BoardKey) -> crate::Result<NodeId> {
        self.index
            .get(&board)
            .copied()
            .ok_or(crate::Error::SubtreeNotFound { board })
    }

    /// Pre-order depth-first search for `board`, parent before children
    pub fn find_subtree_dfs(&self, board: BoardKey) -> Option<NodeId> {
        let mut stack = vec![NodeId::ROOT];
        while let Some(id) = stack.pop() {
            let node = self.get(id)?;
            if node.state.key() == board {
                return Some(id);
            }
            stack.extend(node.children.iter().rev().copied());
        }
        None
    }

    fn rebuild_index(&mut self) {
        self.index.clear();
        let mut stack = vec![NodeId::ROOT];
        while let Some(id) = stack.pop() {
            let node = &self.nodes[id.index()];
            self.index.entry(node.state.key()).or_insert(id);
            stack.extend(node.children.iter().rev().copied());
        }
    }
}

impl Default for GameTree {
    fn default() -> Self {
        Self::build()
    }
}

/// Borrowed per-node record written on save
#[derive(Serialize)]
struct NodeRecordRef<'a> {
    board: BoardKey,
    last_move: Option<Coord>,
    weight: f64,
    children: &'a [NodeId],
}

/// Owned per-node record read on load
#[derive(Deserialize)]
struct NodeRecord {
    board: BoardKey,
    last_move: Option<Coord>,
    weight: f64,
    children: Vec<NodeId>,
}

#[derive(Deserialize)]
#[serde(transparent)]
struct TreeSnapshot {
    nodes: Vec<NodeRecord>,
}

impl Serialize for GameTree {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.nodes.iter().map(|node| NodeRecordRef {
            board: node.state.key(),
            last_move: node.state.last_move(),
            weight: node.weight,
            children: &node.children,
        }))
    }
}

fn corrupt(message: String) -> crate::Error {
    crate::Error::Persistence {
        operation: "validate game tree snapshot".to_string(),
        message,
    }
}

impl TryFrom<TreeSnapshot> for GameTree {
    type Error = crate::Error;

    fn try_from(snapshot: TreeSnapshot) -> Result<Self, Self::Error> {
        let records = snapshot.nodes;
        let Some(root) = records.first() else {
            return Err(corrupt("snapshot has no nodes".to_string()));
        };
        if root.board != BoardKey::EMPTY || root.last_move.is_some() {
            return Err(corrupt(format!("root board {} is not empty", root.board)));
        }

        let mut depths = vec![0u8; records.len()];
        let mut has_parent = vec![false; records.len()];

        for (parent, record) in records.iter().enumerate() {
            let state = GameState::from_parts(record.board, record.last_move);
            let expected_children = if state.evaluate() == GameResult::Ongoing {
                state.empty_coords().len()
            } else {
                0
            };
            if record.children.len() != expected_children {
                return Err(corrupt(format!(
                    "node {parent} has {} children, expected {expected_children}",
                    record.children.len()
                )));
            }

            let to_move = Player::for_ply(depths[parent] as usize);
            let mut previous_cell: Option<usize> = None;
            for &child in &record.children {
                let c = child.index();
                if c <= parent || c >= records.len() || has_parent[c] {
                    return Err(corrupt(format!("node {parent} has invalid child {child}")));
                }
                has_parent[c] = true;
                depths[c] = depths[parent] + 1;

                let child_record = &records[c];
                let extended = child_record
                    .last_move
                    .and_then(|coord| state.extend(coord, to_move).ok());
                if extended.map(|s| s.key()) != Some(child_record.board) {
                    return Err(corrupt(format!(
                        "child {child} board {} does not follow from parent {parent}",
                        child_record.board
                    )));
                }

                // Siblings are stored in row-major order of the cell they fill
                let cell = child_record.last_move.map(Coord::index);
                if previous_cell.is_some() && cell <= previous_cell {
                    return Err(corrupt(format!(
                        "children of node {parent} are duplicated or out of order at {child}"
                    )));
                }
                previous_cell = cell;
            }
        }

        if let Some(orphan) = has_parent.iter().skip(1).position(|&seen| !seen) {
            return Err(corrupt(format!("node {} is unreachable", orphan + 1)));
        }

        let nodes = records
            .into_iter()
            .zip(depths)
            .map(|(record, depth)| Node {
                state: GameState::from_parts(record.board, record.last_move),
                weight: record.weight,
                depth,
                children: record.children,
            })
            .collect();

        let mut tree = GameTree {
            nodes,
            index: HashMap::new(),
        };
        tree.rebuild_index();
        Ok(tree)
    }
}
