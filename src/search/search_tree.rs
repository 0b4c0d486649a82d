//! Arena-backed tree of explored positions.
//!
//! Nodes live in a flat `Vec` and refer to each other by index, so a whole
//! search pass is dropped in one go once its result has been extracted.

use crate::game_state::chess_types::{Color, Move};
use crate::game_state::x88_board::X88Board;

pub type NodeId = usize;

#[derive(Debug, Clone)]
pub struct SearchNode {
    pub board: X88Board,
    pub color_to_move: Color,
    /// Move that produced this node; `None` at the root.
    pub mv: Option<Move>,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    pub line_score: f64,
    pub leaf_score: f64,
}

impl SearchNode {
    fn new(
        board: X88Board,
        color_to_move: Color,
        mv: Option<Move>,
        parent: Option<NodeId>,
    ) -> Self {
        Self {
            board,
            color_to_move,
            mv,
            parent,
            children: Vec::new(),
            line_score: f64::NEG_INFINITY,
            leaf_score: f64::NEG_INFINITY,
        }
    }

    #[inline]
    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct SearchTree {
    nodes: Vec<SearchNode>,
}

impl SearchTree {
    pub const ROOT: NodeId = 0;

    pub fn new(board: X88Board, color_to_move: Color) -> Self {
        Self {
            nodes: vec![SearchNode::new(board, color_to_move, None, None)],
        }
    }

    #[inline]
    pub fn node(&self, id: NodeId) -> &SearchNode {
        &self.nodes[id]
    }

    #[inline]
    pub fn node_mut(&mut self, id: NodeId) -> &mut SearchNode {
        &mut self.nodes[id]
    }

    pub(crate) fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Attaches the position reached by `mv` under `parent`; the child has the
    /// other side to move.
    pub fn add_child(&mut self, parent: NodeId, board: X88Board, mv: Move) -> NodeId {
        let id = self.nodes.len();
        let color_to_move = self.nodes[parent].color_to_move.opposite();
        self.nodes
            .push(SearchNode::new(board, color_to_move, Some(mv), Some(parent)));
        self.nodes[parent].children.push(id);
        id
    }

    /// First child of `id` with the highest line score.
    pub fn best_child(&self, id: NodeId) -> Option<&SearchNode> {
        self.pick_child(id, true)
    }

    /// Principal variation: from the root, alternately follow the
    /// highest-scored child (maximizing ply) and the lowest-scored child.
    pub fn best_line(&self) -> Vec<Move> {
        let mut moves = Vec::new();
        let mut current = Self::ROOT;
        let mut maximizing = true;
        while let Some(child) = self.pick_child_id(current, maximizing) {
            if let Some(mv) = self.nodes[child].mv {
                moves.push(mv);
            }
            current = child;
            maximizing = !maximizing;
        }
        moves
    }

    fn pick_child(&self, id: NodeId, maximizing: bool) -> Option<&SearchNode> {
        self.pick_child_id(id, maximizing).map(|child| self.node(child))
    }

    // Ties keep the earliest child.
    fn pick_child_id(&self, id: NodeId, maximizing: bool) -> Option<NodeId> {
        let mut best: Option<NodeId> = None;
        for &child in &self.nodes[id].children {
            let score = self.nodes[child].line_score;
            let better = match best {
                None => true,
                Some(current) if maximizing => score > self.nodes[current].line_score,
                Some(current) => score < self.nodes[current].line_score,
            };
            if better {
                best = Some(child);
            }
        }
        best
    }
}
