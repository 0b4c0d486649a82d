//! Iterative deepening over minimax with alpha-beta pruning.
//!
//! Every depth from 1 to the configured ceiling searches a fresh tree rooted
//! at the current position; the deepest completed pass wins. Scores are from
//! the root side's perspective throughout (plain minimax, not negamax).
//!
//! All mutable search state (node counters, sampling clock, deepest ply seen)
//! lives in a `SearchSession` passed through the recursion.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace};

use crate::errors::ChessResult;
use crate::game_state::chess_types::{Color, Move};
use crate::game_state::x88_board::X88Board;
use crate::move_generation::legal_move_generator::{legal_moves, ordered_candidate_moves};
use crate::search::board_scoring::BoardScorer;
use crate::search::search_events::{EngineEvent, EngineEventHandler};
use crate::search::search_tree::{NodeId, SearchTree};

pub const MATE_SCORE: f64 = 500.0;

/// How nodes without a legal child are scored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TerminalScoring {
    /// Keep the fold's starting value (-inf for the maximizer, +inf for the
    /// minimizer), exactly as if no child had been explored.
    #[default]
    Disabled,
    /// Checkmate scores `MATE_SCORE` against the mated side; stalemate is 0.
    Enabled,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchLimits {
    pub max_depth: u8,
    pub stats_interval: Duration,
    pub terminal_scoring: TerminalScoring,
}

impl Default for SearchLimits {
    fn default() -> Self {
        Self {
            max_depth: 5,
            stats_interval: Duration::from_millis(200),
            terminal_scoring: TerminalScoring::Disabled,
        }
    }
}

/// Cloneable handle used to ask a running search to stop. The search only
/// looks at it between depths, so the pass in progress always completes.
#[derive(Debug, Clone, Default)]
pub struct StopFlag(Arc<AtomicBool>);

impl StopFlag {
    pub fn request_stop(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn clear(&self) {
        self.0.store(false, Ordering::Relaxed);
    }

    pub fn is_set(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchOutcome {
    pub best_move: Option<Move>,
    pub score: f64,
    pub depth: u8,
    pub nodes: u64,
    pub best_line: Vec<Move>,
}

impl Default for SearchOutcome {
    fn default() -> Self {
        Self {
            best_move: None,
            score: f64::NEG_INFINITY,
            depth: 0,
            nodes: 0,
            best_line: Vec::new(),
        }
    }
}

pub struct SearchSession<'a, S: BoardScorer + ?Sized> {
    scorer: &'a S,
    limits: SearchLimits,
    stop: StopFlag,
    events: Option<&'a mut (dyn EngineEventHandler + 'static)>,
    total_nodes: u64,
    nodes_since_report: u64,
    last_report: Instant,
    deepest_ply: u8,
}

impl<'a, S: BoardScorer + ?Sized> SearchSession<'a, S> {
    pub fn new(scorer: &'a S, limits: SearchLimits) -> Self {
        Self {
            scorer,
            limits,
            stop: StopFlag::default(),
            events: None,
            total_nodes: 0,
            nodes_since_report: 0,
            last_report: Instant::now(),
            deepest_ply: 0,
        }
    }

    pub fn with_stop_flag(mut self, stop: StopFlag) -> Self {
        self.stop = stop;
        self
    }

    pub fn with_event_handler(
        mut self,
        events: Option<&'a mut (dyn EngineEventHandler + 'static)>,
    ) -> Self {
        self.events = events;
        self
    }

    /// Seeds the running node total, which callers keep across a game.
    pub fn with_total_nodes(mut self, total_nodes: u64) -> Self {
        self.total_nodes = total_nodes;
        self
    }

    pub fn total_nodes(&self) -> u64 {
        self.total_nodes
    }

    /// Runs iterative deepening from `board` with `color` to move and returns
    /// the result of the deepest completed pass. `best_move` is `None` when
    /// the side to move has no legal move.
    pub fn search(&mut self, board: &X88Board, color: Color) -> ChessResult<SearchOutcome> {
        let mut outcome = SearchOutcome::default();

        for depth in 1..=self.limits.max_depth {
            if depth > 1 && self.stop.is_set() {
                info!(completed_depth = outcome.depth, "search stopped at depth boundary");
                break;
            }

            let mut tree = SearchTree::new(*board, color);
            self.alpha_beta(
                &mut tree,
                SearchTree::ROOT,
                color,
                0,
                depth,
                f64::NEG_INFINITY,
                f64::INFINITY,
            )?;

            let Some(best) = tree.best_child(SearchTree::ROOT) else {
                debug!(depth, "no legal moves at the root");
                return Ok(SearchOutcome {
                    depth,
                    nodes: self.total_nodes,
                    ..SearchOutcome::default()
                });
            };
            let score = best.line_score;
            let best_move = best.mv;
            let best_line = tree.best_line();

            self.emit(EngineEvent::BestLine {
                score,
                depth,
                nodes: self.total_nodes,
                moves: best_line.clone(),
            });
            debug!(
                depth,
                score,
                nodes = self.total_nodes,
                tree_size = tree.len(),
                best = %best_move.map(|m| m.to_string()).unwrap_or_default(),
                "completed search depth"
            );

            outcome = SearchOutcome {
                best_move,
                score,
                depth,
                nodes: self.total_nodes,
                best_line,
            };
        }

        Ok(outcome)
    }

    #[allow(clippy::too_many_arguments)]
    fn alpha_beta(
        &mut self,
        tree: &mut SearchTree,
        node: NodeId,
        maximizing: Color,
        depth: u8,
        max_depth: u8,
        alpha: f64,
        beta: f64,
    ) -> ChessResult<f64> {
        if self.deepest_ply < depth {
            self.deepest_ply = depth;
            self.emit(EngineEvent::DepthReached(depth));
        }

        if depth == max_depth {
            let score = self.scorer.score(&tree.node(node).board, maximizing);
            let leaf = tree.node_mut(node);
            leaf.leaf_score = score;
            leaf.line_score = score;
            return Ok(score);
        }

        let is_maximizing = tree.node(node).color_to_move == maximizing;
        let mut value = if is_maximizing {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        };
        let (mut alpha, mut beta) = (alpha, beta);

        for mv in self.expand(tree, node) {
            let Some(child) = self.attach_if_legal(tree, node, &mv)? else {
                continue;
            };
            let child_value =
                self.alpha_beta(tree, child, maximizing, depth + 1, max_depth, alpha, beta)?;
            if is_maximizing {
                value = value.max(child_value);
                alpha = alpha.max(value);
            } else {
                value = value.min(child_value);
                beta = beta.min(value);
            }
            if alpha >= beta {
                trace!(depth, alpha, beta, "cutoff");
                break;
            }
        }

        let current = tree.node(node);
        if !current.has_children() {
            if let Some(terminal) =
                self.terminal_value(&current.board, current.color_to_move, maximizing)?
            {
                value = terminal;
            }
        }

        tree.node_mut(node).line_score = value;
        Ok(value)
    }

    /// Candidate moves for `node`, capture-first. Also the sampling point for
    /// node-rate events.
    fn expand(&mut self, tree: &SearchTree, node: NodeId) -> Vec<Move> {
        self.maybe_report_rate();
        let current = tree.node(node);
        ordered_candidate_moves(&current.board, current.color_to_move)
    }

    /// Applies `mv`; every application counts as an explored node whether or
    /// not it turns out legal.
    fn attach_if_legal(
        &mut self,
        tree: &mut SearchTree,
        node: NodeId,
        mv: &Move,
    ) -> ChessResult<Option<NodeId>> {
        let next = tree.node(node).board.copy_with_move(mv.from, mv.to)?;
        self.total_nodes += 1;
        self.nodes_since_report += 1;
        if next.is_king_in_check(mv.piece.color)? {
            return Ok(None);
        }
        Ok(Some(tree.add_child(node, next, *mv)))
    }

    fn terminal_value(
        &self,
        board: &X88Board,
        color_to_move: Color,
        maximizing: Color,
    ) -> ChessResult<Option<f64>> {
        if self.limits.terminal_scoring == TerminalScoring::Disabled {
            return Ok(None);
        }
        if !board.is_king_in_check(color_to_move)? {
            return Ok(Some(0.0));
        }
        Ok(Some(if color_to_move == maximizing {
            -MATE_SCORE
        } else {
            MATE_SCORE
        }))
    }

    fn maybe_report_rate(&mut self) {
        let elapsed = self.last_report.elapsed();
        if elapsed <= self.limits.stats_interval {
            return;
        }
        let interval_ms = self.limits.stats_interval.as_millis().max(1) as u64;
        let rate = self.nodes_since_report * 1000 / interval_ms;
        self.last_report = Instant::now();
        self.nodes_since_report = 0;
        self.emit(EngineEvent::NodesPerSecond(rate));
    }

    fn emit(&mut self, event: EngineEvent) {
        if let Some(events) = self.events.as_deref_mut() {
            events.handle(event);
        }
    }
}

/// Exhaustive minimax without pruning, scored from `maximizing`'s point of
/// view `depth` plies below `board`. Nodes without legal children keep the
/// fold's starting value, like `TerminalScoring::Disabled`.
pub fn minimax<S: BoardScorer + ?Sized>(
    scorer: &S,
    board: &X88Board,
    color_to_move: Color,
    maximizing: Color,
    depth: u8,
) -> ChessResult<f64> {
    if depth == 0 {
        return Ok(scorer.score(board, maximizing));
    }

    let is_maximizing = color_to_move == maximizing;
    let mut value = if is_maximizing {
        f64::NEG_INFINITY
    } else {
        f64::INFINITY
    };
    for generated in legal_moves(board, color_to_move) {
        let generated = generated?;
        let child = minimax(
            scorer,
            &generated.board_after,
            color_to_move.opposite(),
            maximizing,
            depth - 1,
        )?;
        value = if is_maximizing {
            value.max(child)
        } else {
            value.min(child)
        };
    }
    Ok(value)
}
