use std::time::Duration;

use log::debug;
use web_time::Instant;

use crate::ai::eval::{MAX_EVAL, evaluate};
use crate::board::Board;
use crate::config::{PassRule, SearchConfig};
use crate::types::{Color, Move};

const MIN_SCORE: i32 = -MAX_EVAL - 1;
const MAX_SCORE: i32 = MAX_EVAL + 1;

#[derive(Debug, Clone, Copy, PartialEq)]
enum SearchResult {
    Complete(Option<Move>, i32),
    TimedOut,
}

/// Best root move and its minimax value from the searching side's view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchOutcome {
    pub best: Option<Move>,
    pub score: i32,
    /// Deepest fully completed iteration.
    pub depth: u8,
}

pub struct Searcher {
    config: SearchConfig,
    perspective: Color,
    start_time: Instant,
    timeout: Option<Duration>,
    timed_out: bool,
    nodes: u64,
}

impl Searcher {
    pub fn new(config: SearchConfig) -> Self {
        Self {
            timeout: config.time_limit(),
            config,
            perspective: Color::Black,
            start_time: Instant::now(),
            timed_out: false,
            nodes: 0,
        }
    }

    /// Picks a move for `color`, applies it to `board` and returns it.
    /// Returns `None` and leaves `board` alone when `color` cannot move.
    pub fn choose_move(&mut self, board: &mut Board, color: Color) -> Option<Move> {
        let mv = self.search(board, color).best?;
        board.apply(mv.x as usize, mv.y as usize, color).ok()?;
        Some(mv)
    }

    /// Alpha-beta minimax maximizing for `color` at the root.
    pub fn search(&mut self, board: &Board, color: Color) -> SearchOutcome {
        self.start_time = Instant::now();
        self.timed_out = false;
        self.nodes = 0;
        self.perspective = color;

        let max_depth = self.config.depth.max(1);
        let first_depth = if self.timeout.is_some() { 1 } else { max_depth };
        let mut outcome = SearchOutcome {
            best: None,
            score: evaluate(board, color),
            depth: 0,
        };

        for depth in first_depth..=max_depth {
            match self.minimax(board, depth, depth, true, MIN_SCORE, MAX_SCORE) {
                SearchResult::Complete(best, score) => {
                    outcome = SearchOutcome { best, score, depth };
                    debug!(
                        "depth {depth} complete for {color:?}: {best:?} score {score} ({} nodes)",
                        self.nodes
                    );
                }
                SearchResult::TimedOut => {
                    debug!("search timed out during depth {depth}");
                    break;
                }
            }
        }

        outcome
    }

    pub fn timed_out(&self) -> bool {
        self.timed_out
    }

    pub fn nodes(&self) -> u64 {
        self.nodes
    }

    fn minimax(
        &mut self,
        board: &Board,
        depth: u8,
        root_depth: u8,
        maximizing: bool,
        alpha: i32,
        beta: i32,
    ) -> SearchResult {
        // Depth-1 iterations always finish so a timed search still has a move.
        if root_depth > 1
            && let Some(timeout) = self.timeout
            && self.start_time.elapsed() >= timeout
        {
            self.timed_out = true;
            return SearchResult::TimedOut;
        }
        self.nodes += 1;

        if depth == 0 || board.is_game_over() {
            return SearchResult::Complete(None, evaluate(board, self.perspective));
        }

        let mover = if maximizing {
            self.perspective
        } else {
            self.perspective.opponent()
        };
        let moves = board.legal_moves(mover);
        if moves.is_empty() {
            return match self.config.pass_rule {
                PassRule::Evaluate => {
                    SearchResult::Complete(None, evaluate(board, self.perspective))
                }
                PassRule::ConsumePly => {
                    match self.minimax(board, depth - 1, root_depth, !maximizing, alpha, beta) {
                        SearchResult::Complete(_, score) => SearchResult::Complete(None, score),
                        SearchResult::TimedOut => SearchResult::TimedOut,
                    }
                }
            };
        }

        let mut alpha = alpha;
        let mut beta = beta;
        let mut best_move = None;
        let mut best_score = if maximizing { MIN_SCORE } else { MAX_SCORE };

        for mv in moves {
            let mut next = *board;
            let _ = next.apply(mv.x as usize, mv.y as usize, mover);
            let score = match self.minimax(&next, depth - 1, root_depth, !maximizing, alpha, beta)
            {
                SearchResult::TimedOut => return SearchResult::TimedOut,
                SearchResult::Complete(_, score) => score,
            };

            // Strict comparison keeps the earliest row-major move on ties.
            if maximizing {
                if score > best_score {
                    best_score = score;
                    best_move = Some(mv);
                }
                alpha = alpha.max(score);
            } else {
                if score < best_score {
                    best_score = score;
                    best_move = Some(mv);
                }
                beta = beta.min(score);
            }
            if beta <= alpha {
                break;
            }
        }

        SearchResult::Complete(best_move, best_score)
    }
}
