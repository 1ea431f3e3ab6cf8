use crate::board::Board;
use crate::types::{BOARD_SIZE, Cell, Color};

/// Positional weights. Corners and edges pay, squares next to corners cost.
const WEIGHTS: [[i32; BOARD_SIZE]; BOARD_SIZE] = [
    [10, -5, 5, 5, 5, 5, -5, 10],
    [-5, -7, -1, -1, -1, -1, -7, -5],
    [5, -1, 10, 1, 1, 10, -1, 5],
    [5, -1, 1, 5, 5, 1, -1, 5],
    [5, -1, 1, 5, 5, 1, -1, 5],
    [5, -1, 10, 1, 1, 10, -1, 5],
    [-5, -7, -1, -1, -1, -1, -7, -5],
    [10, -5, 5, 5, 5, 5, -5, 10],
];

/// Bound on the absolute value `evaluate` can return.
pub const MAX_EVAL: i32 = 272;

/// Sum of weights under `perspective`'s discs minus the opponent's.
pub fn evaluate(board: &Board, perspective: Color) -> i32 {
    let mine = Cell::from(perspective);
    let theirs = Cell::from(perspective.opponent());
    let mut score = 0;

    for (row, weights) in WEIGHTS.iter().enumerate() {
        for (col, &weight) in weights.iter().enumerate() {
            let cell = board.cell(row, col);
            if cell == mine {
                score += weight;
            } else if cell == theirs {
                score -= weight;
            }
        }
    }

    score
}
