use once_cell::sync::Lazy;

use crate::error::GameError;
use crate::types::{BOARD_SIZE, Cell, Color, Move};

const NUM_SQUARES: usize = BOARD_SIZE * BOARD_SIZE;
const DIRECTIONS: [(i32, i32); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

// Squares visited walking outward from each square, one list per direction.
static RAYS: Lazy<Vec<[Vec<usize>; 8]>> = Lazy::new(|| {
    (0..NUM_SQUARES)
        .map(|pos| {
            let (row, col) = pos_to_row_col(pos);
            DIRECTIONS.map(|(dr, dc)| {
                let mut ray = Vec::new();
                let mut r = row + dr;
                let mut c = col + dc;
                while in_bounds(r, c) {
                    ray.push((r as usize) * BOARD_SIZE + c as usize);
                    r += dr;
                    c += dc;
                }
                ray
            })
        })
        .collect()
});

/// Othello board represented by two disjoint occupancy masks.
/// Bit `row * 8 + col` is set when that square holds a disc of the color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Board {
    black: u64,
    white: u64,
}

impl Board {
    /// Creates the standard opening:
    /// (3,3)=white, (3,4)=black, (4,3)=black, (4,4)=white.
    pub fn new() -> Self {
        Self {
            black: bit(28) | bit(35),
            white: bit(27) | bit(36),
        }
    }

    /// Builds a board from raw masks. Squares set in both masks are kept black.
    pub fn from_bitboards(black: u64, white: u64) -> Self {
        Self {
            black,
            white: white & !black,
        }
    }

    /// Parses eight rows of `B`, `W` and `.` (whitespace ignored).
    pub fn from_ascii(text: &str) -> Result<Self, String> {
        let cells: Vec<char> = text.chars().filter(|c| !c.is_whitespace()).collect();
        if cells.len() != NUM_SQUARES {
            return Err(format!(
                "expected {NUM_SQUARES} squares, got {}",
                cells.len()
            ));
        }

        let mut board = Self::from_bitboards(0, 0);
        for (pos, ch) in cells.into_iter().enumerate() {
            match ch {
                'B' | 'b' => board.black |= bit(pos),
                'W' | 'w' => board.white |= bit(pos),
                '.' => {}
                other => return Err(format!("unexpected square marker {other:?}")),
            }
        }
        Ok(board)
    }

    pub fn cell(&self, row: usize, col: usize) -> Cell {
        if row >= BOARD_SIZE || col >= BOARD_SIZE {
            return Cell::Empty;
        }
        let square = bit(row * BOARD_SIZE + col);
        if (self.black & square) != 0 {
            Cell::Black
        } else if (self.white & square) != 0 {
            Cell::White
        } else {
            Cell::Empty
        }
    }

    /// Returns true when `color` may place a disc at `(row, col)`.
    pub fn is_legal(&self, row: usize, col: usize, color: Color) -> bool {
        if row >= BOARD_SIZE || col >= BOARD_SIZE {
            return false;
        }
        let (me, opp) = self.sides(color);
        Self::collect_flips(row * BOARD_SIZE + col, me, opp) != 0
    }

    /// Returns legal move mask for the given side.
    pub fn legal_mask(&self, color: Color) -> u64 {
        let (me, opp) = self.sides(color);
        let occupied = me | opp;
        let mut legal = 0u64;

        for pos in 0..NUM_SQUARES {
            let move_bit = bit(pos);
            if (occupied & move_bit) != 0 {
                continue;
            }
            if Self::collect_flips(pos, me, opp) != 0 {
                legal |= move_bit;
            }
        }

        legal
    }

    /// Legal moves in row-major order.
    pub fn legal_moves(&self, color: Color) -> Vec<Move> {
        let mut mask = self.legal_mask(color);
        let mut moves = Vec::with_capacity(mask.count_ones() as usize);
        while mask != 0 {
            let pos = mask.trailing_zeros() as usize;
            moves.push(Move::new(pos / BOARD_SIZE, pos % BOARD_SIZE, color));
            mask &= mask - 1;
        }
        moves
    }

    pub fn has_legal_move(&self, color: Color) -> bool {
        self.legal_mask(color) != 0
    }

    /// True when neither side can move. One stuck side is only a pass.
    pub fn is_game_over(&self) -> bool {
        !self.has_legal_move(Color::Black) && !self.has_legal_move(Color::White)
    }

    /// Places one disc and flips every bracketed run.
    /// Returns the flipped mask, or an error with the board untouched.
    pub fn apply(&mut self, row: usize, col: usize, color: Color) -> Result<u64, GameError> {
        if row >= BOARD_SIZE || col >= BOARD_SIZE {
            return Err(GameError::OutOfBounds {
                x: row as i32,
                y: col as i32,
            });
        }

        let pos = row * BOARD_SIZE + col;
        let (me, opp) = self.sides(color);
        let flips = Self::collect_flips(pos, me, opp);
        if flips == 0 {
            return Err(GameError::IllegalMove { row, col, color });
        }

        let next_me = me | bit(pos) | flips;
        let next_opp = opp & !flips;
        match color {
            Color::Black => {
                self.black = next_me;
                self.white = next_opp;
            }
            Color::White => {
                self.white = next_me;
                self.black = next_opp;
            }
        }

        Ok(flips)
    }

    /// Returns `(black_count, white_count)`.
    pub fn count(&self) -> (u8, u8) {
        (self.black.count_ones() as u8, self.white.count_ones() as u8)
    }

    /// Returns the number of empty squares.
    pub fn empty_count(&self) -> u8 {
        let (black_count, white_count) = self.count();
        NUM_SQUARES as u8 - black_count - white_count
    }

    /// Converts board to rows where 0=empty, 1=black, 2=white.
    pub fn to_rows(&self) -> [[u8; BOARD_SIZE]; BOARD_SIZE] {
        let mut rows = [[0u8; BOARD_SIZE]; BOARD_SIZE];
        for (row, cells) in rows.iter_mut().enumerate() {
            for (col, cell) in cells.iter_mut().enumerate() {
                *cell = self.cell(row, col).into();
            }
        }
        rows
    }

    fn sides(&self, color: Color) -> (u64, u64) {
        match color {
            Color::Black => (self.black, self.white),
            Color::White => (self.white, self.black),
        }
    }

    fn collect_flips(pos: usize, me: u64, opp: u64) -> u64 {
        if pos >= NUM_SQUARES || ((me | opp) & bit(pos)) != 0 {
            return 0;
        }

        let mut flips = 0u64;
        for ray in &RAYS[pos] {
            let mut line = 0u64;
            for &square in ray {
                let square = bit(square);
                if (opp & square) != 0 {
                    line |= square;
                } else {
                    if (me & square) != 0 {
                        flips |= line;
                    }
                    break;
                }
            }
        }

        flips
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

fn bit(pos: usize) -> u64 {
    if pos < NUM_SQUARES { 1u64 << pos } else { 0 }
}

fn pos_to_row_col(pos: usize) -> (i32, i32) {
    ((pos / BOARD_SIZE) as i32, (pos % BOARD_SIZE) as i32)
}

fn in_bounds(row: i32, col: i32) -> bool {
    (0..BOARD_SIZE as i32).contains(&row) && (0..BOARD_SIZE as i32).contains(&col)
}
