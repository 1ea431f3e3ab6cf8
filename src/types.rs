use serde::{Deserialize, Serialize};

pub const BOARD_SIZE: usize = 8;

/// A side of the game. Encoded on the wire as 1 (black) or 2 (white).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum Color {
    Black,
    White,
}

impl Color {
    pub fn opponent(self) -> Self {
        match self {
            Self::Black => Self::White,
            Self::White => Self::Black,
        }
    }
}

impl From<Color> for u8 {
    fn from(color: Color) -> Self {
        match color {
            Color::Black => 1,
            Color::White => 2,
        }
    }
}

impl TryFrom<u8> for Color {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Black),
            2 => Ok(Self::White),
            other => Err(format!("invalid color value: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell {
    Empty,
    Black,
    White,
}

impl From<Cell> for u8 {
    fn from(cell: Cell) -> Self {
        match cell {
            Cell::Empty => 0,
            Cell::Black => 1,
            Cell::White => 2,
        }
    }
}

impl From<Color> for Cell {
    fn from(color: Color) -> Self {
        match color {
            Color::Black => Self::Black,
            Color::White => Self::White,
        }
    }
}

/// A disc placement. `x` is the row and `y` the column, both in `0..8`
/// for a move on the board. Coordinates arrive from the peer unchecked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Move {
    pub x: i32,
    pub y: i32,
    pub color: Color,
}

impl Move {
    pub fn new(row: usize, col: usize, color: Color) -> Self {
        Self {
            x: row as i32,
            y: col as i32,
            color,
        }
    }

    /// Returns `(row, col)` when the move is on the board.
    pub fn square(&self) -> Option<(usize, usize)> {
        let on_board = |v: i32| (0..BOARD_SIZE as i32).contains(&v);
        if on_board(self.x) && on_board(self.y) {
            Some((self.x as usize, self.y as usize))
        } else {
            None
        }
    }
}

/// Board snapshot sent to the peer after every transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    pub board: [[u8; BOARD_SIZE]; BOARD_SIZE],
    pub turn: Color,
    pub black: u8,
    pub white: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum Winner {
    Draw,
    Black,
    White,
}

impl From<Winner> for u8 {
    fn from(winner: Winner) -> Self {
        match winner {
            Winner::Draw => 0,
            Winner::Black => 1,
            Winner::White => 2,
        }
    }
}

impl TryFrom<u8> for Winner {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Draw),
            1 => Ok(Self::Black),
            2 => Ok(Self::White),
            other => Err(format!("invalid winner value: {other}")),
        }
    }
}

/// Final result after game over.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameResult {
    pub winner: Winner,
    pub message: String,
}

impl GameResult {
    pub fn from_counts(black: u8, white: u8) -> Self {
        let (winner, message) = if black > white {
            (Winner::Black, "black win")
        } else if white > black {
            (Winner::White, "white win")
        } else {
            (Winner::Draw, "draw")
        };
        Self {
            winner,
            message: message.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayerColor {
    Black,
    White,
}

impl From<PlayerColor> for Color {
    fn from(color: PlayerColor) -> Self {
        match color {
            PlayerColor::Black => Color::Black,
            PlayerColor::White => Color::White,
        }
    }
}

/// Which side opens the game. Encoded as 1 (human) or 2 (AI).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum FirstMover {
    Human,
    Ai,
}

impl From<FirstMover> for u8 {
    fn from(first: FirstMover) -> Self {
        match first {
            FirstMover::Human => 1,
            FirstMover::Ai => 2,
        }
    }
}

impl TryFrom<u8> for FirstMover {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Human),
            2 => Ok(Self::Ai),
            other => Err(format!("invalid first turn value: {other}")),
        }
    }
}

/// Start configuration sent once by the peer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartConfig {
    pub color: PlayerColor,
    #[serde(rename = "turn")]
    pub first: FirstMover,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResetRequest {
    pub reset: bool,
}

/// Any message the session writes to its peer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Outbound {
    State(GameState),
    Result(GameResult),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_config_decodes_wire_shape() {
        let conf: StartConfig = serde_json::from_str(r#"{"color":"white","turn":2}"#).unwrap();

        assert_eq!(conf.color, PlayerColor::White);
        assert_eq!(conf.first, FirstMover::Ai);
    }

    #[test]
    fn start_config_rejects_unknown_turn() {
        assert!(serde_json::from_str::<StartConfig>(r#"{"color":"black","turn":3}"#).is_err());
        assert!(serde_json::from_str::<StartConfig>(r#"{"color":"red","turn":1}"#).is_err());
    }

    #[test]
    fn move_encodes_color_as_integer() {
        let mv = Move::new(2, 3, Color::Black);

        let json = serde_json::to_string(&mv).unwrap();

        assert_eq!(json, r#"{"x":2,"y":3,"color":1}"#);
        assert!(serde_json::from_str::<Move>(r#"{"x":2,"y":3,"color":0}"#).is_err());
    }

    #[test]
    fn move_square_rejects_off_board_coordinates() {
        assert_eq!(Move::new(7, 7, Color::White).square(), Some((7, 7)));
        let off = Move {
            x: -1,
            y: 3,
            color: Color::White,
        };
        assert_eq!(off.square(), None);
        let off = Move {
            x: 2,
            y: 8,
            color: Color::White,
        };
        assert_eq!(off.square(), None);
    }

    #[test]
    fn result_from_counts_picks_winner_and_message() {
        assert_eq!(
            GameResult::from_counts(40, 24),
            GameResult {
                winner: Winner::Black,
                message: "black win".to_string()
            }
        );
        assert_eq!(GameResult::from_counts(10, 54).winner, Winner::White);
        assert_eq!(GameResult::from_counts(32, 32).message, "draw");
    }

    #[test]
    fn outbound_serializes_without_tag() {
        let json = serde_json::to_string(&Outbound::Result(GameResult::from_counts(1, 0))).unwrap();

        assert_eq!(json, r#"{"winner":1,"message":"black win"}"#);
    }
}
