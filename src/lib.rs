use wasm_bindgen::prelude::*;

pub mod ai;
pub mod board;
pub mod channel;
pub mod config;
pub mod error;
pub mod session;
pub mod types;
pub mod wasm;

pub use board::Board;
pub use channel::{Channel, LineChannel, MemoryChannel};
pub use config::{PassRule, SearchConfig, SessionConfig};
pub use error::{ChannelError, ConfigError, GameError, SessionError};
pub use session::{Event, Expect, Phase, Session};
pub use types::{Color, GameResult, GameState, Move, Outbound};

#[wasm_bindgen]
pub fn wasm_ready() -> bool {
    true
}
