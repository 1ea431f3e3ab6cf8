use log::{debug, info, warn};

use crate::ai::search::Searcher;
use crate::board::Board;
use crate::channel::Channel;
use crate::config::SessionConfig;
use crate::error::{ChannelError, GameError, SessionError};
use crate::types::{
    Color, FirstMover, GameResult, GameState, Move, Outbound, ResetRequest, StartConfig,
};

/// Where a session is in its game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    AwaitingConfig,
    PlayerTurn,
    AiTurn,
    GameOver(GameResult),
}

impl Phase {
    fn name(&self) -> &'static str {
        match self {
            Self::AwaitingConfig => "awaiting config",
            Self::PlayerTurn => "on the player's turn",
            Self::AiTurn => "on the AI's turn",
            Self::GameOver(_) => "game over",
        }
    }
}

/// Input the session needs before it can advance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expect {
    Config,
    Move,
    Reset,
    /// The AI is to move; no peer input is read.
    Nothing,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Configure(StartConfig),
    PlayerMove(Move),
    AiTurn,
    Reset(ResetRequest),
}

impl Event {
    fn name(&self) -> &'static str {
        match self {
            Self::Configure(_) => "start configuration",
            Self::PlayerMove(_) => "player move",
            Self::AiTurn => "AI turn",
            Self::Reset(_) => "reset request",
        }
    }
}

/// One game between a remote player and the searcher.
pub struct Session {
    board: Board,
    turn: Color,
    human: Color,
    phase: Phase,
    searcher: Searcher,
}

impl Session {
    pub fn new(config: SessionConfig) -> Self {
        Self {
            board: Board::new(),
            turn: Color::Black,
            human: Color::Black,
            phase: Phase::AwaitingConfig,
            searcher: Searcher::new(config.search),
        }
    }

    /// Starts an already configured game from an arbitrary position.
    /// The side to move is skipped if it has no legal move.
    pub fn with_position(config: SessionConfig, board: Board, human: Color, turn: Color) -> Self {
        let mut session = Self::new(config);
        session.board = board;
        session.human = human;
        session.turn = turn;
        session.settle();
        session
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn human(&self) -> Color {
        self.human
    }

    pub fn ai(&self) -> Color {
        self.human.opponent()
    }

    pub fn expects(&self) -> Expect {
        match self.phase {
            Phase::AwaitingConfig => Expect::Config,
            Phase::PlayerTurn => Expect::Move,
            Phase::AiTurn => Expect::Nothing,
            Phase::GameOver(_) => Expect::Reset,
        }
    }

    pub fn snapshot(&self) -> GameState {
        let (black, white) = self.board.count();
        GameState {
            board: self.board.to_rows(),
            turn: self.turn,
            black,
            white,
        }
    }

    /// First message sent to a newly connected peer.
    pub fn open(&self) -> Outbound {
        Outbound::State(self.snapshot())
    }

    /// Decodes a text frame as whatever the current phase waits for.
    pub fn decode(&self, frame: &str) -> Result<Event, SessionError> {
        let event = match self.expects() {
            Expect::Config => Event::Configure(serde_json::from_str(frame)?),
            Expect::Move => Event::PlayerMove(serde_json::from_str(frame)?),
            Expect::Reset => Event::Reset(serde_json::from_str(frame)?),
            Expect::Nothing => {
                return Err(SessionError::UnexpectedEvent {
                    phase: self.phase.name(),
                    event: "peer message",
                });
            }
        };
        Ok(event)
    }

    /// Applies one event and returns the messages for the peer.
    pub fn handle(&mut self, event: Event) -> Result<Vec<Outbound>, SessionError> {
        match (&self.phase, event) {
            (Phase::AwaitingConfig, Event::Configure(conf)) => {
                self.configure(conf);
                Ok(self.emit())
            }
            (Phase::PlayerTurn, Event::PlayerMove(mv)) => {
                if let Err(err) = self.play_human(mv) {
                    warn!("rejected move {mv:?}: {err}");
                }
                Ok(self.emit())
            }
            (Phase::AiTurn, Event::AiTurn) => {
                self.play_ai();
                Ok(self.emit())
            }
            (Phase::GameOver(result), Event::Reset(request)) => {
                if !request.reset {
                    return Ok(vec![Outbound::Result(result.clone())]);
                }
                info!("game reset");
                self.board = Board::new();
                self.turn = Color::Black;
                self.phase = Phase::AwaitingConfig;
                Ok(vec![self.open()])
            }
            (phase, event) => Err(SessionError::UnexpectedEvent {
                phase: phase.name(),
                event: event.name(),
            }),
        }
    }

    /// Plays AI turns until peer input is required.
    pub fn advance(&mut self) -> Result<Vec<Outbound>, SessionError> {
        let mut out = Vec::new();
        while self.expects() == Expect::Nothing {
            out.extend(self.handle(Event::AiTurn)?);
        }
        Ok(out)
    }

    /// Drives the session over `channel` until the peer hangs up.
    pub fn serve<C: Channel>(&mut self, channel: &mut C) -> Result<(), SessionError> {
        info!("session opened");
        send(channel, &self.open())?;

        loop {
            let event = if self.expects() == Expect::Nothing {
                Event::AiTurn
            } else {
                let frame = match channel.recv() {
                    Ok(frame) => frame,
                    Err(ChannelError::Closed) => {
                        info!("peer closed the session");
                        return Ok(());
                    }
                    Err(err) => return Err(err.into()),
                };
                self.decode(&frame).inspect_err(|err| {
                    warn!("protocol error {}: {err}", self.phase.name());
                })?
            };

            for message in self.handle(event)? {
                send(channel, &message)?;
            }
        }
    }

    fn configure(&mut self, conf: StartConfig) {
        self.human = conf.color.into();
        self.turn = match conf.first {
            FirstMover::Human => self.human,
            FirstMover::Ai => self.ai(),
        };
        info!("game configured: player {:?}, {:?} first", self.human, conf.first);
        self.settle();
    }

    fn play_human(&mut self, mv: Move) -> Result<(), GameError> {
        if mv.color != self.human {
            return Err(GameError::WrongColor {
                expected: self.human,
                got: mv.color,
            });
        }
        let (row, col) = mv
            .square()
            .ok_or(GameError::OutOfBounds { x: mv.x, y: mv.y })?;
        self.board.apply(row, col, self.human)?;
        self.turn = self.ai();
        self.settle();
        Ok(())
    }

    fn play_ai(&mut self) {
        let ai = self.ai();
        match self.searcher.choose_move(&mut self.board, ai) {
            Some(mv) => debug!("AI plays ({}, {})", mv.x, mv.y),
            None => debug!("AI has no legal move"),
        }
        self.turn = self.human;
        self.settle();
    }

    /// Resolves game over and skip-turns after the turn has been handed over.
    fn settle(&mut self) {
        if self.board.is_game_over() {
            let (black, white) = self.board.count();
            let result = GameResult::from_counts(black, white);
            info!("game over: {} ({black}-{white})", result.message);
            self.phase = Phase::GameOver(result);
            return;
        }

        if !self.board.has_legal_move(self.turn) {
            debug!("{:?} has no legal move, turn passes", self.turn);
            self.turn = self.turn.opponent();
        }
        self.phase = if self.turn == self.human {
            Phase::PlayerTurn
        } else {
            Phase::AiTurn
        };
    }

    fn emit(&self) -> Vec<Outbound> {
        let mut out = vec![Outbound::State(self.snapshot())];
        if let Phase::GameOver(result) = &self.phase {
            out.push(Outbound::Result(result.clone()));
        }
        out
    }
}

fn send<C: Channel>(channel: &mut C, message: &Outbound) -> Result<(), SessionError> {
    let frame = serde_json::to_string(message)?;
    channel.send(&frame)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SearchConfig;
    use crate::types::{PlayerColor, Winner};

    const FULL_BOARD: u64 = u64::MAX;

    fn bit(row: usize, col: usize) -> u64 {
        1u64 << (row * 8 + col)
    }

    fn quick_config() -> SessionConfig {
        SessionConfig {
            search: SearchConfig::with_depth(2),
        }
    }

    fn start(color: PlayerColor, first: FirstMover) -> Event {
        Event::Configure(StartConfig { color, first })
    }

    fn states(out: &[Outbound]) -> Vec<&GameState> {
        out.iter()
            .filter_map(|m| match m {
                Outbound::State(s) => Some(s),
                Outbound::Result(_) => None,
            })
            .collect()
    }

    #[test]
    fn initial_state_is_correct() {
        let session = Session::new(quick_config());
        let state = session.snapshot();

        assert_eq!(session.phase(), &Phase::AwaitingConfig);
        assert_eq!(session.expects(), Expect::Config);
        assert_eq!(state.turn, Color::Black);
        assert_eq!((state.black, state.white), (2, 2));
        assert_eq!(state.board, Board::new().to_rows());
    }

    #[test]
    fn configure_routes_to_player_or_ai() {
        let mut human_first = Session::new(quick_config());
        human_first
            .handle(start(PlayerColor::Black, FirstMover::Human))
            .unwrap();
        assert_eq!(human_first.phase(), &Phase::PlayerTurn);
        assert_eq!(human_first.snapshot().turn, Color::Black);

        let mut ai_first = Session::new(quick_config());
        ai_first
            .handle(start(PlayerColor::Black, FirstMover::Ai))
            .unwrap();
        assert_eq!(ai_first.phase(), &Phase::AiTurn);
        assert_eq!(ai_first.ai(), Color::White);
        assert_eq!(ai_first.snapshot().turn, Color::White);
    }

    #[test]
    fn legal_player_move_hands_turn_to_ai() {
        let mut session = Session::new(quick_config());
        session
            .handle(start(PlayerColor::Black, FirstMover::Human))
            .unwrap();

        let out = session
            .handle(Event::PlayerMove(Move::new(2, 3, Color::Black)))
            .unwrap();

        assert_eq!(out.len(), 1);
        let state = states(&out)[0];
        assert_eq!((state.black, state.white), (4, 1));
        assert_eq!(state.turn, Color::White);
        assert_eq!(session.phase(), &Phase::AiTurn);
    }

    #[test]
    fn illegal_player_move_is_dropped_and_snapshot_resent() {
        let mut session = Session::new(quick_config());
        session
            .handle(start(PlayerColor::Black, FirstMover::Human))
            .unwrap();
        let before = session.snapshot();

        for mv in [
            Move::new(0, 0, Color::Black),
            Move::new(3, 3, Color::Black),
            Move::new(2, 3, Color::White),
            Move {
                x: 9,
                y: -1,
                color: Color::Black,
            },
        ] {
            let out = session.handle(Event::PlayerMove(mv)).unwrap();
            assert_eq!(out, vec![Outbound::State(before.clone())]);
            assert_eq!(session.phase(), &Phase::PlayerTurn);
        }
    }

    #[test]
    fn ai_turn_plays_one_move_and_returns_to_player() {
        let mut session = Session::new(quick_config());
        session
            .handle(start(PlayerColor::White, FirstMover::Ai))
            .unwrap();

        let out = session.handle(Event::AiTurn).unwrap();

        let state = states(&out)[0];
        assert_eq!((state.black, state.white), (4, 1));
        assert_eq!(state.turn, Color::White);
        assert_eq!(session.phase(), &Phase::PlayerTurn);
    }

    #[test]
    fn player_keeps_turn_when_ai_cannot_move() {
        // After black takes (0,0) white keeps (7,1) but every ray from a
        // black disc runs off the board.
        let board = Board::from_ascii(
            "
            . W B . . . . .
            . . . . . . . .
            . . . . . . . .
            . . . . . . . .
            . . . . . . . .
            . . . . . . . .
            . . . . . . . .
            B W . . . . . .
            ",
        )
        .unwrap();
        let mut session = Session::with_position(quick_config(), board, Color::Black, Color::Black);
        assert_eq!(session.phase(), &Phase::PlayerTurn);

        let out = session
            .handle(Event::PlayerMove(Move::new(0, 0, Color::Black)))
            .unwrap();

        assert!(!session.board().has_legal_move(Color::White));
        assert!(!session.board().is_game_over());
        assert_eq!(session.phase(), &Phase::PlayerTurn);
        assert_eq!(states(&out)[0].turn, Color::Black);
    }

    #[test]
    fn stuck_ai_is_skipped_without_touching_board() {
        // White (AI) to move but only black can capture.
        let white = bit(0, 1);
        let black = FULL_BOARD ^ bit(0, 0) ^ white;
        let board = Board::from_bitboards(black, white);
        let mut session = Session::with_position(quick_config(), board, Color::Black, Color::White);

        assert_eq!(session.phase(), &Phase::PlayerTurn);
        assert_eq!(session.board(), &board);
    }

    #[test]
    fn final_move_emits_snapshot_then_result() {
        let black = bit(0, 1);
        let white = FULL_BOARD ^ bit(0, 0) ^ black;
        let board = Board::from_bitboards(black, white);
        let mut session = Session::with_position(quick_config(), board, Color::Black, Color::White);
        assert_eq!(session.phase(), &Phase::AiTurn);

        let out = session.advance().unwrap();

        assert_eq!(out.len(), 2);
        assert_eq!((states(&out)[0].black, states(&out)[0].white), (0, 64));
        let expected = GameResult {
            winner: Winner::White,
            message: "white win".to_string(),
        };
        assert_eq!(out[1], Outbound::Result(expected.clone()));
        assert_eq!(session.phase(), &Phase::GameOver(expected));
        assert_eq!(session.expects(), Expect::Reset);
    }

    #[test]
    fn reset_false_redelivers_result_and_keeps_state() {
        let board = Board::from_bitboards(FULL_BOARD >> 32, FULL_BOARD << 32);
        let mut session = Session::with_position(quick_config(), board, Color::Black, Color::Black);
        let before = session.snapshot();

        for _ in 0..3 {
            let out = session
                .handle(Event::Reset(ResetRequest { reset: false }))
                .unwrap();
            assert_eq!(
                out,
                vec![Outbound::Result(GameResult {
                    winner: Winner::Draw,
                    message: "draw".to_string()
                })]
            );
            assert_eq!(session.snapshot(), before);
        }
    }

    #[test]
    fn reset_true_restores_canonical_start() {
        let board = Board::from_bitboards(FULL_BOARD, 0);
        let mut session = Session::with_position(quick_config(), board, Color::White, Color::White);

        let out = session
            .handle(Event::Reset(ResetRequest { reset: true }))
            .unwrap();

        assert_eq!(out, vec![Session::new(quick_config()).open()]);
        assert_eq!(session.phase(), &Phase::AwaitingConfig);
        assert_eq!(session.snapshot(), Session::new(quick_config()).snapshot());
    }

    #[test]
    fn events_out_of_phase_are_protocol_errors() {
        let mut session = Session::new(quick_config());

        let err = session
            .handle(Event::PlayerMove(Move::new(2, 3, Color::Black)))
            .unwrap_err();
        assert!(matches!(
            err,
            SessionError::UnexpectedEvent {
                event: "player move",
                ..
            }
        ));
        assert!(session.handle(Event::AiTurn).is_err());
        assert!(
            session
                .handle(Event::Reset(ResetRequest { reset: true }))
                .is_err()
        );
    }

    #[test]
    fn decode_follows_expected_message() {
        let mut session = Session::new(quick_config());

        let event = session.decode(r#"{"color":"black","turn":1}"#).unwrap();
        assert_eq!(event, start(PlayerColor::Black, FirstMover::Human));
        assert!(matches!(
            session.decode(r#"{"x":2,"y":3,"color":1}"#),
            Err(SessionError::Decode(_))
        ));

        session.handle(event).unwrap();
        assert_eq!(
            session.decode(r#"{"x":2,"y":3,"color":1}"#).unwrap(),
            Event::PlayerMove(Move::new(2, 3, Color::Black))
        );
    }
}
