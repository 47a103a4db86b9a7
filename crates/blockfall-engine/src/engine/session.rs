use std::time::Duration;

use rand::Rng;
use rand_pcg::Pcg32;
use serde::Serialize;

use crate::{
    InputError, PieceCollisionError,
    core::{Board, Piece, PieceKind},
};

use super::{
    ConfigError, GameConfig, GameOverPolicy, GameSnapshot, GameStats, SessionEvent, SessionSeed,
    StageClearPolicy, Timer,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, derive_more::IsVariant)]
#[serde(rename_all = "kebab-case")]
pub enum SessionState {
    /// Gravity ticks and input are active.
    Playing,
    Paused,
    /// The stage was cleared; the next one starts once the delay elapses.
    StageAdvance,
    /// The stage was cleared and play stopped there.
    StageCleared,
    GameOver,
}

/// One running game: board, active piece, score, stage and the gravity timer.
///
/// The session never reads a clock. Callers report elapsed time through
/// [`advance`](Self::advance) and player input through the `try_*` commands,
/// both from the same thread, and render from [`snapshot`](Self::snapshot).
///
/// The session holds a single [`Timer`] and replaces it on every transition,
/// so there is never more than one pending tick or delay.
///
/// # Example
///
/// ```
/// use std::time::Duration;
///
/// use blockfall_engine::{GameConfig, GameSession, SessionSeed};
///
/// let seed: SessionSeed = "000102030405060708090a0b0c0d0e0f".parse().unwrap();
/// let mut session = GameSession::with_seed(GameConfig::default(), seed).unwrap();
/// let y = session.falling_piece().position().y();
///
/// session.advance(Duration::from_millis(500));
/// assert_eq!(session.falling_piece().position().y(), y + 1);
/// ```
#[derive(Debug, Clone)]
pub struct GameSession<R = Pcg32> {
    config: GameConfig,
    seed: Option<SessionSeed>,
    rng: R,
    board: Board,
    falling_piece: Piece,
    stats: GameStats,
    session_state: SessionState,
    timer: Timer,
    stage_cleared: bool,
    games_played: usize,
    events: Vec<SessionEvent>,
}

impl GameSession {
    /// Starts a session with a freshly drawn seed.
    pub fn new(config: GameConfig) -> Result<Self, ConfigError> {
        Self::with_seed(config, rand::rng().random())
    }

    /// Starts a reproducible session: the same seed and the same inputs give
    /// the same game.
    pub fn with_seed(config: GameConfig, seed: SessionSeed) -> Result<Self, ConfigError> {
        let mut session = Self::with_rng(config, seed.rng())?;
        session.seed = Some(seed);
        Ok(session)
    }
}

impl<R> GameSession<R>
where
    R: Rng,
{
    /// Starts a session that draws pieces and terrain from `rng`.
    pub fn with_rng(config: GameConfig, rng: R) -> Result<Self, ConfigError> {
        config.validate()?;
        let board = Board::new(config.width, config.height);
        let mut session = Self::from_parts(config, board, rng);
        session.begin_stage(true);
        Ok(session)
    }

    /// Starts stage 1 on `board` as given, without seeding terrain.
    ///
    /// Used to set up specific positions; later stages and restarts seed
    /// their boards as usual.
    pub fn with_board(config: GameConfig, board: Board, rng: R) -> Result<Self, ConfigError> {
        config.validate()?;
        if board.width() != config.width || board.height() != config.height {
            return Err(ConfigError::BoardSizeMismatch {
                width: board.width(),
                height: board.height(),
                expected_width: config.width,
                expected_height: config.height,
            });
        }
        let mut session = Self::from_parts(config, board, rng);
        session.begin_stage(false);
        Ok(session)
    }

    fn from_parts(config: GameConfig, board: Board, rng: R) -> Self {
        // replaced by the first spawn
        let falling_piece = Piece::spawn(
            PieceKind::O,
            config.palette.color(PieceKind::O),
            board.width(),
        );
        Self {
            config,
            seed: None,
            rng,
            board,
            falling_piece,
            stats: GameStats::new(),
            session_state: SessionState::Playing,
            timer: Timer::Stopped,
            stage_cleared: false,
            games_played: 1,
            events: vec![],
        }
    }

    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// The seed this session was started from, if it was started from one.
    #[must_use]
    pub fn seed(&self) -> Option<SessionSeed> {
        self.seed
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[must_use]
    pub fn falling_piece(&self) -> &Piece {
        &self.falling_piece
    }

    #[must_use]
    pub fn stats(&self) -> &GameStats {
        &self.stats
    }

    #[must_use]
    pub fn session_state(&self) -> SessionState {
        self.session_state
    }

    #[must_use]
    pub fn timer(&self) -> &Timer {
        &self.timer
    }

    /// Whether the winning score was reached on this stage while play continues.
    #[must_use]
    pub fn stage_cleared(&self) -> bool {
        self.stage_cleared
    }

    /// Number of games started in this session, including the current one.
    #[must_use]
    pub fn games_played(&self) -> usize {
        self.games_played
    }

    /// Where the active piece would land if dropped straight down.
    #[must_use]
    pub fn drop_position(&self) -> Piece {
        self.falling_piece.drop_position(&self.board)
    }

    /// Events queued since the last [`drain_events`](Self::drain_events).
    #[must_use]
    pub fn events(&self) -> &[SessionEvent] {
        &self.events
    }

    pub fn drain_events(&mut self) -> impl Iterator<Item = SessionEvent> + '_ {
        self.events.drain(..)
    }

    #[must_use]
    pub fn snapshot(&self) -> GameSnapshot<'_> {
        let in_play = matches!(
            self.session_state,
            SessionState::Playing | SessionState::Paused
        );
        let piece_visible = in_play || self.session_state.is_game_over();
        GameSnapshot {
            board: &self.board,
            piece: piece_visible.then_some(&self.falling_piece),
            ghost: in_play.then(|| self.drop_position()),
            state: self.session_state,
            stats: &self.stats,
            tick_period_ms: millis(self.config.tick_period(self.stats.stage())),
            stage_cleared: self.stage_cleared,
            games_played: self.games_played,
        }
    }

    /// Feeds `elapsed` wall-clock time into the session timer.
    ///
    /// Every time the timer fires, the matching step runs: a gravity tick
    /// while playing, the start of the next stage after the stage-clear
    /// delay. Time left over after a step is fed back, so one long call
    /// behaves like many short ones. Paused sessions keep their partial
    /// progress toward the next tick.
    pub fn advance(&mut self, elapsed: Duration) {
        if self.session_state.is_paused() {
            return;
        }
        let mut budget = elapsed;
        while let Some(leftover) = self.timer.poll(budget) {
            budget = leftover;
            match self.session_state {
                SessionState::Playing => self.tick(),
                SessionState::StageAdvance => self.start_next_stage(),
                SessionState::Paused | SessionState::StageCleared | SessionState::GameOver => {
                    break;
                }
            }
        }
    }

    /// Runs one gravity step: moves the piece down one row, or locks it if it
    /// cannot move. Does nothing unless the session is playing.
    pub fn tick(&mut self) {
        if !self.session_state.is_playing() {
            return;
        }
        let moved = self.falling_piece.down();
        if moved.fits(&self.board) {
            self.falling_piece = moved;
        } else {
            self.lock_piece();
        }
    }

    /// Replaces the active piece if it fits on the board.
    pub fn set_falling_piece(&mut self, piece: Piece) -> Result<(), PieceCollisionError> {
        if !piece.fits(&self.board) {
            return Err(PieceCollisionError);
        }
        self.falling_piece = piece;
        Ok(())
    }

    pub fn try_move_left(&mut self) -> Result<(), InputError> {
        self.try_input(Piece::left)
    }

    pub fn try_move_right(&mut self) -> Result<(), InputError> {
        self.try_input(Piece::right)
    }

    /// Moves the piece down one row. Never locks; locking is left to gravity.
    pub fn try_soft_drop(&mut self) -> Result<(), InputError> {
        self.try_input(Piece::down)
    }

    /// Rotates clockwise, trying the current column, then one to the right,
    /// then one to the left.
    pub fn try_rotate(&mut self) -> Result<(), InputError> {
        self.ensure_playing()?;
        let piece = self
            .falling_piece
            .kicked_rotation(&self.board)
            .ok_or(InputError::PieceCollision(PieceCollisionError))?;
        self.falling_piece = piece;
        Ok(())
    }

    fn try_input(&mut self, f: impl FnOnce(&Piece) -> Piece) -> Result<(), InputError> {
        self.ensure_playing()?;
        let piece = f(&self.falling_piece);
        self.set_falling_piece(piece).map_err(InputError::PieceCollision)
    }

    fn ensure_playing(&self) -> Result<(), InputError> {
        if self.session_state.is_playing() {
            Ok(())
        } else {
            Err(InputError::NotPlaying)
        }
    }

    /// Switches between playing and paused. Other states are left alone.
    pub fn toggle_pause(&mut self) {
        self.session_state = match self.session_state {
            SessionState::Playing => SessionState::Paused,
            SessionState::Paused => SessionState::Playing,
            state => state,
        };
    }

    /// Abandons the current game and starts over on stage 1 with a new board.
    pub fn restart(&mut self) {
        self.stats = GameStats::new();
        self.games_played += 1;
        self.events.push(SessionEvent::Restarted {
            games_played: self.games_played,
        });
        self.begin_stage(true);
    }

    fn lock_piece(&mut self) {
        let piece = self.falling_piece;
        if piece.position().y() < 0 {
            // parts of the piece would be locked above the board
            self.on_spawn_collision();
            return;
        }
        self.board.fill_piece(&piece);
        self.events.push(SessionEvent::PieceLocked { kind: piece.kind() });

        let cleared_lines = self.board.clear_full_rows();
        let points = self.stats.complete_piece_drop(cleared_lines);
        if cleared_lines > 0 {
            self.events.push(SessionEvent::LinesCleared {
                lines: cleared_lines,
                points,
            });
            if !self.stage_cleared && self.stats.score() >= self.config.winning_score {
                self.events.push(SessionEvent::StageCleared {
                    stage: self.stats.stage(),
                    score: self.stats.score(),
                });
                match self.config.stage_clear_policy {
                    StageClearPolicy::Advance => {
                        self.stats.advance_stage();
                        self.session_state = SessionState::StageAdvance;
                        self.timer = Timer::delay(self.config.stage_advance_delay);
                        return;
                    }
                    StageClearPolicy::Freeze => {
                        self.session_state = SessionState::StageCleared;
                        self.timer = Timer::Stopped;
                        return;
                    }
                    StageClearPolicy::Continue => self.stage_cleared = true,
                }
            }
        }

        if self.spawn_piece().is_err() {
            self.on_spawn_collision();
        }
    }

    /// Draws the next kind and places it at the spawn position.
    ///
    /// The piece becomes active even when it collides, so the final position
    /// stays visible after a game over.
    fn spawn_piece(&mut self) -> Result<(), PieceCollisionError> {
        let kind: PieceKind = self.rng.random();
        let piece = Piece::spawn(kind, self.config.palette.color(kind), self.board.width());
        self.falling_piece = piece;
        if piece.fits(&self.board) {
            Ok(())
        } else {
            Err(PieceCollisionError)
        }
    }

    fn on_spawn_collision(&mut self) {
        self.end_game();
        match self.config.game_over_policy {
            GameOverPolicy::Halt => {}
            GameOverPolicy::Restart => self.restart(),
        }
    }

    fn end_game(&mut self) {
        self.events.push(SessionEvent::GameOver {
            stage: self.stats.stage(),
            score: self.stats.score(),
        });
        self.session_state = SessionState::GameOver;
        self.timer = Timer::Stopped;
    }

    fn start_next_stage(&mut self) {
        self.stats.reset_score();
        self.begin_stage(true);
    }

    fn begin_stage(&mut self, seed_terrain: bool) {
        let stage = self.stats.stage();
        if seed_terrain {
            let palette = self.config.palette.colors();
            self.board = Board::new(self.config.width, self.config.height);
            self.board.seed_random_fill(
                self.config.fill_probability,
                self.config.seed_start_row(stage),
                &palette,
                &mut self.rng,
            );
        }
        let tick_period = self.config.tick_period(stage);
        self.timer = Timer::repeating(tick_period);
        self.session_state = SessionState::Playing;
        self.stage_cleared = false;
        self.events.push(SessionEvent::StageStarted {
            stage,
            tick_period_ms: millis(tick_period),
        });

        if self.spawn_piece().is_err() {
            // a board that blocks the very first spawn would block every
            // restart as well, so this always halts
            self.end_game();
        }
    }
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
