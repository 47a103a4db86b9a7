use serde::Serialize;

use crate::core::{Board, Piece};

use super::{GameStats, SessionState};

/// Read-only view of a session for renderers.
///
/// Borrowed from the session, so it can never be used to mutate it.
#[derive(Debug, Clone, Serialize)]
pub struct GameSnapshot<'a> {
    pub board: &'a Board,
    /// The active piece, or `None` while none is in play (stage transition).
    pub piece: Option<&'a Piece>,
    /// Where the active piece would land if dropped straight down.
    pub ghost: Option<Piece>,
    pub state: SessionState,
    pub stats: &'a GameStats,
    /// Gravity period of the current stage.
    pub tick_period_ms: u64,
    pub stage_cleared: bool,
    pub games_played: usize,
}

impl GameSnapshot<'_> {
    #[must_use]
    pub const fn score(&self) -> usize {
        self.stats.score()
    }

    #[must_use]
    pub const fn stage(&self) -> usize {
        self.stats.stage()
    }

    /// Status text for the current state, if any. While playing, only a
    /// stage cleared under the `continue` policy has one.
    #[must_use]
    pub fn message(&self) -> Option<String> {
        match self.state {
            SessionState::Playing if self.stage_cleared => Some("STAGE CLEAR!".to_owned()),
            SessionState::Playing => None,
            SessionState::Paused => Some("PAUSED".to_owned()),
            SessionState::StageAdvance => Some(format!("CLEAR! NEXT: STAGE {}", self.stage())),
            SessionState::StageCleared => Some("STAGE CLEAR!".to_owned()),
            SessionState::GameOver => Some("GAME OVER".to_owned()),
        }
    }
}
