use serde::Serialize;

use crate::core::PieceKind;

/// Something notable that happened inside a session.
///
/// Sessions queue these as they happen; callers collect them with
/// [`GameSession::drain_events`](crate::GameSession::drain_events) to log,
/// display or serialize them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, derive_more::Display)]
#[serde(tag = "event", rename_all = "kebab-case")]
pub enum SessionEvent {
    #[display("stage {stage} started (tick {tick_period_ms} ms)")]
    StageStarted { stage: usize, tick_period_ms: u64 },
    #[display("{} piece locked", kind.as_char())]
    PieceLocked { kind: PieceKind },
    #[display("{lines} line(s) cleared, +{points}")]
    LinesCleared { lines: usize, points: usize },
    #[display("stage {stage} cleared with {score} points")]
    StageCleared { stage: usize, score: usize },
    #[display("game over on stage {stage} with {score} points")]
    GameOver { stage: usize, score: usize },
    #[display("new game #{games_played}")]
    Restarted { games_played: usize },
}
