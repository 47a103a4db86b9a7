use serde::Serialize;

/// Points awarded per cleared row.
pub const LINE_SCORE: usize = 10;

/// Score and progress counters of one game.
///
/// `score` belongs to the current stage and goes back to zero when the next
/// stage starts; `total_score` keeps counting across stages.
///
/// ```
/// use blockfall_engine::GameStats;
///
/// let mut stats = GameStats::new();
/// assert_eq!(stats.complete_piece_drop(2), 20);
/// assert_eq!(stats.score(), 20);
/// assert_eq!(stats.total_cleared_lines(), 2);
/// assert_eq!(stats.line_cleared_counter()[2], 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameStats {
    score: usize,
    total_score: usize,
    stage: usize,
    completed_pieces: usize,
    total_cleared_lines: usize,
    line_cleared_counter: [usize; 5],
}

impl Default for GameStats {
    fn default() -> Self {
        Self::new()
    }
}

impl GameStats {
    /// Creates counters for a fresh game on stage 1.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            score: 0,
            total_score: 0,
            stage: 1,
            completed_pieces: 0,
            total_cleared_lines: 0,
            line_cleared_counter: [0; 5],
        }
    }

    /// Score of the current stage.
    #[must_use]
    pub const fn score(&self) -> usize {
        self.score
    }

    #[must_use]
    pub const fn total_score(&self) -> usize {
        self.total_score
    }

    /// Current stage, starting at 1.
    #[must_use]
    pub const fn stage(&self) -> usize {
        self.stage
    }

    #[must_use]
    pub const fn completed_pieces(&self) -> usize {
        self.completed_pieces
    }

    #[must_use]
    pub const fn total_cleared_lines(&self) -> usize {
        self.total_cleared_lines
    }

    /// Histogram of locks by number of rows cleared.
    ///
    /// Index 0 counts locks that cleared nothing; the last bucket also counts
    /// clears of more than four rows, which pre-seeded full rows can cause.
    #[must_use]
    pub const fn line_cleared_counter(&self) -> &[usize; 5] {
        &self.line_cleared_counter
    }

    /// Records a locked piece that cleared `cleared_lines` rows and returns the points gained.
    pub fn complete_piece_drop(&mut self, cleared_lines: usize) -> usize {
        let points = cleared_lines * LINE_SCORE;
        self.completed_pieces += 1;
        self.total_cleared_lines += cleared_lines;
        let bucket = cleared_lines.min(self.line_cleared_counter.len() - 1);
        self.line_cleared_counter[bucket] += 1;
        self.score += points;
        self.total_score += points;
        points
    }

    /// Moves on to the next stage. The stage score is kept until [`reset_score`](Self::reset_score).
    pub const fn advance_stage(&mut self) {
        self.stage += 1;
    }

    pub const fn reset_score(&mut self) {
        self.score = 0;
    }
}
