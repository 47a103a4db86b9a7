use std::time::Duration;

/// The session's only scheduling handle.
///
/// A session owns exactly one `Timer` value and replaces it wholesale on
/// every transition (stage start, stage-advance pause, game over), so two
/// gravity loops can never run at the same time.
///
/// Time is fed in explicitly through [`poll`](Self::poll); the timer itself
/// never reads a clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum Timer {
    /// Fires every `period`.
    Repeating { period: Duration, elapsed: Duration },
    /// Fires once after `delay`, then stops.
    Delay { delay: Duration, elapsed: Duration },
    /// Never fires.
    Stopped,
}

impl Timer {
    /// # Panics
    ///
    /// Panics if `period` is zero.
    #[must_use]
    pub fn repeating(period: Duration) -> Self {
        assert!(!period.is_zero(), "repeating timer period must be non-zero");
        Self::Repeating {
            period,
            elapsed: Duration::ZERO,
        }
    }

    #[must_use]
    pub const fn delay(delay: Duration) -> Self {
        Self::Delay {
            delay,
            elapsed: Duration::ZERO,
        }
    }

    /// The repeat period, if this is a repeating timer.
    #[must_use]
    pub const fn period(&self) -> Option<Duration> {
        match self {
            Self::Repeating { period, .. } => Some(*period),
            Self::Delay { .. } | Self::Stopped => None,
        }
    }

    /// Time left until the timer fires next, or `None` if it is stopped.
    #[must_use]
    pub fn remaining(&self) -> Option<Duration> {
        match *self {
            Self::Repeating { period, elapsed } => Some(period.saturating_sub(elapsed)),
            Self::Delay { delay, elapsed } => Some(delay.saturating_sub(elapsed)),
            Self::Stopped => None,
        }
    }

    /// Adds `elapsed` to the timer.
    ///
    /// Returns `Some(leftover)` when the timer fires, where `leftover` is the
    /// part of `elapsed` not yet consumed; feed it back through another `poll`
    /// to catch up on several periods. Returns `None` otherwise.
    pub fn poll(&mut self, elapsed: Duration) -> Option<Duration> {
        match self {
            Self::Repeating {
                period,
                elapsed: acc,
            } => {
                let total = acc.saturating_add(elapsed);
                if total >= *period {
                    *acc = Duration::ZERO;
                    Some(total - *period)
                } else {
                    *acc = total;
                    None
                }
            }
            Self::Delay { delay, elapsed: acc } => {
                let total = acc.saturating_add(elapsed);
                if total >= *delay {
                    let leftover = total - *delay;
                    *self = Self::Stopped;
                    Some(leftover)
                } else {
                    *acc = total;
                    None
                }
            }
            Self::Stopped => None,
        }
    }
}
