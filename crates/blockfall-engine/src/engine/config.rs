use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::core::{ColorPalette, MAX_SHAPE_SIZE};

/// Largest accepted board width or height.
pub const MAX_BOARD_SIZE: usize = 256;

/// What happens when a freshly spawned piece collides immediately.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, derive_more::FromStr,
)]
#[serde(rename_all = "kebab-case")]
pub enum GameOverPolicy {
    /// Stop ticking and stay in the game-over state until restarted explicitly.
    #[default]
    Halt,
    /// Start a new session right away (score and stage back to their initial values).
    Restart,
}

/// What happens when the score reaches the winning threshold.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, derive_more::FromStr,
)]
#[serde(rename_all = "kebab-case")]
pub enum StageClearPolicy {
    /// Pause, then start the next stage on a fresh, re-seeded board at a faster tick.
    #[default]
    Advance,
    /// Stop ticking in the stage-cleared state.
    Freeze,
    /// Keep playing on the same board; the cleared flag is only reported.
    Continue,
}

/// Game constants, fixed for the lifetime of a session.
///
/// Every field has a default, so a JSON config only needs the fields it
/// changes. Durations are written as milliseconds.
///
/// ```
/// use std::time::Duration;
///
/// use blockfall_engine::GameConfig;
///
/// let config: GameConfig = serde_json::from_str(r#"{ "base_tick_ms": 400 }"#).unwrap();
/// assert_eq!(config.base_tick, Duration::from_millis(400));
/// assert_eq!(config.width, 10);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct GameConfig {
    /// Board columns.
    pub width: usize,
    /// Board rows.
    pub height: usize,
    /// Score at which the current stage is cleared.
    pub winning_score: usize,
    /// Gravity period on stage 1.
    #[serde(rename = "base_tick_ms", with = "millis")]
    pub base_tick: Duration,
    /// Amount the gravity period shrinks per stage.
    #[serde(rename = "stage_speed_delta_ms", with = "millis")]
    pub stage_speed_delta: Duration,
    /// Lower bound for the gravity period.
    #[serde(rename = "min_tick_ms", with = "millis")]
    pub min_tick: Duration,
    /// Pause between clearing a stage and starting the next one.
    #[serde(rename = "stage_advance_delay_ms", with = "millis")]
    pub stage_advance_delay: Duration,
    /// Probability that a cell in the seeded region starts filled.
    pub fill_probability: f64,
    /// Topmost row the seeded region may start at.
    pub min_seed_start_row: usize,
    pub palette: ColorPalette,
    pub game_over_policy: GameOverPolicy,
    pub stage_clear_policy: StageClearPolicy,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            width: 10,
            height: 20,
            winning_score: 100,
            base_tick: Duration::from_millis(500),
            stage_speed_delta: Duration::from_millis(50),
            min_tick: Duration::from_millis(100),
            stage_advance_delay: Duration::from_secs(2),
            fill_probability: 0.5,
            min_seed_start_row: 3,
            palette: ColorPalette::default(),
            game_over_policy: GameOverPolicy::default(),
            stage_clear_policy: StageClearPolicy::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum ConfigError {
    #[display("board must be at least {min}x{min} cells, got {width}x{height}")]
    BoardTooSmall {
        width: usize,
        height: usize,
        min: usize,
    },
    #[display("board must be at most {max}x{max} cells, got {width}x{height}")]
    BoardTooLarge {
        width: usize,
        height: usize,
        max: usize,
    },
    #[display("fill probability must be within 0.0..=1.0, got {value}")]
    InvalidFillProbability { value: f64 },
    #[display("tick periods must be non-zero")]
    ZeroTickPeriod,
    #[display("minimum tick ({min:?}) exceeds base tick ({base:?})")]
    MinTickAboveBase { min: Duration, base: Duration },
    #[display("winning score must be positive")]
    ZeroWinningScore,
    #[display("board is {width}x{height}, config expects {expected_width}x{expected_height}")]
    BoardSizeMismatch {
        width: usize,
        height: usize,
        expected_width: usize,
        expected_height: usize,
    },
}

impl GameConfig {
    /// Checks the invariants the session relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width < MAX_SHAPE_SIZE || self.height < MAX_SHAPE_SIZE {
            return Err(ConfigError::BoardTooSmall {
                width: self.width,
                height: self.height,
                min: MAX_SHAPE_SIZE,
            });
        }
        if self.width > MAX_BOARD_SIZE || self.height > MAX_BOARD_SIZE {
            return Err(ConfigError::BoardTooLarge {
                width: self.width,
                height: self.height,
                max: MAX_BOARD_SIZE,
            });
        }
        if !(0.0..=1.0).contains(&self.fill_probability) {
            return Err(ConfigError::InvalidFillProbability {
                value: self.fill_probability,
            });
        }
        if self.base_tick.is_zero() || self.min_tick.is_zero() {
            return Err(ConfigError::ZeroTickPeriod);
        }
        if self.min_tick > self.base_tick {
            return Err(ConfigError::MinTickAboveBase {
                min: self.min_tick,
                base: self.base_tick,
            });
        }
        if self.winning_score == 0 {
            return Err(ConfigError::ZeroWinningScore);
        }
        Ok(())
    }

    /// Gravity period for `stage` (1-based): `base - (stage - 1) * delta`, floored at `min_tick`.
    #[must_use]
    pub fn tick_period(&self, stage: usize) -> Duration {
        let steps = u32::try_from(stage.saturating_sub(1)).unwrap_or(u32::MAX);
        self.base_tick
            .saturating_sub(self.stage_speed_delta.saturating_mul(steps))
            .max(self.min_tick)
    }

    /// First row of the randomly filled region for `stage`.
    ///
    /// `height / 3 - stage`, but never above `min_seed_start_row`, so the
    /// region grows by one row per stage until it reaches that limit.
    #[must_use]
    pub fn seed_start_row(&self, stage: usize) -> usize {
        (self.height / 3)
            .saturating_sub(stage)
            .max(self.min_seed_start_row)
    }
}

mod millis {
    use std::time::Duration;

    use serde::{Deserialize as _, Deserializer, Serializer};

    pub(super) fn serialize<S>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let millis = u64::try_from(value.as_millis()).unwrap_or(u64::MAX);
        serializer.serialize_u64(millis)
    }

    pub(super) fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = u64::deserialize(deserializer)?;
        Ok(Duration::from_millis(millis))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert_eq!(GameConfig::default().validate(), Ok(()));
    }

    #[test]
    fn test_board_too_small() {
        let config = GameConfig {
            width: 3,
            ..GameConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::BoardTooSmall { width: 3, .. })
        ));
    }

    #[test]
    fn test_board_too_large() {
        let config = GameConfig {
            width: 100_000,
            height: 100_000,
            ..GameConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::BoardTooLarge {
                width: 100_000,
                height: 100_000,
                max: MAX_BOARD_SIZE,
            })
        );

        let tall = GameConfig {
            height: MAX_BOARD_SIZE + 1,
            ..GameConfig::default()
        };
        assert!(matches!(
            tall.validate(),
            Err(ConfigError::BoardTooLarge { .. })
        ));

        let largest = GameConfig {
            width: MAX_BOARD_SIZE,
            height: MAX_BOARD_SIZE,
            ..GameConfig::default()
        };
        assert_eq!(largest.validate(), Ok(()));
    }

    #[test]
    fn test_invalid_fill_probability() {
        for value in [-0.1, 1.5, f64::NAN] {
            let config = GameConfig {
                fill_probability: value,
                ..GameConfig::default()
            };
            assert!(
                matches!(
                    config.validate(),
                    Err(ConfigError::InvalidFillProbability { .. })
                ),
                "{value}"
            );
        }
    }

    #[test]
    fn test_tick_validation() {
        let zero = GameConfig {
            min_tick: Duration::ZERO,
            ..GameConfig::default()
        };
        assert_eq!(zero.validate(), Err(ConfigError::ZeroTickPeriod));

        let inverted = GameConfig {
            base_tick: Duration::from_millis(50),
            ..GameConfig::default()
        };
        assert!(matches!(
            inverted.validate(),
            Err(ConfigError::MinTickAboveBase { .. })
        ));
    }

    #[test]
    fn test_zero_winning_score() {
        let config = GameConfig {
            winning_score: 0,
            ..GameConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::ZeroWinningScore));
    }

    #[test]
    fn test_tick_period_decreases_and_floors() {
        let config = GameConfig::default();
        assert_eq!(config.tick_period(1), Duration::from_millis(500));
        assert_eq!(config.tick_period(2), Duration::from_millis(450));
        assert_eq!(config.tick_period(9), Duration::from_millis(100));
        assert_eq!(config.tick_period(10), Duration::from_millis(100));
        assert_eq!(config.tick_period(usize::MAX), Duration::from_millis(100));
        // stage 0 is treated like stage 1
        assert_eq!(config.tick_period(0), Duration::from_millis(500));
    }

    #[test]
    fn test_seed_start_row_grows_region_with_stage() {
        let config = GameConfig::default();
        // 20 / 3 = 6
        assert_eq!(config.seed_start_row(1), 5);
        assert_eq!(config.seed_start_row(2), 4);
        assert_eq!(config.seed_start_row(3), 3);
        assert_eq!(config.seed_start_row(4), 3);
        assert_eq!(config.seed_start_row(100), 3);
    }

    #[test]
    fn test_json_round_trip_uses_millis() {
        let config = GameConfig::default();
        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(json["base_tick_ms"], 500);
        assert_eq!(json["stage_advance_delay_ms"], 2000);
        assert_eq!(json["game_over_policy"], "halt");
        assert_eq!(json["stage_clear_policy"], "advance");

        let parsed: GameConfig = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_unknown_field_rejected() {
        let result: Result<GameConfig, _> = serde_json::from_str(r#"{ "colums": 12 }"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_policies_parse_from_str() {
        assert_eq!("halt".parse::<GameOverPolicy>().unwrap(), GameOverPolicy::Halt);
        assert_eq!(
            "Restart".parse::<GameOverPolicy>().unwrap(),
            GameOverPolicy::Restart
        );
        assert_eq!(
            "freeze".parse::<StageClearPolicy>().unwrap(),
            StageClearPolicy::Freeze
        );
        assert!("sometimes".parse::<StageClearPolicy>().is_err());
    }
}
