use std::{fs::File, io, path::Path};

use anyhow::Context as _;
use blockfall_engine::GameConfig;
use serde::{Deserialize, Serialize};

/// Contents of a `--config` file.
///
/// Both sections and every field in them are optional:
///
/// ```json
/// {
///   "game": { "winning_score": 200, "stage_clear_policy": "freeze" },
///   "display": { "block_size": 3 }
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub game: GameConfig,
    pub display: DisplayConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct DisplayConfig {
    /// Terminal columns per board cell.
    pub block_size: u16,
    /// Mark where the active piece would land.
    pub show_ghost: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            block_size: 2,
            show_ghost: true,
        }
    }
}

impl Settings {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("Failed to open config file: {}", path.display()))?;
        let settings = serde_json::from_reader(io::BufReader::new(file))
            .with_context(|| format!("Failed to parse config JSON file: {}", path.display()))?;
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use std::{fs, time::Duration};

    use blockfall_engine::StageClearPolicy;

    use super::*;

    #[test]
    fn test_partial_settings_use_defaults() {
        let settings: Settings = serde_json::from_str(
            r#"{ "game": { "min_tick_ms": 80, "stage_clear_policy": "continue" } }"#,
        )
        .unwrap();
        assert_eq!(settings.game.min_tick, Duration::from_millis(80));
        assert_eq!(settings.game.stage_clear_policy, StageClearPolicy::Continue);
        assert_eq!(settings.game.height, 20);
        assert_eq!(settings.display, DisplayConfig::default());
    }

    #[test]
    fn test_unknown_section_rejected() {
        let result: Result<Settings, _> = serde_json::from_str(r#"{ "sound": {} }"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_load_reports_path() {
        let path = Path::new("/nonexistent/blockfall.json");
        let err = Settings::load(path).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/blockfall.json"));

        let path = std::env::temp_dir().join(format!("blockfall-{}.json", std::process::id()));
        fs::write(&path, r#"{ "display": { "block_size": 1 } }"#).unwrap();
        let settings = Settings::load(&path).unwrap();
        fs::remove_file(&path).unwrap();
        assert_eq!(settings.display.block_size, 1);
        assert!(settings.display.show_ghost);
    }
}
