use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("RON deserialization error: {0}")]
    Ron(#[from] ron::error::SpannedError),
}

/// Engine tunables.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Seconds per UI fade (dialogue box, cutscene layer, HUD).
    pub fade_duration: f32,
    /// Seconds between revealed characters; zero or less reveals one per tick.
    pub reveal_interval: f32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            fade_duration: 0.2,
            reveal_interval: 0.02,
        }
    }
}

impl EngineConfig {
    pub fn parse_ron(ron_str: &str) -> Result<Self, ConfigError> {
        Ok(ron::from_str(ron_str)?)
    }

    pub fn load_from_ron(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse_ron(&contents)
    }

    /// No fades and one character per tick. Handy for headless playback.
    pub fn instant() -> Self {
        Self {
            fade_duration: 0.0,
            reveal_interval: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.fade_duration, 0.2);
        assert_eq!(config.reveal_interval, 0.02);
    }

    #[test]
    fn partial_ron_keeps_defaults() {
        let config = EngineConfig::parse_ron("(fade_duration: 0.5)").unwrap();
        assert_eq!(config.fade_duration, 0.5);
        assert_eq!(config.reveal_interval, 0.02);
    }

    #[test]
    fn missing_file_is_io_error() {
        let result = EngineConfig::load_from_ron(Path::new("does/not/exist.ron"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }
}
