//! Tunables read from RON on top of `TransitConfig::default()`.

use crate::shared::*;
#[cfg(not(target_arch = "wasm32"))]
use std::path::Path;

pub const CONFIG_PATH: &str = "config/transit.ron";

/// Parse a (possibly partial) config. Missing fields keep their defaults.
pub fn parse_config(text: &str) -> Result<TransitConfig, TransitError> {
    Ok(ron::from_str(text)?)
}

/// Returns `Ok(None)` when the file does not exist.
#[cfg(not(target_arch = "wasm32"))]
pub fn load_config(path: impl AsRef<Path>) -> Result<Option<TransitConfig>, TransitError> {
    let path = path.as_ref();
    if !path.exists() {
        return Ok(None);
    }
    let text = std::fs::read_to_string(path)?;
    parse_config(&text).map(Some)
}

#[cfg(target_arch = "wasm32")]
pub fn load_config(_path: &str) -> Result<Option<TransitConfig>, TransitError> {
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config = parse_config("(train_speed: 8.0, whistle_delay_secs: 1.0)").unwrap();
        assert_eq!(config.train_speed, 8.0);
        assert_eq!(config.whistle_delay_secs, 1.0);
        assert_eq!(config.npc_walk_speed, TransitConfig::default().npc_walk_speed);
        assert_eq!(config.wander_interval_secs, 5.0);
    }

    #[test]
    fn test_malformed_config_is_an_error() {
        let err = parse_config("(train_speed: \"fast\")").unwrap_err();
        assert!(matches!(err, TransitError::ConfigParse(_)));
    }

    #[test]
    fn test_missing_file_is_not_an_error() {
        let loaded = load_config("config/does_not_exist.ron").unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn test_shipped_config_matches_defaults() {
        let text = include_str!("../../config/transit.ron");
        assert_eq!(parse_config(text).unwrap(), TransitConfig::default());
    }
}
