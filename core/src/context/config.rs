//! Application configuration
//!
//! Re-exports the shared config types from cadence-types and adds
//! persistence through confy plus validation of the loop settings.

use std::path::{Path, PathBuf};

pub use cadence_types::{AppConfig, DebugSettings, LoopSettings};

use super::error::ConfigError;
use crate::game_loop::check_loop_settings;

const APP_NAME: &str = "cadence";
const CONFIG_NAME: &str = "config";

fn default_encounter_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join(APP_NAME).join("encounters"))
}

// ─────────────────────────────────────────────────────────────────────────────
// AppConfig Extensions
// ─────────────────────────────────────────────────────────────────────────────

/// Extension trait for AppConfig persistence
pub trait AppConfigExt: Sized {
    /// Load from the platform config location, falling back to defaults.
    fn load() -> Self;
    fn try_load() -> Result<Self, ConfigError>;
    fn load_from_path(path: &Path) -> Result<Self, ConfigError>;
    fn save(&self) -> Result<(), ConfigError>;
    fn config_path() -> Result<PathBuf, ConfigError>;
    fn validate(&self) -> Result<(), ConfigError>;
    /// Where encounter definition files are looked up
    fn encounter_dir_path(&self) -> Option<PathBuf>;
}

impl AppConfigExt for AppConfig {
    fn load() -> Self {
        match Self::try_load() {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(error = %e, "Falling back to default configuration");
                Self::default()
            }
        }
    }

    fn try_load() -> Result<Self, ConfigError> {
        let config: Self = confy::load(APP_NAME, CONFIG_NAME)?;
        config.validate()?;
        Ok(config)
    }

    fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = toml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    fn save(&self) -> Result<(), ConfigError> {
        confy::store(APP_NAME, CONFIG_NAME, self).map_err(ConfigError::Save)
    }

    fn config_path() -> Result<PathBuf, ConfigError> {
        Ok(confy::get_configuration_file_path(APP_NAME, CONFIG_NAME)?)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        check_loop_settings(&self.game_loop)
            .map_err(|reason| ConfigError::InvalidLoopSettings { reason })
    }

    fn encounter_dir_path(&self) -> Option<PathBuf> {
        match &self.encounter_dir {
            Some(dir) => Some(PathBuf::from(dir)),
            None => default_encounter_dir(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn temp_config(name: &str, contents: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("cadence-config-{}-{name}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn load_from_path_reads_overrides() {
        let path = temp_config(
            "overrides",
            "encounter_dir = \"/tmp/encounters\"\n[game_loop]\nupdates_per_second = 120\n",
        );
        let config = AppConfig::load_from_path(&path).unwrap();
        assert_eq!(config.game_loop.updates_per_second, 120);
        assert_eq!(config.game_loop.frames_per_second, 144);
        assert_eq!(
            config.encounter_dir_path(),
            Some(PathBuf::from("/tmp/encounters"))
        );
    }

    #[test]
    fn zero_rate_is_rejected() {
        let path = temp_config("zero", "[game_loop]\nframes_per_second = 0\n");
        let err = AppConfig::load_from_path(&path).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidLoopSettings { .. }));
    }

    #[test]
    fn missing_file_reports_path() {
        let path = PathBuf::from("/definitely/not/here/config.toml");
        let err = AppConfig::load_from_path(&path).unwrap_err();
        match err {
            ConfigError::ReadFile { path: p, .. } => assert_eq!(p, path),
            other => panic!("unexpected error: {other}"),
        }
    }
}
