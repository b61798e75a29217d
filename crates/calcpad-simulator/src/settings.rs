//! Engine config loading for the simulator

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use calcpad_core::config::{ConfigError, EngineConfig};
use log::{info, warn};
use thiserror_no_std::Error;

/// Environment variable naming the postcard-encoded config file.
pub const CONFIG_ENV: &str = "CALCPAD_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "engine.cfg";

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Failed to access {path}: {message}")]
    Io { path: String, message: String },
    #[error("{0}")]
    Config(ConfigError),
}

/// Read a config file; `Ok(None)` when it does not exist.
pub fn load(path: &Path) -> Result<Option<EngineConfig>, SettingsError> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
        Err(err) => {
            return Err(SettingsError::Io {
                path: path.display().to_string(),
                message: err.to_string(),
            });
        }
    };
    EngineConfig::from_bytes(&bytes)
        .map(Some)
        .map_err(SettingsError::Config)
}

/// Write `config` to `path`.
pub fn save(path: &Path, config: &EngineConfig) -> Result<(), SettingsError> {
    let bytes = config.to_bytes().map_err(SettingsError::Config)?;
    fs::write(path, bytes).map_err(|err| SettingsError::Io {
        path: path.display().to_string(),
        message: err.to_string(),
    })
}

/// `$CALCPAD_CONFIG`, or `engine.cfg` in the working directory.
pub fn config_path() -> String {
    std::env::var(CONFIG_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string())
}

/// The config named by `$CALCPAD_CONFIG` (or `engine.cfg`), falling back to
/// defaults when it is absent or unusable.
pub fn load_or_default() -> EngineConfig {
    let path = config_path();
    match load(Path::new(&path)) {
        Ok(Some(config)) => {
            info!("Loaded engine config from {}", path);
            config
        }
        Ok(None) => {
            info!("No config at {}, using defaults", path);
            EngineConfig::default()
        }
        Err(err) => {
            warn!("Ignoring config at {}: {}", path, err);
            EngineConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_and_load() {
        let name = format!("calcpad-settings-{}.cfg", std::process::id());
        let path = std::env::temp_dir().join(name);
        let config = EngineConfig {
            drag_threshold_px: 12,
            ..EngineConfig::default()
        };

        save(&path, &config).unwrap();
        assert_eq!(load(&path).unwrap(), Some(config));

        fs::remove_file(&path).unwrap();
        assert_eq!(load(&path).unwrap(), None);
    }

    #[test]
    fn test_garbage_is_rejected() {
        let path = std::env::temp_dir().join(format!("calcpad-garbage-{}.cfg", std::process::id()));
        fs::write(&path, [0xff, 0xff, 0xff]).unwrap();

        assert!(matches!(load(&path), Err(SettingsError::Config(_))));

        fs::remove_file(&path).unwrap();
    }
}
