pub mod config_cmd;
pub mod doctor;
pub mod serve;

use hookrelay_config::{AppConfig, ConfigError};
use std::path::{Path, PathBuf};

/// The config file in effect: the `--config` flag, else the default path.
pub fn config_file(explicit: Option<&Path>) -> PathBuf {
    explicit
        .map(Path::to_path_buf)
        .unwrap_or_else(AppConfig::config_path)
}

/// Load the config file plus environment overrides.
pub fn load_config(explicit: Option<&Path>) -> Result<AppConfig, ConfigError> {
    AppConfig::load_with_env(&config_file(explicit))
}
