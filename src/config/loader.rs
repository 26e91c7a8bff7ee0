use std::fs;
use std::path::Path;

use directories::UserDirs;

use super::Config;
use crate::error::ConfigError;

impl Config {
    /// Load `~/.mediarelay/config.toml` when it exists, otherwise defaults.
    /// Environment overrides are applied on top. Nothing is written to disk.
    pub fn load() -> Result<Self, ConfigError> {
        let path = UserDirs::new()
            .map(|u| u.home_dir().join(".mediarelay").join("config.toml"))
            .filter(|p| p.exists());

        let mut config = match path {
            Some(path) => Self::from_file(&path)?,
            None => Self::default(),
        };
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        let mut config = Self::from_toml_str(&contents)?;
        config.config_path = Some(path.to_path_buf());
        Ok(config)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: Config =
            toml::from_str(contents).map_err(|e| ConfigError::Load(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }
}
