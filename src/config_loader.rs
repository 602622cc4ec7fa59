use std::{io, path::PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{contact_shadows::ContactShadowSettings, flakes::FlakesSettings};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    pub asset_path: String,
    /// Uniform scale of the whole model
    pub model_scale: f32,
    pub environment_resolution: u32,
    pub contact_shadow_resolution: u32,
    /// Seed of the paint flakes, the same seed gives the same paint
    pub flakes_seed: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            asset_path: "public/lambo.glb".to_string(),
            model_scale: 0.015,
            environment_resolution: 512,
            contact_shadow_resolution: ContactShadowSettings::default().resolution,
            flakes_seed: FlakesSettings::default().seed,
        }
    }
}

impl Config {
    pub fn from_json(value: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(value)
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("could not read config file {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("config file {path} is not valid")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

pub struct ConfigFileLoader {
    pub path: PathBuf,
    config: Option<Config>,
}

impl ConfigFileLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            config: None,
        }
    }

    /// Reads the config file. A missing file means "use the defaults", the file is never
    /// created or written.
    pub fn load_config(&mut self) -> Result<&Config, ConfigError> {
        let config = match std::fs::read_to_string(&self.path) {
            Ok(content) => Config::from_json(&content).map_err(|source| ConfigError::Parse {
                path: self.path.clone(),
                source,
            })?,
            Err(error) if error.kind() == io::ErrorKind::NotFound => {
                log::info!(
                    "No config file at {}, using defaults",
                    self.path.display()
                );
                Config::default()
            }
            Err(source) => {
                return Err(ConfigError::Read {
                    path: self.path.clone(),
                    source,
                })
            }
        };
        Ok(self.config.insert(config))
    }

    pub fn get_or_load_config(&mut self) -> Result<&Config, ConfigError> {
        if self.config.is_none() {
            self.load_config()?;
        }
        Ok(self.config.get_or_insert_with(Config::default))
    }
}
