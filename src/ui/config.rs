use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::errors::LapscopeError;
use crate::playback::DEFAULT_PLAYBACK_RATE;

const CONFIG_FILE_NAME: &str = "config.json";

#[derive(Serialize, Deserialize, Debug)]
#[serde(default)]
pub(crate) struct AppConfig {
    pub(crate) playback_rate: f64,
    pub(crate) last_trace_file: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            playback_rate: DEFAULT_PLAYBACK_RATE,
            last_trace_file: None,
        }
    }
}

impl AppConfig {
    pub(crate) fn from_local_file() -> Option<Self> {
        let config_path = dirs::config_dir()?.join("lapscope").join(CONFIG_FILE_NAME);

        if config_path.exists() {
            let file = std::fs::File::open(config_path).ok()?;
            serde_json::from_reader(file).ok()
        } else {
            None
        }
    }

    pub(crate) fn save(&self) -> Result<(), LapscopeError> {
        let config_path = dirs::config_dir()
            .ok_or(LapscopeError::NoConfigDir)?
            .join("lapscope")
            .join(CONFIG_FILE_NAME);

        if !config_path.exists() {
            std::fs::create_dir_all(config_path.parent().unwrap())
                .map_err(|e| LapscopeError::ConfigIOError { source: e })?;
        }

        let file = std::fs::File::create(config_path)
            .map_err(|e| LapscopeError::ConfigIOError { source: e })?;
        serde_json::to_writer(file, self)
            .map_err(|e| LapscopeError::ConfigSerializeError { source: e })
    }
}
