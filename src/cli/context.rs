use std::path::{Path, PathBuf};

use anyhow::Result;
use pagepilot_cli::{Engine, PilotConfig};

pub struct CliContext {
    config: PilotConfig,
    config_path: PathBuf,
    engine: Engine,
}

impl CliContext {
    pub fn new(config: PilotConfig, config_path: PathBuf) -> Result<Self> {
        let engine = Engine::from_config(&config)?;
        Ok(Self {
            config,
            config_path,
            engine,
        })
    }

    pub fn config(&self) -> &PilotConfig {
        &self.config
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }
}
