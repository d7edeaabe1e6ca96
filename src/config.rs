//! Configuration management module
//!
//! `PilotConfig` is read from YAML; every section falls back to its defaults.

use action_flow::TemplateCatalog;
use action_primitives::Tempo;
use perceiver_structural::SnapshotLimits;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::errors::PilotError;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PilotConfig {
    /// Settle delays around page mutations
    pub timing: Tempo,

    /// Snapshot size caps
    pub snapshot: SnapshotLimits,

    /// Extra workflow templates, YAML
    #[serde(skip_serializing_if = "Option::is_none")]
    pub templates_path: Option<PathBuf>,
}

impl PilotConfig {
    pub fn from_yaml_str(source: &str) -> Result<Self, PilotError> {
        serde_yaml::from_str(source).map_err(|err| PilotError::config(err.to_string()))
    }

    /// Relative template paths are taken relative to the config file's directory.
    pub fn anchored_at(mut self, config_dir: &Path) -> Self {
        if let Some(path) = self.templates_path.take() {
            self.templates_path = Some(if path.is_relative() {
                config_dir.join(path)
            } else {
                path
            });
        }
        self
    }

    /// Built-in templates plus the configured template file, if any.
    pub fn template_catalog(&self) -> Result<TemplateCatalog, PilotError> {
        let catalog = TemplateCatalog::builtin();
        match &self.templates_path {
            Some(path) => {
                let extra = TemplateCatalog::load_file(path)?;
                info!(path = %path.display(), templates = extra.len(), "Loaded workflow templates");
                Ok(catalog.extend(extra))
            }
            None => Ok(catalog),
        }
    }
}
