use anyhow::Result;
use featherlay_world::{FeedingConfig, LayingConfig};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};
use tracing::warn;

pub const DEFAULT_CONFIG_PATH: &str = "config/featherlay.toml";

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct AddonConfig {
    /// Force `debug` logging when `RUST_LOG` is unset.
    pub debug_logging: bool,
    /// Session seed for laying passes.
    pub seed: u64,
    pub laying: LayingConfig,
    pub feeding: FeedingConfig,
}

impl Default for AddonConfig {
    fn default() -> Self {
        Self {
            debug_logging: false,
            seed: 0x00C0_FFEE,
            laying: LayingConfig::default(),
            feeding: FeedingConfig::default(),
        }
    }
}

impl AddonConfig {
    /// Load configuration from an explicit path, falling back to defaults on errors.
    pub fn load_from_path(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(contents) => match toml::from_str::<AddonConfig>(&contents) {
                Ok(cfg) => cfg,
                Err(err) => {
                    warn!("Failed to parse {}: {err}. Using defaults", path.display());
                    AddonConfig::default()
                }
            },
            Err(err) => {
                if path != Path::new(DEFAULT_CONFIG_PATH)
                    || err.kind() != std::io::ErrorKind::NotFound
                {
                    warn!("Failed to read {}: {err}. Using defaults", path.display());
                }
                AddonConfig::default()
            }
        }
    }

    /// Save configuration to an explicit path.
    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        let toml = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml)?;
        Ok(())
    }
}
