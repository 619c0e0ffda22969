//! Layered configuration: built-in defaults, an optional TOML file, then
//! `SBS__` environment variables.

use std::path::Path;

use anyhow::{Context, Result};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::simulation::{Calibration, GenerationConfig};
use crate::wastage::WastageConfig;

pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";
pub const ENV_PREFIX: &str = "SBS__";

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct Config {
    #[validate(nested)]
    pub simulation: SimulationConfig,
    #[validate(nested)]
    pub generation: GenerationConfig,
    #[validate(nested)]
    pub wastage: WastageConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SimulationConfig {
    pub calibration: Calibration,
    /// Days simulated per run
    #[validate(range(min = 1))]
    pub samples: usize,
    pub noise_enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    /// Indoor setpoint the wastage cost is measured against (°C)
    #[validate(range(min = -50.0, max = 60.0))]
    pub target_temp_c: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            calibration: Calibration::Subtractive,
            samples: 365,
            noise_enabled: true,
            seed: None,
            target_temp_c: 21.0,
        }
    }
}

impl Config {
    /// Built-in defaults, then the TOML file, then `SBS__SECTION__KEY` variables.
    ///
    /// An explicit `path` must exist; the default path is optional.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let file = match path {
            Some(p) => {
                if !p.exists() {
                    anyhow::bail!("config file {} does not exist", p.display());
                }
                p
            }
            None => Path::new(DEFAULT_CONFIG_PATH),
        };

        let config: Config = Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file(file))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .with_context(|| format!("loading configuration from {}", file.display()))?;

        config.validate().context("invalid configuration")?;
        Ok(config)
    }
}
