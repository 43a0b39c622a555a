use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use config::{Config, Environment};
use serde::Deserialize;

pub const DEFAULT_OUTPUT: &str = "scraped_countries.csv";
pub const DEFAULT_DELAY_MS: u64 = 1000;
const ENV_PREFIX: &str = "GEOSCHEME";

/// Run settings: built-in defaults < `GEOSCHEME_*` environment < CLI flags.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub output: PathBuf,
    pub delay_ms: u64,
}

impl Settings {
    pub fn load() -> Result<Self> {
        Self::from_env(Environment::with_prefix(ENV_PREFIX))
    }

    fn from_env(env: Environment) -> Result<Self> {
        Config::builder()
            .set_default("output", DEFAULT_OUTPUT)?
            .set_default("delay_ms", DEFAULT_DELAY_MS)?
            .add_source(env.try_parsing(true))
            .build()
            .and_then(Config::try_deserialize::<Settings>)
            .context("Failed to load settings")
    }

    pub fn with_overrides(mut self, output: Option<PathBuf>, delay_ms: Option<u64>) -> Self {
        if let Some(output) = output {
            self.output = output;
        }
        if let Some(delay_ms) = delay_ms {
            self.delay_ms = delay_ms;
        }
        self
    }

    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}
