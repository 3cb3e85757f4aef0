use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::dataset::Parsers;
use crate::faa::{DEFAULT_MIN_AGL_FT, FrequencyRules, Schemas};

pub const CONFIG_ENV: &str = "AERODATA_CONFIG";
pub const OUTPUT_DIR_ENV: &str = "AERODATA_OUTPUT_DIR";

/// Runtime configuration. Every field has a default, so an empty or missing
/// file gives the stock FAA sources and layouts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub output_dir: PathBuf,
    pub user_agent: String,
    pub request_timeout_secs: u64,
    pub max_retries: u32,
    /// Obstacle landing page that links the current DOF archive
    pub dof_page_url: String,
    /// Prefix for relative links found on the landing page
    pub faa_origin: String,
    pub nasr_base_url: String,
    /// Any known 28-day cycle start
    pub cycle_anchor: NaiveDate,
    pub min_agl_ft: u32,
    pub schema: Schemas,
    pub frequencies: FrequencyRules,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            output_dir: PathBuf::from("data"),
            user_agent: format!("aerodata/{}", env!("CARGO_PKG_VERSION")),
            request_timeout_secs: 45,
            max_retries: 5,
            dof_page_url: "https://www.faa.gov/air_traffic/flight_info/aeronav/digital_products/dof/"
                .to_string(),
            faa_origin: "https://www.faa.gov".to_string(),
            nasr_base_url: "https://nfdc.faa.gov/webContent/28DaySub".to_string(),
            cycle_anchor: NaiveDate::from_ymd_opt(2026, 1, 22).unwrap_or_default(),
            min_agl_ft: DEFAULT_MIN_AGL_FT,
            schema: Schemas::default(),
            frequencies: FrequencyRules::default(),
        }
    }
}

impl Config {
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        toml::from_str(contents).context("Failed to parse configuration")
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let contents =
            std::fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))?;
        Self::from_toml_str(&contents).with_context(|| format!("In {:?}", path))
    }

    /// Load configuration.
    ///
    /// Priority for the file:
    /// 1. explicit `path` (the `--config` flag)
    /// 2. `AERODATA_CONFIG` env var
    /// 3. built-in defaults
    ///
    /// `AERODATA_OUTPUT_DIR` then overrides the output directory.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = path
            .map(Path::to_path_buf)
            .or_else(|| std::env::var(CONFIG_ENV).ok().map(PathBuf::from));

        let mut config = match path {
            Some(path) => Self::from_file(&path)?,
            None => Config::default(),
        };

        if let Ok(dir) = std::env::var(OUTPUT_DIR_ENV)
            && !dir.trim().is_empty()
        {
            config.output_dir = PathBuf::from(dir);
        }

        Ok(config)
    }

    /// Compile the offset tables and patterns for a run.
    pub fn parsers(&self) -> Result<Parsers> {
        Parsers::new(self.schema.clone(), &self.frequencies, self.min_agl_ft)
    }
}
