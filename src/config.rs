use std::{
    fs::read_to_string,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use serde::Deserialize;

/// Run configuration, loaded once from YAML.
#[derive(Debug, Deserialize)]
pub struct Config {
    /// data.gov.sg resale transaction endpoint.
    pub download_url: String,
    /// OneMap search endpoint.
    pub geocode_url: String,
    /// MRT station reference CSV.
    pub stations_path: PathBuf,
    /// Where the normalized transaction records are written.
    pub records_path: PathBuf,
    /// Where the merged dataset is written and reloaded from.
    pub merged_path: PathBuf,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        Ok(serde_yaml::from_str(&raw)?)
    }
}
