use std::{fs::File, path::Path};

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::{
    config::Config,
    dataset, dedupe,
    geocode::{self, OneMap},
    merge,
    model::MergedRecord,
    nearest, stations,
};

/// The single entry point behind the CLI. `recompute` runs the whole
/// pipeline and overwrites the persisted dataset; otherwise the previous
/// run's output is reloaded. `None` means there is nothing on disk yet.
pub fn run(config: &Config, recompute: bool) -> Result<Option<Vec<MergedRecord>>> {
    if !recompute {
        return load(&config.merged_path);
    }

    let stations = stations::load(&config.stations_path)?;
    info!(count = stations.len(), "loaded station catalog");

    let records = dataset::download(config)?;
    let addresses = dedupe::unique_addresses(&records)?;
    info!(
        records = records.len(),
        unique = addresses.len(),
        "resolving addresses"
    );

    let geocoded = geocode::resolve(&OneMap::new(&config.geocode_url), &addresses)?;
    let matches = nearest::nearest_stations(&geocoded, &stations);
    let merged = merge::merge(&records, &geocoded, &matches)?;

    save(&config.merged_path, &merged)?;
    info!(rows = merged.len(), "merged dataset persisted");
    Ok(Some(merged))
}

fn save(path: &Path, merged: &[MergedRecord]) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file =
        File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
    let mut writer = csv::Writer::from_writer(file);
    for row in merged {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

fn load(path: &Path) -> Result<Option<Vec<MergedRecord>>> {
    // Only a missing file is the soft "nothing computed yet" case; an
    // unreadable one propagates.
    let file = match File::open(path) {
        Ok(x) => x,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            warn!(path = %path.display(), "no merged dataset on disk");
            return Ok(None);
        }
        Err(e) => {
            return Err(e).with_context(|| format!("failed to open {}", path.display()));
        }
    };
    let mut merged = Vec::new();
    for row in csv::Reader::from_reader(file).deserialize() {
        merged.push(row?);
    }
    info!(rows = merged.len(), "loaded merged dataset");
    Ok(Some(merged))
}
