use std::{fs::File, io::Read, path::Path};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::{error::SchemaError, model::Station};

/// Every raw station name carries this label; the canonical name is what
/// precedes it, lower-cased.
pub const STATION_NAME_SUFFIX: &str = " MRT STATION";

#[derive(Deserialize)]
struct RawStation {
    #[serde(rename = "STN_NAME")]
    name: String,
    #[serde(rename = "STN_NO")]
    code: String,
    #[serde(rename = "Latitude")]
    latitude: f64,
    #[serde(rename = "Longitude")]
    longitude: f64,
}

/// Loads the station reference CSV, preserving file order. The order is
/// significant: nearest-station ties go to the earlier row.
pub fn load(path: &Path) -> Result<Vec<Station>> {
    let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    read(file)
}

fn read(source: impl Read) -> Result<Vec<Station>> {
    let mut stations = Vec::new();
    for row in csv::Reader::from_reader(source).deserialize() {
        let raw: RawStation = row?;
        let name = raw
            .name
            .strip_suffix(STATION_NAME_SUFFIX)
            .ok_or_else(|| SchemaError::StationName(raw.name.clone()))?
            .to_lowercase();
        stations.push(Station::new(&name, &raw.code, raw.latitude, raw.longitude));
    }
    Ok(stations)
}
