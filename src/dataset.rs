use std::{fs::File, path::Path};

use anyhow::{Context, Result};
use chrono::{Datelike, NaiveDate};
use serde::Deserialize;
use tracing::info;
use ureq::Agent;

use crate::{config::Config, model::Record};

/// data.gov.sg envelope: `{result: {records: [...]}}`, every field a string.
#[derive(Deserialize)]
struct DownloadResponse {
    result: DownloadResult,
}

#[derive(Deserialize)]
struct DownloadResult {
    records: Vec<RawRecord>,
}

#[derive(Deserialize)]
struct RawRecord {
    month: String,
    town: String,
    flat_type: String,
    block: String,
    street_name: String,
    storey_range: String,
    floor_area_sqm: String,
    flat_model: String,
    lease_commence_date: String,
    resale_price: String,
}

impl RawRecord {
    fn refine(self) -> Result<Record> {
        let month = NaiveDate::parse_from_str(&format!("{}-01", self.month), "%Y-%m-%d")
            .with_context(|| format!("bad month {:?}", self.month))?;
        let floor_area_sqm: f64 = self
            .floor_area_sqm
            .parse()
            .with_context(|| format!("bad floor area {:?}", self.floor_area_sqm))?;
        let lease_commence_date: i32 = self
            .lease_commence_date
            .parse()
            .with_context(|| format!("bad lease commence date {:?}", self.lease_commence_date))?;
        let resale_price: f64 = self
            .resale_price
            .parse()
            .with_context(|| format!("bad resale price {:?}", self.resale_price))?;

        let address = format!("{} {}", self.block, self.street_name);
        Ok(Record {
            month,
            town: self.town,
            flat_type: self.flat_type,
            block: self.block,
            street_name: self.street_name,
            storey_range: self.storey_range,
            floor_area_sqm,
            flat_model: self.flat_model,
            lease_commence_date,
            resale_price,
            psm: resale_price / floor_area_sqm,
            remaining_lease_years: 99 - (month.year() - lease_commence_date),
            address,
        })
    }
}

/// Downloads the resale transaction dataset, normalizes its columns, and
/// persists the normalized copy alongside the other run artifacts.
pub fn download(config: &Config) -> Result<Vec<Record>> {
    info!(url = %config.download_url, "downloading dataset");
    let response: DownloadResponse = Agent::new()
        .get(&config.download_url)
        .set("User-Agent", "Mozilla/5.0")
        .call()
        .context("dataset download failed")?
        .into_json()
        .context("dataset response was not the expected envelope")?;

    let mut records = Vec::with_capacity(response.result.records.len());
    for raw in response.result.records {
        records.push(raw.refine()?);
    }
    info!(count = records.len(), "downloaded records");

    save(&config.records_path, &records)?;
    Ok(records)
}

fn save(path: &Path, records: &[Record]) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file =
        File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
    let mut writer = csv::Writer::from_writer(file);
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw() -> RawRecord {
        RawRecord {
            month: "2017-03".to_string(),
            town: "ANG MO KIO".to_string(),
            flat_type: "3 ROOM".to_string(),
            block: "174".to_string(),
            street_name: "ANG MO KIO AVE 4".to_string(),
            storey_range: "07 TO 09".to_string(),
            floor_area_sqm: "60".to_string(),
            flat_model: "New Generation".to_string(),
            lease_commence_date: "1986".to_string(),
            resale_price: "270000".to_string(),
        }
    }

    #[test]
    fn parses_download_envelope() {
        let body = r#"{
            "help": "https://data.gov.sg/api/3/action/help_show?name=datastore_search",
            "success": true,
            "result": {
                "resource_id": "f1765b54-a209-4718-8d38-a39237f502b3",
                "records": [{
                    "_id": 1,
                    "month": "2017-03",
                    "town": "ANG MO KIO",
                    "flat_type": "3 ROOM",
                    "block": "174",
                    "street_name": "ANG MO KIO AVE 4",
                    "storey_range": "07 TO 09",
                    "floor_area_sqm": "60",
                    "flat_model": "New Generation",
                    "lease_commence_date": "1986",
                    "remaining_lease": "68 years",
                    "resale_price": "270000"
                }]
            }
        }"#;
        let response: DownloadResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.result.records.len(), 1);
        let record = response.result.records.into_iter().next().unwrap().refine().unwrap();
        assert_eq!(record.address, "174 ANG MO KIO AVE 4");
        assert_eq!(record.town, "ANG MO KIO");
    }

    #[test]
    fn refine_derives_columns() {
        let record = raw().refine().unwrap();
        assert_eq!(record.month, NaiveDate::from_ymd_opt(2017, 3, 1).unwrap());
        assert_eq!(record.address, "174 ANG MO KIO AVE 4");
        assert_eq!(record.psm, 4500.0);
        // 99 - (2017 - 1986)
        assert_eq!(record.remaining_lease_years, 68);
    }

    #[test]
    fn refine_rejects_unparseable_numerics() {
        let mut bad = raw();
        bad.resale_price = "lots".to_string();
        assert!(bad.refine().is_err());

        let mut bad = raw();
        bad.month = "March 2017".to_string();
        assert!(bad.refine().is_err());
    }
}
