use chrono::NaiveDate;
use geo::Point;
use serde::{Deserialize, Serialize};

/// One resale transaction, columns already normalized by `dataset`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub month: NaiveDate,
    pub town: String,
    pub flat_type: String,
    pub block: String,
    pub street_name: String,
    pub storey_range: String,
    pub floor_area_sqm: f64,
    pub flat_model: String,
    pub lease_commence_date: i32,
    pub resale_price: f64,
    pub psm: f64,
    pub remaining_lease_years: i32,
    pub address: String,
}

/// An MRT station with its canonical (suffix-stripped, lower-cased) name.
#[derive(Clone, Debug, PartialEq)]
pub struct Station {
    pub name: String,
    pub code: String,
    pub point: Point,
}

impl Station {
    pub fn new(name: &str, code: &str, latitude: f64, longitude: f64) -> Self {
        Station {
            name: name.to_string(),
            code: code.to_string(),
            point: Point::new(longitude, latitude),
        }
    }
}

/// Geocoder output for one unique address. `location` is `None` when the
/// lookup found nothing or failed in transit.
#[derive(Clone, Debug, PartialEq)]
pub struct GeocodedAddress {
    pub address: String,
    pub location: Option<Location>,
}

/// Coordinates and postal code resolve together or not at all.
#[derive(Clone, Debug, PartialEq)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
    pub postal_code: String,
}

impl Location {
    pub fn point(&self) -> Point {
        Point::new(self.longitude, self.latitude)
    }
}

/// The closest station to one geocoded postal code.
#[derive(Clone, Debug, PartialEq)]
pub struct NearestMatch {
    pub postal_code: String,
    pub mrt: String,
    pub stn_no: String,
    pub distance_meters: f64,
}

/// One output row: the record plus whatever the geocode and nearest-station
/// joins found for it. Kept flat so it maps directly onto CSV columns.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MergedRecord {
    pub month: NaiveDate,
    pub town: String,
    pub flat_type: String,
    pub block: String,
    pub street_name: String,
    pub storey_range: String,
    pub floor_area_sqm: f64,
    pub flat_model: String,
    pub lease_commence_date: i32,
    pub resale_price: f64,
    pub psm: f64,
    pub remaining_lease_years: i32,
    pub address: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub postal_code: Option<String>,
    pub mrt: Option<String>,
    pub stn_no: Option<String>,
    pub distance_meters: Option<f64>,
}

impl MergedRecord {
    pub fn new(
        record: &Record,
        location: Option<&Location>,
        nearest: Option<&NearestMatch>,
    ) -> Self {
        MergedRecord {
            month: record.month,
            town: record.town.clone(),
            flat_type: record.flat_type.clone(),
            block: record.block.clone(),
            street_name: record.street_name.clone(),
            storey_range: record.storey_range.clone(),
            floor_area_sqm: record.floor_area_sqm,
            flat_model: record.flat_model.clone(),
            lease_commence_date: record.lease_commence_date,
            resale_price: record.resale_price,
            psm: record.psm,
            remaining_lease_years: record.remaining_lease_years,
            address: record.address.clone(),
            latitude: location.map(|x| x.latitude),
            longitude: location.map(|x| x.longitude),
            postal_code: location.map(|x| x.postal_code.clone()),
            mrt: nearest.map(|x| x.mrt.clone()),
            stn_no: nearest.map(|x| x.stn_no.clone()),
            distance_meters: nearest.map(|x| x.distance_meters),
        }
    }
}
