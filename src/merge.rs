use std::collections::HashMap;

use anyhow::Result;

use crate::{
    error::CardinalityError,
    model::{GeocodedAddress, MergedRecord, NearestMatch, Record},
};

/// Left join on `address`, then on `postal_code`. Every input record comes
/// out exactly once; rows the geocoder or matcher could not place keep null
/// fields instead of being dropped.
pub fn merge(
    records: &[Record],
    geocoded: &[GeocodedAddress],
    matches: &[NearestMatch],
) -> Result<Vec<MergedRecord>> {
    let by_address: HashMap<&str, &GeocodedAddress> = geocoded
        .iter()
        .map(|x| (x.address.as_str(), x))
        .collect();
    let by_postal: HashMap<&str, &NearestMatch> = matches
        .iter()
        .map(|x| (x.postal_code.as_str(), x))
        .collect();

    let mut merged = Vec::with_capacity(records.len());
    for record in records {
        let location = by_address
            .get(record.address.as_str())
            .and_then(|x| x.location.as_ref());
        let nearest =
            location.and_then(|x| by_postal.get(x.postal_code.as_str()).copied());
        merged.push(MergedRecord::new(record, location, nearest));
    }

    if merged.len() != records.len() {
        return Err(CardinalityError {
            records: records.len(),
            merged: merged.len(),
        }
        .into());
    }
    Ok(merged)
}
