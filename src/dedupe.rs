use std::collections::HashSet;

use anyhow::Result;

use crate::{error::SchemaError, model::Record};

/// Distinct addresses in first-seen order, one geocoder call each.
pub fn unique_addresses(records: &[Record]) -> Result<Vec<String>> {
    let mut seen = HashSet::new();
    let mut addresses = Vec::new();
    for (i, record) in records.iter().enumerate() {
        if record.address.is_empty() {
            return Err(SchemaError::EmptyAddress(i).into());
        }
        if seen.insert(record.address.as_str()) {
            addresses.push(record.address.clone());
        }
    }
    Ok(addresses)
}
