use anyhow::Result;
use serde::Deserialize;
use tracing::warn;
use ureq::Agent;

use crate::{
    error::{LookupError, SchemaError},
    model::{GeocodedAddress, Location},
    utils::progress_bar,
};

/// One address lookup. Implemented over HTTP in production and scripted in
/// tests.
pub trait Geocode {
    fn lookup(&self, address: &str) -> Result<Option<Location>, LookupError>;
}

/// The OneMap search API. One blocking request per call, no retries.
pub struct OneMap {
    agent: Agent,
    base_url: String,
}

/// `{found: bool, results: [...]}`; coordinates arrive as strings.
#[derive(Deserialize)]
struct SearchResponse {
    found: bool,
    results: Vec<SearchResult>,
}

#[derive(Deserialize)]
struct SearchResult {
    #[serde(rename = "LATITUDE")]
    latitude: String,
    #[serde(rename = "LONGITUDE")]
    longitude: String,
    #[serde(rename = "POSTAL")]
    postal: String,
}

impl OneMap {
    pub fn new(base_url: &str) -> Self {
        OneMap {
            agent: Agent::new(),
            base_url: base_url.to_string(),
        }
    }

    fn parse(address: &str, body: &str) -> Result<Option<Location>, LookupError> {
        let schema = |reason: String| SchemaError::Search {
            address: address.to_string(),
            reason,
        };

        // A body that is not JSON (a gateway error page, say) is a bad
        // response for this address, not a broken contract: soft. A JSON
        // body missing the contract's keys is fatal.
        let response: SearchResponse = serde_json::from_str(body).map_err(|e| {
            if e.is_syntax() || e.is_eof() {
                LookupError::Malformed(e.to_string())
            } else {
                schema(e.to_string()).into()
            }
        })?;
        if !response.found {
            return Ok(None);
        }
        // Only the first result is consulted.
        let first = response
            .results
            .first()
            .ok_or_else(|| schema("found=true with no results".to_string()))?;
        let latitude = first
            .latitude
            .parse()
            .map_err(|_| schema(format!("bad LATITUDE {:?}", first.latitude)))?;
        let longitude = first
            .longitude
            .parse()
            .map_err(|_| schema(format!("bad LONGITUDE {:?}", first.longitude)))?;
        Ok(Some(Location {
            latitude,
            longitude,
            postal_code: first.postal.clone(),
        }))
    }
}

impl Geocode for OneMap {
    fn lookup(&self, address: &str) -> Result<Option<Location>, LookupError> {
        let body = self
            .agent
            .get(&self.base_url)
            .query("searchVal", address)
            .query("returnGeom", "Y")
            .query("getAddrDetails", "Y")
            .query("pageNum", "1")
            .call()
            .map_err(|e| LookupError::Transport(e.to_string()))?
            .into_string()
            .map_err(|e| LookupError::Transport(e.to_string()))?;
        Self::parse(address, &body)
    }
}

/// Resolves every address in order. A failed or empty lookup records a null
/// location and the batch continues; only contract breaks abort.
pub fn resolve(geocoder: &impl Geocode, addresses: &[String]) -> Result<Vec<GeocodedAddress>> {
    let bar = progress_bar(addresses.len() as u64);
    let mut geocoded = Vec::with_capacity(addresses.len());
    for address in addresses {
        let location = match geocoder.lookup(address) {
            Ok(x) => x,
            Err(LookupError::Transport(reason)) | Err(LookupError::Malformed(reason)) => {
                warn!(%address, %reason, "lookup failed, leaving unresolved");
                None
            }
            Err(LookupError::Schema(e)) => return Err(e.into()),
        };
        geocoded.push(GeocodedAddress {
            address: address.clone(),
            location,
        });
        bar.inc(1);
    }
    bar.finish();
    Ok(geocoded)
}
