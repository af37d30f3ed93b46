use std::collections::HashSet;

use geo::GeodesicDistance;

use crate::model::{GeocodedAddress, NearestMatch, Station};

/// Brute-force scan: every resolved address against every station, WGS84
/// geodesic meters. Strict `<` keeps the earliest catalog row on a tie.
/// Unresolved addresses are skipped outright; they surface downstream as
/// rows with no match rather than as distances from nowhere. Output carries
/// at most one row per postal code, first occurrence kept.
pub fn nearest_stations(geocoded: &[GeocodedAddress], stations: &[Station]) -> Vec<NearestMatch> {
    let mut seen = HashSet::new();
    let mut matches = Vec::new();
    for address in geocoded {
        let Some(location) = &address.location else {
            continue;
        };
        let point = location.point();
        let mut best: Option<(f64, &Station)> = None;
        for station in stations {
            let distance = point.geodesic_distance(&station.point);
            if best.map_or(true, |(d, _)| distance < d) {
                best = Some((distance, station));
            }
        }
        let Some((distance_meters, station)) = best else {
            continue;
        };
        if seen.insert(location.postal_code.clone()) {
            matches.push(NearestMatch {
                postal_code: location.postal_code.clone(),
                mrt: station.name.clone(),
                stn_no: station.code.clone(),
                distance_meters,
            });
        }
    }
    matches
}

#[cfg(test)]
mod tests {
    use geo::GeodesicDistance;

    use super::*;
    use crate::model::{GeocodedAddress, Location, Station};

    fn geocoded(address: &str, latitude: f64, longitude: f64, postal: &str) -> GeocodedAddress {
        GeocodedAddress {
            address: address.to_string(),
            location: Some(Location {
                latitude,
                longitude,
                postal_code: postal.to_string(),
            }),
        }
    }

    fn unresolved(address: &str) -> GeocodedAddress {
        GeocodedAddress {
            address: address.to_string(),
            location: None,
        }
    }

    #[test]
    fn picks_closer_station_with_known_distance() {
        let stations = [
            Station::new("s1", "NS1", 1.30, 103.80),
            Station::new("s2", "NS2", 1.35, 103.85),
        ];
        let matches = nearest_stations(&[geocoded("a", 1.31, 103.81, "123456")], &stations);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].mrt, "s1");
        assert_eq!(matches[0].stn_no, "NS1");
        assert_eq!(matches[0].postal_code, "123456");
        // WGS84 geodesic distance for this pair.
        assert!((matches[0].distance_meters - 1568.8).abs() < 1.0);
    }

    #[test]
    fn no_station_is_strictly_closer() {
        let stations = [
            Station::new("s1", "NS1", 1.30, 103.80),
            Station::new("s2", "NS2", 1.35, 103.85),
            Station::new("s3", "EW1", 1.29, 103.82),
        ];
        let point = geocoded("a", 1.31, 103.81, "1");
        let matches = nearest_stations(&[point.clone()], &stations);
        let best = matches[0].distance_meters;
        let from = point.location.unwrap().point();
        for station in &stations {
            assert!(from.geodesic_distance(&station.point) >= best);
        }
    }

    #[test]
    fn tie_goes_to_earlier_catalog_row() {
        // Same coordinates under two names; catalog order decides.
        let stations = [
            Station::new("first", "A1", 1.30, 103.80),
            Station::new("second", "B1", 1.30, 103.80),
        ];
        let matches = nearest_stations(&[geocoded("a", 1.31, 103.81, "1")], &stations);
        assert_eq!(matches[0].mrt, "first");
    }

    #[test]
    fn unresolved_addresses_are_excluded() {
        let stations = [Station::new("s1", "NS1", 1.30, 103.80)];
        let input = [unresolved("a"), geocoded("b", 1.31, 103.81, "1")];
        let matches = nearest_stations(&input, &stations);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].postal_code, "1");
    }

    #[test]
    fn duplicate_postal_codes_collapse_to_first() {
        let stations = [Station::new("s1", "NS1", 1.30, 103.80)];
        let input = [
            geocoded("a", 1.31, 103.81, "1"),
            geocoded("b", 1.32, 103.82, "1"),
        ];
        let matches = nearest_stations(&input, &stations);
        assert_eq!(matches.len(), 1);
        assert!((matches[0].distance_meters - 1568.8).abs() < 1.0);
    }

    #[test]
    fn empty_catalog_yields_no_matches() {
        let matches = nearest_stations(&[geocoded("a", 1.31, 103.81, "1")], &[]);
        assert!(matches.is_empty());
    }
}
