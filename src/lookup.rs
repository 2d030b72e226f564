//! Static district tables used by the normalizer.
//!
//! District names are the Traditional Chinese names used in the listing
//! data. Matching is exact after trimming.

use crate::models::Coordinates;

/// City-centre point (Central) used for districts missing from the table.
pub const FALLBACK_COORDINATES: Coordinates = Coordinates {
    lat: 22.2783,
    lng: 114.1747,
};

const DISTRICT_COORDINATES: &[(&str, Coordinates)] = &[
    ("旺角", Coordinates { lat: 22.3193, lng: 114.1694 }),
    ("尖沙咀", Coordinates { lat: 22.2987, lng: 114.1719 }),
    ("銅鑼灣", Coordinates { lat: 22.2798, lng: 114.1859 }),
    ("中環", Coordinates { lat: 22.2783, lng: 114.1747 }),
    ("佐敦", Coordinates { lat: 22.3053, lng: 114.1717 }),
    ("長沙灣", Coordinates { lat: 22.3378, lng: 114.1497 }),
    ("灣仔", Coordinates { lat: 22.2783, lng: 114.1722 }),
];

const DISTRICT_STATIONS: &[(&str, &[&str])] = &[
    ("旺角", &["Mong Kok", "Prince Edward", "Yau Ma Tei"]),
    ("尖沙咀", &["Tsim Sha Tsui", "East Tsim Sha Tsui"]),
    ("銅鑼灣", &["Causeway Bay", "Tin Hau"]),
    ("中環", &["Central", "Hong Kong"]),
    ("佐敦", &["Jordan", "Yau Ma Tei", "Austin"]),
    ("長沙灣", &["Cheung Sha Wan", "Sham Shui Po"]),
    ("灣仔", &["Wan Chai", "Admiralty"]),
];

/// Coordinates for a known district, `None` otherwise.
pub fn district_coordinates(district: &str) -> Option<Coordinates> {
    let district = district.trim();
    DISTRICT_COORDINATES
        .iter()
        .find(|(name, _)| *name == district)
        .map(|(_, coords)| *coords)
}

/// Coordinates for a district, falling back to the city centre.
pub fn coordinates_or_fallback(district: &str) -> Coordinates {
    district_coordinates(district).unwrap_or(FALLBACK_COORDINATES)
}

/// MTR stations near a district. Unknown districts have none.
pub fn nearby_stations(district: &str) -> Vec<String> {
    let district = district.trim();
    DISTRICT_STATIONS
        .iter()
        .find(|(name, _)| *name == district)
        .map(|(_, stations)| stations.iter().map(|s| s.to_string()).collect())
        .unwrap_or_default()
}
