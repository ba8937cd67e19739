//! Places discovered or resolved during a planning run.

use serde::{Deserialize, Serialize};

use crate::geo::Coordinate;

/// Why a place is a candidate stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaceCategory {
    Restaurant,
    Attraction,
    /// Matched the traveller's free-text request.
    Specific,
}

/// A geocoding result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoHit {
    pub coordinate: Coordinate,
    pub label: String,
}

/// A place that may become a stop on the route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceCandidate {
    pub name: String,
    pub coordinate: Coordinate,
    pub category: PlaceCategory,
    /// May be empty.
    pub address: String,
    pub source_url: String,
    /// Set by stop selection; `None` until a reference point is chosen.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_to_reference_km: Option<f64>,
}

impl PlaceCandidate {
    /// A `specific` candidate built from a geocoding hit.
    pub fn from_hit(hit: GeoHit) -> Self {
        let source_url = format!(
            "https://www.openstreetmap.org/?mlat={}&mlon={}",
            hit.coordinate.lat, hit.coordinate.lon
        );
        Self {
            name: hit.label.clone(),
            coordinate: hit.coordinate,
            category: PlaceCategory::Specific,
            address: hit.label,
            source_url,
            distance_to_reference_km: None,
        }
    }

    /// Deduplication identity: name plus coordinate rounded to 5 decimals.
    pub fn identity(&self) -> (String, i64, i64) {
        (
            self.name.clone(),
            round_5dp(self.coordinate.lat),
            round_5dp(self.coordinate.lon),
        )
    }
}

fn round_5dp(value: f64) -> i64 {
    (value * 100_000.0).round() as i64
}
