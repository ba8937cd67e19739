//! Coordinates, great-circle distance and travel modes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Mean Earth radius in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Kilometers per degree of latitude, used for bounding boxes.
const KM_PER_DEGREE: f64 = 111.0;

/// A WGS84 position in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Builds a coordinate only when both axes are finite and in range.
    pub fn checked(lat: f64, lon: f64) -> Option<Self> {
        let coordinate = Self { lat, lon };
        coordinate.is_valid().then_some(coordinate)
    }

    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lon.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lon)
    }

    /// `lon,lat` with six decimals, the order routing services expect.
    pub fn lon_lat(&self) -> String {
        format!("{:.6},{:.6}", self.lon, self.lat)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.5}, {:.5})", self.lat, self.lon)
    }
}

/// Great-circle distance between two points in kilometers.
pub fn haversine_km(from: Coordinate, to: Coordinate) -> f64 {
    let lat1_rad = from.lat.to_radians();
    let lat2_rad = to.lat.to_radians();
    let delta_lat = (to.lat - from.lat).to_radians();
    let delta_lon = (to.lon - from.lon).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().asin();

    EARTH_RADIUS_KM * c
}

/// Axis-aligned search box around a point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_lon: f64,
    pub min_lat: f64,
    pub max_lon: f64,
    pub max_lat: f64,
}

impl BoundingBox {
    /// Square-ish box extending `km` in every direction from `center`.
    ///
    /// The longitude span widens with latitude; the cosine is floored at 0.1
    /// so boxes near the poles stay finite.
    pub fn around(center: Coordinate, km: f64) -> Self {
        let d_lat = km / KM_PER_DEGREE;
        let d_lon = km / (KM_PER_DEGREE * center.lat.to_radians().cos().max(0.1));
        Self {
            min_lon: center.lon - d_lon,
            min_lat: center.lat - d_lat,
            max_lon: center.lon + d_lon,
            max_lat: center.lat + d_lat,
        }
    }

    /// `min_lon,min_lat,max_lon,max_lat`, the geocoder viewbox format.
    pub fn viewbox(&self) -> String {
        format!(
            "{},{},{},{}",
            self.min_lon, self.min_lat, self.max_lon, self.max_lat
        )
    }
}

/// How the traveller moves between stops.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TravelMode {
    #[default]
    Driving,
    Walking,
    Cycling,
}

impl TravelMode {
    /// Routing profile name used in OSRM paths.
    pub fn profile(&self) -> &'static str {
        match self {
            TravelMode::Driving => "driving",
            TravelMode::Walking => "walking",
            TravelMode::Cycling => "cycling",
        }
    }

    /// Average speed assumed when no road network is available.
    pub fn assumed_speed_kmh(&self) -> f64 {
        match self {
            TravelMode::Driving => 40.0,
            TravelMode::Walking => 5.0,
            TravelMode::Cycling => 15.0,
        }
    }
}

impl fmt::Display for TravelMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.profile())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown travel mode `{0}` (expected driving, walking or cycling)")]
pub struct UnknownTravelMode(pub String);

impl FromStr for TravelMode {
    type Err = UnknownTravelMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "driving" => Ok(TravelMode::Driving),
            "walking" => Ok(TravelMode::Walking),
            "cycling" => Ok(TravelMode::Cycling),
            _ => Err(UnknownTravelMode(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LAHORE: Coordinate = Coordinate::new(31.5204, 74.3587);
    const ISLAMABAD: Coordinate = Coordinate::new(33.6844, 73.0479);

    #[test]
    fn test_haversine_same_point() {
        assert_eq!(haversine_km(LAHORE, LAHORE), 0.0);
    }

    #[test]
    fn test_haversine_symmetric() {
        assert_eq!(haversine_km(LAHORE, ISLAMABAD), haversine_km(ISLAMABAD, LAHORE));
    }

    #[test]
    fn test_haversine_known_distance() {
        // Lahore to Islamabad is roughly 270 km as the crow flies
        let dist = haversine_km(LAHORE, ISLAMABAD);
        assert!(dist > 250.0 && dist < 290.0, "got {}", dist);
    }

    #[test]
    fn test_checked_rejects_out_of_range() {
        assert!(Coordinate::checked(91.0, 0.0).is_none());
        assert!(Coordinate::checked(0.0, -180.5).is_none());
        assert!(Coordinate::checked(f64::NAN, 0.0).is_none());
        assert_eq!(Coordinate::checked(-90.0, 180.0), Some(Coordinate::new(-90.0, 180.0)));
    }

    #[test]
    fn test_bounding_box_spans_center() {
        let bbox = BoundingBox::around(LAHORE, 15.0);
        assert!(bbox.min_lat < LAHORE.lat && LAHORE.lat < bbox.max_lat);
        assert!(bbox.min_lon < LAHORE.lon && LAHORE.lon < bbox.max_lon);
        assert!((bbox.max_lat - bbox.min_lat - 30.0 / 111.0).abs() < 1e-9);
    }

    #[test]
    fn test_bounding_box_near_pole_is_finite() {
        let bbox = BoundingBox::around(Coordinate::new(89.99, 10.0), 10.0);
        let width = bbox.max_lon - bbox.min_lon;
        assert!(width.is_finite());
        assert!((width - 20.0 / 11.1).abs() < 1e-6);
    }

    #[test]
    fn test_viewbox_order() {
        let bbox = BoundingBox {
            min_lon: 1.0,
            min_lat: 2.0,
            max_lon: 3.0,
            max_lat: 4.0,
        };
        assert_eq!(bbox.viewbox(), "1,2,3,4");
    }

    #[test]
    fn test_travel_mode_parse() {
        assert_eq!("Walking".parse::<TravelMode>(), Ok(TravelMode::Walking));
        assert!("flying".parse::<TravelMode>().is_err());
        assert_eq!(TravelMode::Cycling.assumed_speed_kmh(), 15.0);
    }

    #[test]
    fn test_lon_lat_format() {
        assert_eq!(Coordinate::new(31.5, 74.25).lon_lat(), "74.250000,31.500000");
    }
}
