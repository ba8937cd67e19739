//! Real Lahore locations for realistic test fixtures.
//!
//! Coordinates sourced from OpenStreetMap.

use trip_planner::Coordinate;

/// A named location with coordinates.
#[derive(Debug, Clone)]
pub struct Location {
    pub name: &'static str,
    pub lat: f64,
    pub lon: f64,
}

impl Location {
    pub const fn new(name: &'static str, lat: f64, lon: f64) -> Self {
        Self { name, lat, lon }
    }

    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.lat, self.lon)
    }
}

pub const LAHORE_CENTER: Location = Location::new("Lahore, Punjab, Pakistan", 31.5656, 74.3142);
pub const ORIGIN: Location = Location::new("Model Town, Lahore", 31.52, 74.35);
pub const DESTINATION: Location = Location::new("DHA Phase 5, Lahore", 31.48, 74.40);

pub const ATTRACTIONS: &[Location] = &[
    Location::new("Badshahi Mosque", 31.5880, 74.3106),
    Location::new("Lahore Fort", 31.5882, 74.3154),
    Location::new("Minar-e-Pakistan", 31.5925, 74.3095),
    Location::new("Lahore Museum", 31.5682, 74.3083),
    Location::new("Jilani Park", 31.5440, 74.3312),
];

pub const RESTAURANTS: &[Location] = &[
    Location::new("Andaaz", 31.5870, 74.3110),
    Location::new("Cafe Aylanto", 31.5145, 74.3510),
    Location::new("Butt Karahi", 31.5795, 74.3210),
];

pub const PHARMACIES: &[Location] = &[
    Location::new("Shaheen Chemist", 31.5201, 74.3489),
    Location::new("Servaid Pharmacy", 31.4982, 74.4003),
];
