//! Polyline representation for route geometries.
//!
//! Geometries arrive from OSRM as GeoJSON `[lon, lat]` pairs and are stored
//! here as decoded coordinates for the map layer to draw.

use serde::{Deserialize, Serialize};

use crate::geo::Coordinate;

/// A route geometry as an ordered list of coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polyline {
    points: Vec<Coordinate>,
}

impl Polyline {
    pub fn new(points: Vec<Coordinate>) -> Self {
        Self { points }
    }

    /// Returns a reference to the coordinate points.
    pub fn points(&self) -> &[Coordinate] {
        &self.points
    }
}
