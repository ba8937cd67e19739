//! Haversine distance matrix (fallback when OSRM is unavailable).
//!
//! Uses great-circle distance and a per-mode assumed speed to estimate travel
//! time. Less accurate than road routing but always available.

use rayon::prelude::*;

use crate::error::ClientError;
use crate::geo::{Coordinate, TravelMode, haversine_km};
use crate::matrix::{DistanceDurationMatrix, MatrixCell, MatrixSource};
use crate::traits::DistanceMatrixProvider;

/// Haversine-based distance matrix provider.
///
/// The result is symmetric with a zero diagonal.
#[derive(Debug, Clone, Copy, Default)]
pub struct HaversineMatrix;

impl HaversineMatrix {
    /// Travel time in seconds for `km` at the mode's assumed speed.
    pub fn km_to_seconds(km: f64, mode: TravelMode) -> f64 {
        km / mode.assumed_speed_kmh() * 3600.0
    }

    pub fn estimate(&self, locations: &[Coordinate], mode: TravelMode) -> DistanceDurationMatrix {
        let cells: Vec<Vec<MatrixCell>> = (0..locations.len())
            .into_par_iter()
            .map(|i| {
                let from = locations[i];
                locations
                    .iter()
                    .enumerate()
                    .map(|(j, to)| {
                        if i == j {
                            return MatrixCell::default();
                        }
                        let km = haversine_km(from, *to);
                        MatrixCell {
                            distance_meters: km * 1000.0,
                            duration_seconds: Self::km_to_seconds(km, mode),
                        }
                    })
                    .collect::<Vec<_>>()
            })
            .collect();

        DistanceDurationMatrix::from_cells(cells, MatrixSource::Haversine)
    }
}

impl DistanceMatrixProvider for HaversineMatrix {
    fn matrix_for(
        &self,
        locations: &[Coordinate],
        mode: TravelMode,
    ) -> Result<DistanceDurationMatrix, ClientError> {
        Ok(self.estimate(locations, mode))
    }
}
