//! Pairwise distance/duration matrices and the provider that never fails.

use serde::Serialize;
use tracing::{info, warn};

use crate::geo::{Coordinate, TravelMode};
use crate::haversine::HaversineMatrix;
use crate::traits::DistanceMatrixProvider;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct MatrixCell {
    pub distance_meters: f64,
    pub duration_seconds: f64,
}

/// Where a matrix's numbers came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MatrixSource {
    /// Road network routing.
    Routed,
    /// Great-circle estimate at an assumed speed.
    Haversine,
}

/// Square matrix over an ordered coordinate list. May be asymmetric.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistanceDurationMatrix {
    cells: Vec<Vec<MatrixCell>>,
    source: MatrixSource,
}

impl DistanceDurationMatrix {
    /// Builds from parallel distance and duration tables.
    ///
    /// Returns `None` unless both are `n x n` with finite, non-negative
    /// values. The diagonal is forced to zero.
    pub fn from_tables(
        distances: &[Vec<f64>],
        durations: &[Vec<f64>],
        source: MatrixSource,
    ) -> Option<Self> {
        let n = distances.len();
        if durations.len() != n {
            return None;
        }
        let mut cells = Vec::with_capacity(n);
        for (i, (dist_row, dur_row)) in distances.iter().zip(durations).enumerate() {
            if dist_row.len() != n || dur_row.len() != n {
                return None;
            }
            let mut row = Vec::with_capacity(n);
            for (j, (&distance_meters, &duration_seconds)) in dist_row.iter().zip(dur_row).enumerate() {
                if !is_usable(distance_meters) || !is_usable(duration_seconds) {
                    return None;
                }
                row.push(if i == j {
                    MatrixCell::default()
                } else {
                    MatrixCell {
                        distance_meters,
                        duration_seconds,
                    }
                });
            }
            cells.push(row);
        }
        Some(Self { cells, source })
    }

    pub(crate) fn from_cells(cells: Vec<Vec<MatrixCell>>, source: MatrixSource) -> Self {
        Self { cells, source }
    }

    pub fn size(&self) -> usize {
        self.cells.len()
    }

    pub fn source(&self) -> MatrixSource {
        self.source
    }

    /// Cell for the leg `from -> to`, or `None` when out of range.
    pub fn get(&self, from: usize, to: usize) -> Option<MatrixCell> {
        self.cells.get(from)?.get(to).copied()
    }

    pub fn distance(&self, from: usize, to: usize) -> f64 {
        self.get(from, to).map_or(f64::INFINITY, |cell| cell.distance_meters)
    }
}

fn is_usable(value: f64) -> bool {
    value.is_finite() && value >= 0.0
}

/// Road routing with a great-circle fallback.
///
/// The primary provider is asked once; if it fails or returns something that
/// does not fit the input, the haversine estimate is used instead.
pub struct RouteMatrixProvider<P> {
    primary: P,
    fallback: HaversineMatrix,
}

impl<P: DistanceMatrixProvider> RouteMatrixProvider<P> {
    pub fn new(primary: P) -> Self {
        Self {
            primary,
            fallback: HaversineMatrix,
        }
    }

    pub fn get_matrix(&self, locations: &[Coordinate], mode: TravelMode) -> DistanceDurationMatrix {
        if locations.len() >= 2 {
            match self.primary.matrix_for(locations, mode) {
                Ok(matrix) if matrix.size() == locations.len() => return matrix,
                Ok(matrix) => warn!(
                    expected = locations.len(),
                    got = matrix.size(),
                    "routing table has wrong dimensions, using haversine estimate"
                ),
                Err(err) => warn!(error = %err, "routing table failed, using haversine estimate"),
            }
        }
        info!(%mode, points = locations.len(), "computing haversine matrix");
        self.fallback.estimate(locations, mode)
    }
}
