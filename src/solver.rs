//! Route ordering (greedy nearest-neighbour).
//!
//! Node 0 is the origin, node `n - 1` the destination, everything between is
//! a stop. Starting at the origin, repeatedly move to the closest unvisited
//! stop by distance, then finish at the destination. This is a heuristic,
//! not an optimal tour.

use serde::Serialize;

use crate::matrix::DistanceDurationMatrix;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Leg {
    pub from_index: usize,
    pub to_index: usize,
    pub distance_meters: f64,
    pub duration_seconds: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoutePlan {
    /// Permutation of `0..n`, starting at 0 and ending at `n - 1`.
    pub order: Vec<usize>,
    pub legs: Vec<Leg>,
    pub total_distance_meters: f64,
    pub total_duration_seconds: f64,
}

impl RoutePlan {
    /// Total distance in kilometers.
    pub fn distance_km(&self) -> f64 {
        self.total_distance_meters / 1000.0
    }

    /// Total duration in hours.
    pub fn duration_hours(&self) -> f64 {
        self.total_duration_seconds / 3600.0
    }
}

/// Orders every node of `matrix` from origin to destination.
///
/// Ties go to the lowest index. A single-node matrix yields `[0]` and no legs;
/// an empty matrix yields an empty plan.
pub fn plan(matrix: &DistanceDurationMatrix) -> RoutePlan {
    let n = matrix.size();
    let order = match n {
        0 => Vec::new(),
        1 => vec![0],
        _ => greedy_order(matrix),
    };

    let legs: Vec<Leg> = order
        .windows(2)
        .map(|pair| {
            let (from_index, to_index) = (pair[0], pair[1]);
            let cell = matrix.get(from_index, to_index).unwrap_or_default();
            Leg {
                from_index,
                to_index,
                distance_meters: cell.distance_meters,
                duration_seconds: cell.duration_seconds,
            }
        })
        .collect();

    RoutePlan {
        total_distance_meters: legs.iter().map(|leg| leg.distance_meters).sum(),
        total_duration_seconds: legs.iter().map(|leg| leg.duration_seconds).sum(),
        order,
        legs,
    }
}

fn greedy_order(matrix: &DistanceDurationMatrix) -> Vec<usize> {
    let n = matrix.size();
    let destination = n - 1;
    let mut unvisited: Vec<usize> = (1..destination).collect();
    let mut order = Vec::with_capacity(n);
    order.push(0);

    let mut current = 0;
    while !unvisited.is_empty() {
        let mut best = 0;
        for (position, &candidate) in unvisited.iter().enumerate() {
            // strict `<` keeps the first-encountered minimum
            if matrix.distance(current, candidate) < matrix.distance(current, unvisited[best]) {
                best = position;
            }
        }
        current = unvisited.remove(best);
        order.push(current);
    }

    order.push(destination);
    order
}
