//! Picks a small, varied set of stops close to the destination.

use std::cmp::Ordering;

use crate::geo::{Coordinate, haversine_km};
use crate::place::{PlaceCandidate, PlaceCategory};

/// Selected stops must be farther apart than this (10 m).
pub const MIN_SEPARATION_KM: f64 = 0.01;

/// Selects up to `top_k` stops from `candidates`, nearest to `reference` first.
///
/// Restaurants and everything else are ranked separately and drawn
/// alternately (others first), skipping any candidate within
/// [`MIN_SEPARATION_KM`] of an already selected one. With `force_specific`,
/// the closest `specific` candidate is taken before the interleave starts.
/// Ranking uses the distance to `reference` rounded to 0.01 km, and the sort
/// is stable, so candidates at the same rounded distance keep their input
/// order. Returned candidates carry that rounded distance; output order is
/// selection order.
pub fn select(
    candidates: &[PlaceCandidate],
    reference: Coordinate,
    top_k: usize,
    force_specific: bool,
) -> Vec<PlaceCandidate> {
    let limit = top_k.max(1);
    let ranked: Vec<PlaceCandidate> = candidates
        .iter()
        .cloned()
        .map(|mut place| {
            place.distance_to_reference_km = Some(round_km(haversine_km(reference, place.coordinate)));
            place
        })
        .collect();

    let (mut restaurants, mut others): (Vec<&PlaceCandidate>, Vec<&PlaceCandidate>) = ranked
        .iter()
        .partition(|place| place.category == PlaceCategory::Restaurant);
    restaurants.sort_by(by_distance);
    others.sort_by(by_distance);

    let mut picks: Vec<PlaceCandidate> = Vec::with_capacity(limit);
    if force_specific {
        let closest_specific = others
            .iter()
            .find(|place| place.category == PlaceCategory::Specific);
        if let Some(place) = closest_specific {
            picks.push((*place).clone());
        }
    }

    let (mut i, mut j) = (0, 0);
    while picks.len() < limit && (i < others.len() || j < restaurants.len()) {
        if let Some(place) = others.get(i) {
            i += 1;
            accept_if_diverse(&mut picks, place);
        }
        if picks.len() >= limit {
            break;
        }
        if let Some(place) = restaurants.get(j) {
            j += 1;
            accept_if_diverse(&mut picks, place);
        }
    }

    picks
}

fn round_km(km: f64) -> f64 {
    (km * 100.0).round() / 100.0
}

fn by_distance(a: &&PlaceCandidate, b: &&PlaceCandidate) -> Ordering {
    let da = a.distance_to_reference_km.unwrap_or(f64::INFINITY);
    let db = b.distance_to_reference_km.unwrap_or(f64::INFINITY);
    da.total_cmp(&db)
}

fn accept_if_diverse(picks: &mut Vec<PlaceCandidate>, candidate: &PlaceCandidate) {
    let diverse = picks
        .iter()
        .all(|picked| haversine_km(picked.coordinate, candidate.coordinate) > MIN_SEPARATION_KM);
    if diverse {
        picks.push(candidate.clone());
    }
}
