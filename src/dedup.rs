//! Merging candidate lists without near-duplicates.

use std::collections::HashSet;

use crate::place::PlaceCandidate;

/// Concatenates `lists` in order, keeping the first candidate for each
/// (name, coordinate rounded to 5 decimals) identity.
///
/// Pass higher-priority lists first.
pub fn merge(lists: &[&[PlaceCandidate]]) -> Vec<PlaceCandidate> {
    let mut seen = HashSet::new();
    lists
        .iter()
        .flat_map(|list| list.iter())
        .filter(|place| seen.insert(place.identity()))
        .cloned()
        .collect()
}
