//! Resolves a traveller's free-text request ("pharmacy", "Lahore Museum")
//! into concrete places.
//!
//! Three stages, first non-empty result wins:
//! 1. the text as a named place inside a box around the search center,
//! 2. an amenity inferred from keywords, searched in the POI index,
//! 3. the text geocoded anywhere.

use tracing::{debug, info, warn};

use crate::config::ServiceConfig;
use crate::geo::Coordinate;
use crate::geocode::GeoResolver;
use crate::place::{PlaceCandidate, PlaceCategory};
use crate::poi::{self, PoiDiscovery};
use crate::traits::GeoClient;

/// Keyword sets mapped to amenity tags, evaluated top to bottom.
pub const AMENITY_KEYWORDS: &[(&[&str], &str)] = &[
    (&["pharmacy", "chemist"], "pharmacy"),
    (&["restroom", "toilet", "washroom", "bathroom"], "toilets"),
    (&["cafe", "coffee", "chai"], "cafe"),
    (&["restaurant"], "restaurant"),
];

/// First amenity whose keyword occurs anywhere in `text`.
pub fn infer_amenity(text: &str) -> Option<&'static str> {
    let text = text.to_lowercase();
    AMENITY_KEYWORDS
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|keyword| text.contains(keyword)))
        .map(|(_, amenity)| *amenity)
}

/// "toilets" -> "Toilets"; used to name untagged results.
fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub struct SpecificNeedResolver<'a, C> {
    client: &'a C,
    config: &'a ServiceConfig,
}

impl<'a, C: GeoClient> SpecificNeedResolver<'a, C> {
    pub fn new(client: &'a C, config: &'a ServiceConfig) -> Self {
        Self { client, config }
    }

    /// Never fails; an empty list means nothing matched.
    pub fn resolve_specific(&self, center: Coordinate, radius_m: u32, text: &str) -> Vec<PlaceCandidate> {
        let text = text.trim();
        if text.is_empty() {
            return Vec::new();
        }
        let geocoder = GeoResolver::new(self.client, &self.config.geocoding);

        let box_km = f64::from(radius_m) / 1000.0 * 1.5;
        if let Some(hit) = geocoder.resolve_in_box(text, center, box_km) {
            info!(text, label = %hit.label, "specific need matched a named place");
            return vec![PlaceCandidate::from_hit(hit)];
        }

        if let Some(places) = self.by_amenity(center, radius_m, text) {
            return places;
        }

        if let Some(hit) = geocoder.resolve_best(text, None) {
            info!(text, label = %hit.label, "specific need geocoded outside the search area");
            return vec![PlaceCandidate::from_hit(hit)];
        }

        debug!(text, "specific need could not be resolved");
        Vec::new()
    }

    /// `None` when no amenity is inferred or the search found nothing.
    fn by_amenity(&self, center: Coordinate, radius_m: u32, text: &str) -> Option<Vec<PlaceCandidate>> {
        let Some(amenity) = infer_amenity(text) else {
            debug!(text, "no amenity keyword in specific need");
            return None;
        };

        let query = poi::amenity_query(center, radius_m, amenity, &self.config.overpass);
        let discovery = PoiDiscovery::new(self.client, &self.config.overpass);
        match discovery.query(&query) {
            Ok(response) => {
                let places = poi::normalize(response, PlaceCategory::Specific, &title_case(amenity));
                if places.is_empty() {
                    debug!(amenity, "no places for inferred amenity");
                    return None;
                }
                info!(amenity, found = places.len(), "specific need matched by amenity");
                Some(places)
            }
            Err(err) => {
                warn!(amenity, error = %err, "amenity search failed on every mirror");
                None
            }
        }
    }
}
