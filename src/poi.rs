//! Point-of-interest discovery against Overpass mirrors.
//!
//! Queries are tried against each mirror in turn; the first mirror that
//! answers with a parseable document wins, even when it found nothing.
//! Elements are decoded into DTOs first, then normalised into
//! [`PlaceCandidate`]s in one pass.

use std::collections::BTreeMap;

use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::OverpassConfig;
use crate::error::ClientError;
use crate::geo::Coordinate;
use crate::place::{PlaceCandidate, PlaceCategory};
use crate::request::GeoRequest;
use crate::traits::GeoClient;

/// Name given to untagged general-discovery results.
pub const UNNAMED: &str = "Unnamed";

/// What general discovery looks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoiCategory {
    Restaurant,
    Attraction,
}

impl PoiCategory {
    pub fn place_category(&self) -> PlaceCategory {
        match self {
            PoiCategory::Restaurant => PlaceCategory::Restaurant,
            PoiCategory::Attraction => PlaceCategory::Attraction,
        }
    }

    /// Tag filters OR-ed together for this category.
    fn selectors(&self) -> &'static [&'static str] {
        match self {
            PoiCategory::Restaurant => &["[amenity=restaurant]"],
            PoiCategory::Attraction => &["[tourism=attraction]", "[amenity=park]", "[leisure=park]"],
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct OverpassResponse {
    #[serde(default)]
    pub(crate) elements: Vec<OverpassElement>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct OverpassElement {
    #[serde(rename = "type", default = "default_element_type")]
    element_type: String,
    #[serde(default)]
    id: i64,
    lat: Option<f64>,
    lon: Option<f64>,
    center: Option<OverpassCenter>,
    #[serde(default)]
    tags: BTreeMap<String, String>,
}

#[derive(Debug, Deserialize)]
struct OverpassCenter {
    lat: Option<f64>,
    lon: Option<f64>,
}

fn default_element_type() -> String {
    "node".to_string()
}

impl OverpassElement {
    /// Direct position first, then the centroid of a way or relation.
    fn coordinate(&self) -> Option<Coordinate> {
        if let (Some(lat), Some(lon)) = (self.lat, self.lon) {
            return Coordinate::checked(lat, lon);
        }
        let center = self.center.as_ref()?;
        match (center.lat, center.lon) {
            (Some(lat), Some(lon)) => Coordinate::checked(lat, lon),
            _ => None,
        }
    }

    /// `None` when the element carries no usable position.
    pub(crate) fn into_candidate(
        self,
        category: PlaceCategory,
        default_name: &str,
    ) -> Option<PlaceCandidate> {
        let coordinate = self.coordinate()?;
        let source_url = format!(
            "https://www.openstreetmap.org/{}/{}",
            self.element_type, self.id
        );
        let mut tags = self.tags;
        let name = tags
            .remove("name")
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| default_name.to_string());
        Some(PlaceCandidate {
            name,
            coordinate,
            category,
            address: tags.remove("addr:full").unwrap_or_default(),
            source_url,
            distance_to_reference_km: None,
        })
    }
}

pub(crate) fn normalize(
    response: OverpassResponse,
    category: PlaceCategory,
    default_name: &str,
) -> Vec<PlaceCandidate> {
    let total = response.elements.len();
    let places: Vec<PlaceCandidate> = response
        .elements
        .into_iter()
        .filter_map(|element| element.into_candidate(category, default_name))
        .collect();
    if places.len() < total {
        debug!(dropped = total - places.len(), "dropped elements without coordinates");
    }
    places
}

/// Node query for a general category, centroids requested for completeness.
pub fn category_query(
    center: Coordinate,
    radius_m: u32,
    category: PoiCategory,
    config: &OverpassConfig,
) -> String {
    let around = format!("(around:{},{},{})", radius_m, center.lat, center.lon);
    let limit = match category {
        PoiCategory::Restaurant => config.restaurant_limit,
        PoiCategory::Attraction => config.attraction_limit,
    };
    let statements = category
        .selectors()
        .iter()
        .map(|selector| format!("  node{around}{selector};\n"))
        .collect::<String>();
    format!(
        "[out:json][timeout:{}];\n(\n{}\n);\nout center {};\n",
        config.query_timeout_secs,
        statements.trim_end(),
        limit
    )
}

/// Nodes, ways and relations tagged `amenity=<amenity>` around `center`.
pub fn amenity_query(
    center: Coordinate,
    radius_m: u32,
    amenity: &str,
    config: &OverpassConfig,
) -> String {
    let around = format!("(around:{},{},{})", radius_m, center.lat, center.lon);
    let statements = ["node", "way", "relation"]
        .iter()
        .map(|kind| format!("  {kind}{around}[amenity=\"{amenity}\"];"))
        .collect::<Vec<_>>()
        .join("\n");
    format!(
        "[out:json][timeout:{}];\n(\n{}\n);\nout center {};\n",
        config.query_timeout_secs, statements, config.attraction_limit
    )
}

pub struct PoiDiscovery<'a, C> {
    client: &'a C,
    config: &'a OverpassConfig,
}

impl<'a, C: GeoClient> PoiDiscovery<'a, C> {
    pub fn new(client: &'a C, config: &'a OverpassConfig) -> Self {
        Self { client, config }
    }

    /// Places of `category` within `radius_m` of `center`.
    ///
    /// Never fails: when every mirror fails the result is empty.
    pub fn discover(&self, center: Coordinate, radius_m: u32, category: PoiCategory) -> Vec<PlaceCandidate> {
        let query = category_query(center, radius_m, category, self.config);
        match self.query(&query) {
            Ok(response) => {
                let places = normalize(response, category.place_category(), UNNAMED);
                debug!(?category, found = places.len(), "poi discovery complete");
                places
            }
            Err(err) => {
                warn!(?category, error = %err, "poi discovery failed on every mirror");
                Vec::new()
            }
        }
    }

    /// Runs `query` against each mirror until one answers.
    ///
    /// Returns the last mirror's error when all of them fail.
    pub(crate) fn query(&self, query: &str) -> Result<OverpassResponse, ClientError> {
        let mut last_err = None;
        for endpoint in &self.config.endpoints {
            match self.query_mirror(endpoint, query) {
                Ok(response) => return Ok(response),
                Err(err) => {
                    warn!(endpoint = %endpoint, error = %err, "overpass mirror failed, trying next");
                    last_err = Some(err);
                }
            }
        }
        Err(last_err.unwrap_or_else(|| ClientError::malformed("overpass", "no mirrors configured")))
    }

    fn query_mirror(&self, endpoint: &str, query: &str) -> Result<OverpassResponse, ClientError> {
        let request = GeoRequest::post(endpoint, query)
            .timeout(self.config.timeout())
            .cache_for(self.config.cache_ttl());
        let body = self.client.fetch(&request)?;
        serde_json::from_value(body).map_err(|err| ClientError::malformed(endpoint, err))
    }
}
