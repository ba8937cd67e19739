//! Free text to coordinates through an ordered chain of geocoding strategies.
//!
//! Each strategy either yields a hit, yields nothing, or fails in transport.
//! Failures are logged and treated like "nothing"; the chain stops at the
//! first hit.

use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::GeocodingConfig;
use crate::error::ClientError;
use crate::geo::{BoundingBox, Coordinate};
use crate::place::GeoHit;
use crate::request::GeoRequest;
use crate::traits::GeoClient;

/// One way of asking a provider about a piece of text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GeocodeStrategy {
    /// Primary provider, no spatial constraint.
    Primary,
    /// Primary provider, restricted to a box around `center`.
    Bounded { center: Coordinate, box_km: f64 },
    /// Secondary provider, no spatial constraint.
    Secondary,
}

impl GeocodeStrategy {
    fn name(&self) -> &'static str {
        match self {
            GeocodeStrategy::Primary => "primary",
            GeocodeStrategy::Bounded { .. } => "bounded",
            GeocodeStrategy::Secondary => "secondary",
        }
    }
}

pub struct GeoResolver<'a, C> {
    client: &'a C,
    config: &'a GeocodingConfig,
}

impl<'a, C: GeoClient> GeoResolver<'a, C> {
    pub fn new(client: &'a C, config: &'a GeocodingConfig) -> Self {
        Self { client, config }
    }

    /// Strategies tried by [`resolve_best`](Self::resolve_best), in order.
    pub fn chain(&self, city_bias: Option<Coordinate>) -> Vec<GeocodeStrategy> {
        let mut chain = vec![GeocodeStrategy::Primary];
        if let Some(center) = city_bias {
            chain.push(GeocodeStrategy::Bounded {
                center,
                box_km: self.config.city_box_km,
            });
        }
        chain.push(GeocodeStrategy::Secondary);
        chain
    }

    pub fn resolve_best(&self, query: &str, city_bias: Option<Coordinate>) -> Option<GeoHit> {
        let hit = self
            .chain(city_bias)
            .iter()
            .find_map(|strategy| self.attempt(query, strategy));
        if hit.is_none() {
            debug!(query, "all geocoding strategies exhausted");
        }
        hit
    }

    /// Single lookup restricted to `box_km` around `center`.
    pub fn resolve_in_box(&self, query: &str, center: Coordinate, box_km: f64) -> Option<GeoHit> {
        self.attempt(query, &GeocodeStrategy::Bounded { center, box_km })
    }

    fn attempt(&self, query: &str, strategy: &GeocodeStrategy) -> Option<GeoHit> {
        match self.lookup(query, strategy) {
            Ok(Some(hit)) => {
                debug!(query, strategy = strategy.name(), label = %hit.label, "geocoded");
                Some(hit)
            }
            Ok(None) => {
                debug!(query, strategy = strategy.name(), "geocoding returned no hit");
                None
            }
            Err(err) => {
                warn!(query, strategy = strategy.name(), error = %err, "geocoding strategy failed");
                None
            }
        }
    }

    fn lookup(&self, query: &str, strategy: &GeocodeStrategy) -> Result<Option<GeoHit>, ClientError> {
        let request = self.request_for(query, strategy);
        let body = self.client.fetch(&request)?;
        match strategy {
            GeocodeStrategy::Primary | GeocodeStrategy::Bounded { .. } => {
                parse_nominatim(&request.url, body, query)
            }
            GeocodeStrategy::Secondary => parse_photon(&request.url, body, query),
        }
    }

    fn request_for(&self, query: &str, strategy: &GeocodeStrategy) -> GeoRequest {
        let request = match strategy {
            GeocodeStrategy::Primary => GeoRequest::get(&self.config.nominatim_url)
                .param("q", query)
                .param("format", "json")
                .param("limit", 1),
            GeocodeStrategy::Bounded { center, box_km } => {
                let bbox = BoundingBox::around(*center, *box_km);
                GeoRequest::get(&self.config.nominatim_url)
                    .param("q", query)
                    .param("format", "json")
                    .param("limit", 1)
                    .param("viewbox", bbox.viewbox())
                    .param("bounded", 1)
            }
            GeocodeStrategy::Secondary => GeoRequest::get(&self.config.photon_url)
                .param("q", query)
                .param("limit", 1),
        };
        request
            .timeout(self.config.timeout())
            .cache_for(self.config.cache_ttl())
    }
}

#[derive(Debug, Deserialize)]
struct NominatimHit {
    lat: String,
    lon: String,
    display_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PhotonResponse {
    #[serde(default)]
    features: Vec<PhotonFeature>,
}

#[derive(Debug, Deserialize)]
struct PhotonFeature {
    geometry: PhotonGeometry,
    #[serde(default)]
    properties: PhotonProperties,
}

#[derive(Debug, Deserialize)]
struct PhotonGeometry {
    /// `[lon, lat]`
    coordinates: Vec<f64>,
}

#[derive(Debug, Default, Deserialize)]
struct PhotonProperties {
    name: Option<String>,
    city: Option<String>,
}

fn parse_nominatim(url: &str, body: Value, query: &str) -> Result<Option<GeoHit>, ClientError> {
    let hits: Vec<NominatimHit> =
        serde_json::from_value(body).map_err(|err| ClientError::malformed(url, err))?;
    let Some(first) = hits.into_iter().next() else {
        return Ok(None);
    };

    let lat = first
        .lat
        .trim()
        .parse::<f64>()
        .map_err(|err| ClientError::malformed(url, format!("bad lat `{}`: {}", first.lat, err)))?;
    let lon = first
        .lon
        .trim()
        .parse::<f64>()
        .map_err(|err| ClientError::malformed(url, format!("bad lon `{}`: {}", first.lon, err)))?;
    let coordinate = Coordinate::checked(lat, lon)
        .ok_or_else(|| ClientError::malformed(url, format!("coordinate out of range ({lat}, {lon})")))?;

    Ok(Some(GeoHit {
        coordinate,
        label: first.display_name.unwrap_or_else(|| query.to_string()),
    }))
}

fn parse_photon(url: &str, body: Value, query: &str) -> Result<Option<GeoHit>, ClientError> {
    let response: PhotonResponse =
        serde_json::from_value(body).map_err(|err| ClientError::malformed(url, err))?;
    let Some(first) = response.features.into_iter().next() else {
        return Ok(None);
    };

    let &[lon, lat] = first.geometry.coordinates.as_slice() else {
        return Err(ClientError::malformed(url, "geometry is not a [lon, lat] pair"));
    };
    let coordinate = Coordinate::checked(lat, lon)
        .ok_or_else(|| ClientError::malformed(url, format!("coordinate out of range ({lat}, {lon})")))?;

    let label = first
        .properties
        .name
        .or(first.properties.city)
        .unwrap_or_else(|| query.to_string());

    Ok(Some(GeoHit { coordinate, label }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_nominatim_first_hit() {
        let body = json!([
            {"lat": "31.5656", "lon": "74.3142", "display_name": "Lahore, Punjab, Pakistan"},
            {"lat": "0", "lon": "0", "display_name": "elsewhere"}
        ]);
        let hit = parse_nominatim("n", body, "Lahore").unwrap().unwrap();
        assert_eq!(hit.coordinate, Coordinate::new(31.5656, 74.3142));
        assert_eq!(hit.label, "Lahore, Punjab, Pakistan");
    }

    #[test]
    fn test_parse_nominatim_label_defaults_to_query() {
        let body = json!([{"lat": "1.5", "lon": "2.5"}]);
        let hit = parse_nominatim("n", body, "somewhere").unwrap().unwrap();
        assert_eq!(hit.label, "somewhere");
    }

    #[test]
    fn test_parse_nominatim_empty_is_no_hit() {
        assert!(parse_nominatim("n", json!([]), "q").unwrap().is_none());
    }

    #[test]
    fn test_parse_nominatim_rejects_garbage() {
        assert!(parse_nominatim("n", json!({"error": "busy"}), "q").is_err());
        assert!(parse_nominatim("n", json!([{"lat": "north", "lon": "1"}]), "q").is_err());
        assert!(parse_nominatim("n", json!([{"lat": "95", "lon": "1"}]), "q").is_err());
    }

    #[test]
    fn test_parse_photon_swaps_axes() {
        let body = json!({"features": [{
            "geometry": {"coordinates": [74.3, 31.5]},
            "properties": {"city": "Lahore"}
        }]});
        let hit = parse_photon("p", body, "q").unwrap().unwrap();
        assert_eq!(hit.coordinate, Coordinate::new(31.5, 74.3));
        assert_eq!(hit.label, "Lahore");
    }

    #[test]
    fn test_parse_photon_prefers_name() {
        let body = json!({"features": [{
            "geometry": {"coordinates": [74.3, 31.5]},
            "properties": {"name": "Minar-e-Pakistan", "city": "Lahore"}
        }]});
        let hit = parse_photon("p", body, "q").unwrap().unwrap();
        assert_eq!(hit.label, "Minar-e-Pakistan");
    }

    #[test]
    fn test_parse_photon_no_features() {
        assert!(parse_photon("p", json!({"features": []}), "q").unwrap().is_none());
        assert!(parse_photon("p", json!({}), "q").unwrap().is_none());
    }

    #[test]
    fn test_parse_photon_short_geometry() {
        let body = json!({"features": [{"geometry": {"coordinates": [74.3]}}]});
        assert!(parse_photon("p", body, "q").is_err());
    }
}
