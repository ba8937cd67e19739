//! Scripted `GeoClient` for driving components without a network.

use std::sync::Mutex;

use serde_json::{Value, json};

use trip_planner::config::ServiceConfig;
use trip_planner::error::ClientError;
use trip_planner::request::GeoRequest;
use trip_planner::traits::GeoClient;

use super::lahore_locations::Location;

pub const NOMINATIM: &str = "http://nominatim.test/search";
pub const PHOTON: &str = "http://photon.test/api";
pub const OVERPASS_A: &str = "http://overpass-a.test/api/interpreter";
pub const OVERPASS_B: &str = "http://overpass-b.test/api/interpreter";
pub const OVERPASS_C: &str = "http://overpass-c.test/api/interpreter";
pub const OSRM: &str = "http://osrm.test";

/// Config whose every endpoint is a fake host.
pub fn test_config() -> ServiceConfig {
    let mut config = ServiceConfig::default();
    config.geocoding.nominatim_url = NOMINATIM.to_string();
    config.geocoding.photon_url = PHOTON.to_string();
    config.overpass.endpoints = vec![
        OVERPASS_A.to_string(),
        OVERPASS_B.to_string(),
        OVERPASS_C.to_string(),
    ];
    config.osrm.base_url = OSRM.to_string();
    config
}

/// Answers every request with `handler` and records what was asked.
pub struct ScriptedClient<F> {
    handler: F,
    calls: Mutex<Vec<GeoRequest>>,
}

impl<F> ScriptedClient<F>
where
    F: Fn(&GeoRequest) -> Result<Value, ClientError>,
{
    pub fn new(handler: F) -> Self {
        Self {
            handler,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<GeoRequest> {
        self.calls.lock().unwrap().clone()
    }

    /// Number of requests whose url starts with `prefix`.
    pub fn calls_to(&self, prefix: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|req| req.url.starts_with(prefix))
            .count()
    }
}

impl<F> GeoClient for ScriptedClient<F>
where
    F: Fn(&GeoRequest) -> Result<Value, ClientError>,
{
    fn fetch(&self, request: &GeoRequest) -> Result<Value, ClientError> {
        self.calls.lock().unwrap().push(request.clone());
        (self.handler)(request)
    }
}

pub fn unavailable(request: &GeoRequest) -> ClientError {
    ClientError::Status {
        url: request.url.clone(),
        status: 503,
    }
}

pub fn is_bounded(request: &GeoRequest) -> bool {
    request.param_value("bounded") == Some("1")
}

pub fn query_text(request: &GeoRequest) -> &str {
    request.param_value("q").unwrap_or_default()
}

pub fn nominatim_hit(location: &Location) -> Value {
    json!([{
        "lat": location.lat.to_string(),
        "lon": location.lon.to_string(),
        "display_name": location.name,
    }])
}

pub fn photon_hit(location: &Location) -> Value {
    json!({
        "type": "FeatureCollection",
        "features": [{
            "geometry": {"type": "Point", "coordinates": [location.lon, location.lat]},
            "properties": {"name": location.name}
        }]
    })
}

pub fn no_hits() -> Value {
    json!([])
}

/// Overpass document with one tagged node per location.
pub fn overpass_nodes(locations: &[Location]) -> Value {
    let elements: Vec<Value> = locations
        .iter()
        .enumerate()
        .map(|(i, location)| {
            json!({
                "type": "node",
                "id": 1000 + i,
                "lat": location.lat,
                "lon": location.lon,
                "tags": {"name": location.name}
            })
        })
        .collect();
    json!({"version": 0.6, "elements": elements})
}

pub fn overpass_empty() -> Value {
    json!({"version": 0.6, "elements": []})
}
