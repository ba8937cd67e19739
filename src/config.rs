//! Upstream service endpoints, timeouts and cache lifetimes.

use std::time::Duration;

pub const DEFAULT_USER_AGENT: &str = "trip-planner/0.1 (no-keys)";

#[derive(Debug, Clone)]
pub struct GeocodingConfig {
    /// Primary provider (Nominatim search endpoint).
    pub nominatim_url: String,
    /// Secondary provider (Photon API endpoint).
    pub photon_url: String,
    pub timeout_secs: u64,
    pub cache_ttl_secs: u64,
    /// Half-width of the city-bias box in kilometers.
    pub city_box_km: f64,
}

impl Default for GeocodingConfig {
    fn default() -> Self {
        Self {
            nominatim_url: "https://nominatim.openstreetmap.org/search".to_string(),
            photon_url: "https://photon.komoot.io/api".to_string(),
            timeout_secs: 20,
            cache_ttl_secs: 3600,
            city_box_km: 15.0,
        }
    }
}

impl GeocodingConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }
}

#[derive(Debug, Clone)]
pub struct OverpassConfig {
    /// Mirrors of the same index, tried in order.
    pub endpoints: Vec<String>,
    pub timeout_secs: u64,
    /// Server-side timeout embedded in the query text.
    pub query_timeout_secs: u64,
    pub cache_ttl_secs: u64,
    pub restaurant_limit: usize,
    pub attraction_limit: usize,
}

impl Default for OverpassConfig {
    fn default() -> Self {
        Self {
            endpoints: vec![
                "https://overpass-api.de/api/interpreter".to_string(),
                "https://overpass.kumi.systems/api/interpreter".to_string(),
                "https://z.overpass-api.de/api/interpreter".to_string(),
            ],
            timeout_secs: 90,
            query_timeout_secs: 60,
            cache_ttl_secs: 3600,
            restaurant_limit: 120,
            attraction_limit: 150,
        }
    }
}

impl OverpassConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }
}

#[derive(Debug, Clone)]
pub struct OsrmConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    pub cache_ttl_secs: u64,
    /// Also fetch the ordered route's polyline once stops are ordered.
    pub fetch_geometry: bool,
}

impl Default for OsrmConfig {
    fn default() -> Self {
        Self {
            base_url: "https://router.project-osrm.org".to_string(),
            timeout_secs: 60,
            cache_ttl_secs: 120,
            fetch_geometry: true,
        }
    }
}

impl OsrmConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }
}

/// Everything a planning run needs to reach its upstream services.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub user_agent: String,
    pub geocoding: GeocodingConfig,
    pub overpass: OverpassConfig,
    pub osrm: OsrmConfig,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            geocoding: GeocodingConfig::default(),
            overpass: OverpassConfig::default(),
            osrm: OsrmConfig::default(),
        }
    }
}
