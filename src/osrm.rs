//! OSRM HTTP adapter for distance/duration tables and route geometry.

use serde::Deserialize;
use tracing::debug;

use crate::config::OsrmConfig;
use crate::error::ClientError;
use crate::geo::{Coordinate, TravelMode};
use crate::matrix::{DistanceDurationMatrix, MatrixSource};
use crate::polyline::Polyline;
use crate::request::GeoRequest;
use crate::traits::{DistanceMatrixProvider, GeoClient};

pub struct OsrmClient<'a, C> {
    client: &'a C,
    config: &'a OsrmConfig,
}

impl<'a, C: GeoClient> OsrmClient<'a, C> {
    pub fn new(client: &'a C, config: &'a OsrmConfig) -> Self {
        Self { client, config }
    }

    fn url(&self, service: &str, locations: &[Coordinate], mode: TravelMode) -> String {
        let coords = locations
            .iter()
            .map(Coordinate::lon_lat)
            .collect::<Vec<_>>()
            .join(";");

        format!(
            "{}/{}/v1/{}/{}",
            self.config.base_url.trim_end_matches('/'),
            service,
            mode.profile(),
            coords
        )
    }

    /// Road geometry through `locations` in the given order.
    pub fn route_geometry(&self, locations: &[Coordinate], mode: TravelMode) -> Result<Polyline, ClientError> {
        let request = GeoRequest::get(self.url("route", locations, mode))
            .param("overview", "full")
            .param("geometries", "geojson")
            .timeout(self.config.timeout())
            .cache_for(self.config.cache_ttl());

        let body = self.client.fetch(&request)?;
        let response: OsrmRouteResponse =
            serde_json::from_value(body).map_err(|err| ClientError::malformed(&request.url, err))?;
        check_code(&request.url, response.code.as_deref())?;

        let route = response
            .routes
            .into_iter()
            .next()
            .ok_or_else(|| ClientError::malformed(&request.url, "no routes"))?;

        let points = route
            .geometry
            .coordinates
            .iter()
            .map(|pair| match pair.as_slice() {
                &[lon, lat] => Ok(Coordinate::new(lat, lon)),
                _ => Err(ClientError::malformed(&request.url, "geometry point is not [lon, lat]")),
            })
            .collect::<Result<Vec<_>, _>>()?;

        debug!(points = points.len(), "fetched route geometry");
        Ok(Polyline::new(points))
    }
}

impl<C: GeoClient> DistanceMatrixProvider for OsrmClient<'_, C> {
    fn matrix_for(
        &self,
        locations: &[Coordinate],
        mode: TravelMode,
    ) -> Result<DistanceDurationMatrix, ClientError> {
        let request = GeoRequest::get(self.url("table", locations, mode))
            .param("annotations", "duration,distance")
            .timeout(self.config.timeout())
            .cache_for(self.config.cache_ttl());

        let body = self.client.fetch(&request)?;
        let response: OsrmTableResponse =
            serde_json::from_value(body).map_err(|err| ClientError::malformed(&request.url, err))?;
        check_code(&request.url, response.code.as_deref())?;

        // Unreachable pairs come back as null; a partial table is no table.
        let distances = complete(response.distances)
            .ok_or_else(|| ClientError::malformed(&request.url, "missing or incomplete distances"))?;
        let durations = complete(response.durations)
            .ok_or_else(|| ClientError::malformed(&request.url, "missing or incomplete durations"))?;

        DistanceDurationMatrix::from_tables(&distances, &durations, MatrixSource::Routed)
            .ok_or_else(|| ClientError::malformed(&request.url, "distance and duration tables disagree"))
    }
}

fn check_code(url: &str, code: Option<&str>) -> Result<(), ClientError> {
    match code {
        None | Some("Ok") => Ok(()),
        Some(other) => Err(ClientError::malformed(url, format!("service answered `{other}`"))),
    }
}

fn complete(table: Option<Vec<Vec<Option<f64>>>>) -> Option<Vec<Vec<f64>>> {
    let table = table.filter(|rows| !rows.is_empty())?;
    table
        .into_iter()
        .map(|row| row.into_iter().collect::<Option<Vec<f64>>>())
        .collect()
}

#[derive(Debug, Deserialize)]
struct OsrmTableResponse {
    code: Option<String>,
    distances: Option<Vec<Vec<Option<f64>>>>,
    durations: Option<Vec<Vec<Option<f64>>>>,
}

#[derive(Debug, Deserialize)]
struct OsrmRouteResponse {
    code: Option<String>,
    #[serde(default)]
    routes: Vec<OsrmRoute>,
}

#[derive(Debug, Deserialize)]
struct OsrmRoute {
    geometry: OsrmGeometry,
}

#[derive(Debug, Deserialize)]
struct OsrmGeometry {
    coordinates: Vec<Vec<f64>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_complete_rejects_nulls() {
        let table = Some(vec![vec![Some(0.0), None], vec![Some(1.0), Some(0.0)]]);
        assert!(complete(table).is_none());
    }

    #[test]
    fn test_complete_rejects_empty() {
        assert!(complete(Some(Vec::new())).is_none());
        assert!(complete(None).is_none());
    }

    #[test]
    fn test_complete_passes_full_table() {
        let table = Some(vec![vec![Some(0.0), Some(2.0)], vec![Some(3.0), Some(0.0)]]);
        assert_eq!(complete(table), Some(vec![vec![0.0, 2.0], vec![3.0, 0.0]]));
    }

    #[test]
    fn test_check_code() {
        assert!(check_code("u", Some("Ok")).is_ok());
        assert!(check_code("u", None).is_ok());
        assert!(check_code("u", Some("NoRoute")).is_err());
    }
}
