//! A single planning run: resolve, discover, select, order, total.

use serde::Serialize;
use tracing::{info, warn};

use crate::config::ServiceConfig;
use crate::dedup;
use crate::error::{Endpoint, PlanError};
use crate::geo::{Coordinate, TravelMode};
use crate::geocode::GeoResolver;
use crate::matrix::{MatrixSource, RouteMatrixProvider};
use crate::osrm::OsrmClient;
use crate::place::{GeoHit, PlaceCandidate};
use crate::poi::{PoiCategory, PoiDiscovery};
use crate::polyline::Polyline;
use crate::selector;
use crate::solver::{self, RoutePlan};
use crate::specific::SpecificNeedResolver;
use crate::traits::GeoClient;

/// What the traveller asked for. Never modified by the planner.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TripInputs {
    pub origin: String,
    pub destination: String,
    /// Area to explore for stops; the destination when `None`.
    pub city: Option<String>,
    /// Free-text request such as "pharmacy" or a named place.
    pub specific_need: String,
    pub mode: TravelMode,
    pub top_k: usize,
    pub radius_m: u32,
    pub cost_per_km: f64,
    pub time_value_per_hr: f64,
}

impl TripInputs {
    pub fn new(origin: impl Into<String>, destination: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
            destination: destination.into(),
            city: None,
            specific_need: String::new(),
            mode: TravelMode::Driving,
            top_k: 6,
            radius_m: 4000,
            cost_per_km: 0.25,
            time_value_per_hr: 5.0,
        }
    }

    fn validate(&self) -> Result<(), PlanError> {
        if self.top_k == 0 {
            return Err(PlanError::InvalidInputs("top_k must be at least 1".to_string()));
        }
        if self.radius_m == 0 {
            return Err(PlanError::InvalidInputs("radius_m must be positive".to_string()));
        }
        if !(self.cost_per_km >= 0.0 && self.time_value_per_hr >= 0.0) {
            return Err(PlanError::InvalidInputs("cost rates must be non-negative".to_string()));
        }
        Ok(())
    }

    fn city_text(&self) -> &str {
        self.city
            .as_deref()
            .map(str::trim)
            .filter(|city| !city.is_empty())
            .unwrap_or(&self.destination)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TripTotals {
    pub distance_km: f64,
    pub duration_hr: f64,
    pub cost: f64,
}

impl TripTotals {
    pub fn from_plan(route: &RoutePlan, cost_per_km: f64, time_value_per_hr: f64) -> Self {
        let distance_km = route.distance_km();
        let duration_hr = route.duration_hours();
        Self {
            distance_km,
            duration_hr,
            cost: distance_km * cost_per_km + duration_hr * time_value_per_hr,
        }
    }
}

/// A named point on the ordered route.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteNode {
    pub label: String,
    pub name: String,
    pub coordinate: Coordinate,
}

/// Everything a run produced, for the reporting and map layers.
#[derive(Debug, Clone, Serialize)]
pub struct TripPlan {
    pub inputs: TripInputs,
    pub center: GeoHit,
    pub origin: GeoHit,
    pub destination: GeoHit,
    pub specific_candidates: Vec<PlaceCandidate>,
    /// Deduplicated, specific results first.
    pub candidates: Vec<PlaceCandidate>,
    /// Selection order.
    pub stops: Vec<PlaceCandidate>,
    /// Origin, stops in visiting order, destination.
    pub ordered: Vec<RouteNode>,
    pub route: RoutePlan,
    pub matrix_source: MatrixSource,
    pub geometry: Option<Polyline>,
    pub totals: TripTotals,
}

pub struct TripPlanner<'a, C> {
    client: &'a C,
    config: &'a ServiceConfig,
}

impl<'a, C: GeoClient> TripPlanner<'a, C> {
    pub fn new(client: &'a C, config: &'a ServiceConfig) -> Self {
        Self { client, config }
    }

    pub fn plan(&self, inputs: &TripInputs) -> Result<TripPlan, PlanError> {
        inputs.validate()?;
        let geocoder = GeoResolver::new(self.client, &self.config.geocoding);

        let center = geocoder
            .resolve_best(inputs.city_text(), None)
            .or_else(|| {
                if inputs.city_text() == inputs.destination {
                    return None;
                }
                geocoder.resolve_best(&inputs.destination, None)
            })
            .ok_or(PlanError::Unresolvable {
                missing: vec![Endpoint::Center],
            })?;
        info!(label = %center.label, coordinate = %center.coordinate, "resolved search center");

        let origin = geocoder.resolve_best(&inputs.origin, Some(center.coordinate));
        let destination = geocoder.resolve_best(&inputs.destination, Some(center.coordinate));
        let (origin, destination) = match (origin, destination) {
            (Some(origin), Some(destination)) => (origin, destination),
            (origin, destination) => {
                let mut missing = Vec::new();
                if origin.is_none() {
                    missing.push(Endpoint::Origin);
                }
                if destination.is_none() {
                    missing.push(Endpoint::Destination);
                }
                return Err(PlanError::Unresolvable { missing });
            }
        };

        let discovery = PoiDiscovery::new(self.client, &self.config.overpass);
        let mut general = discovery.discover(center.coordinate, inputs.radius_m, PoiCategory::Attraction);
        general.extend(discovery.discover(center.coordinate, inputs.radius_m, PoiCategory::Restaurant));

        let specific_candidates = SpecificNeedResolver::new(self.client, self.config).resolve_specific(
            center.coordinate,
            inputs.radius_m,
            &inputs.specific_need,
        );
        let candidates = dedup::merge(&[&specific_candidates, &general]);
        if candidates.is_empty() {
            warn!("no candidate places found, routing origin to destination directly");
        }

        let force_specific = !inputs.specific_need.trim().is_empty();
        let stops = selector::select(&candidates, destination.coordinate, inputs.top_k, force_specific);
        info!(candidates = candidates.len(), stops = stops.len(), "selected stops");

        let mut nodes = Vec::with_capacity(stops.len() + 2);
        nodes.push(RouteNode {
            label: "Origin".to_string(),
            name: origin.label.clone(),
            coordinate: origin.coordinate,
        });
        nodes.extend(stops.iter().map(|stop| RouteNode {
            label: String::new(),
            name: stop.name.clone(),
            coordinate: stop.coordinate,
        }));
        nodes.push(RouteNode {
            label: "Destination".to_string(),
            name: destination.label.clone(),
            coordinate: destination.coordinate,
        });

        let coordinates: Vec<Coordinate> = nodes.iter().map(|node| node.coordinate).collect();
        let osrm = OsrmClient::new(self.client, &self.config.osrm);
        let matrix = RouteMatrixProvider::new(&osrm).get_matrix(&coordinates, inputs.mode);
        let route = solver::plan(&matrix);

        let ordered = label_in_order(&nodes, &route.order);
        let geometry = if self.config.osrm.fetch_geometry {
            let path: Vec<Coordinate> = ordered.iter().map(|node| node.coordinate).collect();
            osrm.route_geometry(&path, inputs.mode)
                .inspect_err(|err| warn!(error = %err, "route geometry unavailable"))
                .ok()
        } else {
            None
        };

        let totals = TripTotals::from_plan(&route, inputs.cost_per_km, inputs.time_value_per_hr);
        info!(
            distance_km = totals.distance_km,
            duration_hr = totals.duration_hr,
            cost = totals.cost,
            source = ?matrix.source(),
            "trip planned"
        );

        Ok(TripPlan {
            inputs: inputs.clone(),
            center,
            origin,
            destination,
            specific_candidates,
            candidates,
            stops,
            ordered,
            matrix_source: matrix.source(),
            route,
            geometry,
            totals,
        })
    }
}

/// Nodes in visiting order, stops labelled "Stop 1", "Stop 2", ...
fn label_in_order(nodes: &[RouteNode], order: &[usize]) -> Vec<RouteNode> {
    let last = order.len().saturating_sub(1);
    order
        .iter()
        .enumerate()
        .filter_map(|(position, &index)| {
            let mut node = nodes.get(index)?.clone();
            if position != 0 && position != last {
                node.label = format!("Stop {position}");
            }
            Some(node)
        })
        .collect()
}
