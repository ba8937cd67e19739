//! trip-planner core
//!
//! Resolves free-text places, discovers stops around an area, and orders an
//! origin, stops and destination into a costed itinerary using only public,
//! keyless OpenStreetMap services.

pub mod cache;
pub mod config;
pub mod dedup;
pub mod error;
pub mod geo;
pub mod geocode;
pub mod haversine;
pub mod http;
pub mod matrix;
pub mod osrm;
pub mod place;
pub mod poi;
pub mod polyline;
pub mod request;
pub mod selector;
pub mod solver;
pub mod specific;
pub mod traits;
pub mod trip;

pub use error::{ClientError, Endpoint, PlanError};
pub use geo::{Coordinate, TravelMode};
pub use trip::{TripInputs, TripPlan, TripPlanner};
