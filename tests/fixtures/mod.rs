//! Test fixtures for trip-planner.
//!
//! Provides:
//! - Real Lahore locations (from OpenStreetMap)
//! - A scripted in-memory `GeoClient` and response builders
//! - A service config pointing at fake hosts

#![allow(dead_code)]

pub mod lahore_locations;
pub mod scripted;

pub use lahore_locations::*;
pub use scripted::*;
