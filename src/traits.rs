//! Seams between the planning core and the outside world.
//!
//! These are intentionally minimal. The planner only needs a way to issue a
//! request and get JSON back, and a way to turn coordinates into a matrix.

use serde_json::Value;

use crate::error::ClientError;
use crate::geo::{Coordinate, TravelMode};
use crate::matrix::DistanceDurationMatrix;
use crate::request::GeoRequest;

/// Executes a request and returns the decoded JSON body.
///
/// Implementations must honour `request.timeout` and report any non-2xx
/// status or undecodable body as an error. They never retry.
pub trait GeoClient {
    fn fetch(&self, request: &GeoRequest) -> Result<Value, ClientError>;
}

impl<C: GeoClient + ?Sized> GeoClient for &C {
    fn fetch(&self, request: &GeoRequest) -> Result<Value, ClientError> {
        (**self).fetch(request)
    }
}

/// Provides a distance/duration matrix for a set of locations.
///
/// The matrix is indexed by the provided location order.
pub trait DistanceMatrixProvider {
    fn matrix_for(
        &self,
        locations: &[Coordinate],
        mode: TravelMode,
    ) -> Result<DistanceDurationMatrix, ClientError>;
}

impl<P: DistanceMatrixProvider + ?Sized> DistanceMatrixProvider for &P {
    fn matrix_for(
        &self,
        locations: &[Coordinate],
        mode: TravelMode,
    ) -> Result<DistanceDurationMatrix, ClientError> {
        (**self).matrix_for(locations, mode)
    }
}
