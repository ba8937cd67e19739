//! Error types.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// Failure of a single upstream call. Components absorb these and fall back.
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} responded with status {status}")]
    Status { url: String, status: u16 },

    #[error("malformed response from {url}: {reason}")]
    Malformed { url: String, reason: String },
}

impl ClientError {
    pub fn malformed(url: impl Into<String>, reason: impl fmt::Display) -> Self {
        ClientError::Malformed {
            url: url.into(),
            reason: reason.to_string(),
        }
    }
}

/// Which user-supplied location could not be geocoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Endpoint {
    Center,
    Origin,
    Destination,
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Endpoint::Center => "center",
            Endpoint::Origin => "origin",
            Endpoint::Destination => "destination",
        };
        f.write_str(name)
    }
}

/// Terminal failure of a planning run.
#[derive(Error, Debug)]
pub enum PlanError {
    #[error("could not geocode: {}", join(.missing))]
    Unresolvable { missing: Vec<Endpoint> },

    #[error("invalid trip inputs: {0}")]
    InvalidInputs(String),
}

fn join(endpoints: &[Endpoint]) -> String {
    endpoints
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unresolvable_lists_endpoints() {
        let err = PlanError::Unresolvable {
            missing: vec![Endpoint::Origin, Endpoint::Destination],
        };
        assert_eq!(err.to_string(), "could not geocode: origin, destination");
    }

    #[test]
    fn test_malformed_message() {
        let err = ClientError::malformed("http://x", "missing lat");
        assert_eq!(err.to_string(), "malformed response from http://x: missing lat");
    }
}
