//! Blocking reqwest implementation of [`GeoClient`].

use serde_json::Value;

use crate::error::ClientError;
use crate::request::{GeoRequest, Method};
use crate::traits::GeoClient;

#[derive(Debug, Clone)]
pub struct HttpGeoClient {
    client: reqwest::blocking::Client,
}

impl HttpGeoClient {
    /// Every request carries `user_agent`; public OSM services reject
    /// anonymous clients.
    pub fn new(user_agent: &str) -> Result<Self, reqwest::Error> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(user_agent)
            .build()?;

        Ok(Self { client })
    }
}

impl GeoClient for HttpGeoClient {
    fn fetch(&self, request: &GeoRequest) -> Result<Value, ClientError> {
        let builder = match request.method {
            Method::Get => self.client.get(&request.url),
            Method::Post => self
                .client
                .post(&request.url)
                .body(request.body.clone().unwrap_or_default()),
        };

        let response = builder
            .query(&request.params)
            .timeout(request.timeout)
            .send()
            .map_err(|source| ClientError::Transport {
                url: request.url.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Status {
                url: request.url.clone(),
                status: status.as_u16(),
            });
        }

        let body = response.text().map_err(|source| ClientError::Transport {
            url: request.url.clone(),
            source,
        })?;

        serde_json::from_str(&body).map_err(|err| ClientError::malformed(&request.url, err))
    }
}
