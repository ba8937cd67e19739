//! Transport-neutral description of an upstream call.

use std::time::Duration;

const DEFAULT_TIMEOUT_SECS: u64 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
}

/// A GET or POST against a JSON-speaking service.
#[derive(Debug, Clone, PartialEq)]
pub struct GeoRequest {
    pub method: Method,
    pub url: String,
    pub params: Vec<(String, String)>,
    pub body: Option<String>,
    pub timeout: Duration,
    /// How long a successful response may be served from cache.
    pub cache_ttl: Option<Duration>,
}

/// Cache identity: method, url, sorted parameters and body.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    method: Method,
    url: String,
    params: Vec<(String, String)>,
    body: Option<String>,
}

impl GeoRequest {
    pub fn get(url: impl Into<String>) -> Self {
        Self::new(Method::Get, url.into(), None)
    }

    pub fn post(url: impl Into<String>, body: impl Into<String>) -> Self {
        Self::new(Method::Post, url.into(), Some(body.into()))
    }

    fn new(method: Method, url: String, body: Option<String>) -> Self {
        Self {
            method,
            url,
            params: Vec::new(),
            body,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            cache_ttl: None,
        }
    }

    pub fn param(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.params.push((key.into(), value.to_string()));
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn cache_for(mut self, ttl: Duration) -> Self {
        self.cache_ttl = Some(ttl);
        self
    }

    /// First value of a query parameter.
    pub fn param_value(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn cache_key(&self) -> CacheKey {
        let mut params = self.params.clone();
        params.sort();
        CacheKey {
            method: self.method,
            url: self.url.clone(),
            params,
            body: self.body.clone(),
        }
    }
}
