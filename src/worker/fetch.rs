//! Request/response values seen by the worker, and the network seam.
//!
//! Responses are plain values (status, headers, body bytes), so storing a copy
//! in the cache and returning another to the page is just a `clone()`.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::Result;

/// How the page issued the request. Only `Navigate` changes behavior.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RequestMode {
    Navigate,
    SameOrigin,
    #[default]
    Cors,
    NoCors,
}

/// Response tainting. Only `Basic` (same-origin) responses are cached at runtime.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseKind {
    #[default]
    Basic,
    Cors,
    Opaque,
    /// Produced by the worker itself (offline fallbacks).
    Synthetic,
}

/// An outbound request intercepted by the worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub url: String,
    pub method: String,
    pub mode: RequestMode,
}

impl FetchRequest {
    /// A `GET` subresource request.
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            method: "GET".to_string(),
            mode: RequestMode::Cors,
        }
    }

    /// A top-level page navigation.
    pub fn navigate(url: impl Into<String>) -> Self {
        Self {
            mode: RequestMode::Navigate,
            ..Self::get(url)
        }
    }

    pub fn with_method(mut self, method: &str) -> Self {
        self.method = method.to_ascii_uppercase();
        self
    }

    pub fn is_get(&self) -> bool {
        self.method.eq_ignore_ascii_case("GET")
    }
}

/// A complete HTTP response held in memory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    #[serde(with = "body_base64")]
    pub body: Vec<u8>,
    #[serde(default)]
    pub kind: ResponseKind,
}

impl FetchResponse {
    pub fn new(status: u16, kind: ResponseKind, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: body.into(),
            kind,
        }
    }

    /// `200` synthetic response with the given content type.
    pub fn synthetic(content_type: &str, body: &str) -> Self {
        Self::new(200, ResponseKind::Synthetic, body.as_bytes().to_vec())
            .with_header("Content-Type", content_type)
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// `true` for 2xx statuses.
    pub fn ok(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Network access for the worker. `Err` is a network-layer failure; HTTP
/// error statuses come back as `Ok`.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, request: &FetchRequest) -> Result<FetchResponse>;
}

/// reqwest-backed [`Fetcher`]. Classifies responses as `basic` when they are
/// same-origin with the worker's origin, `cors` otherwise.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
    origin: Url,
}

impl HttpFetcher {
    pub fn new(origin: Url) -> Result<Self> {
        let client = reqwest::Client::builder().build().map_err(|e| {
            crate::error::Error::Config(format!("failed to build HTTP client: {}", e))
        })?;
        Ok(Self { client, origin })
    }

    fn classify(&self, url: &Url) -> ResponseKind {
        if url.origin() == self.origin.origin() {
            ResponseKind::Basic
        } else {
            ResponseKind::Cors
        }
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, request: &FetchRequest) -> Result<FetchResponse> {
        let method = reqwest::Method::from_bytes(request.method.as_bytes())
            .map_err(|e| crate::error::Error::Provider(format!("invalid method: {}", e)))?;
        let response = self.client.request(method, &request.url).send().await?;

        let kind = self.classify(response.url());
        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        let body = response.bytes().await?.to_vec();

        Ok(FetchResponse {
            status,
            headers,
            body,
            kind,
        })
    }
}

mod body_base64 {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(body: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(body))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        STANDARD.decode(encoded).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_constructors() {
        let req = FetchRequest::navigate("http://localhost/");
        assert_eq!(req.mode, RequestMode::Navigate);
        assert!(req.is_get());

        let post = FetchRequest::get("http://localhost/api").with_method("post");
        assert_eq!(post.method, "POST");
        assert!(!post.is_get());
    }

    #[test]
    fn test_synthetic_response_has_content_type() {
        let resp = FetchResponse::synthetic("text/plain", "You are offline.");
        assert_eq!(resp.status, 200);
        assert_eq!(resp.kind, ResponseKind::Synthetic);
        assert_eq!(resp.header("content-type"), Some("text/plain"));
        assert_eq!(resp.text(), "You are offline.");
    }

    #[test]
    fn test_ok_range() {
        assert!(FetchResponse::new(200, ResponseKind::Basic, "").ok());
        assert!(FetchResponse::new(204, ResponseKind::Basic, "").ok());
        assert!(!FetchResponse::new(404, ResponseKind::Basic, "").ok());
    }

    #[test]
    fn test_body_serialized_as_base64() {
        let resp = FetchResponse::new(200, ResponseKind::Basic, vec![0u8, 159, 146, 150]);
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["body"], "AJ+Slg==");
        assert_eq!(json["kind"], "basic");
        let back: FetchResponse = serde_json::from_value(json).unwrap();
        assert_eq!(back.body, vec![0u8, 159, 146, 150]);
    }

    #[test]
    fn test_http_fetcher_classifies_by_origin() {
        let fetcher = HttpFetcher::new(Url::parse("http://localhost:8888/").unwrap()).unwrap();
        let same = Url::parse("http://localhost:8888/logo.png").unwrap();
        let cross = Url::parse("https://cdn.tailwindcss.com/").unwrap();
        assert_eq!(fetcher.classify(&same), ResponseKind::Basic);
        assert_eq!(fetcher.classify(&cross), ResponseKind::Cors);
    }
}
