//! Photo search API client.
//!
//! This module provides a lightweight client for the third-party photo
//! search endpoint the page header can draw its background from. It focuses
//! on:
//!
//! - Constructing an HTTP client with the `Client-ID` authorization header
//! - Validating the configured base URL
//! - Building the single search request (`query`, `orientation`, `per_page`)
//! - Decoding the few response fields the header needs
//!
//! The primary entry point is [`PhotoSearchClient`]. Failures are reported as
//! [`PhotoSearchError`]; callers decide how to fall back.

use std::env;

use historia_util::redact_sensitive;
use reqwest::{Client, RequestBuilder, Url, header};
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

pub use reqwest::StatusCode;

/// Hostnames allowed to use plain HTTP (local development and tests).
const LOCALHOST_DOMAINS: &[&str] = &["localhost", "127.0.0.1"];

/// Errors surfaced by photo search requests.
#[derive(Debug, Error)]
pub enum PhotoSearchError {
    #[error("invalid photo search URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
    #[error("invalid access key: {0}")]
    InvalidAccessKey(#[from] header::InvalidHeaderValue),
    #[error("photo search transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("photo search returned HTTP {0}")]
    Status(StatusCode),
    #[error("photo search response could not be decoded: {0}")]
    Decode(#[source] reqwest::Error),
    #[error("photo search returned no results")]
    NoResults,
}

/// Request shaping parameters sent with every search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchParams {
    pub orientation: String,
    pub per_page: u32,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            orientation: "landscape".to_string(),
            per_page: 1,
        }
    }
}

/// Search response body. Only the fields the header uses are decoded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PhotoSearchResponse {
    #[serde(default)]
    pub results: Vec<Photo>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Photo {
    pub urls: PhotoUrls,
    pub user: PhotoUser,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PhotoUrls {
    pub regular: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PhotoUser {
    pub name: String,
    pub links: PhotoUserLinks,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PhotoUserLinks {
    pub html: String,
}

/// Thin wrapper around a configured `reqwest::Client` for photo searches.
///
/// Every request built by [`PhotoSearchClient::search_request`] carries the
/// `Authorization: Client-ID <key>` header.
#[derive(Debug, Clone)]
pub struct PhotoSearchClient {
    pub base_url: Url,
    pub http: Client,
    pub user_agent: String,
    authorization: header::HeaderValue,
}

impl PhotoSearchClient {
    /// Construct a client for `api_url` authorized with `access_key`.
    ///
    /// Non-localhost hosts must use HTTPS. No request timeout is configured.
    pub fn new(api_url: &str, access_key: &str) -> Result<Self, PhotoSearchError> {
        let base_url = validate_base_url(api_url)?;

        let authorization_header_value = format!("Client-ID {}", access_key);
        let mut authorization = header::HeaderValue::from_str(&authorization_header_value)?;
        authorization.set_sensitive(true);

        let mut default_headers = header::HeaderMap::new();
        default_headers.insert(header::ACCEPT, header::HeaderValue::from_static("application/json"));

        let http = Client::builder().default_headers(default_headers).build()?;

        Ok(Self {
            base_url,
            http,
            user_agent: format!("historia-widgets/0.1; {}", env::consts::OS),
            authorization,
        })
    }

    /// Build the GET request for `query`.
    pub fn search_request(&self, query: &str, params: &SearchParams) -> RequestBuilder {
        debug!(url = %self.base_url, query, "building photo search request");
        let per_page = params.per_page.to_string();
        self.http
            .get(self.base_url.clone())
            .header(header::USER_AGENT, &self.user_agent)
            .header(header::AUTHORIZATION, self.authorization.clone())
            .query(&[
                ("query", query),
                ("orientation", params.orientation.as_str()),
                ("per_page", per_page.as_str()),
            ])
    }

    /// Run a search and decode the response body.
    pub async fn search(&self, query: &str, params: &SearchParams) -> Result<PhotoSearchResponse, PhotoSearchError> {
        let request = self.search_request(query, params).build()?;
        if let Some(value) = request.headers().get(header::AUTHORIZATION).and_then(|v| v.to_str().ok()) {
            debug!(authorization = %redact_sensitive(&format!("Authorization: {value}")), url = %request.url(), "sending photo search");
        }

        let response = self.http.execute(request).await?;
        let status = response.status();
        if !status.is_success() {
            return Err(PhotoSearchError::Status(status));
        }
        response.json::<PhotoSearchResponse>().await.map_err(PhotoSearchError::Decode)
    }

    /// Run a search and return its first photo.
    pub async fn first_photo(&self, query: &str, params: &SearchParams) -> Result<Photo, PhotoSearchError> {
        self.search(query, params)
            .await?
            .results
            .into_iter()
            .next()
            .ok_or(PhotoSearchError::NoResults)
    }
}

/// Validate that a base URL is acceptable for use by the client.
///
/// Rules:
/// - `localhost` or `127.0.0.1`: `http` or `https`
/// - otherwise: scheme must be HTTPS
fn validate_base_url(base: &str) -> Result<Url, PhotoSearchError> {
    let invalid = |reason: String| PhotoSearchError::InvalidBaseUrl {
        url: base.to_string(),
        reason,
    };
    let parsed_base_url = Url::parse(base).map_err(|e| invalid(e.to_string()))?;

    let host_name = parsed_base_url
        .host_str()
        .ok_or_else(|| invalid("URL must include a host".to_string()))?;

    let scheme = parsed_base_url.scheme();
    if LOCALHOST_DOMAINS
        .iter()
        .any(|&allowed| host_name.eq_ignore_ascii_case(allowed))
    {
        if scheme == "http" || scheme == "https" {
            return Ok(parsed_base_url);
        }
        return Err(invalid(format!("unsupported scheme '{scheme}://'")));
    }

    if scheme != "https" {
        return Err(invalid(format!("must use https for non-localhost hosts; got '{scheme}://'")));
    }

    Ok(parsed_base_url)
}
