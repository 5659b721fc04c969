// Copyright 2025 Chris Custine
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Client library for the OpenSky Network state-vector feed.
//!
//! This library wraps the anonymous REST endpoint at
//! `https://opensky-network.org/api/states/all` and decodes its positional
//! JSON rows into typed [`StateVector`] values. It knows nothing about
//! rendering or session state; callers decide what to do with a batch.
//!
//! # Quick Start
//!
//! ```no_run
//! use opensky_client::{BoundingBox, Client, ClientConfig, FetchError};
//!
//! async fn print_nearby() -> Result<(), FetchError> {
//!     let client = Client::new(ClientConfig::default())?;
//!     let bbox = BoundingBox::around(33.9425, -118.4081, 200.0);
//!
//!     let batch = client.states_in_box(bbox).await?;
//!     for vector in &batch.vectors {
//!         println!("{}: {:?}", vector.icao24, vector.callsign);
//!     }
//!     Ok(())
//! }
//! ```

pub mod states;

use std::time::Duration;

use log::debug;
use thiserror::Error;

pub use states::{StateBatch, StateVector, StatesResponse};

/// Earth's mean radius in statute miles.
pub const EARTH_RADIUS_MILES: f64 = 3958.8;

const DEFAULT_BASE_URL: &str = "https://opensky-network.org/api";

/// Errors that can occur while fetching a batch of state vectors.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Network-level failure or a non-success HTTP status. Safe to retry on
    /// the next cycle.
    #[error("feed request failed: {0}")]
    Transient(String),

    /// The feed rejected the request with HTTP 429. The anonymous endpoint
    /// does this under load; the next scheduled poll simply tries again.
    #[error("feed rate limit reached")]
    RateLimited,

    /// The response arrived but could not be decoded.
    #[error("malformed feed response: {0}")]
    Malformed(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Malformed(err.to_string())
        } else {
            Self::Transient(err.to_string())
        }
    }
}

/// A latitude/longitude query window for the feed.
///
/// The feed only filters rectangles, so the box around a radius query is
/// deliberately generous; exact great-circle filtering happens downstream.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    /// Southern edge in degrees.
    pub lamin: f64,
    /// Western edge in degrees.
    pub lomin: f64,
    /// Northern edge in degrees.
    pub lamax: f64,
    /// Eastern edge in degrees.
    pub lomax: f64,
}

impl BoundingBox {
    /// Build a box that fully contains the circle of `radius_miles` around
    /// a point, clamped to valid coordinate ranges.
    #[must_use]
    pub fn around(latitude: f64, longitude: f64, radius_miles: f64) -> Self {
        let angular_deg = (radius_miles / EARTH_RADIUS_MILES).to_degrees();
        // Longitude degrees shrink toward the poles; the cosine floor keeps
        // the box finite at extreme latitudes.
        let cos_lat = latitude.to_radians().cos().max(0.01);
        let lon_pad = angular_deg / cos_lat;

        Self {
            lamin: (latitude - angular_deg).max(-90.0),
            lomin: (longitude - lon_pad).max(-180.0),
            lamax: (latitude + angular_deg).min(90.0),
            lomax: (longitude + lon_pad).min(180.0),
        }
    }
}

/// Configuration for the feed client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the REST API, without a trailing slash.
    pub base_url: String,
    /// Per-request timeout.
    pub timeout: Duration,
    /// User-Agent header sent with every request.
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(30),
            user_agent: format!("nearflights/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Async client for the state-vector feed.
#[derive(Debug, Clone)]
pub struct Client {
    http: reqwest::Client,
    base_url: String,
}

impl Client {
    /// Create a client with the given configuration.
    pub fn new(config: ClientConfig) -> Result<Self, FetchError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent)
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url,
        })
    }

    /// Fetch all state vectors inside a bounding box.
    pub async fn states_in_box(&self, bbox: BoundingBox) -> Result<StateBatch, FetchError> {
        let url = self.states_url(bbox);
        debug!("Fetching state vectors from {}", url);

        let response = self.http.get(&url).send().await?;
        if let Some(err) = status_error(response.status()) {
            return Err(err);
        }

        let decoded: StatesResponse = response
            .json()
            .await
            .map_err(|e| FetchError::Malformed(e.to_string()))?;

        Ok(decoded.into_batch())
    }

    fn states_url(&self, bbox: BoundingBox) -> String {
        format!(
            "{}/states/all?lamin={:.4}&lomin={:.4}&lamax={:.4}&lomax={:.4}",
            self.base_url, bbox.lamin, bbox.lomin, bbox.lamax, bbox.lomax
        )
    }
}

fn status_error(status: reqwest::StatusCode) -> Option<FetchError> {
    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
        Some(FetchError::RateLimited)
    } else if status.is_success() {
        None
    } else {
        Some(FetchError::Transient(format!("HTTP status {status}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounding_box_contains_center() {
        let bbox = BoundingBox::around(33.9425, -118.4081, 200.0);

        assert!(bbox.lamin < 33.9425 && 33.9425 < bbox.lamax);
        assert!(bbox.lomin < -118.4081 && -118.4081 < bbox.lomax);
        // 200 miles is roughly 2.9 degrees of latitude.
        assert!((bbox.lamax - 33.9425 - 2.89).abs() < 0.1);
        // Longitude padding widens away from the equator.
        assert!(bbox.lomax - (-118.4081) > bbox.lamax - 33.9425);
    }

    #[test]
    fn test_bounding_box_clamps_at_pole() {
        let bbox = BoundingBox::around(89.5, 0.0, 200.0);

        assert!(bbox.lamax <= 90.0);
        assert!(bbox.lomin >= -180.0);
        assert!(bbox.lomax <= 180.0);
    }

    #[test]
    fn test_states_url_formatting() {
        let client = Client::new(ClientConfig {
            base_url: "https://example.invalid/api".to_string(),
            ..Default::default()
        })
        .unwrap();
        let url = client.states_url(BoundingBox {
            lamin: 31.05,
            lomin: -121.9,
            lamax: 36.83,
            lomax: -114.92,
        });

        assert_eq!(
            url,
            "https://example.invalid/api/states/all?lamin=31.0500&lomin=-121.9000&lamax=36.8300&lomax=-114.9200"
        );
    }

    #[test]
    fn test_fetch_error_display() {
        assert_eq!(FetchError::RateLimited.to_string(), "feed rate limit reached");
        assert!(FetchError::Transient("timeout".to_string())
            .to_string()
            .contains("timeout"));
    }

    #[test]
    fn test_status_mapping() {
        use reqwest::StatusCode;

        assert!(status_error(StatusCode::OK).is_none());
        assert!(matches!(
            status_error(StatusCode::TOO_MANY_REQUESTS),
            Some(FetchError::RateLimited)
        ));
        assert!(matches!(
            status_error(StatusCode::BAD_GATEWAY),
            Some(FetchError::Transient(_))
        ));
    }
}
