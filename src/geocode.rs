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

//! Address to coordinates via the OSM Nominatim service.
//!
//! One lookup at startup; the resolved location is fixed for the session.
//! Nominatim rejects anonymous clients, so the request always carries a
//! User-Agent.

use std::time::Duration;

use log::info;
use serde::Deserialize;
use thiserror::Error;

use crate::geo::Location;

const NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org/search";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Error)]
pub enum GeocodeError {
    /// Network or protocol failure talking to the geocoder.
    #[error("geocoding request failed: {0}")]
    Request(String),

    /// The geocoder returned no results for the address.
    #[error("no location found for \"{0}\"")]
    NoMatch(String),

    /// The geocoder answered with coordinates that do not parse or are
    /// outside the valid range.
    #[error("geocoder returned unusable coordinates: {0}")]
    BadCoordinates(String),
}

/// One result row from the Nominatim search endpoint. Coordinates arrive
/// as JSON strings.
#[derive(Debug, Deserialize)]
struct Place {
    lat: String,
    lon: String,
    display_name: String,
}

impl Place {
    fn coordinates(&self) -> Result<Location, GeocodeError> {
        let latitude: f64 = self
            .lat
            .parse()
            .map_err(|e| GeocodeError::BadCoordinates(format!("latitude {:?}: {e}", self.lat)))?;
        let longitude: f64 = self
            .lon
            .parse()
            .map_err(|e| GeocodeError::BadCoordinates(format!("longitude {:?}: {e}", self.lon)))?;

        if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
            return Err(GeocodeError::BadCoordinates(format!(
                "out of range: {latitude}, {longitude}"
            )));
        }

        Ok(Location {
            latitude,
            longitude,
        })
    }
}

/// Resolve a free-form address to coordinates and a display label.
///
/// Returns the first (best) match only.
pub async fn resolve(address: &str) -> Result<(Location, String), GeocodeError> {
    let client = reqwest::Client::builder()
        .user_agent(format!("nearflights/{}", env!("CARGO_PKG_VERSION")))
        .timeout(REQUEST_TIMEOUT)
        .build()
        .map_err(|e| GeocodeError::Request(e.to_string()))?;

    let places: Vec<Place> = client
        .get(NOMINATIM_URL)
        .query(&[("format", "json"), ("limit", "1"), ("q", address)])
        .send()
        .await
        .map_err(|e| GeocodeError::Request(e.to_string()))?
        .error_for_status()
        .map_err(|e| GeocodeError::Request(e.to_string()))?
        .json()
        .await
        .map_err(|e| GeocodeError::Request(e.to_string()))?;

    let place = places
        .into_iter()
        .next()
        .ok_or_else(|| GeocodeError::NoMatch(address.to_string()))?;

    let location = place.coordinates()?;
    info!(
        "Geocoded \"{}\" to {:.4}, {:.4}",
        address, location.latitude, location.longitude
    );

    Ok((location, place.display_name))
}
