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

//! Decoding of the `/states/all` response into typed state vectors.
//!
//! The feed serializes each aircraft as a positional JSON array with mixed
//! types and liberal use of `null`. This module owns the index layout and
//! turns rows into [`StateVector`] values, skipping rows that are too
//! damaged to carry an identifier.

use chrono::{DateTime, Utc};
use log::debug;
use serde::Deserialize;
use serde_json::Value;

// Index layout of one row in the `states` array, per the OpenSky REST API:
// 0 icao24, 1 callsign, 2 origin_country, 3 time_position, 4 last_contact,
// 5 longitude, 6 latitude, 7 baro_altitude, 8 on_ground, 9 velocity,
// 10 true_track, 11 vertical_rate, 12 sensors, 13 geo_altitude, 14 squawk.
const IDX_ICAO24: usize = 0;
const IDX_CALLSIGN: usize = 1;
const IDX_ORIGIN_COUNTRY: usize = 2;
const IDX_LAST_CONTACT: usize = 4;
const IDX_LONGITUDE: usize = 5;
const IDX_LATITUDE: usize = 6;
const IDX_BARO_ALTITUDE: usize = 7;
const IDX_ON_GROUND: usize = 8;
const IDX_VELOCITY: usize = 9;
const IDX_TRUE_TRACK: usize = 10;
const IDX_VERTICAL_RATE: usize = 11;
const IDX_GEO_ALTITUDE: usize = 13;
const IDX_SQUAWK: usize = 14;

/// Raw wire shape of a `/states/all` response.
///
/// `states` is `null` (not an empty array) when the query matched nothing,
/// which happens routinely for small bounding boxes off-peak.
#[derive(Debug, Deserialize)]
pub struct StatesResponse {
    /// Feed-side timestamp for the batch, unix seconds.
    pub time: i64,
    /// One positional array per aircraft, or `null`.
    pub states: Option<Vec<Vec<Value>>>,
}

impl StatesResponse {
    /// Decode the raw rows into a batch of typed state vectors.
    ///
    /// Rows without a usable ICAO24 identifier are dropped with a debug log;
    /// everything else is kept, including aircraft with no position (the
    /// caller decides what positionless vectors are good for).
    #[must_use]
    pub fn into_batch(self) -> StateBatch {
        let time = DateTime::from_timestamp(self.time, 0).unwrap_or_else(Utc::now);

        let rows = self.states.unwrap_or_default();
        let mut vectors = Vec::with_capacity(rows.len());
        for row in &rows {
            match StateVector::from_row(row) {
                Some(vector) => vectors.push(vector),
                None => debug!("Skipping state row without identifier: {:?}", row.first()),
            }
        }

        StateBatch { time, vectors }
    }
}

/// One decoded batch of state vectors with its feed timestamp.
#[derive(Debug, Clone)]
pub struct StateBatch {
    /// When the feed assembled this batch.
    pub time: DateTime<Utc>,
    /// Decoded aircraft state vectors.
    pub vectors: Vec<StateVector>,
}

/// A single aircraft state vector from the feed.
///
/// Units are the feed's own: meters for altitudes, meters per second for
/// speeds and climb rates, degrees for angles.
#[derive(Debug, Clone, PartialEq)]
pub struct StateVector {
    /// ICAO 24-bit address (lowercase hex string, the stable key).
    pub icao24: String,
    /// Callsign with padding trimmed; `None` when blank.
    pub callsign: Option<String>,
    /// Country the aircraft is registered in.
    pub origin_country: String,
    /// Last message received from the aircraft.
    pub last_contact: Option<DateTime<Utc>>,
    /// Longitude in degrees.
    pub longitude: Option<f64>,
    /// Latitude in degrees.
    pub latitude: Option<f64>,
    /// Barometric altitude in meters.
    pub baro_altitude_m: Option<f64>,
    /// Whether the transponder reports surface position.
    pub on_ground: bool,
    /// Ground speed in meters per second.
    pub velocity_ms: Option<f64>,
    /// Track over ground in degrees clockwise from north.
    pub true_track: Option<f64>,
    /// Vertical rate in meters per second, positive climbing.
    pub vertical_rate_ms: Option<f64>,
    /// Geometric altitude in meters.
    pub geo_altitude_m: Option<f64>,
    /// Transponder squawk code.
    pub squawk: Option<String>,
}

impl StateVector {
    /// Decode one positional row. Returns `None` when the identifier slot
    /// is missing or not a string.
    #[must_use]
    pub fn from_row(row: &[Value]) -> Option<Self> {
        let icao24 = str_at(row, IDX_ICAO24)?.to_lowercase();

        Some(Self {
            icao24,
            callsign: str_at(row, IDX_CALLSIGN)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(ToOwned::to_owned),
            origin_country: str_at(row, IDX_ORIGIN_COUNTRY)
                .unwrap_or_default()
                .to_owned(),
            last_contact: row
                .get(IDX_LAST_CONTACT)
                .and_then(Value::as_i64)
                .and_then(|secs| DateTime::from_timestamp(secs, 0)),
            longitude: f64_at(row, IDX_LONGITUDE),
            latitude: f64_at(row, IDX_LATITUDE),
            baro_altitude_m: f64_at(row, IDX_BARO_ALTITUDE),
            on_ground: row
                .get(IDX_ON_GROUND)
                .and_then(Value::as_bool)
                .unwrap_or(false),
            velocity_ms: f64_at(row, IDX_VELOCITY),
            true_track: f64_at(row, IDX_TRUE_TRACK),
            vertical_rate_ms: f64_at(row, IDX_VERTICAL_RATE),
            geo_altitude_m: f64_at(row, IDX_GEO_ALTITUDE),
            squawk: str_at(row, IDX_SQUAWK)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(ToOwned::to_owned),
        })
    }

    /// Whether the vector carries a full position fix.
    #[must_use]
    pub fn has_position(&self) -> bool {
        self.latitude.is_some() && self.longitude.is_some()
    }
}

fn str_at(row: &[Value], index: usize) -> Option<&str> {
    row.get(index).and_then(Value::as_str)
}

fn f64_at(row: &[Value], index: usize) -> Option<f64> {
    row.get(index).and_then(Value::as_f64)
}
