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

//! Snapshot building: raw state vectors become distance-annotated flights.
//!
//! Each poll produces a fresh set of [`Flight`] values relative to the
//! tracked origin; nothing here is mutated in place between polls.

use chrono::{DateTime, Utc};
use opensky_client::StateVector;

use crate::airlines::Operator;
use crate::geo::{self, Location};

// Conversions from the feed's metric units to aviation-customary ones.
const FEET_PER_METER: f64 = 3.28084;
const KNOTS_PER_METER_PER_SECOND: f64 = 1.94384;
const FEET_PER_MINUTE_PER_METER_PER_SECOND: f64 = 196.85;

// Bearing is meaningless for an aircraft essentially overhead.
const OVERHEAD_MILES: f64 = 0.05;

/// One aircraft from a snapshot, annotated relative to the tracked origin.
#[derive(Debug, Clone)]
pub struct Flight {
    /// ICAO 24-bit address, the stable identity across refreshes.
    pub icao24: String,
    /// Callsign as broadcast, if any.
    pub callsign: Option<String>,
    /// Country of registration.
    pub origin_country: String,
    /// Operator resolved from the callsign prefix.
    pub operator: Operator,
    /// Current position.
    pub position: Location,
    /// Great-circle distance from the tracked origin, statute miles.
    pub distance_miles: f64,
    /// Bearing from the origin, `None` when essentially overhead.
    pub bearing_degrees: Option<f64>,
    /// Altitude in feet, barometric preferred over geometric.
    pub altitude_ft: Option<i32>,
    /// Ground speed in knots.
    pub ground_speed_kt: Option<f64>,
    /// Track over ground in degrees.
    pub track_degrees: Option<f64>,
    /// Vertical rate in feet per minute, positive climbing.
    pub vertical_rate_ftmin: Option<i32>,
    /// Surface-position flag from the transponder.
    pub on_ground: bool,
    /// Transponder squawk code.
    pub squawk: Option<String>,
    /// Last message received from the aircraft.
    pub last_contact: Option<DateTime<Utc>>,
}

impl Flight {
    /// Callsign when broadcast, ICAO24 address otherwise.
    #[must_use]
    pub fn label(&self) -> &str {
        self.callsign.as_deref().unwrap_or(&self.icao24)
    }

    /// Whether the callsign marks a military operator.
    #[must_use]
    pub fn is_military(&self) -> bool {
        self.operator.is_military()
    }
}

/// Build one snapshot's flights from raw state vectors.
///
/// Vectors without a position are dropped, as are aircraft beyond
/// `radius_miles` (the bounding-box query over-fetches by design, so the
/// exact great-circle cutoff is applied here). Operator lookup never fails
/// a flight; unmatched callsigns stay [`Operator::Unknown`].
#[must_use]
pub fn build_snapshot(
    vectors: Vec<StateVector>,
    origin: Location,
    radius_miles: f64,
) -> Vec<Flight> {
    let mut flights = Vec::with_capacity(vectors.len());

    for vector in vectors {
        let (Some(latitude), Some(longitude)) = (vector.latitude, vector.longitude) else {
            continue;
        };

        let position = Location {
            latitude,
            longitude,
        };
        let distance_miles = geo::distance_miles(origin, position);
        if distance_miles > radius_miles {
            continue;
        }

        let bearing_degrees = if distance_miles < OVERHEAD_MILES {
            None
        } else {
            Some(geo::bearing_degrees(origin, position))
        };

        let operator = Operator::classify(vector.callsign.as_deref().unwrap_or_default());
        let altitude_m = vector.baro_altitude_m.or(vector.geo_altitude_m);

        flights.push(Flight {
            icao24: vector.icao24,
            callsign: vector.callsign,
            origin_country: vector.origin_country,
            operator,
            position,
            distance_miles,
            bearing_degrees,
            altitude_ft: altitude_m.map(|m| (m * FEET_PER_METER).round() as i32),
            ground_speed_kt: vector.velocity_ms.map(|v| v * KNOTS_PER_METER_PER_SECOND),
            track_degrees: vector.true_track,
            vertical_rate_ftmin: vector
                .vertical_rate_ms
                .map(|v| (v * FEET_PER_MINUTE_PER_METER_PER_SECOND).round() as i32),
            on_ground: vector.on_ground,
            squawk: vector.squawk,
            last_contact: vector.last_contact,
        });
    }

    flights
}

#[cfg(test)]
mod tests {
    use super::*;

    const ORIGIN: Location = Location {
        latitude: 33.9425,
        longitude: -118.4081,
    };

    fn vector(icao24: &str, latitude: Option<f64>, longitude: Option<f64>) -> StateVector {
        StateVector {
            icao24: icao24.to_string(),
            callsign: None,
            origin_country: "United States".to_string(),
            last_contact: None,
            longitude,
            latitude,
            baro_altitude_m: None,
            on_ground: false,
            velocity_ms: None,
            true_track: None,
            vertical_rate_ms: None,
            geo_altitude_m: None,
            squawk: None,
        }
    }

    #[test]
    fn test_positionless_vectors_are_dropped() {
        let vectors = vec![
            vector("a1b2c3", Some(34.0), Some(-118.5)),
            vector("d4e5f6", None, Some(-118.5)),
            vector("778899", Some(34.0), None),
        ];

        let flights = build_snapshot(vectors, ORIGIN, 200.0);
        assert_eq!(flights.len(), 1);
        assert_eq!(flights[0].icao24, "a1b2c3");
    }

    #[test]
    fn test_radius_cutoff_is_great_circle() {
        let vectors = vec![
            vector("near01", Some(34.0), Some(-118.5)),
            // JFK, far outside a 200 mile radius of LAX.
            vector("far001", Some(40.6413), Some(-73.7781)),
        ];

        let flights = build_snapshot(vectors, ORIGIN, 200.0);
        assert_eq!(flights.len(), 1);
        assert_eq!(flights[0].icao24, "near01");
        assert!(flights[0].distance_miles < 200.0);
    }

    #[test]
    fn test_unit_conversions() {
        let mut v = vector("a1b2c3", Some(34.0), Some(-118.5));
        v.baro_altitude_m = Some(10668.0);
        v.velocity_ms = Some(250.0);
        v.vertical_rate_ms = Some(-5.0);

        let flights = build_snapshot(vec![v], ORIGIN, 200.0);
        let flight = &flights[0];

        assert_eq!(flight.altitude_ft, Some(35000));
        assert!((flight.ground_speed_kt.unwrap() - 485.96).abs() < 0.01);
        assert_eq!(flight.vertical_rate_ftmin, Some(-984));
    }

    #[test]
    fn test_geo_altitude_backfills_baro() {
        let mut v = vector("a1b2c3", Some(34.0), Some(-118.5));
        v.geo_altitude_m = Some(3048.0);

        let flights = build_snapshot(vec![v], ORIGIN, 200.0);
        assert_eq!(flights[0].altitude_ft, Some(10000));
    }

    #[test]
    fn test_operator_and_label() {
        let mut military = vector("ae1234", Some(34.0), Some(-118.5));
        military.callsign = Some("RCH285".to_string());
        let mut anonymous = vector("a1b2c3", Some(34.1), Some(-118.4));
        anonymous.callsign = None;

        let flights = build_snapshot(vec![military, anonymous], ORIGIN, 200.0);

        assert!(flights[0].is_military());
        assert_eq!(flights[0].label(), "RCH285");
        assert_eq!(flights[1].operator, Operator::Unknown);
        assert_eq!(flights[1].label(), "a1b2c3");
    }

    #[test]
    fn test_bearing_suppressed_overhead() {
        let overhead = vector("a1b2c3", Some(ORIGIN.latitude), Some(ORIGIN.longitude));
        let east = vector("d4e5f6", Some(ORIGIN.latitude), Some(-118.0));

        let flights = build_snapshot(vec![overhead, east], ORIGIN, 200.0);

        assert!(flights[0].bearing_degrees.is_none());
        let bearing = flights[1].bearing_degrees.unwrap();
        assert!((bearing - 90.0).abs() < 2.0);
    }
}
