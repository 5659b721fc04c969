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

//! Great-circle geometry on a spherical Earth approximation.

/// Earth's mean radius in statute miles.
const EARTH_RADIUS_MILES: f64 = 3958.8;

/// A fixed geographic point, degrees WGS84.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}

/// Great-circle distance between two points using the Haversine formula,
/// in statute miles.
#[must_use]
pub fn distance_miles(a: Location, b: Location) -> f64 {
    let lat1_rad = a.latitude.to_radians();
    let lat2_rad = b.latitude.to_radians();
    let delta_lat = (b.latitude - a.latitude).to_radians();
    let delta_lon = (b.longitude - a.longitude).to_radians();

    let h = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_MILES * c
}

/// Initial bearing from `from` toward `to`, degrees clockwise from north
/// in `[0, 360)`.
#[must_use]
pub fn bearing_degrees(from: Location, to: Location) -> f64 {
    let lat1 = from.latitude.to_radians();
    let lat2 = to.latitude.to_radians();
    let delta_lon = (to.longitude - from.longitude).to_radians();

    let y = delta_lon.sin() * lat2.cos();
    let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * delta_lon.cos();
    let mut bearing = y.atan2(x).to_degrees();
    if bearing < 0.0 {
        bearing += 360.0;
    }
    bearing
}

#[cfg(test)]
mod tests {
    use super::*;

    const LAX: Location = Location {
        latitude: 33.9425,
        longitude: -118.4081,
    };
    const JFK: Location = Location {
        latitude: 40.6413,
        longitude: -73.7781,
    };

    #[test]
    fn test_distance_lax_to_jfk() {
        // LAX to JFK is approximately 2,475 miles
        let distance = distance_miles(LAX, JFK);
        assert!((distance - 2475.0).abs() < 10.0);
    }

    #[test]
    fn test_distance_is_symmetric() {
        assert_eq!(distance_miles(LAX, JFK), distance_miles(JFK, LAX));
    }

    #[test]
    fn test_distance_to_self_is_zero() {
        assert_eq!(distance_miles(LAX, LAX), 0.0);
    }

    #[test]
    fn test_distance_grows_with_separation() {
        let near = Location {
            latitude: 34.0,
            longitude: -118.4081,
        };
        let far = Location {
            latitude: 36.0,
            longitude: -118.4081,
        };
        assert!(distance_miles(LAX, near) < distance_miles(LAX, far));
    }

    #[test]
    fn test_bearing_cardinal_directions() {
        let origin = Location {
            latitude: 0.0,
            longitude: 0.0,
        };
        let north = Location {
            latitude: 1.0,
            longitude: 0.0,
        };
        let east = Location {
            latitude: 0.0,
            longitude: 1.0,
        };
        let south = Location {
            latitude: -1.0,
            longitude: 0.0,
        };

        assert!((bearing_degrees(origin, north) - 0.0).abs() < 0.01);
        assert!((bearing_degrees(origin, east) - 90.0).abs() < 0.01);
        assert!((bearing_degrees(origin, south) - 180.0).abs() < 0.01);
    }

    #[test]
    fn test_bearing_stays_in_range() {
        let bearing = bearing_degrees(JFK, LAX);
        assert!((0.0..360.0).contains(&bearing));
        // Westbound, so somewhere in the western half.
        assert!(bearing > 180.0);
    }
}
