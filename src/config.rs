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

//! Application configuration management.
//!
//! Persistent settings are stored as TOML in the platform config
//! directory. Every field has a default, so a missing or partial file
//! always yields a working configuration; command line flags override
//! whatever is loaded here.

use log::warn;
use serde::{Deserialize, Serialize};

use crate::geo::Location;

/// Default search radius in statute miles.
pub const DEFAULT_RADIUS_MILES: f64 = 200.0;

/// Default number of flights kept in the ranked view.
pub const DEFAULT_TOP_N: usize = 10;

/// Default refresh period in seconds.
pub const DEFAULT_REFRESH_SECS: u64 = 10;

const APP_NAME: &str = "nearflights";
const CONFIG_NAME: &str = "config";

/// Application configuration stored in TOML format
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AppConfig {
    /// Address to track when none is given on the command line
    #[serde(default)]
    pub default_address: Option<String>,

    /// Search radius around the origin in statute miles
    #[serde(default = "default_radius_miles")]
    pub radius_miles: f64,

    /// How many of the closest flights to show
    #[serde(default = "default_top_n")]
    pub top_n: usize,

    /// Seconds between automatic refreshes
    #[serde(default = "default_refresh_secs")]
    pub refresh_secs: u64,

    /// Override origin latitude (skips geocoding when both are set)
    #[serde(default)]
    pub override_latitude: Option<f64>,

    /// Override origin longitude (skips geocoding when both are set)
    #[serde(default)]
    pub override_longitude: Option<f64>,

    /// Base URL of the state-vector feed API, without a trailing slash
    #[serde(default)]
    pub feed_url: Option<String>,
}

// Default value functions for serde
fn default_radius_miles() -> f64 {
    DEFAULT_RADIUS_MILES
}

fn default_top_n() -> usize {
    DEFAULT_TOP_N
}

fn default_refresh_secs() -> u64 {
    DEFAULT_REFRESH_SECS
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            default_address: None,
            radius_miles: DEFAULT_RADIUS_MILES,
            top_n: DEFAULT_TOP_N,
            refresh_secs: DEFAULT_REFRESH_SECS,
            override_latitude: None,
            override_longitude: None,
            feed_url: None,
        }
    }
}

impl AppConfig {
    /// Load configuration from disk.
    ///
    /// An unreadable or malformed file is logged and replaced by the
    /// defaults rather than aborting.
    #[must_use]
    pub fn load() -> Self {
        match confy::load(APP_NAME, CONFIG_NAME) {
            Ok(config) => config,
            Err(e) => {
                warn!("Could not load configuration, using defaults: {e}");
                Self::default()
            }
        }
    }

    /// Get the config file path for display to user
    pub fn config_path() -> Result<std::path::PathBuf, confy::ConfyError> {
        confy::get_configuration_file_path(APP_NAME, CONFIG_NAME)
    }

    /// Origin from the override coordinates, when both are present and
    /// in range.
    #[must_use]
    pub fn override_location(&self) -> Option<Location> {
        let (latitude, longitude) = match (self.override_latitude, self.override_longitude) {
            (Some(lat), Some(lon)) => (lat, lon),
            _ => return None,
        };

        if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
            warn!("Ignoring out-of-range override location: {latitude}, {longitude}");
            return None;
        }

        Some(Location {
            latitude,
            longitude,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.default_address, None);
        assert!((config.radius_miles - 200.0).abs() < f64::EPSILON);
        assert_eq!(config.top_n, 10);
        assert_eq!(config.refresh_secs, 10);
        assert!(config.override_location().is_none());
        assert_eq!(config.feed_url, None);
    }

    #[test]
    fn test_empty_document_deserializes_to_defaults() {
        let config: AppConfig = serde_json::from_str("{}").unwrap();
        assert!((config.radius_miles - 200.0).abs() < f64::EPSILON);
        assert_eq!(config.top_n, 10);
        assert_eq!(config.refresh_secs, 10);
    }

    #[test]
    fn test_partial_document_keeps_other_defaults() {
        let config: AppConfig =
            serde_json::from_str(r#"{"radius_miles": 50.0, "default_address": "Denver, CO"}"#)
                .unwrap();
        assert!((config.radius_miles - 50.0).abs() < f64::EPSILON);
        assert_eq!(config.default_address.as_deref(), Some("Denver, CO"));
        assert_eq!(config.top_n, 10);
    }

    #[test]
    fn test_override_location_requires_both_coordinates() {
        let mut config = AppConfig {
            override_latitude: Some(34.0),
            ..AppConfig::default()
        };
        assert!(config.override_location().is_none());

        config.override_longitude = Some(-118.4);
        let location = config.override_location().unwrap();
        assert!((location.latitude - 34.0).abs() < f64::EPSILON);
        assert!((location.longitude - -118.4).abs() < f64::EPSILON);
    }

    #[test]
    fn test_override_location_rejects_out_of_range() {
        let config = AppConfig {
            override_latitude: Some(120.0),
            override_longitude: Some(-118.4),
            ..AppConfig::default()
        };
        assert!(config.override_location().is_none());
    }
}
