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

//! Operator classification from callsign prefixes.
//!
//! Callsigns carry a three-letter ICAO operator prefix ("UAL123"), and a
//! handful of military services use their own tactical prefixes instead.
//! The tables here are a closed best-effort set; anything unmatched is
//! explicitly [`Operator::Unknown`] rather than a guess.

/// Civil operators by ICAO callsign prefix.
const AIRLINE_PREFIXES: &[(&str, &str)] = &[
    ("AAL", "American Airlines"),
    ("ACA", "Air Canada"),
    ("AFR", "Air France"),
    ("ASA", "Alaska Airlines"),
    ("BAW", "British Airways"),
    ("DAL", "Delta Air Lines"),
    ("DLH", "Lufthansa"),
    ("FDX", "FedEx Express"),
    ("FFT", "Frontier Airlines"),
    ("JBU", "JetBlue Airways"),
    ("KLM", "KLM Royal Dutch Airlines"),
    ("NKS", "Spirit Airlines"),
    ("QFA", "Qantas"),
    ("SKW", "SkyWest Airlines"),
    ("SWA", "Southwest Airlines"),
    ("UAE", "Emirates"),
    ("UAL", "United Airlines"),
    ("UPS", "UPS Airlines"),
];

/// Military services by tactical callsign prefix.
const MILITARY_PREFIXES: &[(&str, &str)] = &[
    ("RCH", "Military - Air Force"),
    ("SAM", "Military - Special Air Mission"),
    ("NAVY", "Military - Navy"),
    ("ARMY", "Military - Army"),
];

/// Who operates a flight, as far as the callsign reveals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    /// Matched a civil operator prefix.
    Airline(&'static str),
    /// Matched a military prefix.
    Military(&'static str),
    /// No match; the callsign stays the only identity shown.
    Unknown,
}

impl Operator {
    /// Classify a callsign by its prefix.
    #[must_use]
    pub fn classify(callsign: &str) -> Self {
        let callsign = callsign.trim();
        if callsign.is_empty() {
            return Self::Unknown;
        }

        for (prefix, service) in MILITARY_PREFIXES {
            if callsign.starts_with(prefix) {
                return Self::Military(service);
            }
        }
        // Bare "AF" plus a flight number is Air Force; "AFR..." and friends
        // are civil prefixes and must not match.
        if let Some(rest) = callsign.strip_prefix("AF") {
            if rest.starts_with(|c: char| c.is_ascii_digit()) {
                return Self::Military("Military - Air Force");
            }
        }

        for (prefix, name) in AIRLINE_PREFIXES {
            if callsign.starts_with(prefix) {
                return Self::Airline(name);
            }
        }

        Self::Unknown
    }

    /// Whether this is a military operator.
    #[must_use]
    pub fn is_military(self) -> bool {
        matches!(self, Self::Military(_))
    }

    /// Display name, or `None` for unknown operators.
    #[must_use]
    pub fn name(self) -> Option<&'static str> {
        match self {
            Self::Airline(name) | Self::Military(name) => Some(name),
            Self::Unknown => None,
        }
    }
}
