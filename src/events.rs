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

//! Events flowing into the application loop.
//!
//! Keyboard input, refresh ticks, and completed fetches all arrive on one
//! channel so the state machine mutates from a single place.

use opensky_client::{FetchError, StateBatch};

/// A keypress, already mapped from the terminal event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Up,
    Down,
    Enter,
    Follow,
    Refresh,
    Quit,
    /// Any key without a binding. Still delivered so the detail view can
    /// dismiss on it.
    Other,
}

/// Everything the application loop reacts to.
#[derive(Debug)]
pub enum AppEvent {
    Key(Key),
    /// Scheduled refresh is due.
    Tick,
    /// A fetch finished, successfully or not.
    SnapshotReady(Result<StateBatch, FetchError>),
    /// Terminal resized; redraw without state changes.
    Redraw,
}
