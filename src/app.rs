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

//! Session state machine and event loop.
//!
//! All state mutation happens here, driven by one event channel. Input,
//! refresh ticks, and fetch results are producers; `handle()` folds each
//! event into the state and tells the loop what to launch next. Fetches
//! run on spawned tasks so the interface stays live while the feed is
//! slow.

use std::io;
use std::time::Duration;

use chrono::{DateTime, Utc};
use log::{debug, warn};
use opensky_client::{BoundingBox, Client, FetchError, StateBatch};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::events::{AppEvent, Key};
use crate::flight::build_snapshot;
use crate::geo::Location;
use crate::input;
use crate::ranking::{RankedView, ReconcileResult};
use crate::scheduler::RefreshScheduler;
use crate::ui::Tui;

/// What the session is doing right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Showing the ranked list, accepting every key.
    Idle,
    /// A fetch is in flight; only quit acts.
    Refreshing,
    /// Showing the detail panel; any key returns to the list.
    Detail,
    /// Quit requested, the loop is about to end.
    Terminated,
}

/// Side effect the event loop must launch after `handle()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Start a feed fetch for the session's bounding box.
    Fetch,
    /// Leave the event loop.
    Quit,
}

/// Resolved per-session settings, fixed after startup.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Point distances are measured from.
    pub origin: Location,
    /// Human-readable origin for the header.
    pub origin_label: String,
    /// Search radius in statute miles.
    pub radius_miles: f64,
    /// How many of the closest flights to keep.
    pub top_n: usize,
    /// Time between automatic refreshes.
    pub refresh_interval: Duration,
}

/// The application state.
#[derive(Debug)]
pub struct App {
    config: SessionConfig,
    client: Client,
    view: RankedView,
    mode: Mode,
    scheduler: RefreshScheduler,
    notice: Option<String>,
    last_refresh: Option<DateTime<Utc>>,
    in_range: usize,
}

impl App {
    #[must_use]
    pub fn new(config: SessionConfig, client: Client) -> Self {
        Self {
            config,
            client,
            view: RankedView::new(),
            mode: Mode::Idle,
            scheduler: RefreshScheduler::new(),
            notice: None,
            last_refresh: None,
            in_range: 0,
        }
    }

    /// Fold one event into the state. Pure apart from logging; the caller
    /// launches whatever command comes back.
    pub fn handle(&mut self, event: AppEvent) -> Option<Command> {
        match event {
            AppEvent::Key(Key::Quit) => {
                self.mode = Mode::Terminated;
                Some(Command::Quit)
            }
            AppEvent::Key(key) => self.handle_key(key),
            AppEvent::Tick => self.begin_refresh(),
            AppEvent::SnapshotReady(result) => {
                self.apply_snapshot(result);
                None
            }
            AppEvent::Redraw => None,
        }
    }

    fn handle_key(&mut self, key: Key) -> Option<Command> {
        match self.mode {
            Mode::Idle => match key {
                Key::Up => {
                    self.view.move_cursor(-1);
                    None
                }
                Key::Down => {
                    self.view.move_cursor(1);
                    None
                }
                Key::Enter => {
                    if self.view.selected().is_some() {
                        self.mode = Mode::Detail;
                    }
                    None
                }
                Key::Follow => {
                    self.toggle_follow();
                    None
                }
                Key::Refresh => self.begin_refresh(),
                Key::Quit | Key::Other => None,
            },
            // Mid-fetch the interface is read-only apart from quit.
            Mode::Refreshing => None,
            Mode::Detail => {
                self.mode = Mode::Idle;
                None
            }
            Mode::Terminated => None,
        }
    }

    fn begin_refresh(&mut self) -> Option<Command> {
        if self.mode != Mode::Idle {
            debug!("Refresh skipped in {:?}", self.mode);
            return None;
        }
        if !self.scheduler.try_begin() {
            debug!("Refresh already in flight, coalescing");
            return None;
        }
        self.mode = Mode::Refreshing;
        Some(Command::Fetch)
    }

    fn apply_snapshot(&mut self, result: Result<StateBatch, FetchError>) {
        self.scheduler.finish();
        if self.mode == Mode::Refreshing {
            self.mode = Mode::Idle;
        }

        match result {
            Ok(batch) => {
                // Capture the label before reconcile may drop the flight.
                let followed_label = self.view.followed().and_then(|id| {
                    self.view
                        .flights()
                        .iter()
                        .find(|f| f.icao24 == id)
                        .map(|f| f.label().to_string())
                });

                let flights =
                    build_snapshot(batch.vectors, self.config.origin, self.config.radius_miles);
                self.in_range = flights.len();
                let outcome = self.view.reconcile(flights, self.config.top_n);

                if outcome == ReconcileResult::FollowLost {
                    let label = followed_label.unwrap_or_else(|| "flight".to_string());
                    self.notice = Some(format!("Lost {label}, no longer in range"));
                }

                self.last_refresh = Some(batch.time);
                debug!(
                    "Refresh applied: {} in range, showing {}",
                    self.in_range,
                    self.view.len()
                );
            }
            Err(e) => {
                warn!("Refresh failed: {e}");
                self.notice = Some(format!("Refresh failed: {e}"));
            }
        }
    }

    fn toggle_follow(&mut self) {
        let Some((icao24, label)) = self
            .view
            .selected()
            .map(|f| (f.icao24.clone(), f.label().to_string()))
        else {
            return;
        };

        if self.view.followed() == Some(icao24.as_str()) {
            self.view.unfollow();
            self.notice = Some(format!("Stopped following {label}"));
        } else {
            self.view.follow();
            self.notice = Some(format!("Following {label}"));
        }
    }

    /// One-shot status line; consumed by the next draw.
    pub fn take_notice(&mut self) -> Option<String> {
        self.notice.take()
    }

    #[must_use]
    pub fn view(&self) -> &RankedView {
        &self.view
    }

    #[must_use]
    pub fn mode(&self) -> Mode {
        self.mode
    }

    #[must_use]
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    #[must_use]
    pub fn last_refresh(&self) -> Option<DateTime<Utc>> {
        self.last_refresh
    }

    /// Flights inside the radius on the last refresh, before top-N
    /// truncation.
    #[must_use]
    pub fn in_range(&self) -> usize {
        self.in_range
    }

    /// Run the session until quit.
    ///
    /// Wires up the keyboard reader and the refresh ticker, then drains
    /// the event channel, redrawing after every event. The ticker's
    /// immediate first tick populates the view at startup.
    pub async fn run(mut self, mut tui: Tui) -> io::Result<()> {
        let (event_tx, mut event_rx) = mpsc::channel(64);

        let input_cancel = CancellationToken::new();
        input::spawn_reader(event_tx.clone(), input_cancel.clone());
        let _input_guard = input_cancel.drop_guard();

        self.scheduler.start(self.config.refresh_interval, event_tx.clone());

        tui.draw(&self, None)?;

        while let Some(event) = event_rx.recv().await {
            match self.handle(event) {
                Some(Command::Quit) => break,
                Some(Command::Fetch) => self.spawn_fetch(&event_tx),
                None => {}
            }

            let notice = self.take_notice();
            tui.draw(&self, notice.as_deref())?;
        }

        self.scheduler.shutdown();
        tui.restore()?;
        Ok(())
    }

    fn spawn_fetch(&self, events: &mpsc::Sender<AppEvent>) {
        let client = self.client.clone();
        let bbox = BoundingBox::around(
            self.config.origin.latitude,
            self.config.origin.longitude,
            self.config.radius_miles,
        );
        let events = events.clone();

        tokio::spawn(async move {
            let result = client.states_in_box(bbox).await;
            if events.send(AppEvent::SnapshotReady(result)).await.is_err() {
                debug!("Event channel closed, dropping fetch result");
            }
        });
    }
}
