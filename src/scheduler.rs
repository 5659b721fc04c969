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

//! Periodic refresh ticks and the single-fetch gate.
//!
//! A background task emits [`AppEvent::Tick`] at a fixed cadence; the gate
//! guarantees at most one fetch is in flight at a time, so a tick (or a
//! manual refresh) that lands mid-fetch is dropped rather than queued.

use std::time::Duration;

use log::debug;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::events::AppEvent;

/// Drives scheduled refreshes for the application loop.
///
/// The ticker runs in a background task and is cancelled on `shutdown()`
/// or drop. The in-flight gate is owned by the event loop and is not
/// shared across threads.
#[derive(Debug)]
pub struct RefreshScheduler {
    in_flight: bool,
    cancel_token: CancellationToken,
}

impl RefreshScheduler {
    #[must_use]
    pub fn new() -> Self {
        Self {
            in_flight: false,
            cancel_token: CancellationToken::new(),
        }
    }

    /// Spawn the ticker task.
    ///
    /// The first tick fires immediately so the view populates at startup;
    /// later ticks follow every `period`. Ticks that cannot be delivered
    /// because the receiver is gone end the task.
    pub fn start(&self, period: Duration, events: mpsc::Sender<AppEvent>) {
        let task_cancel = self.cancel_token.clone();
        tokio::spawn(async move {
            ticker_loop(period, events, task_cancel).await;
        });
    }

    /// Claim the fetch slot. Returns `false` if a fetch is already
    /// running, in which case this cycle must be skipped.
    pub fn try_begin(&mut self) -> bool {
        if self.in_flight {
            return false;
        }
        self.in_flight = true;
        true
    }

    /// Release the fetch slot once a result (or failure) has arrived.
    pub fn finish(&mut self) {
        self.in_flight = false;
    }

    #[must_use]
    pub fn is_refreshing(&self) -> bool {
        self.in_flight
    }

    /// Stop the ticker task.
    pub fn shutdown(&self) {
        self.cancel_token.cancel();
    }
}

impl Default for RefreshScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for RefreshScheduler {
    fn drop(&mut self) {
        self.cancel_token.cancel();
    }
}

async fn ticker_loop(
    period: Duration,
    events: mpsc::Sender<AppEvent>,
    cancel_token: CancellationToken,
) {
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            () = cancel_token.cancelled() => {
                debug!("Refresh ticker cancelled");
                break;
            }
            _ = ticker.tick() => {
                if events.send(AppEvent::Tick).await.is_err() {
                    debug!("Event channel closed, stopping refresh ticker");
                    break;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gate_admits_one_fetch_at_a_time() {
        let mut scheduler = RefreshScheduler::new();
        assert!(!scheduler.is_refreshing());

        assert!(scheduler.try_begin());
        assert!(scheduler.is_refreshing());
        assert!(!scheduler.try_begin());
        assert!(!scheduler.try_begin());

        scheduler.finish();
        assert!(!scheduler.is_refreshing());
        assert!(scheduler.try_begin());
    }

    #[tokio::test]
    async fn test_ticker_fires_immediately() {
        let scheduler = RefreshScheduler::new();
        let (tx, mut rx) = mpsc::channel(8);
        scheduler.start(Duration::from_secs(60), tx);

        let event = tokio::time::timeout(Duration::from_secs(1), rx.recv())
            .await
            .unwrap();
        assert!(matches!(event, Some(AppEvent::Tick)));
    }

    #[tokio::test]
    async fn test_shutdown_stops_ticker() {
        let scheduler = RefreshScheduler::new();
        let (tx, mut rx) = mpsc::channel(8);
        scheduler.start(Duration::from_millis(10), tx);

        // Consume the immediate tick, then cancel.
        let _ = tokio::time::timeout(Duration::from_secs(1), rx.recv())
            .await
            .unwrap();
        scheduler.shutdown();

        // The task drops its sender on cancel, closing the channel.
        let closed = tokio::time::timeout(Duration::from_secs(1), async {
            while rx.recv().await.is_some() {}
        })
        .await;
        assert!(closed.is_ok());
    }

    #[tokio::test]
    async fn test_drop_stops_ticker() {
        let (tx, mut rx) = mpsc::channel(8);
        {
            let scheduler = RefreshScheduler::new();
            scheduler.start(Duration::from_millis(10), tx);
            let _ = tokio::time::timeout(Duration::from_secs(1), rx.recv())
                .await
                .unwrap();
        }

        let closed = tokio::time::timeout(Duration::from_secs(1), async {
            while rx.recv().await.is_some() {}
        })
        .await;
        assert!(closed.is_ok());
    }
}
