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

//! Keyboard reader for the terminal session.
//!
//! Crossterm's event read is blocking, so it runs on a dedicated blocking
//! task and posts mapped keys into the application channel. The poll
//! timeout keeps the task responsive to cancellation.

use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use log::{debug, warn};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::events::{AppEvent, Key};

const POLL_TIMEOUT: Duration = Duration::from_millis(100);

/// Spawn the blocking keyboard reader task.
///
/// The task exits when the token is cancelled or the channel closes.
pub fn spawn_reader(events: mpsc::Sender<AppEvent>, cancel_token: CancellationToken) {
    tokio::task::spawn_blocking(move || {
        while !cancel_token.is_cancelled() {
            match event::poll(POLL_TIMEOUT) {
                Ok(true) => {}
                Ok(false) => continue,
                Err(e) => {
                    warn!("Terminal event poll failed: {e}");
                    break;
                }
            }

            let app_event = match event::read() {
                Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                    AppEvent::Key(map_key(key.code, key.modifiers))
                }
                Ok(Event::Resize(..)) => AppEvent::Redraw,
                Ok(_) => continue,
                Err(e) => {
                    warn!("Terminal event read failed: {e}");
                    break;
                }
            };

            if events.blocking_send(app_event).is_err() {
                debug!("Event channel closed, stopping keyboard reader");
                break;
            }
        }
    });
}

/// Map a crossterm keypress onto the application's key vocabulary.
fn map_key(code: KeyCode, modifiers: KeyModifiers) -> Key {
    if code == KeyCode::Char('c') && modifiers.contains(KeyModifiers::CONTROL) {
        return Key::Quit;
    }
    match code {
        KeyCode::Up => Key::Up,
        KeyCode::Down => Key::Down,
        KeyCode::Enter => Key::Enter,
        KeyCode::Char('f') => Key::Follow,
        KeyCode::Char('r') => Key::Refresh,
        KeyCode::Char('q') => Key::Quit,
        _ => Key::Other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bound_keys() {
        assert_eq!(map_key(KeyCode::Up, KeyModifiers::NONE), Key::Up);
        assert_eq!(map_key(KeyCode::Down, KeyModifiers::NONE), Key::Down);
        assert_eq!(map_key(KeyCode::Enter, KeyModifiers::NONE), Key::Enter);
        assert_eq!(map_key(KeyCode::Char('f'), KeyModifiers::NONE), Key::Follow);
        assert_eq!(
            map_key(KeyCode::Char('r'), KeyModifiers::NONE),
            Key::Refresh
        );
        assert_eq!(map_key(KeyCode::Char('q'), KeyModifiers::NONE), Key::Quit);
    }

    #[test]
    fn test_ctrl_c_quits() {
        assert_eq!(
            map_key(KeyCode::Char('c'), KeyModifiers::CONTROL),
            Key::Quit
        );
        // Plain 'c' carries no binding.
        assert_eq!(map_key(KeyCode::Char('c'), KeyModifiers::NONE), Key::Other);
    }

    #[test]
    fn test_unbound_keys_map_to_other() {
        assert_eq!(map_key(KeyCode::Char('x'), KeyModifiers::NONE), Key::Other);
        assert_eq!(map_key(KeyCode::Esc, KeyModifiers::NONE), Key::Other);
        assert_eq!(map_key(KeyCode::Tab, KeyModifiers::NONE), Key::Other);
        assert_eq!(map_key(KeyCode::Left, KeyModifiers::NONE), Key::Other);
    }
}
