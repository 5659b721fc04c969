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

//! The ranked proximity view and its refresh reconciliation.
//!
//! Every poll replaces the flight list wholesale, but the user's place in
//! it survives: a followed aircraft keeps the selection pinned to its
//! identity as it moves through the ranking, and a plain cursor holds its
//! index as long as the list allows.

use crate::flight::Flight;

/// How a reconcile pass affected the selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileResult {
    /// No follow active; cursor kept (clamped if the list shrank).
    Refreshed,
    /// The followed aircraft is still in range; cursor moved with it.
    FollowedMoved,
    /// The followed aircraft vanished; follow cleared, cursor reset.
    FollowLost,
}

/// Ordered list of the closest flights plus selection state.
#[derive(Debug, Default)]
pub struct RankedView {
    flights: Vec<Flight>,
    cursor: usize,
    followed: Option<String>,
}

impl RankedView {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold a fresh snapshot into the view.
    ///
    /// Sorts by distance ascending with the ICAO24 address as a
    /// deterministic tie-break, keeps the closest `top_n`, then restores
    /// the selection per the follow rules. Deterministic for identical
    /// input, O(n log n) in the snapshot size.
    pub fn reconcile(&mut self, mut incoming: Vec<Flight>, top_n: usize) -> ReconcileResult {
        incoming.sort_by(|a, b| {
            a.distance_miles
                .total_cmp(&b.distance_miles)
                .then_with(|| a.icao24.cmp(&b.icao24))
        });
        incoming.truncate(top_n);

        let result = if let Some(id) = self.followed.as_deref() {
            match incoming.iter().position(|f| f.icao24 == id) {
                Some(index) => {
                    self.cursor = index;
                    ReconcileResult::FollowedMoved
                }
                None => {
                    self.followed = None;
                    self.cursor = 0;
                    ReconcileResult::FollowLost
                }
            }
        } else {
            self.cursor = self.cursor.min(incoming.len().saturating_sub(1));
            ReconcileResult::Refreshed
        };

        self.flights = incoming;
        result
    }

    /// Move the cursor by `delta`, clamped to the list. No-op when empty.
    pub fn move_cursor(&mut self, delta: isize) {
        if self.flights.is_empty() {
            return;
        }
        let last = self.flights.len() as isize - 1;
        self.cursor = (self.cursor as isize + delta).clamp(0, last) as usize;
    }

    /// Start following the flight under the cursor.
    pub fn follow(&mut self) {
        if let Some(flight) = self.flights.get(self.cursor) {
            self.followed = Some(flight.icao24.clone());
        }
    }

    /// Stop following without moving the cursor.
    pub fn unfollow(&mut self) {
        self.followed = None;
    }

    /// The flight under the cursor, if any.
    #[must_use]
    pub fn selected(&self) -> Option<&Flight> {
        self.flights.get(self.cursor)
    }

    #[must_use]
    pub fn flights(&self) -> &[Flight] {
        &self.flights
    }

    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Identifier of the followed flight, if following.
    #[must_use]
    pub fn followed(&self) -> Option<&str> {
        self.followed.as_deref()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.flights.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.flights.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::airlines::Operator;
    use crate::geo::Location;

    fn flight(icao24: &str, distance_miles: f64) -> Flight {
        Flight {
            icao24: icao24.to_string(),
            callsign: Some(format!("TST{icao24}")),
            origin_country: "United States".to_string(),
            operator: Operator::Unknown,
            position: Location {
                latitude: 34.0,
                longitude: -118.4,
            },
            distance_miles,
            bearing_degrees: Some(45.0),
            altitude_ft: Some(35000),
            ground_speed_kt: Some(450.0),
            track_degrees: Some(270.0),
            vertical_rate_ftmin: None,
            on_ground: false,
            squawk: None,
            last_contact: None,
        }
    }

    fn ids(view: &RankedView) -> Vec<String> {
        view.flights().iter().map(|f| f.icao24.clone()).collect()
    }

    #[test]
    fn test_reconcile_sorts_and_truncates() {
        let mut view = RankedView::new();
        let result = view.reconcile(
            vec![flight("a", 5.0), flight("b", 2.0), flight("c", 9.0)],
            2,
        );

        assert_eq!(result, ReconcileResult::Refreshed);
        assert_eq!(ids(&view), vec!["b", "a"]);
        assert_eq!(view.cursor(), 0);
    }

    #[test]
    fn test_equal_distances_break_ties_by_identifier() {
        let mut view = RankedView::new();
        view.reconcile(
            vec![flight("c", 3.0), flight("a", 3.0), flight("b", 3.0)],
            5,
        );
        assert_eq!(ids(&view), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_top_n_larger_than_snapshot_keeps_everything() {
        let mut view = RankedView::new();
        view.reconcile(vec![flight("a", 5.0), flight("b", 2.0)], 10);
        assert_eq!(view.len(), 2);
    }

    #[test]
    fn test_reconcile_is_idempotent() {
        let make = || vec![flight("a", 5.0), flight("b", 2.0), flight("c", 9.0)];
        let mut view = RankedView::new();
        view.reconcile(make(), 3);
        view.move_cursor(1);
        view.follow();

        view.reconcile(make(), 3);
        let first = (ids(&view), view.cursor(), view.followed().map(String::from));
        view.reconcile(make(), 3);
        let second = (ids(&view), view.cursor(), view.followed().map(String::from));

        assert_eq!(first, second);
    }

    #[test]
    fn test_cursor_moves_and_clamps() {
        let mut view = RankedView::new();
        view.reconcile(vec![flight("a", 5.0), flight("b", 2.0)], 5);

        view.move_cursor(1);
        assert_eq!(view.cursor(), 1);
        assert_eq!(view.selected().unwrap().icao24, "a");

        view.move_cursor(1);
        assert_eq!(view.cursor(), 1);

        view.move_cursor(-5);
        assert_eq!(view.cursor(), 0);
    }

    #[test]
    fn test_cursor_noop_when_empty() {
        let mut view = RankedView::new();
        view.move_cursor(1);
        assert_eq!(view.cursor(), 0);
        assert!(view.selected().is_none());
    }

    #[test]
    fn test_cursor_clamps_when_list_shrinks() {
        let mut view = RankedView::new();
        view.reconcile(
            vec![flight("a", 1.0), flight("b", 2.0), flight("c", 3.0)],
            5,
        );
        view.move_cursor(2);
        assert_eq!(view.cursor(), 2);

        let result = view.reconcile(vec![flight("a", 1.0), flight("b", 2.0)], 5);
        assert_eq!(result, ReconcileResult::Refreshed);
        assert_eq!(view.cursor(), 1);
    }

    #[test]
    fn test_follow_tracks_identifier_across_reorder() {
        let mut view = RankedView::new();
        view.reconcile(vec![flight("a", 5.0), flight("b", 2.0)], 5);
        view.move_cursor(1);
        view.follow();
        assert_eq!(view.followed(), Some("a"));

        // "a" closes in and jumps to the front.
        let result = view.reconcile(vec![flight("a", 1.0), flight("c", 3.0)], 5);

        assert_eq!(result, ReconcileResult::FollowedMoved);
        assert_eq!(view.cursor(), 0);
        assert_eq!(view.selected().unwrap().icao24, "a");
        assert_eq!(view.followed(), Some("a"));
    }

    #[test]
    fn test_follow_lost_when_aircraft_leaves() {
        let mut view = RankedView::new();
        view.reconcile(vec![flight("a", 5.0), flight("b", 2.0)], 5);
        view.move_cursor(1);
        view.follow();

        let result = view.reconcile(vec![flight("c", 3.0)], 5);

        assert_eq!(result, ReconcileResult::FollowLost);
        assert_eq!(view.followed(), None);
        assert_eq!(view.cursor(), 0);

        // The loss is a one-shot transition; the next refresh is plain.
        let result = view.reconcile(vec![flight("c", 3.0)], 5);
        assert_eq!(result, ReconcileResult::Refreshed);
    }

    #[test]
    fn test_follow_lost_into_empty_snapshot() {
        let mut view = RankedView::new();
        view.reconcile(vec![flight("a", 5.0)], 5);
        view.follow();

        let result = view.reconcile(Vec::new(), 5);

        assert_eq!(result, ReconcileResult::FollowLost);
        assert!(view.is_empty());
        assert!(view.selected().is_none());
        assert_eq!(view.cursor(), 0);
    }

    #[test]
    fn test_follow_lost_at_truncation_boundary() {
        let mut view = RankedView::new();
        view.reconcile(vec![flight("a", 1.0), flight("b", 2.0)], 2);
        view.move_cursor(1);
        view.follow();
        assert_eq!(view.followed(), Some("b"));

        // "b" drifts out of the top two; it is gone from the view even
        // though the feed still sees it.
        let result = view.reconcile(
            vec![flight("a", 1.0), flight("c", 1.5), flight("b", 9.0)],
            2,
        );

        assert_eq!(result, ReconcileResult::FollowLost);
        assert_eq!(ids(&view), vec!["a", "c"]);
    }

    #[test]
    fn test_unfollow_keeps_cursor() {
        let mut view = RankedView::new();
        view.reconcile(vec![flight("a", 1.0), flight("b", 2.0)], 5);
        view.move_cursor(1);
        view.follow();
        view.unfollow();

        assert_eq!(view.followed(), None);
        assert_eq!(view.cursor(), 1);
    }

    #[test]
    fn test_follow_on_empty_view_is_noop() {
        let mut view = RankedView::new();
        view.follow();
        assert_eq!(view.followed(), None);
    }
}
