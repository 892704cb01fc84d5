// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! The scheduled event timeline.
//!
//! Two kinds of one-shot events change the hub's data during a run: late
//! shipments reaching the depot and address corrections. Both are plain data
//! consumed by the driver. Events are ordered by time, then by kind (arrivals
//! before corrections at the same instant), then by the order they were
//! scheduled in.

use courier_model::{
    index::LocationIndex,
    instruction::PackageId,
    time::{Seconds, format_clock},
};
use std::cmp::Ordering;

/// What happens when a scheduled event fires.
#[derive(Debug, Clone, PartialEq)]
pub enum EventKind {
    /// Every delayed shipment due by the event time reaches the hub.
    LateArrival,
    /// A package awaiting a correction is redirected.
    Correction {
        package_id: PackageId,
        destination: LocationIndex,
        zip: String,
    },
}

impl EventKind {
    /// Rank among events at the same time; lower fires first.
    #[inline]
    pub fn priority(&self) -> u8 {
        match self {
            Self::LateArrival => 0,
            Self::Correction { .. } => 1,
        }
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::LateArrival => write!(f, "LateArrival"),
            Self::Correction { package_id, .. } => write!(f, "Correction({})", package_id),
        }
    }
}

/// An event on the timeline.
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduledEvent {
    pub at: Seconds,
    pub sequence: u64,
    pub kind: EventKind,
}

impl ScheduledEvent {
    /// Compares two events in firing order.
    #[inline]
    pub fn firing_order(&self, other: &Self) -> Ordering {
        self.at
            .total_cmp(&other.at)
            .then(self.kind.priority().cmp(&other.kind.priority()))
            .then(self.sequence.cmp(&other.sequence))
    }
}

impl std::fmt::Display for ScheduledEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} at {}", self.kind, format_clock(self.at))
    }
}

/// Scheduled events in firing order, with a cursor past the fired ones.
#[derive(Debug, Clone, Default)]
pub struct EventTimeline {
    events: Vec<ScheduledEvent>,
    fired: usize,
    next_sequence: u64,
}

impl EventTimeline {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an event and keeps the timeline in firing order.
    ///
    /// # Panics
    ///
    /// In debug builds, panics if the event would fire before an event that
    /// already fired.
    pub fn schedule(&mut self, at: Seconds, kind: EventKind) {
        let event = ScheduledEvent {
            at,
            sequence: self.next_sequence,
            kind,
        };
        self.next_sequence += 1;

        let position = self
            .events
            .partition_point(|e| e.firing_order(&event) != Ordering::Greater);
        debug_assert!(
            position >= self.fired,
            "called `EventTimeline::schedule` with an event before the last fired one: {}",
            event
        );
        self.events.insert(position, event);
    }

    /// Returns the next event due by `now` and marks it fired.
    #[inline]
    pub fn next_due(&mut self, now: Seconds) -> Option<ScheduledEvent> {
        let event = self.events.get(self.fired).filter(|e| e.at <= now)?.clone();
        self.fired += 1;
        Some(event)
    }

    /// The events that have not fired yet.
    #[inline]
    pub fn pending(&self) -> &[ScheduledEvent] {
        &self.events[self.fired..]
    }

    /// Every event, fired or not, in firing order.
    #[inline]
    pub fn events(&self) -> &[ScheduledEvent] {
        &self.events
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
