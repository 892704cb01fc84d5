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

//! Timed stop sequences.
//!
//! An [`Itinerary`] is one trip of one truck: a start time, a list of stops
//! with the cumulative distance and arrival time at each, and the end time at
//! the final stop. It is built once by the scheduler and then only read; a
//! truck whose load changes gets a new itinerary.

use crate::path::ShortestPaths;
use courier_core::num::round::{DISTANCE_PRECISION, round_to_places};
use courier_model::{
    index::LocationIndex,
    time::{Seconds, travel_seconds},
};

/// One vertex of an itinerary.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stop {
    /// Distance driven from the itinerary's origin up to this stop.
    pub cumulative_distance: f64,
    pub location: LocationIndex,
    pub arrival_time: Seconds,
}

/// A scheduled visit to one destination within an itinerary.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Delivery {
    pub destination: LocationIndex,
    /// The end of the previous delivery (or the itinerary start).
    pub start: Seconds,
    /// The time the truck reaches `destination`.
    pub end: Seconds,
}

impl Delivery {
    #[inline]
    pub fn duration(&self) -> Seconds {
        self.end - self.start
    }
}

/// The timed route of one truck trip.
#[derive(Debug, Clone, PartialEq)]
pub struct Itinerary {
    start_time: Seconds,
    speed_mph: f64,
    stops: Vec<Stop>,
    last_delivery_location: LocationIndex,
}

impl Itinerary {
    /// Creates an itinerary that stands at `origin` from `start_time` on.
    pub fn new(origin: LocationIndex, start_time: Seconds, speed_mph: f64) -> Self {
        Self {
            start_time,
            speed_mph,
            stops: vec![Stop {
                cumulative_distance: 0.0,
                location: origin,
                arrival_time: start_time,
            }],
            last_delivery_location: origin,
        }
    }

    /// Appends the legs of `path` and returns the stops that were added.
    ///
    /// `path` must start at the current final stop and follow the shortest
    /// path tree of `paths`; leg lengths are taken as differences of the
    /// tree distances.
    ///
    /// # Panics
    ///
    /// In debug builds, panics if `path` does not start at the final stop or
    /// leaves the search tree.
    pub(crate) fn extend_along(&mut self, paths: &ShortestPaths, path: &[LocationIndex]) -> &[Stop] {
        debug_assert_eq!(
            path.first().copied(),
            Some(self.end_location()),
            "called `Itinerary::extend_along` with a path that does not start at the final stop"
        );

        let first_new = self.stops.len();
        for leg in path.windows(2) {
            let (from, to) = (leg[0], leg[1]);
            let (Some(d_from), Some(d_to)) = (paths.distance_to(from), paths.distance_to(to))
            else {
                debug_assert!(false, "called `Itinerary::extend_along` with a path outside the search tree");
                continue;
            };

            let cumulative = round_to_places(
                self.total_distance() + (d_to - d_from),
                DISTANCE_PRECISION,
            );
            self.stops.push(Stop {
                cumulative_distance: cumulative,
                location: to,
                arrival_time: self.start_time + travel_seconds(cumulative, self.speed_mph),
            });
        }
        &self.stops[first_new..]
    }

    #[inline]
    pub(crate) fn mark_last_delivery(&mut self, location: LocationIndex) {
        self.last_delivery_location = location;
    }

    #[inline]
    pub fn start_time(&self) -> Seconds {
        self.start_time
    }

    /// The arrival time at the final stop.
    #[inline]
    pub fn end_time(&self) -> Seconds {
        self.final_stop().arrival_time
    }

    /// The driving time of the whole trip.
    #[inline]
    pub fn duration(&self) -> Seconds {
        self.end_time() - self.start_time
    }

    #[inline]
    pub fn total_distance(&self) -> f64 {
        self.final_stop().cumulative_distance
    }

    #[inline]
    pub fn speed_mph(&self) -> f64 {
        self.speed_mph
    }

    #[inline]
    pub fn stops(&self) -> &[Stop] {
        &self.stops
    }

    #[inline]
    pub fn origin(&self) -> LocationIndex {
        self.stops[0].location
    }

    #[inline]
    pub fn end_location(&self) -> LocationIndex {
        self.final_stop().location
    }

    /// The destination of the last scheduled delivery, or the origin if the
    /// trip delivers nothing.
    #[inline]
    pub fn last_delivery_location(&self) -> LocationIndex {
        self.last_delivery_location
    }

    /// Returns the index of the last stop reached at `time`.
    ///
    /// Before the start this is the origin; after the end it is the final stop.
    pub fn stop_index_at(&self, time: Seconds) -> usize {
        self.stops
            .partition_point(|s| s.arrival_time <= time)
            .saturating_sub(1)
    }

    /// Returns the last stop reached at `time` and the stop after it, if any.
    pub fn position_at(&self, time: Seconds) -> (LocationIndex, Option<LocationIndex>) {
        let i = self.stop_index_at(time);
        (
            self.stops[i].location,
            self.stops.get(i + 1).map(|s| s.location),
        )
    }

    /// Returns how long the truck has been driving on this trip at `time`.
    #[inline]
    pub fn active_seconds_at(&self, time: Seconds) -> Seconds {
        (time - self.start_time).clamp(0.0, self.duration())
    }

    /// Returns `true` if the truck has reached the final stop at `time`.
    #[inline]
    pub fn is_finished_at(&self, time: Seconds) -> bool {
        time >= self.end_time()
    }

    #[inline]
    fn final_stop(&self) -> &Stop {
        // `new` seeds the origin stop and stops are never removed.
        &self.stops[self.stops.len() - 1]
    }
}
