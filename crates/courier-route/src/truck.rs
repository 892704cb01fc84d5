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

//! Trucks and the itinerary scheduler.
//!
//! A [`Truck`] carries up to `capacity` packages. Whenever its package set
//! changes, [`Truck::schedule`] rebuilds its itinerary from the truck's
//! current location:
//!
//! 1. Every carried package's arrival time is reset to end of day.
//! 2. While packages remain, the remaining packages are stably sorted by
//!    deadline and then by shortest-path distance from the current tentative
//!    location, and the first one is taken.
//! 3. If its destination has not been visited yet, the shortest path there
//!    is appended and a [`Delivery`] is recorded. Any other pending
//!    destination the path passes through counts as visited at the time it
//!    is passed.
//! 4. If the destination was already visited, the package inherits that
//!    delivery's end time.
//! 5. Finally the path back to the hub is appended.
//!
//! Packages held in the reserve count against capacity but are left out of
//! the itinerary until they are restored.

use crate::{
    itinerary::{Delivery, Itinerary},
    path::{PathFinder, RoutingError, ShortestPaths},
};
use courier_core::num::round::{DISTANCE_PRECISION, round_to_places};
use courier_model::{
    index::{LocationIndex, PackageIndex, TruckIndex},
    package::Manifest,
    time::{END_OF_DAY, Seconds, format_clock, miles_driven},
};
use rustc_hash::{FxHashMap, FxHashSet};
use smallvec::SmallVec;
use tracing::{debug, info};

/// A delivery vehicle.
#[derive(Debug, Clone)]
pub struct Truck {
    index: TruckIndex,
    capacity: usize,
    speed_mph: f64,
    hub: LocationIndex,
    location: LocationIndex,
    next_location: Option<LocationIndex>,
    packages: Vec<PackageIndex>,
    reserve: Vec<PackageIndex>,
    delivered: Vec<PackageIndex>,
    itinerary: Itinerary,
    deliveries: FxHashMap<LocationIndex, Delivery>,
    banked_active_seconds: Seconds,
    rebuilds: u64,
}

impl Truck {
    /// Creates an empty truck parked at `hub` from `start_time` on.
    pub fn new(
        index: TruckIndex,
        capacity: usize,
        speed_mph: f64,
        hub: LocationIndex,
        start_time: Seconds,
    ) -> Self {
        Self {
            index,
            capacity,
            speed_mph,
            hub,
            location: hub,
            next_location: None,
            packages: Vec::with_capacity(capacity),
            reserve: Vec::new(),
            delivered: Vec::new(),
            itinerary: Itinerary::new(hub, start_time, speed_mph),
            deliveries: FxHashMap::default(),
            banked_active_seconds: 0.0,
            rebuilds: 0,
        }
    }

    #[inline]
    pub fn index(&self) -> TruckIndex {
        self.index
    }

    /// The 1-based number users refer to this truck by.
    #[inline]
    pub fn number(&self) -> usize {
        self.index.get() + 1
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline]
    pub fn hub(&self) -> LocationIndex {
        self.hub
    }

    /// The last itinerary stop the truck has reached.
    #[inline]
    pub fn location(&self) -> LocationIndex {
        self.location
    }

    /// The itinerary stop the truck is heading to, if it is under way.
    #[inline]
    pub fn next_location(&self) -> Option<LocationIndex> {
        self.next_location
    }

    /// The packages on the current itinerary, not yet delivered.
    #[inline]
    pub fn packages(&self) -> &[PackageIndex] {
        &self.packages
    }

    /// Packages kept on board but left out of the current itinerary.
    #[inline]
    pub fn reserve(&self) -> &[PackageIndex] {
        &self.reserve
    }

    /// Every package this truck delivered, in delivery order.
    #[inline]
    pub fn delivered(&self) -> &[PackageIndex] {
        &self.delivered
    }

    #[inline]
    pub fn itinerary(&self) -> &Itinerary {
        &self.itinerary
    }

    /// The scheduled delivery for `destination` on the current itinerary.
    #[inline]
    pub fn delivery(&self, destination: LocationIndex) -> Option<&Delivery> {
        self.deliveries.get(&destination)
    }

    /// The scheduled deliveries on the current itinerary, earliest first.
    pub fn deliveries(&self) -> Vec<Delivery> {
        let mut all: Vec<Delivery> = self.deliveries.values().copied().collect();
        all.sort_by(|a, b| a.end.total_cmp(&b.end).then(a.destination.cmp(&b.destination)));
        all
    }

    /// The number of packages on board, reserve included.
    #[inline]
    pub fn load(&self) -> usize {
        self.packages.len() + self.reserve.len()
    }

    #[inline]
    pub fn remaining_capacity(&self) -> usize {
        self.capacity.saturating_sub(self.load())
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.load() == 0
    }

    /// Returns `true` if the truck stands at the hub at `now`: either its trip
    /// is over or it has not departed yet.
    #[inline]
    pub fn is_at_hub(&self, now: Seconds) -> bool {
        self.location == self.hub
            && (self.itinerary.is_finished_at(now) || self.itinerary.start_time() >= now)
    }

    /// The number of itinerary rebuilds so far.
    #[inline]
    pub fn rebuilds(&self) -> u64 {
        self.rebuilds
    }

    /// Total driving time up to `now` over all itineraries.
    #[inline]
    pub fn active_seconds_at(&self, now: Seconds) -> Seconds {
        self.banked_active_seconds + self.itinerary.active_seconds_at(now)
    }

    /// Total distance driven up to `now`.
    #[inline]
    pub fn miles_at(&self, now: Seconds) -> f64 {
        miles_driven(self.active_seconds_at(now), self.speed_mph)
    }

    /// Puts a package on board. The itinerary is stale until the next
    /// [`Truck::schedule`].
    ///
    /// # Panics
    ///
    /// In debug builds, panics if the truck is full or already carries the
    /// package.
    #[inline]
    pub fn load_package(&mut self, package: PackageIndex) {
        debug_assert!(
            self.remaining_capacity() > 0,
            "called `Truck::load_package` on a full truck: the capacity is {}",
            self.capacity
        );
        debug_assert!(
            !self.packages.contains(&package) && !self.reserve.contains(&package),
            "called `Truck::load_package` with {} which is already on board",
            package
        );

        self.packages.push(package);
    }

    /// Keeps a package on board outside the itinerary. Holding a package that
    /// is already in the reserve does nothing.
    #[inline]
    pub fn hold_in_reserve(&mut self, package: PackageIndex) {
        debug_assert!(
            !self.packages.contains(&package),
            "called `Truck::hold_in_reserve` with {} which is still on the itinerary",
            package
        );

        if !self.reserve.contains(&package) {
            self.reserve.push(package);
        }
    }

    /// Moves every reserved package back onto the itinerary. Returns how many
    /// were restored.
    pub fn restore_reserve(&mut self) -> usize {
        let restored = self.reserve.len();
        self.packages.append(&mut self.reserve);
        restored
    }

    /// Removes and returns every undelivered package on the itinerary.
    #[inline]
    pub fn take_undelivered(&mut self) -> Vec<PackageIndex> {
        std::mem::take(&mut self.packages)
    }

    /// Moves the truck along its itinerary to `now` and returns the packages
    /// whose scheduled arrival has been reached, in carried order.
    ///
    /// The returned packages are no longer carried; recording their delivery
    /// status is up to the caller.
    pub fn advance(&mut self, now: Seconds, manifest: &Manifest) -> SmallVec<[PackageIndex; 8]> {
        let (location, next) = self.itinerary.position_at(now);
        self.location = location;
        self.next_location = next;

        let mut due = SmallVec::new();
        self.packages.retain(|&p| {
            let is_due = manifest.package(p).arrival_time() <= now;
            if is_due {
                due.push(p);
            }
            !is_due
        });

        for &p in &due {
            let package = manifest.package(p);
            info!(
                truck = self.number(),
                package = package.id(),
                at = %format_clock(package.arrival_time()),
                "delivered"
            );
        }
        self.delivered.extend_from_slice(&due);
        due
    }

    /// Rebuilds the itinerary from the truck's current location, departing
    /// at `start_time`, and writes the scheduled arrival time of every
    /// carried package into `manifest`. Reserved packages get end of day.
    ///
    /// # Errors
    ///
    /// Returns [`RoutingError::Unreachable`] if a destination or the hub
    /// cannot be reached. The truck keeps its previous itinerary in that case.
    pub fn schedule(
        &mut self,
        finder: &PathFinder<'_>,
        manifest: &mut Manifest,
        start_time: Seconds,
    ) -> Result<(), RoutingError> {
        let driven = self.itinerary.active_seconds_at(start_time);
        self.rebuild(finder, manifest, self.location, start_time, driven)
    }

    /// Abandons the current trip at `now` and rebuilds the itinerary toward
    /// the hub.
    ///
    /// A truck caught between two stops either turns around to the stop it
    /// just left or drives on to the next one, whichever brings it back to
    /// the hub over the shorter distance; ties turn around. The new
    /// itinerary starts at that stop once the truck gets there, and all
    /// driving up to that point stays on the odometer.
    ///
    /// # Errors
    ///
    /// Returns [`RoutingError::Unreachable`] if the hub cannot be reached.
    /// The truck keeps its previous itinerary in that case.
    pub fn turn_back(
        &mut self,
        finder: &PathFinder<'_>,
        manifest: &mut Manifest,
        now: Seconds,
    ) -> Result<(), RoutingError> {
        let i = self.itinerary.stop_index_at(now);
        let stops = self.itinerary.stops();
        let left = stops[i];
        let Some(next) = stops.get(i + 1).copied().filter(|_| now > left.arrival_time) else {
            return self.schedule(finder, manifest, now);
        };

        let elapsed = now - left.arrival_time;
        let covered = miles_driven(elapsed, self.speed_mph);
        let leg = next.cumulative_distance - left.cumulative_distance;
        let back = round_to_places(
            covered + finder.distance(left.location, self.hub)?,
            DISTANCE_PRECISION,
        );
        let on = round_to_places(
            (leg - covered).max(0.0) + finder.distance(next.location, self.hub)?,
            DISTANCE_PRECISION,
        );

        if on < back {
            let driven = self.itinerary.active_seconds_at(next.arrival_time);
            self.rebuild(finder, manifest, next.location, next.arrival_time, driven)
        } else {
            let driven = self.itinerary.active_seconds_at(now) + elapsed;
            self.rebuild(finder, manifest, left.location, now + elapsed, driven)
        }
    }

    /// Replaces the itinerary with one leaving `origin` at `start_time`,
    /// banking `driven` seconds of the old one.
    fn rebuild(
        &mut self,
        finder: &PathFinder<'_>,
        manifest: &mut Manifest,
        origin: LocationIndex,
        start_time: Seconds,
        driven: Seconds,
    ) -> Result<(), RoutingError> {
        for &p in self.packages.iter().chain(&self.reserve) {
            manifest.set_arrival_time(p, END_OF_DAY);
        }

        let mut itinerary = Itinerary::new(origin, start_time, self.speed_mph);
        let mut deliveries: FxHashMap<LocationIndex, Delivery> = FxHashMap::default();
        let mut remaining = self.packages.clone();
        let mut current = origin;
        let mut previous_end = start_time;

        while !remaining.is_empty() {
            let paths = finder.from_source(current);
            remaining.sort_by(|&a, &b| {
                let (pa, pb) = (manifest.package(a), manifest.package(b));
                pa.deadline().total_cmp(&pb.deadline()).then_with(|| {
                    reach(&paths, pa.destination()).total_cmp(&reach(&paths, pb.destination()))
                })
            });
            let next = remaining.remove(0);
            let destination = manifest.package(next).destination();

            let end = match deliveries.get(&destination) {
                Some(delivery) => delivery.end,
                None => {
                    let route = paths.route_to(destination)?;
                    let pending: FxHashSet<LocationIndex> = remaining
                        .iter()
                        .map(|&p| manifest.package(p).destination())
                        .collect();

                    for stop in itinerary.extend_along(&paths, route.path()) {
                        if stop.location != destination && pending.contains(&stop.location) {
                            deliveries.entry(stop.location).or_insert(Delivery {
                                destination: stop.location,
                                start: previous_end,
                                end: stop.arrival_time,
                            });
                        }
                    }

                    let end = itinerary.end_time();
                    deliveries.insert(
                        destination,
                        Delivery {
                            destination,
                            start: previous_end,
                            end,
                        },
                    );
                    itinerary.mark_last_delivery(destination);
                    current = destination;
                    previous_end = end;
                    end
                }
            };
            manifest.set_arrival_time(next, end);
        }

        if current != self.hub {
            let paths = finder.from_source(current);
            let route = paths.route_to(self.hub)?;
            itinerary.extend_along(&paths, route.path());
        }

        self.banked_active_seconds += driven;
        self.location = origin;
        self.itinerary = itinerary;
        self.deliveries = deliveries;
        self.next_location = self.itinerary.stops().get(1).map(|s| s.location);
        self.rebuilds = self.rebuilds.saturating_add(1);

        debug!(
            truck = self.number(),
            packages = self.packages.len(),
            reserve = self.reserve.len(),
            distance = self.itinerary.total_distance(),
            start = %format_clock(self.itinerary.start_time()),
            end = %format_clock(self.itinerary.end_time()),
            "itinerary rebuilt"
        );
        Ok(())
    }
}

#[inline]
fn reach(paths: &ShortestPaths, target: LocationIndex) -> f64 {
    paths.distance_to(target).unwrap_or(f64::INFINITY)
}

#[cfg(test)]
mod tests {
    use super::*;
    use courier_model::{
        graph::LocationGraph,
        package::PackageRecord,
        time::parse_clock,
    };

    const START: Seconds = 28_800.0;

    fn p(i: usize) -> PackageIndex {
        PackageIndex::new(i)
    }

    /// HUB at the centre, D1 three miles out, D2 one mile out.
    fn star() -> LocationGraph {
        LocationGraph::from_matrix(
            &["HUB", "D1", "D2"],
            &[[0.0, 3.0, 1.0], [3.0, 0.0, 2.5], [1.0, 2.5, 0.0]],
        )
        .expect("valid matrix")
    }

    /// HUB - A - B in a line, no shortcut.
    fn line() -> LocationGraph {
        let mut g = LocationGraph::new();
        let hub = g.add_location("HUB");
        let a = g.add_location("A");
        let b = g.add_location("B");
        g.add_route(hub, a, 1.8);
        g.add_route(a, b, 1.8);
        g
    }

    fn truck(g: &LocationGraph) -> Truck {
        let hub = g.location("HUB").expect("hub exists");
        Truck::new(TruckIndex::new(0), 16, 18.0, hub, START)
    }

    #[test]
    fn test_deadline_beats_distance() {
        let g = star();
        let finder = PathFinder::new(&g);
        let mut manifest = Manifest::from_records(
            &g,
            vec![
                PackageRecord::new(1, "D2", END_OF_DAY),
                PackageRecord::new(2, "D1", parse_clock("10:30 AM").expect("valid")),
            ],
        )
        .expect("valid manifest");

        let mut t = truck(&g);
        t.load_package(p(0));
        t.load_package(p(1));
        t.schedule(&finder, &mut manifest, START).expect("routable");

        let d1 = g.location("D1").expect("exists");
        assert_eq!(t.itinerary().stops()[1].location, d1);
        assert_eq!(manifest.package(p(1)).arrival_time(), START + 600.0);
        assert_eq!(manifest.package(p(0)).arrival_time(), START + 600.0 + 500.0);
        assert_eq!(t.itinerary().total_distance(), 6.5);
        assert_eq!(t.itinerary().end_location(), t.hub());
        assert_eq!(t.itinerary().last_delivery_location(), g.location("D2").expect("exists"));
    }

    #[test]
    fn test_equal_deadlines_go_nearest_first() {
        let g = star();
        let finder = PathFinder::new(&g);
        let mut manifest = Manifest::from_records(
            &g,
            vec![
                PackageRecord::new(1, "D1", END_OF_DAY),
                PackageRecord::new(2, "D2", END_OF_DAY),
            ],
        )
        .expect("valid manifest");

        let mut t = truck(&g);
        t.load_package(p(0));
        t.load_package(p(1));
        t.schedule(&finder, &mut manifest, START).expect("routable");

        assert!(manifest.package(p(1)).arrival_time() < manifest.package(p(0)).arrival_time());
    }

    #[test]
    fn test_passing_a_destination_delivers_there() {
        let g = line();
        let finder = PathFinder::new(&g);
        let mut manifest = Manifest::from_records(
            &g,
            vec![
                PackageRecord::new(1, "A", END_OF_DAY),
                PackageRecord::new(2, "B", parse_clock("9:00 AM").expect("valid")),
            ],
        )
        .expect("valid manifest");

        let mut t = truck(&g);
        t.load_package(p(0));
        t.load_package(p(1));
        t.schedule(&finder, &mut manifest, START).expect("routable");

        assert_eq!(manifest.package(p(0)).arrival_time(), START + 360.0);
        assert_eq!(manifest.package(p(1)).arrival_time(), START + 720.0);
        assert_eq!(t.itinerary().total_distance(), 7.2);
        assert_eq!(t.deliveries().len(), 2);
    }

    #[test]
    fn test_shared_destination_reuses_delivery_time() {
        let g = star();
        let finder = PathFinder::new(&g);
        let mut manifest = Manifest::from_records(
            &g,
            vec![
                PackageRecord::new(1, "D1", parse_clock("9:00 AM").expect("valid")),
                PackageRecord::new(2, "D2", parse_clock("10:00 AM").expect("valid")),
                PackageRecord::new(3, "D1", END_OF_DAY),
            ],
        )
        .expect("valid manifest");

        let mut t = truck(&g);
        for i in 0..3 {
            t.load_package(p(i));
        }
        t.schedule(&finder, &mut manifest, START).expect("routable");

        assert_eq!(
            manifest.package(p(0)).arrival_time(),
            manifest.package(p(2)).arrival_time()
        );
        assert_eq!(t.itinerary().total_distance(), 6.5);
    }

    #[test]
    fn test_advance_delivers_due_packages_and_moves() {
        let g = star();
        let finder = PathFinder::new(&g);
        let mut manifest = Manifest::from_records(
            &g,
            vec![
                PackageRecord::new(1, "D2", END_OF_DAY),
                PackageRecord::new(2, "D1", parse_clock("10:30 AM").expect("valid")),
            ],
        )
        .expect("valid manifest");

        let mut t = truck(&g);
        t.load_package(p(0));
        t.load_package(p(1));
        t.schedule(&finder, &mut manifest, START).expect("routable");

        let due = t.advance(START + 900.0, &manifest);
        assert_eq!(due.as_slice(), &[p(1)]);
        assert_eq!(t.location(), g.location("D1").expect("exists"));
        assert_eq!(t.packages(), &[p(0)]);
        assert_eq!(t.delivered(), &[p(1)]);
        assert!(!t.is_at_hub(START + 900.0));

        let due = t.advance(START + 3_600.0, &manifest);
        assert_eq!(due.as_slice(), &[p(0)]);
        assert!(t.is_at_hub(START + 3_600.0));
        assert_eq!(t.miles_at(START + 3_600.0), 6.5);
    }

    #[test]
    fn test_reserve_counts_against_capacity_but_not_route() {
        let g = star();
        let finder = PathFinder::new(&g);
        let mut manifest = Manifest::from_records(
            &g,
            vec![
                PackageRecord::new(1, "D1", END_OF_DAY),
                PackageRecord::new(2, "D2", END_OF_DAY),
            ],
        )
        .expect("valid manifest");

        let mut t = truck(&g);
        t.load_package(p(0));
        t.load_package(p(1));
        let taken = t.take_undelivered();
        assert_eq!(taken, vec![p(0), p(1)]);
        t.hold_in_reserve(p(0));
        t.hold_in_reserve(p(0));
        assert_eq!(t.load(), 1);
        assert_eq!(t.remaining_capacity(), 15);

        t.schedule(&finder, &mut manifest, START).expect("routable");
        assert_eq!(t.itinerary().total_distance(), 0.0);
        assert_eq!(manifest.package(p(0)).arrival_time(), END_OF_DAY);

        assert_eq!(t.restore_reserve(), 1);
        assert_eq!(t.packages(), &[p(0)]);
        assert!(t.reserve().is_empty());
    }

    #[test]
    fn test_odometer_banks_time_across_rebuilds() {
        let g = star();
        let finder = PathFinder::new(&g);
        let mut manifest = Manifest::from_records(&g, vec![PackageRecord::new(1, "D1", END_OF_DAY)])
            .expect("valid manifest");

        let mut t = truck(&g);
        t.load_package(p(0));
        t.schedule(&finder, &mut manifest, START).expect("routable");
        t.advance(START + 1_200.0, &manifest);
        assert!(t.is_at_hub(START + 1_200.0));

        // Second trip starts after the first one ended.
        t.schedule(&finder, &mut manifest, START + 1_800.0).expect("routable");
        assert_eq!(t.active_seconds_at(START + 1_800.0), 1_200.0);
        assert_eq!(t.miles_at(START + 1_800.0), 6.0);
        assert_eq!(t.rebuilds(), 2);
    }
    #[test]
    fn test_turn_back_mid_leg_returns_to_the_stop_just_left() {
        let g = line();
        let finder = PathFinder::new(&g);
        let mut manifest = Manifest::from_records(&g, vec![PackageRecord::new(1, "B", END_OF_DAY)])
            .expect("valid manifest");

        let mut t = truck(&g);
        t.load_package(p(0));
        t.schedule(&finder, &mut manifest, START).expect("routable");

        // A is reached after 360 s; at 450 s the truck is 0.45 miles past it.
        let now = START + 450.0;
        assert!(t.advance(now, &manifest).is_empty());
        let a = g.location("A").expect("exists");
        assert_eq!(t.location(), a);

        assert_eq!(t.take_undelivered(), vec![p(0)]);
        t.turn_back(&finder, &mut manifest, now).expect("routable");

        let hub = g.location("HUB").expect("exists");
        assert_eq!(t.itinerary().origin(), a);
        assert_eq!(t.itinerary().end_location(), hub);
        assert!((t.itinerary().start_time() - (START + 540.0)).abs() < 1e-6);
        assert!((t.itinerary().end_time() - (START + 900.0)).abs() < 1e-6);
        // 1.8 out, 0.45 on toward B and back, 1.8 home.
        assert!((t.miles_at(t.itinerary().end_time()) - 4.5).abs() < 1e-6);
        assert!(!t.is_at_hub(START + 600.0));
    }

    #[test]
    fn test_turn_back_drives_on_when_the_next_stop_is_closer_to_home() {
        let g = line();
        let finder = PathFinder::new(&g);
        let mut manifest = Manifest::from_records(&g, vec![PackageRecord::new(1, "B", END_OF_DAY)])
            .expect("valid manifest");

        let mut t = truck(&g);
        t.load_package(p(0));
        t.schedule(&finder, &mut manifest, START).expect("routable");

        // B at 720 s, back at A at 1 080 s, halfway home at 1 260 s.
        let now = START + 1_260.0;
        assert_eq!(t.advance(now, &manifest).as_slice(), &[p(0)]);
        t.turn_back(&finder, &mut manifest, now).expect("routable");

        let hub = g.location("HUB").expect("exists");
        assert_eq!(t.itinerary().origin(), hub);
        assert!((t.itinerary().start_time() - (START + 1_440.0)).abs() < 1e-6);
        assert_eq!(t.itinerary().total_distance(), 0.0);
        assert!((t.miles_at(START + 1_440.0) - 7.2).abs() < 1e-6);
        assert!(t.is_at_hub(START + 1_440.0));
    }

    #[test]
    fn test_turn_back_before_departure_stays_put() {
        let g = line();
        let finder = PathFinder::new(&g);
        let mut manifest = Manifest::from_records(&g, vec![PackageRecord::new(1, "B", END_OF_DAY)])
            .expect("valid manifest");

        let mut t = truck(&g);
        t.load_package(p(0));
        t.schedule(&finder, &mut manifest, START + 900.0).expect("routable");
        t.take_undelivered();
        t.turn_back(&finder, &mut manifest, START).expect("routable");

        assert_eq!(t.itinerary().origin(), g.location("HUB").expect("exists"));
        assert_eq!(t.itinerary().total_distance(), 0.0);
        assert_eq!(t.miles_at(START + 3_600.0), 0.0);
    }
}
