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

//! The hub: package custody, special-instruction handling and the loading
//! policy.
//!
//! Construction runs the startup processing in a fixed order:
//!
//! 1. **Delayed** packages are entered into the delayed-arrival table, keyed
//!    by arrival time and then destination.
//! 2. **Preassigned** packages are force-loaded onto their designated truck
//!    together with the waiting packages for the same address, and that
//!    truck's itinerary is rebuilt.
//! 3. **Bundles** are merged: every bundle note unions its package with the
//!    listed companions, then every package addressed to a group member's
//!    destination joins the group. Waiting members become `Bundled`.
//! 4. Packages needing an **address correction** stay out of the pool until
//!    the correction is applied.
//!
//! The pool of packages a truck may pick from is every package whose status
//! is pending (`AtHub`, `Bundling` or `Bundled`), in manifest order.

use crate::{
    bundle::BundleGroups,
    error::{HubError, InvariantViolation},
};
use courier_model::{
    graph::LocationGraph,
    index::{LocationIndex, PackageIndex, TruckIndex},
    instruction::PackageId,
    package::Manifest,
    status::PackageStatus,
    time::{END_OF_DAY, Seconds, format_clock, travel_seconds},
};
use courier_route::{
    path::{PathFinder, ShortestPaths},
    truck::Truck,
};
use smallvec::{SmallVec, smallvec};
use tracing::{debug, info, warn};

/// The packages moved onto a truck by one load decision.
pub type LoadSet = SmallVec<[PackageIndex; 16]>;

/// Packages that reach the depot together at a given time.
#[derive(Debug, Clone, PartialEq)]
pub struct DelayedArrival {
    pub at: Seconds,
    pub destination: LocationIndex,
    pub packages: SmallVec<[PackageIndex; 4]>,
}

/// The result of asking the hub to load one more delivery onto a truck.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    /// The listed packages are now on the truck and its itinerary is rebuilt.
    Loaded(LoadSet),
    /// The next delivery needs more room than the truck has left.
    Full {
        package: PackageIndex,
        needed: usize,
        available: usize,
    },
    /// No package is waiting.
    PoolEmpty,
}

/// What a recall did to a truck's load.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Recall {
    /// Packages handed back to the hub pool.
    pub returned: LoadSet,
    /// The size of the truck's reserve after the recall.
    pub reserved: usize,
}

/// The parcel hub.
#[derive(Debug, Clone)]
pub struct Hub<'g> {
    finder: PathFinder<'g>,
    location: LocationIndex,
    manifest: Manifest,
    trucks: Vec<Truck>,
    bundles: BundleGroups,
    delayed: Vec<DelayedArrival>,
    release_time: Seconds,
}

impl<'g> Hub<'g> {
    /// Creates the hub at `location` and runs the startup processing at
    /// `start_time`.
    ///
    /// # Errors
    ///
    /// Fails if a bundle note names an unknown package, if a preassignment
    /// names a truck outside the fleet or does not fit on it, or if a
    /// preloaded truck cannot be routed.
    pub fn new(
        graph: &'g LocationGraph,
        manifest: Manifest,
        location: LocationIndex,
        trucks: Vec<Truck>,
        start_time: Seconds,
    ) -> Result<Self, HubError> {
        let mut hub = Self {
            finder: PathFinder::new(graph),
            location,
            bundles: BundleGroups::new(manifest.len()),
            manifest,
            trucks,
            delayed: Vec::new(),
            release_time: start_time,
        };

        hub.register_delayed(start_time);
        hub.force_preassigned(start_time)?;
        hub.merge_bundles()?;

        let awaiting = hub.manifest.count(PackageStatus::CorrectionNeeded);
        if awaiting > 0 {
            info!(packages = awaiting, "holding packages until address correction");
        }
        Ok(hub)
    }

    #[inline]
    pub fn location(&self) -> LocationIndex {
        self.location
    }

    #[inline]
    pub fn finder(&self) -> &PathFinder<'g> {
        &self.finder
    }

    #[inline]
    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    #[inline]
    pub fn trucks(&self) -> &[Truck] {
        &self.trucks
    }

    #[inline]
    pub fn truck(&self, truck: TruckIndex) -> &Truck {
        debug_assert!(
            truck.get() < self.trucks.len(),
            "called `Hub::truck` with truck index out of bounds: the len is {} but the index is {}",
            self.trucks.len(),
            truck.get()
        );

        &self.trucks[truck.get()]
    }

    #[inline]
    pub fn num_trucks(&self) -> usize {
        self.trucks.len()
    }

    #[inline]
    pub fn bundles(&self) -> &BundleGroups {
        &self.bundles
    }

    /// Late arrivals not yet received, ordered by time and destination.
    #[inline]
    pub fn delayed_arrivals(&self) -> &[DelayedArrival] {
        &self.delayed
    }

    /// The latest time packages became available to trucks at the hub.
    #[inline]
    pub fn release_time(&self) -> Seconds {
        self.release_time
    }

    /// Returns the pending packages in manifest order.
    ///
    /// Members of a bundle group stay out of the pool while any member of the
    /// group has not reached the depot yet.
    pub fn pool(&self) -> impl Iterator<Item = PackageIndex> + '_ {
        self.manifest
            .indices()
            .filter(|&p| self.manifest.status(p).is_pending() && !self.is_held(p))
    }

    /// Returns `true` if `package` belongs to a bundle group that still waits
    /// for a delayed member.
    pub fn is_held(&self, package: PackageIndex) -> bool {
        self.bundles.contains(package)
            && self
                .bundles
                .group_of(package)
                .iter()
                .any(|&q| self.manifest.status(q) == PackageStatus::Delayed)
    }

    #[inline]
    pub fn has_pending(&self) -> bool {
        self.pool().next().is_some()
    }

    /// The earliest deadline among pending packages.
    pub fn earliest_pending_deadline(&self) -> Option<Seconds> {
        self.pool()
            .map(|p| self.manifest.package(p).deadline())
            .min_by(f64::total_cmp)
    }

    /// The truck whose current trip ends first; ties go to the lowest index.
    pub fn earliest_finishing_truck(&self) -> Option<TruckIndex> {
        self.trucks
            .iter()
            .min_by(|a, b| {
                a.itinerary()
                    .end_time()
                    .total_cmp(&b.itinerary().end_time())
            })
            .map(Truck::index)
    }

    /// The time a truck standing at the hub departs when loaded at `now`.
    ///
    /// A truck whose trip is still running keeps that trip's start. Otherwise
    /// it leaves when it got back, but not before the latest release of
    /// packages at the hub.
    pub fn departure_time(&self, truck: TruckIndex, now: Seconds) -> Seconds {
        let itinerary = self.truck(truck).itinerary();
        if itinerary.end_time() > now {
            itinerary.start_time()
        } else {
            itinerary.end_time().max(self.release_time)
        }
    }

    /// Chooses the next package for `truck`.
    ///
    /// An empty truck takes the pending package with the earliest deadline.
    /// A loaded truck takes the package minimizing deadline first and then
    /// distance from its last scheduled delivery. Remaining ties go to the
    /// package that comes first in the manifest.
    pub fn select_package(&self, truck: TruckIndex) -> Option<PackageIndex> {
        let truck = self.truck(truck);
        let deadline = |p: PackageIndex| self.manifest.package(p).deadline();

        if truck.is_empty() {
            return self
                .pool()
                .min_by(|&a, &b| deadline(a).total_cmp(&deadline(b)));
        }

        let paths = self
            .finder
            .from_source(truck.itinerary().last_delivery_location());
        self.pool().min_by(|&a, &b| {
            deadline(a).total_cmp(&deadline(b)).then_with(|| {
                reach(&paths, self.manifest.package(a).destination())
                    .total_cmp(&reach(&paths, self.manifest.package(b).destination()))
            })
        })
    }

    /// Returns every pending package that must board together with
    /// `package`, in manifest order.
    ///
    /// For a bundle member this is every pending group member plus every
    /// pending package addressed to a member's destination; otherwise it is
    /// every pending package addressed to the package's destination.
    pub fn load_set(&self, package: PackageIndex) -> LoadSet {
        let seeds: SmallVec<[PackageIndex; 8]> = if self.bundles.contains(package) {
            self.bundles.group_of(package)
        } else {
            smallvec![package]
        };

        let mut set = LoadSet::new();
        for member in seeds {
            if self.manifest.status(member).is_pending() {
                set.push(member);
            }
            let destination = self.manifest.package(member).destination();
            set.extend(
                self.manifest
                    .at_destination(destination)
                    .iter()
                    .copied()
                    .filter(|&q| self.manifest.status(q).is_pending()),
            );
        }
        set.sort_unstable();
        set.dedup();
        set
    }

    /// Selects the next package for `truck` and loads it with its load set
    /// if there is room, departing at `start_time`.
    ///
    /// A load set larger than a whole truck can never fit anywhere; an empty
    /// truck takes as much of it as it can hold, starting with the selected
    /// package.
    ///
    /// # Errors
    ///
    /// Fails if the rebuilt itinerary cannot be routed.
    pub fn load_next(
        &mut self,
        truck: TruckIndex,
        start_time: Seconds,
    ) -> Result<LoadOutcome, HubError> {
        let Some(package) = self.select_package(truck) else {
            return Ok(LoadOutcome::PoolEmpty);
        };

        let mut set = self.load_set(package);
        let (capacity, available) = {
            let t = self.truck(truck);
            (t.capacity(), t.remaining_capacity())
        };

        if set.len() > available {
            if set.len() <= capacity || available < capacity {
                return Ok(LoadOutcome::Full {
                    package,
                    needed: set.len(),
                    available,
                });
            }
            warn!(
                truck = truck.get() + 1,
                package = self.manifest.package(package).id(),
                needed = set.len(),
                capacity,
                "load set exceeds truck capacity, splitting"
            );
            set.retain(|p| *p != package);
            set.insert(0, package);
            set.truncate(capacity);
        }

        self.board(truck, &set)?;
        self.reschedule(truck, start_time)?;
        Ok(LoadOutcome::Loaded(set))
    }

    /// Moves a truck's reserve back onto its itinerary and rebuilds it if
    /// anything was restored. Returns the number of restored packages.
    pub fn restore_reserve(
        &mut self,
        truck: TruckIndex,
        start_time: Seconds,
    ) -> Result<usize, HubError> {
        let restored = self.trucks[truck.get()].restore_reserve();
        if restored > 0 {
            debug!(truck = truck.get() + 1, restored, "reserve restored");
            self.reschedule(truck, start_time)?;
        }
        Ok(restored)
    }

    /// Advances `truck` to `now` and marks every package it reached as
    /// delivered.
    pub fn deliver(
        &mut self,
        truck: TruckIndex,
        now: Seconds,
    ) -> Result<SmallVec<[PackageIndex; 8]>, HubError> {
        let due = self.trucks[truck.get()].advance(now, &self.manifest);
        for &p in &due {
            self.manifest.transition(p, PackageStatus::Delivered)?;
        }
        Ok(due)
    }

    /// Receives every delayed shipment due by `now` into the pool.
    ///
    /// Received packages join any bundle group already present at their
    /// destination. Returns the received packages.
    pub fn receive_late_arrivals(
        &mut self,
        now: Seconds,
    ) -> Result<SmallVec<[PackageIndex; 8]>, HubError> {
        let due = self.delayed.partition_point(|d| d.at <= now);
        let arrivals: Vec<DelayedArrival> = self.delayed.drain(..due).collect();

        let mut received = SmallVec::new();
        for arrival in arrivals {
            for &p in &arrival.packages {
                if self.manifest.status(p) != PackageStatus::Delayed {
                    continue;
                }
                self.manifest.transition(p, PackageStatus::AtHub)?;
                self.join_groups_at_destination(p)?;
                received.push(p);
            }
            info!(
                at = %format_clock(arrival.at),
                destination = self.finder.graph().label(arrival.destination),
                packages = arrival.packages.len(),
                "late arrival received"
            );
            self.release_time = self.release_time.max(arrival.at);
        }
        Ok(received)
    }

    /// Redirects a package that awaits an address correction and returns it
    /// to the pool.
    ///
    /// Applying a correction to a package that is not awaiting one does
    /// nothing and returns `Ok(false)`.
    ///
    /// # Errors
    ///
    /// Returns [`HubError::UnknownPackage`] if `id` is not in the manifest.
    pub fn apply_correction(
        &mut self,
        id: PackageId,
        destination: LocationIndex,
        zip: &str,
        at: Seconds,
    ) -> Result<bool, HubError> {
        let package = self
            .manifest
            .index_of(id)
            .ok_or(HubError::UnknownPackage(id))?;

        let status = self.manifest.status(package);
        if status != PackageStatus::CorrectionNeeded {
            warn!(package = id, %status, "correction ignored, package does not await one");
            return Ok(false);
        }

        self.manifest.redirect(package, destination, zip);
        self.manifest.transition(package, PackageStatus::AtHub)?;
        self.join_groups_at_destination(package)?;
        self.release_time = self.release_time.max(at);
        info!(
            package = id,
            destination = self.finder.graph().label(destination),
            zip,
            "address corrected"
        );
        Ok(true)
    }

    /// Returns `true` if `truck` should abandon its trip.
    ///
    /// A truck under way with packages on its itinerary is recalled when
    /// heading straight back is shorter than finishing the next leg and then
    /// heading back, and the earliest pending deadline falls before the
    /// truck's trip end plus the time of that longer way back. Trucks at the
    /// hub are never recalled.
    pub fn should_recall(&self, truck: TruckIndex) -> bool {
        let t = self.truck(truck);
        if t.packages().is_empty() || t.location() == self.location {
            return false;
        }
        let Some(next) = t.next_location() else {
            return false;
        };
        let Some(deadline) = self.earliest_pending_deadline() else {
            return false;
        };

        let here = self.finder.from_source(t.location());
        let (Some(to_hub), Some(to_next)) = (
            here.distance_to(self.location),
            here.distance_to(next),
        ) else {
            return false;
        };
        let Some(next_to_hub) = self.finder.from_source(next).distance_to(self.location) else {
            return false;
        };

        let worst = to_next + next_to_hub;
        to_hub < worst
            && deadline < t.itinerary().end_time() + travel_seconds(worst, t.itinerary().speed_mph())
    }

    /// Sends `truck` back to the hub from where it is at `now`.
    ///
    /// Undelivered bundle members and preassigned packages stay on board in
    /// the reserve; every other undelivered package returns to the pool.
    pub fn recall(&mut self, truck: TruckIndex, now: Seconds) -> Result<Recall, HubError> {
        let undelivered = self.trucks[truck.get()].take_undelivered();
        let mut recall = Recall::default();

        for p in undelivered {
            self.manifest.set_arrival_time(p, END_OF_DAY);
            let keep = self.bundles.contains(p)
                || self.manifest.package(p).instruction().truck_number().is_some();
            if keep {
                self.trucks[truck.get()].hold_in_reserve(p);
            } else {
                self.manifest.transition(p, PackageStatus::AtHub)?;
                recall.returned.push(p);
            }
        }
        recall.reserved = self.trucks[truck.get()].reserve().len();

        self.trucks[truck.get()].turn_back(&self.finder, &mut self.manifest, now)?;
        self.release_time = self.release_time.max(now);
        info!(
            truck = truck.get() + 1,
            at = %format_clock(now),
            returned = recall.returned.len(),
            reserved = recall.reserved,
            "truck recalled"
        );
        Ok(recall)
    }

    /// Verifies the structural invariants: the status buckets partition the
    /// packages, no truck is over capacity, and a package is on a truck
    /// exactly when its status is `OnTruck`.
    pub fn check_invariants(&self) -> Result<(), InvariantViolation> {
        if !self.manifest.check_partition() {
            return Err(InvariantViolation::StatusPartition);
        }

        let mut custody = vec![0_usize; self.manifest.len()];
        for truck in &self.trucks {
            if truck.load() > truck.capacity() {
                return Err(InvariantViolation::OverCapacity {
                    truck: truck.index(),
                    load: truck.load(),
                    capacity: truck.capacity(),
                });
            }
            for p in truck.packages().iter().chain(truck.reserve()) {
                custody[p.get()] += 1;
            }
        }

        for p in self.manifest.indices() {
            let status = self.manifest.status(p);
            let trucks = custody[p.get()];
            let expected = usize::from(status == PackageStatus::OnTruck);
            if trucks != expected {
                return Err(InvariantViolation::Custody {
                    package: p,
                    status,
                    trucks,
                });
            }
        }
        Ok(())
    }

    fn register_delayed(&mut self, start_time: Seconds) {
        let delayed: Vec<PackageIndex> = self.manifest.bucket(PackageStatus::Delayed).collect();
        for p in delayed {
            let package = self.manifest.package(p);
            let at = package.release_time().unwrap_or(start_time);
            let destination = package.destination();
            match self
                .delayed
                .iter_mut()
                .find(|d| d.at == at && d.destination == destination)
            {
                Some(entry) => entry.packages.push(p),
                None => self.delayed.push(DelayedArrival {
                    at,
                    destination,
                    packages: smallvec![p],
                }),
            }
        }
        self.delayed.sort_by(|a, b| {
            a.at.total_cmp(&b.at)
                .then(a.destination.cmp(&b.destination))
        });
    }

    fn force_preassigned(&mut self, start_time: Seconds) -> Result<(), HubError> {
        let preassigned: Vec<PackageIndex> =
            self.manifest.bucket(PackageStatus::Preassigned).collect();
        let mut touched: SmallVec<[TruckIndex; 4]> = SmallVec::new();

        for p in preassigned {
            let package = self.manifest.package(p);
            let id = package.id();
            let Some(number) = package.instruction().truck_number() else {
                continue;
            };
            if number == 0 || number > self.trucks.len() {
                return Err(HubError::TruckOutOfRange {
                    package: id,
                    truck: number,
                    fleet_size: self.trucks.len(),
                });
            }

            let truck = TruckIndex::new(number - 1);
            let available = self.truck(truck).remaining_capacity();
            if available == 0 {
                return Err(HubError::CapacityExceeded {
                    package: id,
                    truck: number,
                    capacity: self.truck(truck).capacity(),
                });
            }

            let mut set: LoadSet = smallvec![p];
            set.extend(
                self.manifest
                    .at_destination(package.destination())
                    .iter()
                    .copied()
                    .filter(|&q| self.manifest.status(q) == PackageStatus::AtHub),
            );
            if set.len() > available {
                warn!(
                    package = id,
                    truck = number,
                    "same-address packages do not fit, loading the preassigned package alone"
                );
                set.truncate(1);
            }

            self.board(truck, &set)?;
            if !touched.contains(&truck) {
                touched.push(truck);
            }
        }

        for truck in touched {
            self.reschedule(truck, start_time)?;
        }
        Ok(())
    }

    fn merge_bundles(&mut self) -> Result<(), HubError> {
        let bundling: Vec<PackageIndex> = self.manifest.bucket(PackageStatus::Bundling).collect();
        for &p in &bundling {
            self.bundles.insert(p);
            let package = self.manifest.package(p);
            for &companion in package.instruction().companions() {
                let q = self
                    .manifest
                    .index_of(companion)
                    .ok_or(HubError::UnknownCompanion {
                        package: package.id(),
                        companion,
                    })?;
                self.bundles.union(p, q);
            }
        }

        let members: Vec<PackageIndex> = self.bundles.members().collect();
        for member in members {
            let destination = self.manifest.package(member).destination();
            for &q in self.manifest.at_destination(destination) {
                if self.manifest.status(q) != PackageStatus::CorrectionNeeded {
                    self.bundles.union(member, q);
                }
            }
        }

        let members: Vec<PackageIndex> = self.bundles.members().collect();
        for &p in &members {
            if matches!(
                self.manifest.status(p),
                PackageStatus::AtHub | PackageStatus::Bundling
            ) {
                self.manifest.transition(p, PackageStatus::Bundled)?;
            }
        }

        for group in self.bundles.groups() {
            let ids: SmallVec<[PackageId; 8]> =
                group.iter().map(|&p| self.manifest.package(p).id()).collect();
            info!(packages = ?ids.as_slice(), "bundle formed");
        }
        Ok(())
    }

    /// Adds a package that just became available to the bundle group present
    /// at its destination, if any, and marks it `Bundled` if it is a member.
    fn join_groups_at_destination(&mut self, package: PackageIndex) -> Result<(), HubError> {
        if !self.bundles.contains(package) {
            let destination = self.manifest.package(package).destination();
            let anchor = self
                .manifest
                .at_destination(destination)
                .iter()
                .copied()
                .find(|&q| q != package && self.bundles.contains(q));
            if let Some(anchor) = anchor {
                self.bundles.union(anchor, package);
            }
        }

        if self.bundles.contains(package) && self.manifest.status(package) == PackageStatus::AtHub {
            self.manifest.transition(package, PackageStatus::Bundled)?;
        }
        Ok(())
    }

    fn board(&mut self, truck: TruckIndex, set: &[PackageIndex]) -> Result<(), HubError> {
        for &p in set {
            self.manifest.transition(p, PackageStatus::OnTruck)?;
            self.trucks[truck.get()].load_package(p);
        }
        info!(
            truck = truck.get() + 1,
            packages = set.len(),
            load = self.trucks[truck.get()].load(),
            "delivery loaded"
        );
        Ok(())
    }

    #[inline]
    fn reschedule(&mut self, truck: TruckIndex, start_time: Seconds) -> Result<(), HubError> {
        self.trucks[truck.get()].schedule(&self.finder, &mut self.manifest, start_time)?;
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
    use courier_model::{package::PackageRecord, time::parse_clock};

    const START: Seconds = 28_800.0;

    fn p(i: usize) -> PackageIndex {
        PackageIndex::new(i)
    }

    fn t(i: usize) -> TruckIndex {
        TruckIndex::new(i)
    }

    fn graph() -> LocationGraph {
        LocationGraph::from_matrix(
            &["HUB", "A", "B", "C", "D"],
            &[
                [0.0, 3.0, 1.0, 2.0, 4.0],
                [3.0, 0.0, 2.5, 2.0, 5.0],
                [1.0, 2.5, 0.0, 1.5, 3.5],
                [2.0, 2.0, 1.5, 0.0, 2.0],
                [4.0, 5.0, 3.5, 2.0, 0.0],
            ],
        )
        .expect("valid matrix")
    }

    fn hub_with(
        g: &LocationGraph,
        records: Vec<PackageRecord>,
        num_trucks: usize,
        capacity: usize,
    ) -> Result<Hub<'_>, HubError> {
        let manifest = Manifest::from_records(g, records).expect("valid manifest");
        let location = g.location("HUB").expect("hub exists");
        let trucks = (0..num_trucks)
            .map(|i| Truck::new(TruckIndex::new(i), capacity, 18.0, location, START))
            .collect();
        Hub::new(g, manifest, location, trucks, START)
    }

    #[test]
    fn test_startup_assigns_and_bundles() {
        let g = graph();
        let hub = hub_with(
            &g,
            vec![
                PackageRecord::new(1, "A", END_OF_DAY).with_note("Can only be on truck 2"),
                PackageRecord::new(2, "B", END_OF_DAY).with_note("Must be delivered with 3"),
                PackageRecord::new(3, "C", END_OF_DAY),
                PackageRecord::new(4, "D", END_OF_DAY).with_note("Wrong address listed"),
                PackageRecord::new(5, "D", END_OF_DAY),
            ],
            2,
            16,
        )
        .expect("valid startup");

        let m = hub.manifest();
        assert_eq!(m.status(p(0)), PackageStatus::OnTruck);
        assert_eq!(hub.truck(t(1)).packages(), &[p(0)]);
        assert!(hub.truck(t(0)).is_empty());
        assert_eq!(m.status(p(1)), PackageStatus::Bundled);
        assert_eq!(m.status(p(2)), PackageStatus::Bundled);
        assert_eq!(m.status(p(3)), PackageStatus::CorrectionNeeded);
        assert_eq!(m.status(p(4)), PackageStatus::AtHub);
        assert_eq!(hub.pool().collect::<Vec<_>>(), vec![p(1), p(2), p(4)]);
        assert!(hub.truck(t(1)).itinerary().total_distance() > 0.0);
        assert_eq!(hub.check_invariants(), Ok(()));
    }

    #[test]
    fn test_preassignment_co_loads_same_address() {
        let g = graph();
        let hub = hub_with(
            &g,
            vec![
                PackageRecord::new(1, "A", END_OF_DAY),
                PackageRecord::new(2, "A", END_OF_DAY).with_note("Can only be on truck 1"),
            ],
            2,
            16,
        )
        .expect("valid startup");

        assert_eq!(hub.truck(t(0)).packages(), &[p(1), p(0)]);
        assert!(!hub.has_pending());
    }

    #[test]
    fn test_preassignment_to_missing_truck_is_an_error() {
        let g = graph();
        let err = hub_with(
            &g,
            vec![PackageRecord::new(1, "A", END_OF_DAY).with_note("Can only be on truck 3")],
            2,
            16,
        )
        .unwrap_err();
        assert_eq!(
            err,
            HubError::TruckOutOfRange {
                package: 1,
                truck: 3,
                fleet_size: 2
            }
        );
    }

    #[test]
    fn test_preassignment_beyond_capacity_is_an_error() {
        let g = graph();
        let err = hub_with(
            &g,
            vec![
                PackageRecord::new(1, "A", END_OF_DAY).with_note("Can only be on truck 1"),
                PackageRecord::new(2, "B", END_OF_DAY).with_note("Can only be on truck 1"),
            ],
            2,
            1,
        )
        .unwrap_err();
        assert!(matches!(err, HubError::CapacityExceeded { package: 2, truck: 1, .. }));
    }

    #[test]
    fn test_unknown_companion_fails_the_load() {
        let g = graph();
        let err = hub_with(
            &g,
            vec![PackageRecord::new(1, "A", END_OF_DAY).with_note("Must be delivered with 99")],
            2,
            16,
        )
        .unwrap_err();
        assert_eq!(
            err,
            HubError::UnknownCompanion {
                package: 1,
                companion: 99
            }
        );
    }

    #[test]
    fn test_bundle_absorbs_co_located_package() {
        let g = graph();
        let hub = hub_with(
            &g,
            vec![
                PackageRecord::new(1, "A", END_OF_DAY).with_note("Must be delivered with 2, 3"),
                PackageRecord::new(2, "B", END_OF_DAY),
                PackageRecord::new(3, "C", END_OF_DAY),
                PackageRecord::new(4, "A", END_OF_DAY),
            ],
            2,
            16,
        )
        .expect("valid startup");

        let group = hub.bundles().group_of(p(3));
        assert_eq!(group.as_slice(), &[p(0), p(1), p(2), p(3)]);
        for i in 0..4 {
            assert_eq!(hub.manifest().status(p(i)), PackageStatus::Bundled);
        }
    }

    #[test]
    fn test_bundle_notes_merge_transitively() {
        let g = graph();
        let hub = hub_with(
            &g,
            vec![
                PackageRecord::new(1, "A", END_OF_DAY).with_note("Must be delivered with 2"),
                PackageRecord::new(2, "B", END_OF_DAY),
                PackageRecord::new(3, "C", END_OF_DAY).with_note("Must be delivered with 2, 4"),
                PackageRecord::new(4, "D", END_OF_DAY),
                PackageRecord::new(5, "HUB", END_OF_DAY),
            ],
            2,
            16,
        )
        .expect("valid startup");

        assert!(hub.bundles().same_group(p(0), p(3)));
        assert!(!hub.bundles().contains(p(4)));
        assert_eq!(hub.bundles().groups().len(), 1);
    }

    #[test]
    fn test_bundle_closure_over_shared_destinations() {
        let g = graph();
        let hub = hub_with(
            &g,
            vec![
                PackageRecord::new(1, "A", END_OF_DAY).with_note("Must be delivered with 2"),
                PackageRecord::new(2, "B", END_OF_DAY),
                PackageRecord::new(3, "B", END_OF_DAY),
                PackageRecord::new(4, "A", END_OF_DAY).with_note("Can only be on truck 1"),
                PackageRecord::new(5, "B", END_OF_DAY)
                    .with_note("Delayed on flight---will not arrive to depot until 9:05 am"),
                PackageRecord::new(6, "C", END_OF_DAY),
            ],
            2,
            16,
        )
        .expect("valid startup");

        let m = hub.manifest();
        for a in m.indices() {
            for b in m.indices() {
                if m.package(a).destination() == m.package(b).destination()
                    && hub.bundles().contains(a)
                {
                    assert!(hub.bundles().same_group(a, b), "{a} and {b}");
                }
            }
        }
        assert_eq!(m.status(p(3)), PackageStatus::OnTruck);
        assert_eq!(m.status(p(4)), PackageStatus::Delayed);
    }

    #[test]
    fn test_empty_truck_takes_earliest_deadline_over_nearest() {
        let g = LocationGraph::from_matrix(
            &["HUB", "D1", "D2"],
            &[[0.0, 3.0, 1.0], [3.0, 0.0, 2.5], [1.0, 2.5, 0.0]],
        )
        .expect("valid matrix");
        let hub = hub_with(
            &g,
            vec![
                PackageRecord::new(1, "D2", END_OF_DAY),
                PackageRecord::new(2, "D1", parse_clock("10:30 AM").expect("valid")),
            ],
            2,
            16,
        )
        .expect("valid startup");

        assert_eq!(hub.select_package(t(0)), Some(p(1)));
    }

    #[test]
    fn test_loaded_truck_prefers_nearest_among_equal_deadlines() {
        let g = graph();
        let mut hub = hub_with(
            &g,
            vec![
                PackageRecord::new(1, "A", END_OF_DAY),
                PackageRecord::new(2, "D", END_OF_DAY),
                PackageRecord::new(3, "C", END_OF_DAY),
            ],
            1,
            16,
        )
        .expect("valid startup");

        assert!(matches!(hub.load_next(t(0), START), Ok(LoadOutcome::Loaded(_))));
        assert_eq!(hub.truck(t(0)).packages(), &[p(0)]);
        // From A, C is 2.0 away and D is 4.0 by way of C.
        assert_eq!(hub.select_package(t(0)), Some(p(2)));
    }

    #[test]
    fn test_load_set_covers_group_and_addresses() {
        let g = graph();
        let hub = hub_with(
            &g,
            vec![
                PackageRecord::new(1, "A", END_OF_DAY).with_note("Must be delivered with 2"),
                PackageRecord::new(2, "B", END_OF_DAY),
                PackageRecord::new(3, "C", END_OF_DAY),
                PackageRecord::new(4, "C", END_OF_DAY),
            ],
            2,
            16,
        )
        .expect("valid startup");

        assert_eq!(hub.load_set(p(1)).as_slice(), &[p(0), p(1)]);
        assert_eq!(hub.load_set(p(2)).as_slice(), &[p(2), p(3)]);
    }

    #[test]
    fn test_full_truck_reports_needed_room() {
        let g = graph();
        let mut hub = hub_with(
            &g,
            vec![
                PackageRecord::new(1, "A", END_OF_DAY),
                PackageRecord::new(2, "B", END_OF_DAY),
                PackageRecord::new(3, "B", END_OF_DAY),
            ],
            1,
            2,
        )
        .expect("valid startup");

        let first = hub.load_next(t(0), START).expect("routable");
        assert_eq!(first, LoadOutcome::Loaded(smallvec![p(0)]));
        let second = hub.load_next(t(0), START).expect("routable");
        assert_eq!(
            second,
            LoadOutcome::Full {
                package: p(1),
                needed: 2,
                available: 1
            }
        );
        assert_eq!(hub.manifest().status(p(1)), PackageStatus::AtHub);
        assert_eq!(hub.check_invariants(), Ok(()));
    }

    #[test]
    fn test_oversized_bundle_is_split_on_an_empty_truck() {
        let g = graph();
        let mut hub = hub_with(
            &g,
            vec![
                PackageRecord::new(1, "A", END_OF_DAY).with_note("Must be delivered with 2, 3"),
                PackageRecord::new(2, "B", END_OF_DAY),
                PackageRecord::new(3, "C", END_OF_DAY),
            ],
            1,
            2,
        )
        .expect("valid startup");

        match hub.load_next(t(0), START).expect("routable") {
            LoadOutcome::Loaded(set) => assert_eq!(set.as_slice(), &[p(0), p(1)]),
            other => panic!("expected a split load, got {other:?}"),
        }
        assert_eq!(hub.check_invariants(), Ok(()));
    }

    #[test]
    fn test_late_arrivals_are_received_on_time() {
        let g = graph();
        let mut hub = hub_with(
            &g,
            vec![
                PackageRecord::new(1, "A", END_OF_DAY)
                    .with_note("Delayed on flight---will not arrive to depot until 9:05 am"),
                PackageRecord::new(2, "A", END_OF_DAY),
                PackageRecord::new(3, "B", END_OF_DAY),
            ],
            2,
            16,
        )
        .expect("valid startup");

        assert_eq!(hub.delayed_arrivals().len(), 1);
        assert_eq!(hub.delayed_arrivals()[0].at, 32_700.0);
        assert_eq!(hub.delayed_arrivals()[0].packages.as_slice(), &[p(0), p(1)]);
        assert_eq!(hub.pool().collect::<Vec<_>>(), vec![p(2)]);

        assert!(hub.receive_late_arrivals(32_000.0).expect("valid").is_empty());
        let received = hub.receive_late_arrivals(33_300.0).expect("valid");
        assert_eq!(received.as_slice(), &[p(0), p(1)]);
        assert_eq!(hub.manifest().status(p(0)), PackageStatus::AtHub);
        assert!(hub.delayed_arrivals().is_empty());
        assert_eq!(hub.release_time(), 32_700.0);
        assert_eq!(hub.check_invariants(), Ok(()));
    }

    #[test]
    fn test_correction_is_applied_once() {
        let g = graph();
        let c = g.location("C").expect("exists");
        let mut hub = hub_with(
            &g,
            vec![
                PackageRecord::new(9, "A", END_OF_DAY).with_note("Wrong address listed"),
                PackageRecord::new(10, "C", END_OF_DAY).with_note("Must be delivered with 11"),
                PackageRecord::new(11, "B", END_OF_DAY),
            ],
            2,
            16,
        )
        .expect("valid startup");

        assert!(!hub.pool().any(|q| q == p(0)));
        assert_eq!(hub.apply_correction(9, c, "84111", 37_200.0), Ok(true));
        assert_eq!(hub.manifest().package(p(0)).destination(), c);
        assert_eq!(hub.manifest().package(p(0)).zip(), "84111");
        assert_eq!(hub.manifest().status(p(0)), PackageStatus::Bundled);
        assert!(hub.bundles().same_group(p(0), p(1)));

        assert_eq!(hub.apply_correction(9, c, "84111", 37_200.0), Ok(false));
        assert_eq!(hub.manifest().at_destination(c), &[p(0), p(1)]);
        assert_eq!(
            hub.apply_correction(42, c, "84111", 37_200.0),
            Err(HubError::UnknownPackage(42))
        );
    }

    #[test]
    fn test_recall_keeps_reserve_stable() {
        let g = graph();
        let mut hub = hub_with(
            &g,
            vec![
                PackageRecord::new(1, "A", END_OF_DAY).with_note("Can only be on truck 1"),
                PackageRecord::new(2, "B", END_OF_DAY).with_note("Must be delivered with 3"),
                PackageRecord::new(3, "C", END_OF_DAY),
                PackageRecord::new(4, "D", END_OF_DAY),
            ],
            2,
            16,
        )
        .expect("valid startup");

        while let LoadOutcome::Loaded(_) = hub.load_next(t(0), START).expect("routable") {}
        assert_eq!(hub.truck(t(0)).load(), 4);

        let recall = hub.recall(t(0), START + 60.0).expect("routable");
        assert_eq!(recall.returned.as_slice(), &[p(3)]);
        assert_eq!(recall.reserved, 3);
        assert_eq!(hub.manifest().status(p(3)), PackageStatus::AtHub);
        assert_eq!(hub.truck(t(0)).load(), 3);
        assert_eq!(hub.check_invariants(), Ok(()));

        let again = hub.recall(t(0), START + 120.0).expect("routable");
        assert!(again.returned.is_empty());
        assert_eq!(again.reserved, 3);
        assert_eq!(hub.truck(t(0)).reserve().len(), 3);

        assert_eq!(hub.restore_reserve(t(0), START + 120.0), Ok(3));
        assert!(hub.truck(t(0)).reserve().is_empty());
        assert_eq!(hub.check_invariants(), Ok(()));
    }

    #[test]
    fn test_deliver_marks_reached_packages() {
        let g = graph();
        let mut hub = hub_with(
            &g,
            vec![
                PackageRecord::new(1, "B", END_OF_DAY),
                PackageRecord::new(2, "D", END_OF_DAY),
            ],
            1,
            16,
        )
        .expect("valid startup");

        while let LoadOutcome::Loaded(_) = hub.load_next(t(0), START).expect("routable") {}
        // HUB -> B is one mile, 200 seconds at 18 mph.
        let first = hub.deliver(t(0), START + 300.0).expect("valid");
        assert_eq!(first.as_slice(), &[p(0)]);
        assert_eq!(hub.manifest().status(p(0)), PackageStatus::Delivered);

        hub.deliver(t(0), END_OF_DAY).expect("valid");
        assert_eq!(hub.manifest().count(PackageStatus::Delivered), 2);
        assert!(hub.truck(t(0)).is_at_hub(END_OF_DAY));
        assert_eq!(hub.check_invariants(), Ok(()));
    }

    #[test]
    fn test_recall_fires_once_the_pool_turns_urgent() {
        let g = graph();
        let mut hub = hub_with(
            &g,
            vec![
                PackageRecord::new(1, "C", END_OF_DAY),
                PackageRecord::new(2, "D", END_OF_DAY),
                PackageRecord::new(3, "A", parse_clock("8:30 AM").expect("valid"))
                    .with_note("Delayed on flight---will not arrive to depot until 8:10 am"),
            ],
            1,
            16,
        )
        .expect("valid startup");

        while let LoadOutcome::Loaded(_) = hub.load_next(t(0), START).expect("routable") {}
        assert!(!hub.should_recall(t(0)));

        // HUB -> C -> D -> HUB, eight miles; C is reached after 400 s.
        assert_eq!(hub.truck(t(0)).itinerary().total_distance(), 8.0);
        let delivered = hub.deliver(t(0), START + 450.0).expect("valid");
        assert_eq!(delivered.as_slice(), &[p(0)]);
        let c = g.location("C").expect("exists");
        assert_eq!(hub.truck(t(0)).location(), c);
        assert!(!hub.should_recall(t(0)));

        hub.receive_late_arrivals(START + 600.0).expect("valid");
        assert!(hub.should_recall(t(0)));

        let recall = hub.recall(t(0), START + 600.0).expect("routable");
        assert_eq!(recall.returned.as_slice(), &[p(1)]);
        assert_eq!(recall.reserved, 0);
        // One mile toward D when recalled, so it turns around to C first.
        assert_eq!(hub.truck(t(0)).itinerary().origin(), c);
        assert!((hub.truck(t(0)).itinerary().start_time() - (START + 800.0)).abs() < 1e-6);
        assert_eq!(hub.truck(t(0)).itinerary().end_location(), hub.location());
        assert_eq!(hub.release_time(), START + 600.0);
        assert_eq!(hub.check_invariants(), Ok(()));
    }
    #[test]
    fn test_bundle_waits_for_delayed_package_at_member_address() {
        let g = graph();
        let mut hub = hub_with(
            &g,
            vec![
                PackageRecord::new(1, "A", END_OF_DAY).with_note("Must be delivered with 2"),
                PackageRecord::new(2, "B", END_OF_DAY),
                PackageRecord::new(3, "A", END_OF_DAY)
                    .with_note("Delayed on flight---will not arrive to depot until 9:05 am"),
                PackageRecord::new(4, "C", END_OF_DAY),
            ],
            1,
            16,
        )
        .expect("valid startup");

        assert!(hub.bundles().same_group(p(0), p(2)));
        assert!(hub.is_held(p(0)));
        assert!(hub.is_held(p(1)));
        assert!(!hub.is_held(p(3)));
        assert_eq!(hub.pool().collect::<Vec<_>>(), vec![p(3)]);
        assert_eq!(hub.load_set(p(3)).as_slice(), &[p(3)]);

        hub.receive_late_arrivals(32_700.0).expect("valid");
        assert_eq!(hub.manifest().status(p(2)), PackageStatus::Bundled);
        assert!(!hub.is_held(p(0)));

        let departure = hub.departure_time(t(0), 32_700.0);
        assert_eq!(departure, 32_700.0);
        match hub.load_next(t(0), departure).expect("routable") {
            LoadOutcome::Loaded(set) => assert_eq!(set.as_slice(), &[p(0), p(1), p(2)]),
            other => panic!("expected a load, got {other:?}"),
        }

        let a = g.location("A").expect("exists");
        let truck = hub.truck(t(0));
        let delivery = truck.delivery(a).expect("A is on the route");
        let m = hub.manifest();
        assert_eq!(m.package(p(0)).arrival_time(), delivery.end);
        assert_eq!(m.package(p(2)).arrival_time(), delivery.end);
        let visits = truck
            .itinerary()
            .stops()
            .iter()
            .filter(|s| s.location == a)
            .count();
        assert_eq!(visits, 1);
        assert_eq!(hub.check_invariants(), Ok(()));
    }
}
