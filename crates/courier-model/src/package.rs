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

//! Packages and the manifest that owns them.
//!
//! A [`PackageRecord`] is what a tabular loader hands over: raw strings and a
//! deadline in seconds of day. [`Manifest::from_records`] resolves each
//! record's address against a [`LocationGraph`], parses its note into an
//! [`Instruction`], and assigns the initial [`PackageStatus`].
//!
//! The manifest is the single owner of package status. Its status buckets and
//! per-destination index are maintained on every mutation and never written
//! from the outside.

use crate::{
    graph::{GraphError, LocationGraph},
    index::{LocationIndex, PackageIndex},
    instruction::{Instruction, InstructionError, PackageId},
    status::{PackageStatus, StatusBuckets, TransitionError},
    time::{END_OF_DAY, Seconds},
};
use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use tracing::debug;

/// A raw package row as produced by an input loader.
#[derive(Debug, Clone, PartialEq)]
pub struct PackageRecord {
    pub id: PackageId,
    pub address: String,
    /// Deadline in seconds of day; [`END_OF_DAY`] for "EOD".
    pub deadline: Seconds,
    pub city: String,
    pub state: String,
    pub zip: String,
    pub weight: f64,
    pub note: String,
}

impl PackageRecord {
    /// Creates a record with the given id, address and deadline, and empty
    /// remaining fields.
    pub fn new(id: PackageId, address: impl Into<String>, deadline: Seconds) -> Self {
        Self {
            id,
            address: address.into(),
            deadline,
            city: String::new(),
            state: String::new(),
            zip: String::new(),
            weight: 0.0,
            note: String::new(),
        }
    }

    #[inline]
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = note.into();
        self
    }

    #[inline]
    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    #[inline]
    pub fn with_locality(
        mut self,
        city: impl Into<String>,
        state: impl Into<String>,
        zip: impl Into<String>,
    ) -> Self {
        self.city = city.into();
        self.state = state.into();
        self.zip = zip.into();
        self
    }
}

/// A package resolved against the road network.
#[derive(Debug, Clone, PartialEq)]
pub struct Package {
    id: PackageId,
    destination: LocationIndex,
    deadline: Seconds,
    weight: f64,
    city: String,
    state: String,
    zip: String,
    note: String,
    instruction: Instruction,
    status: PackageStatus,
    release_time: Option<Seconds>,
    arrival_time: Seconds,
}

impl Package {
    #[inline]
    pub fn id(&self) -> PackageId {
        self.id
    }

    #[inline]
    pub fn destination(&self) -> LocationIndex {
        self.destination
    }

    #[inline]
    pub fn deadline(&self) -> Seconds {
        self.deadline
    }

    #[inline]
    pub fn weight(&self) -> f64 {
        self.weight
    }

    #[inline]
    pub fn city(&self) -> &str {
        &self.city
    }

    #[inline]
    pub fn state(&self) -> &str {
        &self.state
    }

    #[inline]
    pub fn zip(&self) -> &str {
        &self.zip
    }

    #[inline]
    pub fn note(&self) -> &str {
        &self.note
    }

    #[inline]
    pub fn instruction(&self) -> &Instruction {
        &self.instruction
    }

    #[inline]
    pub fn status(&self) -> PackageStatus {
        self.status
    }

    /// The time of day the package becomes available at the depot, if it is
    /// held back. Set for delayed packages and for packages held with them.
    #[inline]
    pub fn release_time(&self) -> Option<Seconds> {
        self.release_time
    }

    /// The scheduled (or actual) delivery time; [`END_OF_DAY`] while unscheduled.
    #[inline]
    pub fn arrival_time(&self) -> Seconds {
        self.arrival_time
    }

    /// Returns `true` if the scheduled arrival is no later than the deadline.
    #[inline]
    pub fn is_on_time(&self) -> bool {
        self.arrival_time <= self.deadline
    }
}

/// The error type for building a [`Manifest`].
#[derive(Debug, Clone, PartialEq)]
pub enum ManifestError {
    /// Two records share the same package id.
    DuplicatePackage(PackageId),
    /// A record's address is not a location of the road network.
    Graph(GraphError),
    /// A record's note could not be parsed.
    Instruction {
        package: PackageId,
        error: InstructionError,
    },
}

impl std::fmt::Display for ManifestError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicatePackage(id) => write!(f, "Duplicate package id {}", id),
            Self::Graph(e) => write!(f, "Graph error: {}", e),
            Self::Instruction { package, error } => {
                write!(f, "Package {} has an invalid note: {}", package, error)
            }
        }
    }
}

impl std::error::Error for ManifestError {}

impl From<GraphError> for ManifestError {
    fn from(e: GraphError) -> Self {
        Self::Graph(e)
    }
}

/// The full package universe of one simulation run.
#[derive(Debug, Clone)]
pub struct Manifest {
    packages: Vec<Package>,
    by_id: FxHashMap<PackageId, PackageIndex>,
    by_destination: FxHashMap<LocationIndex, SmallVec<[PackageIndex; 4]>>,
    buckets: StatusBuckets,
}

impl Manifest {
    /// Resolves records against `graph` and builds the manifest.
    ///
    /// Packages keep the order of `records`; that order is the tie-break
    /// order everywhere downstream. After the initial statuses are assigned,
    /// every `AtHub` package sharing a destination with a delayed package is
    /// held back with it until the latest delayed arrival at that
    /// destination.
    ///
    /// # Errors
    ///
    /// Returns an error on duplicate ids, unknown addresses and malformed
    /// notes.
    pub fn from_records<I>(graph: &LocationGraph, records: I) -> Result<Self, ManifestError>
    where
        I: IntoIterator<Item = PackageRecord>,
    {
        let mut packages = Vec::new();
        let mut by_id = FxHashMap::default();
        let mut by_destination: FxHashMap<LocationIndex, SmallVec<[PackageIndex; 4]>> =
            FxHashMap::default();

        for record in records {
            let index = PackageIndex::new(packages.len());
            if by_id.insert(record.id, index).is_some() {
                return Err(ManifestError::DuplicatePackage(record.id));
            }

            let destination = graph.location(&record.address)?;
            let instruction =
                Instruction::parse(&record.note).map_err(|error| ManifestError::Instruction {
                    package: record.id,
                    error,
                })?;

            by_destination.entry(destination).or_default().push(index);
            packages.push(Package {
                id: record.id,
                destination,
                deadline: record.deadline,
                weight: record.weight,
                city: record.city,
                state: record.state,
                zip: record.zip,
                note: record.note,
                status: instruction.initial_status(),
                release_time: instruction.arrival_time(),
                instruction,
                arrival_time: END_OF_DAY,
            });
        }

        hold_with_delayed(&mut packages, &by_destination);

        let mut buckets = StatusBuckets::new(packages.len());
        for (i, package) in packages.iter().enumerate() {
            buckets.insert(PackageIndex::new(i), package.status);
        }

        Ok(Self {
            packages,
            by_id,
            by_destination,
            buckets,
        })
    }

    /// Returns the number of packages.
    #[inline]
    pub fn len(&self) -> usize {
        self.packages.len()
    }

    /// Returns `true` if there are no packages.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }

    /// Returns an iterator over all package indices in load order.
    #[inline]
    pub fn indices(&self) -> impl DoubleEndedIterator<Item = PackageIndex> + ExactSizeIterator {
        PackageIndex::range(self.len())
    }

    /// Returns an iterator over all packages in load order.
    #[inline]
    pub fn packages(&self) -> impl Iterator<Item = &Package> {
        self.packages.iter()
    }

    /// Returns the index of the package with the given id.
    #[inline]
    pub fn index_of(&self, id: PackageId) -> Option<PackageIndex> {
        self.by_id.get(&id).copied()
    }

    /// Returns the package at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    #[inline]
    pub fn package(&self, index: PackageIndex) -> &Package {
        debug_assert!(
            index.get() < self.len(),
            "called `Manifest::package` with index out of bounds: the len is {} but the index is {}",
            self.len(),
            index.get()
        );

        &self.packages[index.get()]
    }

    /// Returns the status of the package at `index`.
    #[inline]
    pub fn status(&self, index: PackageIndex) -> PackageStatus {
        self.package(index).status
    }

    /// Returns every package addressed to `location`, in load order.
    #[inline]
    pub fn at_destination(&self, location: LocationIndex) -> &[PackageIndex] {
        self.by_destination
            .get(&location)
            .map(SmallVec::as_slice)
            .unwrap_or(&[])
    }

    /// Returns the number of packages in `status`.
    #[inline]
    pub fn count(&self, status: PackageStatus) -> usize {
        self.buckets.len(status)
    }

    /// Returns the packages in `status` in load order.
    #[inline]
    pub fn bucket(&self, status: PackageStatus) -> impl Iterator<Item = PackageIndex> + '_ {
        self.buckets.members(status)
    }

    /// Moves a package to a new status.
    ///
    /// # Errors
    ///
    /// Returns a [`TransitionError`] if the lifecycle does not allow the move.
    /// The package is left unchanged in that case.
    pub fn transition(
        &mut self,
        index: PackageIndex,
        to: PackageStatus,
    ) -> Result<(), TransitionError> {
        let from = self.status(index);
        if !from.can_transition_to(to) {
            return Err(TransitionError {
                package: index,
                from,
                to,
            });
        }

        self.buckets.relocate(index, from, to);
        let package = &mut self.packages[index.get()];
        package.status = to;
        debug!(package = package.id, %from, %to, "status transition");
        Ok(())
    }

    /// Points a package at a new destination, keeping the per-destination
    /// index consistent.
    pub fn redirect(&mut self, index: PackageIndex, destination: LocationIndex, zip: &str) {
        let old = self.package(index).destination;
        if old != destination {
            if let Some(list) = self.by_destination.get_mut(&old) {
                list.retain(|p| *p != index);
                if list.is_empty() {
                    self.by_destination.remove(&old);
                }
            }
            let list = self.by_destination.entry(destination).or_default();
            let at = list.partition_point(|p| *p < index);
            list.insert(at, index);
        }

        let package = &mut self.packages[index.get()];
        package.destination = destination;
        package.zip = zip.to_owned();
    }

    /// Sets the scheduled arrival time of a package.
    #[inline]
    pub fn set_arrival_time(&mut self, index: PackageIndex, time: Seconds) {
        self.packages[index.get()].arrival_time = time;
    }

    /// Returns `true` if every package is in exactly one status bucket and
    /// that bucket matches the package's recorded status.
    pub fn check_partition(&self) -> bool {
        self.buckets.total() == self.len()
            && self
                .packages
                .iter()
                .enumerate()
                .all(|(i, p)| self.buckets.contains(p.status, PackageIndex::new(i)))
    }
}

fn hold_with_delayed(
    packages: &mut [Package],
    by_destination: &FxHashMap<LocationIndex, SmallVec<[PackageIndex; 4]>>,
) {
    for members in by_destination.values() {
        let release = members
            .iter()
            .filter_map(|p| match packages[p.get()].status {
                PackageStatus::Delayed => packages[p.get()].release_time,
                _ => None,
            })
            .reduce(f64::max);
        let Some(release) = release else {
            continue;
        };

        for p in members {
            let package = &mut packages[p.get()];
            if package.status == PackageStatus::AtHub {
                debug!(package = package.id, release, "held with delayed shipment");
                package.status = PackageStatus::Delayed;
                package.release_time = Some(release);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph() -> LocationGraph {
        LocationGraph::from_matrix(
            &["HUB", "A", "B"],
            &[[0.0, 1.0, 2.0], [1.0, 0.0, 1.5], [2.0, 1.5, 0.0]],
        )
        .expect("valid matrix")
    }

    fn p(i: usize) -> PackageIndex {
        PackageIndex::new(i)
    }

    #[test]
    fn test_initial_statuses_follow_notes() {
        let g = graph();
        let m = Manifest::from_records(
            &g,
            vec![
                PackageRecord::new(1, "A", END_OF_DAY),
                PackageRecord::new(2, "A", 37_800.0).with_note("Can only be on truck 2"),
                PackageRecord::new(3, "B", END_OF_DAY).with_note("Wrong address listed"),
                PackageRecord::new(4, "B", END_OF_DAY).with_note("Must be delivered with 1"),
            ],
        )
        .expect("valid manifest");

        assert_eq!(m.status(p(0)), PackageStatus::AtHub);
        assert_eq!(m.status(p(1)), PackageStatus::Preassigned);
        assert_eq!(m.status(p(2)), PackageStatus::CorrectionNeeded);
        assert_eq!(m.status(p(3)), PackageStatus::Bundling);
        assert_eq!(m.package(p(0)).arrival_time(), END_OF_DAY);
        assert!(m.check_partition());
    }

    #[test]
    fn test_duplicate_ids_are_rejected() {
        let g = graph();
        let err = Manifest::from_records(
            &g,
            vec![
                PackageRecord::new(7, "A", END_OF_DAY),
                PackageRecord::new(7, "B", END_OF_DAY),
            ],
        )
        .unwrap_err();
        assert_eq!(err, ManifestError::DuplicatePackage(7));
    }

    #[test]
    fn test_unknown_address_is_rejected() {
        let g = graph();
        let err = Manifest::from_records(&g, vec![PackageRecord::new(1, "Z", END_OF_DAY)])
            .unwrap_err();
        assert_eq!(
            err,
            ManifestError::Graph(GraphError::UnknownLocation("Z".to_owned()))
        );
    }

    #[test]
    fn test_packages_at_a_delayed_destination_are_held() {
        let g = graph();
        let m = Manifest::from_records(
            &g,
            vec![
                PackageRecord::new(1, "A", END_OF_DAY),
                PackageRecord::new(2, "A", END_OF_DAY)
                    .with_note("Delayed on flight---will not arrive to depot until 9:05 am"),
                PackageRecord::new(3, "A", END_OF_DAY).with_note("Can only be on truck 1"),
                PackageRecord::new(4, "B", END_OF_DAY),
            ],
        )
        .expect("valid manifest");

        assert_eq!(m.status(p(0)), PackageStatus::Delayed);
        assert_eq!(m.package(p(0)).release_time(), Some(32_700.0));
        assert_eq!(m.status(p(2)), PackageStatus::Preassigned);
        assert_eq!(m.status(p(3)), PackageStatus::AtHub);
        assert_eq!(m.count(PackageStatus::Delayed), 2);
    }

    #[test]
    fn test_transition_updates_bucket_and_rejects_illegal_moves() {
        let g = graph();
        let mut m = Manifest::from_records(&g, vec![PackageRecord::new(1, "A", END_OF_DAY)])
            .expect("valid manifest");

        m.transition(p(0), PackageStatus::OnTruck).expect("legal");
        assert_eq!(m.count(PackageStatus::AtHub), 0);
        assert_eq!(m.bucket(PackageStatus::OnTruck).collect::<Vec<_>>(), vec![p(0)]);

        m.transition(p(0), PackageStatus::Delivered).expect("legal");
        let err = m.transition(p(0), PackageStatus::AtHub).unwrap_err();
        assert_eq!(err.from, PackageStatus::Delivered);
        assert_eq!(m.status(p(0)), PackageStatus::Delivered);
        assert!(m.check_partition());
    }

    #[test]
    fn test_redirect_moves_destination_index() {
        let g = graph();
        let a = g.location("A").expect("exists");
        let b = g.location("B").expect("exists");
        let mut m = Manifest::from_records(
            &g,
            vec![
                PackageRecord::new(1, "B", END_OF_DAY),
                PackageRecord::new(2, "A", END_OF_DAY).with_locality("Salt Lake City", "UT", "84104"),
            ],
        )
        .expect("valid manifest");

        m.redirect(p(1), b, "84111");
        assert!(m.at_destination(a).is_empty());
        assert_eq!(m.at_destination(b), &[p(0), p(1)]);
        assert_eq!(m.package(p(1)).zip(), "84111");
        assert_eq!(m.package(p(1)).city(), "Salt Lake City");
    }

    #[test]
    fn test_on_time_compares_arrival_with_deadline() {
        let g = graph();
        let mut m = Manifest::from_records(&g, vec![PackageRecord::new(1, "A", 36_000.0)])
            .expect("valid manifest");
        assert!(!m.package(p(0)).is_on_time());
        m.set_arrival_time(p(0), 35_000.0);
        assert!(m.package(p(0)).is_on_time());
    }
}
