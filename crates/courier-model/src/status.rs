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

//! Package lifecycle states.
//!
//! `PackageStatus` is the state machine every package moves through, and
//! `StatusBuckets` is a secondary index answering "which packages are in
//! state X" without scanning the manifest.
//!
//! The legal transitions are:
//!
//! | From               | To                        | Trigger                                    |
//! | :----------------- | :------------------------ | :----------------------------------------- |
//! | `AtHub`            | `OnTruck`, `Bundled`      | loaded; joined a bundle by shared address  |
//! | `Bundling`         | `Bundled`, `OnTruck`      | bundle merge; loaded                       |
//! | `Bundled`          | `OnTruck`                 | loaded with its bundle                     |
//! | `Preassigned`      | `OnTruck`                 | force-loaded onto its designated truck     |
//! | `Delayed`          | `AtHub`                   | late arrival event fired                   |
//! | `CorrectionNeeded` | `AtHub`                   | address correction applied                 |
//! | `OnTruck`          | `Delivered`, `AtHub`      | arrival time reached; recalled to the hub  |
//! | `Delivered`        | (none)                    | terminal                                   |

use crate::index::PackageIndex;
use fixedbitset::FixedBitSet;

/// The lifecycle state of a package.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PackageStatus {
    AtHub,
    Preassigned,
    Bundling,
    Bundled,
    Delayed,
    CorrectionNeeded,
    OnTruck,
    Delivered,
}

impl PackageStatus {
    /// Every status, in bucket order.
    pub const ALL: [PackageStatus; 8] = [
        PackageStatus::AtHub,
        PackageStatus::Preassigned,
        PackageStatus::Bundling,
        PackageStatus::Bundled,
        PackageStatus::Delayed,
        PackageStatus::CorrectionNeeded,
        PackageStatus::OnTruck,
        PackageStatus::Delivered,
    ];

    /// The number of distinct statuses.
    pub const COUNT: usize = Self::ALL.len();

    /// Returns the bucket slot of this status.
    #[inline]
    pub const fn slot(self) -> usize {
        self as usize
    }

    /// Returns `true` if the state machine allows moving from `self` to `next`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use courier_model::status::PackageStatus;
    ///
    /// assert!(PackageStatus::AtHub.can_transition_to(PackageStatus::OnTruck));
    /// assert!(!PackageStatus::Delivered.can_transition_to(PackageStatus::AtHub));
    /// ```
    #[inline]
    pub const fn can_transition_to(self, next: PackageStatus) -> bool {
        use PackageStatus::*;
        matches!(
            (self, next),
            (AtHub, OnTruck | Bundled)
                | (Bundling, Bundled | OnTruck)
                | (Bundled, OnTruck)
                | (Preassigned, OnTruck)
                | (Delayed, AtHub)
                | (CorrectionNeeded, AtHub)
                | (OnTruck, Delivered | AtHub)
        )
    }

    /// Returns `true` for packages waiting at the hub that may be selected for
    /// loading.
    #[inline]
    pub const fn is_pending(self) -> bool {
        matches!(
            self,
            PackageStatus::AtHub | PackageStatus::Bundling | PackageStatus::Bundled
        )
    }

    /// Returns `true` if a load request may move this package onto a truck.
    #[inline]
    pub const fn is_loadable(self) -> bool {
        self.is_pending() || matches!(self, PackageStatus::Preassigned)
    }

    /// Returns `true` once the package has been delivered.
    #[inline]
    pub const fn is_terminal(self) -> bool {
        matches!(self, PackageStatus::Delivered)
    }
}

impl std::fmt::Display for PackageStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            PackageStatus::AtHub => "At hub",
            PackageStatus::Preassigned => "Preassigned",
            PackageStatus::Bundling => "Bundling",
            PackageStatus::Bundled => "Bundled",
            PackageStatus::Delayed => "Delayed",
            PackageStatus::CorrectionNeeded => "Correction needed",
            PackageStatus::OnTruck => "On truck",
            PackageStatus::Delivered => "Delivered",
        };
        f.write_str(s)
    }
}

/// The error returned when a requested status change is not an edge of the
/// lifecycle state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionError {
    /// The package whose status change was rejected.
    pub package: PackageIndex,
    /// The package's current status.
    pub from: PackageStatus,
    /// The requested status.
    pub to: PackageStatus,
}

impl std::fmt::Display for TransitionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Illegal status transition for {}: {} -> {}",
            self.package, self.from, self.to
        )
    }
}

impl std::error::Error for TransitionError {}

/// A per-status membership index over a fixed package universe.
///
/// Every package is a member of exactly one bucket. The index is only ever
/// mutated through [`StatusBuckets::relocate`], which removes the package from
/// one bucket and inserts it into another in a single step.
#[derive(Debug, Clone)]
pub struct StatusBuckets {
    buckets: [FixedBitSet; PackageStatus::COUNT],
}

impl StatusBuckets {
    /// Creates an index with room for `num_packages` packages and no members.
    pub fn new(num_packages: usize) -> Self {
        Self {
            buckets: std::array::from_fn(|_| FixedBitSet::with_capacity(num_packages)),
        }
    }

    /// Returns the number of package slots.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.buckets[0].len()
    }

    /// Inserts a package that is not yet a member of any bucket.
    ///
    /// # Panics
    ///
    /// Panics if `package` is out of bounds.
    #[inline]
    pub fn insert(&mut self, package: PackageIndex, status: PackageStatus) {
        debug_assert!(
            self.status_of(package).is_none(),
            "called `StatusBuckets::insert` for {} which is already in a bucket",
            package
        );

        self.buckets[status.slot()].insert(package.get());
    }

    /// Moves `package` from the `from` bucket to the `to` bucket.
    ///
    /// # Panics
    ///
    /// Panics if `package` is out of bounds. In debug builds, panics if the
    /// package is not a member of `from`.
    #[inline]
    pub fn relocate(&mut self, package: PackageIndex, from: PackageStatus, to: PackageStatus) {
        let index = package.get();
        debug_assert!(
            self.buckets[from.slot()].contains(index),
            "called `StatusBuckets::relocate` for {} which is not in bucket {}",
            package,
            from
        );

        self.buckets[from.slot()].set(index, false);
        self.buckets[to.slot()].insert(index);
    }

    /// Returns the number of packages in the bucket of `status`.
    #[inline]
    pub fn len(&self, status: PackageStatus) -> usize {
        self.buckets[status.slot()].count_ones(..)
    }

    /// Returns `true` if the bucket of `status` is empty.
    #[inline]
    pub fn is_empty(&self, status: PackageStatus) -> bool {
        self.buckets[status.slot()].count_ones(..) == 0
    }

    /// Returns `true` if `package` is in the bucket of `status`.
    #[inline]
    pub fn contains(&self, status: PackageStatus, package: PackageIndex) -> bool {
        self.buckets[status.slot()].contains(package.get())
    }

    /// Returns the members of the bucket of `status` in ascending index order.
    #[inline]
    pub fn members(&self, status: PackageStatus) -> impl Iterator<Item = PackageIndex> + '_ {
        self.buckets[status.slot()].ones().map(PackageIndex::new)
    }

    /// Returns the bucket `package` belongs to, if any.
    pub fn status_of(&self, package: PackageIndex) -> Option<PackageStatus> {
        PackageStatus::ALL
            .into_iter()
            .find(|s| self.buckets[s.slot()].contains(package.get()))
    }

    /// Returns the sum of all bucket sizes.
    pub fn total(&self) -> usize {
        PackageStatus::ALL.into_iter().map(|s| self.len(s)).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(i: usize) -> PackageIndex {
        PackageIndex::new(i)
    }

    #[test]
    fn test_delivered_is_terminal() {
        for next in PackageStatus::ALL {
            assert!(!PackageStatus::Delivered.can_transition_to(next));
        }
        assert!(PackageStatus::Delivered.is_terminal());
    }

    #[test]
    fn test_only_documented_edges_are_allowed() {
        use PackageStatus::*;
        let allowed = [
            (AtHub, OnTruck),
            (AtHub, Bundled),
            (Bundling, Bundled),
            (Bundling, OnTruck),
            (Bundled, OnTruck),
            (Preassigned, OnTruck),
            (Delayed, AtHub),
            (CorrectionNeeded, AtHub),
            (OnTruck, Delivered),
            (OnTruck, AtHub),
        ];
        let mut count = 0;
        for from in PackageStatus::ALL {
            for to in PackageStatus::ALL {
                let expected = allowed.contains(&(from, to));
                assert_eq!(from.can_transition_to(to), expected, "{from} -> {to}");
                count += usize::from(expected);
            }
        }
        assert_eq!(count, allowed.len());
    }

    #[test]
    fn test_pending_and_loadable() {
        assert!(PackageStatus::Bundled.is_pending());
        assert!(!PackageStatus::Preassigned.is_pending());
        assert!(PackageStatus::Preassigned.is_loadable());
        assert!(!PackageStatus::Delayed.is_loadable());
        assert!(!PackageStatus::OnTruck.is_loadable());
    }

    #[test]
    fn test_relocate_keeps_partition() {
        let mut buckets = StatusBuckets::new(3);
        buckets.insert(p(0), PackageStatus::AtHub);
        buckets.insert(p(1), PackageStatus::AtHub);
        buckets.insert(p(2), PackageStatus::Delayed);
        assert_eq!(buckets.total(), 3);

        buckets.relocate(p(1), PackageStatus::AtHub, PackageStatus::OnTruck);
        assert_eq!(buckets.len(PackageStatus::AtHub), 1);
        assert_eq!(buckets.len(PackageStatus::OnTruck), 1);
        assert_eq!(buckets.status_of(p(1)), Some(PackageStatus::OnTruck));
        assert_eq!(buckets.total(), 3);
    }

    #[test]
    fn test_members_are_ascending() {
        let mut buckets = StatusBuckets::new(4);
        for i in [3, 0, 2, 1] {
            buckets.insert(p(i), PackageStatus::AtHub);
        }
        let members: Vec<usize> = buckets
            .members(PackageStatus::AtHub)
            .map(|i| i.get())
            .collect();
        assert_eq!(members, vec![0, 1, 2, 3]);
        assert!(buckets.is_empty(PackageStatus::Delivered));
    }

    #[test]
    fn test_display_uses_table_wording() {
        assert_eq!(PackageStatus::CorrectionNeeded.to_string(), "Correction needed");
        assert_eq!(PackageStatus::OnTruck.to_string(), "On truck");
    }
}
