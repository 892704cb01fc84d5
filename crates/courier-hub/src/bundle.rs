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

//! Bundle groups.
//!
//! Packages that must be delivered together form a group. Groups are kept
//! as a disjoint-set forest over package indices with union by rank, so
//! merging two groups that share a member is a single `union` and
//! membership is transitive without any re-keying.
//!
//! Only packages that were explicitly inserted (directly or through a
//! `union`) are members; every other package is outside all groups.

use courier_model::index::PackageIndex;
use fixedbitset::FixedBitSet;
use smallvec::SmallVec;

/// Disjoint sets of packages that travel together.
#[derive(Debug, Clone)]
pub struct BundleGroups {
    parent: Vec<usize>,
    rank: Vec<u8>,
    members: FixedBitSet,
}

impl BundleGroups {
    /// Creates an empty forest over `num_packages` packages.
    pub fn new(num_packages: usize) -> Self {
        Self {
            parent: (0..num_packages).collect(),
            rank: vec![0; num_packages],
            members: FixedBitSet::with_capacity(num_packages),
        }
    }

    /// Returns the number of packages the forest ranges over.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.parent.len()
    }

    /// Makes `package` a member, in a group of its own if it was not one yet.
    #[inline]
    pub fn insert(&mut self, package: PackageIndex) {
        debug_assert!(
            package.get() < self.capacity(),
            "called `BundleGroups::insert` with package index out of bounds: the len is {} but the index is {}",
            self.capacity(),
            package.get()
        );

        self.members.insert(package.get());
    }

    /// Merges the groups of `a` and `b`, inserting either if needed.
    ///
    /// Returns `true` if two distinct groups were merged.
    pub fn union(&mut self, a: PackageIndex, b: PackageIndex) -> bool {
        self.insert(a);
        self.insert(b);

        let ra = self.find_compress(a.get());
        let rb = self.find_compress(b.get());
        if ra == rb {
            return false;
        }

        match self.rank[ra].cmp(&self.rank[rb]) {
            std::cmp::Ordering::Less => self.parent[ra] = rb,
            std::cmp::Ordering::Greater => self.parent[rb] = ra,
            std::cmp::Ordering::Equal => {
                self.parent[rb] = ra;
                self.rank[ra] = self.rank[ra].saturating_add(1);
            }
        }
        true
    }

    /// Returns `true` if `package` belongs to some group.
    #[inline]
    pub fn contains(&self, package: PackageIndex) -> bool {
        self.members.contains(package.get())
    }

    /// Returns `true` if both packages are members of the same group.
    #[inline]
    pub fn same_group(&self, a: PackageIndex, b: PackageIndex) -> bool {
        self.contains(a) && self.contains(b) && self.root(a.get()) == self.root(b.get())
    }

    /// Returns the group of `package` in ascending index order, or an empty
    /// list if it is not a member.
    pub fn group_of(&self, package: PackageIndex) -> SmallVec<[PackageIndex; 8]> {
        if !self.contains(package) {
            return SmallVec::new();
        }

        let root = self.root(package.get());
        self.members
            .ones()
            .filter(|&i| self.root(i) == root)
            .map(PackageIndex::new)
            .collect()
    }

    /// Returns every member in ascending index order.
    #[inline]
    pub fn members(&self) -> impl Iterator<Item = PackageIndex> + '_ {
        self.members.ones().map(PackageIndex::new)
    }

    /// Returns the number of members.
    #[inline]
    pub fn num_members(&self) -> usize {
        self.members.count_ones(..)
    }

    /// Returns all groups, each in ascending order, ordered by their
    /// smallest member.
    pub fn groups(&self) -> Vec<SmallVec<[PackageIndex; 8]>> {
        let mut groups: Vec<SmallVec<[PackageIndex; 8]>> = Vec::new();
        let mut roots: Vec<usize> = Vec::new();
        for i in self.members.ones() {
            let root = self.root(i);
            match roots.iter().position(|&r| r == root) {
                Some(g) => groups[g].push(PackageIndex::new(i)),
                None => {
                    roots.push(root);
                    groups.push(smallvec::smallvec![PackageIndex::new(i)]);
                }
            }
        }
        groups
    }

    #[inline]
    fn root(&self, mut i: usize) -> usize {
        while self.parent[i] != i {
            i = self.parent[i];
        }
        i
    }

    #[inline]
    fn find_compress(&mut self, mut i: usize) -> usize {
        while self.parent[i] != i {
            self.parent[i] = self.parent[self.parent[i]];
            i = self.parent[i];
        }
        i
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(i: usize) -> PackageIndex {
        PackageIndex::new(i)
    }

    #[test]
    fn test_non_members_have_no_group() {
        let g = BundleGroups::new(4);
        assert!(!g.contains(p(0)));
        assert!(g.group_of(p(0)).is_empty());
        assert_eq!(g.num_members(), 0);
    }

    #[test]
    fn test_insert_creates_singleton() {
        let mut g = BundleGroups::new(4);
        g.insert(p(2));
        assert_eq!(g.group_of(p(2)).as_slice(), &[p(2)]);
        assert!(g.same_group(p(2), p(2)));
    }

    #[test]
    fn test_union_is_transitive() {
        let mut g = BundleGroups::new(6);
        assert!(g.union(p(0), p(1)));
        assert!(g.union(p(3), p(4)));
        assert!(!g.same_group(p(0), p(4)));
        assert!(g.union(p(1), p(3)));
        assert!(!g.union(p(0), p(4)));
        assert!(g.same_group(p(0), p(4)));
        assert_eq!(g.group_of(p(4)).as_slice(), &[p(0), p(1), p(3), p(4)]);
        assert!(!g.contains(p(2)));
    }

    #[test]
    fn test_groups_are_ordered_by_smallest_member() {
        let mut g = BundleGroups::new(6);
        g.union(p(5), p(1));
        g.union(p(4), p(0));
        g.insert(p(3));
        let groups = g.groups();
        assert_eq!(groups.len(), 3);
        assert_eq!(groups[0].as_slice(), &[p(0), p(4)]);
        assert_eq!(groups[1].as_slice(), &[p(1), p(5)]);
        assert_eq!(groups[2].as_slice(), &[p(3)]);
    }

    #[test]
    fn test_long_chains_stay_consistent() {
        let mut g = BundleGroups::new(64);
        for i in 1..64 {
            g.union(p(i - 1), p(i));
        }
        assert_eq!(g.group_of(p(17)).len(), 64);
        assert_eq!(g.groups().len(), 1);
    }
}
