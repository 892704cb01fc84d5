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

//! The road network between delivery addresses.
//!
//! `LocationGraph` is a plain adjacency structure: labels, an adjacency list
//! per location, and a weight map keyed by the ordered `(from, to)` pair. It
//! carries no path-finding state of its own; shortest-path searches borrow
//! the graph immutably and return their own result buffers.

use crate::index::LocationIndex;
use courier_core::num::round::{WEIGHT_PRECISION, round_to_places};
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

/// The error type for graph construction and lookups.
#[derive(Debug, Clone, PartialEq)]
pub enum GraphError {
    /// No location carries the requested label.
    UnknownLocation(String),
    /// A location index lies outside the graph.
    UnknownLocationIndex(LocationIndex),
    /// A distance matrix could not be turned into a road network.
    InvalidMatrix(String),
}

impl std::fmt::Display for GraphError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownLocation(label) => write!(f, "Unknown location '{}'", label),
            Self::UnknownLocationIndex(index) => {
                write!(f, "Location index {} is out of bounds", index)
            }
            Self::InvalidMatrix(reason) => write!(f, "Invalid distance matrix: {}", reason),
        }
    }
}

impl std::error::Error for GraphError {}

/// An undirected, weighted graph of delivery addresses.
///
/// Roads are stored as directed edges; [`LocationGraph::add_route`] inserts
/// both directions so that a graph built only through it is symmetric.
#[derive(Debug, Clone, Default)]
pub struct LocationGraph {
    labels: Vec<String>,
    by_label: FxHashMap<String, LocationIndex>,
    adjacency: Vec<SmallVec<[LocationIndex; 8]>>,
    weights: FxHashMap<(LocationIndex, LocationIndex), f64>,
}

impl LocationGraph {
    /// Creates an empty graph.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty graph with room for `num_locations` locations.
    #[inline]
    pub fn with_capacity(num_locations: usize) -> Self {
        Self {
            labels: Vec::with_capacity(num_locations),
            by_label: FxHashMap::with_capacity_and_hasher(num_locations, Default::default()),
            adjacency: Vec::with_capacity(num_locations),
            weights: FxHashMap::default(),
        }
    }

    /// Builds a fully connected graph from a list of labels and a symmetric
    /// distance matrix.
    ///
    /// Weights are rounded to two decimal places. Diagonal entries are
    /// ignored. Duplicate labels collapse onto the first occurrence and are
    /// rejected, since the matrix rows would no longer line up.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::InvalidMatrix`] if the matrix is not square with
    /// one row per label, is not symmetric, or holds a negative or
    /// non-finite distance.
    pub fn from_matrix<S, R>(labels: &[S], matrix: &[R]) -> Result<Self, GraphError>
    where
        S: AsRef<str>,
        R: AsRef<[f64]>,
    {
        let n = labels.len();
        if matrix.len() != n {
            return Err(GraphError::InvalidMatrix(format!(
                "expected {} rows but found {}",
                n,
                matrix.len()
            )));
        }
        for (i, row) in matrix.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != n {
                return Err(GraphError::InvalidMatrix(format!(
                    "row {} has {} columns but expected {}",
                    i,
                    row.len(),
                    n
                )));
            }
        }

        let mut graph = Self::with_capacity(n);
        for label in labels {
            graph.add_location(label.as_ref());
        }
        if graph.num_locations() != n {
            return Err(GraphError::InvalidMatrix("duplicate location labels".to_owned()));
        }

        for i in 0..n {
            for j in (i + 1)..n {
                let forward = matrix[i].as_ref()[j];
                let backward = matrix[j].as_ref()[i];
                if !forward.is_finite() || forward < 0.0 {
                    return Err(GraphError::InvalidMatrix(format!(
                        "distance ({}, {}) = {} is not a finite non-negative number",
                        i, j, forward
                    )));
                }
                let weight = round_to_places(forward, WEIGHT_PRECISION);
                if weight != round_to_places(backward, WEIGHT_PRECISION) {
                    return Err(GraphError::InvalidMatrix(format!(
                        "distance ({}, {}) = {} differs from ({}, {}) = {}",
                        i, j, forward, j, i, backward
                    )));
                }
                graph.add_route(LocationIndex::new(i), LocationIndex::new(j), weight);
            }
        }

        Ok(graph)
    }

    /// Adds a location with the given label and returns its index.
    ///
    /// Adding a label twice returns the existing index.
    pub fn add_location(&mut self, label: &str) -> LocationIndex {
        if let Some(&index) = self.by_label.get(label) {
            return index;
        }

        let index = LocationIndex::new(self.labels.len());
        self.labels.push(label.to_owned());
        self.by_label.insert(label.to_owned(), index);
        self.adjacency.push(SmallVec::new());
        index
    }

    /// Adds a one-way road from `from` to `to`.
    ///
    /// Re-adding an existing road replaces its weight.
    ///
    /// # Panics
    ///
    /// In debug builds, panics if either endpoint is out of bounds.
    pub fn add_directed_road(&mut self, from: LocationIndex, to: LocationIndex, weight: f64) {
        debug_assert!(
            from.get() < self.num_locations(),
            "called `LocationGraph::add_directed_road` with from index out of bounds: the len is {} but the index is {}",
            self.num_locations(),
            from.get()
        );
        debug_assert!(
            to.get() < self.num_locations(),
            "called `LocationGraph::add_directed_road` with to index out of bounds: the len is {} but the index is {}",
            self.num_locations(),
            to.get()
        );

        if self.weights.insert((from, to), weight).is_none() {
            self.adjacency[from.get()].push(to);
        }
    }

    /// Adds a two-way road between `a` and `b`.
    #[inline]
    pub fn add_route(&mut self, a: LocationIndex, b: LocationIndex, weight: f64) {
        self.add_directed_road(a, b, weight);
        self.add_directed_road(b, a, weight);
    }

    /// Looks up a location by its label.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::UnknownLocation`] if no location has this label.
    #[inline]
    pub fn location(&self, label: &str) -> Result<LocationIndex, GraphError> {
        self.by_label
            .get(label)
            .copied()
            .ok_or_else(|| GraphError::UnknownLocation(label.to_owned()))
    }

    /// Returns `true` if `index` refers to a location of this graph.
    #[inline]
    pub fn contains(&self, index: LocationIndex) -> bool {
        index.get() < self.labels.len()
    }

    /// Returns the label of a location.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    #[inline]
    pub fn label(&self, index: LocationIndex) -> &str {
        debug_assert!(
            self.contains(index),
            "called `LocationGraph::label` with index out of bounds: the len is {} but the index is {}",
            self.num_locations(),
            index.get()
        );

        &self.labels[index.get()]
    }

    /// Returns the number of locations.
    #[inline]
    pub fn num_locations(&self) -> usize {
        self.labels.len()
    }

    /// Returns the number of directed roads.
    #[inline]
    pub fn num_roads(&self) -> usize {
        self.weights.len()
    }

    /// Returns the locations reachable over one road from `index`, in
    /// insertion order.
    #[inline]
    pub fn neighbors(&self, index: LocationIndex) -> &[LocationIndex] {
        debug_assert!(
            self.contains(index),
            "called `LocationGraph::neighbors` with index out of bounds: the len is {} but the index is {}",
            self.num_locations(),
            index.get()
        );

        &self.adjacency[index.get()]
    }

    /// Returns the weight of the road from `from` to `to`, if there is one.
    #[inline]
    pub fn edge_weight(&self, from: LocationIndex, to: LocationIndex) -> Option<f64> {
        self.weights.get(&(from, to)).copied()
    }

    /// Returns an iterator over all location indices.
    #[inline]
    pub fn locations(&self) -> impl DoubleEndedIterator<Item = LocationIndex> + ExactSizeIterator {
        LocationIndex::range(self.num_locations())
    }

    /// Returns `true` if every location can reach every other location.
    pub fn is_connected(&self) -> bool {
        let n = self.num_locations();
        if n == 0 {
            return true;
        }

        let mut seen = fixedbitset::FixedBitSet::with_capacity(n);
        let mut stack = vec![LocationIndex::new(0)];
        seen.insert(0);
        while let Some(current) = stack.pop() {
            for &next in self.neighbors(current) {
                if !seen.put(next.get()) {
                    stack.push(next);
                }
            }
        }
        // Roads added through `add_route` are symmetric, so one sweep from
        // any vertex suffices when the weight map is symmetric too.
        seen.count_ones(..) == n && self.is_symmetric()
    }

    /// Returns `true` if every road has a reverse road of equal weight.
    pub fn is_symmetric(&self) -> bool {
        self.weights
            .iter()
            .all(|(&(a, b), &w)| self.weights.get(&(b, a)) == Some(&w))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> LocationGraph {
        LocationGraph::from_matrix(
            &["HUB", "A", "B"],
            &[
                [0.0, 1.0, 4.0],
                [1.0, 0.0, 2.0],
                [4.0, 2.0, 0.0],
            ],
        )
        .expect("valid matrix")
    }

    #[test]
    fn test_add_location_is_idempotent() {
        let mut g = LocationGraph::new();
        let a = g.add_location("A");
        let b = g.add_location("B");
        assert_eq!(g.add_location("A"), a);
        assert_ne!(a, b);
        assert_eq!(g.num_locations(), 2);
    }

    #[test]
    fn test_add_route_is_symmetric() {
        let mut g = LocationGraph::new();
        let a = g.add_location("A");
        let b = g.add_location("B");
        g.add_route(a, b, 3.5);
        assert_eq!(g.edge_weight(a, b), Some(3.5));
        assert_eq!(g.edge_weight(b, a), Some(3.5));
        assert_eq!(g.neighbors(a), &[b]);
        assert!(g.is_connected());
    }

    #[test]
    fn test_readding_road_updates_weight_without_duplicating_neighbor() {
        let mut g = LocationGraph::new();
        let a = g.add_location("A");
        let b = g.add_location("B");
        g.add_route(a, b, 3.0);
        g.add_route(a, b, 1.0);
        assert_eq!(g.edge_weight(a, b), Some(1.0));
        assert_eq!(g.neighbors(a).len(), 1);
        assert_eq!(g.num_roads(), 2);
    }

    #[test]
    fn test_unknown_label_is_an_error() {
        let g = triangle();
        assert_eq!(
            g.location("Nowhere"),
            Err(GraphError::UnknownLocation("Nowhere".to_owned()))
        );
        assert_eq!(g.location("B").map(|i| i.get()), Ok(2));
        assert_eq!(g.label(LocationIndex::new(1)), "A");
    }

    #[test]
    fn test_from_matrix_rounds_to_two_places() {
        let g = LocationGraph::from_matrix(&["X", "Y"], &[[0.0, 1.23456], [1.23456, 0.0]])
            .expect("valid matrix");
        assert_eq!(
            g.edge_weight(LocationIndex::new(0), LocationIndex::new(1)),
            Some(1.23)
        );
    }

    #[test]
    fn test_from_matrix_rejects_bad_input() {
        let asym = LocationGraph::from_matrix(&["X", "Y"], &[[0.0, 1.0], [2.0, 0.0]]);
        assert!(matches!(asym, Err(GraphError::InvalidMatrix(_))));

        let negative = LocationGraph::from_matrix(&["X", "Y"], &[[0.0, -1.0], [-1.0, 0.0]]);
        assert!(matches!(negative, Err(GraphError::InvalidMatrix(_))));

        let nan = LocationGraph::from_matrix(&["X", "Y"], &[[0.0, f64::NAN], [f64::NAN, 0.0]]);
        assert!(matches!(nan, Err(GraphError::InvalidMatrix(_))));

        let ragged: Vec<Vec<f64>> = vec![vec![0.0, 1.0], vec![1.0]];
        let ragged = LocationGraph::from_matrix(&["X", "Y"], &ragged);
        assert!(matches!(ragged, Err(GraphError::InvalidMatrix(_))));

        let duplicate = LocationGraph::from_matrix(&["X", "X"], &[[0.0, 1.0], [1.0, 0.0]]);
        assert!(matches!(duplicate, Err(GraphError::InvalidMatrix(_))));
    }

    #[test]
    fn test_disconnected_graph_is_detected() {
        let mut g = LocationGraph::new();
        let a = g.add_location("A");
        let b = g.add_location("B");
        g.add_location("C");
        g.add_route(a, b, 1.0);
        assert!(!g.is_connected());
    }

    #[test]
    fn test_one_way_road_breaks_symmetry() {
        let mut g = triangle();
        let hub = g.location("HUB").expect("hub exists");
        let d = g.add_location("D");
        g.add_directed_road(hub, d, 1.0);
        assert!(!g.is_symmetric());
        assert!(!g.is_connected());
    }
}
