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

//! Dense single-source shortest paths.
//!
//! The graphs this engine routes over are small and close to complete, so the
//! search scans all unvisited vertices for the minimum instead of keeping a
//! heap: `O(V²)` per source. Accumulated distances are rounded to
//! [`DISTANCE_PRECISION`] places after every relaxation.
//!
//! A [`PathFinder`] only borrows the graph. Each search allocates and returns
//! its own [`ShortestPaths`], so results from different sources can be held
//! side by side.

use courier_core::num::round::{DISTANCE_PRECISION, round_to_places};
use courier_model::{
    graph::{GraphError, LocationGraph},
    index::LocationIndex,
};
use fixedbitset::FixedBitSet;

/// The error type for route queries.
#[derive(Debug, Clone, PartialEq)]
pub enum RoutingError {
    /// No sequence of roads leads from `from` to `to`.
    Unreachable {
        from: LocationIndex,
        to: LocationIndex,
    },
    /// A label or index lookup failed.
    Graph(GraphError),
}

impl std::fmt::Display for RoutingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unreachable { from, to } => write!(f, "No route from {} to {}", from, to),
            Self::Graph(e) => write!(f, "Graph error: {}", e),
        }
    }
}

impl std::error::Error for RoutingError {}

impl From<GraphError> for RoutingError {
    fn from(e: GraphError) -> Self {
        Self::Graph(e)
    }
}

/// A shortest route between two locations.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    distance: f64,
    path: Vec<LocationIndex>,
}

impl Route {
    /// The total length of the route.
    #[inline]
    pub fn distance(&self) -> f64 {
        self.distance
    }

    /// The visited locations, source first and target last.
    #[inline]
    pub fn path(&self) -> &[LocationIndex] {
        &self.path
    }

    #[inline]
    pub fn into_path(self) -> Vec<LocationIndex> {
        self.path
    }
}

/// The result of one single-source search.
#[derive(Debug, Clone, PartialEq)]
pub struct ShortestPaths {
    source: LocationIndex,
    distances: Vec<f64>,
    predecessors: Vec<Option<LocationIndex>>,
}

impl ShortestPaths {
    /// The location the search started from.
    #[inline]
    pub fn source(&self) -> LocationIndex {
        self.source
    }

    /// Returns the shortest distance to `target`, or `None` if it cannot be
    /// reached.
    #[inline]
    pub fn distance_to(&self, target: LocationIndex) -> Option<f64> {
        debug_assert!(
            target.get() < self.distances.len(),
            "called `ShortestPaths::distance_to` with target index out of bounds: the len is {} but the index is {}",
            self.distances.len(),
            target.get()
        );

        let d = self.distances[target.get()];
        d.is_finite().then_some(d)
    }

    /// Returns the locations on a shortest path from the source to `target`,
    /// source first. `None` if `target` cannot be reached.
    pub fn path_to(&self, target: LocationIndex) -> Option<Vec<LocationIndex>> {
        self.distance_to(target)?;

        let mut path = vec![target];
        let mut current = target;
        while let Some(previous) = self.predecessors[current.get()] {
            path.push(previous);
            current = previous;
        }
        path.reverse();

        debug_assert_eq!(path.first(), Some(&self.source));
        Some(path)
    }

    /// Returns the shortest route from the source to `target`.
    ///
    /// # Errors
    ///
    /// Returns [`RoutingError::Unreachable`] if no road sequence reaches `target`.
    pub fn route_to(&self, target: LocationIndex) -> Result<Route, RoutingError> {
        let unreachable = RoutingError::Unreachable {
            from: self.source,
            to: target,
        };
        let distance = self.distance_to(target).ok_or_else(|| unreachable.clone())?;
        let path = self.path_to(target).ok_or(unreachable)?;
        Ok(Route { distance, path })
    }
}

/// Shortest-path queries over a borrowed road network.
#[derive(Debug, Clone, Copy)]
pub struct PathFinder<'g> {
    graph: &'g LocationGraph,
}

impl<'g> PathFinder<'g> {
    #[inline]
    pub fn new(graph: &'g LocationGraph) -> Self {
        Self { graph }
    }

    #[inline]
    pub fn graph(&self) -> &'g LocationGraph {
        self.graph
    }

    /// Runs a full search from `source`.
    ///
    /// Among equally distant candidates the lowest location index is settled
    /// first; a distance is only replaced by a strictly shorter one, so the
    /// first-found predecessor wins ties.
    ///
    /// # Panics
    ///
    /// In debug builds, panics if `source` is out of bounds.
    pub fn from_source(&self, source: LocationIndex) -> ShortestPaths {
        let n = self.graph.num_locations();
        debug_assert!(
            source.get() < n,
            "called `PathFinder::from_source` with source index out of bounds: the len is {} but the index is {}",
            n,
            source.get()
        );

        let mut distances = vec![f64::INFINITY; n];
        let mut predecessors = vec![None; n];
        let mut settled = FixedBitSet::with_capacity(n);
        distances[source.get()] = 0.0;

        loop {
            let next = (0..n)
                .filter(|&i| !settled.contains(i) && distances[i].is_finite())
                .min_by(|&a, &b| distances[a].total_cmp(&distances[b]));
            let Some(u) = next else {
                break;
            };

            settled.insert(u);
            let from = LocationIndex::new(u);

            for &to in self.graph.neighbors(from) {
                if settled.contains(to.get()) {
                    continue;
                }
                let Some(weight) = self.graph.edge_weight(from, to) else {
                    continue;
                };

                let candidate = round_to_places(distances[u] + weight, DISTANCE_PRECISION);
                if candidate < distances[to.get()] {
                    distances[to.get()] = candidate;
                    predecessors[to.get()] = Some(from);
                }
            }
        }

        ShortestPaths {
            source,
            distances,
            predecessors,
        }
    }

    /// Returns a shortest route from `source` to `target`.
    ///
    /// # Errors
    ///
    /// Returns [`RoutingError::Unreachable`] if `target` cannot be reached.
    #[inline]
    pub fn shortest_path(
        &self,
        source: LocationIndex,
        target: LocationIndex,
    ) -> Result<Route, RoutingError> {
        self.from_source(source).route_to(target)
    }

    /// Returns the shortest distance between two locations.
    #[inline]
    pub fn distance(&self, a: LocationIndex, b: LocationIndex) -> Result<f64, RoutingError> {
        self.from_source(a)
            .distance_to(b)
            .ok_or(RoutingError::Unreachable { from: a, to: b })
    }

    /// Returns the shortest distance between two locations given by label.
    ///
    /// # Errors
    ///
    /// Returns [`RoutingError::Graph`] if either label is unknown.
    pub fn distance_between(&self, a: &str, b: &str) -> Result<f64, RoutingError> {
        let a = self.graph.location(a)?;
        let b = self.graph.location(b)?;
        self.distance(a, b)
    }
}
