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

use courier_model::{
    graph::GraphError,
    index::{PackageIndex, TruckIndex},
    instruction::PackageId,
    package::ManifestError,
    status::{PackageStatus, TransitionError},
};
use courier_route::path::RoutingError;

/// The error type for hub operations.
///
/// Every variant aborts the operation that produced it; the hub makes no
/// attempt to continue with partial state.
#[derive(Debug, Clone, PartialEq)]
pub enum HubError {
    /// A bundle note names a package id that is not in the manifest.
    UnknownCompanion {
        package: PackageId,
        companion: PackageId,
    },
    /// An event names a package id that is not in the manifest.
    UnknownPackage(PackageId),
    /// A preassignment names a truck the fleet does not have.
    TruckOutOfRange {
        package: PackageId,
        truck: usize,
        fleet_size: usize,
    },
    /// A forced load does not fit on the designated truck.
    CapacityExceeded {
        package: PackageId,
        truck: usize,
        capacity: usize,
    },
    /// A status change that the lifecycle does not allow.
    InvalidTransition(TransitionError),
    Manifest(ManifestError),
    Graph(GraphError),
    Routing(RoutingError),
}

impl std::fmt::Display for HubError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownCompanion { package, companion } => write!(
                f,
                "Package {} must be delivered with unknown package {}",
                package, companion
            ),
            Self::UnknownPackage(id) => write!(f, "Unknown package {}", id),
            Self::TruckOutOfRange {
                package,
                truck,
                fleet_size,
            } => write!(
                f,
                "Package {} is assigned to truck {} but the fleet has {} trucks",
                package, truck, fleet_size
            ),
            Self::CapacityExceeded {
                package,
                truck,
                capacity,
            } => write!(
                f,
                "Package {} does not fit on truck {} (capacity {})",
                package, truck, capacity
            ),
            Self::InvalidTransition(e) => write!(f, "{}", e),
            Self::Manifest(e) => write!(f, "Manifest error: {}", e),
            Self::Graph(e) => write!(f, "Graph error: {}", e),
            Self::Routing(e) => write!(f, "Routing error: {}", e),
        }
    }
}

impl std::error::Error for HubError {}

impl From<TransitionError> for HubError {
    fn from(e: TransitionError) -> Self {
        Self::InvalidTransition(e)
    }
}

impl From<ManifestError> for HubError {
    fn from(e: ManifestError) -> Self {
        Self::Manifest(e)
    }
}

impl From<GraphError> for HubError {
    fn from(e: GraphError) -> Self {
        Self::Graph(e)
    }
}

impl From<RoutingError> for HubError {
    fn from(e: RoutingError) -> Self {
        Self::Routing(e)
    }
}

/// A broken structural invariant, reported by `Hub::check_invariants`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvariantViolation {
    /// The status buckets do not partition the package set.
    StatusPartition,
    /// A truck carries more packages than it can hold.
    OverCapacity {
        truck: TruckIndex,
        load: usize,
        capacity: usize,
    },
    /// A package on a truck is not in the `OnTruck` state, or an `OnTruck`
    /// package is not on exactly one truck.
    Custody {
        package: PackageIndex,
        status: PackageStatus,
        trucks: usize,
    },
}

impl std::fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::StatusPartition => write!(f, "Status buckets do not partition the packages"),
            Self::OverCapacity {
                truck,
                load,
                capacity,
            } => write!(
                f,
                "{} carries {} packages but holds only {}",
                truck, load, capacity
            ),
            Self::Custody {
                package,
                status,
                trucks,
            } => write!(
                f,
                "{} has status {} and is on {} trucks",
                package, status, trucks
            ),
        }
    }
}

impl std::error::Error for InvariantViolation {}
