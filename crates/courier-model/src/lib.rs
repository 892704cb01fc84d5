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

//! # Courier Model
//!
//! **The domain model of the parcel hub.**
//!
//! This crate defines the plain data the routing engine operates on: the road
//! network between delivery addresses, the packages that must travel over it,
//! and the lifecycle states a package moves through on its way from the hub
//! to its destination.
//!
//! ## Architecture
//!
//! * **`index`**: Strongly typed `LocationIndex`, `PackageIndex` and `TruckIndex`.
//! * **`time`**: Seconds-of-day primitives, the end-of-day sentinel and clock parsing.
//! * **`graph`**: `LocationGraph`, the undirected weighted road network.
//! * **`instruction`**: Parsing of the free-text special-instruction note.
//! * **`status`**: `PackageStatus` and the status bucket index.
//! * **`package`**: `PackageRecord` (loader input), `Package` and the `Manifest`
//!   that owns every package together with its secondary indices.
//! * **`loading`**: A text loader for road networks.
//!
//! ## Design Philosophy
//!
//! A package's status is stored exactly once, on the package. The status
//! buckets and the per-destination index are secondary views maintained by
//! `Manifest` on every mutation, so they can never drift from the record.

pub mod graph;
pub mod index;
pub mod instruction;
pub mod loading;
pub mod package;
pub mod status;
pub mod time;
