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

//! # Courier Route
//!
//! **Routing for a single vehicle.**
//!
//! This crate answers two questions: how far apart are two addresses, and in
//! which order should one truck visit the destinations of the packages it
//! carries.
//!
//! ## Architecture
//!
//! * **`path`**: `PathFinder`, a dense single-source shortest-path search
//!   over a borrowed `LocationGraph`. Every search returns a fresh
//!   `ShortestPaths` value, so nothing is shared between two searches.
//! * **`itinerary`**: `Itinerary` (the timed stop sequence of one trip) and
//!   `Delivery` (one scheduled destination within it).
//! * **`truck`**: `Truck`, a capacity-bounded package carrier, and its
//!   earliest-deadline-first, nearest-neighbour itinerary scheduler.
//!
//! Trucks never change a package's lifecycle status. They record scheduled
//! arrival times on the manifest and report which packages came due; the hub
//! decides what that means.

pub mod itinerary;
pub mod path;
pub mod truck;
