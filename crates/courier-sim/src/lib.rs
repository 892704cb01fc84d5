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

//! # Courier Sim
//!
//! **The time-stepped parcel hub simulation.**
//!
//! A [`driver::Simulation`] replays a delivery day from the start of the day
//! up to a query time in fixed increments. Every step it fires the scheduled
//! events that are due (late shipments, address corrections), lets the hub
//! load the trucks standing at it, advances every truck along its itinerary
//! and recalls trucks whose trip would make an urgent package miss its
//! deadline. The result is a [`report::StatusReport`] with the state of every
//! truck and package at the query time.
//!
//! Runs are deterministic: the same graph, records and configuration always
//! produce the same report.
//!
//! ## Modules
//!
//! - `config`: `SimulationConfig` and `CorrectionEvent`.
//! - `driver`: `Simulation`, the control loop, and `SimulationError`.
//! - `event`: `ScheduledEvent` and the ordered `EventTimeline`.
//! - `monitor`: observers of a run (composite, logging, no-op).
//! - `report`: `StatusReport`, `TruckReport` and `PackageReport`.
//! - `stats`: `SimulationStatistics` counters.

pub mod config;
pub mod driver;
pub mod event;
pub mod monitor;
pub mod report;
pub mod stats;
