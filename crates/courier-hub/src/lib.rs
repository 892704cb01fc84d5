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

//! # Courier Hub
//!
//! **The package lifecycle state machine.**
//!
//! The hub owns the manifest and the fleet. It performs the startup
//! processing of special instructions (delays, preassignments, bundles,
//! corrections), decides which package a truck should take next and which
//! packages must travel with it, applies late arrivals and address
//! corrections, and recalls trucks whose current trip would make an urgent
//! package miss its deadline.
//!
//! ## Modules
//!
//! - `bundle`: `BundleGroups`, a union-find over packages that must travel
//!   together.
//! - `error`: `HubError` and `InvariantViolation`.
//! - `hub`: `Hub` itself.

pub mod bundle;
pub mod error;
pub mod hub;
