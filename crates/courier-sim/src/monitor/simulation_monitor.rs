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

//! Simulation monitoring interface
//!
//! Lifecycle
//! - enter, then per step {event* → load* → delivery/recall per truck} → step,
//!   then exit.
//! - `SimulationStatistics` is provided to every callback.
//!
//! The hub handed to each callback is the live hub right after the reported
//! change, so monitors can inspect statuses, trucks and invariants.

use crate::{event::ScheduledEvent, stats::SimulationStatistics};
use courier_hub::hub::{Hub, Recall};
use courier_model::{
    index::{PackageIndex, TruckIndex},
    time::Seconds,
};

/// Trait for observing a simulation run.
pub trait SimulationMonitor {
    /// Returns the name of the monitor.
    fn name(&self) -> &str;
    /// Called once after the startup processing, before the first step.
    fn on_enter(&mut self, hub: &Hub<'_>, statistics: &SimulationStatistics);
    /// Called at the end of every step, before the clock advances.
    fn on_step(&mut self, now: Seconds, hub: &Hub<'_>, statistics: &SimulationStatistics);
    /// Called after a scheduled event fired.
    fn on_event(
        &mut self,
        _event: &ScheduledEvent,
        _hub: &Hub<'_>,
        _statistics: &SimulationStatistics,
    ) {
    }
    /// Called after packages were loaded onto a truck.
    fn on_load(
        &mut self,
        _truck: TruckIndex,
        _packages: &[PackageIndex],
        _hub: &Hub<'_>,
        _statistics: &SimulationStatistics,
    ) {
    }
    /// Called after a truck delivered packages.
    fn on_delivery(
        &mut self,
        _truck: TruckIndex,
        _packages: &[PackageIndex],
        _hub: &Hub<'_>,
        _statistics: &SimulationStatistics,
    ) {
    }
    /// Called after a truck was recalled.
    fn on_recall(
        &mut self,
        _truck: TruckIndex,
        _recall: &Recall,
        _hub: &Hub<'_>,
        _statistics: &SimulationStatistics,
    ) {
    }
    /// Called once when the run reached the query time.
    fn on_exit(&mut self, now: Seconds, hub: &Hub<'_>, statistics: &SimulationStatistics);
}

impl std::fmt::Debug for dyn SimulationMonitor + '_ {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SimulationMonitor({})", self.name())
    }
}

impl std::fmt::Display for dyn SimulationMonitor + '_ {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SimulationMonitor({})", self.name())
    }
}
