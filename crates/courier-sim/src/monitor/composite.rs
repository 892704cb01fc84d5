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

//! Fan-out monitoring
//!
//! `CompositeMonitor` forwards every callback to its children in insertion
//! order, so logging, invariant checks and custom probes can be combined
//! without coupling them to the driver.

use crate::{
    event::ScheduledEvent, monitor::simulation_monitor::SimulationMonitor,
    stats::SimulationStatistics,
};
use courier_hub::hub::{Hub, Recall};
use courier_model::{
    index::{PackageIndex, TruckIndex},
    time::Seconds,
};

/// A monitor that aggregates multiple monitors and forwards events to all of them.
pub struct CompositeMonitor<'a> {
    monitors: Vec<Box<dyn SimulationMonitor + 'a>>,
}

impl Default for CompositeMonitor<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> CompositeMonitor<'a> {
    /// Creates a new empty `CompositeMonitor`.
    #[inline(always)]
    pub fn new() -> Self {
        Self {
            monitors: Vec::new(),
        }
    }

    /// Creates a new `CompositeMonitor` with room for `capacity` monitors.
    #[inline(always)]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            monitors: Vec::with_capacity(capacity),
        }
    }

    /// Adds a new monitor to the composite monitor.
    #[inline(always)]
    pub fn add_monitor<M>(&mut self, monitor: M)
    where
        M: SimulationMonitor + 'a,
    {
        self.monitors.push(Box::new(monitor));
    }

    /// Adds a boxed monitor to the composite monitor.
    #[inline(always)]
    pub fn add_monitor_boxed(&mut self, monitor: Box<dyn SimulationMonitor + 'a>) {
        self.monitors.push(monitor);
    }

    #[inline(always)]
    pub fn monitors(&self) -> &[Box<dyn SimulationMonitor + 'a>] {
        &self.monitors
    }

    #[inline(always)]
    pub fn clear(&mut self) {
        self.monitors.clear();
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.monitors.len()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.monitors.is_empty()
    }
}

impl std::fmt::Debug for CompositeMonitor<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.monitors.iter()).finish()
    }
}

impl<'a> FromIterator<Box<dyn SimulationMonitor + 'a>> for CompositeMonitor<'a> {
    #[inline(always)]
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = Box<dyn SimulationMonitor + 'a>>,
    {
        Self {
            monitors: iter.into_iter().collect(),
        }
    }
}

impl SimulationMonitor for CompositeMonitor<'_> {
    #[inline(always)]
    fn name(&self) -> &str {
        "CompositeMonitor"
    }

    #[inline(always)]
    fn on_enter(&mut self, hub: &Hub<'_>, statistics: &SimulationStatistics) {
        for monitor in &mut self.monitors {
            monitor.on_enter(hub, statistics);
        }
    }

    #[inline(always)]
    fn on_step(&mut self, now: Seconds, hub: &Hub<'_>, statistics: &SimulationStatistics) {
        for monitor in &mut self.monitors {
            monitor.on_step(now, hub, statistics);
        }
    }

    #[inline(always)]
    fn on_event(&mut self, event: &ScheduledEvent, hub: &Hub<'_>, statistics: &SimulationStatistics) {
        for monitor in &mut self.monitors {
            monitor.on_event(event, hub, statistics);
        }
    }

    #[inline(always)]
    fn on_load(
        &mut self,
        truck: TruckIndex,
        packages: &[PackageIndex],
        hub: &Hub<'_>,
        statistics: &SimulationStatistics,
    ) {
        for monitor in &mut self.monitors {
            monitor.on_load(truck, packages, hub, statistics);
        }
    }

    #[inline(always)]
    fn on_delivery(
        &mut self,
        truck: TruckIndex,
        packages: &[PackageIndex],
        hub: &Hub<'_>,
        statistics: &SimulationStatistics,
    ) {
        for monitor in &mut self.monitors {
            monitor.on_delivery(truck, packages, hub, statistics);
        }
    }

    #[inline(always)]
    fn on_recall(
        &mut self,
        truck: TruckIndex,
        recall: &Recall,
        hub: &Hub<'_>,
        statistics: &SimulationStatistics,
    ) {
        for monitor in &mut self.monitors {
            monitor.on_recall(truck, recall, hub, statistics);
        }
    }

    #[inline(always)]
    fn on_exit(&mut self, now: Seconds, hub: &Hub<'_>, statistics: &SimulationStatistics) {
        for monitor in &mut self.monitors {
            monitor.on_exit(now, hub, statistics);
        }
    }
}
