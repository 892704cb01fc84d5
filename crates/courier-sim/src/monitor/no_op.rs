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

use crate::{
    event::ScheduledEvent, monitor::simulation_monitor::SimulationMonitor,
    stats::SimulationStatistics,
};
use courier_hub::hub::{Hub, Recall};
use courier_model::{
    index::{PackageIndex, TruckIndex},
    time::Seconds,
};

/// A monitor that ignores every callback.
#[repr(transparent)]
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct NoOperationMonitor {
    _private: (),
}

impl NoOperationMonitor {
    /// Creates a new `NoOperationMonitor`.
    #[inline(always)]
    pub fn new() -> Self {
        Self { _private: () }
    }
}

impl SimulationMonitor for NoOperationMonitor {
    #[inline(always)]
    fn name(&self) -> &str {
        "NoOperationMonitor"
    }

    #[inline(always)]
    fn on_enter(&mut self, _hub: &Hub<'_>, _statistics: &SimulationStatistics) {}

    #[inline(always)]
    fn on_step(&mut self, _now: Seconds, _hub: &Hub<'_>, _statistics: &SimulationStatistics) {}

    #[inline(always)]
    fn on_event(
        &mut self,
        _event: &ScheduledEvent,
        _hub: &Hub<'_>,
        _statistics: &SimulationStatistics,
    ) {
    }

    #[inline(always)]
    fn on_load(
        &mut self,
        _truck: TruckIndex,
        _packages: &[PackageIndex],
        _hub: &Hub<'_>,
        _statistics: &SimulationStatistics,
    ) {
    }

    #[inline(always)]
    fn on_delivery(
        &mut self,
        _truck: TruckIndex,
        _packages: &[PackageIndex],
        _hub: &Hub<'_>,
        _statistics: &SimulationStatistics,
    ) {
    }

    #[inline(always)]
    fn on_recall(
        &mut self,
        _truck: TruckIndex,
        _recall: &Recall,
        _hub: &Hub<'_>,
        _statistics: &SimulationStatistics,
    ) {
    }

    #[inline(always)]
    fn on_exit(&mut self, _now: Seconds, _hub: &Hub<'_>, _statistics: &SimulationStatistics) {}
}
