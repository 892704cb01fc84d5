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
    index::TruckIndex,
    status::PackageStatus,
    time::{Seconds, format_clock},
};
use tracing::info;

const RULE_WIDTH: usize = 79;

/// Writes a progress table through `tracing`, one row every `every_steps`
/// steps, plus one line per event and recall.
#[derive(Debug, Clone)]
pub struct LogMonitor {
    every_steps: u64,
}

impl LogMonitor {
    /// Creates a monitor that logs every `every_steps`-th step. Zero is
    /// treated as one.
    pub fn new(every_steps: u64) -> Self {
        Self {
            every_steps: every_steps.max(1),
        }
    }

    #[inline]
    pub fn every_steps(&self) -> u64 {
        self.every_steps
    }

    #[inline(always)]
    fn print_header(&self) {
        info!(
            "{:<8} | {:<6} | {:<6} | {:<7} | {:<8} | {:<9} | {:<5} | {:<7}",
            "Time", "Step", "At hub", "Delayed", "On truck", "Delivered", "Loads", "Recalls"
        );
        info!("{}", "-".repeat(RULE_WIDTH));
    }

    #[inline(always)]
    fn log_line(&self, now: Seconds, hub: &Hub<'_>, stats: &SimulationStatistics) {
        let manifest = hub.manifest();
        let waiting = manifest.count(PackageStatus::AtHub)
            + manifest.count(PackageStatus::Bundled)
            + manifest.count(PackageStatus::Bundling);

        info!(
            "{:<8} | {:<6} | {:<6} | {:<7} | {:<8} | {:<9} | {:<5} | {:<7}",
            format_clock(now),
            stats.steps,
            waiting,
            manifest.count(PackageStatus::Delayed),
            manifest.count(PackageStatus::OnTruck),
            manifest.count(PackageStatus::Delivered),
            stats.loads,
            stats.recalls
        );
    }
}

impl Default for LogMonitor {
    fn default() -> Self {
        Self::new(1)
    }
}

impl std::fmt::Display for LogMonitor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "LogMonitor(every_steps: {})", self.every_steps)
    }
}

impl SimulationMonitor for LogMonitor {
    fn name(&self) -> &str {
        "LogMonitor"
    }

    fn on_enter(&mut self, hub: &Hub<'_>, _statistics: &SimulationStatistics) {
        info!(
            packages = hub.manifest().len(),
            trucks = hub.num_trucks(),
            "simulation started"
        );
        self.print_header();
    }

    fn on_step(&mut self, now: Seconds, hub: &Hub<'_>, statistics: &SimulationStatistics) {
        if statistics.steps % self.every_steps == 0 {
            self.log_line(now, hub, statistics);
        }
    }

    fn on_event(&mut self, event: &ScheduledEvent, _hub: &Hub<'_>, _statistics: &SimulationStatistics) {
        info!(%event, "event fired");
    }

    fn on_recall(
        &mut self,
        truck: TruckIndex,
        recall: &Recall,
        _hub: &Hub<'_>,
        _statistics: &SimulationStatistics,
    ) {
        info!(
            truck = truck.get() + 1,
            returned = recall.returned.len(),
            reserved = recall.reserved,
            "recall"
        );
    }

    fn on_exit(&mut self, now: Seconds, hub: &Hub<'_>, statistics: &SimulationStatistics) {
        info!("{}", "-".repeat(RULE_WIDTH));
        self.log_line(now, hub, statistics);
        info!("Simulation finished.");
    }
}
