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

//! The simulation driver.
//!
//! A [`Simulation`] validates its inputs once and can then answer any number
//! of [`Simulation::status_at`] queries. Each query replays the day from the
//! configured start on a fresh hub, so queries are independent and
//! deterministic.
//!
//! Every step at time `now`:
//!
//! 1. Scheduled events due by `now` fire in timeline order.
//! 2. Every truck advances to `now` and its reached packages are delivered.
//! 3. If the truck whose trip ends first stands at the hub, the trucks at the
//!    hub are loaded, most remaining capacity first. Each first restores its
//!    reserve, then takes load sets until it is full or the pool is empty.
//! 4. Every truck under way is checked for recall.
//!
//! After the last step the events and deliveries due by the query time are
//! applied and the report is captured.

use crate::{
    config::{ConfigError, SimulationConfig},
    event::{EventKind, EventTimeline, ScheduledEvent},
    monitor::{no_op::NoOperationMonitor, simulation_monitor::SimulationMonitor},
    report::StatusReport,
    stats::SimulationStatistics,
};
use courier_hub::{
    error::{HubError, InvariantViolation},
    hub::{Hub, LoadOutcome},
};
use courier_model::{
    graph::{GraphError, LocationGraph},
    index::{LocationIndex, TruckIndex},
    package::{Manifest, ManifestError, PackageRecord},
    status::PackageStatus,
    time::{Seconds, format_clock},
};
use courier_route::{
    path::{PathFinder, RoutingError},
    truck::Truck,
};
use tracing::{debug, info};

/// The error type for simulation runs. Every error aborts the run.
#[derive(Debug, Clone, PartialEq)]
pub enum SimulationError {
    Config(ConfigError),
    Graph(GraphError),
    Manifest(ManifestError),
    Hub(HubError),
    Routing(RoutingError),
    /// A structural invariant broke; only reported when invariant checks are
    /// enabled.
    Invariant {
        at: Seconds,
        violation: InvariantViolation,
    },
}

impl std::fmt::Display for SimulationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Config(e) => write!(f, "Invalid configuration: {}", e),
            Self::Graph(e) => write!(f, "Graph error: {}", e),
            Self::Manifest(e) => write!(f, "Manifest error: {}", e),
            Self::Hub(e) => write!(f, "Hub error: {}", e),
            Self::Routing(e) => write!(f, "Routing error: {}", e),
            Self::Invariant { at, violation } => {
                write!(f, "Invariant violated at {}: {:?}", format_clock(*at), violation)
            }
        }
    }
}

impl std::error::Error for SimulationError {}

impl From<ConfigError> for SimulationError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

impl From<GraphError> for SimulationError {
    fn from(e: GraphError) -> Self {
        Self::Graph(e)
    }
}

impl From<ManifestError> for SimulationError {
    fn from(e: ManifestError) -> Self {
        Self::Manifest(e)
    }
}

impl From<HubError> for SimulationError {
    fn from(e: HubError) -> Self {
        Self::Hub(e)
    }
}

impl From<RoutingError> for SimulationError {
    fn from(e: RoutingError) -> Self {
        Self::Routing(e)
    }
}

/// A validated delivery day, ready to be replayed up to any query time.
#[derive(Debug, Clone)]
pub struct Simulation<'g> {
    graph: &'g LocationGraph,
    config: SimulationConfig,
    hub_location: LocationIndex,
    manifest: Manifest,
    timeline: EventTimeline,
}

impl<'g> Simulation<'g> {
    /// Validates the configuration, resolves the records against `graph`,
    /// runs the hub's startup processing once and builds the event timeline.
    ///
    /// # Errors
    ///
    /// Returns an error for an invalid configuration, an unknown hub or
    /// correction address, malformed records, or a failing startup.
    pub fn new<I>(
        graph: &'g LocationGraph,
        records: I,
        config: SimulationConfig,
    ) -> Result<Self, SimulationError>
    where
        I: IntoIterator<Item = PackageRecord>,
    {
        config.validate()?;
        let hub_location = graph.location(config.hub_label())?;
        let manifest = Manifest::from_records(graph, records)?;

        let mut simulation = Self {
            graph,
            config,
            hub_location,
            manifest,
            timeline: EventTimeline::new(),
        };

        let hub = simulation.open_hub()?;
        let mut timeline = EventTimeline::new();
        let mut last_arrival = None;
        for arrival in hub.delayed_arrivals() {
            if last_arrival != Some(arrival.at) {
                timeline.schedule(arrival.at, EventKind::LateArrival);
                last_arrival = Some(arrival.at);
            }
        }
        for correction in simulation.config.corrections() {
            let destination = graph.location(&correction.destination)?;
            timeline.schedule(
                correction.at,
                EventKind::Correction {
                    package_id: correction.package_id,
                    destination,
                    zip: correction.zip.clone(),
                },
            );
        }
        simulation.timeline = timeline;

        info!(
            packages = simulation.manifest.len(),
            trucks = simulation.config.num_trucks(),
            events = simulation.timeline.len(),
            "simulation prepared"
        );
        Ok(simulation)
    }

    #[inline]
    pub fn graph(&self) -> &'g LocationGraph {
        self.graph
    }

    #[inline]
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// The manifest as loaded, before any startup processing.
    #[inline]
    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    #[inline]
    pub fn hub_location(&self) -> LocationIndex {
        self.hub_location
    }

    /// The scheduled events of the day.
    #[inline]
    pub fn timeline(&self) -> &EventTimeline {
        &self.timeline
    }

    /// Returns the shortest road distance between two labelled locations.
    ///
    /// # Errors
    ///
    /// Fails if a label is unknown or the locations are not connected.
    pub fn distance_between(&self, a: &str, b: &str) -> Result<f64, SimulationError> {
        Ok(PathFinder::new(self.graph).distance_between(a, b)?)
    }

    /// Replays the day up to `query` and reports the state at that time.
    ///
    /// # Errors
    ///
    /// Returns the first error raised during the run.
    #[inline]
    pub fn status_at(&self, query: Seconds) -> Result<StatusReport, SimulationError> {
        self.status_at_with_monitor(query, &mut NoOperationMonitor::new())
    }

    /// Like [`Simulation::status_at`], reporting progress to `monitor`.
    pub fn status_at_with_monitor<M>(
        &self,
        query: Seconds,
        monitor: &mut M,
    ) -> Result<StatusReport, SimulationError>
    where
        M: SimulationMonitor + ?Sized,
    {
        let session = SimulationSession {
            config: &self.config,
            hub: self.open_hub()?,
            timeline: self.timeline.clone(),
            statistics: SimulationStatistics::new(),
            monitor,
        };
        session.run(query)
    }

    fn open_hub(&self) -> Result<Hub<'g>, SimulationError> {
        let trucks = (0..self.config.num_trucks())
            .map(|i| {
                Truck::new(
                    TruckIndex::new(i),
                    self.config.truck_capacity(),
                    self.config.speed_mph(),
                    self.hub_location,
                    self.config.day_start(),
                )
            })
            .collect();

        Ok(Hub::new(
            self.graph,
            self.manifest.clone(),
            self.hub_location,
            trucks,
            self.config.day_start(),
        )?)
    }
}

/// The mutable state of one run.
struct SimulationSession<'s, 'g, M>
where
    M: SimulationMonitor + ?Sized,
{
    config: &'s SimulationConfig,
    hub: Hub<'g>,
    timeline: EventTimeline,
    statistics: SimulationStatistics,
    monitor: &'s mut M,
}

impl<M> SimulationSession<'_, '_, M>
where
    M: SimulationMonitor + ?Sized,
{
    fn run(mut self, query: Seconds) -> Result<StatusReport, SimulationError> {
        self.monitor.on_enter(&self.hub, &self.statistics);

        let mut now = self.config.day_start();
        while now < query {
            self.statistics.on_step();
            self.fire_events(now)?;
            self.deliver(now)?;
            self.load_trucks(now)?;
            self.recall_trucks(now)?;
            self.verify(now)?;
            debug!(at = %format_clock(now), step = self.statistics.steps, "step finished");
            self.monitor.on_step(now, &self.hub, &self.statistics);
            now += self.config.step();
        }

        self.fire_events(query)?;
        self.deliver(query)?;
        self.verify(query)?;

        let rebuilds = self.hub.trucks().iter().map(Truck::rebuilds).sum();
        self.statistics.set_rebuilds(rebuilds);
        self.monitor.on_exit(query, &self.hub, &self.statistics);

        let report = StatusReport::capture(query, &self.hub, self.statistics);
        info!(
            at = %format_clock(query),
            delivered = report.count(PackageStatus::Delivered),
            miles = report.total_miles(),
            "simulation finished"
        );
        Ok(report)
    }

    fn fire_events(&mut self, now: Seconds) -> Result<(), SimulationError> {
        while let Some(event) = self.timeline.next_due(now) {
            self.fire(&event)?;
            self.statistics.on_event();
            self.monitor.on_event(&event, &self.hub, &self.statistics);
        }
        Ok(())
    }

    fn fire(&mut self, event: &ScheduledEvent) -> Result<(), SimulationError> {
        match &event.kind {
            EventKind::LateArrival => {
                self.hub.receive_late_arrivals(event.at)?;
            }
            EventKind::Correction {
                package_id,
                destination,
                zip,
            } => {
                self.hub
                    .apply_correction(*package_id, *destination, zip, event.at)?;
            }
        }
        Ok(())
    }

    fn deliver(&mut self, now: Seconds) -> Result<(), SimulationError> {
        for i in 0..self.hub.num_trucks() {
            let truck = TruckIndex::new(i);
            let delivered = self.hub.deliver(truck, now)?;
            if !delivered.is_empty() {
                self.statistics.on_delivery(delivered.len());
                self.monitor
                    .on_delivery(truck, &delivered, &self.hub, &self.statistics);
            }
        }
        Ok(())
    }

    fn load_trucks(&mut self, now: Seconds) -> Result<(), SimulationError> {
        let Some(first) = self.hub.earliest_finishing_truck() else {
            return Ok(());
        };
        if !self.hub.truck(first).is_at_hub(now) {
            return Ok(());
        }

        let mut order: Vec<TruckIndex> = self
            .hub
            .trucks()
            .iter()
            .filter(|t| t.is_at_hub(now))
            .map(Truck::index)
            .collect();
        order.sort_by_key(|&t| std::cmp::Reverse(self.hub.truck(t).remaining_capacity()));

        for truck in order {
            let departure = self.hub.departure_time(truck, now);
            self.hub.restore_reserve(truck, departure)?;

            loop {
                match self.hub.load_next(truck, departure)? {
                    LoadOutcome::Loaded(set) => {
                        self.statistics.on_load(set.len());
                        self.monitor
                            .on_load(truck, &set, &self.hub, &self.statistics);
                    }
                    LoadOutcome::Full {
                        package,
                        needed,
                        available,
                    } => {
                        debug!(
                            truck = truck.get() + 1,
                            package = self.hub.manifest().package(package).id(),
                            needed,
                            available,
                            "truck full"
                        );
                        break;
                    }
                    LoadOutcome::PoolEmpty => break,
                }
            }
        }
        Ok(())
    }

    fn recall_trucks(&mut self, now: Seconds) -> Result<(), SimulationError> {
        for i in 0..self.hub.num_trucks() {
            let truck = TruckIndex::new(i);
            if self.hub.should_recall(truck) {
                let recall = self.hub.recall(truck, now)?;
                self.statistics.on_recall(recall.returned.len());
                self.monitor
                    .on_recall(truck, &recall, &self.hub, &self.statistics);
            }
        }
        Ok(())
    }

    #[inline]
    fn verify(&self, now: Seconds) -> Result<(), SimulationError> {
        if !self.config.verify_invariants() {
            return Ok(());
        }
        self.hub
            .check_invariants()
            .map_err(|violation| SimulationError::Invariant { at: now, violation })
    }
}
