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

//! Point-in-time status reports.
//!
//! A [`StatusReport`] is a snapshot of a finished run: one [`TruckReport`]
//! per truck, one [`PackageReport`] per package in manifest order, the run's
//! statistics and the total distance driven by the fleet.

use crate::stats::SimulationStatistics;
use courier_hub::hub::Hub;
use courier_model::{
    index::PackageIndex,
    instruction::PackageId,
    status::PackageStatus,
    time::{END_OF_DAY, Seconds, format_clock},
};
use rustc_hash::FxHashMap;

/// The state of one truck.
#[derive(Debug, Clone, PartialEq)]
pub struct TruckReport {
    /// The 1-based truck number.
    pub number: usize,
    /// The last itinerary stop reached.
    pub location: String,
    /// The stop the truck is heading to, if it is under way.
    pub next_location: Option<String>,
    /// Undelivered packages on the current itinerary.
    pub packages: usize,
    /// Packages held on board outside the itinerary.
    pub reserve: usize,
    pub delivered: usize,
    /// Start of the current trip.
    pub start: Seconds,
    /// Scheduled end of the current trip.
    pub end: Seconds,
    /// Distance driven so far.
    pub miles: f64,
}

/// The state of one package.
#[derive(Debug, Clone, PartialEq)]
pub struct PackageReport {
    pub id: PackageId,
    pub destination: String,
    pub zip: String,
    pub deadline: Seconds,
    pub status: PackageStatus,
    /// The delivery time of a delivered package, or the scheduled arrival of
    /// a package on a truck's itinerary.
    pub arrival: Option<Seconds>,
    /// The truck carrying or having delivered the package.
    pub truck: Option<usize>,
}

impl PackageReport {
    /// Whether a delivered package met its deadline; `None` until delivered.
    #[inline]
    pub fn is_on_time(&self) -> Option<bool> {
        match (self.status, self.arrival) {
            (PackageStatus::Delivered, Some(arrival)) => Some(arrival <= self.deadline),
            _ => None,
        }
    }
}

/// The state of a whole simulation at a query time.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusReport {
    at: Seconds,
    trucks: Vec<TruckReport>,
    packages: Vec<PackageReport>,
    statistics: SimulationStatistics,
}

impl StatusReport {
    /// Captures the state of `hub` at `at`.
    pub fn capture(at: Seconds, hub: &Hub<'_>, statistics: SimulationStatistics) -> Self {
        let graph = hub.finder().graph();
        let manifest = hub.manifest();

        let mut custody: FxHashMap<PackageIndex, usize> = FxHashMap::default();
        let mut trucks = Vec::with_capacity(hub.num_trucks());
        for truck in hub.trucks() {
            for &p in truck
                .packages()
                .iter()
                .chain(truck.reserve())
                .chain(truck.delivered())
            {
                custody.insert(p, truck.number());
            }

            let itinerary = truck.itinerary();
            trucks.push(TruckReport {
                number: truck.number(),
                location: graph.label(truck.location()).to_owned(),
                next_location: truck.next_location().map(|l| graph.label(l).to_owned()),
                packages: truck.packages().len(),
                reserve: truck.reserve().len(),
                delivered: truck.delivered().len(),
                start: itinerary.start_time(),
                end: itinerary.end_time(),
                miles: truck.miles_at(at),
            });
        }

        let packages = manifest
            .indices()
            .map(|p| {
                let package = manifest.package(p);
                let status = package.status();
                let scheduled = package.arrival_time();
                let arrival = match status {
                    PackageStatus::Delivered => Some(scheduled),
                    PackageStatus::OnTruck if scheduled < END_OF_DAY => Some(scheduled),
                    _ => None,
                };
                PackageReport {
                    id: package.id(),
                    destination: graph.label(package.destination()).to_owned(),
                    zip: package.zip().to_owned(),
                    deadline: package.deadline(),
                    status,
                    arrival,
                    truck: custody.get(&p).copied(),
                }
            })
            .collect();

        Self {
            at,
            trucks,
            packages,
            statistics,
        }
    }

    /// The query time.
    #[inline]
    pub fn at(&self) -> Seconds {
        self.at
    }

    #[inline]
    pub fn trucks(&self) -> &[TruckReport] {
        &self.trucks
    }

    /// The packages in manifest order.
    #[inline]
    pub fn packages(&self) -> &[PackageReport] {
        &self.packages
    }

    #[inline]
    pub fn statistics(&self) -> &SimulationStatistics {
        &self.statistics
    }

    /// Returns the report for the package with the given id.
    pub fn package(&self, id: PackageId) -> Option<&PackageReport> {
        self.packages.iter().find(|p| p.id == id)
    }

    /// Returns the report for the truck with the given 1-based number.
    pub fn truck(&self, number: usize) -> Option<&TruckReport> {
        self.trucks.iter().find(|t| t.number == number)
    }

    /// The number of packages in `status`.
    pub fn count(&self, status: PackageStatus) -> usize {
        self.packages.iter().filter(|p| p.status == status).count()
    }

    /// Returns `true` if every package has been delivered.
    pub fn all_delivered(&self) -> bool {
        self.packages
            .iter()
            .all(|p| p.status == PackageStatus::Delivered)
    }

    /// Delivered packages that missed their deadline.
    pub fn late_packages(&self) -> impl Iterator<Item = &PackageReport> {
        self.packages
            .iter()
            .filter(|p| p.is_on_time() == Some(false))
    }

    /// The distance driven by the whole fleet.
    pub fn total_miles(&self) -> f64 {
        self.trucks.iter().map(|t| t.miles).sum()
    }
}

impl std::fmt::Display for StatusReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Status at {}", format_clock(self.at))?;
        writeln!(
            f,
            "{:<5} | {:<24} | {:<24} | {:<8} | {:<7} | {:<8} | {:<8} | {:>7}",
            "Truck", "Location", "Next", "Packages", "Reserve", "Start", "End", "Miles"
        )?;
        writeln!(f, "{}", "-".repeat(112))?;
        for t in &self.trucks {
            writeln!(
                f,
                "{:<5} | {:<24} | {:<24} | {:<8} | {:<7} | {:<8} | {:<8} | {:>7.1}",
                t.number,
                t.location,
                t.next_location.as_deref().unwrap_or("-"),
                t.packages,
                t.reserve,
                format_clock(t.start),
                format_clock(t.end),
                t.miles
            )?;
        }
        writeln!(f)?;

        writeln!(
            f,
            "{:<7} | {:<24} | {:<8} | {:<17} | {:<8} | {:<5} | {:<7}",
            "Package", "Destination", "Deadline", "Status", "Arrival", "Truck", "On time"
        )?;
        writeln!(f, "{}", "-".repeat(94))?;
        for p in &self.packages {
            let deadline = if p.deadline >= END_OF_DAY {
                "EOD".to_owned()
            } else {
                format_clock(p.deadline)
            };
            let on_time = match p.is_on_time() {
                Some(true) => "yes",
                Some(false) => "no",
                None => "-",
            };
            writeln!(
                f,
                "{:<7} | {:<24} | {:<8} | {:<17} | {:<8} | {:<5} | {:<7}",
                p.id,
                p.destination,
                deadline,
                p.status.to_string(),
                p.arrival.map(format_clock).unwrap_or_else(|| "-".to_owned()),
                p.truck.map(|n| n.to_string()).unwrap_or_else(|| "-".to_owned()),
                on_time
            )?;
        }
        writeln!(f)?;
        writeln!(f, "Total mileage: {:.1}", self.total_miles())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn package(status: PackageStatus, arrival: Option<Seconds>) -> PackageReport {
        PackageReport {
            id: 1,
            destination: "A".to_owned(),
            zip: "84115".to_owned(),
            deadline: 37_800.0,
            status,
            arrival,
            truck: Some(1),
        }
    }

    fn report(packages: Vec<PackageReport>) -> StatusReport {
        StatusReport {
            at: 43_200.0,
            trucks: vec![
                TruckReport {
                    number: 1,
                    location: "HUB".to_owned(),
                    next_location: None,
                    packages: 0,
                    reserve: 0,
                    delivered: 2,
                    start: 28_800.0,
                    end: 30_600.0,
                    miles: 9.0,
                },
                TruckReport {
                    number: 2,
                    location: "B".to_owned(),
                    next_location: Some("HUB".to_owned()),
                    packages: 1,
                    reserve: 0,
                    delivered: 0,
                    start: 41_400.0,
                    end: 44_100.0,
                    miles: 3.5,
                },
            ],
            packages,
            statistics: SimulationStatistics::new(),
        }
    }

    #[test]
    fn test_on_time_only_for_delivered_packages() {
        assert_eq!(
            package(PackageStatus::Delivered, Some(37_000.0)).is_on_time(),
            Some(true)
        );
        assert_eq!(
            package(PackageStatus::Delivered, Some(37_800.0)).is_on_time(),
            Some(true)
        );
        assert_eq!(
            package(PackageStatus::Delivered, Some(38_000.0)).is_on_time(),
            Some(false)
        );
        assert_eq!(
            package(PackageStatus::OnTruck, Some(38_000.0)).is_on_time(),
            None
        );
    }

    #[test]
    fn test_queries() {
        let mut late = package(PackageStatus::Delivered, Some(38_000.0));
        late.id = 2;
        let r = report(vec![
            package(PackageStatus::OnTruck, Some(44_000.0)),
            late,
        ]);

        assert_eq!(r.total_miles(), 12.5);
        assert_eq!(r.count(PackageStatus::Delivered), 1);
        assert!(!r.all_delivered());
        assert_eq!(r.late_packages().map(|p| p.id).collect::<Vec<_>>(), vec![2]);
        assert_eq!(r.truck(2).and_then(|t| t.next_location.as_deref()), Some("HUB"));
        assert!(r.package(3).is_none());
    }

    #[test]
    fn test_display_renders_both_tables() {
        let r = report(vec![package(PackageStatus::Delivered, Some(37_000.0))]);
        let text = r.to_string();

        assert!(text.starts_with("Status at 12:00 PM\n"));
        assert!(text.contains("Truck | Location"));
        assert!(text.contains("Package | Destination"));
        assert!(text.contains("10:30 AM"));
        assert!(text.contains("Delivered"));
        assert!(text.ends_with("Total mileage: 12.5\n"));
    }
}
