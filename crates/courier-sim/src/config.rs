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

//! Simulation parameters.
//!
//! [`SimulationConfig`] collects everything about a run that is not part of
//! the road network or the manifest. The defaults describe a two-truck hub
//! that opens at 8:00 AM:
//!
//! | Parameter        | Default          |
//! |------------------|------------------|
//! | `day_start`      | 8:00 AM (28 800) |
//! | `step`           | 900 s            |
//! | `speed_mph`      | 18               |
//! | `num_trucks`     | 2                |
//! | `truck_capacity` | 16               |
//! | `hub_label`      | `"HUB"`          |
//! | `corrections`    | none             |
//!
//! # Examples
//!
//! ```rust
//! use courier_sim::config::{CorrectionEvent, SimulationConfig};
//!
//! let config = SimulationConfig::new()
//!     .with_num_trucks(3)
//!     .with_correction(CorrectionEvent::new(37_200.0, 9, "410 S State St", "84111"));
//!
//! assert_eq!(config.num_trucks(), 3);
//! assert_eq!(config.corrections().len(), 1);
//! ```

use courier_model::{instruction::PackageId, time::Seconds};

pub const DEFAULT_DAY_START: Seconds = 28_800.0;
pub const DEFAULT_STEP: Seconds = 900.0;
pub const DEFAULT_SPEED_MPH: f64 = 18.0;
pub const DEFAULT_NUM_TRUCKS: usize = 2;
pub const DEFAULT_TRUCK_CAPACITY: usize = 16;
pub const DEFAULT_HUB_LABEL: &str = "HUB";

/// A scheduled address correction: at `at`, the package `package_id` is
/// redirected to the location labelled `destination`.
#[derive(Debug, Clone, PartialEq)]
pub struct CorrectionEvent {
    pub at: Seconds,
    pub package_id: PackageId,
    pub destination: String,
    pub zip: String,
}

impl CorrectionEvent {
    #[inline]
    pub fn new(
        at: Seconds,
        package_id: PackageId,
        destination: impl Into<String>,
        zip: impl Into<String>,
    ) -> Self {
        Self {
            at,
            package_id,
            destination: destination.into(),
            zip: zip.into(),
        }
    }
}

/// Parameters of a simulation run.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationConfig {
    day_start: Seconds,
    step: Seconds,
    speed_mph: f64,
    num_trucks: usize,
    truck_capacity: usize,
    hub_label: String,
    corrections: Vec<CorrectionEvent>,
    verify_invariants: bool,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulationConfig {
    /// Creates a configuration with the default parameters.
    #[inline]
    pub fn new() -> Self {
        Self {
            day_start: DEFAULT_DAY_START,
            step: DEFAULT_STEP,
            speed_mph: DEFAULT_SPEED_MPH,
            num_trucks: DEFAULT_NUM_TRUCKS,
            truck_capacity: DEFAULT_TRUCK_CAPACITY,
            hub_label: DEFAULT_HUB_LABEL.to_owned(),
            corrections: Vec::new(),
            verify_invariants: false,
        }
    }

    /// Sets the time the trucks may first leave the hub.
    #[inline]
    pub fn with_day_start(mut self, day_start: Seconds) -> Self {
        self.day_start = day_start;
        self
    }

    /// Sets the length of one simulation step.
    #[inline]
    pub fn with_step(mut self, step: Seconds) -> Self {
        self.step = step;
        self
    }

    /// Sets the constant driving speed of every truck.
    #[inline]
    pub fn with_speed_mph(mut self, speed_mph: f64) -> Self {
        self.speed_mph = speed_mph;
        self
    }

    #[inline]
    pub fn with_num_trucks(mut self, num_trucks: usize) -> Self {
        self.num_trucks = num_trucks;
        self
    }

    #[inline]
    pub fn with_truck_capacity(mut self, truck_capacity: usize) -> Self {
        self.truck_capacity = truck_capacity;
        self
    }

    /// Sets the label of the hub location in the road network.
    #[inline]
    pub fn with_hub_label(mut self, hub_label: impl Into<String>) -> Self {
        self.hub_label = hub_label.into();
        self
    }

    /// Adds a scheduled address correction.
    #[inline]
    pub fn with_correction(mut self, correction: CorrectionEvent) -> Self {
        self.corrections.push(correction);
        self
    }

    /// When enabled, the driver checks the hub invariants after every step
    /// and aborts the run on the first violation.
    #[inline]
    pub fn with_invariant_checks(mut self, enabled: bool) -> Self {
        self.verify_invariants = enabled;
        self
    }

    #[inline]
    pub fn day_start(&self) -> Seconds {
        self.day_start
    }

    #[inline]
    pub fn step(&self) -> Seconds {
        self.step
    }

    #[inline]
    pub fn speed_mph(&self) -> f64 {
        self.speed_mph
    }

    #[inline]
    pub fn num_trucks(&self) -> usize {
        self.num_trucks
    }

    #[inline]
    pub fn truck_capacity(&self) -> usize {
        self.truck_capacity
    }

    #[inline]
    pub fn hub_label(&self) -> &str {
        &self.hub_label
    }

    #[inline]
    pub fn corrections(&self) -> &[CorrectionEvent] {
        &self.corrections
    }

    #[inline]
    pub fn verify_invariants(&self) -> bool {
        self.verify_invariants
    }

    /// Checks that the parameters describe a runnable simulation.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] naming the first invalid parameter.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.step.is_finite() && self.step > 0.0) {
            return Err(ConfigError::NonPositiveStep(self.step));
        }
        if !(self.speed_mph.is_finite() && self.speed_mph > 0.0) {
            return Err(ConfigError::NonPositiveSpeed(self.speed_mph));
        }
        if !self.day_start.is_finite() {
            return Err(ConfigError::InvalidDayStart(self.day_start));
        }
        if self.num_trucks == 0 {
            return Err(ConfigError::NoTrucks);
        }
        if self.truck_capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        Ok(())
    }
}

/// An invalid simulation parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    NonPositiveStep(Seconds),
    NonPositiveSpeed(f64),
    InvalidDayStart(Seconds),
    NoTrucks,
    ZeroCapacity,
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NonPositiveStep(step) => write!(f, "Step must be positive, got {}", step),
            Self::NonPositiveSpeed(speed) => {
                write!(f, "Truck speed must be positive, got {} mph", speed)
            }
            Self::InvalidDayStart(start) => write!(f, "Invalid day start {}", start),
            Self::NoTrucks => write!(f, "The fleet must have at least one truck"),
            Self::ZeroCapacity => write!(f, "Truck capacity must be at least one package"),
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SimulationConfig::default();
        assert_eq!(config.day_start(), 28_800.0);
        assert_eq!(config.step(), 900.0);
        assert_eq!(config.speed_mph(), 18.0);
        assert_eq!(config.num_trucks(), 2);
        assert_eq!(config.truck_capacity(), 16);
        assert_eq!(config.hub_label(), "HUB");
        assert!(config.corrections().is_empty());
        assert!(!config.verify_invariants());
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn test_builder_chains() {
        let config = SimulationConfig::new()
            .with_day_start(30_000.0)
            .with_step(60.0)
            .with_speed_mph(25.0)
            .with_num_trucks(3)
            .with_truck_capacity(4)
            .with_hub_label("Depot")
            .with_invariant_checks(true)
            .with_correction(CorrectionEvent::new(37_200.0, 9, "C", "84111"));

        assert_eq!(config.day_start(), 30_000.0);
        assert_eq!(config.step(), 60.0);
        assert_eq!(config.speed_mph(), 25.0);
        assert_eq!(config.num_trucks(), 3);
        assert_eq!(config.truck_capacity(), 4);
        assert_eq!(config.hub_label(), "Depot");
        assert!(config.verify_invariants());
        assert_eq!(config.corrections()[0].package_id, 9);
    }

    #[test]
    fn test_validate_rejects_degenerate_parameters() {
        assert_eq!(
            SimulationConfig::new().with_step(0.0).validate(),
            Err(ConfigError::NonPositiveStep(0.0))
        );
        assert_eq!(
            SimulationConfig::new().with_speed_mph(-1.0).validate(),
            Err(ConfigError::NonPositiveSpeed(-1.0))
        );
        assert!(matches!(
            SimulationConfig::new().with_speed_mph(f64::NAN).validate(),
            Err(ConfigError::NonPositiveSpeed(_))
        ));
        assert_eq!(
            SimulationConfig::new().with_num_trucks(0).validate(),
            Err(ConfigError::NoTrucks)
        );
        assert_eq!(
            SimulationConfig::new().with_truck_capacity(0).validate(),
            Err(ConfigError::ZeroCapacity)
        );
    }
}
