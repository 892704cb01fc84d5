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

/// Counters collected during a simulation run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SimulationStatistics {
    /// Simulation steps executed.
    pub steps: u64,
    /// Load decisions that put packages on a truck.
    pub loads: u64,
    /// Packages moved onto trucks by those loads.
    pub packages_loaded: u64,
    /// Packages delivered.
    pub deliveries: u64,
    /// Trucks recalled to the hub.
    pub recalls: u64,
    /// Packages handed back to the hub by recalls.
    pub packages_returned: u64,
    /// Scheduled events fired.
    pub events: u64,
    /// Itinerary rebuilds over the whole fleet.
    pub rebuilds: u64,
}

impl SimulationStatistics {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn on_step(&mut self) {
        self.steps = self.steps.saturating_add(1);
    }

    #[inline]
    pub fn on_load(&mut self, packages: usize) {
        self.loads = self.loads.saturating_add(1);
        self.packages_loaded = self.packages_loaded.saturating_add(packages as u64);
    }

    #[inline]
    pub fn on_delivery(&mut self, packages: usize) {
        self.deliveries = self.deliveries.saturating_add(packages as u64);
    }

    #[inline]
    pub fn on_recall(&mut self, returned: usize) {
        self.recalls = self.recalls.saturating_add(1);
        self.packages_returned = self.packages_returned.saturating_add(returned as u64);
    }

    #[inline]
    pub fn on_event(&mut self) {
        self.events = self.events.saturating_add(1);
    }

    #[inline]
    pub fn set_rebuilds(&mut self, rebuilds: u64) {
        self.rebuilds = rebuilds;
    }
}

impl std::fmt::Display for SimulationStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Courier Simulation Statistics:")?;
        writeln!(f, "  Steps:                {}", self.steps)?;
        writeln!(f, "  Loads:                {}", self.loads)?;
        writeln!(f, "  Packages loaded:      {}", self.packages_loaded)?;
        writeln!(f, "  Deliveries:           {}", self.deliveries)?;
        writeln!(f, "  Recalls:              {}", self.recalls)?;
        writeln!(f, "  Packages returned:    {}", self.packages_returned)?;
        writeln!(f, "  Events fired:         {}", self.events)?;
        writeln!(f, "  Itinerary rebuilds:   {}", self.rebuilds)?;
        Ok(())
    }
}
