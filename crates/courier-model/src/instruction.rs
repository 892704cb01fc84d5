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

//! Special-instruction notes.
//!
//! Package tables carry a free-text note per package. A handful of phrasings
//! change how the hub treats the package; everything else is informational.
//! `Instruction::parse` turns a note into a typed instruction, checked in a
//! fixed priority order so a note matching several phrasings is classified
//! deterministically:
//!
//! 1. `"Can only be on truck N"` → [`Instruction::Preassigned`]
//! 2. `"Delayed on flight---will not arrive to depot until 9:05 am"` → [`Instruction::Delayed`]
//! 3. `"Wrong address listed"` → [`Instruction::WrongAddress`]
//! 4. `"Must be delivered with 13, 15"` → [`Instruction::DeliverWith`]

use crate::{
    status::PackageStatus,
    time::{ClockParseError, Seconds, parse_clock},
};
use regex::Regex;
use smallvec::SmallVec;
use std::sync::LazyLock;

/// The external identifier of a package, as printed on its label.
pub type PackageId = u32;

static TRUCK_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)can only be on truck\s+(\d+)").expect("truck pattern is valid")
});

static DELAY_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)delayed on flight.*?until\s+(\d{1,2}:\d{2}(?:\s*[ap]m)?)")
        .expect("delay pattern is valid")
});

static WRONG_ADDRESS_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)wrong address listed").expect("wrong address pattern is valid")
});

static BUNDLE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)must be delivered with\s+([\d,\s]+)").expect("bundle pattern is valid")
});

/// The error returned when a recognised note carries a malformed argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstructionError {
    /// The truck number in a preassignment note is not a positive integer.
    InvalidTruckNumber(String),
    /// The arrival time in a delay note could not be parsed.
    InvalidArrivalTime(ClockParseError),
    /// A companion id in a bundle note is not a package id.
    InvalidCompanion(String),
}

impl std::fmt::Display for InstructionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidTruckNumber(s) => write!(f, "Invalid truck number '{}'", s),
            Self::InvalidArrivalTime(e) => write!(f, "Invalid arrival time: {}", e),
            Self::InvalidCompanion(s) => write!(f, "Invalid companion package id '{}'", s),
        }
    }
}

impl std::error::Error for InstructionError {}

impl From<ClockParseError> for InstructionError {
    fn from(e: ClockParseError) -> Self {
        Self::InvalidArrivalTime(e)
    }
}

/// A typed special instruction.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Instruction {
    /// No special handling.
    #[default]
    None,
    /// The package may only travel on the given truck (1-based truck number).
    Preassigned(usize),
    /// The package reaches the depot late, at the given time of day.
    Delayed(Seconds),
    /// The listed address is wrong; the package waits for a correction.
    WrongAddress,
    /// The package must be delivered together with the listed packages.
    DeliverWith(SmallVec<[PackageId; 4]>),
}

impl Instruction {
    /// Parses a free-text note.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use courier_model::instruction::Instruction;
    ///
    /// assert_eq!(Instruction::parse("Can only be on truck 2"), Ok(Instruction::Preassigned(2)));
    /// assert_eq!(
    ///     Instruction::parse("Delayed on flight---will not arrive to depot until 9:05 am"),
    ///     Ok(Instruction::Delayed(32_700.0))
    /// );
    /// assert_eq!(Instruction::parse(""), Ok(Instruction::None));
    /// ```
    pub fn parse(note: &str) -> Result<Self, InstructionError> {
        if let Some(caps) = TRUCK_PATTERN.captures(note) {
            let raw = &caps[1];
            return match raw.parse::<usize>() {
                Ok(n) if n > 0 => Ok(Self::Preassigned(n)),
                _ => Err(InstructionError::InvalidTruckNumber(raw.to_owned())),
            };
        }

        if let Some(caps) = DELAY_PATTERN.captures(note) {
            return Ok(Self::Delayed(parse_clock(&caps[1])?));
        }

        if WRONG_ADDRESS_PATTERN.is_match(note) {
            return Ok(Self::WrongAddress);
        }

        if let Some(caps) = BUNDLE_PATTERN.captures(note) {
            let companions = caps[1]
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(|s| {
                    s.parse::<PackageId>()
                        .map_err(|_| InstructionError::InvalidCompanion(s.to_owned()))
                })
                .collect::<Result<SmallVec<[PackageId; 4]>, _>>()?;
            return Ok(Self::DeliverWith(companions));
        }

        Ok(Self::None)
    }

    /// The lifecycle state a package with this instruction starts in.
    #[inline]
    pub fn initial_status(&self) -> PackageStatus {
        match self {
            Self::None => PackageStatus::AtHub,
            Self::Preassigned(_) => PackageStatus::Preassigned,
            Self::Delayed(_) => PackageStatus::Delayed,
            Self::WrongAddress => PackageStatus::CorrectionNeeded,
            Self::DeliverWith(_) => PackageStatus::Bundling,
        }
    }

    /// Returns the 1-based truck number for a preassigned package.
    #[inline]
    pub fn truck_number(&self) -> Option<usize> {
        match self {
            Self::Preassigned(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the depot arrival time for a delayed package.
    #[inline]
    pub fn arrival_time(&self) -> Option<Seconds> {
        match self {
            Self::Delayed(t) => Some(*t),
            _ => None,
        }
    }

    /// Returns the companion ids for a bundling package.
    #[inline]
    pub fn companions(&self) -> &[PackageId] {
        match self {
            Self::DeliverWith(ids) => ids.as_slice(),
            _ => &[],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use smallvec::smallvec;

    #[test]
    fn test_plain_notes_have_no_instruction() {
        assert_eq!(Instruction::parse("Fragile"), Ok(Instruction::None));
        assert_eq!(
            Instruction::parse("").map(|i| i.initial_status()),
            Ok(PackageStatus::AtHub)
        );
    }

    #[test]
    fn test_preassignment_is_parsed() {
        let instruction = Instruction::parse("Can only be on truck 2").unwrap();
        assert_eq!(instruction.truck_number(), Some(2));
        assert_eq!(instruction.initial_status(), PackageStatus::Preassigned);
    }

    #[test]
    fn test_truck_zero_is_rejected() {
        assert_eq!(
            Instruction::parse("Can only be on truck 0"),
            Err(InstructionError::InvalidTruckNumber("0".to_owned()))
        );
    }

    #[test]
    fn test_delay_is_parsed_with_lowercase_meridiem() {
        let instruction =
            Instruction::parse("Delayed on flight---will not arrive to depot until 9:05 am")
                .unwrap();
        assert_eq!(instruction.arrival_time(), Some(32_700.0));
        assert_eq!(instruction.initial_status(), PackageStatus::Delayed);
    }

    #[test]
    fn test_wrong_address() {
        let instruction = Instruction::parse("Wrong address listed").unwrap();
        assert_eq!(instruction, Instruction::WrongAddress);
        assert_eq!(instruction.initial_status(), PackageStatus::CorrectionNeeded);
    }

    #[test]
    fn test_bundle_companions_are_listed_in_order() {
        let instruction = Instruction::parse("Must be delivered with 13, 15").unwrap();
        assert_eq!(instruction, Instruction::DeliverWith(smallvec![13, 15]));
        assert_eq!(instruction.companions(), &[13, 15]);
        assert_eq!(instruction.initial_status(), PackageStatus::Bundling);
    }

    #[test]
    fn test_preassignment_takes_priority_over_bundling() {
        let instruction =
            Instruction::parse("Can only be on truck 1. Must be delivered with 3").unwrap();
        assert_eq!(instruction, Instruction::Preassigned(1));
    }

    #[test]
    fn test_empty_companion_entries_are_skipped() {
        let instruction = Instruction::parse("Must be delivered with 13,, 15").unwrap();
        assert_eq!(instruction.companions(), &[13, 15]);
    }

    #[test]
    fn test_overflowing_companion_is_reported() {
        assert_eq!(
            Instruction::parse("Must be delivered with 99999999999"),
            Err(InstructionError::InvalidCompanion("99999999999".to_owned()))
        );
    }
}
