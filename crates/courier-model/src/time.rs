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

//! Seconds-of-day time primitives.
//!
//! Every time value in the engine (deadlines, itinerary start and end times,
//! computed arrivals, the simulation clock) is a count of seconds since
//! midnight. Arrival times are derived from distances and speeds, so they are
//! fractional; `Seconds` is therefore a float.
//!
//! Clock strings accept both the 12-hour form used in package tables
//! (`"10:30 AM"`, `"9:05 am"`) and a plain 24-hour form (`"13:15"`).

use regex::Regex;
use std::sync::LazyLock;

/// Seconds since midnight.
pub type Seconds = f64;

/// The end-of-day sentinel: one second before midnight.
///
/// Used as the deadline of packages without a deadline (`"EOD"`) and as the
/// arrival time of packages that are not yet scheduled.
pub const END_OF_DAY: Seconds = 86_399.0;

/// Seconds in one hour.
pub const SECONDS_PER_HOUR: Seconds = 3_600.0;

static CLOCK_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(\d{1,2}):(\d{2})(?::(\d{2}))?\s*([AaPp][Mm])?\s*$")
        .expect("clock pattern is a valid regular expression")
});

/// The error returned when a clock string cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClockParseError {
    /// The offending input.
    pub input: String,
}

impl std::fmt::Display for ClockParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Could not parse '{}' as a time of day", self.input)
    }
}

impl std::error::Error for ClockParseError {}

/// Parses a time of day into seconds since midnight.
///
/// # Examples
///
/// ```rust
/// # use courier_model::time::parse_clock;
///
/// assert_eq!(parse_clock("10:30 AM"), Ok(37_800.0));
/// assert_eq!(parse_clock("9:05 am"), Ok(32_700.0));
/// assert_eq!(parse_clock("1:00 PM"), Ok(46_800.0));
/// assert_eq!(parse_clock("13:00"), Ok(46_800.0));
/// assert!(parse_clock("noon").is_err());
/// ```
pub fn parse_clock(input: &str) -> Result<Seconds, ClockParseError> {
    let err = || ClockParseError {
        input: input.to_owned(),
    };

    let caps = CLOCK_PATTERN.captures(input).ok_or_else(err)?;
    let field = |i: usize| -> Result<u32, ClockParseError> {
        caps.get(i)
            .map_or(Ok(0), |m| m.as_str().parse::<u32>().map_err(|_| err()))
    };

    let mut hour = field(1)?;
    let minute = field(2)?;
    let second = field(3)?;

    if minute > 59 || second > 59 {
        return Err(err());
    }

    match caps.get(4).map(|m| m.as_str().to_ascii_uppercase()) {
        Some(meridiem) => {
            if hour == 0 || hour > 12 {
                return Err(err());
            }
            hour %= 12;
            if meridiem == "PM" {
                hour += 12;
            }
        }
        None if hour > 23 => return Err(err()),
        None => {}
    }

    Ok(f64::from(hour * 3_600 + minute * 60 + second))
}

/// Parses a package deadline: either a clock string or `"EOD"` (end of day).
///
/// # Examples
///
/// ```rust
/// # use courier_model::time::{parse_deadline, END_OF_DAY};
///
/// assert_eq!(parse_deadline("EOD"), Ok(END_OF_DAY));
/// assert_eq!(parse_deadline("10:30 AM"), Ok(37_800.0));
/// ```
pub fn parse_deadline(input: &str) -> Result<Seconds, ClockParseError> {
    if input.trim().eq_ignore_ascii_case("EOD") {
        return Ok(END_OF_DAY);
    }
    parse_clock(input)
}

/// Formats seconds since midnight as a 12-hour clock string.
///
/// Fractional seconds are truncated.
///
/// # Examples
///
/// ```rust
/// # use courier_model::time::{format_clock, END_OF_DAY};
///
/// assert_eq!(format_clock(37_800.0), "10:30 AM");
/// assert_eq!(format_clock(46_800.0 + 300.0), "1:05 PM");
/// assert_eq!(format_clock(0.0), "12:00 AM");
/// assert_eq!(format_clock(END_OF_DAY), "11:59 PM");
/// ```
pub fn format_clock(seconds: Seconds) -> String {
    let total = seconds.max(0.0) as u64;
    let hour = (total / 3_600) % 24;
    let minute = (total % 3_600) / 60;
    let meridiem = if hour >= 12 { "PM" } else { "AM" };
    let display_hour = match hour % 12 {
        0 => 12,
        h => h,
    };
    format!("{}:{:02} {}", display_hour, minute, meridiem)
}

/// Converts a distance in miles into travel seconds at `speed_mph`.
///
/// # Examples
///
/// ```rust
/// # use courier_model::time::travel_seconds;
///
/// assert_eq!(travel_seconds(9.0, 18.0), 1_800.0);
/// ```
#[inline]
pub fn travel_seconds(miles: f64, speed_mph: f64) -> Seconds {
    debug_assert!(
        speed_mph > 0.0,
        "called `travel_seconds` with a non-positive speed: {}",
        speed_mph
    );

    miles / speed_mph * SECONDS_PER_HOUR
}

/// Converts driving seconds at `speed_mph` into miles.
#[inline]
pub fn miles_driven(seconds: Seconds, speed_mph: f64) -> f64 {
    seconds * speed_mph / SECONDS_PER_HOUR
}
