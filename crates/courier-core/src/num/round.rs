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

//! Fixed-precision rounding.
//!
//! Shortest-path relaxation sums many edge weights. Rounding each partial sum
//! to a fixed number of decimal places keeps two mathematically equal paths
//! from comparing unequal because of accumulated floating point error.

use num_traits::Float;

/// Decimal places kept on accumulated path distances.
pub const DISTANCE_PRECISION: u32 = 4;

/// Decimal places kept on raw edge weights read from a distance table.
pub const WEIGHT_PRECISION: u32 = 2;

/// Rounds `value` half away from zero to `places` decimal places.
///
/// Non-finite values (infinity, NaN) are returned unchanged.
///
/// # Examples
///
/// ```rust
/// # use courier_core::num::round::round_to_places;
///
/// assert_eq!(round_to_places(1.23456_f64, 4), 1.2346);
/// assert_eq!(round_to_places(2.005_f64, 0), 2.0);
/// assert_eq!(round_to_places(f64::INFINITY, 4), f64::INFINITY);
/// ```
#[inline]
pub fn round_to_places<F>(value: F, places: u32) -> F
where
    F: Float,
{
    if !value.is_finite() {
        return value;
    }

    let factor = scale::<F>(places);
    (value * factor).round() / factor
}

#[inline]
fn scale<F>(places: u32) -> F
where
    F: Float,
{
    let ten = F::from(10.0).unwrap_or_else(F::one);
    let mut factor = F::one();
    for _ in 0..places {
        factor = factor * ten;
    }
    factor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rounds_to_requested_places() {
        assert_eq!(round_to_places(3.14159_f64, 2), 3.14);
        assert_eq!(round_to_places(3.14159_f64, 4), 3.1416);
        assert_eq!(round_to_places(7.0_f64, 4), 7.0);
    }

    #[test]
    fn test_removes_accumulated_drift() {
        let sum = 0.1_f64 + 0.2_f64;
        assert_ne!(sum, 0.3);
        assert_eq!(round_to_places(sum, DISTANCE_PRECISION), 0.3);
    }

    #[test]
    fn test_non_finite_values_pass_through() {
        assert!(round_to_places(f64::NAN, 4).is_nan());
        assert_eq!(round_to_places(f64::NEG_INFINITY, 4), f64::NEG_INFINITY);
    }

    #[test]
    fn test_works_for_f32() {
        assert_eq!(round_to_places(1.25_f32, 1), 1.3);
    }
}
