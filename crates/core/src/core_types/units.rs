//! Semantic unit types for weather quantities
//!
//! Newtype wrappers keep absolute temperatures, temperature changes and
//! percentages from being mixed up in the stepping arithmetic.
//!
//! # Design Philosophy
//! - Temperatures use f64, percentages are whole numbers (u8)
//! - Total ordering via Ord trait (NaN handled as greater than all values)
//! - Private inner fields with validated constructors
//! - Serde support for serialization (serialized as the bare inner value)
//!
//! # Usage
//! ```
//! use weather_sim_core::core_types::units::{Celsius, CelsiusDelta};
//!
//! let t = Celsius::new(12.5) + CelsiusDelta::new(-0.5);
//! assert_eq!(t, Celsius::new(12.0));
//!
//! // Use standard clamp from Ord trait
//! assert_eq!(t.clamp(Celsius::new(15.0), Celsius::new(45.0)), Celsius::new(15.0));
//! ```

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, AddAssign, Deref, Neg, Sub, SubAssign};

/// Compare f64 values with total ordering using Rust's built-in `total_cmp`
#[inline]
fn f64_total_cmp(a: f64, b: f64) -> Ordering {
    a.total_cmp(&b)
}

// ============================================================================
// TEMPERATURE TYPES
// ============================================================================

/// Air temperature in degrees Celsius
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
#[repr(transparent)]
pub struct Celsius(f64);

impl Eq for Celsius {}

impl PartialOrd for Celsius {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Celsius {
    fn cmp(&self, other: &Self) -> Ordering {
        f64_total_cmp(self.0, other.0)
    }
}

impl Deref for Celsius {
    type Target = f64;
    #[inline]
    fn deref(&self) -> &f64 {
        &self.0
    }
}

impl Celsius {
    /// Absolute zero in Celsius
    pub const ABSOLUTE_ZERO: Celsius = Celsius(-273.15);

    /// Create a new Celsius temperature. Asserts value >= absolute zero (-273.15°C).
    #[inline]
    #[must_use]
    #[track_caller]
    pub const fn new(value: f64) -> Self {
        assert!(
            value >= -273.15,
            "Celsius::new: value is below absolute zero (-273.15°C)"
        );
        Celsius(value)
    }
}

/// Temperature difference/delta in Celsius
///
/// Can be any value (positive or negative). Produced by the stepping model
/// and applied to the previous temperature.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
#[repr(transparent)]
pub struct CelsiusDelta(f64);

impl Eq for CelsiusDelta {}

impl PartialOrd for CelsiusDelta {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CelsiusDelta {
    fn cmp(&self, other: &Self) -> Ordering {
        f64_total_cmp(self.0, other.0)
    }
}

impl CelsiusDelta {
    /// No change
    pub const ZERO: CelsiusDelta = CelsiusDelta(0.0);

    /// Create a temperature delta (can be any value, positive or negative)
    #[inline]
    #[must_use]
    pub const fn new(value: f64) -> Self {
        CelsiusDelta(value)
    }
}

impl Deref for CelsiusDelta {
    type Target = f64;
    #[inline]
    fn deref(&self) -> &f64 {
        &self.0
    }
}

impl Neg for CelsiusDelta {
    type Output = CelsiusDelta;
    fn neg(self) -> CelsiusDelta {
        CelsiusDelta(-self.0)
    }
}

impl Add for CelsiusDelta {
    type Output = CelsiusDelta;
    fn add(self, rhs: CelsiusDelta) -> CelsiusDelta {
        CelsiusDelta(self.0 + rhs.0)
    }
}

impl AddAssign for CelsiusDelta {
    fn add_assign(&mut self, rhs: CelsiusDelta) {
        self.0 += rhs.0;
    }
}

impl Sub for CelsiusDelta {
    type Output = CelsiusDelta;
    fn sub(self, rhs: CelsiusDelta) -> CelsiusDelta {
        CelsiusDelta(self.0 - rhs.0)
    }
}

impl SubAssign for CelsiusDelta {
    fn sub_assign(&mut self, rhs: CelsiusDelta) {
        self.0 -= rhs.0;
    }
}

impl PartialEq<f64> for CelsiusDelta {
    fn eq(&self, other: &f64) -> bool {
        self.0 == *other
    }
}

impl PartialOrd<f64> for CelsiusDelta {
    fn partial_cmp(&self, other: &f64) -> Option<Ordering> {
        self.0.partial_cmp(other)
    }
}

impl fmt::Display for CelsiusDelta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:+.1}°C", self.0)
    }
}

// Celsius + CelsiusDelta = Celsius (adding a change to absolute temperature)
impl Add<CelsiusDelta> for Celsius {
    type Output = Celsius;
    fn add(self, rhs: CelsiusDelta) -> Celsius {
        let result = self.0 + rhs.0;
        assert!(
            result >= *Celsius::ABSOLUTE_ZERO,
            "Temperature below absolute zero: {result:.2}°C"
        );
        Celsius(result)
    }
}

// Celsius - Celsius = CelsiusDelta (difference between two absolute temperatures)
impl Sub for Celsius {
    type Output = CelsiusDelta;
    fn sub(self, rhs: Celsius) -> CelsiusDelta {
        CelsiusDelta(self.0 - rhs.0)
    }
}

impl PartialEq<f64> for Celsius {
    fn eq(&self, other: &f64) -> bool {
        self.0 == *other
    }
}

impl PartialOrd<f64> for Celsius {
    fn partial_cmp(&self, other: &f64) -> Option<Ordering> {
        self.0.partial_cmp(other)
    }
}

impl fmt::Display for Celsius {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}°C", self.0)
    }
}

// ============================================================================
// PERCENTAGE
// ============================================================================

/// Whole-number percentage in `[0, 100]`
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(try_from = "u8", into = "u8")]
#[repr(transparent)]
pub struct Percent(u8);

impl Percent {
    /// 0%
    pub const ZERO: Percent = Percent(0);

    /// 100%
    pub const MAX: Percent = Percent(100);

    /// Create a new percentage. Asserts value <= 100.
    #[inline]
    #[must_use]
    #[track_caller]
    pub const fn new(value: u8) -> Self {
        assert!(value <= 100, "Percent::new: value not in [0, 100]");
        Percent(value)
    }
}

impl Deref for Percent {
    type Target = u8;
    #[inline]
    fn deref(&self) -> &u8 {
        &self.0
    }
}

impl TryFrom<u8> for Percent {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        if value <= 100 {
            Ok(Percent(value))
        } else {
            Err(format!("percentage {value} exceeds 100"))
        }
    }
}

impl From<Percent> for u8 {
    fn from(p: Percent) -> u8 {
        p.0
    }
}

impl fmt::Display for Percent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_celsius_plus_delta() {
        let t = Celsius::new(10.0) + CelsiusDelta::new(-2.5);
        assert!((*t - 7.5).abs() < 1e-12);
    }

    #[test]
    fn test_celsius_difference_is_delta() {
        let d = Celsius::new(3.0) - Celsius::new(5.0);
        assert_eq!(d, CelsiusDelta::new(-2.0));
    }

    #[test]
    fn test_celsius_clamp_uses_total_order() {
        let lo = Celsius::new(-15.0);
        let hi = Celsius::new(15.0);
        assert_eq!(Celsius::new(20.0).clamp(lo, hi), hi);
        assert_eq!(Celsius::new(-40.0).clamp(lo, hi), lo);
        assert_eq!(Celsius::new(1.0).clamp(lo, hi), Celsius::new(1.0));
    }

    #[test]
    #[should_panic(expected = "below absolute zero")]
    fn test_celsius_new_panics_below_absolute_zero() {
        let _ = Celsius::new(-300.0);
    }

    #[test]
    fn test_delta_accumulates() {
        let mut d = CelsiusDelta::ZERO;
        d += CelsiusDelta::new(0.7);
        d -= CelsiusDelta::new(0.3);
        assert!((*d - 0.4).abs() < 1e-12);
        assert_eq!(-CelsiusDelta::new(1.5), CelsiusDelta::new(-1.5));
    }

    #[test]
    #[should_panic(expected = "Percent::new: value not in [0, 100]")]
    fn test_percent_new_panics_on_too_large() {
        let _ = Percent::new(101);
    }

    #[test]
    fn test_percent_try_from() {
        assert_eq!(Percent::try_from(100), Ok(Percent::MAX));
        assert!(Percent::try_from(150).is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(Celsius::new(21.04).to_string(), "21.0°C");
        assert_eq!(CelsiusDelta::new(0.7).to_string(), "+0.7°C");
        assert_eq!(Percent::new(42).to_string(), "42%");
    }
}
