//! Unit newtypes.
//!
//! Only construction and comparison are provided; the facades never
//! convert between units.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Power in milliwatts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Power(pub u32);

impl Power {
    pub const fn from_milliwatts(mw: u32) -> Self {
        Power(mw)
    }

    /// Whole watts, saturating at `u32::MAX` milliwatts. Use
    /// [`Power::checked_from_watts`] for untrusted input.
    pub const fn from_watts(watts: u32) -> Self {
        Power(watts.saturating_mul(1000))
    }

    /// Whole watts, or `None` if the value does not fit in milliwatts.
    pub const fn checked_from_watts(watts: u32) -> Option<Self> {
        match watts.checked_mul(1000) {
            Some(mw) => Some(Power(mw)),
            None => None,
        }
    }

    pub const fn milliwatts(self) -> u32 {
        self.0
    }
}

impl fmt::Display for Power {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 % 1000 == 0 {
            write!(f, "{}W", self.0 / 1000)
        } else {
            write!(f, "{}mW", self.0)
        }
    }
}

/// Time window in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TimeWindow(pub u32);

impl TimeWindow {
    pub const fn from_millis(ms: u32) -> Self {
        TimeWindow(ms)
    }

    pub const fn millis(self) -> u32 {
        self.0
    }
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}ms", self.0)
    }
}

/// Fraction in `[0.0, 1.0]` (duty cycle, brightness).
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Percentage(pub f64);

impl Percentage {
    pub const fn new(fraction: f64) -> Self {
        Percentage(fraction)
    }

    pub const fn fraction(self) -> f64 {
        self.0
    }

    /// Whether the value lies in the closed unit interval.
    pub fn is_valid(self) -> bool {
        (0.0..=1.0).contains(&self.0)
    }
}

impl fmt::Display for Percentage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}%", self.0 * 100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_power_ordering() {
        assert!(Power::from_watts(35) > Power::from_watts(30));
        assert!(Power::from_milliwatts(4_999) < Power::from_watts(5));
        assert_eq!(Power::from_watts(30), Power(30_000));
    }

    #[test]
    fn test_watts_overflow() {
        assert_eq!(Power::checked_from_watts(4_294_967), Some(Power(4_294_967_000)));
        assert_eq!(Power::checked_from_watts(4_294_968), None);
        assert_eq!(Power::from_watts(4_294_968), Power(u32::MAX));
    }

    #[test]
    fn test_power_display() {
        assert_eq!(Power::from_watts(30).to_string(), "30W");
        assert_eq!(Power::from_milliwatts(12_500).to_string(), "12500mW");
    }

    #[test]
    fn test_percentage_validity() {
        assert!(Percentage::new(0.0).is_valid());
        assert!(Percentage::new(1.0).is_valid());
        assert!(!Percentage::new(1.01).is_valid());
        assert!(!Percentage::new(-0.1).is_valid());
        assert_eq!(Percentage::new(0.5).to_string(), "50.0%");
    }
}
