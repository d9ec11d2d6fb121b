//! Display brightness control sets.
//!
//! The enumerated brightness levels are themselves the capability set, so
//! there is no min/max pairing; a level is its own least restrictive status.

use dptf_common::{DisplayControl, Percentage, Result};

use super::set::{ControlCapability, ControlSet};

/// Enumerated brightness levels, brightest first.
pub type DisplayControlSet = ControlSet<DisplayControl>;

impl ControlCapability for DisplayControl {
    type Slot = Percentage;
    type Status = DisplayControl;

    fn slot(&self) -> Percentage {
        self.brightness
    }

    fn least_restrictive(&self) -> DisplayControl {
        *self
    }

    fn status_slot(status: &DisplayControl) -> Percentage {
        status.brightness
    }
}

impl ControlSet<DisplayControl> {
    /// Index of the level with exactly this brightness.
    pub fn control_index(&self, brightness: Percentage) -> Result<usize> {
        self.index_of(brightness)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dptf_common::Error;

    fn levels(values: &[f64]) -> DisplayControlSet {
        DisplayControlSet::new(
            values
                .iter()
                .map(|&b| DisplayControl::new(Percentage::new(b)))
                .collect(),
        )
    }

    #[test]
    fn test_control_index_exact_match() {
        let set = levels(&[1.0, 0.75, 0.5, 0.25]);
        assert_eq!(set.len(), 4);
        assert_eq!(set.control_index(Percentage::new(0.5)).unwrap(), 2);
    }

    #[test]
    fn test_control_index_absent() {
        let set = levels(&[1.0, 0.5]);
        assert!(matches!(
            set.control_index(Percentage::new(0.6)),
            Err(Error::SlotNotFound { .. })
        ));
    }

    #[test]
    fn test_indexed_access() {
        let set = levels(&[1.0, 0.5]);
        assert_eq!(set.get(1).unwrap().brightness, Percentage::new(0.5));
        assert!(matches!(
            set.get(2),
            Err(Error::IndexOutOfRange { index: 2, len: 2 })
        ));
    }

    #[test]
    fn test_structural_equality() {
        assert_eq!(levels(&[1.0, 0.5]), levels(&[1.0, 0.5]));
        assert_ne!(levels(&[1.0, 0.5]), levels(&[0.5, 1.0]));
        assert_ne!(levels(&[1.0]), levels(&[1.0, 0.5]));
    }
}
