//! Bounded control sets.

pub mod display;
pub mod power;
pub mod set;

pub use display::DisplayControlSet;
pub use power::{PowerControlDynamicCapsSet, PowerControlStatusSet};
pub use set::{ControlCapability, ControlSet, ControlStatusSet};
