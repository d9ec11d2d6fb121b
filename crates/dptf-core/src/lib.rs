//! Power and display control facades.
//!
//! A facade presents one domain's control capabilities and current state,
//! and commits new control requests to hardware while keeping its cached
//! view coherent.

pub mod cache;
pub mod control;
pub mod exit_codes;
pub mod facade;
pub mod logging;
pub mod services;
pub mod sim;

pub use cache::CachedProperty;
pub use control::{
    ControlCapability, ControlSet, ControlStatusSet, DisplayControlSet,
    PowerControlDynamicCapsSet, PowerControlStatusSet,
};
pub use facade::{DisplayControlFacade, PowerControlFacade};
pub use services::{DomainDisplayControl, DomainPowerControl, DomainPowerStatus, PolicyServices};
pub use sim::SimulatedPlatform;
