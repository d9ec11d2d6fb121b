//! Control facades.
//!
//! One facade exists per (participant, domain) pair. It owns its caches,
//! whether the domain has been armed and what it last issued. Facades are
//! driven sequentially by a single policy loop; callers sharing a domain
//! across policies must serialize access themselves.
//!
//! Arming and issuing are tracked separately: a single-slot write records
//! what was issued but never counts as arming, so the first
//! `ensure_initialized` always submits the unthrottled baseline.

pub mod display;
pub mod power;

pub use display::DisplayControlFacade;
pub use power::PowerControlFacade;
