//! Power control facade tests against the simulated platform.
//!
//! Covers:
//! - Shape of the submitted set for single-tier requests
//! - Capability cache invalidation after writes (observed via fetch counts)
//! - Arming once, then clamping PL1 into moved bounds
//! - Unsupported domains and write faults leaving state untouched

use std::sync::Arc;

use dptf_common::{
    DomainIndex, DomainProperties, Error, ParticipantIndex, Percentage, Power,
    PowerControlDynamicCaps, PowerControlStatus, PowerControlType, TimeWindow,
};
use dptf_core::{PolicyServices, PowerControlFacade, SimulatedPlatform};
use proptest::prelude::*;

const P: ParticipantIndex = ParticipantIndex(0);
const D: DomainIndex = DomainIndex(0);

fn tier(kind: PowerControlType, min_w: u32, max_w: u32) -> PowerControlDynamicCaps {
    PowerControlDynamicCaps {
        power_control_type: kind,
        min_power_limit: Power::from_watts(min_w),
        max_power_limit: Power::from_watts(max_w),
        power_step_size: Power::from_milliwatts(250),
        min_time_window: TimeWindow::from_millis(1_000),
        max_time_window: TimeWindow::from_millis(28_000),
        min_duty_cycle: Percentage::new(0.0),
        max_duty_cycle: Percentage::new(1.0),
    }
}

fn pl1_status(watts: u32) -> PowerControlStatus {
    PowerControlStatus::new(
        PowerControlType::Pl1,
        Power::from_watts(watts),
        TimeWindow::from_millis(28_000),
        Percentage::new(1.0),
    )
}

fn setup(caps: Vec<PowerControlDynamicCaps>) -> (Arc<SimulatedPlatform>, PowerControlFacade) {
    let platform = Arc::new(SimulatedPlatform::new().with_power_domain(P, D, caps));
    let facade = PowerControlFacade::new(
        P,
        D,
        DomainProperties::new("package").with_power_control(),
        PolicyServices::from_platform(platform.clone()),
    );
    (platform, facade)
}

#[test]
fn first_arm_submits_every_tier_at_maximum() {
    let (platform, mut facade) = setup(vec![tier(PowerControlType::Pl1, 5, 30)]);

    facade.ensure_initialized().unwrap();

    let writes = platform.power_writes(P, D);
    assert_eq!(writes.len(), 1);
    assert_eq!(writes[0].len(), 1);
    assert_eq!(writes[0][0].current_power_limit, Power::from_watts(30));
    assert_eq!(
        facade.get_last_issued().map(|s| s.current_power_limit),
        Some(Power::from_watts(30))
    );
    assert!(facade.is_initialized());
}

#[test]
fn rearm_with_unchanged_bounds_writes_nothing() {
    let (platform, mut facade) = setup(vec![
        tier(PowerControlType::Pl1, 5, 30),
        tier(PowerControlType::Pl2, 5, 45),
    ]);

    facade.ensure_initialized().unwrap();
    facade.ensure_initialized().unwrap();
    facade.ensure_initialized().unwrap();

    assert_eq!(platform.power_write_count(P, D), 1);
}

#[test]
fn single_tier_write_before_arming_does_not_skip_baseline() {
    let (platform, mut facade) = setup(vec![
        tier(PowerControlType::Pl1, 5, 30),
        tier(PowerControlType::Pl2, 5, 45),
    ]);

    facade.set_control(pl1_status(10), 0).unwrap();
    assert!(!facade.is_initialized());
    assert_eq!(
        facade.get_last_issued().map(|s| s.current_power_limit),
        Some(Power::from_watts(10))
    );

    facade.ensure_initialized().unwrap();

    let writes = platform.power_writes(P, D);
    assert_eq!(writes.len(), 2);
    assert_eq!(
        writes[1],
        vec![
            tier(PowerControlType::Pl1, 5, 30).max_status(),
            tier(PowerControlType::Pl2, 5, 45).max_status(),
        ]
    );
    assert!(facade.is_initialized());
    assert_eq!(
        facade.get_last_issued().map(|s| s.current_power_limit),
        Some(Power::from_watts(30))
    );

    facade.ensure_initialized().unwrap();
    assert_eq!(platform.power_write_count(P, D), 2);
}

#[test]
fn rearm_clamps_last_issued_above_max() {
    let (platform, mut facade) = setup(vec![tier(PowerControlType::Pl1, 5, 30)]);
    facade.ensure_initialized().unwrap();

    // Above the reported maximum; set_control submits verbatim.
    facade.set_control(pl1_status(35), 0).unwrap();
    assert_eq!(platform.power_write_count(P, D), 2);

    facade.ensure_initialized().unwrap();

    let writes = platform.power_writes(P, D);
    assert_eq!(writes.len(), 3);
    assert_eq!(writes[2][0].current_power_limit, Power::from_watts(30));
    assert_eq!(
        facade.get_last_issued().map(|s| s.current_power_limit),
        Some(Power::from_watts(30))
    );
}

#[test]
fn rearm_clamps_last_issued_below_min() {
    let (platform, mut facade) = setup(vec![tier(PowerControlType::Pl1, 5, 30)]);
    facade.ensure_initialized().unwrap();
    facade.set_control(pl1_status(20), 0).unwrap();

    // Thermal headroom shrinks: the floor rises above what was issued.
    platform.set_power_capabilities(P, D, vec![tier(PowerControlType::Pl1, 25, 30)]);
    facade.ensure_initialized().unwrap();

    let writes = platform.power_writes(P, D);
    assert_eq!(writes.len(), 3);
    let clamped = writes[2][0];
    assert_eq!(clamped.current_power_limit, Power::from_watts(25));
    assert_eq!(clamped.current_time_window, TimeWindow::from_millis(28_000));
}

#[test]
fn rearm_follows_shrinking_maximum() {
    let (platform, mut facade) = setup(vec![tier(PowerControlType::Pl1, 5, 30)]);
    facade.ensure_initialized().unwrap();

    platform.set_power_capabilities(P, D, vec![tier(PowerControlType::Pl1, 5, 22)]);
    facade.ensure_initialized().unwrap();

    let writes = platform.power_writes(P, D);
    assert_eq!(writes.len(), 2);
    assert_eq!(writes[1][0].current_power_limit, Power::from_watts(22));
}

#[test]
fn rearm_requires_pl1() {
    let (platform, mut facade) = setup(vec![tier(PowerControlType::Pl2, 5, 45)]);
    // First arm does not look up PL1.
    facade.ensure_initialized().unwrap();
    assert!(matches!(
        facade.ensure_initialized(),
        Err(Error::SlotNotFound { .. })
    ));
    assert_eq!(platform.power_write_count(P, D), 1);
}

#[test]
fn set_control_relevels_siblings_to_maximum() {
    let (platform, mut facade) = setup(vec![
        tier(PowerControlType::Pl1, 5, 30),
        tier(PowerControlType::Pl2, 5, 45),
    ]);

    let requested = pl1_status(15);
    facade.set_control(requested, 0).unwrap();

    let writes = platform.power_writes(P, D);
    assert_eq!(writes.len(), 1);
    assert_eq!(writes[0][0], requested);
    assert_eq!(writes[0][1], tier(PowerControlType::Pl2, 5, 45).max_status());
}

#[test]
fn set_control_does_not_preserve_previous_sibling_values() {
    let (platform, mut facade) = setup(vec![
        tier(PowerControlType::Pl1, 5, 30),
        tier(PowerControlType::Pl2, 5, 45),
    ]);

    let pl2 = PowerControlStatus::new(
        PowerControlType::Pl2,
        Power::from_watts(20),
        TimeWindow::from_millis(28_000),
        Percentage::new(1.0),
    );
    facade.set_control(pl2, 1).unwrap();
    facade.set_control(pl1_status(10), 0).unwrap();

    let writes = platform.power_writes(P, D);
    assert_eq!(writes[1][1].current_power_limit, Power::from_watts(45));
}

#[test]
fn successful_writes_invalidate_capability_cache() {
    let (platform, mut facade) = setup(vec![tier(PowerControlType::Pl1, 5, 30)]);

    facade.get_capabilities().unwrap();
    assert_eq!(platform.power_capability_fetches(P, D), 1);

    facade.ensure_initialized().unwrap();
    facade.get_capabilities().unwrap();
    assert_eq!(platform.power_capability_fetches(P, D), 2);

    facade.set_control(pl1_status(12), 0).unwrap();
    facade.get_capabilities().unwrap();
    facade.get_capabilities().unwrap();
    assert_eq!(platform.power_capability_fetches(P, D), 3);
}

#[test]
fn unsupported_domain_faults_without_writes() {
    let platform = Arc::new(SimulatedPlatform::new().with_power_domain(
        P,
        D,
        vec![tier(PowerControlType::Pl1, 5, 30)],
    ));
    let mut facade = PowerControlFacade::new(
        P,
        D,
        DomainProperties::new("backlight").with_display_control(),
        PolicyServices::from_platform(platform.clone()),
    );

    assert!(!facade.supports_power_controls());
    assert!(matches!(
        facade.set_control(pl1_status(10), 0),
        Err(Error::UnsupportedDomain { .. })
    ));
    assert!(matches!(
        facade.get_capabilities(),
        Err(Error::UnsupportedDomain { .. })
    ));

    // ensure_initialized swallows the unsupported case.
    facade.ensure_initialized().unwrap();
    assert!(!facade.is_initialized());

    assert_eq!(platform.power_write_count(P, D), 0);
    assert_eq!(platform.power_capability_fetches(P, D), 0);
}

#[test]
fn write_fault_leaves_state_untouched() {
    let (platform, mut facade) = setup(vec![tier(PowerControlType::Pl1, 5, 30)]);
    facade.get_capabilities().unwrap();

    platform.fail_writes(P, D, Some("EC timeout"));
    let err = facade.ensure_initialized().unwrap_err();
    assert!(matches!(err, Error::HardwareWrite(ref reason) if reason == "EC timeout"));
    assert!(!facade.is_initialized());
    assert_eq!(facade.get_last_issued(), None);

    // Cache was not invalidated by the failed write.
    facade.get_capabilities().unwrap();
    assert_eq!(platform.power_capability_fetches(P, D), 1);

    platform.fail_writes(P, D, None);
    facade.ensure_initialized().unwrap();
    assert!(facade.is_initialized());
    assert_eq!(platform.power_write_count(P, D), 1);
}

#[test]
fn failed_single_tier_write_keeps_last_issued() {
    let (platform, mut facade) = setup(vec![tier(PowerControlType::Pl1, 5, 30)]);
    facade.ensure_initialized().unwrap();

    platform.fail_writes(P, D, Some("nak"));
    assert!(facade.set_control(pl1_status(8), 0).is_err());
    assert_eq!(
        facade.get_last_issued().map(|s| s.current_power_limit),
        Some(Power::from_watts(30))
    );
}

#[test]
fn live_status_is_not_cached() {
    let (platform, facade) = setup(vec![tier(PowerControlType::Pl1, 5, 30)]);
    platform.set_current_power(P, D, Power::from_watts(9));
    assert_eq!(facade.get_current_power().unwrap().current_power, Power::from_watts(9));
    platform.set_current_power(P, D, Power::from_watts(14));
    assert_eq!(facade.get_current_power().unwrap().current_power, Power::from_watts(14));
}

#[test]
fn controls_reflect_committed_writes_after_invalidation() {
    let (_, mut facade) = setup(vec![
        tier(PowerControlType::Pl1, 5, 30),
        tier(PowerControlType::Pl2, 5, 45),
    ]);
    facade.ensure_initialized().unwrap();
    assert_eq!(
        facade.get_controls().unwrap().get(0).unwrap().current_power_limit,
        Power::from_watts(30)
    );

    facade.set_control(pl1_status(18), 0).unwrap();
    let controls = facade.get_controls().unwrap();
    assert_eq!(controls.get(0).unwrap().current_power_limit, Power::from_watts(18));
    assert_eq!(controls.get(1).unwrap().current_power_limit, Power::from_watts(45));
}

fn tier_sets() -> impl Strategy<Value = Vec<PowerControlDynamicCaps>> {
    (1usize..=4).prop_flat_map(|count| {
        prop::collection::vec((1u32..50, 0u32..50), count).prop_map(|bounds| {
            bounds
                .into_iter()
                .zip(PowerControlType::ALL)
                .map(|((min_w, span), kind)| tier(kind, min_w, min_w + span))
                .collect()
        })
    })
}

proptest! {
    #[test]
    fn submitted_set_matches_capability_shape(
        caps in tier_sets(),
        pick in any::<prop::sample::Index>(),
        watts in 1u32..100,
    ) {
        let (platform, mut facade) = setup(caps.clone());
        let index = pick.index(caps.len());
        let requested = PowerControlStatus::new(
            caps[index].power_control_type,
            Power::from_watts(watts),
            TimeWindow::from_millis(1_000),
            Percentage::new(0.5),
        );

        facade.set_control(requested, index).unwrap();

        let writes = platform.power_writes(P, D);
        prop_assert_eq!(writes.len(), 1);
        let submitted = &writes[0];
        prop_assert_eq!(submitted.len(), facade.get_capabilities().unwrap().len());
        for (position, entry) in submitted.iter().enumerate() {
            if position == index {
                prop_assert_eq!(*entry, requested);
            } else {
                prop_assert_eq!(*entry, caps[position].max_status());
            }
        }
    }
}
