use titan_quicklook::common::bodies::Body;
use titan_quicklook::common::constants::{A_EARTH, A_SATURN, MU_SUN, SECONDS_PER_YEAR};
use titan_quicklook::ephem::{CircularOrbit, synodic_period};
use titan_quicklook::impulsive::stumpff;
use titan_quicklook::impulsive::transfers::{hohmann, vis_viva};
use titan_quicklook::orbits::{escape_delta_v, titan_relative_vinf_bounds};
use titan_quicklook::transfer::hohmann_quick_look;

#[test]
fn earth_saturn_hohmann_numbers() {
    let h = hohmann(A_EARTH, A_SATURN, MU_SUN);
    assert!((h.dv1_m_s / 1e3 - 10.29).abs() < 0.01, "dv1 = {}", h.dv1_m_s);
    assert!((h.dv2_m_s / 1e3 - 5.44).abs() < 0.01, "dv2 = {}", h.dv2_m_s);
    let years = h.tof_seconds / SECONDS_PER_YEAR;
    assert!((years - 6.05).abs() < 0.01, "tof = {years} years");
    assert!((h.dv_total_m_s - h.dv1_m_s - h.dv2_m_s).abs() < 1e-9);
}

#[test]
fn hohmann_is_symmetric_under_reversal() {
    let out = hohmann(A_EARTH, A_SATURN, MU_SUN);
    let back = hohmann(A_SATURN, A_EARTH, MU_SUN);
    assert!((out.dv_total_m_s - back.dv_total_m_s).abs() < 1e-6);
    assert!((out.tof_seconds - back.tof_seconds).abs() < 1e-6);
    assert!(out.dv1_m_s > 0.0);
    assert!(back.dv1_m_s < 0.0);
}

#[test]
fn vis_viva_on_a_circle_is_circular_speed() {
    let v = vis_viva(MU_SUN, A_EARTH, A_EARTH);
    assert!((v - (MU_SUN / A_EARTH).sqrt()).abs() < 1e-9);
}

#[test]
fn stumpff_functions_are_continuous_through_zero() {
    let (c0, s0) = stumpff(0.0);
    assert!((c0 - 0.5).abs() < 1e-15);
    assert!((s0 - 1.0 / 6.0).abs() < 1e-15);
    for z in [1e-3, -1e-3, 1.1e-3, -1.1e-3] {
        let (c, s) = stumpff(z);
        assert!((c - (0.5 - z / 24.0)).abs() < 1e-8, "C({z}) = {c}");
        assert!((s - (1.0 / 6.0 - z / 120.0)).abs() < 1e-8, "S({z}) = {s}");
    }
}

#[test]
fn earth_saturn_synodic_period() {
    let earth = CircularOrbit::of_body(Body::Earth).expect("earth");
    let saturn = CircularOrbit::of_body(Body::Saturn).expect("saturn");
    let period = synodic_period(&earth, &saturn).expect("distinct periods");
    assert!((period / SECONDS_PER_YEAR - 1.035).abs() < 0.002);
}

#[test]
fn escape_from_leo_and_titan_bounds() {
    let rp = Body::Earth.radius() + 300.0e3;
    let zero = escape_delta_v(Body::Earth.mu(), rp, 0.0);
    assert!((zero - 3_200.0).abs() < 10.0, "escape dv = {zero}");

    let (low, high) = titan_relative_vinf_bounds(5_443.0);
    assert_eq!(low, 0.0);
    assert!((high - (5_443.0 + 5_572.0)).abs() < 10.0);
}

#[test]
fn quick_look_ties_the_pieces_together() {
    let look = hohmann_quick_look(Body::Earth, Body::Saturn, Some(Body::Titan), 300.0e3)
        .expect("quick look");
    assert!((look.vinf_depart_m_s - look.transfer.dv1_m_s).abs() < 1e-9);
    let expected = escape_delta_v(
        Body::Earth.mu(),
        Body::Earth.radius() + 300.0e3,
        look.vinf_depart_m_s,
    );
    assert!((look.escape_dv_m_s - expected).abs() < 1e-9);
    let bounds = look.moon_bounds.expect("titan bounds");
    assert_eq!(bounds.moon, Body::Titan);
    assert!(bounds.low_m_s <= bounds.high_m_s);
    assert!(look.synodic_period_s.is_some());
}
