use std::f64::consts::{PI, TAU};

use titan_quicklook::common::bodies::Body;
use titan_quicklook::common::constants::{A_EARTH, A_SATURN, MU_SUN, SECONDS_PER_YEAR};
use titan_quicklook::ephem::CircularOrbit;
use titan_quicklook::impulsive::transfers::hohmann;
use titan_quicklook::orbits::escape_delta_v;
use titan_quicklook::transfer::{
    ConvergencePolicy, ParkingOrbit, PorkchopAxes, PorkchopRequest, linspace, search,
};

fn earth_saturn(departures: usize, tofs: usize) -> PorkchopRequest {
    let axes = PorkchopAxes::new(
        linspace(0.0, 2.0 * SECONDS_PER_YEAR, departures),
        linspace(4.0 * SECONDS_PER_YEAR, 11.0 * SECONDS_PER_YEAR, tofs),
    );
    PorkchopRequest::between(Body::Earth, Body::Saturn, axes, 300.0e3).expect("request")
}

#[test]
fn reported_minimum_is_the_smallest_feasible_cell() {
    let result = search(&earth_saturn(16, 12)).expect("search");
    let min = result.departure_dv_minimum.expect("feasible cells");

    let mut best = f64::INFINITY;
    for (_, _, cell) in result.departure_dv_m_s.iter() {
        if let Some(v) = cell {
            best = best.min(v);
        }
    }
    assert_eq!(min.value, best);
    assert_eq!(
        result.departure_dv_m_s.get(min.tof_index, min.departure_index),
        Some(min.value)
    );
    assert_eq!(min.tof_s, result.axes.tof_s[min.tof_index]);
    assert_eq!(
        min.departure_offset_s,
        result.axes.departure_offsets_s[min.departure_index]
    );
}

#[test]
fn hohmann_phasing_departure_bottoms_out_near_hohmann() {
    let earth = CircularOrbit::new(A_EARTH, MU_SUN).expect("earth");
    let saturn = CircularOrbit::new(A_SATURN, MU_SUN).expect("saturn");
    let reference = hohmann(A_EARTH, A_SATURN, MU_SUN);
    let tof_h = reference.tof_seconds;

    // Saturn sits opposite Earth's departure point after exactly the Hohmann flight time.
    let lead = (saturn.mean_motion() * tof_h - PI).rem_euclid(TAU);
    let t0 = lead / (earth.mean_motion() - saturn.mean_motion());

    // Index 2 is the exact Hohmann duration: collinear positions, no transfer plane.
    let tofs: Vec<f64> = [0.95, 0.98, 1.0, 1.02, 1.05]
        .iter()
        .map(|f| f * tof_h)
        .collect();
    let mut request = earth_saturn(1, 1);
    request.axes = PorkchopAxes::new(vec![t0], tofs);
    let result = search(&request).expect("search");
    assert_eq!(result.departure_dv_m_s.get(2, 0), None);
    assert_eq!(result.infeasible_count(), 1);

    let floor = escape_delta_v(Body::Earth.mu(), Body::Earth.radius() + 300.0e3, reference.dv1_m_s);
    for (row, _, cell) in result.departure_dv_m_s.iter() {
        if row == 2 {
            continue;
        }
        let v = cell.expect("off-opposition cells are feasible");
        assert!(v >= floor - 1.0, "cell dv {v} below Hohmann floor {floor}");
    }
    let min = result.departure_dv_minimum.expect("minimum");
    assert!(
        min.tof_index == 1 || min.tof_index == 3,
        "minimum at TOF index {}",
        min.tof_index
    );
    assert!((min.value - floor).abs() / floor < 0.02, "min {} vs {floor}", min.value);
    assert_eq!(result.valley_tof_s, vec![Some(min.tof_s)]);
}

#[test]
fn fully_degenerate_grid_has_no_minimum_or_valley() {
    let orbit = CircularOrbit::new(A_EARTH, MU_SUN).expect("orbit");
    let period = orbit.period_seconds();
    let request = PorkchopRequest {
        axes: PorkchopAxes::new(
            linspace(0.0, 0.5 * SECONDS_PER_YEAR, 3),
            vec![period, 2.0 * period],
        ),
        mu_central_m3_s2: MU_SUN,
        departure_orbit_radius_m: A_EARTH,
        arrival_orbit_radius_m: A_EARTH,
        parking: ParkingOrbit::around(Body::Earth, 300.0e3),
        compare_long_way: true,
        convergence: ConvergencePolicy::Strict,
        parallel: false,
    };
    let result = search(&request).expect("search");

    assert_eq!(result.cell_count(), 6);
    assert_eq!(result.infeasible_count(), 6);
    assert!(result.departure_dv_minimum.is_none());
    assert!(result.arrival_vinf_minimum.is_none());
    assert_eq!(result.valley_tof_s, vec![None, None, None]);
}

#[test]
fn comparing_the_long_way_never_costs_more() {
    let short_only = search(&earth_saturn(8, 6)).expect("short");
    let mut request = earth_saturn(8, 6);
    request.compare_long_way = true;
    let both = search(&request).expect("both");

    for (row, col, cell) in short_only.departure_dv_m_s.iter() {
        if let Some(short) = cell {
            let best = both
                .departure_dv_m_s
                .get(row, col)
                .expect("cell stays feasible");
            assert!(best <= short, "({row}, {col}): {best} > {short}");
        }
    }
    assert!(both.samples.valid_count() >= short_only.samples.valid_count());
}

#[test]
fn serial_and_parallel_sweeps_agree() {
    let mut request = earth_saturn(10, 7);
    let parallel = search(&request).expect("parallel");
    request.parallel = false;
    let serial = search(&request).expect("serial");

    assert_eq!(parallel.departure_dv_m_s, serial.departure_dv_m_s);
    assert_eq!(parallel.arrival_vinf_m_s, serial.arrival_vinf_m_s);
    assert_eq!(parallel.departure_dv_minimum, serial.departure_dv_minimum);
    assert_eq!(parallel.valley_tof_s, serial.valley_tof_s);
}

#[test]
fn empty_axis_is_rejected() {
    let mut request = earth_saturn(4, 4);
    request.axes.tof_s.clear();
    assert!(search(&request).is_err());
}
