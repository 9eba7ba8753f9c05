use std::f64::consts::PI;

use titan_quicklook::common::bodies::Body;
use titan_quicklook::common::constants::{MU_TITAN, R_TITAN};
use titan_quicklook::orbits::{FlybyGeometry, periapsis_for_turn, post_flyby_vinf, turn_angle};
use titan_quicklook::transfer::{Moon, linspace, post_flyby_map, turn_angle_curves};

fn titan() -> Moon {
    Moon::from_body(Body::Titan).expect("titan orbits saturn")
}

#[test]
fn titan_turn_angle_at_one_thousand_km() {
    let delta = turn_angle(3_000.0, R_TITAN + 1_000.0e3, MU_TITAN).expect("turn angle");
    let expected = 2.0 * (MU_TITAN / ((R_TITAN + 1_000.0e3) * 9.0e6)).atan();
    assert!((delta - expected).abs() < 1e-12);
    assert!((delta.to_degrees() - 31.2).abs() < 0.5, "delta = {}", delta.to_degrees());

    let rp = periapsis_for_turn(3_000.0, delta, MU_TITAN).expect("periapsis");
    assert!((rp - (R_TITAN + 1_000.0e3)).abs() < 1e-3);
}

#[test]
fn turn_angle_curves_are_ordered_by_speed() {
    let altitudes = linspace(100.0e3, 4_000.0e3, 40);
    let curves = turn_angle_curves(&titan(), &[1_000.0, 3_000.0, 6_000.0], &altitudes)
        .expect("curves");
    for pair in curves.windows(2) {
        for (slow, fast) in pair[0].turn_angle_rad.iter().zip(&pair[1].turn_angle_rad) {
            assert!(slow > fast);
        }
    }
    assert!(curves.iter().flat_map(|c| &c.turn_angle_rad).all(|d| *d > 0.0 && *d < PI));
}

#[test]
fn aligned_fast_approach_is_slowed_by_any_turn() {
    let moon = titan();
    let v_in = 8_000.0;
    let altitudes = linspace(100.0e3, 4_000.0e3, 5);
    for prograde in [true, false] {
        let map = post_flyby_map(&moon, v_in, &[0.0], &altitudes, prograde);
        for (_, _, cell) in map.vinf_out_m_s.iter() {
            let v_out = cell.expect("defined cell");
            assert!(v_out < v_in, "v_out = {v_out}");
            assert!(v_out >= v_in - 2.0 * (v_in - moon.orbital_speed_m_s) - 1e-6);
        }
    }
}

#[test]
fn retrograde_mirrors_prograde() {
    let moon = titan();
    for psi in [0.3, 1.2, 2.5] {
        let base = FlybyGeometry {
            vinf_parent_m_s: 5_500.0,
            psi_rad: psi,
            periapsis_altitude_m: 800.0e3,
            moon_radius_m: moon.radius_m,
            moon_mu_m3_s2: moon.mu_m3_s2,
            moon_speed_m_s: moon.orbital_speed_m_s,
            prograde: true,
        };
        let mirrored = FlybyGeometry {
            psi_rad: -psi,
            prograde: false,
            ..base
        };
        let a = post_flyby_vinf(&base).expect("prograde");
        let b = post_flyby_vinf(&mirrored).expect("retrograde");
        assert!((a.vinf_out_parent_m_s - b.vinf_out_parent_m_s).abs() < 1e-6);
        assert!((a.turn_angle_rad - b.turn_angle_rad).abs() < 1e-12);
    }
}

#[test]
fn map_axes_follow_inputs() {
    let psi = linspace(0.0, PI, 7);
    let altitudes = linspace(100.0e3, 4_000.0e3, 3);
    let map = post_flyby_map(&titan(), 5_500.0, &psi, &altitudes, true);
    assert_eq!(map.vinf_out_m_s.rows(), 3);
    assert_eq!(map.vinf_out_m_s.cols(), 7);
    assert_eq!(map.vinf_out_m_s.valid_count(), 21);
    assert_eq!(map.psi_rad, psi);
    assert_eq!(map.altitudes_m, altitudes);
}
