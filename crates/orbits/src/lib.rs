//! Orbit utility helpers for patched-conic calculations (escape/capture estimates, arrival
//! hyperbolic excess, moon-relative bounds, and flyby geometry).

pub mod flyby;

use quicklook_core::bodies::Body;

pub use flyby::{
    FlybyError, FlybyGeometry, FlybyOutcome, periapsis_for_turn, post_flyby_vinf, turn_angle,
};

/// Circular orbital speed at radius `r_m` around a body with GM `mu_m3_s2`.
pub fn circular_speed(mu_m3_s2: f64, r_m: f64) -> f64 {
    (mu_m3_s2 / r_m).sqrt()
}

/// Escape speed at radius `r_m`.
pub fn escape_speed(mu_m3_s2: f64, r_m: f64) -> f64 {
    (2.0 * mu_m3_s2 / r_m).sqrt()
}

/// Patched-conic escape delta-v from a circular parking orbit.
///
/// `sqrt(v_inf² + v_esc²) - v_circ` evaluated at the parking radius.
pub fn escape_delta_v(mu_m3_s2: f64, parking_radius_m: f64, vinf_m_s: f64) -> f64 {
    let circular = circular_speed(mu_m3_s2, parking_radius_m);
    let escape = escape_speed(mu_m3_s2, parking_radius_m);
    (vinf_m_s * vinf_m_s + escape * escape).sqrt() - circular
}

/// Hyperbolic excess speed at a planet on a circular orbit of radius `r_arrive_m`, for a
/// transfer ellipse of semi-major axis `a_transfer_m` crossing it tangentially.
pub fn arrival_vinf_heliocentric(r_arrive_m: f64, a_transfer_m: f64, mu_m3_s2: f64) -> f64 {
    let v_spacecraft = (mu_m3_s2 * (2.0 / r_arrive_m - 1.0 / a_transfer_m)).sqrt();
    let v_planet = circular_speed(mu_m3_s2, r_arrive_m);
    (v_spacecraft - v_planet).abs()
}

/// Direction-independent bounds on a moon-relative v∞ given the parent-relative v∞ and the
/// moon's orbital speed.
pub fn moon_relative_vinf_bounds(vinf_parent_m_s: f64, moon_speed_m_s: f64) -> (f64, f64) {
    let low = (vinf_parent_m_s - moon_speed_m_s).max(0.0);
    let high = vinf_parent_m_s + moon_speed_m_s;
    (low, high)
}

/// Titan's circular speed about Saturn (m/s).
pub fn titan_orbital_speed() -> f64 {
    orbital_speed(Body::Titan).unwrap_or_default()
}

/// Mean circular speed of a catalogued body about its primary.
pub fn orbital_speed(body: Body) -> Option<f64> {
    let primary = body.primary()?;
    let radius = body.orbit_radius()?;
    Some(circular_speed(primary.mu(), radius))
}

/// Titan-relative v∞ bounds for a Saturn-relative v∞.
pub fn titan_relative_vinf_bounds(vinf_saturn_m_s: f64) -> (f64, f64) {
    moon_relative_vinf_bounds(vinf_saturn_m_s, titan_orbital_speed())
}
