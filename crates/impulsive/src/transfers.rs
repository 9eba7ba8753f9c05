//! Analytic estimators for impulsive transfers in the coplanar, circular limit.
//!
//! Provides the Hohmann transfer calculator that returns delta-v components and time of
//! flight for two-body Keplerian motion with a specified central GM, plus the vis-viva
//! relation it is built on.

/// Result for a Hohmann transfer between circular, coplanar orbits of radii r1 and r2.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HohmannResult {
    pub dv1_m_s: f64,      // signed: negative for inward (retro) burn
    pub dv2_m_s: f64,      // signed: negative for retro capture when arriving inward
    pub dv_total_m_s: f64, // |dv1| + |dv2|
    pub tof_seconds: f64,
    pub semi_major_axis_m: f64,
    /// Transfer-orbit speed at r1 (m/s).
    pub departure_speed_m_s: f64,
    /// Transfer-orbit speed at r2 (m/s).
    pub arrival_speed_m_s: f64,
}

/// Speed from vis-viva at radius `r_m` on an orbit with semi-major axis `a_m`.
pub fn vis_viva(mu_m3_s2: f64, r_m: f64, a_m: f64) -> f64 {
    (mu_m3_s2 * (2.0 / r_m - 1.0 / a_m)).sqrt()
}

/// Compute the classical Hohmann transfer between two circular coplanar orbits.
///
/// Inputs:
/// - `r1_m`: initial circular orbit radius (m)
/// - `r2_m`: target circular orbit radius (m)
/// - `mu_m3_s2`: gravitational parameter of central body (m^3/s^2)
pub fn hohmann(r1_m: f64, r2_m: f64, mu_m3_s2: f64) -> HohmannResult {
    assert!(r1_m > 0.0 && r2_m > 0.0 && mu_m3_s2 > 0.0);

    let v1 = (mu_m3_s2 / r1_m).sqrt();
    let v2 = (mu_m3_s2 / r2_m).sqrt();
    let a_t = 0.5 * (r1_m + r2_m);
    let tof = std::f64::consts::PI * (a_t.powi(3) / mu_m3_s2).sqrt();

    // Transfer periapsis speed (at r1) and apoapsis speed (at r2) for outward transfers
    let v_t1 = vis_viva(mu_m3_s2, r1_m, a_t);
    let v_t2 = vis_viva(mu_m3_s2, r2_m, a_t);

    let dv1 = v_t1 - v1;
    let dv2 = v2 - v_t2;

    HohmannResult {
        dv1_m_s: dv1,
        dv2_m_s: dv2,
        dv_total_m_s: dv1.abs() + dv2.abs(),
        tof_seconds: tof,
        semi_major_axis_m: a_t,
        departure_speed_m_s: v_t1,
        arrival_speed_m_s: v_t2,
    }
}
