//! Hyperbolic flyby geometry about a moon, patched to the parent-body frame.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum FlybyError {
    #[error("hyperbolic excess speed must be positive (got {0} m/s)")]
    NonPositiveVinf(f64),
    #[error("periapsis radius must be positive (got {0} m)")]
    NonPositivePeriapsis(f64),
    #[error("gravitational parameter must be positive (got {0})")]
    NonPositiveMu(f64),
    #[error("turn angle must lie in (0, pi) radians (got {0})")]
    TurnAngleOutOfRange(f64),
}

/// Flyby turn angle δ (rad): `2 atan(mu / (rp v∞²))`.
pub fn turn_angle(vinf_m_s: f64, periapsis_radius_m: f64, mu_m3_s2: f64) -> Result<f64, FlybyError> {
    check_inputs(vinf_m_s, periapsis_radius_m, mu_m3_s2)?;
    Ok(2.0 * (mu_m3_s2 / (periapsis_radius_m * vinf_m_s * vinf_m_s)).atan())
}

/// Periapsis radius producing the turn angle `delta_rad`: `mu / (v∞² tan(δ/2))`.
pub fn periapsis_for_turn(vinf_m_s: f64, delta_rad: f64, mu_m3_s2: f64) -> Result<f64, FlybyError> {
    if !(vinf_m_s > 0.0) {
        return Err(FlybyError::NonPositiveVinf(vinf_m_s));
    }
    if !(mu_m3_s2 > 0.0) {
        return Err(FlybyError::NonPositiveMu(mu_m3_s2));
    }
    if !(delta_rad > 0.0 && delta_rad < std::f64::consts::PI) {
        return Err(FlybyError::TurnAngleOutOfRange(delta_rad));
    }
    Ok(mu_m3_s2 / (vinf_m_s * vinf_m_s * (0.5 * delta_rad).tan()))
}

/// Planar flyby set-up in the parent-body frame.
///
/// The incoming parent-relative v∞ lies along +x; the moon's velocity makes the angle `psi_rad`
/// with it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlybyGeometry {
    /// Parent-relative incoming v∞ magnitude (m/s).
    pub vinf_parent_m_s: f64,
    /// Alignment angle between the incoming v∞ and the moon velocity (rad).
    pub psi_rad: f64,
    /// Periapsis altitude above the moon's surface (m).
    pub periapsis_altitude_m: f64,
    pub moon_radius_m: f64,
    pub moon_mu_m3_s2: f64,
    /// Moon orbital speed about the parent (m/s).
    pub moon_speed_m_s: f64,
    /// Rotate by +δ when true, −δ otherwise.
    pub prograde: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlybyOutcome {
    /// Parent-relative v∞ magnitude after the flyby (m/s).
    pub vinf_out_parent_m_s: f64,
    /// Moon-relative incoming v∞ magnitude (m/s).
    pub vinf_moon_in_m_s: f64,
    /// Turn angle δ (rad).
    pub turn_angle_rad: f64,
}

/// Rotate the moon-relative incoming v∞ by the turn angle and return to the parent frame.
pub fn post_flyby_vinf(geometry: &FlybyGeometry) -> Result<FlybyOutcome, FlybyError> {
    let (sin_psi, cos_psi) = geometry.psi_rad.sin_cos();
    let moon_velocity = [
        geometry.moon_speed_m_s * cos_psi,
        geometry.moon_speed_m_s * sin_psi,
    ];
    let vin_moon = [
        geometry.vinf_parent_m_s - moon_velocity[0],
        -moon_velocity[1],
    ];
    let vinf_moon_in = vin_moon[0].hypot(vin_moon[1]);

    let rp = geometry.moon_radius_m + geometry.periapsis_altitude_m;
    let delta = turn_angle(vinf_moon_in, rp, geometry.moon_mu_m3_s2)?;

    let signed = if geometry.prograde { delta } else { -delta };
    let (s, c) = signed.sin_cos();
    let vout_moon = [
        c * vin_moon[0] - s * vin_moon[1],
        s * vin_moon[0] + c * vin_moon[1],
    ];
    let vout_parent = [
        vout_moon[0] + moon_velocity[0],
        vout_moon[1] + moon_velocity[1],
    ];

    Ok(FlybyOutcome {
        vinf_out_parent_m_s: vout_parent[0].hypot(vout_parent[1]),
        vinf_moon_in_m_s: vinf_moon_in,
        turn_angle_rad: delta,
    })
}

fn check_inputs(vinf_m_s: f64, periapsis_radius_m: f64, mu_m3_s2: f64) -> Result<(), FlybyError> {
    if !(vinf_m_s > 0.0) {
        return Err(FlybyError::NonPositiveVinf(vinf_m_s));
    }
    if !(periapsis_radius_m > 0.0) {
        return Err(FlybyError::NonPositivePeriapsis(periapsis_radius_m));
    }
    if !(mu_m3_s2 > 0.0) {
        return Err(FlybyError::NonPositiveMu(mu_m3_s2));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use quicklook_core::constants::{MU_TITAN, R_TITAN};

    #[test]
    fn turn_angle_inverts() {
        let rp = R_TITAN + 1_000.0e3;
        let delta = turn_angle(3_000.0, rp, MU_TITAN).unwrap();
        let back = periapsis_for_turn(3_000.0, delta, MU_TITAN).unwrap();
        assert!((back - rp).abs() / rp < 1e-12);
    }

    #[test]
    fn slower_approach_turns_more() {
        let rp = R_TITAN + 1_000.0e3;
        let slow = turn_angle(1_000.0, rp, MU_TITAN).unwrap();
        let fast = turn_angle(11_000.0, rp, MU_TITAN).unwrap();
        assert!(slow > fast);
        assert!(slow < std::f64::consts::PI);
    }

    #[test]
    fn rejects_zero_vinf() {
        assert_eq!(
            turn_angle(0.0, R_TITAN, MU_TITAN),
            Err(FlybyError::NonPositiveVinf(0.0))
        );
        assert!(matches!(
            periapsis_for_turn(1.0, std::f64::consts::PI, MU_TITAN),
            Err(FlybyError::TurnAngleOutOfRange(_))
        ));
    }

    #[test]
    fn flyby_preserves_moon_relative_speed() {
        let geometry = FlybyGeometry {
            vinf_parent_m_s: 5_500.0,
            psi_rad: 0.8,
            periapsis_altitude_m: 1_000.0e3,
            moon_radius_m: R_TITAN,
            moon_mu_m3_s2: MU_TITAN,
            moon_speed_m_s: 5_570.0,
            prograde: true,
        };
        let out = post_flyby_vinf(&geometry).unwrap();
        // |v_out - V_T| == |v_in - V_T| so the outgoing speed stays inside the bounds.
        assert!(out.vinf_out_parent_m_s >= (out.vinf_moon_in_m_s - 5_570.0).abs() - 1e-6);
        assert!(out.vinf_out_parent_m_s <= out.vinf_moon_in_m_s + 5_570.0 + 1e-6);
        assert!(out.turn_angle_rad > 0.0);
    }
}
