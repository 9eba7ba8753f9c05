//! Circular, coplanar ephemeris model.
//!
//! Every body moves on a circle of radius `a` in the reference plane, starting on the +x axis at
//! the reference epoch. States are recomputed from scratch for each query.

use std::f64::consts::TAU;

use quicklook_core::bodies::Body;
use quicklook_core::vector::Vector3;
use thiserror::Error;

/// Position and velocity in the inertial frame of the central body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StateVector {
    pub position_m: Vector3,
    pub velocity_m_s: Vector3,
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum EphemerisError {
    #[error("orbit radius must be positive and finite (got {0})")]
    InvalidRadius(f64),
    #[error("gravitational parameter must be positive and finite (got {0})")]
    InvalidMu(f64),
    #[error("{0} has no orbit about a primary")]
    NoPrimary(Body),
}

/// State on a circular orbit of radius `a_m` at `t_seconds` past the reference epoch.
///
/// `r = a (cos nt, sin nt, 0)`, `v = a n (-sin nt, cos nt, 0)` with `n = sqrt(mu / a³)`.
pub fn circular_state(a_m: f64, t_seconds: f64, mu_m3_s2: f64) -> StateVector {
    let n = (mu_m3_s2 / a_m.powi(3)).sqrt();
    let (s, c) = (n * t_seconds).sin_cos();
    StateVector {
        position_m: [a_m * c, a_m * s, 0.0],
        velocity_m_s: [-a_m * n * s, a_m * n * c, 0.0],
    }
}

/// Validated circular orbit about a central body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CircularOrbit {
    radius_m: f64,
    mu_m3_s2: f64,
}

impl CircularOrbit {
    pub fn new(radius_m: f64, mu_m3_s2: f64) -> Result<Self, EphemerisError> {
        if !(radius_m > 0.0 && radius_m.is_finite()) {
            return Err(EphemerisError::InvalidRadius(radius_m));
        }
        if !(mu_m3_s2 > 0.0 && mu_m3_s2.is_finite()) {
            return Err(EphemerisError::InvalidMu(mu_m3_s2));
        }
        Ok(Self { radius_m, mu_m3_s2 })
    }

    /// Mean orbit of a catalogued body about its primary.
    pub fn of_body(body: Body) -> Result<Self, EphemerisError> {
        match (body.primary(), body.orbit_radius()) {
            (Some(primary), Some(radius)) => Self::new(radius, primary.mu()),
            _ => Err(EphemerisError::NoPrimary(body)),
        }
    }

    pub fn radius_m(&self) -> f64 {
        self.radius_m
    }

    pub fn mu_m3_s2(&self) -> f64 {
        self.mu_m3_s2
    }

    /// Mean motion (rad/s).
    pub fn mean_motion(&self) -> f64 {
        (self.mu_m3_s2 / self.radius_m.powi(3)).sqrt()
    }

    pub fn period_seconds(&self) -> f64 {
        TAU / self.mean_motion()
    }

    pub fn circular_speed_m_s(&self) -> f64 {
        (self.mu_m3_s2 / self.radius_m).sqrt()
    }

    pub fn state_at(&self, t_seconds: f64) -> StateVector {
        circular_state(self.radius_m, t_seconds, self.mu_m3_s2)
    }
}

/// Synodic period of two circular orbits about the same primary (s).
///
/// Returns `None` when the periods coincide.
pub fn synodic_period(a: &CircularOrbit, b: &CircularOrbit) -> Option<f64> {
    let relative_rate = (a.mean_motion() - b.mean_motion()).abs();
    if relative_rate <= f64::EPSILON * a.mean_motion().max(b.mean_motion()) {
        None
    } else {
        Some(TAU / relative_rate)
    }
}
