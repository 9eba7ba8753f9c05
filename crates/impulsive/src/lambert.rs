//! Single-revolution Lambert solver in universal variables.
//!
//! The time-of-flight equation is solved for the universal variable `z` with a Newton
//! iteration kept inside a shrinking bracket; any step that leaves the bracket, or any
//! iterate where the equation is undefined, falls back to bisection. The iteration runs in
//! canonical units (length `|r1|`, time `sqrt(|r1|³ / mu)`) so the residual tolerance does
//! not depend on the caller's unit system.

use quicklook_core::vector::{self, Vector3};
use thiserror::Error;

use crate::stumpff::{stumpff, stumpff_derivatives};

/// Iteration cap for the root search.
pub const MAX_ITERATIONS: usize = 120;
/// Convergence tolerance on the canonical time-of-flight residual.
pub const TOLERANCE: f64 = 1e-8;

const Z_LOWER: f64 = -40.0;
const Z_UPPER: f64 = 40.0;
const GEOMETRY_EPSILON: f64 = 1e-10;

/// Direction of travel around the focus between the two positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransferPath {
    /// Transfer angle in `[0, π]`.
    Short,
    /// Transfer angle in `[π, 2π]`.
    Long,
}

impl TransferPath {
    pub fn is_long(self) -> bool {
        matches!(self, TransferPath::Long)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TransferPath::Short => "short",
            TransferPath::Long => "long",
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum LambertError {
    #[error("invalid lambert input: {0}")]
    InvalidInput(&'static str),
    #[error("no transfer exists: positions are collinear with the focus")]
    DegenerateGeometry,
    #[error("degenerate solution: y <= 0 at the final iterate")]
    DegenerateSolution,
    #[error("lambert iteration did not converge in {iterations} iterations (residual {residual:e})")]
    NotConverged { iterations: usize, residual: f64 },
}

/// One Lambert boundary-value problem.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LambertProblem {
    pub r1: Vector3,
    pub r2: Vector3,
    pub tof_seconds: f64,
    pub mu: f64,
    pub path: TransferPath,
}

impl LambertProblem {
    pub fn solve(&self) -> Result<LambertSolution, LambertError> {
        solve(self.r1, self.r2, self.tof_seconds, self.mu, self.path.is_long())
    }
}

/// Velocities connecting the two positions, plus iteration diagnostics.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LambertSolution {
    pub v1: Vector3,
    pub v2: Vector3,
    /// Universal variable at the returned iterate.
    pub z: f64,
    pub iterations: usize,
    /// Canonical time-of-flight residual F(z).
    pub residual: f64,
    pub converged: bool,
}

impl LambertSolution {
    /// Reject best-effort results that did not reach the tolerance.
    pub fn require_converged(self) -> Result<Self, LambertError> {
        if self.converged {
            Ok(self)
        } else {
            Err(LambertError::NotConverged {
                iterations: self.iterations,
                residual: self.residual,
            })
        }
    }
}

/// Solve the single-revolution Lambert problem.
///
/// Inputs are in any consistent unit system (SI throughout this workspace). When the
/// iteration cap is reached the last iterate is returned with `converged == false`.
pub fn solve(
    r1: Vector3,
    r2: Vector3,
    tof_seconds: f64,
    mu: f64,
    long_way: bool,
) -> Result<LambertSolution, LambertError> {
    let r1_norm = vector::norm(&r1);
    let r2_norm = vector::norm(&r2);
    if !(r1_norm > 0.0 && r1_norm.is_finite() && r2_norm > 0.0 && r2_norm.is_finite()) {
        return Err(LambertError::InvalidInput(
            "position vectors must be non-zero and finite",
        ));
    }
    if !(tof_seconds > 0.0 && tof_seconds.is_finite()) {
        return Err(LambertError::InvalidInput("time of flight must be positive"));
    }
    if !(mu > 0.0 && mu.is_finite()) {
        return Err(LambertError::InvalidInput(
            "gravitational parameter must be positive",
        ));
    }

    let length_unit = r1_norm;
    let time_unit = (length_unit.powi(3) / mu).sqrt();
    let speed_unit = length_unit / time_unit;

    let r1c = vector::scale(&r1, 1.0 / length_unit);
    let r2c = vector::scale(&r2, 1.0 / length_unit);
    let r1c_norm = 1.0;
    let r2c_norm = r2_norm / length_unit;

    let sin_abs = vector::norm(&vector::cross(&r1c, &r2c)) / (r1c_norm * r2c_norm);
    let cos_dnu = (vector::dot(&r1c, &r2c) / (r1c_norm * r2c_norm)).clamp(-1.0, 1.0);
    if sin_abs < GEOMETRY_EPSILON {
        return Err(LambertError::DegenerateGeometry);
    }

    // A = sin Δν sqrt(r1 r2 / (1 - cos Δν)) = sqrt(2 r1 r2) cos(Δν/2), with the half-angle
    // cosine taken from whichever of sin Δν and cos Δν has no cancellation near Δν.
    let cos_half = if cos_dnu >= 0.0 {
        (0.5 * (1.0 + cos_dnu)).sqrt()
    } else {
        sin_abs / (2.0 * (0.5 * (1.0 - cos_dnu)).sqrt())
    };
    let mut a = (2.0 * r1c_norm * r2c_norm).sqrt() * cos_half;
    if long_way {
        // Δν → 2π - Δν flips the sign of cos(Δν/2).
        a = -a;
    }
    if !a.is_finite() || a.abs() < GEOMETRY_EPSILON {
        return Err(LambertError::DegenerateGeometry);
    }

    let equation = TimeOfFlightEquation {
        a,
        r1: r1c_norm,
        r2: r2c_norm,
        tof: tof_seconds / time_unit,
    };
    let (z, iterations) = equation.find_root();

    let eval = match equation.evaluate(z) {
        Sample::Valid(eval) => eval,
        Sample::CNonPositive | Sample::YNonPositive => {
            return Err(LambertError::DegenerateSolution);
        }
    };
    let converged = eval.f.abs() < TOLERANCE;
    if !converged {
        log::trace!(
            "lambert: no convergence after {iterations} iterations (z = {z:.6}, residual = {:.3e})",
            eval.f
        );
    }

    let f = 1.0 - eval.y / r1c_norm;
    let g = a * eval.y.sqrt();
    let g_dot = 1.0 - eval.y / r2c_norm;

    let v1c = vector::scale(&vector::sub(&r2c, &vector::scale(&r1c, f)), 1.0 / g);
    let v2c = vector::scale(&vector::sub(&vector::scale(&r2c, g_dot), &r1c), 1.0 / g);

    Ok(LambertSolution {
        v1: vector::scale(&v1c, speed_unit),
        v2: vector::scale(&v2c, speed_unit),
        z,
        iterations,
        residual: eval.f,
        converged,
    })
}

/// Canonical-unit time-of-flight equation (mu = 1).
struct TimeOfFlightEquation {
    a: f64,
    r1: f64,
    r2: f64,
    tof: f64,
}

#[derive(Debug, Clone, Copy)]
struct Evaluation {
    c: f64,
    s: f64,
    y: f64,
    chi: f64,
    f: f64,
}

enum Sample {
    Valid(Evaluation),
    CNonPositive,
    YNonPositive,
}

impl TimeOfFlightEquation {
    fn evaluate(&self, z: f64) -> Sample {
        let (c, s) = stumpff(z);
        if c <= 0.0 {
            return Sample::CNonPositive;
        }
        let y = self.r1 + self.r2 + self.a * (z * s - 1.0) / c.sqrt();
        if y <= 0.0 || !y.is_finite() {
            return Sample::YNonPositive;
        }
        let chi = (y / c).sqrt();
        let f = chi * chi * chi * s + self.a * y.sqrt() - self.tof;
        Sample::Valid(Evaluation { c, s, y, chi, f })
    }

    fn slope(&self, z: f64, e: &Evaluation) -> f64 {
        let (dc, ds) = stumpff_derivatives(z);
        let sqrt_c = e.c.sqrt();
        let dy = self.a * ((e.s + z * ds) / sqrt_c - (z * e.s - 1.0) * dc / (2.0 * e.c * sqrt_c));
        let dchi = (dy * e.c - e.y * dc) / (2.0 * e.chi * e.c * e.c);
        3.0 * e.chi * e.chi * dchi * e.s + e.chi.powi(3) * ds + self.a * dy / (2.0 * e.y.sqrt())
    }

    /// Returns the final iterate and the number of iterations spent.
    fn find_root(&self) -> (f64, usize) {
        let mut lower = Z_LOWER;
        let mut upper = Z_UPPER;
        let mut z = 0.0;

        for iteration in 1..=MAX_ITERATIONS {
            let eval = match self.evaluate(z) {
                Sample::Valid(eval) => eval,
                Sample::CNonPositive => {
                    upper = z;
                    z = 0.5 * (lower + upper);
                    continue;
                }
                Sample::YNonPositive => {
                    // y decreases with z when A < 0, increases when A > 0.
                    if self.a > 0.0 {
                        lower = z;
                    } else {
                        upper = z;
                    }
                    z = 0.5 * (lower + upper);
                    continue;
                }
            };

            if eval.f.abs() < TOLERANCE {
                return (z, iteration);
            }

            // F increases with z.
            if eval.f > 0.0 {
                upper = upper.min(z);
            } else {
                lower = lower.max(z);
            }

            let slope = self.slope(z, &eval);
            let newton = z - eval.f / slope;
            z = if slope.is_finite() && slope != 0.0 && newton > lower && newton < upper {
                newton
            } else {
                0.5 * (lower + upper)
            };
        }

        (z, MAX_ITERATIONS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_non_positive_time_of_flight() {
        let err = solve([1.0, 0.0, 0.0], [0.0, 1.0, 0.0], 0.0, 1.0, false).unwrap_err();
        assert!(matches!(err, LambertError::InvalidInput(_)));
    }

    #[test]
    fn rejects_zero_position() {
        let err = solve([0.0; 3], [0.0, 1.0, 0.0], 1.0, 1.0, false).unwrap_err();
        assert!(matches!(err, LambertError::InvalidInput(_)));
    }

    #[test]
    fn canonical_quarter_orbit_is_circular() {
        let sol = solve(
            [1.0, 0.0, 0.0],
            [0.0, 1.0, 0.0],
            std::f64::consts::FRAC_PI_2,
            1.0,
            false,
        )
        .unwrap();
        assert!(sol.converged);
        assert!((sol.v1[0]).abs() < 1e-7 && (sol.v1[1] - 1.0).abs() < 1e-7);
        assert!((sol.v2[0] + 1.0).abs() < 1e-7 && (sol.v2[1]).abs() < 1e-7);
    }

    #[test]
    fn require_converged_flags_best_effort_results() {
        let sol = LambertSolution {
            v1: [0.0; 3],
            v2: [0.0; 3],
            z: 1.0,
            iterations: MAX_ITERATIONS,
            residual: 1e-3,
            converged: false,
        };
        assert_eq!(
            sol.require_converged(),
            Err(LambertError::NotConverged {
                iterations: MAX_ITERATIONS,
                residual: 1e-3
            })
        );
    }
}
