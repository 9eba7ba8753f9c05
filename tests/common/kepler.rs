//! Two-body propagator used to check Lambert solutions independently of the solver.

use titan_quicklook::common::vector::{self, Vector3};

/// Propagate `(r0, v0)` forward by `dt` under two-body dynamics.
pub fn propagate(r0: &Vector3, v0: &Vector3, dt: f64, mu: f64) -> (Vector3, Vector3) {
    let r0_mag = vector::norm(r0);
    let rdotv = vector::dot(r0, v0);
    let sqrt_mu = mu.sqrt();
    let alpha = 2.0 / r0_mag - vector::dot(v0, v0) / mu;

    let mut chi = if alpha > 0.0 {
        sqrt_mu * dt * alpha
    } else {
        sqrt_mu * dt / r0_mag
    };
    let tol = 1e-14 * dt.abs().max(1.0);
    for _ in 0..60 {
        let psi = alpha * chi * chi;
        let (c2, c3) = c2c3(psi);
        let r = chi * chi * c2 + rdotv / sqrt_mu * chi * (1.0 - psi * c3) + r0_mag * (1.0 - psi * c2);
        let f = r0_mag * chi * (1.0 - psi * c3)
            + rdotv / sqrt_mu * chi * chi * c2
            + chi.powi(3) * c3
            - sqrt_mu * dt;
        let delta = f / r;
        chi -= delta;
        if delta.abs() < tol {
            break;
        }
    }

    let psi = alpha * chi * chi;
    let (c2, c3) = c2c3(psi);
    let r_mag = chi * chi * c2 + rdotv / sqrt_mu * chi * (1.0 - psi * c3) + r0_mag * (1.0 - psi * c2);
    let f = 1.0 - chi * chi / r0_mag * c2;
    let g = dt - chi.powi(3) / sqrt_mu * c3;
    let g_dot = 1.0 - chi * chi / r_mag * c2;
    let f_dot = sqrt_mu / (r_mag * r0_mag) * chi * (psi * c3 - 1.0);

    (
        vector::add(&vector::scale(r0, f), &vector::scale(v0, g)),
        vector::add(&vector::scale(r0, f_dot), &vector::scale(v0, g_dot)),
    )
}

fn c2c3(psi: f64) -> (f64, f64) {
    if psi > 1e-6 {
        let s = psi.sqrt();
        ((1.0 - s.cos()) / psi, (s - s.sin()) / (psi * s))
    } else if psi < -1e-6 {
        let s = (-psi).sqrt();
        ((1.0 - s.cosh()) / psi, (s.sinh() - s) / (-psi * s))
    } else {
        (
            0.5 - psi / 24.0 + psi * psi / 720.0,
            1.0 / 6.0 - psi / 120.0 + psi * psi / 5040.0,
        )
    }
}
