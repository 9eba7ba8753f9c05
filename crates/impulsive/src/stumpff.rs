//! Stumpff functions C(z) and S(z) for the universal-variable formulation.
//!
//! The sign of `z` selects the trigonometric (elliptic) or hyperbolic branch. Close to the
//! parabolic point the closed forms lose every significant digit to cancellation, so a short
//! Taylor series covers `0 < |z| < SERIES_BAND`. `z == 0` returns the exact limits.

/// Half-width of the band around `z = 0` evaluated by series.
const SERIES_BAND: f64 = 1.0e-3;

/// Evaluate `(C(z), S(z))`.
pub fn stumpff(z: f64) -> (f64, f64) {
    if z == 0.0 {
        return (0.5, 1.0 / 6.0);
    }
    if z.abs() < SERIES_BAND {
        return stumpff_series(z);
    }

    if z > 0.0 {
        let sqrt_z = z.sqrt();
        let c = (1.0 - sqrt_z.cos()) / z;
        let s = (sqrt_z - sqrt_z.sin()) / (sqrt_z * sqrt_z * sqrt_z);
        (c, s)
    } else {
        let sqrt_neg_z = (-z).sqrt();
        let c = (sqrt_neg_z.cosh() - 1.0) / (-z);
        let s = (sqrt_neg_z.sinh() - sqrt_neg_z) / (sqrt_neg_z * sqrt_neg_z * sqrt_neg_z);
        (c, s)
    }
}

/// Evaluate `(dC/dz, dS/dz)`.
///
/// Uses `dC/dz = (1 - zS - 2C) / 2z` and `dS/dz = (C - 3S) / 2z` away from the origin; the
/// series band (and the exact point `z = 0`, where the values are -1/24 and -1/120) is
/// differentiated term by term.
pub fn stumpff_derivatives(z: f64) -> (f64, f64) {
    if z.abs() < SERIES_BAND {
        let z2 = z * z;
        let z3 = z2 * z;
        let dc = -1.0 / 24.0 + 2.0 * z / 720.0 - 3.0 * z2 / 40_320.0 + 4.0 * z3 / 3_628_800.0;
        let ds =
            -1.0 / 120.0 + 2.0 * z / 5_040.0 - 3.0 * z2 / 362_880.0 + 4.0 * z3 / 39_916_800.0;
        return (dc, ds);
    }

    let (c, s) = stumpff(z);
    let dc = (1.0 - z * s - 2.0 * c) / (2.0 * z);
    let ds = (c - 3.0 * s) / (2.0 * z);
    (dc, ds)
}

fn stumpff_series(z: f64) -> (f64, f64) {
    let z2 = z * z;
    let z3 = z2 * z;
    let z4 = z2 * z2;
    let c = 0.5 - z / 24.0 + z2 / 720.0 - z3 / 40_320.0 + z4 / 3_628_800.0;
    let s = 1.0 / 6.0 - z / 120.0 + z2 / 5_040.0 - z3 / 362_880.0 + z4 / 39_916_800.0;
    (c, s)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn origin_returns_exact_limits() {
        let (c, s) = stumpff(0.0);
        assert_eq!(c, 0.5);
        assert_eq!(s, 1.0 / 6.0);
    }

    #[test]
    fn continuous_across_origin() {
        for eps in [1e-2, 1e-4, 1e-6, 1e-9, 1e-12] {
            for z in [eps, -eps] {
                let (c, s) = stumpff(z);
                assert!((c - 0.5).abs() <= eps, "C({z}) = {c}");
                assert!((s - 1.0 / 6.0).abs() <= eps, "S({z}) = {s}");
            }
        }
    }

    #[test]
    fn series_band_edges_match_closed_forms() {
        for z in [SERIES_BAND, -SERIES_BAND] {
            let inside = stumpff_series(z * 0.999_999);
            let outside = stumpff(z * 1.000_001);
            assert!((inside.0 - outside.0).abs() < 1e-10);
            assert!((inside.1 - outside.1).abs() < 1e-10);
        }
    }

    #[test]
    fn half_ellipse_values() {
        // z = π² corresponds to a half revolution in eccentric anomaly.
        let (c, s) = stumpff(PI * PI);
        assert!((c - 2.0 / (PI * PI)).abs() < 1e-14);
        assert!((s - 1.0 / (PI * PI)).abs() < 1e-14);
    }

    #[test]
    fn hyperbolic_branch_is_positive() {
        let (c, s) = stumpff(-25.0);
        assert!(c > 0.5 && s > 1.0 / 6.0);
    }

    #[test]
    fn derivatives_match_finite_differences() {
        for z in [-30.0, -4.0, -0.5, 0.0, 5e-4, 0.7, 9.0, 30.0] {
            let h = 1e-6;
            let (cp, sp) = stumpff(z + h);
            let (cm, sm) = stumpff(z - h);
            let (dc, ds) = stumpff_derivatives(z);
            assert!((dc - (cp - cm) / (2.0 * h)).abs() < 1e-6, "dC at {z}");
            assert!((ds - (sp - sm) / (2.0 * h)).abs() < 1e-6, "dS at {z}");
        }
    }
}
