//! Core units, constants, and shared primitives for the Titan quick-look workspace.

/// Physical constants expressed in SI units (unless stated otherwise).
pub mod constants {
    /// Gravitational parameter of the Sun (m³/s²).
    pub const MU_SUN: f64 = 1.327_124_400_18e20;
    /// Gravitational parameter of the Earth (m³/s²).
    pub const MU_EARTH: f64 = 3.986_004_418e14;
    /// Gravitational parameter of Saturn (m³/s²).
    pub const MU_SATURN: f64 = 3.793_118_7e16;
    /// Gravitational parameter of Titan (m³/s²).
    pub const MU_TITAN: f64 = 8.978e12;

    /// Metres per astronomical unit.
    pub const AU_M: f64 = 1.495_978_707e11;
    /// Earth's mean heliocentric distance (m).
    pub const A_EARTH: f64 = 1.000 * AU_M;
    /// Saturn's mean heliocentric distance (m).
    pub const A_SATURN: f64 = 9.537 * AU_M;
    /// Titan's orbital radius about Saturn (m).
    pub const A_TITAN: f64 = 1_221_870e3;

    /// Earth equatorial radius used for parking orbits (m).
    pub const R_EARTH: f64 = 6_378.0e3;
    /// Saturn equatorial radius (m).
    pub const R_SATURN: f64 = 60_268.0e3;
    /// Titan mean radius (m).
    pub const R_TITAN: f64 = 2_575.0e3;
    /// Solar nominal radius (m).
    pub const R_SUN: f64 = 695_700.0e3;

    /// Seconds per day.
    pub const SECONDS_PER_DAY: f64 = 86_400.0;
    /// Seconds per Julian year (365.25 days).
    pub const SECONDS_PER_YEAR: f64 = 365.25 * SECONDS_PER_DAY;
}

/// Read-only table of the bodies the quick-look studies reference.
pub mod bodies {
    use super::constants::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub enum Body {
        Sun,
        Earth,
        Saturn,
        Titan,
    }

    impl Body {
        pub const ALL: [Body; 4] = [Body::Sun, Body::Earth, Body::Saturn, Body::Titan];

        pub fn name(self) -> &'static str {
            match self {
                Body::Sun => "Sun",
                Body::Earth => "Earth",
                Body::Saturn => "Saturn",
                Body::Titan => "Titan",
            }
        }

        /// Gravitational parameter (m³/s²).
        pub fn mu(self) -> f64 {
            match self {
                Body::Sun => MU_SUN,
                Body::Earth => MU_EARTH,
                Body::Saturn => MU_SATURN,
                Body::Titan => MU_TITAN,
            }
        }

        /// Mean physical radius (m).
        pub fn radius(self) -> f64 {
            match self {
                Body::Sun => R_SUN,
                Body::Earth => R_EARTH,
                Body::Saturn => R_SATURN,
                Body::Titan => R_TITAN,
            }
        }

        /// Body this one orbits, if any.
        pub fn primary(self) -> Option<Body> {
            match self {
                Body::Sun => None,
                Body::Earth | Body::Saturn => Some(Body::Sun),
                Body::Titan => Some(Body::Saturn),
            }
        }

        /// Mean circular orbit radius about the primary (m).
        pub fn orbit_radius(self) -> Option<f64> {
            match self {
                Body::Sun => None,
                Body::Earth => Some(A_EARTH),
                Body::Saturn => Some(A_SATURN),
                Body::Titan => Some(A_TITAN),
            }
        }

        /// Case-insensitive lookup by name.
        pub fn from_name(name: &str) -> Option<Body> {
            Body::ALL
                .into_iter()
                .find(|body| body.name().eq_ignore_ascii_case(name.trim()))
        }
    }

    impl std::fmt::Display for Body {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_str(self.name())
        }
    }
}

/// Basic unit conversion helpers.
pub mod units {
    /// Convert kilometres to metres.
    #[inline]
    pub fn km_to_m(v: f64) -> f64 {
        v * 1_000.0
    }

    /// Convert metres to kilometres.
    #[inline]
    pub fn m_to_km(v: f64) -> f64 {
        v / 1_000.0
    }

    /// Convert metres per second to kilometres per second.
    #[inline]
    pub fn ms_to_kms(v: f64) -> f64 {
        v / 1_000.0
    }

    /// Convert kilometres per second to metres per second.
    #[inline]
    pub fn kms_to_ms(v: f64) -> f64 {
        v * 1_000.0
    }

    /// Convert metres to astronomical units.
    #[inline]
    pub fn m_to_au(v: f64) -> f64 {
        v / super::constants::AU_M
    }
}

/// Lightweight time utilities shared across crates.
pub mod time {
    use super::constants::{SECONDS_PER_DAY, SECONDS_PER_YEAR};

    /// Convert seconds to days.
    #[inline]
    pub fn seconds_to_days(seconds: f64) -> f64 {
        seconds / SECONDS_PER_DAY
    }

    /// Convert seconds to Julian years.
    #[inline]
    pub fn seconds_to_years(seconds: f64) -> f64 {
        seconds / SECONDS_PER_YEAR
    }
}

/// Minimal vector helpers to avoid ad-hoc `[f64; 3]` math everywhere.
pub mod vector {
    /// Alias for a 3D vector in metres or m/s depending on context.
    pub type Vector3 = [f64; 3];

    /// Euclidean norm of a vector.
    #[inline]
    pub fn norm(v: &Vector3) -> f64 {
        dot(v, v).sqrt()
    }

    /// Dot product of two vectors.
    #[inline]
    pub fn dot(a: &Vector3, b: &Vector3) -> f64 {
        a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
    }

    /// Cross product of two vectors.
    #[inline]
    pub fn cross(a: &Vector3, b: &Vector3) -> Vector3 {
        [
            a[1] * b[2] - a[2] * b[1],
            a[2] * b[0] - a[0] * b[2],
            a[0] * b[1] - a[1] * b[0],
        ]
    }

    /// Vector addition.
    #[inline]
    pub fn add(a: &Vector3, b: &Vector3) -> Vector3 {
        [a[0] + b[0], a[1] + b[1], a[2] + b[2]]
    }

    /// Vector subtraction.
    #[inline]
    pub fn sub(a: &Vector3, b: &Vector3) -> Vector3 {
        [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
    }

    /// Scale a vector by a scalar.
    #[inline]
    pub fn scale(v: &Vector3, s: f64) -> Vector3 {
        [v[0] * s, v[1] * s, v[2] * s]
    }

    /// Euclidean distance between two vectors.
    #[inline]
    pub fn distance(a: &Vector3, b: &Vector3) -> f64 {
        norm(&sub(a, b))
    }
}

#[cfg(test)]
mod tests {
    use super::bodies::Body;
    use super::vector;

    #[test]
    fn body_lookup_is_case_insensitive() {
        assert_eq!(Body::from_name("titan"), Some(Body::Titan));
        assert_eq!(Body::from_name(" SATURN "), Some(Body::Saturn));
        assert_eq!(Body::from_name("mars"), None);
    }

    #[test]
    fn titan_orbits_saturn() {
        assert_eq!(Body::Titan.primary(), Some(Body::Saturn));
        assert!(Body::Sun.orbit_radius().is_none());
        assert!(Body::Saturn.orbit_radius().unwrap() > Body::Earth.orbit_radius().unwrap());
    }

    #[test]
    fn cross_of_unit_axes() {
        assert_eq!(
            vector::cross(&[1.0, 0.0, 0.0], &[0.0, 1.0, 0.0]),
            [0.0, 0.0, 1.0]
        );
    }
}
