//! Hohmann quick-look between two planets on circular orbits, with optional moon bounds at
//! arrival.

use log::debug;
use quicklook_core::bodies::Body;
use quicklook_ephem::{CircularOrbit, EphemerisError, synodic_period};
use quicklook_impulsive::transfers::{HohmannResult, hohmann};
use quicklook_orbits::{
    arrival_vinf_heliocentric, escape_delta_v, moon_relative_vinf_bounds, orbital_speed,
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoonVinfBounds {
    pub moon: Body,
    pub moon_speed_m_s: f64,
    pub low_m_s: f64,
    pub high_m_s: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HohmannQuickLook {
    pub origin: Body,
    pub destination: Body,
    pub transfer: HohmannResult,
    /// Heliocentric excess at departure, `|Δv1|`.
    pub vinf_depart_m_s: f64,
    /// Heliocentric excess at arrival, `|Δv2|`.
    pub vinf_arrive_m_s: f64,
    /// Escape burn from the origin parking orbit.
    pub escape_dv_m_s: f64,
    pub synodic_period_s: Option<f64>,
    pub moon_bounds: Option<MoonVinfBounds>,
}

#[derive(Debug, thiserror::Error, Clone, PartialEq)]
pub enum QuickLookError {
    #[error(transparent)]
    Orbit(#[from] EphemerisError),
    #[error("{origin} and {destination} do not orbit the same primary")]
    DifferentPrimaries { origin: Body, destination: Body },
    #[error("{moon} does not orbit {destination}")]
    NotAMoonOf { moon: Body, destination: Body },
    #[error("parking altitude must keep the orbit above the centre of {0}")]
    InvalidParking(Body),
}

/// Tangential two-impulse estimate from `origin` to `destination`.
pub fn hohmann_quick_look(
    origin: Body,
    destination: Body,
    moon: Option<Body>,
    parking_altitude_m: f64,
) -> Result<HohmannQuickLook, QuickLookError> {
    let departure = CircularOrbit::of_body(origin)?;
    let arrival = CircularOrbit::of_body(destination)?;
    if origin.primary() != destination.primary() {
        return Err(QuickLookError::DifferentPrimaries {
            origin,
            destination,
        });
    }
    let parking_radius = origin.radius() + parking_altitude_m;
    if !(parking_radius > 0.0) {
        return Err(QuickLookError::InvalidParking(origin));
    }

    let transfer = hohmann(departure.radius_m(), arrival.radius_m(), departure.mu_m3_s2());
    let vinf_depart = transfer.dv1_m_s.abs();
    let vinf_arrive = arrival_vinf_heliocentric(
        arrival.radius_m(),
        transfer.semi_major_axis_m,
        departure.mu_m3_s2(),
    );
    let escape_dv = escape_delta_v(origin.mu(), parking_radius, vinf_depart);

    let moon_bounds = match moon {
        None => None,
        Some(moon) => {
            let moon_speed = match (moon.primary(), orbital_speed(moon)) {
                (Some(primary), Some(speed)) if primary == destination => speed,
                _ => return Err(QuickLookError::NotAMoonOf { moon, destination }),
            };
            let (low, high) = moon_relative_vinf_bounds(vinf_arrive, moon_speed);
            Some(MoonVinfBounds {
                moon,
                moon_speed_m_s: moon_speed,
                low_m_s: low,
                high_m_s: high,
            })
        }
    };

    debug!(
        "hohmann {origin} -> {destination}: dv1 = {:.1} m/s, dv2 = {:.1} m/s",
        transfer.dv1_m_s, transfer.dv2_m_s
    );

    Ok(HohmannQuickLook {
        origin,
        destination,
        transfer,
        vinf_depart_m_s: vinf_depart,
        vinf_arrive_m_s: vinf_arrive,
        escape_dv_m_s: escape_dv,
        synodic_period_s: synodic_period(&departure, &arrival),
        moon_bounds,
    })
}
