//! Parameter sweeps over moon flyby geometry.

use log::debug;
use quicklook_core::bodies::Body;
use quicklook_orbits::{FlybyError, FlybyGeometry, orbital_speed, post_flyby_vinf, turn_angle};

use crate::grid::Grid;

/// Physical properties of the flyby moon.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Moon {
    pub body: Body,
    pub radius_m: f64,
    pub mu_m3_s2: f64,
    pub orbital_speed_m_s: f64,
}

impl Moon {
    /// `None` for bodies without a primary.
    pub fn from_body(body: Body) -> Option<Self> {
        Some(Self {
            body,
            radius_m: body.radius(),
            mu_m3_s2: body.mu(),
            orbital_speed_m_s: orbital_speed(body)?,
        })
    }
}

/// Turn angle against periapsis altitude for one moon-relative v∞.
#[derive(Debug, Clone, PartialEq)]
pub struct TurnAngleCurve {
    pub vinf_m_s: f64,
    pub altitudes_m: Vec<f64>,
    pub turn_angle_rad: Vec<f64>,
}

pub fn turn_angle_curves(
    moon: &Moon,
    vinfs_m_s: &[f64],
    altitudes_m: &[f64],
) -> Result<Vec<TurnAngleCurve>, FlybyError> {
    vinfs_m_s
        .iter()
        .map(|&vinf| {
            let turn_angle_rad = altitudes_m
                .iter()
                .map(|&h| turn_angle(vinf, moon.radius_m + h, moon.mu_m3_s2))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(TurnAngleCurve {
                vinf_m_s: vinf,
                altitudes_m: altitudes_m.to_vec(),
                turn_angle_rad,
            })
        })
        .collect()
}

/// Outgoing parent-relative v∞ over alignment angle × periapsis altitude.
#[derive(Debug, Clone, PartialEq)]
pub struct FlybyMap {
    pub vinf_in_m_s: f64,
    pub psi_rad: Vec<f64>,
    pub altitudes_m: Vec<f64>,
    /// Rows follow `altitudes_m`, columns follow `psi_rad`.
    pub vinf_out_m_s: Grid,
    pub prograde: bool,
}

/// Sweep the flyby over `psi_rad` × `altitudes_m`. Cells where the moon-relative approach speed
/// vanishes have no defined turn and stay empty.
pub fn post_flyby_map(
    moon: &Moon,
    vinf_in_m_s: f64,
    psi_rad: &[f64],
    altitudes_m: &[f64],
    prograde: bool,
) -> FlybyMap {
    let mut cells = Vec::with_capacity(psi_rad.len() * altitudes_m.len());
    for &altitude in altitudes_m {
        for &psi in psi_rad {
            let geometry = FlybyGeometry {
                vinf_parent_m_s: vinf_in_m_s,
                psi_rad: psi,
                periapsis_altitude_m: altitude,
                moon_radius_m: moon.radius_m,
                moon_mu_m3_s2: moon.mu_m3_s2,
                moon_speed_m_s: moon.orbital_speed_m_s,
                prograde,
            };
            cells.push(
                post_flyby_vinf(&geometry)
                    .ok()
                    .map(|outcome| outcome.vinf_out_parent_m_s),
            );
        }
    }
    let vinf_out_m_s = Grid::from_cells(altitudes_m.len(), psi_rad.len(), cells);
    debug!(
        "{} flyby map: {} x {} cells, {} undefined",
        moon.body,
        altitudes_m.len(),
        psi_rad.len(),
        vinf_out_m_s.invalid_count()
    );

    FlybyMap {
        vinf_in_m_s,
        psi_rad: psi_rad.to_vec(),
        altitudes_m: altitudes_m.to_vec(),
        vinf_out_m_s,
        prograde,
    }
}
