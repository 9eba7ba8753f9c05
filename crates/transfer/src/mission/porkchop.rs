//! Porkchop grid search over departure epoch × time of flight.
//!
//! Every cell solves a heliocentric Lambert problem between the departure and arrival bodies on
//! their circular orbits, then converts the departure hyperbolic excess into a parking-orbit
//! escape burn. Cells whose solve fails stay in the grid as `None`.

use std::cmp::Ordering;

use log::{debug, warn};
use quicklook_core::bodies::Body;
use quicklook_core::vector;
use quicklook_ephem::{CircularOrbit, EphemerisError, StateVector, circular_state};
use quicklook_impulsive::lambert::{self, LambertError, TransferPath};
use quicklook_orbits::escape_delta_v;
use rayon::prelude::*;

use crate::grid::{CellMinimum, Grid};

/// `n` evenly spaced samples covering `[start, end]` inclusive.
pub fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (n - 1) as f64;
            (0..n)
                .map(|i| if i == n - 1 { end } else { start + step * i as f64 })
                .collect()
        }
    }
}

/// Grid axes in seconds. Departure values are offsets from the reference epoch, where both
/// bodies sit at phase zero.
#[derive(Debug, Clone, PartialEq)]
pub struct PorkchopAxes {
    pub departure_offsets_s: Vec<f64>,
    pub tof_s: Vec<f64>,
}

impl PorkchopAxes {
    pub fn new(departure_offsets_s: Vec<f64>, tof_s: Vec<f64>) -> Self {
        Self {
            departure_offsets_s,
            tof_s,
        }
    }

    fn validate(&self) -> Result<(), PorkchopError> {
        if self.departure_offsets_s.is_empty() {
            return Err(PorkchopError::EmptyAxis("departure"));
        }
        if self.tof_s.is_empty() {
            return Err(PorkchopError::EmptyAxis("time-of-flight"));
        }
        if self.departure_offsets_s.iter().any(|t| !t.is_finite()) {
            return Err(PorkchopError::NonFiniteAxis("departure"));
        }
        if let Some(&bad) = self.tof_s.iter().find(|t| !(**t > 0.0) || !t.is_finite()) {
            return Err(PorkchopError::NonPositiveTof(bad));
        }
        Ok(())
    }
}

/// Circular parking orbit the departure burn starts from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParkingOrbit {
    pub mu_m3_s2: f64,
    pub body_radius_m: f64,
    pub altitude_m: f64,
}

impl ParkingOrbit {
    pub fn around(body: Body, altitude_m: f64) -> Self {
        Self {
            mu_m3_s2: body.mu(),
            body_radius_m: body.radius(),
            altitude_m,
        }
    }

    pub fn radius_m(&self) -> f64 {
        self.body_radius_m + self.altitude_m
    }
}

/// Whether a cell whose Lambert iteration ran out may still contribute its best-effort value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConvergencePolicy {
    /// Non-converged solves mark the cell infeasible.
    #[default]
    Strict,
    /// Non-converged solves are accepted as long as their outputs are finite.
    BestEffort,
}

#[derive(Debug, Clone)]
pub struct PorkchopRequest {
    pub axes: PorkchopAxes,
    pub mu_central_m3_s2: f64,
    pub departure_orbit_radius_m: f64,
    pub arrival_orbit_radius_m: f64,
    pub parking: ParkingOrbit,
    /// Solve both the short and long way and keep the cheaper departure.
    pub compare_long_way: bool,
    pub convergence: ConvergencePolicy,
    /// Evaluate cells on the rayon pool.
    pub parallel: bool,
}

impl PorkchopRequest {
    /// Sun-centred request between two catalogued planets.
    pub fn between(
        origin: Body,
        destination: Body,
        axes: PorkchopAxes,
        parking_altitude_m: f64,
    ) -> Result<Self, PorkchopError> {
        let departure = CircularOrbit::of_body(origin)?;
        let arrival = CircularOrbit::of_body(destination)?;
        Ok(Self {
            axes,
            mu_central_m3_s2: departure.mu_m3_s2(),
            departure_orbit_radius_m: departure.radius_m(),
            arrival_orbit_radius_m: arrival.radius_m(),
            parking: ParkingOrbit::around(origin, parking_altitude_m),
            compare_long_way: false,
            convergence: ConvergencePolicy::default(),
            parallel: true,
        })
    }

    fn validate(&self) -> Result<(), PorkchopError> {
        self.axes.validate()?;
        CircularOrbit::new(self.departure_orbit_radius_m, self.mu_central_m3_s2)?;
        CircularOrbit::new(self.arrival_orbit_radius_m, self.mu_central_m3_s2)?;
        if !(self.parking.radius_m() > 0.0) {
            return Err(PorkchopError::InvalidParking(
                "parking radius must be positive",
            ));
        }
        if !(self.parking.mu_m3_s2 > 0.0) {
            return Err(PorkchopError::InvalidParking(
                "parking body mu must be positive",
            ));
        }
        Ok(())
    }

    /// Evaluate a single grid cell.
    ///
    /// Pure in its inputs: departure state at `departure_offset_s`, arrival state at
    /// `departure_offset_s + tof_s`, both on the request's circular orbits.
    pub fn evaluate_cell(
        &self,
        departure_offset_s: f64,
        tof_s: f64,
    ) -> Result<CellSample, LambertError> {
        let mu = self.mu_central_m3_s2;
        let departure = circular_state(self.departure_orbit_radius_m, departure_offset_s, mu);
        let arrival = circular_state(self.arrival_orbit_radius_m, departure_offset_s + tof_s, mu);

        let mut branch_results = Vec::new();
        let mut last_error = None;
        let paths: &[TransferPath] = if self.compare_long_way {
            &[TransferPath::Short, TransferPath::Long]
        } else {
            &[TransferPath::Short]
        };
        for &path in paths {
            match self.evaluate_branch(&departure, &arrival, tof_s, path) {
                Ok(sample) => branch_results.push(sample),
                Err(err) => last_error = Some(err),
            }
        }

        branch_results.sort_by(|a, b| {
            a.dv_depart_m_s
                .partial_cmp(&b.dv_depart_m_s)
                .unwrap_or(Ordering::Equal)
        });
        match branch_results.first() {
            Some(best) => Ok(*best),
            None => Err(last_error.unwrap_or(LambertError::DegenerateSolution)),
        }
    }

    fn evaluate_branch(
        &self,
        departure: &StateVector,
        arrival: &StateVector,
        tof_s: f64,
        path: TransferPath,
    ) -> Result<CellSample, LambertError> {
        let mut solution = lambert::solve(
            departure.position_m,
            arrival.position_m,
            tof_s,
            self.mu_central_m3_s2,
            path.is_long(),
        )?;
        if self.convergence == ConvergencePolicy::Strict {
            solution = solution.require_converged()?;
        }

        let vinf_depart = vector::distance(&solution.v1, &departure.velocity_m_s);
        let vinf_arrive = vector::distance(&solution.v2, &arrival.velocity_m_s);
        let dv_depart = escape_delta_v(
            self.parking.mu_m3_s2,
            self.parking.radius_m(),
            vinf_depart,
        );
        if !dv_depart.is_finite() || !vinf_arrive.is_finite() {
            return Err(LambertError::DegenerateSolution);
        }

        Ok(CellSample {
            dv_depart_m_s: dv_depart,
            vinf_depart_m_s: vinf_depart,
            vinf_arrive_m_s: vinf_arrive,
            path,
            converged: solution.converged,
        })
    }
}

/// Outputs of one feasible cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellSample {
    pub dv_depart_m_s: f64,
    pub vinf_depart_m_s: f64,
    pub vinf_arrive_m_s: f64,
    pub path: TransferPath,
    pub converged: bool,
}

/// Grid minimum mapped back onto the axes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PorkchopMinimum {
    pub value: f64,
    pub tof_index: usize,
    pub departure_index: usize,
    pub departure_offset_s: f64,
    pub tof_s: f64,
}

impl PorkchopMinimum {
    fn from_cell(cell: CellMinimum, axes: &PorkchopAxes) -> Self {
        Self {
            value: cell.value,
            tof_index: cell.row,
            departure_index: cell.col,
            departure_offset_s: axes.departure_offsets_s[cell.col],
            tof_s: axes.tof_s[cell.row],
        }
    }
}

/// Completed search. Grids are `tof × departure`.
#[derive(Debug, Clone)]
pub struct PorkchopResult {
    pub axes: PorkchopAxes,
    pub samples: Grid<CellSample>,
    pub departure_dv_m_s: Grid,
    pub arrival_vinf_m_s: Grid,
    pub departure_dv_minimum: Option<PorkchopMinimum>,
    pub arrival_vinf_minimum: Option<PorkchopMinimum>,
    /// Per departure column, the time of flight minimising departure Δv.
    pub valley_tof_s: Vec<Option<f64>>,
}

impl PorkchopResult {
    pub fn cell_count(&self) -> usize {
        self.samples.rows() * self.samples.cols()
    }

    pub fn infeasible_count(&self) -> usize {
        self.samples.invalid_count()
    }
}

#[derive(Debug, thiserror::Error, Clone, PartialEq)]
pub enum PorkchopError {
    #[error("{0} axis is empty")]
    EmptyAxis(&'static str),
    #[error("{0} axis contains a non-finite value")]
    NonFiniteAxis(&'static str),
    #[error("time of flight must be positive and finite (got {0} s)")]
    NonPositiveTof(f64),
    #[error("invalid orbit: {0}")]
    Orbit(#[from] EphemerisError),
    #[error("invalid parking orbit: {0}")]
    InvalidParking(&'static str),
}

/// Evaluate every cell of the request grid and summarise it.
pub fn search(request: &PorkchopRequest) -> Result<PorkchopResult, PorkchopError> {
    request.validate()?;
    let axes = &request.axes;
    let rows = axes.tof_s.len();
    debug!(
        "porkchop search: {} departures x {} times of flight (long way compared: {}, {:?})",
        axes.departure_offsets_s.len(),
        rows,
        request.compare_long_way,
        request.convergence,
    );

    let cols = axes.departure_offsets_s.len();
    // Row-major cell index: tof row, departure column.
    let cell = |idx: usize| -> Option<CellSample> {
        let (row, col) = (idx / cols, idx % cols);
        request
            .evaluate_cell(axes.departure_offsets_s[col], axes.tof_s[row])
            .ok()
    };
    let cells: Vec<Option<CellSample>> = if request.parallel {
        (0..rows * cols).into_par_iter().map(cell).collect()
    } else {
        (0..rows * cols).map(cell).collect()
    };

    let samples = Grid::from_cells(rows, cols, cells);
    let departure_dv_m_s = samples.map(|cell| cell.dv_depart_m_s);
    let arrival_vinf_m_s = samples.map(|cell| cell.vinf_arrive_m_s);

    let valley_tof_s = (0..samples.cols())
        .map(|col| departure_dv_m_s.column_argmin(col).map(|row| axes.tof_s[row]))
        .collect();
    let departure_dv_minimum = departure_dv_m_s
        .minimum()
        .map(|cell| PorkchopMinimum::from_cell(cell, axes));
    let arrival_vinf_minimum = arrival_vinf_m_s
        .minimum()
        .map(|cell| PorkchopMinimum::from_cell(cell, axes));

    let infeasible = samples.invalid_count();
    if departure_dv_minimum.is_none() {
        warn!("porkchop search produced no feasible cells");
    } else {
        debug!(
            "porkchop search finished: {} of {} cells infeasible",
            infeasible,
            rows * samples.cols()
        );
    }

    Ok(PorkchopResult {
        axes: axes.clone(),
        samples,
        departure_dv_m_s,
        arrival_vinf_m_s,
        departure_dv_minimum,
        arrival_vinf_minimum,
        valley_tof_s,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use quicklook_core::constants::{MU_SUN, SECONDS_PER_YEAR};

    fn small_request() -> PorkchopRequest {
        let axes = PorkchopAxes::new(
            linspace(0.0, SECONDS_PER_YEAR, 4),
            linspace(5.0 * SECONDS_PER_YEAR, 7.0 * SECONDS_PER_YEAR, 3),
        );
        PorkchopRequest::between(Body::Earth, Body::Saturn, axes, 300.0e3).unwrap()
    }

    #[test]
    fn linspace_includes_endpoints() {
        assert_eq!(linspace(0.0, 1.0, 3), vec![0.0, 0.5, 1.0]);
        assert_eq!(linspace(2.0, 5.0, 1), vec![2.0]);
        assert!(linspace(0.0, 1.0, 0).is_empty());
    }

    #[test]
    fn rejects_bad_axes() {
        let mut request = small_request();
        request.axes.tof_s = vec![0.0];
        assert_eq!(search(&request).unwrap_err(), PorkchopError::NonPositiveTof(0.0));

        request.axes.tof_s.clear();
        assert_eq!(
            search(&request).unwrap_err(),
            PorkchopError::EmptyAxis("time-of-flight")
        );
    }

    #[test]
    fn rejects_bad_orbits() {
        let mut request = small_request();
        request.mu_central_m3_s2 = 0.0;
        assert!(matches!(search(&request), Err(PorkchopError::Orbit(_))));

        let mut request = small_request();
        request.parking.altitude_m = -1.0e9;
        assert!(matches!(
            search(&request),
            Err(PorkchopError::InvalidParking(_))
        ));
    }

    #[test]
    fn grid_shape_follows_axes() {
        let result = search(&small_request()).unwrap();
        assert_eq!(result.departure_dv_m_s.rows(), 3);
        assert_eq!(result.departure_dv_m_s.cols(), 4);
        assert_eq!(result.valley_tof_s.len(), 4);
        assert_eq!(result.cell_count(), 12);
    }

    #[test]
    fn parallel_and_serial_agree() {
        let mut request = small_request();
        request.parallel = false;
        let serial = search(&request).unwrap();
        request.parallel = true;
        let parallel = search(&request).unwrap();
        assert_eq!(serial.departure_dv_m_s, parallel.departure_dv_m_s);
        assert_eq!(serial.valley_tof_s, parallel.valley_tof_s);
    }

    #[test]
    fn long_way_comparison_never_costs_more() {
        let mut request = small_request();
        request.parallel = false;
        let short_only = search(&request).unwrap();
        request.compare_long_way = true;
        let both = search(&request).unwrap();
        for (row, col, value) in short_only.departure_dv_m_s.iter() {
            if let (Some(short), Some(best)) = (value, both.departure_dv_m_s.get(row, col)) {
                assert!(best <= short + 1e-9);
            }
        }
    }

    #[test]
    fn evaluate_cell_is_deterministic() {
        let request = small_request();
        let a = request.evaluate_cell(0.0, 6.0 * SECONDS_PER_YEAR);
        let b = request.evaluate_cell(0.0, 6.0 * SECONDS_PER_YEAR);
        assert_eq!(a, b);
        assert_eq!(request.mu_central_m3_s2, MU_SUN);
    }
}
