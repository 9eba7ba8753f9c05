//! Scenario configuration for the Titan quick-look tools.
//!
//! A scenario file (TOML or YAML, chosen by extension) carries the porkchop grid, the flyby
//! sweeps, and the output directory. Every field has a default reproducing the Earth→Saturn
//! study, so an empty file is a valid scenario.

pub mod dates;

use std::fs::File;
use std::path::{Path, PathBuf};

use quicklook_core::bodies::Body;
use quicklook_core::constants::SECONDS_PER_YEAR;
use quicklook_core::units::{km_to_m, kms_to_ms};
use quicklook_transfer::{ConvergencePolicy, Moon, PorkchopAxes, PorkchopRequest, linspace};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while loading or validating configuration files.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse YAML: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("failed to parse TOML: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("invalid date for `{field}`: {value:?} (expected YYYY-MM-DD)")]
    Date { field: &'static str, value: String },
    #[error("unknown body {0:?}")]
    UnknownBody(String),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScenarioConfig {
    pub porkchop: PorkchopConfig,
    pub flyby: FlybyConfig,
    pub output_dir: PathBuf,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            porkchop: PorkchopConfig::default(),
            flyby: FlybyConfig::default(),
            output_dir: PathBuf::from("figures"),
        }
    }
}

impl ScenarioConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.porkchop.validate()?;
        self.flyby.validate()?;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConvergenceSetting {
    #[default]
    Strict,
    BestEffort,
}

impl From<ConvergenceSetting> for ConvergencePolicy {
    fn from(setting: ConvergenceSetting) -> Self {
        match setting {
            ConvergenceSetting::Strict => ConvergencePolicy::Strict,
            ConvergenceSetting::BestEffort => ConvergencePolicy::BestEffort,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct PorkchopConfig {
    pub origin: String,
    pub destination: String,
    /// Moon whose v∞ bounds are reported at arrival.
    pub moon: Option<String>,
    /// Epoch at which both planets sit at phase zero.
    pub reference_epoch: String,
    pub departure_start: String,
    pub departure_end: String,
    pub departure_samples: usize,
    pub tof_min_years: f64,
    pub tof_max_years: f64,
    pub tof_samples: usize,
    pub parking_altitude_km: f64,
    pub compare_long_way: bool,
    pub convergence: ConvergenceSetting,
    pub parallel: bool,
}

impl Default for PorkchopConfig {
    fn default() -> Self {
        Self {
            origin: "Earth".into(),
            destination: "Saturn".into(),
            moon: Some("Titan".into()),
            reference_epoch: "2030-01-01".into(),
            departure_start: "2030-01-01".into(),
            departure_end: "2035-01-01".into(),
            departure_samples: 140,
            tof_min_years: 4.0,
            tof_max_years: 11.0,
            tof_samples: 110,
            parking_altitude_km: 300.0,
            compare_long_way: false,
            convergence: ConvergenceSetting::Strict,
            parallel: true,
        }
    }
}

impl PorkchopConfig {
    pub fn origin_body(&self) -> Result<Body, ConfigError> {
        parse_body(&self.origin)
    }

    pub fn destination_body(&self) -> Result<Body, ConfigError> {
        parse_body(&self.destination)
    }

    pub fn moon_body(&self) -> Result<Option<Body>, ConfigError> {
        self.moon.as_deref().map(parse_body).transpose()
    }

    pub fn reference_date(&self) -> Result<chrono::NaiveDate, ConfigError> {
        dates::parse_date("reference_epoch", &self.reference_epoch)
    }

    /// Departure axis as offsets from the reference epoch (s).
    pub fn departure_offsets_s(&self) -> Result<Vec<f64>, ConfigError> {
        let epoch = self.reference_date()?;
        let start = dates::parse_date("departure_start", &self.departure_start)?;
        let end = dates::parse_date("departure_end", &self.departure_end)?;
        Ok(linspace(
            dates::offset_seconds(epoch, start),
            dates::offset_seconds(epoch, end),
            self.departure_samples,
        ))
    }

    pub fn tof_s(&self) -> Vec<f64> {
        linspace(
            self.tof_min_years * SECONDS_PER_YEAR,
            self.tof_max_years * SECONDS_PER_YEAR,
            self.tof_samples,
        )
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let origin = self.origin_body()?;
        let destination = self.destination_body()?;
        if origin == destination {
            return Err(ConfigError::Invalid(
                "origin and destination must differ".into(),
            ));
        }
        if origin.primary().is_none() || origin.primary() != destination.primary() {
            return Err(ConfigError::Invalid(format!(
                "{origin} and {destination} must orbit the same primary"
            )));
        }
        self.moon_body()?;
        self.reference_date()?;
        let start = dates::parse_date("departure_start", &self.departure_start)?;
        let end = dates::parse_date("departure_end", &self.departure_end)?;
        if end < start {
            return Err(ConfigError::Invalid(format!(
                "departure_end {end} precedes departure_start {start}"
            )));
        }
        if self.departure_samples == 0 || self.tof_samples == 0 {
            return Err(ConfigError::Invalid(
                "grid sample counts must be at least 1".into(),
            ));
        }
        if !(self.tof_min_years > 0.0 && self.tof_max_years >= self.tof_min_years) {
            return Err(ConfigError::Invalid(format!(
                "time-of-flight range {}..{} years must be positive and ordered",
                self.tof_min_years, self.tof_max_years
            )));
        }
        if !(self.parking_altitude_km >= 0.0) {
            return Err(ConfigError::Invalid(format!(
                "parking altitude must be non-negative (got {} km)",
                self.parking_altitude_km
            )));
        }
        Ok(())
    }

    /// Validated porkchop request for the configured bodies and grid.
    pub fn to_request(&self) -> Result<PorkchopRequest, ConfigError> {
        self.validate()?;
        let axes = PorkchopAxes::new(self.departure_offsets_s()?, self.tof_s());
        let mut request = PorkchopRequest::between(
            self.origin_body()?,
            self.destination_body()?,
            axes,
            km_to_m(self.parking_altitude_km),
        )
        .map_err(|err| ConfigError::Invalid(err.to_string()))?;
        request.compare_long_way = self.compare_long_way;
        request.convergence = self.convergence.into();
        request.parallel = self.parallel;
        Ok(request)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct FlybyConfig {
    pub moon: String,
    /// Parent-relative incoming v∞ for the post-flyby map (km/s).
    pub vinf_in_km_s: f64,
    pub psi_min_deg: f64,
    pub psi_max_deg: f64,
    pub psi_samples: usize,
    pub altitude_min_km: f64,
    pub altitude_max_km: f64,
    pub altitude_samples: usize,
    pub prograde: bool,
    /// Moon-relative v∞ values for the turn-angle curves (km/s).
    pub turn_angle_vinfs_km_s: Vec<f64>,
    pub turn_angle_samples: usize,
}

impl Default for FlybyConfig {
    fn default() -> Self {
        Self {
            moon: "Titan".into(),
            vinf_in_km_s: 5.5,
            psi_min_deg: 0.0,
            psi_max_deg: 180.0,
            psi_samples: 181,
            altitude_min_km: 100.0,
            altitude_max_km: 4_000.0,
            altitude_samples: 121,
            prograde: true,
            turn_angle_vinfs_km_s: vec![1.0, 3.0, 6.0, 9.0, 11.0],
            turn_angle_samples: 400,
        }
    }
}

impl FlybyConfig {
    pub fn moon(&self) -> Result<Moon, ConfigError> {
        let body = parse_body(&self.moon)?;
        Moon::from_body(body)
            .ok_or_else(|| ConfigError::Invalid(format!("{body} does not orbit a primary")))
    }

    pub fn vinf_in_m_s(&self) -> f64 {
        kms_to_ms(self.vinf_in_km_s)
    }

    pub fn psi_rad(&self) -> Vec<f64> {
        linspace(
            self.psi_min_deg.to_radians(),
            self.psi_max_deg.to_radians(),
            self.psi_samples,
        )
    }

    pub fn altitudes_m(&self) -> Vec<f64> {
        linspace(
            km_to_m(self.altitude_min_km),
            km_to_m(self.altitude_max_km),
            self.altitude_samples,
        )
    }

    pub fn turn_angle_altitudes_m(&self) -> Vec<f64> {
        linspace(
            km_to_m(self.altitude_min_km),
            km_to_m(self.altitude_max_km),
            self.turn_angle_samples,
        )
    }

    pub fn turn_angle_vinfs_m_s(&self) -> Vec<f64> {
        self.turn_angle_vinfs_km_s
            .iter()
            .copied()
            .map(kms_to_ms)
            .collect()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.moon()?;
        if !(self.vinf_in_km_s > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "flyby v-infinity must be positive (got {} km/s)",
                self.vinf_in_km_s
            )));
        }
        if !(self.altitude_min_km >= 0.0 && self.altitude_max_km >= self.altitude_min_km) {
            return Err(ConfigError::Invalid(format!(
                "altitude range {}..{} km must be non-negative and ordered",
                self.altitude_min_km, self.altitude_max_km
            )));
        }
        if self.psi_max_deg < self.psi_min_deg {
            return Err(ConfigError::Invalid(
                "psi range must be ordered".into(),
            ));
        }
        if self.psi_samples == 0 || self.altitude_samples == 0 || self.turn_angle_samples == 0 {
            return Err(ConfigError::Invalid(
                "flyby sample counts must be at least 1".into(),
            ));
        }
        if let Some(bad) = self.turn_angle_vinfs_km_s.iter().find(|v| !(**v > 0.0)) {
            return Err(ConfigError::Invalid(format!(
                "turn-angle v-infinity values must be positive (got {bad} km/s)"
            )));
        }
        Ok(())
    }
}

/// Load and validate a scenario from a TOML or YAML file.
pub fn load_scenario<P: AsRef<Path>>(path: P) -> Result<ScenarioConfig, ConfigError> {
    let path = path.as_ref();
    let scenario: ScenarioConfig = if path
        .extension()
        .map(|ext| ext == "toml")
        .unwrap_or(false)
    {
        let contents = std::fs::read_to_string(path)?;
        toml::from_str(&contents)?
    } else {
        let reader = File::open(path)?;
        serde_yaml::from_reader(reader)?
    };
    scenario.validate()?;
    Ok(scenario)
}

fn parse_body(name: &str) -> Result<Body, ConfigError> {
    Body::from_name(name).ok_or_else(|| ConfigError::UnknownBody(name.to_string()))
}
