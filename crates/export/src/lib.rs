//! Export helpers for porkchop CSV grids and JSON run summaries.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

pub mod porkchop {
    use std::fs::{self, File};
    use std::io::{self, BufWriter, Write};
    use std::path::Path;

    use chrono::NaiveDate;
    use quicklook_config::dates::format_offset;
    use quicklook_core::time::{seconds_to_days, seconds_to_years};
    use quicklook_core::units::ms_to_kms;
    use quicklook_transfer::PorkchopResult;

    use crate::ExportError;

    const HEADER: &str = "depart_date,depart_offset_s,tof_days,tof_years,dv_depart_km_s,vinf_depart_km_s,vinf_arrive_km_s,lambert_path,feasible";

    /// Create a writer for the target path, handling stdout (`-`) by convention.
    pub fn writer_for_path(path: &Path) -> io::Result<Box<dyn Write>> {
        if path == Path::new("-") {
            return Ok(Box::new(BufWriter::new(io::stdout())));
        }
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let file = File::create(path)?;
        Ok(Box::new(BufWriter::new(file)))
    }

    pub fn write_header(writer: &mut dyn Write) -> io::Result<()> {
        writeln!(writer, "{}", HEADER)
    }

    /// One grid cell. Infeasible cells carry empty numeric fields.
    #[derive(Debug, Clone)]
    pub struct Record<'a> {
        pub depart_date: &'a str,
        pub depart_offset_s: f64,
        pub tof_days: f64,
        pub tof_years: f64,
        pub dv_depart_km_s: Option<f64>,
        pub vinf_depart_km_s: Option<f64>,
        pub vinf_arrive_km_s: Option<f64>,
        pub path: &'a str,
        pub feasible: bool,
    }

    impl Record<'_> {
        /// Serialize the record to CSV, matching the header ordering.
        pub fn write_to(&self, writer: &mut dyn Write) -> io::Result<()> {
            writeln!(
                writer,
                "{},{:.0},{:.3},{:.6},{},{},{},{},{}",
                self.depart_date,
                self.depart_offset_s,
                self.tof_days,
                self.tof_years,
                optional(self.dv_depart_km_s),
                optional(self.vinf_depart_km_s),
                optional(self.vinf_arrive_km_s),
                self.path,
                if self.feasible { "true" } else { "false" },
            )
        }
    }

    fn optional(value: Option<f64>) -> String {
        value.map(|v| format!("{v:.6}")).unwrap_or_default()
    }

    /// Write every cell of a search, departure-major, header included.
    pub fn write_result(
        writer: &mut dyn Write,
        result: &PorkchopResult,
        epoch: NaiveDate,
    ) -> Result<usize, ExportError> {
        write_header(writer)?;
        let mut rows = 0;
        for (col, &offset) in result.axes.departure_offsets_s.iter().enumerate() {
            let depart_date = format_offset(epoch, offset);
            for (row, &tof) in result.axes.tof_s.iter().enumerate() {
                let sample = result.samples.get(row, col);
                let record = Record {
                    depart_date: &depart_date,
                    depart_offset_s: offset,
                    tof_days: seconds_to_days(tof),
                    tof_years: seconds_to_years(tof),
                    dv_depart_km_s: sample.map(|s| ms_to_kms(s.dv_depart_m_s)),
                    vinf_depart_km_s: sample.map(|s| ms_to_kms(s.vinf_depart_m_s)),
                    vinf_arrive_km_s: sample.map(|s| ms_to_kms(s.vinf_arrive_m_s)),
                    path: sample.map(|s| s.path.as_str()).unwrap_or("none"),
                    feasible: sample.is_some(),
                };
                record.write_to(writer)?;
                rows += 1;
            }
        }
        writer.flush()?;
        Ok(rows)
    }

    pub fn write_result_to_path(
        path: &Path,
        result: &PorkchopResult,
        epoch: NaiveDate,
    ) -> Result<usize, ExportError> {
        let mut writer = writer_for_path(path)?;
        write_result(writer.as_mut(), result, epoch)
    }
}

pub mod flyby {
    use std::io::Write;
    use std::path::Path;

    use quicklook_core::units::{m_to_km, ms_to_kms};
    use quicklook_transfer::FlybyMap;

    use crate::ExportError;
    use crate::porkchop::writer_for_path;

    const HEADER: &str = "psi_deg,altitude_km,vinf_out_km_s";

    /// Write the flyby map, altitude-major, with empty values for undefined cells.
    pub fn write_map(writer: &mut dyn Write, map: &FlybyMap) -> Result<usize, ExportError> {
        writeln!(writer, "{}", HEADER)?;
        let mut rows = 0;
        for (row, col, value) in map.vinf_out_m_s.iter() {
            writeln!(
                writer,
                "{:.3},{:.3},{}",
                map.psi_rad[col].to_degrees(),
                m_to_km(map.altitudes_m[row]),
                value
                    .map(|v| format!("{:.6}", ms_to_kms(v)))
                    .unwrap_or_default(),
            )?;
            rows += 1;
        }
        writer.flush()?;
        Ok(rows)
    }

    pub fn write_map_to_path(path: &Path, map: &FlybyMap) -> Result<usize, ExportError> {
        let mut writer = writer_for_path(path)?;
        write_map(writer.as_mut(), map)
    }
}

pub mod summary {
    use std::fs::{self, File};
    use std::io::{BufReader, BufWriter};
    use std::path::Path;

    use chrono::NaiveDate;
    use quicklook_config::dates::{format_date, format_offset};
    use quicklook_core::bodies::Body;
    use quicklook_core::time::{seconds_to_days, seconds_to_years};
    use quicklook_core::units::ms_to_kms;
    use quicklook_transfer::{HohmannQuickLook, PorkchopMinimum, PorkchopResult};
    use serde::{Deserialize, Serialize};

    use crate::ExportError;

    pub const SUMMARY_VERSION: u32 = 1;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct MinimumSummary {
        pub depart_date: String,
        pub tof_days: f64,
        pub tof_years: f64,
        pub value_km_s: f64,
    }

    impl MinimumSummary {
        pub fn from_minimum(minimum: &PorkchopMinimum, epoch: NaiveDate) -> Self {
            Self {
                depart_date: format_offset(epoch, minimum.departure_offset_s),
                tof_days: seconds_to_days(minimum.tof_s),
                tof_years: seconds_to_years(minimum.tof_s),
                value_km_s: ms_to_kms(minimum.value),
            }
        }
    }

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct HohmannSummary {
        pub dv1_km_s: f64,
        pub dv2_km_s: f64,
        pub tof_years: f64,
        pub vinf_arrive_km_s: f64,
        pub escape_dv_km_s: f64,
        #[serde(default)]
        pub moon: Option<String>,
        #[serde(default)]
        pub moon_vinf_bounds_km_s: Option<(f64, f64)>,
    }

    impl From<&HohmannQuickLook> for HohmannSummary {
        fn from(look: &HohmannQuickLook) -> Self {
            Self {
                dv1_km_s: ms_to_kms(look.transfer.dv1_m_s),
                dv2_km_s: ms_to_kms(look.transfer.dv2_m_s),
                tof_years: seconds_to_years(look.transfer.tof_seconds),
                vinf_arrive_km_s: ms_to_kms(look.vinf_arrive_m_s),
                escape_dv_km_s: ms_to_kms(look.escape_dv_m_s),
                moon: look.moon_bounds.map(|b| b.moon.name().to_string()),
                moon_vinf_bounds_km_s: look
                    .moon_bounds
                    .map(|b| (ms_to_kms(b.low_m_s), ms_to_kms(b.high_m_s))),
            }
        }
    }

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct PorkchopSummary {
        pub version: u32,
        pub origin: String,
        pub destination: String,
        pub reference_epoch: String,
        pub departure_samples: usize,
        pub tof_samples: usize,
        pub feasible_cells: usize,
        pub infeasible_cells: usize,
        pub min_departure_dv: Option<MinimumSummary>,
        pub min_arrival_vinf: Option<MinimumSummary>,
        #[serde(default)]
        pub hohmann: Option<HohmannSummary>,
    }

    impl PorkchopSummary {
        pub fn new(
            origin: Body,
            destination: Body,
            epoch: NaiveDate,
            result: &PorkchopResult,
            hohmann: Option<&HohmannQuickLook>,
        ) -> Self {
            Self {
                version: SUMMARY_VERSION,
                origin: origin.name().to_string(),
                destination: destination.name().to_string(),
                reference_epoch: format_date(epoch),
                departure_samples: result.axes.departure_offsets_s.len(),
                tof_samples: result.axes.tof_s.len(),
                feasible_cells: result.samples.valid_count(),
                infeasible_cells: result.infeasible_count(),
                min_departure_dv: result
                    .departure_dv_minimum
                    .as_ref()
                    .map(|m| MinimumSummary::from_minimum(m, epoch)),
                min_arrival_vinf: result
                    .arrival_vinf_minimum
                    .as_ref()
                    .map(|m| MinimumSummary::from_minimum(m, epoch)),
                hohmann: hohmann.map(HohmannSummary::from),
            }
        }

        pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ExportError> {
            let path = path.as_ref();
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    fs::create_dir_all(parent)?;
                }
            }
            let writer = BufWriter::new(File::create(path)?);
            serde_json::to_writer_pretty(writer, self)?;
            Ok(())
        }

        pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ExportError> {
            let reader = BufReader::new(File::open(path)?);
            Ok(serde_json::from_reader(reader)?)
        }
    }
}
