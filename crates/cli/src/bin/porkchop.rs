use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, anyhow};
use clap::Parser;
use log::info;
use titan_quicklook::config::{ConvergenceSetting, ScenarioConfig, load_scenario};
use titan_quicklook::export::porkchop as export_porkchop;
use titan_quicklook::export::summary::PorkchopSummary;
use titan_quicklook::plot::{self, PorkchopPlot};
use titan_quicklook::transfer::{self, hohmann_quick_look};

/// Sweep departure date × time of flight, solving one Lambert problem per cell, and report the
/// minimum-Δv transfer window.
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Porkchop search (universal-variable Lambert, circular coplanar orbits)"
)]
struct Cli {
    /// Scenario file (TOML or YAML); built-in Earth→Saturn defaults when omitted
    #[arg(long)]
    config: Option<PathBuf>,

    /// Departure window start (YYYY-MM-DD)
    #[arg(long)]
    depart_start: Option<String>,

    /// Departure window end (YYYY-MM-DD)
    #[arg(long)]
    depart_end: Option<String>,

    /// Number of departure samples
    #[arg(long)]
    departure_samples: Option<usize>,

    /// Shortest time of flight in years
    #[arg(long)]
    tof_min_years: Option<f64>,

    /// Longest time of flight in years
    #[arg(long)]
    tof_max_years: Option<f64>,

    /// Number of time-of-flight samples
    #[arg(long)]
    tof_samples: Option<usize>,

    /// Parking orbit altitude at the origin in km
    #[arg(long)]
    parking_altitude_km: Option<f64>,

    /// Also solve the long way and keep the cheaper departure
    #[arg(long, default_value_t = false)]
    long_way: bool,

    /// Accept Lambert solves that hit the iteration cap
    #[arg(long, default_value_t = false)]
    best_effort: bool,

    /// Evaluate the grid on a single thread
    #[arg(long, default_value_t = false)]
    serial: bool,

    /// Directory for generated artifacts (overrides the scenario)
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Output CSV file (use '-' for stdout); defaults to <output-dir>/porkchop_<from>_<to>.csv
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Skip PNG rendering
    #[arg(long, default_value_t = false)]
    no_plot: bool,

    #[arg(long, default_value_t = 1800)]
    width: u32,

    #[arg(long, default_value_t = 700)]
    height: u32,
}

impl Cli {
    fn scenario(&self) -> anyhow::Result<ScenarioConfig> {
        let mut scenario = match &self.config {
            Some(path) => load_scenario(path)
                .with_context(|| format!("loading scenario {}", path.display()))?,
            None => ScenarioConfig::default(),
        };
        let porkchop = &mut scenario.porkchop;
        if let Some(start) = &self.depart_start {
            porkchop.departure_start = start.clone();
        }
        if let Some(end) = &self.depart_end {
            porkchop.departure_end = end.clone();
        }
        if let Some(n) = self.departure_samples {
            porkchop.departure_samples = n;
        }
        if let Some(years) = self.tof_min_years {
            porkchop.tof_min_years = years;
        }
        if let Some(years) = self.tof_max_years {
            porkchop.tof_max_years = years;
        }
        if let Some(n) = self.tof_samples {
            porkchop.tof_samples = n;
        }
        if let Some(km) = self.parking_altitude_km {
            porkchop.parking_altitude_km = km;
        }
        if self.long_way {
            porkchop.compare_long_way = true;
        }
        if self.best_effort {
            porkchop.convergence = ConvergenceSetting::BestEffort;
        }
        if self.serial {
            porkchop.parallel = false;
        }
        if let Some(dir) = &self.output_dir {
            scenario.output_dir = dir.clone();
        }
        scenario.validate().context("invalid scenario")?;
        Ok(scenario)
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();
    let scenario = cli.scenario()?;
    let config = &scenario.porkchop;

    let origin = config.origin_body()?;
    let destination = config.destination_body()?;
    let epoch = config.reference_date()?;
    let request = config.to_request()?;
    let result = transfer::search(&request)?;
    let quick_look =
        hohmann_quick_look(origin, destination, config.moon_body()?, request.parking.altitude_m)?;

    let csv_path = cli.csv.clone().unwrap_or_else(|| {
        scenario.output_dir.join(format!(
            "porkchop_{}_{}.csv",
            origin.name().to_lowercase(),
            destination.name().to_lowercase()
        ))
    });
    let to_stdout = csv_path.as_os_str() == "-";
    let rows = export_porkchop::write_result_to_path(&csv_path, &result, epoch)
        .with_context(|| format!("writing {}", csv_path.display()))?;
    if !to_stdout {
        info!("wrote {} rows to {}", rows, csv_path.display());
    }

    let summary = PorkchopSummary::new(origin, destination, epoch, &result, Some(&quick_look));
    let summary_path = scenario.output_dir.join(format!(
        "porkchop_{}_{}.json",
        origin.name().to_lowercase(),
        destination.name().to_lowercase()
    ));
    summary
        .save(&summary_path)
        .with_context(|| format!("writing {}", summary_path.display()))?;
    info!("wrote {}", summary_path.display());

    // Keep stdout clean for the CSV when streaming it.
    let mut report: Box<dyn Write> = if to_stdout {
        Box::new(std::io::stderr())
    } else {
        Box::new(std::io::stdout())
    };
    writeln!(
        report,
        "{} -> {}: {} of {} cells feasible",
        origin,
        destination,
        summary.feasible_cells,
        result.cell_count()
    )?;
    match &summary.min_departure_dv {
        Some(min) => writeln!(
            report,
            "min departure dv: {:.3} km/s (depart {}, TOF {:.2} y)",
            min.value_km_s, min.depart_date, min.tof_years
        )?,
        None => writeln!(report, "min departure dv: none (no feasible cells)")?,
    }
    if let Some(min) = &summary.min_arrival_vinf {
        writeln!(
            report,
            "min arrival v-inf: {:.3} km/s (depart {}, TOF {:.2} y)",
            min.value_km_s, min.depart_date, min.tof_years
        )?;
    }

    if !cli.no_plot {
        if result.departure_dv_minimum.is_none() {
            return Err(anyhow!("no feasible Lambert solutions to plot"));
        }
        let png_path = scenario.output_dir.join(format!(
            "porkchop_{}_{}.png",
            origin.name().to_lowercase(),
            destination.name().to_lowercase()
        ));
        plot::render_porkchop(
            &png_path,
            &PorkchopPlot {
                result: &result,
                epoch,
                origin,
                destination,
                parking_altitude_km: config.parking_altitude_km,
                synodic_period_s: quick_look.synodic_period_s,
                size: (cli.width, cli.height),
            },
        )
        .with_context(|| format!("rendering {}", png_path.display()))?;

        let geometry_path = scenario.output_dir.join(format!(
            "hohmann_{}_{}.png",
            origin.name().to_lowercase(),
            destination.name().to_lowercase()
        ));
        plot::render_hohmann_geometry(&geometry_path, origin, destination, (900, 900))
            .with_context(|| format!("rendering {}", geometry_path.display()))?;
    }

    Ok(())
}
