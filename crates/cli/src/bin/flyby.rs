use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use log::info;
use titan_quicklook::config::{ScenarioConfig, load_scenario};
use titan_quicklook::common::units::{kms_to_ms, m_to_km, ms_to_kms};
use titan_quicklook::export::flyby as export_flyby;
use titan_quicklook::orbits::moon_relative_vinf_bounds;
use titan_quicklook::plot;
use titan_quicklook::transfer::{post_flyby_map, turn_angle_curves};

/// Patched-conic flyby quick-look: turn angle versus periapsis altitude, and the parent-relative
/// v∞ leaving the moon over alignment angle × altitude.
#[derive(Parser, Debug)]
#[command(author, version, about = "Moon flyby turn-angle and post-flyby v-infinity maps")]
struct Cli {
    /// Scenario file (TOML or YAML); built-in Titan defaults when omitted
    #[arg(long)]
    config: Option<PathBuf>,

    /// Parent-relative incoming v∞ in km/s
    #[arg(long)]
    vinf_in_km_s: Option<f64>,

    /// Fly past the trailing side so the turn opposes the moon's motion
    #[arg(long, default_value_t = false)]
    retrograde: bool,

    /// Directory for generated artifacts (overrides the scenario)
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Write the post-flyby map as CSV (use '-' for stdout)
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Skip PNG rendering
    #[arg(long, default_value_t = false)]
    no_plot: bool,

    #[arg(long, default_value_t = 1000)]
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
        if let Some(vinf) = self.vinf_in_km_s {
            scenario.flyby.vinf_in_km_s = vinf;
        }
        if self.retrograde {
            scenario.flyby.prograde = false;
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
    let config = &scenario.flyby;
    let moon = config.moon()?;
    let vinf_in = kms_to_ms(config.vinf_in_km_s);

    let (low, high) = moon_relative_vinf_bounds(vinf_in, moon.orbital_speed_m_s);
    let curves = turn_angle_curves(
        &moon,
        &config.turn_angle_vinfs_m_s(),
        &config.turn_angle_altitudes_m(),
    )?;
    let map = post_flyby_map(
        &moon,
        vinf_in,
        &config.psi_rad(),
        &config.altitudes_m(),
        config.prograde,
    );

    let to_stdout = cli.csv.as_deref().is_some_and(|p| p.as_os_str() == "-");
    if !to_stdout {
        println!(
            "{} flyby, incoming v-inf {:.3} km/s ({})",
            moon.body,
            config.vinf_in_km_s,
            if config.prograde { "prograde" } else { "retrograde" }
        );
        println!(
            "  moon-relative v-inf bounds: {:.3} .. {:.3} km/s",
            ms_to_kms(low),
            ms_to_kms(high)
        );
        for curve in &curves {
            if let (Some(first), Some(last)) = (curve.turn_angle_rad.first(), curve.turn_angle_rad.last()) {
                println!(
                    "  v-inf {:>5.2} km/s: turn {:6.2}° at {:.0} km, {:6.2}° at {:.0} km",
                    ms_to_kms(curve.vinf_m_s),
                    first.to_degrees(),
                    m_to_km(curve.altitudes_m[0]),
                    last.to_degrees(),
                    m_to_km(curve.altitudes_m[curve.altitudes_m.len() - 1]),
                );
            }
        }
        match map.vinf_out_m_s.value_range() {
            Some((min, max)) => println!(
                "  post-flyby v-inf: {:.3} .. {:.3} km/s over {} cells",
                ms_to_kms(min),
                ms_to_kms(max),
                map.vinf_out_m_s.valid_count()
            ),
            None => println!("  post-flyby v-inf: no defined cells"),
        }
    }

    if let Some(path) = &cli.csv {
        let rows = export_flyby::write_map_to_path(path, &map)
            .with_context(|| format!("writing {}", path.display()))?;
        if !to_stdout {
            info!("wrote {} rows to {}", rows, path.display());
        }
    }

    if !cli.no_plot {
        let stem = moon.body.name().to_lowercase();
        let curves_path = scenario.output_dir.join(format!("{stem}_turn_angle.png"));
        plot::render_turn_angle_curves(&curves_path, &moon, &curves, (cli.width, cli.height))
            .with_context(|| format!("rendering {}", curves_path.display()))?;
        let map_path = scenario.output_dir.join(format!("{stem}_post_flyby_vinf.png"));
        plot::render_flyby_map(&map_path, &moon, &map, (cli.width, cli.height))
            .with_context(|| format!("rendering {}", map_path.display()))?;
    }
    Ok(())
}
