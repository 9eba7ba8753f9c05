use std::path::PathBuf;

use anyhow::{Context, anyhow};
use clap::Parser;
use titan_quicklook::common::bodies::Body;
use titan_quicklook::common::time::{seconds_to_days, seconds_to_years};
use titan_quicklook::common::units::{km_to_m, ms_to_kms};
use titan_quicklook::plot;
use titan_quicklook::transfer::hohmann_quick_look;

/// Tangential two-impulse estimate between circular coplanar orbits, with the moon-relative
/// arrival v∞ bounds used to size a first flyby.
#[derive(Parser, Debug)]
#[command(author, version, about = "Hohmann quick-look between circular orbits")]
struct Cli {
    /// Departure body
    #[arg(long, default_value = "Earth")]
    from: String,

    /// Arrival body
    #[arg(long, default_value = "Saturn")]
    to: String,

    /// Moon of the arrival body for v∞ bounds; pass "none" to skip
    #[arg(long, default_value = "Titan")]
    moon: String,

    /// Parking orbit altitude at the departure body in km
    #[arg(long, default_value_t = 300.0)]
    parking_altitude_km: f64,

    /// Write the orbit geometry figure here
    #[arg(long)]
    plot: Option<PathBuf>,
}

fn parse_body(name: &str) -> anyhow::Result<Body> {
    Body::from_name(name).ok_or_else(|| anyhow!("unknown body '{name}'"))
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let origin = parse_body(&cli.from)?;
    let destination = parse_body(&cli.to)?;
    let moon = if cli.moon.eq_ignore_ascii_case("none") {
        None
    } else {
        Some(parse_body(&cli.moon)?)
    };

    let look = hohmann_quick_look(origin, destination, moon, km_to_m(cli.parking_altitude_km))
        .with_context(|| format!("{origin} -> {destination}"))?;
    let transfer = &look.transfer;

    println!("Hohmann {origin} -> {destination}");
    println!("  dv1 (heliocentric):   {:.3} km/s", ms_to_kms(transfer.dv1_m_s));
    println!("  dv2 (heliocentric):   {:.3} km/s", ms_to_kms(transfer.dv2_m_s));
    println!("  total:                {:.3} km/s", ms_to_kms(transfer.dv_total_m_s));
    println!(
        "  time of flight:       {:.1} days ({:.2} years)",
        seconds_to_days(transfer.tof_seconds),
        seconds_to_years(transfer.tof_seconds)
    );
    println!("  v-inf departure:      {:.3} km/s", ms_to_kms(look.vinf_depart_m_s));
    println!("  v-inf arrival:        {:.3} km/s", ms_to_kms(look.vinf_arrive_m_s));
    println!(
        "  escape from {:.0} km:  {:.3} km/s",
        cli.parking_altitude_km,
        ms_to_kms(look.escape_dv_m_s)
    );
    if let Some(period) = look.synodic_period_s {
        println!("  synodic period:       {:.3} years", seconds_to_years(period));
    }
    if let Some(bounds) = look.moon_bounds {
        println!(
            "  {}-relative v-inf:    {:.3} .. {:.3} km/s (moon speed {:.3} km/s)",
            bounds.moon,
            ms_to_kms(bounds.low_m_s),
            ms_to_kms(bounds.high_m_s),
            ms_to_kms(bounds.moon_speed_m_s)
        );
    }

    if let Some(path) = &cli.plot {
        plot::render_hohmann_geometry(path, origin, destination, (900, 900))
            .with_context(|| format!("rendering {}", path.display()))?;
    }
    Ok(())
}
