//! Two-panel porkchop: departure Δv from the parking orbit and arrival v∞.

use std::path::Path;

use chrono::NaiveDate;
use log::info;
use plotters::coord::Shift;
use plotters::prelude::*;
use quicklook_config::dates::format_offset;
use quicklook_core::bodies::Body;
use quicklook_core::constants::{SECONDS_PER_DAY, SECONDS_PER_YEAR};
use quicklook_core::units::ms_to_kms;
use quicklook_transfer::{PorkchopMinimum, PorkchopResult};

use super::{
    Chart, HeatmapPanel, PlotError, bitmap_root, dashed_segments, draw_heatmap, render_error,
    select_font_family,
};

pub struct PorkchopPlot<'a> {
    pub result: &'a PorkchopResult,
    pub epoch: NaiveDate,
    pub origin: Body,
    pub destination: Body,
    pub parking_altitude_km: f64,
    /// Spacing of the vertical launch-opportunity guides.
    pub synodic_period_s: Option<f64>,
    pub size: (u32, u32),
}

pub fn render_porkchop(path: &Path, plot: &PorkchopPlot<'_>) -> Result<(), PlotError> {
    if plot.result.axes.departure_offsets_s.is_empty() || plot.result.axes.tof_s.is_empty() {
        return Err(PlotError::Empty("porkchop axes"));
    }
    let root = bitmap_root(path, plot.size)?;
    draw(&root, plot).map_err(render_error)?;
    root.present().map_err(render_error)?;
    info!("wrote {}", path.display());
    Ok(())
}

/// Marker positions in plot coordinates (departure days, TOF years).
fn marker(minimum: &PorkchopMinimum) -> (f64, f64) {
    (
        minimum.departure_offset_s / SECONDS_PER_DAY,
        minimum.tof_s / SECONDS_PER_YEAR,
    )
}

fn draw<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    plot: &PorkchopPlot<'_>,
) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
    root.fill(&WHITE)?;
    let result = plot.result;
    let x: Vec<f64> = result
        .axes
        .departure_offsets_s
        .iter()
        .map(|t| t / SECONDS_PER_DAY)
        .collect();
    let y: Vec<f64> = result
        .axes
        .tof_s
        .iter()
        .map(|t| t / SECONDS_PER_YEAR)
        .collect();
    let epoch = plot.epoch;
    let date_label = move |d: &f64| format_offset(epoch, d * SECONDS_PER_DAY);

    let dv_km_s = result.departure_dv_m_s.map(ms_to_kms);
    let vinf_km_s = result.arrival_vinf_m_s.map(ms_to_kms);
    let valley: Vec<Option<(f64, f64)>> = x
        .iter()
        .zip(&result.valley_tof_s)
        .map(|(&d, tof)| tof.map(|t| (d, t / SECONDS_PER_YEAR)))
        .collect();
    let synodic_lines: Vec<f64> = match plot.synodic_period_s {
        Some(period) if period > 0.0 => {
            let step = period / SECONDS_PER_DAY;
            let (first, last) = (x[0], x[x.len() - 1]);
            (0..)
                .map(|k| first + step * k as f64)
                .take_while(|d| *d <= last)
                .collect()
        }
        _ => Vec::new(),
    };
    let tof_span = (y[0], y[y.len() - 1]);

    let overlay = Overlay {
        result,
        synodic_lines,
        valley,
        tof_span,
        dash: (x[x.len() - 1] - x[0]).max(1.0) / 80.0,
    };

    let (left, right) = root.split_horizontally((plot.size.0 / 2) as i32);
    draw_heatmap(
        &left,
        &HeatmapPanel {
            caption: format!(
                "{} → {}: departure Δv from {:.0} km parking orbit",
                plot.origin, plot.destination, plot.parking_altitude_km
            ),
            x_desc: "Departure date",
            y_desc: "Time of flight (years)",
            colorbar_desc: "Δv_dep (km/s)",
            x: &x,
            y: &y,
            grid: &dv_km_s,
            x_label: &date_label,
            contours: 24,
            hatch_invalid: true,
        },
        |chart| draw_overlay(chart, &overlay, false),
    )?;
    draw_heatmap(
        &right,
        &HeatmapPanel {
            caption: format!("Arrival v∞ at {} (km/s)", plot.destination),
            x_desc: "Departure date",
            y_desc: "Time of flight (years)",
            colorbar_desc: "v∞ arrival (km/s)",
            x: &x,
            y: &y,
            grid: &vinf_km_s,
            x_label: &date_label,
            contours: 24,
            hatch_invalid: true,
        },
        |chart| draw_overlay(chart, &overlay, true),
    )?;
    Ok(())
}

struct Overlay<'a> {
    result: &'a PorkchopResult,
    synodic_lines: Vec<f64>,
    valley: Vec<Option<(f64, f64)>>,
    tof_span: (f64, f64),
    dash: f64,
}

/// Synodic guides, the dashed Δv valley, and minimum markers.
fn draw_overlay<DB: DrawingBackend>(
    chart: &mut Chart<'_, DB>,
    overlay: &Overlay<'_>,
    show_vinf_min: bool,
) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
    let label_font = FontDesc::new(select_font_family(), 13.0, FontStyle::Normal);
    let (tof_lo, tof_hi) = overlay.tof_span;
    let dotted = ShapeStyle::from(&WHITE.mix(0.5)).stroke_width(1);
    for &d in &overlay.synodic_lines {
        let line = [Some((d, tof_lo)), Some((d, tof_hi))];
        chart.draw_series(
            dashed_segments(&line, (tof_hi - tof_lo).max(1e-3) / 60.0)
                .into_iter()
                .map(|(a, b)| PathElement::new(vec![a, b], dotted)),
        )?;
    }

    let valley_style = ShapeStyle::from(&WHITE).stroke_width(2);
    chart.draw_series(
        dashed_segments(&overlay.valley, overlay.dash)
            .into_iter()
            .map(|(a, b)| PathElement::new(vec![a, b], valley_style)),
    )?;

    if let Some(min) = &overlay.result.departure_dv_minimum {
        let at = marker(min);
        chart.draw_series(std::iter::once(Circle::new(at, 5, WHITE.filled())))?;
        chart.draw_series(std::iter::once(Circle::new(at, 5, BLACK.stroke_width(1))))?;
        if !show_vinf_min {
            chart.draw_series(std::iter::once(Text::new(
                format!("min Δv = {:.2} km/s, TOF {:.2} y", ms_to_kms(min.value), at.1),
                at,
                label_font.clone().color(&BLACK),
            )))?;
        }
    }
    if show_vinf_min {
        if let Some(min) = &overlay.result.arrival_vinf_minimum {
            let at = marker(min);
            let half = (overlay.dash, (tof_hi - tof_lo).max(1e-3) / 100.0);
            chart.draw_series(std::iter::once(Rectangle::new(
                [(at.0 - half.0, at.1 - half.1), (at.0 + half.0, at.1 + half.1)],
                WHITE.filled(),
            )))?;
            chart.draw_series(std::iter::once(Text::new(
                format!("min v∞ = {:.2} km/s, TOF {:.2} y", ms_to_kms(min.value), at.1),
                at,
                label_font.color(&BLACK),
            )))?;
        }
    }
    Ok(())
}
