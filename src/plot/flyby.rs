//! Flyby figures: turn-angle curves and the post-flyby v∞ heatmap.

use std::path::Path;

use log::info;
use plotters::coord::Shift;
use plotters::prelude::*;
use quicklook_core::units::{m_to_km, ms_to_kms};
use quicklook_transfer::{FlybyMap, Moon, TurnAngleCurve};

use super::{
    HeatmapPanel, PlotError, bitmap_root, draw_heatmap, jet_color, render_error,
    select_font_family,
};

pub fn render_turn_angle_curves(
    path: &Path,
    moon: &Moon,
    curves: &[TurnAngleCurve],
    size: (u32, u32),
) -> Result<(), PlotError> {
    if curves.iter().all(|c| c.altitudes_m.is_empty()) {
        return Err(PlotError::Empty("turn-angle curves"));
    }
    let root = bitmap_root(path, size)?;
    draw_curves(&root, moon, curves).map_err(render_error)?;
    root.present().map_err(render_error)?;
    info!("wrote {}", path.display());
    Ok(())
}

fn draw_curves<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    moon: &Moon,
    curves: &[TurnAngleCurve],
) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
    root.fill(&WHITE)?;
    let font_family = select_font_family();
    let (h_lo, h_hi) = curves
        .iter()
        .flat_map(|c| c.altitudes_m.iter().copied())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), h| {
            (lo.min(h), hi.max(h))
        });
    let delta_max = curves
        .iter()
        .flat_map(|c| c.turn_angle_rad.iter().copied())
        .fold(0.0_f64, f64::max)
        .to_degrees();

    let mut chart = ChartBuilder::on(root)
        .margin(20)
        .caption(
            format!("{} flyby: turn angle vs periapsis altitude", moon.body),
            FontDesc::new(font_family, 22.0, FontStyle::Bold),
        )
        .x_label_area_size(45)
        .y_label_area_size(55)
        .build_cartesian_2d(
            m_to_km(h_lo)..m_to_km(h_hi).max(m_to_km(h_lo) + 1.0),
            0.0..(delta_max * 1.05).max(1.0),
        )?;
    chart
        .configure_mesh()
        .x_desc(format!("Periapsis altitude above {} (km)", moon.body))
        .y_desc("Turn angle δ (deg)")
        .label_style(FontDesc::new(font_family, 14.0, FontStyle::Normal))
        .draw()?;

    let n = curves.len().max(2) - 1;
    for (k, curve) in curves.iter().enumerate() {
        let color = jet_color(k as f64 / n as f64);
        chart
            .draw_series(std::iter::once(PathElement::new(
                curve
                    .altitudes_m
                    .iter()
                    .zip(&curve.turn_angle_rad)
                    .map(|(&h, &d)| (m_to_km(h), d.to_degrees()))
                    .collect::<Vec<_>>(),
                ShapeStyle::from(&color).stroke_width(2),
            )))?
            .label(format!("{:.0} km/s", ms_to_kms(curve.vinf_m_s)))
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &color));
    }
    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(&WHITE.mix(0.85))
        .border_style(&BLACK)
        .label_font(FontDesc::new(font_family, 14.0, FontStyle::Normal))
        .draw()?;
    Ok(())
}

pub fn render_flyby_map(
    path: &Path,
    moon: &Moon,
    map: &FlybyMap,
    size: (u32, u32),
) -> Result<(), PlotError> {
    if map.psi_rad.is_empty() || map.altitudes_m.is_empty() {
        return Err(PlotError::Empty("flyby map axes"));
    }
    let root = bitmap_root(path, size)?;
    root.fill(&WHITE).map_err(render_error)?;

    let psi_deg: Vec<f64> = map.psi_rad.iter().map(|p| p.to_degrees()).collect();
    let altitude_km: Vec<f64> = map.altitudes_m.iter().copied().map(m_to_km).collect();
    let vinf_km_s = map.vinf_out_m_s.map(ms_to_kms);
    let label = |d: &f64| format!("{d:.0}");
    let turn = if map.prograde { "prograde" } else { "retrograde" };

    draw_heatmap(
        &root,
        &HeatmapPanel {
            caption: format!(
                "v∞ after {} flyby, V_in = {:.2} km/s ({turn} turn)",
                moon.body,
                ms_to_kms(map.vinf_in_m_s)
            ),
            x_desc: "Alignment ψ (deg)",
            y_desc: "Periapsis altitude (km)",
            colorbar_desc: "|v∞| after flyby (km/s)",
            x: &psi_deg,
            y: &altitude_km,
            grid: &vinf_km_s,
            x_label: &label,
            contours: 16,
            hatch_invalid: true,
        },
        |_| Ok(()),
    )
    .map_err(render_error)?;
    root.present().map_err(render_error)?;
    info!("wrote {}", path.display());
    Ok(())
}
