//! Heliocentric sketch of two circular orbits and the Hohmann half-ellipse joining them.

use std::f64::consts::{PI, TAU};
use std::path::Path;

use log::info;
use plotters::coord::Shift;
use plotters::prelude::*;
use quicklook_core::bodies::Body;
use quicklook_core::units::m_to_au;

use super::{PlotError, bitmap_root, render_error, select_font_family};

/// Points on a circle of radius `r`.
pub fn circle_points(r: f64, n: usize) -> Vec<(f64, f64)> {
    quicklook_transfer::linspace(0.0, TAU, n)
        .into_iter()
        .map(|th| (r * th.cos(), r * th.sin()))
        .collect()
}

/// Half-ellipse from periapsis at `(r1, 0)` to apoapsis at `(-r2, 0)`,
/// `r(θ) = a (1 - e²) / (1 + e cos θ)`.
pub fn transfer_ellipse_points(r1: f64, r2: f64, n: usize) -> Vec<(f64, f64)> {
    let a = 0.5 * (r1 + r2);
    let e = (r2 - r1).abs() / (r1 + r2);
    quicklook_transfer::linspace(0.0, PI, n)
        .into_iter()
        .map(|th| {
            let r = a * (1.0 - e * e) / (1.0 + e * th.cos());
            (r * th.cos(), r * th.sin())
        })
        .collect()
}

pub fn render_hohmann_geometry(
    path: &Path,
    origin: Body,
    destination: Body,
    size: (u32, u32),
) -> Result<(), PlotError> {
    let (Some(r1), Some(r2)) = (origin.orbit_radius(), destination.orbit_radius()) else {
        return Err(PlotError::Empty("bodies without a heliocentric orbit"));
    };
    let root = bitmap_root(path, size)?;
    draw(&root, origin, destination, m_to_au(r1), m_to_au(r2)).map_err(render_error)?;
    root.present().map_err(render_error)?;
    info!("wrote {}", path.display());
    Ok(())
}

fn draw<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    origin: Body,
    destination: Body,
    r1_au: f64,
    r2_au: f64,
) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
    root.fill(&WHITE)?;
    let font_family = select_font_family();
    let extent = r1_au.max(r2_au) * 1.1;

    let mut chart = ChartBuilder::on(root)
        .margin(20)
        .caption(
            format!("{origin} → {destination} Hohmann (heliocentric)"),
            FontDesc::new(font_family, 22.0, FontStyle::Bold),
        )
        .x_label_area_size(45)
        .y_label_area_size(55)
        .build_cartesian_2d(-extent..extent, -extent..extent)?;
    chart
        .configure_mesh()
        .x_desc("x (AU)")
        .y_desc("y (AU)")
        .label_style(FontDesc::new(font_family, 14.0, FontStyle::Normal))
        .draw()?;

    chart
        .draw_series(std::iter::once(PathElement::new(circle_points(r1_au, 600), &BLUE)))?
        .label(format!("{origin} orbit ({r1_au:.3} AU)"))
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &BLUE));
    chart
        .draw_series(std::iter::once(PathElement::new(circle_points(r2_au, 600), &RED)))?
        .label(format!("{destination} orbit ({r2_au:.3} AU)"))
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &RED));

    let transfer: Vec<Option<(f64, f64)>> = transfer_ellipse_points(r1_au, r2_au, 400)
        .into_iter()
        .map(Some)
        .collect();
    let style = ShapeStyle::from(&BLACK).stroke_width(2);
    chart
        .draw_series(
            super::dashed_segments(&transfer, extent / 40.0)
                .into_iter()
                .map(|(a, b)| PathElement::new(vec![a, b], style)),
        )?
        .label("Hohmann transfer")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &BLACK));
    chart.draw_series(
        [(r1_au, 0.0), (-r2_au, 0.0)]
            .into_iter()
            .map(|p| Circle::new(p, 4, BLACK.filled())),
    )?;

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.85))
        .border_style(&BLACK)
        .label_font(FontDesc::new(font_family, 14.0, FontStyle::Normal))
        .draw()?;
    Ok(())
}
