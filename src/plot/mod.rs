//! PNG rendering for porkchop grids, flyby sweeps, and the Hohmann geometry sketch.
//!
//! Drawing goes through `plotters` on the bitmap backend. The colour-scale and contour helpers
//! below are pure so they can be tested without a backend.

pub mod flyby;
pub mod hohmann;
pub mod porkchop;

use std::fs;
use std::path::Path;

use plotters::coord::Shift;
use plotters::coord::types::RangedCoordf64;
use plotters::prelude::*;
use quicklook_transfer::Grid;
use thiserror::Error;

pub use flyby::{render_flyby_map, render_turn_angle_curves};
pub use hohmann::render_hohmann_geometry;
pub use porkchop::{PorkchopPlot, render_porkchop};

#[derive(Debug, Error)]
pub enum PlotError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("output path is not valid UTF-8: {0}")]
    Path(String),
    #[error("nothing to plot: {0}")]
    Empty(&'static str),
    #[error("rendering failed: {0}")]
    Render(String),
}

pub(crate) type Chart<'a, DB> = ChartContext<'a, DB, Cartesian2d<RangedCoordf64, RangedCoordf64>>;

/// Open a bitmap drawing area at `path`, creating parent directories.
pub(crate) fn bitmap_root<'a>(
    path: &'a Path,
    size: (u32, u32),
) -> Result<DrawingArea<BitMapBackend<'a>, Shift>, PlotError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let path_str = path
        .to_str()
        .ok_or_else(|| PlotError::Path(path.display().to_string()))?;
    Ok(BitMapBackend::new(path_str, size).into_drawing_area())
}

pub(crate) fn render_error<E: std::fmt::Display>(err: E) -> PlotError {
    PlotError::Render(err.to_string())
}

pub(crate) fn select_font_family() -> FontFamily<'static> {
    if cfg!(target_os = "macos") {
        FontFamily::Name("Helvetica")
    } else if cfg!(target_os = "windows") {
        FontFamily::Name("Arial")
    } else {
        FontFamily::Name("DejaVu Sans")
    }
}

/// Jet colormap on `[0, 1]`.
pub fn jet_color(t_in: f64) -> RGBColor {
    let t = t_in.clamp(0.0, 1.0);
    fn comp(v: f64) -> f64 {
        (1.0 - (v - 1.0).abs()).clamp(0.0, 1.0)
    }
    let r = comp(1.5 - 4.0 * (t - 0.75).abs());
    let g = comp(1.5 - 4.0 * (t - 0.5).abs());
    let b = comp(1.5 - 4.0 * (t - 0.25).abs());
    RGBColor((r * 255.0) as u8, (g * 255.0) as u8, (b * 255.0) as u8)
}

/// Linear-interpolated percentile of `values` (`pct` in `[0, 100]`).
pub fn percentile(values: &[f64], pct: f64) -> Option<f64> {
    let mut sorted: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if sorted.is_empty() {
        return None;
    }
    sorted.sort_by(f64::total_cmp);
    let rank = (pct.clamp(0.0, 100.0) / 100.0) * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    let t = rank - lo as f64;
    Some(sorted[lo] + t * (sorted[hi] - sorted[lo]))
}

/// Colour-scale range covering the 5th to 95th percentile of the valid cells. Falls back to the
/// full range when that collapses; `(0, 1)` for an empty grid.
pub fn color_range(grid: &Grid) -> (f64, f64) {
    let values: Vec<f64> = grid.iter().filter_map(|(_, _, v)| v).collect();
    match (percentile(&values, 5.0), percentile(&values, 95.0)) {
        (Some(lo), Some(hi)) if hi > lo => (lo, hi),
        _ => match grid.value_range() {
            Some((lo, hi)) => (lo, hi.max(lo + 1e-6)),
            None => (0.0, 1.0),
        },
    }
}

/// `n` evenly spaced contour levels across `range`.
pub fn contour_levels(range: (f64, f64), n: usize) -> Vec<f64> {
    quicklook_transfer::linspace(range.0, range.1, n)
}

/// Cell extent around `coords[idx]`, halfway to each neighbour.
pub fn cell_bounds(coords: &[f64], idx: usize) -> (f64, f64) {
    let center = coords[idx];
    let prev = idx.checked_sub(1).and_then(|i| coords.get(i)).copied();
    let next = coords.get(idx + 1).copied();

    let left = match (prev, next) {
        (Some(prev), _) => 0.5 * (prev + center),
        (None, Some(next)) => center - 0.5 * (next - center),
        (None, None) => center - 0.5,
    };

    let right = match (prev, next) {
        (_, Some(next)) => 0.5 * (center + next),
        (Some(prev), None) => center + 0.5 * (center - prev),
        (None, None) => center + 0.5,
    };

    (left, right)
}

type Segment = ((f64, f64), (f64, f64));

/// Contour segments crossing one grid square at `level`.
///
/// Corners are ordered counter-clockwise from the lower left; edge `k` joins corner `k` to
/// corner `k + 1`.
pub fn marching_square_segments(
    values: [f64; 4],
    coords: [(f64, f64); 4],
    level: f64,
) -> Vec<Segment> {
    let idx = values
        .iter()
        .enumerate()
        .filter(|(_, v)| **v >= level)
        .fold(0u8, |acc, (k, _)| acc | (1 << k));
    if idx == 0 || idx == 15 {
        return Vec::new();
    }

    let edge_point = |edge: usize| -> (f64, f64) {
        let (a, b) = (edge, (edge + 1) % 4);
        let (va, vb) = (values[a], values[b]);
        let (xa, ya) = coords[a];
        let (xb, yb) = coords[b];
        if (vb - va).abs() < f64::EPSILON {
            return ((xa + xb) * 0.5, (ya + yb) * 0.5);
        }
        let t = (level - va) / (vb - va);
        (xa + t * (xb - xa), ya + t * (yb - ya))
    };
    let seg = |e1: usize, e2: usize| (edge_point(e1), edge_point(e2));

    match idx {
        1 | 14 => vec![seg(3, 0)],
        2 | 13 => vec![seg(0, 1)],
        3 | 12 => vec![seg(3, 1)],
        4 | 11 => vec![seg(1, 2)],
        6 | 9 => vec![seg(0, 2)],
        7 | 8 => vec![seg(3, 2)],
        5 => vec![seg(3, 2), seg(0, 1)],
        10 => vec![seg(3, 0), seg(1, 2)],
        _ => Vec::new(),
    }
}

/// Split a polyline into alternating dashes of roughly `dash` length (in data units), skipping
/// gaps where the line is undefined.
pub fn dashed_segments(points: &[Option<(f64, f64)>], dash: f64) -> Vec<Segment> {
    let mut out = Vec::new();
    let mut draw = true;
    let mut carried = 0.0;
    for pair in points.windows(2) {
        let (Some(a), Some(b)) = (pair[0], pair[1]) else {
            continue;
        };
        let length = (b.0 - a.0).hypot(b.1 - a.1);
        if length <= 0.0 || dash <= 0.0 {
            continue;
        }
        let mut s = 0.0;
        while s < length {
            let step = (dash - carried).min(length - s);
            let lerp = |u: f64| (a.0 + (b.0 - a.0) * u / length, a.1 + (b.1 - a.1) * u / length);
            if draw {
                out.push((lerp(s), lerp(s + step)));
            }
            s += step;
            carried += step;
            if carried >= dash {
                carried = 0.0;
                draw = !draw;
            }
        }
    }
    out
}

/// Heatmap panel shared by the porkchop and flyby renderers.
pub(crate) struct HeatmapPanel<'a> {
    pub caption: String,
    pub x_desc: &'a str,
    pub y_desc: &'a str,
    pub colorbar_desc: &'a str,
    /// Column coordinates.
    pub x: &'a [f64],
    /// Row coordinates.
    pub y: &'a [f64],
    pub grid: &'a Grid,
    pub x_label: &'a dyn Fn(&f64) -> String,
    pub contours: usize,
    pub hatch_invalid: bool,
}

/// Draw a heatmap with contours and a colour bar into `area`, then hand the chart to `overlay`.
pub(crate) fn draw_heatmap<DB, F>(
    area: &DrawingArea<DB, Shift>,
    panel: &HeatmapPanel<'_>,
    overlay: F,
) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>>
where
    DB: DrawingBackend,
    F: FnOnce(&mut Chart<'_, DB>) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>>,
{
    let font_family = select_font_family();
    let caption_font = FontDesc::new(font_family, 20.0, FontStyle::Bold);
    let label_font = FontDesc::new(font_family, 14.0, FontStyle::Normal);

    let (width, _) = area.dim_in_pixel();
    let legend_width = 110i32;
    let (plot_area, legend_area) = area.split_horizontally((width as i32 - legend_width).max(200));

    let (lo, hi) = color_range(panel.grid);
    let scale = |v: f64| if hi > lo { (v - lo) / (hi - lo) } else { 0.0 };
    let (x0, _) = cell_bounds(panel.x, 0);
    let (_, x1) = cell_bounds(panel.x, panel.x.len() - 1);
    let (y0, _) = cell_bounds(panel.y, 0);
    let (_, y1) = cell_bounds(panel.y, panel.y.len() - 1);

    {
        let mut chart = ChartBuilder::on(&plot_area)
            .margin(15)
            .caption(panel.caption.clone(), caption_font)
            .x_label_area_size(45)
            .y_label_area_size(60)
            .build_cartesian_2d(x0..x1, y0..y1)?;

        chart
            .configure_mesh()
            .x_desc(panel.x_desc)
            .y_desc(panel.y_desc)
            .label_style(label_font.clone())
            .x_labels(6)
            .y_labels(8)
            .x_label_formatter(panel.x_label)
            .draw()?;

        let hatch = ShapeStyle::from(&BLACK.mix(0.35)).stroke_width(1);
        for (row, col, value) in panel.grid.iter() {
            let (cx0, cx1) = cell_bounds(panel.x, col);
            let (cy0, cy1) = cell_bounds(panel.y, row);
            match value {
                Some(v) => {
                    chart.draw_series(std::iter::once(Rectangle::new(
                        [(cx0, cy0), (cx1, cy1)],
                        jet_color(scale(v)).filled(),
                    )))?;
                }
                None if panel.hatch_invalid => {
                    chart.draw_series(std::iter::once(PathElement::new(
                        vec![(cx0, cy0), (cx1, cy1)],
                        hatch,
                    )))?;
                }
                None => {}
            }
        }

        let levels = contour_levels((lo, hi), panel.contours);
        draw_contours(&mut chart, panel.grid, panel.x, panel.y, &levels)?;
        overlay(&mut chart)?;
    }

    let mut legend = ChartBuilder::on(&legend_area)
        .margin_left(10)
        .margin_right(20)
        .margin_top(40)
        .margin_bottom(50)
        .x_label_area_size(0)
        .y_label_area_size(55)
        .build_cartesian_2d(0.0..1.0, lo..hi)?;
    let steps = 200;
    legend.draw_series((0..steps).map(|i| {
        let t0 = i as f64 / steps as f64;
        let t1 = (i + 1) as f64 / steps as f64;
        Rectangle::new(
            [(0.0, lo + (hi - lo) * t0), (1.0, lo + (hi - lo) * t1)],
            jet_color(t0).filled(),
        )
    }))?;
    legend
        .configure_mesh()
        .disable_x_mesh()
        .disable_y_mesh()
        .x_labels(0)
        .y_labels(6)
        .y_desc(panel.colorbar_desc)
        .y_label_style(label_font.clone())
        .axis_desc_style(label_font)
        .y_label_formatter(&|v| format!("{v:.2}"))
        .draw()?;
    Ok(())
}

fn draw_contours<DB: DrawingBackend>(
    chart: &mut Chart<'_, DB>,
    grid: &Grid,
    x: &[f64],
    y: &[f64],
    levels: &[f64],
) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
    if x.len() < 2 || y.len() < 2 {
        return Ok(());
    }
    let style = ShapeStyle::from(&BLACK.mix(0.45)).stroke_width(1);
    for &level in levels {
        for i in 0..y.len() - 1 {
            for j in 0..x.len() - 1 {
                let corners = [
                    grid.get(i, j),
                    grid.get(i, j + 1),
                    grid.get(i + 1, j + 1),
                    grid.get(i + 1, j),
                ];
                let [Some(v0), Some(v1), Some(v2), Some(v3)] = corners else {
                    continue;
                };
                let coords = [(x[j], y[i]), (x[j + 1], y[i]), (x[j + 1], y[i + 1]), (x[j], y[i + 1])];
                for (p1, p2) in marching_square_segments([v0, v1, v2, v3], coords, level) {
                    chart.draw_series(std::iter::once(PathElement::new(vec![p1, p2], style)))?;
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn jet_endpoints() {
        assert_eq!(jet_color(-1.0), jet_color(0.0));
        let RGBColor(r, _, b) = jet_color(0.0);
        assert!(b > r);
        let RGBColor(r, _, b) = jet_color(1.0);
        assert!(r > b);
    }

    #[test]
    fn percentile_interpolates() {
        let values = [4.0, 1.0, 3.0, 2.0, f64::NAN];
        assert_eq!(percentile(&values, 0.0), Some(1.0));
        assert_eq!(percentile(&values, 100.0), Some(4.0));
        assert_eq!(percentile(&values, 50.0), Some(2.5));
        assert_eq!(percentile(&[], 50.0), None);
    }

    #[test]
    fn color_range_handles_flat_and_empty_grids() {
        let flat = Grid::from_row_major(1, 2, vec![Some(3.0), Some(3.0)]).unwrap();
        let (lo, hi) = color_range(&flat);
        assert_eq!(lo, 3.0);
        assert!(hi > lo);
        let empty = Grid::<f64>::from_row_major(1, 1, vec![None]).unwrap();
        assert_eq!(color_range(&empty), (0.0, 1.0));
    }

    #[test]
    fn cell_bounds_extend_halfway() {
        let coords = [0.0, 1.0, 3.0];
        assert_eq!(cell_bounds(&coords, 0), (-0.5, 0.5));
        assert_eq!(cell_bounds(&coords, 1), (0.5, 2.0));
        assert_eq!(cell_bounds(&coords, 2), (2.0, 4.0));
        assert_eq!(cell_bounds(&[5.0], 0), (4.5, 5.5));
    }

    #[test]
    fn marching_squares_crosses_single_corner() {
        let coords = [(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)];
        let segments = marching_square_segments([1.0, 0.0, 0.0, 0.0], coords, 0.5);
        assert_eq!(segments, vec![((0.0, 0.5), (0.5, 0.0))]);
        assert!(marching_square_segments([1.0; 4], coords, 0.5).is_empty());
        assert_eq!(
            marching_square_segments([1.0, 0.0, 1.0, 0.0], coords, 0.5).len(),
            2
        );
    }

    #[test]
    fn dashes_alternate_and_skip_gaps() {
        let points = [Some((0.0, 0.0)), Some((4.0, 0.0)), None, Some((9.0, 0.0))];
        let dashes = dashed_segments(&points, 1.0);
        assert_eq!(dashes, vec![((0.0, 0.0), (1.0, 0.0)), ((2.0, 0.0), (3.0, 0.0))]);
    }
}
