//! Two-component phase diagrams in NaCl%/KCl% axes.

use std::path::Path;

use anyhow::{Context, Result};
use plotters::chart::ChartContext;
use plotters::coord::cartesian::Cartesian2d;
use plotters::coord::types::RangedCoordf64;
use plotters::prelude::*;
use plotters::style::RGBAColor;

use crate::color::ColorMap;
use crate::data::model::{Composition, SolubilityDataset, TemperatureGroup};

/// Boundary corner on the pure-KCl side.
const KCL_CORNER: (f64, f64) = (0.0, 100.0);
/// Boundary corner on the pure-NaCl side.
const NACL_CORNER: (f64, f64) = (100.0, 0.0);

/// Field labels sit inside each salt's crystallisation region, beside the
/// tie-lines.
const NACL_FIELD_LABEL: (f64, f64) = (6.5, 42.0);
const KCL_FIELD_LABEL: (f64, f64) = (39.5, 1.7);

type BinaryChart<'a, 'b> =
    ChartContext<'a, BitMapBackend<'b>, Cartesian2d<RangedCoordf64, RangedCoordf64>>;

/// Render the phase diagram of a single temperature group.
pub fn render_group(group: &TemperatureGroup, path: &Path) -> Result<()> {
    let root = BitMapBackend::new(path, (800, 800)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(format!("{} °C", group.temperature), ("sans-serif", 24))
        .margin(20)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(0.0..100.0, 0.0..100.0)?;

    chart
        .configure_mesh()
        .bold_line_style(BLACK.mix(0.1))
        .light_line_style(TRANSPARENT)
        .draw()?;

    draw_boundary(&mut chart)?;

    if let Some(eutectic) = &group.eutectic {
        draw_tie_lines(&mut chart, eutectic, BLACK.to_rgba(), 1)?;
        draw_field_labels(&mut chart, 14)?;
    }

    let curve: Vec<(f64, f64)> = group.points.iter().map(|p| (p.nacl, p.kcl)).collect();
    chart.draw_series(LineSeries::new(curve.iter().copied(), BLUE.stroke_width(2)))?;
    chart.draw_series(curve.iter().map(|&(x, y)| Circle::new((x, y), 4, BLUE.filled())))?;

    root.present()
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}

/// Render the combined diagram: every group's curve and tie-lines on one pair
/// of axes, one colour per temperature, legend keyed by temperature.
pub fn render_combined(
    dataset: &SolubilityDataset,
    colors: &ColorMap,
    path: &Path,
    size: (u32, u32),
) -> Result<()> {
    let root = BitMapBackend::new(path, size).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Phase curves by temperature", ("sans-serif", 28))
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d(0.0..100.0, 0.0..100.0)?;

    chart
        .configure_mesh()
        .x_desc("NaCl in liquid phase / wt%")
        .y_desc("KCl in liquid phase / wt%")
        .bold_line_style(BLACK.mix(0.15))
        .light_line_style(TRANSPARENT)
        .draw()?;

    draw_boundary(&mut chart)?;

    for group in &dataset.groups {
        let color = colors.color_for(group.temperature);

        if let Some(eutectic) = &group.eutectic {
            draw_tie_lines(&mut chart, eutectic, color.mix(0.7), 1)?;
        }

        let curve: Vec<(f64, f64)> = group.points.iter().map(|p| (p.nacl, p.kcl)).collect();
        chart
            .draw_series(LineSeries::new(curve.iter().copied(), color.stroke_width(2)))?
            .label(format!("{} °C", group.temperature))
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
        chart.draw_series(curve.iter().map(|&(x, y)| Circle::new((x, y), 3, color.filled())))?;
    }

    draw_field_labels(&mut chart, 18)?;

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .position(SeriesLabelPosition::UpperRight)
        .draw()?;

    root.present()
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}

/// The fixed right-triangle boundary: vertical axis, hypotenuse, base.
fn draw_boundary(chart: &mut BinaryChart<'_, '_>) -> Result<()> {
    chart.draw_series(std::iter::once(PathElement::new(
        vec![KCL_CORNER, (0.0, 0.0), NACL_CORNER, KCL_CORNER],
        BLACK.stroke_width(2),
    )))?;
    Ok(())
}

/// Straight lines from the eutectic point to the two pure-salt corners,
/// separating the NaCl and KCl crystallisation fields.
fn draw_tie_lines(
    chart: &mut BinaryChart<'_, '_>,
    eutectic: &Composition,
    color: RGBAColor,
    width: u32,
) -> Result<()> {
    let from = (eutectic.nacl, eutectic.kcl);
    for corner in [KCL_CORNER, NACL_CORNER] {
        chart.draw_series(std::iter::once(PathElement::new(
            vec![from, corner],
            color.stroke_width(width),
        )))?;
    }
    Ok(())
}

fn draw_field_labels(chart: &mut BinaryChart<'_, '_>, font_size: i32) -> Result<()> {
    chart.draw_series(std::iter::once(Text::new(
        "NaCl",
        NACL_FIELD_LABEL,
        ("sans-serif", font_size),
    )))?;
    chart.draw_series(std::iter::once(Text::new(
        "KCl",
        KCL_FIELD_LABEL,
        ("sans-serif", font_size),
    )))?;
    Ok(())
}
