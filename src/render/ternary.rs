//! Ternary-composition diagram on a triangular simplex.
//!
//! There is no ternary-plot facility in the charting stack, so the simplex is
//! drawn from line and text primitives on an unadorned cartesian chart.

use std::path::Path;

use anyhow::{Context, Result};
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use crate::color::ColorMap;
use crate::data::model::{Composition, SolubilityDataset};

/// sin 60°, the height factor of the simplex.
const SQRT3_2: f64 = 0.866_025_403_784_438_6;

/// Cartesian positions of the three pure-component vertices.
const H2O_VERTEX: (f64, f64) = (0.0, 0.0);
const NACL_VERTEX: (f64, f64) = (100.0, 0.0);
const KCL_VERTEX: (f64, f64) = (50.0, 100.0 * SQRT3_2);

/// Gridline and tick spacing along each axis, in percent.
const GRID_STEP: f64 = 25.0;

/// Project a three-way composition onto the plane: pure H2O at the
/// bottom-left vertex, pure NaCl at the bottom-right, pure KCl at the top.
fn project(c: &Composition) -> (f64, f64) {
    project_raw(c.nacl, c.kcl)
}

fn project_raw(nacl: f64, kcl: f64) -> (f64, f64) {
    (nacl + kcl / 2.0, kcl * SQRT3_2)
}

/// Render the ternary diagram: simplex boundary, gridlines, ticks, vertex
/// annotations, one curve per temperature group, and tie-lines from each
/// eutectic point to the two pure-salt vertices.
pub fn render(
    dataset: &SolubilityDataset,
    colors: &ColorMap,
    path: &Path,
    size: (u32, u32),
) -> Result<()> {
    let root = BitMapBackend::new(path, size).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("NaCl-KCl-H2O ternary composition", ("sans-serif", 28))
        .margin(30)
        .build_cartesian_2d(-16.0..116.0, -12.0..98.0)?;

    draw_gridlines(&mut chart)?;
    draw_ticks(&mut chart)?;

    // Boundary on top of the gridlines.
    chart.draw_series(std::iter::once(PathElement::new(
        vec![H2O_VERTEX, NACL_VERTEX, KCL_VERTEX, H2O_VERTEX],
        BLACK.stroke_width(2),
    )))?;

    draw_vertex_labels(&mut chart)?;

    for group in &dataset.groups {
        let color = colors.color_for(group.temperature);

        let curve: Vec<(f64, f64)> = group.points.iter().map(project).collect();
        chart
            .draw_series(LineSeries::new(curve.iter().copied(), color.stroke_width(2)))?
            .label(format!("{} °C", group.temperature))
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
        chart.draw_series(curve.iter().map(|&(x, y)| Circle::new((x, y), 3, color.filled())))?;

        if let Some(eutectic) = &group.eutectic {
            let from = project(eutectic);
            chart.draw_series(std::iter::once(Circle::new(from, 5, color.filled())))?;
            for vertex in [NACL_VERTEX, KCL_VERTEX] {
                chart.draw_series(std::iter::once(PathElement::new(
                    vec![from, vertex],
                    color.mix(0.7).stroke_width(1),
                )))?;
            }
        }
    }

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

type TernaryChart<'a, 'b> = plotters::chart::ChartContext<
    'a,
    BitMapBackend<'b>,
    plotters::coord::cartesian::Cartesian2d<
        plotters::coord::types::RangedCoordf64,
        plotters::coord::types::RangedCoordf64,
    >,
>;

/// Gridlines parallel to each edge, one set per component, at fixed steps.
fn draw_gridlines(chart: &mut TernaryChart<'_, '_>) -> Result<()> {
    let style = BLACK.mix(0.3).stroke_width(1);

    let mut k = GRID_STEP;
    while k < 100.0 {
        let lines = [
            // constant NaCl = k
            (project_raw(k, 0.0), project_raw(k, 100.0 - k)),
            // constant KCl = k
            (project_raw(0.0, k), project_raw(100.0 - k, k)),
            // constant H2O = k
            (project_raw(100.0 - k, 0.0), project_raw(0.0, 100.0 - k)),
        ];
        for (from, to) in lines {
            chart.draw_series(std::iter::once(PathElement::new(vec![from, to], style)))?;
        }
        k += GRID_STEP;
    }
    Ok(())
}

/// Tick labels along the three axes: NaCl along the bottom, KCl up the right
/// edge, H2O down the left edge.
fn draw_ticks(chart: &mut TernaryChart<'_, '_>) -> Result<()> {
    let font = ("sans-serif", 12).into_font().color(&BLACK);
    let bottom = font.clone().pos(Pos::new(HPos::Center, VPos::Top));
    let right = font.clone().pos(Pos::new(HPos::Left, VPos::Center));
    let left = font.pos(Pos::new(HPos::Right, VPos::Center));

    let mut k = 0.0;
    while k <= 100.0 {
        // NaCl fraction along the bottom edge.
        chart.draw_series(std::iter::once(Text::new(
            format!("{k:.0}"),
            (k, -1.5),
            bottom.clone(),
        )))?;

        // KCl fraction up the NaCl-KCl edge.
        let (x, y) = project_raw(100.0 - k, k);
        chart.draw_series(std::iter::once(Text::new(
            format!("{k:.0}"),
            (x + 1.8, y),
            right.clone(),
        )))?;

        // H2O fraction down the KCl-H2O edge.
        let (x, y) = project_raw(0.0, k);
        chart.draw_series(std::iter::once(Text::new(
            format!("{:.0}", 100.0 - k),
            (x - 1.8, y),
            left.clone(),
        )))?;

        k += GRID_STEP;
    }
    Ok(())
}

fn draw_vertex_labels(chart: &mut TernaryChart<'_, '_>) -> Result<()> {
    let font = ("sans-serif", 18).into_font().color(&BLACK);

    let labels = [
        ("w(H2O)", (-4.0, -7.0), Pos::new(HPos::Center, VPos::Top)),
        ("w(NaCl)", (104.0, -7.0), Pos::new(HPos::Center, VPos::Top)),
        ("w(KCl)", (50.0, 89.5), Pos::new(HPos::Center, VPos::Bottom)),
    ];
    for (label, at, pos) in labels {
        chart.draw_series(std::iter::once(Text::new(label, at, font.clone().pos(pos))))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: (f64, f64), b: (f64, f64)) {
        assert!((a.0 - b.0).abs() < 1e-9 && (a.1 - b.1).abs() < 1e-9, "{a:?} != {b:?}");
    }

    #[test]
    fn pure_components_land_on_the_vertices() {
        assert_close(project_raw(0.0, 0.0), H2O_VERTEX);
        assert_close(project_raw(100.0, 0.0), NACL_VERTEX);
        assert_close(project_raw(0.0, 100.0), KCL_VERTEX);
    }

    #[test]
    fn interior_composition_projects_inside_the_triangle() {
        let c = Composition::new(8.0, 12.0).unwrap();
        let (x, y) = project(&c);
        assert_close((x, y), (14.0, 12.0 * SQRT3_2));

        // Inside: above the base, below both slanted edges (slope ±√3).
        let sqrt3 = 2.0 * SQRT3_2;
        assert!(y > 0.0);
        assert!(y < sqrt3 * x);
        assert!(y < sqrt3 * (100.0 - x));
    }

    #[test]
    fn edge_compositions_stay_on_the_edges() {
        // No KCl: the point sits on the bottom edge.
        let (_, y) = project_raw(40.0, 0.0);
        assert_eq!(y, 0.0);

        // No water: nacl + kcl = 100 puts the point on the right edge.
        let (x, y) = project_raw(60.0, 40.0);
        assert_close((x, y), (80.0, 40.0 * SQRT3_2));
        let t = y / (100.0 * SQRT3_2);
        assert_close((x, y), (100.0 - 50.0 * t, t * 100.0 * SQRT3_2));
    }
}
