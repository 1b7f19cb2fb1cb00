use std::path::Path;

use anyhow::Context as _;
use plotters::data::Quartiles;
use plotters::prelude::*;

const CHART_SIZE: (u32, u32) = (900, 600);
const BOX_HALF_WIDTH: f64 = 0.18;

/// Renders one measure as a per-cohort boxplot with every book's value
/// overlaid as a jittered point, written as a PNG. Pure rendering: all data
/// is collected before this runs.
pub fn render_measure(
    path: &Path,
    measure_name: &str,
    groups: &[(String, Vec<f64>)],
) -> anyhow::Result<()> {
    let root = BitMapBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE).context("fill chart background")?;

    // Boxes need at least two values; singleton cohorts still get points.
    let boxes: Vec<Option<[f64; 5]>> = groups
        .iter()
        .map(|(_, values)| {
            if values.len() < 2 {
                None
            } else {
                Some(Quartiles::new(values).values().map(f64::from))
            }
        })
        .collect();

    let mut y_min = 0.0_f64;
    let mut y_max = 0.0_f64;
    for (_, values) in groups {
        for &value in values {
            y_min = y_min.min(value);
            y_max = y_max.max(value);
        }
    }
    for fences in boxes.iter().flatten() {
        y_min = y_min.min(fences[0]);
        y_max = y_max.max(fences[4]);
    }
    if y_max <= y_min {
        y_max = y_min + 1.0;
    }
    let pad = (y_max - y_min) * 0.1;

    let x_max = (groups.len() as f64 - 0.5).max(0.5);
    let mut chart = ChartBuilder::on(&root)
        .caption(measure_name, ("sans-serif", 28))
        .margin(16)
        .x_label_area_size(24)
        .y_label_area_size(56)
        .build_cartesian_2d(-0.5..x_max, (y_min - pad)..(y_max + pad))
        .context("build chart axes")?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(0)
        .y_desc(measure_name)
        .draw()
        .context("draw chart mesh")?;

    for (i, ((cohort, values), box_values)) in groups.iter().zip(&boxes).enumerate() {
        let x = i as f64;
        let color = Palette99::pick(i);

        if let Some([lower_fence, q1, median, q3, upper_fence]) = *box_values {
            chart
                .draw_series([
                    Rectangle::new(
                        [(x - BOX_HALF_WIDTH, q1), (x + BOX_HALF_WIDTH, q3)],
                        color.mix(0.15).filled(),
                    ),
                    Rectangle::new(
                        [(x - BOX_HALF_WIDTH, q1), (x + BOX_HALF_WIDTH, q3)],
                        color.stroke_width(1),
                    ),
                ])
                .context("draw box")?;

            chart
                .draw_series([
                    PathElement::new(
                        vec![(x - BOX_HALF_WIDTH, median), (x + BOX_HALF_WIDTH, median)],
                        color.stroke_width(2),
                    ),
                    PathElement::new(vec![(x, q3), (x, upper_fence)], color.stroke_width(1)),
                    PathElement::new(vec![(x, lower_fence), (x, q1)], color.stroke_width(1)),
                    PathElement::new(
                        vec![
                            (x - BOX_HALF_WIDTH / 2.0, upper_fence),
                            (x + BOX_HALF_WIDTH / 2.0, upper_fence),
                        ],
                        color.stroke_width(1),
                    ),
                    PathElement::new(
                        vec![
                            (x - BOX_HALF_WIDTH / 2.0, lower_fence),
                            (x + BOX_HALF_WIDTH / 2.0, lower_fence),
                        ],
                        color.stroke_width(1),
                    ),
                ])
                .context("draw whiskers")?;
        }

        chart
            .draw_series(
                values
                    .iter()
                    .enumerate()
                    .map(|(j, &value)| Circle::new((x + point_jitter(j), value), 4, color.filled())),
            )
            .context("draw points")?
            .label(cohort)
            .legend(move |(lx, ly)| Circle::new((lx, ly), 4, color.filled()));
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK.mix(0.4))
        .draw()
        .context("draw legend")?;

    root.present()
        .with_context(|| format!("write chart: {}", path.display()))?;

    Ok(())
}

// Deterministic spread so points in a cohort do not stack on one pixel
// column and reruns produce identical images.
fn point_jitter(index: usize) -> f64 {
    let step = ((index * 7919) % 97) as f64 / 96.0;
    (step - 0.5) * BOX_HALF_WIDTH * 1.5
}
