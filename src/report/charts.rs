//! @ai:module:intent Render per-metric distribution charts for each website
//! @ai:module:layer infrastructure
//! @ai:module:public_api ChartGenerator, ChartGeneratorTrait, MetricPanel, VariantSeries, BoxStats
//! @ai:module:stateless true

use crate::metrics::types::{first_seen, median_of_sorted};
use crate::metrics::{PlotType, Sample};
use anyhow::Result;
use plotters::coord::cartesian::Cartesian2d;
use plotters::coord::types::RangedCoordf64;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::FontTransform;
use std::path::Path;

const TITLE_HEIGHT: u32 = 50;
const HALF_WIDTH: f64 = 0.3;
const VIOLIN_HALF_WIDTH: f64 = 0.4;
const VIOLIN_POINTS: usize = 100;
const WHISKER_IQR: f64 = 1.5;

/// @ai:intent Non-null values of one variant for one metric
#[derive(Debug, Clone, PartialEq)]
pub struct VariantSeries {
    pub variant: String,
    pub values: Vec<f64>,
}

impl VariantSeries {
    /// @ai:intent Values handed to the renderer; an empty group becomes one NaN placeholder
    /// @ai:post never empty
    /// @ai:effects pure
    pub fn plot_values(&self) -> Vec<f64> {
        if self.values.is_empty() {
            vec![f64::NAN]
        } else {
            self.values.clone()
        }
    }
}

/// @ai:intent One chart panel: a metric and its per-variant series
#[derive(Debug, Clone, PartialEq)]
pub struct MetricPanel {
    pub metric: String,
    pub series: Vec<VariantSeries>,
}

impl MetricPanel {
    /// @ai:intent Padded y-axis range covering every finite value
    /// @ai:effects pure
    fn y_range(&self) -> (f64, f64) {
        let finite = self
            .series
            .iter()
            .flat_map(|s| s.values.iter().copied())
            .filter(|v| v.is_finite());

        let (lo, hi) = finite.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });

        if lo > hi {
            (0.0, 1.0)
        } else if lo == hi {
            (lo - 1.0, hi + 1.0)
        } else {
            let pad = (hi - lo) * 0.08;
            (lo - pad, hi + pad)
        }
    }
}

/// @ai:intent Group samples into panels, metrics and variants in first-seen order
/// @ai:effects pure
pub fn build_panels(samples: &[&Sample]) -> Vec<MetricPanel> {
    first_seen(samples.iter().map(|s| s.metric.as_str()))
        .into_iter()
        .map(|metric| {
            let rows: Vec<&Sample> = samples
                .iter()
                .copied()
                .filter(|s| s.metric == metric)
                .collect();

            let series = first_seen(rows.iter().map(|s| s.variant.as_str()))
                .into_iter()
                .map(|variant| VariantSeries {
                    variant: variant.to_string(),
                    values: rows
                        .iter()
                        .filter(|s| s.variant == variant)
                        .filter_map(|s| s.value)
                        .collect(),
                })
                .collect();

            MetricPanel {
                metric: metric.to_string(),
                series,
            }
        })
        .collect()
}

/// @ai:intent Grid holding n panels: cols = ceil(sqrt n), rows = ceil(n / cols)
/// @ai:effects pure
pub fn grid_shape(n: usize) -> (usize, usize) {
    let n = n.max(1);
    let cols = (n as f64).sqrt().ceil() as usize;
    let rows = n.div_ceil(cols);
    (rows, cols)
}

/// @ai:intent Linear-interpolated percentile of an ascending slice
/// @ai:pre sorted is ascending and non-empty; p in [0, 100]
/// @ai:effects pure
pub fn percentile(sorted: &[f64], p: f64) -> f64 {
    let rank = p / 100.0 * (sorted.len() - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    let frac = rank - lower as f64;

    sorted[lower] + (sorted[upper] - sorted[lower]) * frac
}

/// @ai:intent Box-and-whisker geometry of one group
#[derive(Debug, Clone, PartialEq)]
pub struct BoxStats {
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub lower_whisker: f64,
    pub upper_whisker: f64,
    pub outliers: Vec<f64>,
}

impl BoxStats {
    /// @ai:intent Quartiles with whiskers at the extreme values inside 1.5 IQR
    /// @ai:pre sorted is ascending and non-empty
    /// @ai:effects pure
    pub fn from_sorted(sorted: &[f64]) -> Self {
        let q1 = percentile(sorted, 25.0);
        let q3 = percentile(sorted, 75.0);
        let iqr = q3 - q1;
        let lo_fence = q1 - WHISKER_IQR * iqr;
        let hi_fence = q3 + WHISKER_IQR * iqr;

        let inside = sorted.iter().copied().filter(|v| *v >= lo_fence && *v <= hi_fence);
        let lower_whisker = inside.clone().next().unwrap_or(q1);
        let upper_whisker = inside.last().unwrap_or(q3);

        Self {
            q1,
            median: median_of_sorted(sorted),
            q3,
            lower_whisker,
            upper_whisker,
            outliers: sorted
                .iter()
                .copied()
                .filter(|v| *v < lo_fence || *v > hi_fence)
                .collect(),
        }
    }
}

/// @ai:intent Gaussian KDE over [min, max] with Scott's bandwidth
/// @ai:post None when fewer than two values or zero spread
/// @ai:effects pure
pub fn kernel_density(sorted: &[f64], points: usize) -> Option<Vec<(f64, f64)>> {
    let n = sorted.len();
    if n < 2 || points < 2 {
        return None;
    }

    let mean = sorted.iter().sum::<f64>() / n as f64;
    let std = (sorted.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1) as f64).sqrt();
    if std == 0.0 {
        return None;
    }

    let bandwidth = std * (n as f64).powf(-0.2);
    let norm = 1.0 / (n as f64 * bandwidth * (2.0 * std::f64::consts::PI).sqrt());
    let (lo, hi) = (sorted[0], sorted[n - 1]);
    let step = (hi - lo) / (points - 1) as f64;

    let curve = (0..points)
        .map(|i| {
            let y = lo + step * i as f64;
            let density = sorted
                .iter()
                .map(|v| (-0.5 * ((y - v) / bandwidth).powi(2)).exp())
                .sum::<f64>()
                * norm;
            (y, density)
        })
        .collect();

    Some(curve)
}

/// @ai:intent File-name-safe form of a website name
/// @ai:effects pure
pub fn safe_file_stem(name: &str) -> String {
    name.replace(['/', '\\'], "_")
}

/// @ai:intent Variant name for an x-axis position, empty between slots
/// @ai:effects pure
fn category_label(labels: &[String], x: f64) -> String {
    let slot = x.round();
    if (x - slot).abs() > 1e-6 || slot < 0.0 {
        return String::new();
    }

    labels.get(slot as usize).cloned().unwrap_or_default()
}

/// @ai:intent Trait for chart generation
pub trait ChartGeneratorTrait: Send + Sync {
    /// @ai:intent Render one multi-panel figure for a set of samples
    fn render(&self, title: &str, samples: &[&Sample], output_path: &Path) -> Result<()>;
}

/// @ai:intent Draws box, scatter or violin figures with one panel per metric
pub struct ChartGenerator {
    plot_type: PlotType,
    panel_width: u32,
    panel_height: u32,
}

type Panel<'a> = DrawingArea<BitMapBackend<'a>, Shift>;
type PanelChart<'a, 'b> = ChartContext<'b, BitMapBackend<'a>, Cartesian2d<RangedCoordf64, RangedCoordf64>>;

impl ChartGenerator {
    /// @ai:intent Create a chart generator for one plot style
    /// @ai:effects pure
    pub fn new(plot_type: PlotType, panel_width: u32, panel_height: u32) -> Self {
        Self {
            plot_type,
            panel_width,
            panel_height,
        }
    }

    pub fn plot_type(&self) -> PlotType {
        self.plot_type
    }

    /// @ai:intent Draw axes and the selected plot style for one metric
    /// @ai:effects fs:write
    fn draw_panel(&self, panel: &MetricPanel, area: &Panel<'_>) -> Result<()> {
        let n = panel.series.len().max(1);
        let (y_lo, y_hi) = panel.y_range();
        let labels: Vec<String> = panel.series.iter().map(|s| s.variant.clone()).collect();

        let mut chart = ChartBuilder::on(area)
            .caption(&panel.metric, ("sans-serif", 18))
            .margin(10)
            .x_label_area_size(90)
            .y_label_area_size(60)
            .build_cartesian_2d(-0.5f64..(n as f64 - 0.5), y_lo..y_hi)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(n)
            .x_label_formatter(&|x| category_label(&labels, *x))
            .x_label_style(("sans-serif", 11).into_font().transform(FontTransform::Rotate90))
            .x_desc("Variant")
            .y_desc("Value (ms)")
            .draw()?;

        for (i, series) in panel.series.iter().enumerate() {
            if series.values.is_empty() {
                tracing::debug!("{}: no values for variant {}", panel.metric, series.variant);
            }

            let values = series.plot_values();
            let color = Palette99::pick(i).to_rgba();

            match self.plot_type {
                PlotType::Box => draw_box(&mut chart, i as f64, &values, color)?,
                PlotType::Scatter => draw_scatter(&mut chart, i as f64, &values, color)?,
                PlotType::Violin => draw_violin(&mut chart, i as f64, &values, color)?,
            }
        }

        Ok(())
    }
}

fn median_label<'a>(value: f64, prefix: &str) -> (String, TextStyle<'a>) {
    (
        format!("{}{:.2}", prefix, value),
        ("sans-serif", 12).into_font().color(&RED),
    )
}

/// @ai:intent Finite values in ascending order; NaN placeholders are dropped
/// @ai:effects pure
fn finite_sorted(values: &[f64]) -> Vec<f64> {
    let mut sorted: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    sorted.sort_by(|a, b| a.total_cmp(b));
    sorted
}

fn draw_box(chart: &mut PanelChart<'_, '_>, x: f64, values: &[f64], color: RGBAColor) -> Result<()> {
    let sorted = finite_sorted(values);
    if sorted.is_empty() {
        return Ok(());
    }

    let stats = BoxStats::from_sorted(&sorted);
    let (left, right) = (x - HALF_WIDTH, x + HALF_WIDTH);

    chart.draw_series(std::iter::once(Rectangle::new(
        [(left, stats.q1), (right, stats.q3)],
        color.mix(0.35).filled(),
    )))?;
    chart.draw_series(std::iter::once(Rectangle::new(
        [(left, stats.q1), (right, stats.q3)],
        BLACK.stroke_width(1),
    )))?;

    let cap = HALF_WIDTH / 2.0;
    chart.draw_series(
        [
            vec![(x, stats.q3), (x, stats.upper_whisker)],
            vec![(x, stats.q1), (x, stats.lower_whisker)],
            vec![(x - cap, stats.upper_whisker), (x + cap, stats.upper_whisker)],
            vec![(x - cap, stats.lower_whisker), (x + cap, stats.lower_whisker)],
        ]
        .into_iter()
        .map(|points| PathElement::new(points, BLACK.stroke_width(1))),
    )?;

    chart.draw_series(std::iter::once(PathElement::new(
        vec![(left, stats.median), (right, stats.median)],
        RED.stroke_width(2),
    )))?;

    chart.draw_series(
        stats
            .outliers
            .iter()
            .map(|v| Circle::new((x, *v), 3, BLACK.stroke_width(1))),
    )?;

    let (text, style) = median_label(stats.median, "");
    chart.draw_series(std::iter::once(Text::new(text, (x, stats.median), style)))?;

    Ok(())
}

fn draw_scatter(chart: &mut PanelChart<'_, '_>, x: f64, values: &[f64], color: RGBAColor) -> Result<()> {
    let style = color.filled();
    chart.draw_series(
        values
            .iter()
            .filter(|v| v.is_finite())
            .map(|v| Circle::new((x, *v), 4, style)),
    )?;
    Ok(())
}

fn draw_violin(chart: &mut PanelChart<'_, '_>, x: f64, values: &[f64], color: RGBAColor) -> Result<()> {
    let sorted = finite_sorted(values);
    if sorted.is_empty() {
        return Ok(());
    }

    match kernel_density(&sorted, VIOLIN_POINTS) {
        Some(curve) => {
            let peak = curve.iter().map(|(_, d)| *d).fold(0.0, f64::max);
            let scale = if peak > 0.0 { VIOLIN_HALF_WIDTH / peak } else { 0.0 };

            let mut outline: Vec<(f64, f64)> =
                curve.iter().map(|(y, d)| (x - d * scale, *y)).collect();
            outline.extend(curve.iter().rev().map(|(y, d)| (x + d * scale, *y)));

            chart.draw_series(std::iter::once(Polygon::new(
                outline.clone(),
                color.mix(0.5).filled(),
            )))?;

            outline.push(outline[0]);
            chart.draw_series(std::iter::once(PathElement::new(outline, color.stroke_width(1))))?;
        }
        None => {
            // single value or no spread
            let y = sorted[0];
            chart.draw_series(std::iter::once(PathElement::new(
                vec![(x - HALF_WIDTH, y), (x + HALF_WIDTH, y)],
                color.stroke_width(3),
            )))?;
        }
    }

    let median = median_of_sorted(&sorted);
    let (text, style) = median_label(median, "Median: ");
    chart.draw_series(std::iter::once(Text::new(text, (x, median), style)))?;

    Ok(())
}

impl ChartGeneratorTrait for ChartGenerator {
    /// @ai:intent Render every metric panel into one PNG
    /// @ai:effects fs:write
    fn render(&self, title: &str, samples: &[&Sample], output_path: &Path) -> Result<()> {
        let panels = build_panels(samples);
        let (rows, cols) = grid_shape(panels.len());

        let size = (
            self.panel_width * cols as u32,
            self.panel_height * rows as u32 + TITLE_HEIGHT,
        );
        let root = BitMapBackend::new(output_path, size).into_drawing_area();
        root.fill(&WHITE)?;

        let body = root.titled(title, ("sans-serif", 30))?;
        let areas = body.split_evenly((rows, cols));

        for (panel, area) in panels.iter().zip(areas.iter()) {
            self.draw_panel(panel, area)?;
        }

        root.present()?;
        tracing::info!("Saved plot to {}", output_path.display());
        Ok(())
    }
}
