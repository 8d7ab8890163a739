use std::ops::RangeInclusive;

use eframe::egui::{Stroke, Ui};
use egui_plot::{
    Bar, BarChart, BoxElem, BoxPlot, BoxSpread, GridMark, Legend, Plot, PlotPoints, Points,
};

use crate::color::ColorMap;
use crate::data::stats::{BoxSummary, GroupedCounts, Histogram, ScatterPoint};

const CHART_HEIGHT: f32 = 300.0;

// ---------------------------------------------------------------------------
// Shared plot setup
// ---------------------------------------------------------------------------

/// Label integer x positions with category names, leave the rest blank.
fn category_formatter(labels: Vec<String>) -> impl Fn(GridMark, &RangeInclusive<f64>) -> String {
    move |mark, _range| {
        let idx = mark.value.round();
        if (mark.value - idx).abs() > 1e-6 || idx < 0.0 {
            return String::new();
        }
        labels.get(idx as usize).cloned().unwrap_or_default()
    }
}

fn styled(plot: Plot) -> Plot {
    plot.height(CHART_HEIGHT)
        .legend(Legend::default())
        .allow_scroll(false)
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_zoom(true)
}

// ---------------------------------------------------------------------------
// Bar charts
// ---------------------------------------------------------------------------

/// One bar per label, coloured by the label itself.
pub fn count_bars(
    ui: &mut Ui,
    id: &str,
    x_label: &str,
    counts: &[(String, usize)],
    colors: &ColorMap,
) {
    let labels: Vec<String> = counts.iter().map(|(l, _)| l.clone()).collect();
    let charts: Vec<BarChart> = counts
        .iter()
        .enumerate()
        .map(|(i, (label, n))| {
            let color = colors.color_for(label);
            BarChart::new(vec![Bar::new(i as f64, *n as f64).name(label).width(0.6).fill(color)])
                .name(label)
                .color(color)
        })
        .collect();

    styled(Plot::new(id))
        .x_axis_label(x_label)
        .y_axis_label("count")
        .x_axis_formatter(category_formatter(labels))
        .show(ui, |plot_ui| {
            for chart in charts {
                plot_ui.bar_chart(chart);
            }
        });
}

/// Side-by-side bars per category, one series per group.
pub fn grouped_bars(ui: &mut Ui, id: &str, x_label: &str, data: &GroupedCounts, colors: &ColorMap) {
    let n_groups = data.groups.len().max(1) as f64;
    let width = 0.8 / n_groups;

    let charts: Vec<BarChart> = data
        .groups
        .iter()
        .zip(&data.counts)
        .enumerate()
        .map(|(gi, (group, counts))| {
            let offset = (gi as f64 - (n_groups - 1.0) / 2.0) * width;
            let color = colors.color_for(group);
            let bars = counts
                .iter()
                .enumerate()
                .map(|(ci, n)| {
                    Bar::new(ci as f64 + offset, *n as f64)
                        .name(format!("{} / {group}", data.categories[ci]))
                        .width(width * 0.95)
                        .fill(color)
                })
                .collect();
            BarChart::new(bars).name(group).color(color)
        })
        .collect();

    styled(Plot::new(id))
        .x_axis_label(x_label)
        .y_axis_label("count")
        .x_axis_formatter(category_formatter(data.categories.clone()))
        .show(ui, |plot_ui| {
            for chart in charts {
                plot_ui.bar_chart(chart);
            }
        });
}

/// Histogram with one stacked series per group.
pub fn stacked_histogram(
    ui: &mut Ui,
    id: &str,
    x_label: &str,
    hist: &Histogram,
    colors: &ColorMap,
) {
    let bins = hist.bin_count();
    let mut charts: Vec<BarChart> = Vec::with_capacity(hist.groups.len());

    for (group, counts) in hist.groups.iter().zip(&hist.counts) {
        let color = colors.color_for(group);
        let bars = (0..bins)
            .map(|b| {
                let (lo, hi) = (hist.edges[b], hist.edges[b + 1]);
                Bar::new((lo + hi) / 2.0, counts[b] as f64)
                    .name(format!("{lo:.1}–{hi:.1} / {group}"))
                    .width(hi - lo)
                    .fill(color)
            })
            .collect();
        let chart = {
            let below: Vec<&BarChart> = charts.iter().collect();
            BarChart::new(bars).name(group).color(color).stack_on(&below)
        };
        charts.push(chart);
    }

    styled(Plot::new(id))
        .x_axis_label(x_label)
        .y_axis_label("count")
        .show(ui, |plot_ui| {
            for chart in charts {
                plot_ui.bar_chart(chart);
            }
        });
}

// ---------------------------------------------------------------------------
// Box plot
// ---------------------------------------------------------------------------

/// One box per group with its outliers drawn as points.
pub fn box_plot(
    ui: &mut Ui,
    id: &str,
    y_label: &str,
    boxes: &[(String, BoxSummary)],
    colors: &ColorMap,
) {
    let labels: Vec<String> = boxes.iter().map(|(g, _)| g.clone()).collect();

    styled(Plot::new(id))
        .y_axis_label(y_label)
        .x_axis_formatter(category_formatter(labels))
        .show(ui, |plot_ui| {
            for (i, (group, summary)) in boxes.iter().enumerate() {
                let color = colors.color_for(group);
                let x = i as f64;
                let spread = BoxSpread::new(
                    summary.lower_whisker,
                    summary.q1,
                    summary.median,
                    summary.q3,
                    summary.upper_whisker,
                );
                let elem = BoxElem::new(x, spread)
                    .name(group)
                    .box_width(0.5)
                    .fill(color.gamma_multiply(0.4))
                    .stroke(Stroke::new(1.5, color));
                plot_ui.box_plot(BoxPlot::new(vec![elem]).name(group).color(color));

                if !summary.outliers.is_empty() {
                    let points: PlotPoints = summary.outliers.iter().map(|&y| [x, y]).collect();
                    plot_ui.points(Points::new(points).name(group).color(color).radius(2.5));
                }
            }
        });
}

// ---------------------------------------------------------------------------
// Scatter
// ---------------------------------------------------------------------------

/// Distinct marker radii used to encode the size variable.
const SIZE_CLASSES: usize = 6;
const MIN_RADIUS: f32 = 1.5;
const MAX_RADIUS: f32 = 9.0;

/// Marker area proportional to `size / max_size`, bucketed into
/// [`SIZE_CLASSES`] radii.
fn size_class(size: f64, max_size: f64) -> usize {
    if max_size <= 0.0 || !size.is_finite() || size <= 0.0 {
        return 0;
    }
    let r = (size / max_size).sqrt().clamp(0.0, 1.0);
    ((r * (SIZE_CLASSES - 1) as f64).round() as usize).min(SIZE_CLASSES - 1)
}

fn class_radius(class: usize) -> f32 {
    MIN_RADIUS + (MAX_RADIUS - MIN_RADIUS) * class as f32 / (SIZE_CLASSES - 1) as f32
}

/// Scatter coloured by group, marker size encoding `point.size`.
pub fn sized_scatter(
    ui: &mut Ui,
    id: &str,
    x_label: &str,
    y_label: &str,
    points: &[ScatterPoint],
    colors: &ColorMap,
) {
    let max_size = points.iter().map(|p| p.size).fold(0.0, f64::max);

    styled(Plot::new(id))
        .x_axis_label(x_label)
        .y_axis_label(y_label)
        .show(ui, |plot_ui| {
            for (group, color) in colors.legend_entries() {
                let mut classes: Vec<Vec<[f64; 2]>> = vec![Vec::new(); SIZE_CLASSES];
                for p in points.iter().filter(|p| p.group == group) {
                    classes[size_class(p.size, max_size)].push([p.x, p.y]);
                }
                for (class, pts) in classes.into_iter().enumerate() {
                    if pts.is_empty() {
                        continue;
                    }
                    plot_ui.points(
                        Points::new(PlotPoints::from(pts))
                            .name(&group)
                            .color(color.gamma_multiply(0.7))
                            .radius(class_radius(class)),
                    );
                }
            }
        });
}
