//! Descriptive aggregations behind every chart.
//!
//! Each function is pure over a [`FilteredView`] and tolerates empty views
//! and constant columns: the result is then empty, flat, or NaN, never a
//! panic.

use std::collections::{BTreeMap, BTreeSet};

use super::filter::FilteredView;
use super::model::{CategoricalField, NumericField};

// ---------------------------------------------------------------------------
// Counting
// ---------------------------------------------------------------------------

/// `(label, count)` pairs, most frequent first, ties broken by label.
pub fn value_counts(view: &FilteredView, field: CategoricalField) -> Vec<(String, usize)> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for e in view.iter() {
        *counts.entry(field.of(e)).or_default() += 1;
    }
    let mut out: Vec<(String, usize)> = counts
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();
    out.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    out
}

/// Counts of `field` split by `by`, laid out for a grouped bar chart.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroupedCounts {
    /// X-axis categories, in first-appearance order.
    pub categories: Vec<String>,
    /// Colour groups, sorted.
    pub groups: Vec<String>,
    /// `counts[group][category]`.
    pub counts: Vec<Vec<usize>>,
}

#[cfg(test)]
impl GroupedCounts {
    pub fn count(&self, group: &str, category: &str) -> usize {
        let g = self.groups.iter().position(|x| x == group);
        let c = self.categories.iter().position(|x| x == category);
        match (g, c) {
            (Some(g), Some(c)) => self.counts[g][c],
            _ => 0,
        }
    }
}

pub fn grouped_counts(
    view: &FilteredView,
    field: CategoricalField,
    by: CategoricalField,
) -> GroupedCounts {
    let mut categories: Vec<String> = Vec::new();
    let groups: Vec<String> = view
        .iter()
        .map(|e| by.of(e))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect();

    let mut counts = vec![Vec::new(); groups.len()];
    for e in view.iter() {
        let category = field.of(e);
        let c = match categories.iter().position(|x| x == category) {
            Some(c) => c,
            None => {
                categories.push(category.to_string());
                for row in counts.iter_mut() {
                    row.push(0);
                }
                categories.len() - 1
            }
        };
        // Groups were collected from this same view.
        if let Some(g) = groups.iter().position(|x| x == by.of(e)) {
            counts[g][c] += 1;
        }
    }

    GroupedCounts {
        categories,
        groups,
        counts,
    }
}

// ---------------------------------------------------------------------------
// Histogram
// ---------------------------------------------------------------------------

/// Stacked histogram of a numeric field, one count row per group.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Histogram {
    /// `bin_count + 1` ascending edges. Empty when there is no data.
    pub edges: Vec<f64>,
    pub groups: Vec<String>,
    /// `counts[group][bin]`.
    pub counts: Vec<Vec<usize>>,
}

impl Histogram {
    pub fn bin_count(&self) -> usize {
        self.edges.len().saturating_sub(1)
    }

    pub fn total(&self) -> usize {
        self.counts.iter().flatten().sum()
    }
}

/// Bin `field` into at most `max_bins` bins, split by `by`.
///
/// Integer data spanning no more than `max_bins` values gets one unit-wide
/// bin per integer. Other data gets `max_bins` equal-width bins with the
/// last bin closed on the right. A constant column gets a single bin.
pub fn histogram(
    view: &FilteredView,
    field: NumericField,
    by: CategoricalField,
    max_bins: usize,
) -> Histogram {
    let max_bins = max_bins.max(1);
    let values: Vec<(f64, &str)> = view
        .iter()
        .map(|e| (field.of(e), by.of(e)))
        .filter(|(v, _)| v.is_finite())
        .collect();
    if values.is_empty() {
        return Histogram::default();
    }

    let min = values.iter().map(|(v, _)| *v).fold(f64::INFINITY, f64::min);
    let max = values.iter().map(|(v, _)| *v).fold(f64::NEG_INFINITY, f64::max);
    let integral = values.iter().all(|(v, _)| v.fract() == 0.0);
    let span = max - min;

    let edges: Vec<f64> = if span.abs() < f64::EPSILON {
        vec![min - 0.5, min + 0.5]
    } else if integral && span + 1.0 <= max_bins as f64 {
        (0..=span as usize + 1).map(|i| min - 0.5 + i as f64).collect()
    } else {
        let width = span / max_bins as f64;
        (0..=max_bins).map(|i| min + width * i as f64).collect()
    };
    let bins = edges.len() - 1;

    let groups: Vec<String> = values
        .iter()
        .map(|(_, g)| *g)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect();
    let mut counts = vec![vec![0usize; bins]; groups.len()];

    let lo = edges[0];
    let width = (edges[bins] - lo) / bins as f64;
    for (v, g) in &values {
        let bin = (((v - lo) / width) as usize).min(bins - 1);
        if let Some(gi) = groups.iter().position(|x| x == g) {
            counts[gi][bin] += 1;
        }
    }

    Histogram { edges, groups, counts }
}

// ---------------------------------------------------------------------------
// Box summary
// ---------------------------------------------------------------------------

/// Five-number summary with Tukey whiskers.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxSummary {
    pub lower_whisker: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub upper_whisker: f64,
    pub outliers: Vec<f64>,
    pub count: usize,
}

/// Linear-interpolated quantile of sorted data.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let below = pos.floor() as usize;
    let above = pos.ceil() as usize;
    let frac = pos - below as f64;
    sorted[below] + (sorted[above] - sorted[below]) * frac
}

/// Quartiles, median and 1.5·IQR whiskers. `None` for no finite values.
pub fn box_summary(values: &[f64]) -> Option<BoxSummary> {
    let mut sorted: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if sorted.is_empty() {
        return None;
    }
    sorted.sort_by(f64::total_cmp);

    let q1 = quantile(&sorted, 0.25);
    let median = quantile(&sorted, 0.5);
    let q3 = quantile(&sorted, 0.75);
    let fence = 1.5 * (q3 - q1);
    let (lo_fence, hi_fence) = (q1 - fence, q3 + fence);

    let inside = || sorted.iter().copied().filter(|v| *v >= lo_fence && *v <= hi_fence);
    let lower_whisker = inside().fold(q1, f64::min);
    let upper_whisker = inside().fold(q3, f64::max);
    let outliers = sorted
        .iter()
        .copied()
        .filter(|v| *v < lo_fence || *v > hi_fence)
        .collect();

    Some(BoxSummary {
        lower_whisker,
        q1,
        median,
        q3,
        upper_whisker,
        outliers,
        count: sorted.len(),
    })
}

/// One box per group of `by`, groups sorted.
pub fn grouped_box_summary(
    view: &FilteredView,
    field: NumericField,
    by: CategoricalField,
) -> Vec<(String, BoxSummary)> {
    let mut groups: BTreeMap<&str, Vec<f64>> = BTreeMap::new();
    for e in view.iter() {
        groups.entry(by.of(e)).or_default().push(field.of(e));
    }
    groups
        .into_iter()
        .filter_map(|(g, values)| box_summary(&values).map(|b| (g.to_string(), b)))
        .collect()
}

// ---------------------------------------------------------------------------
// Correlation
// ---------------------------------------------------------------------------

/// Square Pearson correlation matrix over the numeric columns.
#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationMatrix {
    pub columns: Vec<String>,
    /// Row-major `columns.len()²` values. NaN where undefined.
    pub values: Vec<f64>,
}

impl CorrelationMatrix {
    pub fn size(&self) -> usize {
        self.columns.len()
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.values[row * self.size() + col]
    }
}

/// Pearson correlation over pairwise-complete observations.
fn pearson(pairs: &[(f64, f64)]) -> f64 {
    let n = pairs.len();
    if n < 2 {
        return f64::NAN;
    }
    let mean_x = pairs.iter().map(|p| p.0).sum::<f64>() / n as f64;
    let mean_y = pairs.iter().map(|p| p.1).sum::<f64>() / n as f64;
    let (mut sxy, mut sxx, mut syy) = (0.0, 0.0, 0.0);
    for (x, y) in pairs {
        let dx = x - mean_x;
        let dy = y - mean_y;
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }
    if sxx <= 0.0 || syy <= 0.0 {
        return f64::NAN;
    }
    (sxy / (sxx.sqrt() * syy.sqrt())).clamp(-1.0, 1.0)
}

/// Correlate every numeric column of the dataset over the filtered rows.
///
/// The result is symmetric. The diagonal is exactly 1 for any column with
/// non-zero variance and NaN otherwise.
pub fn correlation_matrix(view: &FilteredView) -> CorrelationMatrix {
    let cols = view.dataset.numeric_columns();
    let n = cols.len();
    let series: Vec<Vec<Option<f64>>> = cols
        .iter()
        .map(|&c| view.iter().map(|e| e.cells[c].as_f64()).collect())
        .collect();

    let mut values = vec![f64::NAN; n * n];
    for i in 0..n {
        for j in i..n {
            let pairs: Vec<(f64, f64)> = series[i]
                .iter()
                .zip(&series[j])
                .filter_map(|(a, b)| Some(((*a)?, (*b)?)))
                .collect();
            let r = pearson(&pairs);
            let r = if i == j && !r.is_nan() { 1.0 } else { r };
            values[i * n + j] = r;
            values[j * n + i] = r;
        }
    }

    CorrelationMatrix {
        columns: cols.iter().map(|&c| view.dataset.column_names[c].clone()).collect(),
        values,
    }
}

// ---------------------------------------------------------------------------
// Scatter
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct ScatterPoint {
    pub x: f64,
    pub y: f64,
    pub size: f64,
    pub group: String,
}

pub fn scatter_points(
    view: &FilteredView,
    x: NumericField,
    y: NumericField,
    size: NumericField,
    color: CategoricalField,
) -> Vec<ScatterPoint> {
    view.iter()
        .map(|e| ScatterPoint {
            x: x.of(e),
            y: y.of(e),
            size: size.of(e),
            group: color.of(e).to_string(),
        })
        .collect()
}
