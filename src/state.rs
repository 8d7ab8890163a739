use std::path::Path;
use std::sync::Arc;

use crate::color::ColorMap;
use crate::config::DashboardConfig;
use crate::data::filter::{FilterState, FilteredView, filtered_indices, init_filter_state, refine};
use crate::data::loader::{DatasetCache, LoadError};
use crate::data::model::{CategoricalField, EmployeeDataset, NumericField};
use crate::data::stats::{
    self, BoxSummary, CorrelationMatrix, GroupedCounts, Histogram, ScatterPoint,
};

// ---------------------------------------------------------------------------
// Tabs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Overview,
    DeepDive,
    Interactive,
}

impl Tab {
    pub const ALL: [Tab; 3] = [Tab::Overview, Tab::DeepDive, Tab::Interactive];

    pub fn title(self) -> &'static str {
        match self {
            Tab::Overview => "Overview",
            Tab::DeepDive => "Deep Dive",
            Tab::Interactive => "Interactive Filters",
        }
    }
}

// ---------------------------------------------------------------------------
// Chart data snapshot
// ---------------------------------------------------------------------------

/// Every aggregation the tabs draw, computed once per filter change.
#[derive(Debug, Clone)]
pub struct ChartData {
    pub attrition_counts: Vec<(String, usize)>,
    pub by_department: GroupedCounts,
    pub by_education_field: GroupedCounts,
    pub by_gender: GroupedCounts,
    pub income_boxes: Vec<(String, BoxSummary)>,
    pub correlation: CorrelationMatrix,
    pub age_vs_experience: Vec<ScatterPoint>,
    pub by_job_role: GroupedCounts,
    pub years_at_company: Histogram,
    pub by_business_travel: GroupedCounts,
}

impl ChartData {
    pub fn compute(view: &FilteredView, histogram_bins: usize) -> Self {
        use CategoricalField::*;
        Self {
            attrition_counts: stats::value_counts(view, Attrition),
            by_department: stats::grouped_counts(view, Department, Attrition),
            by_education_field: stats::grouped_counts(view, EducationField, Attrition),
            by_gender: stats::grouped_counts(view, Gender, Attrition),
            income_boxes: stats::grouped_box_summary(view, NumericField::MonthlyIncome, Attrition),
            correlation: stats::correlation_matrix(view),
            age_vs_experience: stats::scatter_points(
                view,
                NumericField::Age,
                NumericField::TotalWorkingYears,
                NumericField::MonthlyIncome,
                Attrition,
            ),
            by_job_role: stats::grouped_counts(view, JobRole, Attrition),
            years_at_company: stats::histogram(
                view,
                NumericField::YearsAtCompany,
                Attrition,
                histogram_bins,
            ),
            by_business_travel: stats::grouped_counts(view, BusinessTravel, Attrition),
        }
    }
}

fn attrition_colors(dataset: &EmployeeDataset) -> ColorMap {
    ColorMap::new(CategoricalField::Attrition.column_name(), &dataset.attrition_labels)
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Active dataset, shared with the cache.
    pub dataset: Arc<EmployeeDataset>,

    /// Memoized loads, keyed by path.
    pub cache: DatasetCache,

    /// Current sidebar selection.
    pub filters: FilterState,

    /// Indices of employees passing the current filters (cached).
    pub visible_indices: Vec<usize>,

    /// The selection `visible_indices` was computed with.
    applied_filters: FilterState,

    /// Aggregations over `visible_indices`.
    pub charts: ChartData,

    /// Attrition label → colour, stable across filter changes.
    pub color_map: ColorMap,

    pub active_tab: Tab,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,

    pub default_age_range: (i64, i64),
    pub histogram_bins: usize,
}

impl AppState {
    /// Load the configured dataset. Fails before any UI exists.
    pub fn new(config: &DashboardConfig) -> Result<Self, LoadError> {
        let mut cache = DatasetCache::default();
        let dataset = cache.get_or_load(&config.data_path)?;
        Ok(Self::with_dataset(cache, dataset, config))
    }

    /// Build state around an already-loaded dataset.
    pub fn with_dataset(
        cache: DatasetCache,
        dataset: Arc<EmployeeDataset>,
        config: &DashboardConfig,
    ) -> Self {
        let filters = init_filter_state(&dataset, config.default_age_range);
        let visible_indices = filtered_indices(&dataset, &filters);
        let charts = ChartData::compute(
            &FilteredView::new(&dataset, &visible_indices),
            config.histogram_bins,
        );
        let color_map = attrition_colors(&dataset);

        Self {
            dataset,
            cache,
            applied_filters: filters.clone(),
            filters,
            visible_indices,
            charts,
            color_map,
            active_tab: Tab::default(),
            status_message: None,
            default_age_range: config.default_age_range,
            histogram_bins: config.histogram_bins,
        }
    }

    /// Swap in a newly loaded dataset, reinitialising filters and colours.
    pub fn set_dataset(&mut self, dataset: Arc<EmployeeDataset>) {
        self.filters = init_filter_state(&dataset, self.default_age_range);
        self.color_map = attrition_colors(&dataset);
        self.dataset = dataset;
        self.status_message = None;
        self.visible_indices = filtered_indices(&self.dataset, &self.filters);
        self.recompute();
    }

    /// Load `path` through the cache and make it the active dataset.
    /// On failure the current dataset stays and the error is shown.
    pub fn open_path(&mut self, path: &Path) {
        match self.cache.get_or_load(path) {
            Ok(dataset) => {
                log::debug!("{} dataset(s) cached", self.cache.len());
                self.set_dataset(dataset);
            }
            Err(e) => {
                log::error!("Failed to load {}: {e}", path.display());
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }

    /// Current filtered view.
    pub fn view(&self) -> FilteredView<'_> {
        FilteredView::new(&self.dataset, &self.visible_indices)
    }

    /// Recompute `visible_indices` and chart data after a filter change.
    /// A narrower selection only re-checks the currently visible rows.
    pub fn refilter(&mut self) {
        self.visible_indices = if self.filters.narrows(&self.applied_filters) {
            refine(&self.dataset, &self.visible_indices, &self.filters)
        } else {
            filtered_indices(&self.dataset, &self.filters)
        };
        self.recompute();
    }

    fn recompute(&mut self) {
        self.applied_filters = self.filters.clone();
        self.charts = ChartData::compute(&self.view(), self.histogram_bins);
        log::debug!(
            "Filter age={:?} departments={:?} → {} of {} employees",
            self.filters.age_range,
            self.filters.departments,
            self.visible_indices.len(),
            self.dataset.len()
        );
    }

    /// Set the age window, keeping `lo <= hi` by moving the other end.
    pub fn set_age_range(&mut self, lo: i64, hi: i64) {
        let range = if lo <= hi { (lo, hi) } else { (lo, lo) };
        if range != self.filters.age_range {
            self.filters.age_range = range;
            self.refilter();
        }
    }

    /// Toggle a single department in the selection.
    pub fn toggle_department(&mut self, department: &str) {
        if !self.filters.departments.remove(department) {
            self.filters.departments.insert(department.to_string());
        }
        self.refilter();
    }

    /// Select every observed department.
    pub fn select_all_departments(&mut self) {
        self.filters.departments = self.dataset.departments.clone();
        self.refilter();
    }

    /// Deselect every department.
    pub fn select_no_departments(&mut self) {
        self.filters.departments.clear();
        self.refilter();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::fixtures::{dataset, row};

    fn state() -> AppState {
        let ds = dataset(vec![
            row(22, "Sales", "No", 2000.0, 1),
            row(30, "Research & Development", "Yes", 2500.0, 5),
            row(41, "Sales", "Yes", 6000.0, 18),
            row(58, "Human Resources", "No", 15000.0, 36),
        ]);
        AppState::with_dataset(DatasetCache::default(), Arc::new(ds), &DashboardConfig::default())
    }

    #[test]
    fn test_initial_selection_uses_default_window() {
        let s = state();
        assert_eq!(s.filters.age_range, (25, 45));
        assert_eq!(s.visible_indices, vec![1, 2]);
        assert_eq!(s.charts.attrition_counts, vec![("Yes".to_string(), 2)]);
    }

    #[test]
    fn test_controls_refilter() {
        let mut s = state();
        s.set_age_range(20, 60);
        assert_eq!(s.visible_indices.len(), 4);

        s.toggle_department("Sales");
        assert_eq!(s.visible_indices, vec![1, 3]);
        assert_eq!(s.charts.by_department.categories.len(), 2);

        s.toggle_department("Sales");
        assert_eq!(s.visible_indices.len(), 4);

        s.select_no_departments();
        assert!(s.visible_indices.is_empty());
        assert!(s.charts.attrition_counts.is_empty());

        s.select_all_departments();
        assert_eq!(s.visible_indices.len(), 4);
    }

    #[test]
    fn test_narrowing_matches_full_refilter() {
        let mut s = state();
        s.set_age_range(20, 60);
        s.set_age_range(25, 60);
        s.toggle_department("Human Resources");
        assert_eq!(s.visible_indices, filtered_indices(&s.dataset, &s.filters));
        assert_eq!(s.visible_indices, vec![1, 2]);

        // Widening again must bring back rows the narrower pass dropped.
        s.set_age_range(20, 60);
        s.toggle_department("Human Resources");
        assert_eq!(s.visible_indices, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_age_range_kept_ordered() {
        let mut s = state();
        s.set_age_range(50, 40);
        assert_eq!(s.filters.age_range, (50, 50));
        assert!(s.visible_indices.is_empty());
    }

    #[test]
    fn test_failed_open_keeps_dataset() {
        let mut s = state();
        s.open_path(Path::new("definitely/not/here.csv"));
        assert_eq!(s.dataset.len(), 4);
        assert!(s.status_message.as_deref().is_some_and(|m| m.starts_with("Error")));
    }
}
