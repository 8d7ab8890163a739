use std::collections::BTreeSet;

use super::model::{Employee, EmployeeDataset};

// ---------------------------------------------------------------------------
// Filter predicate: age window and department selection
// ---------------------------------------------------------------------------

/// The sidebar selection. Both predicates are AND-combined.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterState {
    /// Inclusive `(lo, hi)` age window. `lo > hi` matches nothing.
    pub age_range: (i64, i64),
    /// Departments to include. Empty means nothing is selected.
    pub departments: BTreeSet<String>,
}

impl FilterState {
    /// Whole observed age span and every department: filtering is a no-op.
    pub fn full(dataset: &EmployeeDataset) -> Self {
        Self {
            age_range: dataset.age_bounds.unwrap_or((0, 0)),
            departments: dataset.departments.clone(),
        }
    }

    pub fn matches(&self, employee: &Employee) -> bool {
        let (lo, hi) = self.age_range;
        lo <= employee.age
            && employee.age <= hi
            && self.departments.contains(&employee.department)
    }

    /// True when every employee matching `self` also matches `wider`, so a
    /// selection made with `wider` can be [`refine`]d instead of rebuilt.
    pub fn narrows(&self, wider: &FilterState) -> bool {
        self.age_range.0 >= wider.age_range.0
            && self.age_range.1 <= wider.age_range.1
            && self.departments.is_subset(&wider.departments)
    }
}

/// Initialise a [`FilterState`] for a freshly loaded dataset.
///
/// All departments are selected. The age window starts at `default_window`
/// clamped into the observed bounds, or the full bounds when the window
/// misses the data entirely.
pub fn init_filter_state(dataset: &EmployeeDataset, default_window: (i64, i64)) -> FilterState {
    let mut state = FilterState::full(dataset);
    if let Some((min, max)) = dataset.age_bounds {
        let lo = default_window.0.clamp(min, max);
        let hi = default_window.1.clamp(min, max);
        let misses = default_window.1 < min || default_window.0 > max;
        if lo <= hi && !misses {
            state.age_range = (lo, hi);
        }
    }
    state
}

/// Return indices of employees that pass the filter, ascending.
pub fn filtered_indices(dataset: &EmployeeDataset, filters: &FilterState) -> Vec<usize> {
    dataset
        .records
        .iter()
        .enumerate()
        .filter(|(_, e)| filters.matches(e))
        .map(|(i, _)| i)
        .collect()
}

/// Narrow an existing selection of indices with another filter.
pub fn refine(dataset: &EmployeeDataset, indices: &[usize], filters: &FilterState) -> Vec<usize> {
    indices
        .iter()
        .copied()
        .filter(|&i| dataset.records.get(i).is_some_and(|e| filters.matches(e)))
        .collect()
}

// ---------------------------------------------------------------------------
// Filtered view
// ---------------------------------------------------------------------------

/// Borrowed subsequence of a dataset selected by index.
#[derive(Debug, Clone, Copy)]
pub struct FilteredView<'a> {
    pub dataset: &'a EmployeeDataset,
    pub indices: &'a [usize],
}

impl<'a> FilteredView<'a> {
    pub fn new(dataset: &'a EmployeeDataset, indices: &'a [usize]) -> Self {
        Self { dataset, indices }
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a Employee> + 'a {
        let records: &'a [Employee] = &self.dataset.records;
        let indices = self.indices;
        indices.iter().map(move |&i| &records[i])
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::fixtures::{dataset, row, three_records};

    fn depts(names: &[&str]) -> BTreeSet<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn fixture() -> EmployeeDataset {
        dataset(vec![
            row(22, "Sales", "No", 2000.0, 1),
            row(29, "Research & Development", "Yes", 2500.0, 5),
            row(35, "Human Resources", "No", 4000.0, 10),
            row(41, "Sales", "Yes", 6000.0, 18),
            row(45, "Research & Development", "No", 7000.0, 20),
            row(52, "Sales", "No", 12000.0, 30),
            row(58, "Human Resources", "No", 15000.0, 36),
        ])
    }

    #[test]
    fn test_narrows() {
        let wide = FilterState {
            age_range: (20, 50),
            departments: depts(&["Sales", "Human Resources"]),
        };
        let narrow = FilterState {
            age_range: (25, 45),
            departments: depts(&["Sales"]),
        };
        assert!(narrow.narrows(&wide));
        assert!(wide.narrows(&wide));
        assert!(!wide.narrows(&narrow));

        let other_dept = FilterState {
            age_range: (25, 45),
            departments: depts(&["Research & Development"]),
        };
        assert!(!other_dept.narrows(&wide));

        let ds = fixture();
        let base = filtered_indices(&ds, &wide);
        assert_eq!(refine(&ds, &base, &narrow), filtered_indices(&ds, &narrow));
    }

    #[test]
    fn test_three_record_scenario() {
        let ds = three_records();
        let filter = FilterState {
            age_range: (20, 45),
            departments: depts(&["Sales"]),
        };
        let result = filtered_indices(&ds, &filter);
        assert_eq!(result, vec![0]);
        assert_eq!(ds.records[0].age, 25);
        assert_eq!(ds.records[0].department, "Sales");
    }

    #[test]
    fn test_exact_membership() {
        let ds = fixture();
        let filter = FilterState {
            age_range: (29, 52),
            departments: depts(&["Sales", "Research & Development"]),
        };
        let result = filtered_indices(&ds, &filter);
        assert_eq!(result, vec![1, 3, 4, 5]);
        for (i, e) in ds.records.iter().enumerate() {
            let expected = (29..=52).contains(&e.age)
                && (e.department == "Sales" || e.department == "Research & Development");
            assert_eq!(result.contains(&i), expected, "record {i}");
        }
    }

    #[test]
    fn test_bounds_are_inclusive() {
        let ds = fixture();
        let filter = FilterState {
            age_range: (35, 35),
            departments: ds.departments.clone(),
        };
        assert_eq!(filtered_indices(&ds, &filter), vec![2]);
    }

    #[test]
    fn test_filtering_is_idempotent() {
        let ds = fixture();
        let filter = FilterState {
            age_range: (25, 50),
            departments: depts(&["Sales", "Human Resources"]),
        };
        let once = filtered_indices(&ds, &filter);
        let twice = refine(&ds, &once, &filter);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_full_bounds_is_noop() {
        let ds = fixture();
        let result = filtered_indices(&ds, &FilterState::full(&ds));
        assert_eq!(result, (0..ds.len()).collect::<Vec<_>>());
    }

    #[test]
    fn test_empty_department_selection() {
        let ds = fixture();
        let filter = FilterState {
            age_range: (0, 200),
            departments: BTreeSet::new(),
        };
        assert!(filtered_indices(&ds, &filter).is_empty());
    }

    #[test]
    fn test_inverted_range_matches_nothing() {
        let ds = fixture();
        let filter = FilterState {
            age_range: (50, 30),
            departments: ds.departments.clone(),
        };
        assert!(filtered_indices(&ds, &filter).is_empty());
    }

    #[test]
    fn test_init_clamps_default_window() {
        let ds = fixture();
        let state = init_filter_state(&ds, (25, 45));
        assert_eq!(state.age_range, (25, 45));
        assert_eq!(state.departments, ds.departments);

        let wide = init_filter_state(&ds, (10, 90));
        assert_eq!(wide.age_range, (22, 58));
    }

    #[test]
    fn test_init_falls_back_to_full_range() {
        let ds = fixture();
        let state = init_filter_state(&ds, (70, 80));
        assert_eq!(state.age_range, (22, 58));
    }

    #[test]
    fn test_view_iterates_selected_records() {
        let ds = fixture();
        let indices = vec![0, 6];
        let view = FilteredView::new(&ds, &indices);
        let ages: Vec<i64> = view.iter().map(|e| e.age).collect();
        assert_eq!(ages, vec![22, 58]);
        assert_eq!(view.len(), 2);
    }
}
