use eframe::egui;

use crate::state::AppState;
use crate::ui::{panels, tabs};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct RustyAttritionApp {
    pub state: AppState,
}

impl RustyAttritionApp {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

impl eframe::App for RustyAttritionApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        render(ctx, &mut self.state);
    }
}

/// Lay out one frame. Filtering has already happened in the control
/// handlers, so this only draws from the current chart snapshot.
pub fn render(ctx: &egui::Context, state: &mut AppState) {
    // ---- Top panel: menu bar ----
    egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
        panels::top_bar(ui, state);
    });

    // ---- Bottom panel: footer ----
    egui::TopBottomPanel::bottom("footer").show(ctx, |ui| {
        panels::footer(ui);
    });

    // ---- Left side panel: filters ----
    egui::SidePanel::left("filter_panel")
        .default_width(240.0)
        .resizable(true)
        .show(ctx, |ui| {
            panels::side_panel(ui, state);
        });

    // ---- Central panel: tabs ----
    egui::CentralPanel::default().show(ctx, |ui| {
        panels::header(ui);
        ui.separator();
        panels::tab_bar(ui, state);
        ui.separator();
        egui::ScrollArea::vertical()
            .id_salt("tab_content")
            .auto_shrink([false, false])
            .show(ui, |ui| {
                tabs::active_tab(ui, state);
            });
    });
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::config::DashboardConfig;
    use crate::data::loader::DatasetCache;
    use crate::data::model::fixtures::{dataset, row};
    use crate::data::model::EmployeeDataset;
    use crate::state::Tab;

    fn run_all_tabs(state: &mut AppState) {
        let ctx = egui::Context::default();
        for tab in Tab::ALL {
            state.active_tab = tab;
            // Two passes so layouts that size themselves on the first frame
            // get drawn with real sizes on the second.
            for _ in 0..2 {
                let _ = ctx.run(egui::RawInput::default(), |ctx| render(ctx, state));
            }
        }
    }

    fn state_for(ds: EmployeeDataset) -> AppState {
        AppState::with_dataset(DatasetCache::default(), Arc::new(ds), &DashboardConfig::default())
    }

    #[test]
    fn test_renders_with_data() {
        let mut state = state_for(dataset(vec![
            row(26, "Sales", "No", 2000.0, 3),
            row(33, "Research & Development", "Yes", 2500.0, 9),
            row(44, "Sales", "Yes", 6000.0, 20),
            row(40, "Human Resources", "No", 15000.0, 16),
        ]));
        assert_eq!(state.visible_indices.len(), 4);
        run_all_tabs(&mut state);
    }

    #[test]
    fn test_renders_with_zero_filtered_records() {
        let mut state = state_for(dataset(vec![row(30, "Sales", "No", 2000.0, 3)]));
        state.select_no_departments();
        assert!(state.visible_indices.is_empty());
        run_all_tabs(&mut state);
    }

    #[test]
    fn test_renders_zero_variance_columns() {
        let mut state = state_for(dataset(vec![
            row(30, "Sales", "No", 2000.0, 4),
            row(30, "Sales", "No", 2000.0, 4),
        ]));
        assert!(state.charts.correlation.values.iter().all(|v| v.is_nan()));
        run_all_tabs(&mut state);
    }

    #[test]
    fn test_renders_empty_dataset() {
        let mut state = state_for(dataset(Vec::new()));
        run_all_tabs(&mut state);
    }
}
