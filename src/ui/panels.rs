use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::state::{AppState, Tab};

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    let Some((min_age, max_age)) = state.dataset.age_bounds else {
        ui.label("The dataset has no employees.");
        return;
    };

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Age range ----
            ui.strong("Age range");
            let (mut lo, mut hi) = state.filters.age_range;
            let lo_changed = ui
                .add(egui::Slider::new(&mut lo, min_age..=max_age).text("from"))
                .changed();
            let hi_changed = ui
                .add(egui::Slider::new(&mut hi, min_age..=max_age).text("to"))
                .changed();
            if lo_changed || hi_changed {
                // Dragging one handle past the other pushes it along.
                if lo > hi {
                    if lo_changed {
                        hi = lo;
                    } else {
                        lo = hi;
                    }
                }
                state.set_age_range(lo, hi);
            }
            ui.separator();

            // ---- Departments ----
            let n_selected = state.filters.departments.len();
            let n_total = state.dataset.departments.len();
            ui.strong(format!("Departments  ({n_selected}/{n_total})"));
            ui.horizontal(|ui: &mut Ui| {
                if ui.small_button("All").clicked() {
                    state.select_all_departments();
                }
                if ui.small_button("None").clicked() {
                    state.select_no_departments();
                }
            });

            let departments: Vec<String> = state.dataset.departments.iter().cloned().collect();
            for dept in &departments {
                let mut checked = state.filters.departments.contains(dept);
                if ui.checkbox(&mut checked, dept.as_str()).changed() {
                    state.toggle_department(dept);
                }
            }
            ui.separator();

            // ---- Colour legend ----
            ui.strong(&state.color_map.column);
            for (label, color) in state.color_map.legend_entries() {
                ui.label(RichText::new(format!("■ {label}")).color(color));
            }
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        ui.label(format!(
            "{} employees loaded, {} visible",
            state.dataset.len(),
            state.visible_indices.len()
        ));

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

/// Tab strip above the central content.
pub fn tab_bar(ui: &mut Ui, state: &mut AppState) {
    ui.horizontal(|ui: &mut Ui| {
        for tab in Tab::ALL {
            ui.selectable_value(&mut state.active_tab, tab, tab.title());
        }
    });
}

/// Page heading and intro text.
pub fn header(ui: &mut Ui) {
    ui.heading(RichText::new("Employee Attrition Dashboard").size(26.0).strong());
    ui.label(
        "Insights into employee attrition trends. Use the filters on the left \
         and the tabs below to explore what drives workforce retention.",
    );
}

pub fn footer(ui: &mut Ui) {
    ui.horizontal_centered(|ui: &mut Ui| {
        ui.weak("Created for HR Directors and Stakeholders");
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open employee data")
        .add_filter("Supported files", &["csv", "tsv", "json", "parquet", "pq"])
        .add_filter("CSV / TSV", &["csv", "tsv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.open_path(&path);
    }
}
