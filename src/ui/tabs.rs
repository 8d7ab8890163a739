use eframe::egui::Ui;

use super::{charts, heatmap, table};
use crate::state::{AppState, Tab};

// ---------------------------------------------------------------------------
// Tab contents – each a fixed, ordered sequence of widgets
// ---------------------------------------------------------------------------

/// Render the widgets of the active tab.
pub fn active_tab(ui: &mut Ui, state: &AppState) {
    match state.active_tab {
        Tab::Overview => overview(ui, state),
        Tab::DeepDive => deep_dive(ui, state),
        Tab::Interactive => interactive(ui, state),
    }
}

fn section(ui: &mut Ui, title: &str, caption: &str) {
    ui.add_space(12.0);
    ui.heading(title);
    if !caption.is_empty() {
        ui.label(caption);
    }
    ui.add_space(4.0);
}

pub fn overview(ui: &mut Ui, state: &AppState) {
    let charts = &state.charts;
    let colors = &state.color_map;

    section(
        ui,
        "Attrition Breakdown",
        "Number of employees who have left versus stayed.",
    );
    charts::count_bars(ui, "attrition_counts", "Attrition", &charts.attrition_counts, colors);

    section(ui, "Department-wise Attrition", "Which departments lose the most people.");
    charts::grouped_bars(
        ui,
        "attrition_by_department",
        "Department",
        &charts.by_department,
        colors,
    );

    section(ui, "Education Field vs Attrition", "");
    charts::grouped_bars(
        ui,
        "attrition_by_education",
        "EducationField",
        &charts.by_education_field,
        colors,
    );

    section(ui, "Gender-wise Attrition", "");
    charts::grouped_bars(ui, "attrition_by_gender", "Gender", &charts.by_gender, colors);
}

pub fn deep_dive(ui: &mut Ui, state: &AppState) {
    let charts = &state.charts;
    let colors = &state.color_map;

    section(
        ui,
        "Monthly Income by Attrition",
        "Income distribution among employees who left versus stayed.",
    );
    charts::box_plot(ui, "income_box", "MonthlyIncome", &charts.income_boxes, colors);

    section(
        ui,
        "Correlation Matrix",
        "Pairwise Pearson correlation between the numeric columns.",
    );
    heatmap::correlation_heatmap(ui, &charts.correlation);

    section(
        ui,
        "Total Working Years vs Age",
        "Marker size encodes monthly income.",
    );
    charts::sized_scatter(
        ui,
        "age_vs_experience",
        "Age",
        "TotalWorkingYears",
        &charts.age_vs_experience,
        colors,
    );
}

pub fn interactive(ui: &mut Ui, state: &AppState) {
    let charts = &state.charts;
    let colors = &state.color_map;

    section(
        ui,
        "Employee Table",
        "Browse employees matching the current filter criteria.",
    );
    table::records_table(ui, &state.view());

    section(ui, "Job Role vs Attrition", "");
    charts::grouped_bars(ui, "attrition_by_job_role", "JobRole", &charts.by_job_role, colors);

    let hist = &charts.years_at_company;
    section(
        ui,
        "Years at Company Distribution",
        &format!("{} employees across {} bins.", hist.total(), hist.bin_count()),
    );
    charts::stacked_histogram(
        ui,
        "years_at_company_hist",
        "YearsAtCompany",
        hist,
        colors,
    );

    section(ui, "Attrition by Business Travel", "");
    charts::grouped_bars(
        ui,
        "attrition_by_travel",
        "BusinessTravel",
        &charts.by_business_travel,
        colors,
    );
}
