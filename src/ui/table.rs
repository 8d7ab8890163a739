use eframe::egui::{ScrollArea, TextStyle, Ui};
use egui_extras::{Column, TableBuilder};

use crate::data::filter::FilteredView;

const TABLE_HEIGHT: f32 = 360.0;

/// Scrollable browse of the filtered employees, all columns in file order.
pub fn records_table(ui: &mut Ui, view: &FilteredView) {
    let dataset = view.dataset;
    let row_height = TextStyle::Body
        .resolve(ui.style())
        .size
        .max(ui.spacing().interact_size.y);

    ui.label(format!("{} rows × {} columns", view.len(), dataset.column_names.len()));

    ScrollArea::horizontal()
        .id_salt("records_table_scroll")
        .show(ui, |ui: &mut Ui| {
            TableBuilder::new(ui)
                .striped(true)
                .resizable(true)
                .max_scroll_height(TABLE_HEIGHT)
                .column(Column::auto().at_least(40.0))
                .columns(Column::auto().at_least(60.0), dataset.column_names.len())
                .header(row_height + 4.0, |mut header| {
                    header.col(|ui| {
                        ui.strong("#");
                    });
                    for name in &dataset.column_names {
                        header.col(|ui| {
                            ui.strong(name);
                        });
                    }
                })
                .body(|body| {
                    body.rows(row_height, view.len(), |mut row| {
                        let idx = view.indices[row.index()];
                        row.col(|ui| {
                            ui.label(idx.to_string());
                        });
                        for cell in &dataset.records[idx].cells {
                            row.col(|ui| {
                                ui.label(cell.to_string());
                            });
                        }
                    });
                });
        });
}
