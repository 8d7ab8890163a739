use std::f32::consts::FRAC_PI_2;

use eframe::egui::{self, Align2, Color32, FontId, Pos2, Rect, Sense, Shape, Ui, Vec2};
use eframe::egui::epaint::TextShape;

use crate::color::diverging_color;
use crate::data::stats::CorrelationMatrix;

const LABEL_MARGIN: f32 = 150.0;
const SCALE_WIDTH: f32 = 60.0;
const MAX_CELL: f32 = 28.0;

// ---------------------------------------------------------------------------
// Correlation heatmap
// ---------------------------------------------------------------------------

/// Paint the correlation matrix as a grid of coloured cells with row
/// labels on the left, rotated column labels below and a colour scale on
/// the right. Hovering a cell shows the pair and its coefficient.
pub fn correlation_heatmap(ui: &mut Ui, corr: &CorrelationMatrix) {
    let n = corr.size();
    if n == 0 {
        ui.label("No numeric columns to correlate.");
        return;
    }

    let grid_width = (ui.available_width() - LABEL_MARGIN - SCALE_WIDTH).max(n as f32 * 6.0);
    let cell = (grid_width / n as f32).min(MAX_CELL);
    let grid = Vec2::splat(cell * n as f32);
    let size = Vec2::new(LABEL_MARGIN + grid.x + SCALE_WIDTH, grid.y + LABEL_MARGIN);

    let (response, painter) = ui.allocate_painter(size, Sense::hover());
    let origin = response.rect.min + Vec2::new(LABEL_MARGIN, 0.0);
    let font = FontId::proportional((cell * 0.45).clamp(8.0, 12.0));
    let text_color = ui.visuals().text_color();

    let cell_rect = |row: usize, col: usize| {
        let offset = Vec2::new(col as f32 * cell, row as f32 * cell);
        Rect::from_min_size(origin + offset, Vec2::splat(cell))
    };

    for row in 0..n {
        for col in 0..n {
            let fill = diverging_color(corr.get(row, col));
            painter.rect_filled(cell_rect(row, col).shrink(0.5), 0.0, fill);
        }

        painter.text(
            Pos2::new(origin.x - 6.0, origin.y + (row as f32 + 0.5) * cell),
            Align2::RIGHT_CENTER,
            &corr.columns[row],
            font.clone(),
            text_color,
        );

        let galley = painter.layout_no_wrap(corr.columns[row].clone(), font.clone(), text_color);
        let anchor = Pos2::new(
            origin.x + (row as f32 + 0.5) * cell - galley.size().y / 2.0,
            origin.y + grid.y + 6.0 + galley.size().x,
        );
        painter.add(Shape::Text(TextShape::new(anchor, galley, text_color).with_angle(-FRAC_PI_2)));
    }

    let scale = Rect::from_min_size(
        Pos2::new(origin.x + grid.x + 12.0, origin.y),
        Vec2::new(14.0, grid.y),
    );
    paint_scale(&painter, scale, &font, text_color);

    let hovered = response
        .hover_pos()
        .and_then(|pos| hovered_cell(pos - origin, cell, n));
    if let Some((row, col)) = hovered {
        let value = corr.get(row, col);
        response.on_hover_ui_at_pointer(|ui| {
            ui.label(format!("{} × {}", corr.columns[row], corr.columns[col]));
            if value.is_nan() {
                ui.label("undefined (constant column or too few rows)");
            } else {
                ui.label(format!("r = {value:.3}"));
            }
        });
    }
}

/// `(row, col)` under a pointer offset from the grid origin. The division
/// can round up to `n` on the far edges, so indices are clamped.
fn hovered_cell(rel: Vec2, cell: f32, n: usize) -> Option<(usize, usize)> {
    let extent = cell * n as f32;
    if n == 0 || rel.x < 0.0 || rel.y < 0.0 || rel.x >= extent || rel.y >= extent {
        return None;
    }
    let index = |v: f32| ((v / cell) as usize).min(n - 1);
    Some((index(rel.y), index(rel.x)))
}

/// Vertical gradient from +1 (top) to -1 (bottom) with tick labels.
fn paint_scale(painter: &egui::Painter, rect: Rect, font: &FontId, text_color: Color32) {
    const STEPS: usize = 40;
    let step_h = rect.height() / STEPS as f32;
    for i in 0..STEPS {
        let value = 1.0 - 2.0 * (i as f64 + 0.5) / STEPS as f64;
        let r = Rect::from_min_size(
            Pos2::new(rect.left(), rect.top() + i as f32 * step_h),
            Vec2::new(rect.width(), step_h + 0.5),
        );
        painter.rect_filled(r, 0.0, diverging_color(value));
    }
    for (label, y) in [("1", rect.top()), ("0", rect.center().y), ("-1", rect.bottom())] {
        painter.text(
            Pos2::new(rect.right() + 4.0, y),
            Align2::LEFT_CENTER,
            label,
            font.clone(),
            text_color,
        );
    }
}
