use eframe::egui::{self, RichText, Ui};

use crate::color::{correlation_color, text_color_for};
use crate::report::fmt_opt;
use crate::state::AppState;

/// Correlation heatmap between the subject columns, drawn as a grid of
/// coloured cells with the coefficient printed in each.
pub fn correlation_heatmap(ui: &mut Ui, state: &AppState) {
    let Some(summary) = &state.summary else {
        return;
    };
    let matrix = &summary.correlation;

    egui::Grid::new("correlation_heatmap")
        .spacing([2.0, 2.0])
        .min_col_width(90.0)
        .show(ui, |ui: &mut Ui| {
            ui.label("");
            for c in &matrix.columns {
                ui.label(RichText::new(c.label()).strong());
            }
            ui.end_row();

            for (i, c) in matrix.columns.iter().enumerate() {
                ui.label(RichText::new(c.label()).strong());
                for j in 0..matrix.size() {
                    let r = matrix.get(i, j);
                    let text = format!("{:^10}", fmt_opt(r));
                    ui.label(
                        RichText::new(text)
                            .monospace()
                            .color(text_color_for(r))
                            .background_color(correlation_color(r)),
                    );
                }
                ui.end_row();
            }
        });

    if matrix.values.iter().flatten().any(Option::is_none) {
        ui.label(RichText::new("n/a: fewer than two students or no variation in a subject").small());
    }
}
