use eframe::egui::{self, RichText, Ui};
use egui_extras::{Column, TableBuilder};

use crate::data::model::NumericColumn;
use crate::data::select::SortKey;
use crate::state::AppState;

const HEADERS: [(&str, SortKey); 10] = [
    ("Name", SortKey::Name),
    ("Group", SortKey::Group),
    ("Semester", SortKey::Semester),
    ("Math", SortKey::Numeric(NumericColumn::Mathematics)),
    ("Science", SortKey::Numeric(NumericColumn::Science)),
    ("History", SortKey::Numeric(NumericColumn::History)),
    ("Spanish", SortKey::Numeric(NumericColumn::Spanish)),
    ("English", SortKey::Numeric(NumericColumn::English)),
    ("Attendance", SortKey::Numeric(NumericColumn::Attendance)),
    ("Final avg", SortKey::Numeric(NumericColumn::FinalAverage)),
];

/// Table of distinguished students. Clicking a header sorts by it.
pub fn top_performers_table(ui: &mut Ui, state: &mut AppState) {
    let Some(summary) = &state.summary else {
        return;
    };
    let pct = summary
        .distinguished_percentage
        .map(|p| format!("{p:.1}%"))
        .unwrap_or_else(|| "n/a".to_string());
    ui.label(format!(
        "{} students with final average ≥ {:.1} ({pct} of the filtered students)",
        summary.distinguished_count, state.threshold
    ));
    if summary.distinguished.is_empty() {
        return;
    }

    let rows = state.table_rows();
    let mut clicked = None;

    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .vscroll(false)
        .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
        .column(Column::auto().at_least(140.0))
        .columns(Column::auto().at_least(60.0), HEADERS.len() - 1)
        .header(22.0, |mut header| {
            for (label, key) in HEADERS {
                header.col(|ui| {
                    let text = if state.sort_key == key {
                        format!("{label} {}", state.sort_order.arrow())
                    } else {
                        label.to_string()
                    };
                    if ui.button(RichText::new(text).strong()).clicked() {
                        clicked = Some(key);
                    }
                });
            }
        })
        .body(|mut body| {
            for r in &rows {
                body.row(20.0, |mut row| {
                    row.col(|ui| {
                        ui.label(&r.name);
                    });
                    row.col(|ui| {
                        ui.label(r.group.to_string());
                    });
                    row.col(|ui| {
                        ui.label(r.semester.to_string());
                    });
                    for column in NumericColumn::ALL {
                        row.col(|ui| {
                            ui.label(format!("{:.1}", column.value(r)));
                        });
                    }
                });
            }
        });
    drop(rows);

    if let Some(key) = clicked {
        state.sort_by(key);
    }
}
