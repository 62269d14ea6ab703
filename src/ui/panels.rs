use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::data::filter::FilterKey;
use crate::report::fmt_opt;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    let Some(dataset) = &state.dataset else {
        ui.label("No dataset loaded.");
        return;
    };

    // Clone what we need so we can mutate state inside the loop.
    let options: Vec<(FilterKey, Vec<_>)> = FilterKey::ALL
        .iter()
        .map(|&key| (key, key.options(dataset).iter().cloned().collect()))
        .collect();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            for (key, values) in &options {
                let n_selected = state.selection.values(*key).len();
                let header_text = format!("{}  ({n_selected}/{})", key.label(), values.len());

                egui::CollapsingHeader::new(RichText::new(header_text).strong())
                    .id_salt(key.label())
                    .default_open(true)
                    .show(ui, |ui: &mut Ui| {
                        ui.horizontal(|ui: &mut Ui| {
                            if ui.small_button("All").clicked() {
                                state.select_all(*key);
                            }
                            if ui.small_button("None").clicked() {
                                state.select_none(*key);
                            }
                        });

                        for val in values {
                            let mut checked = state.selection.values(*key).contains(val);
                            let mut text = RichText::new(val.to_string());
                            if *key == FilterKey::Group {
                                text = text.color(state.group_colors.color_for(val));
                            }
                            if ui.checkbox(&mut checked, text).changed() {
                                state.toggle_filter_value(*key, val);
                            }
                        }
                    });
            }

            ui.separator();
            ui.strong("Distinguished students");
            let mut threshold = state.threshold;
            let slider = egui::Slider::new(&mut threshold, 0.0..=100.0)
                .step_by(0.5)
                .text("min. final avg");
            if ui.add(slider).changed() {
                state.set_threshold(threshold);
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

        if let Some(ds) = &state.dataset {
            let source = state
                .data_path
                .as_ref()
                .and_then(|p| p.file_name())
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            ui.label(format!(
                "{source}: {} students loaded, {} visible",
                ds.len(),
                state.visible_indices.len()
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// Headline figures
// ---------------------------------------------------------------------------

/// One row of headline numbers above the charts.
pub fn metrics_row(ui: &mut Ui, state: &AppState) {
    let Some(summary) = &state.summary else {
        return;
    };
    let pct = summary
        .distinguished_percentage
        .map(|p| format!("{p:.1}%"))
        .unwrap_or_else(|| "n/a".to_string());

    ui.horizontal(|ui: &mut Ui| {
        metric(ui, "Students", summary.filtered_records.to_string());
        metric(ui, "Mean final average", fmt_opt(summary.final_average_mean));
        metric(ui, "Mean attendance", fmt_opt(summary.attendance_mean));
        metric(
            ui,
            "Distinguished",
            format!("{} ({pct})", summary.distinguished_count),
        );
    });
}

fn metric(ui: &mut Ui, label: &str, value: String) {
    ui.group(|ui: &mut Ui| {
        ui.vertical(|ui: &mut Ui| {
            ui.label(RichText::new(label).small());
            ui.label(RichText::new(value).heading());
        });
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open student records")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.load_path(&path);
    }
}
