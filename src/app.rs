use eframe::egui::{self, ScrollArea, Ui};

use crate::state::AppState;
use crate::ui::{charts, heatmap, panels, table};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct AcademicAnalyzerApp {
    pub state: AppState,
}

impl AcademicAnalyzerApp {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

impl eframe::App for AcademicAnalyzerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(220.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: charts and table ----
        egui::CentralPanel::default().show(ctx, |ui| {
            if self.state.dataset.is_none() {
                ui.centered_and_justified(|ui: &mut Ui| {
                    ui.heading("Open a student table to begin  (File → Open…)");
                });
                return;
            }

            ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui: &mut Ui| {
                    ui.heading("Academic Analyzer");
                    panels::metrics_row(ui, &self.state);
                    ui.add_space(8.0);

                    section(ui, "Average per subject");
                    charts::subject_means_chart(ui, &self.state);

                    section(ui, "Attendance vs final average");
                    charts::attendance_scatter(ui, &self.state);

                    section(ui, "Final average per group");
                    charts::group_box_plot(ui, &self.state);

                    section(ui, "Correlation between subjects");
                    heatmap::correlation_heatmap(ui, &self.state);

                    section(ui, "Trend by semester");
                    charts::semester_trend_chart(ui, &self.state);

                    section(ui, "Distinguished students");
                    table::top_performers_table(ui, &mut self.state);
                });
        });
    }
}

fn section(ui: &mut Ui, title: &str) {
    ui.add_space(12.0);
    ui.strong(title);
    ui.separator();
}
