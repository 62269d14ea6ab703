use std::collections::BTreeMap;

use eframe::egui::{Color32, Ui};
use egui_plot::{
    Bar, BarChart, BoxElem, BoxPlot, BoxSpread, GridMark, Legend, Line, Plot, PlotPoints, Points,
};

use crate::data::model::{Category, NumericColumn};
use crate::state::AppState;

const PLOT_HEIGHT: f32 = 260.0;

/// Axis formatter that shows `labels[i]` at integer position `i` and
/// nothing elsewhere.
fn label_formatter(
    labels: Vec<String>,
) -> impl Fn(GridMark, &std::ops::RangeInclusive<f64>) -> String + 'static {
    move |mark, _range| {
        let v = mark.value;
        // Range check before the cast; also rejects NaN.
        if !(0.0..labels.len() as f64).contains(&v) || v.fract().abs() > f64::EPSILON {
            return String::new();
        }
        labels[v as usize].clone()
    }
}

// ---------------------------------------------------------------------------
// Average per subject
// ---------------------------------------------------------------------------

/// Bar chart of the mean score per subject.
pub fn subject_means_chart(ui: &mut Ui, state: &AppState) {
    let Some(summary) = &state.summary else {
        return;
    };

    let bars: Vec<Bar> = summary
        .subject_means
        .iter()
        .enumerate()
        .filter_map(|(i, m)| {
            m.mean
                .map(|v| Bar::new(i as f64, v).name(m.column.label()).width(0.6))
        })
        .collect();
    if bars.is_empty() {
        ui.label("No students match the current filters.");
        return;
    }

    let labels = summary
        .subject_means
        .iter()
        .map(|m| m.column.label().to_string())
        .collect();

    Plot::new("subject_means")
        .height(PLOT_HEIGHT)
        .y_axis_label("Average")
        .x_axis_formatter(label_formatter(labels))
        .allow_drag(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(
                BarChart::new(bars)
                    .name("Average per subject")
                    .color(Color32::from_rgb(135, 206, 235)),
            );
        });
}

// ---------------------------------------------------------------------------
// Attendance vs final average
// ---------------------------------------------------------------------------

/// Scatter of attendance against final average, one series per group.
pub fn attendance_scatter(ui: &mut Ui, state: &AppState) {
    let mut by_group: BTreeMap<&Category, Vec<[f64; 2]>> = BTreeMap::new();
    for r in state.visible_records() {
        by_group
            .entry(&r.group)
            .or_default()
            .push([r.attendance, r.final_average]);
    }

    Plot::new("attendance_scatter")
        .height(PLOT_HEIGHT)
        .legend(Legend::default())
        .x_axis_label(NumericColumn::Attendance.label())
        .y_axis_label(NumericColumn::FinalAverage.label())
        .allow_boxed_zoom(true)
        .show(ui, |plot_ui| {
            for (group, points) in by_group {
                plot_ui.points(
                    Points::new(PlotPoints::from(points))
                        .name(format!("Group {group}"))
                        .color(state.group_colors.color_for(group))
                        .radius(3.5),
                );
            }
        });
}

// ---------------------------------------------------------------------------
// Final average per group
// ---------------------------------------------------------------------------

/// Box plot of the final average per group.
pub fn group_box_plot(ui: &mut Ui, state: &AppState) {
    let Some(summary) = &state.summary else {
        return;
    };
    let boxes = &summary.final_average_by_group;
    if boxes.is_empty() {
        ui.label("No students match the current filters.");
        return;
    }

    let labels = boxes.iter().map(|b| format!("Group {}", b.group)).collect();

    Plot::new("group_box_plot")
        .height(PLOT_HEIGHT)
        .y_axis_label(NumericColumn::FinalAverage.label())
        .x_axis_formatter(label_formatter(labels))
        .show(ui, |plot_ui| {
            for (i, b) in boxes.iter().enumerate() {
                let color = state.group_colors.color_for(&b.group);
                let elem = BoxElem::new(
                    i as f64,
                    BoxSpread::new(b.lower_whisker, b.q1, b.median, b.q3, b.upper_whisker),
                )
                .name(format!("Group {} (n = {})", b.group, b.count))
                .box_width(0.5)
                .whisker_width(0.3);
                plot_ui.box_plot(BoxPlot::new(vec![elem]).color(color));

                if !b.outliers.is_empty() {
                    let points: PlotPoints = b.outliers.iter().map(|&v| [i as f64, v]).collect();
                    plot_ui.points(Points::new(points).color(color).radius(2.5));
                }
            }
        });
}

// ---------------------------------------------------------------------------
// Per-semester trend
// ---------------------------------------------------------------------------

/// Mean attendance and mean final average per semester, on a shared 0–100
/// axis.
pub fn semester_trend_chart(ui: &mut Ui, state: &AppState) {
    let Some(summary) = &state.summary else {
        return;
    };
    let trend = &summary.semester_trend;
    if trend.is_empty() {
        ui.label("No students match the current filters.");
        return;
    }

    let labels = trend.iter().map(|p| format!("Sem. {}", p.semester)).collect();
    let attendance: PlotPoints = trend
        .iter()
        .enumerate()
        .map(|(i, p)| [i as f64, p.attendance])
        .collect();
    let average: PlotPoints = trend
        .iter()
        .enumerate()
        .map(|(i, p)| [i as f64, p.final_average])
        .collect();

    Plot::new("semester_trend")
        .height(PLOT_HEIGHT)
        .legend(Legend::default())
        .x_axis_formatter(label_formatter(labels))
        .y_axis_label("Mean")
        .show(ui, |plot_ui| {
            plot_ui.line(
                Line::new(attendance)
                    .name(NumericColumn::Attendance.label())
                    .color(Color32::from_rgb(70, 130, 180))
                    .width(2.0),
            );
            plot_ui.line(
                Line::new(average)
                    .name(NumericColumn::FinalAverage.label())
                    .color(Color32::from_rgb(230, 120, 40))
                    .width(2.0),
            );
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn label_at(value: f64) -> String {
        let format = label_formatter(vec!["a".into(), "b".into()]);
        format(GridMark { value, step_size: 1.0 }, &(0.0..=1.0))
    }

    #[test]
    fn integer_marks_get_their_label() {
        assert_eq!(label_at(0.0), "a");
        assert_eq!(label_at(1.0), "b");
    }

    #[test]
    fn marks_outside_the_labels_are_blank() {
        for value in [2.0, 1e300, f64::INFINITY, -1.0, 0.5, f64::NAN] {
            assert_eq!(label_at(value), "", "mark {value}");
        }
    }
}
