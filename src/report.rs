//! Headless summary of every dashboard view.
//!
//! The window and the `--report` mode both read their numbers from a
//! [`DashboardSummary`], so the two can never disagree.

use serde::Serialize;

use crate::data::aggregate::{
    column_means, correlation_matrix, group_box_stats, mean, semester_trend, BoxStats,
    ColumnMean, CorrelationMatrix, TrendPoint,
};
use crate::data::filter::{filter_records, Selection};
use crate::data::model::{Category, NumericColumn, StudentDataset, StudentRecord};
use crate::data::select::{select_distinguished, sort_records, SortKey, SortOrder};

/// All derived views for one selection and threshold.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSummary {
    pub total_records: usize,
    pub filtered_records: usize,
    pub selected_groups: Vec<Category>,
    pub selected_semesters: Vec<Category>,
    pub subject_means: Vec<ColumnMean>,
    pub attendance_mean: Option<f64>,
    pub final_average_mean: Option<f64>,
    pub correlation: CorrelationMatrix,
    pub semester_trend: Vec<TrendPoint>,
    pub final_average_by_group: Vec<BoxStats>,
    pub threshold: f64,
    pub distinguished_count: usize,
    pub distinguished_percentage: Option<f64>,
    /// Distinguished students, best final average first.
    pub distinguished: Vec<StudentRecord>,
}

impl DashboardSummary {
    pub fn build(dataset: &StudentDataset, selection: &Selection, threshold: f64) -> Self {
        let rows = filter_records(dataset, selection);
        let selected = select_distinguished(&rows, threshold);
        let mut top = selected.records.clone();
        sort_records(&mut top, SortKey::default(), SortOrder::default());

        DashboardSummary {
            total_records: dataset.len(),
            filtered_records: rows.len(),
            selected_groups: selection.groups.iter().cloned().collect(),
            selected_semesters: selection.semesters.iter().cloned().collect(),
            subject_means: column_means(&rows, &NumericColumn::SUBJECTS),
            attendance_mean: mean(&rows, NumericColumn::Attendance),
            final_average_mean: mean(&rows, NumericColumn::FinalAverage),
            correlation: correlation_matrix(&rows, &NumericColumn::SUBJECTS),
            semester_trend: semester_trend(&rows),
            final_average_by_group: group_box_stats(&rows, NumericColumn::FinalAverage),
            threshold,
            distinguished_count: selected.count,
            distinguished_percentage: selected.percentage,
            distinguished: top.into_iter().cloned().collect(),
        }
    }
}

/// Format an optional statistic, `n/a` when undefined.
pub fn fmt_opt(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{v:.2}"),
        None => "n/a".to_string(),
    }
}

fn join(values: &[Category]) -> String {
    if values.is_empty() {
        return "(none)".to_string();
    }
    values
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Render the summary as a plain-text report.
pub fn render_text(summary: &DashboardSummary) -> String {
    let mut output = String::new();

    output.push_str("Academic Analyzer\n=================\n\n");
    output.push_str(&format!(
        "Records: {} loaded, {} after filters\n",
        summary.total_records, summary.filtered_records
    ));
    output.push_str(&format!("Groups: {}\n", join(&summary.selected_groups)));
    output.push_str(&format!("Semesters: {}\n\n", join(&summary.selected_semesters)));

    output.push_str(&render_means(summary));
    output.push_str(&render_correlation(&summary.correlation));
    output.push_str(&render_trend(&summary.semester_trend));
    output.push_str(&render_boxes(&summary.final_average_by_group));
    output.push_str(&render_distinguished(summary));

    output
}

fn render_means(summary: &DashboardSummary) -> String {
    let mut section = String::from("Average by subject\n------------------\n");
    for m in &summary.subject_means {
        section.push_str(&format!("  {:<14} {:>8}\n", m.column.label(), fmt_opt(m.mean)));
    }
    section.push_str(&format!(
        "  {:<14} {:>8}\n",
        NumericColumn::Attendance.label(),
        fmt_opt(summary.attendance_mean)
    ));
    section.push_str(&format!(
        "  {:<14} {:>8}\n\n",
        NumericColumn::FinalAverage.label(),
        fmt_opt(summary.final_average_mean)
    ));
    section
}

fn render_correlation(matrix: &CorrelationMatrix) -> String {
    let mut section = String::from("Correlation between subjects\n----------------------------\n");
    section.push_str(&format!("  {:<14}", ""));
    for c in &matrix.columns {
        section.push_str(&format!(" {:>8.8}", c.label()));
    }
    section.push('\n');
    for (i, c) in matrix.columns.iter().enumerate() {
        section.push_str(&format!("  {:<14}", c.label()));
        for j in 0..matrix.size() {
            section.push_str(&format!(" {:>8}", fmt_opt(matrix.get(i, j))));
        }
        section.push('\n');
    }
    section.push('\n');
    section
}

fn render_trend(trend: &[TrendPoint]) -> String {
    let mut section = String::from("Trend by semester\n-----------------\n");
    if trend.is_empty() {
        section.push_str("  (no data)\n\n");
        return section;
    }
    section.push_str("  semester   students  attendance  final avg\n");
    for p in trend {
        section.push_str(&format!(
            "  {:<10} {:>8} {:>11.2} {:>10.2}\n",
            p.semester.to_string(),
            p.count,
            p.attendance,
            p.final_average
        ));
    }
    section.push('\n');
    section
}

fn render_boxes(boxes: &[BoxStats]) -> String {
    let mut section = String::from("Final average by group\n----------------------\n");
    if boxes.is_empty() {
        section.push_str("  (no data)\n\n");
        return section;
    }
    section.push_str("  group      students     min      q1  median      q3     max\n");
    for b in boxes {
        section.push_str(&format!(
            "  {:<10} {:>8} {:>7.2} {:>7.2} {:>7.2} {:>7.2} {:>7.2}\n",
            b.group.to_string(),
            b.count,
            b.min,
            b.q1,
            b.median,
            b.q3,
            b.max
        ));
    }
    section.push('\n');
    section
}

fn render_distinguished(summary: &DashboardSummary) -> String {
    let mut section = String::from("Distinguished students\n----------------------\n");
    let pct = match summary.distinguished_percentage {
        Some(p) => format!("{p:.1}%"),
        None => "n/a".to_string(),
    };
    section.push_str(&format!(
        "  final average >= {:.1}: {} students ({} of filtered)\n",
        summary.threshold, summary.distinguished_count, pct
    ));
    for r in &summary.distinguished {
        section.push_str(&format!(
            "  {:<24} {:<6} {:<6} {:>7.2}\n",
            r.name,
            r.group.to_string(),
            r.semester.to_string(),
            r.final_average
        ));
    }
    section
}
