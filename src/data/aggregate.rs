//! Column means, correlations and grouped summaries over filtered records.
//!
//! Every function takes the already-filtered rows and is pure. Results that
//! would need a division by zero are `None` ("undefined") instead of NaN.

use std::collections::BTreeMap;

use serde::Serialize;

use super::model::{Category, NumericColumn, StudentRecord};

// ---------------------------------------------------------------------------
// Means
// ---------------------------------------------------------------------------

/// Arithmetic mean of `column`, or `None` for an empty collection.
pub fn mean(records: &[&StudentRecord], column: NumericColumn) -> Option<f64> {
    if records.is_empty() {
        return None;
    }
    let sum: f64 = records.iter().map(|r| column.value(r)).sum();
    Some(sum / records.len() as f64)
}

/// Mean of one column.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ColumnMean {
    pub column: NumericColumn,
    pub mean: Option<f64>,
}

/// Means of the requested columns, in request order.
pub fn column_means(records: &[&StudentRecord], columns: &[NumericColumn]) -> Vec<ColumnMean> {
    columns
        .iter()
        .map(|&column| ColumnMean {
            column,
            mean: mean(records, column),
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Correlation
// ---------------------------------------------------------------------------

/// Symmetric matrix of Pearson coefficients.
///
/// `values[i][j]` correlates `columns[i]` with `columns[j]`. A cell is `None`
/// when either column is degenerate (fewer than two rows, or all values equal).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationMatrix {
    pub columns: Vec<NumericColumn>,
    pub values: Vec<Vec<Option<f64>>>,
}

impl CorrelationMatrix {
    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        self.values.get(row)?.get(col).copied().flatten()
    }

    pub fn size(&self) -> usize {
        self.columns.len()
    }
}

/// Pearson correlation for every pair of `columns`.
pub fn correlation_matrix(records: &[&StudentRecord], columns: &[NumericColumn]) -> CorrelationMatrix {
    let series: Vec<Vec<f64>> = columns
        .iter()
        .map(|&c| records.iter().map(|r| c.value(r)).collect())
        .collect();
    let n = columns.len();
    let mut values = vec![vec![None; n]; n];

    for i in 0..n {
        values[i][i] = if is_degenerate(&series[i]) { None } else { Some(1.0) };
        for j in (i + 1)..n {
            let r = pearson(&series[i], &series[j]);
            values[i][j] = r;
            values[j][i] = r;
        }
    }

    CorrelationMatrix {
        columns: columns.to_vec(),
        values,
    }
}

/// Fewer than two values, or every value identical. Decided from the
/// values themselves: the mean of a constant decimal column is not always
/// exact, so its computed variance can come out as a tiny positive number.
fn is_degenerate(xs: &[f64]) -> bool {
    xs.len() < 2 || xs.iter().all(|&x| x == xs[0])
}

fn mean_of(xs: &[f64]) -> f64 {
    xs.iter().sum::<f64>() / xs.len() as f64
}

fn sum_sq_dev(xs: &[f64], m: f64) -> f64 {
    xs.iter().map(|x| (x - m).powi(2)).sum()
}

/// Pearson's r, clamped to [-1, 1] against rounding drift.
pub fn pearson(xs: &[f64], ys: &[f64]) -> Option<f64> {
    if xs.len() != ys.len() || is_degenerate(xs) || is_degenerate(ys) {
        return None;
    }
    let (mx, my) = (mean_of(xs), mean_of(ys));
    let cov: f64 = xs.iter().zip(ys).map(|(x, y)| (x - mx) * (y - my)).sum();
    let denom = (sum_sq_dev(xs, mx) * sum_sq_dev(ys, my)).sqrt();
    if denom == 0.0 || !denom.is_finite() {
        return None;
    }
    Some((cov / denom).clamp(-1.0, 1.0))
}

// ---------------------------------------------------------------------------
// Per-semester trend
// ---------------------------------------------------------------------------

/// Mean attendance and final average for one semester.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendPoint {
    pub semester: Category,
    pub attendance: f64,
    pub final_average: f64,
    pub count: usize,
}

/// One point per semester present in `records`, in semester order.
pub fn semester_trend(records: &[&StudentRecord]) -> Vec<TrendPoint> {
    let mut buckets: BTreeMap<&Category, (f64, f64, usize)> = BTreeMap::new();
    for r in records {
        let entry = buckets.entry(&r.semester).or_default();
        entry.0 += r.attendance;
        entry.1 += r.final_average;
        entry.2 += 1;
    }

    buckets
        .into_iter()
        .map(|(semester, (att, avg, count))| TrendPoint {
            semester: semester.clone(),
            attendance: att / count as f64,
            final_average: avg / count as f64,
            count,
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Per-group box statistics
// ---------------------------------------------------------------------------

/// Five-number summary of one column within one group, with Tukey whiskers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoxStats {
    pub group: Category,
    pub count: usize,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
    /// Lowest value within 1.5 IQR below `q1`.
    pub lower_whisker: f64,
    /// Highest value within 1.5 IQR above `q3`.
    pub upper_whisker: f64,
    pub outliers: Vec<f64>,
}

impl BoxStats {
    /// Summarise a non-empty sample. Returns `None` when `values` is empty.
    pub fn from_values(group: Category, mut values: Vec<f64>) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        values.sort_by(f64::total_cmp);

        let q1 = quantile_sorted(&values, 0.25);
        let q3 = quantile_sorted(&values, 0.75);
        let iqr = q3 - q1;
        let (lo_fence, hi_fence) = (q1 - 1.5 * iqr, q3 + 1.5 * iqr);

        let inside = || values.iter().copied().filter(|v| (lo_fence..=hi_fence).contains(v));
        let lower_whisker = inside().next().unwrap_or(q1);
        let upper_whisker = inside().last().unwrap_or(q3);
        let outliers = values
            .iter()
            .copied()
            .filter(|v| !(lo_fence..=hi_fence).contains(v))
            .collect();

        Some(BoxStats {
            group,
            count: values.len(),
            min: values[0],
            q1,
            median: quantile_sorted(&values, 0.5),
            q3,
            max: values[values.len() - 1],
            lower_whisker,
            upper_whisker,
            outliers,
        })
    }
}

/// Quantile with linear interpolation between closest ranks.
/// `sorted` must be non-empty and ascending; `q` in [0, 1]. Only called from
/// [`BoxStats::from_values`], which rejects empty samples.
fn quantile_sorted(sorted: &[f64], q: f64) -> f64 {
    let pos = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
}

/// Box statistics of `column` for every group present in `records`.
pub fn group_box_stats(records: &[&StudentRecord], column: NumericColumn) -> Vec<BoxStats> {
    let mut by_group: BTreeMap<&Category, Vec<f64>> = BTreeMap::new();
    for r in records {
        by_group.entry(&r.group).or_default().push(column.value(r));
    }
    by_group
        .into_iter()
        .filter_map(|(group, values)| BoxStats::from_values(group.clone(), values))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::fixtures::{record, small_dataset};

    fn refs(records: &[StudentRecord]) -> Vec<&StudentRecord> {
        records.iter().collect()
    }

    #[test]
    fn mean_of_single_record_is_its_value() {
        let r = record("Ana", "A", 1, 77.5, 81.25);
        let rows = [&r];
        assert_eq!(mean(&rows, NumericColumn::History), Some(77.5));
        assert_eq!(mean(&rows, NumericColumn::FinalAverage), Some(81.25));
    }

    #[test]
    fn mean_of_empty_collection_is_undefined() {
        assert_eq!(mean(&[], NumericColumn::Mathematics), None);
        let means = column_means(&[], &NumericColumn::SUBJECTS);
        assert_eq!(means.len(), 5);
        assert!(means.iter().all(|m| m.mean.is_none()));
    }

    #[test]
    fn column_means_follow_request_order() {
        let ds = small_dataset();
        let rows = refs(&ds.records);
        let means = column_means(&rows, &[NumericColumn::Attendance, NumericColumn::Mathematics]);
        assert_eq!(means[0].column, NumericColumn::Attendance);
        assert_eq!(means[0].mean, Some((98.0 + 70.0 + 85.0 + 95.0) / 4.0));
        assert_eq!(means[1].mean, Some((95.0 + 55.0 + 72.0 + 99.0) / 4.0));
    }

    #[test]
    fn correlation_diagonal_is_one_and_matrix_symmetric() {
        let ds = small_dataset();
        let rows = refs(&ds.records);
        let m = correlation_matrix(&rows, &NumericColumn::SUBJECTS);
        assert_eq!(m.size(), 5);
        for i in 0..5 {
            assert_eq!(m.get(i, i), Some(1.0));
            for j in 0..5 {
                assert_eq!(m.get(i, j), m.get(j, i));
                if let Some(r) = m.get(i, j) {
                    assert!((-1.0..=1.0).contains(&r));
                }
            }
        }
    }

    #[test]
    fn perfectly_linear_columns_correlate_fully() {
        assert_eq!(pearson(&[1.0, 2.0, 3.0], &[2.0, 4.0, 6.0]), Some(1.0));
        let r = pearson(&[1.0, 2.0, 3.0], &[3.0, 2.0, 1.0]).unwrap();
        assert!((r + 1.0).abs() < 1e-12);
    }

    #[test]
    fn degenerate_columns_are_undefined() {
        assert_eq!(pearson(&[5.0, 5.0, 5.0], &[1.0, 2.0, 3.0]), None);
        assert_eq!(pearson(&[1.0], &[1.0]), None);

        let r = record("Ana", "A", 1, 70.0, 70.0);
        let m = correlation_matrix(&[&r], &NumericColumn::SUBJECTS);
        assert!(m.values.iter().flatten().all(Option::is_none));
    }

    #[test]
    fn constant_decimal_column_is_undefined() {
        // The computed mean of three 0.1s is not exactly 0.1.
        let mut rows = vec![
            record("a", "A", 1, 70.0, 70.0),
            record("b", "A", 1, 70.0, 70.0),
            record("c", "A", 1, 70.0, 70.0),
        ];
        for (r, science) in rows.iter_mut().zip([1.0, 2.0, 9.0]) {
            r.mathematics = 0.1;
            r.science = science;
        }
        let view = refs(&rows);
        let columns = [NumericColumn::Mathematics, NumericColumn::Science];
        let m = correlation_matrix(&view, &columns);

        assert_eq!(m.get(0, 0), None);
        assert_eq!(m.get(0, 1), None);
        assert_eq!(m.get(1, 0), None);
        assert_eq!(m.get(1, 1), Some(1.0));
        assert_eq!(pearson(&[0.1, 0.1, 0.1], &[1.0, 2.0, 9.0]), None);
    }

    #[test]
    fn single_value_sample_collapses_to_that_value() {
        let stats = BoxStats::from_values(Category::from("A"), vec![64.5]).unwrap();
        assert_eq!(stats.q1, 64.5);
        assert_eq!(stats.median, 64.5);
        assert_eq!(stats.q3, 64.5);
        assert!(stats.outliers.is_empty());
    }

    #[test]
    fn trend_is_ordered_by_semester() {
        let ds = small_dataset();
        let rows = refs(&ds.records);
        let trend = semester_trend(&rows);
        assert_eq!(trend.len(), 2);
        assert_eq!(trend[0].semester, Category::Integer(1));
        assert_eq!(trend[0].count, 2);
        assert_eq!(trend[0].attendance, (98.0 + 70.0) / 2.0);
        assert_eq!(trend[1].final_average, (73.5 + 91.0) / 2.0);
    }

    #[test]
    fn trend_of_nothing_is_empty() {
        assert!(semester_trend(&[]).is_empty());
    }

    #[test]
    fn quantiles_interpolate_linearly() {
        let v = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(quantile_sorted(&v, 0.0), 1.0);
        assert_eq!(quantile_sorted(&v, 0.25), 1.75);
        assert_eq!(quantile_sorted(&v, 0.5), 2.5);
        assert_eq!(quantile_sorted(&v, 1.0), 4.0);
    }

    #[test]
    fn box_stats_flag_outliers() {
        let stats = BoxStats::from_values(
            Category::from("A"),
            vec![50.0, 52.0, 54.0, 56.0, 58.0, 5.0],
        )
        .unwrap();
        assert_eq!(stats.count, 6);
        assert_eq!(stats.min, 5.0);
        assert_eq!(stats.max, 58.0);
        assert_eq!(stats.outliers, vec![5.0]);
        assert_eq!(stats.lower_whisker, 50.0);
        assert_eq!(stats.upper_whisker, 58.0);
    }

    #[test]
    fn box_stats_per_group() {
        let ds = small_dataset();
        let rows = refs(&ds.records);
        let boxes = group_box_stats(&rows, NumericColumn::FinalAverage);
        let groups: Vec<String> = boxes.iter().map(|b| b.group.to_string()).collect();
        assert_eq!(groups, ["A", "B", "C"]);
        assert_eq!(boxes[0].count, 2);
        assert_eq!(boxes[0].median, (82.0 + 73.5) / 2.0);
        assert_eq!(boxes[2].q1, 91.0);
        assert!(BoxStats::from_values(Category::from("Z"), Vec::new()).is_none());
    }
}
