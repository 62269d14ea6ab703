use std::cmp::Ordering;

use serde::Serialize;

use super::model::{NumericColumn, StudentRecord};

/// Final average at or above which a student is distinguished by default.
pub const DEFAULT_THRESHOLD: f64 = 90.0;

// ---------------------------------------------------------------------------
// Distinguished students
// ---------------------------------------------------------------------------

/// Records meeting the threshold, with their share of the filtered set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Distinguished<'a> {
    pub threshold: f64,
    pub records: Vec<&'a StudentRecord>,
    pub count: usize,
    /// Percentage of the filtered collection, `None` when it was empty.
    pub percentage: Option<f64>,
}

/// Keep records whose final average is `>= threshold`, in input order.
pub fn select_distinguished<'a>(records: &[&'a StudentRecord], threshold: f64) -> Distinguished<'a> {
    let selected: Vec<&StudentRecord> = records
        .iter()
        .copied()
        .filter(|r| r.final_average >= threshold)
        .collect();
    let count = selected.len();
    let percentage = if records.is_empty() {
        None
    } else {
        Some(count as f64 * 100.0 / records.len() as f64)
    };

    Distinguished {
        threshold,
        records: selected,
        count,
        percentage,
    }
}

// ---------------------------------------------------------------------------
// Table sorting
// ---------------------------------------------------------------------------

/// Column the top-performer table is ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SortKey {
    Name,
    Group,
    Semester,
    Numeric(NumericColumn),
}

impl Default for SortKey {
    fn default() -> Self {
        SortKey::Numeric(NumericColumn::FinalAverage)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum SortOrder {
    Ascending,
    #[default]
    Descending,
}

impl SortOrder {
    pub fn flipped(self) -> Self {
        match self {
            SortOrder::Ascending => SortOrder::Descending,
            SortOrder::Descending => SortOrder::Ascending,
        }
    }

    pub fn arrow(self) -> &'static str {
        match self {
            SortOrder::Ascending => "⏶",
            SortOrder::Descending => "⏷",
        }
    }
}

fn compare(a: &StudentRecord, b: &StudentRecord, key: SortKey) -> Ordering {
    match key {
        SortKey::Name => a.name.cmp(&b.name),
        SortKey::Group => a.group.cmp(&b.group),
        SortKey::Semester => a.semester.cmp(&b.semester),
        SortKey::Numeric(col) => col.value(a).total_cmp(&col.value(b)),
    }
}

/// Stable sort; ties keep their input order in both directions.
pub fn sort_records(records: &mut [&StudentRecord], key: SortKey, order: SortOrder) {
    records.sort_by(|a, b| {
        let ord = compare(a, b, key);
        match order {
            SortOrder::Ascending => ord,
            SortOrder::Descending => ord.reverse(),
        }
    });
}
