use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;

// ---------------------------------------------------------------------------
// Category – a single cell in a categorical column (group, semester)
// ---------------------------------------------------------------------------

/// A dynamically-typed categorical value.
///
/// Semesters are usually numbered (`1`, `2`, …) while groups are usually
/// labels (`"A"`, `"B"`), but either column may hold either kind, so the
/// value keeps whatever the file contained. Ordering puts integers before
/// text so that sorted option lists read naturally.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum Category {
    Integer(i64),
    Text(String),
}

impl PartialOrd for Category {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Category {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        use std::cmp::Ordering;
        match (self, other) {
            (Category::Integer(a), Category::Integer(b)) => a.cmp(b),
            (Category::Text(a), Category::Text(b)) => a.cmp(b),
            (Category::Integer(_), Category::Text(_)) => Ordering::Less,
            (Category::Text(_), Category::Integer(_)) => Ordering::Greater,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::Integer(i) => write!(f, "{i}"),
            Category::Text(s) => write!(f, "{s}"),
        }
    }
}

impl Category {
    /// Interpret a raw text cell. Integral text becomes `Integer`.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        match trimmed.parse::<i64>() {
            Ok(i) => Category::Integer(i),
            Err(_) => Category::Text(trimmed.to_string()),
        }
    }
}

impl From<&str> for Category {
    fn from(s: &str) -> Self {
        Category::parse(s)
    }
}

impl From<i64> for Category {
    fn from(i: i64) -> Self {
        Category::Integer(i)
    }
}

// ---------------------------------------------------------------------------
// NumericColumn – the numeric fields of a record
// ---------------------------------------------------------------------------

/// The numeric columns of the student table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NumericColumn {
    Mathematics,
    Science,
    History,
    Spanish,
    English,
    Attendance,
    FinalAverage,
}

impl NumericColumn {
    /// The five subject score columns, in display order.
    pub const SUBJECTS: [NumericColumn; 5] = [
        NumericColumn::Mathematics,
        NumericColumn::Science,
        NumericColumn::History,
        NumericColumn::Spanish,
        NumericColumn::English,
    ];

    pub const ALL: [NumericColumn; 7] = [
        NumericColumn::Mathematics,
        NumericColumn::Science,
        NumericColumn::History,
        NumericColumn::Spanish,
        NumericColumn::English,
        NumericColumn::Attendance,
        NumericColumn::FinalAverage,
    ];

    /// Header used for this column in the source file.
    pub fn header(self) -> &'static str {
        match self {
            NumericColumn::Mathematics => "calificaciones_matematicas",
            NumericColumn::Science => "calificaciones_ciencias",
            NumericColumn::History => "calificaciones_historia",
            NumericColumn::Spanish => "calificaciones_espanol",
            NumericColumn::English => "calificaciones_ingles",
            NumericColumn::Attendance => "porcentaje_asistencias",
            NumericColumn::FinalAverage => "promedio_final",
        }
    }

    /// Short human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            NumericColumn::Mathematics => "Mathematics",
            NumericColumn::Science => "Science",
            NumericColumn::History => "History",
            NumericColumn::Spanish => "Spanish",
            NumericColumn::English => "English",
            NumericColumn::Attendance => "Attendance %",
            NumericColumn::FinalAverage => "Final average",
        }
    }

    /// Read this column from a record.
    pub fn value(self, record: &StudentRecord) -> f64 {
        match self {
            NumericColumn::Mathematics => record.mathematics,
            NumericColumn::Science => record.science,
            NumericColumn::History => record.history,
            NumericColumn::Spanish => record.spanish,
            NumericColumn::English => record.english,
            NumericColumn::Attendance => record.attendance,
            NumericColumn::FinalAverage => record.final_average,
        }
    }
}

impl fmt::Display for NumericColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Header of the optional student name column.
pub const NAME_HEADER: &str = "nombre";
/// Header of the group column.
pub const GROUP_HEADER: &str = "grupo";
/// Header of the semester column.
pub const SEMESTER_HEADER: &str = "semestre";

// ---------------------------------------------------------------------------
// StudentRecord – one row of the table
// ---------------------------------------------------------------------------

/// A single student (one row of the source table).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StudentRecord {
    pub name: String,
    pub group: Category,
    pub semester: Category,
    pub mathematics: f64,
    pub science: f64,
    pub history: f64,
    pub spanish: f64,
    pub english: f64,
    /// Attendance percentage, 0–100.
    pub attendance: f64,
    pub final_average: f64,
}

// ---------------------------------------------------------------------------
// StudentDataset – the complete loaded table
// ---------------------------------------------------------------------------

/// The full parsed dataset with the distinct filter keys pre-computed.
#[derive(Debug, Clone, Default)]
pub struct StudentDataset {
    /// All records, in file order.
    pub records: Vec<StudentRecord>,
    /// Sorted distinct groups.
    pub groups: BTreeSet<Category>,
    /// Sorted distinct semesters.
    pub semesters: BTreeSet<Category>,
}

impl StudentDataset {
    /// Build the key indices from the loaded records.
    pub fn from_records(records: Vec<StudentRecord>) -> Self {
        let groups = records.iter().map(|r| r.group.clone()).collect();
        let semesters = records.iter().map(|r| r.semester.clone()).collect();
        StudentDataset {
            records,
            groups,
            semesters,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::small_dataset;
    use super::*;

    #[test]
    fn category_parse_prefers_integers() {
        assert_eq!(Category::parse(" 3 "), Category::Integer(3));
        assert_eq!(Category::parse("3A"), Category::Text("3A".into()));
    }

    #[test]
    fn integers_sort_before_text() {
        let set: BTreeSet<Category> = ["B", "10", "A", "2"].into_iter().map(Category::from).collect();
        let ordered: Vec<String> = set.iter().map(ToString::to_string).collect();
        assert_eq!(ordered, ["2", "10", "A", "B"]);
    }

    #[test]
    fn dataset_collects_distinct_keys() {
        let ds = small_dataset();
        assert_eq!(ds.len(), 4);
        assert_eq!(ds.groups.len(), 3);
        assert_eq!(
            ds.semesters.iter().cloned().collect::<Vec<_>>(),
            vec![Category::Integer(1), Category::Integer(2)]
        );
    }

    #[test]
    fn column_value_reads_matching_field() {
        let ds = small_dataset();
        let ana = &ds.records[0];
        assert_eq!(NumericColumn::Mathematics.value(ana), 95.0);
        assert_eq!(NumericColumn::Attendance.value(ana), 98.0);
        assert_eq!(NumericColumn::FinalAverage.value(ana), 82.0);
    }
}
