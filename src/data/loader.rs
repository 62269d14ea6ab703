use std::fs::File;
use std::path::Path;

use arrow::array::{
    Array, ArrayRef, AsArray, Float32Array, Float64Array, Int32Array, Int64Array, StringArray,
};
use arrow::datatypes::DataType;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::error::{DataError, Result};
use super::model::{
    Category, NumericColumn, StudentDataset, StudentRecord, GROUP_HEADER, NAME_HEADER,
    SEMESTER_HEADER,
};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a student table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – one header row, one student per line (the usual export)
/// * `.json`    – `[{ "grupo": "A", "semestre": 1, ... }, ...]`
/// * `.parquet` – flat columns with the same names as the CSV headers
///
/// Header names are matched ignoring surrounding whitespace and ASCII case.
/// Extra columns are ignored; the name column is optional.
pub fn load_file(path: &Path) -> Result<StudentDataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let records = match ext.as_str() {
        "csv" => load_csv(path)?,
        "json" => load_json(path)?,
        "parquet" | "pq" => load_parquet(path)?,
        other => return Err(DataError::UnsupportedExtension(other.to_string())),
    };

    Ok(StudentDataset::from_records(records))
}

fn open(path: &Path) -> Result<File> {
    File::open(path).map_err(|source| DataError::Io {
        path: path.to_path_buf(),
        source,
    })
}

// ---------------------------------------------------------------------------
// Row assembly shared by every format
// ---------------------------------------------------------------------------

/// Raw values of one row after format-specific extraction.
struct RawRow {
    /// 1-based data row number, for error messages.
    row: usize,
    name: Option<String>,
    group: Category,
    semester: Category,
    /// Indexed like [`NumericColumn::ALL`].
    values: [f64; 7],
}

fn build_record(raw: RawRow) -> Result<StudentRecord> {
    for (column, &value) in NumericColumn::ALL.iter().zip(raw.values.iter()) {
        check_range(raw.row, *column, value)?;
    }
    let [mathematics, science, history, spanish, english, attendance, final_average] = raw.values;

    Ok(StudentRecord {
        name: raw
            .name
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| format!("student {}", raw.row)),
        group: raw.group,
        semester: raw.semester,
        mathematics,
        science,
        history,
        spanish,
        english,
        attendance,
        final_average,
    })
}

/// Scores must be finite and non-negative; attendance is a percentage.
fn check_range(row: usize, column: NumericColumn, value: f64) -> Result<()> {
    let ok = match column {
        NumericColumn::Attendance => (0.0..=100.0).contains(&value),
        _ => value.is_finite() && value >= 0.0,
    };
    if ok {
        Ok(())
    } else {
        Err(DataError::OutOfRange {
            row,
            column: column.header().to_string(),
            value,
        })
    }
}

fn parse_number(row: usize, column: &str, s: &str) -> Result<f64> {
    s.trim()
        .parse::<f64>()
        .map_err(|_| DataError::InvalidNumber {
            row,
            column: column.to_string(),
            value: s.to_string(),
        })
}

fn parse_category(row: usize, column: &str, s: &str) -> Result<Category> {
    if s.trim().is_empty() {
        return Err(DataError::EmptyCategory {
            row,
            column: column.to_string(),
        });
    }
    Ok(Category::parse(s))
}

fn header_matches(header: &str, wanted: &str) -> bool {
    header.trim().eq_ignore_ascii_case(wanted)
}

fn missing(column: &str) -> DataError {
    DataError::MissingColumn {
        column: column.to_string(),
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// Positions of the known columns inside a header row.
struct ColumnPositions {
    name: Option<usize>,
    group: usize,
    semester: usize,
    numeric: [usize; 7],
}

impl ColumnPositions {
    fn resolve(headers: &[&str]) -> Result<Self> {
        let find = |wanted: &str| headers.iter().position(|h| header_matches(h, wanted));

        let mut numeric = [0usize; 7];
        for (slot, column) in numeric.iter_mut().zip(NumericColumn::ALL) {
            *slot = find(column.header()).ok_or_else(|| missing(column.header()))?;
        }

        Ok(ColumnPositions {
            name: find(NAME_HEADER),
            group: find(GROUP_HEADER).ok_or_else(|| missing(GROUP_HEADER))?,
            semester: find(SEMESTER_HEADER).ok_or_else(|| missing(SEMESTER_HEADER))?,
            numeric,
        })
    }
}

fn load_csv(path: &Path) -> Result<Vec<StudentRecord>> {
    read_csv(open(path)?)
}

/// Parse CSV text from any reader. The first line must be the header.
pub fn read_csv<R: std::io::Read>(reader: R) -> Result<Vec<StudentRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let headers = reader.headers()?.clone();
    let cols = ColumnPositions::resolve(&headers.iter().collect::<Vec<_>>())?;

    let mut records = Vec::new();
    for (i, result) in reader.records().enumerate() {
        let row = i + 1;
        let record = result?;
        let cell = |idx: usize| record.get(idx).unwrap_or("");

        let mut values = [0.0; 7];
        for ((slot, column), &idx) in values
            .iter_mut()
            .zip(NumericColumn::ALL)
            .zip(cols.numeric.iter())
        {
            *slot = parse_number(row, column.header(), cell(idx))?;
        }

        records.push(build_record(RawRow {
            row,
            name: cols.name.map(|idx| cell(idx).to_string()),
            group: parse_category(row, GROUP_HEADER, cell(cols.group))?,
            semester: parse_category(row, SEMESTER_HEADER, cell(cols.semester))?,
            values,
        })?);
    }

    Ok(records)
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "nombre": "Ana", "grupo": "A", "semestre": 1,
///     "calificaciones_matematicas": 95.0, ..., "promedio_final": 88.2 },
///   ...
/// ]
/// ```
fn load_json(path: &Path) -> Result<Vec<StudentRecord>> {
    let root: JsonValue = serde_json::from_reader(std::io::BufReader::new(open(path)?))?;
    parse_json(&root)
}

fn parse_json(root: &JsonValue) -> Result<Vec<StudentRecord>> {
    let rows = root
        .as_array()
        .ok_or_else(|| DataError::Malformed("expected a top-level JSON array".into()))?;

    let mut records = Vec::with_capacity(rows.len());
    for (i, value) in rows.iter().enumerate() {
        let row = i + 1;
        let obj = value
            .as_object()
            .ok_or_else(|| DataError::Malformed(format!("Row {row} is not a JSON object")))?;
        let field = |wanted: &str| {
            obj.iter()
                .find(|(k, _)| header_matches(k, wanted))
                .map(|(_, v)| v)
        };

        let mut values = [0.0; 7];
        for (slot, column) in values.iter_mut().zip(NumericColumn::ALL) {
            let header = column.header();
            let v = field(header).ok_or_else(|| missing(header))?;
            *slot = json_number(row, header, v)?;
        }

        let name = field(NAME_HEADER).and_then(|v| match v {
            JsonValue::String(s) => Some(s.clone()),
            JsonValue::Null => None,
            other => Some(other.to_string()),
        });

        records.push(build_record(RawRow {
            row,
            name,
            group: json_category(row, GROUP_HEADER, field(GROUP_HEADER))?,
            semester: json_category(row, SEMESTER_HEADER, field(SEMESTER_HEADER))?,
            values,
        })?);
    }

    Ok(records)
}

fn json_number(row: usize, column: &str, value: &JsonValue) -> Result<f64> {
    match value {
        JsonValue::Number(n) => n.as_f64().ok_or_else(|| DataError::InvalidNumber {
            row,
            column: column.to_string(),
            value: n.to_string(),
        }),
        JsonValue::String(s) => parse_number(row, column, s),
        other => Err(DataError::InvalidNumber {
            row,
            column: column.to_string(),
            value: other.to_string(),
        }),
    }
}

fn json_category(row: usize, column: &str, value: Option<&JsonValue>) -> Result<Category> {
    match value {
        None => Err(missing(column)),
        Some(JsonValue::String(s)) => parse_category(row, column, s),
        Some(JsonValue::Number(n)) => Ok(match n.as_i64() {
            Some(i) => Category::Integer(i),
            None => Category::Text(n.to_string()),
        }),
        Some(JsonValue::Null) => Err(DataError::EmptyCategory {
            row,
            column: column.to_string(),
        }),
        Some(other) => Ok(Category::Text(other.to_string())),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with one flat column per field.
///
/// Numeric columns may be Float64, Float32, Int64, Int32 or numeric text;
/// group and semester may be Utf8, LargeUtf8, Int64 or Int32.
fn load_parquet(path: &Path) -> Result<Vec<StudentRecord>> {
    let builder = ParquetRecordBatchReaderBuilder::try_new(open(path)?)?;
    let reader = builder.build()?;

    let mut records = Vec::new();
    let mut row = 0usize;

    for batch_result in reader {
        let batch = batch_result?;
        let schema = batch.schema();
        let find = |wanted: &str| {
            schema
                .fields()
                .iter()
                .position(|f| header_matches(f.name(), wanted))
        };

        let group_col = batch.column(find(GROUP_HEADER).ok_or_else(|| missing(GROUP_HEADER))?);
        let semester_col =
            batch.column(find(SEMESTER_HEADER).ok_or_else(|| missing(SEMESTER_HEADER))?);
        let name_col = find(NAME_HEADER).map(|idx| batch.column(idx));
        let numeric_cols = NumericColumn::ALL
            .iter()
            .map(|c| {
                find(c.header())
                    .map(|idx| batch.column(idx))
                    .ok_or_else(|| missing(c.header()))
            })
            .collect::<Result<Vec<_>>>()?;

        for batch_row in 0..batch.num_rows() {
            row += 1;
            let mut values = [0.0; 7];
            for ((slot, column), col) in values
                .iter_mut()
                .zip(NumericColumn::ALL)
                .zip(numeric_cols.iter())
            {
                *slot = arrow_number(col, batch_row).ok_or_else(|| DataError::InvalidNumber {
                    row,
                    column: column.header().to_string(),
                    value: describe_cell(col, batch_row),
                })?;
            }

            records.push(build_record(RawRow {
                row,
                name: name_col.and_then(|col| arrow_text(col, batch_row)),
                group: arrow_category(row, GROUP_HEADER, group_col, batch_row)?,
                semester: arrow_category(row, SEMESTER_HEADER, semester_col, batch_row)?,
                values,
            })?);
        }
    }

    Ok(records)
}

// -- Arrow helpers --

fn arrow_number(col: &ArrayRef, row: usize) -> Option<f64> {
    if col.is_null(row) {
        return None;
    }
    match col.data_type() {
        DataType::Float64 => col
            .as_any()
            .downcast_ref::<Float64Array>()
            .map(|a| a.value(row)),
        DataType::Float32 => col
            .as_any()
            .downcast_ref::<Float32Array>()
            .map(|a| f64::from(a.value(row))),
        DataType::Int64 => col
            .as_any()
            .downcast_ref::<Int64Array>()
            .map(|a| a.value(row) as f64),
        DataType::Int32 => col
            .as_any()
            .downcast_ref::<Int32Array>()
            .map(|a| f64::from(a.value(row))),
        DataType::Utf8 | DataType::LargeUtf8 => {
            arrow_text(col, row).and_then(|s| s.trim().parse().ok())
        }
        _ => None,
    }
}

fn arrow_text(col: &ArrayRef, row: usize) -> Option<String> {
    if col.is_null(row) {
        return None;
    }
    match col.data_type() {
        DataType::Utf8 => col
            .as_any()
            .downcast_ref::<StringArray>()
            .map(|a| a.value(row).to_string()),
        DataType::LargeUtf8 => Some(col.as_string::<i64>().value(row).to_string()),
        _ => None,
    }
}

fn arrow_category(row: usize, column: &str, col: &ArrayRef, batch_row: usize) -> Result<Category> {
    if col.is_null(batch_row) {
        return Err(DataError::EmptyCategory {
            row,
            column: column.to_string(),
        });
    }
    match col.data_type() {
        DataType::Int64 | DataType::Int32 => arrow_number(col, batch_row)
            .map(|v| Category::Integer(v as i64))
            .ok_or_else(|| DataError::Malformed(format!("Row {row}: unreadable '{column}'"))),
        DataType::Utf8 | DataType::LargeUtf8 => {
            let text = arrow_text(col, batch_row).unwrap_or_default();
            parse_category(row, column, &text)
        }
        other => Err(DataError::Malformed(format!(
            "Column '{column}' has unsupported type {other:?}"
        ))),
    }
}

fn describe_cell(col: &ArrayRef, row: usize) -> String {
    if col.is_null(row) {
        return "<null>".to_string();
    }
    arrow_text(col, row).unwrap_or_else(|| format!("{:?}", col.data_type()))
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::sync::Arc;

    use arrow::datatypes::{Field, Schema};
    use arrow::record_batch::RecordBatch;
    use parquet::arrow::ArrowWriter;

    use super::*;

    const HEADER: &str = "nombre,grupo,semestre,calificaciones_matematicas,calificaciones_ciencias,\
calificaciones_historia,calificaciones_espanol,calificaciones_ingles,porcentaje_asistencias,promedio_final";

    fn write_temp(ext: &str, contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(&format!(".{ext}"))
            .tempfile()
            .unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn loads_csv_with_all_columns() {
        let csv = format!(
            "{HEADER}\nAna,A,1,95,80,70,85,90,98,84\nLuis,B,2,55,60,65,70,50,72.5,60\n"
        );
        let file = write_temp("csv", &csv);
        let ds = load_file(file.path()).unwrap();

        assert_eq!(ds.len(), 2);
        assert_eq!(ds.records[0].name, "Ana");
        assert_eq!(ds.records[0].group, Category::Text("A".into()));
        assert_eq!(ds.records[1].semester, Category::Integer(2));
        assert_eq!(ds.records[1].attendance, 72.5);
        assert_eq!(ds.records[1].final_average, 60.0);
        assert_eq!(ds.groups.len(), 2);
    }

    #[test]
    fn csv_headers_ignore_case_order_and_extra_columns() {
        let csv = "Promedio_Final, extra ,GRUPO,semestre,calificaciones_matematicas,calificaciones_ciencias,\
calificaciones_historia,calificaciones_espanol,calificaciones_ingles,porcentaje_asistencias\n\
77,x,C,3,1,2,3,4,5,50\n";
        let records = read_csv(csv.as_bytes()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].final_average, 77.0);
        assert_eq!(records[0].mathematics, 1.0);
        // no name column: synthesised from the row number
        assert_eq!(records[0].name, "student 1");
    }

    #[test]
    fn missing_column_is_reported_by_name() {
        let csv = "nombre,grupo,semestre\nAna,A,1\n";
        let err = read_csv(csv.as_bytes()).unwrap_err();
        assert!(matches!(
            err,
            DataError::MissingColumn { ref column } if column == "calificaciones_matematicas"
        ));
    }

    #[test]
    fn malformed_number_names_row_and_column() {
        let csv = format!("{HEADER}\nAna,A,1,95,80,70,85,90,98,84\nLuis,B,2,55,sixty,65,70,50,72,60\n");
        let err = read_csv(csv.as_bytes()).unwrap_err();
        match err {
            DataError::InvalidNumber { row, column, value } => {
                assert_eq!(row, 2);
                assert_eq!(column, "calificaciones_ciencias");
                assert_eq!(value, "sixty");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn attendance_above_hundred_is_rejected() {
        let csv = format!("{HEADER}\nAna,A,1,95,80,70,85,90,101,84\n");
        let err = read_csv(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, DataError::OutOfRange { row: 1, .. }));
    }

    #[test]
    fn empty_group_is_rejected() {
        let csv = format!("{HEADER}\nAna,,1,95,80,70,85,90,99,84\n");
        let err = read_csv(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, DataError::EmptyCategory { row: 1, .. }));
    }

    #[test]
    fn header_only_file_is_an_empty_dataset() {
        let records = read_csv(format!("{HEADER}\n").as_bytes()).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn unsupported_extension_fails_fast() {
        let file = write_temp("xlsx", "");
        let err = load_file(file.path()).unwrap_err();
        assert!(matches!(err, DataError::UnsupportedExtension(ref e) if e == "xlsx"));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = load_file(Path::new("/definitely/not/here.csv")).unwrap_err();
        assert!(matches!(err, DataError::Io { .. }));
        assert!(err.to_string().contains("/definitely/not/here.csv"));
    }

    #[test]
    fn loads_json_records() {
        let json = r#"[
            {"nombre": "Ana", "grupo": "A", "semestre": 1,
             "calificaciones_matematicas": 95, "calificaciones_ciencias": 80.5,
             "calificaciones_historia": "70", "calificaciones_espanol": 85,
             "calificaciones_ingles": 90, "porcentaje_asistencias": 98,
             "promedio_final": 84.1}
        ]"#;
        let file = write_temp("json", json);
        let ds = load_file(file.path()).unwrap();
        assert_eq!(ds.len(), 1);
        let r = &ds.records[0];
        assert_eq!(r.semester, Category::Integer(1));
        assert_eq!(r.science, 80.5);
        assert_eq!(r.history, 70.0);
        assert_eq!(r.final_average, 84.1);
    }

    #[test]
    fn json_must_be_an_array() {
        let err = parse_json(&serde_json::json!({"grupo": "A"})).unwrap_err();
        assert!(matches!(err, DataError::Malformed(_)));
    }

    #[test]
    fn loads_parquet_columns() {
        let mut fields = vec![
            Field::new("nombre", DataType::Utf8, false),
            Field::new("grupo", DataType::Utf8, false),
            Field::new("semestre", DataType::Int64, false),
        ];
        let mut columns: Vec<ArrayRef> = vec![
            Arc::new(StringArray::from(vec!["Ana", "Luis"])),
            Arc::new(StringArray::from(vec!["A", "B"])),
            Arc::new(Int64Array::from(vec![1, 2])),
        ];
        for column in NumericColumn::ALL {
            fields.push(Field::new(column.header(), DataType::Float64, false));
            columns.push(Arc::new(Float64Array::from(vec![80.0, 60.0])));
        }
        let schema = Arc::new(Schema::new(fields));
        let batch = RecordBatch::try_new(schema.clone(), columns).unwrap();

        let file = tempfile::Builder::new().suffix(".parquet").tempfile().unwrap();
        let mut writer = ArrowWriter::try_new(file.reopen().unwrap(), schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let ds = load_file(file.path()).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.records[1].name, "Luis");
        assert_eq!(ds.records[1].semester, Category::Integer(2));
        assert_eq!(ds.records[0].final_average, 80.0);
    }
}
