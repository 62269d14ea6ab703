use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use arrow::array::{ArrayRef, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use clap::Parser;
use parquet::arrow::ArrowWriter;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};
use serde::Serialize;

/// Write a synthetic student table for trying out the dashboard.
#[derive(Parser, Debug)]
#[command(about, long_about = None)]
struct Args {
    /// Number of students to generate
    #[arg(short = 'n', long, default_value_t = 240)]
    students: usize,

    /// RNG seed; the same seed always yields the same file
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// CSV output path
    #[arg(short, long, default_value = "unidos.csv")]
    output: PathBuf,

    /// Also write a Parquet copy to this path
    #[arg(long, value_name = "FILE")]
    parquet: Option<PathBuf>,
}

const GROUPS: [(&str, f64); 4] = [("A", 4.0), ("B", 0.0), ("C", -3.0), ("D", 1.5)];
const SEMESTERS: i64 = 6;
const FIRST_NAMES: [&str; 12] = [
    "Ana", "Luis", "Marta", "Pablo", "Sofía", "Diego", "Lucía", "Javier", "Elena", "Carlos",
    "Valeria", "Mateo",
];
const LAST_NAMES: [&str; 8] = [
    "García", "López", "Martínez", "Hernández", "Pérez", "Sánchez", "Ramírez", "Torres",
];

/// One CSV row, with the headers the dashboard expects.
#[derive(Debug, Serialize)]
struct Row {
    nombre: String,
    grupo: &'static str,
    semestre: i64,
    calificaciones_matematicas: f64,
    calificaciones_ciencias: f64,
    calificaciones_historia: f64,
    calificaciones_espanol: f64,
    calificaciones_ingles: f64,
    porcentaje_asistencias: f64,
    promedio_final: f64,
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

fn generate(args: &Args) -> Result<Vec<Row>> {
    let mut rng = StdRng::seed_from_u64(args.seed);
    let ability = Normal::new(72.0, 10.0).map_err(|e| anyhow!("{e}"))?;
    let subject_noise = Normal::new(0.0, 7.0).map_err(|e| anyhow!("{e}"))?;
    let attendance_noise = Normal::new(0.0, 6.0).map_err(|e| anyhow!("{e}"))?;

    let rows = (0..args.students)
        .map(|i| {
            let (group, offset) = GROUPS[rng.random_range(0..GROUPS.len())];
            let semester = rng.random_range(1..=SEMESTERS);
            // Later semesters drift slightly upwards.
            let base = ability.sample(&mut rng) + offset + semester as f64 * 0.8;

            let mut subject = || round2((base + subject_noise.sample(&mut rng)).clamp(0.0, 100.0));
            let scores = [subject(), subject(), subject(), subject(), subject()];
            let mean = scores.iter().sum::<f64>() / scores.len() as f64;
            let attendance = round2(
                (55.0 + (base - 40.0) * 0.7 + attendance_noise.sample(&mut rng)).clamp(0.0, 100.0),
            );

            Row {
                nombre: format!(
                    "{} {} {}",
                    FIRST_NAMES[i % FIRST_NAMES.len()],
                    LAST_NAMES[(i / FIRST_NAMES.len()) % LAST_NAMES.len()],
                    i + 1
                ),
                grupo: group,
                semestre: semester,
                calificaciones_matematicas: scores[0],
                calificaciones_ciencias: scores[1],
                calificaciones_historia: scores[2],
                calificaciones_espanol: scores[3],
                calificaciones_ingles: scores[4],
                porcentaje_asistencias: attendance,
                promedio_final: round2(mean),
            }
        })
        .collect();

    Ok(rows)
}

fn write_csv(rows: &[Row], path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("creating {}", path.display()))?;
    for row in rows {
        writer.serialize(row).context("writing CSV row")?;
    }
    writer.flush().context("flushing CSV")?;
    Ok(())
}

fn write_parquet(rows: &[Row], path: &Path) -> Result<()> {
    let float_col = |f: fn(&Row) -> f64| -> ArrayRef {
        Arc::new(Float64Array::from(rows.iter().map(f).collect::<Vec<_>>()))
    };

    let schema = Arc::new(Schema::new(vec![
        Field::new("nombre", DataType::Utf8, false),
        Field::new("grupo", DataType::Utf8, false),
        Field::new("semestre", DataType::Int64, false),
        Field::new("calificaciones_matematicas", DataType::Float64, false),
        Field::new("calificaciones_ciencias", DataType::Float64, false),
        Field::new("calificaciones_historia", DataType::Float64, false),
        Field::new("calificaciones_espanol", DataType::Float64, false),
        Field::new("calificaciones_ingles", DataType::Float64, false),
        Field::new("porcentaje_asistencias", DataType::Float64, false),
        Field::new("promedio_final", DataType::Float64, false),
    ]));

    let columns: Vec<ArrayRef> = vec![
        Arc::new(StringArray::from(
            rows.iter().map(|r| r.nombre.as_str()).collect::<Vec<_>>(),
        )),
        Arc::new(StringArray::from(rows.iter().map(|r| r.grupo).collect::<Vec<_>>())),
        Arc::new(Int64Array::from(rows.iter().map(|r| r.semestre).collect::<Vec<_>>())),
        float_col(|r| r.calificaciones_matematicas),
        float_col(|r| r.calificaciones_ciencias),
        float_col(|r| r.calificaciones_historia),
        float_col(|r| r.calificaciones_espanol),
        float_col(|r| r.calificaciones_ingles),
        float_col(|r| r.porcentaje_asistencias),
        float_col(|r| r.promedio_final),
    ];

    let batch = RecordBatch::try_new(schema.clone(), columns).context("building record batch")?;
    let file = std::fs::File::create(path)
        .with_context(|| format!("creating {}", path.display()))?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating Parquet writer")?;
    writer.write(&batch).context("writing Parquet batch")?;
    writer.close().context("closing Parquet writer")?;
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    let rows = generate(&args)?;

    write_csv(&rows, &args.output)?;
    println!("Wrote {} students to {}", rows.len(), args.output.display());

    if let Some(path) = &args.parquet {
        write_parquet(&rows, path)?;
        println!("Wrote {} students to {}", rows.len(), path.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(seed: u64) -> Args {
        Args {
            students: 50,
            seed,
            output: PathBuf::from("unused.csv"),
            parquet: None,
        }
    }

    #[test]
    fn same_seed_same_rows() {
        let a = generate(&args(7)).unwrap();
        let b = generate(&args(7)).unwrap();
        let avg = |rows: &[Row]| rows.iter().map(|r| r.promedio_final).collect::<Vec<_>>();
        assert_eq!(avg(&a), avg(&b));
    }

    #[test]
    fn values_stay_in_range() {
        for row in generate(&args(1)).unwrap() {
            assert!((1..=SEMESTERS).contains(&row.semestre));
            assert!((0.0..=100.0).contains(&row.porcentaje_asistencias));
            assert!((0.0..=100.0).contains(&row.promedio_final));
        }
    }

    #[test]
    fn csv_round_trips_through_the_dashboard_headers() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("unidos.csv");
        write_csv(&generate(&args(3)).unwrap(), &path).unwrap();
        let header = std::fs::read_to_string(&path).unwrap();
        assert!(header.starts_with(
            "nombre,grupo,semestre,calificaciones_matematicas,calificaciones_ciencias,\
calificaciones_historia,calificaciones_espanol,calificaciones_ingles,porcentaje_asistencias,promedio_final"
        ));
    }
}
