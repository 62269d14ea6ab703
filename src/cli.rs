//! Command-line interface argument parsing.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::data::model::Category;
use crate::data::select::DEFAULT_THRESHOLD;

/// Academic Analyzer - student performance dashboard
///
/// Loads a table of student records and shows per-subject averages,
/// attendance vs performance, correlations between subjects, semester
/// trends and the list of distinguished students.
///
/// Examples:
///   academic-analyzer
///   academic-analyzer data/unidos.csv --threshold 85
///   academic-analyzer --report --group A --group B --semester 2
///   academic-analyzer --report --format json > summary.json
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Student table to load (.csv, .json or .parquet)
    #[arg(
        value_name = "FILE",
        default_value = "unidos.csv",
        env = "ACADEMIC_ANALYZER_DATA"
    )]
    pub data: PathBuf,

    /// Minimum final average of a distinguished student
    #[arg(
        short,
        long,
        default_value_t = DEFAULT_THRESHOLD,
        env = "ACADEMIC_ANALYZER_THRESHOLD",
        value_parser = parse_threshold
    )]
    pub threshold: f64,

    /// Only include this group (repeatable; default: all groups)
    #[arg(short, long = "group", value_name = "GROUP", value_parser = parse_category)]
    pub groups: Vec<Category>,

    /// Only include this semester (repeatable; default: all semesters)
    #[arg(short, long = "semester", value_name = "SEMESTER", value_parser = parse_category)]
    pub semesters: Vec<Category>,

    /// Print the summary and exit instead of opening the window
    #[arg(short, long)]
    pub report: bool,

    /// Output format for --report
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

/// Report output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

fn parse_threshold(s: &str) -> Result<f64, String> {
    let value: f64 = s
        .trim()
        .parse()
        .map_err(|_| format!("'{s}' is not a number"))?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(format!("'{s}' is not a finite number"))
    }
}

fn parse_category(s: &str) -> Result<Category, String> {
    if s.trim().is_empty() {
        return Err("value must not be empty".to_string());
    }
    Ok(Category::parse(s))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let args = Args::try_parse_from(["academic-analyzer"]).unwrap();
        assert_eq!(args.threshold, DEFAULT_THRESHOLD);
        assert!(args.groups.is_empty());
        assert!(!args.report);
        assert_eq!(args.format, OutputFormat::Text);
    }

    #[test]
    fn repeated_filters_and_report_mode() {
        let args = Args::try_parse_from([
            "academic-analyzer",
            "students.csv",
            "--group",
            "A",
            "-g",
            "B",
            "--semester",
            "3",
            "--threshold",
            "85.5",
            "--report",
            "--format",
            "json",
        ])
        .unwrap();
        assert_eq!(args.data, PathBuf::from("students.csv"));
        assert_eq!(args.groups, vec![Category::from("A"), Category::from("B")]);
        assert_eq!(args.semesters, vec![Category::Integer(3)]);
        assert_eq!(args.threshold, 85.5);
        assert!(args.report);
        assert_eq!(args.format, OutputFormat::Json);
    }

    #[test]
    fn rejects_non_numeric_threshold() {
        assert!(Args::try_parse_from(["academic-analyzer", "--threshold", "high"]).is_err());
        assert!(Args::try_parse_from(["academic-analyzer", "--threshold", "NaN"]).is_err());
    }
}
