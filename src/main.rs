mod app;
mod cli;
mod color;
mod data;
mod report;
mod state;
mod ui;

use anyhow::{Context, Result};
use clap::Parser;
use eframe::egui;

use app::AcademicAnalyzerApp;
use cli::{Args, OutputFormat};
use data::filter::Selection;
use data::loader::load_file;
use report::{render_text, DashboardSummary};
use state::AppState;

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    log::debug!("Arguments: {args:?}");

    if args.report {
        run_report(&args)
    } else {
        run_window(args)
    }
}

/// Compute every view once and print it, without opening a window.
fn run_report(args: &Args) -> Result<()> {
    let dataset = load_file(&args.data)
        .with_context(|| format!("loading student records from {}", args.data.display()))?;
    log::info!(
        "Loaded {} students ({} groups, {} semesters)",
        dataset.len(),
        dataset.groups.len(),
        dataset.semesters.len()
    );

    if dataset.is_empty() {
        log::warn!("{} contains no students", args.data.display());
    }

    let selection = Selection::restricted(&dataset, &args.groups, &args.semesters);
    let summary = DashboardSummary::build(&dataset, &selection, args.threshold);

    match args.format {
        OutputFormat::Text => print!("{}", render_text(&summary)),
        OutputFormat::Json => println!(
            "{}",
            serde_json::to_string_pretty(&summary).context("serializing summary")?
        ),
    }
    Ok(())
}

fn run_window(args: Args) -> Result<()> {
    let mut state = AppState::with_threshold(args.threshold);
    state.load_path(&args.data);
    state.restrict(&args.groups, &args.semesters);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 900.0])
            .with_min_inner_size([700.0, 500.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Academic Analyzer",
        options,
        Box::new(|_cc| Ok(Box::new(AcademicAnalyzerApp::new(state)))),
    )
    .map_err(|e| anyhow::anyhow!("window error: {e}"))
}
