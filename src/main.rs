//! Collision Dashboard - Motor Vehicle Collisions Explorer
//!
//! Loads a collision CSV with Polars and shows where and when people are
//! injured: an injury-threshold map, an hourly density map with a
//! per-minute breakdown, and the most dangerous streets per victim type.

mod charts;
mod config;
mod data;
mod gui;
mod report;

use anyhow::Context;
use clap::Parser;
use config::{Cli, Commands, ReportArgs};
use data::{DatasetLoader, Hour, ViewParams};
use eframe::egui;
use gui::CollisionApp;
use report::DashboardReport;
use std::path::{Path, PathBuf};

fn main() -> anyhow::Result<()> {
    pretty_env_logger::init();
    let Cli {
        data,
        rows,
        command,
    } = Cli::parse();

    match command {
        Some(Commands::Report(args)) => run_report(&data, rows, &args),
        Some(Commands::Gui) | None => run_gui(data, rows),
    }
}

fn run_report(data: &Path, rows: usize, args: &ReportArgs) -> anyhow::Result<()> {
    let hour = Hour::new(args.hour)?;
    let mut loader = DatasetLoader::new(data);
    let dataset = loader
        .load(rows)
        .with_context(|| format!("Failed to load {}", data.display()))?;

    let params = ViewParams {
        min_injured: args.min_injured,
        hour,
        category: args.category.into(),
        raw_rows: args.raw_rows,
    };

    let report = DashboardReport::build(&dataset, params);
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn run_gui(data: PathBuf, rows: usize) -> anyhow::Result<()> {
    // Configure native options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 900.0])
            .with_min_inner_size([1100.0, 700.0])
            .with_title("Motor Vehicle Collisions"),
        ..Default::default()
    };

    eframe::run_native(
        "Collision Dashboard",
        options,
        Box::new(move |cc| Ok(Box::new(CollisionApp::new(cc, data, rows)))),
    )
    .map_err(|e| anyhow::anyhow!("GUI failed: {}", e))
}
