//! Command-line configuration.

use crate::data::VictimCategory;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Rows read from the source when no limit is given.
pub const DEFAULT_ROW_LIMIT: usize = 100_000;

#[derive(Parser, Debug)]
#[command(
    name = "collision_dashboard",
    about = "Interactive dashboard over motor vehicle collision records",
    version
)]
pub struct Cli {
    /// Collision CSV to load
    #[arg(long, env = "COLLISIONS_DATA", default_value = "data.csv")]
    pub data: PathBuf,

    /// Maximum number of rows read from the CSV
    #[arg(long, env = "COLLISIONS_ROWS", default_value_t = DEFAULT_ROW_LIMIT)]
    pub rows: usize,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Open the interactive dashboard (default)
    Gui,
    /// Compute every view once and print it as JSON
    Report(ReportArgs),
}

#[derive(Args, Debug)]
pub struct ReportArgs {
    /// Hour of day (0-23) for the density view and minute histogram
    #[arg(long, default_value_t = 0)]
    pub hour: u32,

    /// Minimum number of persons injured for the injury view
    #[arg(long, default_value_t = 0)]
    pub min_injured: u32,

    /// Victim category for the street ranking
    #[arg(long, value_enum, default_value_t = CategoryArg::Pedestrians)]
    pub category: CategoryArg,

    /// Include up to this many raw rows of the hour view
    #[arg(long)]
    pub raw_rows: Option<usize>,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum CategoryArg {
    Pedestrians,
    Cyclists,
    Motorists,
}

impl From<CategoryArg> for VictimCategory {
    fn from(arg: CategoryArg) -> Self {
        match arg {
            CategoryArg::Pedestrians => VictimCategory::Pedestrians,
            CategoryArg::Cyclists => VictimCategory::Cyclists,
            CategoryArg::Motorists => VictimCategory::Motorists,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_gui_with_standard_limit() {
        let cli = Cli::try_parse_from(["collision_dashboard"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.rows, DEFAULT_ROW_LIMIT);
    }

    #[test]
    fn parses_report_arguments() {
        let cli = Cli::try_parse_from([
            "collision_dashboard",
            "--data",
            "collisions.csv",
            "--rows",
            "500",
            "report",
            "--hour",
            "14",
            "--min-injured",
            "3",
            "--category",
            "cyclists",
        ])
        .unwrap();

        assert_eq!(cli.data, PathBuf::from("collisions.csv"));
        assert_eq!(cli.rows, 500);
        match cli.command {
            Some(Commands::Report(args)) => {
                assert_eq!(args.hour, 14);
                assert_eq!(args.min_injured, 3);
                assert_eq!(VictimCategory::from(args.category), VictimCategory::Cyclists);
                assert!(args.raw_rows.is_none());
            }
            other => panic!("expected report command, got {:?}", other),
        }
    }
}
