mod output;

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use serde::Serialize;

use crate::config::AppConfig;
use crate::services::dashboard::DashboardSnapshot;
use crate::services::format::{format_currency, format_volume};
use crate::services::{
    Aggregator, BranchFilter, DataLoaderService, Dataset, Granularity, LandingDashboard,
    MonthlyComparison, ReportPeriod, Scope, Sheet,
};
use crate::types::{AggregatedSeries, AggregatedTable, DriverRanking, Measure, Share};

use output::{format_measure, write_dashboard, write_distribution, write_json, write_sheet};

/// Branch, volume and driver sales reports
#[derive(Parser)]
#[command(name = "salesboard")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Config file (TOML)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Dataset JSON, overrides the configured path
    #[arg(long, global = true, value_name = "PATH")]
    data: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Launch interactive TUI (default)
    Tui,

    /// Branch cash or volume sales by day, or by month with --yearly
    Branch {
        #[command(flatten)]
        period: PeriodArgs,

        /// Show the whole year by month
        #[arg(long)]
        yearly: bool,

        /// Quantity to report
        #[arg(long, value_enum, default_value_t = Measure::Cash)]
        measure: Measure,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Driver volume with ranking
    Drivers {
        #[command(flatten)]
        period: PeriodArgs,

        /// Show the whole year by month
        #[arg(long)]
        yearly: bool,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Same month across the previous, selected and next year
    Compare {
        #[command(flatten)]
        period: PeriodArgs,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Generated daily sales overview
    Dashboard {
        /// Branch to show ("All" for every branch)
        #[arg(long, default_value = "All")]
        branch: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Report period; unset parts fall back to the configured period
#[derive(Args, Debug, Clone, Copy, Default)]
struct PeriodArgs {
    /// Report year
    #[arg(long)]
    year: Option<i32>,

    /// Report month (1-12)
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=12))]
    month: Option<u32>,
}

impl PeriodArgs {
    fn resolve(self, fallback: ReportPeriod) -> ReportPeriod {
        ReportPeriod::new(
            self.year.unwrap_or(fallback.year),
            self.month.unwrap_or(fallback.month),
        )
        .unwrap_or(fallback)
    }
}

#[derive(Args, Debug, Clone, Default)]
#[group(multiple = false)]
struct OutputArgs {
    /// Output as JSON
    #[arg(long)]
    json: bool,

    /// Output as CSV (spreadsheet layout)
    #[arg(long)]
    csv: bool,

    /// Write the spreadsheet to DIR under its report file name
    #[arg(long, value_name = "DIR")]
    export: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum OutputFormat {
    Text,
    Json,
    Csv,
    Export(PathBuf),
}

impl From<OutputArgs> for OutputFormat {
    fn from(args: OutputArgs) -> Self {
        if let Some(dir) = args.export {
            Self::Export(dir)
        } else if args.json {
            Self::Json
        } else if args.csv {
            Self::Csv
        } else {
            Self::Text
        }
    }
}

#[derive(Serialize)]
struct BranchJson<'a> {
    period: ReportPeriod,
    scope: Scope,
    measure: Measure,
    series: &'a AggregatedSeries,
    table: &'a AggregatedTable,
    distribution: Vec<Share>,
}

#[derive(Serialize)]
struct DriversJson<'a> {
    period: ReportPeriod,
    scope: Scope,
    series: &'a AggregatedSeries,
    table: &'a AggregatedTable,
    ranking: &'a DriverRanking,
    distribution: Vec<Share>,
}

#[derive(Serialize)]
struct CompareJson<'a> {
    #[serde(flatten)]
    comparison: &'a MonthlyComparison,
    charts: Vec<AggregatedSeries>,
}

impl Cli {
    /// The TUI owns the terminal, so logs must not go to stderr
    pub fn is_interactive(&self) -> bool {
        matches!(self.command, None | Some(Commands::Tui))
    }

    pub fn run(self, config: AppConfig) -> anyhow::Result<()> {
        let fallback = config.initial_period();
        let data_path = self.data.or(config.data.path);
        let load = || {
            DataLoaderService::new(data_path.clone())
                .load()
                .context("failed to load dataset")
        };

        let stdout = io::stdout();
        let mut out = stdout.lock();

        match self.command {
            None | Some(Commands::Tui) => crate::tui::run(load()?, fallback),
            Some(Commands::Branch {
                period,
                yearly,
                measure,
                output,
            }) => {
                let dataset = load()?;
                let scope = if yearly { Scope::Yearly } else { Scope::Monthly };
                branch_command(
                    &mut out,
                    &dataset,
                    period.resolve(fallback),
                    scope,
                    measure,
                    output.into(),
                )
            }
            Some(Commands::Drivers {
                period,
                yearly,
                output,
            }) => {
                let dataset = load()?;
                let scope = if yearly { Scope::Yearly } else { Scope::Monthly };
                drivers_command(
                    &mut out,
                    &dataset,
                    period.resolve(fallback),
                    scope,
                    output.into(),
                )
            }
            Some(Commands::Compare { period, output }) => {
                let dataset = load()?;
                compare_command(&mut out, &dataset, period.resolve(fallback), output.into())
            }
            Some(Commands::Dashboard { branch, json }) => {
                dashboard_command(&mut out, BranchFilter::parse(&branch), json)
            }
        }
    }
}

fn branch_command<W: Write>(
    out: &mut W,
    dataset: &Dataset,
    period: ReportPeriod,
    scope: Scope,
    measure: Measure,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let report = Aggregator::branch_report(
        &dataset.branch_sales,
        dataset.branches(),
        period,
        scope,
        measure,
    );
    let granularity = scope.granularity(period);
    let sheet = Sheet::branch_table(measure, granularity, &report.table);

    match format {
        OutputFormat::Json => write_json(
            out,
            &BranchJson {
                period,
                scope,
                measure,
                series: &report.series,
                table: &report.table,
                distribution: report.table.distribution(),
            },
        ),
        OutputFormat::Csv => Ok(sheet.write_csv(out)?),
        OutputFormat::Export(dir) => export_sheet(out, &sheet, &dir),
        OutputFormat::Text => {
            let title = scope.title(measure.label(), period);
            write_sheet(out, &title, &sheet, |_, v| format_measure(measure, v))?;
            write_distribution(out, &report.table.distribution(), |v| {
                format_measure(measure, v)
            })?;
            Ok(())
        }
    }
}

fn drivers_command<W: Write>(
    out: &mut W,
    dataset: &Dataset,
    period: ReportPeriod,
    scope: Scope,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let driver_report = Aggregator::driver_report(&dataset.driver_sales, period, scope);
    let granularity: Granularity = scope.granularity(period);
    let ranking = &driver_report.ranking;
    let sheet = Sheet::driver_ranking(granularity, ranking);

    match format {
        OutputFormat::Json => write_json(
            out,
            &DriversJson {
                period,
                scope,
                series: &driver_report.report.series,
                table: &driver_report.report.table,
                ranking,
                distribution: ranking.distribution(),
            },
        ),
        OutputFormat::Csv => Ok(sheet.write_csv(out)?),
        OutputFormat::Export(dir) => export_sheet(out, &sheet, &dir),
        OutputFormat::Text => {
            let title = scope.title("Driver Volume", period);
            write_sheet(out, &title, &sheet, |_, v| format_volume(v))?;
            write_distribution(out, &ranking.distribution(), format_volume)?;
            Ok(())
        }
    }
}

fn compare_command<W: Write>(
    out: &mut W,
    dataset: &Dataset,
    period: ReportPeriod,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let comparison = MonthlyComparison::build(&dataset.branch_sales, dataset.branches(), period);
    let sheet = Sheet::comparison(&comparison);

    match format {
        OutputFormat::Json => write_json(
            out,
            &CompareJson {
                comparison: &comparison,
                charts: comparison.years().iter().map(|y| y.chart()).collect(),
            },
        ),
        OutputFormat::Csv => Ok(sheet.write_csv(out)?),
        OutputFormat::Export(dir) => export_sheet(out, &sheet, &dir),
        OutputFormat::Text => {
            let title = format!("Monthly Comparison - {}", period.title());
            // Odd columns are cash, even columns tons
            write_sheet(out, &title, &sheet, |col, v| {
                if col % 2 == 1 {
                    format_currency(v)
                } else {
                    format_volume(v)
                }
            })?;
            writeln!(out)?;
            for year in comparison.years() {
                writeln!(
                    out,
                    "  {}  {:>14}  {:>14}",
                    year.year,
                    format_currency(year.total_cash()),
                    format_volume(year.total_volume())
                )?;
            }
            Ok(())
        }
    }
}

fn export_sheet<W: Write>(out: &mut W, sheet: &Sheet, dir: &Path) -> anyhow::Result<()> {
    let path = sheet
        .export_to(dir)
        .with_context(|| format!("failed to export {} to {}", sheet.name, dir.display()))?;
    writeln!(out, "Exported {} to {}", sheet.name, path.display())?;
    Ok(())
}

fn dashboard_command<W: Write>(out: &mut W, filter: BranchFilter, json: bool) -> anyhow::Result<()> {
    let mut dashboard = LandingDashboard::default();
    if !dashboard.filters().contains(&filter) {
        let known: Vec<String> = dashboard
            .filters()
            .iter()
            .map(|f| f.label().to_string())
            .collect();
        anyhow::bail!(
            "unknown branch '{}' (expected one of: {})",
            filter.label(),
            known.join(", ")
        );
    }
    dashboard.select(filter);
    let snapshot: &DashboardSnapshot = dashboard.snapshot();

    if json {
        write_json(out, snapshot)
    } else {
        Ok(write_dashboard(out, snapshot)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{BranchSale, DriverSale};
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn scenario_dataset() -> Dataset {
        Dataset::new(
            vec!["Molo".into(), "Oton".into()],
            vec![
                BranchSale::new(date(2026, 1, 1), "Molo", 100.0, 1.0),
                BranchSale::new(date(2026, 1, 1), "Oton", 50.0, 2.0),
                BranchSale::new(date(2025, 1, 3), "Molo", 70.0, 0.5),
            ],
            vec![
                DriverSale::new(date(2026, 1, 2), "DRV-002", "Carlos Reyes", 4.5),
                DriverSale::new(date(2026, 1, 4), "DRV-001", "John Martinez", 8.0),
            ],
        )
    }

    fn jan_2026() -> ReportPeriod {
        ReportPeriod::new(2026, 1).unwrap()
    }

    fn capture<F>(f: F) -> String
    where
        F: FnOnce(&mut Vec<u8>) -> anyhow::Result<()>,
    {
        let mut out = Vec::new();
        f(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    // ========== Parse tests ==========

    #[test]
    fn test_cli_parse_no_args() {
        let cli = Cli::try_parse_from(["salesboard"]).unwrap();
        assert!(cli.command.is_none());
        assert!(cli.is_interactive());
    }

    #[test]
    fn test_cli_parse_tui() {
        let cli = Cli::try_parse_from(["salesboard", "tui"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Tui)));
        assert!(cli.is_interactive());
    }

    #[test]
    fn test_cli_parse_branch_defaults() {
        let cli = Cli::try_parse_from(["salesboard", "branch"]).unwrap();
        assert!(!cli.is_interactive());
        match cli.command {
            Some(Commands::Branch {
                period,
                yearly,
                measure,
                output,
            }) => {
                assert_eq!(period.year, None);
                assert_eq!(period.month, None);
                assert!(!yearly);
                assert_eq!(measure, Measure::Cash);
                assert_eq!(OutputFormat::from(output), OutputFormat::Text);
            }
            _ => panic!("expected branch command"),
        }
    }

    #[test]
    fn test_cli_parse_branch_full() {
        let cli = Cli::try_parse_from([
            "salesboard",
            "branch",
            "--year",
            "2025",
            "--month",
            "7",
            "--yearly",
            "--measure",
            "volume",
            "--csv",
        ])
        .unwrap();
        match cli.command {
            Some(Commands::Branch {
                period,
                yearly,
                measure,
                output,
            }) => {
                assert_eq!(period.resolve(jan_2026()), ReportPeriod::new(2025, 7).unwrap());
                assert!(yearly);
                assert_eq!(measure, Measure::Volume);
                assert_eq!(OutputFormat::from(output), OutputFormat::Csv);
            }
            _ => panic!("expected branch command"),
        }
    }

    #[test]
    fn test_cli_rejects_month_out_of_range() {
        assert!(Cli::try_parse_from(["salesboard", "branch", "--month", "13"]).is_err());
        assert!(Cli::try_parse_from(["salesboard", "drivers", "--month", "0"]).is_err());
    }

    #[test]
    fn test_cli_rejects_json_with_csv() {
        assert!(Cli::try_parse_from(["salesboard", "compare", "--json", "--csv"]).is_err());
    }

    #[test]
    fn test_cli_parse_export_dir() {
        let cli =
            Cli::try_parse_from(["salesboard", "drivers", "--export", "/tmp/reports"]).unwrap();
        match cli.command {
            Some(Commands::Drivers { output, .. }) => {
                assert_eq!(
                    OutputFormat::from(output),
                    OutputFormat::Export(PathBuf::from("/tmp/reports"))
                );
            }
            _ => panic!("expected drivers command"),
        }
        assert!(
            Cli::try_parse_from(["salesboard", "branch", "--csv", "--export", "/tmp"]).is_err()
        );
    }

    #[test]
    fn test_cli_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "salesboard",
            "drivers",
            "--data",
            "/tmp/data.json",
            "--config",
            "/tmp/salesboard.toml",
        ])
        .unwrap();
        assert_eq!(cli.data, Some(PathBuf::from("/tmp/data.json")));
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/salesboard.toml")));
    }

    #[test]
    fn test_cli_parse_dashboard() {
        let cli = Cli::try_parse_from(["salesboard", "dashboard", "--branch", "Oton", "--json"])
            .unwrap();
        match cli.command {
            Some(Commands::Dashboard { branch, json }) => {
                assert_eq!(BranchFilter::parse(&branch), BranchFilter::Branch("Oton".into()));
                assert!(json);
            }
            _ => panic!("expected dashboard command"),
        }
    }

    #[test]
    fn test_period_args_fall_back_per_field() {
        let args = PeriodArgs {
            year: None,
            month: Some(3),
        };
        assert_eq!(args.resolve(jan_2026()), ReportPeriod::new(2026, 3).unwrap());
        assert_eq!(PeriodArgs::default().resolve(jan_2026()), jan_2026());
    }

    // ========== Command output tests ==========

    #[test]
    fn test_branch_command_csv() {
        let dataset = scenario_dataset();
        let csv = capture(|out| {
            branch_command(
                out,
                &dataset,
                jan_2026(),
                Scope::Monthly,
                Measure::Cash,
                OutputFormat::Csv,
            )
        });
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "Date,Molo,Oton,Daily Total");
        assert_eq!(lines[1], "2026-01-01,100,50,150");
        assert_eq!(lines.len(), 33);
        assert_eq!(lines[32], "TOTAL,100,50,150");
    }

    #[test]
    fn test_branch_command_text_volume() {
        let dataset = scenario_dataset();
        let text = capture(|out| {
            branch_command(
                out,
                &dataset,
                jan_2026(),
                Scope::Monthly,
                Measure::Volume,
                OutputFormat::Text,
            )
        });
        assert!(text.starts_with("Volume Sales - January 2026"));
        assert!(text.contains("3.00 MT"));
        assert!(text.contains("Distribution"));
    }

    #[test]
    fn test_branch_command_json_yearly() {
        let dataset = scenario_dataset();
        let json = capture(|out| {
            branch_command(
                out,
                &dataset,
                jan_2026(),
                Scope::Yearly,
                Measure::Cash,
                OutputFormat::Json,
            )
        });
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["scope"], "yearly");
        assert_eq!(value["measure"], "cash");
        assert_eq!(value["series"]["labels"].as_array().unwrap().len(), 12);
        assert_eq!(value["table"]["grand_total"], 150.0);
    }

    #[test]
    fn test_drivers_command_ranking_text() {
        let dataset = scenario_dataset();
        let text = capture(|out| {
            drivers_command(
                out,
                &dataset,
                jan_2026(),
                Scope::Monthly,
                OutputFormat::Text,
            )
        });
        let john = text.find("John Martinez").unwrap();
        let carlos = text.find("Carlos Reyes").unwrap();
        assert!(john < carlos);
        assert!(text.contains("12.50 MT"));
    }

    #[test]
    fn test_compare_command_csv() {
        let dataset = scenario_dataset();
        let csv = capture(|out| compare_command(out, &dataset, jan_2026(), OutputFormat::Csv));
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(
            lines[0],
            "Branch,2025 Cash,2025 MT,2026 Cash,2026 MT,2027 Cash,2027 MT"
        );
        assert_eq!(lines[1], "Molo,70,0.5,100,1,0,0");
        assert_eq!(lines[2], "Oton,0,0,50,2,0,0");
    }

    #[test]
    fn test_compare_command_json_has_three_charts() {
        let dataset = scenario_dataset();
        let json = capture(|out| compare_command(out, &dataset, jan_2026(), OutputFormat::Json));
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["charts"].as_array().unwrap().len(), 3);
        assert_eq!(value["period"]["year"], 2026);
    }

    #[test]
    fn test_export_writes_named_files() {
        let dataset = scenario_dataset();
        let dir = tempfile::tempdir().unwrap();
        let export = || OutputFormat::Export(dir.path().to_path_buf());

        let text = capture(|out| {
            branch_command(
                out,
                &dataset,
                jan_2026(),
                Scope::Monthly,
                Measure::Volume,
                export(),
            )
        });
        assert!(text.starts_with("Exported Volume Sales to "));
        let volume = std::fs::read_to_string(dir.path().join("Volume_Sales_January_2026.csv"))
            .unwrap();
        assert_eq!(volume.lines().next().unwrap(), "Date,Molo,Oton,Daily Total");

        capture(|out| drivers_command(out, &dataset, jan_2026(), Scope::Yearly, export()));
        assert!(dir.path().join("Driver_Volume_2026.csv").exists());

        capture(|out| compare_command(out, &dataset, jan_2026(), export()));
        let cmp =
            std::fs::read_to_string(dir.path().join("Monthly_Comparison_January_2026.csv")).unwrap();
        assert_eq!(cmp.lines().nth(1).unwrap(), "Molo,70,0.5,100,1,0,0");
    }

    #[test]
    fn test_dashboard_command_json() {
        let json = capture(|out| {
            dashboard_command(out, BranchFilter::Branch("Molo".into()), true)
        });
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["metrics"]["peak_day"][0], 5);
        assert_eq!(value["series"]["datasets"][0]["data"][0], 64_339.0);
    }

    #[test]
    fn test_dashboard_command_unknown_branch() {
        let mut out = Vec::new();
        let err = dashboard_command(&mut out, BranchFilter::parse("Jaro"), false).unwrap_err();
        assert!(err.to_string().contains("unknown branch 'Jaro'"));
        assert!(err.to_string().contains("All, Molo, Oton"));
        assert!(out.is_empty());
    }
}
