//! Spreadsheet export: header row, one row per period, trailing TOTAL row

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;

use super::aggregator::Granularity;
use super::calendar::month_name;
use super::comparison::MonthlyComparison;
use crate::types::{AggregatedTable, DriverRanking, Measure, Result};

/// One spreadsheet cell
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Cell {
    Text(String),
    Number(f64),
}

impl Cell {
    fn text(s: impl Into<String>) -> Self {
        Self::Text(s.into())
    }

    fn render(&self) -> String {
        match self {
            Self::Text(s) => s.clone(),
            Self::Number(n) => n.to_string(),
        }
    }
}

/// A named grid ready to be written out
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Sheet {
    pub name: String,
    /// Suggested file name without extension
    pub file_stem: String,
    pub rows: Vec<Vec<Cell>>,
}

impl Sheet {
    /// Period table sheet for a branch cash or volume view
    pub fn branch_table(measure: Measure, granularity: Granularity, table: &AggregatedTable) -> Self {
        let (name, file_stem) = match granularity {
            Granularity::DayOfMonth { year, month } => (
                measure.label().to_string(),
                format!("{}_{}_{}", measure.file_prefix(), month_name(month), year),
            ),
            Granularity::MonthOfYear { year } => (
                format!("Yearly {}", measure.label()),
                format!("{}_{}", measure.file_prefix(), year),
            ),
        };

        let mut rows = Vec::with_capacity(table.rows.len() + 2);

        let mut header = vec![Cell::text(granularity.period_heading())];
        header.extend(table.column_totals.iter().map(|c| Cell::text(&c.label)));
        header.push(Cell::text(granularity.total_heading()));
        rows.push(header);

        for row in &table.rows {
            let mut cells = vec![Cell::text(&row.label)];
            cells.extend(row.values.iter().map(|v| Cell::Number(*v)));
            cells.push(Cell::Number(row.total));
            rows.push(cells);
        }

        let mut totals = vec![Cell::text("TOTAL")];
        totals.extend(table.column_totals.iter().map(|c| Cell::Number(c.total)));
        totals.push(Cell::Number(table.grand_total));
        rows.push(totals);

        Self {
            name,
            file_stem,
            rows,
        }
    }

    /// Driver ranking sheet
    pub fn driver_ranking(granularity: Granularity, ranking: &DriverRanking) -> Self {
        let (name, file_stem) = match granularity {
            Granularity::DayOfMonth { year, month } => (
                "Driver Monthly Volume",
                format!("Driver_Volume_{}_{}", month_name(month), year),
            ),
            Granularity::MonthOfYear { year } => {
                ("Driver Yearly Volume", format!("Driver_Volume_{}", year))
            }
        };

        let mut rows = vec![vec![
            Cell::text("Driver ID"),
            Cell::text("Driver Name"),
            Cell::text("Total Volume (MT)"),
        ]];
        rows.extend(ranking.rows.iter().map(|r| {
            vec![
                Cell::text(&r.driver_id),
                Cell::text(&r.name),
                Cell::Number(r.total_volume),
            ]
        }));
        rows.push(vec![
            Cell::text("TOTAL"),
            Cell::text(""),
            Cell::Number(ranking.total_volume),
        ]);

        Self {
            name: name.to_string(),
            file_stem,
            rows,
        }
    }

    /// Three-year comparison sheet (no TOTAL row)
    pub fn comparison(cmp: &MonthlyComparison) -> Self {
        let mut header = vec![Cell::text("Branch")];
        for year in cmp.years() {
            header.push(Cell::Text(format!("{} Cash", year.year)));
            header.push(Cell::Text(format!("{} MT", year.year)));
        }

        let mut rows = vec![header];
        rows.extend(cmp.rows.iter().map(|r| {
            vec![
                Cell::text(&r.branch),
                Cell::Number(r.prev_cash),
                Cell::Number(r.prev_volume),
                Cell::Number(r.curr_cash),
                Cell::Number(r.curr_volume),
                Cell::Number(r.next_cash),
                Cell::Number(r.next_volume),
            ]
        }));

        Self {
            name: "Monthly Comparison".to_string(),
            file_stem: format!(
                "Monthly_Comparison_{}_{}",
                month_name(cmp.period.month),
                cmp.period.year
            ),
            rows,
        }
    }

    /// Write `<dir>/<file_stem>.csv`, creating `dir` when missing
    pub fn export_to(&self, dir: &Path) -> Result<PathBuf> {
        fs::create_dir_all(dir)?;
        let path = dir.join(format!("{}.csv", self.file_stem));
        self.write_csv(BufWriter::new(File::create(&path)?))?;
        tracing::info!(sheet = %self.name, path = %path.display(), "exported sheet");
        Ok(path)
    }

    /// Write as CSV
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        let mut csv_writer = csv::WriterBuilder::new()
            .flexible(true)
            .from_writer(writer);
        for row in &self.rows {
            csv_writer.write_record(row.iter().map(Cell::render))?;
        }
        csv_writer.flush()?;
        Ok(())
    }
}
