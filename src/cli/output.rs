//! Plain-text and JSON rendering for report subcommands

use std::io::{self, Write};

use serde::Serialize;

use crate::services::dashboard::DashboardSnapshot;
use crate::services::export::{Cell, Sheet};
use crate::services::format::{format_currency, format_number, format_percent, format_volume};
use crate::types::{Measure, Share};

/// Column gap in text tables
const GAP: &str = "  ";

/// Write `value` as pretty JSON followed by a newline
pub fn write_json<W: Write, T: Serialize>(out: &mut W, value: &T) -> anyhow::Result<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}

/// Amount formatter for one measure
pub fn format_measure(measure: Measure, value: f64) -> String {
    match measure {
        Measure::Cash => format_currency(value),
        Measure::Volume => format_volume(value),
    }
}

/// Render a sheet as an aligned table. `number` formats a numeric cell given its column.
pub fn write_sheet<W, F>(out: &mut W, title: &str, sheet: &Sheet, number: F) -> io::Result<()>
where
    W: Write,
    F: Fn(usize, f64) -> String,
{
    let rendered: Vec<Vec<String>> = sheet
        .rows
        .iter()
        .map(|row| {
            row.iter()
                .enumerate()
                .map(|(col, cell)| match cell {
                    Cell::Text(s) => s.clone(),
                    Cell::Number(n) => number(col, *n),
                })
                .collect()
        })
        .collect();

    let columns = rendered.iter().map(Vec::len).max().unwrap_or(0);
    let widths: Vec<usize> = (0..columns)
        .map(|col| {
            rendered
                .iter()
                .filter_map(|row| row.get(col))
                .map(|s| s.chars().count())
                .max()
                .unwrap_or(0)
        })
        .collect();
    let rule_width = widths.iter().sum::<usize>() + GAP.len() * columns.saturating_sub(1);

    writeln!(out, "{}", title)?;
    writeln!(out)?;
    for (i, row) in rendered.iter().enumerate() {
        let line: Vec<String> = row
            .iter()
            .enumerate()
            .map(|(col, s)| {
                if col == 0 {
                    format!("{:<w$}", s, w = widths[col])
                } else {
                    format!("{:>w$}", s, w = widths[col])
                }
            })
            .collect();
        writeln!(out, "{}", line.join(GAP).trim_end())?;
        if i == 0 {
            writeln!(out, "{}", "─".repeat(rule_width))?;
        }
    }
    Ok(())
}

/// Share-of-total lines under a table
pub fn write_distribution<W, F>(out: &mut W, shares: &[Share], amount: F) -> io::Result<()>
where
    W: Write,
    F: Fn(f64) -> String,
{
    if shares.is_empty() {
        return Ok(());
    }

    let label_width = shares
        .iter()
        .map(|s| s.label.chars().count())
        .max()
        .unwrap_or(0);
    let amounts: Vec<String> = shares.iter().map(|s| amount(s.value)).collect();
    let amount_width = amounts.iter().map(|a| a.chars().count()).max().unwrap_or(0);

    writeln!(out)?;
    writeln!(out, "Distribution")?;
    for (share, value) in shares.iter().zip(&amounts) {
        writeln!(
            out,
            "  {:<lw$}{GAP}{:>aw$}{GAP}{:>6}",
            share.label,
            value,
            format_percent(share.percent),
            lw = label_width,
            aw = amount_width,
        )?;
    }
    Ok(())
}

/// Headline metrics and the per-day fluctuation list
pub fn write_dashboard<W: Write>(out: &mut W, snapshot: &DashboardSnapshot) -> io::Result<()> {
    let metrics = &snapshot.metrics;
    let peak = metrics
        .peak_day
        .map(|(day, sales)| {
            let label = snapshot
                .series
                .labels
                .get(day as usize - 1)
                .cloned()
                .unwrap_or_else(|| day.to_string());
            format!("{} ({})", label, format_currency(sales as f64))
        })
        .unwrap_or_else(|| "N/A".to_string());

    writeln!(out, "Daily Sales - {}", snapshot.filter.label())?;
    writeln!(out)?;
    writeln!(out, "  Total Sales    {}", format_currency(metrics.total_sales as f64))?;
    writeln!(out, "  Daily Average  {}", format_currency(metrics.average_daily))?;
    writeln!(out, "  Peak Day       {}", peak)?;
    writeln!(
        out,
        "  Up / Down      {} / {}",
        format_number(metrics.up_days as i64),
        format_number(metrics.down_days as i64)
    )?;

    if snapshot.fluctuation.is_empty() {
        return Ok(());
    }

    let branch_width = snapshot
        .fluctuation
        .iter()
        .map(|d| d.branch.chars().count())
        .max()
        .unwrap_or(0);

    writeln!(out)?;
    writeln!(out, "Daily Fluctuation")?;
    for day in &snapshot.fluctuation {
        writeln!(
            out,
            "  {:<13}{GAP}{:<bw$}{GAP}{:>9}{GAP}{}",
            day.label,
            day.branch,
            format_currency(day.sales as f64),
            day.trend.arrow(),
            bw = branch_width,
        )?;
    }
    Ok(())
}
