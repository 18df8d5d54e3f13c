//! Same-month comparison across three consecutive years

use chrono::Datelike;
use serde::Serialize;

use super::aggregator::Dimension;
use super::calendar::ReportPeriod;
use crate::types::{AggregatedSeries, Amount, BranchSale, Dataset};

/// One branch's cash and volume for a single month
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct BranchMonthTotal {
    pub branch: String,
    pub cash: f64,
    pub volume: f64,
}

/// Per-branch totals of one month in one year
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct YearTotals {
    pub year: i32,
    pub month: u32,
    pub branches: Vec<BranchMonthTotal>,
}

impl YearTotals {
    /// Sum `records` matching `year` and `month` into one total per declared branch.
    /// Records for undeclared branches are ignored.
    pub fn build(records: &[BranchSale], branches: &[String], year: i32, month: u32) -> Self {
        let names = Dimension::from_names(branches);
        let mut sums = vec![(Amount::ZERO, Amount::ZERO); names.len()];

        for record in records {
            let Some(date) = record.date else { continue };
            if date.year() != year || date.month() != month {
                continue;
            }
            if let Some(pos) = names.iter().position(|d| d.key == record.branch) {
                sums[pos].0 += Amount::from(record.cash_sales);
                sums[pos].1 += Amount::from(record.volume_tons);
            }
        }

        let totals = names
            .into_iter()
            .zip(sums)
            .map(|(d, (cash, volume))| BranchMonthTotal {
                branch: d.key,
                cash: cash.to_f64(),
                volume: volume.to_f64(),
            })
            .collect();

        Self {
            year,
            month,
            branches: totals,
        }
    }

    fn get(&self, branch: &str) -> Option<&BranchMonthTotal> {
        self.branches.iter().find(|t| t.branch == branch)
    }

    pub fn cash(&self, branch: &str) -> f64 {
        self.get(branch).map_or(0.0, |t| t.cash)
    }

    pub fn volume(&self, branch: &str) -> f64 {
        self.get(branch).map_or(0.0, |t| t.volume)
    }

    pub fn total_cash(&self) -> f64 {
        self.branches.iter().map(|t| Amount::from(t.cash)).sum::<Amount>().to_f64()
    }

    pub fn total_volume(&self) -> f64 {
        self.branches.iter().map(|t| Amount::from(t.volume)).sum::<Amount>().to_f64()
    }

    /// Branch-labelled chart: a volume line and a cash bar set
    pub fn chart(&self) -> AggregatedSeries {
        AggregatedSeries {
            labels: self.branches.iter().map(|t| t.branch.clone()).collect(),
            datasets: vec![
                Dataset {
                    key: "volume".to_string(),
                    label: "Volume (MT)".to_string(),
                    data: self.branches.iter().map(|t| t.volume).collect(),
                },
                Dataset {
                    key: "cash".to_string(),
                    label: "Cash Sales (₱)".to_string(),
                    data: self.branches.iter().map(|t| t.cash).collect(),
                },
            ],
        }
    }
}

/// One table row: a branch's month in the previous, selected and next year
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ComparisonRow {
    pub branch: String,
    pub prev_cash: f64,
    pub prev_volume: f64,
    pub curr_cash: f64,
    pub curr_volume: f64,
    pub next_cash: f64,
    pub next_volume: f64,
}

/// Side-by-side view of one month across years Y-1, Y and Y+1
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MonthlyComparison {
    pub period: ReportPeriod,
    pub prev: YearTotals,
    pub current: YearTotals,
    pub next: YearTotals,
    pub rows: Vec<ComparisonRow>,
}

impl MonthlyComparison {
    /// Each year is an independent scan of the full record collection
    pub fn build(records: &[BranchSale], branches: &[String], period: ReportPeriod) -> Self {
        let prev = YearTotals::build(
            records,
            branches,
            period.year.saturating_sub(1),
            period.month,
        );
        let current = YearTotals::build(records, branches, period.year, period.month);
        let next = YearTotals::build(
            records,
            branches,
            period.year.saturating_add(1),
            period.month,
        );

        let rows = current
            .branches
            .iter()
            .map(|t| ComparisonRow {
                branch: t.branch.clone(),
                prev_cash: prev.cash(&t.branch),
                prev_volume: prev.volume(&t.branch),
                curr_cash: t.cash,
                curr_volume: t.volume,
                next_cash: next.cash(&t.branch),
                next_volume: next.volume(&t.branch),
            })
            .collect();

        tracing::debug!(
            year = period.year,
            month = period.month,
            branches = branches.len(),
            "built monthly comparison"
        );

        Self {
            period,
            prev,
            current,
            next,
            rows,
        }
    }

    /// The three years in display order
    pub fn years(&self) -> [&YearTotals; 3] {
        [&self.prev, &self.current, &self.next]
    }
}
