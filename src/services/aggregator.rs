//! Aggregator service for bucketing dated records into calendar periods

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use super::calendar::{days_in_month, ReportPeriod, MONTH_NAMES};
use crate::types::{
    AggregatedSeries, AggregatedTable, AggregationReport, Amount, BranchSale, ColumnTotal,
    Dataset, DatedRecord, Driver, DriverRanking, DriverReport, DriverSale, DriverTotal, Measure,
    TableRow,
};

/// Period shape of an aggregation pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Granularity {
    /// Days 1..=N of one month
    DayOfMonth { year: i32, month: u32 },
    /// Months January..December of one year
    MonthOfYear { year: i32 },
}

impl Granularity {
    pub fn period_count(self) -> usize {
        match self {
            Self::DayOfMonth { year, month } => days_in_month(year, month) as usize,
            Self::MonthOfYear { .. } => 12,
        }
    }

    /// Bucket index for `date`, or `None` when the date is outside the period
    pub fn bucket_of(self, date: NaiveDate) -> Option<usize> {
        match self {
            Self::DayOfMonth { year, month } => {
                (date.year() == year && date.month() == month).then(|| date.day0() as usize)
            }
            Self::MonthOfYear { year } => (date.year() == year).then(|| date.month0() as usize),
        }
    }

    /// Chart axis labels: day numbers or month names
    pub fn chart_labels(self) -> Vec<String> {
        match self {
            Self::DayOfMonth { .. } => (1..=self.period_count()).map(|d| d.to_string()).collect(),
            Self::MonthOfYear { .. } => MONTH_NAMES.iter().map(|m| m.to_string()).collect(),
        }
    }

    /// Table row label: `YYYY-MM-DD` for days, `YYYY-MM` for months
    pub fn row_label(self, index: usize) -> String {
        match self {
            Self::DayOfMonth { year, month } => format!("{}-{:02}-{:02}", year, month, index + 1),
            Self::MonthOfYear { year } => format!("{}-{:02}", year, index + 1),
        }
    }

    /// Heading of the period column in tables and sheets
    pub fn period_heading(self) -> &'static str {
        match self {
            Self::DayOfMonth { .. } => "Date",
            Self::MonthOfYear { .. } => "Month",
        }
    }

    /// Heading of the row total column
    pub fn total_heading(self) -> &'static str {
        match self {
            Self::DayOfMonth { .. } => "Daily Total",
            Self::MonthOfYear { .. } => "Monthly Total",
        }
    }
}

impl From<ReportPeriod> for Granularity {
    fn from(period: ReportPeriod) -> Self {
        Self::DayOfMonth {
            year: period.year,
            month: period.month,
        }
    }
}

/// Whether a view shows one month by day or one year by month
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    #[default]
    Monthly,
    Yearly,
}

impl Scope {
    pub fn granularity(self, period: ReportPeriod) -> Granularity {
        match self {
            Self::Monthly => period.into(),
            Self::Yearly => Granularity::MonthOfYear { year: period.year },
        }
    }

    pub fn toggle(self) -> Self {
        match self {
            Self::Monthly => Self::Yearly,
            Self::Yearly => Self::Monthly,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Monthly => "Monthly",
            Self::Yearly => "Yearly",
        }
    }

    /// "Cash Sales - January 2026" or "Yearly Cash Sales - 2026"
    pub fn title(self, name: &str, period: ReportPeriod) -> String {
        match self {
            Self::Monthly => format!("{} - {}", name, period.title()),
            Self::Yearly => format!("Yearly {} - {}", name, period.year),
        }
    }
}

/// How records colliding on the same (dimension, period) bucket combine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Accumulation {
    /// Later record replaces earlier one. Branch daily data is one row per branch per day.
    LastWrite,
    /// Records are added together
    Sum,
}

/// A column in the output: grouping key plus display label
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dimension {
    pub key: String,
    pub label: String,
}

impl Dimension {
    /// Dimension whose label is its key (branches)
    pub fn named(name: impl Into<String>) -> Self {
        let key = name.into();
        Self {
            label: key.clone(),
            key,
        }
    }

    /// Declared-order dimensions with repeated names dropped
    pub fn from_names<S: AsRef<str>>(names: &[S]) -> Vec<Self> {
        let mut seen = HashSet::new();
        names
            .iter()
            .map(|n| n.as_ref())
            .filter(|n| seen.insert(*n))
            .map(Self::named)
            .collect()
    }
}

impl From<&Driver> for Dimension {
    fn from(driver: &Driver) -> Self {
        Self {
            key: driver.id.clone(),
            label: driver.name.clone(),
        }
    }
}

/// Aggregator for building period reports
pub struct Aggregator;

impl Aggregator {
    /// Bucket `records` by (dimension, period) and build series and table together.
    ///
    /// Records outside the granularity's period, with no date, or whose key is
    /// not in `dimensions` contribute nothing. Row totals, column totals and the
    /// grand total are accumulated from the same values placed in the series.
    pub fn aggregate<R, F>(
        records: &[R],
        dimensions: &[Dimension],
        granularity: Granularity,
        accumulation: Accumulation,
        measure: F,
    ) -> AggregationReport
    where
        R: DatedRecord,
        F: Fn(&R) -> f64,
    {
        let periods = granularity.period_count();

        let mut index: HashMap<(&str, usize), Amount> = HashMap::new();
        for record in records {
            let Some(bucket) = record.date().and_then(|d| granularity.bucket_of(d)) else {
                continue;
            };
            let value = Amount::from(measure(record));
            let slot = index.entry((record.dimension_key(), bucket)).or_default();
            match accumulation {
                Accumulation::LastWrite => *slot = value,
                Accumulation::Sum => *slot += value,
            }
        }

        let cells: Vec<Vec<Amount>> = dimensions
            .iter()
            .map(|dim| {
                (0..periods)
                    .map(|p| index.get(&(dim.key.as_str(), p)).copied().unwrap_or_default())
                    .collect()
            })
            .collect();

        let datasets: Vec<Dataset> = dimensions
            .iter()
            .zip(&cells)
            .map(|(dim, column)| Dataset {
                key: dim.key.clone(),
                label: dim.label.clone(),
                data: column.iter().map(|a| a.to_f64()).collect(),
            })
            .collect();

        let column_totals: Vec<ColumnTotal> = dimensions
            .iter()
            .zip(&cells)
            .map(|(dim, column)| ColumnTotal {
                key: dim.key.clone(),
                label: dim.label.clone(),
                total: column.iter().copied().sum::<Amount>().to_f64(),
            })
            .collect();

        let mut grand_total = Amount::ZERO;
        let rows: Vec<TableRow> = (0..periods)
            .map(|p| {
                let total: Amount = cells.iter().map(|column| column[p]).sum();
                grand_total += total;
                TableRow {
                    label: granularity.row_label(p),
                    values: cells.iter().map(|column| column[p].to_f64()).collect(),
                    total: total.to_f64(),
                }
            })
            .collect();

        tracing::debug!(
            ?granularity,
            records = records.len(),
            matched = index.len(),
            dimensions = dimensions.len(),
            "aggregated period"
        );

        AggregationReport {
            series: AggregatedSeries {
                labels: granularity.chart_labels(),
                datasets,
            },
            table: AggregatedTable {
                rows,
                column_totals,
                grand_total: grand_total.to_f64(),
            },
        }
    }

    /// Branch values per day of one month (last record per branch and day wins)
    pub fn branch_daily(
        records: &[BranchSale],
        branches: &[String],
        period: ReportPeriod,
        measure: Measure,
    ) -> AggregationReport {
        Self::aggregate(
            records,
            &Dimension::from_names(branches),
            period.into(),
            Accumulation::LastWrite,
            |r| measure.of(r),
        )
    }

    /// Branch values per month of one year (summed)
    pub fn branch_monthly(
        records: &[BranchSale],
        branches: &[String],
        year: i32,
        measure: Measure,
    ) -> AggregationReport {
        Self::aggregate(
            records,
            &Dimension::from_names(branches),
            Granularity::MonthOfYear { year },
            Accumulation::Sum,
            |r| measure.of(r),
        )
    }

    /// Branch report for a view scope: daily tables use last-write, yearly ones sum
    pub fn branch_report(
        records: &[BranchSale],
        branches: &[String],
        period: ReportPeriod,
        scope: Scope,
        measure: Measure,
    ) -> AggregationReport {
        match scope {
            Scope::Monthly => Self::branch_daily(records, branches, period, measure),
            Scope::Yearly => Self::branch_monthly(records, branches, period.year, measure),
        }
    }

    /// Distinct drivers in first-occurrence order across all records
    pub fn distinct_drivers(records: &[DriverSale]) -> Vec<Driver> {
        let mut seen: HashSet<&str> = HashSet::new();
        let mut drivers = Vec::new();
        for record in records {
            if seen.insert(record.driver_id.as_str()) {
                drivers.push(Driver {
                    id: record.driver_id.clone(),
                    name: record.name.clone(),
                });
            }
        }
        drivers
    }

    /// Driver volume per day of one month, plus the month's ranking
    pub fn driver_daily(records: &[DriverSale], period: ReportPeriod) -> DriverReport {
        Self::driver_report_for(records, period.into())
    }

    /// Driver volume per month of one year, plus the year's ranking
    pub fn driver_monthly(records: &[DriverSale], year: i32) -> DriverReport {
        Self::driver_report_for(records, Granularity::MonthOfYear { year })
    }

    /// Driver report for a view scope
    pub fn driver_report(records: &[DriverSale], period: ReportPeriod, scope: Scope) -> DriverReport {
        Self::driver_report_for(records, scope.granularity(period))
    }

    fn driver_report_for(records: &[DriverSale], granularity: Granularity) -> DriverReport {
        let dimensions: Vec<Dimension> = Self::distinct_drivers(records)
            .iter()
            .map(Dimension::from)
            .collect();

        let report = Self::aggregate(
            records,
            &dimensions,
            granularity,
            Accumulation::Sum,
            |r| r.volume_tons,
        );

        DriverReport {
            report,
            ranking: Self::driver_ranking(records, granularity),
        }
    }

    /// Per-driver totals for drivers with records in the period, highest first.
    /// Ties keep first-occurrence order.
    pub fn driver_ranking(records: &[DriverSale], granularity: Granularity) -> DriverRanking {
        let mut positions: HashMap<&str, usize> = HashMap::new();
        let mut volumes: Vec<Amount> = Vec::new();
        let mut rows: Vec<DriverTotal> = Vec::new();

        for record in records {
            if record.date().and_then(|d| granularity.bucket_of(d)).is_none() {
                continue;
            }
            let pos = *positions.entry(record.driver_id.as_str()).or_insert_with(|| {
                rows.push(DriverTotal {
                    driver_id: record.driver_id.clone(),
                    name: record.name.clone(),
                    total_volume: 0.0,
                });
                volumes.push(Amount::ZERO);
                rows.len() - 1
            });
            volumes[pos] += Amount::from(record.volume_tons);
        }

        for (row, volume) in rows.iter_mut().zip(&volumes) {
            row.total_volume = volume.to_f64();
        }
        let total_volume = volumes.into_iter().sum::<Amount>().to_f64();

        rows.sort_by(|a, b| {
            b.total_volume
                .partial_cmp(&a.total_volume)
                .unwrap_or(Ordering::Equal)
        });

        DriverRanking { rows, total_volume }
    }
}
