//! Landing dashboard: generated daily sales with a branch filter

use serde::Serialize;

use super::calendar::MONTH_ABBR;
use super::generator::{generate, BranchProfile, SyntheticDay, Trend, GENERATED_DAYS, SNAPSHOT_PERIOD};
use crate::types::{AggregatedSeries, Dataset};

/// Branch selection on the landing dashboard
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub enum BranchFilter {
    #[default]
    All,
    Branch(String),
}

impl BranchFilter {
    /// "All" (any case) selects every branch
    pub fn parse(raw: &str) -> Self {
        if raw.eq_ignore_ascii_case("all") {
            Self::All
        } else {
            Self::Branch(raw.to_string())
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Self::All => "All",
            Self::Branch(name) => name,
        }
    }

    pub fn matches(&self, branch: &str) -> bool {
        match self {
            Self::All => true,
            Self::Branch(name) => name == branch,
        }
    }
}

/// Headline numbers for the selected filter
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DashboardMetrics {
    pub total_sales: i64,
    pub average_daily: f64,
    /// (day of month, sales)
    pub peak_day: Option<(u32, i64)>,
    pub up_days: usize,
    pub down_days: usize,
}

/// Everything the dashboard renders for one filter
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DashboardSnapshot {
    pub filter: BranchFilter,
    pub series: AggregatedSeries,
    pub fluctuation: Vec<SyntheticDay>,
    pub metrics: DashboardMetrics,
}

impl DashboardSnapshot {
    fn build(days: &[SyntheticDay], filter: BranchFilter) -> Self {
        let month = MONTH_ABBR[(SNAPSHOT_PERIOD.month - 1) as usize];

        // Summed per day for "All"; a single branch has one row per day
        let mut values = vec![0.0; GENERATED_DAYS as usize];
        let fluctuation: Vec<SyntheticDay> = days
            .iter()
            .filter(|d| filter.matches(&d.branch))
            .cloned()
            .collect();
        for day in &fluctuation {
            if let Some(slot) = values.get_mut(day.day as usize - 1) {
                *slot += day.sales as f64;
            }
        }

        let total_sales: i64 = fluctuation.iter().map(|d| d.sales).sum();
        let peak_day = values
            .iter()
            .enumerate()
            .filter(|(_, v)| **v > 0.0)
            .fold(None, |best: Option<(u32, i64)>, (i, v)| {
                let sales = *v as i64;
                match best {
                    Some((_, top)) if top >= sales => best,
                    _ => Some((i as u32 + 1, sales)),
                }
            });
        let up_days = fluctuation.iter().filter(|d| d.trend == Trend::Up).count();

        let metrics = DashboardMetrics {
            total_sales,
            average_daily: total_sales as f64 / GENERATED_DAYS as f64,
            peak_day,
            up_days,
            down_days: fluctuation.len() - up_days,
        };

        let series = AggregatedSeries {
            labels: (1..=GENERATED_DAYS)
                .map(|d| format!("{} {}", month, d))
                .collect(),
            datasets: vec![Dataset {
                key: filter.label().to_string(),
                label: "Daily Cash Sales (₱)".to_string(),
                data: values,
            }],
        };

        Self {
            filter,
            series,
            fluctuation,
            metrics,
        }
    }
}

/// Generated month plus the current filter selection
#[derive(Debug, Clone)]
pub struct LandingDashboard {
    days: Vec<SyntheticDay>,
    branches: Vec<String>,
    snapshot: DashboardSnapshot,
}

impl LandingDashboard {
    pub fn new(profiles: &[BranchProfile]) -> Self {
        let days = generate(profiles);
        let branches = profiles.iter().map(|p| p.branch.clone()).collect();
        let snapshot = DashboardSnapshot::build(&days, BranchFilter::All);
        Self {
            days,
            branches,
            snapshot,
        }
    }

    /// Recompute for `filter`, replacing the previous snapshot whole
    pub fn select(&mut self, filter: BranchFilter) {
        self.snapshot = DashboardSnapshot::build(&self.days, filter);
    }

    /// All → first branch → ... → last branch → All
    pub fn cycle_filter(&mut self) {
        let next = match &self.snapshot.filter {
            BranchFilter::All => self.branches.first().cloned(),
            BranchFilter::Branch(current) => self
                .branches
                .iter()
                .position(|b| b == current)
                .and_then(|i| self.branches.get(i + 1))
                .cloned(),
        };
        self.select(next.map_or(BranchFilter::All, BranchFilter::Branch));
    }

    pub fn filters(&self) -> Vec<BranchFilter> {
        std::iter::once(BranchFilter::All)
            .chain(self.branches.iter().cloned().map(BranchFilter::Branch))
            .collect()
    }

    pub fn snapshot(&self) -> &DashboardSnapshot {
        &self.snapshot
    }
}

impl Default for LandingDashboard {
    fn default() -> Self {
        Self::new(&super::generator::default_profiles())
    }
}
