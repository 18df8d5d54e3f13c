//! Deterministic synthetic daily sales for the landing dashboard

use serde::Serialize;

use super::calendar::{ReportPeriod, MONTH_ABBR};

/// No generated day falls below this amount
pub const SALES_FLOOR: i64 = 30_000;

/// Days generated per branch
pub const GENERATED_DAYS: u32 = 31;

/// Month the landing dashboard snapshot describes
pub const SNAPSHOT_PERIOD: ReportPeriod = ReportPeriod {
    year: 2026,
    month: 1,
};

/// Wave parameters for one branch
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BranchProfile {
    pub branch: String,
    pub base: f64,
    pub amplitude: f64,
    pub phase: f64,
}

impl BranchProfile {
    pub fn new(branch: impl Into<String>, base: f64, amplitude: f64, phase: f64) -> Self {
        Self {
            branch: branch.into(),
            base,
            amplitude,
            phase,
        }
    }

    /// Sales for `day`, clamped to [`SALES_FLOOR`]
    pub fn sales_on(&self, day: u32) -> i64 {
        let t = day as f64 + self.phase;
        let raw = self.base
            + self.amplitude * (t / 3.0).sin()
            + (self.amplitude / 3.0) * (t / 7.0).cos()
            + (day as f64 - 15.0) * (self.amplitude / 80.0);
        (round_half_up(raw) as i64).max(SALES_FLOOR)
    }
}

/// The five branches shown on the landing dashboard
pub fn default_profiles() -> Vec<BranchProfile> {
    vec![
        BranchProfile::new("Molo", 60_000.0, 9_000.0, 0.0),
        BranchProfile::new("Oton", 52_000.0, 7_000.0, 1.0),
        BranchProfile::new("Sooc", 48_000.0, 6_000.0, 2.0),
        BranchProfile::new("Guimbal", 65_000.0, 10_000.0, 3.0),
        BranchProfile::new("Antique", 55_000.0, 8_000.0, 4.0),
    ]
}

/// Direction relative to the previous day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
}

impl Trend {
    pub fn arrow(self) -> &'static str {
        match self {
            Self::Up => "▲",
            Self::Down => "▼",
        }
    }
}

/// One generated branch-day
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SyntheticDay {
    pub branch: String,
    pub day: u32,
    /// "Jan 5, 2026"
    pub label: String,
    pub sales: i64,
    pub trend: Trend,
}

/// Generate days 1..=31 for every profile, branch by branch.
///
/// The first day's trend compares against the profile's base.
pub fn generate(profiles: &[BranchProfile]) -> Vec<SyntheticDay> {
    let month = MONTH_ABBR[(SNAPSHOT_PERIOD.month - 1) as usize];
    let mut days = Vec::with_capacity(profiles.len() * GENERATED_DAYS as usize);

    for profile in profiles {
        let mut prev = round_half_up(profile.base) as i64;
        for day in 1..=GENERATED_DAYS {
            let sales = profile.sales_on(day);
            let trend = if sales >= prev { Trend::Up } else { Trend::Down };
            days.push(SyntheticDay {
                branch: profile.branch.clone(),
                day,
                label: format!("{} {}, {}", month, day, SNAPSHOT_PERIOD.year),
                sales,
                trend,
            });
            prev = sales;
        }
    }

    days
}

/// Round to nearest, ties toward positive infinity
fn round_half_up(x: f64) -> f64 {
    (x + 0.5).floor()
}
