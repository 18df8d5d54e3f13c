//! Dataset loading for CLI and TUI
//!
//! The record collections are read once at startup and treated as
//! immutable afterwards. Without a configured path the bundled sample
//! dataset is used.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::types::{BranchSale, DriverSale, Result, SalesboardError};

/// Sample data compiled into the binary
const SAMPLE_DATASET: &str = include_str!("../../tests/fixtures/mock-dashboard-data.json");

#[derive(Debug, Default, Deserialize)]
struct RawMeta {
    #[serde(default)]
    branches: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct RawDataset {
    #[serde(default)]
    meta: RawMeta,
    #[serde(default, rename = "branchSales", alias = "dailyBranchSales")]
    branch_sales: Vec<BranchSale>,
    #[serde(default, rename = "driverSales")]
    driver_sales: Vec<DriverSale>,
}

/// Branch list plus the two record collections
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    branches: Vec<String>,
    pub branch_sales: Vec<BranchSale>,
    pub driver_sales: Vec<DriverSale>,
}

impl Dataset {
    pub fn new(
        branches: Vec<String>,
        branch_sales: Vec<BranchSale>,
        driver_sales: Vec<DriverSale>,
    ) -> Self {
        let branches = if branches.is_empty() {
            first_seen_branches(&branch_sales)
        } else {
            dedup_preserving_order(branches)
        };
        Self {
            branches,
            branch_sales,
            driver_sales,
        }
    }

    /// Parse dataset JSON. The buffer is used as scratch space by the parser.
    pub fn from_slice(bytes: &mut [u8]) -> Result<Self> {
        let raw: RawDataset =
            simd_json::from_slice(bytes).map_err(|e| SalesboardError::Parse(e.to_string()))?;
        Ok(Self::new(raw.meta.branches, raw.branch_sales, raw.driver_sales))
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let mut bytes = std::fs::read(path)?;
        Self::from_slice(&mut bytes)
    }

    /// The bundled sample dataset
    pub fn sample() -> Result<Self> {
        let mut bytes = SAMPLE_DATASET.as_bytes().to_vec();
        Self::from_slice(&mut bytes)
    }

    /// Declared branch order (from `meta.branches`, or first occurrence in the sales rows)
    pub fn branches(&self) -> &[String] {
        &self.branches
    }

    /// Records whose date could not be parsed
    pub fn undated_count(&self) -> usize {
        self.branch_sales.iter().filter(|r| r.date.is_none()).count()
            + self.driver_sales.iter().filter(|r| r.date.is_none()).count()
    }
}

fn first_seen_branches(records: &[BranchSale]) -> Vec<String> {
    dedup_preserving_order(records.iter().map(|r| r.branch.clone()).collect())
}

fn dedup_preserving_order(names: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    names
        .into_iter()
        .filter(|n| seen.insert(n.clone()))
        .collect()
}

/// Loads the configured dataset, falling back to the bundled sample
pub struct DataLoaderService {
    path: Option<PathBuf>,
}

impl DataLoaderService {
    pub fn new(path: Option<PathBuf>) -> Self {
        Self { path }
    }

    pub fn load(&self) -> Result<Dataset> {
        let dataset = match &self.path {
            Some(path) => {
                tracing::info!(path = %path.display(), "loading dataset");
                Dataset::from_path(path)?
            }
            None => {
                tracing::info!("no dataset configured, using bundled sample");
                Dataset::sample()?
            }
        };

        let undated = dataset.undated_count();
        if undated > 0 {
            tracing::warn!(undated, "records with malformed dates will not appear in any period");
        }
        tracing::info!(
            branches = dataset.branches().len(),
            branch_sales = dataset.branch_sales.len(),
            driver_sales = dataset.driver_sales.len(),
            "dataset loaded"
        );

        Ok(dataset)
    }
}
