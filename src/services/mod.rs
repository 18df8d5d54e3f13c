//! Services for aggregation, generation, loading and export

pub mod aggregator;
pub mod calendar;
pub mod comparison;
pub mod dashboard;
pub mod data_loader;
pub mod export;
pub mod format;
pub mod generator;

pub use aggregator::{Accumulation, Aggregator, Dimension, Granularity, Scope};
pub use calendar::ReportPeriod;
pub use comparison::MonthlyComparison;
pub use dashboard::{BranchFilter, LandingDashboard};
pub use data_loader::{DataLoaderService, Dataset};
pub use export::Sheet;
