//! TUI widgets

pub mod chart;
pub mod comparison;
pub mod dashboard;
pub mod frame;
pub mod help;
pub mod report;
pub mod table;
pub mod tabs;
