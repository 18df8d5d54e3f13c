//! salesboard: branch, volume and driver sales reports
//!
//! Flat daily records are bucketed into calendar periods by the
//! [`services::Aggregator`] and rendered by the CLI or the terminal dashboard.

pub mod cli;
pub mod config;
pub mod services;
pub mod tui;
pub mod types;
