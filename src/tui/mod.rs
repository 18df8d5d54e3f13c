//! Interactive terminal dashboard

pub mod app;
pub mod theme;
pub mod widgets;

pub use app::{run, App};
