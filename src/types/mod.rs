//! Type definitions for salesboard

mod amount;
mod error;
mod record;
mod report;

pub use amount::*;
pub use error::*;
pub use record::*;
pub use report::*;
