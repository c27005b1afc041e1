//! Report analytics.
//!
//! Turns the transactions of a window into totals, a category breakdown,
//! daily trend series and a comparison with the preceding window:
//! - `period` resolves which instants a report covers
//! - `aggregate` computes totals, maxima and category statistics
//! - `trends` builds the daily series and the period comparison
//! - `percent` holds the percent-change rules every figure shares

pub mod aggregate;
pub mod error;
pub mod percent;
pub mod period;
pub mod service;
pub mod trends;
pub mod types;

#[cfg(test)]
mod tests;

pub use error::ReportError;
pub use percent::percent_change;
pub use period::{Averaging, PeriodWindows, ReportKind, Window};
pub use service::{ReportEngine, ReportService};
pub use types::*;
