//! Stats module - series arithmetic

mod calculator;

pub use calculator::{SeriesCalculator, ROLLING_WINDOW};
