//! Data module - feed loading and metric derivation

mod deriver;
mod loader;

pub use deriver::{DeriveError, MetricDeriver, MIN_DELTA_TAMP, REF_TAMP};
pub use loader::{DataLoader, LoaderError, Snapshot, DATE_COLUMN, DEFAULT_FEED_URL};
