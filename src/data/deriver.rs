//! Metric Deriver Module
//! Turns the raw daily counters into the derived columns the dashboard
//! charts read.

use polars::prelude::*;
use thiserror::Error;

use crate::stats::{SeriesCalculator, ROLLING_WINDOW};

/// Historical minimum daily swab delta, used to normalize case counts.
pub const MIN_DELTA_TAMP: f64 = 964.0;

/// Reference daily swab count.
pub const REF_TAMP: f64 = 48000.0;

#[derive(Error, Debug)]
pub enum DeriveError {
    #[error("Polars error: {0}")]
    Polars(#[from] PolarsError),
    #[error("Feed is missing column '{0}'")]
    MissingColumn(String),
}

/// Computes every derived dashboard column from the raw feed.
pub struct MetricDeriver;

impl MetricDeriver {
    /// Return a copy of `df` with all derived columns appended.
    ///
    /// Row count and order are preserved. Derived cells are null where an
    /// input is missing, a divisor is zero, or a rolling window is not yet
    /// full; arithmetic edge cases never raise.
    pub fn derive(df: &DataFrame) -> Result<DataFrame, DeriveError> {
        let deceduti = Self::column_values(df, "deceduti")?;
        let tamponi = Self::column_values(df, "tamponi")?;
        let casi_testati = Self::column_values(df, "casi_testati")?;
        let nuovi_positivi = Self::column_values(df, "nuovi_positivi")?;
        let terapia_intensiva = Self::column_values(df, "terapia_intensiva")?;
        let totale_ospedalizzati = Self::column_values(df, "totale_ospedalizzati")?;

        let nuovi_decessi = SeriesCalculator::diff_from_previous(&deceduti);

        // Normalized cases
        let delta_tamponi = SeriesCalculator::diff_from_previous(&tamponi);
        let tamp_norm =
            SeriesCalculator::scaled_ratio(&nuovi_positivi, &delta_tamponi, MIN_DELTA_TAMP);
        let nuovi_casi_norm =
            SeriesCalculator::scaled_ratio(&nuovi_positivi, &delta_tamponi, REF_TAMP);

        // Ratio cases - tests
        let delta_casi_testati = SeriesCalculator::diff_from_previous(&casi_testati);
        let tamponi_meno_casi_testati = SeriesCalculator::sub(&tamponi, &casi_testati);
        let delta_tamponi_casi =
            SeriesCalculator::diff_from_previous(&tamponi_meno_casi_testati);
        let rapp_casi_test =
            SeriesCalculator::scaled_ratio(&nuovi_positivi, &delta_casi_testati, 100.0);
        let perc_tamponi_meno_testati =
            SeriesCalculator::scaled_ratio(&nuovi_positivi, &delta_tamponi_casi, 100.0);

        // Averages
        let terapia_intensiva_avg =
            SeriesCalculator::rolling_mean(&terapia_intensiva, ROLLING_WINDOW);
        let nuovi_positivi_avg = SeriesCalculator::rolling_mean(&nuovi_positivi, ROLLING_WINDOW);
        let nuovi_decessi_avg = SeriesCalculator::rolling_mean(&nuovi_decessi, ROLLING_WINDOW);
        let totale_ospedalizzati_avg =
            SeriesCalculator::rolling_mean(&totale_ospedalizzati, ROLLING_WINDOW);
        let nuovi_casi_norm_avg = SeriesCalculator::rolling_mean(&nuovi_casi_norm, ROLLING_WINDOW);
        let rolling_tested = SeriesCalculator::rolling_mean(&rapp_casi_test, ROLLING_WINDOW);
        let rolling_swabs_tested =
            SeriesCalculator::rolling_mean(&perc_tamponi_meno_testati, ROLLING_WINDOW);

        let mut out = df.clone();
        Self::append(&mut out, "nuovi_decessi", nuovi_decessi)?;
        Self::append(&mut out, "delta_tamponi", delta_tamponi)?;
        Self::append(&mut out, "tamp_norm", tamp_norm)?;
        Self::append(&mut out, "nuovi_casi_norm", nuovi_casi_norm)?;
        Self::append(&mut out, "delta_casi_testati", delta_casi_testati)?;
        Self::append(&mut out, "tamponi_meno_casi_testati", tamponi_meno_casi_testati)?;
        Self::append(&mut out, "delta_tamponi_casi", delta_tamponi_casi)?;
        Self::append(&mut out, "rapp_casi_test", rapp_casi_test)?;
        Self::append(&mut out, "perc_tamponi_meno_testati", perc_tamponi_meno_testati)?;
        Self::append(&mut out, "terapia_intensiva_avg", terapia_intensiva_avg)?;
        Self::append(&mut out, "nuovi_positivi_avg", nuovi_positivi_avg)?;
        Self::append(&mut out, "nuovi_decessi_avg", nuovi_decessi_avg)?;
        Self::append(&mut out, "totale_ospedalizzati_avg", totale_ospedalizzati_avg)?;
        Self::append(&mut out, "nuovi_casi_norm_avg", nuovi_casi_norm_avg)?;
        Self::append(&mut out, "rolling_tested", rolling_tested)?;
        Self::append(&mut out, "rolling_swabs_tested", rolling_swabs_tested)?;

        Ok(out)
    }

    /// Extract a raw column as optional floats. A column the upstream feed
    /// renamed or dropped is a schema error, never guessed around.
    fn column_values(df: &DataFrame, name: &str) -> Result<Vec<Option<f64>>, DeriveError> {
        let column = df
            .column(name)
            .map_err(|_| DeriveError::MissingColumn(name.to_string()))?;
        let floats = column.cast(&DataType::Float64)?;
        let ca = floats.f64()?;
        Ok((0..ca.len()).map(|i| ca.get(i)).collect())
    }

    fn append(
        df: &mut DataFrame,
        name: &str,
        values: Vec<Option<f64>>,
    ) -> Result<(), DeriveError> {
        df.with_column(Column::new(name.into(), values))?;
        Ok(())
    }
}
