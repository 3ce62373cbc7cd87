//! CSV Data Loader Module
//! Fetches the national feed over HTTP and parses it with Polars.

use std::io::Cursor;
use std::time::Duration;

use chrono::NaiveDate;
use polars::prelude::*;
use thiserror::Error;

/// National COVID-19 feed published by the Protezione Civile.
pub const DEFAULT_FEED_URL: &str = "https://raw.githubusercontent.com/pcm-dpc/COVID-19/master/dati-andamento-nazionale/dpc-covid19-ita-andamento-nazionale.csv";

/// Date column of the feed. Values are ISO formatted, so lexicographic
/// order is chronological order.
pub const DATE_COLUMN: &str = "data";

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Failed to fetch feed: {0}")]
    Fetch(#[from] reqwest::Error),
    #[error("Failed to parse CSV: {0}")]
    Csv(#[from] PolarsError),
    #[error("Feed contained no rows")]
    NoData,
}

/// A freshly fetched table plus the date it was fetched on.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub df: DataFrame,
    pub today: NaiveDate,
}

/// Fetches the CSV feed on demand. No caching and no retries: every call
/// hits the network, and a failure surfaces to the caller.
#[derive(Debug, Clone)]
pub struct DataLoader {
    url: String,
    client: reqwest::Client,
}

impl DataLoader {
    /// Build a loader for `url` with a per-request timeout.
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, LoaderError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            url: url.into(),
            client,
        })
    }

    /// Fetch and parse the feed for the current moment.
    pub async fn fetch(&self) -> Result<Snapshot, LoaderError> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await?
            .error_for_status()?;
        let body = response.bytes().await?;
        let df = Self::parse_csv(&body)?;
        Ok(Snapshot {
            df,
            today: chrono::Local::now().date_naive(),
        })
    }

    /// Parse CSV bytes into a chronologically sorted DataFrame.
    pub fn parse_csv(bytes: &[u8]) -> Result<DataFrame, LoaderError> {
        let df = CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(Some(10000))
            .with_ignore_errors(true)
            .into_reader_with_file_handle(Cursor::new(bytes))
            .finish()?;

        if df.height() == 0 {
            return Err(LoaderError::NoData);
        }

        let df = df.sort([DATE_COLUMN], SortMultipleOptions::default())?;
        Ok(df)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &[u8] = b"data,deceduti,tamponi\n\
        2020-02-25T18:00:00,10,8623\n\
        2020-02-24T18:00:00,7,4324\n";

    #[test]
    fn parses_csv_bytes() {
        let df = DataLoader::parse_csv(SAMPLE).unwrap();
        assert_eq!(df.height(), 2);
        assert!(df.column("deceduti").is_ok());
        assert!(df.column("tamponi").is_ok());
    }

    #[test]
    fn sorts_rows_chronologically() {
        let df = DataLoader::parse_csv(SAMPLE).unwrap();
        let dates = df.column(DATE_COLUMN).unwrap().str().unwrap().clone();
        assert_eq!(dates.get(0), Some("2020-02-24T18:00:00"));
        let deceduti = df.column("deceduti").unwrap().i64().unwrap().clone();
        assert_eq!(deceduti.get(0), Some(7));
        assert_eq!(deceduti.get(1), Some(10));
    }

    #[test]
    fn empty_input_is_an_error() {
        assert!(DataLoader::parse_csv(b"").is_err());
    }

    #[test]
    fn header_without_rows_is_an_error() {
        let result = DataLoader::parse_csv(b"data,deceduti,tamponi\n");
        assert!(matches!(result, Err(LoaderError::NoData) | Err(LoaderError::Csv(_))));
    }

    #[tokio::test]
    async fn unreachable_feed_surfaces_fetch_error() {
        // Port 9 (discard) is never serving HTTP here.
        let loader =
            DataLoader::new("http://127.0.0.1:9/feed.csv", Duration::from_millis(500)).unwrap();
        assert!(loader.fetch().await.is_err());
    }
}
