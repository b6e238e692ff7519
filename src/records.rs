//! Record files for trend aggregation.
//!
//! A record file is either a JSON array of objects or a CSV file with a
//! header row (the format of metadata exports such as video lists with an
//! `upload_date` column). A JSON `null` and an empty CSV cell both count as
//! a present column without a usable value.

use std::collections::HashMap;
use std::path::Path;

use serde_json::{Map, Value};
use tracing::{info, instrument};

use crate::error::RecordsError;
use crate::trends::{TrendAggregator, TrendTable};

/// Rows loaded from a record file.
#[derive(Debug, Clone, PartialEq)]
pub enum Records {
    Json(Vec<Map<String, Value>>),
    Csv(Vec<HashMap<String, String>>),
}

impl Records {
    pub fn from_json_str(source: &str) -> Result<Self, RecordsError> {
        Ok(Records::Json(serde_json::from_str(source)?))
    }

    /// Parse CSV text with a header row. Short rows leave their trailing
    /// columns absent.
    pub fn from_csv_reader<R: std::io::Read>(reader: R) -> Result<Self, RecordsError> {
        let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
        let rows = reader
            .deserialize::<HashMap<String, String>>()
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Records::Csv(rows))
    }

    /// Load a record file. `.csv` files are read as CSV, everything else as
    /// a JSON array.
    #[instrument(level = "info", skip_all, fields(path = %path.as_ref().display()))]
    pub fn load(path: impl AsRef<Path>) -> Result<Self, RecordsError> {
        let path = path.as_ref();
        let io_error = |source| RecordsError::Io {
            path: path.display().to_string(),
            source,
        };
        let is_csv = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
        let records = if is_csv {
            Self::from_csv_reader(std::fs::File::open(path).map_err(io_error)?)?
        } else {
            Self::from_json_str(&std::fs::read_to_string(path).map_err(io_error)?)?
        };
        info!(rows = records.len(), "Loaded records");
        Ok(records)
    }

    pub fn len(&self) -> usize {
        match self {
            Records::Json(rows) => rows.len(),
            Records::Csv(rows) => rows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn aggregate(&self, aggregator: &TrendAggregator<'_>) -> TrendTable {
        match self {
            Records::Json(rows) => aggregator.aggregate(rows),
            Records::Csv(rows) => aggregator.aggregate(rows),
        }
    }
}
