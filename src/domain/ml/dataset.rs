//! Typed view of a tabular price dataset.
//!
//! Column roles are positional: `Date` is required and converted to a Unix
//! timestamp, the last column is the target, and everything else is a feature
//! in file order.

use crate::domain::errors::DatasetFormatError;
use chrono::{DateTime, NaiveDate, NaiveDateTime};

pub const DATE_COLUMN: &str = "Date";

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];

#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub feature_columns: Vec<String>,
    pub target_column: String,
    /// `Date` column as seconds since the Unix epoch
    pub timestamps: Vec<f64>,
    pub features: Vec<Vec<f64>>,
    pub targets: Vec<f64>,
}

impl Dataset {
    /// Builds a dataset from a header row and raw string records.
    ///
    /// Row numbers in errors are 1-based data rows (the header is not counted).
    pub fn from_records(
        headers: &[String],
        records: &[Vec<String>],
    ) -> Result<Self, DatasetFormatError> {
        if headers.is_empty() {
            return Err(DatasetFormatError::Malformed {
                reason: "no header row".to_string(),
            });
        }

        let date_idx = headers
            .iter()
            .position(|h| h == DATE_COLUMN)
            .ok_or(DatasetFormatError::MissingDateColumn)?;

        let target_idx = headers.len() - 1;
        if target_idx == date_idx {
            return Err(DatasetFormatError::Malformed {
                reason: "Date cannot be the only or last column".to_string(),
            });
        }

        let feature_idx: Vec<usize> = (0..headers.len())
            .filter(|&i| i != date_idx && i != target_idx)
            .collect();

        if feature_idx.is_empty() {
            return Err(DatasetFormatError::NoFeatureColumns {
                target: headers[target_idx].clone(),
            });
        }

        if records.is_empty() {
            return Err(DatasetFormatError::Empty);
        }

        let mut timestamps = Vec::with_capacity(records.len());
        let mut features = Vec::with_capacity(records.len());
        let mut targets = Vec::with_capacity(records.len());

        for (i, record) in records.iter().enumerate() {
            let row = i + 1;
            if record.len() != headers.len() {
                return Err(DatasetFormatError::Malformed {
                    reason: format!(
                        "row {} has {} fields, header has {}",
                        row,
                        record.len(),
                        headers.len()
                    ),
                });
            }

            let raw_date = &record[date_idx];
            let ts = parse_timestamp(raw_date).ok_or_else(|| DatasetFormatError::InvalidDate {
                row,
                value: raw_date.clone(),
            })?;
            timestamps.push(ts);

            let values = feature_idx
                .iter()
                .map(|&j| parse_number(&headers[j], row, &record[j]))
                .collect::<Result<Vec<f64>, _>>()?;
            features.push(values);

            targets.push(parse_number(
                &headers[target_idx],
                row,
                &record[target_idx],
            )?);
        }

        Ok(Self {
            feature_columns: feature_idx.iter().map(|&j| headers[j].clone()).collect(),
            target_column: headers[target_idx].clone(),
            timestamps,
            features,
            targets,
        })
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    pub fn feature_count(&self) -> usize {
        self.feature_columns.len()
    }
}

/// Parses a date or date-time string into seconds since the Unix epoch.
/// Values without an offset are read as UTC.
pub fn parse_timestamp(raw: &str) -> Option<f64> {
    let value = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.timestamp() as f64);
    }

    for fmt in DATETIME_FORMATS {
        if let Ok(ndt) = NaiveDateTime::parse_from_str(value, fmt) {
            return Some(ndt.and_utc().timestamp() as f64);
        }
    }

    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(value, fmt) {
            return date
                .and_hms_opt(0, 0, 0)
                .map(|ndt| ndt.and_utc().timestamp() as f64);
        }
    }

    None
}

fn parse_number(column: &str, row: usize, raw: &str) -> Result<f64, DatasetFormatError> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| DatasetFormatError::NonNumeric {
            column: column.to_string(),
            row,
            value: raw.to_string(),
        })
}
