use crate::domain::errors::DatasetFormatError;
use crate::domain::ml::Dataset;
use std::path::Path;
use tracing::debug;

/// Reads a headered CSV file into a [`Dataset`].
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvDatasetReader;

impl CsvDatasetReader {
    pub fn read(&self, path: &Path) -> Result<Dataset, DatasetFormatError> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_path(path)
            .map_err(|e| DatasetFormatError::Unreadable {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;

        let headers: Vec<String> = rdr
            .headers()
            .map_err(malformed)?
            .iter()
            .map(str::to_string)
            .collect();

        let mut records = Vec::new();
        for result in rdr.records() {
            let record = result.map_err(malformed)?;
            records.push(record.iter().map(str::to_string).collect::<Vec<_>>());
        }

        debug!(
            columns = headers.len(),
            rows = records.len(),
            "Read dataset {:?}",
            path
        );
        Dataset::from_records(&headers, &records)
    }
}

fn malformed(e: csv::Error) -> DatasetFormatError {
    DatasetFormatError::Malformed {
        reason: e.to_string(),
    }
}
