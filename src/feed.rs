//! Tokenization of the delimited movie dataset into raw rows.
//!
//! This is IO glue in front of the core: failures surface here as
//! `ChartError::Feed` and never reach parsing or reconciliation.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use tracing::debug;

use crate::core::{RawRow, RawValue};
use crate::error::{ChartError, ChartResult};

/// Reads comma-separated text with one header row.
///
/// Quoted and escaped fields are handled by the `csv` reader. Short records
/// leave their trailing columns absent; every present cell stays text.
pub fn read_rows<R: Read>(reader: R) -> ChartResult<Vec<RawRow>> {
    read_rows_limited(reader, None)
}

/// Like `read_rows`, stopping after `limit` data rows when given.
pub fn read_rows_limited<R: Read>(reader: R, limit: Option<usize>) -> ChartResult<Vec<RawRow>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers = csv_reader
        .headers()
        .map_err(|e| ChartError::Feed(format!("failed to read header row: {e}")))?
        .clone();

    let mut rows = Vec::new();
    for (line, record) in csv_reader.records().enumerate() {
        if limit.is_some_and(|limit| rows.len() >= limit) {
            break;
        }
        let record = record
            .map_err(|e| ChartError::Feed(format!("failed to read record {}: {e}", line + 1)))?;
        rows.push(
            headers
                .iter()
                .zip(record.iter())
                .map(|(column, cell)| (column, RawValue::text(cell)))
                .collect::<RawRow>(),
        );
    }

    debug!(rows = rows.len(), columns = headers.len(), "read csv rows");
    Ok(rows)
}

pub fn read_rows_from_path(path: impl AsRef<Path>, limit: Option<usize>) -> ChartResult<Vec<RawRow>> {
    let path = path.as_ref();
    let file = File::open(path)
        .map_err(|e| ChartError::Feed(format!("failed to open {}: {e}", path.display())))?;
    read_rows_limited(file, limit)
}
