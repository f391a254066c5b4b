// src/export.rs
// CSV export of query results

use std::fs;
use std::io::Write;
use std::path::Path;

use tracing::{error, info};

use crate::store::{QueryResult, StoreResult};

pub const DELIMITER: u8 = b',';

pub struct Exporter;

impl Exporter {
    /// Write `result` as CSV: a header of column names, then one line per row.
    /// Fields are quoted only when they contain the delimiter, a quote or a newline.
    pub fn export_to_writer<W: Write>(result: &QueryResult, writer: W) -> StoreResult<()> {
        let mut csv_writer = csv::WriterBuilder::new()
            .delimiter(DELIMITER)
            .quote_style(csv::QuoteStyle::Necessary)
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(writer);

        csv_writer.write_record(result.columns().iter().map(|c| c.name.as_str()))?;
        for row in result.rows() {
            csv_writer.write_record(row.values.iter().map(|(_, v)| v.to_string()))?;
        }
        csv_writer.flush()?;
        Ok(())
    }

    /// Export to a file. The file is written in one go, so a failed export
    /// never leaves a partial file behind.
    pub fn export(result: &QueryResult, destination: &Path) -> StoreResult<()> {
        let mut buffer = Vec::new();
        Self::export_to_writer(result, &mut buffer)?;

        if let Err(e) = fs::write(destination, &buffer) {
            error!("Failed to export '{}' to {:?}: {}", result.table(), destination, e);
            return Err(e.into());
        }
        info!(
            "Exported {} rows of '{}' to {:?}",
            result.len(),
            result.table(),
            destination
        );
        Ok(())
    }
}
