// 📥 Bulk Importer
//
// Feed rows -> BankSwift records -> validate ALL -> one atomic bulk write.
// Feed layout: [countryIS02, swiftCode, _, bankName, address, _, countryName, ...]

use std::io::Read;

use tracing::{info, warn};

use crate::db::SwiftStore;
use crate::entities::BankSwift;
use crate::error::{DirectoryError, Result};
use crate::schema::{into_directory_error, SchemaValidator};

// Column positions in the feed (columns 2 and 5 are not used)
const COL_COUNTRY_ISO2: usize = 0;
const COL_SWIFT_CODE: usize = 1;
const COL_BANK_NAME: usize = 3;
const COL_ADDRESS: usize = 4;
const COL_COUNTRY_NAME: usize = 6;

/// Minimum number of columns a feed row must have
pub const FEED_COLUMNS: usize = COL_COUNTRY_NAME + 1;

pub struct BulkImporter {
    validator: SchemaValidator,
}

impl BulkImporter {
    pub fn new(validator: SchemaValidator) -> Self {
        BulkImporter { validator }
    }

    /// Read a CSV byte stream into rows, header row included
    pub fn read_rows<R: Read>(&self, reader: R) -> Result<Vec<Vec<String>>> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(false)
            .from_reader(reader);

        let mut rows = Vec::new();
        for result in rdr.records() {
            let record = result.map_err(|e| DirectoryError::ImportParse(e.to_string()))?;
            rows.push(record.iter().map(str::to_string).collect());
        }

        Ok(rows)
    }

    /// Map data rows (the first row is the header) onto records
    pub fn parse_rows(&self, rows: &[Vec<String>]) -> Result<Vec<BankSwift>> {
        rows.iter()
            .enumerate()
            .skip(1)
            .map(|(index, row)| map_row(index + 1, row))
            .collect()
    }

    /// Validate every record, stopping at the first invalid one
    pub fn validate_all(&self, records: &[BankSwift]) -> Result<()> {
        for (index, record) in records.iter().enumerate() {
            if let Err(errors) = self.validator.validate_record(record) {
                // +2: one for the header, one for 1-based line numbers
                let line = index + 2;
                warn!(line, code = %record.swift_code, "invalid feed row, aborting import");
                return Err(into_directory_error(
                    &format!("Invalid SWIFT code record on feed line {}", line),
                    errors,
                ));
            }
        }
        Ok(())
    }

    /// Parse, validate and persist the rows; nothing is written on failure
    pub fn import_rows<S: SwiftStore>(&self, rows: &[Vec<String>], store: &S) -> Result<usize> {
        let records = self.parse_rows(rows)?;
        self.validate_all(&records)?;

        let written = store.save_all(&records)?;
        info!(records = written, "SWIFT code feed imported");
        Ok(written)
    }

    /// Import a CSV feed
    pub fn import<R: Read, S: SwiftStore>(&self, reader: R, store: &S) -> Result<usize> {
        let rows = self.read_rows(reader)?;
        self.import_rows(&rows, store)
    }
}

impl Default for BulkImporter {
    fn default() -> Self {
        Self::new(SchemaValidator::new())
    }
}

fn map_row(line: usize, row: &[String]) -> Result<BankSwift> {
    if row.len() < FEED_COLUMNS {
        return Err(DirectoryError::ImportParse(format!(
            "line {} has {} columns, expected at least {}",
            line,
            row.len(),
            FEED_COLUMNS
        )));
    }

    // The headquarters flag comes from the code, never from the feed
    Ok(BankSwift::new(
        row[COL_SWIFT_CODE].as_str(),
        row[COL_COUNTRY_ISO2].as_str(),
        row[COL_COUNTRY_NAME].as_str(),
        row[COL_BANK_NAME].as_str(),
        row[COL_ADDRESS].as_str(),
    ))
}
