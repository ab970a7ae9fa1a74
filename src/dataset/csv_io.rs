//! Delimited-text boundary. Column types are inferred per column: a column whose
//! non-missing cells all parse as numbers becomes numeric, anything else stays text.

use super::{is_missing_token, Table, Value};
use crate::error::Result;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

impl Table {
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(reader);
        let columns: Vec<String> = rdr.headers()?.iter().map(|h| h.to_string()).collect();

        let mut raw: Vec<csv::StringRecord> = Vec::new();
        for record in rdr.records() {
            raw.push(record?);
        }

        let numeric: Vec<bool> = (0..columns.len())
            .map(|c| {
                raw.iter()
                    .filter_map(|r| r.get(c))
                    .filter(|cell| !is_missing_token(cell))
                    .all(|cell| cell.trim().parse::<f64>().is_ok())
            })
            .collect();

        let rows = raw
            .iter()
            .map(|r| {
                (0..columns.len())
                    .map(|c| {
                        let cell = r.get(c).unwrap_or("");
                        if is_missing_token(cell) {
                            Value::Missing
                        } else if numeric[c] {
                            cell.trim().parse::<f64>().map(Value::Number).unwrap_or(Value::Missing)
                        } else {
                            Value::Text(cell.to_string())
                        }
                    })
                    .collect()
            })
            .collect();

        let table = Table::from_rows(columns, rows)?;
        tracing::debug!(rows = table.len(), columns = table.width(), "dataset loaded");
        Ok(table)
    }

    pub fn from_csv_path(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        Self::from_csv_reader(file)
    }

    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        let mut wtr = csv::Writer::from_writer(writer);
        wtr.write_record(self.columns())?;
        for row in self.rows() {
            wtr.write_record(row.iter().map(|v| v.to_string()))?;
        }
        wtr.flush()?;
        Ok(())
    }
}
