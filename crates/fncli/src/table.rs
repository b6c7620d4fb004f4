//! Minimal tabular data backing the file-loading coercion.
//!
//! The engine only needs enough of a table to hand callables column
//! values loaded from a CSV path. Anything richer belongs to the client.

use anyhow::{anyhow, bail, Context, Result};
use std::path::Path;

/// An in-memory table: a header row plus string cells.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    /// Builds a table from headers and rows.
    ///
    /// # Errors
    ///
    /// Fails if any row's width differs from the header count.
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Result<Table> {
        for (i, row) in rows.iter().enumerate() {
            if row.len() != headers.len() {
                bail!(
                    "row {} has {} cells, expected {}",
                    i + 1,
                    row.len(),
                    headers.len()
                );
            }
        }
        Ok(Table { headers, rows })
    }

    /// Loads a table from a CSV file with a header row.
    pub fn load(path: &Path) -> Result<Table> {
        let mut reader = csv::Reader::from_path(path)
            .with_context(|| format!("cannot open table {}", path.display()))?;
        let headers = reader
            .headers()
            .with_context(|| format!("cannot read header row of {}", path.display()))?
            .iter()
            .map(str::to_string)
            .collect();
        let mut rows = Vec::new();
        for record in reader.records() {
            let record =
                record.with_context(|| format!("cannot read row of {}", path.display()))?;
            rows.push(record.iter().map(str::to_string).collect());
        }
        Ok(Table { headers, rows })
    }

    /// The header row.
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Number of data rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns true if the table has no data rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The cells of a named column, top to bottom.
    pub fn column(&self, name: &str) -> Result<Vec<&str>> {
        let idx = self
            .headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| anyhow!("table has no column `{name}`"))?;
        Ok(self.rows.iter().map(|row| row[idx].as_str()).collect())
    }

    /// A named column parsed as floating-point values.
    pub fn numeric_column(&self, name: &str) -> Result<Vec<f64>> {
        self.column(name)?
            .iter()
            .map(|cell| {
                cell.trim()
                    .parse::<f64>()
                    .map_err(|_| anyhow!("value `{cell}` in column `{name}` is not numeric"))
            })
            .collect()
    }
}
