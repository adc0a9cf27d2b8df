//! In-memory tabular dataset and its CSV persistence.
//!
//! This module provides:
//! - [`Field`] - a single cell value: integer, float, text, or the
//!   canonical missing marker
//! - [`Dataset`] - an ordered set of named columns over rows of [`Field`]s
//! - **CSV round-trip**: [`Dataset::write_csv`] and [`Dataset::read_csv`]
//! - **Matrix extraction**: [`Dataset::to_matrix`] for numeric stages
//!
//! # Design notes
//! - Rows are dynamic (no fixed struct), so CSV I/O works on raw records
//!   rather than Serde derive.
//! - Writes are atomic: the file is staged next to its destination and
//!   renamed into place, so a crash never leaves a half-written artifact.
//! - Errors are annotated with row numbers for easier debugging.

use crate::error::{PipelineError, Result};
use crate::persist::atomic_write;
use ndarray::Array2;
use std::fs::File;
use std::path::Path;

/// One cell of a [`Dataset`].
///
/// `Missing` is the canonical not-available marker; source adapters are
/// responsible for normalizing sentinel tokens (e.g. the literal `"na"`)
/// into it before a dataset reaches any downstream stage.
#[derive(Debug, Clone, PartialEq)]
pub enum Field {
    Int(i64),
    Float(f64),
    Text(String),
    Missing,
}

impl Field {
    /// Parse a raw CSV cell: integer first, then float, empty as missing,
    /// anything else as text.
    pub fn parse(raw: &str) -> Field {
        if raw.is_empty() {
            return Field::Missing;
        }
        if let Ok(i) = raw.parse::<i64>() {
            return Field::Int(i);
        }
        if let Ok(f) = raw.parse::<f64>() {
            return Field::Float(f);
        }
        Field::Text(raw.to_string())
    }

    /// Numeric view of the cell. `Missing` maps to NaN; text has no
    /// numeric view.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Field::Int(i) => Some(*i as f64),
            Field::Float(f) => Some(*f),
            Field::Missing => Some(f64::NAN),
            Field::Text(_) => None,
        }
    }

    fn to_json(&self) -> serde_json::Value {
        match self {
            Field::Int(i) => serde_json::Value::from(*i),
            Field::Float(f) => serde_json::Number::from_f64(*f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Field::Text(s) => serde_json::Value::String(s.clone()),
            Field::Missing => serde_json::Value::Null,
        }
    }

    fn to_csv_cell(&self) -> String {
        match self {
            Field::Int(i) => i.to_string(),
            Field::Float(f) => f.to_string(),
            Field::Text(s) => s.clone(),
            Field::Missing => String::new(),
        }
    }
}

impl From<f64> for Field {
    fn from(value: f64) -> Self {
        if value.is_nan() {
            Field::Missing
        } else {
            Field::Float(value)
        }
    }
}

/// An ordered, named-column table. Column layout is fixed at construction;
/// every row has exactly one cell per column.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    columns: Vec<String>,
    rows: Vec<Vec<Field>>,
}

impl Dataset {
    /// Create an empty dataset with the given column names.
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Build a dataset from pre-assembled rows, checking widths.
    pub fn from_rows(columns: Vec<String>, rows: Vec<Vec<Field>>) -> Result<Self> {
        let mut ds = Self::new(columns);
        for row in rows {
            ds.push_row(row)?;
        }
        Ok(ds)
    }

    /// Append a row; its width must match the column count.
    pub fn push_row(&mut self, row: Vec<Field>) -> Result<()> {
        if row.len() != self.columns.len() {
            return Err(PipelineError::Schema(format!(
                "row #{} has {} cells, expected {}",
                self.rows.len() + 1,
                row.len(),
                self.columns.len()
            )));
        }
        self.rows.push(row);
        Ok(())
    }

    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn n_cols(&self) -> usize {
        self.columns.len()
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Field>] {
        &self.rows
    }

    /// Index of a column by name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Remove the named column from every row and return its cells.
    ///
    /// # Errors
    /// Returns a schema error if the column does not exist.
    pub fn take_column(&mut self, name: &str) -> Result<Vec<Field>> {
        let idx = self.column_index(name).ok_or_else(|| {
            PipelineError::Schema(format!("column '{name}' not found in dataset"))
        })?;
        self.columns.remove(idx);
        Ok(self.rows.iter_mut().map(|row| row.remove(idx)).collect())
    }

    /// Remove the named column from every row, discarding its cells.
    ///
    /// # Errors
    /// Returns a schema error if the column does not exist.
    pub fn drop_column(&mut self, name: &str) -> Result<()> {
        self.take_column(name).map(drop)
    }

    /// A new dataset containing the rows at `indices`, in that order.
    pub fn select_rows(&self, indices: &[usize]) -> Dataset {
        Dataset {
            columns: self.columns.clone(),
            rows: indices.iter().map(|&i| self.rows[i].clone()).collect(),
        }
    }

    /// Extract the dataset as a numeric matrix, with `Missing` cells
    /// mapped to NaN.
    ///
    /// # Errors
    /// Returns a schema error on the first text cell encountered, naming
    /// its row and column.
    pub fn to_matrix(&self) -> Result<Array2<f64>> {
        let mut data = Vec::with_capacity(self.n_rows() * self.n_cols());
        for (i, row) in self.rows.iter().enumerate() {
            for (j, cell) in row.iter().enumerate() {
                let v = cell.as_f64().ok_or_else(|| {
                    PipelineError::Schema(format!(
                        "non-numeric value in row #{}, column '{}'",
                        i + 1,
                        self.columns[j]
                    ))
                })?;
                data.push(v);
            }
        }
        Array2::from_shape_vec((self.n_rows(), self.n_cols()), data)
            .map_err(|e| PipelineError::Schema(format!("matrix shape: {e}")))
    }

    /// Convert each row to a JSON document keyed by column name, the
    /// inverse of source normalization. Used by the store-seeding utility;
    /// `Missing` cells become JSON null.
    pub fn to_documents(&self) -> Vec<crate::source::Document> {
        self.rows
            .iter()
            .map(|row| {
                self.columns
                    .iter()
                    .cloned()
                    .zip(row.iter().map(Field::to_json))
                    .collect()
            })
            .collect()
    }

    /// Write the dataset as a header-inclusive, index-free CSV file.
    ///
    /// Parent directories are created as needed. The write is staged to a
    /// temporary file and renamed into place.
    ///
    /// # Returns
    /// The number of data rows written.
    pub fn write_csv(&self, path: impl AsRef<Path>) -> Result<usize> {
        let path = path.as_ref();
        let mut wtr = csv::Writer::from_writer(Vec::new());
        wtr.write_record(&self.columns)
            .map_err(|e| PipelineError::csv("write header", path, e))?;
        for (i, row) in self.rows.iter().enumerate() {
            let cells: Vec<String> = row.iter().map(Field::to_csv_cell).collect();
            wtr.write_record(&cells)
                .map_err(|e| PipelineError::csv(format!("write row #{}", i + 1), path, e))?;
        }
        let bytes = wtr
            .into_inner()
            .map_err(|e| PipelineError::io("flush csv buffer", path, e.into_error()))?;
        atomic_write(path, &bytes)?;
        Ok(self.rows.len())
    }

    /// Read a header-inclusive CSV file back into a dataset.
    ///
    /// Each cell is parsed with [`Field::parse`], so empty cells come back
    /// as `Missing` and numeric text as `Int`/`Float`.
    pub fn read_csv(path: impl AsRef<Path>) -> Result<Dataset> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| PipelineError::io("open", path, e))?;
        let mut rdr = csv::ReaderBuilder::new().has_headers(true).from_reader(f);
        let columns: Vec<String> = rdr
            .headers()
            .map_err(|e| PipelineError::csv("read header", path, e))?
            .iter()
            .map(str::to_string)
            .collect();
        let mut ds = Dataset::new(columns);
        for (i, rec) in rdr.records().enumerate() {
            let rec = rec.map_err(|e| PipelineError::csv(format!("parse row #{}", i + 1), path, e))?;
            ds.push_row(rec.iter().map(Field::parse).collect())?;
        }
        Ok(ds)
    }
}
