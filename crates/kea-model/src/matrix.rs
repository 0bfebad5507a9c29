//! Named-column feature matrix.

use crate::ModelError;

/// Rows of `f64` features under an ordered list of column names.
///
/// Every row has exactly one value per column. Row order is significant: it
/// matches the order of the candidates the rows were computed for.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureMatrix {
    /// Column names, in order.
    columns: Vec<String>,
    /// Row-major values.
    rows: Vec<Vec<f64>>,
}

impl FeatureMatrix {
    /// Creates an empty matrix with the given columns.
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Creates a matrix from rows, checking their width.
    pub fn from_rows<I, S>(columns: I, rows: Vec<Vec<f64>>) -> Result<Self, ModelError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut matrix = Self::new(columns);
        for row in rows {
            matrix.push_row(row)?;
        }
        Ok(matrix)
    }

    /// Creates a matrix from fixed-width rows; the width always matches.
    pub fn from_arrays<const N: usize, R>(columns: [&str; N], rows: R) -> Self
    where
        R: IntoIterator<Item = [f64; N]>,
    {
        Self {
            columns: columns.iter().map(|c| c.to_string()).collect(),
            rows: rows.into_iter().map(Vec::from).collect(),
        }
    }

    /// Appends a row.
    pub fn push_row(&mut self, row: Vec<f64>) -> Result<(), ModelError> {
        if row.len() != self.columns.len() {
            return Err(ModelError::RaggedRow {
                row: self.rows.len(),
                expected: self.columns.len(),
                found: row.len(),
            });
        }
        self.rows.push(row);
        Ok(())
    }

    /// Appends all rows of another matrix with the same columns.
    pub fn append(&mut self, other: Self) -> Result<(), ModelError> {
        self.check_schema(&other.columns)?;
        self.rows.extend(other.rows);
        Ok(())
    }

    /// Fails with [`ModelError::SchemaMismatch`] unless the columns equal `expected`.
    pub fn check_schema(&self, expected: &[String]) -> Result<(), ModelError> {
        if self.columns != expected {
            return Err(ModelError::SchemaMismatch {
                expected: expected.to_vec(),
                found: self.columns.clone(),
            });
        }
        Ok(())
    }

    /// Column names.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Index of a named column.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// All rows.
    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    /// One row.
    pub fn row(&self, index: usize) -> Option<&[f64]> {
        self.rows.get(index).map(Vec::as_slice)
    }

    /// Values of one column, top to bottom.
    pub fn column(&self, index: usize) -> impl Iterator<Item = f64> + '_ {
        self.rows.iter().map(move |row| row[index])
    }

    /// Number of rows.
    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns.
    pub fn n_cols(&self) -> usize {
        self.columns.len()
    }

    /// Returns true if the matrix has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Returns a matrix with the same columns and every row transformed.
    pub fn map_rows(&self, mut f: impl FnMut(&[f64]) -> Vec<f64>) -> Self {
        Self {
            columns: self.columns.clone(),
            rows: self.rows.iter().map(|row| f(row)).collect(),
        }
    }
}
