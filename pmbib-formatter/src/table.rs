//! Column-oriented record table
//!
//! The bibliometrix serializers produce a [`Table`]; the BibTeX, RIS and Web
//! of Science serializers consume one. `None` cells are nulls. Tables are
//! read and written as delimited text with the `csv` crate.

use std::io::{Read, Write};

use csv::{ReaderBuilder, WriterBuilder};

use crate::error::{FormatError, Result};

/// Default delimiter for exported tables
pub const EXPORT_DELIMITER: u8 = b',';
/// Delimiter of the append-only record store
pub const STORE_DELIMITER: u8 = b'|';

/// Named columns over rows of optional cells
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Option<String>>>,
}

/// Borrowed view of one table row with by-name lookup
#[derive(Debug, Clone, Copy)]
pub struct TableRow<'a> {
    columns: &'a [String],
    cells: &'a [Option<String>],
}

impl<'a> TableRow<'a> {
    /// Cell value; empty strings count as null
    pub fn get(&self, column: &str) -> Option<&'a str> {
        let index = self.columns.iter().position(|c| c == column)?;
        self.cells
            .get(index)
            .and_then(|cell| cell.as_deref())
            .filter(|value| !value.is_empty())
    }
}

impl Table {
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

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Append a row, padded with nulls or truncated to the column count
    pub fn push_row(&mut self, mut row: Vec<Option<String>>) {
        row.resize(self.columns.len(), None);
        self.rows.push(row);
    }

    pub fn row(&self, index: usize) -> Option<TableRow<'_>> {
        self.rows.get(index).map(|cells| TableRow {
            columns: &self.columns,
            cells,
        })
    }

    pub fn iter_rows(&self) -> impl Iterator<Item = TableRow<'_>> {
        self.rows.iter().map(|cells| TableRow {
            columns: &self.columns,
            cells,
        })
    }

    /// All cells of a column; `None` when the column does not exist
    pub fn column(&self, name: &str) -> Option<Vec<Option<&str>>> {
        let index = self.column_index(name)?;
        Some(
            self.rows
                .iter()
                .map(|row| row.get(index).and_then(|cell| cell.as_deref()))
                .collect(),
        )
    }

    /// Set a column's values, appending the column if it does not exist
    pub fn set_column(&mut self, name: &str, values: Vec<Option<String>>) {
        let index = match self.column_index(name) {
            Some(index) => index,
            None => {
                self.columns.push(name.to_string());
                for row in &mut self.rows {
                    row.push(None);
                }
                self.columns.len() - 1
            }
        };
        let mut values = values.into_iter();
        for row in &mut self.rows {
            row[index] = values.next().flatten();
        }
    }

    /// Apply `f` to every non-null cell
    pub fn map_cells<F>(&mut self, mut f: F)
    where
        F: FnMut(&str) -> String,
    {
        for cell in self.rows.iter_mut().flatten().flatten() {
            *cell = f(cell);
        }
    }

    /// Fail with [`FormatError::MissingColumn`] for the first absent column
    pub fn require_columns(&self, names: &[&str]) -> Result<()> {
        match names.iter().find(|name| !self.has_column(name)) {
            Some(missing) => Err(FormatError::MissingColumn(missing.to_string())),
            None => Ok(()),
        }
    }

    /// New table with exactly `columns`, in that order; unknown columns are null
    pub fn select<S: AsRef<str>>(&self, columns: &[S]) -> Table {
        let indices: Vec<Option<usize>> = columns
            .iter()
            .map(|c| self.column_index(c.as_ref()))
            .collect();
        Table {
            columns: columns.iter().map(|c| c.as_ref().to_string()).collect(),
            rows: self
                .rows
                .iter()
                .map(|row| {
                    indices
                        .iter()
                        .map(|index| index.and_then(|i| row[i].clone()))
                        .collect()
                })
                .collect(),
        }
    }

    /// Read delimited text with a header row; empty fields become null
    pub fn read_delimited<R: Read>(reader: R, delimiter: u8) -> Result<Table> {
        let mut csv_reader = ReaderBuilder::new()
            .delimiter(delimiter)
            .flexible(true)
            .from_reader(reader);

        let mut table = Table::new(csv_reader.headers()?.iter());
        for record in csv_reader.records() {
            let record = record?;
            table.push_row(
                record
                    .iter()
                    .map(|field| (!field.is_empty()).then(|| field.to_string()))
                    .collect(),
            );
        }
        Ok(table)
    }

    /// Write delimited text; nulls are written as empty fields
    pub fn write_delimited<W: Write>(
        &self,
        writer: W,
        delimiter: u8,
        include_header: bool,
    ) -> Result<()> {
        let mut csv_writer = WriterBuilder::new()
            .delimiter(delimiter)
            .from_writer(writer);

        if include_header {
            csv_writer.write_record(&self.columns)?;
        }
        for row in &self.rows {
            csv_writer.write_record(row.iter().map(|cell| cell.as_deref().unwrap_or("")))?;
        }
        csv_writer.flush()?;
        Ok(())
    }

    /// CSV text with a header row
    pub fn to_csv_string(&self, delimiter: u8) -> Result<String> {
        let mut buffer = Vec::new();
        self.write_delimited(&mut buffer, delimiter, true)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}
