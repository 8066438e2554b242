//! Aggregation of run records into a size-by-series table.

use std::collections::HashMap;
use std::fmt;
use std::ops::Range;

use serde::Serialize;
use tracing::warn;

use crate::error::{DiagramError, Result};
use crate::report::RunRecord;

/// One series of the table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Column {
    /// Group name shared by the series' runs.
    pub name: String,
    /// One value per table row.
    pub values: Vec<f64>,
}

/// Point estimates with input sizes as rows and groups as columns.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Table {
    rows: Vec<String>,
    columns: Vec<Column>,
}

impl Table {
    /// Builds a table from explicit rows and columns.
    ///
    /// Returns [`DiagramError::ColumnLength`] if a column does not hold one
    /// value per row.
    pub fn new(rows: Vec<String>, columns: Vec<Column>) -> Result<Self> {
        for column in &columns {
            if column.values.len() != rows.len() {
                return Err(DiagramError::ColumnLength {
                    group: column.name.clone(),
                    expected: rows.len(),
                    found: column.values.len(),
                });
            }
        }
        Ok(Self { rows, columns })
    }

    /// Groups `records` into columns and reads each run's `estimate`.
    ///
    /// Columns keep the order in which groups first appear. Runs are ordered
    /// by index within each group, and the first group's size labels become
    /// the row labels; every other column is aligned to them by position.
    /// Values are truncated to whole nanoseconds.
    pub fn aggregate(records: Vec<RunRecord>, estimate: &str) -> Result<Self> {
        let mut order: HashMap<String, usize> = HashMap::new();
        let mut groups: Vec<(String, Vec<RunRecord>)> = Vec::new();
        for record in records {
            let slot = *order.entry(record.group.clone()).or_insert_with(|| {
                groups.push((record.group.clone(), Vec::new()));
                groups.len() - 1
            });
            groups[slot].1.push(record);
        }
        for (_, runs) in &mut groups {
            runs.sort_by_key(|run| run.idx);
        }

        let rows: Vec<String> = match groups.first() {
            Some((_, reference)) => reference.iter().map(|run| run.size.clone()).collect(),
            None => Vec::new(),
        };

        let mut columns = Vec::with_capacity(groups.len());
        for (name, runs) in groups {
            let sizes_match = runs.len() == rows.len()
                && runs.iter().zip(&rows).all(|(run, label)| run.size == *label);
            if !sizes_match {
                warn!(
                    group = %name,
                    "size labels differ from the reference group; aligning by position"
                );
            }
            let values = runs
                .iter()
                .map(|run| run.point_estimate(estimate).map(f64::trunc))
                .collect::<Result<Vec<_>>>()?;
            columns.push(Column { name, values });
        }
        Self::new(rows, columns)
    }

    /// Row labels, in plotting order.
    pub fn rows(&self) -> &[String] {
        &self.rows
    }

    /// Series, in column order.
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Number of rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Copy of the rows in `range`, clamped to the table bounds.
    pub fn slice(&self, range: Range<usize>) -> Table {
        let end = range.end.min(self.rows.len());
        let start = range.start.min(end);
        Table {
            rows: self.rows[start..end].to_vec(),
            columns: self
                .columns
                .iter()
                .map(|column| Column {
                    name: column.name.clone(),
                    values: column.values[start..end].to_vec(),
                })
                .collect(),
        }
    }

    /// Copy with every value divided by `divisor`.
    pub fn scaled(&self, divisor: f64) -> Table {
        Table {
            rows: self.rows.clone(),
            columns: self
                .columns
                .iter()
                .map(|column| Column {
                    name: column.name.clone(),
                    values: column.values.iter().map(|value| value / divisor).collect(),
                })
                .collect(),
        }
    }

    /// Smallest and largest value across all columns.
    pub fn value_range(&self) -> Option<(f64, f64)> {
        self.columns
            .iter()
            .flat_map(|column| column.values.iter().copied())
            .fold(None, |acc, value| match acc {
                None => Some((value, value)),
                Some((lo, hi)) => Some((lo.min(value), hi.max(value))),
            })
    }

    /// Pretty-printed JSON encoding.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(DiagramError::Encode)
    }
}

fn format_value(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{value:.0}")
    } else {
        format!("{value}")
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label_width = self.rows.iter().map(String::len).max().unwrap_or(0);
        let cells: Vec<Vec<String>> = self
            .columns
            .iter()
            .map(|column| column.values.iter().copied().map(format_value).collect())
            .collect();
        let widths: Vec<usize> = self
            .columns
            .iter()
            .zip(&cells)
            .map(|(column, cells)| {
                cells
                    .iter()
                    .map(String::len)
                    .chain(std::iter::once(column.name.len()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        write!(f, "{:label_width$}", "")?;
        for (column, width) in self.columns.iter().zip(&widths) {
            write!(f, "  {:>width$}", column.name)?;
        }
        writeln!(f)?;
        for (row, label) in self.rows.iter().enumerate() {
            write!(f, "{label:<label_width$}")?;
            for (cells, width) in cells.iter().zip(&widths) {
                write!(f, "  {:>width$}", cells[row])?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
