//! Row windows rendered as separate charts, and their display units.

use std::fmt;
use std::ops::Range;
use std::str::FromStr;

use crate::error::DiagramError;

/// Rows per bounded window.
pub const WINDOW_LEN: usize = 5;

/// Unit of the plotted values. Raw estimates are nanoseconds.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Unit {
    /// Raw values.
    Nanos,
    /// Values divided by 1000.
    Micros,
}

impl Unit {
    /// Label used in axis titles.
    pub fn as_str(self) -> &'static str {
        match self {
            Unit::Nanos => "ns",
            Unit::Micros => "us",
        }
    }

    /// Divisor applied to raw nanosecond values.
    pub fn divisor(self) -> f64 {
        match self {
            Unit::Nanos => 1.0,
            Unit::Micros => 1000.0,
        }
    }
}

impl FromStr for Unit {
    type Err = DiagramError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ns" => Ok(Unit::Nanos),
            "us" => Ok(Unit::Micros),
            other => Err(DiagramError::UnsupportedUnit(other.to_string())),
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A contiguous slice of table rows drawn as one chart.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Window {
    /// Suffix of the chart title and file name.
    pub name: &'static str,
    /// Rows covered, always within `0..row_count`.
    pub rows: Range<usize>,
    /// Unit the chart is drawn in.
    pub unit: Unit,
}

/// The four windows drawn for a table of `row_count` rows: `first_5`,
/// `mid_5`, `last_5` and `all`.
///
/// Tables shorter than [`WINDOW_LEN`] get windows that cover every row.
pub fn windows(row_count: usize) -> [Window; 4] {
    let mid_l = row_count.saturating_sub(WINDOW_LEN) / 2;
    let mid_r = row_count - mid_l;
    [
        Window {
            name: "first_5",
            rows: 0..WINDOW_LEN.min(row_count),
            unit: Unit::Nanos,
        },
        Window {
            name: "mid_5",
            rows: mid_l..mid_r,
            unit: Unit::Micros,
        },
        Window {
            name: "last_5",
            rows: row_count.saturating_sub(WINDOW_LEN)..row_count,
            unit: Unit::Micros,
        },
        Window {
            name: "all",
            rows: 0..row_count,
            unit: Unit::Micros,
        },
    ]
}
