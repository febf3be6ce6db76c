use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader};
use chrono::NaiveDateTime;
use polars::prelude::*;

use crate::error::StockError;

/// One spreadsheet cell, untyped.
///
/// Inputs arrive as free-form spreadsheets; typing happens downstream via
/// per-column coercion, so the grid only distinguishes the shapes the file
/// format itself does.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
    DateTime(NaiveDateTime),
}

impl Cell {
    pub fn text(value: impl Into<String>) -> Self {
        Cell::Text(value.into())
    }

    pub fn num(value: f64) -> Self {
        Cell::Number(value)
    }

    fn from_data(data: &Data) -> Self {
        match data {
            Data::Empty => Cell::Empty,
            Data::String(s) => Cell::Text(s.clone()),
            Data::Float(n) => Cell::Number(*n),
            Data::Int(n) => Cell::Number(*n as f64),
            Data::Bool(b) => Cell::Bool(*b),
            // Error cells carry no usable value
            Data::Error(_) => Cell::Empty,
            Data::DateTime(dt) => match dt.as_datetime() {
                Some(ndt) => Cell::DateTime(ndt),
                None => Cell::Number(dt.as_f64()),
            },
            Data::DateTimeIso(s) => Cell::Text(s.clone()),
            Data::DurationIso(s) => Cell::Text(s.clone()),
        }
    }

    /// Render the cell for a string-typed table. Empty cells become null.
    fn to_text(&self) -> Option<String> {
        match self {
            Cell::Empty => None,
            Cell::Text(s) => {
                if s.is_empty() {
                    None
                } else {
                    Some(s.clone())
                }
            }
            // Integral floats render without a decimal point so that job
            // sheet and order numbers survive as "1234", not "1234.0".
            Cell::Number(n) => {
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    Some(format!("{}", *n as i64))
                } else {
                    Some(format!("{}", n))
                }
            }
            Cell::Bool(b) => Some(if *b { "TRUE" } else { "FALSE" }.to_string()),
            Cell::DateTime(dt) => Some(dt.format("%Y-%m-%d %H:%M:%S").to_string()),
        }
    }
}

/// One worksheet as a dense row-major grid.
#[derive(Debug, Clone)]
pub struct Sheet {
    pub name: String,
    pub rows: Vec<Vec<Cell>>,
}

impl Sheet {
    pub fn from_rows(name: impl Into<String>, rows: Vec<Vec<Cell>>) -> Self {
        Self {
            name: name.into(),
            rows,
        }
    }

    /// Index of the first row whose cells contain `marker` as a
    /// case-insensitive substring.
    pub fn find_header_row(&self, marker: &str) -> Option<usize> {
        let needle = marker.to_lowercase();
        self.rows.iter().position(|row| {
            row.iter().any(|cell| {
                cell.to_text()
                    .is_some_and(|s| s.to_lowercase().contains(&needle))
            })
        })
    }

    /// Re-read the sheet as a string-typed DataFrame with `header_row` as
    /// the header. Rows above the header are discarded; column names are
    /// trimmed, blanks become `Unnamed: {i}` and duplicates get a `.{n}`
    /// suffix.
    pub fn to_dataframe(&self, header_row: usize) -> Result<DataFrame, StockError> {
        let header = self
            .rows
            .get(header_row)
            .ok_or_else(|| StockError::General(format!("sheet '{}' has no row {header_row}", self.name)))?;

        let width = self.rows[header_row..]
            .iter()
            .map(|r| r.len())
            .max()
            .unwrap_or(0);

        let mut names: Vec<String> = Vec::with_capacity(width);
        for i in 0..width {
            let raw = header
                .get(i)
                .and_then(|c| c.to_text())
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| format!("Unnamed: {i}"));
            let mut name = raw.clone();
            let mut n = 0;
            while names.contains(&name) {
                n += 1;
                name = format!("{raw}.{n}");
            }
            names.push(name);
        }

        let data_rows = &self.rows[header_row + 1..];
        let mut columns: Vec<Column> = Vec::with_capacity(width);
        for (i, name) in names.iter().enumerate() {
            let values: Vec<Option<String>> = data_rows
                .iter()
                .map(|row| row.get(i).unwrap_or(&Cell::Empty).to_text())
                .collect();
            columns.push(Column::new(name.as_str().into(), values));
        }

        Ok(DataFrame::new(columns)?)
    }
}

/// An in-memory workbook: ordered sheets, untyped cells.
///
/// This is the boundary the pipeline consumes: however the file arrived,
/// by the time extraction runs it is one of these.
#[derive(Debug, Clone, Default)]
pub struct Workbook {
    pub sheets: Vec<Sheet>,
}

impl Workbook {
    pub fn new(sheets: Vec<Sheet>) -> Self {
        Self { sheets }
    }

    /// Open an xlsx/xls/ods workbook from disk.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StockError> {
        let mut workbook = open_workbook_auto(path.as_ref())?;
        let sheet_names: Vec<String> = workbook.sheet_names().to_vec();

        let mut sheets = Vec::with_capacity(sheet_names.len());
        for name in sheet_names {
            let range = workbook.worksheet_range(&name)?;
            let (height, width) = range.get_size();
            // The calamine range starts at the first used cell, not A1;
            // re-anchor so row indices match what the sheet author sees.
            let (start_row, start_col) = range.start().unwrap_or((0, 0));
            let (start_row, start_col) = (start_row as usize, start_col as usize);

            let mut rows = vec![vec![Cell::Empty; start_col + width]; start_row + height];
            for (r, row) in range.rows().enumerate() {
                for (c, data) in row.iter().enumerate() {
                    rows[start_row + r][start_col + c] = Cell::from_data(data);
                }
            }
            sheets.push(Sheet { name, rows });
        }

        Ok(Self { sheets })
    }
}

// ── Tabular helpers ─────────────────────────────────────────────────────────

/// Read a CSV file with all columns as String dtype and trimmed names.
pub fn read_csv_table(path: impl AsRef<Path>) -> Result<DataFrame, StockError> {
    let mut df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0)) // all columns as String
        .try_into_reader_with_file_path(Some(path.as_ref().to_path_buf()))?
        .finish()?;

    let trimmed: Vec<String> = df
        .get_column_names_str()
        .iter()
        .map(|c| c.trim().to_string())
        .collect();
    df.set_column_names(trimmed.as_slice())?;

    Ok(df)
}

pub fn require_columns(df: &DataFrame, required: &[&str]) -> Result<(), StockError> {
    for &name in required {
        if df.column(name).is_err() {
            return Err(StockError::MissingColumn(name.to_string()));
        }
    }
    Ok(())
}

/// Coerce a string column to Float64, non-numeric entries becoming null.
pub fn to_numeric(column: &str) -> Expr {
    col(column)
        .str()
        .strip_chars(lit(" \t\r\n"))
        .cast(DataType::Float64)
}
