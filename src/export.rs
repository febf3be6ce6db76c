use std::path::Path;

use chrono::Duration;
use polars::prelude::*;
use rust_xlsxwriter::Workbook as XlsxWorkbook;

use crate::error::StockError;
use crate::extract::EPOCH;

/// Write a DataFrame to a single-sheet xlsx file: header row from the
/// column names, nulls left blank, dates rendered ISO.
pub fn write_xlsx(df: &DataFrame, path: impl AsRef<Path>) -> Result<(), StockError> {
    let mut workbook = XlsxWorkbook::new();
    let worksheet = workbook.add_worksheet();

    for (c, name) in df.get_column_names_str().iter().enumerate() {
        worksheet.write_string(0, c as u16, *name)?;
    }

    for (c, column) in df.get_columns().iter().enumerate() {
        for (r, value) in column.as_materialized_series().iter().enumerate() {
            let row = (r + 1) as u32;
            let col = c as u16;
            match value {
                AnyValue::Null => {}
                AnyValue::Float64(v) => {
                    worksheet.write_number(row, col, v)?;
                }
                AnyValue::Int64(v) => {
                    worksheet.write_number(row, col, v as f64)?;
                }
                AnyValue::Int32(v) => {
                    worksheet.write_number(row, col, v as f64)?;
                }
                AnyValue::Boolean(v) => {
                    worksheet.write_boolean(row, col, v)?;
                }
                AnyValue::String(s) => {
                    worksheet.write_string(row, col, s)?;
                }
                AnyValue::StringOwned(ref s) => {
                    worksheet.write_string(row, col, s.as_str())?;
                }
                AnyValue::Date(days) => {
                    let date = EPOCH + Duration::days(days as i64);
                    worksheet.write_string(row, col, date.format("%Y-%m-%d").to_string())?;
                }
                other => {
                    worksheet.write_string(row, col, format!("{other}"))?;
                }
            }
        }
    }

    workbook.save(path.as_ref())?;
    Ok(())
}
