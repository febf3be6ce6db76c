use polars::prelude::*;

use crate::error::StockError;
use crate::schema::{inventory, orders};
use crate::workbook::{to_numeric, Sheet, Workbook};

/// Ledger sheets carry a fixed four-row title block above the header.
const LEDGER_HEADER_ROW: usize = 4;

/// Resolve the current on-hand balance per wire diameter from the coil
/// ledger workbook.
///
/// One sheet per diameter, named with the diameter; ledgers are
/// chronological, so the last non-missing BAL entry is the current balance.
/// A sheet that cannot be read this way degrades to "no data for this
/// diameter"; only a workbook with no usable sheet at all is an error.
pub fn resolve_balances(workbook: &Workbook) -> Result<DataFrame, StockError> {
    let mut diameters: Vec<f64> = Vec::new();
    let mut balances: Vec<f64> = Vec::new();

    for sheet in &workbook.sheets {
        match sheet_balance(sheet) {
            Ok(Some((diameter, balance))) => {
                diameters.push(diameter);
                balances.push(balance);
            }
            Ok(None) => {
                tracing::debug!(sheet = %sheet.name, "ledger sheet skipped");
            }
            Err(err) => {
                tracing::debug!(sheet = %sheet.name, error = %err, "ledger sheet skipped");
            }
        }
    }

    if diameters.is_empty() {
        return Err(StockError::NoBalanceSheets(inventory::BAL.to_string()));
    }

    Ok(DataFrame::new(vec![
        Column::new(orders::WIRE_DIA.into(), diameters),
        Column::new(inventory::AVAILABLE.into(), balances),
    ])?)
}

fn sheet_balance(sheet: &Sheet) -> Result<Option<(f64, f64)>, StockError> {
    let Ok(diameter) = sheet.name.trim().parse::<f64>() else {
        return Ok(None);
    };
    if sheet.rows.len() <= LEDGER_HEADER_ROW {
        return Ok(None);
    }

    let mut df = sheet.to_dataframe(LEDGER_HEADER_ROW)?;
    let upper: Vec<String> = df
        .get_column_names_str()
        .iter()
        .map(|c| c.trim().to_uppercase())
        .collect();
    df.set_column_names(upper.as_slice())?;

    if df.column(inventory::BAL).is_err() {
        return Ok(None);
    }

    let coerced = df
        .lazy()
        .select([to_numeric(inventory::BAL)])
        .collect()?;
    let last = coerced
        .column(inventory::BAL)?
        .f64()?
        .into_iter()
        .flatten()
        .last();

    Ok(last.map(|balance| (diameter, balance)))
}
