use chrono::NaiveDate;
use polars::prelude::*;

use crate::dates::DateRules;
use crate::error::StockError;
use crate::schema::orders;
use crate::workbook::{require_columns, Workbook};

/// The one sheet in the orders workbook that is not customer data.
pub const SUMMARY_SHEET: &str = "Summary 2025";

/// Orders dated before this are history, not demand.
pub const ORDER_CUTOFF: NaiveDate = match NaiveDate::from_ymd_opt(2025, 1, 1) {
    Some(date) => date,
    None => unreachable!(),
};

pub(crate) const EPOCH: NaiveDate = match NaiveDate::from_ymd_opt(1970, 1, 1) {
    Some(date) => date,
    None => unreachable!(),
};

/// Extract the unified order-line table from a per-customer orders workbook.
///
/// Each customer sheet carries an unknown amount of title clutter above the
/// real header, so the header row is discovered by scanning for the
/// "P/O Date" marker; sheets without one contribute nothing. The surviving
/// sheets are tagged with their sheet name as the customer, concatenated,
/// date-normalized per customer convention, filtered to the cutoff, and
/// truncated after the "Order No" column.
pub fn extract_orders(workbook: &Workbook, rules: &DateRules) -> Result<DataFrame, StockError> {
    let mut frames: Vec<LazyFrame> = Vec::new();

    for sheet in &workbook.sheets {
        if sheet.name == SUMMARY_SHEET {
            continue;
        }
        let Some(header_row) = sheet.find_header_row(orders::PO_DATE) else {
            tracing::warn!(sheet = %sheet.name, "no order header row found; sheet skipped");
            continue;
        };
        let df = sheet.to_dataframe(header_row)?;

        // Customer goes first so the Order No truncation below keeps it.
        let customer = Column::new(
            orders::CUSTOMER.into(),
            vec![sheet.name.as_str(); df.height()],
        );
        let mut columns = vec![customer];
        columns.extend(df.get_columns().iter().cloned());
        frames.push(DataFrame::new(columns)?.lazy());
    }

    if frames.is_empty() {
        return Err(StockError::NoOrderSheets(orders::PO_DATE.to_string()));
    }

    let combined = concat_lf_diagonal(frames.as_slice(), UnionArgs::default())?.collect()?;
    require_columns(
        &combined,
        &[orders::PO_DATE, orders::JOB_SHEET_NO, orders::ORDER_NO],
    )?;

    let dated = normalize_order_dates(combined, rules)?;

    // Columns after "Order No" are downstream status tracking; drop them here.
    let names: Vec<String> = dated
        .get_column_names_str()
        .iter()
        .map(|s| s.to_string())
        .collect();
    let end = names
        .iter()
        .position(|n| n == orders::ORDER_NO)
        .ok_or_else(|| StockError::MissingColumn(orders::ORDER_NO.to_string()))?;

    Ok(dated.select(names[..=end].iter().cloned())?)
}

/// Replace the raw P/O Date strings with parsed dates and keep only rows on
/// or after the cutoff. Unparseable dates are filtered out with the
/// pre-cutoff rows, never an error.
fn normalize_order_dates(df: DataFrame, rules: &DateRules) -> Result<DataFrame, StockError> {
    let height = df.height();
    let customers = df.column(orders::CUSTOMER)?.str()?;
    let raw_dates = df.column(orders::PO_DATE)?.str()?;

    let mut days: Vec<Option<i32>> = Vec::with_capacity(height);
    let mut keep: Vec<bool> = Vec::with_capacity(height);
    for i in 0..height {
        let parsed = rules.normalize(raw_dates.get(i), customers.get(i).unwrap_or(""));
        keep.push(parsed.is_some_and(|d| d >= ORDER_CUTOFF));
        days.push(parsed.map(|d| (d - EPOCH).num_days() as i32));
    }

    let dates = Column::new(orders::PO_DATE.into(), days).cast(&DataType::Date)?;
    let mask = BooleanChunked::from_slice("keep".into(), &keep);

    let mut df = df;
    df.with_column(dates)?;
    Ok(df.filter(&mask)?)
}
