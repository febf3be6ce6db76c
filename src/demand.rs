use polars::prelude::*;

use crate::error::StockError;
use crate::schema::{orders, overview};
use crate::workbook::require_columns;

/// The two demand outputs: the per-diameter requirement that feeds the
/// overview, and the raw pending rows kept for audit/export.
#[derive(Debug, Clone)]
pub struct PendingDemand {
    pub by_diameter: DataFrame,
    pub detail: DataFrame,
}

/// A null job sheet number means the order was placed but never assigned to
/// production, which is the demand still ahead of us.
pub fn aggregate_pending(order_lines: &DataFrame) -> Result<PendingDemand, StockError> {
    require_columns(
        order_lines,
        &[orders::JOB_SHEET_NO, orders::WIRE_DIA, orders::WEIGHT_TOTAL],
    )?;

    let detail = order_lines
        .clone()
        .lazy()
        .filter(col(orders::JOB_SHEET_NO).is_null())
        .collect()?;

    // Rows without a usable diameter cannot be keyed into the overview.
    let by_diameter = detail
        .clone()
        .lazy()
        .filter(col(orders::WIRE_DIA).is_not_null())
        .group_by([col(orders::WIRE_DIA)])
        .agg([col(orders::WEIGHT_TOTAL)
            .sum()
            .alias(overview::PENDING_REQUIRED)])
        .sort([orders::WIRE_DIA], SortMultipleOptions::default())
        .collect()?;

    tracing::debug!(
        pending_rows = detail.height(),
        diameters = by_diameter.height(),
        "pending demand aggregated"
    );

    Ok(PendingDemand {
        by_diameter,
        detail,
    })
}
