use polars::prelude::*;

use crate::error::StockError;
use crate::schema::orders;
use crate::workbook::{require_columns, to_numeric};

// Computation scaffolding, dropped before the table leaves this module.
const LENGTH_MM: &str = "Length_mm";
const WIDTH_MM: &str = "Width_mm";
const AREA_MM2: &str = "Area_mm2";

/// Density-and-unit factor for the wire material in the mm/kg system.
const WIRE_MASS_FACTOR: f64 = 12.7;
const MM_PER_INCH: f64 = 25.4;

/// Add per-item and total wire weight to an order-line table.
///
/// The five geometric inputs are coerced to numeric first (non-numeric →
/// null); a null in any of them makes both weight columns null for that row.
/// No substitution happens here; zeros only ever appear at aggregation.
pub fn with_weights(df: DataFrame) -> Result<DataFrame, StockError> {
    let geometry: Vec<&str> = orders::GEOMETRY.to_vec();
    require_columns(&df, &geometry)?;

    let casts: Vec<Expr> = geometry.iter().map(|c| to_numeric(c)).collect();

    let out = df
        .lazy()
        .with_columns(casts)
        .with_columns([
            (col(orders::SCREEN_LENGTH) * lit(MM_PER_INCH)).alias(LENGTH_MM),
            (col(orders::SCREEN_WIDTH) * lit(MM_PER_INCH)).alias(WIDTH_MM),
        ])
        .with_columns([(col(LENGTH_MM) * col(WIDTH_MM)).alias(AREA_MM2)])
        .with_columns([((col(orders::WIRE_DIA) * col(orders::WIRE_DIA) * lit(WIRE_MASS_FACTOR)
            / (col(orders::APERTURE) + col(orders::WIRE_DIA)))
            * (col(AREA_MM2) / lit(1_000_000.0)))
        .alias(orders::WEIGHT_PER_ITEM)])
        .with_columns([
            (col(orders::WEIGHT_PER_ITEM) * col(orders::QTY)).alias(orders::WEIGHT_TOTAL)
        ])
        .collect()?;

    let out = out.drop(LENGTH_MM)?.drop(WIDTH_MM)?.drop(AREA_MM2)?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn geometry_df(rows: Vec<[Option<&str>; 5]>) -> DataFrame {
        let mut columns = Vec::new();
        for (i, name) in orders::GEOMETRY.iter().enumerate() {
            let values: Vec<Option<String>> = rows
                .iter()
                .map(|r| r[i].map(|s| s.to_string()))
                .collect();
            columns.push(Column::new((*name).into(), values));
        }
        DataFrame::new(columns).unwrap()
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn computes_weight_from_geometry() {
        // 10in × 10in screen, ø2 wire, 10 apertures, qty 3
        let df = geometry_df(vec![[
            Some("10"),
            Some("10"),
            Some("10"),
            Some("2"),
            Some("3"),
        ]]);
        let out = with_weights(df).unwrap();

        let area_mm2 = 254.0_f64 * 254.0;
        let per_item = (2.0_f64 * 2.0 * 12.7 / (10.0 + 2.0)) * (area_mm2 / 1e6);
        let per = out
            .column(orders::WEIGHT_PER_ITEM)
            .unwrap()
            .f64()
            .unwrap()
            .get(0)
            .unwrap();
        let total = out
            .column(orders::WEIGHT_TOTAL)
            .unwrap()
            .f64()
            .unwrap()
            .get(0)
            .unwrap();
        assert!(close(per, per_item), "{per} vs {per_item}");
        assert!(close(total, per_item * 3.0));
    }

    #[test]
    fn any_missing_input_makes_weights_missing() {
        let df = geometry_df(vec![
            [Some("10"), Some("10"), None, Some("2"), Some("3")],
            [Some("10"), Some("ten"), Some("10"), Some("2"), Some("3")],
        ]);
        let out = with_weights(df).unwrap();
        let per = out.column(orders::WEIGHT_PER_ITEM).unwrap().f64().unwrap();
        let total = out.column(orders::WEIGHT_TOTAL).unwrap().f64().unwrap();
        for i in 0..2 {
            assert_eq!(per.get(i), None, "row {i}");
            assert_eq!(total.get(i), None, "row {i}");
        }
    }

    #[test]
    fn scaffolding_columns_are_dropped() {
        let df = geometry_df(vec![[Some("1"), Some("1"), Some("1"), Some("1"), Some("1")]]);
        let out = with_weights(df).unwrap();
        for name in [LENGTH_MM, WIDTH_MM, AREA_MM2] {
            assert!(out.column(name).is_err(), "{name} should be gone");
        }
    }

    #[test]
    fn missing_geometry_column_is_fatal() {
        let df = DataFrame::new(vec![Column::new("QTY".into(), vec![Some("1")])]).unwrap();
        let err = with_weights(df).unwrap_err();
        assert!(matches!(err, StockError::MissingColumn(_)));
    }
}
