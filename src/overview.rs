use polars::prelude::*;

use crate::error::StockError;
use crate::schema::overview::{
    MONTHS_OF_COVERAGE, PENDING_REQUIRED, SURPLUS_SHORTAGE, TOTAL_AVAILABLE,
};
use crate::schema::{inventory, orders, usage};

/// Left-join pending demand against balances, incoming stock and the usage
/// baseline, all keyed on wire diameter.
///
/// A diameter with demand but nothing recorded elsewhere means exactly
/// "zero on all fronts", so every null left over after the joins becomes 0.
pub fn build_overview(
    pending: &DataFrame,
    balances: &DataFrame,
    incoming: &DataFrame,
    usage_baseline: &DataFrame,
    suppliers: &[String],
) -> Result<DataFrame, StockError> {
    let mut incoming_cols: Vec<Expr> = vec![col(orders::WIRE_DIA)];
    incoming_cols.extend(suppliers.iter().map(|s| col(s.as_str())));

    let joined = pending
        .clone()
        .lazy()
        .join(
            balances.clone().lazy(),
            [col(orders::WIRE_DIA)],
            [col(orders::WIRE_DIA)],
            JoinArgs::new(JoinType::Left),
        )
        .join(
            incoming.clone().lazy().select(incoming_cols),
            [col(orders::WIRE_DIA)],
            [col(orders::WIRE_DIA)],
            JoinArgs::new(JoinType::Left),
        )
        .join(
            usage_baseline
                .clone()
                .lazy()
                .select([col(orders::WIRE_DIA), col(usage::AVG_MONTHLY)]),
            [col(orders::WIRE_DIA)],
            [col(orders::WIRE_DIA)],
            JoinArgs::new(JoinType::Left),
        )
        .collect()?;

    let value_columns: Vec<String> = joined
        .get_column_names_str()
        .iter()
        .filter(|n| **n != orders::WIRE_DIA)
        .map(|n| n.to_string())
        .collect();
    let fills: Vec<Expr> = value_columns
        .iter()
        .map(|n| col(n.as_str()).fill_null(lit(0.0)))
        .collect();

    Ok(joined
        .lazy()
        .with_columns(fills)
        .sort([orders::WIRE_DIA], SortMultipleOptions::default())
        .collect()?)
}

/// Availability view over the overview table for an included-supplier set.
///
/// Pure presentation-time computation: the overview itself is never
/// modified, and calling this repeatedly with different subsets is cheap.
/// Months of coverage is missing (not infinite) where the usage baseline
/// is exactly zero.
pub fn project_availability(
    overview: &DataFrame,
    suppliers: &[String],
    included: &[String],
) -> Result<DataFrame, StockError> {
    for name in included {
        if !suppliers.contains(name) {
            return Err(StockError::UnknownSupplier(name.clone()));
        }
    }

    let height = overview.height();
    let on_hand = overview.column(inventory::AVAILABLE)?.f64()?;
    let required = overview.column(PENDING_REQUIRED)?.f64()?;
    let baseline = overview.column(usage::AVG_MONTHLY)?.f64()?;

    let mut incoming_cols = Vec::with_capacity(included.len());
    for name in included {
        incoming_cols.push(overview.column(name.as_str())?.f64()?);
    }

    let mut total = Vec::with_capacity(height);
    let mut surplus = Vec::with_capacity(height);
    let mut months: Vec<Option<f64>> = Vec::with_capacity(height);

    for i in 0..height {
        let mut available = on_hand.get(i).unwrap_or(0.0);
        for qty in &incoming_cols {
            available += qty.get(i).unwrap_or(0.0);
        }
        let diff = available - required.get(i).unwrap_or(0.0);
        let base = baseline.get(i).unwrap_or(0.0);

        total.push(available);
        surplus.push(diff);
        months.push(if base == 0.0 {
            None
        } else {
            Some(round2(diff / base))
        });
    }

    let mut columns = overview.get_columns().to_vec();
    columns.push(Column::new(TOTAL_AVAILABLE.into(), total));
    columns.push(Column::new(SURPLUS_SHORTAGE.into(), surplus));
    columns.push(Column::new(MONTHS_OF_COVERAGE.into(), months));

    Ok(DataFrame::new(columns)?)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::incoming::{BOLIN, KEWEI, QS};

    fn roster() -> Vec<String> {
        vec![KEWEI.to_string(), QS.to_string(), BOLIN.to_string()]
    }

    fn keyed(name: &str, dias: Vec<f64>, values: Vec<f64>) -> DataFrame {
        DataFrame::new(vec![
            Column::new(orders::WIRE_DIA.into(), dias),
            Column::new(name.into(), values),
        ])
        .unwrap()
    }

    fn sample_overview() -> DataFrame {
        let pending = keyed(PENDING_REQUIRED, vec![2.0], vec![20.0]);
        let balances = keyed(inventory::AVAILABLE, vec![2.0], vec![30.0]);
        let incoming = DataFrame::new(vec![
            Column::new(orders::WIRE_DIA.into(), vec![2.0]),
            Column::new(KEWEI.into(), vec![5.0]),
            Column::new(QS.into(), vec![0.0]),
            Column::new(BOLIN.into(), vec![0.0]),
        ])
        .unwrap();
        let usage_baseline = keyed(usage::AVG_MONTHLY, vec![2.0], vec![10.0]);
        build_overview(&pending, &balances, &incoming, &usage_baseline, &roster()).unwrap()
    }

    fn cell(df: &DataFrame, name: &str, i: usize) -> Option<f64> {
        df.column(name).unwrap().f64().unwrap().get(i)
    }

    #[test]
    fn all_suppliers_included() {
        let overview = sample_overview();
        let view = project_availability(&overview, &roster(), &roster()).unwrap();
        assert_eq!(cell(&view, TOTAL_AVAILABLE, 0), Some(35.0));
        assert_eq!(cell(&view, SURPLUS_SHORTAGE, 0), Some(15.0));
        assert_eq!(cell(&view, MONTHS_OF_COVERAGE, 0), Some(1.5));
    }

    #[test]
    fn toggling_a_supplier_off_removes_its_quantity() {
        let overview = sample_overview();
        let included = vec![QS.to_string(), BOLIN.to_string()];
        let view = project_availability(&overview, &roster(), &included).unwrap();
        assert_eq!(cell(&view, TOTAL_AVAILABLE, 0), Some(30.0));
        assert_eq!(cell(&view, SURPLUS_SHORTAGE, 0), Some(10.0));
        assert_eq!(cell(&view, MONTHS_OF_COVERAGE, 0), Some(1.0));
    }

    #[test]
    fn no_suppliers_means_on_hand_only() {
        let overview = sample_overview();
        let view = project_availability(&overview, &roster(), &[]).unwrap();
        assert_eq!(cell(&view, TOTAL_AVAILABLE, 0), Some(30.0));
    }

    #[test]
    fn zero_baseline_gives_missing_coverage() {
        let pending = keyed(PENDING_REQUIRED, vec![1.6], vec![5.0]);
        let balances = keyed(inventory::AVAILABLE, vec![1.6], vec![10.0]);
        let incoming = DataFrame::new(vec![
            Column::new(orders::WIRE_DIA.into(), vec![1.6]),
            Column::new(KEWEI.into(), vec![0.0]),
            Column::new(QS.into(), vec![0.0]),
            Column::new(BOLIN.into(), vec![0.0]),
        ])
        .unwrap();
        let usage_baseline = keyed(usage::AVG_MONTHLY, vec![1.6], vec![0.0]);
        let overview =
            build_overview(&pending, &balances, &incoming, &usage_baseline, &roster()).unwrap();
        let view = project_availability(&overview, &roster(), &roster()).unwrap();
        assert_eq!(cell(&view, MONTHS_OF_COVERAGE, 0), None);
    }

    #[test]
    fn unmatched_diameter_is_zero_on_all_fronts() {
        // demand for a diameter no other table knows about
        let pending = keyed(PENDING_REQUIRED, vec![2.0, 4.0], vec![20.0, 7.0]);
        let balances = keyed(inventory::AVAILABLE, vec![2.0], vec![30.0]);
        let incoming = DataFrame::new(vec![
            Column::new(orders::WIRE_DIA.into(), vec![2.0]),
            Column::new(KEWEI.into(), vec![5.0]),
            Column::new(QS.into(), vec![0.0]),
            Column::new(BOLIN.into(), vec![0.0]),
        ])
        .unwrap();
        let usage_baseline = keyed(usage::AVG_MONTHLY, vec![2.0], vec![10.0]);
        let overview =
            build_overview(&pending, &balances, &incoming, &usage_baseline, &roster()).unwrap();

        assert_eq!(cell(&overview, inventory::AVAILABLE, 1), Some(0.0));
        assert_eq!(cell(&overview, KEWEI, 1), Some(0.0));
        assert_eq!(cell(&overview, usage::AVG_MONTHLY, 1), Some(0.0));

        let view = project_availability(&overview, &roster(), &roster()).unwrap();
        assert_eq!(cell(&view, TOTAL_AVAILABLE, 1), Some(0.0));
        assert_eq!(cell(&view, SURPLUS_SHORTAGE, 1), Some(-7.0));
        assert_eq!(cell(&view, MONTHS_OF_COVERAGE, 1), None);
    }

    #[test]
    fn unknown_supplier_is_rejected() {
        let overview = sample_overview();
        let err = project_availability(&overview, &roster(), &["Nova".to_string()]).unwrap_err();
        assert!(matches!(err, StockError::UnknownSupplier(ref s) if s == "Nova"));
    }

    #[test]
    fn projection_leaves_the_overview_untouched() {
        let overview = sample_overview();
        let before = overview.clone();
        let _ = project_availability(&overview, &roster(), &roster()).unwrap();
        assert!(overview.equals_missing(&before));
        assert!(overview.column(TOTAL_AVAILABLE).is_err());
    }
}
