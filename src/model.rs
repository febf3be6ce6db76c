use std::path::Path;

use polars::prelude::*;

use crate::dates::DateRules;
use crate::demand;
use crate::error::StockError;
use crate::extract;
use crate::inventory;
use crate::overview;
use crate::schema::{incoming, orders, usage};
use crate::weights;
use crate::workbook::{read_csv_table, require_columns, to_numeric, Workbook};

/// One reconciliation run: owns the four loaded input tables and the
/// configuration (date rules, supplier roster), produces a [`Reconciliation`].
///
/// Inputs arrive as string-typed tables (see [`crate::workbook`]); each
/// loader normalizes its table once, and `reconcile` only joins what was
/// loaded. Nothing is shared between model instances.
pub struct StockModel {
    date_rules: DateRules,
    suppliers: Vec<String>,
    orders: Option<DataFrame>,
    balances: Option<DataFrame>,
    incoming: Option<DataFrame>,
    usage: Option<DataFrame>,
}

impl Default for StockModel {
    fn default() -> Self {
        Self::new()
    }
}

impl StockModel {
    pub fn new() -> Self {
        Self {
            date_rules: DateRules::default(),
            suppliers: incoming::SUPPLIERS.iter().map(|s| s.to_string()).collect(),
            orders: None,
            balances: None,
            incoming: None,
            usage: None,
        }
    }

    pub fn with_date_rules(mut self, rules: DateRules) -> Self {
        self.date_rules = rules;
        self
    }

    /// Replace the supplier roster. Adding a fourth supplier is a roster
    /// change plus a matching column in the incoming-stock table.
    pub fn with_suppliers(mut self, suppliers: Vec<String>) -> Self {
        self.suppliers = suppliers;
        self
    }

    pub fn suppliers(&self) -> &[String] {
        &self.suppliers
    }

    // ── Data loading ────────────────────────────────────────────────────────

    /// Extract and weigh the customer-orders workbook.
    pub fn load_orders(&mut self, workbook: &Workbook) -> Result<&DataFrame, StockError> {
        let extracted = extract::extract_orders(workbook, &self.date_rules)?;
        let weighted = weights::with_weights(extracted)?;
        tracing::info!(rows = weighted.height(), "order lines extracted");
        Ok(&*self.orders.insert(weighted))
    }

    pub fn load_orders_xlsx(&mut self, path: impl AsRef<Path>) -> Result<&DataFrame, StockError> {
        let workbook = Workbook::open(path)?;
        self.load_orders(&workbook)
    }

    /// Resolve per-diameter balances from the coil-ledger workbook.
    pub fn load_coil_balances(&mut self, workbook: &Workbook) -> Result<&DataFrame, StockError> {
        let balances = inventory::resolve_balances(workbook)?;
        tracing::info!(diameters = balances.height(), "coil balances resolved");
        Ok(&*self.balances.insert(balances))
    }

    pub fn load_coil_balances_xlsx(
        &mut self,
        path: impl AsRef<Path>,
    ) -> Result<&DataFrame, StockError> {
        let workbook = Workbook::open(path)?;
        self.load_coil_balances(&workbook)
    }

    /// Normalize the incoming-stock table: the key column renames to
    /// "Wire ø", every roster supplier must be present, and supplier
    /// quantities default to zero where absent.
    pub fn load_incoming(&mut self, table: DataFrame) -> Result<&DataFrame, StockError> {
        let mut table = trim_column_names(table)?;
        if table.column(incoming::WIRE_DIAMETER).is_ok() {
            table = table
                .lazy()
                .rename([incoming::WIRE_DIAMETER], [orders::WIRE_DIA], true)
                .collect()?;
        }
        require_columns(&table, &[orders::WIRE_DIA])?;
        let supplier_names: Vec<&str> = self.suppliers.iter().map(String::as_str).collect();
        require_columns(&table, &supplier_names)?;

        let mut exprs = vec![to_numeric(orders::WIRE_DIA)];
        exprs.extend(
            self.suppliers
                .iter()
                .map(|s| to_numeric(s).fill_null(lit(0.0))),
        );
        let table = table.lazy().with_columns(exprs).collect()?;
        Ok(&*self.incoming.insert(table))
    }

    pub fn load_incoming_xlsx(&mut self, path: impl AsRef<Path>) -> Result<&DataFrame, StockError> {
        let workbook = Workbook::open(path)?;
        let sheet = workbook
            .sheets
            .first()
            .ok_or_else(|| StockError::General("incoming stock workbook has no sheets".into()))?;
        let table = sheet.to_dataframe(0)?;
        self.load_incoming(table)
    }

    /// Normalize the usage-baseline table, renaming the source's
    /// "Avg Jan-May Usage (kg)" column to its internal name.
    pub fn load_usage(&mut self, table: DataFrame) -> Result<&DataFrame, StockError> {
        let mut table = trim_column_names(table)?;
        if table.column(usage::AVG_JAN_MAY).is_ok() {
            table = table
                .lazy()
                .rename([usage::AVG_JAN_MAY], [usage::AVG_MONTHLY], true)
                .collect()?;
        }
        require_columns(&table, &[orders::WIRE_DIA, usage::AVG_MONTHLY])?;

        let table = table
            .lazy()
            .with_columns([to_numeric(orders::WIRE_DIA), to_numeric(usage::AVG_MONTHLY)])
            .collect()?;
        Ok(&*self.usage.insert(table))
    }

    pub fn load_usage_csv(&mut self, path: impl AsRef<Path>) -> Result<&DataFrame, StockError> {
        let table = read_csv_table(path)?;
        self.load_usage(table)
    }

    // ── Reconciliation ──────────────────────────────────────────────────────

    /// Run the merge over the four loaded tables.
    pub fn reconcile(&self) -> Result<Reconciliation, StockError> {
        let order_lines = self
            .orders
            .as_ref()
            .ok_or_else(|| StockError::NotLoaded("customer orders".into()))?;
        let balances = self
            .balances
            .as_ref()
            .ok_or_else(|| StockError::NotLoaded("coil balances".into()))?;
        let incoming_stock = self
            .incoming
            .as_ref()
            .ok_or_else(|| StockError::NotLoaded("incoming stock".into()))?;
        let usage_baseline = self
            .usage
            .as_ref()
            .ok_or_else(|| StockError::NotLoaded("usage baseline".into()))?;

        let pending = demand::aggregate_pending(order_lines)?;
        let overview = overview::build_overview(
            &pending.by_diameter,
            balances,
            incoming_stock,
            usage_baseline,
            &self.suppliers,
        )?;

        tracing::info!(
            diameters = overview.height(),
            pending_rows = pending.detail.height(),
            "reconciliation complete"
        );

        Ok(Reconciliation {
            overview,
            pending: pending.detail,
            suppliers: self.suppliers.clone(),
        })
    }
}

/// The two output tables of a run, plus the roster the overview was built
/// against so availability views can validate their supplier subset.
#[derive(Debug, Clone)]
pub struct Reconciliation {
    pub overview: DataFrame,
    pub pending: DataFrame,
    suppliers: Vec<String>,
}

impl Reconciliation {
    /// Availability view for a subset of the roster. Recomputable at will;
    /// never touches the stored overview.
    pub fn availability(&self, included: &[String]) -> Result<DataFrame, StockError> {
        overview::project_availability(&self.overview, &self.suppliers, included)
    }

    /// Availability view with every supplier included.
    pub fn availability_all(&self) -> Result<DataFrame, StockError> {
        self.availability(&self.suppliers)
    }
}

fn trim_column_names(mut df: DataFrame) -> Result<DataFrame, StockError> {
    let trimmed: Vec<String> = df
        .get_column_names_str()
        .iter()
        .map(|c| c.trim().to_string())
        .collect();
    df.set_column_names(trimmed.as_slice())?;
    Ok(df)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn incoming_table() -> DataFrame {
        DataFrame::new(vec![
            Column::new(" Wire Diameter ".into(), vec![Some("2.0"), Some("3.2")]),
            Column::new("Kewei".into(), vec![Some("5"), None]),
            Column::new("QS".into(), vec![Some("0"), Some("x")]),
            Column::new("Bolin".into(), vec![None, Some("2.5")]),
        ])
        .unwrap()
    }

    #[test]
    fn incoming_is_renamed_coerced_and_zero_filled() {
        let mut model = StockModel::new();
        let df = model.load_incoming(incoming_table()).unwrap().clone();

        let dia = df.column(orders::WIRE_DIA).unwrap().f64().unwrap();
        assert_eq!(dia.get(0), Some(2.0));

        let kewei = df.column("Kewei").unwrap().f64().unwrap();
        assert_eq!(kewei.get(1), Some(0.0)); // absent → 0
        let qs = df.column("QS").unwrap().f64().unwrap();
        assert_eq!(qs.get(1), Some(0.0)); // non-numeric → 0
        let bolin = df.column("Bolin").unwrap().f64().unwrap();
        assert_eq!(bolin.get(1), Some(2.5));
    }

    #[test]
    fn missing_supplier_column_is_fatal() {
        let table = DataFrame::new(vec![
            Column::new("Wire ø".into(), vec![Some("2.0")]),
            Column::new("Kewei".into(), vec![Some("5")]),
        ])
        .unwrap();
        let mut model = StockModel::new();
        let err = model.load_incoming(table).unwrap_err();
        assert!(matches!(err, StockError::MissingColumn(_)));
    }

    #[test]
    fn usage_column_is_renamed() {
        let table = DataFrame::new(vec![
            Column::new("Wire ø".into(), vec![Some("2.0")]),
            Column::new("Avg Jan-May Usage (kg)".into(), vec![Some("10")]),
        ])
        .unwrap();
        let mut model = StockModel::new();
        let df = model.load_usage(table).unwrap();
        assert!(df.column(usage::AVG_MONTHLY).is_ok());
        assert!(df.column(usage::AVG_JAN_MAY).is_err());
    }

    #[test]
    fn reconcile_requires_all_four_tables() {
        let model = StockModel::new();
        let err = model.reconcile().unwrap_err();
        assert!(matches!(err, StockError::NotLoaded(ref what) if what == "customer orders"));
    }

    #[test]
    fn custom_roster_changes_requirements() {
        let table = DataFrame::new(vec![
            Column::new("Wire ø".into(), vec![Some("2.0")]),
            Column::new("Nova".into(), vec![Some("7")]),
        ])
        .unwrap();
        let mut model = StockModel::new().with_suppliers(vec!["Nova".to_string()]);
        let df = model.load_incoming(table).unwrap();
        assert_eq!(
            df.column("Nova").unwrap().f64().unwrap().get(0),
            Some(7.0)
        );
    }
}
