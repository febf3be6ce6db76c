use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use wirestock::{export, StockModel};

/// Generate the wire overview and pending-orders exports from the four
/// stock spreadsheets.
#[derive(Parser, Debug)]
#[command(name = "wirestock", version)]
struct Args {
    /// Customer orders workbook (xlsx), one sheet per customer
    #[arg(long)]
    orders: PathBuf,

    /// Wire coil balance workbook (xlsx), one ledger sheet per diameter
    #[arg(long)]
    coil_balance: PathBuf,

    /// Incoming stock table (xlsx)
    #[arg(long)]
    incoming: PathBuf,

    /// Default monthly usage table (csv)
    #[arg(long)]
    usage: PathBuf,

    /// Leave a supplier out of the availability totals (repeatable)
    #[arg(long = "exclude-supplier", value_name = "NAME")]
    exclude_supplier: Vec<String>,

    #[arg(long, default_value = "Final_Wire_Overview.xlsx")]
    overview_out: PathBuf,

    #[arg(long, default_value = "Pending_Orders.xlsx")]
    pending_out: PathBuf,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let mut model = StockModel::new();
    model
        .load_orders_xlsx(&args.orders)
        .context("customer orders")?;
    model
        .load_coil_balances_xlsx(&args.coil_balance)
        .context("wire coil balance")?;
    model
        .load_incoming_xlsx(&args.incoming)
        .context("incoming stock")?;
    model.load_usage_csv(&args.usage).context("default usage")?;

    let included: Vec<String> = model
        .suppliers()
        .iter()
        .filter(|s| !args.exclude_supplier.iter().any(|e| e == *s))
        .cloned()
        .collect();

    let reconciliation = model.reconcile()?;
    let overview = reconciliation.availability(&included)?;

    export::write_xlsx(&overview, &args.overview_out)?;
    export::write_xlsx(&reconciliation.pending, &args.pending_out)?;

    tracing::info!(
        overview = %args.overview_out.display(),
        pending = %args.pending_out.display(),
        suppliers = %included.join(", "),
        "exports written"
    );
    Ok(())
}
