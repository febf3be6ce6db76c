use thiserror::Error;

#[derive(Error, Debug)]
pub enum StockError {
    #[error("Data not loaded: {0}")]
    NotLoaded(String),

    #[error("Missing column: {0}")]
    MissingColumn(String),

    #[error("No order sheet contains a '{0}' header row")]
    NoOrderSheets(String),

    #[error("No coil ledger sheet has a usable '{0}' column")]
    NoBalanceSheets(String),

    #[error("Unknown supplier: {0}")]
    UnknownSupplier(String),

    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("Workbook error: {0}")]
    Workbook(#[from] calamine::Error),

    #[error("Xlsx write error: {0}")]
    XlsxWrite(#[from] rust_xlsxwriter::XlsxError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    General(String),
}
