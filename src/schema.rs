/// Column-name constants for the wirestock tables.
/// Single source of truth - every stage addresses columns through these.

// ── Order-line columns ──────────────────────────────────────────────────────
pub mod orders {
    pub const CUSTOMER: &str = "Customer";
    pub const PO_DATE: &str = "P/O Date";
    pub const JOB_SHEET_NO: &str = "Job Sheet No.";
    pub const SCREEN_LENGTH: &str = "Screen Length";
    pub const SCREEN_WIDTH: &str = "Screen width";
    pub const APERTURE: &str = "Aperture #";
    pub const WIRE_DIA: &str = "Wire ø";
    pub const QTY: &str = "QTY";
    pub const ORDER_NO: &str = "Order No";

    pub const WEIGHT_PER_ITEM: &str = "Weight in kg per item";
    pub const WEIGHT_TOTAL: &str = "Weight in kg total";

    /// Geometric inputs the weight computation coerces to numeric.
    pub const GEOMETRY: [&str; 5] = [SCREEN_LENGTH, SCREEN_WIDTH, APERTURE, WIRE_DIA, QTY];
}

// ── Coil-ledger columns ─────────────────────────────────────────────────────
pub mod inventory {
    pub const BAL: &str = "BAL";
    pub const AVAILABLE: &str = "Available Inventory (kg)";
}

// ── Incoming-stock columns ──────────────────────────────────────────────────
pub mod incoming {
    pub const WIRE_DIAMETER: &str = "Wire Diameter";

    pub const KEWEI: &str = "Kewei";
    pub const QS: &str = "QS";
    pub const BOLIN: &str = "Bolin";

    /// Default supplier roster, in column order.
    pub const SUPPLIERS: [&str; 3] = [KEWEI, QS, BOLIN];
}

// ── Usage-baseline columns ──────────────────────────────────────────────────
pub mod usage {
    pub const AVG_JAN_MAY: &str = "Avg Jan-May Usage (kg)";
    pub const AVG_MONTHLY: &str = "Default Avg Monthly Usage (kg)";
}

// ── Overview columns ────────────────────────────────────────────────────────
pub mod overview {
    pub const PENDING_REQUIRED: &str = "Total Pending Wire Required (kg)";
    pub const TOTAL_AVAILABLE: &str = "Total Available (kg)";
    pub const SURPLUS_SHORTAGE: &str = "Surplus / Shortage (kg)";
    pub const MONTHS_OF_COVERAGE: &str = "Months of Coverage";
}
