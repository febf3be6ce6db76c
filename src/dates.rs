use std::collections::HashMap;

use chrono::{NaiveDate, NaiveDateTime};

/// How ambiguous day/month order is resolved for a customer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateConvention {
    DayFirst,
    MonthFirst,
}

/// Customer → date-convention policy table.
///
/// Keys are normalized (trimmed, lowercased) customer names; lookups for
/// unknown customers fall back to month-first. The default table carries the
/// single customer known to write dates day-first.
#[derive(Debug, Clone)]
pub struct DateRules {
    by_customer: HashMap<String, DateConvention>,
}

impl Default for DateRules {
    fn default() -> Self {
        let mut by_customer = HashMap::new();
        by_customer.insert(
            "perniagaan logam hock soon".to_string(),
            DateConvention::DayFirst,
        );
        Self { by_customer }
    }
}

impl DateRules {
    pub fn insert(&mut self, customer: &str, convention: DateConvention) {
        self.by_customer
            .insert(normalize_customer(customer), convention);
    }

    pub fn convention_for(&self, customer: &str) -> DateConvention {
        self.by_customer
            .get(&normalize_customer(customer))
            .copied()
            .unwrap_or(DateConvention::MonthFirst)
    }

    /// Normalize one raw order-date value. Parse failure is a per-row
    /// condition, never an error.
    pub fn normalize(&self, raw: Option<&str>, customer: &str) -> Option<NaiveDate> {
        parse_order_date(raw?, self.convention_for(customer))
    }
}

fn normalize_customer(customer: &str) -> String {
    customer.trim().to_lowercase()
}

const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];
const UNAMBIGUOUS_FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y/%m/%d", "%d %b %Y"];

/// Parse a free-form order date under the given convention.
///
/// Slashed and dashed forms try the convention's day/month order first and
/// the opposite order as fallback, so "25/03/2025" still parses for a
/// month-first customer.
pub fn parse_order_date(raw: &str, convention: DateConvention) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(dt.date());
        }
    }

    let ambiguous: [&str; 6] = match convention {
        DateConvention::DayFirst => [
            "%d/%m/%Y", "%d-%m-%Y", "%d/%m/%y", "%d-%m-%y", "%m/%d/%Y", "%m-%d-%Y",
        ],
        DateConvention::MonthFirst => [
            "%m/%d/%Y", "%m-%d-%Y", "%m/%d/%y", "%m-%d-%y", "%d/%m/%Y", "%d-%m-%Y",
        ],
    };

    for fmt in ambiguous.iter().chain(UNAMBIGUOUS_FORMATS.iter()) {
        if let Ok(date) = NaiveDate::parse_from_str(raw, fmt) {
            return Some(date);
        }
    }

    None
}
