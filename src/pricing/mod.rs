//! Window-cleaning price list and estimate calculator
//!
//! The table is pure data; the calculator is a pure function over the table
//! and the customer's line counts, cheap enough to run on every keystroke.

pub mod calculator;
pub mod table;

pub use calculator::{
    estimate, format_currency, sanitize_count, sanitize_count_value, Estimate, EstimateStatus,
    QuoteCounts,
};
pub use table::{
    AccessConstraints, AddOn, CustomerCategory, LevelRates, PricingTable, RateTable, ServiceLevel,
    UiCopy, UnknownName, WindowRates, WindowType,
};
