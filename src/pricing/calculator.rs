use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;

use super::table::{CustomerCategory, PricingTable, ServiceLevel, WindowType};

/// Parse a user-entered count, degrading to zero instead of failing
///
/// Takes the leading integer of the input (`"12abc"` is 12, `"3.9"` is 3).
/// Anything without leading digits, or negative, is 0. Values too large for
/// a count saturate.
pub fn sanitize_count(raw: &str) -> u32 {
    let trimmed = raw.trim();
    let (negative, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    let digits = &digits[..end];

    if digits.is_empty() || negative {
        return 0;
    }

    digits.bytes().fold(0u32, |acc, b| {
        acc.saturating_mul(10).saturating_add(u32::from(b - b'0'))
    })
}

/// Sanitize a count received as JSON (number or string)
pub fn sanitize_count_value(value: &Value) -> u32 {
    match value {
        Value::Number(n) => {
            if let Some(v) = n.as_u64() {
                u32::try_from(v).unwrap_or(u32::MAX)
            } else if let Some(v) = n.as_f64() {
                if v.is_finite() && v >= 0.0 {
                    // Truncation toward zero; `as` saturates at u32::MAX
                    v as u32
                } else {
                    0
                }
            } else {
                0
            }
        }
        Value::String(s) => sanitize_count(s),
        _ => 0,
    }
}

/// Per-session quantities entered by the customer
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuoteCounts {
    windows: HashMap<WindowType, u32>,
    add_ons: HashMap<String, u32>,
}

impl QuoteCounts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_window(&mut self, window: WindowType, count: u32) {
        self.windows.insert(window, count);
    }

    /// Set a window count from raw input text
    pub fn set_window_input(&mut self, window: WindowType, raw: &str) {
        self.set_window(window, sanitize_count(raw));
    }

    pub fn set_add_on(&mut self, id: impl Into<String>, count: u32) {
        self.add_ons.insert(id.into(), count);
    }

    /// Set an add-on count from raw input text
    pub fn set_add_on_input(&mut self, id: impl Into<String>, raw: &str) {
        self.set_add_on(id, sanitize_count(raw));
    }

    pub fn window(&self, window: WindowType) -> u32 {
        self.windows.get(&window).copied().unwrap_or(0)
    }

    pub fn add_on(&self, id: &str) -> u32 {
        self.add_ons.get(id).copied().unwrap_or(0)
    }
}

/// Result of pricing a set of counts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Estimate {
    pub subtotal: u64,
    /// Subtotal raised to the minimum charge
    pub total: u64,
    /// Sum of all counts; zero means nothing has been entered yet
    pub line_items: u64,
}

/// What the estimate panel should show
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum EstimateStatus {
    ConfirmAccess,
    AddCounts,
    Ready { total: u64 },
}

impl Estimate {
    pub fn status(&self, access_confirmed: bool) -> EstimateStatus {
        if !access_confirmed {
            EstimateStatus::ConfirmAccess
        } else if self.line_items == 0 {
            EstimateStatus::AddCounts
        } else {
            EstimateStatus::Ready { total: self.total }
        }
    }
}

impl EstimateStatus {
    /// Text for the "Estimated total" line
    pub fn display(&self, currency: &str) -> String {
        match self {
            Self::ConfirmAccess => "Confirm access".to_string(),
            Self::AddCounts => "Add window counts".to_string(),
            Self::Ready { total } => format_currency(*total, currency),
        }
    }

    /// Hint shown under the total while the estimate is locked
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::ConfirmAccess => Some("Confirm access to unlock the estimate."),
            Self::AddCounts => Some("Add window counts to see the estimate."),
            Self::Ready { .. } => None,
        }
    }
}

/// Price the counts against the table
///
/// Add-on ids missing from the catalog are ignored.
pub fn estimate(
    table: &PricingTable,
    category: CustomerCategory,
    level: ServiceLevel,
    counts: &QuoteCounts,
) -> Estimate {
    let rates = table.rates_for(category, level);

    let mut subtotal: u64 = 0;
    let mut line_items: u64 = 0;

    for window in WindowType::ALL {
        let count = u64::from(counts.window(window));
        subtotal = subtotal.saturating_add(count.saturating_mul(rates.rate(window)));
        line_items = line_items.saturating_add(count);
    }

    for add_on in &table.add_ons {
        let count = u64::from(counts.add_on(&add_on.id));
        subtotal = subtotal.saturating_add(count.saturating_mul(add_on.price));
        line_items = line_items.saturating_add(count);
    }

    Estimate {
        subtotal,
        total: subtotal.max(table.minimum_charge),
        line_items,
    }
}

/// Whole-unit currency display, e.g. `$1,250`
pub fn format_currency(amount: u64, currency: &str) -> String {
    let digits = amount.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    match currency {
        "USD" => format!("${}", grouped),
        other => format!("{} {}", grouped, other),
    }
}
