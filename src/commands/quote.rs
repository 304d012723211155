use anyhow::{Context, Result};
use colored::Colorize;
use std::path::Path;
use stellarview_site::{
    config,
    pricing::{estimate, CustomerCategory, PricingTable, QuoteCounts, ServiceLevel, WindowType},
};

use crate::cli::QuoteArgs;

/// Execute the quote command
///
/// Prices the job against the configured price list, with the same lenient
/// count handling as the website form.
pub fn execute(config_path: &Path, args: &QuoteArgs) -> Result<()> {
    let cfg = config::load_config_from(config_path)?;
    let table = &cfg.pricing_table;

    let category: CustomerCategory = args.customer.parse()?;
    let level: ServiceLevel = args.level.parse()?;
    let counts = build_counts(table, args)?;

    let result = estimate(table, category, level, &counts);
    let status = result.status(!args.unconfirmed);

    if args.json {
        let value = serde_json::json!({
            "customer": category,
            "serviceLevel": level,
            "subtotal": result.subtotal,
            "total": result.total,
            "lineItems": result.line_items,
            "status": status,
            "display": status.display(&table.currency),
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    println!("{} ({})", category.label().bold(), level.label());
    let rates = table.rates_for(category, level);
    for window in WindowType::ALL {
        let count = counts.window(window);
        if count > 0 {
            println!(
                "  {:<24} {:>4} × {:>3} = {}",
                window.label(),
                count,
                rates.rate(window),
                u64::from(count).saturating_mul(rates.rate(window))
            );
        }
    }
    for add_on in &table.add_ons {
        let count = counts.add_on(&add_on.id);
        if count > 0 {
            println!(
                "  {:<24} {:>4} × {:>3} = {}",
                add_on.label,
                count,
                add_on.price,
                u64::from(count).saturating_mul(add_on.price)
            );
        }
    }
    println!();
    println!("  {}: {}", "Estimated total".cyan(), status.display(&table.currency).green());
    if let Some(hint) = status.hint() {
        println!("  {}", hint.dimmed());
    }
    println!("  {}", table.ui_copy.estimate_disclaimer.dimmed());
    println!("  {}", table.ui_copy.minimum_disclaimer.dimmed());

    Ok(())
}

fn build_counts(table: &PricingTable, args: &QuoteArgs) -> Result<QuoteCounts> {
    let mut counts = QuoteCounts::new();
    counts.set_window_input(WindowType::Standard, &args.standard);
    counts.set_window_input(WindowType::Large, &args.large);
    counts.set_window_input(WindowType::Slider, &args.slider);

    for pair in &args.add_ons {
        let (id, raw) = pair
            .split_once('=')
            .with_context(|| format!("Add-on must be given as ID=COUNT, got '{}'", pair))?;
        if table.add_on(id).is_none() {
            let known: Vec<&str> = table.add_ons.iter().map(|a| a.id.as_str()).collect();
            anyhow::bail!("Unknown add-on '{}' (known: {})", id, known.join(", "));
        }
        counts.set_add_on_input(id, raw);
    }

    Ok(counts)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(add_ons: &[&str]) -> QuoteArgs {
        QuoteArgs {
            customer: "residential".to_string(),
            level: "exterior".to_string(),
            standard: "10".to_string(),
            large: "abc".to_string(),
            slider: "2".to_string(),
            add_ons: add_ons.iter().map(|s| s.to_string()).collect(),
            unconfirmed: false,
            json: false,
        }
    }

    #[test]
    fn test_build_counts() {
        let table = PricingTable::default();
        let counts = build_counts(&table, &args(&["screens=4", "hardWater=-1"])).unwrap();

        assert_eq!(counts.window(WindowType::Standard), 10);
        assert_eq!(counts.window(WindowType::Large), 0);
        assert_eq!(counts.window(WindowType::Slider), 2);
        assert_eq!(counts.add_on("screens"), 4);
        assert_eq!(counts.add_on("hardWater"), 0);
    }

    #[test]
    fn test_build_counts_rejects_unknown_add_on() {
        let table = PricingTable::default();
        let err = build_counts(&table, &args(&["gutters=3"])).unwrap_err();
        assert!(err.to_string().contains("Unknown add-on 'gutters'"));

        let err = build_counts(&table, &args(&["screens"])).unwrap_err();
        assert!(err.to_string().contains("ID=COUNT"));
    }
}
