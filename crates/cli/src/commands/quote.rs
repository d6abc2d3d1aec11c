use std::path::Path;

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;

use quotecraft_core::config::AppConfig;
use quotecraft_core::{compute_quote, recommendations, Catalog, QuoteConfig, QuoteResult};

use super::CommandResult;
use crate::cart_file;

pub fn run(
    app_config: &AppConfig,
    cart_path: &Path,
    json: bool,
    date: Option<NaiveDate>,
) -> CommandResult {
    let catalog = Catalog::standard();
    let (cart, quote_config) = match cart_file::load(cart_path, &catalog) {
        Ok(loaded) => loaded,
        Err(error) => return CommandResult::failure(format!("{error:#}")),
    };

    let reference_date = date.unwrap_or_else(|| Utc::now().date_naive());
    let quote = match compute_quote(
        &catalog,
        &cart,
        &quote_config,
        &app_config.pricing,
        reference_date,
    ) {
        Ok(quote) => quote,
        Err(error) => return CommandResult::failure(error.to_string()),
    };
    let recs =
        recommendations(&catalog, &quote, &quote_config, &app_config.pricing, reference_date);

    if json {
        let payload = serde_json::json!({
            "reference_date": reference_date,
            "quote": quote,
            "recommendations": recs,
        });
        return match serde_json::to_string_pretty(&payload) {
            Ok(output) => CommandResult::success(output),
            Err(error) => CommandResult::failure(error.to_string()),
        };
    }

    CommandResult::success(render_text(&quote, &quote_config, &recs))
}

fn render_text(
    quote: &QuoteResult,
    config: &QuoteConfig,
    recs: &[quotecraft_core::Recommendation],
) -> String {
    let mut out = Vec::new();
    let customer = &config.customer;
    if customer.name.is_empty() {
        out.push("Quote".to_string());
    } else if customer.company.is_empty() {
        out.push(format!("Quote for {}", customer.display_name()));
    } else {
        out.push(format!("Quote for {} ({})", customer.display_name(), customer.company));
    }
    out.push(format!("Billing: {}", quote.billing_cycle.as_str()));
    out.push(String::new());

    out.push(format!(
        "  {:<28} {:>5} {:>12} {:>12} {:>12}",
        "Product", "Qty", "Unit Price", "Tax", "Total"
    ));
    for line in &quote.lines {
        let mut name = line.name.clone();
        if line.tier_fallback {
            name.push_str(" (!)");
        }
        out.push(format!(
            "  {:<28} {:>5} {:>12} {:>12} {:>12}",
            name,
            line.qty,
            format!("${:.2}", line.unit_price),
            format!("${:.2}", line.tax_amount),
            format!("${:.2}", line.line_total),
        ));
        if line.discount.total > Decimal::ZERO {
            out.push(format!(
                "  {:<28} volume {:.0}% / seasonal {:.0}% (total {:.0}%)",
                "",
                line.discount.volume * Decimal::from(100u32),
                line.discount.seasonal * Decimal::from(100u32),
                line.discount.total * Decimal::from(100u32),
            ));
        }
    }

    out.push(String::new());
    out.push(format!("Subtotal:        ${:.2}", quote.subtotal));
    out.push(format!("Service charge:  ${:.2}", quote.service_charge));
    out.push(format!("Tax:             ${:.2}", quote.tax));
    match quote.processing_fee.waived {
        Some(reason) => {
            out.push(format!("Processing fee:  waived ({})", reason.description()))
        }
        None => out.push(format!("Processing fee:  ${:.2}", quote.processing_fee.fee)),
    }
    out.push(format!("Total:           ${:.2}", quote.final_total));
    out.push(String::new());
    out.push(format!(
        "Profit before tax: ${:.2}   after tax: ${:.2}",
        quote.profit_before_tax, quote.profit_after_tax
    ));
    out.push(format!("Loyalty tier: {}", quote.loyalty));

    if !recs.is_empty() {
        out.push(String::new());
        out.push("Recommendations:".to_string());
        for (index, rec) in recs.iter().enumerate() {
            out.push(format!("  {}. {}", index + 1, rec.message));
        }
    }

    out.join("\n")
}
