use std::collections::HashMap;
use std::fs;
use std::path::Path;

use chrono::{NaiveDate, Utc};
use tera::{Context, Tera};

use quotecraft_core::config::AppConfig;
use quotecraft_core::documents::QuoteDocument;
use quotecraft_core::{compute_quote, recommendations, Catalog};

use super::CommandResult;
use crate::cart_file;

/// Renders the quote HTML document for a cart file.
pub fn run(
    app_config: &AppConfig,
    cart_path: &Path,
    out_path: &Path,
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

    let document = QuoteDocument::build(
        &mut rand::thread_rng(),
        quote,
        &quote_config,
        &app_config.pricing,
        reference_date,
    );

    let html = match render_html(&document, &recs) {
        Ok(html) => html,
        Err(error) => return CommandResult::failure(error.to_string()),
    };
    if let Err(error) = fs::write(out_path, html) {
        return CommandResult::failure(format!(
            "could not write `{}`: {error}",
            out_path.display()
        ));
    }

    CommandResult::success(format!(
        "wrote quote {} to {}",
        document.quote_number,
        out_path.display()
    ))
}

pub fn render_html(
    document: &QuoteDocument,
    recs: &[quotecraft_core::Recommendation],
) -> Result<String, tera::Error> {
    let mut tera = Tera::default();
    tera.register_filter("money", money_filter);
    tera.add_raw_template("quote.html.tera", include_str!("../../templates/quote.html.tera"))?;

    let mut context = Context::new();
    context.insert("doc", document);
    context.insert("recommendations", recs);
    context.insert(
        "qr_payload",
        &serde_json::to_string(&document.qr).unwrap_or_default(),
    );
    tera.render("quote.html.tera", &context)
}

/// Formats a monetary value to two decimals. Decimal fields serialize as
/// strings, so both strings and numbers are accepted.
fn money_filter(
    value: &tera::Value,
    _args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let amount = match value {
        tera::Value::Number(number) => number.as_f64().unwrap_or(0.0),
        tera::Value::String(raw) => raw.parse::<f64>().unwrap_or(0.0),
        _ => 0.0,
    };
    Ok(tera::Value::String(format!("{amount:.2}")))
}
