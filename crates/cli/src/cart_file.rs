//! TOML cart files: the CLI's snapshot of a quoting session.
//!
//! ```toml
//! billing_cycle = "monthly"
//! service_charge = 50.0
//! total_spend = 4000.0
//!
//! [customer]
//! name = "Avery Chen"
//! company = "Northwind"
//!
//! [[lines]]
//! product = "spx-desktop"
//! qty = 10
//! margin = 0.40        # optional override
//! ```

use std::fs;
use std::path::Path;

use anyhow::{bail, Context};
use serde::Deserialize;

use quotecraft_core::pricing::currency::money_from_f64;
use quotecraft_core::{BillingCycle, Cart, Catalog, CustomerInfo, QuoteConfig};

#[derive(Debug, Deserialize)]
pub struct CartFile {
    #[serde(default)]
    pub customer: CustomerSection,
    #[serde(default = "default_billing_cycle")]
    pub billing_cycle: String,
    #[serde(default = "default_service_charge")]
    pub service_charge: f64,
    #[serde(default)]
    pub waive_processing_fee: bool,
    #[serde(default)]
    pub monthly_volume: f64,
    #[serde(default)]
    pub total_spend: f64,
    #[serde(default)]
    pub lines: Vec<LineSection>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CustomerSection {
    #[serde(default)]
    pub salutation: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct LineSection {
    /// Product id or exact product name.
    pub product: String,
    pub qty: u32,
    #[serde(default)]
    pub margin: Option<f64>,
    #[serde(default)]
    pub unit_cost: Option<f64>,
}

fn default_billing_cycle() -> String {
    "monthly".to_string()
}

fn default_service_charge() -> f64 {
    50.0
}

/// Parses a cart file and resolves it against the catalog.
pub fn load(path: &Path, catalog: &Catalog) -> anyhow::Result<(Cart, QuoteConfig)> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("could not read cart file `{}`", path.display()))?;
    let file: CartFile = toml::from_str(&raw)
        .with_context(|| format!("could not parse cart file `{}`", path.display()))?;
    resolve(file, catalog)
}

fn resolve(file: CartFile, catalog: &Catalog) -> anyhow::Result<(Cart, QuoteConfig)> {
    let Some(billing_cycle) = BillingCycle::parse(&file.billing_cycle) else {
        bail!("unsupported billing cycle `{}` (expected monthly|annual)", file.billing_cycle);
    };

    let mut cart = Cart::new();
    for line in &file.lines {
        let product = catalog
            .find(&quotecraft_core::ProductId::new(line.product.clone()))
            .or_else(|| catalog.find_by_name(&line.product));
        let Some(product) = product else {
            bail!("cart references unknown product `{}`", line.product);
        };
        cart.add(product.id.clone(), line.qty)
            .with_context(|| format!("invalid quantity for `{}`", line.product))?;
        if let Some(margin) = line.margin {
            let margin = money_from_f64("margin", margin)?;
            cart.set_margin_override(&product.id, Some(margin))?;
        }
        if let Some(unit_cost) = line.unit_cost {
            let unit_cost = money_from_f64("unit_cost", unit_cost)?;
            cart.set_unit_cost_override(&product.id, Some(unit_cost))?;
        }
    }

    let config = QuoteConfig {
        billing_cycle,
        service_charge: money_from_f64("service_charge", file.service_charge)?,
        waive_processing_fee: file.waive_processing_fee,
        monthly_volume: money_from_f64("monthly_volume", file.monthly_volume)?,
        total_spend: money_from_f64("total_spend", file.total_spend)?,
        customer: CustomerInfo {
            salutation: file.customer.salutation,
            name: file.customer.name,
            company: file.customer.company,
            email: file.customer.email,
        },
    };
    config.validate()?;

    Ok((cart, config))
}
