use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::catalog::Catalog;
use crate::domain::cart::{Cart, CartLine};
use crate::domain::product::{PricingTier, Product, ProductCategory, ProductId, ProductPricing};
use crate::domain::quote::{BillingCycle, QuoteConfig};
use crate::errors::DomainError;
use crate::policy::{LoyaltyLevel, PricingPolicy};
use crate::pricing::currency::round_cents;
use crate::pricing::discounts::{apply_discount, compute_discount, DiscountBreakdown};
use crate::pricing::fees::{processing_fee, sales_tax, FeeAssessment};
use crate::pricing::loyalty::resolve_loyalty;
use crate::pricing::tiers::resolve_tier;

/// Priced view of one cart line for the billed period.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineBreakdown {
    pub product_id: ProductId,
    pub name: String,
    pub category: ProductCategory,
    pub qty: u32,
    /// Per-unit vendor cost basis before tax.
    pub unit_cost: Decimal,
    /// Customer per-unit price after margin and discounts.
    pub unit_price: Decimal,
    /// Effective margin fraction (zero for flat-rate lines).
    pub margin: Decimal,
    pub margin_amount: Decimal,
    pub tax_amount: Decimal,
    /// Customer pre-tax total for the billed period.
    pub line_total: Decimal,
    /// What the vendor charges us for the billed period.
    pub vendor_cost: Decimal,
    pub discount: DiscountBreakdown,
    pub tier_fallback: bool,
    pub flat_rate: bool,
}

/// Fully derived quote. Never stored or mutated incrementally: every call to
/// [`compute_quote`] rebuilds it from the cart and config snapshot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteResult {
    pub billing_cycle: BillingCycle,
    pub lines: Vec<LineBreakdown>,
    /// Customer pre-tax subtotal across lines.
    pub subtotal: Decimal,
    /// Service charge for the period, loyalty service-fee discount applied.
    pub service_charge: Decimal,
    pub tax: Decimal,
    pub processing_fee: FeeAssessment,
    pub final_total: Decimal,
    pub vendor_cost: Decimal,
    pub profit_before_tax: Decimal,
    pub profit_after_tax: Decimal,
    pub loyalty: LoyaltyLevel,
}

/// Prices the whole cart. Pure and total: same snapshot in, same result out.
pub fn compute_quote(
    catalog: &Catalog,
    cart: &Cart,
    config: &QuoteConfig,
    policy: &PricingPolicy,
    reference_date: NaiveDate,
) -> Result<QuoteResult, DomainError> {
    config.validate()?;

    let loyalty = resolve_loyalty(config.total_spend, policy);
    let multiplier = config.billing_cycle.multiplier();

    let mut lines = Vec::with_capacity(cart.len());
    let mut subtotal = Decimal::ZERO;
    let mut vendor_cost = Decimal::ZERO;
    for line in cart.lines() {
        let product = catalog
            .find(&line.product_id)
            .ok_or_else(|| DomainError::UnknownProduct(line.product_id.clone()))?;
        let breakdown = price_line(product, line, config.billing_cycle, policy, reference_date)?;
        subtotal += breakdown.line_total;
        vendor_cost += breakdown.vendor_cost;
        lines.push(breakdown);
    }

    let service_charge = round_cents(
        config.service_charge * (Decimal::ONE - loyalty.service_fee_discount) * multiplier,
    );
    let taxable = subtotal + service_charge;
    let tax = sales_tax(taxable, policy);
    let amount_charged = taxable + tax;
    let fee = processing_fee(
        amount_charged,
        config.billing_cycle.is_annual(),
        config.waive_processing_fee,
        config.monthly_volume,
        config.total_spend,
        policy,
    );

    let final_total = round_cents(amount_charged + fee.fee);
    let profit_before_tax = round_cents(subtotal - vendor_cost + service_charge - fee.fee);
    let profit_after_tax =
        round_cents(profit_before_tax * (Decimal::ONE - policy.profit_tax_rate));

    Ok(QuoteResult {
        billing_cycle: config.billing_cycle,
        lines,
        subtotal: round_cents(subtotal),
        service_charge,
        tax,
        processing_fee: fee,
        final_total,
        vendor_cost: round_cents(vendor_cost),
        profit_before_tax,
        profit_after_tax,
        loyalty: loyalty.level,
    })
}

fn price_line(
    product: &Product,
    line: &CartLine,
    cycle: BillingCycle,
    policy: &PricingPolicy,
    reference_date: NaiveDate,
) -> Result<LineBreakdown, DomainError> {
    let qty_dec = Decimal::from(line.qty);
    let period = qty_dec * cycle.multiplier();

    match &product.pricing {
        ProductPricing::FlatRate { unit_cost } => {
            let unit_cost = line.unit_cost_override.unwrap_or(*unit_cost);
            if unit_cost < Decimal::ZERO {
                return Err(DomainError::NegativeAmount { field: "unit_cost", value: unit_cost });
            }
            // Flat-rate lines pass the cost straight through: no margin, no
            // discounts, and vendor cost is not tax-inclusive.
            let unit_price = round_cents(unit_cost);
            let line_total = round_cents(unit_price * period);
            Ok(LineBreakdown {
                product_id: product.id.clone(),
                name: product.name.clone(),
                category: product.category,
                qty: line.qty,
                unit_cost,
                unit_price,
                margin: Decimal::ZERO,
                margin_amount: Decimal::ZERO,
                tax_amount: round_cents(line_total * policy.tax_rate),
                line_total,
                vendor_cost: round_cents(unit_cost * period),
                discount: DiscountBreakdown::none(),
                tier_fallback: false,
                flat_rate: true,
            })
        }
        ProductPricing::Tiered { tiers } => {
            let resolution = resolve_tier(&product.name, tiers, line.qty)?;
            let tier = resolution.tier;
            let unit_cost = line.unit_cost_override.unwrap_or(tier.unit_cost);
            if unit_cost < Decimal::ZERO {
                return Err(DomainError::NegativeAmount { field: "unit_cost", value: unit_cost });
            }

            let margin = effective_margin(&product.name, line, tier);
            let list_price = unit_cost * (Decimal::ONE + margin);
            let discount = compute_discount(line.qty, reference_date, policy);
            let unit_price = round_cents(apply_discount(list_price, &discount));
            let line_total = round_cents(unit_price * period);

            Ok(LineBreakdown {
                product_id: product.id.clone(),
                name: product.name.clone(),
                category: product.category,
                qty: line.qty,
                unit_cost,
                unit_price,
                margin,
                margin_amount: round_cents(unit_cost * margin * period),
                tax_amount: round_cents(line_total * policy.tax_rate),
                line_total,
                // Vendor invoices for tiered products arrive tax-inclusive.
                vendor_cost: round_cents(unit_cost * (Decimal::ONE + policy.tax_rate) * period),
                discount,
                tier_fallback: resolution.fell_back,
                flat_rate: false,
            })
        }
    }
}

/// Line override, else the tier's margin. An unset tier margin is the
/// catalog-configuration case: defaulted to zero and logged, never thrown.
fn effective_margin(product_name: &str, line: &CartLine, tier: &PricingTier) -> Decimal {
    if let Some(override_margin) = line.margin_override {
        return override_margin;
    }
    match tier.margin.fraction() {
        Some(fraction) => fraction,
        None => {
            warn!(product = product_name, "tier margin is unset, defaulting to zero");
            Decimal::ZERO
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    use super::compute_quote;
    use crate::catalog::Catalog;
    use crate::domain::cart::Cart;
    use crate::domain::product::ProductId;
    use crate::domain::quote::{BillingCycle, QuoteConfig};
    use crate::errors::DomainError;
    use crate::policy::PricingPolicy;

    /// Policy with discounts neutralized, for fixtures that need raw list
    /// prices.
    fn quiet_policy() -> PricingPolicy {
        let mut policy = PricingPolicy::default();
        for campaign in &mut policy.seasonal_campaigns {
            campaign.discount = Decimal::ZERO;
        }
        policy
    }

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
    }

    #[test]
    fn spx_desktop_single_unit_prices_at_seven_ninety_four() {
        let catalog = Catalog::standard();
        let mut cart = Cart::new();
        cart.add(ProductId::new("spx-desktop"), 1).expect("add");
        let config = QuoteConfig { service_charge: Decimal::ZERO, ..QuoteConfig::default() };

        let quote = compute_quote(&catalog, &cart, &config, &quiet_policy(), date(2025, 7, 1))
            .expect("quote computes");

        let line = &quote.lines[0];
        // 5.88 * 1.35 = 7.938, rounded half up to 7.94.
        assert_eq!(line.unit_price, Decimal::new(794, 2));
        assert_eq!(line.tax_amount, Decimal::new(103, 2));
        assert_eq!(line.line_total, Decimal::new(794, 2));
        assert!(!line.tier_fallback);
    }

    #[test]
    fn annual_billing_multiplies_monthly_figures_by_twelve() {
        let catalog = Catalog::standard();
        let mut cart = Cart::new();
        cart.add(ProductId::new("spx-desktop"), 1).expect("add");
        let config = QuoteConfig {
            billing_cycle: BillingCycle::Annual,
            service_charge: Decimal::ZERO,
            ..QuoteConfig::default()
        };

        let quote = compute_quote(&catalog, &cart, &config, &quiet_policy(), date(2025, 7, 1))
            .expect("quote computes");

        assert_eq!(quote.lines[0].line_total, Decimal::new(9528, 2)); // 7.94 * 12
        assert_eq!(quote.subtotal, Decimal::new(9528, 2));
    }

    #[test]
    fn flat_rate_service_skips_margin_and_discounts() {
        let catalog = Catalog::standard();
        let mut cart = Cart::new();
        cart.add(ProductId::new("dr-service"), 1).expect("add");
        let config = QuoteConfig { service_charge: Decimal::ZERO, ..QuoteConfig::default() };

        // October: 20% seasonal campaign is active but must not touch the line.
        let quote = compute_quote(
            &catalog,
            &cart,
            &config,
            &PricingPolicy::default(),
            date(2025, 10, 15),
        )
        .expect("quote computes");

        let line = &quote.lines[0];
        assert!(line.flat_rate);
        assert_eq!(line.unit_price, Decimal::new(9900, 2));
        assert_eq!(line.margin_amount, Decimal::ZERO);
        assert_eq!(line.discount.total, Decimal::ZERO);
        // Vendor cost is not tax-inclusive for the homegrown service.
        assert_eq!(line.vendor_cost, Decimal::new(9900, 2));
    }

    #[test]
    fn large_cart_earns_the_automatic_fee_waiver() {
        let catalog = Catalog::standard();
        let mut cart = Cart::new();
        cart.add(ProductId::new("spx-ps"), 25).expect("add");
        let config = QuoteConfig { service_charge: Decimal::ZERO, ..QuoteConfig::default() };

        let quote = compute_quote(&catalog, &cart, &config, &quiet_policy(), date(2025, 7, 1))
            .expect("quote computes");

        // 25 servers at 43.22 * 1.35 = 58.35 each is well past $1,000.
        assert!(quote.subtotal > Decimal::from(1_000u32));
        assert_eq!(quote.processing_fee.fee, Decimal::ZERO);
        assert!(quote.processing_fee.is_waived());
    }

    #[test]
    fn profit_uses_tax_inclusive_vendor_cost_and_configured_profit_tax() {
        let catalog = Catalog::standard();
        let mut cart = Cart::new();
        cart.add(ProductId::new("spx-desktop"), 10).expect("add");
        let config = QuoteConfig {
            service_charge: Decimal::new(5000, 2),
            waive_processing_fee: true,
            ..QuoteConfig::default()
        };
        let policy = quiet_policy();

        let quote = compute_quote(&catalog, &cart, &config, &policy, date(2025, 7, 1))
            .expect("quote computes");

        // qty 10: unit cost 5.88, list 7.938, 10% volume discount -> 7.14.
        assert_eq!(quote.lines[0].unit_price, Decimal::new(714, 2));
        let expected_subtotal = Decimal::new(7140, 2);
        assert_eq!(quote.subtotal, expected_subtotal);

        // Vendor cost is tax-inclusive: 5.88 * 1.13 * 10 = 66.44 (rounded).
        let expected_vendor = Decimal::new(6644, 2);
        assert_eq!(quote.vendor_cost, expected_vendor);

        let expected_profit = expected_subtotal - expected_vendor + Decimal::new(5000, 2);
        assert_eq!(quote.profit_before_tax, expected_profit);
        let expected_after =
            (expected_profit * (Decimal::ONE - policy.profit_tax_rate)).round_dp(2);
        assert_eq!(quote.profit_after_tax, expected_after);
    }

    #[test]
    fn loyalty_service_fee_discount_applies_to_the_service_charge() {
        let catalog = Catalog::standard();
        let mut cart = Cart::new();
        cart.add(ProductId::new("spx-desktop"), 1).expect("add");
        let config = QuoteConfig {
            service_charge: Decimal::from(100u32),
            total_spend: Decimal::from(20_000u32), // Gold: 20% off service fees
            ..QuoteConfig::default()
        };

        let quote = compute_quote(&catalog, &cart, &config, &quiet_policy(), date(2025, 7, 1))
            .expect("quote computes");

        assert_eq!(quote.service_charge, Decimal::new(8000, 2));
    }

    #[test]
    fn unknown_product_in_cart_is_an_error() {
        let catalog = Catalog::standard();
        let mut cart = Cart::new();
        cart.add(ProductId::new("not-in-catalog"), 1).expect("add");

        let result = compute_quote(
            &catalog,
            &cart,
            &QuoteConfig::default(),
            &PricingPolicy::default(),
            date(2025, 7, 1),
        );
        assert!(matches!(result, Err(DomainError::UnknownProduct(_))));
    }

    #[test]
    fn empty_cart_produces_a_zero_line_quote() {
        let catalog = Catalog::standard();
        let config = QuoteConfig { service_charge: Decimal::ZERO, ..QuoteConfig::default() };
        let quote = compute_quote(
            &catalog,
            &Cart::new(),
            &config,
            &PricingPolicy::default(),
            date(2025, 7, 1),
        )
        .expect("empty cart is a valid snapshot");

        assert!(quote.lines.is_empty());
        assert_eq!(quote.subtotal, Decimal::ZERO);
        assert_eq!(quote.tax, Decimal::ZERO);
    }
}
