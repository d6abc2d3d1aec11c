use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;

use super::types::{Recommendation, RecommendationKind};
use super::SUGGESTED_UNITS;
use crate::catalog::Catalog;
use crate::domain::product::{Product, ProductCategory, ProductPricing};
use crate::domain::quote::QuoteConfig;
use crate::policy::PricingPolicy;
use crate::pricing::currency::round_cents;
use crate::pricing::fees::fee_tier_for;
use crate::pricing::loyalty::{next_loyalty_tier, resolve_loyalty};
use crate::pricing::quote::QuoteResult;

/// Scans a computed quote and emits advisory suggestions in a fixed rule
/// order. Stateless and side-effect free.
pub fn recommendations(
    catalog: &Catalog,
    quote: &QuoteResult,
    config: &QuoteConfig,
    policy: &PricingPolicy,
    reference_date: NaiveDate,
) -> Vec<Recommendation> {
    let mut out = Vec::new();
    let is_annual = config.billing_cycle.is_annual();

    // 1. Loyalty-tier upgrade proximity.
    let loyalty = resolve_loyalty(config.total_spend, policy);
    if let Some(next) = next_loyalty_tier(loyalty, policy) {
        let remaining = next.min_spend - config.total_spend;
        out.push(Recommendation::new(
            RecommendationKind::LoyaltyUpgrade,
            format!(
                "Add ${:.2} more to your total spend to reach {} tier and get {:.0}% off processing fees.",
                remaining,
                next.level,
                next.processing_fee_discount * Decimal::from(100u32)
            ),
        ));
    }

    // 2. Fee-tier upgrade proximity.
    let current_fee_tier = fee_tier_for(policy, config.monthly_volume);
    if let Some(next) = policy
        .processing
        .tiers
        .iter()
        .find(|tier| tier.min_volume > current_fee_tier.min_volume)
    {
        let remaining = next.min_volume - config.monthly_volume;
        out.push(Recommendation::new(
            RecommendationKind::FeeTierUpgrade,
            format!(
                "Increase your monthly volume by ${:.2} to qualify for lower processing fees ({:.2}% + ${:.2}).",
                remaining,
                next.percentage_fee * Decimal::from(100u32),
                next.fixed_fee
            ),
        ));
    }

    // 3. Automatic-waiver proximity (monthly billing only).
    if !is_annual && quote.subtotal < policy.processing.min_amount_for_waiver {
        let remaining = policy.processing.min_amount_for_waiver - quote.subtotal;
        out.push(Recommendation::new(
            RecommendationKind::WaiverProximity,
            format!(
                "Add ${:.2} more to your order to qualify for automatic payment processing fee waiver.",
                remaining
            ),
        ));
    }

    // 4. Annual billing earns the waiver outright.
    if !is_annual && policy.processing.annual_commitment_waiver {
        out.push(Recommendation::new(
            RecommendationKind::AnnualBilling,
            "Switch to annual billing to automatically waive payment processing fees.",
        ));
    }

    // 5. Seasonal campaign callout.
    if let Some(campaign) = policy.seasonal_for_month(reference_date.month()) {
        if campaign.discount > Decimal::ZERO {
            out.push(Recommendation::new(
                RecommendationKind::SeasonalCampaign,
                format!(
                    "Take advantage of our {} with {:.0}% off!",
                    campaign.name,
                    campaign.discount * Decimal::from(100u32)
                ),
            ));
        }
    }

    // 6. Per-line volume-discount proximity.
    for line in quote.lines.iter().filter(|line| !line.flat_rate) {
        if let Some(next) =
            policy.volume_discounts.iter().find(|tier| tier.min_qty > line.qty)
        {
            out.push(Recommendation::new(
                RecommendationKind::VolumeDiscount,
                format!(
                    "Add {} more {} units to qualify for {:.0}% volume discount.",
                    next.min_qty - line.qty,
                    line.name,
                    next.discount * Decimal::from(100u32)
                ),
            ));
        }
    }

    // 7. Per-line margin below target.
    for line in quote.lines.iter().filter(|line| !line.flat_rate) {
        if line.margin < policy.target_margin {
            out.push(Recommendation::new(
                RecommendationKind::LowMargin,
                format!(
                    "Increase the margin for \"{}\" (currently {:.1}%) to at least {:.1}% to improve profitability.",
                    line.name,
                    line.margin * Decimal::from(100u32),
                    policy.target_margin * Decimal::from(100u32)
                ),
            ));
        }
    }

    // 8. Per-line high-margin upsell callout.
    for line in quote.lines.iter().filter(|line| !line.flat_rate) {
        if line.margin >= policy.high_margin {
            out.push(Recommendation::new(
                RecommendationKind::HighMargin,
                format!(
                    "Focus on upselling \"{}\" (margin {:.1}%) for better profit.",
                    line.name,
                    line.margin * Decimal::from(100u32)
                ),
            ));
        }
    }

    // 9. Bundling.
    if quote.lines.len() >= 2 {
        out.push(Recommendation::new(
            RecommendationKind::Bundle,
            format!(
                "Bundle multiple products or services for a more attractive offer. Consider offering a {:.0}% discount for annual commitments.",
                policy.annual_discount_rate * Decimal::from(100u32)
            ),
        ));
    }

    // 10. Service charge vs industry average.
    if config.service_charge < policy.industry_avg_service_fee {
        out.push(Recommendation::new(
            RecommendationKind::ServiceCharge,
            format!(
                "Consider increasing your service charge to at least ${:.0}/year to match industry averages.",
                policy.industry_avg_service_fee
            ),
        ));
    }

    // 11. Profitability: exactly one of the three branches fires.
    let profitability = if quote.profit_before_tax < Decimal::ZERO {
        Recommendation::new(
            RecommendationKind::Profitability,
            "Warning: the current configuration is not profitable. Review pricing and costs.",
        )
    } else if quote.profit_before_tax < policy.min_profit_threshold {
        Recommendation::new(
            RecommendationKind::Profitability,
            format!(
                "Profit (${:.2}) is below the recommended threshold of ${:.0}. Consider increasing margins or service fees, or reducing costs.",
                quote.profit_before_tax, policy.min_profit_threshold
            ),
        )
    } else {
        Recommendation::new(
            RecommendationKind::Profitability,
            format!(
                "The configuration is profitable (${:.2}). Look for further upsell opportunities or cost optimizations.",
                quote.profit_before_tax
            ),
        )
    };
    out.push(profitability);

    // 12. Complementary-category upsell out of the catalog.
    for suggestion in complementary_suggestions(catalog, quote, policy) {
        let estimate = round_cents(
            base_price(suggestion) * Decimal::from(SUGGESTED_UNITS) * config.billing_cycle.multiplier(),
        );
        let cadence = if is_annual { "per year" } else { "per month" };
        out.push(Recommendation::new(
            RecommendationKind::ComplementaryProduct,
            format!(
                "Enhance the solution by adding a {} product like \"{}\". Approximate added revenue for {} units: ${:.2} {}.",
                suggestion.category, suggestion.name, SUGGESTED_UNITS, estimate, cadence
            ),
        ));
    }

    out
}

/// Catalog products that fill categories adjacent to the cart's but missing
/// from it. One suggestion per missing category, in adjacency-table order.
fn complementary_suggestions<'a>(
    catalog: &'a Catalog,
    quote: &QuoteResult,
    policy: &PricingPolicy,
) -> Vec<&'a Product> {
    let selected: Vec<ProductCategory> = quote.lines.iter().map(|line| line.category).collect();
    if selected.is_empty() {
        return Vec::new();
    }

    let mut missing: Vec<ProductCategory> = Vec::new();
    for (category, complements) in &policy.complementary_categories {
        if !selected.contains(category) {
            continue;
        }
        for complement in complements {
            if !selected.contains(complement) && !missing.contains(complement) {
                missing.push(*complement);
            }
        }
    }

    missing
        .into_iter()
        .filter_map(|category| {
            catalog.products().iter().find(|product| {
                product.category == category
                    && !quote.lines.iter().any(|line| line.product_id == product.id)
            })
        })
        .collect()
}

fn base_price(product: &Product) -> Decimal {
    match &product.pricing {
        ProductPricing::Tiered { tiers } => {
            tiers.first().map(|tier| tier.list_price()).unwrap_or(Decimal::ZERO)
        }
        ProductPricing::FlatRate { unit_cost } => *unit_cost,
    }
}
