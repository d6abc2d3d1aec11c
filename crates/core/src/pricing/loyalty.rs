use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::DomainError;
use crate::policy::{CommitmentLevel, CommitmentTerm, LoyaltyTier, PricingPolicy};
use crate::pricing::currency::round_cents;

/// Highest loyalty tier whose spend threshold is at or below `total_spend`.
/// The table is ascending, so scan from the top; the lowest tier is the
/// default.
pub fn resolve_loyalty(total_spend: Decimal, policy: &PricingPolicy) -> &LoyaltyTier {
    policy
        .loyalty_tiers
        .iter()
        .rev()
        .find(|tier| total_spend >= tier.min_spend)
        .unwrap_or_else(|| &policy.loyalty_tiers[0])
}

/// The next tier above `current`, if any.
pub fn next_loyalty_tier<'a>(
    current: &LoyaltyTier,
    policy: &'a PricingPolicy,
) -> Option<&'a LoyaltyTier> {
    policy.loyalty_tiers.iter().find(|tier| tier.min_spend > current.min_spend)
}

/// Commitment level for an exact term, defaulting to the shortest level.
pub fn resolve_commitment(term: CommitmentTerm, policy: &PricingPolicy) -> &CommitmentLevel {
    policy
        .commitment_levels
        .iter()
        .find(|level| level.term == term)
        .unwrap_or_else(|| &policy.commitment_levels[0])
}

/// Highest commitment level whose minimum term fits within `months`.
pub fn resolve_commitment_by_months(months: u32, policy: &PricingPolicy) -> &CommitmentLevel {
    policy
        .commitment_levels
        .iter()
        .rev()
        .find(|level| level.min_term_months <= months)
        .unwrap_or_else(|| &policy.commitment_levels[0])
}

/// Commitment-discounted pricing for a base price and quantity.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitmentPricing {
    pub term: CommitmentTerm,
    pub base_price: Decimal,
    pub discounted_price: Decimal,
    pub qty: u32,
    pub total: Decimal,
    pub savings: Decimal,
    pub discount: Decimal,
    pub min_term_months: u32,
    pub cancellation_fee_pct: Decimal,
}

pub fn commitment_pricing(
    base_price: Decimal,
    term: CommitmentTerm,
    qty: u32,
    policy: &PricingPolicy,
) -> Result<CommitmentPricing, DomainError> {
    if qty < 1 {
        return Err(DomainError::InvalidQuantity { qty: qty as i64 });
    }
    if base_price < Decimal::ZERO {
        return Err(DomainError::NegativeAmount { field: "base_price", value: base_price });
    }

    let level = resolve_commitment(term, policy);
    let discounted_price = round_cents(base_price * (Decimal::ONE - level.discount));
    let qty_dec = Decimal::from(qty);
    let total = round_cents(discounted_price * qty_dec);
    let savings = round_cents(base_price * qty_dec - total);

    Ok(CommitmentPricing {
        term: level.term,
        base_price,
        discounted_price,
        qty,
        total,
        savings,
        discount: level.discount,
        min_term_months: level.min_term_months,
        cancellation_fee_pct: level.cancellation_fee_pct,
    })
}
