use tracing::warn;

use crate::domain::product::PricingTier;
use crate::errors::DomainError;

/// Outcome of tier resolution. `fell_back` marks the leniency path taken when
/// no range covers the quantity — a catalog-configuration problem that is
/// surfaced to logs and to the quote line, not thrown.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TierResolution<'a> {
    pub tier: &'a PricingTier,
    pub fell_back: bool,
}

/// Picks the tier whose quantity range contains `qty`.
///
/// Quantity validation belongs to the callers (cart mutators reject qty < 1
/// before anything reaches pricing); the resolver still refuses rather than
/// price a zero quantity.
pub fn resolve_tier<'a>(
    product_name: &str,
    tiers: &'a [PricingTier],
    qty: u32,
) -> Result<TierResolution<'a>, DomainError> {
    if qty < 1 {
        return Err(DomainError::InvalidQuantity { qty: qty as i64 });
    }

    if let Some(tier) = tiers.iter().find(|tier| tier.contains(qty)) {
        return Ok(TierResolution { tier, fell_back: false });
    }

    let last = tiers.last().ok_or_else(|| DomainError::MalformedProduct {
        name: product_name.to_string(),
        reason: "no pricing tiers".to_string(),
    })?;
    warn!(product = product_name, qty, "no pricing tier covers quantity, using last tier");
    Ok(TierResolution { tier: last, fell_back: true })
}
