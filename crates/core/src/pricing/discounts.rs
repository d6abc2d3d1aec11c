use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::policy::PricingPolicy;

/// Volume and seasonal components of a line discount, with the capped total.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscountBreakdown {
    pub volume: Decimal,
    pub seasonal: Decimal,
    pub campaign: Option<String>,
    pub total: Decimal,
}

impl DiscountBreakdown {
    pub fn none() -> Self {
        Self::default()
    }
}

/// Combines the volume discount for `qty` with the seasonal campaign active
/// on `reference_date`.
///
/// Invariant: `total` is always within `[0, policy.discount_cap]` no matter
/// how the components stack.
pub fn compute_discount(
    qty: u32,
    reference_date: NaiveDate,
    policy: &PricingPolicy,
) -> DiscountBreakdown {
    let volume = policy
        .volume_discounts
        .iter()
        .filter(|tier| qty >= tier.min_qty)
        .map(|tier| tier.discount)
        .max()
        .unwrap_or(Decimal::ZERO);

    let campaign = policy.seasonal_for_month(reference_date.month());
    let seasonal = campaign.map(|campaign| campaign.discount).unwrap_or(Decimal::ZERO);

    let uncapped = volume + seasonal;
    debug_assert!(uncapped >= Decimal::ZERO, "discount components must be non-negative");
    let total = uncapped.clamp(Decimal::ZERO, policy.discount_cap);

    DiscountBreakdown {
        volume,
        seasonal,
        campaign: campaign.map(|campaign| campaign.name.clone()),
        total,
    }
}

/// Applies a computed discount to a list price.
pub fn apply_discount(price: Decimal, discount: &DiscountBreakdown) -> Decimal {
    price * (Decimal::ONE - discount.total)
}
