use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::policy::{FeeTier, PricingPolicy};
use crate::pricing::currency::round_cents;
use crate::pricing::loyalty::resolve_loyalty;

/// Why a processing fee came out as zero. Checked in a fixed order; the
/// first qualifying reason wins.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WaiverReason {
    ExplicitWaiver,
    AmountThreshold,
    AnnualCommitment,
    TopLoyaltyTier,
}

impl WaiverReason {
    pub fn description(&self) -> &'static str {
        match self {
            Self::ExplicitWaiver => "Fee waiver applied",
            Self::AmountThreshold => "Amount exceeds minimum threshold",
            Self::AnnualCommitment => "Annual commitment",
            Self::TopLoyaltyTier => "Top loyalty tier benefit",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeAssessment {
    /// The fee actually charged (zero when waived).
    pub fee: Decimal,
    pub fixed_fee: Decimal,
    pub percentage_fee: Decimal,
    /// Fixed + percentage before the loyalty discount.
    pub base_fee: Decimal,
    pub loyalty_discount: Decimal,
    pub waived: Option<WaiverReason>,
    pub fee_tier_min_volume: Decimal,
}

impl FeeAssessment {
    pub fn is_waived(&self) -> bool {
        self.waived.is_some()
    }
}

/// Fee tier for a monthly transaction volume: highest threshold at or below
/// the volume. The schedule always starts at zero, so the first tier is the
/// fallback.
pub fn fee_tier_for(policy: &PricingPolicy, monthly_volume: Decimal) -> &FeeTier {
    policy
        .processing
        .tiers
        .iter()
        .rev()
        .find(|tier| monthly_volume >= tier.min_volume)
        .unwrap_or_else(|| &policy.processing.tiers[0])
}

/// Payment-processing fee for a charge of `amount`.
///
/// Waiver policy, first match wins: explicit waive flag, amount at or above
/// the waiver threshold, annual commitment (when the policy grants it), top
/// loyalty tier. Otherwise the loyalty-discounted fee applies.
pub fn processing_fee(
    amount: Decimal,
    is_annual: bool,
    waive: bool,
    monthly_volume: Decimal,
    total_spend: Decimal,
    policy: &PricingPolicy,
) -> FeeAssessment {
    let tier = fee_tier_for(policy, monthly_volume);
    let loyalty = resolve_loyalty(total_spend, policy);
    let base_fee = tier.fixed_fee + amount * tier.percentage_fee;
    let discounted = base_fee * (Decimal::ONE - loyalty.processing_fee_discount);

    let is_top_tier = policy
        .top_loyalty_tier()
        .map(|top| top.level == loyalty.level)
        .unwrap_or(false);

    let waived = if waive {
        Some(WaiverReason::ExplicitWaiver)
    } else if amount >= policy.processing.min_amount_for_waiver {
        Some(WaiverReason::AmountThreshold)
    } else if is_annual && policy.processing.annual_commitment_waiver {
        Some(WaiverReason::AnnualCommitment)
    } else if is_top_tier {
        Some(WaiverReason::TopLoyaltyTier)
    } else {
        None
    };

    FeeAssessment {
        fee: if waived.is_some() { Decimal::ZERO } else { round_cents(discounted) },
        fixed_fee: tier.fixed_fee,
        percentage_fee: tier.percentage_fee,
        base_fee: round_cents(base_fee),
        loyalty_discount: loyalty.processing_fee_discount,
        waived,
        fee_tier_min_volume: tier.min_volume,
    }
}

/// Flat sales tax on a taxable amount.
pub fn sales_tax(amount: Decimal, policy: &PricingPolicy) -> Decimal {
    round_cents(amount * policy.tax_rate)
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::{fee_tier_for, processing_fee, sales_tax, WaiverReason};
    use crate::policy::PricingPolicy;

    fn no_waiver_policy() -> PricingPolicy {
        let mut policy = PricingPolicy::default();
        policy.processing.annual_commitment_waiver = false;
        policy.processing.min_amount_for_waiver = Decimal::from(1_000_000u32);
        policy
    }

    #[test]
    fn fee_tier_selection_follows_volume_thresholds() {
        let policy = PricingPolicy::default();
        assert_eq!(fee_tier_for(&policy, Decimal::ZERO).percentage_fee, Decimal::new(299, 4));
        assert_eq!(
            fee_tier_for(&policy, Decimal::from(9_999u32)).percentage_fee,
            Decimal::new(299, 4)
        );
        assert_eq!(
            fee_tier_for(&policy, Decimal::from(10_000u32)).percentage_fee,
            Decimal::new(275, 4)
        );
        assert_eq!(
            fee_tier_for(&policy, Decimal::from(2_000_000u32)).percentage_fee,
            Decimal::new(200, 4)
        );
    }

    #[test]
    fn standard_fee_is_fixed_plus_percentage() {
        let policy = no_waiver_policy();
        let assessment = processing_fee(
            Decimal::from(100u32),
            false,
            false,
            Decimal::ZERO,
            Decimal::ZERO,
            &policy,
        );
        // 0.30 + 100 * 0.0299 = 3.29
        assert_eq!(assessment.fee, Decimal::new(329, 2));
        assert!(!assessment.is_waived());
    }

    #[test]
    fn explicit_waive_always_zeroes_the_fee() {
        let policy = PricingPolicy::default();
        for amount in [Decimal::ZERO, Decimal::from(50u32), Decimal::from(100_000u32)] {
            for is_annual in [false, true] {
                let assessment = processing_fee(
                    amount,
                    is_annual,
                    true,
                    Decimal::from(25_000u32),
                    Decimal::from(60_000u32),
                    &policy,
                );
                assert_eq!(assessment.fee, Decimal::ZERO);
                assert_eq!(assessment.waived, Some(WaiverReason::ExplicitWaiver));
            }
        }
    }

    #[test]
    fn waiver_reasons_resolve_in_order() {
        let policy = PricingPolicy::default();

        let by_amount = processing_fee(
            Decimal::from(1_200u32),
            true,
            false,
            Decimal::ZERO,
            Decimal::from(60_000u32),
            &policy,
        );
        assert_eq!(by_amount.waived, Some(WaiverReason::AmountThreshold));

        let by_annual = processing_fee(
            Decimal::from(500u32),
            true,
            false,
            Decimal::ZERO,
            Decimal::from(60_000u32),
            &policy,
        );
        assert_eq!(by_annual.waived, Some(WaiverReason::AnnualCommitment));

        let by_loyalty = processing_fee(
            Decimal::from(500u32),
            false,
            false,
            Decimal::ZERO,
            Decimal::from(60_000u32),
            &policy,
        );
        assert_eq!(by_loyalty.waived, Some(WaiverReason::TopLoyaltyTier));
    }

    #[test]
    fn loyalty_discount_applies_multiplicatively() {
        let policy = no_waiver_policy();
        // Gold: 50% off processing fees.
        let assessment = processing_fee(
            Decimal::from(100u32),
            false,
            false,
            Decimal::ZERO,
            Decimal::from(20_000u32),
            &policy,
        );
        assert_eq!(assessment.base_fee, Decimal::new(329, 2));
        assert_eq!(assessment.fee, Decimal::new(165, 2));
        assert_eq!(assessment.loyalty_discount, Decimal::new(50, 2));
    }

    #[test]
    fn effective_rate_never_increases_with_volume() {
        let policy = no_waiver_policy();
        let amount = Decimal::from(800u32);
        let mut previous_fee: Option<Decimal> = None;
        for volume in [0u32, 5_000, 10_000, 50_000, 100_000, 500_000, 1_000_000] {
            let assessment = processing_fee(
                amount,
                false,
                false,
                Decimal::from(volume),
                Decimal::ZERO,
                &policy,
            );
            if let Some(previous) = previous_fee {
                assert!(
                    assessment.fee <= previous,
                    "fee rose when volume climbed to {volume}"
                );
            }
            previous_fee = Some(assessment.fee);
        }
    }

    #[test]
    fn sales_tax_is_flat_thirteen_percent() {
        let policy = PricingPolicy::default();
        assert_eq!(sales_tax(Decimal::from(100u32), &policy), Decimal::new(1300, 2));
        assert_eq!(sales_tax(Decimal::new(794, 2), &policy), Decimal::new(103, 2));
    }
}
