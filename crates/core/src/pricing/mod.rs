pub mod currency;
pub mod discounts;
pub mod fees;
pub mod loyalty;
pub mod quote;
pub mod tiers;

pub use currency::{money_from_f64, round_cents};
pub use discounts::{apply_discount, compute_discount, DiscountBreakdown};
pub use fees::{fee_tier_for, processing_fee, sales_tax, FeeAssessment, WaiverReason};
pub use loyalty::{
    commitment_pricing, next_loyalty_tier, resolve_commitment, resolve_commitment_by_months,
    resolve_loyalty, CommitmentPricing,
};
pub use quote::{compute_quote, LineBreakdown, QuoteResult};
pub use tiers::{resolve_tier, TierResolution};
