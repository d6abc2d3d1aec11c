pub mod auth;
pub mod catalog;
pub mod config;
pub mod documents;
pub mod domain;
pub mod errors;
pub mod policy;
pub mod pricing;
pub mod recommendations;

pub use auth::{AccessGate, OpenGate, StaticCredentialGate};
pub use catalog::Catalog;
pub use config::{AppConfig, ConfigError, ConfigOverrides, LoadOptions, LogFormat, LoggingConfig};
pub use documents::{QrPayload, QuoteDocument};
pub use domain::cart::{Cart, CartLine};
pub use domain::customer::{CustomerInfo, SALUTATIONS};
pub use domain::product::{
    Margin, PricingTier, Product, ProductCategory, ProductId, ProductPricing,
};
pub use domain::quote::{BillingCycle, QuoteConfig};
pub use errors::DomainError;
pub use policy::{
    CommitmentLevel, CommitmentTerm, LoyaltyLevel, LoyaltyTier, PricingPolicy,
};
pub use pricing::{
    compute_discount, compute_quote, fee_tier_for, processing_fee, resolve_commitment,
    resolve_commitment_by_months, resolve_loyalty, resolve_tier, round_cents, DiscountBreakdown,
    FeeAssessment, LineBreakdown, QuoteResult, TierResolution, WaiverReason,
};
pub use recommendations::{recommendations, Recommendation, RecommendationKind};
