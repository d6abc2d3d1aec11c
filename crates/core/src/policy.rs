//! Tunable pricing policy: rates, thresholds, and lookup tables.
//!
//! Everything the business may want to retune lives here with a validated
//! default, so the engine itself carries no magic literals. The scalar
//! values can be overridden through `config::AppConfig`.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::product::ProductCategory;
use crate::errors::DomainError;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VolumeDiscount {
    pub min_qty: u32,
    pub discount: Decimal,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeasonalCampaign {
    pub name: String,
    pub discount: Decimal,
    /// Calendar months (1-12) the campaign covers.
    pub months: [u32; 3],
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeTier {
    pub min_volume: Decimal,
    pub fixed_fee: Decimal,
    pub percentage_fee: Decimal,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessingFeePolicy {
    pub min_amount_for_waiver: Decimal,
    pub annual_commitment_waiver: bool,
    /// Ascending by `min_volume`; higher volume buys lower rates.
    pub tiers: Vec<FeeTier>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoyaltyLevel {
    Bronze,
    Silver,
    Gold,
    Platinum,
}

impl LoyaltyLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bronze => "Bronze",
            Self::Silver => "Silver",
            Self::Gold => "Gold",
            Self::Platinum => "Platinum",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "bronze" => Some(Self::Bronze),
            "silver" => Some(Self::Silver),
            "gold" => Some(Self::Gold),
            "platinum" => Some(Self::Platinum),
            _ => None,
        }
    }
}

impl fmt::Display for LoyaltyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoyaltyTier {
    pub level: LoyaltyLevel,
    pub min_spend: Decimal,
    /// Fractions 0-1, applied multiplicatively, never summed with other
    /// discounts.
    pub processing_fee_discount: Decimal,
    pub service_fee_discount: Decimal,
    pub special_promotions: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommitmentTerm {
    Monthly,
    Quarterly,
    BiAnnual,
    Annual,
}

impl CommitmentTerm {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Monthly => "Monthly",
            Self::Quarterly => "Quarterly",
            Self::BiAnnual => "Bi-Annual",
            Self::Annual => "Annual",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "monthly" => Some(Self::Monthly),
            "quarterly" => Some(Self::Quarterly),
            "bi-annual" | "biannual" | "bi_annual" => Some(Self::BiAnnual),
            "annual" => Some(Self::Annual),
            _ => None,
        }
    }
}

impl fmt::Display for CommitmentTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitmentLevel {
    pub term: CommitmentTerm,
    pub discount: Decimal,
    pub min_term_months: u32,
    pub cancellation_fee_pct: Decimal,
    pub features: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingPolicy {
    /// Flat national sales-tax rate.
    pub tax_rate: Decimal,
    /// Rate applied to profit before tax. The source business data disagrees
    /// with itself here, so this is a named knob rather than a constant.
    pub profit_tax_rate: Decimal,
    /// Hard cap on combined volume + seasonal discount.
    pub discount_cap: Decimal,
    pub default_margin: Decimal,
    pub target_margin: Decimal,
    pub high_margin: Decimal,
    pub min_profit_threshold: Decimal,
    pub industry_avg_service_fee: Decimal,
    pub annual_discount_rate: Decimal,
    pub volume_discounts: Vec<VolumeDiscount>,
    pub seasonal_campaigns: Vec<SeasonalCampaign>,
    pub processing: ProcessingFeePolicy,
    /// Ascending by `min_spend`; last entry is the top tier.
    pub loyalty_tiers: Vec<LoyaltyTier>,
    /// Ascending by `min_term_months`.
    pub commitment_levels: Vec<CommitmentLevel>,
    pub complementary_categories: Vec<(ProductCategory, Vec<ProductCategory>)>,
}

impl Default for PricingPolicy {
    fn default() -> Self {
        Self {
            tax_rate: Decimal::new(13, 2),
            profit_tax_rate: Decimal::new(13, 2),
            discount_cap: Decimal::new(30, 2),
            default_margin: Decimal::new(35, 2),
            target_margin: Decimal::new(35, 2),
            high_margin: Decimal::new(40, 2),
            min_profit_threshold: Decimal::from(200u32),
            industry_avg_service_fee: Decimal::from(100u32),
            annual_discount_rate: Decimal::new(3, 2),
            volume_discounts: vec![
                VolumeDiscount { min_qty: 5, discount: Decimal::new(5, 2) },
                VolumeDiscount { min_qty: 10, discount: Decimal::new(10, 2) },
                VolumeDiscount { min_qty: 20, discount: Decimal::new(15, 2) },
                VolumeDiscount { min_qty: 50, discount: Decimal::new(20, 2) },
            ],
            seasonal_campaigns: vec![
                SeasonalCampaign {
                    name: "New Year Special".to_string(),
                    discount: Decimal::new(10, 2),
                    months: [1, 2, 3],
                },
                SeasonalCampaign {
                    name: "Spring Promotion".to_string(),
                    discount: Decimal::new(5, 2),
                    months: [4, 5, 6],
                },
                SeasonalCampaign {
                    name: "Summer Sale".to_string(),
                    discount: Decimal::new(15, 2),
                    months: [7, 8, 9],
                },
                SeasonalCampaign {
                    name: "Year-End Deal".to_string(),
                    discount: Decimal::new(20, 2),
                    months: [10, 11, 12],
                },
            ],
            processing: ProcessingFeePolicy {
                min_amount_for_waiver: Decimal::from(1000u32),
                annual_commitment_waiver: true,
                tiers: vec![
                    FeeTier {
                        min_volume: Decimal::ZERO,
                        fixed_fee: Decimal::new(30, 2),
                        percentage_fee: Decimal::new(299, 4),
                    },
                    FeeTier {
                        min_volume: Decimal::from(10_000u32),
                        fixed_fee: Decimal::new(25, 2),
                        percentage_fee: Decimal::new(275, 4),
                    },
                    FeeTier {
                        min_volume: Decimal::from(50_000u32),
                        fixed_fee: Decimal::new(20, 2),
                        percentage_fee: Decimal::new(250, 4),
                    },
                    FeeTier {
                        min_volume: Decimal::from(100_000u32),
                        fixed_fee: Decimal::new(15, 2),
                        percentage_fee: Decimal::new(225, 4),
                    },
                    FeeTier {
                        min_volume: Decimal::from(500_000u32),
                        fixed_fee: Decimal::new(10, 2),
                        percentage_fee: Decimal::new(200, 4),
                    },
                ],
            },
            loyalty_tiers: vec![
                LoyaltyTier {
                    level: LoyaltyLevel::Bronze,
                    min_spend: Decimal::ZERO,
                    processing_fee_discount: Decimal::ZERO,
                    service_fee_discount: Decimal::ZERO,
                    special_promotions: false,
                },
                LoyaltyTier {
                    level: LoyaltyLevel::Silver,
                    min_spend: Decimal::from(5_000u32),
                    processing_fee_discount: Decimal::new(25, 2),
                    service_fee_discount: Decimal::new(10, 2),
                    special_promotions: true,
                },
                LoyaltyTier {
                    level: LoyaltyLevel::Gold,
                    min_spend: Decimal::from(20_000u32),
                    processing_fee_discount: Decimal::new(50, 2),
                    service_fee_discount: Decimal::new(20, 2),
                    special_promotions: true,
                },
                LoyaltyTier {
                    level: LoyaltyLevel::Platinum,
                    min_spend: Decimal::from(50_000u32),
                    processing_fee_discount: Decimal::ONE,
                    service_fee_discount: Decimal::new(30, 2),
                    special_promotions: true,
                },
            ],
            commitment_levels: vec![
                CommitmentLevel {
                    term: CommitmentTerm::Monthly,
                    discount: Decimal::ZERO,
                    min_term_months: 1,
                    cancellation_fee_pct: Decimal::ZERO,
                    features: vec!["Basic Support".to_string(), "Standard Features".to_string()],
                },
                CommitmentLevel {
                    term: CommitmentTerm::Quarterly,
                    discount: Decimal::new(5, 2),
                    min_term_months: 3,
                    cancellation_fee_pct: Decimal::new(10, 2),
                    features: vec![
                        "Priority Support".to_string(),
                        "Advanced Features".to_string(),
                        "Monthly Reports".to_string(),
                    ],
                },
                CommitmentLevel {
                    term: CommitmentTerm::BiAnnual,
                    discount: Decimal::new(10, 2),
                    min_term_months: 6,
                    cancellation_fee_pct: Decimal::new(15, 2),
                    features: vec![
                        "Premium Support".to_string(),
                        "Enterprise Features".to_string(),
                        "Quarterly Reviews".to_string(),
                    ],
                },
                CommitmentLevel {
                    term: CommitmentTerm::Annual,
                    discount: Decimal::new(15, 2),
                    min_term_months: 12,
                    cancellation_fee_pct: Decimal::new(20, 2),
                    features: vec![
                        "24/7 Support".to_string(),
                        "All Features".to_string(),
                        "Quarterly Reviews".to_string(),
                        "Dedicated Account Manager".to_string(),
                    ],
                },
            ],
            complementary_categories: vec![
                (ProductCategory::Desktop, vec![ProductCategory::Server, ProductCategory::SaaS]),
                (
                    ProductCategory::Server,
                    vec![ProductCategory::SaaS, ProductCategory::VirtualServer],
                ),
                (ProductCategory::VirtualServer, vec![ProductCategory::SaaS]),
                (
                    ProductCategory::SaaS,
                    vec![ProductCategory::Server, ProductCategory::VirtualServer],
                ),
            ],
        }
    }
}

impl PricingPolicy {
    /// The campaign covering a calendar month (1-12). The default quarters
    /// partition the year, so exactly one matches for valid months.
    pub fn seasonal_for_month(&self, month: u32) -> Option<&SeasonalCampaign> {
        self.seasonal_campaigns.iter().find(|campaign| campaign.months.contains(&month))
    }

    pub fn top_loyalty_tier(&self) -> Option<&LoyaltyTier> {
        self.loyalty_tiers.last()
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        let fraction_fields = [
            ("tax_rate", self.tax_rate),
            ("profit_tax_rate", self.profit_tax_rate),
            ("discount_cap", self.discount_cap),
            ("default_margin", self.default_margin),
            ("target_margin", self.target_margin),
            ("high_margin", self.high_margin),
        ];
        for (name, value) in fraction_fields {
            if value < Decimal::ZERO || value > Decimal::ONE {
                return Err(violation(format!("{name} must be within [0, 1], got {value}")));
            }
        }

        for window in self.volume_discounts.windows(2) {
            if window[1].min_qty <= window[0].min_qty {
                return Err(violation("volume discounts must ascend by min_qty".to_string()));
            }
        }
        for tier in &self.volume_discounts {
            if tier.discount < Decimal::ZERO || tier.discount > Decimal::ONE {
                return Err(violation(format!(
                    "volume discount for {}+ units must be within [0, 1]",
                    tier.min_qty
                )));
            }
        }

        let mut covered = [false; 12];
        for campaign in &self.seasonal_campaigns {
            for month in campaign.months {
                if !(1..=12).contains(&month) {
                    return Err(violation(format!(
                        "campaign `{}` references invalid month {month}",
                        campaign.name
                    )));
                }
                if covered[(month - 1) as usize] {
                    return Err(violation(format!(
                        "campaign `{}` overlaps another campaign in month {month}",
                        campaign.name
                    )));
                }
                covered[(month - 1) as usize] = true;
            }
        }

        if self.processing.tiers.is_empty() {
            return Err(violation("processing fee schedule must not be empty".to_string()));
        }
        for window in self.processing.tiers.windows(2) {
            if window[1].min_volume <= window[0].min_volume {
                return Err(violation("fee tiers must ascend by min_volume".to_string()));
            }
            if window[1].percentage_fee > window[0].percentage_fee {
                return Err(violation(
                    "fee percentage must be non-increasing across volume tiers".to_string(),
                ));
            }
            if window[1].fixed_fee > window[0].fixed_fee {
                return Err(violation(
                    "fixed fee must be non-increasing across volume tiers".to_string(),
                ));
            }
        }

        if self.loyalty_tiers.is_empty() {
            return Err(violation("loyalty table must not be empty".to_string()));
        }
        if self.loyalty_tiers[0].min_spend != Decimal::ZERO {
            return Err(violation("lowest loyalty tier must start at zero spend".to_string()));
        }
        for window in self.loyalty_tiers.windows(2) {
            if window[1].min_spend <= window[0].min_spend {
                return Err(violation("loyalty tiers must ascend by min_spend".to_string()));
            }
        }
        for tier in &self.loyalty_tiers {
            for (name, value) in [
                ("processing_fee_discount", tier.processing_fee_discount),
                ("service_fee_discount", tier.service_fee_discount),
            ] {
                if value < Decimal::ZERO || value > Decimal::ONE {
                    return Err(violation(format!(
                        "{} {name} must be within [0, 1]",
                        tier.level
                    )));
                }
            }
        }

        if self.commitment_levels.is_empty() {
            return Err(violation("commitment table must not be empty".to_string()));
        }
        for window in self.commitment_levels.windows(2) {
            if window[1].min_term_months <= window[0].min_term_months {
                return Err(violation(
                    "commitment levels must ascend by min_term_months".to_string(),
                ));
            }
        }

        Ok(())
    }
}

fn violation(message: String) -> DomainError {
    DomainError::InvariantViolation(message)
}
