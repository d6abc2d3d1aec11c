use serde::{Deserialize, Serialize};

/// Which advisory rule produced a recommendation. Variants are listed in
/// evaluation order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationKind {
    LoyaltyUpgrade,
    FeeTierUpgrade,
    WaiverProximity,
    AnnualBilling,
    SeasonalCampaign,
    VolumeDiscount,
    LowMargin,
    HighMargin,
    Bundle,
    ServiceCharge,
    Profitability,
    ComplementaryProduct,
}

impl RecommendationKind {
    pub fn description(&self) -> &'static str {
        match self {
            Self::LoyaltyUpgrade => "Loyalty tier upgrade within reach",
            Self::FeeTierUpgrade => "Lower fee tier within reach",
            Self::WaiverProximity => "Processing-fee waiver within reach",
            Self::AnnualBilling => "Annual billing waives processing fees",
            Self::SeasonalCampaign => "Seasonal campaign active",
            Self::VolumeDiscount => "Volume discount within reach",
            Self::LowMargin => "Margin below target",
            Self::HighMargin => "High-margin upsell opportunity",
            Self::Bundle => "Bundling opportunity",
            Self::ServiceCharge => "Service charge below industry average",
            Self::Profitability => "Profitability check",
            Self::ComplementaryProduct => "Complementary product opportunity",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    pub kind: RecommendationKind,
    pub message: String,
}

impl Recommendation {
    pub fn new(kind: RecommendationKind, message: impl Into<String>) -> Self {
        Self { kind, message: message.into() }
    }
}
