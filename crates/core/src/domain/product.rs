use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProductId(pub String);

impl ProductId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductCategory {
    Desktop,
    Server,
    VirtualServer,
    #[serde(rename = "saas")]
    SaaS,
    Service,
    Other,
}

impl ProductCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Desktop => "Desktop",
            Self::Server => "Server",
            Self::VirtualServer => "Virtual Server",
            Self::SaaS => "SaaS",
            Self::Service => "Service",
            Self::Other => "Other",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "desktop" => Some(Self::Desktop),
            "server" => Some(Self::Server),
            "virtual server" | "virtual_server" => Some(Self::VirtualServer),
            "saas" => Some(Self::SaaS),
            "service" => Some(Self::Service),
            "other" => Some(Self::Other),
            _ => None,
        }
    }
}

impl fmt::Display for ProductCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A margin that has already been through the ingestion boundary: either a
/// known fraction or explicitly unset. Unset margins are defaulted to zero by
/// the pricing pipeline and logged as a catalog-configuration warning.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Option<Decimal>", into = "Option<Decimal>")]
pub enum Margin {
    Set(Decimal),
    Unset,
}

impl Margin {
    pub fn fraction(&self) -> Option<Decimal> {
        match self {
            Self::Set(value) => Some(*value),
            Self::Unset => None,
        }
    }

    pub fn is_set(&self) -> bool {
        matches!(self, Self::Set(_))
    }
}

impl From<Option<Decimal>> for Margin {
    fn from(value: Option<Decimal>) -> Self {
        match value {
            Some(fraction) => Self::Set(fraction),
            None => Self::Unset,
        }
    }
}

impl From<Margin> for Option<Decimal> {
    fn from(value: Margin) -> Self {
        value.fraction()
    }
}

/// A quantity range with its unit cost and margin. `max_qty: None` marks the
/// unbounded final tier.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingTier {
    pub min_qty: u32,
    pub max_qty: Option<u32>,
    pub unit_cost: Decimal,
    pub margin: Margin,
    /// Optional precomputed `unit_cost * (1 + margin)`. Must agree with the
    /// derived value; disagreements are clamped to derived in release.
    pub recommended_price: Option<Decimal>,
}

impl PricingTier {
    pub fn new(min_qty: u32, max_qty: Option<u32>, unit_cost: Decimal, margin: Decimal) -> Self {
        Self { min_qty, max_qty, unit_cost, margin: Margin::Set(margin), recommended_price: None }
    }

    pub fn contains(&self, qty: u32) -> bool {
        qty >= self.min_qty && self.max_qty.map_or(true, |max| qty <= max)
    }

    /// Customer-facing list price before discounts.
    pub fn list_price(&self) -> Decimal {
        let margin = self.margin.fraction().unwrap_or(Decimal::ZERO);
        let derived = self.unit_cost * (Decimal::ONE + margin);
        if let Some(stored) = self.recommended_price {
            debug_assert!(
                (stored - derived).abs() <= Decimal::new(1, 2),
                "stored recommended price {stored} disagrees with derived {derived}"
            );
            if (stored - derived).abs() > Decimal::new(1, 2) {
                tracing::warn!(
                    stored = %stored,
                    derived = %derived,
                    "recommended price disagrees with unit cost and margin, using derived value"
                );
            }
        }
        derived
    }
}

/// How a product is priced, resolved once at ingestion.
///
/// `FlatRate` is the homegrown case (e.g. the disaster-recovery service):
/// the customer pays flat cost plus sales tax, margin and volume/seasonal
/// discounts do not apply, and vendor-cost accounting is not tax-inclusive.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "model", rename_all = "snake_case")]
pub enum ProductPricing {
    Tiered { tiers: Vec<PricingTier> },
    FlatRate { unit_cost: Decimal },
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub license: String,
    pub category: ProductCategory,
    pub pricing: ProductPricing,
}

impl Product {
    /// Checks the tier-schedule invariants: ranges are ordered, contiguous,
    /// start at quantity 1, end unbounded, and carry non-negative costs.
    pub fn validate(&self) -> Result<(), DomainError> {
        match &self.pricing {
            ProductPricing::FlatRate { unit_cost } => {
                if *unit_cost < Decimal::ZERO {
                    return Err(self.malformed(format!("negative flat unit cost {unit_cost}")));
                }
                Ok(())
            }
            ProductPricing::Tiered { tiers } => {
                let first = tiers
                    .first()
                    .ok_or_else(|| self.malformed("no pricing tiers".to_string()))?;
                if first.min_qty != 1 {
                    return Err(self.malformed(format!(
                        "first tier starts at quantity {}, expected 1",
                        first.min_qty
                    )));
                }
                for (index, tier) in tiers.iter().enumerate() {
                    if tier.unit_cost < Decimal::ZERO {
                        return Err(self.malformed(format!(
                            "negative unit cost {} in tier {index}",
                            tier.unit_cost
                        )));
                    }
                    match (tier.max_qty, tiers.get(index + 1)) {
                        (Some(max), Some(next)) => {
                            if max < tier.min_qty {
                                return Err(self
                                    .malformed(format!("tier {index} has inverted range")));
                            }
                            if next.min_qty != max + 1 {
                                return Err(self.malformed(format!(
                                    "gap or overlap between tier {index} and tier {}",
                                    index + 1
                                )));
                            }
                        }
                        (Some(_), None) => {
                            return Err(self.malformed(
                                "last tier must be unbounded (no max quantity)".to_string(),
                            ));
                        }
                        (None, Some(_)) => {
                            return Err(self.malformed(format!(
                                "tier {index} is unbounded but is not the last tier"
                            )));
                        }
                        (None, None) => {}
                    }
                }
                Ok(())
            }
        }
    }

    fn malformed(&self, reason: String) -> DomainError {
        DomainError::MalformedProduct { name: self.name.clone(), reason }
    }
}
