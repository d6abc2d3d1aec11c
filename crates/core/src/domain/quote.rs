use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::customer::CustomerInfo;
use crate::errors::DomainError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BillingCycle {
    Monthly,
    Annual,
}

impl BillingCycle {
    /// Factor converting a monthly figure to the billed period.
    pub fn multiplier(&self) -> Decimal {
        match self {
            Self::Monthly => Decimal::ONE,
            Self::Annual => Decimal::from(12u32),
        }
    }

    pub fn is_annual(&self) -> bool {
        matches!(self, Self::Annual)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Monthly => "monthly",
            Self::Annual => "annual",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "monthly" => Some(Self::Monthly),
            "annual" => Some(Self::Annual),
            _ => None,
        }
    }
}

/// Everything about a quoting session that is not a cart line. Lifetime is
/// one session; the engine receives it as an immutable snapshot per call.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteConfig {
    pub billing_cycle: BillingCycle,
    pub service_charge: Decimal,
    pub waive_processing_fee: bool,
    pub monthly_volume: Decimal,
    pub total_spend: Decimal,
    pub customer: CustomerInfo,
}

impl Default for QuoteConfig {
    fn default() -> Self {
        Self {
            billing_cycle: BillingCycle::Monthly,
            service_charge: Decimal::new(5000, 2),
            waive_processing_fee: false,
            monthly_volume: Decimal::ZERO,
            total_spend: Decimal::ZERO,
            customer: CustomerInfo::default(),
        }
    }
}

impl QuoteConfig {
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.service_charge < Decimal::ZERO {
            return Err(DomainError::NegativeAmount {
                field: "service_charge",
                value: self.service_charge,
            });
        }
        if self.monthly_volume < Decimal::ZERO {
            return Err(DomainError::NegativeAmount {
                field: "monthly_volume",
                value: self.monthly_volume,
            });
        }
        if self.total_spend < Decimal::ZERO {
            return Err(DomainError::NegativeAmount {
                field: "total_spend",
                value: self.total_spend,
            });
        }
        Ok(())
    }
}
