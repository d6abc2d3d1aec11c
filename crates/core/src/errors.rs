use rust_decimal::Decimal;
use thiserror::Error;

use crate::domain::product::ProductId;

/// Validation failures raised by the pricing engine.
///
/// These are the "thrown" class of the error taxonomy: callers must surface
/// them. Catalog-configuration issues (tier fallback, unset margin) are the
/// non-fatal class and are logged instead of returned.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum DomainError {
    #[error("quantity must be a positive integer, got {qty}")]
    InvalidQuantity { qty: i64 },
    #[error("amount for `{field}` must be finite, got {value}")]
    NonFiniteAmount { field: &'static str, value: f64 },
    #[error("amount for `{field}` must be non-negative, got {value}")]
    NegativeAmount { field: &'static str, value: Decimal },
    #[error("unknown product `{0}`")]
    UnknownProduct(ProductId),
    #[error("malformed product `{name}`: {reason}")]
    MalformedProduct { name: String, reason: String },
    #[error("domain invariant violation: {0}")]
    InvariantViolation(String),
}
