use rust_decimal::{Decimal, RoundingStrategy};

use crate::errors::DomainError;

/// Rounds a monetary amount to cents, half away from zero.
///
/// Idempotent: re-rounding an already rounded amount is a no-op.
pub fn round_cents(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Converts a monetary amount arriving as a float (config files, cart files)
/// into a `Decimal`, rejecting non-finite input.
pub fn money_from_f64(field: &'static str, value: f64) -> Result<Decimal, DomainError> {
    if !value.is_finite() {
        return Err(DomainError::NonFiniteAmount { field, value });
    }
    Decimal::try_from(value).map_err(|_| DomainError::NonFiniteAmount { field, value })
}
