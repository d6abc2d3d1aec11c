//! Quote optimization recommendations.
//!
//! Stateless advisory rules that read a computed quote and emit
//! human-readable suggestions. Rules are evaluated in a fixed order so that
//! output is reproducible; applying a suggestion is the caller's business and
//! re-enters the normal mutation path.

mod engine;
mod types;

pub use engine::recommendations;
pub use types::{Recommendation, RecommendationKind};

/// Nominal quantity used when estimating revenue for a suggested add-on
/// product.
pub const SUGGESTED_UNITS: u32 = 5;
