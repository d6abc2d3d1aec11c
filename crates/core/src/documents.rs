//! Document payloads for downstream renderers.
//!
//! The engine hands renderers (PDF, email, QR) plain data; layout and
//! delivery stay outside this crate.

use chrono::{Datelike, NaiveDate};
use rand::Rng;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::customer::CustomerInfo;
use crate::domain::quote::QuoteConfig;
use crate::policy::{CommitmentTerm, PricingPolicy};
use crate::pricing::loyalty::resolve_commitment;
use crate::pricing::quote::QuoteResult;

/// Human-facing quote number, e.g. `QT20251042`.
pub fn quote_number<R: Rng>(rng: &mut R, date: NaiveDate) -> String {
    format!("QT{}{:04}", date.year(), rng.gen_range(1000..10000))
}

/// Email subject line for a rendered quote.
pub fn email_subject(
    quote_number: &str,
    customer: &CustomerInfo,
    term: CommitmentTerm,
    date: NaiveDate,
    policy: &PricingPolicy,
) -> String {
    let commitment = resolve_commitment(term, policy);
    let name = if customer.name.is_empty() { "Customer" } else { customer.name.as_str() };
    format!(
        "[{}] Quotecraft Quote - {} | {} Plan | {}",
        quote_number,
        name,
        commitment.term,
        date.format("%b %-d, %Y")
    )
}

/// Payload encoded into the quote's QR code.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QrPayload {
    pub customer: String,
    pub company: String,
    pub total: Decimal,
    pub date: NaiveDate,
}

/// Everything a renderer needs for one quote document.
#[derive(Clone, Debug, Serialize)]
pub struct QuoteDocument {
    pub document_id: Uuid,
    pub quote_number: String,
    pub subject: String,
    pub generated_on: NaiveDate,
    pub customer: CustomerInfo,
    pub quote: QuoteResult,
    pub qr: QrPayload,
}

impl QuoteDocument {
    pub fn build<R: Rng>(
        rng: &mut R,
        quote: QuoteResult,
        config: &QuoteConfig,
        policy: &PricingPolicy,
        date: NaiveDate,
    ) -> Self {
        let number = quote_number(rng, date);
        let term = if quote.billing_cycle.is_annual() {
            CommitmentTerm::Annual
        } else {
            CommitmentTerm::Monthly
        };
        let subject = email_subject(&number, &config.customer, term, date, policy);
        let qr = QrPayload {
            customer: config.customer.display_name(),
            company: config.customer.company.clone(),
            total: quote.final_total,
            date,
        };
        Self {
            document_id: Uuid::new_v4(),
            quote_number: number,
            subject,
            generated_on: date,
            customer: config.customer.clone(),
            quote,
            qr,
        }
    }
}
