//! End-to-end pricing scenarios against the standard catalog.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use quotecraft_core::{
    compute_quote, recommendations, Cart, Catalog, PricingPolicy, ProductId, QuoteConfig,
    RecommendationKind, WaiverReason,
};

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

/// Policy with seasonal campaigns zeroed so fixtures can rely on raw list
/// prices.
fn no_seasonal() -> PricingPolicy {
    let mut policy = PricingPolicy::default();
    for campaign in &mut policy.seasonal_campaigns {
        campaign.discount = Decimal::ZERO;
    }
    policy
}

#[test]
fn spx_desktop_unit_quote_matches_the_published_numbers() {
    let catalog = Catalog::standard();
    let mut cart = Cart::new();
    cart.add(ProductId::new("spx-desktop"), 1).expect("add");
    let config = QuoteConfig { service_charge: Decimal::ZERO, ..QuoteConfig::default() };

    let quote = compute_quote(&catalog, &cart, &config, &no_seasonal(), date(2025, 7, 1))
        .expect("quote computes");

    // 5.88 * 1.35 = 7.938 -> $7.94; 13% tax on the line -> $1.03.
    let line = &quote.lines[0];
    assert_eq!(line.unit_price, Decimal::new(794, 2));
    assert_eq!(line.tax_amount, Decimal::new(103, 2));
}

#[test]
fn twelve_hundred_dollar_cart_earns_the_automatic_waiver() {
    let catalog = Catalog::standard();
    let mut cart = Cart::new();
    // 37 VMs at 30.00 * 1.35 = 40.50 each is 1,498.50; with the 15% volume
    // discount it lands at 34.43 * 37 = 1,273.91 -- still comfortably over
    // the $1,000 threshold.
    cart.add(ProductId::new("spx-vm"), 37).expect("add");
    let config = QuoteConfig {
        service_charge: Decimal::ZERO,
        waive_processing_fee: false,
        ..QuoteConfig::default()
    };

    let quote = compute_quote(&catalog, &cart, &config, &no_seasonal(), date(2025, 7, 1))
        .expect("quote computes");

    assert!(quote.subtotal > Decimal::from(1_200u32));
    assert_eq!(quote.processing_fee.fee, Decimal::ZERO);
    assert_eq!(quote.processing_fee.waived, Some(WaiverReason::AmountThreshold));
}

#[test]
fn crossing_the_volume_threshold_drops_the_price_by_exactly_five_percent() {
    let catalog = Catalog::standard();
    let policy = no_seasonal();
    let config = QuoteConfig { service_charge: Decimal::ZERO, ..QuoteConfig::default() };
    let on = date(2025, 7, 1);

    let mut cart = Cart::new();
    cart.add(ProductId::new("spx-desktop"), 4).expect("add");
    let at_four = compute_quote(&catalog, &cart, &config, &policy, on).expect("qty 4");
    assert_eq!(at_four.lines[0].discount.total, Decimal::ZERO);
    assert_eq!(at_four.lines[0].unit_price, Decimal::new(794, 2));

    let recs = recommendations(&catalog, &at_four, &config, &policy, on);
    assert!(
        recs.iter().any(|rec| rec.kind == RecommendationKind::VolumeDiscount),
        "proximity suggestion fires at qty 4"
    );

    cart.set_qty(&ProductId::new("spx-desktop"), 5).expect("set");
    let at_five = compute_quote(&catalog, &cart, &config, &policy, on).expect("qty 5");
    assert_eq!(at_five.lines[0].discount.total, Decimal::new(5, 2));
    // 7.938 * 0.95 = 7.5411 -> $7.54, exactly 5% off the undiscounted list.
    assert_eq!(at_five.lines[0].unit_price, Decimal::new(754, 2));

    let recs = recommendations(&catalog, &at_five, &config, &policy, on);
    assert!(
        !recs.iter().any(|rec| rec.kind == RecommendationKind::VolumeDiscount),
        "proximity suggestion disappears at qty 5"
    );
}

#[test]
fn mixed_cart_with_flat_rate_service_prices_every_component() {
    let catalog = Catalog::standard();
    let policy = no_seasonal();
    let on = date(2025, 7, 1);

    let mut cart = Cart::new();
    cart.add(ProductId::new("spx-desktop"), 10).expect("add");
    cart.add(ProductId::new("dr-service"), 1).expect("add");
    let config = QuoteConfig { service_charge: Decimal::new(5000, 2), ..QuoteConfig::default() };

    let quote = compute_quote(&catalog, &cart, &config, &policy, on).expect("quote computes");

    // Desktop: 10% volume discount on 7.938 -> 7.14/unit, 71.40 total.
    // DR service passes through at 99.00.
    assert_eq!(quote.lines[0].line_total, Decimal::new(7140, 2));
    assert_eq!(quote.lines[1].line_total, Decimal::new(9900, 2));
    assert_eq!(quote.subtotal, Decimal::new(17040, 2));

    // Tax covers subtotal + service charge: (170.40 + 50.00) * 0.13.
    assert_eq!(quote.tax, Decimal::new(2865, 2));

    // Fee on the charged amount: 220.40 + 28.65 = 249.05, tier 0 rates.
    let fee = &quote.processing_fee;
    assert!(!fee.is_waived());
    assert_eq!(fee.fee, Decimal::new(775, 2)); // 0.30 + 249.05 * 0.0299 = 7.7466

    assert_eq!(quote.final_total, Decimal::new(25680, 2)); // 249.05 + 7.75

    // Profit: 170.40 - (66.44 + 99.00) + 50.00 - 7.75 = 47.21.
    assert_eq!(quote.profit_before_tax, Decimal::new(4721, 2));
    assert_eq!(quote.profit_after_tax, Decimal::new(4107, 2)); // * 0.87, rounded
}

#[test]
fn annual_billing_waives_fees_and_multiplies_the_period() {
    let catalog = Catalog::standard();
    let policy = no_seasonal();
    let on = date(2025, 7, 1);

    let mut cart = Cart::new();
    cart.add(ProductId::new("spx-desktop"), 1).expect("add");
    let config = QuoteConfig {
        billing_cycle: quotecraft_core::BillingCycle::Annual,
        service_charge: Decimal::new(5000, 2),
        ..QuoteConfig::default()
    };

    let quote = compute_quote(&catalog, &cart, &config, &policy, on).expect("quote computes");

    assert_eq!(quote.subtotal, Decimal::new(9528, 2)); // 7.94 * 12
    assert_eq!(quote.service_charge, Decimal::new(60000, 2)); // 50 * 12
    assert!(quote.processing_fee.is_waived());
}

#[test]
fn profit_tax_rate_is_a_tunable_knob() {
    let catalog = Catalog::standard();
    let on = date(2025, 7, 1);
    let mut cart = Cart::new();
    cart.add(ProductId::new("spx-desktop"), 10).expect("add");
    let config = QuoteConfig {
        service_charge: Decimal::new(5000, 2),
        waive_processing_fee: true,
        ..QuoteConfig::default()
    };

    let mut untaxed = no_seasonal();
    untaxed.profit_tax_rate = Decimal::ZERO;
    let quote = compute_quote(&catalog, &cart, &config, &untaxed, on).expect("quote computes");
    assert_eq!(quote.profit_after_tax, quote.profit_before_tax);

    let taxed = no_seasonal();
    let quote = compute_quote(&catalog, &cart, &config, &taxed, on).expect("quote computes");
    assert!(quote.profit_after_tax < quote.profit_before_tax);
}
