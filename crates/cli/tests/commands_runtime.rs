//! Runtime checks for the CLI commands against temp cart files.

use std::io::Write;

use chrono::NaiveDate;
use quotecraft_core::config::AppConfig;

use quotecraft_cli::commands;

fn cart_file(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    write!(file, "{contents}").expect("write cart");
    file
}

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

const DEMO_CART: &str = r#"
billing_cycle = "monthly"
service_charge = 50.0

[customer]
name = "Avery Chen"
company = "Northwind"

[[lines]]
product = "spx-desktop"
qty = 10

[[lines]]
product = "dr-service"
qty = 1
"#;

#[test]
fn quote_json_output_carries_totals_and_recommendations() {
    let cart = cart_file(DEMO_CART);
    let config = AppConfig::default();

    let result =
        commands::quote::run(&config, cart.path(), true, Some(date(2025, 7, 1)));
    assert_eq!(result.exit_code, 0, "output: {}", result.output);

    let payload: serde_json::Value =
        serde_json::from_str(&result.output).expect("json output parses");
    let quote = &payload["quote"];
    assert_eq!(quote["lines"].as_array().map(Vec::len), Some(2));
    assert_eq!(quote["billing_cycle"], "monthly");
    assert!(payload["recommendations"].as_array().map(Vec::len).unwrap_or(0) > 0);
}

#[test]
fn quote_text_output_is_human_readable() {
    let cart = cart_file(DEMO_CART);
    let config = AppConfig::default();

    let result =
        commands::quote::run(&config, cart.path(), false, Some(date(2025, 7, 1)));
    assert_eq!(result.exit_code, 0);
    assert!(result.output.contains("Quote for Avery Chen (Northwind)"));
    assert!(result.output.contains("SPX Desktop"));
    assert!(result.output.contains("Disaster Recovery Service"));
    assert!(result.output.contains("Recommendations:"));
}

#[test]
fn quote_fails_cleanly_on_a_bad_cart() {
    let cart = cart_file("[[lines]]\nproduct = \"nope\"\nqty = 1\n");
    let config = AppConfig::default();

    let result =
        commands::quote::run(&config, cart.path(), false, Some(date(2025, 7, 1)));
    assert_eq!(result.exit_code, 1);
    assert!(result.output.contains("unknown product"));
}

#[test]
fn render_writes_an_html_document() {
    let cart = cart_file(DEMO_CART);
    let config = AppConfig::default();
    let out_dir = tempfile::tempdir().expect("temp dir");
    let out_path = out_dir.path().join("quote.html");

    let result = commands::render::run(&config, cart.path(), &out_path, Some(date(2025, 7, 1)));
    assert_eq!(result.exit_code, 0, "output: {}", result.output);

    let html = std::fs::read_to_string(&out_path).expect("html written");
    assert!(html.contains("SPX Desktop"));
    assert!(html.contains("Avery Chen"));
    assert!(html.contains("qr-payload"));
}

#[test]
fn catalog_lists_products() {
    let result = commands::catalog::run();
    assert_eq!(result.exit_code, 0);
    assert!(result.output.contains("SPX Desktop"));
    assert!(result.output.contains("Per Desktop License"));
}
