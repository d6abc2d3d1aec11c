use quotecraft_core::{Catalog, ProductPricing};

use super::CommandResult;

pub fn run() -> CommandResult {
    let catalog = Catalog::standard();
    let mut lines = vec!["Catalog".to_string()];

    for product in catalog.products() {
        lines.push(format!(
            "\n{} [{}] - {} ({})",
            product.name, product.id, product.category, product.license
        ));
        lines.push(format!("  {}", product.description));
        match &product.pricing {
            ProductPricing::Tiered { tiers } => {
                for tier in tiers {
                    let range = match tier.max_qty {
                        Some(max) => format!("{}-{}", tier.min_qty, max),
                        None => format!("{}+", tier.min_qty),
                    };
                    let margin = tier
                        .margin
                        .fraction()
                        .map(|fraction| {
                            format!("{:.0}%", fraction * rust_decimal::Decimal::from(100u32))
                        })
                        .unwrap_or_else(|| "unset".to_string());
                    lines.push(format!(
                        "  qty {:>9}  unit cost {:>9}  margin {}",
                        range,
                        format!("${:.2}", tier.unit_cost),
                        margin
                    ));
                }
            }
            ProductPricing::FlatRate { unit_cost } => {
                lines.push(format!("  flat rate ${unit_cost:.2}/month, cost plus tax"));
            }
        }
    }

    CommandResult::success(lines.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::run;

    #[test]
    fn lists_every_standard_product() {
        let result = run();
        assert_eq!(result.exit_code, 0);
        for name in [
            "SPX Desktop",
            "SPX SBS",
            "SPX VM",
            "SPX Physical Server",
            "Cloud Backup Portal",
            "ESET Endpoint Protection",
            "Disaster Recovery Service",
        ] {
            assert!(result.output.contains(name), "missing {name}");
        }
        assert!(result.output.contains("flat rate $99.00/month"));
    }
}
