use rust_decimal::Decimal;

use crate::domain::product::{
    PricingTier, Product, ProductCategory, ProductId, ProductPricing,
};
use crate::errors::DomainError;

/// The product book. Validated once at construction so the pricing pipeline
/// can treat tier schedules as well-formed.
#[derive(Clone, Debug, Default)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    pub fn new(products: Vec<Product>) -> Result<Self, DomainError> {
        for product in &products {
            product.validate()?;
        }
        Ok(Self { products })
    }

    pub fn find(&self, product_id: &ProductId) -> Option<&Product> {
        self.products.iter().find(|product| &product.id == product_id)
    }

    pub fn find_by_name(&self, name: &str) -> Option<&Product> {
        self.products.iter().find(|product| product.name.eq_ignore_ascii_case(name))
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// The standard managed-backup product book.
    pub fn standard() -> Self {
        let products = vec![
            tiered(
                "spx-desktop",
                "SPX Desktop",
                "Backup solution for desktops",
                "Per Desktop License",
                ProductCategory::Desktop,
                &[
                    (1, Some(25), 588),
                    (26, Some(50), 566),
                    (51, Some(100), 535),
                    (101, Some(150), 499),
                    (151, None, 466),
                ],
            ),
            tiered(
                "spx-sbs",
                "SPX SBS",
                "Backup solution for Small Business Servers",
                "Per Server License",
                ProductCategory::Server,
                &[
                    (1, Some(25), 2405),
                    (26, Some(50), 2279),
                    (51, Some(100), 2113),
                    (101, Some(150), 1926),
                    (151, None, 1772),
                ],
            ),
            tiered(
                "spx-vm",
                "SPX VM",
                "Backup solution for Virtual Machines",
                "Per VM License",
                ProductCategory::VirtualServer,
                &[
                    (1, Some(25), 3000),
                    (26, Some(50), 3000),
                    (51, Some(100), 3000),
                    (101, Some(150), 3000),
                    (151, None, 2776),
                ],
            ),
            tiered(
                "spx-ps",
                "SPX Physical Server",
                "Backup solution for Physical Servers",
                "Per Server License",
                ProductCategory::Server,
                &[
                    (1, Some(25), 4322),
                    (26, Some(50), 4014),
                    (51, Some(100), 3610),
                    (101, Some(150), 3151),
                    (151, None, 2776),
                ],
            ),
            tiered(
                "cloud-portal",
                "Cloud Backup Portal",
                "Hosted management portal for backup fleets",
                "Per Tenant License",
                ProductCategory::SaaS,
                &[(1, Some(10), 1250), (11, None, 1080)],
            ),
            tiered(
                "eset-endpoint",
                "ESET Endpoint Protection",
                "Endpoint antivirus licensing",
                "Per Endpoint License",
                ProductCategory::Other,
                &[(1, Some(5), 250), (6, Some(10), 200), (11, None, 180)],
            ),
            Product {
                id: ProductId::new("dr-service"),
                name: "Disaster Recovery Service".to_string(),
                description: "Managed disaster-recovery runbook and failover".to_string(),
                license: "Per Site".to_string(),
                category: ProductCategory::Service,
                pricing: ProductPricing::FlatRate { unit_cost: Decimal::new(9900, 2) },
            },
        ];

        Self::new(products).expect("standard catalog is well-formed")
    }
}

/// Builds a tiered product with the book's default 35% margin. Costs are in
/// cents to keep the table readable.
fn tiered(
    id: &str,
    name: &str,
    description: &str,
    license: &str,
    category: ProductCategory,
    slabs: &[(u32, Option<u32>, i64)],
) -> Product {
    let margin = Decimal::new(35, 2);
    let tiers = slabs
        .iter()
        .map(|&(min_qty, max_qty, cost_cents)| {
            PricingTier::new(min_qty, max_qty, Decimal::new(cost_cents, 2), margin)
        })
        .collect();
    Product {
        id: ProductId::new(id),
        name: name.to_string(),
        description: description.to_string(),
        license: license.to_string(),
        category,
        pricing: ProductPricing::Tiered { tiers },
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::Catalog;
    use crate::domain::product::{
        PricingTier, Product, ProductCategory, ProductId, ProductPricing,
    };

    #[test]
    fn standard_catalog_finds_products_by_id_and_name() {
        let catalog = Catalog::standard();
        assert_eq!(catalog.products().len(), 7);

        let desktop = catalog.find(&ProductId::new("spx-desktop")).expect("spx-desktop exists");
        assert_eq!(desktop.name, "SPX Desktop");

        assert!(catalog.find_by_name("spx desktop").is_some(), "name lookup ignores case");
        assert!(catalog.find_by_name("spxdesktop").is_none());
    }

    #[test]
    fn construction_rejects_malformed_products() {
        let bad = Product {
            id: ProductId::new("bad"),
            name: "Bad".to_string(),
            description: String::new(),
            license: String::new(),
            category: ProductCategory::Other,
            pricing: ProductPricing::Tiered {
                tiers: vec![PricingTier::new(
                    2,
                    None,
                    Decimal::new(100, 2),
                    Decimal::new(35, 2),
                )],
            },
        };
        assert!(Catalog::new(vec![bad]).is_err());
    }

    #[test]
    fn flat_rate_service_is_present() {
        let catalog = Catalog::standard();
        let dr = catalog.find(&ProductId::new("dr-service")).expect("dr-service exists");
        assert!(matches!(dr.pricing, ProductPricing::FlatRate { .. }));
        assert_eq!(dr.category, ProductCategory::Service);
    }
}
