use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::product::ProductId;
use crate::errors::DomainError;

/// One selected product with its quantity and optional per-line overrides.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub product_id: ProductId,
    pub qty: u32,
    pub margin_override: Option<Decimal>,
    pub unit_cost_override: Option<Decimal>,
}

impl CartLine {
    pub fn new(product_id: ProductId, qty: u32) -> Result<Self, DomainError> {
        validate_qty(qty)?;
        Ok(Self { product_id, qty, margin_override: None, unit_cost_override: None })
    }
}

/// The rep's working selection. Owned by the caller; the engine only ever
/// reads a snapshot of it. Every mutation validates before applying.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Adds a product, merging into an existing line by incrementing its
    /// quantity when the product is already selected.
    pub fn add(&mut self, product_id: ProductId, qty: u32) -> Result<(), DomainError> {
        validate_qty(qty)?;
        if let Some(line) = self.lines.iter_mut().find(|line| line.product_id == product_id) {
            line.qty = line.qty.saturating_add(qty);
            return Ok(());
        }
        self.lines.push(CartLine::new(product_id, qty)?);
        Ok(())
    }

    pub fn set_qty(&mut self, product_id: &ProductId, qty: u32) -> Result<(), DomainError> {
        validate_qty(qty)?;
        self.line_mut(product_id)?.qty = qty;
        Ok(())
    }

    pub fn set_margin_override(
        &mut self,
        product_id: &ProductId,
        margin: Option<Decimal>,
    ) -> Result<(), DomainError> {
        if let Some(fraction) = margin {
            if fraction < Decimal::ZERO {
                return Err(DomainError::NegativeAmount { field: "margin", value: fraction });
            }
        }
        self.line_mut(product_id)?.margin_override = margin;
        Ok(())
    }

    pub fn set_unit_cost_override(
        &mut self,
        product_id: &ProductId,
        unit_cost: Option<Decimal>,
    ) -> Result<(), DomainError> {
        if let Some(cost) = unit_cost {
            if cost < Decimal::ZERO {
                return Err(DomainError::NegativeAmount { field: "unit_cost", value: cost });
            }
        }
        self.line_mut(product_id)?.unit_cost_override = unit_cost;
        Ok(())
    }

    pub fn remove(&mut self, product_id: &ProductId) -> Result<(), DomainError> {
        let before = self.lines.len();
        self.lines.retain(|line| &line.product_id != product_id);
        if self.lines.len() == before {
            return Err(DomainError::UnknownProduct(product_id.clone()));
        }
        Ok(())
    }

    pub fn reset(&mut self) {
        self.lines.clear();
    }

    fn line_mut(&mut self, product_id: &ProductId) -> Result<&mut CartLine, DomainError> {
        self.lines
            .iter_mut()
            .find(|line| &line.product_id == product_id)
            .ok_or_else(|| DomainError::UnknownProduct(product_id.clone()))
    }
}

fn validate_qty(qty: u32) -> Result<(), DomainError> {
    if qty < 1 {
        return Err(DomainError::InvalidQuantity { qty: qty as i64 });
    }
    Ok(())
}
