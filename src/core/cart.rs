use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised by cart operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CartError {
    #[error("quantity must be at least 1")]
    ZeroQuantity,

    #[error("no cart line for {0}")]
    UnknownLine(LineKey),

    #[error("quantity overflow for {0}")]
    QuantityOverflow(LineKey),
}

/// Identity of a cart line. Lines with equal keys merge.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LineKey {
    #[serde(rename = "productId")]
    pub product_id: String,
    #[serde(default)]
    pub size: Option<String>,
}

impl LineKey {
    pub fn new(product_id: impl Into<String>, size: Option<String>) -> Self {
        Self {
            product_id: product_id.into(),
            size,
        }
    }
}

impl std::fmt::Display for LineKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.size {
            Some(size) => write!(f, "{} ({})", self.product_id, size),
            None => write!(f, "{}", self.product_id),
        }
    }
}

/// A single line in a cart. Prices are in minor currency units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    #[serde(flatten)]
    pub key: LineKey,
    pub name: String,
    #[serde(rename = "unitPriceMinor")]
    pub unit_price_minor: i64,
    pub quantity: u32,
}

impl CartItem {
    pub fn line_total_minor(&self) -> i64 {
        self.unit_price_minor.saturating_mul(i64::from(self.quantity))
    }
}

/// Derived cart totals
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CartTotals {
    #[serde(rename = "itemCount")]
    pub item_count: u64,
    #[serde(rename = "subtotalMinor")]
    pub subtotal_minor: i64,
}

/// Shopping cart. Line order is insertion order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Cart {
    pub items: Vec<CartItem>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Add a line, merging into an existing line with the same key
    ///
    /// The name and unit price of an existing line are kept.
    pub fn add(&mut self, item: CartItem) -> Result<(), CartError> {
        if item.quantity == 0 {
            return Err(CartError::ZeroQuantity);
        }

        match self.items.iter_mut().find(|line| line.key == item.key) {
            Some(line) => {
                line.quantity = line
                    .quantity
                    .checked_add(item.quantity)
                    .ok_or_else(|| CartError::QuantityOverflow(item.key.clone()))?;
            }
            None => self.items.push(item),
        }
        Ok(())
    }

    /// Set the quantity of an existing line; zero removes it
    pub fn set_quantity(&mut self, key: &LineKey, quantity: u32) -> Result<(), CartError> {
        let position = self
            .items
            .iter()
            .position(|line| &line.key == key)
            .ok_or_else(|| CartError::UnknownLine(key.clone()))?;

        if quantity == 0 {
            self.items.remove(position);
        } else {
            self.items[position].quantity = quantity;
        }
        Ok(())
    }

    /// Remove a line, returning whether it existed
    pub fn remove(&mut self, key: &LineKey) -> bool {
        let before = self.items.len();
        self.items.retain(|line| &line.key != key);
        self.items.len() != before
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn totals(&self) -> CartTotals {
        self.items.iter().fold(CartTotals::default(), |acc, item| CartTotals {
            item_count: acc.item_count + u64::from(item.quantity),
            subtotal_minor: acc.subtotal_minor.saturating_add(item.line_total_minor()),
        })
    }
}
