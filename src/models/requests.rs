use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::core::cart::{CartItem, LineKey};
use crate::models::PhysiqueQuery;

/// Optional contact details a visitor can leave with a match request
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LeadContact {
    #[validate(length(min = 1, max = 120))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 6, max = 20))]
    #[serde(default)]
    pub phone: Option<String>,
}

/// Request to find the closest legacy player
///
/// Ranges mirror the sliders on the "find your legacy" page.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct FindLegacyRequest {
    #[validate(range(min = 6, max = 60))]
    pub age: u8,
    #[validate(range(min = 140, max = 220))]
    #[serde(alias = "height_cm", alias = "height", rename = "heightCm")]
    pub height_cm: u16,
    #[validate(range(min = 35, max = 140))]
    #[serde(alias = "weight_kg", alias = "weight", rename = "weightKg")]
    pub weight_kg: u16,
    #[serde(default)]
    pub lead: Option<LeadContact>,
}

impl FindLegacyRequest {
    pub fn query(&self) -> PhysiqueQuery {
        PhysiqueQuery::new(self.age, self.height_cm, self.weight_kg)
    }
}

/// Request for a ranked list of similar players
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SimilarPlayersRequest {
    #[validate(range(min = 6, max = 60))]
    pub age: u8,
    #[validate(range(min = 140, max = 220))]
    #[serde(alias = "height_cm", alias = "height", rename = "heightCm")]
    pub height_cm: u16,
    #[validate(range(min = 35, max = 140))]
    #[serde(alias = "weight_kg", alias = "weight", rename = "weightKg")]
    pub weight_kg: u16,
    #[validate(range(min = 1))]
    #[serde(default)]
    pub limit: Option<u16>,
}

impl SimilarPlayersRequest {
    pub fn query(&self) -> PhysiqueQuery {
        PhysiqueQuery::new(self.age, self.height_cm, self.weight_kg)
    }
}

/// Query parameters for listing leads
#[derive(Debug, Clone, Deserialize)]
pub struct LeadListQuery {
    #[serde(default = "default_lead_limit")]
    pub limit: u16,
}

fn default_lead_limit() -> u16 {
    50
}

/// Request to add a line to a cart
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AddCartItemRequest {
    #[validate(length(min = 1))]
    #[serde(rename = "productId")]
    pub product_id: String,
    #[serde(default)]
    pub size: Option<String>,
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(range(min = 0))]
    #[serde(rename = "unitPriceMinor")]
    pub unit_price_minor: i64,
    pub quantity: u32,
}

impl AddCartItemRequest {
    pub fn into_item(self) -> CartItem {
        CartItem {
            key: LineKey::new(self.product_id, self.size),
            name: self.name,
            unit_price_minor: self.unit_price_minor,
            quantity: self.quantity,
        }
    }
}

/// Request to change the quantity of an existing cart line
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateCartItemRequest {
    #[validate(length(min = 1))]
    #[serde(rename = "productId")]
    pub product_id: String,
    #[serde(default)]
    pub size: Option<String>,
    pub quantity: u32,
}

impl UpdateCartItemRequest {
    pub fn key(&self) -> LineKey {
        LineKey::new(self.product_id.clone(), self.size.clone())
    }
}

/// Request to drop a line from a cart
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RemoveCartItemRequest {
    #[validate(length(min = 1))]
    #[serde(rename = "productId")]
    pub product_id: String,
    #[serde(default)]
    pub size: Option<String>,
}

impl RemoveCartItemRequest {
    pub fn into_key(self) -> LineKey {
        LineKey::new(self.product_id, self.size)
    }
}
