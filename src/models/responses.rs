use serde::{Deserialize, Serialize};

use crate::core::cart::{Cart, CartTotals};
use crate::models::domain::{Lead, LegacyMatch, ScoredCandidate};

/// Response for the find legacy endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LegacyMatchResponse {
    #[serde(flatten)]
    pub result: LegacyMatch,
    #[serde(rename = "leadId")]
    pub lead_id: Option<uuid::Uuid>,
    pub cached: bool,
}

/// Response for the similar players endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimilarPlayersResponse {
    pub players: Vec<ScoredCandidate>,
    pub total_candidates: usize,
}

/// Response for the lead listing endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeadListResponse {
    pub leads: Vec<Lead>,
    pub count: usize,
}

/// Cart with its derived totals
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartResponse {
    #[serde(rename = "cartId")]
    pub cart_id: String,
    pub cart: Cart,
    pub totals: CartTotals,
}

impl CartResponse {
    pub fn new(cart_id: impl Into<String>, cart: Cart) -> Self {
        let totals = cart.totals();
        Self {
            cart_id: cart_id.into(),
            cart,
            totals,
        }
    }
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub candidates: usize,
    pub database: Option<bool>,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, message: impl Into<String>, status_code: u16) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
            status_code,
        }
    }
}
