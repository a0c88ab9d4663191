use serde::{Deserialize, Serialize};

use crate::domain::coffee::CoffeeId;

// ============================================================================
// Order Commands - Request payloads
// ============================================================================

/// Body of `POST /api/order`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateOrderRequest {
    pub items: Vec<OrderItemInput>,
}

/// A requested line: coffee id plus the count for each tier.
///
/// Counts are unsigned, so negative quantities never make it past binding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItemInput {
    pub id: CoffeeId,
    pub quantity30: u32,
    pub quantity50: u32,
}
