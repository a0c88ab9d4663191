use serde::{Deserialize, Serialize};

use crate::domain::coffee::Coffee;

pub type OrderedCoffeeId = i64;

// ============================================================================
// Order Value Objects
// ============================================================================

/// One line of an order: a coffee and the count ordered in each tier.
///
/// Lines are written together with their order and never change afterwards.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct OrderedCoffee {
    pub id: OrderedCoffeeId,
    pub coffee: Coffee,
    pub quantity30: u32,
    pub quantity50: u32,
}

/// An order line that has not been persisted yet.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewOrderedCoffee {
    pub coffee: Coffee,
    pub quantity30: u32,
    pub quantity50: u32,
}

impl NewOrderedCoffee {
    pub fn new(coffee: Coffee, quantity30: u32, quantity50: u32) -> Self {
        Self {
            coffee,
            quantity30,
            quantity50,
        }
    }

    pub fn into_persisted(self, id: OrderedCoffeeId) -> OrderedCoffee {
        OrderedCoffee {
            id,
            coffee: self.coffee,
            quantity30: self.quantity30,
            quantity50: self.quantity50,
        }
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
