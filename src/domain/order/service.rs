use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::coffee::CoffeeId;
use super::aggregate::{Order, OrderId};
use super::value_objects::OrderedCoffee;

// ============================================================================
// Order Service - Transfer representation
// ============================================================================

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OrderDto {
    pub id: OrderId,
    pub items: Vec<OrderedCoffeeDto>,
    pub is_waiting: bool,
    pub validation_date: Option<DateTime<Utc>>,
    /// Owner username, only present in administrator-facing responses.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct OrderedCoffeeDto {
    pub coffee_id: CoffeeId,
    pub quantity30: u32,
    pub quantity50: u32,
}

impl From<&OrderedCoffee> for OrderedCoffeeDto {
    fn from(item: &OrderedCoffee) -> Self {
        Self {
            coffee_id: item.coffee.id,
            quantity30: item.quantity30,
            quantity50: item.quantity50,
        }
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct OrderService;

impl OrderService {
    pub fn new() -> Self {
        Self
    }

    /// Shape an order for a response. `include_admin_detail` adds the owner.
    pub fn to_dto(&self, order: &Order, include_admin_detail: bool) -> OrderDto {
        OrderDto {
            id: order.id,
            items: order.items.iter().map(OrderedCoffeeDto::from).collect(),
            is_waiting: order.is_waiting,
            validation_date: order.validation_date,
            user: include_admin_detail.then(|| order.user.clone()),
        }
    }

    pub fn to_dtos(&self, orders: &[Order], include_admin_detail: bool) -> Vec<OrderDto> {
        orders
            .iter()
            .map(|order| self.to_dto(order, include_admin_detail))
            .collect()
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::coffee::Coffee;

    fn sample_order() -> Order {
        Order {
            id: 9,
            user: "alice".into(),
            items: vec![
                OrderedCoffee {
                    id: 1,
                    coffee: Coffee { id: 4, name: "Moka".into() },
                    quantity30: 1,
                    quantity50: 2,
                },
                OrderedCoffee {
                    id: 2,
                    coffee: Coffee { id: 5, name: "Java".into() },
                    quantity30: 0,
                    quantity50: 3,
                },
            ],
            is_waiting: true,
            validation_date: None,
        }
    }

    #[test]
    fn test_dto_without_admin_detail_hides_owner() {
        let dto = OrderService::new().to_dto(&sample_order(), false);

        assert_eq!(dto.id, 9);
        assert!(dto.user.is_none());
        assert_eq!(
            dto.items,
            vec![
                OrderedCoffeeDto { coffee_id: 4, quantity30: 1, quantity50: 2 },
                OrderedCoffeeDto { coffee_id: 5, quantity30: 0, quantity50: 3 },
            ]
        );

        let json = serde_json::to_value(&dto).unwrap();
        assert!(json.get("user").is_none());
        assert_eq!(json["items"][0]["coffeeId"], 4);
        assert_eq!(json["isWaiting"], true);
    }

    #[test]
    fn test_dto_with_admin_detail_includes_owner() {
        let dto = OrderService::new().to_dto(&sample_order(), true);
        assert_eq!(dto.user.as_deref(), Some("alice"));
    }
}
