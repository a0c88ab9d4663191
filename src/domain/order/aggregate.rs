use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::user::User;
use super::value_objects::{NewOrderedCoffee, OrderedCoffee};

pub type OrderId = i64;

// ============================================================================
// Order Aggregate
// ============================================================================
//
// An order is either waiting (placed, not yet validated) or validated. The
// two states are carried by `is_waiting` and `validation_date`; validation is
// the only mutation an order ever sees.
//
// ============================================================================

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    /// Username of the owner.
    pub user: String,
    pub items: Vec<OrderedCoffee>,
    pub is_waiting: bool,
    pub validation_date: Option<DateTime<Utc>>,
}

impl Order {
    pub fn is_owned_by(&self, username: &str) -> bool {
        self.user == username
    }

    /// Mark the order as validated at `at`.
    pub fn validate(&mut self, at: DateTime<Utc>) {
        self.is_waiting = false;
        self.validation_date = Some(at);
    }
}

/// An order assembled in memory, waiting to be written in a single unit of work.
#[derive(Clone, Debug, PartialEq)]
pub struct NewOrder {
    pub user: User,
    pub items: Vec<NewOrderedCoffee>,
}

impl NewOrder {
    pub fn waiting(user: User) -> Self {
        Self {
            user,
            items: Vec::new(),
        }
    }

    pub fn add_item(&mut self, item: NewOrderedCoffee) {
        self.items.push(item);
    }

    /// Build the stored form once the store has handed out identifiers.
    pub fn into_persisted(self, id: OrderId, item_ids: &[i64]) -> Order {
        let items = self
            .items
            .into_iter()
            .zip(item_ids.iter().copied())
            .map(|(item, item_id)| item.into_persisted(item_id))
            .collect();

        Order {
            id,
            user: self.user.username,
            items,
            is_waiting: true,
            validation_date: None,
        }
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::coffee::Coffee;
    use chrono::TimeZone;

    fn alice() -> User {
        User {
            id: 1,
            username: "alice".into(),
            roles: vec!["ROLE_USER".into()],
        }
    }

    fn arabica() -> Coffee {
        Coffee { id: 1, name: "Arabica".into() }
    }

    #[test]
    fn test_new_order_starts_waiting() {
        let mut order = NewOrder::waiting(alice());
        order.add_item(NewOrderedCoffee::new(arabica(), 2, 0));

        let order = order.into_persisted(10, &[100]);

        assert_eq!(order.id, 10);
        assert_eq!(order.user, "alice");
        assert!(order.is_waiting);
        assert!(order.validation_date.is_none());
        assert_eq!(order.items.len(), 1);
        assert_eq!(order.items[0].id, 100);
    }

    #[test]
    fn test_validate_sets_date_and_clears_waiting() {
        let mut order = NewOrder::waiting(alice()).into_persisted(1, &[]);
        let at = Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap();

        order.validate(at);

        assert!(!order.is_waiting);
        assert_eq!(order.validation_date, Some(at));
    }

    #[test]
    fn test_ownership() {
        let order = NewOrder::waiting(alice()).into_persisted(1, &[]);
        assert!(order.is_owned_by("alice"));
        assert!(!order.is_owned_by("bob"));
    }

    #[test]
    fn test_order_serializes_camel_case() {
        let order = NewOrder::waiting(alice()).into_persisted(3, &[]);
        let json = serde_json::to_value(&order).unwrap();

        assert_eq!(json["isWaiting"], true);
        assert!(json["validationDate"].is_null());
        assert_eq!(json["user"], "alice");
    }
}
