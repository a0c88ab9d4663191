use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use serde::Deserialize;

use crate::domain::order::{NewOrder, Order, OrderId};
use crate::domain::{Coffee, CoffeeId, User, UserId};

use super::{CoffeeRepository, OrderRepository, StoreError, UserRepository};

// ============================================================================
// In-Memory Store
// ============================================================================
//
// Single mutex over all tables; each repository call takes it once, so every
// call is its own unit of work. Nothing survives a restart.
//
// ============================================================================

#[derive(Default)]
pub struct InMemoryStore {
    state: Mutex<State>,
}

#[derive(Default)]
struct State {
    users: HashMap<String, User>,
    coffees: HashMap<CoffeeId, Coffee>,
    orders: BTreeMap<OrderId, Order>,
    last_user_id: UserId,
    last_order_id: OrderId,
    last_item_id: i64,
}

/// Seed data for a store started without a database.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Fixtures {
    #[serde(default)]
    pub users: Vec<UserFixture>,
    #[serde(default)]
    pub coffees: Vec<Coffee>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UserFixture {
    pub username: String,
    #[serde(default)]
    pub roles: Vec<String>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_fixtures(fixtures: Fixtures) -> Result<Self, StoreError> {
        let store = Self::new();
        for user in fixtures.users {
            store.add_user(&user.username, user.roles)?;
        }
        for coffee in fixtures.coffees {
            store.put_coffee(coffee)?;
        }
        Ok(store)
    }

    pub fn add_user(&self, username: &str, roles: Vec<String>) -> Result<User, StoreError> {
        let mut state = self.lock("add_user")?;
        state.last_user_id += 1;
        let user = User {
            id: state.last_user_id,
            username: username.to_string(),
            roles,
        };
        state.users.insert(user.username.clone(), user.clone());
        Ok(user)
    }

    pub fn put_coffee(&self, coffee: Coffee) -> Result<(), StoreError> {
        self.lock("put_coffee")?.coffees.insert(coffee.id, coffee);
        Ok(())
    }

    fn lock(&self, operation: &'static str) -> Result<MutexGuard<'_, State>, StoreError> {
        self.state
            .lock()
            .map_err(|_| StoreError::LockPoisoned(operation))
    }

    fn waiting_where(&self, operation: &'static str, owner: Option<&str>) -> Result<Vec<Order>, StoreError> {
        let state = self.lock(operation)?;
        Ok(state
            .orders
            .values()
            .filter(|order| order.is_waiting)
            .filter(|order| owner.map_or(true, |username| order.is_owned_by(username)))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        Ok(self.lock("find_user_by_username")?.users.get(username).cloned())
    }
}

#[async_trait]
impl CoffeeRepository for InMemoryStore {
    async fn find_coffee(&self, id: CoffeeId) -> Result<Option<Coffee>, StoreError> {
        Ok(self.lock("find_coffee")?.coffees.get(&id).cloned())
    }
}

#[async_trait]
impl OrderRepository for InMemoryStore {
    async fn find_order(&self, id: OrderId) -> Result<Option<Order>, StoreError> {
        Ok(self.lock("find_order")?.orders.get(&id).cloned())
    }

    async fn find_waiting_orders_for_user(&self, username: &str) -> Result<Vec<Order>, StoreError> {
        self.waiting_where("find_waiting_orders_for_user", Some(username))
    }

    async fn find_waiting_orders(&self) -> Result<Vec<Order>, StoreError> {
        self.waiting_where("find_waiting_orders", None)
    }

    async fn insert_order(&self, order: NewOrder) -> Result<Order, StoreError> {
        let mut state = self.lock("insert_order")?;

        state.last_order_id += 1;
        let order_id = state.last_order_id;

        let first_item_id = state.last_item_id + 1;
        state.last_item_id += order.items.len() as i64;
        let item_ids: Vec<i64> = (first_item_id..=state.last_item_id).collect();

        let order = order.into_persisted(order_id, &item_ids);
        state.orders.insert(order_id, order.clone());
        Ok(order)
    }

    async fn update_orders(&self, orders: &[Order]) -> Result<(), StoreError> {
        let mut state = self.lock("update_orders")?;
        for order in orders {
            // Orders deleted since they were loaded are not resurrected.
            if let Some(stored) = state.orders.get_mut(&order.id) {
                stored.is_waiting = order.is_waiting;
                stored.validation_date = order.validation_date;
            }
        }
        Ok(())
    }

    async fn delete_order(&self, id: OrderId) -> Result<(), StoreError> {
        self.lock("delete_order")?.orders.remove(&id);
        Ok(())
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
