// ============================================================================
// Persistence - Repository abstractions
// ============================================================================
//
// The handlers only ever talk to these traits. Two backends implement them:
// - `PgStore`: PostgreSQL through sqlx, writes wrapped in transactions
// - `InMemoryStore`: mutex-guarded maps, for tests and local runs
//
// Every write method is one unit of work: it either fully applies or
// leaves the store untouched.
//
// ============================================================================

mod clock;
mod in_memory;
mod postgres;

use async_trait::async_trait;

use crate::domain::order::{NewOrder, Order, OrderId};
use crate::domain::{Coffee, CoffeeId, User};
use crate::utils::IsTransient;

pub use clock::{Clock, SystemClock};
pub use in_memory::{Fixtures, InMemoryStore};
pub use postgres::PgStore;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("store lock poisoned during {0}")]
    LockPoisoned(&'static str),

    #[error("corrupt row: {0}")]
    Corrupt(String),
}

impl IsTransient for StoreError {
    fn is_transient(&self) -> bool {
        matches!(
            self,
            StoreError::Database(
                sqlx::Error::Io(_) | sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed
            )
        )
    }
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, StoreError>;
}

#[async_trait]
pub trait CoffeeRepository: Send + Sync {
    async fn find_coffee(&self, id: CoffeeId) -> Result<Option<Coffee>, StoreError>;
}

#[async_trait]
pub trait OrderRepository: Send + Sync {
    async fn find_order(&self, id: OrderId) -> Result<Option<Order>, StoreError>;

    /// Waiting orders owned by `username`, ascending by id.
    async fn find_waiting_orders_for_user(&self, username: &str) -> Result<Vec<Order>, StoreError>;

    /// Waiting orders of every user, ascending by id.
    async fn find_waiting_orders(&self) -> Result<Vec<Order>, StoreError>;

    /// Write an order and all of its items, assigning identifiers.
    async fn insert_order(&self, order: NewOrder) -> Result<Order, StoreError>;

    /// Write back the waiting flag and validation date of every order.
    async fn update_orders(&self, orders: &[Order]) -> Result<(), StoreError>;

    /// Remove an order together with its items.
    async fn delete_order(&self, id: OrderId) -> Result<(), StoreError>;
}

/// Everything the order handlers need from persistence.
pub trait Store: UserRepository + CoffeeRepository + OrderRepository {}

impl<T> Store for T where T: UserRepository + CoffeeRepository + OrderRepository {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_classification() {
        assert!(StoreError::Database(sqlx::Error::PoolTimedOut).is_transient());
        assert!(!StoreError::Database(sqlx::Error::RowNotFound).is_transient());
        assert!(!StoreError::LockPoisoned("insert_order").is_transient());
        assert!(!StoreError::Corrupt("quantity30".into()).is_transient());
    }
}
