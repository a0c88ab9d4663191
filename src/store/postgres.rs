use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};
use sqlx::Row;

use crate::config::DatabaseConfig;
use crate::domain::order::{NewOrder, Order, OrderId, OrderedCoffee};
use crate::domain::{Coffee, CoffeeId, User};

use super::{CoffeeRepository, OrderRepository, StoreError, UserRepository};

// ============================================================================
// PostgreSQL Store
// ============================================================================
//
// Tables:
// - users, coffees: owned by other services, read here
// - orders, ordered_coffees: owned here; items cascade with their order
//
// Multi-statement writes run inside one transaction, committed once.
//
// ============================================================================

const SCHEMA: [&str; 5] = [
    "CREATE TABLE IF NOT EXISTS users (
        id BIGSERIAL PRIMARY KEY,
        username TEXT NOT NULL UNIQUE,
        roles TEXT[] NOT NULL DEFAULT '{}'
    )",
    "CREATE TABLE IF NOT EXISTS coffees (
        id BIGSERIAL PRIMARY KEY,
        name TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS orders (
        id BIGSERIAL PRIMARY KEY,
        user_id BIGINT NOT NULL REFERENCES users (id),
        is_waiting BOOLEAN NOT NULL DEFAULT TRUE,
        validation_date TIMESTAMPTZ NULL
    )",
    "CREATE TABLE IF NOT EXISTS ordered_coffees (
        id BIGSERIAL PRIMARY KEY,
        order_id BIGINT NOT NULL REFERENCES orders (id) ON DELETE CASCADE,
        coffee_id BIGINT NOT NULL REFERENCES coffees (id),
        quantity30 BIGINT NOT NULL CHECK (quantity30 >= 0),
        quantity50 BIGINT NOT NULL CHECK (quantity50 >= 0)
    )",
    "CREATE INDEX IF NOT EXISTS orders_waiting_idx ON orders (is_waiting, user_id)",
];

const SELECT_ORDERS: &str = "SELECT o.id, u.username, o.is_waiting, o.validation_date
     FROM orders o
     JOIN users u ON u.id = o.user_id";

const SELECT_ITEMS: &str = "SELECT oc.id, oc.order_id, oc.quantity30, oc.quantity50,
            c.id AS coffee_id, c.name AS coffee_name
     FROM ordered_coffees oc
     JOIN coffees c ON c.id = oc.coffee_id
     WHERE oc.order_id = ANY($1)
     ORDER BY oc.id ASC";

pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .connect(&config.url)
            .await?;

        tracing::info!(max_connections = config.max_connections, "Connected to PostgreSQL");
        Ok(Self { pool })
    }

    /// Create missing tables and indexes.
    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        for statement in SCHEMA {
            sqlx::query(statement).execute(&self.pool).await?;
        }
        tracing::info!("Database schema ready");
        Ok(())
    }

    /// Load orders matching `filter` and attach their items.
    async fn load_orders(&self, filter: &str, username: Option<&str>) -> Result<Vec<Order>, StoreError> {
        let sql = format!("{SELECT_ORDERS} {filter} ORDER BY o.id ASC");
        let mut query = sqlx::query(&sql);
        if let Some(username) = username {
            query = query.bind(username);
        }

        let mut orders = query
            .fetch_all(&self.pool)
            .await?
            .iter()
            .map(order_from_row)
            .collect::<Result<Vec<_>, _>>()?;

        if orders.is_empty() {
            return Ok(orders);
        }

        let ids: Vec<OrderId> = orders.iter().map(|o| o.id).collect();
        let mut items_by_order: HashMap<OrderId, Vec<OrderedCoffee>> = HashMap::new();
        for row in sqlx::query(SELECT_ITEMS).bind(ids.as_slice()).fetch_all(&self.pool).await? {
            let order_id: OrderId = row.try_get("order_id")?;
            items_by_order
                .entry(order_id)
                .or_default()
                .push(item_from_row(&row)?);
        }

        for order in &mut orders {
            order.items = items_by_order.remove(&order.id).unwrap_or_default();
        }

        tracing::debug!(count = orders.len(), "Loaded orders");
        Ok(orders)
    }
}

fn order_from_row(row: &PgRow) -> Result<Order, StoreError> {
    Ok(Order {
        id: row.try_get("id")?,
        user: row.try_get("username")?,
        items: Vec::new(),
        is_waiting: row.try_get("is_waiting")?,
        validation_date: row.try_get("validation_date")?,
    })
}

fn item_from_row(row: &PgRow) -> Result<OrderedCoffee, StoreError> {
    Ok(OrderedCoffee {
        id: row.try_get("id")?,
        coffee: Coffee {
            id: row.try_get("coffee_id")?,
            name: row.try_get("coffee_name")?,
        },
        quantity30: quantity(row, "quantity30")?,
        quantity50: quantity(row, "quantity50")?,
    })
}

fn quantity(row: &PgRow, column: &str) -> Result<u32, StoreError> {
    let value: i64 = row.try_get(column)?;
    u32::try_from(value).map_err(|_| StoreError::Corrupt(format!("{column} out of range: {value}")))
}

#[async_trait]
impl UserRepository for PgStore {
    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let row = sqlx::query("SELECT id, username, roles FROM users WHERE username = $1")
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;

        row.map(|row| {
            Ok::<_, StoreError>(User {
                id: row.try_get("id")?,
                username: row.try_get("username")?,
                roles: row.try_get("roles")?,
            })
        })
        .transpose()
    }
}

#[async_trait]
impl CoffeeRepository for PgStore {
    async fn find_coffee(&self, id: CoffeeId) -> Result<Option<Coffee>, StoreError> {
        let row = sqlx::query("SELECT id, name FROM coffees WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(|row| {
            Ok::<_, StoreError>(Coffee {
                id: row.try_get("id")?,
                name: row.try_get("name")?,
            })
        })
        .transpose()
    }
}

#[async_trait]
impl OrderRepository for PgStore {
    async fn find_order(&self, id: OrderId) -> Result<Option<Order>, StoreError> {
        let sql = format!("{SELECT_ORDERS} WHERE o.id = $1");
        let Some(row) = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
        else {
            return Ok(None);
        };

        let mut order = order_from_row(&row)?;
        order.items = sqlx::query(SELECT_ITEMS)
            .bind([id].as_slice())
            .fetch_all(&self.pool)
            .await?
            .iter()
            .map(item_from_row)
            .collect::<Result<_, _>>()?;

        Ok(Some(order))
    }

    async fn find_waiting_orders_for_user(&self, username: &str) -> Result<Vec<Order>, StoreError> {
        self.load_orders("WHERE o.is_waiting AND u.username = $1", Some(username))
            .await
    }

    async fn find_waiting_orders(&self) -> Result<Vec<Order>, StoreError> {
        self.load_orders("WHERE o.is_waiting", None).await
    }

    async fn insert_order(&self, order: NewOrder) -> Result<Order, StoreError> {
        let mut tx = self.pool.begin().await?;

        let order_id: OrderId = sqlx::query_scalar(
            "INSERT INTO orders (user_id, is_waiting, validation_date) VALUES ($1, TRUE, NULL) RETURNING id",
        )
        .bind(order.user.id)
        .fetch_one(&mut *tx)
        .await?;

        let mut item_ids = Vec::with_capacity(order.items.len());
        for item in &order.items {
            let item_id: i64 = sqlx::query_scalar(
                "INSERT INTO ordered_coffees (order_id, coffee_id, quantity30, quantity50)
                 VALUES ($1, $2, $3, $4) RETURNING id",
            )
            .bind(order_id)
            .bind(item.coffee.id)
            .bind(i64::from(item.quantity30))
            .bind(i64::from(item.quantity50))
            .fetch_one(&mut *tx)
            .await?;
            item_ids.push(item_id);
        }

        tx.commit().await?;

        tracing::debug!(order_id, item_count = item_ids.len(), "Inserted order");
        Ok(order.into_persisted(order_id, &item_ids))
    }

    async fn update_orders(&self, orders: &[Order]) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await?;

        for order in orders {
            sqlx::query("UPDATE orders SET is_waiting = $1, validation_date = $2 WHERE id = $3")
                .bind(order.is_waiting)
                .bind(order.validation_date)
                .bind(order.id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    async fn delete_order(&self, id: OrderId) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM orders WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
//
// Queries against a live PostgreSQL instance are exercised by integration
// runs; these tests only pin the statement shapes.
//
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_items_cascade_with_order() {
        let items_table = SCHEMA
            .iter()
            .find(|s| s.contains("ordered_coffees ("))
            .unwrap();
        assert!(items_table.contains("REFERENCES orders (id) ON DELETE CASCADE"));
    }

    #[test]
    fn test_quantities_cannot_be_negative() {
        let items_table = SCHEMA.iter().find(|s| s.contains("ordered_coffees (")).unwrap();
        assert!(items_table.contains("CHECK (quantity30 >= 0)"));
        assert!(items_table.contains("CHECK (quantity50 >= 0)"));
    }

    #[test]
    fn test_schema_is_idempotent() {
        assert!(SCHEMA.iter().all(|s| s.contains("IF NOT EXISTS")));
    }
}
