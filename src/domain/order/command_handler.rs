use std::sync::Arc;

use crate::domain::authorize::{require_admin, require_owner_or_admin};
use crate::domain::user::Principal;
use crate::store::{Clock, Store};

use super::aggregate::{NewOrder, Order, OrderId};
use super::commands::CreateOrderRequest;
use super::errors::OrderError;
use super::service::{OrderDto, OrderService};
use super::value_objects::NewOrderedCoffee;

// ============================================================================
// Orders Handler
// ============================================================================
//
// Orchestrates: authorize → repository reads → in-memory changes →
// one write → DTO mapping.
//
// There is no version check on orders: a delete racing a validate-all is
// resolved by whichever write lands last.
//
// ============================================================================

pub struct OrdersHandler {
    store: Arc<dyn Store>,
    clock: Arc<dyn Clock>,
    service: OrderService,
}

impl OrdersHandler {
    pub fn new(store: Arc<dyn Store>, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            clock,
            service: OrderService::new(),
        }
    }

    /// Place a waiting order for the caller.
    ///
    /// Every coffee is resolved before anything is written, so an unknown
    /// coffee id aborts the whole order.
    pub async fn create_order(
        &self,
        principal: &Principal,
        request: CreateOrderRequest,
    ) -> Result<Order, OrderError> {
        let user = self
            .store
            .find_user_by_username(&principal.username)
            .await?
            .ok_or_else(|| OrderError::UserNotFound(principal.username.clone()))?;

        let mut order = NewOrder::waiting(user);
        for item in request.items {
            let coffee = self
                .store
                .find_coffee(item.id)
                .await?
                .ok_or(OrderError::CoffeeNotFound(item.id))?;
            order.add_item(NewOrderedCoffee::new(coffee, item.quantity30, item.quantity50));
        }

        let order = self.store.insert_order(order).await?;

        tracing::info!(
            order_id = order.id,
            username = %order.user,
            item_count = order.items.len(),
            "✅ Order placed"
        );

        Ok(order)
    }

    /// The caller's own waiting orders.
    pub async fn waiting_orders(&self, principal: &Principal) -> Result<Vec<OrderDto>, OrderError> {
        let orders = self
            .store
            .find_waiting_orders_for_user(&principal.username)
            .await?;

        Ok(self.service.to_dtos(&orders, false))
    }

    /// Every user's waiting orders. Administrators only.
    pub async fn all_waiting_orders(&self, principal: &Principal) -> Result<Vec<OrderDto>, OrderError> {
        require_admin(principal)?;

        let orders = self.store.find_waiting_orders().await?;
        Ok(self.service.to_dtos(&orders, true))
    }

    /// Delete an order as its owner or as an administrator.
    ///
    /// Returns the order as it was before deletion.
    pub async fn delete_order(&self, principal: &Principal, id: OrderId) -> Result<OrderDto, OrderError> {
        let order = self
            .store
            .find_order(id)
            .await?
            .ok_or(OrderError::OrderNotFound(id))?;

        require_owner_or_admin(principal, &order)?;

        self.store.delete_order(order.id).await?;

        tracing::info!(
            order_id = order.id,
            owner = %order.user,
            deleted_by = %principal.username,
            "🗑️ Order deleted"
        );

        Ok(self.service.to_dto(&order, false))
    }

    /// Validate every waiting order. Administrators only.
    ///
    /// The whole batch shares one validation timestamp.
    pub async fn validate_all_waiting_orders(
        &self,
        principal: &Principal,
    ) -> Result<Vec<OrderDto>, OrderError> {
        require_admin(principal)?;

        let mut orders = self.store.find_waiting_orders().await?;

        let now = self.clock.now();
        for order in &mut orders {
            order.validate(now);
        }

        self.store.update_orders(&orders).await?;

        tracing::info!(
            count = orders.len(),
            validated_by = %principal.username,
            validation_date = %now,
            "✅ Waiting orders validated"
        );

        Ok(self.service.to_dtos(&orders, true))
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
