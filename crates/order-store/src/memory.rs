use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::{
    ConsignmentId, NewOrder, Order, OrderPage, OrderQuery, OrderStatus, Result, StoreError,
    store::{OrderRepository, validate_new_order},
};

#[derive(Default)]
struct Inner {
    orders: Vec<Order>,
    last_id: i64,
}

/// In-memory order repository for testing and local runs.
///
/// Provides the same guarantees as the PostgreSQL implementation: unique
/// consignment IDs and conditional status updates, both enforced under a
/// single write lock.
#[derive(Clone, Default)]
pub struct InMemoryOrderRepository {
    inner: Arc<RwLock<Inner>>,
}

impl InMemoryOrderRepository {
    /// Creates a new empty in-memory repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the total number of orders stored.
    pub async fn order_count(&self) -> usize {
        self.inner.read().await.orders.len()
    }

    /// Removes all orders.
    pub async fn clear(&self) {
        let mut inner = self.inner.write().await;
        inner.orders.clear();
        inner.last_id = 0;
    }
}

#[async_trait]
impl OrderRepository for InMemoryOrderRepository {
    async fn insert(&self, order: NewOrder) -> Result<Order> {
        validate_new_order(&order)?;

        let mut inner = self.inner.write().await;

        // Unique constraint simulation
        if inner
            .orders
            .iter()
            .any(|o| o.consignment_id == order.consignment_id)
        {
            return Err(StoreError::DuplicateConsignmentId(order.consignment_id));
        }

        inner.last_id += 1;
        let stored = Order::from_new(inner.last_id, order, Utc::now());
        inner.orders.push(stored.clone());

        Ok(stored)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Order>> {
        let inner = self.inner.read().await;
        Ok(inner.orders.iter().find(|o| o.id == id).cloned())
    }

    async fn find_by_consignment_id(
        &self,
        consignment_id: &ConsignmentId,
    ) -> Result<Option<Order>> {
        let inner = self.inner.read().await;
        Ok(inner
            .orders
            .iter()
            .find(|o| &o.consignment_id == consignment_id)
            .cloned())
    }

    async fn list(&self, query: OrderQuery) -> Result<OrderPage> {
        let inner = self.inner.read().await;
        let mut matching: Vec<&Order> = inner
            .orders
            .iter()
            .filter(|o| query.matches_status(o.order_status.as_str()))
            .collect();

        matching.sort_by(|a, b| {
            b.order_created_at
                .cmp(&a.order_created_at)
                .then_with(|| b.id.cmp(&a.id))
        });

        let total = matching.len() as u64;
        let orders = matching
            .into_iter()
            .skip(query.offset)
            .take(query.limit)
            .cloned()
            .collect();

        Ok(OrderPage { orders, total })
    }

    async fn update_status(
        &self,
        consignment_id: &ConsignmentId,
        expected: OrderStatus,
        next: OrderStatus,
    ) -> Result<Option<Order>> {
        let mut inner = self.inner.write().await;
        let Some(order) = inner
            .orders
            .iter_mut()
            .find(|o| &o.consignment_id == consignment_id)
        else {
            return Ok(None);
        };

        if order.order_status != expected {
            return Ok(None);
        }

        order.order_status = next;
        order.updated_at = Utc::now();
        Ok(Some(order.clone()))
    }
}
