use async_trait::async_trait;

use crate::{
    ConsignmentId, NewOrder, Order, OrderPage, OrderQuery, OrderStatus, Result, StoreError,
};

/// Core trait for order persistence.
///
/// Implementations must be thread-safe (Send + Sync). Every write is
/// all-or-nothing: a failed call never leaves a partially updated order.
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Persists a new order and returns the stored record.
    ///
    /// Fails with `DuplicateConsignmentId` if the consignment ID is taken.
    async fn insert(&self, order: NewOrder) -> Result<Order>;

    /// Looks up an order by its numeric key.
    async fn find_by_id(&self, id: i64) -> Result<Option<Order>>;

    /// Looks up an order by its consignment ID.
    async fn find_by_consignment_id(
        &self,
        consignment_id: &ConsignmentId,
    ) -> Result<Option<Order>>;

    /// Returns one page of orders matching the query, newest first, with the
    /// total number of matches before pagination.
    ///
    /// No matching rows is not an error: the page is empty and `total` is 0.
    async fn list(&self, query: OrderQuery) -> Result<OrderPage>;

    /// Moves an order from `expected` to `next` status.
    ///
    /// The write happens only if the stored status still equals `expected`
    /// at the time of the update. Returns the updated order, or `None` if the
    /// order does not exist or its status was no longer `expected`.
    async fn update_status(
        &self,
        consignment_id: &ConsignmentId,
        expected: OrderStatus,
        next: OrderStatus,
    ) -> Result<Option<Order>>;
}

/// Save-time guard applied by every adapter before inserting.
pub fn validate_new_order(order: &NewOrder) -> Result<()> {
    if order.consignment_id.as_str().is_empty() {
        return Err(StoreError::InvalidRecord(
            "consignment id is required".to_string(),
        ));
    }
    if order.store_id == 0 {
        return Err(StoreError::InvalidRecord("store_id is required".to_string()));
    }

    let required_text = [
        ("recipient_name", &order.recipient_name),
        ("recipient_phone", &order.recipient_phone),
        ("recipient_address", &order.recipient_address),
    ];
    for (field, value) in required_text {
        if value.trim().is_empty() {
            return Err(StoreError::InvalidRecord(format!("{field} is required")));
        }
    }

    if order.amount_to_collect == 0.0 {
        return Err(StoreError::InvalidRecord(
            "amount_to_collect is required".to_string(),
        ));
    }

    if (order.delivery_fee + order.cod_fee - order.total_fee).abs() > f64::EPSILON {
        return Err(StoreError::InvalidRecord(format!(
            "total_fee {} does not equal delivery_fee {} + cod_fee {}",
            order.total_fee, order.delivery_fee, order.cod_fee
        )));
    }

    Ok(())
}

#[cfg(test)]
pub(crate) mod test_support {
    use chrono::Utc;

    use crate::{ConsignmentId, NewOrder, OrderStatus};

    pub fn new_order(consignment_id: &str) -> NewOrder {
        NewOrder {
            store_id: 131172,
            merchant_order_id: Some("MO-1".to_string()),
            recipient_name: "Rahim Uddin".to_string(),
            recipient_phone: "01712345678".to_string(),
            recipient_address: "banani, gulshan 2, dhaka, bangladesh".to_string(),
            recipient_city: 1,
            recipient_zone: 1,
            recipient_area: 1,
            delivery_type: 48,
            item_type: 2,
            special_instruction: None,
            item_quantity: 1,
            item_weight: 0.5,
            amount_to_collect: 1200.0,
            item_description: None,
            order_status: OrderStatus::Pending,
            consignment_id: ConsignmentId::new(consignment_id),
            order_created_at: Utc::now(),
            order_type_id: 1,
            order_type: "Regular".to_string(),
            total_fee: 72.0,
            cod_fee: 12.0,
            promo_discount: 0.0,
            discount: 0.0,
            delivery_fee: 60.0,
        }
    }
}
