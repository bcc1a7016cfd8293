//! Persisted order record types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{ConsignmentId, OrderStatus};

/// An order as it is stored, including the system-assigned key and audit
/// timestamps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    /// System-assigned numeric key.
    pub id: i64,
    pub store_id: i64,
    pub merchant_order_id: Option<String>,
    pub recipient_name: String,
    pub recipient_phone: String,
    pub recipient_address: String,
    pub recipient_city: i32,
    pub recipient_zone: i32,
    pub recipient_area: i32,
    pub delivery_type: i32,
    pub item_type: i32,
    pub special_instruction: Option<String>,
    pub item_quantity: i32,
    pub item_weight: f64,
    pub amount_to_collect: f64,
    pub item_description: Option<String>,
    pub order_status: OrderStatus,
    pub consignment_id: ConsignmentId,
    pub order_created_at: DateTime<Utc>,
    pub order_type_id: i32,
    pub order_type: String,
    pub total_fee: f64,
    pub cod_fee: f64,
    pub promo_discount: f64,
    pub discount: f64,
    pub delivery_fee: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A fully populated order that has not been persisted yet.
///
/// The store assigns `id`, `created_at` and `updated_at` on insert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewOrder {
    pub store_id: i64,
    pub merchant_order_id: Option<String>,
    pub recipient_name: String,
    pub recipient_phone: String,
    pub recipient_address: String,
    pub recipient_city: i32,
    pub recipient_zone: i32,
    pub recipient_area: i32,
    pub delivery_type: i32,
    pub item_type: i32,
    pub special_instruction: Option<String>,
    pub item_quantity: i32,
    pub item_weight: f64,
    pub amount_to_collect: f64,
    pub item_description: Option<String>,
    pub order_status: OrderStatus,
    pub consignment_id: ConsignmentId,
    pub order_created_at: DateTime<Utc>,
    pub order_type_id: i32,
    pub order_type: String,
    pub total_fee: f64,
    pub cod_fee: f64,
    pub promo_discount: f64,
    pub discount: f64,
    pub delivery_fee: f64,
}

impl Order {
    /// Materializes a stored record from a new order.
    pub fn from_new(id: i64, new: NewOrder, now: DateTime<Utc>) -> Self {
        Self {
            id,
            store_id: new.store_id,
            merchant_order_id: new.merchant_order_id,
            recipient_name: new.recipient_name,
            recipient_phone: new.recipient_phone,
            recipient_address: new.recipient_address,
            recipient_city: new.recipient_city,
            recipient_zone: new.recipient_zone,
            recipient_area: new.recipient_area,
            delivery_type: new.delivery_type,
            item_type: new.item_type,
            special_instruction: new.special_instruction,
            item_quantity: new.item_quantity,
            item_weight: new.item_weight,
            amount_to_collect: new.amount_to_collect,
            item_description: new.item_description,
            order_status: new.order_status,
            consignment_id: new.consignment_id,
            order_created_at: new.order_created_at,
            order_type_id: new.order_type_id,
            order_type: new.order_type,
            total_fee: new.total_fee,
            cod_fee: new.cod_fee,
            promo_discount: new.promo_discount,
            discount: new.discount,
            delivery_fee: new.delivery_fee,
            created_at: now,
            updated_at: now,
        }
    }
}
