//! Public projections of stored orders.

use common::{ConsignmentId, OrderStatus};
use order_store::Order;
use serde::Serialize;

use crate::catalog::{delivery_type_label, item_type_label};

/// Default page size for listings.
pub const DEFAULT_PAGE_SIZE: u64 = 10;

/// Summary returned after a successful creation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderCreated {
    pub consignment_id: ConsignmentId,
    pub merchant_order_id: Option<String>,
    pub order_status: OrderStatus,
    pub delivery_fee: f64,
}

impl From<&Order> for OrderCreated {
    fn from(order: &Order) -> Self {
        Self {
            consignment_id: order.consignment_id.clone(),
            merchant_order_id: order.merchant_order_id.clone(),
            order_status: order.order_status,
            delivery_fee: order.delivery_fee,
        }
    }
}

/// One row of an order listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderListItem {
    pub order_consignment_id: ConsignmentId,
    pub order_created_at: String,
    pub order_description: Option<String>,
    pub merchant_order_id: Option<String>,
    pub recipient_name: String,
    pub recipient_address: String,
    pub recipient_phone: String,
    pub order_amount: f64,
    pub total_fee: f64,
    pub instruction: Option<String>,
    pub order_type_id: i32,
    pub cod_fee: f64,
    pub promo_discount: f64,
    pub discount: f64,
    pub delivery_fee: f64,
    pub order_status: OrderStatus,
    pub order_type: String,
    pub item_type: &'static str,
    pub delivery_type: &'static str,
}

impl From<Order> for OrderListItem {
    fn from(order: Order) -> Self {
        Self {
            order_consignment_id: order.consignment_id,
            order_created_at: order
                .order_created_at
                .format("%Y-%m-%d %H:%M:%S")
                .to_string(),
            order_description: order.item_description,
            merchant_order_id: order.merchant_order_id,
            recipient_name: order.recipient_name,
            recipient_address: order.recipient_address,
            recipient_phone: order.recipient_phone,
            order_amount: order.amount_to_collect,
            total_fee: order.total_fee,
            instruction: order.special_instruction,
            order_type_id: order.order_type_id,
            cod_fee: order.cod_fee,
            promo_discount: order.promo_discount,
            discount: order.discount,
            delivery_fee: order.delivery_fee,
            order_status: order.order_status,
            order_type: order.order_type,
            item_type: item_type_label(order.item_type),
            delivery_type: delivery_type_label(order.delivery_type),
        }
    }
}

/// Listing request as received: every part optional and unchecked.
#[derive(Debug, Clone, Default)]
pub struct ListOrders {
    pub order_status: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

impl ListOrders {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(mut self, status: impl Into<String>) -> Self {
        self.order_status = Some(status.into());
        self
    }

    pub fn page(mut self, page: i64) -> Self {
        self.page = Some(page);
        self
    }

    pub fn limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Normalized page window: both `page` and `limit` are at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u64,
    pub limit: u64,
}

impl PageRequest {
    /// Applies defaults (page 1, limit 10) and clamps both to at least 1.
    pub fn new(page: Option<i64>, limit: Option<i64>) -> Self {
        let clamp = |value: i64| u64::try_from(value.max(1)).unwrap_or(1);
        Self {
            page: clamp(page.unwrap_or(1)),
            limit: limit.map_or(DEFAULT_PAGE_SIZE, clamp),
        }
    }

    /// Number of matching rows before this page, saturating at `u64::MAX`.
    pub fn offset(&self) -> u64 {
        (self.page - 1).saturating_mul(self.limit)
    }

    /// Index of the last page for `total` matches; 0 when there are none.
    pub fn last_page(&self, total: u64) -> u64 {
        total.div_ceil(self.limit)
    }
}

/// One page of results plus the bookkeeping clients need to page further.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Paginated<T> {
    pub data: Vec<T>,
    pub total: u64,
    pub current_page: u64,
    pub per_page: u64,
    pub total_in_page: usize,
    pub last_page: u64,
}

impl<T> Paginated<T> {
    pub fn new(data: Vec<T>, total: u64, request: PageRequest) -> Self {
        Self {
            total_in_page: data.len(),
            data,
            total,
            current_page: request.page,
            per_page: request.limit,
            last_page: request.last_page(total),
        }
    }
}
