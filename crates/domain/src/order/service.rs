//! Order service: create, list and cancel orders.

use chrono::Utc;
use common::{ConsignmentId, OrderStatus};
use order_store::{NewOrder, Order, OrderQuery, OrderRepository, StoreError};

use super::input::{CreateOrderInput, non_empty};
use super::transition::{self, TransitionError};
use super::views::{ListOrders, OrderCreated, OrderListItem, PageRequest, Paginated};
use crate::error::OrderError;
use crate::policy::OrderPolicies;
use crate::validation::{FieldErrors, validate_phone_number};

pub const INVALID_PHONE_MESSAGE: &str = "Invalid phone number format";

/// How many fresh consignment IDs to try when the store reports a collision.
const MAX_CONSIGNMENT_ATTEMPTS: usize = 3;

/// Service for managing orders.
///
/// Applies validation and status rules, then delegates persistence to the
/// repository. Holds no mutable state of its own, so one instance is shared
/// by every request.
pub struct OrderService<R: OrderRepository> {
    repository: R,
    policies: OrderPolicies,
}

impl<R: OrderRepository> OrderService<R> {
    /// Creates a service using the default fee, address and ID policies.
    pub fn new(repository: R) -> Self {
        Self::with_policies(repository, OrderPolicies::default())
    }

    pub fn with_policies(repository: R, policies: OrderPolicies) -> Self {
        Self {
            repository,
            policies,
        }
    }

    /// Returns a reference to the underlying repository.
    pub fn repository(&self) -> &R {
        &self.repository
    }

    /// Validates a submission and persists it as a new `Pending` order.
    #[tracing::instrument(skip(self, input), fields(store_id = ?input.store_id))]
    pub async fn create_order(&self, input: CreateOrderInput) -> Result<OrderCreated, OrderError> {
        input.validate_required()?;

        let CreateOrderInput {
            store_id,
            merchant_order_id,
            recipient_name,
            recipient_phone,
            recipient_address,
            special_instruction,
            item_quantity,
            item_weight,
            amount_to_collect,
            item_description,
        } = input;

        let recipient_phone = recipient_phone.unwrap_or_default();
        if !validate_phone_number(&recipient_phone) {
            return Err(FieldErrors::single("recipient_phone", INVALID_PHONE_MESSAGE).into());
        }

        let amount_to_collect = amount_to_collect.unwrap_or_default();
        let fees = self.policies.fees.compute(amount_to_collect);
        let address = self
            .policies
            .addresses
            .resolve(recipient_address.as_deref().unwrap_or_default());
        let defaults = &self.policies.defaults;

        let mut new_order = NewOrder {
            store_id: store_id.unwrap_or_default(),
            merchant_order_id: non_empty(merchant_order_id),
            recipient_name: recipient_name.unwrap_or_default(),
            recipient_phone,
            recipient_address: address.address,
            recipient_city: address.city,
            recipient_zone: address.zone,
            recipient_area: address.area,
            delivery_type: defaults.delivery_type,
            item_type: defaults.item_type,
            special_instruction: non_empty(special_instruction),
            item_quantity: item_quantity
                .filter(|q| *q > 0)
                .unwrap_or(defaults.item_quantity),
            item_weight: item_weight
                .filter(|w| *w > 0.0)
                .unwrap_or(defaults.item_weight),
            amount_to_collect,
            item_description: non_empty(item_description),
            order_status: OrderStatus::Pending,
            consignment_id: self.policies.consignment_ids.next_id(),
            order_created_at: Utc::now(),
            order_type_id: defaults.order_type_id,
            order_type: defaults.order_type.clone(),
            total_fee: fees.total_fee,
            cod_fee: fees.cod_fee,
            promo_discount: defaults.promo_discount,
            discount: defaults.discount,
            delivery_fee: fees.delivery_fee,
        };

        let mut attempt = 1;
        let order = loop {
            match self.repository.insert(new_order.clone()).await {
                Ok(order) => break order,
                Err(StoreError::DuplicateConsignmentId(taken))
                    if attempt < MAX_CONSIGNMENT_ATTEMPTS =>
                {
                    tracing::warn!(%taken, attempt, "consignment id collision, regenerating");
                    new_order.consignment_id = self.policies.consignment_ids.next_id();
                    attempt += 1;
                }
                Err(err) => {
                    tracing::error!(error = %err, "failed to persist order");
                    return Err(err.into());
                }
            }
        };

        metrics::counter!("orders_created_total").increment(1);
        tracing::info!(consignment_id = %order.consignment_id, "order created");

        Ok(OrderCreated::from(&order))
    }

    /// Returns one page of orders filtered by status, newest first.
    ///
    /// The status filter defaults to `Pending` and is matched
    /// case-insensitively; an unknown status simply matches nothing.
    #[tracing::instrument(skip(self))]
    pub async fn list_orders(
        &self,
        request: ListOrders,
    ) -> Result<Paginated<OrderListItem>, OrderError> {
        let status = non_empty(request.order_status)
            .unwrap_or_else(|| OrderStatus::Pending.as_str().to_string());
        let page = PageRequest::new(request.page, request.limit);

        let query = OrderQuery::for_status(status)
            .limit(to_usize(page.limit))
            .offset(to_usize(page.offset()));

        let result = self.repository.list(query).await.map_err(|err| {
            tracing::error!(error = %err, "failed to fetch orders");
            OrderError::from(err)
        })?;

        metrics::counter!("orders_listed_total").increment(1);

        let items = result.orders.into_iter().map(OrderListItem::from).collect();
        Ok(Paginated::new(items, result.total, page))
    }

    /// Cancels a `Pending` order.
    ///
    /// The write is conditional on the order still being `Pending`, so of
    /// two concurrent cancels exactly one succeeds and the other observes
    /// `AlreadyCancelled`.
    #[tracing::instrument(skip(self))]
    pub async fn cancel_order(&self, consignment_id: &str) -> Result<Order, OrderError> {
        let consignment_id = consignment_id.trim();
        if consignment_id.is_empty() {
            return Err(OrderError::ConsignmentIdRequired);
        }
        let consignment_id = ConsignmentId::new(consignment_id);

        let order = self.find_existing(&consignment_id).await?;
        let next = transition::cancel(order.order_status)
            .map_err(|err| reject_cancel(consignment_id.clone(), err))?;

        let updated = self
            .repository
            .update_status(&consignment_id, order.order_status, next)
            .await
            .map_err(|err| {
                tracing::error!(error = %err, "failed to cancel order");
                OrderError::from(err)
            })?;

        match updated {
            Some(order) => {
                metrics::counter!("orders_cancelled_total").increment(1);
                tracing::info!(%consignment_id, "order cancelled");
                Ok(order)
            }
            None => {
                // Lost a race: report what the winner left behind
                let current = self.find_existing(&consignment_id).await?;
                let err = match current.order_status {
                    OrderStatus::Cancelled => TransitionError::AlreadyCancelled,
                    status => TransitionError::RequiresManualIntervention(status),
                };
                Err(reject_cancel(consignment_id, err))
            }
        }
    }

    /// Loads an order by consignment ID.
    #[tracing::instrument(skip(self))]
    pub async fn get_order(&self, consignment_id: &ConsignmentId) -> Result<Order, OrderError> {
        self.find_existing(consignment_id).await
    }

    async fn find_existing(&self, consignment_id: &ConsignmentId) -> Result<Order, OrderError> {
        self.repository
            .find_by_consignment_id(consignment_id)
            .await
            .map_err(|err| {
                tracing::error!(error = %err, "failed to load order");
                OrderError::from(err)
            })?
            .ok_or_else(|| OrderError::NotFound(consignment_id.clone()))
    }
}

fn reject_cancel(consignment_id: ConsignmentId, err: TransitionError) -> OrderError {
    let reason = match err {
        TransitionError::AlreadyCancelled => "already_cancelled",
        TransitionError::RequiresManualIntervention(_) => "manual_intervention",
    };
    metrics::counter!("order_cancel_rejected_total", "reason" => reason).increment(1);
    tracing::debug!(%consignment_id, reason, "cancel rejected");

    match err {
        TransitionError::AlreadyCancelled => OrderError::AlreadyCancelled(consignment_id),
        TransitionError::RequiresManualIntervention(status) => {
            OrderError::RequiresManualIntervention {
                consignment_id,
                status,
            }
        }
    }
}

fn to_usize(value: u64) -> usize {
    usize::try_from(value).unwrap_or(usize::MAX)
}
