//! Order create, list and cancel endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use domain::{CreateOrderInput, FieldErrors, ListOrders, OrderCreated, OrderListItem, Paginated};
use order_store::OrderRepository;
use serde::Deserialize;

use crate::AppState;
use crate::error::ApiError;
use crate::response::ApiResponse;

/// Query string of `GET /orders/all`.
///
/// Kept as raw strings so a non-numeric `page` or `limit` falls back to the
/// default instead of failing the request.
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub order_status: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
}

impl From<ListParams> for ListOrders {
    fn from(params: ListParams) -> Self {
        let number = |raw: Option<String>| raw.and_then(|v| v.trim().parse::<i64>().ok());
        ListOrders {
            order_status: params.order_status,
            page: number(params.page),
            limit: number(params.limit),
        }
    }
}

/// POST /api/v1/orders — validate and store a new order.
#[tracing::instrument(skip(state, payload))]
pub async fn create<R: OrderRepository + 'static>(
    State(state): State<Arc<AppState<R>>>,
    payload: Result<Json<CreateOrderInput>, JsonRejection>,
) -> Result<(StatusCode, ApiResponse<OrderCreated>), ApiError> {
    let Json(input) = payload.map_err(|rejection| {
        ApiError::Validation(FieldErrors::single("body", rejection.body_text()))
    })?;

    let created = state
        .orders
        .create_order(input)
        .await
        .map_err(|err| ApiError::from_order(err, "Failed to create order"))?;

    Ok((
        StatusCode::CREATED,
        ApiResponse::success(StatusCode::CREATED, "Order created successfully", created),
    ))
}

/// GET /api/v1/orders/all — one page of orders filtered by status.
#[tracing::instrument(skip(state))]
pub async fn list<R: OrderRepository + 'static>(
    State(state): State<Arc<AppState<R>>>,
    Query(params): Query<ListParams>,
) -> Result<ApiResponse<Paginated<OrderListItem>>, ApiError> {
    let page = state
        .orders
        .list_orders(params.into())
        .await
        .map_err(|err| ApiError::from_order(err, "Failed to fetch orders"))?;

    Ok(ApiResponse::success(StatusCode::OK, "Orders fetched successfully", page))
}

/// POST /api/v1/orders/{consignment_id}/cancel — cancel a pending order.
#[tracing::instrument(skip(state))]
pub async fn cancel<R: OrderRepository + 'static>(
    State(state): State<Arc<AppState<R>>>,
    Path(consignment_id): Path<String>,
) -> Result<ApiResponse<()>, ApiError> {
    state
        .orders
        .cancel_order(&consignment_id)
        .await
        .map_err(|err| ApiError::from_order(err, "Failed to cancel order"))?;

    Ok(ApiResponse::message(StatusCode::OK, "Order cancelled successfully"))
}
