//! Domain layer for the order-management service.
//!
//! This crate provides the order lifecycle rules:
//! - phone-number and required-field validation
//! - consignment-ID generation and fee computation
//! - pluggable fee and address-resolution policies
//! - the order status transition rules
//! - `OrderService`, which orchestrates create, list and cancel against an
//!   [`order_store::OrderRepository`]

pub mod catalog;
pub mod consignment;
pub mod error;
pub mod order;
pub mod policy;
pub mod validation;

pub use common::{ConsignmentId, OrderStatus};
pub use consignment::{ConsignmentIdSource, RandomConsignmentIds, generate_consignment_id};
pub use error::OrderError;
pub use order::{
    CreateOrderInput, INVALID_PHONE_MESSAGE, ListOrders, OrderCreated, OrderListItem,
    OrderService, PageRequest, Paginated, TransitionError,
};
pub use policy::{
    AddressResolver, DefaultAddressResolver, FeePolicy, Fees, FixedFeePolicy, OrderDefaults,
    OrderPolicies, ResolvedAddress,
};
pub use validation::{FieldErrors, validate_phone_number};
