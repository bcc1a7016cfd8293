//! Domain error types.

use common::{ConsignmentId, OrderStatus};
use order_store::StoreError;
use thiserror::Error;

use crate::validation::FieldErrors;

/// Errors that can occur during order operations.
#[derive(Debug, Error)]
pub enum OrderError {
    /// The submission failed field-level validation.
    #[error("Validation failed: {0}")]
    Validation(FieldErrors),

    /// No consignment ID was supplied.
    #[error("Consignment ID is required")]
    ConsignmentIdRequired,

    /// No order carries the consignment ID.
    #[error("Order not found: {0}")]
    NotFound(ConsignmentId),

    /// The order is already cancelled; repeating the cancel is rejected.
    #[error("Order already cancelled: {0}")]
    AlreadyCancelled(ConsignmentId),

    /// The order left `Pending` and can only be cancelled by an operator.
    #[error("Order {consignment_id} is {status} and requires manual intervention to cancel")]
    RequiresManualIntervention {
        consignment_id: ConsignmentId,
        status: OrderStatus,
    },

    /// An error occurred in the order store.
    #[error("Order store error: {0}")]
    Store(#[from] StoreError),
}

impl From<FieldErrors> for OrderError {
    fn from(errors: FieldErrors) -> Self {
        OrderError::Validation(errors)
    }
}
