//! Order status transition rules.

use common::OrderStatus;
use thiserror::Error;

/// Why a requested transition is not allowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("order already cancelled")]
    AlreadyCancelled,

    #[error("cannot cancel an order in {0} status")]
    RequiresManualIntervention(OrderStatus),
}

/// Returns the status an order moves to when cancelled from `current`.
pub fn cancel(current: OrderStatus) -> Result<OrderStatus, TransitionError> {
    match current {
        OrderStatus::Pending => Ok(OrderStatus::Cancelled),
        OrderStatus::Cancelled => Err(TransitionError::AlreadyCancelled),
        OrderStatus::Delivered => Err(TransitionError::RequiresManualIntervention(current)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pending_cancels() {
        assert_eq!(cancel(OrderStatus::Pending), Ok(OrderStatus::Cancelled));
    }

    #[test]
    fn cancelled_is_rejected_as_already_cancelled() {
        assert_eq!(
            cancel(OrderStatus::Cancelled),
            Err(TransitionError::AlreadyCancelled)
        );
    }

    #[test]
    fn delivered_requires_manual_intervention() {
        assert_eq!(
            cancel(OrderStatus::Delivered),
            Err(TransitionError::RequiresManualIntervention(
                OrderStatus::Delivered
            ))
        );
    }

    #[test]
    fn cancel_agrees_with_status_predicate() {
        for status in OrderStatus::ALL {
            assert_eq!(cancel(status).is_ok(), status.can_cancel());
        }
    }
}
