//! Order creation, listing and cancellation.

mod input;
mod service;
pub mod transition;
mod views;

pub use input::CreateOrderInput;
pub use service::{INVALID_PHONE_MESSAGE, OrderService};
pub use transition::TransitionError;
pub use views::{
    DEFAULT_PAGE_SIZE, ListOrders, OrderCreated, OrderListItem, PageRequest, Paginated,
};
