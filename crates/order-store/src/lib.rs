//! Persistence for orders.
//!
//! The [`OrderRepository`] trait is the port the domain talks to; this crate
//! ships an in-memory adapter for tests and local runs, and a PostgreSQL
//! adapter backed by a pooled `sqlx` connection.

pub mod error;
pub mod memory;
pub mod order;
pub mod postgres;
pub mod query;
pub mod store;

pub use common::{ConsignmentId, OrderStatus};
pub use error::{Result, StoreError};
pub use memory::InMemoryOrderRepository;
pub use order::{NewOrder, Order};
pub use postgres::PostgresOrderRepository;
pub use query::{OrderPage, OrderQuery};
pub use store::{OrderRepository, validate_new_order};
