use thiserror::Error;

use crate::ConsignmentId;

/// Errors that can occur when interacting with the order store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The consignment ID is already taken by another order.
    #[error("Duplicate consignment id: {0}")]
    DuplicateConsignmentId(ConsignmentId),

    /// The record failed the save-time guard.
    #[error("Invalid order record: {0}")]
    InvalidRecord(String),

    /// A stored status value is not one of the known statuses.
    #[error(transparent)]
    InvalidStatus(#[from] common::UnknownOrderStatus),

    /// A database error occurred.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A database migration error occurred.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Result type for order store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
