use crate::Order;

/// Default number of orders per page.
pub const DEFAULT_LIMIT: usize = 10;

/// Filter and window for listing orders.
///
/// The status filter is compared case-insensitively against the stored
/// status name. Results are always ordered by `order_created_at`, newest
/// first.
#[derive(Debug, Clone)]
pub struct OrderQuery {
    /// Filter by status name (case-insensitive). `None` matches every order.
    pub status: Option<String>,

    /// Maximum number of orders to return.
    pub limit: usize,

    /// Number of matching orders to skip.
    pub offset: usize,
}

impl Default for OrderQuery {
    fn default() -> Self {
        Self {
            status: None,
            limit: DEFAULT_LIMIT,
            offset: 0,
        }
    }
}

impl OrderQuery {
    /// Creates a query matching every order, first page.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a query for orders with the given status name.
    pub fn for_status(status: impl Into<String>) -> Self {
        Self {
            status: Some(status.into()),
            ..Default::default()
        }
    }

    /// Filters by status name.
    pub fn status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    /// Limits the number of results.
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Skips the first N matching orders.
    pub fn offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }

    /// Returns true if an order with the given status name passes the filter.
    pub fn matches_status(&self, status: &str) -> bool {
        self.status
            .as_deref()
            .is_none_or(|wanted| wanted.eq_ignore_ascii_case(status))
    }
}

/// One window of matching orders plus the pre-pagination match count.
#[derive(Debug, Clone, Default)]
pub struct OrderPage {
    pub orders: Vec<Order>,
    pub total: u64,
}

impl OrderPage {
    /// A page with no rows and a zero total.
    pub fn empty() -> Self {
        Self::default()
    }
}
