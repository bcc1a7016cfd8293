//! Pluggable pricing and address-resolution policies.
//!
//! The service asks these for values instead of hardcoding them, so a rate
//! table or a real location directory can replace the defaults without
//! touching order creation.

use std::sync::Arc;

use crate::catalog::{DELIVERY_TYPE_NORMAL, ITEM_TYPE_PARCEL};
use crate::consignment::{ConsignmentIdSource, RandomConsignmentIds};

/// Fee breakdown for one order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fees {
    pub delivery_fee: f64,
    pub cod_fee: f64,
    pub total_fee: f64,
}

impl Fees {
    /// Builds a breakdown whose total is the sum of its components.
    pub fn new(delivery_fee: f64, cod_fee: f64) -> Self {
        Self {
            delivery_fee,
            cod_fee,
            total_fee: delivery_fee + cod_fee,
        }
    }
}

/// Computes the fees charged for an order.
pub trait FeePolicy: Send + Sync {
    fn compute(&self, amount_to_collect: f64) -> Fees;
}

/// Flat delivery and COD fees regardless of the order.
#[derive(Debug, Clone, Copy)]
pub struct FixedFeePolicy {
    pub delivery_fee: f64,
    pub cod_fee: f64,
}

impl Default for FixedFeePolicy {
    fn default() -> Self {
        Self {
            delivery_fee: 60.0,
            cod_fee: 12.0,
        }
    }
}

impl FeePolicy for FixedFeePolicy {
    fn compute(&self, _amount_to_collect: f64) -> Fees {
        Fees::new(self.delivery_fee, self.cod_fee)
    }
}

/// Recipient location as stored on the order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedAddress {
    pub address: String,
    pub city: i32,
    pub zone: i32,
    pub area: i32,
}

/// Maps a submitted address to the stored address and location codes.
pub trait AddressResolver: Send + Sync {
    fn resolve(&self, submitted: &str) -> ResolvedAddress;
}

/// Resolves every address to the single service area currently covered.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultAddressResolver;

pub const DEFAULT_RECIPIENT_ADDRESS: &str = "banani, gulshan 2, dhaka, bangladesh";

impl AddressResolver for DefaultAddressResolver {
    fn resolve(&self, _submitted: &str) -> ResolvedAddress {
        ResolvedAddress {
            address: DEFAULT_RECIPIENT_ADDRESS.to_string(),
            city: 1,
            zone: 1,
            area: 1,
        }
    }
}

/// Classification fields stamped on every new order.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderDefaults {
    pub delivery_type: i32,
    pub item_type: i32,
    pub order_type_id: i32,
    pub order_type: String,
    pub item_quantity: i32,
    pub item_weight: f64,
    pub promo_discount: f64,
    pub discount: f64,
}

impl Default for OrderDefaults {
    fn default() -> Self {
        Self {
            delivery_type: DELIVERY_TYPE_NORMAL,
            item_type: ITEM_TYPE_PARCEL,
            order_type_id: 1,
            order_type: "Regular".to_string(),
            item_quantity: 1,
            item_weight: 0.5,
            promo_discount: 0.0,
            discount: 0.0,
        }
    }
}

/// The policies an [`OrderService`](crate::OrderService) consults when
/// creating orders.
#[derive(Clone)]
pub struct OrderPolicies {
    pub fees: Arc<dyn FeePolicy>,
    pub addresses: Arc<dyn AddressResolver>,
    pub consignment_ids: Arc<dyn ConsignmentIdSource>,
    pub defaults: OrderDefaults,
}

impl Default for OrderPolicies {
    fn default() -> Self {
        Self {
            fees: Arc::new(FixedFeePolicy::default()),
            addresses: Arc::new(DefaultAddressResolver),
            consignment_ids: Arc::new(RandomConsignmentIds),
            defaults: OrderDefaults::default(),
        }
    }
}

impl OrderPolicies {
    pub fn with_fees(mut self, fees: impl FeePolicy + 'static) -> Self {
        self.fees = Arc::new(fees);
        self
    }

    pub fn with_addresses(mut self, addresses: impl AddressResolver + 'static) -> Self {
        self.addresses = Arc::new(addresses);
        self
    }

    pub fn with_consignment_ids(mut self, ids: impl ConsignmentIdSource + 'static) -> Self {
        self.consignment_ids = Arc::new(ids);
        self
    }
}
